use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::LedgerConfig;
use crate::ledger::{Leaderboard, LedgerSnapshot, MemberStats, ReferralLedger};
use crate::{Count, RejectReason};

/// Cloneable handle over one [`ReferralLedger`] for concurrent callers.
///
/// Proposals and resets hold the write lock for their whole sequence, so two
/// racing proposals can never both pass a check that only one of them should.
/// Reads share the read lock.
#[derive(Clone, Debug, Default)]
pub struct SharedLedger {
    inner: Arc<RwLock<ReferralLedger>>,
}

impl SharedLedger {
    pub fn new(config: LedgerConfig) -> Self {
        Self::from_ledger(ReferralLedger::new(config))
    }

    pub fn from_ledger(ledger: ReferralLedger) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    pub fn propose_referral(
        &self,
        referrer: &str,
        referred: &str,
        age_days: i64,
    ) -> Result<Count, RejectReason> {
        self.inner
            .write()
            .propose_referral(referrer, referred, age_days)
    }

    pub fn stats_for(&self, member: &str) -> MemberStats {
        self.inner.read().stats_for(member)
    }

    pub fn leaderboard(&self, n: usize) -> Leaderboard {
        self.inner.read().leaderboard(n)
    }

    pub fn reset_weekly(&self) {
        self.inner.write().reset_weekly();
    }

    pub fn reset_monthly(&self) {
        self.inner.write().reset_monthly();
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.inner.read().snapshot()
    }

    /// Runs `f` against a consistent read view.
    pub fn with_ledger<R>(&self, f: impl FnOnce(&ReferralLedger) -> R) -> R {
        f(&self.inner.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let ledger = SharedLedger::new(LedgerConfig::default());
        let other = ledger.clone();
        ledger.propose_referral("alice", "bob", 200).unwrap();
        assert_eq!(other.stats_for("alice").weekly, 1);
        other.reset_weekly();
        assert_eq!(ledger.stats_for("alice").weekly, 0);
        assert_eq!(ledger.with_ledger(|l| l.height()), 2);
    }
}
