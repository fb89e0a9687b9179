use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::config::LedgerConfig;
use crate::counters::PeriodCounters;
use crate::graph::ReferralGraph;
use crate::ranking::{top_n, RankedEntry};
use crate::{Count, MemberId, RejectReason};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemberStats {
    pub weekly: Count,
    pub monthly: Count,
    pub lifetime: Count,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Leaderboard {
    pub weekly_top: Vec<RankedEntry>,
    pub monthly_top: Vec<RankedEntry>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    ReferralAccepted {
        referrer: MemberId,
        referred: MemberId,
        lifetime: Count,
    },
    WeeklyReset,
    MonthlyReset,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub height: u64,
    pub edges: Vec<(MemberId, Vec<MemberId>)>,
    pub counters: PeriodCounters,
    #[serde(with = "hex_digest")]
    pub digest: [u8; 32],
}

/// All referral state for one community.
///
/// Every mutation goes through `&mut self`, so a single owner (or the lock
/// in [`crate::SharedLedger`]) makes each proposal's check-then-mutate
/// sequence atomic.
#[derive(Debug, Default)]
pub struct ReferralLedger {
    config: LedgerConfig,
    graph: ReferralGraph,
    counters: PeriodCounters,
    events: VecDeque<LedgerEvent>,
    height: u64,
}

impl ReferralLedger {
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn graph(&self) -> &ReferralGraph {
        &self.graph
    }

    /// Most recent events, oldest first. At most
    /// `config.event_log_capacity` are retained.
    pub fn events(&self) -> impl Iterator<Item = &LedgerEvent> + '_ {
        self.events.iter()
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    /// First failing admission rule for `referrer → referred`, if any.
    ///
    /// Rules run in a fixed order so simultaneous violations always report
    /// the same reason.
    pub fn check_referral(
        &self,
        referrer: &str,
        referred: &str,
        age_days: i64,
    ) -> Result<(), RejectReason> {
        if !self.config.is_old_enough(age_days) {
            return Err(RejectReason::InsufficientAccountAge);
        }
        if referrer == referred {
            return Err(RejectReason::SelfReferral);
        }
        if self.graph.is_referred(referred) {
            return Err(RejectReason::AlreadyReferred);
        }
        // Swap and circular are the same pair seen from either side; one
        // reverse-edge lookup covers both.
        if self.graph.contains_edge(referred, referrer) {
            return Err(RejectReason::SwapReferral);
        }
        // Shadowed by AlreadyReferred while the reverse index is consistent.
        if self.graph.contains_edge(referrer, referred) {
            return Err(RejectReason::DuplicateReferral);
        }
        Ok(())
    }

    /// Admits the referral or returns why not. On acceptance the edge, the
    /// reverse index and all three tallies move together and the referrer's
    /// lifetime count is returned.
    pub fn propose_referral(
        &mut self,
        referrer: &str,
        referred: &str,
        age_days: i64,
    ) -> Result<Count, RejectReason> {
        if let Err(reason) = self.check_referral(referrer, referred, age_days) {
            debug!(%referrer, %referred, age_days, %reason, "referral rejected");
            return Err(reason);
        }

        let referrer: MemberId = referrer.to_owned();
        let referred: MemberId = referred.to_owned();
        self.graph.link(referrer.clone(), referred.clone());
        let lifetime = self.counters.record(&referrer);
        debug!(%referrer, %referred, lifetime, "referral accepted");
        self.push_event(LedgerEvent::ReferralAccepted {
            referrer,
            referred,
            lifetime,
        });
        Ok(lifetime)
    }

    pub fn stats_for(&self, member: &str) -> MemberStats {
        MemberStats {
            weekly: self.counters.weekly.get(member),
            monthly: self.counters.monthly.get(member),
            lifetime: self.counters.lifetime.get(member),
        }
    }

    pub fn leaderboard(&self, n: usize) -> Leaderboard {
        Leaderboard {
            weekly_top: top_n(&self.counters.weekly, n),
            monthly_top: top_n(&self.counters.monthly, n),
        }
    }

    /// Leaderboard sized by the configured default.
    pub fn default_leaderboard(&self) -> Leaderboard {
        self.leaderboard(self.config.leaderboard_size)
    }

    pub fn lifetime_top(&self, n: usize) -> Vec<RankedEntry> {
        top_n(&self.counters.lifetime, n)
    }

    pub fn reset_weekly(&mut self) {
        let cleared = self.counters.weekly.len();
        self.counters.weekly.reset();
        info!(cleared, "weekly referral counters reset");
        self.push_event(LedgerEvent::WeeklyReset);
    }

    pub fn reset_monthly(&mut self) {
        let cleared = self.counters.monthly.len();
        self.counters.monthly.reset();
        info!(cleared, "monthly referral counters reset");
        self.push_event(LedgerEvent::MonthlyReset);
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        let edges = self.graph.sorted_edges();
        let digest = compute_digest(&edges, &self.counters);
        LedgerSnapshot {
            height: self.height,
            edges,
            counters: self.counters.clone(),
            digest,
        }
    }

    fn push_event(&mut self, event: LedgerEvent) {
        if self.config.event_log_capacity > 0 {
            if self.events.len() == self.config.event_log_capacity {
                self.events.pop_front();
            }
            self.events.push_back(event);
        }
        self.height += 1;
    }
}

/// SHA-256 over the edges (referrers sorted) and the three tallies. Two
/// ledgers fed the same accepted history and resets agree on it.
fn compute_digest(edges: &[(MemberId, Vec<MemberId>)], counters: &PeriodCounters) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"edges");
    for (referrer, referred) in edges {
        hash_str(&mut hasher, referrer);
        hasher.update((referred.len() as u64).to_le_bytes());
        for member in referred {
            hash_str(&mut hasher, member);
        }
    }
    for (tag, counter) in [
        (&b"weekly"[..], &counters.weekly),
        (&b"monthly"[..], &counters.monthly),
        (&b"lifetime"[..], &counters.lifetime),
    ] {
        hasher.update(tag);
        hasher.update((counter.len() as u64).to_le_bytes());
        for (member, count) in counter.iter() {
            hash_str(&mut hasher, member);
            hasher.update(count.to_le_bytes());
        }
    }
    hasher.finalize().into()
}

// Length prefix keeps ("ab","c") and ("a","bc") apart.
fn hash_str(hasher: &mut Sha256, value: &str) {
    hasher.update((value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

mod hex_digest {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; 32], D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        let mut out = [0u8; 32];
        hex::decode_to_slice(&encoded, &mut out).map_err(D::Error::custom)?;
        Ok(out)
    }
}
