use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Count, MemberId};

/// Tally of accepted referrals per referrer for one period.
///
/// Members only appear once incremented, so every stored count is at least
/// one. Reads of unknown members return zero.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct PeriodCounter {
    counts: BTreeMap<MemberId, Count>,
}

impl PeriodCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count for `member`, zero when never incremented.
    pub fn get(&self, member: &str) -> Count {
        self.counts.get(member).copied().unwrap_or(0)
    }

    /// Adds one for `member` and returns the new count.
    pub fn increment(&mut self, member: &MemberId) -> Count {
        let count = self.counts.entry(member.clone()).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    /// Replaces the whole map with an empty one.
    pub fn reset(&mut self) {
        self.counts = BTreeMap::new();
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MemberId, Count)> + '_ {
        self.counts.iter().map(|(member, count)| (member, *count))
    }
}

/// The three independent tallies advanced by every accepted referral.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeriodCounters {
    pub weekly: PeriodCounter,
    pub monthly: PeriodCounter,
    pub lifetime: PeriodCounter,
}

impl PeriodCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments all three tallies and returns the lifetime count.
    pub fn record(&mut self, referrer: &MemberId) -> Count {
        self.weekly.increment(referrer);
        self.monthly.increment(referrer);
        self.lifetime.increment(referrer)
    }
}
