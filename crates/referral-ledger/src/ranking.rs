use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::counters::PeriodCounter;
use crate::{Count, MemberId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RankedEntry {
    pub member: MemberId,
    pub count: Count,
}

/// Highest counts first; equal counts fall back to ascending member id so
/// the order never depends on map iteration.
fn rank_order(a: &RankedEntry, b: &RankedEntry) -> Ordering {
    b.count
        .cmp(&a.count)
        .then_with(|| a.member.cmp(&b.member))
}

/// Up to `n` entries of `counter`, ranked by [`rank_order`].
pub fn top_n(counter: &PeriodCounter, n: usize) -> Vec<RankedEntry> {
    if n == 0 {
        return Vec::new();
    }
    let mut entries: Vec<RankedEntry> = counter
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(member, count)| RankedEntry {
            member: member.clone(),
            count,
        })
        .collect();
    entries.sort_by(rank_order);
    entries.truncate(n);
    entries
}
