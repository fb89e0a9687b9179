use std::collections::HashMap;

use crate::MemberId;

/// Directed referrer → referred edges.
///
/// `referred_by` is the reverse index: its key set is exactly the union of
/// every list in `edges`, and since a member can be referred only once each
/// key maps to the single referrer that holds it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReferralGraph {
    edges: HashMap<MemberId, Vec<MemberId>>,
    referred_by: HashMap<MemberId, MemberId>,
}

impl ReferralGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_referred(&self, member: &str) -> bool {
        self.referred_by.contains_key(member)
    }

    pub fn referrer_of(&self, member: &str) -> Option<&MemberId> {
        self.referred_by.get(member)
    }

    pub fn contains_edge(&self, referrer: &str, referred: &str) -> bool {
        self.referrer_of(referred)
            .map_or(false, |holder| holder == referrer)
    }

    /// Members referred by `referrer`, oldest first.
    pub fn referrals_by(&self, referrer: &str) -> &[MemberId] {
        self.edges.get(referrer).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edge_count(&self) -> usize {
        self.referred_by.len()
    }

    /// Records the edge. Callers must have run the admission checks; linking
    /// an already-referred member is a contract violation.
    pub(crate) fn link(&mut self, referrer: MemberId, referred: MemberId) {
        debug_assert!(!self.referred_by.contains_key(&referred));
        self.edges
            .entry(referrer.clone())
            .or_default()
            .push(referred.clone());
        self.referred_by.insert(referred, referrer);
    }

    /// Edges grouped by referrer, referrers sorted, referred lists in
    /// insertion order.
    pub fn sorted_edges(&self) -> Vec<(MemberId, Vec<MemberId>)> {
        let mut out: Vec<_> = self
            .edges
            .iter()
            .map(|(referrer, referred)| (referrer.clone(), referred.clone()))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(links: &[(&str, &str)]) -> ReferralGraph {
        let mut graph = ReferralGraph::new();
        for (referrer, referred) in links {
            graph.link((*referrer).into(), (*referred).into());
        }
        graph
    }

    #[test]
    fn link_keeps_reverse_index_in_step() {
        let graph = chain(&[("alice", "bob"), ("alice", "carol")]);
        assert_eq!(graph.referrals_by("alice"), ["bob", "carol"]);
        assert_eq!(graph.referrer_of("carol").map(String::as_str), Some("alice"));
        assert!(graph.is_referred("bob"));
        assert!(!graph.is_referred("alice"));
        assert!(graph.contains_edge("alice", "bob"));
        assert!(!graph.contains_edge("bob", "alice"));
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn unknown_members_have_empty_views() {
        let graph = ReferralGraph::new();
        assert!(graph.referrals_by("ghost").is_empty());
        assert!(graph.referrer_of("ghost").is_none());
        assert!(!graph.contains_edge("ghost", "ghost"));
    }

    #[test]
    fn sorted_edges_orders_referrers_only() {
        let graph = chain(&[("zed", "b"), ("amy", "z"), ("amy", "a")]);
        let edges = graph.sorted_edges();
        assert_eq!(edges[0].0, "amy");
        assert_eq!(edges[0].1, vec!["z", "a"]);
        assert_eq!(edges[1].0, "zed");
    }
}
