//! Referral ledger core.
//!
//! Members vouch for ("refer") other members. This crate decides whether a
//! proposed referrer → referred edge may be added, keeps the weekly, monthly
//! and lifetime tallies per referrer, and answers ranked top-N queries.
//!
//! * [`graph`] — the directed referral graph plus its reverse index.
//! * [`counters`] — per-period tallies with an explicit zero default.
//! * [`ranking`] — deterministic top-N over a counter map.
//! * [`ledger`] — the facade that applies the admission rules and keeps an
//!   event log and digestable snapshots.
//! * [`shared`] — a cloneable, lock-guarded handle for concurrent callers.
//!
//! Identities are opaque strings; the ledger compares them for equality and
//! ordering, nothing more.

pub mod config;
pub mod counters;
pub mod graph;
pub mod ledger;
pub mod ranking;
pub mod shared;

mod error;

pub use config::LedgerConfig;
pub use error::RejectReason;
pub use ledger::{Leaderboard, LedgerEvent, LedgerSnapshot, MemberStats, ReferralLedger};
pub use ranking::RankedEntry;
pub use shared::SharedLedger;

/// Opaque, stable member identifier supplied by the caller.
pub type MemberId = String;

/// Non-negative referral tally.
pub type Count = u64;
