use serde::{Deserialize, Serialize};

/// Minimum account age, in days, a referred member must exceed.
pub const DEFAULT_AGE_THRESHOLD_DAYS: u32 = 120;

/// Entries shown per leaderboard column.
pub const DEFAULT_LEADERBOARD_SIZE: usize = 3;

/// Ledger events retained in memory; older ones are dropped.
pub const DEFAULT_EVENT_LOG_CAPACITY: usize = 1_024;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LedgerConfig {
    /// Proposals with `age_days <= age_threshold_days` are refused.
    pub age_threshold_days: u32,
    pub leaderboard_size: usize,
    /// Zero turns the event log off.
    pub event_log_capacity: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            age_threshold_days: DEFAULT_AGE_THRESHOLD_DAYS,
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
            event_log_capacity: DEFAULT_EVENT_LOG_CAPACITY,
        }
    }
}

impl LedgerConfig {
    pub fn with_age_threshold(mut self, days: u32) -> Self {
        self.age_threshold_days = days;
        self
    }

    pub fn with_leaderboard_size(mut self, size: usize) -> Self {
        self.leaderboard_size = size;
        self
    }

    pub fn with_event_log_capacity(mut self, capacity: usize) -> Self {
        self.event_log_capacity = capacity;
        self
    }

    pub fn is_old_enough(&self, age_days: i64) -> bool {
        age_days > i64::from(self.age_threshold_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: LedgerConfig = serde_json::from_str(r#"{"leaderboard_size": 5}"#).unwrap();
        assert_eq!(cfg.age_threshold_days, DEFAULT_AGE_THRESHOLD_DAYS);
        assert_eq!(cfg.leaderboard_size, 5);
        assert_eq!(cfg.event_log_capacity, DEFAULT_EVENT_LOG_CAPACITY);
    }

    #[test]
    fn age_gate_is_strict() {
        let cfg = LedgerConfig::default();
        assert!(!cfg.is_old_enough(120));
        assert!(cfg.is_old_enough(121));
        assert!(!cfg.is_old_enough(-1));
    }
}
