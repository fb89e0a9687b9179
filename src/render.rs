use referral_ledger::{Leaderboard, RankedEntry, RejectReason};

use crate::script::{Outcome, Period};

pub const EMPTY_BOARD: &str = "No referrals yet.";

/// User-facing wording, addressed to the member claiming the referral.
pub fn reject_message(reason: RejectReason) -> &'static str {
    match reason {
        RejectReason::InsufficientAccountAge => {
            "sorry, your account is not old enough for a referral"
        }
        RejectReason::SelfReferral => "you cannot refer yourself",
        RejectReason::AlreadyReferred => "you have already been referred to the community",
        RejectReason::SwapReferral => "you cannot be referred by someone you have referred",
        RejectReason::CircularReferral => "you and this user are already linked by a referral",
        RejectReason::DuplicateReferral => "this user has already referred you",
    }
}

pub fn ranking_lines(entries: &[RankedEntry]) -> String {
    if entries.is_empty() {
        return EMPTY_BOARD.to_string();
    }
    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| format!("{}. {} Referrals: {}", idx + 1, entry.member, entry.count))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn leaderboard(board: &Leaderboard) -> String {
    format!(
        "Weekly Referrals\n{}\nMonthly Referrals\n{}",
        ranking_lines(&board.weekly_top),
        ranking_lines(&board.monthly_top),
    )
}

pub fn outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Accepted {
            referrer,
            referred,
            lifetime,
        } => format!("{referred} has been referred by {referrer} (lifetime referrals: {lifetime})"),
        Outcome::Rejected {
            referred, reason, ..
        } => format!("{referred}, {}", reject_message(*reason)),
        Outcome::Stats { member, stats } => format!(
            "{member}: weekly {} / monthly {} / lifetime {}",
            stats.weekly, stats.monthly, stats.lifetime
        ),
        Outcome::Leaderboard(board) => leaderboard(board),
        Outcome::Reset(Period::Weekly) => "weekly referral counts reset".to_string(),
        Outcome::Reset(Period::Monthly) => "monthly referral counts reset".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_reason_has_distinct_wording() {
        let mut seen = std::collections::HashSet::new();
        for reason in RejectReason::ALL {
            assert!(seen.insert(reject_message(reason)));
        }
    }

    #[test]
    fn empty_board_renders_fallback() {
        let text = leaderboard(&Leaderboard::default());
        assert_eq!(text.matches(EMPTY_BOARD).count(), 2);
    }

    #[test]
    fn ranking_lines_are_numbered() {
        let entries = vec![
            RankedEntry {
                member: "bob".into(),
                count: 9,
            },
            RankedEntry {
                member: "amy".into(),
                count: 4,
            },
        ];
        assert_eq!(
            ranking_lines(&entries),
            "1. bob Referrals: 9\n2. amy Referrals: 4"
        );
    }
}
