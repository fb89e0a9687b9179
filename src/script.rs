use std::io::BufRead;

use referral_ledger::{Count, Leaderboard, MemberId, MemberStats, RejectReason, SharedLedger};
use serde::Deserialize;

use crate::error::CliError;

/// One line of a replay script.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Propose {
        referrer: MemberId,
        referred: MemberId,
        age_days: i64,
    },
    Stats {
        member: MemberId,
    },
    Leaderboard {
        #[serde(default)]
        top: Option<usize>,
    },
    ResetWeekly,
    ResetMonthly,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Period {
    Weekly,
    Monthly,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Accepted {
        referrer: MemberId,
        referred: MemberId,
        lifetime: Count,
    },
    Rejected {
        referrer: MemberId,
        referred: MemberId,
        reason: RejectReason,
    },
    Stats {
        member: MemberId,
        stats: MemberStats,
    },
    Leaderboard(Leaderboard),
    Reset(Period),
}

/// Parses a script, skipping blank lines and `#` comments. Line numbers are
/// 1-based.
pub fn read_script(reader: impl BufRead) -> Result<Vec<(usize, Command)>, CliError> {
    let mut commands = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|source| CliError::ScriptIo {
            line: line_no,
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let command = serde_json::from_str(trimmed).map_err(|source| CliError::Script {
            line: line_no,
            source,
        })?;
        commands.push((line_no, command));
    }
    Ok(commands)
}

pub fn apply(ledger: &SharedLedger, command: Command, default_top: usize) -> Outcome {
    match command {
        Command::Propose {
            referrer,
            referred,
            age_days,
        } => match ledger.propose_referral(&referrer, &referred, age_days) {
            Ok(lifetime) => Outcome::Accepted {
                referrer,
                referred,
                lifetime,
            },
            Err(reason) => Outcome::Rejected {
                referrer,
                referred,
                reason,
            },
        },
        Command::Stats { member } => {
            let stats = ledger.stats_for(&member);
            Outcome::Stats { member, stats }
        }
        Command::Leaderboard { top } => {
            Outcome::Leaderboard(ledger.leaderboard(top.unwrap_or(default_top)))
        }
        Command::ResetWeekly => {
            ledger.reset_weekly();
            Outcome::Reset(Period::Weekly)
        }
        Command::ResetMonthly => {
            ledger.reset_monthly();
            Outcome::Reset(Period::Monthly)
        }
    }
}
