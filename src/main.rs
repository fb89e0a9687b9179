//! Referral ledger driver.
//!
//! Replays a JSON-lines script of proposals, stats queries, leaderboard
//! requests and period resets against one in-memory ledger.
//!
//! Usage:
//!   referral replay <script.jsonl> [--config F] [--age-threshold N] [--top N]
//!                   [--snapshot-out F] [--expect-digest HEX] [--verbose]

use std::{
    fs,
    io::{BufReader, Write},
    path::{Path, PathBuf},
};

use clap::{Args, Parser, Subcommand};
use referral_ledger::{LedgerConfig, SharedLedger};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod error;
mod render;
mod script;

use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "referral", version, about = "Community referral ledger driver")]
struct Cli {
    /// Log ledger decisions to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply every command in a JSON-lines script and print the outcomes.
    Replay(ReplayArgs),
}

#[derive(Debug, Args)]
struct ReplayArgs {
    script: PathBuf,

    /// JSON file with `age_threshold_days` / `leaderboard_size`.
    #[arg(long, env = "REFERRAL_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, env = "REFERRAL_AGE_THRESHOLD")]
    age_threshold: Option<u32>,

    #[arg(long, env = "REFERRAL_LEADERBOARD_SIZE")]
    top: Option<usize>,

    /// Write the final ledger snapshot as JSON.
    #[arg(long)]
    snapshot_out: Option<PathBuf>,

    /// Fail unless the final state digest equals this hex value.
    #[arg(long)]
    expect_digest: Option<String>,
}

//==================== config ====================//

fn load_config(args: &ReplayArgs) -> Result<LedgerConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => {
            let bytes = fs::read(path).map_err(|source| CliError::Read {
                path: path.clone(),
                source,
            })?;
            serde_json::from_slice(&bytes).map_err(|source| CliError::Config {
                path: path.clone(),
                source,
            })?
        }
        None => LedgerConfig::default(),
    };
    if let Some(days) = args.age_threshold {
        config = config.with_age_threshold(days);
    }
    if let Some(top) = args.top {
        config = config.with_leaderboard_size(top);
    }
    Ok(config)
}

//==================== replay ====================//

fn replay_cmd(args: &ReplayArgs, out: &mut impl Write) -> Result<SharedLedger, CliError> {
    let config = load_config(args)?;
    let default_top = config.leaderboard_size;
    info!(?config, script = %args.script.display(), "starting replay");

    let file = fs::File::open(&args.script).map_err(|source| CliError::Read {
        path: args.script.clone(),
        source,
    })?;
    let commands = script::read_script(BufReader::new(file))?;

    let ledger = SharedLedger::new(config);
    let stdout_err = |source: std::io::Error| CliError::Write {
        path: PathBuf::from("<stdout>"),
        source,
    };
    for (line, command) in commands {
        let outcome = script::apply(&ledger, command, default_top);
        writeln!(out, "[{line}] {}", render::outcome(&outcome)).map_err(stdout_err)?;
    }

    let board = ledger.leaderboard(default_top);
    writeln!(out, "--- final leaderboard ---\n{}", render::leaderboard(&board))
        .map_err(stdout_err)?;

    let digest = hex::encode(ledger.snapshot().digest);
    writeln!(out, "digest: {digest}").map_err(stdout_err)?;
    if let Some(expected) = &args.expect_digest {
        let expected = expected.trim().to_ascii_lowercase();
        if expected != digest {
            return Err(CliError::DigestMismatch {
                expected,
                actual: digest,
            });
        }
    }

    if let Some(path) = &args.snapshot_out {
        write_snapshot(&ledger, path)?;
    }
    Ok(ledger)
}

fn write_snapshot(ledger: &SharedLedger, path: &Path) -> Result<(), CliError> {
    let snapshot = ledger.snapshot();
    let encoded = serde_json::to_vec_pretty(&snapshot)?;
    fs::write(path, encoded).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        path = %path.display(),
        height = snapshot.height,
        digest = %hex::encode(snapshot.digest),
        "snapshot written"
    );
    Ok(())
}

//==================== main ====================//

fn init_logging(verbose: bool) {
    if !verbose && std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "referral=info,referral_ledger=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Command::Replay(args) => replay_cmd(args, &mut std::io::stdout().lock()).map(|_| ()),
    };
    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(err.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replay_args(script: PathBuf) -> ReplayArgs {
        ReplayArgs {
            script,
            config: None,
            age_threshold: None,
            top: None,
            snapshot_out: None,
            expect_digest: None,
        }
    }

    #[test]
    fn config_file_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_path = dir.path().join("ledger.json");
        fs::write(&cfg_path, r#"{"age_threshold_days": 30, "leaderboard_size": 5}"#).unwrap();
        let mut args = replay_args(dir.path().join("unused.jsonl"));
        args.config = Some(cfg_path);
        args.top = Some(2);
        let config = load_config(&args).unwrap();
        assert_eq!(config.age_threshold_days, 30);
        assert_eq!(config.leaderboard_size, 2);
    }

    #[test]
    fn bad_config_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_path = dir.path().join("ledger.json");
        fs::write(&cfg_path, "not json").unwrap();
        let mut args = replay_args(dir.path().join("unused.jsonl"));
        args.config = Some(cfg_path);
        let err = load_config(&args).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn replay_prints_outcomes_and_writes_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("script.jsonl");
        fs::write(
            &script,
            concat!(
                "{\"op\":\"propose\",\"referrer\":\"alice\",\"referred\":\"bob\",\"age_days\":200}\n",
                "{\"op\":\"propose\",\"referrer\":\"bob\",\"referred\":\"alice\",\"age_days\":200}\n",
                "{\"op\":\"stats\",\"member\":\"alice\"}\n",
                "{\"op\":\"reset_weekly\"}\n",
                "{\"op\":\"leaderboard\"}\n",
            ),
        )
        .unwrap();
        let mut args = replay_args(script);
        let snapshot_path = dir.path().join("snapshot.json");
        args.snapshot_out = Some(snapshot_path.clone());

        let mut out = Vec::new();
        let ledger = replay_cmd(&args, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("[1] bob has been referred by alice (lifetime referrals: 1)"));
        assert!(text.contains("[2] alice, you cannot be referred by someone you have referred"));
        assert!(text.contains("[3] alice: weekly 1 / monthly 1 / lifetime 1"));
        assert!(text.contains("Weekly Referrals\nNo referrals yet."));
        assert!(text.contains("Monthly Referrals\n1. alice Referrals: 1"));
        assert_eq!(ledger.stats_for("alice").monthly, 1);

        let written: serde_json::Value =
            serde_json::from_slice(&fs::read(snapshot_path).unwrap()).unwrap();
        assert_eq!(written["height"], 2);
        assert_eq!(written["digest"].as_str().map(str::len), Some(64));
        assert!(text.contains(&format!("digest: {}", written["digest"].as_str().unwrap())));
    }

    #[test]
    fn expected_digest_gates_the_replay() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("script.jsonl");
        fs::write(
            &script,
            "{\"op\":\"propose\",\"referrer\":\"alice\",\"referred\":\"bob\",\"age_days\":200}\n",
        )
        .unwrap();

        let mut args = replay_args(script);
        let ledger = replay_cmd(&args, &mut Vec::<u8>::new()).unwrap();
        let digest = hex::encode(ledger.snapshot().digest);

        args.expect_digest = Some(digest.to_ascii_uppercase());
        assert!(replay_cmd(&args, &mut Vec::<u8>::new()).is_ok());

        args.expect_digest = Some("00".repeat(32));
        let err = replay_cmd(&args, &mut Vec::<u8>::new()).unwrap_err();
        assert!(matches!(err, CliError::DigestMismatch { ref actual, .. } if *actual == digest));
        assert_eq!(err.exit_code(), 4);
    }
}
