use std::io::{self, Write};
use std::path::PathBuf;
use std::process::exit;

use anyhow::Context;
use chain_core::chain::Chain;
use chain_core::config::ChainConfig;
use chain_core::request::Request;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "tierctl",
    about = "Dispatch lookups through a tiered handler chain",
    long_about = "Builds a chain of key-value tiers (fast tier first) and resolves\n\
                  `get` requests against it, falling back tier by tier."
)]
struct Cli {
    /// Chain configuration (JSON). Defaults to the built-in fast/slow demo chain.
    #[arg(long, global = true, env = "TIERCTL_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter directive, e.g. `debug` or `chain_core=trace`.
    #[arg(long, global = true, default_value = "warn", env = "TIERCTL_LOG")]
    log: String,

    /// Emit logs as JSON lines instead of plain text.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve each key and print one JSON line per request
    Get {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Resolve each key and print the chain's dispatch statistics
    Stats {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Print the effective chain configuration
    Show,
}

// ── Output records ─────────────────────────────────────────────────

#[derive(Serialize)]
struct DispatchRecord<'a> {
    resolved: bool,
    handled_by: Option<&'a str>,
    #[serde(flatten)]
    request: &'a Request,
}

// ── Commands ───────────────────────────────────────────────────────

fn init_logging(filter: &str, json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false);
    if json {
        builder.json().flatten_event(true).init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<ChainConfig> {
    match path {
        Some(path) => ChainConfig::from_file(path)
            .with_context(|| format!("loading chain configuration from {}", path.display())),
        None => {
            debug!("no configuration given, using the fast/slow demo chain");
            Ok(ChainConfig::fast_slow_demo())
        }
    }
}

fn run_get(chain: &Chain, keys: &[String], out: &mut impl Write) -> anyhow::Result<()> {
    for key in keys {
        let mut request = Request::get(key.as_str());
        let resolved = chain.handle(&mut request);
        let record = DispatchRecord {
            resolved,
            handled_by: request.handled_by(),
            request: &request,
        };
        serde_json::to_writer(&mut *out, &record)?;
        writeln!(out)?;
    }
    Ok(())
}

fn run_stats(chain: &Chain, keys: &[String], out: &mut impl Write) -> anyhow::Result<()> {
    let mut requests: Vec<Request> = keys.iter().map(|k| Request::get(k.as_str())).collect();
    chain.handle_batch(&mut requests);
    serde_json::to_writer_pretty(&mut *out, &chain.stats())?;
    writeln!(out)?;
    Ok(())
}

fn run(cli: &Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_ref())?;

    match &cli.command {
        Commands::Show => {
            serde_json::to_writer_pretty(&mut *out, &config)?;
            writeln!(out)?;
            Ok(())
        }
        Commands::Get { keys } => {
            let chain = config.build().context("building chain")?;
            run_get(&chain, keys, out)
        }
        Commands::Stats { keys } => {
            let chain = config.build().context("building chain")?;
            run_stats(&chain, keys, out)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log, cli.log_json);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(err) = run(&cli, &mut out) {
        eprintln!("Error: {err:#}");
        exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn run_to_lines(args: &[&str]) -> anyhow::Result<Vec<Value>> {
        let cli = Cli::try_parse_from(std::iter::once("tierctl").chain(args.iter().copied()))?;
        let mut out = Vec::new();
        run(&cli, &mut out)?;
        let text = String::from_utf8(out)?;
        Ok(serde_json::Deserializer::from_str(&text)
            .into_iter::<Value>()
            .collect::<Result<Vec<Value>, _>>()?)
    }

    #[test]
    fn get_reports_resolution_and_trace() {
        let lines = run_to_lines(&["get", "bar", "foo", "missing"]).unwrap();
        assert_eq!(lines.len(), 3);

        assert_eq!(lines[0]["resolved"], true);
        assert_eq!(lines[0]["response"], "baz");
        assert_eq!(lines[0]["handled_by"], "FastStorage");

        assert_eq!(lines[1]["response"], "bar");
        assert_eq!(lines[1]["handled_by"], "SlowStorage");
        assert_eq!(lines[1]["trace"], serde_json::json!(["FastStorage", "SlowStorage"]));

        assert_eq!(lines[2]["resolved"], false);
        assert_eq!(lines[2]["response"], Value::Null);
        assert_eq!(lines[2]["verb"], "get");
    }

    #[test]
    fn stats_counts_dispatches() {
        let lines = run_to_lines(&["stats", "bar", "foo", "nope"]).unwrap();
        let stats = &lines[0];
        assert_eq!(stats["dispatches"], 3);
        assert_eq!(stats["exhausted"], 1);
        assert_eq!(stats["handlers"][0]["name"], "FastStorage");
        assert_eq!(stats["handlers"][0]["visits"], 3);
        assert_eq!(stats["handlers"][1]["resolutions"], 1);
    }

    #[test]
    fn show_prints_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"tiers": [{{"kind": "slow", "name": "disk", "entries": {{"k": "v"}}}}]}}"#
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let lines = run_to_lines(&["--config", path, "show"]).unwrap();
        assert_eq!(lines[0]["tiers"][0]["name"], "disk");

        let lines = run_to_lines(&["--config", path, "get", "k"]).unwrap();
        assert_eq!(lines[0]["handled_by"], "disk");
    }

    #[test]
    fn empty_config_fails_to_build() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"tiers": []}}"#).unwrap();
        let path = file.path().to_str().unwrap();

        let err = run_to_lines(&["--config", path, "get", "k"]).unwrap_err();
        assert!(format!("{err:#}").contains("at least one handler"));
    }

    #[test]
    fn get_requires_a_key() {
        assert!(Cli::try_parse_from(["tierctl", "get"]).is_err());
    }
}
