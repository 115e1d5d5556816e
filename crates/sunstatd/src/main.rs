//! sunstatd - Illumos telemetry collector.
//!
//! Loads a configuration file, resolves host facts once, runs one poll of
//! every configured collector and writes the metrics to stdout as JSON lines.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use chrono::{DateTime, SecondsFormat, Utc};
use clap::Parser;
use serde::Serialize;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use sunstat_core::collectors::{self, Collector, PollEnv};
use sunstat_core::config::Config;
use sunstat_core::host::HostContext;
use sunstat_core::model::Metric;
use sunstat_core::source::{CommandKstat, FileKstat, KstatSource, RealRunner};

/// Illumos telemetry collector.
#[derive(Parser)]
#[command(name = "sunstatd", about = "Illumos telemetry collector", version)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "PATH")]
    config: String,

    /// Run only the named collector. Repeat to name several.
    #[arg(long, value_name = "NAME")]
    only: Vec<String>,

    /// Read `kstat -p` output from a file instead of running kstat.
    #[arg(long, value_name = "PATH")]
    kstat_file: Option<String>,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// One output line.
#[derive(Serialize)]
struct Record<'a> {
    timestamp: String,
    #[serde(flatten)]
    metric: &'a Metric,
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Default level is INFO. Use -q for quiet mode (errors only).
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    for target in ["sunstatd", "sunstat_core"] {
        if let Ok(directive) = format!("{target}={level}").parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Keeps the collectors named by `--only`. An empty list keeps all of them.
fn select(all: Vec<Box<dyn Collector>>, only: &[String]) -> Vec<Box<dyn Collector>> {
    if only.is_empty() {
        return all;
    }
    for name in only {
        if !all.iter().any(|c| c.name() == name) {
            warn!(collector = %name, "--only names a collector that is not configured");
        }
    }
    all.into_iter()
        .filter(|c| only.iter().any(|name| name == c.name()))
        .collect()
}

fn write_metrics(out: impl Write, metrics: &[Metric], now: DateTime<Utc>) -> io::Result<()> {
    let mut out = BufWriter::new(out);
    let timestamp = now.to_rfc3339_opts(SecondsFormat::Secs, true);
    for metric in metrics {
        let record = Record {
            timestamp: timestamp.clone(),
            metric,
        };
        serde_json::to_writer(&mut out, &record)?;
        out.write_all(b"\n")?;
    }
    out.flush()
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    info!("sunstatd {} starting", env!("CARGO_PKG_VERSION"));

    let config = match Config::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    debug!(collectors = ?config.enabled(), "configuration loaded");

    let runner = RealRunner::new();
    let host = match HostContext::resolve(&runner, &config.host) {
        Ok(host) => host,
        Err(e) => {
            error!("cannot resolve host facts: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(
        zone = host.zone_name(),
        page_size = host.page_size(),
        "host facts resolved"
    );

    let kstat: Box<dyn KstatSource> = match &args.kstat_file {
        Some(path) => {
            info!("Reading kstats from {}", path);
            Box::new(FileKstat::new(path))
        }
        None => Box::new(CommandKstat::new(RealRunner::new())),
    };

    let active = select(collectors::from_config(&config), &args.only);
    if active.is_empty() {
        error!("no collector left to run");
        return ExitCode::FAILURE;
    }

    let env = PollEnv {
        host: &host,
        kstat: kstat.as_ref(),
        runner: &runner,
    };
    let metrics = collectors::poll(&active, &env);
    info!(collectors = active.len(), metrics = metrics.len(), "poll finished");

    if let Err(e) = write_metrics(io::stdout().lock(), &metrics, Utc::now()) {
        error!("cannot write metrics: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
