use anyhow::{Context, Result};
use clap::Parser;
use raidcheck::collectors::StorcliRunner;
use raidcheck::config::{Config, Thresholds, DEFAULT_COMMAND_TIMEOUT, DEFAULT_UTILITIES};
use raidcheck::ui::ReportRenderer;
use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "raidcheck")]
#[command(about = "RAID controller health check - silent when everything is healthy")]
#[command(version)]
struct Args {
    /// Dump reconciled controller state to stderr
    #[arg(short, long, env = "RAIDCHECK_DEBUG")]
    debug: bool,

    /// Vendor utility to query; repeat to try several (default: storcli64, storcli, perccli64, perccli)
    #[arg(short, long = "utility", value_name = "NAME")]
    utilities: Vec<String>,

    /// Media error count above which a drive is reported
    #[arg(long, default_value_t = Thresholds::default().media_errors)]
    media_error_threshold: u64,

    /// Predictive failure count above which a drive is reported
    #[arg(long, default_value_t = Thresholds::default().predictive_failures)]
    predictive_failure_threshold: u64,

    /// Timeout for a single utility invocation in seconds
    #[arg(short, long, default_value_t = DEFAULT_COMMAND_TIMEOUT.as_secs(), value_parser = clap::value_parser!(u64).range(1..=3600))]
    timeout: u64,
}

impl Args {
    fn into_config(self) -> Config {
        let utility_search_order = if self.utilities.is_empty() {
            DEFAULT_UTILITIES.iter().map(|s| s.to_string()).collect()
        } else {
            self.utilities
        };

        Config {
            debug_output: self.debug,
            utility_search_order,
            thresholds: Thresholds {
                predictive_failures: self.predictive_failure_threshold,
                media_errors: self.media_error_threshold,
            },
            command_timeout: Duration::from_secs(self.timeout),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if args.debug {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    match check(args.into_config()) {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns whether any controller produced findings
fn check(config: Config) -> Result<bool> {
    let runner = StorcliRunner::new(config.command_timeout)?;
    let outcome = raidcheck::run(&config, &runner).context("RAID check aborted")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    ReportRenderer::new()
        .render(&mut out, &outcome.reports)
        .context("Failed to write report")?;
    out.flush()?;

    Ok(outcome.problems_found())
}
