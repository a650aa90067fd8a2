//! Follower CLI - wires configuration, HTTP clients and the batch scheduler
//! into the `follower` binary.

use anyhow::Context;
use clap::Parser;
use follower_client::{FollowClient, HttpSession, SearchClient};
use follower_core::{AuthToken, FollowerConfig, AUTH_TOKEN_ENV};
use follower_engine::{read_names, shuffle_names, BatchScheduler, FixedDelay, TermWorker};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Exit status for startup and fatal errors.
pub const EXIT_FAILURE: u8 = 1;

/// Exit status after a user interrupt.
pub const EXIT_INTERRUPTED: u8 = 130;

/// Search a list of names and follow every matching profile.
#[derive(Parser, Debug)]
#[command(name = "follower")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging for the follower crates.
    #[arg(short, long)]
    pub verbose: bool,
}

/// How a completed invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every batch was processed
    Completed,
    /// Cancelled by the user before the last batch finished
    Interrupted,
}

impl RunStatus {
    /// Process exit code for this status.
    #[must_use]
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Completed => 0,
            Self::Interrupted => EXIT_INTERRUPTED,
        }
    }
}

/// Default log filter when `RUST_LOG` is unset.
#[must_use]
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "info,follower_core=debug,follower_client=debug,follower_engine=debug,follower_cli=debug"
    } else {
        "info"
    }
}

/// Initialize tracing subscriber for logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

/// Entry point for the binary.
pub async fn run(cli: Cli) -> ExitCode {
    init_tracing(cli.verbose);

    info!(
        "Starting Follower v{} (log level: {})",
        env!("CARGO_PKG_VERSION"),
        if cli.verbose { "debug" } else { "info" }
    );

    match execute().await {
        Ok(status) => ExitCode::from(status.exit_code()),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

async fn execute() -> anyhow::Result<RunStatus> {
    let config = FollowerConfig::load_with_env().context("Failed to load configuration")?;

    let token = AuthToken::from_env()
        .with_context(|| format!("{AUTH_TOKEN_ENV} must hold a fresh bearer token"))?;
    info!("Using auth token starting with: {}...", token.prefix());

    let run = &config.run;
    info!(
        names_file = %run.names_file.display(),
        batch_size = run.batch_size,
        max_workers = run.max_workers,
        follow_delay_secs = run.follow_delay_secs,
        submit_delay_secs = run.submit_delay_secs,
        identifier_field = %config.api.identifier_field,
        "Run settings"
    );

    let mut names = read_names(&run.names_file)
        .with_context(|| format!("Cannot start without names file {}", run.names_file.display()))?;
    if run.shuffle {
        shuffle_names(&mut names);
        info!("Shuffled the order of {} names", names.len());
    }

    let session = Arc::new(
        HttpSession::new(&config.api, token).context("Failed to create HTTP client")?,
    );
    let worker = TermWorker::new(
        Arc::new(SearchClient::new(session.clone(), &config.api)),
        Arc::new(FollowClient::new(session, &config.api)),
        Arc::new(FixedDelay::new(run.follow_delay())),
    );
    let scheduler = BatchScheduler::new(worker, run.batch_size)
        .with_max_workers(run.max_workers)
        .with_submit_throttle(Arc::new(FixedDelay::new(run.submit_delay())));

    let cancel = CancellationToken::new();
    spawn_interrupt_listener(cancel.clone());

    let report = scheduler.run(names, &cancel).await;
    report.summary.log();

    if report.interrupted {
        warn!("Process interrupted by user");
        Ok(RunStatus::Interrupted)
    } else {
        info!("Run finished: {}", report.summary);
        Ok(RunStatus::Completed)
    }
}

/// Cancel `cancel` on the first Ctrl+C.
fn spawn_interrupt_listener(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Interrupt received, stopping submissions");
                cancel.cancel();
            }
            Err(e) => error!("Failed to listen for interrupt: {}", e),
        }
    });
}
