//! Periodic sweep over every repository the app is installed on.
//!
//! Webhooks cover everything that happens in response to an action. Two
//! policies depend on time passing instead, and run from here:
//!
//! - labelling idle pull requests `stale`
//! - merging `merge`-labelled pull requests once GitHub reports them mergeable
//!
//! # Timing
//!
//! - **Interval**: 60 minutes by default (configurable via `PAUL_SWEEP_INTERVAL_MINS`)
//! - **First sweep**: one interval after startup
//! - **Timeout**: a sweep running longer than the interval is abandoned, and
//!   its in-flight calls are cancelled

mod config;
mod sweep;

use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info, info_span, warn};

use crate::github::{AppOps, InstallationOps};

pub use config::SweepConfig;
pub use sweep::{ScheduledJobInformation, SweepReport, run_sweep, run_sweep_at};

/// Runs sweeps every `config.interval` until `shutdown` fires.
pub async fn run_scheduler<A>(app: &A, config: SweepConfig, shutdown: CancellationToken)
where
    A: AppOps,
    <A::Installation as InstallationOps>::Client: 'static,
{
    let mut ticker = tokio::time::interval_at(Instant::now() + config.interval, config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        interval_mins = config.interval.as_secs() / 60,
        repository_limit = config.repository_limit,
        concurrency = config.max_concurrent_repos,
        "Scheduler started"
    );

    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let cancel = shutdown.child_token();
        let started = Instant::now();
        let sweep = run_sweep(app, &config, &cancel).instrument(info_span!("sweep"));

        match tokio::time::timeout(config.sweep_timeout, sweep).await {
            Ok(report) => info!(
                repositories = report.repositories_scanned,
                failures = report.failures,
                labelled_stale = report.labelled_stale,
                merged = report.merged,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Sweep finished"
            ),
            Err(_) => warn!(
                timeout_secs = config.sweep_timeout.as_secs(),
                "Sweep timed out, abandoning it"
            ),
        }
        cancel.cancel();
    }

    info!("Scheduler stopped");
}
