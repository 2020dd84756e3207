//! Sweep cadence and limits.

use std::time::Duration;

/// Default sweep interval (one hour).
const DEFAULT_INTERVAL_MINS: u64 = 60;

/// Repositories listed per installation. Larger installations are truncated.
const DEFAULT_REPOSITORY_LIMIT: usize = 50;

/// Repositories swept at the same time.
const DEFAULT_MAX_CONCURRENT_REPOS: usize = 4;

/// Page size when listing installations.
const DEFAULT_INSTALLATION_PAGE_SIZE: u8 = 100;

/// Configuration for the scheduled sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepConfig {
    /// Time between sweeps.
    ///
    /// Default: 60 minutes. Configure via `PAUL_SWEEP_INTERVAL_MINS`.
    pub interval: Duration,

    pub installation_page_size: u8,

    /// Configure via `PAUL_SWEEP_REPOSITORY_LIMIT`.
    pub repository_limit: usize,

    /// Configure via `PAUL_SWEEP_CONCURRENCY`.
    pub max_concurrent_repos: usize,

    /// A sweep still running after this long is abandoned. Defaults to the
    /// interval, so sweeps never overlap.
    pub sweep_timeout: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SweepConfig {
    pub fn new() -> Self {
        let interval = Duration::from_secs(DEFAULT_INTERVAL_MINS * 60);
        SweepConfig {
            interval,
            installation_page_size: DEFAULT_INSTALLATION_PAGE_SIZE,
            repository_limit: DEFAULT_REPOSITORY_LIMIT,
            max_concurrent_repos: DEFAULT_MAX_CONCURRENT_REPOS,
            sweep_timeout: interval,
        }
    }

    /// Reads overrides from the environment. Unset or unparsable values
    /// fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parsed = |key: &str| lookup(key).and_then(|s| s.trim().parse::<u64>().ok());

        let interval_mins = parsed("PAUL_SWEEP_INTERVAL_MINS")
            .filter(|m| *m > 0)
            .unwrap_or(DEFAULT_INTERVAL_MINS);
        let interval = Duration::from_secs(interval_mins * 60);

        SweepConfig {
            interval,
            repository_limit: parsed("PAUL_SWEEP_REPOSITORY_LIMIT")
                .map(|n| n as usize)
                .unwrap_or(DEFAULT_REPOSITORY_LIMIT),
            max_concurrent_repos: parsed("PAUL_SWEEP_CONCURRENCY")
                .map(|n| (n as usize).max(1))
                .unwrap_or(DEFAULT_MAX_CONCURRENT_REPOS),
            sweep_timeout: interval,
            ..Self::new()
        }
    }
}
