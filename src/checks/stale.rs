//! Finds pull requests that have gone quiet.

use chrono::{DateTime, Utc};

use crate::types::PullRequestData;

/// Whole days between `updated_at` and `now`, rounded down.
pub fn days_since_update(pr: &PullRequestData, now: DateTime<Utc>) -> i64 {
    (now - pr.updated_at).num_days()
}

/// Returns the PRs not updated for strictly more than `stale_time_days` whole
/// days. A threshold of zero disables the check and returns nothing.
pub fn check_time_stamps<'a>(
    stale_time_days: u32,
    prs: &'a [PullRequestData],
    now: DateTime<Utc>,
) -> Vec<&'a PullRequestData> {
    if stale_time_days == 0 {
        return Vec::new();
    }
    prs.iter()
        .filter(|pr| days_since_update(pr, now) > i64::from(stale_time_days))
        .collect()
}
