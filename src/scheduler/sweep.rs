//! One pass of the scheduled sweep.
//!
//! Every installation is listed, and every repository (up to the configured
//! limit) gets its policy resolved once. Repositories that enable the stale
//! check or automated merge have their open PRs listed once, and that
//! snapshot feeds both passes:
//!
//! - **stale**: label PRs idle for longer than `stale_time` days
//! - **merge**: merge `merge`-labelled PRs that GitHub reports mergeable
//!
//! Repositories are swept concurrently, bounded by a semaphore. A failing
//! repository or PR is logged and counted, and never stops the rest.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, info_span, warn};

use crate::checks::merge::{MergeOutcome, merge_candidates, merge_if_mergeable};
use crate::checks::stale::check_time_stamps;
use crate::config::{PolicyConfig, resolve_or_default};
use crate::github::{AppOps, GitHubApiError, GitHubOps, InstallationOps};
use crate::messages::STALE_LABEL;
use crate::types::{PullRequestData, RepositoryRef};

use super::SweepConfig;

/// A repository's policy and open PRs, fetched once per sweep.
#[derive(Debug, Clone)]
pub struct ScheduledJobInformation {
    pub config: PolicyConfig,
    pub repository: RepositoryRef,
    pub open_pull_requests: Vec<PullRequestData>,
}

/// Totals for one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub repositories_scanned: usize,
    pub failures: usize,
    pub labelled_stale: usize,
    pub merged: usize,
}

/// Totals for one repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct RepoSweep {
    failures: usize,
    labelled_stale: usize,
    merged: usize,
}

impl SweepReport {
    fn record(&mut self, repo: RepoSweep) {
        self.repositories_scanned += 1;
        self.failures += repo.failures;
        self.labelled_stale += repo.labelled_stale;
        self.merged += repo.merged;
    }
}

/// Runs one sweep across every installation of the app.
pub async fn run_sweep<A>(app: &A, config: &SweepConfig, cancel: &CancellationToken) -> SweepReport
where
    A: AppOps,
    <A::Installation as InstallationOps>::Client: 'static,
{
    run_sweep_at(app, config, cancel, Utc::now()).await
}

/// [`run_sweep`] with a fixed notion of "now" for the stale pass.
pub async fn run_sweep_at<A>(
    app: &A,
    config: &SweepConfig,
    cancel: &CancellationToken,
    now: DateTime<Utc>,
) -> SweepReport
where
    A: AppOps,
    <A::Installation as InstallationOps>::Client: 'static,
{
    let mut report = SweepReport::default();

    let installations = match app.list_installations(config.installation_page_size).await {
        Ok(ids) => ids,
        Err(e) => {
            error!(error = %e, "Could not list installations, skipping sweep");
            report.failures += 1;
            return report;
        }
    };

    let permits = Arc::new(Semaphore::new(config.max_concurrent_repos.max(1)));
    let mut tasks = JoinSet::new();

    for id in installations {
        if cancel.is_cancelled() {
            break;
        }

        let installation = match app.installation(id, cancel.child_token()) {
            Ok(installation) => installation,
            Err(e) => {
                warn!(installation = %id, error = %e, "Could not authenticate installation");
                report.failures += 1;
                continue;
            }
        };

        let repositories = match installation.list_repositories(config.repository_limit).await {
            Ok(repos) => repos,
            Err(e) => {
                warn!(installation = %id, error = %e, "Could not list repositories");
                report.failures += 1;
                continue;
            }
        };

        for repository in repositories {
            let client = installation.repo_client(&repository.repo);
            let permits = Arc::clone(&permits);
            let span = info_span!("sweep_repository", repo = %repository.repo);
            tasks.spawn(
                async move {
                    let _permit = permits.acquire_owned().await.ok();
                    sweep_repository(&client, repository, now).await
                }
                .instrument(span),
            );
        }
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(repo) => report.record(repo),
            Err(e) => {
                error!(error = %e, "Sweep task failed");
                report.record(RepoSweep {
                    failures: 1,
                    ..RepoSweep::default()
                });
            }
        }
    }

    report
}

async fn sweep_repository<C: GitHubOps>(
    client: &C,
    repository: RepositoryRef,
    now: DateTime<Utc>,
) -> RepoSweep {
    match load_job(client, repository).await {
        Ok(Some(job)) => {
            let mut outcome = stale_pass(client, &job, now).await;
            let merged = merge_pass(client, &job).await;
            outcome.merged = merged.merged;
            outcome.failures += merged.failures;
            outcome
        }
        Ok(None) => RepoSweep::default(),
        Err(e) => {
            warn!(error = %e, "Could not list open pull requests");
            RepoSweep {
                failures: 1,
                ..RepoSweep::default()
            }
        }
    }
}

/// Resolves the policy and, if the sweep has work here, lists open PRs.
async fn load_job<C: GitHubOps>(
    client: &C,
    repository: RepositoryRef,
) -> Result<Option<ScheduledJobInformation>, GitHubApiError> {
    let config = resolve_or_default(client, &repository.repo, &repository.default_branch).await;
    if !config.wants_sweep() {
        debug!("Nothing scheduled for repository");
        return Ok(None);
    }

    let open_pull_requests = client.list_open_pull_requests().await?;
    Ok(Some(ScheduledJobInformation {
        config,
        repository,
        open_pull_requests,
    }))
}

async fn stale_pass<C: GitHubOps>(
    client: &C,
    job: &ScheduledJobInformation,
    now: DateTime<Utc>,
) -> RepoSweep {
    let mut outcome = RepoSweep::default();
    let days = job.config.pull_requests.stale_time_days;

    for pr in check_time_stamps(days, &job.open_pull_requests, now) {
        if pr.has_label(STALE_LABEL) {
            continue;
        }
        match client.add_labels(pr.number, &[STALE_LABEL.to_string()]).await {
            Ok(()) => {
                debug!(pr = %pr.number, "Labelled stale");
                outcome.labelled_stale += 1;
            }
            Err(e) => {
                warn!(pr = %pr.number, error = %e, "Could not label stale pull request");
                outcome.failures += 1;
            }
        }
    }
    outcome
}

async fn merge_pass<C: GitHubOps>(client: &C, job: &ScheduledJobInformation) -> RepoSweep {
    let mut outcome = RepoSweep::default();
    if !job.config.pull_requests.automated_merge {
        return outcome;
    }

    for pr in merge_candidates(&job.open_pull_requests) {
        match merge_if_mergeable(client, pr.number).await {
            Ok(MergeOutcome::Merged) => outcome.merged += 1,
            Ok(MergeOutcome::NotMergeable) => {}
            Err(e) => {
                warn!(pr = %pr.number, error = %e, "Automated merge failed");
                outcome.failures += 1;
            }
        }
    }
    outcome
}
