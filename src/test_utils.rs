//! Shared test fixtures: in-memory GitHub fakes, payload builders and generators.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;
use tokio_util::sync::CancellationToken;

use crate::fun::{MediaError, MediaOps};
use crate::github::{
    AppOps, ChecksOps, ContentOps, GitHubApiError, GitOps, InstallationOps, IssueOps,
    PullRequestOps,
};
use crate::types::{
    CheckConclusion, CheckRunData, CheckRunId, CheckRunOutput, CommitData, InstallationId,
    MergeMethod, PrNumber, PrState, PullRequestData, RepoId, RepositoryRef, ReviewEvent, Sha,
};

// ─── Repository fake ──────────────────────────────────────────────────────────

#[derive(Default)]
struct FakeState {
    calls: Vec<String>,
    failing: HashSet<&'static str>,
    files: HashMap<String, String>,
    pulls: BTreeMap<PrNumber, PullRequestData>,
    commits: HashMap<PrNumber, Vec<CommitData>>,
    check_runs: Vec<CheckRunData>,
    next_check_run_id: u64,
    comments: Vec<(PrNumber, String)>,
    reviews: Vec<(PrNumber, ReviewEvent, Option<String>)>,
    labels_added: Vec<(PrNumber, Vec<String>)>,
    labels_removed: Vec<(PrNumber, String)>,
    closed: Vec<PrNumber>,
    merged: Vec<(PrNumber, MergeMethod)>,
    reviewers_requested: Vec<(PrNumber, Vec<String>)>,
    deleted_branches: Vec<String>,
    completed_check_runs: Vec<(CheckRunId, CheckConclusion, CheckRunOutput)>,
}

/// An in-memory repository that records every call made against it.
///
/// Clones share state, so a test can keep a handle while handing one to the
/// code under test.
#[derive(Clone, Default)]
pub struct FakeGitHub {
    state: Arc<Mutex<FakeState>>,
}

fn fake_error(op: &str) -> GitHubApiError {
    let mut err = GitHubApiError::permanent_without_source(format!("{op} failed"));
    err.status_code = Some(500);
    err
}

impl FakeGitHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Records a call and fails it if `op` was marked failing.
    fn record(&self, op: &'static str, call: String) -> Result<(), GitHubApiError> {
        let mut state = self.lock();
        state.calls.push(call);
        if state.failing.contains(op) {
            return Err(fake_error(op));
        }
        Ok(())
    }

    /// Makes every subsequent call to `op` (a trait method name) fail.
    pub fn fail(&self, op: &'static str) {
        self.lock().failing.insert(op);
    }

    pub fn fail_contents(&self) {
        self.fail("get_file");
    }

    pub fn put_file(&self, path: &str, content: &str) {
        self.lock()
            .files
            .insert(path.to_string(), content.to_string());
    }

    pub fn add_pull(&self, pr: PullRequestData) {
        self.lock().pulls.insert(pr.number, pr);
    }

    pub fn set_commits(&self, number: PrNumber, commits: Vec<CommitData>) {
        self.lock().commits.insert(number, commits);
    }

    pub fn add_check_run(&self, sha: &Sha, name: &str) -> CheckRunId {
        let mut state = self.lock();
        state.next_check_run_id += 1;
        let id = CheckRunId(state.next_check_run_id);
        state.check_runs.push(CheckRunData {
            id,
            name: name.to_string(),
            head_sha: sha.clone(),
        });
        id
    }

    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Calls that change something on GitHub (everything except reads).
    pub fn writes(&self) -> Vec<String> {
        const READS: [&str; 5] = [
            "get_file",
            "get_pull_request",
            "list_open_pull_requests",
            "list_commits",
            "list_check_runs",
        ];
        self.calls()
            .into_iter()
            .filter(|c| !READS.iter().any(|r| c.starts_with(r)))
            .collect()
    }

    pub fn comments(&self) -> Vec<(PrNumber, String)> {
        self.lock().comments.clone()
    }

    pub fn reviews(&self) -> Vec<(PrNumber, ReviewEvent, Option<String>)> {
        self.lock().reviews.clone()
    }

    pub fn labels_added(&self) -> Vec<(PrNumber, Vec<String>)> {
        self.lock().labels_added.clone()
    }

    pub fn labels_removed(&self) -> Vec<(PrNumber, String)> {
        self.lock().labels_removed.clone()
    }

    pub fn closed(&self) -> Vec<PrNumber> {
        self.lock().closed.clone()
    }

    pub fn merged(&self) -> Vec<(PrNumber, MergeMethod)> {
        self.lock().merged.clone()
    }

    pub fn reviewers_requested(&self) -> Vec<(PrNumber, Vec<String>)> {
        self.lock().reviewers_requested.clone()
    }

    pub fn deleted_branches(&self) -> Vec<String> {
        self.lock().deleted_branches.clone()
    }

    pub fn check_runs(&self) -> Vec<CheckRunData> {
        self.lock().check_runs.clone()
    }

    pub fn completed_check_runs(&self) -> Vec<(CheckRunId, CheckConclusion, CheckRunOutput)> {
        self.lock().completed_check_runs.clone()
    }
}

impl IssueOps for FakeGitHub {
    async fn create_comment(&self, number: PrNumber, body: &str) -> Result<(), GitHubApiError> {
        self.record("create_comment", format!("create_comment {}", number))?;
        self.lock().comments.push((number, body.to_string()));
        Ok(())
    }

    async fn add_labels(&self, number: PrNumber, labels: &[String]) -> Result<(), GitHubApiError> {
        self.record(
            "add_labels",
            format!("add_labels {} {}", number, labels.join(",")),
        )?;
        let mut state = self.lock();
        if let Some(pr) = state.pulls.get_mut(&number) {
            pr.labels.extend(labels.iter().cloned());
        }
        state.labels_added.push((number, labels.to_vec()));
        Ok(())
    }

    async fn remove_label(&self, number: PrNumber, label: &str) -> Result<(), GitHubApiError> {
        self.record("remove_label", format!("remove_label {} {}", number, label))?;
        self.lock().labels_removed.push((number, label.to_string()));
        Ok(())
    }
}

impl PullRequestOps for FakeGitHub {
    async fn get_pull_request(&self, number: PrNumber) -> Result<PullRequestData, GitHubApiError> {
        self.record("get_pull_request", format!("get_pull_request {}", number))?;
        self.lock().pulls.get(&number).cloned().ok_or_else(|| {
            let mut err = GitHubApiError::permanent_without_source("Not Found");
            err.status_code = Some(404);
            err
        })
    }

    async fn list_open_pull_requests(&self) -> Result<Vec<PullRequestData>, GitHubApiError> {
        self.record("list_open_pull_requests", "list_open_pull_requests".into())?;
        Ok(self
            .lock()
            .pulls
            .values()
            .filter(|pr| pr.state.is_open())
            .map(|pr| PullRequestData {
                mergeable: None,
                ..pr.clone()
            })
            .collect())
    }

    async fn list_commits(&self, number: PrNumber) -> Result<Vec<CommitData>, GitHubApiError> {
        self.record("list_commits", format!("list_commits {}", number))?;
        Ok(self.lock().commits.get(&number).cloned().unwrap_or_default())
    }

    async fn create_review(
        &self,
        number: PrNumber,
        event: ReviewEvent,
        body: Option<&str>,
    ) -> Result<(), GitHubApiError> {
        self.record("create_review", format!("create_review {} {:?}", number, event))?;
        self.lock()
            .reviews
            .push((number, event, body.map(str::to_string)));
        Ok(())
    }

    async fn close_pull_request(&self, number: PrNumber) -> Result<(), GitHubApiError> {
        self.record("close_pull_request", format!("close_pull_request {}", number))?;
        let mut state = self.lock();
        if let Some(pr) = state.pulls.get_mut(&number) {
            pr.state = PrState::Closed;
        }
        state.closed.push(number);
        Ok(())
    }

    async fn merge_pull_request(
        &self,
        number: PrNumber,
        method: MergeMethod,
    ) -> Result<(), GitHubApiError> {
        self.record("merge_pull_request", format!("merge_pull_request {}", number))?;
        let mut state = self.lock();
        if let Some(pr) = state.pulls.get_mut(&number) {
            pr.state = PrState::Merged;
        }
        state.merged.push((number, method));
        Ok(())
    }

    async fn request_reviewers(
        &self,
        number: PrNumber,
        reviewers: &[String],
    ) -> Result<(), GitHubApiError> {
        self.record(
            "request_reviewers",
            format!("request_reviewers {} {}", number, reviewers.join(",")),
        )?;
        self.lock()
            .reviewers_requested
            .push((number, reviewers.to_vec()));
        Ok(())
    }
}

impl GitOps for FakeGitHub {
    async fn delete_branch(&self, branch: &str) -> Result<(), GitHubApiError> {
        self.record("delete_branch", format!("delete_branch {}", branch))?;
        self.lock().deleted_branches.push(branch.to_string());
        Ok(())
    }
}

impl ContentOps for FakeGitHub {
    async fn get_file(
        &self,
        path: &str,
        git_ref: &str,
    ) -> Result<Option<Vec<u8>>, GitHubApiError> {
        self.record("get_file", format!("get_file {}@{}", path, git_ref))?;
        Ok(self.lock().files.get(path).map(|c| c.clone().into_bytes()))
    }
}

impl ChecksOps for FakeGitHub {
    async fn list_check_runs(
        &self,
        sha: &Sha,
        name: &str,
    ) -> Result<Vec<CheckRunData>, GitHubApiError> {
        self.record(
            "list_check_runs",
            format!("list_check_runs {} {}", sha.short(), name),
        )?;
        Ok(self
            .lock()
            .check_runs
            .iter()
            .filter(|run| &run.head_sha == sha && run.name == name)
            .cloned()
            .collect())
    }

    async fn create_check_run(
        &self,
        sha: &Sha,
        name: &str,
        _output: &CheckRunOutput,
    ) -> Result<CheckRunId, GitHubApiError> {
        self.record("create_check_run", format!("create_check_run {}", name))?;
        Ok(self.add_check_run(sha, name))
    }

    async fn complete_check_run(
        &self,
        id: CheckRunId,
        conclusion: CheckConclusion,
        output: &CheckRunOutput,
    ) -> Result<(), GitHubApiError> {
        self.record(
            "complete_check_run",
            format!("complete_check_run {} {}", id, conclusion.as_str()),
        )?;
        self.lock()
            .completed_check_runs
            .push((id, conclusion, output.clone()));
        Ok(())
    }
}

// ─── App / installation fakes ─────────────────────────────────────────────────

#[derive(Default)]
struct FakeAppState {
    installations: Vec<InstallationId>,
    repositories: HashMap<InstallationId, Vec<RepositoryRef>>,
    clients: HashMap<RepoId, FakeGitHub>,
    failing_listings: HashSet<InstallationId>,
    fail_installation_listing: bool,
    requested_limits: Vec<usize>,
}

/// A fake app whose installations hand out shared [`FakeGitHub`] repositories.
#[derive(Clone, Default)]
pub struct FakeApp {
    state: Arc<Mutex<FakeAppState>>,
}

impl FakeApp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `repo` under installation `id` and returns its fake client.
    pub fn add_repository(&self, id: InstallationId, repo: RepoId) -> FakeGitHub {
        let mut state = self.state.lock().unwrap();
        if !state.installations.contains(&id) {
            state.installations.push(id);
        }
        state.repositories.entry(id).or_default().push(RepositoryRef {
            repo: repo.clone(),
            default_branch: "main".to_string(),
        });
        state.clients.entry(repo).or_default().clone()
    }

    pub fn fail_repository_listing(&self, id: InstallationId) {
        self.state.lock().unwrap().failing_listings.insert(id);
    }

    pub fn fail_installation_listing(&self) {
        self.state.lock().unwrap().fail_installation_listing = true;
    }

    pub fn requested_limits(&self) -> Vec<usize> {
        self.state.lock().unwrap().requested_limits.clone()
    }
}

#[derive(Clone)]
pub struct FakeInstallation {
    id: InstallationId,
    app: FakeApp,
}

impl AppOps for FakeApp {
    type Installation = FakeInstallation;

    async fn list_installations(
        &self,
        _page_size: u8,
    ) -> Result<Vec<InstallationId>, GitHubApiError> {
        let state = self.state.lock().unwrap();
        if state.fail_installation_listing {
            return Err(fake_error("list_installations"));
        }
        Ok(state.installations.clone())
    }

    fn installation(
        &self,
        id: InstallationId,
        _cancel: CancellationToken,
    ) -> Result<FakeInstallation, GitHubApiError> {
        Ok(FakeInstallation {
            id,
            app: self.clone(),
        })
    }
}

impl InstallationOps for FakeInstallation {
    type Client = FakeGitHub;

    async fn list_repositories(&self, limit: usize) -> Result<Vec<RepositoryRef>, GitHubApiError> {
        let mut state = self.app.state.lock().unwrap();
        state.requested_limits.push(limit);
        if state.failing_listings.contains(&self.id) {
            return Err(fake_error("list_repositories"));
        }
        let mut repos = state.repositories.get(&self.id).cloned().unwrap_or_default();
        repos.truncate(limit);
        Ok(repos)
    }

    fn repo_client(&self, repo: &RepoId) -> FakeGitHub {
        let mut state = self.app.state.lock().unwrap();
        state.clients.entry(repo.clone()).or_default().clone()
    }
}

// ─── Media fake ───────────────────────────────────────────────────────────────

/// Returns fixed URLs, or fails every lookup when built with [`FakeMedia::failing`].
#[derive(Clone, Default)]
pub struct FakeMedia {
    fail: bool,
    queries: Arc<Mutex<Vec<String>>>,
}

impl FakeMedia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn gif_queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl MediaOps for FakeMedia {
    async fn random_cat(&self) -> Result<String, MediaError> {
        if self.fail {
            return Err(MediaError::Empty("cat"));
        }
        Ok("https://cdn2.thecatapi.com/images/cat.jpg".to_string())
    }

    async fn random_dog(&self) -> Result<String, MediaError> {
        if self.fail {
            return Err(MediaError::Empty("dog"));
        }
        Ok("https://cdn2.thedogapi.com/images/dog.jpg".to_string())
    }

    async fn random_gif(&self, query: &str) -> Result<String, MediaError> {
        self.queries.lock().unwrap().push(query.to_string());
        if self.fail {
            return Err(MediaError::Empty("gif"));
        }
        Ok("https://media.giphy.com/media/abc/giphy.gif".to_string())
    }
}

// ─── Builders ─────────────────────────────────────────────────────────────────

pub fn sha(seed: char) -> Sha {
    Sha::new(seed.to_string().repeat(40))
}

/// An open PR by `author` from `feature-<n>` into `main`, updated at `now`.
pub fn pull(number: u64, author: &str) -> PullRequestData {
    PullRequestData {
        number: PrNumber(number),
        author: author.to_string(),
        body: "Adds a thing".to_string(),
        head_ref: format!("feature-{}", number),
        head_sha: sha('a'),
        base_ref: "main".to_string(),
        state: PrState::Open,
        labels: Vec::new(),
        updated_at: Utc::now(),
        mergeable: None,
    }
}

pub fn pull_updated_days_ago(number: u64, days: i64, now: DateTime<Utc>) -> PullRequestData {
    PullRequestData {
        updated_at: now - Duration::days(days),
        ..pull(number, "octocat")
    }
}

pub fn commit(message: &str, verified: bool) -> CommitData {
    CommitData {
        sha: sha('c'),
        message: message.to_string(),
        verified,
    }
}

pub fn signed_commit(email: &str) -> CommitData {
    commit(
        &format!("Fix the thing\n\nSigned-off-by: Some One <{}>", email),
        true,
    )
}

/// A `pull_request` webhook payload.
pub fn pull_request_payload(
    action: &str,
    pr: &PullRequestData,
    sender: &str,
    merged: bool,
) -> serde_json::Value {
    serde_json::json!({
        "action": action,
        "number": pr.number.0,
        "pull_request": {
            "number": pr.number.0,
            "state": if pr.state.is_open() { "open" } else { "closed" },
            "merged": merged,
            "body": if pr.body.is_empty() { serde_json::Value::Null } else { serde_json::Value::from(pr.body.clone()) },
            "user": { "login": pr.author },
            "head": {
                "ref": pr.head_ref,
                "sha": pr.head_sha.as_str(),
                "repo": { "name": "hello-world", "owner": { "login": "octocat" } }
            },
            "base": { "ref": pr.base_ref, "sha": "0000000000000000000000000000000000000000" },
            "labels": pr.labels.iter().map(|l| serde_json::json!({ "name": l })).collect::<Vec<_>>(),
            "updated_at": pr.updated_at.to_rfc3339()
        },
        "repository": {
            "name": "hello-world",
            "owner": { "login": "octocat" },
            "default_branch": "main"
        },
        "sender": { "login": sender },
        "installation": { "id": 99 }
    })
}

/// An `issue_comment` webhook payload; `on_pull_request` adds `issue.pull_request`.
pub fn issue_comment_payload(
    action: &str,
    number: u64,
    body: &str,
    author: &str,
    on_pull_request: bool,
) -> serde_json::Value {
    let mut issue = serde_json::json!({ "number": number });
    if on_pull_request {
        issue["pull_request"] = serde_json::json!({ "url": "https://api.github.com/..." });
    }
    serde_json::json!({
        "action": action,
        "issue": issue,
        "comment": {
            "id": 1,
            "body": body,
            "user": { "login": author }
        },
        "repository": {
            "name": "hello-world",
            "owner": { "login": "octocat" },
            "default_branch": "main"
        },
        "sender": { "login": author },
        "installation": { "id": 99 }
    })
}

// ─── Generators ───────────────────────────────────────────────────────────────

pub fn arb_login() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,20}".prop_map(String::from)
}

pub fn arb_branch_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9/-]{0,30}".prop_map(String::from)
}
