//! REST implementations of the capability traits for [`GitHubClient`].
//!
//! Calls go through octocrab's generic `get`/`post`/`put`/`patch` helpers with
//! local response structs that carry only the fields the bot reads. The typed
//! octocrab models are used where they save work (repository contents).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::types::{
    CheckConclusion, CheckRunData, CheckRunId, CheckRunOutput, CommitData, MergeMethod, PrNumber,
    PrState, PullRequestData, ReviewEvent, Sha,
};

use super::client::GitHubClient;
use super::error::GitHubApiError;
use super::ops::{ChecksOps, ContentOps, GitOps, IssueOps, PullRequestOps};

/// Page size for list endpoints. A page shorter than this is the last one.
const PAGE_SIZE: u32 = 100;

// ─── Response shapes ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawPull {
    number: u64,
    user: RawUser,
    body: Option<String>,
    head: RawRef,
    base: RawRef,
    state: String,
    merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    labels: Vec<RawLabel>,
    updated_at: DateTime<Utc>,
    mergeable: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct RawRef {
    #[serde(rename = "ref")]
    ref_name: String,
    sha: String,
}

#[derive(Debug, Deserialize)]
struct RawLabel {
    name: String,
}

impl From<RawPull> for PullRequestData {
    fn from(raw: RawPull) -> Self {
        let state = match (raw.state.as_str(), raw.merged_at) {
            (_, Some(_)) => PrState::Merged,
            ("open", None) => PrState::Open,
            _ => PrState::Closed,
        };
        PullRequestData {
            number: PrNumber(raw.number),
            author: raw.user.login,
            body: raw.body.unwrap_or_default(),
            head_ref: raw.head.ref_name,
            head_sha: Sha::new(raw.head.sha),
            base_ref: raw.base.ref_name,
            state,
            labels: raw.labels.into_iter().map(|l| l.name).collect(),
            updated_at: raw.updated_at,
            mergeable: raw.mergeable,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawCommitEntry {
    sha: String,
    commit: RawCommit,
}

#[derive(Debug, Deserialize)]
struct RawCommit {
    message: String,
    verification: Option<RawVerification>,
}

#[derive(Debug, Deserialize)]
struct RawVerification {
    verified: bool,
}

#[derive(Debug, Deserialize)]
struct RawCheckRunList {
    check_runs: Vec<RawCheckRun>,
}

#[derive(Debug, Deserialize)]
struct RawCheckRun {
    id: u64,
    name: String,
    head_sha: String,
}

#[derive(Debug, Deserialize)]
struct MergeResponse {
    merged: bool,
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct PageQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'a str>,
    per_page: u32,
    page: u32,
}

#[derive(Debug, Serialize)]
struct CheckRunOutputBody<'a> {
    title: &'a str,
    summary: &'a str,
    text: &'a str,
}

impl<'a> From<&'a CheckRunOutput> for CheckRunOutputBody<'a> {
    fn from(output: &'a CheckRunOutput) -> Self {
        CheckRunOutputBody {
            title: &output.title,
            summary: &output.summary,
            text: &output.text,
        }
    }
}

// ─── Issues ───────────────────────────────────────────────────────────────────

impl IssueOps for GitHubClient {
    async fn create_comment(&self, number: PrNumber, body: &str) -> Result<(), GitHubApiError> {
        let url = self.repo_url(&format!("/issues/{}/comments", number.0));
        let request = serde_json::json!({ "body": body });
        let _: serde_json::Value = self.guard(self.inner().post(&url, Some(&request))).await?;
        debug!(repo = %self.repo(), pr = %number, "Posted comment");
        Ok(())
    }

    async fn add_labels(&self, number: PrNumber, labels: &[String]) -> Result<(), GitHubApiError> {
        let url = self.repo_url(&format!("/issues/{}/labels", number.0));
        let request = serde_json::json!({ "labels": labels });
        let _: serde_json::Value = self.guard(self.inner().post(&url, Some(&request))).await?;
        debug!(repo = %self.repo(), pr = %number, ?labels, "Added labels");
        Ok(())
    }

    async fn remove_label(&self, number: PrNumber, label: &str) -> Result<(), GitHubApiError> {
        let url = self.repo_url(&format!(
            "/issues/{}/labels/{}",
            number.0,
            urlencoding::encode(label)
        ));
        let _: serde_json::Value = self
            .guard(self.inner().delete(&url, None::<&()>))
            .await?;
        debug!(repo = %self.repo(), pr = %number, label, "Removed label");
        Ok(())
    }
}

// ─── Pull requests ────────────────────────────────────────────────────────────

impl PullRequestOps for GitHubClient {
    async fn get_pull_request(&self, number: PrNumber) -> Result<PullRequestData, GitHubApiError> {
        let url = self.repo_url(&format!("/pulls/{}", number.0));
        let raw: RawPull = self.guard(self.inner().get(&url, None::<&()>)).await?;
        Ok(raw.into())
    }

    async fn list_open_pull_requests(&self) -> Result<Vec<PullRequestData>, GitHubApiError> {
        let url = self.repo_url("/pulls");
        let mut pulls = Vec::new();
        let mut page = 1;
        loop {
            let query = PageQuery {
                state: Some("open"),
                per_page: PAGE_SIZE,
                page,
            };
            let batch: Vec<RawPull> = self.guard(self.inner().get(&url, Some(&query))).await?;
            let last = batch.len() < PAGE_SIZE as usize;
            pulls.extend(batch.into_iter().map(PullRequestData::from));
            if last {
                break;
            }
            page += 1;
        }
        trace!(repo = %self.repo(), count = pulls.len(), "Listed open pull requests");
        Ok(pulls)
    }

    async fn list_commits(&self, number: PrNumber) -> Result<Vec<CommitData>, GitHubApiError> {
        let url = self.repo_url(&format!("/pulls/{}/commits", number.0));
        let mut commits = Vec::new();
        let mut page = 1;
        loop {
            let query = PageQuery {
                state: None,
                per_page: PAGE_SIZE,
                page,
            };
            let batch: Vec<RawCommitEntry> =
                self.guard(self.inner().get(&url, Some(&query))).await?;
            let last = batch.len() < PAGE_SIZE as usize;
            commits.extend(batch.into_iter().map(|entry| CommitData {
                sha: Sha::new(entry.sha),
                message: entry.commit.message,
                verified: entry.commit.verification.is_some_and(|v| v.verified),
            }));
            if last {
                break;
            }
            page += 1;
        }
        Ok(commits)
    }

    async fn create_review(
        &self,
        number: PrNumber,
        event: ReviewEvent,
        body: Option<&str>,
    ) -> Result<(), GitHubApiError> {
        let url = self.repo_url(&format!("/pulls/{}/reviews", number.0));
        let mut request = serde_json::json!({ "event": event });
        if let Some(body) = body {
            request["body"] = serde_json::Value::from(body);
        }
        let _: serde_json::Value = self.guard(self.inner().post(&url, Some(&request))).await?;
        debug!(repo = %self.repo(), pr = %number, ?event, "Submitted review");
        Ok(())
    }

    async fn close_pull_request(&self, number: PrNumber) -> Result<(), GitHubApiError> {
        let url = self.repo_url(&format!("/pulls/{}", number.0));
        let request = serde_json::json!({ "state": "closed" });
        let _: serde_json::Value = self.guard(self.inner().patch(&url, Some(&request))).await?;
        debug!(repo = %self.repo(), pr = %number, "Closed pull request");
        Ok(())
    }

    async fn merge_pull_request(
        &self,
        number: PrNumber,
        method: MergeMethod,
    ) -> Result<(), GitHubApiError> {
        let url = self.repo_url(&format!("/pulls/{}/merge", number.0));
        let request = serde_json::json!({ "merge_method": method });
        let response: MergeResponse = self.guard(self.inner().put(&url, Some(&request))).await?;
        if !response.merged {
            return Err(GitHubApiError::permanent_without_source(format!(
                "merge of PR {} was not performed: {}",
                number,
                response.message.unwrap_or_default()
            )));
        }
        debug!(repo = %self.repo(), pr = %number, ?method, "Merged pull request");
        Ok(())
    }

    async fn request_reviewers(
        &self,
        number: PrNumber,
        reviewers: &[String],
    ) -> Result<(), GitHubApiError> {
        let url = self.repo_url(&format!("/pulls/{}/requested_reviewers", number.0));
        let request = serde_json::json!({ "reviewers": reviewers });
        let _: serde_json::Value = self.guard(self.inner().post(&url, Some(&request))).await?;
        debug!(repo = %self.repo(), pr = %number, ?reviewers, "Requested reviewers");
        Ok(())
    }
}

// ─── Git data ─────────────────────────────────────────────────────────────────

impl GitOps for GitHubClient {
    async fn delete_branch(&self, branch: &str) -> Result<(), GitHubApiError> {
        let url = self.repo_url(&format!("/git/refs/heads/{}", branch));
        // 204 No Content: read the raw response rather than deserializing a body.
        let response = self
            .guard(self.inner()._delete(url.as_str(), None::<&()>))
            .await?;
        self.guard(octocrab::map_github_error(response)).await?;
        debug!(repo = %self.repo(), branch, "Deleted branch");
        Ok(())
    }
}

// ─── Contents ─────────────────────────────────────────────────────────────────

impl ContentOps for GitHubClient {
    async fn get_file(
        &self,
        path: &str,
        git_ref: &str,
    ) -> Result<Option<Vec<u8>>, GitHubApiError> {
        let result = self
            .guard(
                self.inner()
                    .repos(self.owner(), self.repo_name())
                    .get_content()
                    .path(path)
                    .r#ref(git_ref)
                    .send(),
            )
            .await;

        let contents = match result {
            Ok(contents) => contents,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };

        let Some(decoded) = contents
            .items
            .into_iter()
            .next()
            .and_then(|c| c.decoded_content())
        else {
            return Ok(None);
        };
        Ok(Some(decoded.into_bytes()))
    }
}

// ─── Checks ───────────────────────────────────────────────────────────────────

impl ChecksOps for GitHubClient {
    async fn list_check_runs(
        &self,
        sha: &Sha,
        name: &str,
    ) -> Result<Vec<CheckRunData>, GitHubApiError> {
        let url = self.repo_url(&format!("/commits/{}/check-runs", sha));
        let query = serde_json::json!({ "check_name": name });
        let list: RawCheckRunList = self.guard(self.inner().get(&url, Some(&query))).await?;
        Ok(list
            .check_runs
            .into_iter()
            .map(|run| CheckRunData {
                id: CheckRunId(run.id),
                name: run.name,
                head_sha: Sha::new(run.head_sha),
            })
            .collect())
    }

    async fn create_check_run(
        &self,
        sha: &Sha,
        name: &str,
        output: &CheckRunOutput,
    ) -> Result<CheckRunId, GitHubApiError> {
        let url = self.repo_url("/check-runs");
        let request = serde_json::json!({
            "name": name,
            "head_sha": sha,
            "status": "in_progress",
            "output": CheckRunOutputBody::from(output),
        });
        let run: RawCheckRun = self.guard(self.inner().post(&url, Some(&request))).await?;
        debug!(repo = %self.repo(), sha = %sha.short(), name, id = run.id, "Created check run");
        Ok(CheckRunId(run.id))
    }

    async fn complete_check_run(
        &self,
        id: CheckRunId,
        conclusion: CheckConclusion,
        output: &CheckRunOutput,
    ) -> Result<(), GitHubApiError> {
        let url = self.repo_url(&format!("/check-runs/{}", id));
        let request = serde_json::json!({
            "status": "completed",
            "conclusion": conclusion.as_str(),
            "output": CheckRunOutputBody::from(output),
        });
        let _: serde_json::Value = self.guard(self.inner().patch(&url, Some(&request))).await?;
        debug!(repo = %self.repo(), %id, conclusion = conclusion.as_str(), "Completed check run");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pull_json(state: &str, merged_at: Option<&str>) -> serde_json::Value {
        serde_json::json!({
            "number": 12,
            "user": { "login": "octocat" },
            "body": null,
            "head": { "ref": "feature", "sha": "abc1234def" },
            "base": { "ref": "main", "sha": "000" },
            "state": state,
            "merged_at": merged_at,
            "labels": [{ "name": "merge" }],
            "updated_at": "2024-01-01T00:00:00Z",
            "mergeable": true
        })
    }

    #[test]
    fn raw_pull_maps_to_snapshot() {
        let raw: RawPull = serde_json::from_value(pull_json("open", None)).unwrap();
        let pr = PullRequestData::from(raw);

        assert_eq!(pr.number, PrNumber(12));
        assert_eq!(pr.author, "octocat");
        assert_eq!(pr.body, "");
        assert_eq!(pr.head_ref, "feature");
        assert_eq!(pr.base_ref, "main");
        assert_eq!(pr.state, PrState::Open);
        assert_eq!(pr.labels, vec!["merge".to_string()]);
        assert_eq!(pr.mergeable, Some(true));
    }

    #[test]
    fn merged_at_wins_over_state() {
        let raw: RawPull =
            serde_json::from_value(pull_json("closed", Some("2024-01-02T00:00:00Z"))).unwrap();
        assert_eq!(PullRequestData::from(raw).state, PrState::Merged);

        let raw: RawPull = serde_json::from_value(pull_json("closed", None)).unwrap();
        assert_eq!(PullRequestData::from(raw).state, PrState::Closed);
    }

    #[test]
    fn commit_without_verification_is_unverified() {
        let raw: RawCommitEntry = serde_json::from_value(serde_json::json!({
            "sha": "abc",
            "commit": { "message": "fix" }
        }))
        .unwrap();
        assert!(raw.commit.verification.is_none());
    }

    #[test]
    fn page_query_omits_missing_state() {
        let query = PageQuery {
            state: None,
            per_page: 100,
            page: 2,
        };
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            serde_json::json!({ "per_page": 100, "page": 2 })
        );
    }
}
