//! Routes a verified webhook delivery to its handler.
//!
//! # Flow
//!
//! 1. Check the signature over the raw body; nothing else happens if it fails
//! 2. Parse the body according to the `X-GitHub-Event` type
//! 3. Acknowledge event types (and comment actions) with nothing to do
//! 4. Obtain a client for the delivery's installation and repository
//! 5. Resolve the repository's policy (missing or broken ⇒ no-op policy)
//! 6. Run the handler
//!
//! Every error is returned to the HTTP layer, which maps it to a status code.

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::commands::{CommandKind, parse_command};
use crate::config::resolve_or_default;
use crate::fun::MediaOps;
use crate::github::{AppOps, GitHubApiError, InstallationOps};
use crate::types::{InstallationId, RepoId};

use super::events::{CommentAction, GitHubEvent};
use super::handlers::{HandlerError, PipelineReport, handle_issue_comment, handle_pull_request};
use super::parser::{ParseError, parse_webhook};
use super::signature::verify_delivery;

/// The parts of an HTTP delivery the router needs.
#[derive(Debug, Clone, Copy)]
pub struct Delivery<'a> {
    /// `X-GitHub-Event`.
    pub event_type: &'a str,

    /// `X-Hub-Signature-256`, if sent.
    pub signature_sha256: Option<&'a str>,

    /// `X-Hub-Signature`, if sent.
    pub signature_sha1: Option<&'a str>,

    pub body: &'a [u8],
}

/// What the router did with a delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Valid, but nothing to do.
    Ignored,
    PullRequest(PipelineReport),

    /// The command that ran, if any.
    IssueComment(Option<CommandKind>),
}

/// Errors from routing a delivery.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid or missing webhook signature")]
    InvalidSignature,

    #[error("unparsable payload: {0}")]
    Parse(#[from] ParseError),

    #[error("{repo}: delivery carries no installation id")]
    MissingInstallation { repo: RepoId },

    #[error("could not authenticate installation {id}: {source}")]
    Installation {
        id: InstallationId,
        #[source]
        source: GitHubApiError,
    },

    #[error(transparent)]
    Handler(#[from] HandlerError),
}

/// Verifies, parses and handles one webhook delivery.
///
/// Every GitHub call made on its behalf is aborted when `cancel` fires.
pub async fn route<A: AppOps, M: MediaOps>(
    app: &A,
    media: &M,
    secret: &[u8],
    delivery: Delivery<'_>,
    cancel: CancellationToken,
) -> Result<RouteOutcome, RouteError> {
    if !verify_delivery(
        delivery.body,
        delivery.signature_sha256,
        delivery.signature_sha1,
        secret,
    ) {
        return Err(RouteError::InvalidSignature);
    }

    let event = parse_webhook(delivery.event_type, delivery.body)?;

    let (repo, default_branch) = match &event {
        GitHubEvent::Other(name) => {
            debug!(event_type = %name, "Ignoring unhandled event type");
            return Ok(RouteOutcome::Ignored);
        }
        GitHubEvent::IssueComment(comment)
            if comment.action != CommentAction::Created
                || parse_command(&comment.body).is_empty() =>
        {
            return Ok(RouteOutcome::Ignored);
        }
        GitHubEvent::IssueComment(comment) => (&comment.repo, &comment.default_branch),
        GitHubEvent::PullRequest(pr) => (&pr.repo, &pr.default_branch),
    };

    let id = event
        .installation()
        .ok_or_else(|| RouteError::MissingInstallation { repo: repo.clone() })?;
    let installation = app
        .installation(id, cancel)
        .map_err(|source| RouteError::Installation { id, source })?;
    let client = installation.repo_client(repo);

    let config = resolve_or_default(&client, repo, default_branch).await;

    let outcome = match &event {
        GitHubEvent::PullRequest(pr) => {
            RouteOutcome::PullRequest(handle_pull_request(&client, &config, pr).await?)
        }
        GitHubEvent::IssueComment(comment) => RouteOutcome::IssueComment(
            handle_issue_comment(&client, media, &config, comment).await?,
        ),
        GitHubEvent::Other(_) => RouteOutcome::Ignored,
    };
    Ok(outcome)
}

impl RouteError {
    /// Logs the error at a level matching who is at fault.
    pub fn log(&self) {
        match self {
            RouteError::InvalidSignature | RouteError::Parse(_) => {
                debug!(error = %self, "Rejected delivery")
            }
            RouteError::Handler(HandlerError::GitHub(e)) if e.kind.is_transient() => {
                warn!(error = %self, "Delivery failed; GitHub may recover on redelivery")
            }
            _ => error!(error = %self, "Delivery failed"),
        }
    }
}
