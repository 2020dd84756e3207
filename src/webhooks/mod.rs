//! Webhook handling for GitHub events.
//!
//! This module provides:
//! - Signature verification for webhook payloads (HMAC-SHA256 and HMAC-SHA1)
//! - Event parsing into typed events
//! - The policy handlers for pull request and issue comment events
//! - The router tying them together for one delivery

pub mod events;
pub mod handlers;
pub mod parser;
pub mod router;
pub mod signature;

pub use events::{CommentAction, GitHubEvent, IssueCommentEvent, PrAction, PullRequestEvent};
pub use handlers::{HandlerError, PipelineReport, handle_issue_comment, handle_pull_request};
pub use parser::{ParseError, parse_webhook};
pub use router::{Delivery, RouteError, RouteOutcome, route};
pub use signature::{
    SignatureAlgorithm, compute_signature, format_signature_header, parse_signature_header,
    verify_delivery, verify_signature,
};
