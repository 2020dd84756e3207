//! Webhook endpoint handler.
//!
//! Deliveries are handled inline: the response is sent once every GitHub
//! call made on the delivery's behalf has finished.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{Instrument, debug, info, info_span};

use super::AppState;
use crate::fun::MediaOps;
use crate::github::AppOps;
use crate::types::DeliveryId;
use crate::webhooks::{Delivery, RouteError, RouteOutcome, route};

const HEADER_EVENT: &str = "x-github-event";
const HEADER_DELIVERY: &str = "x-github-delivery";
const HEADER_SIGNATURE_256: &str = "x-hub-signature-256";
const HEADER_SIGNATURE_1: &str = "x-hub-signature";

/// Errors that can occur when processing a webhook.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("missing required header: {0}")]
    MissingHeader(&'static str),

    #[error(transparent)]
    Route(#[from] RouteError),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

/// Webhook handler.
///
/// # Request
///
/// - Method: POST
/// - Headers:
///   - `X-GitHub-Event`: event type (required)
///   - `X-Hub-Signature-256` or `X-Hub-Signature`: HMAC of the body (one required)
///   - `X-GitHub-Delivery`: delivery id (optional, logged)
/// - Body: JSON webhook payload
///
/// # Response
///
/// - 200 OK: handled, or nothing to do
/// - 400 Bad Request: anything else
pub async fn webhook_handler<A, M>(
    State(app_state): State<AppState<A, M>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, &'static str), WebhookError>
where
    A: AppOps + 'static,
    M: MediaOps + 'static,
{
    let event_type =
        get_header(&headers, HEADER_EVENT).ok_or(WebhookError::MissingHeader(HEADER_EVENT))?;
    let delivery_id = get_header(&headers, HEADER_DELIVERY).map(DeliveryId::new);

    let delivery = Delivery {
        event_type,
        signature_sha256: get_header(&headers, HEADER_SIGNATURE_256),
        signature_sha1: get_header(&headers, HEADER_SIGNATURE_1),
        body: &body,
    };

    let span = info_span!(
        "delivery",
        event_type = %event_type,
        delivery_id = delivery_id.as_ref().map(tracing::field::display),
    );

    // Anything still in flight is aborted when the request finishes or the
    // server shuts down.
    let cancel = app_state.shutdown().child_token();
    let _guard = cancel.clone().drop_guard();

    let result = route(
        app_state.app(),
        app_state.media(),
        app_state.webhook_secret(),
        delivery,
        cancel,
    )
    .instrument(span.clone())
    .await;

    span.in_scope(|| match &result {
        Ok(RouteOutcome::Ignored) => debug!("Nothing to do"),
        Ok(RouteOutcome::PullRequest(report)) => info!(?report, "Pull request handled"),
        Ok(RouteOutcome::IssueComment(command)) => info!(?command, "Comment handled"),
        Err(e) => e.log(),
    });
    result?;
    Ok((StatusCode::OK, "OK"))
}

fn get_header<'a>(headers: &'a HeaderMap, name: &'static str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
