//! HTTP server for the bot.
//!
//! # Endpoints
//!
//! - `POST /webhooks` - Verifies and handles a GitHub webhook delivery inline
//!   (200 on success or no-op, 400 on any error)
//! - `GET /health` - Returns 200 if the server is running

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio_util::sync::CancellationToken;

use crate::fun::MediaOps;
use crate::github::AppOps;

pub mod health;
pub mod webhook;

pub use health::health_handler;
pub use webhook::{WebhookError, webhook_handler};

/// Shared application state, passed to handlers via Axum's `State` extractor.
pub struct AppState<A, M> {
    inner: Arc<AppStateInner<A, M>>,
}

// Derived `Clone` would require `A: Clone` and `M: Clone`.
impl<A, M> Clone for AppState<A, M> {
    fn clone(&self) -> Self {
        AppState {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct AppStateInner<A, M> {
    app: A,
    media: M,

    /// Shared secret for webhook signature verification.
    webhook_secret: Vec<u8>,

    /// Parent of every per-delivery token. Cancelled on shutdown.
    shutdown: CancellationToken,
}

impl<A, M> AppState<A, M> {
    pub fn new(
        app: A,
        media: M,
        webhook_secret: impl Into<Vec<u8>>,
        shutdown: CancellationToken,
    ) -> Self {
        AppState {
            inner: Arc::new(AppStateInner {
                app,
                media,
                webhook_secret: webhook_secret.into(),
                shutdown,
            }),
        }
    }

    pub fn app(&self) -> &A {
        &self.inner.app
    }

    pub fn media(&self) -> &M {
        &self.inner.media
    }

    pub fn webhook_secret(&self) -> &[u8] {
        &self.inner.webhook_secret
    }

    pub fn shutdown(&self) -> &CancellationToken {
        &self.inner.shutdown
    }
}

/// Builds the axum Router with all endpoints.
pub fn build_router<A, M>(app_state: AppState<A, M>) -> Router
where
    A: AppOps + 'static,
    M: MediaOps + 'static,
{
    Router::new()
        .route("/webhooks", post(webhook_handler::<A, M>))
        .route("/health", get(health_handler))
        .with_state(app_state)
}
