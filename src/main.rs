use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use paul::fun::{MediaClient, MediaConfig};
use paul::github::GitHubApp;
use paul::scheduler::{SweepConfig, run_scheduler};
use paul::server::{AppState, build_router};
use paul::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paul=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env().context("reading settings")?;
    tracing::debug!(?settings, "Loaded settings");

    let app = GitHubApp::new(
        settings.application_id,
        &settings.private_key,
        settings.personal_access_token.clone(),
    )
    .context("building GitHub App client")?;
    let media = MediaClient::new(MediaConfig::new(settings.giphy_api_key.clone()))
        .context("building media client")?;

    let shutdown = CancellationToken::new();

    let scheduler = {
        let app = app.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move { run_scheduler(&app, SweepConfig::from_env(), shutdown).await })
    };

    let state = AppState::new(app, media, settings.webhook_secret.clone(), shutdown.clone());
    let router = build_router(state);

    let (host, port) = settings.bind_target();
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .with_context(|| format!("binding {host}:{port}"))?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await
        .context("serving HTTP")?;

    shutdown.cancel();
    scheduler.await.context("scheduler task panicked")?;
    tracing::info!("shut down");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM, cancelling `shutdown`.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("shutdown signal received");
    shutdown.cancel();
}
