//! HTTP surface: webhook ingress for Telegram and Razorpay plus the setup routes.

pub mod razorpay;
pub mod routes;
pub mod setup;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use teloxide::Bot;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::core::http::build_client;
use crate::core::{AppError, AppResult, Config};
use crate::payments::RazorpayClient;
use crate::telegram::{create_bot, HandlerDeps};

/// Shared, read-only state behind every route
pub struct AppState {
    pub config: Arc<Config>,
    pub http: reqwest::Client,
    /// `None` when no bot token is configured
    pub bot: Option<Bot>,
    pub razorpay: RazorpayClient,
}

impl AppState {
    pub fn new(config: Config) -> reqwest::Result<Self> {
        let http = build_client(&config.http)?;
        let bot = config
            .bot_token
            .as_ref()
            .map(|token| create_bot(token, config.telegram_api_url.clone(), http.clone()));
        let razorpay = RazorpayClient::new(http.clone(), config.razorpay_api_url.clone(), config.retry);

        Ok(Self {
            config: Arc::new(config),
            http,
            bot,
            razorpay,
        })
    }

    /// Handler dependencies, or `ConfigMissing` when the bot token is unset.
    pub fn handler_deps(&self) -> AppResult<HandlerDeps> {
        let bot = self.bot.clone().ok_or(AppError::ConfigMissing("Telegram token"))?;
        Ok(HandlerDeps::new(bot, self.http.clone(), Arc::clone(&self.config)))
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let request_timeout = state.config.request_timeout;

    Router::new()
        .route("/", get(routes::index))
        .route("/favicon.ico", get(routes::favicon))
        .route("/webhook", post(routes::telegram_webhook))
        .route("/webhook/razorpay", post(razorpay::razorpay_webhook))
        .route("/setwebhook", get(setup::set_telegram_webhook).post(setup::set_telegram_webhook))
        .route("/setup-razorpay-webhook", post(setup::setup_razorpay_webhook))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, request_timeout)),
        )
        .with_state(state)
}

/// Binds the configured address and serves until SIGINT/SIGTERM.
pub async fn serve(state: Arc<AppState>) -> anyhow::Result<()> {
    let addr = state.config.bind_address;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for SIGTERM or SIGINT signal for graceful shutdown
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, shutting down gracefully");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, shutting down gracefully");
        },
    }
}
