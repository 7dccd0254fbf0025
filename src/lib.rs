pub mod api;
pub mod bridge;
pub mod config;

use std::{env, sync::Arc};

use axum::Router;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bridge::Generator;

#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn Generator>,
    pub timeout_ms: u64,
    /// Answer on every path, not only `/` and `/ask`. Set in Lambda mode.
    pub answer_any_path: bool,
}

pub fn build_app(state: Arc<AppState>) -> Router {
    api::router(state)
}

/// True when the process was started by the Lambda runtime.
pub fn running_in_lambda() -> bool {
    env::var_os("AWS_LAMBDA_RUNTIME_API").is_some()
}

/// JSON logs under Lambda, human-readable ones locally. `RUST_LOG` overrides the `info` default.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_target(false).without_time())
            .init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

pub async fn run_server(app: Router, port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}

pub async fn run_lambda(app: Router) -> anyhow::Result<()> {
    lambda_http::run(app)
        .await
        .map_err(|err| anyhow::anyhow!(err))
}
