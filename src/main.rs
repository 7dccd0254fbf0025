use std::sync::Arc;

use anyhow::Context;
use aws_config::{BehaviorVersion, Region};
use kb_ask_service::{
    bridge::{verify_caller_identity, BedrockGenerator},
    build_app,
    config::AppConfig,
    init_tracing, run_lambda, run_server, running_in_lambda, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let lambda = running_in_lambda();
    if !lambda {
        dotenvy::dotenv().ok();
    }
    init_tracing(lambda);

    let config = AppConfig::from_env().context("invalid configuration")?;
    let model_arn = config.model_arn();
    tracing::info!(
        knowledge_base_id = %config.knowledge_base_id,
        region = %config.region,
        model_arn = %model_arn,
        "starting"
    );

    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .load()
        .await;

    if config.verify_caller_identity {
        verify_caller_identity(&sdk_config).await;
    }

    let generator = BedrockGenerator::new(&sdk_config, &config.knowledge_base_id, model_arn);
    let app = build_app(Arc::new(AppState {
        generator: Arc::new(generator),
        timeout_ms: config.timeout_ms,
        answer_any_path: lambda,
    }));

    if lambda {
        run_lambda(app).await
    } else {
        run_server(app, config.port).await
    }
}
