//! Event-triggered scaler
//!
//! Run by an external event source. Sets the configured service's desired
//! count to 3 without consulting the decision engine, prints a JSON
//! confirmation and exits non-zero if the scale command failed.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cloudiq_remediator::config::Config;
use cloudiq_remediator::logic::trigger::{handle_event, TriggerResponse};
use cloudiq_remediator::logic::CommandDispatcher;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // stdout carries the response, logs go to stderr
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "cloudiq_remediator=info,scale_trigger=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    let target = config.trigger_target();
    let dispatcher = CommandDispatcher::ecs(&config);

    match handle_event(&dispatcher, &target).await {
        Ok(response) => {
            println!("{}", serde_json::to_string(&response)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scale trigger failed: {}", e);
            println!("{}", serde_json::to_string(&TriggerResponse::failed(&target, &e))?);
            std::process::exit(1);
        }
    }
}
