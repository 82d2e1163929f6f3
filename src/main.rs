use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod io;
mod orchestrator;
mod prompts;
mod providers;

use config::Config;
use providers::{GeminiProvider, ImageProvider, MockProvider};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = Config::from_env();

    let provider: Arc<dyn ImageProvider> = match cfg.provider.as_str() {
        "mock" => Arc::new(MockProvider),
        _ => {
            let key = cfg
                .gemini_api_key
                .clone()
                .context("GEMINI_API_KEY not set")?;
            Arc::new(GeminiProvider::new(
                key,
                cfg.gemini_model.clone(),
                cfg.gemini_api_base.clone(),
            ))
        }
    };
    tracing::info!(provider = provider.name(), "provider ready");

    api::serve(provider, Arc::new(cfg)).await
}
