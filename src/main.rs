use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tunesmith_api::{
    config::Config,
    routes::{create_router, AppState},
    services::{GeminiProvider, Recommender},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // One provider for the whole process, shared by every request
    let provider = Arc::new(GeminiProvider::from_config(&config));
    let recommender = Recommender::new(provider).with_timeout(config.provider_timeout());

    let app = create_router(Arc::new(AppState::new(recommender)));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(
        address = %address,
        model = %config.gemini_model,
        "Server listening"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
