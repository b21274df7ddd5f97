use babel_mt::{Config, Translator, models_from_config};
use tracing::info;

mod api;

use api::{AppState, router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("info".parse()?),
        )
        .init();

    let config = Config::from_env()?;

    // Connect the models once; every request shares them
    let models = models_from_config(&config)
        .map_err(|e| format!("Failed to initialize models: {}", e))?;
    let translator = Translator::new(models);

    info!("Starting babel-mt web server");
    info!(
        inference_url = %config.inference_url,
        translation_model = %config.translation_model,
        detection = config.detection_enabled,
        max_concurrency = ?config.max_concurrency,
        "Models configured"
    );

    let app = router(AppState::new(translator, config.max_concurrency));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!("Server running at http://{}", config.addr);

    axum::serve(listener, app).await?;

    Ok(())
}
