use std::sync::Arc;

use filing_wizard::config::{ApiSettings, AppConfig, FileModeStore};
use filing_wizard::llm::AnthropicClient;
use filing_wizard::routes;
use filing_wizard::state::AppState;
use filing_wizard::toggle::DevMode;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env().expect("invalid configuration");
    let store = Arc::new(FileModeStore::new(config.mode_file.clone()));
    let mode_file = store.path().display().to_string();
    let settings = ApiSettings::hydrate(config.api.clone(), store).expect("api mode load failed");
    let llm = Arc::new(AnthropicClient::new().expect("http client init failed"));
    let dev = DevMode::detect(config.app_env.as_deref(), &config.host);

    let state = AppState::new(settings, llm, config.suggest, dev);
    let mode = state.settings.mode();

    let app = routes::app(state);
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    tracing::info!(%addr, ?mode, ?dev, %mode_file, "filing-wizard listening");
    axum::serve(listener, app).await.expect("server failed");
}
