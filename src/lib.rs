pub mod api;
pub mod config;
pub mod content;
pub mod error;
pub mod service;
pub mod source;
pub mod state;

use tracing_subscriber::{EnvFilter, fmt::time::ChronoLocal};

use config::Config;
use service::ContentService;
use source::NotionClient;
use state::AppState;

pub async fn run() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string()))
        .with_env_filter(EnvFilter::from_env("JOURNAL_LOG"))
        .init();

    // 缺少 Notion 凭据时无法提供任何内容，直接退出
    let config = Config::from_env().unwrap_or_else(|e| panic!("failed to load config: {e}"));

    let client = NotionClient::new(&config.api_key, &config.database_id, &config.notion)
        .unwrap_or_else(|e| panic!("failed to build notion client: {e}"));

    let app = AppState::new(ContentService::new(client), config.revalidate_secs)
        .unwrap_or_else(|e| panic!("failed to build app state: {e}"));

    api::run_server(app, &config.bind).await
}
