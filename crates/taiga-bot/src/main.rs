//! Bot entry point: configuration, shared state, update dispatcher.

use std::path::PathBuf;
use std::sync::Arc;

use teloxide::prelude::*;

use taiga_api::AniListClient;
use taiga_core::config::AppConfig;
use taiga_core::session::SessionStore;

mod flow;
mod format;
mod handlers;
mod keyboards;
mod pipeline;

/// Shared dependencies handed to every handler.
pub struct AppState {
    pub config: AppConfig,
    pub sessions: SessionStore,
    /// Client for gallery pages and image downloads.
    pub http: reqwest::Client,
    pub anilist: AniListClient,
    /// Parent directory for per-chat scratch folders.
    pub work_dir: PathBuf,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("taiga_bot=info,taiga_core=info,taiga_api=info")
        .init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(%error, "failed to load configuration");
            std::process::exit(1);
        }
    };
    if config.telegram.token.is_empty() {
        tracing::error!(
            path = %AppConfig::config_path().display(),
            "telegram.token is empty; fill in the config file"
        );
        std::process::exit(1);
    }
    if config.telegram.allowed_users.is_empty() {
        tracing::warn!("telegram.allowed_users is empty; every update will be denied");
    }

    let http = match taiga_core::http::build_client() {
        Ok(client) => client,
        Err(error) => {
            tracing::error!(%error, "failed to build HTTP client");
            std::process::exit(1);
        }
    };
    let anilist = match AniListClient::new() {
        Ok(client) => client,
        Err(error) => {
            tracing::error!(%error, "failed to build AniList client");
            std::process::exit(1);
        }
    };

    let bot = Bot::new(config.telegram.token.clone());
    let work_dir = config.work_dir();
    let state = Arc::new(AppState {
        config,
        sessions: SessionStore::new(),
        http,
        anilist,
        work_dir,
    });

    tracing::info!("bot starting");

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(handlers::handle_message))
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
