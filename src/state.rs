use std::sync::Arc;

use reqwest::Client;
use sqlx::SqlitePool;

use super::{config::Config, database::init_db};

pub struct AppState {
    pub config: Config,
    pub db: SqlitePool,
    pub http: Client,
}

impl AppState {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let db = init_db(&config.database_url).await;

        Arc::new(Self {
            config,
            db,
            http: Client::new(),
        })
    }
}
