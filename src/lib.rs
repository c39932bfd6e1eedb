mod error;
use std::sync::Arc;

pub use error::{AppError, Result};
pub mod config;
pub mod feed;
mod handlers;
pub mod models;
mod routes;
pub mod storage;
mod synchronizer;

pub use config::Config;
pub use feed::{EcbClient, RateFeed};
pub use storage::{PgRateStorage, RateStorage};
pub use synchronizer::Synchronizer;

pub struct RatesService {
    pool: sqlx::PgPool,
    config: Config,
}
impl RatesService {
    pub fn new(pool: sqlx::PgPool, config: Config) -> Self {
        Self { pool, config }
    }
    /// Применяет миграции, один раз синхронизирует курсы и возвращает роутер
    pub async fn run(self) -> Result<axum::Router> {
        storage::migrate(&self.pool).await?;
        let rate_storage: Arc<dyn RateStorage> = Arc::new(PgRateStorage::new(self.pool));
        let feed = Arc::new(EcbClient::new(
            self.config.feed_endpoint,
            self.config.feed_timeout,
        )?);
        let syncer = Synchronizer::new(feed, rate_storage.clone());
        syncer.run().await;
        Ok(routes::init(models::AppState::new(rate_storage)))
    }
}
