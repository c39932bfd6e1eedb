use std::sync::Arc;

use tracing::instrument;

use crate::{feed::RateFeed, storage::RateStorage, Result};

/// Загружает из источника курсы, которых еще нет в хранилище
pub struct Synchronizer {
    feed: Arc<dyn RateFeed>,
    rate_storage: Arc<dyn RateStorage>,
}
impl Synchronizer {
    pub fn new(feed: Arc<dyn RateFeed>, rate_storage: Arc<dyn RateStorage>) -> Arc<Self> {
        Arc::new(Self { feed, rate_storage })
    }
    /// Возвращает количество сохраненных курсов.
    /// При любой ошибке хранилище остается в прежнем состоянии.
    #[instrument(name = "syncing rates", skip_all)]
    pub async fn sync(&self) -> Result<u64> {
        let watermark = self.rate_storage.latest_date().await?;
        match watermark {
            Some(date) => tracing::info!("Последние курсы в базе на {date}"),
            None => tracing::info!("В базе еще нет курсов, загружаю всю историю"),
        }
        let rates = self.feed.fetch_since(watermark).await?;
        if rates.is_empty() {
            tracing::info!("Новых курсов валют нет");
            return Ok(0);
        }
        self.rate_storage.insert_many(rates).await
    }
    /// Синхронизация при старте: ошибка пишется в лог, сервис продолжает работу
    pub async fn run(self: Arc<Self>) {
        match self.sync().await {
            Ok(inserted) => tracing::info!("Синхронизация завершена, добавлено {inserted} курсов"),
            Err(e) => tracing::error!("Ошибка синхронизации курсов валют: {e:?}"),
        }
    }
}
