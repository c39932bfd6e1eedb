mod rate;
#[cfg(test)]
pub(crate) mod memory;

use chrono::NaiveDate;
pub use rate::PgRateStorage;

use crate::{
    models::{Rate, RateAnalyze},
    Result,
};

/// Хранилище курсов валют
#[async_trait::async_trait]
pub trait RateStorage: Send + Sync {
    /// Сохранить курсы одной транзакцией: либо все, либо ничего
    async fn insert_many(&self, rates: Vec<Rate>) -> Result<u64>;
    /// Последняя сохраненная дата, `None` если курсов еще нет
    async fn latest_date(&self) -> Result<Option<NaiveDate>>;
    /// Курсы на дату, по возрастанию кода валюты
    async fn rates_for(&self, date: NaiveDate) -> Result<Vec<Rate>>;
    /// Курсы на последнюю сохраненную дату
    async fn latest_rates(&self) -> Result<Vec<Rate>> {
        match self.latest_date().await? {
            Some(date) => self.rates_for(date).await,
            None => Ok(Vec::new()),
        }
    }
    /// Минимум, максимум и среднее по каждой валюте за всю историю
    async fn aggregates(&self) -> Result<Vec<RateAnalyze>>;
}

/// Применяет миграции из каталога `migrations`
pub async fn migrate(pool: &sqlx::PgPool) -> Result<()> {
    sqlx::migrate!()
        .run(pool)
        .await
        .map_err(|e| crate::AppError::StoreWriteError(e.to_string()))?;
    tracing::info!("Миграции базы данных применены");
    Ok(())
}
