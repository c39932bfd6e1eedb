use chrono::NaiveDate;

use crate::{
    models::{Rate, RateAnalyze},
    AppError, Result,
};

use super::RateStorage;

// у postgres не больше 65535 параметров на запрос, по 3 на строку
const INSERT_CHUNK: usize = 10_000;

#[derive(Clone)]
pub struct PgRateStorage {
    pool: sqlx::PgPool,
}
impl PgRateStorage {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RateStorage for PgRateStorage {
    async fn insert_many(&self, rates: Vec<Rate>) -> Result<u64> {
        if rates.is_empty() {
            return Ok(0);
        }
        let mut tx = self.pool.begin().await.map_err(AppError::write)?;
        let mut rows_affected = 0;
        for chunk in rates.chunks(INSERT_CHUNK) {
            let query_string = "INSERT INTO rates(rate_date, currency, rate) ";
            let mut query_builder = sqlx::QueryBuilder::new(query_string);
            query_builder.push_values(chunk, |mut b, rate| {
                b.push_bind(rate.date)
                    .push_bind(rate.currency.clone())
                    .push_bind(rate.rate);
            });
            let query = query_builder.build();
            // при ошибке транзакция откатывается при drop
            let result = query.execute(&mut *tx).await.map_err(AppError::write)?;
            rows_affected += result.rows_affected();
        }
        tx.commit().await.map_err(AppError::write)?;
        tracing::info!("Сохранено {rows_affected} курсов валют");
        Ok(rows_affected)
    }
    async fn latest_date(&self) -> Result<Option<NaiveDate>> {
        let query = "SELECT MAX(rate_date) FROM rates";
        sqlx::query_scalar::<_, Option<NaiveDate>>(query)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::read)
    }
    async fn rates_for(&self, date: NaiveDate) -> Result<Vec<Rate>> {
        let query =
            "SELECT rate_date, currency, rate FROM rates WHERE rate_date = $1 ORDER BY currency ASC";
        sqlx::query_as::<_, Rate>(query)
            .bind(date)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::read)
    }
    async fn aggregates(&self) -> Result<Vec<RateAnalyze>> {
        let query = "SELECT currency, MIN(rate) AS min, MAX(rate) AS max, AVG(rate) AS avg \
                     FROM rates GROUP BY currency ORDER BY currency ASC";
        sqlx::query_as::<_, RateAnalyze>(query)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::read)
    }
}
