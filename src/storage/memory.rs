use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::NaiveDate;

use crate::{
    models::{Rate, RateAnalyze},
    AppError, Result,
};

use super::RateStorage;

/// Хранилище в памяти для тестов, с теми же ограничениями, что и схема postgres
#[derive(Default)]
pub struct MemoryRateStorage {
    rows: Mutex<BTreeMap<(NaiveDate, String), f64>>,
    fail_reads: bool,
}
impl MemoryRateStorage {
    pub fn new(rates: Vec<Rate>) -> Self {
        let rows = rates
            .into_iter()
            .map(|r| ((r.date, r.currency), r.rate))
            .collect();
        Self {
            rows: Mutex::new(rows),
            fail_reads: false,
        }
    }
    pub fn failing() -> Self {
        Self {
            fail_reads: true,
            ..Default::default()
        }
    }
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn check_read(&self) -> Result<()> {
        if self.fail_reads {
            return Err(AppError::StoreReadError("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RateStorage for MemoryRateStorage {
    async fn insert_many(&self, rates: Vec<Rate>) -> Result<u64> {
        let mut rows = self.rows.lock().unwrap();
        let mut staged = rows.clone();
        for rate in rates.iter() {
            // VARCHAR(3), currency <> '' и rate > 0
            let currency_len = rate.currency.chars().count();
            if currency_len == 0 || currency_len > 3 || rate.rate <= 0.0 {
                return Err(AppError::StoreWriteError(format!(
                    "check constraint violated by {rate:?}"
                )));
            }
            let key = (rate.date, rate.currency.clone());
            if staged.insert(key, rate.rate).is_some() {
                return Err(AppError::StoreWriteError(format!(
                    "duplicate key {} {}",
                    rate.date, rate.currency
                )));
            }
        }
        *rows = staged;
        Ok(rates.len() as u64)
    }
    async fn latest_date(&self) -> Result<Option<NaiveDate>> {
        self.check_read()?;
        Ok(self.rows.lock().unwrap().keys().map(|(d, _)| *d).max())
    }
    async fn rates_for(&self, date: NaiveDate) -> Result<Vec<Rate>> {
        self.check_read()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|((d, _), _)| *d == date)
            .map(|((d, c), r)| Rate::new(*d, c.clone(), *r))
            .collect())
    }
    async fn aggregates(&self) -> Result<Vec<RateAnalyze>> {
        self.check_read()?;
        let mut by_currency: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for ((_, currency), rate) in self.rows.lock().unwrap().iter() {
            by_currency.entry(currency.clone()).or_default().push(*rate);
        }
        Ok(by_currency
            .into_iter()
            .map(|(currency, rates)| RateAnalyze {
                min: rates.iter().copied().fold(f64::INFINITY, f64::min),
                max: rates.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                avg: rates.iter().sum::<f64>() / rates.len() as f64,
                currency,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_latest_rates_on_empty_store() -> Result<()> {
        let storage = MemoryRateStorage::default();
        assert_eq!(storage.latest_date().await?, None);
        assert!(storage.latest_rates().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_rates_for_sorted_by_currency() -> Result<()> {
        let storage = MemoryRateStorage::new(vec![
            Rate::new(date("2021-03-25"), "USD", 1.35),
            Rate::new(date("2021-03-25"), "JPY", 128.86),
            Rate::new(date("2021-03-25"), "CHF", 1.1),
            Rate::new(date("2021-03-24"), "AUD", 1.55),
        ]);
        let rates = storage.rates_for(date("2021-03-25")).await?;
        let codes = rates.iter().map(|r| r.currency.as_str()).collect::<Vec<_>>();
        assert_eq!(codes, vec!["CHF", "JPY", "USD"]);
        assert!(storage.rates_for(date("2021-03-23")).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_insert_many_is_atomic() -> Result<()> {
        let storage = MemoryRateStorage::new(vec![Rate::new(date("2021-03-24"), "USD", 1.345)]);
        let result = storage
            .insert_many(vec![
                Rate::new(date("2021-03-25"), "USD", 1.35),
                Rate::new(date("2021-03-25"), "JPY", 128.86),
                Rate::new(date("2021-03-24"), "USD", 1.345),
            ])
            .await;
        assert!(matches!(result, Err(AppError::StoreWriteError(_))));
        assert_eq!(storage.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_insert_many_rejects_long_currency() -> Result<()> {
        let storage = MemoryRateStorage::default();
        let result = storage
            .insert_many(vec![
                Rate::new(date("2021-03-25"), "USD", 1.35),
                Rate::new(date("2021-03-25"), "USDOLLAR", 1.35),
            ])
            .await;
        assert!(matches!(result, Err(AppError::StoreWriteError(_))));
        assert!(storage.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_aggregates() -> Result<()> {
        let storage = MemoryRateStorage::new(vec![
            Rate::new(date("2021-03-22"), "USD", 1.3),
            Rate::new(date("2021-03-23"), "USD", 1.5),
            Rate::new(date("2021-03-24"), "USD", 1.4),
            Rate::new(date("2021-03-24"), "JPY", 128.86),
        ]);
        let aggregates = storage.aggregates().await?;
        assert_eq!(aggregates.len(), 2);
        assert_eq!(aggregates[0].currency, "JPY");
        let usd = &aggregates[1];
        assert_eq!(usd.currency, "USD");
        assert_eq!(usd.min, 1.3);
        assert_eq!(usd.max, 1.5);
        assert!((usd.avg - 1.4).abs() < 1e-9);
        Ok(())
    }
}
