use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Базовая валюта всех курсов
pub const BASE_CURRENCY: &str = "EUR";

/// Курс одной валюты к евро на дату
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, FromRow)]
pub struct Rate {
    #[sqlx(rename = "rate_date")]
    pub date: NaiveDate,
    pub currency: String,
    pub rate: f64,
}
impl Rate {
    pub fn new(date: NaiveDate, currency: impl Into<String>, rate: f64) -> Self {
        Self {
            date,
            currency: currency.into(),
            rate,
        }
    }
}

/// Блок курсов из источника: одна дата и курсы в порядке документа
#[derive(Clone, Debug, PartialEq)]
pub struct DailyRates {
    pub date: NaiveDate,
    pub rates: Vec<(String, f64)>,
}
impl DailyRates {
    pub fn into_rates(self) -> impl Iterator<Item = Rate> {
        let date = self.date;
        self.rates
            .into_iter()
            .map(move |(currency, rate)| Rate::new(date, currency, rate))
    }
}

/// Минимум, максимум и среднее по валюте за всю историю
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, FromRow)]
pub struct RateAnalyze {
    pub currency: String,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

/// Ответ на /rates/latest и /rates/{date}
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExchangeRate {
    pub base: String,
    pub rates: BTreeMap<String, f64>,
}
impl From<Vec<Rate>> for ExchangeRate {
    fn from(value: Vec<Rate>) -> Self {
        Self {
            base: BASE_CURRENCY.to_string(),
            rates: value.into_iter().map(|r| (r.currency, r.rate)).collect(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Analyze {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

/// Ответ на /rates/analyze
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExchangeRateAnalyze {
    pub base: String,
    pub rates_analyze: BTreeMap<String, Analyze>,
}
impl From<Vec<RateAnalyze>> for ExchangeRateAnalyze {
    fn from(value: Vec<RateAnalyze>) -> Self {
        let rates_analyze = value
            .into_iter()
            .map(|a| {
                (
                    a.currency,
                    Analyze {
                        min: a.min,
                        max: a.max,
                        avg: a.avg,
                    },
                )
            })
            .collect();
        Self {
            base: BASE_CURRENCY.to_string(),
            rates_analyze,
        }
    }
}
