use std::time::Duration;

use chrono::NaiveDate;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::{
    models::{DailyRates, Rate},
    AppError, Result,
};

// url исторических курсов ЕЦБ за 90 дней
pub const ECB_URI: &str = "https://www.ecb.europa.eu/stats/eurofxref/eurofxref-hist-90d.xml";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Источник исторических курсов
#[async_trait::async_trait]
pub trait RateFeed: Send + Sync {
    /// Получить все блоки курсов из источника
    async fn fetch(&self) -> Result<Vec<DailyRates>>;
    /// Получить курсы, которые новее `watermark` (все, если `None`)
    async fn fetch_since(&self, watermark: Option<NaiveDate>) -> Result<Vec<Rate>> {
        let blocks = self.fetch().await?;
        Ok(since(blocks, watermark))
    }
}

/// Клиент ЕЦБ
#[derive(Clone)]
pub struct EcbClient {
    endpoint: String,
    client: reqwest::Client,
}

impl EcbClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .gzip(true)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }
}

#[async_trait::async_trait]
impl RateFeed for EcbClient {
    async fn fetch(&self) -> Result<Vec<DailyRates>> {
        tracing::info!("Запрашиваю курсы валют: {}", self.endpoint);
        let response = self.client.get(&self.endpoint).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::FeedUnreachable(format!(
                "{} responded with {status}",
                self.endpoint
            )));
        }
        let body = response.text().await?;
        let blocks = parse_feed(&body)?;
        tracing::info!("Получено {} дней курсов валют", blocks.len());
        Ok(blocks)
    }
}

/// Оставляет блоки строго после `watermark` и разворачивает их в плоский список
pub fn since(blocks: Vec<DailyRates>, watermark: Option<NaiveDate>) -> Vec<Rate> {
    blocks
        .into_iter()
        .filter(|b| watermark.map_or(true, |w| b.date > w))
        .flat_map(DailyRates::into_rates)
        .collect()
}

/// Разбирает документ вида
/// `<Cube><Cube time="2021-03-25"><Cube currency="USD" rate="1.18"/>...</Cube></Cube>`.
///
/// Любая ошибка в документе прерывает разбор целиком.
pub fn parse_feed(body: &str) -> Result<Vec<DailyRates>> {
    let mut reader = Reader::from_str(body);
    let mut blocks = Vec::new();
    let mut current: Option<DailyRates> = None;
    // открытые элементы документа, глубина вложенности Cube и глубина блока с датой
    let mut open = 0usize;
    let mut depth = 0usize;
    let mut block_depth = 0usize;
    let mut seen_cube = false;
    let mut root_closed = false;
    loop {
        match reader.read_event().map_err(decode_error)? {
            Event::Start(e) => {
                open += 1;
                if e.name().as_ref() == b"Cube" {
                    seen_cube = true;
                    depth += 1;
                    if let Some(block) = open_cube(&e, &mut current)? {
                        current = Some(block);
                        block_depth = depth;
                    }
                }
            }
            Event::Empty(e) if e.name().as_ref() == b"Cube" => {
                seen_cube = true;
                if let Some(block) = open_cube(&e, &mut current)? {
                    blocks.push(block);
                }
            }
            Event::End(e) => {
                open = open.saturating_sub(1);
                if e.name().as_ref() == b"Cube" {
                    if current.is_some() && depth == block_depth {
                        blocks.extend(current.take());
                    }
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        root_closed = true;
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    if !seen_cube {
        return Err(AppError::FeedDecodeError(
            "document has no Cube elements".to_string(),
        ));
    }
    if current.is_some() || depth != 0 || open != 0 || (!root_closed && !blocks.is_empty()) {
        return Err(AppError::FeedDecodeError("document is truncated".to_string()));
    }
    Ok(blocks)
}

/// Обрабатывает открывающий Cube. Возвращает новый блок, если у элемента есть дата,
/// иначе добавляет курс в текущий блок.
fn open_cube(e: &BytesStart, current: &mut Option<DailyRates>) -> Result<Option<DailyRates>> {
    let mut time = None;
    let mut currency = None;
    let mut rate = None;
    for attr in e.attributes() {
        let attr = attr.map_err(decode_error)?;
        let value = attr.unescape_value().map_err(decode_error)?.into_owned();
        match attr.key.as_ref() {
            b"time" => time = Some(value),
            b"currency" => currency = Some(value),
            b"rate" => rate = Some(value),
            _ => {}
        }
    }
    if let Some(time) = time {
        if current.is_some() {
            return Err(AppError::FeedDecodeError(format!(
                "nested date block '{time}'"
            )));
        }
        let date = NaiveDate::parse_from_str(time.trim(), DATE_FORMAT).map_err(|e| {
            AppError::FeedDecodeError(format!("invalid date '{time}': {e}"))
        })?;
        return Ok(Some(DailyRates {
            date,
            rates: Vec::new(),
        }));
    }
    match (currency, rate) {
        (None, None) => Ok(None),
        (Some(currency), Some(rate)) => {
            let currency = currency.trim().to_string();
            if currency.len() != 3 || !currency.bytes().all(|b| b.is_ascii_alphabetic()) {
                return Err(AppError::FeedDecodeError(format!(
                    "invalid currency code '{currency}'"
                )));
            }
            let value = rate
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v > 0.0)
                .ok_or_else(|| {
                    AppError::FeedDecodeError(format!("invalid rate '{rate}' for {currency}"))
                })?;
            match current {
                Some(block) => {
                    if block.rates.iter().any(|(c, _)| *c == currency) {
                        return Err(AppError::FeedDecodeError(format!(
                            "duplicate currency {currency} on {}",
                            block.date
                        )));
                    }
                    block.rates.push((currency, value));
                    Ok(None)
                }
                None => Err(AppError::FeedDecodeError(format!(
                    "rate for {currency} outside of a date block"
                ))),
            }
        }
        _ => Err(AppError::FeedDecodeError(
            "rate entry must have both currency and rate".to_string(),
        )),
    }
}

fn decode_error(e: impl std::fmt::Display) -> AppError {
    AppError::FeedDecodeError(e.to_string())
}
