use std::time::Duration;

use crate::feed::{DEFAULT_TIMEOUT, ECB_URI};

/// Настройки источника курсов
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub feed_endpoint: String,
    pub feed_timeout: Duration,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            feed_endpoint: ECB_URI.to_string(),
            feed_timeout: DEFAULT_TIMEOUT,
        }
    }
}
impl Config {
    /// Читает `ECB_FEED_URL` и `ECB_FEED_TIMEOUT_SECS` из Secrets.toml,
    /// для отсутствующих ключей берет значения по умолчанию
    pub fn from_secrets(secrets: &shuttle_runtime::SecretStore) -> Self {
        Self::from_lookup(|key| secrets.get(key))
    }
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();
        let feed_endpoint = lookup("ECB_FEED_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(default.feed_endpoint);
        let feed_timeout = match lookup("ECB_FEED_TIMEOUT_SECS") {
            Some(v) => match v.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    tracing::error!(
                        "Некорректный ECB_FEED_TIMEOUT_SECS '{v}', использую {:?}",
                        default.feed_timeout
                    );
                    default.feed_timeout
                }
            },
            None => default.feed_timeout,
        };
        Self {
            feed_endpoint,
            feed_timeout,
        }
    }
}
