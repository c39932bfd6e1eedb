mod rate;
pub use rate::*;

use std::sync::Arc;

use crate::storage::RateStorage;

/// Общие данные для обработчиков
#[derive(Clone)]
pub struct AppState {
    pub rate_storage: Arc<dyn RateStorage>,
}
impl AppState {
    /// Создать новый экземпляр общих данных
    pub fn new(rate_storage: Arc<dyn RateStorage>) -> Self {
        Self { rate_storage }
    }
}
