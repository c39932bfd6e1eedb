use std::{error::Error, fmt::Display};

use serde::Serialize;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub enum AppError {
    /// Источник курсов недоступен: сеть, таймаут или неуспешный статус
    FeedUnreachable(String),
    /// Ответ источника не удалось разобрать
    FeedDecodeError(String),
    StoreReadError(String),
    StoreWriteError(String),
}

pub type Result<T> = core::result::Result<T, AppError>;
impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}
impl Error for AppError {}
impl AppError {
    pub fn read(value: sqlx::Error) -> Self {
        Self::StoreReadError(value.to_string())
    }
    pub fn write(value: sqlx::Error) -> Self {
        Self::StoreWriteError(value.to_string())
    }
}
impl From<reqwest::Error> for AppError {
    fn from(value: reqwest::Error) -> Self {
        Self::FeedUnreachable(value.to_string())
    }
}
impl From<AppError> for shuttle_runtime::Error {
    fn from(value: AppError) -> Self {
        match value {
            AppError::StoreReadError(e) | AppError::StoreWriteError(e) => {
                shuttle_runtime::Error::Database(e)
            }
            _ => shuttle_runtime::Error::Custom(value.into()),
        }
    }
}
