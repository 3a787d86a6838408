use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("application config error: {0}")]
    Config(String),
}

pub type AppResult<T> = Result<T, AppError>;
