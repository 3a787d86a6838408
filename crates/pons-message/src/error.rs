use thiserror::Error;

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("generator config error: {0}")]
    Config(String),
}

pub type MessageResult<T> = Result<T, MessageError>;
