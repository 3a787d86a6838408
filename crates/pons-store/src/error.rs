use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("message too large for store capacity: size={size} capacity={capacity}")]
    TooLarge { size: u64, capacity: u64 },
}

pub type StoreResult<T> = Result<T, StoreError>;
