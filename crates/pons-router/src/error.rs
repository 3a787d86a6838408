use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("static router has no route computed for destination {0}")]
    NoRoute(pons_core::NodeId),

    #[error("unknown forwarding policy: {0}")]
    UnknownPolicy(String),
}

pub type RouterResult<T> = Result<T, RouterError>;
