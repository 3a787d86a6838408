use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("unknown interface: {0}")]
    UnknownInterface(String),
}

pub type NodeResult<T> = Result<T, NodeError>;
