use thiserror::Error;

#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("contact plan parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no contact between {0} and {1} at t={2:.3}")]
    NoContact(pons_core::NodeId, pons_core::NodeId, f64),
}

pub type TopologyResult<T> = Result<T, TopologyError>;
