use pons_sched::SchedError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("scheduler error: {0}")]
    Sched(#[from] SchedError),
}

pub type SimResult<T> = Result<T, SimError>;
