use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedError {
    #[error("realtime clock overran simulated time {sim_time:.3}s by {overrun_secs:.3}s")]
    RealtimeOverrun { sim_time: f64, overrun_secs: f64 },
}

pub type SchedResult<T> = Result<T, SchedError>;
