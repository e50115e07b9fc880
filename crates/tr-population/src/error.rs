use thiserror::Error;

#[derive(Debug, Error)]
pub enum PopulationError {
    #[error("plan CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid plan for person {person}: {reason}")]
    InvalidPlan { person: u32, reason: String },

    #[error("plan parse error: {0}")]
    Parse(String),

    #[error("cannot generate a population without transit stops")]
    NoStops,
}

pub type PopulationResult<T> = Result<T, PopulationError>;
