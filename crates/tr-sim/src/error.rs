use thiserror::Error;

use tr_core::CoreError;
use tr_graph::GraphError;
use tr_population::PopulationError;
use tr_router::RouterError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("scenario configuration error: {0}")]
    Config(String),

    #[error("scenario config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("output CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Router(#[from] RouterError),

    #[error(transparent)]
    Population(#[from] PopulationError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SimResult<T> = Result<T, SimError>;
