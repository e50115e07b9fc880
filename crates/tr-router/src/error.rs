use thiserror::Error;

use tr_core::{Coord, CoreError, SimTime};
use tr_graph::GraphError;

#[derive(Debug, Error)]
pub enum RouterError {
    /// The graph returned no itinerary.  Recoverable: the caller decides
    /// what to do with the affected trip.
    #[error("no route from {from} to {to} departing {departure}")]
    NoRouteFound { from: Coord, to: Coord, departure: SimTime },

    /// Profile list or draw count unusable.  Startup-fatal.
    #[error("invalid profile configuration: {0}")]
    InvalidProfileConfiguration(String),

    #[error("routing graph could not be loaded: {0}")]
    GraphLoad(#[from] GraphError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl RouterError {
    /// `true` for per-request failures the simulation can recover from.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RouterError::NoRouteFound { .. })
    }
}

pub type RouterResult<T> = Result<T, RouterError>;
