//! `tr-graph` — the routing graph service consumed by the trip router.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                       |
//! |---------------|----------------------------------------------------------------|
//! | [`profile`]   | `ParameterProfile`, `Optimize`, the default profile set        |
//! | [`query`]     | `ItineraryQuery`, `StreetMode`                                 |
//! | [`itinerary`] | `Itinerary`, `ItineraryLeg`                                    |
//! | [`graph`]     | `RoutingGraph` trait, `GraphHandle`, `GraphService`            |
//! | [`timetable`] | `TimetableGraph` (stops + connections + R-tree), builder       |
//! | [`search`]    | connection-scan `RoutingGraph` impl for `TimetableGraph`       |
//! | [`loader`]    | `load_timetable_dir`, `load_timetable_readers`                 |
//! | [`error`]     | `GraphError`, `GraphResult<T>`                                 |
//!
//! # Query contract
//!
//! ```text
//! GraphService::load(dir)          -> GraphResult<GraphService>   (startup, fatal on error)
//! GraphHandle::plan(&ItineraryQuery) -> Vec<Itinerary>            (may be empty)
//! ```
//!
//! The router only sees [`RoutingGraph`]; any backend that honours the
//! contract can replace [`TimetableGraph`].

pub mod error;
pub mod graph;
pub mod itinerary;
pub mod loader;
pub mod profile;
pub mod query;
pub mod search;
pub mod timetable;


pub use error::{GraphError, GraphResult};
pub use graph::{GraphHandle, GraphService, RoutingGraph};
pub use itinerary::{Itinerary, ItineraryLeg};
pub use loader::{load_timetable_dir, load_timetable_readers};
pub use profile::{Optimize, ParameterProfile};
pub use query::{ItineraryQuery, StreetMode};
pub use timetable::{TimetableGraph, TimetableGraphBuilder};
