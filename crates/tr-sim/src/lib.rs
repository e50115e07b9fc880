//! `tr-sim` — drives the trip router over a whole population.
//!
//! # Routing pass
//!
//! ```text
//! for iteration in 0..config.iterations:
//!   ① Collect  — one RouteRequest per leg of every selected plan, in
//!                ascending (person, trip) order.
//!   ② Route    — TripRouter::route for each request
//!                (parallel with the `parallel` feature).
//!   ③ Apply    — in request order:
//!                  Ok(trip)         → replace the leg's route
//!                  NoRouteFound     → keep the previous route, report
//!                  any other error  → abort the pass
//! ```
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`config`]   | `ScenarioConfig` (JSON)                                    |
//! | [`runner`]   | `RoutingRunner`, `RoutingSummary`                          |
//! | [`observer`] | `RoutingObserver`, `NoopObserver`, `ModeShareObserver`     |
//! | [`output`]   | `TripCsvObserver`, `write_mode_share_csv`                  |
//! | [`scenario`] | `Scenario` — config → graph → population → runner          |
//! | [`error`]    | `SimError`, `SimResult<T>`                                 |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                             |
//! |------------|----------------------------------------------------|
//! | `parallel` | Runs phase ② on Rayon's thread pool.               |

pub mod config;
pub mod error;
pub mod observer;
pub mod output;
pub mod runner;
pub mod scenario;


pub use config::ScenarioConfig;
pub use error::{SimError, SimResult};
pub use observer::{ModeShareObserver, NoopObserver, RoutingObserver};
pub use output::{write_mode_share_csv, TripCsvObserver};
pub use runner::{RoutingRunner, RoutingSummary};
pub use scenario::Scenario;
