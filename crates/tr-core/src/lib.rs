//! `tr-core` — foundational types for the `transit_router` workspace.
//!
//! This crate is a dependency of every other `tr-*` crate.  It has no `tr-*`
//! dependencies and few external ones (`rand`, `thiserror`, `chrono`,
//! `chrono-tz`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `PersonId`, `StopId`, `TransitTripId`                     |
//! | [`geo`]     | `GeoPoint` (WGS-84), `Coord` (scenario CRS), `CoordTransform` |
//! | [`time`]    | `SimTime` (seconds after midnight), `ServiceDay`          |
//! | [`rng`]     | `RandomSource`, `RequestRng`, `SimRng`, `FixedSequence`   |
//! | [`mode`]    | `LegMode` enum                                            |
//! | [`trip`]    | `Leg`, `Trip`                                             |
//! | [`error`]   | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod mode;
pub mod rng;
pub mod time;
pub mod trip;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{Coord, CoordTransform, GeoPoint};
pub use ids::{PersonId, StopId, TransitTripId};
pub use mode::LegMode;
pub use rng::{FixedSequence, RandomSource, RequestRng, SimRng};
pub use time::{ServiceDay, SimTime};
pub use trip::{Leg, Trip};
