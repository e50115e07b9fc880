//! `tr-router` — the trip-routing dispatch core.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`classify`] | `classify`, `canonical_mode`, `MainModeIdentifier`              |
//! | [`selector`] | `ProfileSelector` — picks a `ParameterProfile` per request      |
//! | [`teleport`] | `TeleportParams` — beeline routing for non-network modes        |
//! | [`router`]   | `TripRouter`, `RouteRequest`, `RoutingStrategy`, `TripRouterConfig` |
//! | [`error`]    | `RouterError`, `RouterResult<T>`                                |
//!
//! # Request flow
//!
//! ```text
//! RouteRequest ──► RoutingStrategy::for_mode
//!                    ├─ Teleport ──► TeleportParams::teleport ──► Trip
//!                    └─ External ──► ProfileSelector::select
//!                                    ──► GraphHandle::plan(ItineraryQuery)
//!                                    ──► choose_itinerary ──► Trip
//! ```
//!
//! `TripRouter` holds no mutable state: one instance is shared by every
//! worker thread, and each request brings its own [`RandomSource`].
//!
//! [`RandomSource`]: tr_core::RandomSource

pub mod classify;
pub mod error;
pub mod router;
pub mod selector;
pub mod teleport;

#[cfg(test)]
mod tests;

pub use classify::{canonical_mode, classify, MainModeIdentifier, TransitMainModeIdentifier};
pub use error::{RouterError, RouterResult};
pub use router::{choose_itinerary, itinerary_to_trip, RouteRequest, RoutingStrategy, TripRouter, TripRouterConfig};
pub use selector::ProfileSelector;
pub use teleport::TeleportParams;
