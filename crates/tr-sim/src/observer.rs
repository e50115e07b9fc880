//! Routing-pass observer trait and the mode-share counter.

use std::collections::BTreeMap;

use tr_core::{PersonId, Trip};
use tr_router::{MainModeIdentifier, RouterError, TransitMainModeIdentifier};

use crate::RoutingSummary;

/// Callbacks invoked by
/// [`RoutingRunner::route_population`][crate::RoutingRunner::route_population]
/// while results are applied, in ascending `(person, trip)` order.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait RoutingObserver {
    /// Called before any request of `iteration` is routed.
    fn on_iteration_start(&mut self, _iteration: u32) {}

    /// Called for every leg whose route was replaced.
    fn on_trip_routed(&mut self, _person: PersonId, _trip_index: u32, _trip: &Trip) {}

    /// Called when the router found no route; the leg keeps its previous
    /// route.
    fn on_route_failed(&mut self, _person: PersonId, _trip_index: u32, _error: &RouterError) {}

    /// Called once all results of `iteration` are applied.
    fn on_iteration_end(&mut self, _summary: &RoutingSummary) {}
}

/// A [`RoutingObserver`] that does nothing.
pub struct NoopObserver;

impl RoutingObserver for NoopObserver {}

/// Both observers, `.0` first.
impl<A: RoutingObserver, B: RoutingObserver> RoutingObserver for (A, B) {
    fn on_iteration_start(&mut self, iteration: u32) {
        self.0.on_iteration_start(iteration);
        self.1.on_iteration_start(iteration);
    }

    fn on_trip_routed(&mut self, person: PersonId, trip_index: u32, trip: &Trip) {
        self.0.on_trip_routed(person, trip_index, trip);
        self.1.on_trip_routed(person, trip_index, trip);
    }

    fn on_route_failed(&mut self, person: PersonId, trip_index: u32, error: &RouterError) {
        self.0.on_route_failed(person, trip_index, error);
        self.1.on_route_failed(person, trip_index, error);
    }

    fn on_iteration_end(&mut self, summary: &RoutingSummary) {
        self.0.on_iteration_end(summary);
        self.1.on_iteration_end(summary);
    }
}

// ── ModeShareObserver ─────────────────────────────────────────────────────────

/// Counts routed trips per main mode, as named by `I`.
///
/// Counts accumulate across iterations; call [`reset`](Self::reset) between
/// iterations for per-iteration shares.
pub struct ModeShareObserver<I: MainModeIdentifier = TransitMainModeIdentifier> {
    identifier: I,
    counts:     BTreeMap<String, usize>,
    failed:     usize,
}

impl ModeShareObserver {
    pub fn new() -> Self {
        Self::with_identifier(TransitMainModeIdentifier)
    }
}

impl Default for ModeShareObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MainModeIdentifier> ModeShareObserver<I> {
    pub fn with_identifier(identifier: I) -> Self {
        Self { identifier, counts: BTreeMap::new(), failed: 0 }
    }

    /// Trips per main-mode tag, sorted by tag.
    pub fn counts(&self) -> &BTreeMap<String, usize> {
        &self.counts
    }

    pub fn count(&self, mode: &str) -> usize {
        self.counts.get(mode).copied().unwrap_or(0)
    }

    /// Routed trips.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Fraction of routed trips with main mode `mode`; 0 when nothing was
    /// routed.
    pub fn share(&self, mode: &str) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.count(mode) as f64 / total as f64,
        }
    }

    pub fn reset(&mut self) {
        self.counts.clear();
        self.failed = 0;
    }
}

impl<I: MainModeIdentifier> RoutingObserver for ModeShareObserver<I> {
    fn on_trip_routed(&mut self, _person: PersonId, _trip_index: u32, trip: &Trip) {
        let mode = self.identifier.identify_main_mode(trip);
        *self.counts.entry(mode.as_str().to_owned()).or_default() += 1;
    }

    fn on_route_failed(&mut self, _person: PersonId, _trip_index: u32, _error: &RouterError) {
        self.failed += 1;
    }
}
