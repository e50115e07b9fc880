//! The trip router: strategy dispatch, profile selection, graph query, and
//! the choice among returned alternatives.

use tracing::debug;

use tr_core::{
    Coord, CoordTransform, Leg, LegMode, PersonId, RandomSource, RequestRng, ServiceDay, SimTime,
    Trip,
};
use tr_graph::{GraphHandle, Itinerary, ItineraryQuery, StreetMode};

use crate::{canonical_mode, ProfileSelector, RouterError, RouterResult, TeleportParams};

/// Default tolerance on top of the best arrival time (seconds).
pub const DEFAULT_FEASIBILITY_SLACK_SECS: u32 = 300;

// ── Request & strategy ────────────────────────────────────────────────────────

/// One routing request between two activities.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteRequest {
    /// Origin in the scenario CRS.
    pub from:           Coord,
    /// Destination in the scenario CRS.
    pub to:             Coord,
    pub departure_time: SimTime,
    pub mode:           LegMode,
    pub person:         PersonId,
    /// Position of the trip within the person's plan.
    pub trip_index:     u32,
}

/// How a request is served.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RoutingStrategy {
    /// Query the multi-modal routing graph.
    External,
    /// Beeline passthrough with [`TeleportParams`].
    Teleport,
}

impl RoutingStrategy {
    /// `pt` and every mode that folds into it go to the graph.
    pub fn for_mode(mode: &LegMode) -> Self {
        match canonical_mode(mode) {
            LegMode::Pt => RoutingStrategy::External,
            _ => RoutingStrategy::Teleport,
        }
    }
}

// ── Config ────────────────────────────────────────────────────────────────────

/// Run-wide router settings.  Fixed for the process lifetime.
#[derive(Clone, Debug)]
pub struct TripRouterConfig {
    /// Alternatives arriving at most this long after the best are
    /// candidates for the random draw.
    pub feasibility_slack_secs: u32,

    /// Global seed for per-request RNG.
    pub seed: u64,

    /// Scenario CRS of request coordinates.
    pub crs: CoordTransform,

    /// Date and time zone every query is anchored to.
    pub service_day: ServiceDay,

    pub teleport: TeleportParams,
}

impl TripRouterConfig {
    pub fn new(service_day: ServiceDay) -> Self {
        Self {
            feasibility_slack_secs: DEFAULT_FEASIBILITY_SLACK_SECS,
            seed:                   0,
            crs:                    CoordTransform::Wgs84,
            service_day,
            teleport:               TeleportParams::default(),
        }
    }
}

// ── TripRouter ────────────────────────────────────────────────────────────────

/// Routes one trip at a time.  Shared read-only across threads.
pub struct TripRouter {
    graph:    GraphHandle,
    selector: ProfileSelector,
    config:   TripRouterConfig,
}

impl TripRouter {
    pub fn new(graph: GraphHandle, selector: ProfileSelector, config: TripRouterConfig) -> Self {
        Self { graph, selector, config }
    }

    pub fn config(&self) -> &TripRouterConfig {
        &self.config
    }

    pub fn selector(&self) -> &ProfileSelector {
        &self.selector
    }

    /// Route `req` with the deterministic per-request RNG for `iteration`.
    pub fn route(&self, req: &RouteRequest, iteration: u32) -> RouterResult<Trip> {
        let mut rng = RequestRng::new(self.config.seed, req.person, req.trip_index, iteration);
        self.route_with(req, &mut rng)
    }

    /// Route `req` drawing all random choices from `rng`.
    pub fn route_with(&self, req: &RouteRequest, rng: &mut dyn RandomSource) -> RouterResult<Trip> {
        let from = self.config.crs.to_wgs84(req.from);
        let to = self.config.crs.to_wgs84(req.to);

        match RoutingStrategy::for_mode(&req.mode) {
            RoutingStrategy::Teleport => {
                Ok(self.config.teleport.teleport(&req.mode, from, to, req.departure_time))
            }
            RoutingStrategy::External => {
                let profile = self.selector.select(rng);
                let street_mode = match req.mode {
                    LegMode::Bike => StreetMode::Bike,
                    _ => StreetMode::Walk,
                };
                let query = ItineraryQuery::new(
                    from,
                    to,
                    req.departure_time,
                    self.config.service_day,
                    profile,
                )
                .with_street_mode(street_mode);

                let candidates = self.graph.plan(&query);
                let chosen = choose_itinerary(
                    &candidates,
                    profile.num_itineraries,
                    self.config.feasibility_slack_secs,
                    rng,
                )
                .ok_or(RouterError::NoRouteFound {
                    from:      req.from,
                    to:        req.to,
                    departure: req.departure_time,
                })?;

                debug!(
                    person = req.person.0,
                    trip = req.trip_index,
                    profile = %profile.name,
                    candidates = candidates.len(),
                    arrival = %chosen.arrival(),
                    "trip routed"
                );
                itinerary_to_trip(chosen, req.departure_time)
            }
        }
    }
}

// ── Choice & conversion ───────────────────────────────────────────────────────

/// Pick one itinerary from the graph's ranked `candidates`.
///
/// Itineraries without legs are skipped; then
///
/// - none → `None`;
/// - several, and the profile asked for more than one → uniform draw among
///   those arriving no later than the best arrival + `slack_secs`;
/// - otherwise the first.  `rng` is only touched in the draw case.
pub fn choose_itinerary<'a>(
    candidates: &'a [Itinerary],
    requested:  u32,
    slack_secs: u32,
    rng:        &mut dyn RandomSource,
) -> Option<&'a Itinerary> {
    let usable: Vec<&Itinerary> = candidates.iter().filter(|c| !c.is_empty()).collect();
    let first = *usable.first()?;
    if usable.len() == 1 || requested <= 1 {
        return Some(first);
    }
    let best = usable.iter().map(|c| c.arrival()).min()?;
    let limit = best + slack_secs;
    let feasible: Vec<&Itinerary> = usable.into_iter().filter(|c| c.arrival() <= limit).collect();
    Some(feasible[rng.next_index(feasible.len())])
}

/// Convert an itinerary into simulation legs departing at `departure`.
///
/// Waiting time before a leg's start is folded into that leg, so the legs
/// are contiguous and the first departs exactly at `departure`.
pub fn itinerary_to_trip(itinerary: &Itinerary, departure: SimTime) -> RouterResult<Trip> {
    let mut clock = departure;
    let legs = itinerary
        .legs
        .iter()
        .map(|l| {
            let end = l.end.max(clock);
            let leg = Leg {
                mode:             l.mode.clone(),
                departure:        clock,
                travel_time_secs: end - clock,
                distance_m:       l.distance_m,
                from:             Some(l.from),
                to:               Some(l.to),
                line:             l.line.clone(),
            };
            clock = end;
            leg
        })
        .collect();
    Ok(Trip::new(legs)?)
}
