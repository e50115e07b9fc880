//! Earliest-arrival connection scan over a [`TimetableGraph`].
//!
//! # Algorithm
//!
//! 1. **Access**: every stop within `max_walk_distance_m` of the origin is
//!    reached by a beeline walk (or ride, for bike street mode).
//! 2. **Scan**: connections are visited in departure order from the query
//!    time.  A connection is usable if its trip was already boarded or its
//!    departure stop is reached in time (plus `min_transfer_secs` after a
//!    previous ride).  Improving a stop's arrival relaxes its footpaths.
//!    The scan stops once departures pass the best arrival at the
//!    destination.
//! 3. **Egress**: the best stop within walking range of the destination
//!    wins; the journey is rebuilt from per-stop labels.
//!
//! Alternatives are found by re-scanning from just after the latest
//! departure that still catches the previous alternative's first vehicle.
//! A walk-only (or bike-only) itinerary is offered alongside when the
//! destination lies within `max_walk_distance_m`.
//!
//! `max_transfers` prunes boardings; it does not search for the best
//! journey under the bound.

use std::time::{Duration, Instant};

use tracing::debug;

use tr_core::{LegMode, SimTime, StopId};

use crate::{
    Itinerary, ItineraryLeg, ItineraryQuery, Optimize, RoutingGraph, StreetMode, TimetableGraph,
};

/// How many connections are scanned between deadline checks.
const DEADLINE_CHECK_INTERVAL: usize = 1024;

const UNREACHED: u32 = u32::MAX;

// ── Labels ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug)]
enum Reached {
    Unreached,
    Access { distance_m: f64 },
    Ride { board: usize, alight: usize },
    Footpath { from: StopId, start: u32, distance_m: f64, same_area: bool },
}

#[derive(Copy, Clone, Debug)]
struct Label {
    arrival: u32,
    rides:   u32,
    via:     Reached,
}

impl Label {
    const UNREACHED: Label = Label { arrival: UNREACHED, rides: 0, via: Reached::Unreached };
}

enum ScanOutcome {
    Found(Itinerary),
    NotFound,
    TimedOut,
}

#[inline]
fn travel_secs(distance_m: f64, speed_mps: f64) -> u32 {
    (distance_m / speed_mps).ceil() as u32
}

// ── RoutingGraph impl ─────────────────────────────────────────────────────────

impl RoutingGraph for TimetableGraph {
    fn plan(&self, query: &ItineraryQuery<'_>) -> Vec<Itinerary> {
        let started = Instant::now();
        let deadline = query
            .profile
            .search_timeout_ms
            .map(|ms| started + Duration::from_millis(ms));
        let wanted = query.profile.num_itineraries.max(1) as usize;

        let mut candidates: Vec<Itinerary> = Vec::with_capacity(wanted + 1);
        if let Some(direct) = self.direct_itinerary(query) {
            candidates.push(direct);
        }

        let mut depart = query.departure;
        for _ in 0..wanted {
            match self.earliest_arrival(query, depart, deadline) {
                ScanOutcome::Found(itinerary) => {
                    let Some(next) = latest_departure(&itinerary) else { break };
                    depart = next + 1;
                    if !candidates.contains(&itinerary) {
                        candidates.push(itinerary);
                    }
                }
                ScanOutcome::NotFound => break,
                ScanOutcome::TimedOut => {
                    debug!(
                        profile = %query.profile.name,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "itinerary search timed out"
                    );
                    return Vec::new();
                }
            }
        }

        rank(&mut candidates, query.profile.optimize);
        candidates.truncate(wanted);
        debug!(
            from = %query.from,
            to = %query.to,
            departure = %query.departure,
            profile = %query.profile.name,
            found = candidates.len(),
            "itinerary search finished"
        );
        candidates
    }
}

/// Latest time one could leave the origin and still catch the first vehicle.
fn latest_departure(itinerary: &Itinerary) -> Option<SimTime> {
    let boarding = itinerary.first_boarding()?;
    let access = itinerary.legs[0].duration_secs();
    Some(SimTime(boarding.0.saturating_sub(access)))
}

fn rank(candidates: &mut [Itinerary], optimize: Optimize) {
    match optimize {
        Optimize::Quick => {
            candidates.sort_by_key(|it| (it.arrival(), it.transfers()));
        }
        Optimize::Transfers => {
            candidates.sort_by_key(|it| (it.transfers(), it.arrival()));
        }
        Optimize::Walking => {
            candidates.sort_by(|a, b| {
                a.walk_distance_m()
                    .total_cmp(&b.walk_distance_m())
                    .then(a.arrival().cmp(&b.arrival()))
            });
        }
    }
}

impl TimetableGraph {
    /// Street-only itinerary, if the destination is within range.
    fn direct_itinerary(&self, query: &ItineraryQuery<'_>) -> Option<Itinerary> {
        let distance_m = query.from.distance_m(query.to);
        if distance_m > query.profile.max_walk_distance_m {
            return None;
        }
        let mode = match query.street_mode {
            StreetMode::Walk => LegMode::TransitWalk,
            StreetMode::Bike => LegMode::Bike,
        };
        Some(Itinerary::new(vec![ItineraryLeg {
            mode,
            from: query.from,
            to: query.to,
            start: query.departure,
            end: query.departure + travel_secs(distance_m, query.street_speed_mps()),
            distance_m,
            line: None,
        }]))
    }

    fn earliest_arrival(
        &self,
        query:    &ItineraryQuery<'_>,
        depart:   SimTime,
        deadline: Option<Instant>,
    ) -> ScanOutcome {
        let profile = query.profile;
        let street_speed = query.street_speed_mps();
        let radius = profile.max_walk_distance_m;

        // ── Access ────────────────────────────────────────────────────────
        let mut labels = vec![Label::UNREACHED; self.stop_count()];
        let access = self.stops_within(query.from, radius);
        if access.is_empty() {
            return ScanOutcome::NotFound;
        }
        for &(stop, distance_m) in &access {
            labels[stop.index()] = Label {
                arrival: depart.0 + travel_secs(distance_m, street_speed),
                rides:   0,
                via:     Reached::Access { distance_m },
            };
        }

        // ── Egress candidates ─────────────────────────────────────────────
        let mut egress: Vec<Option<(u32, f64)>> = vec![None; self.stop_count()];
        let egress_stops = self.stops_within(query.to, radius);
        if egress_stops.is_empty() {
            return ScanOutcome::NotFound;
        }
        for &(stop, distance_m) in &egress_stops {
            egress[stop.index()] = Some((travel_secs(distance_m, street_speed), distance_m));
        }

        // ── Scan ──────────────────────────────────────────────────────────
        let max_rides = profile.max_transfers.saturating_add(1);
        let mut boarded: Vec<Option<(usize, u32)>> = vec![None; self.trip_lines.len()];
        let mut best_target = UNREACHED;

        let improve_target = |labels: &[Label], stop: StopId, best: &mut u32| {
            let label = labels[stop.index()];
            if label.rides > 0 {
                if let Some((secs, _)) = egress[stop.index()] {
                    *best = (*best).min(label.arrival.saturating_add(secs));
                }
            }
        };

        let first = self.first_connection_at(depart);
        for (i, c) in self.connections.iter().enumerate().skip(first) {
            if (i - first) % DEADLINE_CHECK_INTERVAL == 0
                && deadline.is_some_and(|d| Instant::now() >= d)
            {
                return ScanOutcome::TimedOut;
            }
            if c.departure.0 >= best_target {
                break;
            }

            let ride = match boarded[c.trip.index()] {
                Some(b) => b,
                None => {
                    let from = labels[c.from.index()];
                    let slack = if from.rides > 0 { profile.min_transfer_secs } else { 0 };
                    if from.arrival == UNREACHED
                        || from.arrival.saturating_add(slack) > c.departure.0
                        || from.rides >= max_rides
                    {
                        continue;
                    }
                    let b = (i, from.rides + 1);
                    boarded[c.trip.index()] = Some(b);
                    b
                }
            };

            let (board, rides) = ride;
            let arrival = c.arrival.0;
            if arrival >= labels[c.to.index()].arrival {
                continue;
            }
            labels[c.to.index()] = Label { arrival, rides, via: Reached::Ride { board, alight: i } };
            improve_target(&labels, c.to, &mut best_target);

            for fp in self.footpaths(c.to) {
                let t = arrival + travel_secs(fp.distance_m, profile.walk_speed_mps);
                if t < labels[fp.to.index()].arrival {
                    labels[fp.to.index()] = Label {
                        arrival: t,
                        rides,
                        via: Reached::Footpath {
                            from:       c.to,
                            start:      arrival,
                            distance_m: fp.distance_m,
                            same_area:  fp.same_area,
                        },
                    };
                    improve_target(&labels, fp.to, &mut best_target);
                }
            }
        }

        // ── Egress ────────────────────────────────────────────────────────
        let best = egress_stops
            .iter()
            .filter(|(s, _)| labels[s.index()].rides > 0)
            .filter_map(|&(s, _)| {
                egress[s.index()].map(|(secs, _)| (labels[s.index()].arrival.saturating_add(secs), s))
            })
            .min();
        let Some((_, stop)) = best else {
            return ScanOutcome::NotFound;
        };

        match self.reconstruct(query, depart, &labels, stop, egress[stop.index()]) {
            Some(itinerary) => ScanOutcome::Found(itinerary),
            None => ScanOutcome::NotFound,
        }
    }

    /// Walk labels back from the egress stop to the origin.
    fn reconstruct(
        &self,
        query:  &ItineraryQuery<'_>,
        depart: SimTime,
        labels: &[Label],
        egress_stop: StopId,
        egress: Option<(u32, f64)>,
    ) -> Option<Itinerary> {
        let (egress_secs, egress_m) = egress?;
        let arrival = labels[egress_stop.index()].arrival;

        let mut legs = vec![ItineraryLeg {
            mode:       LegMode::TeleportBeginEnd,
            from:       self.stop(egress_stop).pos,
            to:         query.to,
            start:      SimTime(arrival),
            end:        SimTime(arrival + egress_secs),
            distance_m: egress_m,
            line:       None,
        }];

        let mut cur = egress_stop;
        // Each step moves strictly back in time; the bound only guards
        // against a corrupt label chain.
        for _ in 0..=2 * self.stop_count() {
            let label = labels[cur.index()];
            match label.via {
                Reached::Unreached => return None,
                Reached::Access { distance_m } => {
                    legs.push(ItineraryLeg {
                        mode: LegMode::TeleportBeginEnd,
                        from: query.from,
                        to: self.stop(cur).pos,
                        start: depart,
                        end: SimTime(label.arrival),
                        distance_m,
                        line: None,
                    });
                    legs.reverse();
                    return Some(Itinerary::new(legs));
                }
                Reached::Ride { board, alight } => {
                    let b = self.connections[board];
                    let a = self.connections[alight];
                    legs.push(ItineraryLeg {
                        mode:       LegMode::Pt,
                        from:       self.stop(b.from).pos,
                        to:         self.stop(a.to).pos,
                        start:      b.departure,
                        end:        a.arrival,
                        distance_m: self.ride_distance_m(board, alight),
                        line:       Some(self.trip_line(b.trip).to_owned()),
                    });
                    cur = b.from;
                }
                Reached::Footpath { from, start, distance_m, same_area } => {
                    let mode = if same_area {
                        LegMode::TeleportTransitStopArea
                    } else {
                        LegMode::TransitWalk
                    };
                    legs.push(ItineraryLeg {
                        mode,
                        from: self.stop(from).pos,
                        to: self.stop(cur).pos,
                        start: SimTime(start),
                        end: SimTime(label.arrival),
                        distance_m,
                        line: None,
                    });
                    cur = from;
                }
            }
        }
        None
    }

    /// Stop-to-stop distance along one trip from hop `board` to hop `alight`.
    fn ride_distance_m(&self, board: usize, alight: usize) -> f64 {
        let trip = self.connections[board].trip;
        self.connections[board..=alight]
            .iter()
            .filter(|c| c.trip == trip)
            .map(|c| self.stop(c.from).pos.distance_m(self.stop(c.to).pos))
            .sum()
    }
}
