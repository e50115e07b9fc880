//! Unit tests for tr-router.
//!
//! The routing graph is replaced by scripted doubles so every dispatch
//! decision can be asserted exactly.

#[cfg(test)]
mod helpers {
    use std::sync::Mutex;

    use tr_core::{Coord, CoordTransform, GeoPoint, LegMode, PersonId, ServiceDay, SimTime};
    use tr_graph::{
        GraphHandle, Itinerary, ItineraryLeg, ItineraryQuery, ParameterProfile, RoutingGraph,
        StreetMode,
    };

    use crate::{ProfileSelector, RouteRequest, TripRouter, TripRouterConfig};

    pub fn t(h: u32, m: u32) -> SimTime {
        SimTime::from_hms(h, m, 0)
    }

    pub fn day() -> ServiceDay {
        ServiceDay::parse("2024-06-03", "Europe/Berlin").unwrap()
    }

    fn leg(mode: LegMode, start: SimTime, end: SimTime, line: Option<&str>) -> ItineraryLeg {
        ItineraryLeg {
            mode,
            from: GeoPoint::new(52.50, 13.40),
            to: GeoPoint::new(52.51, 13.41),
            start,
            end,
            distance_m: 100.0,
            line: line.map(str::to_owned),
        }
    }

    /// `[teleport-begin, pt, transit_walk, pt, teleport-end]` arriving at
    /// `arrival`.
    pub fn transit_itinerary(arrival: SimTime) -> Itinerary {
        let a = arrival.secs();
        let at = |back_secs: u32| SimTime(a - back_secs);
        Itinerary::new(vec![
            leg(LegMode::TeleportBeginEnd, at(1_800), at(1_700), None),
            leg(LegMode::Pt, at(1_500), at(900), Some("U2")),
            leg(LegMode::TransitWalk, at(900), at(800), None),
            leg(LegMode::Pt, at(600), at(120), Some("S5")),
            leg(LegMode::TeleportBeginEnd, at(120), arrival, None),
        ])
    }

    /// Graph double returning a fixed candidate list and recording every
    /// query it sees.
    pub struct ScriptedGraph {
        pub candidates: Vec<Itinerary>,
        pub seen:       Mutex<Vec<(String, StreetMode)>>,
    }

    impl ScriptedGraph {
        pub fn new(candidates: Vec<Itinerary>) -> Self {
            Self { candidates, seen: Mutex::new(Vec::new()) }
        }
    }

    impl RoutingGraph for ScriptedGraph {
        fn plan(&self, query: &ItineraryQuery<'_>) -> Vec<Itinerary> {
            self.seen
                .lock()
                .unwrap()
                .push((query.profile.name.clone(), query.street_mode));
            let mut out = self.candidates.clone();
            out.truncate(query.profile.num_itineraries as usize);
            out
        }
    }

    /// Shared-graph wrapper so a test can keep inspecting the double after
    /// handing it to the router.
    pub struct Shared(pub std::sync::Arc<ScriptedGraph>);

    impl RoutingGraph for Shared {
        fn plan(&self, query: &ItineraryQuery<'_>) -> Vec<Itinerary> {
            self.0.plan(query)
        }
    }

    pub fn named(name: &str, num_itineraries: u32) -> ParameterProfile {
        ParameterProfile { name: name.to_owned(), num_itineraries, ..ParameterProfile::default() }
    }

    pub fn router(
        graph:     std::sync::Arc<ScriptedGraph>,
        profiles:  Vec<ParameterProfile>,
        randomize: bool,
        draw:      usize,
    ) -> TripRouter {
        let selector = ProfileSelector::new(profiles, randomize, draw).unwrap();
        let config = TripRouterConfig {
            crs: CoordTransform::LocalTangent { origin: GeoPoint::new(52.52, 13.40) },
            seed: 7,
            ..TripRouterConfig::new(day())
        };
        TripRouter::new(GraphHandle::new(Shared(graph)), selector, config)
    }

    pub fn request(mode: LegMode) -> RouteRequest {
        RouteRequest {
            from:           Coord::new(0.0, 0.0),
            to:             Coord::new(3_000.0, 4_000.0),
            departure_time: t(7, 45),
            mode,
            person:         PersonId(3),
            trip_index:     0,
        }
    }
}

// ── Mode classifier ───────────────────────────────────────────────────────────

#[cfg(test)]
mod classify {
    use tr_core::{Leg, LegMode, SimTime, Trip};
    use crate::{canonical_mode, classify, MainModeIdentifier, TransitMainModeIdentifier};

    fn trip_of(modes: &[LegMode]) -> Trip {
        Trip::new(modes.iter().map(|m| Leg::new(m.clone(), SimTime(0), 60)).collect()).unwrap()
    }

    #[test]
    fn transit_access_modes_fold_to_pt() {
        for m in [
            LegMode::Walk,
            LegMode::Bike,
            LegMode::TransitWalk,
            LegMode::TeleportBeginEnd,
            LegMode::TeleportTransitStopArea,
        ] {
            assert_eq!(classify(&trip_of(&[m.clone()])), LegMode::Pt, "{m}");
        }
    }

    #[test]
    fn other_modes_unchanged() {
        for m in [LegMode::Car, LegMode::Pt, LegMode::Other("ride".to_owned())] {
            assert_eq!(classify(&trip_of(&[m.clone()])), m);
        }
    }

    #[test]
    fn only_first_leg_counts() {
        let trip = trip_of(&[LegMode::Car, LegMode::Walk, LegMode::Pt]);
        assert_eq!(classify(&trip), LegMode::Car);
        let trip = trip_of(&[LegMode::TransitWalk, LegMode::Car]);
        assert_eq!(classify(&trip), LegMode::Pt);
    }

    #[test]
    fn identifier_trait_object() {
        let id: Box<dyn MainModeIdentifier> = Box::new(TransitMainModeIdentifier);
        let trip = trip_of(&[LegMode::TeleportBeginEnd, LegMode::Pt]);
        assert_eq!(id.identify_main_mode(&trip), LegMode::Pt);
        assert_eq!(canonical_mode(&LegMode::Car), LegMode::Car);
    }
}

// ── Profile selector ──────────────────────────────────────────────────────────

#[cfg(test)]
mod selector {
    use tr_core::{FixedSequence, SimRng};
    use tr_graph::ParameterProfile;
    use crate::{ProfileSelector, RouterError};

    #[test]
    fn empty_profiles_rejected() {
        let err = ProfileSelector::new(Vec::new(), false, 1).unwrap_err();
        assert!(matches!(err, RouterError::InvalidProfileConfiguration(_)));
    }

    #[test]
    fn draw_count_bounds() {
        let five = ParameterProfile::defaults();
        assert!(ProfileSelector::new(five.clone(), true, 0).is_err());
        assert!(ProfileSelector::new(five.clone(), true, 6).is_err());
        assert!(ProfileSelector::new(five.clone(), true, 5).is_ok());
        // Ignored without randomisation.
        assert!(ProfileSelector::new(five, false, 0).is_ok());
    }

    #[test]
    fn invalid_profile_rejected() {
        let bad = ParameterProfile { walk_speed_mps: 0.0, ..ParameterProfile::default() };
        let err = ProfileSelector::new(vec![bad], false, 1).unwrap_err();
        assert!(matches!(err, RouterError::InvalidProfileConfiguration(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn fixed_selection_is_first_and_draws_nothing() {
        let sel = ProfileSelector::new(ParameterProfile::defaults(), false, 3).unwrap();
        let mut rng = FixedSequence::new(vec![4, 2, 1]);
        for _ in 0..100 {
            assert_eq!(sel.select_index(&mut rng), 0);
        }
        assert_eq!(rng.draws(), 0);
        assert_eq!(sel.select(&mut rng).name, "quick");
    }

    #[test]
    fn randomized_three_of_five() {
        let sel = ProfileSelector::new(ParameterProfile::defaults(), true, 3).unwrap();
        let n = 30_000;
        let mut counts = [0usize; 5];
        let mut rng = SimRng::new(42);
        for _ in 0..n {
            counts[sel.select_index(&mut rng)] += 1;
        }
        assert_eq!(counts[3] + counts[4], 0);
        for &c in &counts[..3] {
            let share = c as f64 / n as f64;
            assert!((share - 1.0 / 3.0).abs() < 0.02, "share {share}");
        }
    }

    #[test]
    fn randomized_sequence_reproducible() {
        let sel = ProfileSelector::new(ParameterProfile::defaults(), true, 3).unwrap();
        let draw = |seed| {
            let mut rng = SimRng::new(seed);
            (0..50).map(|_| sel.select_index(&mut rng)).collect::<Vec<_>>()
        };
        assert_eq!(draw(42), draw(42));
        assert_ne!(draw(42), draw(43));
    }

    #[test]
    fn scripted_source_picks_exact_profiles() {
        let sel = ProfileSelector::new(ParameterProfile::defaults(), true, 3).unwrap();
        let mut rng = FixedSequence::new(vec![2, 0, 1]);
        let names: Vec<&str> = (0..3).map(|_| sel.select(&mut rng).name.as_str()).collect();
        assert_eq!(names, ["less_walking", "quick", "fewer_transfers"]);
    }
}

// ── Teleport strategy ─────────────────────────────────────────────────────────

#[cfg(test)]
mod teleport {
    use tr_core::{GeoPoint, LegMode, SimTime};
    use crate::TeleportParams;

    #[test]
    fn car_uses_car_speed_and_detour() {
        let p = TeleportParams::default();
        let a = GeoPoint::new(52.50, 13.40);
        let b = GeoPoint::new(52.51, 13.40);
        let beeline = a.distance_m(b);
        let trip = p.teleport(&LegMode::Car, a, b, SimTime::from_hms(8, 0, 0));
        assert_eq!(trip.len(), 1);
        let leg = trip.first_leg();
        assert_eq!(leg.mode, LegMode::Car);
        assert!((leg.distance_m - beeline * 1.3).abs() < 1e-9);
        assert_eq!(leg.travel_time_secs, (beeline * 1.3 / 8.3).ceil() as u32);
    }

    #[test]
    fn unknown_mode_uses_default_speed() {
        let p = TeleportParams::default();
        assert_eq!(p.speed_for(&LegMode::Other("ride".to_owned())), 4.2);
        assert_eq!(p.speed_for(&LegMode::Car), 8.3);
    }

    #[test]
    fn validation() {
        assert!(TeleportParams::default().validate().is_ok());
        let short = TeleportParams { beeline_distance_factor: 0.9, ..TeleportParams::default() };
        assert!(short.validate().is_err());
        let mut stalled = TeleportParams::default();
        stalled.mode_speeds_mps.insert("ride".to_owned(), 0.0);
        assert!(stalled.validate().is_err());
    }

    #[test]
    fn zero_distance_is_instant() {
        let p = TeleportParams::default();
        let a = GeoPoint::new(52.50, 13.40);
        let trip = p.teleport(&LegMode::Car, a, a, SimTime(100));
        assert_eq!(trip.travel_time_secs(), 0);
    }
}

// ── Dispatcher ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod dispatch {
    use std::sync::Arc;

    use tr_core::{FixedSequence, LegMode, PersonId};
    use tr_graph::{Itinerary, ParameterProfile, StreetMode};

    use crate::{
        choose_itinerary, classify, itinerary_to_trip, RouterError, RoutingStrategy, TripRouter,
    };
    use super::helpers::{named, request, router, t, transit_itinerary, ScriptedGraph};

    #[test]
    fn strategy_by_mode() {
        for m in [LegMode::Pt, LegMode::Walk, LegMode::Bike, LegMode::TransitWalk] {
            assert_eq!(RoutingStrategy::for_mode(&m), RoutingStrategy::External);
        }
        for m in [LegMode::Car, LegMode::Other("ride".to_owned())] {
            assert_eq!(RoutingStrategy::for_mode(&m), RoutingStrategy::Teleport);
        }
    }

    #[test]
    fn slack_bounds_the_feasible_set() {
        let candidates = vec![
            transit_itinerary(t(8, 20)),
            transit_itinerary(t(8, 22)),
            transit_itinerary(t(8, 35)),
        ];
        let mut rng = FixedSequence::new((0..30).collect());
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..30 {
            let it = choose_itinerary(&candidates, 3, 300, &mut rng).unwrap();
            seen.insert(it.arrival());
        }
        assert_eq!(seen.into_iter().collect::<Vec<_>>(), vec![t(8, 20), t(8, 22)]);
    }

    #[test]
    fn single_alternative_takes_first_without_drawing() {
        let candidates = vec![transit_itinerary(t(8, 22)), transit_itinerary(t(8, 20))];
        let mut rng = FixedSequence::new(vec![1]);
        let it = choose_itinerary(&candidates, 1, 300, &mut rng).unwrap();
        assert_eq!(it.arrival(), t(8, 22));
        let it = choose_itinerary(&candidates[..1], 3, 300, &mut rng).unwrap();
        assert_eq!(it.arrival(), t(8, 22));
        assert_eq!(rng.draws(), 0);
        assert!(choose_itinerary(&[], 3, 300, &mut rng).is_none());
    }

    #[test]
    fn itinerary_converts_to_pt_trip() {
        let it = transit_itinerary(t(8, 20));
        let trip = itinerary_to_trip(&it, t(7, 45)).unwrap();
        let modes: Vec<LegMode> = trip.legs().iter().map(|l| l.mode.clone()).collect();
        assert_eq!(
            modes,
            vec![
                LegMode::TeleportBeginEnd,
                LegMode::Pt,
                LegMode::TransitWalk,
                LegMode::Pt,
                LegMode::TeleportBeginEnd,
            ]
        );
        assert_eq!(classify(&trip), LegMode::Pt);
        assert_eq!(trip.departure(), t(7, 45));
        assert_eq!(trip.arrival(), t(8, 20));
        // Legs are contiguous.
        for w in trip.legs().windows(2) {
            assert_eq!(w[0].arrival(), w[1].departure);
        }
        assert_eq!(trip.legs()[1].line.as_deref(), Some("U2"));
    }

    #[test]
    fn zero_itineraries_is_no_route() {
        let graph = Arc::new(ScriptedGraph::new(Vec::new()));
        let r = router(graph.clone(), vec![named("quick", 3)], false, 1);
        let err = r.route(&request(LegMode::Pt), 0).unwrap_err();
        assert!(matches!(err, RouterError::NoRouteFound { .. }));
        assert!(err.is_recoverable());
        assert_eq!(graph.seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn legless_candidates_are_skipped() {
        let empty = || Itinerary { legs: Vec::new() };

        let graph = Arc::new(ScriptedGraph::new(vec![transit_itinerary(t(8, 20)), empty()]));
        let r = router(graph, vec![named("quick", 3)], false, 1);
        let trip = r.route(&request(LegMode::Pt), 0).unwrap();
        assert_eq!(trip.arrival(), t(8, 20));

        let graph = Arc::new(ScriptedGraph::new(vec![empty(), empty()]));
        let r = router(graph, vec![named("quick", 3)], false, 1);
        let err = r.route(&request(LegMode::Pt), 0).unwrap_err();
        assert!(matches!(err, RouterError::NoRouteFound { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn identical_requests_are_idempotent() {
        let graph = Arc::new(ScriptedGraph::new(vec![
            transit_itinerary(t(8, 20)),
            transit_itinerary(t(8, 22)),
        ]));
        let r = router(graph.clone(), ParameterProfile::defaults(), false, 1);
        let req = request(LegMode::Pt);
        let a = r.route(&req, 0).unwrap();
        let b = r.route(&req, 0).unwrap();
        assert_eq!(a, b);
        let seen = graph.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|(name, _)| name == "quick"));
    }

    #[test]
    fn seeded_route_is_deterministic_with_randomization() {
        let graph = Arc::new(ScriptedGraph::new(vec![
            transit_itinerary(t(8, 20)),
            transit_itinerary(t(8, 22)),
            transit_itinerary(t(8, 24)),
        ]));
        let r = router(graph, ParameterProfile::defaults(), true, 3);
        for person in 0..20 {
            let req = crate::RouteRequest { person: PersonId(person), ..request(LegMode::Pt) };
            assert_eq!(r.route(&req, 2).unwrap(), r.route(&req, 2).unwrap());
        }
    }

    #[test]
    fn injected_source_drives_profile_and_alternative() {
        let graph = Arc::new(ScriptedGraph::new(vec![
            transit_itinerary(t(8, 20)),
            transit_itinerary(t(8, 22)),
        ]));
        let r = router(graph.clone(), ParameterProfile::defaults(), true, 3);
        // First draw picks profile 1, second picks alternative 1.
        let mut rng = FixedSequence::new(vec![1, 1]);
        let trip = r.route_with(&request(LegMode::Pt), &mut rng).unwrap();
        assert_eq!(trip.arrival(), t(8, 22));
        assert_eq!(rng.draws(), 2);
        assert_eq!(graph.seen.lock().unwrap()[0].0, "fewer_transfers");
    }

    #[test]
    fn teleported_modes_bypass_graph() {
        let graph = Arc::new(ScriptedGraph::new(vec![transit_itinerary(t(8, 20))]));
        let r = router(graph.clone(), vec![named("quick", 1)], false, 1);
        let trip = r.route(&request(LegMode::Car), 0).unwrap();
        assert_eq!(trip.len(), 1);
        assert_eq!(trip.first_leg().mode, LegMode::Car);
        // 5 km in the local CRS → 6.5 km at 8.3 m/s.
        assert!((trip.distance_m() - 6_500.0).abs() < 10.0, "got {}", trip.distance_m());
        assert!(graph.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn street_mode_follows_request_mode() {
        let graph = Arc::new(ScriptedGraph::new(vec![transit_itinerary(t(8, 20))]));
        let r = router(graph.clone(), vec![named("quick", 1)], false, 1);
        r.route(&request(LegMode::Walk), 0).unwrap();
        r.route(&request(LegMode::Bike), 0).unwrap();
        let seen = graph.seen.lock().unwrap();
        assert_eq!(seen[0].1, StreetMode::Walk);
        assert_eq!(seen[1].1, StreetMode::Bike);
    }

    #[test]
    fn shared_router_matches_across_threads() {
        let graph = Arc::new(ScriptedGraph::new(vec![
            transit_itinerary(t(8, 20)),
            transit_itinerary(t(8, 22)),
            transit_itinerary(t(8, 24)),
        ]));
        let r = router(graph, ParameterProfile::defaults(), true, 3);
        let requests: Vec<crate::RouteRequest> = (0..40)
            .map(|p| crate::RouteRequest { person: PersonId(p), ..request(LegMode::Pt) })
            .collect();
        let sequential: Vec<_> = requests.iter().map(|q| r.route(q, 1).unwrap()).collect();

        let threaded: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = requests
                .chunks(10)
                .map(|chunk| {
                    let r = &r;
                    scope.spawn(move || {
                        chunk.iter().map(|q| r.route(q, 1).unwrap()).collect::<Vec<_>>()
                    })
                })
                .collect();
            handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(threaded, sequential);
    }

    #[test]
    fn router_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TripRouter>();
    }
}
