//! Unit tests for tr-core primitives.

#[cfg(test)]
mod ids {
    use crate::{PersonId, StopId};

    #[test]
    fn index_roundtrip() {
        let id = PersonId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(PersonId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinel_is_max() {
        assert_eq!(StopId::INVALID.0, u32::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(StopId(7).to_string(), "StopId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::{Coord, CoordTransform, GeoPoint};

    #[test]
    fn one_degree_latitude() {
        let a = GeoPoint::new(52.0, 13.0);
        let b = GeoPoint::new(53.0, 13.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 50.0, "got {d}");
    }

    #[test]
    fn wgs84_transform_swaps_axes() {
        let t = CoordTransform::Wgs84;
        let p = t.to_wgs84(Coord::new(13.4, 52.5));
        assert_eq!(p, GeoPoint::new(52.5, 13.4));
        assert_eq!(t.from_wgs84(p), Coord::new(13.4, 52.5));
    }

    #[test]
    fn local_tangent_roundtrip_and_scale() {
        let origin = GeoPoint::new(52.52, 13.40);
        let t = CoordTransform::LocalTangent { origin };
        assert_eq!(t.to_wgs84(Coord::new(0.0, 0.0)), origin);

        let p = t.to_wgs84(Coord::new(1_000.0, 2_000.0));
        let back = t.from_wgs84(p);
        assert!((back.x - 1_000.0).abs() < 1e-6);
        assert!((back.y - 2_000.0).abs() < 1e-6);

        // Projected distance agrees with haversine within 0.5 %.
        let d = origin.distance_m(p);
        let expected = Coord::new(0.0, 0.0).distance(Coord::new(1_000.0, 2_000.0));
        assert!((d - expected).abs() / expected < 0.005, "got {d}");
    }
}

#[cfg(test)]
mod time {
    use crate::{ServiceDay, SimTime};

    #[test]
    fn hms_and_display() {
        let t = SimTime::from_hms(8, 5, 3);
        assert_eq!(t.0, 8 * 3600 + 5 * 60 + 3);
        assert_eq!(t.hms(), (8, 5, 3));
        assert_eq!(t.to_string(), "08:05:03");
        assert_eq!(SimTime::from_hms(25, 0, 0).to_string(), "25:00:00");
    }

    #[test]
    fn parse() {
        assert_eq!("08:20".parse::<SimTime>().unwrap(), SimTime::from_hms(8, 20, 0));
        assert_eq!("17:00:30".parse::<SimTime>().unwrap(), SimTime::from_hms(17, 0, 30));
        assert!("8".parse::<SimTime>().is_err());
        assert!("08:61".parse::<SimTime>().is_err());
        assert!("aa:bb".parse::<SimTime>().is_err());
    }

    #[test]
    fn arithmetic() {
        let t = SimTime::from_hms(8, 0, 0);
        assert_eq!(t + 60, SimTime::from_hms(8, 1, 0));
        assert_eq!(SimTime::from_hms(8, 1, 0) - t, 60);
        assert_eq!(t.saturating_since(SimTime::from_hms(9, 0, 0)), 0);
    }

    #[test]
    fn service_day_anchors_local_midnight() {
        let day = ServiceDay::parse("2024-06-03", "Europe/Berlin").unwrap();
        let instant = day.at(SimTime::from_hms(8, 0, 0)).unwrap();
        assert_eq!(instant.to_rfc3339(), "2024-06-03T08:00:00+02:00");
    }

    #[test]
    fn service_day_rejects_garbage() {
        assert!(ServiceDay::parse("2024-13-01", "Europe/Berlin").is_err());
        assert!(ServiceDay::parse("2024-06-03", "Mars/Olympus").is_err());
        // DST began at 00:00 in São Paulo on this date: no local midnight.
        let err = ServiceDay::parse("2018-11-04", "America/Sao_Paulo").unwrap_err();
        assert!(err.to_string().contains("no local midnight"), "got {err}");
    }
}

#[cfg(test)]
mod rng {
    use crate::{FixedSequence, PersonId, RandomSource, RequestRng, SimRng};

    #[test]
    fn request_rng_is_deterministic() {
        let mut a = RequestRng::new(12345, PersonId(3), 1, 0);
        let mut b = RequestRng::new(12345, PersonId(3), 1, 0);
        for _ in 0..100 {
            assert_eq!(a.next_index(1000), b.next_index(1000));
        }
    }

    #[test]
    fn request_identity_changes_stream() {
        let draw = |p, t, i| {
            let mut r = RequestRng::new(1, PersonId(p), t, i);
            (0..8).map(|_| r.next_index(1 << 20)).collect::<Vec<_>>()
        };
        let base = draw(0, 0, 0);
        assert_ne!(base, draw(1, 0, 0));
        assert_ne!(base, draw(0, 1, 0));
        assert_ne!(base, draw(0, 0, 1));
    }

    #[test]
    fn next_index_in_bounds() {
        let mut rng = SimRng::new(7);
        for _ in 0..1000 {
            assert!(rng.next_index(3) < 3);
        }
    }

    #[test]
    fn fixed_sequence_cycles_and_wraps() {
        let mut s = FixedSequence::new(vec![0, 4, 1]);
        assert_eq!(s.next_index(5), 0);
        assert_eq!(s.next_index(3), 1); // 4 % 3
        assert_eq!(s.next_index(5), 1);
        assert_eq!(s.next_index(5), 0);
        assert_eq!(s.draws(), 4);
    }
}

#[cfg(test)]
mod mode {
    use crate::LegMode;

    #[test]
    fn known_tags_roundtrip() {
        for tag in [
            "walk",
            "bike",
            "car",
            "pt",
            "transit_walk",
            "teleport_begin_or_end",
            "teleport_transit_stop_area",
        ] {
            let mode: LegMode = tag.parse().unwrap();
            assert!(!matches!(mode, LegMode::Other(_)), "{tag} parsed as Other");
            assert_eq!(mode.to_string(), tag);
        }
    }

    #[test]
    fn unknown_tag_passes_through() {
        let mode = LegMode::from("ride");
        assert_eq!(mode, LegMode::Other("ride".into()));
        assert_eq!(String::from(mode), "ride");
    }

    #[test]
    fn placeholders() {
        assert!(LegMode::TeleportBeginEnd.is_teleport_placeholder());
        assert!(LegMode::TeleportTransitStopArea.is_teleport_placeholder());
        assert!(!LegMode::TransitWalk.is_teleport_placeholder());
    }
}

#[cfg(test)]
mod trip {
    use crate::{CoreError, Leg, LegMode, SimTime, Trip};

    #[test]
    fn empty_trip_rejected() {
        assert!(matches!(Trip::new(vec![]), Err(CoreError::EmptyTrip)));
    }

    #[test]
    fn timing_spans_all_legs() {
        let t0 = SimTime::from_hms(8, 0, 0);
        let mut a = Leg::new(LegMode::TeleportBeginEnd, t0, 300);
        a.distance_m = 350.0;
        let mut b = Leg::new(LegMode::Pt, t0 + 300, 900);
        b.distance_m = 6_000.0;
        let trip = Trip::new(vec![a, b]).unwrap();

        assert_eq!(trip.len(), 2);
        assert_eq!(trip.first_leg().mode, LegMode::TeleportBeginEnd);
        assert_eq!(trip.departure(), t0);
        assert_eq!(trip.arrival(), SimTime::from_hms(8, 20, 0));
        assert_eq!(trip.travel_time_secs(), 1_200);
        assert!((trip.distance_m() - 6_350.0).abs() < 1e-9);
    }
}
