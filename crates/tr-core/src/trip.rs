//! `Leg` and `Trip`: the unit of work exchanged between the simulation and
//! the router.
//!
//! A `Trip` is never empty: [`Trip::new`] rejects an empty leg list, so the
//! first leg (which decides the trip's canonical mode) always exists.

use crate::{CoreError, CoreResult, GeoPoint, LegMode, SimTime};

// ── Leg ───────────────────────────────────────────────────────────────────────

/// One mode-tagged movement segment.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Leg {
    pub mode: LegMode,

    /// Departure time from the leg's start.
    pub departure: SimTime,

    /// Duration in seconds, including any wait before boarding.
    pub travel_time_secs: u32,

    /// Distance covered in metres (beeline for teleported legs).
    pub distance_m: f64,

    /// Start and end position, if known.
    pub from: Option<GeoPoint>,
    pub to:   Option<GeoPoint>,

    /// Transit line identifier for `pt` legs.
    pub line: Option<String>,
}

impl Leg {
    /// A leg with only a mode, departure, and duration.
    pub fn new(mode: LegMode, departure: SimTime, travel_time_secs: u32) -> Self {
        Self {
            mode,
            departure,
            travel_time_secs,
            distance_m: 0.0,
            from:       None,
            to:         None,
            line:       None,
        }
    }

    #[inline]
    pub fn arrival(&self) -> SimTime {
        self.departure + self.travel_time_secs
    }
}

// ── Trip ──────────────────────────────────────────────────────────────────────

/// An ordered, non-empty sequence of legs between two activities.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trip {
    legs: Vec<Leg>,
}

impl Trip {
    /// Fails with [`CoreError::EmptyTrip`] if `legs` is empty.
    pub fn new(legs: Vec<Leg>) -> CoreResult<Self> {
        if legs.is_empty() {
            return Err(CoreError::EmptyTrip);
        }
        Ok(Self { legs })
    }

    /// A one-leg trip.
    pub fn single(leg: Leg) -> Self {
        Self { legs: vec![leg] }
    }

    /// The leg whose mode decides the trip's canonical mode.
    #[inline]
    pub fn first_leg(&self) -> &Leg {
        &self.legs[0]
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    /// Always `false`; provided for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn departure(&self) -> SimTime {
        self.legs[0].departure
    }

    pub fn arrival(&self) -> SimTime {
        self.legs[self.legs.len() - 1].arrival()
    }

    /// Door-to-door duration in seconds.
    pub fn travel_time_secs(&self) -> u32 {
        self.arrival().saturating_since(self.departure())
    }

    pub fn distance_m(&self) -> f64 {
        self.legs.iter().map(|l| l.distance_m).sum()
    }
}
