//! Routing-graph results.

use tr_core::{GeoPoint, LegMode, SimTime};

/// One leg of an [`Itinerary`] as returned by the graph.
///
/// `start` is when the movement begins (boarding time for `pt` legs); any
/// wait before it is implicit in the gap to the previous leg's `end`.
#[derive(Clone, Debug, PartialEq)]
pub struct ItineraryLeg {
    pub mode:       LegMode,
    pub from:       GeoPoint,
    pub to:         GeoPoint,
    pub start:      SimTime,
    pub end:        SimTime,
    pub distance_m: f64,
    /// Line identifier for `pt` legs.
    pub line:       Option<String>,
}

impl ItineraryLeg {
    #[inline]
    pub fn duration_secs(&self) -> u32 {
        self.end.saturating_since(self.start)
    }
}

/// One complete candidate journey.  Built non-empty by [`Itinerary::new`];
/// `departure` and `arrival` panic on an empty one.
#[derive(Clone, Debug, PartialEq)]
pub struct Itinerary {
    pub legs: Vec<ItineraryLeg>,
}

impl Itinerary {
    pub fn new(legs: Vec<ItineraryLeg>) -> Self {
        debug_assert!(!legs.is_empty(), "an itinerary has at least one leg");
        Self { legs }
    }

    /// `true` if the itinerary has no legs.  [`Itinerary::new`] never
    /// builds one, but `legs` is public and other backends may.
    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    pub fn departure(&self) -> SimTime {
        self.legs[0].start
    }

    pub fn arrival(&self) -> SimTime {
        self.legs[self.legs.len() - 1].end
    }

    pub fn duration_secs(&self) -> u32 {
        self.arrival().saturating_since(self.departure())
    }

    /// Number of vehicle rides.
    pub fn rides(&self) -> usize {
        self.legs.iter().filter(|l| l.mode == LegMode::Pt).count()
    }

    /// Number of transfers (rides − 1, never negative).
    pub fn transfers(&self) -> usize {
        self.rides().saturating_sub(1)
    }

    /// Distance covered outside vehicles, in metres.
    pub fn walk_distance_m(&self) -> f64 {
        self.legs
            .iter()
            .filter(|l| l.mode != LegMode::Pt)
            .map(|l| l.distance_m)
            .sum()
    }

    /// Start time of the first ride, if any.
    pub fn first_boarding(&self) -> Option<SimTime> {
        self.legs.iter().find(|l| l.mode == LegMode::Pt).map(|l| l.start)
    }
}
