//! Synthetic population generator.
//!
//! Every person lives near one transit stop and works near another: each
//! location is a uniformly chosen stop moved by a uniform offset of up to
//! `jitter_m` metres east/west and north/south.  The plan is
//!
//! ```text
//! home (ends home_end) → leg → work (ends work_end) → leg → home (open)
//! ```
//!
//! with every leg requesting `leg_mode` (default `pt`).

use tracing::info;

use tr_core::{Coord, CoordTransform, GeoPoint, LegMode, PersonId, SimRng, SimTime};
use tr_graph::TimetableGraph;

use crate::{
    Activity, Person, Plan, PlanElement, PlannedLeg, Population, PopulationError, PopulationResult,
};

/// Default location jitter (metres).
pub const DEFAULT_JITTER_M: f64 = 500.0;

/// When the generated activities end.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ActivityTimes {
    pub home_end: SimTime,
    pub work_end: SimTime,
}

impl Default for ActivityTimes {
    fn default() -> Self {
        Self {
            home_end: SimTime::from_hms(9, 0, 0),
            work_end: SimTime::from_hms(17, 0, 0),
        }
    }
}

pub struct PopulationGenerator {
    stops:    Vec<GeoPoint>,
    crs:      CoordTransform,
    jitter_m: f64,
    times:    ActivityTimes,
    leg_mode: LegMode,
}

impl PopulationGenerator {
    /// Generator sampling around `stops`; coordinates are emitted in `crs`.
    ///
    /// Fails with [`PopulationError::NoStops`] if `stops` is empty.
    pub fn new(stops: Vec<GeoPoint>, crs: CoordTransform) -> PopulationResult<Self> {
        if stops.is_empty() {
            return Err(PopulationError::NoStops);
        }
        Ok(Self {
            stops,
            crs,
            jitter_m: DEFAULT_JITTER_M,
            times:    ActivityTimes::default(),
            leg_mode: LegMode::Pt,
        })
    }

    /// Sample around every stop of `graph`.
    pub fn from_graph(graph: &TimetableGraph, crs: CoordTransform) -> PopulationResult<Self> {
        Self::new(graph.stops.iter().map(|s| s.pos).collect(), crs)
    }

    pub fn with_jitter(mut self, metres: f64) -> Self {
        self.jitter_m = metres.max(0.0);
        self
    }

    pub fn with_times(mut self, times: ActivityTimes) -> Self {
        self.times = times;
        self
    }

    pub fn with_leg_mode(mut self, mode: LegMode) -> Self {
        self.leg_mode = mode;
        self
    }

    /// Generate `n` persons with ids `0..n`.
    ///
    /// The same `rng` seed always yields the same population.
    pub fn generate(&self, n: usize, rng: &mut SimRng) -> PopulationResult<Population> {
        let mut persons = Vec::with_capacity(n);
        for i in 0..n {
            let id = PersonId::try_from(i)
                .map_err(|_| PopulationError::Parse(format!("person index {i} exceeds u32")))?;
            let home = self.sample_location(rng);
            let work = self.sample_location(rng);
            let elements = vec![
                PlanElement::Activity(Activity::new("home", home, Some(self.times.home_end))),
                PlanElement::Leg(PlannedLeg::new(self.leg_mode.clone())),
                PlanElement::Activity(Activity::new("work", work, Some(self.times.work_end))),
                PlanElement::Leg(PlannedLeg::new(self.leg_mode.clone())),
                PlanElement::Activity(Activity::new("home", home, None)),
            ];
            persons.push(Person { id, plan: Plan::new(id, elements)? });
        }
        info!(persons = n, stops = self.stops.len(), jitter_m = self.jitter_m, "population generated");
        Ok(Population::from_persons(persons))
    }

    /// A uniformly chosen stop, jittered, in the scenario CRS.
    fn sample_location(&self, rng: &mut SimRng) -> Coord {
        let idx = rng.gen_range(0..self.stops.len());
        let stop = self.stops[idx];
        let (dx, dy) = if self.jitter_m > 0.0 {
            (
                rng.gen_range(-self.jitter_m..=self.jitter_m),
                rng.gen_range(-self.jitter_m..=self.jitter_m),
            )
        } else {
            (0.0, 0.0)
        };
        let around_stop = CoordTransform::LocalTangent { origin: stop };
        self.crs.from_wgs84(around_stop.to_wgs84(Coord::new(dx, dy)))
    }
}
