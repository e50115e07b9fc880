//! Plan model: activities joined by legs, one selected plan per person.

use tr_core::{Coord, LegMode, PersonId, SimTime, Trip};

use crate::{PopulationError, PopulationResult};

// ── Plan elements ─────────────────────────────────────────────────────────────

/// A stay at one location.
#[derive(Clone, Debug, PartialEq)]
pub struct Activity {
    /// Free-form type tag, e.g. `"home"` or `"work"`.
    pub activity_type: String,
    /// Location in the scenario CRS.
    pub coord:         Coord,
    /// When the person leaves.  `None` only for the last activity.
    pub end_time:      Option<SimTime>,
}

impl Activity {
    pub fn new(activity_type: &str, coord: Coord, end_time: Option<SimTime>) -> Self {
        Self { activity_type: activity_type.to_owned(), coord, end_time }
    }
}

/// Movement between two activities: the requested mode and, once routed,
/// the route.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedLeg {
    pub mode:  LegMode,
    pub route: Option<Trip>,
}

impl PlannedLeg {
    pub fn new(mode: LegMode) -> Self {
        Self { mode, route: None }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PlanElement {
    Activity(Activity),
    Leg(PlannedLeg),
}

// ── Plan ──────────────────────────────────────────────────────────────────────

/// A validated, alternating activity/leg sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct Plan {
    elements: Vec<PlanElement>,
}

/// Borrowed view of trip `index`: the leg and the activities around it.
#[derive(Copy, Clone, Debug)]
pub struct TripSlot<'a> {
    pub index:       u32,
    pub origin:      &'a Activity,
    pub leg:         &'a PlannedLeg,
    pub destination: &'a Activity,
}

impl TripSlot<'_> {
    /// The trip departs when the origin activity ends.
    pub fn departure(&self) -> SimTime {
        self.origin.end_time.unwrap_or(SimTime::MIDNIGHT)
    }
}

impl Plan {
    /// Validate `elements` for `person`.
    ///
    /// The sequence must be non-empty, start and end with an activity,
    /// alternate activity/leg, and give every activity but the last an end
    /// time.
    pub fn new(person: PersonId, elements: Vec<PlanElement>) -> PopulationResult<Self> {
        let invalid = |reason: String| PopulationError::InvalidPlan { person: person.0, reason };

        if elements.len() % 2 == 0 {
            return Err(invalid(format!(
                "{} elements; a plan needs an odd count (activity, leg, …, activity)",
                elements.len()
            )));
        }
        let last = elements.len() - 1;
        for (i, e) in elements.iter().enumerate() {
            match (i % 2, e) {
                (0, PlanElement::Activity(a)) => {
                    if i != last && a.end_time.is_none() {
                        return Err(invalid(format!(
                            "activity {i} ({}) has no end time",
                            a.activity_type
                        )));
                    }
                }
                (0, PlanElement::Leg(_)) => {
                    return Err(invalid(format!("element {i} must be an activity")));
                }
                (_, PlanElement::Activity(_)) => {
                    return Err(invalid(format!("element {i} must be a leg")));
                }
                (_, PlanElement::Leg(_)) => {}
            }
        }
        Ok(Self { elements })
    }

    pub fn elements(&self) -> &[PlanElement] {
        &self.elements
    }

    pub fn activities(&self) -> impl Iterator<Item = &Activity> {
        self.elements.iter().filter_map(|e| match e {
            PlanElement::Activity(a) => Some(a),
            PlanElement::Leg(_) => None,
        })
    }

    /// Number of legs.
    pub fn trip_count(&self) -> usize {
        self.elements.len() / 2
    }

    pub fn trip(&self, index: usize) -> Option<TripSlot<'_>> {
        let at = 2 * index + 1;
        match self.elements.get(at - 1..=at + 1)? {
            [PlanElement::Activity(origin), PlanElement::Leg(leg), PlanElement::Activity(destination)] => {
                Some(TripSlot { index: index as u32, origin, leg, destination })
            }
            _ => None,
        }
    }

    pub fn trips(&self) -> impl Iterator<Item = TripSlot<'_>> {
        (0..self.trip_count()).filter_map(|i| self.trip(i))
    }

    pub fn leg_mut(&mut self, index: usize) -> Option<&mut PlannedLeg> {
        match self.elements.get_mut(2 * index + 1)? {
            PlanElement::Leg(leg) => Some(leg),
            PlanElement::Activity(_) => None,
        }
    }
}

// ── Person & Population ───────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Person {
    pub id:   PersonId,
    /// The selected plan.
    pub plan: Plan,
}

/// All persons, kept in ascending `PersonId` order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Population {
    persons: Vec<Person>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `persons` in any order.
    pub fn from_persons(mut persons: Vec<Person>) -> Self {
        persons.sort_by_key(|p| p.id);
        Self { persons }
    }

    /// Append `person`, keeping id order.
    pub fn push(&mut self, person: Person) {
        let at = self.persons.partition_point(|p| p.id < person.id);
        self.persons.insert(at, person);
    }

    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    pub fn persons_mut(&mut self) -> &mut [Person] {
        &mut self.persons
    }

    pub fn get(&self, id: PersonId) -> Option<&Person> {
        self.persons
            .binary_search_by_key(&id, |p| p.id)
            .ok()
            .map(|i| &self.persons[i])
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    /// Total legs over all plans.
    pub fn trip_count(&self) -> usize {
        self.persons.iter().map(|p| p.plan.trip_count()).sum()
    }
}
