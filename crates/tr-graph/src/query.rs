//! The itinerary query value object.

use tr_core::{GeoPoint, ServiceDay, SimTime};

use crate::ParameterProfile;

/// How the traveller moves outside vehicles: to/from stops and on a direct
/// street itinerary.  Transfers between stops are always walked.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum StreetMode {
    #[default]
    Walk,
    Bike,
}

/// One request to the routing graph.  Built fresh per routing request and
/// dropped afterwards.
#[derive(Clone, Debug)]
pub struct ItineraryQuery<'a> {
    pub from:        GeoPoint,
    pub to:          GeoPoint,
    /// Departure time on `service_day`.
    pub departure:   SimTime,
    pub service_day: ServiceDay,
    pub profile:     &'a ParameterProfile,
    pub street_mode: StreetMode,
}

impl<'a> ItineraryQuery<'a> {
    pub fn new(
        from:        GeoPoint,
        to:          GeoPoint,
        departure:   SimTime,
        service_day: ServiceDay,
        profile:     &'a ParameterProfile,
    ) -> Self {
        Self { from, to, departure, service_day, profile, street_mode: StreetMode::Walk }
    }

    pub fn with_street_mode(mut self, mode: StreetMode) -> Self {
        self.street_mode = mode;
        self
    }

    /// Speed used off-vehicle for access, egress, and direct itineraries.
    pub fn street_speed_mps(&self) -> f64 {
        match self.street_mode {
            StreetMode::Walk => self.profile.walk_speed_mps,
            StreetMode::Bike => self.profile.bike_speed_mps,
        }
    }
}
