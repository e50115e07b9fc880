//! Leg mode tags shared across all routing-related crates.
//!
//! The tag strings match the simulation's plan files (`"pt"`, `"walk"`,
//! `"transit_walk"`, …).  Unknown tags are preserved verbatim in
//! [`LegMode::Other`] so they pass through routing and classification
//! untouched.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// The mode tag carried by one [`Leg`](crate::Leg).
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub enum LegMode {
    /// On foot, outside the transit network.
    Walk,
    /// Bicycle.
    Bike,
    /// Private vehicle.
    Car,
    /// Scheduled public transit.  Also the canonical main mode of every
    /// trip routed through the multi-modal graph.
    Pt,
    /// Walk between two transit stops (a transfer connection).
    TransitWalk,
    /// Access/egress placeholder: from the origin to the first boarding
    /// stop, or from the last alighting stop to the destination.
    TeleportBeginEnd,
    /// Transfer placeholder between stops of the same stop area.
    TeleportTransitStopArea,
    /// Any tag this crate does not know.
    Other(String),
}

impl LegMode {
    pub const WALK: &'static str = "walk";
    pub const BIKE: &'static str = "bike";
    pub const CAR: &'static str = "car";
    pub const PT: &'static str = "pt";
    pub const TRANSIT_WALK: &'static str = "transit_walk";
    pub const TELEPORT_BEGIN_END: &'static str = "teleport_begin_or_end";
    pub const TELEPORT_TRANSIT_STOP_AREA: &'static str = "teleport_transit_stop_area";

    /// The tag as written in plan files.
    pub fn as_str(&self) -> &str {
        match self {
            LegMode::Walk                    => Self::WALK,
            LegMode::Bike                    => Self::BIKE,
            LegMode::Car                     => Self::CAR,
            LegMode::Pt                      => Self::PT,
            LegMode::TransitWalk             => Self::TRANSIT_WALK,
            LegMode::TeleportBeginEnd        => Self::TELEPORT_BEGIN_END,
            LegMode::TeleportTransitStopArea => Self::TELEPORT_TRANSIT_STOP_AREA,
            LegMode::Other(tag)              => tag,
        }
    }

    /// `true` for the two placeholder modes the multi-modal router inserts
    /// around and between transit rides.
    #[inline]
    pub fn is_teleport_placeholder(&self) -> bool {
        matches!(self, LegMode::TeleportBeginEnd | LegMode::TeleportTransitStopArea)
    }
}

impl From<&str> for LegMode {
    fn from(tag: &str) -> Self {
        match tag.trim() {
            Self::WALK                       => LegMode::Walk,
            Self::BIKE                       => LegMode::Bike,
            Self::CAR                        => LegMode::Car,
            Self::PT                         => LegMode::Pt,
            Self::TRANSIT_WALK               => LegMode::TransitWalk,
            Self::TELEPORT_BEGIN_END         => LegMode::TeleportBeginEnd,
            Self::TELEPORT_TRANSIT_STOP_AREA => LegMode::TeleportTransitStopArea,
            other                            => LegMode::Other(other.to_owned()),
        }
    }
}

impl From<String> for LegMode {
    fn from(tag: String) -> Self {
        LegMode::from(tag.as_str())
    }
}

impl From<LegMode> for String {
    fn from(mode: LegMode) -> Self {
        match mode {
            LegMode::Other(tag) => tag,
            known => known.as_str().to_owned(),
        }
    }
}

impl FromStr for LegMode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(LegMode::from(s))
    }
}

impl fmt::Display for LegMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
