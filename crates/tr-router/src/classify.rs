//! Main-mode identification.
//!
//! Every trip that went through the multi-modal graph starts with a leg
//! tagged `walk`, `bike`, `transit_walk` or one of the teleport
//! placeholders.  Those all mean "this is a transit trip", so they fold to
//! the canonical `pt`.  Other first-leg modes are their own main mode.

use tr_core::{LegMode, Trip};

/// Fold a leg mode into the canonical main mode.
pub fn canonical_mode(mode: &LegMode) -> LegMode {
    match mode {
        LegMode::Walk
        | LegMode::Bike
        | LegMode::TransitWalk
        | LegMode::TeleportBeginEnd
        | LegMode::TeleportTransitStopArea => LegMode::Pt,
        other => other.clone(),
    }
}

/// Canonical main mode of `trip`.  Only the first leg is inspected.
pub fn classify(trip: &Trip) -> LegMode {
    canonical_mode(&trip.first_leg().mode)
}

/// Something that can name a trip's main mode.  Statistics and replanning
/// code take this trait so they can be handed any identification policy.
pub trait MainModeIdentifier: Send + Sync {
    fn identify_main_mode(&self, trip: &Trip) -> LegMode;
}

/// The identifier for transit routing: [`classify`].
#[derive(Copy, Clone, Debug, Default)]
pub struct TransitMainModeIdentifier;

impl MainModeIdentifier for TransitMainModeIdentifier {
    #[inline]
    fn identify_main_mode(&self, trip: &Trip) -> LegMode {
        classify(trip)
    }
}
