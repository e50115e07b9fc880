//! Beeline routing for modes the graph does not serve.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use tr_core::{CoreError, CoreResult, GeoPoint, Leg, LegMode, SimTime, Trip};

/// Per-mode teleport speeds and the beeline detour factor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeleportParams {
    /// Network distance ÷ beeline distance.
    pub beeline_distance_factor: f64,

    /// Speed (m/s) for modes not listed in `mode_speeds_mps`.
    pub default_speed_mps: f64,

    /// Speed (m/s) keyed by mode tag.
    pub mode_speeds_mps: BTreeMap<String, f64>,
}

impl Default for TeleportParams {
    fn default() -> Self {
        Self {
            beeline_distance_factor: 1.3,
            default_speed_mps:       4.2,
            mode_speeds_mps:         BTreeMap::from([(LegMode::Car.as_str().to_owned(), 8.3)]),
        }
    }
}

impl TeleportParams {
    /// Reject non-positive speeds and a detour factor below 1.
    pub fn validate(&self) -> CoreResult<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !self.beeline_distance_factor.is_finite() || self.beeline_distance_factor < 1.0 {
            return Err(CoreError::Config(format!(
                "beeline_distance_factor {} must be at least 1",
                self.beeline_distance_factor
            )));
        }
        if let Some((mode, _)) = self.mode_speeds_mps.iter().find(|(_, v)| !positive(**v)) {
            return Err(CoreError::Config(format!("teleport speed for {mode:?} must be positive")));
        }
        if !positive(self.default_speed_mps) {
            return Err(CoreError::Config("default teleport speed must be positive".to_owned()));
        }
        Ok(())
    }

    pub fn speed_for(&self, mode: &LegMode) -> f64 {
        self.mode_speeds_mps
            .get(mode.as_str())
            .copied()
            .unwrap_or(self.default_speed_mps)
    }

    /// A single-leg trip of `mode` from `from` to `to`.
    pub fn teleport(&self, mode: &LegMode, from: GeoPoint, to: GeoPoint, departure: SimTime) -> Trip {
        let distance_m = from.distance_m(to) * self.beeline_distance_factor;
        let travel_time_secs = (distance_m / self.speed_for(mode)).ceil() as u32;
        Trip::single(Leg {
            mode: mode.clone(),
            departure,
            travel_time_secs,
            distance_m,
            from: Some(from),
            to: Some(to),
            line: None,
        })
    }
}
