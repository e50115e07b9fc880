//! Itinerary-computation parameter profiles.
//!
//! A profile is a named bundle of query options.  The router holds a small,
//! fixed list of them for the whole run and picks one per request to model
//! travellers with different preferences.  Profiles are plain data and can
//! be deserialised from the scenario config; omitted fields take the values
//! of [`ParameterProfile::default`].

use serde::{Deserialize, Serialize};

use tr_core::{CoreError, CoreResult};

/// Criterion used to rank candidate itineraries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Optimize {
    /// Earliest arrival.
    #[default]
    Quick,
    /// Fewest transfers, then earliest arrival.
    Transfers,
    /// Least walking distance, then earliest arrival.
    Walking,
}

/// One set of routing-graph query options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterProfile {
    pub name: String,

    /// Walking speed for access, egress, and transfers (m/s).
    pub walk_speed_mps: f64,

    /// Cycling speed for access and egress when the street mode is bike (m/s).
    pub bike_speed_mps: f64,

    /// Maximum beeline distance for access, egress, and a direct street
    /// itinerary (metres).
    pub max_walk_distance_m: f64,

    /// Maximum number of transfers (rides − 1).
    pub max_transfers: u32,

    /// Minimum time between alighting one vehicle and boarding another (s).
    pub min_transfer_secs: u32,

    pub optimize: Optimize,

    /// How many alternative itineraries to request (≥ 1).
    pub num_itineraries: u32,

    /// Abort the search after this many milliseconds; `None` = unbounded.
    pub search_timeout_ms: Option<u64>,
}

impl Default for ParameterProfile {
    fn default() -> Self {
        Self {
            name:                "default".to_owned(),
            walk_speed_mps:      1.33,
            bike_speed_mps:      4.17,
            max_walk_distance_m: 1_000.0,
            max_transfers:       4,
            min_transfer_secs:   120,
            optimize:            Optimize::Quick,
            num_itineraries:     1,
            search_timeout_ms:   None,
        }
    }
}

impl ParameterProfile {
    /// The built-in profile set, most typical traveller first.
    ///
    /// | # | name              | criterion | alternatives | notes                |
    /// |---|-------------------|-----------|--------------|----------------------|
    /// | 0 | `quick`           | Quick     | 3            | baseline             |
    /// | 1 | `fewer_transfers` | Transfers | 3            | max 2 transfers      |
    /// | 2 | `less_walking`    | Walking   | 3            | 600 m walk radius    |
    /// | 3 | `slow_walker`     | Quick     | 1            | 0.9 m/s              |
    /// | 4 | `long_walks`      | Quick     | 1            | 2 km walk radius     |
    pub fn defaults() -> Vec<ParameterProfile> {
        let base = ParameterProfile::default();
        vec![
            ParameterProfile {
                name: "quick".to_owned(),
                num_itineraries: 3,
                ..base.clone()
            },
            ParameterProfile {
                name: "fewer_transfers".to_owned(),
                optimize: Optimize::Transfers,
                max_transfers: 2,
                num_itineraries: 3,
                ..base.clone()
            },
            ParameterProfile {
                name: "less_walking".to_owned(),
                optimize: Optimize::Walking,
                max_walk_distance_m: 600.0,
                num_itineraries: 3,
                ..base.clone()
            },
            ParameterProfile {
                name: "slow_walker".to_owned(),
                walk_speed_mps: 0.9,
                ..base.clone()
            },
            ParameterProfile {
                name: "long_walks".to_owned(),
                walk_speed_mps: 1.5,
                max_walk_distance_m: 2_000.0,
                ..base
            },
        ]
    }

    /// Reject values the search cannot work with.
    pub fn validate(&self) -> CoreResult<()> {
        let bad = |what: &str| {
            Err(CoreError::Config(format!("profile {:?}: {what}", self.name)))
        };
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.walk_speed_mps) || !positive(self.bike_speed_mps) {
            return bad("speeds must be positive");
        }
        if self.max_walk_distance_m.is_nan() || self.max_walk_distance_m < 0.0 {
            return bad("max_walk_distance_m must be non-negative");
        }
        if self.num_itineraries == 0 {
            return bad("num_itineraries must be at least 1");
        }
        Ok(())
    }
}
