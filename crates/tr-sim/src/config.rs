//! Scenario configuration.
//!
//! Loaded once from a JSON file by the application and fixed for the
//! process lifetime.  Only `graph_dir`, `service_date` and `time_zone` are
//! required; everything else has a default.
//!
//! ```json
//! {
//!   "graph_dir": "data/vbb",
//!   "service_date": "2024-06-03",
//!   "time_zone": "Europe/Berlin",
//!   "crs": { "kind": "local_tangent", "origin": { "lat": 52.52, "lon": 13.40 } },
//!   "randomize_profiles": true,
//!   "profile_draw_count": 3,
//!   "population_size": 10
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use tr_core::{CoordTransform, CoreResult, ServiceDay};
use tr_graph::ParameterProfile;
use tr_router::{ProfileSelector, TeleportParams, TripRouterConfig};

use crate::{SimError, SimResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Directory holding `stops.csv` and `connections.csv`.
    pub graph_dir: PathBuf,

    /// Service date, `YYYY-MM-DD`.
    pub service_date: String,

    /// IANA time zone name, e.g. `Europe/Berlin`.
    pub time_zone: String,

    /// Scenario coordinate reference system.
    pub crs: CoordTransform,

    /// Draw a profile per request instead of always using the first.
    pub randomize_profiles: bool,

    /// Draw among the first `profile_draw_count` profiles.
    pub profile_draw_count: usize,

    /// Alternatives arriving within this many seconds of the best one may
    /// be chosen.
    pub feasibility_slack_secs: u32,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Worker thread count passed to Rayon.  `None` uses all logical cores.
    pub num_threads: Option<usize>,

    /// Persons to generate when `plans_file` is not set.
    pub population_size: usize,

    /// Location jitter around stops for generated persons (metres).
    pub jitter_m: f64,

    /// Load plans from this CSV instead of generating a population.
    pub plans_file: Option<PathBuf>,

    /// Routing passes over the population.
    pub iterations: u32,

    pub output_dir: PathBuf,

    /// Itinerary parameter profiles; `None` uses the built-in set.
    pub profiles: Option<Vec<ParameterProfile>>,

    /// Teleport parameters for modes the graph does not serve.
    pub teleport: Option<TeleportParams>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            graph_dir:              PathBuf::new(),
            service_date:           String::new(),
            time_zone:              String::new(),
            crs:                    CoordTransform::Wgs84,
            randomize_profiles:     true,
            profile_draw_count:     3,
            feasibility_slack_secs: tr_router::router::DEFAULT_FEASIBILITY_SLACK_SECS,
            seed:                   42,
            num_threads:            None,
            population_size:        10,
            jitter_m:               tr_population::generator::DEFAULT_JITTER_M,
            plans_file:             None,
            iterations:             1,
            output_dir:             PathBuf::from("output"),
            profiles:               None,
            teleport:               None,
        }
    }
}

impl ScenarioConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> SimResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse and validate a JSON config string.
    pub fn from_json(text: &str) -> SimResult<Self> {
        let config: ScenarioConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check everything that can be checked without touching the graph.
    pub fn validate(&self) -> SimResult<()> {
        if self.graph_dir.as_os_str().is_empty() {
            return Err(SimError::Config("graph_dir is required".to_owned()));
        }
        self.service_day()?;
        if self.iterations == 0 {
            return Err(SimError::Config("iterations must be at least 1".to_owned()));
        }
        if self.num_threads == Some(0) {
            return Err(SimError::Config("num_threads must be at least 1".to_owned()));
        }
        if !self.jitter_m.is_finite() || self.jitter_m < 0.0 {
            return Err(SimError::Config("jitter_m must be a non-negative number".to_owned()));
        }
        if let Some(t) = &self.teleport {
            t.validate()?;
        }
        self.selector()?;
        Ok(())
    }

    pub fn service_day(&self) -> CoreResult<ServiceDay> {
        ServiceDay::parse(&self.service_date, &self.time_zone)
    }

    /// Configured profiles, or [`ParameterProfile::defaults`].
    pub fn profiles(&self) -> Vec<ParameterProfile> {
        self.profiles.clone().unwrap_or_else(ParameterProfile::defaults)
    }

    pub fn selector(&self) -> SimResult<ProfileSelector> {
        Ok(ProfileSelector::new(
            self.profiles(),
            self.randomize_profiles,
            self.profile_draw_count,
        )?)
    }

    pub fn router_config(&self) -> SimResult<TripRouterConfig> {
        Ok(TripRouterConfig {
            feasibility_slack_secs: self.feasibility_slack_secs,
            seed:                   self.seed,
            crs:                    self.crs,
            service_day:            self.service_day()?,
            teleport:               self.teleport.clone().unwrap_or_default(),
        })
    }
}
