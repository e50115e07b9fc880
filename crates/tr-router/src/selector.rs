//! Per-request choice of itinerary parameters.
//!
//! Drawing a different profile per request makes otherwise identical
//! travellers choose different routes.  The selector itself never changes
//! after construction; all randomness comes from the caller's source.

use tr_core::RandomSource;
use tr_graph::ParameterProfile;

use crate::{RouterError, RouterResult};

#[derive(Clone, Debug)]
pub struct ProfileSelector {
    profiles:   Vec<ParameterProfile>,
    randomize:  bool,
    draw_count: usize,
}

impl ProfileSelector {
    /// Validate and build a selector.
    ///
    /// Fails with [`RouterError::InvalidProfileConfiguration`] if `profiles`
    /// is empty, if any profile is invalid, or if `randomize` is set and
    /// `draw_count` is not in `1..=profiles.len()`.  `draw_count` is ignored
    /// when `randomize` is off.
    pub fn new(
        profiles:   Vec<ParameterProfile>,
        randomize:  bool,
        draw_count: usize,
    ) -> RouterResult<Self> {
        if profiles.is_empty() {
            return Err(RouterError::InvalidProfileConfiguration(
                "at least one parameter profile is required".to_owned(),
            ));
        }
        if randomize && !(1..=profiles.len()).contains(&draw_count) {
            return Err(RouterError::InvalidProfileConfiguration(format!(
                "draw count {draw_count} outside 1..={}",
                profiles.len()
            )));
        }
        for p in &profiles {
            p.validate()
                .map_err(|e| RouterError::InvalidProfileConfiguration(e.to_string()))?;
        }
        Ok(Self { profiles, randomize, draw_count })
    }

    /// Index of the profile to use for one request.
    ///
    /// Without randomisation `rng` is not touched.
    pub fn select_index(&self, rng: &mut dyn RandomSource) -> usize {
        if self.randomize {
            rng.next_index(self.draw_count)
        } else {
            0
        }
    }

    pub fn select(&self, rng: &mut dyn RandomSource) -> &ParameterProfile {
        &self.profiles[self.select_index(rng)]
    }

    pub fn profiles(&self) -> &[ParameterProfile] {
        &self.profiles
    }

    pub fn is_randomized(&self) -> bool {
        self.randomize
    }

    pub fn draw_count(&self) -> usize {
        self.draw_count
    }
}
