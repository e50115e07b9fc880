//! Simulation time model.
//!
//! # Design
//!
//! Inside the simulation a time of day is a `SimTime`: whole seconds after
//! local midnight of the service day.  Values past 24:00:00 are legal and
//! mean "the same service day, after midnight", as in GTFS timetables.
//!
//! The routing graph is queried with an absolute instant, so `ServiceDay`
//! anchors a `SimTime` to a calendar date in an IANA time zone:
//!
//!   instant = local_midnight(date, tz) + sim_time
//!
//! Integer seconds keep all timetable arithmetic exact.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone};
use chrono_tz::Tz;

use crate::{CoreError, CoreResult};

// ── SimTime ───────────────────────────────────────────────────────────────────

/// Seconds after local midnight of the service day.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub u32);

impl SimTime {
    pub const MIDNIGHT: SimTime = SimTime(0);

    #[inline]
    pub const fn from_hms(h: u32, m: u32, s: u32) -> SimTime {
        SimTime(h * 3_600 + m * 60 + s)
    }

    #[inline]
    pub fn secs(self) -> u32 {
        self.0
    }

    /// `(hours, minutes, seconds)`; hours may exceed 23.
    pub fn hms(self) -> (u32, u32, u32) {
        (self.0 / 3_600, (self.0 % 3_600) / 60, self.0 % 60)
    }

    /// Seconds from `earlier` to `self`, or 0 if `earlier` is later.
    #[inline]
    pub fn saturating_since(self, earlier: SimTime) -> u32 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u32> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: u32) -> SimTime {
        SimTime(self.0 + rhs)
    }
}

impl std::ops::Sub for SimTime {
    type Output = u32;
    #[inline]
    fn sub(self, rhs: SimTime) -> u32 {
        self.0 - rhs.0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m, s) = self.hms();
        write!(f, "{h:02}:{m:02}:{s:02}")
    }
}

/// Parses `HH:MM` or `HH:MM:SS` (hours may exceed 23).
impl FromStr for SimTime {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || CoreError::Parse(format!("invalid time of day {s:?}: expected HH:MM[:SS]"));
        let parts: Vec<&str> = s.trim().split(':').collect();
        if !(2..=3).contains(&parts.len()) {
            return Err(bad());
        }
        let mut fields = [0u32; 3];
        for (slot, part) in fields.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| bad())?;
        }
        let [h, m, sec] = fields;
        if m >= 60 || sec >= 60 {
            return Err(bad());
        }
        Ok(SimTime::from_hms(h, m, sec))
    }
}

// ── ServiceDay ────────────────────────────────────────────────────────────────

/// Calendar date and time zone that anchor every routing query.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ServiceDay {
    pub date: NaiveDate,
    pub tz:   Tz,
}

impl ServiceDay {
    /// Parse a `YYYY-MM-DD` date and an IANA zone name such as
    /// `"Europe/Berlin"`.  The date must have a local midnight in that zone.
    pub fn parse(date: &str, tz: &str) -> CoreResult<Self> {
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|e| CoreError::Config(format!("invalid service date {date:?}: {e}")))?;
        let tz = tz
            .trim()
            .parse::<Tz>()
            .map_err(|e| CoreError::Config(format!("invalid time zone {tz:?}: {e}")))?;
        let day = Self { date, tz };
        day.at(SimTime::MIDNIGHT)?;
        Ok(day)
    }

    /// Absolute instant of `time` on this service day.
    ///
    /// Across a DST gap the earliest valid local instant is used; a local
    /// midnight that does not exist at all is a configuration error.
    pub fn at(&self, time: SimTime) -> CoreResult<DateTime<Tz>> {
        let midnight = self
            .date
            .and_hms_opt(0, 0, 0)
            .and_then(|naive| self.tz.from_local_datetime(&naive).earliest())
            .ok_or_else(|| {
                CoreError::Config(format!("{} has no local midnight in {}", self.date, self.tz))
            })?;
        Ok(midnight + TimeDelta::seconds(i64::from(time.0)))
    }
}

impl fmt::Display for ServiceDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.tz)
    }
}
