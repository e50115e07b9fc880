//! CSV output: routed legs and mode shares.
//!
//! `trips.csv` has one row per routed leg:
//!
//! ```csv
//! iteration,person_id,trip_index,leg_index,mode,departure_secs,travel_time_secs,distance_m,line
//! 0,3,0,1,pt,32520,840,6768.1,U2
//! ```

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;

use tr_core::{PersonId, Trip};
use tr_router::MainModeIdentifier;

use crate::{ModeShareObserver, RoutingObserver, RoutingSummary, SimError, SimResult};

pub const TRIPS_FILE: &str = "trips.csv";

const TRIP_HEADER: [&str; 9] = [
    "iteration",
    "person_id",
    "trip_index",
    "leg_index",
    "mode",
    "departure_secs",
    "travel_time_secs",
    "distance_m",
    "line",
];

/// A [`RoutingObserver`] that writes every routed leg as a CSV row.
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  Check [`take_error`](Self::take_error) after the
/// pass.
pub struct TripCsvObserver<W: Write> {
    writer:     Writer<W>,
    iteration:  u32,
    rows:       usize,
    last_error: Option<SimError>,
}

impl TripCsvObserver<File> {
    /// Create `dir/trips.csv`.
    pub fn create(dir: &Path) -> SimResult<Self> {
        Self::new(File::create(dir.join(TRIPS_FILE))?)
    }
}

impl<W: Write> TripCsvObserver<W> {
    /// Write the header row to `sink`.
    pub fn new(sink: W) -> SimResult<Self> {
        let mut writer = Writer::from_writer(sink);
        writer.write_record(TRIP_HEADER)?;
        Ok(Self { writer, iteration: 0, rows: 0, last_error: None })
    }

    /// Leg rows written so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Take the stored write error (if any).
    pub fn take_error(&mut self) -> Option<SimError> {
        self.last_error.take()
    }

    pub fn flush(&mut self) -> SimResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn write_trip(&mut self, person: PersonId, trip_index: u32, trip: &Trip) -> SimResult<()> {
        for (i, leg) in trip.legs().iter().enumerate() {
            self.writer.write_record(&[
                self.iteration.to_string(),
                person.0.to_string(),
                trip_index.to_string(),
                i.to_string(),
                leg.mode.to_string(),
                leg.departure.secs().to_string(),
                leg.travel_time_secs.to_string(),
                format!("{:.1}", leg.distance_m),
                leg.line.clone().unwrap_or_default(),
            ])?;
            self.rows += 1;
        }
        Ok(())
    }

    fn store_err(&mut self, result: SimResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: Write> RoutingObserver for TripCsvObserver<W> {
    fn on_iteration_start(&mut self, iteration: u32) {
        self.iteration = iteration;
    }

    fn on_trip_routed(&mut self, person: PersonId, trip_index: u32, trip: &Trip) {
        let result = self.write_trip(person, trip_index, trip);
        self.store_err(result);
    }

    fn on_iteration_end(&mut self, _summary: &RoutingSummary) {
        let result = self.flush();
        self.store_err(result);
    }
}

/// Write `mode,trips,share` rows for every counted main mode.
pub fn write_mode_share_csv<I: MainModeIdentifier>(
    path:     &Path,
    observer: &ModeShareObserver<I>,
) -> SimResult<()> {
    let mut w = Writer::from_path(path)?;
    w.write_record(["mode", "trips", "share"])?;
    for (mode, count) in observer.counts() {
        w.write_record(&[mode.clone(), count.to_string(), format!("{:.4}", observer.share(mode))])?;
    }
    w.flush()?;
    Ok(())
}
