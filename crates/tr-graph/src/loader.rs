//! CSV timetable loader.
//!
//! # File format
//!
//! A graph directory holds two files.
//!
//! `stops.csv`: one row per stop; `area` may be empty:
//!
//! ```csv
//! stop_id,name,lat,lon,area
//! S1,Alexanderplatz U,52.5215,13.4112,alex
//! S2,Alexanderplatz S,52.5219,13.4133,alex
//! S3,Zoologischer Garten,52.5069,13.3323,
//! ```
//!
//! `connections.csv`: one row per hop between consecutive stops of a
//! vehicle trip; times are `HH:MM[:SS]` after local midnight of the service
//! day and may exceed 24:00:
//!
//! ```csv
//! route_id,trip_id,from_stop,to_stop,departure,arrival
//! U2,U2-0800,S1,S3,08:00:00,08:14:00
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use tr_core::{GeoPoint, SimTime};

use crate::{GraphError, GraphResult, TimetableGraph, TimetableGraphBuilder};

pub const STOPS_FILE: &str = "stops.csv";
pub const CONNECTIONS_FILE: &str = "connections.csv";

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct StopRecord {
    stop_id: String,
    name:    String,
    lat:     f64,
    lon:     f64,
    area:    Option<String>,
}

#[derive(Deserialize)]
struct ConnectionRecord {
    route_id:  String,
    trip_id:   String,
    from_stop: String,
    to_stop:   String,
    departure: String,
    arrival:   String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`TimetableGraph`] from `dir/stops.csv` and `dir/connections.csv`.
pub fn load_timetable_dir(dir: &Path) -> GraphResult<TimetableGraph> {
    let open = |name: &str| {
        let path = dir.join(name);
        File::open(&path).map_err(|source| GraphError::Io {
            path: path.display().to_string(),
            source,
        })
    };
    let graph =
        load_timetable_readers(open(STOPS_FILE)?, open(CONNECTIONS_FILE)?, TimetableGraphBuilder::new())?;
    info!(
        dir = %dir.display(),
        stops = graph.stop_count(),
        connections = graph.connection_count(),
        "routing graph loaded"
    );
    Ok(graph)
}

/// Like [`load_timetable_dir`] but reads from any `Read` sources into a
/// caller-configured builder.
pub fn load_timetable_readers<S: Read, C: Read>(
    stops:       S,
    connections: C,
    mut builder: TimetableGraphBuilder,
) -> GraphResult<TimetableGraph> {
    // ── Stops ─────────────────────────────────────────────────────────────
    let mut stop_reader = csv::Reader::from_reader(stops);
    for result in stop_reader.deserialize::<StopRecord>() {
        let row = result?;
        let area = row.area.filter(|a| !a.trim().is_empty());
        builder.add_stop(&row.stop_id, &row.name, GeoPoint::new(row.lat, row.lon), area)?;
    }

    // ── Connections ───────────────────────────────────────────────────────
    let mut conn_reader = csv::Reader::from_reader(connections);
    let headers = conn_reader.headers()?.clone();
    for result in conn_reader.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());
        let row: ConnectionRecord = record.deserialize(Some(&headers))?;

        let stop = |code: &str| {
            builder.stop_id(code).ok_or_else(|| GraphError::UnknownStop {
                stop: code.to_owned(),
                line,
            })
        };
        let from = stop(&row.from_stop)?;
        let to = stop(&row.to_stop)?;

        let time = |s: &str| {
            s.parse::<SimTime>().map_err(|e| GraphError::InvalidConnection {
                line,
                reason: e.to_string(),
            })
        };
        let departure = time(&row.departure)?;
        let arrival = time(&row.arrival)?;
        if arrival < departure {
            return Err(GraphError::InvalidConnection {
                line,
                reason: format!("arrival {arrival} before departure {departure}"),
            });
        }
        if from == to {
            return Err(GraphError::InvalidConnection {
                line,
                reason: format!("hop starts and ends at stop {:?}", row.from_stop),
            });
        }

        builder.add_connection(&row.route_id, &row.trip_id, from, to, departure, arrival);
    }

    builder.build()
}
