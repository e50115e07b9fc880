//! Timetable-backed multi-modal graph: stops, timetabled connections, and
//! walking footpaths between nearby stops.
//!
//! # Data layout
//!
//! - `connections`: every vehicle hop (`from → to`, one trip, no stop in
//!   between), sorted by departure time so a search can scan forward from
//!   the query time.
//! - footpaths: per-stop outgoing transfer walks in CSR form, so the
//!   footpaths of stop `s` are `footpaths[footpath_start[s] .. footpath_start[s+1]]`.
//!   They are precomputed at build time for every stop pair closer than
//!   `max_transfer_walk_m`, plus every pair in the same stop area.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over stop positions projected to local metres
//! answers "stops within r metres" for access/egress and footpath building.

use std::collections::HashMap;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use tr_core::{CoordTransform, GeoPoint, SimTime, StopId, TransitTripId};

use crate::{GraphError, GraphResult};

/// Default transfer-walk radius (metres).
pub const DEFAULT_MAX_TRANSFER_WALK_M: f64 = 400.0;

// ── R-tree stop entry ─────────────────────────────────────────────────────────

/// Entry stored in the spatial index: a stop position in local metres.
#[derive(Clone, Debug)]
struct StopEntry {
    point: [f64; 2], // [x_m, y_m]
    id:    StopId,
}

impl RTreeObject for StopEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for StopEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Graph elements ────────────────────────────────────────────────────────────

/// A transit stop.
#[derive(Clone, Debug)]
pub struct Stop {
    /// Identifier from the input file.
    pub code: String,
    pub name: String,
    pub pos:  GeoPoint,
    /// Stop area (station) this stop belongs to, if any.
    pub area: Option<String>,
}

/// One vehicle hop between two consecutive stops of a trip.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    pub trip:      TransitTripId,
    pub from:      StopId,
    pub to:        StopId,
    pub departure: SimTime,
    pub arrival:   SimTime,
}

/// A transfer walk from one stop to another.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Footpath {
    pub to:         StopId,
    pub distance_m: f64,
    /// Both stops belong to the same stop area.
    pub same_area:  bool,
}

// ── TimetableGraph ────────────────────────────────────────────────────────────

/// Immutable routing graph.  Build with [`TimetableGraphBuilder`] or load
/// with [`load_timetable_dir`][crate::load_timetable_dir].
#[derive(Debug)]
pub struct TimetableGraph {
    pub stops:       Vec<Stop>,

    /// Sorted ascending by `(departure, arrival)`.
    pub connections: Vec<Connection>,

    /// Line identifier of each trip, indexed by `TransitTripId`.
    pub trip_lines:  Vec<String>,

    footpath_start: Vec<u32>,
    footpaths:      Vec<Footpath>,

    spatial_idx: RTree<StopEntry>,
    projection:  CoordTransform,
}

impl TimetableGraph {
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    #[inline]
    pub fn stop(&self, id: StopId) -> &Stop {
        &self.stops[id.index()]
    }

    /// Outgoing transfer walks of `stop`.
    #[inline]
    pub fn footpaths(&self, stop: StopId) -> &[Footpath] {
        let start = self.footpath_start[stop.index()] as usize;
        let end   = self.footpath_start[stop.index() + 1] as usize;
        &self.footpaths[start..end]
    }

    #[inline]
    pub fn trip_line(&self, trip: TransitTripId) -> &str {
        &self.trip_lines[trip.index()]
    }

    /// Index of the first connection departing at or after `t`.
    pub fn first_connection_at(&self, t: SimTime) -> usize {
        self.connections.partition_point(|c| c.departure < t)
    }

    /// All stops within `radius_m` of `pos`, with their great-circle
    /// distance, nearest first.
    pub fn stops_within(&self, pos: GeoPoint, radius_m: f64) -> Vec<(StopId, f64)> {
        stops_within(&self.spatial_idx, self.projection, &self.stops, pos, radius_m)
    }
}

fn stops_within(
    index:      &RTree<StopEntry>,
    projection: CoordTransform,
    stops:      &[Stop],
    pos:        GeoPoint,
    radius_m:   f64,
) -> Vec<(StopId, f64)> {
    let c = projection.from_wgs84(pos);
    // Pad the planar search radius slightly; haversine is the final filter.
    let r = radius_m * 1.01 + 1.0;
    let mut hits: Vec<(StopId, f64)> = index
        .locate_within_distance([c.x, c.y], r * r)
        .map(|e| (e.id, pos.distance_m(stops[e.id.index()].pos)))
        .filter(|&(_, d)| d <= radius_m)
        .collect();
    hits.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
    hits
}

// ── TimetableGraphBuilder ─────────────────────────────────────────────────────

/// Construct a [`TimetableGraph`] incrementally, then call
/// [`build`](Self::build).
///
/// # Example
///
/// ```
/// use tr_core::{GeoPoint, SimTime};
/// use tr_graph::TimetableGraphBuilder;
///
/// let mut b = TimetableGraphBuilder::new();
/// let a = b.add_stop("A", "Alexanderplatz", GeoPoint::new(52.5215, 13.4112), None).unwrap();
/// let z = b.add_stop("Z", "Zoo", GeoPoint::new(52.5069, 13.3323), None).unwrap();
/// b.add_connection("U2", "U2-0800", a, z, SimTime::from_hms(8, 0, 0), SimTime::from_hms(8, 14, 0));
/// let graph = b.build().unwrap();
/// assert_eq!(graph.stop_count(), 2);
/// ```
pub struct TimetableGraphBuilder {
    stops:               Vec<Stop>,
    stop_index:          HashMap<String, StopId>,
    trip_index:          HashMap<String, TransitTripId>,
    trip_lines:          Vec<String>,
    connections:         Vec<Connection>,
    max_transfer_walk_m: f64,
}

impl TimetableGraphBuilder {
    pub fn new() -> Self {
        Self {
            stops:               Vec::new(),
            stop_index:          HashMap::new(),
            trip_index:          HashMap::new(),
            trip_lines:          Vec::new(),
            connections:         Vec::new(),
            max_transfer_walk_m: DEFAULT_MAX_TRANSFER_WALK_M,
        }
    }

    /// Radius within which stop pairs get a transfer footpath.
    pub fn max_transfer_walk(mut self, metres: f64) -> Self {
        self.max_transfer_walk_m = metres;
        self
    }

    /// Add a stop and return its `StopId` (sequential from 0).
    pub fn add_stop(
        &mut self,
        code: &str,
        name: &str,
        pos:  GeoPoint,
        area: Option<String>,
    ) -> GraphResult<StopId> {
        if self.stop_index.contains_key(code) {
            return Err(GraphError::DuplicateStop(code.to_owned()));
        }
        let id = StopId(self.stops.len() as u32);
        self.stops.push(Stop { code: code.to_owned(), name: name.to_owned(), pos, area });
        self.stop_index.insert(code.to_owned(), id);
        Ok(id)
    }

    /// Look up a stop added earlier by its input-file identifier.
    pub fn stop_id(&self, code: &str) -> Option<StopId> {
        self.stop_index.get(code).copied()
    }

    /// Add one hop of the vehicle trip `trip_key` running on `line`.
    ///
    /// Hops of the same trip share one interned `TransitTripId`.
    pub fn add_connection(
        &mut self,
        line:      &str,
        trip_key:  &str,
        from:      StopId,
        to:        StopId,
        departure: SimTime,
        arrival:   SimTime,
    ) -> TransitTripId {
        let trip = match self.trip_index.get(trip_key) {
            Some(&t) => t,
            None => {
                let t = TransitTripId(self.trip_lines.len() as u32);
                self.trip_lines.push(line.to_owned());
                self.trip_index.insert(trip_key.to_owned(), t);
                t
            }
        };
        self.connections.push(Connection { trip, from, to, departure, arrival });
        trip
    }

    pub fn stop_count(&self) -> usize { self.stops.len() }
    pub fn connection_count(&self) -> usize { self.connections.len() }

    /// Consume the builder and produce a [`TimetableGraph`].
    ///
    /// Fails with [`GraphError::Empty`] if there are no stops or no
    /// connections.
    pub fn build(self) -> GraphResult<TimetableGraph> {
        if self.stops.is_empty() {
            return Err(GraphError::Empty("stops"));
        }
        if self.connections.is_empty() {
            return Err(GraphError::Empty("connections"));
        }

        let mut connections = self.connections;
        connections.sort_by_key(|c| (c.departure, c.arrival));

        // Project around the stop centroid so planar distances are metres.
        let n = self.stops.len() as f64;
        let centroid = GeoPoint::new(
            self.stops.iter().map(|s| s.pos.lat).sum::<f64>() / n,
            self.stops.iter().map(|s| s.pos.lon).sum::<f64>() / n,
        );
        let projection = CoordTransform::LocalTangent { origin: centroid };

        let entries: Vec<StopEntry> = self
            .stops
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let c = projection.from_wgs84(s.pos);
                StopEntry { point: [c.x, c.y], id: StopId(i as u32) }
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        let (footpath_start, footpaths) =
            build_footpaths(&self.stops, &spatial_idx, projection, self.max_transfer_walk_m);

        Ok(TimetableGraph {
            stops: self.stops,
            connections,
            trip_lines: self.trip_lines,
            footpath_start,
            footpaths,
            spatial_idx,
            projection,
        })
    }
}

impl Default for TimetableGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// CSR footpath arrays: nearby pairs plus every same-area pair.
fn build_footpaths(
    stops:      &[Stop],
    index:      &RTree<StopEntry>,
    projection: CoordTransform,
    radius_m:   f64,
) -> (Vec<u32>, Vec<Footpath>) {
    let mut by_area: HashMap<&str, Vec<StopId>> = HashMap::new();
    for (i, s) in stops.iter().enumerate() {
        if let Some(area) = s.area.as_deref() {
            by_area.entry(area).or_default().push(StopId(i as u32));
        }
    }

    let mut footpath_start = Vec::with_capacity(stops.len() + 1);
    let mut footpaths = Vec::new();

    for (i, stop) in stops.iter().enumerate() {
        footpath_start.push(footpaths.len() as u32);
        let from = StopId(i as u32);

        let mut targets: Vec<(StopId, f64)> =
            stops_within(index, projection, stops, stop.pos, radius_m);
        if let Some(mates) = stop.area.as_deref().and_then(|a| by_area.get(a)) {
            for &m in mates {
                if !targets.iter().any(|&(t, _)| t == m) {
                    targets.push((m, stop.pos.distance_m(stops[m.index()].pos)));
                }
            }
        }

        for (to, distance_m) in targets {
            if to == from {
                continue;
            }
            let same_area = stop.area.is_some() && stop.area == stops[to.index()].area;
            footpaths.push(Footpath { to, distance_m, same_area });
        }
    }
    footpath_start.push(footpaths.len() as u32);

    (footpath_start, footpaths)
}
