//! Geographic coordinates and the scenario ↔ WGS-84 transform.
//!
//! The simulation works in a projected scenario CRS (`Coord`, metres) while
//! the routing graph is queried in WGS-84 (`GeoPoint`).  `CoordTransform`
//! converts between the two; it is fixed for the lifetime of the process.
//!
//! Both types use `f64`: projected scenario coordinates are routinely in the
//! millions of metres, where `f32` would lose sub-metre precision.

/// Mean Earth radius in metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

// ── GeoPoint ──────────────────────────────────────────────────────────────────

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

// ── Coord ─────────────────────────────────────────────────────────────────────

/// A point in the scenario coordinate reference system.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in scenario units.
    #[inline]
    pub fn distance(self, other: Coord) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[x={:.1} y={:.1}]", self.x, self.y)
    }
}

// ── CoordTransform ────────────────────────────────────────────────────────────

/// Conversion between the scenario CRS and WGS-84.
///
/// | Variant        | Scenario coordinates                                   |
/// |----------------|--------------------------------------------------------|
/// | `Wgs84`        | already geographic: `x = lon`, `y = lat`               |
/// | `LocalTangent` | metres east (`x`) / north (`y`) of `origin`, equirectangular |
///
/// `LocalTangent` is accurate to well under 0.5 % within ~50 km of the
/// origin, which covers a metropolitan scenario.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum CoordTransform {
    #[default]
    Wgs84,
    LocalTangent { origin: GeoPoint },
}

impl CoordTransform {
    /// Scenario CRS → WGS-84.
    pub fn to_wgs84(self, c: Coord) -> GeoPoint {
        match self {
            CoordTransform::Wgs84 => GeoPoint::new(c.y, c.x),
            CoordTransform::LocalTangent { origin } => {
                let lat = origin.lat + (c.y / EARTH_RADIUS_M).to_degrees();
                let lon = origin.lon
                    + (c.x / (EARTH_RADIUS_M * origin.lat.to_radians().cos())).to_degrees();
                GeoPoint::new(lat, lon)
            }
        }
    }

    /// WGS-84 → scenario CRS.
    pub fn from_wgs84(self, p: GeoPoint) -> Coord {
        match self {
            CoordTransform::Wgs84 => Coord::new(p.lon, p.lat),
            CoordTransform::LocalTangent { origin } => {
                let y = (p.lat - origin.lat).to_radians() * EARTH_RADIUS_M;
                let x = (p.lon - origin.lon).to_radians()
                    * EARTH_RADIUS_M
                    * origin.lat.to_radians().cos();
                Coord::new(x, y)
            }
        }
    }
}
