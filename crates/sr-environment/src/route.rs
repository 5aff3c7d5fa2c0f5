//! Route-profile collaborator interface.
//!
//! The simulator only needs to know, for a distance travelled along the
//! route, where the car is, how high, how steep, and in which time zone.
//! GIS-backed implementations live outside this workspace; [`WaypointRoute`]
//! covers a polyline through fixed coordinates.

use sr_core::GeoPoint;

use crate::{EnvironmentError, EnvironmentResult};

/// Route state at one distance along the route.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RoutePoint {
    pub coord:            GeoPoint,
    pub elevation_m:      f64,
    /// Rise over run in the direction of travel.
    pub grade:            f64,
    pub utc_offset_hours: f64,
}

/// Supplies position, elevation, and grade along a route.
///
/// Implementations must be pure lookups: the simulator samples them from
/// parallel fitness evaluations.
pub trait RouteProfile: Send + Sync {
    /// Total length in metres, or `None` for a circuit that never ends.
    fn length_m(&self) -> Option<f64>;

    /// Route state `distance_m` metres from the start.  Distances past the
    /// end of a finite route return the finish point.
    fn sample(&self, distance_m: f64) -> RoutePoint;
}

impl<T: RouteProfile + ?Sized> RouteProfile for Box<T> {
    fn length_m(&self) -> Option<f64> {
        (**self).length_m()
    }

    fn sample(&self, distance_m: f64) -> RoutePoint {
        (**self).sample(distance_m)
    }
}

// ── FlatRoute ────────────────────────────────────────────────────────────────

/// A flat, endless route pinned to one location.
///
/// Useful for tests and for track races where circuit geometry is
/// irrelevant to the energy balance.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FlatRoute {
    pub point: RoutePoint,
}

impl FlatRoute {
    pub fn new(coord: GeoPoint, elevation_m: f64, utc_offset_hours: f64) -> Self {
        Self { point: RoutePoint { coord, elevation_m, grade: 0.0, utc_offset_hours } }
    }
}

impl RouteProfile for FlatRoute {
    fn length_m(&self) -> Option<f64> {
        None
    }

    fn sample(&self, _distance_m: f64) -> RoutePoint {
        self.point
    }
}

// ── WaypointRoute ────────────────────────────────────────────────────────────

/// Piecewise-linear route through a sequence of vertices.
///
/// Segment lengths are haversine distances.  Elevation is interpolated
/// linearly along each segment, so grade is constant per segment.  A looped
/// route closes back to its first vertex and repeats forever.
#[derive(Clone, Debug)]
pub struct WaypointRoute {
    vertices:         Vec<GeoPoint>,
    elevations:       Vec<f64>,
    /// `cumulative[i]` = distance from the start to `vertices[i]`.
    cumulative:       Vec<f64>,
    utc_offset_hours: f64,
    looped:           bool,
}

impl WaypointRoute {
    /// Build from `origin → waypoints… → destination`.
    ///
    /// `elevations`, if given, must hold one value per vertex (origin and
    /// destination included); otherwise the route is at sea level.
    pub fn new(
        origin:           GeoPoint,
        waypoints:        &[GeoPoint],
        destination:      GeoPoint,
        elevations:       Option<Vec<f64>>,
        utc_offset_hours: f64,
        looped:           bool,
    ) -> EnvironmentResult<Self> {
        let mut vertices = Vec::with_capacity(waypoints.len() + 2);
        vertices.push(origin);
        vertices.extend_from_slice(waypoints);
        vertices.push(destination);

        let mut elevations = match elevations {
            Some(e) if e.len() != vertices.len() => {
                return Err(EnvironmentError::Route(format!(
                    "{} elevations for {} vertices",
                    e.len(),
                    vertices.len()
                )));
            }
            Some(e) => e,
            None => vec![0.0; vertices.len()],
        };

        if let Some(bad) = vertices.iter().find(|p| !p.is_valid()) {
            return Err(EnvironmentError::Route(format!("invalid coordinate {bad}")));
        }
        if !utc_offset_hours.is_finite() || utc_offset_hours.abs() > 14.0 {
            return Err(EnvironmentError::Route(format!("invalid UTC offset {utc_offset_hours}")));
        }

        if looped && vertices.first() != vertices.last() {
            vertices.push(origin);
            elevations.push(elevations[0]);
        }

        let mut cumulative = Vec::with_capacity(vertices.len());
        let mut acc = 0.0;
        cumulative.push(acc);
        for pair in vertices.windows(2) {
            acc += pair[0].distance_m(pair[1]);
            cumulative.push(acc);
        }

        if looped && acc <= 0.0 {
            return Err(EnvironmentError::Route("looped route has zero length".into()));
        }

        Ok(Self { vertices, elevations, cumulative, utc_offset_hours, looped })
    }

    /// Length of one pass over the vertices (one lap for a looped route).
    #[inline]
    pub fn lap_length_m(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    #[inline]
    pub fn is_looped(&self) -> bool {
        self.looped
    }

    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }
}

impl RouteProfile for WaypointRoute {
    fn length_m(&self) -> Option<f64> {
        if self.looped { None } else { Some(self.lap_length_m()) }
    }

    fn sample(&self, distance_m: f64) -> RoutePoint {
        let lap = self.lap_length_m();
        let d = if self.looped {
            distance_m.rem_euclid(lap)
        } else {
            distance_m.clamp(0.0, lap)
        };

        // Segment i spans cumulative[i]..cumulative[i + 1].
        let last_segment = self.vertices.len().saturating_sub(2);
        let i = self
            .cumulative
            .partition_point(|&c| c <= d)
            .saturating_sub(1)
            .min(last_segment);

        let (p0, p1) = (self.vertices[i], self.vertices[(i + 1).min(self.vertices.len() - 1)]);
        let (e0, e1) = (self.elevations[i], self.elevations[(i + 1).min(self.elevations.len() - 1)]);
        let seg_len = self.cumulative.get(i + 1).copied().unwrap_or(lap) - self.cumulative[i];

        let (t, grade) = if seg_len > 0.0 {
            ((d - self.cumulative[i]) / seg_len, (e1 - e0) / seg_len)
        } else {
            (0.0, 0.0)
        };

        RoutePoint {
            coord:            p0.lerp(p1, t),
            elevation_m:      e0 + (e1 - e0) * t.clamp(0.0, 1.0),
            grade,
            utc_offset_hours: self.utc_offset_hours,
        }
    }
}
