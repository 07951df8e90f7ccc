#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Corridor geometry for route scoring.
//!
//! A [`Corridor`] is the buffered region around a route: a buffered point
//! for a single-point route, a buffered polyline for two or more points.
//! Containment is a distance test against the route geometry in degree
//! space, with the buffer radius converted from meters via a fixed
//! approximate conversion.

use geo::{Distance, Euclidean, Haversine, LineString, Point};
use safe_route_incident_models::{BoundingBox, RoutePoint};

/// Approximate meters per degree of latitude/longitude.
///
/// The real figure varies with latitude (longitude degrees shrink toward
/// the poles); at pedestrian-route scale the distortion is well below the
/// precision the score needs, so the flat conversion is kept deliberately.
/// Changing it would shift corridor membership and break the expected
/// numbers in downstream fixtures.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// Minimum route length in kilometers used for density normalization.
///
/// A single-point route (and any degenerate shorter one) is clamped to
/// this so per-kilometer division never divides by zero.
pub const MIN_ROUTE_LENGTH_KM: f64 = 0.1;

/// Route geometry the buffer is applied around.
enum CorridorGeometry {
    /// Single-point route.
    Point(Point<f64>),
    /// Polyline through two or more route points.
    Polyline(LineString<f64>),
}

/// The buffered region surrounding a route.
///
/// Built once per scoring call and queried per candidate incident.
pub struct Corridor {
    geometry: CorridorGeometry,
    radius_deg: f64,
    bbox: BoundingBox,
}

impl Corridor {
    /// Builds a corridor around `points` with a buffer radius given in
    /// meters.
    ///
    /// Returns `None` for an empty point sequence; an empty route is a
    /// caller contract violation that scoring rejects before using the
    /// corridor.
    #[must_use]
    pub fn build(points: &[RoutePoint], radius_meters: f64) -> Option<Self> {
        let first = points.first()?;
        let radius_deg = radius_meters / METERS_PER_DEGREE;

        let mut west = first.longitude;
        let mut east = first.longitude;
        let mut south = first.latitude;
        let mut north = first.latitude;

        for p in points {
            west = west.min(p.longitude);
            east = east.max(p.longitude);
            south = south.min(p.latitude);
            north = north.max(p.latitude);
        }

        let bbox = BoundingBox::new(
            west - radius_deg,
            south - radius_deg,
            east + radius_deg,
            north + radius_deg,
        );

        let geometry = if points.len() == 1 {
            CorridorGeometry::Point(Point::new(first.longitude, first.latitude))
        } else {
            CorridorGeometry::Polyline(LineString::from(
                points
                    .iter()
                    .map(|p| (p.longitude, p.latitude))
                    .collect::<Vec<_>>(),
            ))
        };

        Some(Self {
            geometry,
            radius_deg,
            bbox,
        })
    }

    /// Returns whether the point lies inside the corridor.
    ///
    /// The boundary is inclusive: a point at distance exactly equal to the
    /// buffer radius is inside.
    #[must_use]
    pub fn contains(&self, longitude: f64, latitude: f64) -> bool {
        let point = Point::new(longitude, latitude);

        let distance_deg = match &self.geometry {
            CorridorGeometry::Point(center) => Euclidean.distance(*center, point),
            CorridorGeometry::Polyline(line) => Euclidean.distance(&point, line),
        };

        distance_deg <= self.radius_deg
    }

    /// The corridor's bounding envelope, for bounding repository fetches.
    #[must_use]
    pub const fn bounding_box(&self) -> &BoundingBox {
        &self.bbox
    }

    /// The buffer radius in degrees.
    #[must_use]
    pub const fn radius_deg(&self) -> f64 {
        self.radius_deg
    }
}

/// Computes the route length in kilometers by great-circle (haversine)
/// summation over consecutive point pairs, clamped to
/// [`MIN_ROUTE_LENGTH_KM`].
#[must_use]
pub fn route_length_km(points: &[RoutePoint]) -> f64 {
    let mut meters = 0.0;

    for pair in points.windows(2) {
        let a = Point::new(pair[0].longitude, pair[0].latitude);
        let b = Point::new(pair[1].longitude, pair[1].latitude);
        meters += Haversine.distance(a, b);
    }

    (meters / 1_000.0).max(MIN_ROUTE_LENGTH_KM)
}
