use serde::{Deserialize, Serialize};

/// Mean earth radius used by every curvature and distance formula in the crate.
pub const EARTH_RADIUS: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLon {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLon {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude.abs() <= 90.0
            && self.longitude.abs() <= 180.0
    }

    /// Point a fraction `t` of the way towards `other`.
    /// Linear in lat/lon, which is fine for repeater-scale paths away from the poles.
    pub fn lerp(&self, other: LatLon, t: f64) -> LatLon {
        LatLon {
            latitude: self.latitude + (other.latitude - self.latitude) * t,
            longitude: self.longitude + (other.longitude - self.longitude) * t,
        }
    }
}

/// One terminal of a radio path (a home station or a repeater site).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub ground_elevation_m: f64,
    pub antenna_height_agl_m: f64,
}

impl Endpoint {
    pub fn location(&self) -> LatLon {
        LatLon::new(self.latitude, self.longitude)
    }

    /// Antenna top above sea level.
    pub fn antenna_top_m(&self) -> f64 {
        self.ground_elevation_m + self.antenna_height_agl_m
    }

    /// Great-circle distance to another endpoint in meters.
    pub fn distance_to_m(&self, other: &Endpoint) -> f64 {
        calculate_geodesic(self.location(), other.location()).0
    }
}

/// Great-circle (haversine) distance in meters and initial bearing in degrees.
pub fn calculate_geodesic(p1: LatLon, p2: LatLon) -> (f64, f64) {
    let lat1 = p1.latitude.to_radians();
    let lat2 = p2.latitude.to_radians();
    let dlat = (p2.latitude - p1.latitude).to_radians();
    let dlon = (p2.longitude - p1.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    let dist = EARTH_RADIUS * c;

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    let bearing = y.atan2(x).to_degrees().rem_euclid(360.0);

    (dist, bearing)
}
