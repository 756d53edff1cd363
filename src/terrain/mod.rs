use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ensure_finite, ensure_positive, LosError, Result};
use crate::geo::{Endpoint, LatLon};

/// Source of ground elevation (meters above sea level), typically an
/// elevation service or a DEM tile cache owned by the caller.
pub trait TerrainProvider {
    fn get_altitude(&self, loc: LatLon) -> f64;
}

/// Terrain at a constant altitude everywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatTerrain {
    pub altitude: f64,
}

impl TerrainProvider for FlatTerrain {
    fn get_altitude(&self, _loc: LatLon) -> f64 {
        self.altitude
    }
}

impl<F> TerrainProvider for F
where
    F: Fn(LatLon) -> f64,
{
    fn get_altitude(&self, loc: LatLon) -> f64 {
        self(loc)
    }
}

/// Ordered samples from endpoint A to endpoint B.
///
/// Invariants (checked by every constructor): at least two samples, equal
/// array lengths, all values finite, `distance_m` starts at zero and is
/// strictly increasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawProfile")]
pub struct TerrainProfile {
    distance_m: Vec<f64>,
    ground_elevation_m: Vec<f64>,
    straight_line_m: Vec<f64>,
}

#[derive(Deserialize)]
struct RawProfile {
    distance_m: Vec<f64>,
    ground_elevation_m: Vec<f64>,
    straight_line_m: Vec<f64>,
}

impl TryFrom<RawProfile> for TerrainProfile {
    type Error = LosError;

    fn try_from(raw: RawProfile) -> Result<Self> {
        TerrainProfile::new(raw.distance_m, raw.ground_elevation_m, raw.straight_line_m)
    }
}

impl TerrainProfile {
    pub fn new(
        distance_m: Vec<f64>,
        ground_elevation_m: Vec<f64>,
        straight_line_m: Vec<f64>,
    ) -> Result<Self> {
        let n = distance_m.len();
        if n < 2 {
            return Err(LosError::invalid(format!(
                "profile needs at least 2 samples, got {n}"
            )));
        }
        if ground_elevation_m.len() != n || straight_line_m.len() != n {
            return Err(LosError::invalid(format!(
                "profile arrays differ in length: distance {n}, ground {}, straight line {}",
                ground_elevation_m.len(),
                straight_line_m.len()
            )));
        }
        if let Some(i) = (0..n).find(|&i| {
            !(distance_m[i].is_finite()
                && ground_elevation_m[i].is_finite()
                && straight_line_m[i].is_finite())
        }) {
            return Err(LosError::invalid(format!("non-finite value in profile sample {i}")));
        }
        if distance_m[0] != 0.0 {
            return Err(LosError::invalid(format!(
                "profile must start at distance 0, got {}",
                distance_m[0]
            )));
        }
        if let Some((i, _)) = distance_m
            .iter()
            .tuple_windows::<(&f64, &f64)>()
            .find_position(|(a, b)| b <= a)
        {
            return Err(LosError::invalid(format!(
                "profile distances must be strictly increasing (sample {})",
                i + 1
            )));
        }

        Ok(Self {
            distance_m,
            ground_elevation_m,
            straight_line_m,
        })
    }

    /// Builds the straight-line reference by interpolating between the two
    /// antenna tops (meters above sea level).
    pub fn from_ground(
        distance_m: Vec<f64>,
        ground_elevation_m: Vec<f64>,
        top_a_m: f64,
        top_b_m: f64,
    ) -> Result<Self> {
        ensure_finite("antenna top A", top_a_m)?;
        ensure_finite("antenna top B", top_b_m)?;
        let total = distance_m.last().copied().unwrap_or(0.0);
        let straight_line_m = distance_m
            .iter()
            .map(|&d| {
                let t = if total > 0.0 { d / total } else { 0.0 };
                top_a_m + (top_b_m - top_a_m) * t
            })
            .collect();
        Self::new(distance_m, ground_elevation_m, straight_line_m)
    }

    /// The same path seen from endpoint B.
    pub fn reversed(&self) -> Self {
        let total = self.total_distance_m();
        let mut distance_m: Vec<f64> = self.distance_m.iter().rev().map(|&d| total - d).collect();
        // Pin both ends so the result still satisfies the invariants exactly.
        distance_m[0] = 0.0;
        let last = distance_m.len() - 1;
        distance_m[last] = total;

        Self {
            distance_m,
            ground_elevation_m: self.ground_elevation_m.iter().rev().copied().collect(),
            straight_line_m: self.straight_line_m.iter().rev().copied().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.distance_m.len()
    }

    /// Always false: a valid profile has at least two samples.
    pub fn is_empty(&self) -> bool {
        self.distance_m.is_empty()
    }

    pub fn total_distance_m(&self) -> f64 {
        self.distance_m[self.distance_m.len() - 1]
    }

    pub fn distance_m(&self) -> &[f64] {
        &self.distance_m
    }

    pub fn ground_elevation_m(&self) -> &[f64] {
        &self.ground_elevation_m
    }

    pub fn straight_line_m(&self) -> &[f64] {
        &self.straight_line_m
    }
}

/// Upper bound on samples per profile.
pub const MAX_SAMPLES: usize = 1_000_000;

/// Builds a [`TerrainProfile`] between two endpoints by querying a
/// [`TerrainProvider`] at (at most) `step_m` spacing.
#[derive(Debug, Clone, Copy)]
pub struct ProfileSampler {
    step_m: f64,
}

impl ProfileSampler {
    pub fn new(step_m: f64) -> Result<Self> {
        ensure_positive("step (m)", step_m)?;
        Ok(Self { step_m })
    }

    pub fn sample<T: TerrainProvider + ?Sized>(
        &self,
        home: &Endpoint,
        target: &Endpoint,
        terrain: &T,
    ) -> Result<TerrainProfile> {
        for (name, ep) in [("home", home), ("target", target)] {
            if !ep.location().is_valid() {
                return Err(LosError::invalid(format!(
                    "{name} coordinates out of range: {}, {}",
                    ep.latitude, ep.longitude
                )));
            }
            ensure_finite(&format!("{name} ground elevation"), ep.ground_elevation_m)?;
            ensure_finite(&format!("{name} antenna height"), ep.antenna_height_agl_m)?;
        }

        let dist_m = home.distance_to_m(target);
        if dist_m < 1.0 {
            return Err(LosError::invalid(format!(
                "endpoints '{}' and '{}' are too close to profile ({dist_m:.3} m)",
                home.id, target.id
            )));
        }

        let segments = (dist_m / self.step_m).ceil().max(1.0);
        if segments >= MAX_SAMPLES as f64 {
            return Err(LosError::invalid(format!(
                "step of {} m over {dist_m:.1} m needs more than {MAX_SAMPLES} samples",
                self.step_m
            )));
        }
        let segments = segments as usize;
        let (a, b) = (home.location(), target.location());

        let mut distance_m = Vec::with_capacity(segments + 1);
        let mut ground_m = Vec::with_capacity(segments + 1);
        for i in 0..=segments {
            let ratio = i as f64 / segments as f64;
            let ground = if i == 0 {
                home.ground_elevation_m
            } else if i == segments {
                target.ground_elevation_m
            } else {
                terrain.get_altitude(a.lerp(b, ratio))
            };
            distance_m.push(if i == segments { dist_m } else { dist_m * ratio });
            ground_m.push(ground);
        }

        debug!(
            home = %home.id,
            target = %target.id,
            samples = segments + 1,
            distance_m = dist_m,
            "sampled terrain profile"
        );

        TerrainProfile::from_ground(
            distance_m,
            ground_m,
            home.antenna_top_m(),
            target.antenna_top_m(),
        )
    }
}
