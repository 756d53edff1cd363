use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analysis::{ClearanceResult, PathParameters};
use crate::config::LosConfig;
use crate::geo::Endpoint;
use crate::rating::LinkRating;
use crate::terrain::TerrainProfile;

/// One row of a profile CSV.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ProfileRow {
    pub distance_m: f64,
    pub ground_m: f64,
    pub los_m: f64,
}

pub fn load_profile_csv(path: impl AsRef<Path>) -> Result<TerrainProfile> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    read_profile_csv(file).with_context(|| format!("Failed to read profile {:?}", path))
}

pub fn read_profile_csv<R: std::io::Read>(reader: R) -> Result<TerrainProfile> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut distance = Vec::new();
    let mut ground = Vec::new();
    let mut los = Vec::new();
    for row in rdr.deserialize() {
        let row: ProfileRow = row?;
        distance.push(row.distance_m);
        ground.push(row.ground_m);
        los.push(row.los_m);
    }
    Ok(TerrainProfile::new(distance, ground, los)?)
}

pub fn write_profile_csv<W: std::io::Write>(writer: W, profile: &TerrainProfile) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for ((&distance_m, &ground_m), &los_m) in profile
        .distance_m()
        .iter()
        .zip(profile.ground_elevation_m())
        .zip(profile.straight_line_m())
    {
        wtr.serialize(ProfileRow { distance_m, ground_m, los_m })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Endpoint as submitted by a client; antenna height may be missing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EndpointRequest {
    pub id: String,
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lng")]
    pub longitude: f64,
    #[serde(alias = "elevation")]
    pub ground_elevation_m: f64,
    #[serde(default, alias = "agl")]
    pub antenna_height_agl_m: Option<f64>,
}

impl EndpointRequest {
    fn resolve(self, default_agl_m: f64) -> Endpoint {
        Endpoint {
            id: self.id,
            latitude: self.latitude,
            longitude: self.longitude,
            ground_elevation_m: self.ground_elevation_m,
            antenna_height_agl_m: self
                .antenna_height_agl_m
                .filter(|h| h.is_finite())
                .unwrap_or(default_agl_m),
        }
    }
}

/// A home/repeater pair plus analysis options.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LosRequest {
    pub home: EndpointRequest,
    pub repeater: EndpointRequest,
    #[serde(default)]
    pub options: Option<PathParameters>,
}

impl LosRequest {
    /// Fills missing antenna heights and options from `config`.
    pub fn resolve(self, config: &LosConfig) -> (Endpoint, Endpoint, PathParameters) {
        (
            self.home.resolve(config.home_agl_m),
            self.repeater.resolve(config.repeater_agl_m),
            self.options.unwrap_or(config.path),
        )
    }
}

pub fn load_request_json(path: impl AsRef<Path>) -> Result<LosRequest> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    let request = serde_json::from_reader(std::io::BufReader::new(file))
        .with_context(|| format!("Failed to parse request {:?}", path))?;
    Ok(request)
}

/// Compact summary of a [`ClearanceResult`] for display layers.
#[derive(Debug, Clone, Serialize)]
pub struct LosSummary {
    pub los: bool,
    pub geometric_los: bool,
    pub min_clearance_m: f64,
    pub min_clearance_ft: f64,
    pub worst_index: usize,
    pub distance_m: f64,
    pub margin: Option<f64>,
    pub stars: u8,
    pub rating: String,
    pub freq_mhz: f64,
    pub k_factor: f64,
    pub fresnel_fraction: f64,
}

impl From<&ClearanceResult> for LosSummary {
    fn from(r: &ClearanceResult) -> Self {
        let rating = LinkRating::for_result(r);
        Self {
            los: r.has_line_of_sight,
            geometric_los: r.has_geometric_los,
            min_clearance_m: r.min_clearance_m,
            min_clearance_ft: r.min_clearance_ft(),
            worst_index: r.worst_sample_index,
            distance_m: r.total_distance_m,
            margin: r.margin_ratio(),
            stars: rating.stars(),
            rating: rating.to_string(),
            freq_mhz: r.params.frequency_mhz,
            k_factor: r.params.k_factor,
            fresnel_fraction: r.params.fresnel_fraction,
        }
    }
}
