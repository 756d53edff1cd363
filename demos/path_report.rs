use repeater_los::analysis::{PathParameters, ProfileAnalyzer};
use repeater_los::geo::{Endpoint, LatLon};
use repeater_los::rating::LinkRating;
use repeater_los::screen::QuickScreen;
use repeater_los::terrain::ProfileSampler;

fn main() -> anyhow::Result<()> {
    let home = Endpoint {
        id: "Home".to_string(),
        latitude: 45.1,
        longitude: 5.2,
        ground_elevation_m: 220.0,
        antenna_height_agl_m: 1.5,
    };
    let repeater = Endpoint {
        id: "W1XYZ".to_string(),
        latitude: 45.16,
        longitude: 5.31,
        ground_elevation_m: 950.0,
        antenna_height_agl_m: 15.0,
    };

    // A single ridge a third of the way along the path
    let terrain = |loc: LatLon| {
        let ridge = (-((loc.longitude - 5.24) * 120.0).powi(2)).exp() * 420.0;
        220.0 + (loc.longitude - 5.2) * 6000.0 + ridge
    };

    let params = PathParameters::default();
    println!(
        "Path {} -> {}: {:.2} km",
        home.id,
        repeater.id,
        home.distance_to_m(&repeater) / 1000.0
    );

    let screen = QuickScreen::new().classify_endpoints(&home, &repeater, &params)?;
    println!(
        "Quick screen: {:?} ({}), horizons {:.1} / {:.1} mi",
        screen.verdict,
        screen.reason.as_str(),
        screen.strict_horizon_mi,
        screen.standard_horizon_mi
    );

    let profile = ProfileSampler::new(params.step_m)?.sample(&home, &repeater, &terrain)?;
    let result = ProfileAnalyzer::new().analyze(&profile, &params)?;

    println!(
        "LOS: {} - Min clearance: {:.1} ft at {:.2} km - {}",
        if result.has_line_of_sight { "Yes" } else { "No" },
        result.min_clearance_ft(),
        result.distance_m[result.worst_sample_index] / 1000.0,
        LinkRating::for_result(&result)
    );
    Ok(())
}
