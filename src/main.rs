use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use repeater_los::analysis::ProfileAnalyzer;
use repeater_los::config::LosConfig;
use repeater_los::io::{load_profile_csv, load_request_json, LosSummary};
use repeater_los::screen::{PathInputs, QuickScreen};
use repeater_los::terrain::{FlatTerrain, ProfileSampler};

/// Line-of-sight and Fresnel clearance estimates for repeater paths
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a terrain profile CSV (distance_m, ground_m, los_m)
    Analyze {
        #[arg(long)]
        profile: PathBuf,
        #[arg(long)]
        freq_mhz: Option<f64>,
        #[arg(long)]
        k_factor: Option<f64>,
        #[arg(long)]
        fresnel_fraction: Option<f64>,
        /// Print every sample, not just the summary
        #[arg(long)]
        full: bool,
    },
    /// Analyze a home/repeater request JSON over flat terrain at the endpoints' mean elevation
    Request {
        #[arg(long)]
        request: PathBuf,
        /// Sample spacing in meters, overriding the request and config
        #[arg(long)]
        step_m: Option<f64>,
    },
    /// Quick horizon and midpoint-Fresnel screen without terrain
    Screen {
        #[arg(long)]
        distance_mi: f64,
        #[arg(long)]
        h1_ft: f64,
        #[arg(long)]
        h2_ft: f64,
        #[arg(long, default_value_t = 146.0)]
        freq_mhz: f64,
        /// Trust the optical horizon and skip the midpoint check
        #[arg(long)]
        trust_strict: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("repeater_los=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = LosConfig::load_or_default(args.config.as_deref())?;

    match args.command {
        Command::Analyze {
            profile,
            freq_mhz,
            k_factor,
            fresnel_fraction,
            full,
        } => {
            let profile = load_profile_csv(&profile)?;
            let mut params = config.path;
            if let Some(f) = freq_mhz {
                params.frequency_mhz = f;
            }
            if let Some(k) = k_factor {
                params.k_factor = k;
            }
            if let Some(frac) = fresnel_fraction {
                params.fresnel_fraction = frac;
            }
            tracing::info!(samples = profile.len(), "analyzing profile");
            let result = ProfileAnalyzer::new().analyze(&profile, &params)?;
            if full {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&LosSummary::from(&result))?);
            }
        }
        Command::Request { request, step_m } => {
            let (home, repeater, mut params) = load_request_json(&request)?.resolve(&config);
            if let Some(step) = step_m {
                params.step_m = step;
            }
            let terrain = FlatTerrain {
                altitude: (home.ground_elevation_m + repeater.ground_elevation_m) / 2.0,
            };
            let screen = QuickScreen { trust_strict_horizon: config.trust_strict_horizon }
                .classify_endpoints(&home, &repeater, &params)?;
            let profile = ProfileSampler::new(params.step_m)?
                .sample(&home, &repeater, &terrain)
                .with_context(|| format!("Failed to profile {} -> {}", home.id, repeater.id))?;
            let result = ProfileAnalyzer::new().analyze(&profile, &params)?;
            let out = serde_json::json!({
                "screen": screen,
                "summary": LosSummary::from(&result),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Command::Screen {
            distance_mi,
            h1_ft,
            h2_ft,
            freq_mhz,
            trust_strict,
        } => {
            let inputs = PathInputs::new(distance_mi, freq_mhz, h1_ft, h2_ft)
                .with_fresnel_fraction(config.path.fresnel_fraction);
            let screen = QuickScreen {
                trust_strict_horizon: trust_strict || config.trust_strict_horizon,
            };
            let result = screen.classify(&inputs)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
