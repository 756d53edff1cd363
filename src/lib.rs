pub mod analysis;
pub mod config;
pub mod error;
pub mod geo;
pub mod io;
pub mod physics;
pub mod rating;
pub mod screen;
pub mod terrain;
pub mod units;


pub use crate::analysis::{ClearanceResult, PathParameters, ProfileAnalyzer};
pub use crate::error::{LosError, Result};
pub use crate::geo::{Endpoint, LatLon};
pub use crate::screen::{PathInputs, QuickScreen, ScreenReason, ScreenResult, Verdict};
pub use crate::terrain::{ProfileSampler, TerrainProfile, TerrainProvider};
