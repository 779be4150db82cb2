//! Core library for the `weather-icon` CLI.
//!
//! This crate defines:
//! - Categorical features derived from one hour of weather readings
//! - Day phase from a day's sun events
//! - The decision table from features to a Weather Icons class
//! - Configuration of scales and icon mode
//!
//! It is used by `weather-icon-cli`, but can also be reused by other binaries or services.

pub mod classifier;
pub mod config;
pub mod day_phase;
pub mod error;
pub mod features;
pub mod icon;
pub mod model;
pub mod scale;

pub use classifier::Classifier;
pub use config::{Config, ScaleSetting};
pub use day_phase::{DayPhase, NightFlag, day_phase};
pub use error::{ClassifyError, ScaleError};
pub use features::{CloudCategory, Feature, PrecipCategory, WindCategory};
pub use icon::{IconMode, IconTable};
pub use model::{
    AstronomyDay, CategoricalFeatures, IconResult, WeatherObservation, parse_astronomy,
    parse_observation,
};
pub use scale::{Bucket, Scale};

/// Classify with the default scales and icon mode.
pub fn classify(
    observation: &WeatherObservation,
    astronomy: Option<&AstronomyDay>,
    instant: Option<chrono::DateTime<chrono::Utc>>,
) -> Result<IconResult, ClassifyError> {
    Classifier::default().classify(observation, astronomy, instant)
}
