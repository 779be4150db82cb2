//! Categorical features derived from one hour of weather readings, and the
//! named scale presets that produce them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::scale::{Bucket, Scale};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrecipCategory {
    None,
    Sprinkles,
    LightRain,
    Rain,
    Showers,
    Snow,
}

impl PrecipCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrecipCategory::None => "none",
            PrecipCategory::Sprinkles => "sprinkles",
            PrecipCategory::LightRain => "light_rain",
            PrecipCategory::Rain => "rain",
            PrecipCategory::Showers => "showers",
            PrecipCategory::Snow => "snow",
        }
    }

    pub const fn all() -> &'static [PrecipCategory] {
        &[
            PrecipCategory::None,
            PrecipCategory::Sprinkles,
            PrecipCategory::LightRain,
            PrecipCategory::Rain,
            PrecipCategory::Showers,
            PrecipCategory::Snow,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloudCategory {
    Clear,
    PartlyCloudy,
    Cloudy,
}

impl CloudCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CloudCategory::Clear => "clear",
            CloudCategory::PartlyCloudy => "partly_cloudy",
            CloudCategory::Cloudy => "cloudy",
        }
    }

    pub const fn all() -> &'static [CloudCategory] {
        &[CloudCategory::Clear, CloudCategory::PartlyCloudy, CloudCategory::Cloudy]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindCategory {
    Calm,
    Light,
    Windy,
    Strong,
}

impl WindCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindCategory::Calm => "calm",
            WindCategory::Light => "light",
            WindCategory::Windy => "windy",
            WindCategory::Strong => "strong",
        }
    }

    pub const fn all() -> &'static [WindCategory] {
        &[WindCategory::Calm, WindCategory::Light, WindCategory::Windy, WindCategory::Strong]
    }
}

impl fmt::Display for PrecipCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for CloudCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for WindCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A category together with the phrase describing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature<C> {
    pub category: C,
    pub phrase: String,
}

impl<C: Copy> From<&Bucket<C>> for Feature<C> {
    fn from(bucket: &Bucket<C>) -> Self {
        Self { category: bucket.category, phrase: bucket.phrase.clone() }
    }
}

pub const SNOW_PHRASE: &str = "snow";

/// Snow wins over any rain amount; otherwise the rain amount is bucketed.
pub fn precipitation(
    scale: &Scale<PrecipCategory>,
    precipitation: f64,
    snowfall: f64,
) -> Feature<PrecipCategory> {
    if snowfall > 0.0 {
        return Feature { category: PrecipCategory::Snow, phrase: SNOW_PHRASE.to_string() };
    }

    scale.classify(precipitation).into()
}

pub fn clouds(scale: &Scale<CloudCategory>, cloud_cover: f64) -> Feature<CloudCategory> {
    scale.classify(cloud_cover).into()
}

pub fn wind(scale: &Scale<WindCategory>, wind_speed: f64) -> Feature<WindCategory> {
    scale.classify(wind_speed).into()
}

pub const PRECIPITATION_PRESETS: &[&str] = &["standard", "legacy"];
pub const CLOUD_PRESETS: &[&str] = &["standard", "metar"];
pub const WIND_PRESETS: &[&str] = &["standard", "beaufort"];

fn standard_precipitation() -> Scale<PrecipCategory> {
    Scale::preset(
        "standard",
        vec![
            Bucket::upto(0.0, "", PrecipCategory::None),
            Bucket::upto(0.1, "sprinkles", PrecipCategory::Sprinkles),
            Bucket::upto(0.25, "light rain", PrecipCategory::LightRain),
            Bucket::upto(0.75, "rain", PrecipCategory::Rain),
            Bucket::above("showers", PrecipCategory::Showers),
        ],
    )
}

fn standard_clouds() -> Scale<CloudCategory> {
    Scale::preset(
        "standard",
        vec![
            Bucket::upto(25.0, "clear", CloudCategory::Clear),
            Bucket::upto(75.0, "partly cloudy", CloudCategory::PartlyCloudy),
            Bucket::above("cloudy", CloudCategory::Cloudy),
        ],
    )
}

fn standard_wind() -> Scale<WindCategory> {
    Scale::preset(
        "standard",
        vec![
            Bucket::upto(4.0, "no wind", WindCategory::Calm),
            Bucket::upto(8.0, "light winds", WindCategory::Light),
            Bucket::upto(25.0, "winds", WindCategory::Windy),
            Bucket::above("strong winds", WindCategory::Strong),
        ],
    )
}

impl Default for Scale<PrecipCategory> {
    fn default() -> Self {
        standard_precipitation()
    }
}

impl Default for Scale<CloudCategory> {
    fn default() -> Self {
        standard_clouds()
    }
}

impl Default for Scale<WindCategory> {
    fn default() -> Self {
        standard_wind()
    }
}

/// Rain scale by preset name, in inches per hour. `None` for unknown names.
pub fn precipitation_preset(name: &str) -> Option<Scale<PrecipCategory>> {
    match name {
        "standard" => Some(standard_precipitation()),
        "legacy" => Some(Scale::preset(
            name,
            vec![
                Bucket::upto(0.0, "", PrecipCategory::None),
                Bucket::upto(0.1, "light rain", PrecipCategory::LightRain),
                Bucket::upto(0.3, "rain", PrecipCategory::Rain),
                Bucket::above("showers", PrecipCategory::Showers),
            ],
        )),
        _ => None,
    }
}

/// Cloud cover scale by preset name, in percent. `metar` follows the okta
/// cutoffs of the CLR/FEW/SCT/BKN/OVC sky-condition groups.
pub fn cloud_preset(name: &str) -> Option<Scale<CloudCategory>> {
    use CloudCategory::*;

    match name {
        "standard" => Some(standard_clouds()),
        "metar" => Some(Scale::preset(
            name,
            vec![
                Bucket::upto(12.5, "clear", Clear),
                Bucket::upto(25.0, "few clouds", Clear),
                Bucket::upto(50.0, "scattered clouds", PartlyCloudy),
                Bucket::upto(87.5, "broken clouds", PartlyCloudy),
                Bucket::above("overcast", Cloudy),
            ],
        )),
        _ => None,
    }
}

/// Wind scale by preset name, in mph. `beaufort` groups the force numbers.
pub fn wind_preset(name: &str) -> Option<Scale<WindCategory>> {
    use WindCategory::*;

    match name {
        "standard" => Some(standard_wind()),
        "beaufort" => Some(Scale::preset(
            name,
            vec![
                Bucket::upto(3.0, "calm", Calm),
                Bucket::upto(7.0, "light breeze", Light),
                Bucket::upto(18.0, "moderate breeze", Windy),
                Bucket::upto(31.0, "strong breeze", Strong),
                Bucket::above("gale", Strong),
            ],
        )),
        _ => None,
    }
}
