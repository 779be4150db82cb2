//! Decision table from categorical features to a Weather Icons class name.
//! See <https://erikflowers.github.io/weather-icons/> for the glyphs.
//!
//! The table is expanded from a few compact rows into one entry per
//! `(precipitation, clouds, wind, night)` tuple, so the odd entries below
//! are visible as data instead of being buried in branches.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{
    day_phase::NightFlag,
    error::ClassifyError,
    features::{CloudCategory, PrecipCategory, WindCategory},
};

/// How faithfully to reproduce the historical icon assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconMode {
    /// Emit exactly what the deployed icon set has always shown, including
    /// the rain/showers swap.
    #[default]
    Compatible,
    /// Rain maps to `*-rain` and showers to `*-showers`.
    Corrected,
}

impl IconMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconMode::Compatible => "compatible",
            IconMode::Corrected => "corrected",
        }
    }

    pub const fn all() -> &'static [IconMode] {
        &[IconMode::Compatible, IconMode::Corrected]
    }
}

impl std::fmt::Display for IconMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for IconMode {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "compatible" => Ok(IconMode::Compatible),
            "corrected" => Ok(IconMode::Corrected),
            _ => Err(anyhow::anyhow!(
                "Unknown icon mode '{value}'. Supported modes: compatible, corrected."
            )),
        }
    }
}

/// Icons in night, day, neutral order.
type Triple = [&'static str; 3];

/// Dry weather: one row per cloud/wind pair.
const DRY: &[(CloudCategory, WindCategory, Triple)] = {
    use CloudCategory::*;
    use WindCategory::*;

    // no neutral clear-sky glyph exists, so neutral falls back to the day icon
    const CLEAR_CALM: Triple = ["wi-night-clear", "wi-day-sunny", "wi-day-sunny"];
    const PARTLY_CALM: Triple = ["wi-night-alt-partly-cloudy", "wi-day-sunny-overcast", "wi-cloud"];
    const CLOUDY_CALM: Triple = ["wi-night-alt-cloudy", "wi-day-cloudy", "wi-cloudy"];
    const CLOUDY_WINDY: Triple =
        ["wi-night-alt-cloudy-windy", "wi-day-cloudy-windy", "wi-cloudy-windy"];
    const CLOUDY_GUSTS: Triple =
        ["wi-night-alt-cloudy-gusts", "wi-day-cloudy-gusts", "wi-cloudy-gusts"];

    &[
        // light wind has no glyph of its own and shows as calm
        (Clear, Calm, CLEAR_CALM),
        (Clear, Light, CLEAR_CALM),
        // there is no wi-night-light-wind or wi-night-windy; night uses the neutral glyph
        (Clear, Windy, ["wi-windy", "wi-day-light-wind", "wi-windy"]),
        (Clear, Strong, ["wi-strong-wind", "wi-day-windy", "wi-strong-wind"]),
        (PartlyCloudy, Calm, PARTLY_CALM),
        (PartlyCloudy, Light, PARTLY_CALM),
        (PartlyCloudy, Windy, CLOUDY_WINDY),
        (PartlyCloudy, Strong, CLOUDY_GUSTS),
        (Cloudy, Calm, CLOUDY_CALM),
        (Cloudy, Light, CLOUDY_CALM),
        (Cloudy, Windy, CLOUDY_WINDY),
        (Cloudy, Strong, CLOUDY_GUSTS),
    ]
};

/// Wet weather ignores wind. Each row is the night/day/neutral triple for
/// broken skies and the single neutral glyph used under full cloud.
const WET: &[(PrecipCategory, Triple, &str)] = &[
    (PrecipCategory::Snow, ["wi-night-alt-snow", "wi-day-snow", "wi-snow"], "wi-snow"),
    (
        PrecipCategory::Sprinkles,
        ["wi-night-alt-sprinkle", "wi-day-sprinkle", "wi-sprinkle"],
        "wi-sprinkle",
    ),
    (
        PrecipCategory::LightRain,
        ["wi-night-alt-sprinkle", "wi-day-sprinkle", "wi-sprinkle"],
        "wi-sprinkle",
    ),
    // rain and showers glyphs are swapped in the deployed set
    (
        PrecipCategory::Rain,
        ["wi-night-alt-showers", "wi-day-showers", "wi-showers"],
        "wi-showers",
    ),
    (
        PrecipCategory::Showers,
        ["wi-night-alt-rain", "wi-day-rain", "wi-rain"],
        "wi-rain",
    ),
];

fn pick(triple: &Triple, night: NightFlag) -> &'static str {
    match night {
        NightFlag::Night => triple[0],
        NightFlag::Day => triple[1],
        NightFlag::Unknown => triple[2],
    }
}

fn unswap(icon: &'static str) -> &'static str {
    match icon {
        "wi-showers" => "wi-rain",
        "wi-rain" => "wi-showers",
        "wi-day-showers" => "wi-day-rain",
        "wi-day-rain" => "wi-day-showers",
        "wi-night-alt-showers" => "wi-night-alt-rain",
        "wi-night-alt-rain" => "wi-night-alt-showers",
        other => other,
    }
}

pub type IconKey = (PrecipCategory, CloudCategory, WindCategory, NightFlag);

#[derive(Debug, Clone)]
pub struct IconTable {
    mode: IconMode,
    entries: HashMap<IconKey, &'static str>,
}

impl IconTable {
    pub fn new(mode: IconMode) -> Self {
        let mut entries = HashMap::new();

        for &(clouds, wind, triple) in DRY {
            for &night in NightFlag::all() {
                entries.insert((PrecipCategory::None, clouds, wind, night), pick(&triple, night));
            }
        }

        for &(precip, triple, overcast) in WET {
            let unswapped = mode == IconMode::Corrected
                && matches!(precip, PrecipCategory::Rain | PrecipCategory::Showers);

            for &clouds in CloudCategory::all() {
                for &wind in WindCategory::all() {
                    for &night in NightFlag::all() {
                        let icon = if clouds == CloudCategory::Cloudy {
                            overcast
                        } else {
                            pick(&triple, night)
                        };
                        let icon = if unswapped { unswap(icon) } else { icon };
                        entries.insert((precip, clouds, wind, night), icon);
                    }
                }
            }
        }

        Self { mode, entries }
    }

    pub fn mode(&self) -> IconMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn resolve(&self, key: IconKey) -> Result<&'static str, ClassifyError> {
        let (precipitation, clouds, wind, night) = key;

        self.entries.get(&key).copied().ok_or(ClassifyError::UnsupportedCombination {
            precipitation,
            clouds,
            wind,
            night,
        })
    }
}

impl Default for IconTable {
    fn default() -> Self {
        Self::new(IconMode::default())
    }
}
