use chrono::{DateTime, Utc};
use log::debug;

use crate::{
    day_phase::day_phase,
    error::ClassifyError,
    features::{self, CloudCategory, PrecipCategory, WindCategory},
    icon::{IconMode, IconTable},
    model::{AstronomyDay, CategoricalFeatures, IconResult, WeatherObservation},
    scale::Scale,
};

/// Turns one hour of weather, and optionally the day's sun events, into a
/// Weather Icons class and a short description.
///
/// Holds only immutable configuration, so one instance can serve any number
/// of threads.
#[derive(Debug, Clone)]
pub struct Classifier {
    precipitation: Scale<PrecipCategory>,
    clouds: Scale<CloudCategory>,
    wind: Scale<WindCategory>,
    icons: IconTable,
}

impl Classifier {
    pub fn new(
        precipitation: Scale<PrecipCategory>,
        clouds: Scale<CloudCategory>,
        wind: Scale<WindCategory>,
        mode: IconMode,
    ) -> Self {
        Self { precipitation, clouds, wind, icons: IconTable::new(mode) }
    }

    pub fn precipitation_scale(&self) -> &Scale<PrecipCategory> {
        &self.precipitation
    }

    pub fn cloud_scale(&self) -> &Scale<CloudCategory> {
        &self.clouds
    }

    pub fn wind_scale(&self) -> &Scale<WindCategory> {
        &self.wind
    }

    pub fn icon_mode(&self) -> IconMode {
        self.icons.mode()
    }

    /// Derive the four categorical features. `instant` defaults to now.
    pub fn features(
        &self,
        observation: &WeatherObservation,
        astronomy: Option<&AstronomyDay>,
        instant: Option<DateTime<Utc>>,
    ) -> Result<CategoricalFeatures, ClassifyError> {
        observation.validate()?;
        if let Some(astro) = astronomy {
            astro.check_order()?;
        }

        let instant = instant.unwrap_or_else(Utc::now);

        Ok(CategoricalFeatures {
            precipitation: features::precipitation(
                &self.precipitation,
                observation.precipitation,
                observation.snowfall,
            ),
            clouds: features::clouds(&self.clouds, observation.cloud_cover),
            wind: features::wind(&self.wind, observation.wind_speed),
            day_phase: day_phase(astronomy, instant),
        })
    }

    pub fn classify(
        &self,
        observation: &WeatherObservation,
        astronomy: Option<&AstronomyDay>,
        instant: Option<DateTime<Utc>>,
    ) -> Result<IconResult, ClassifyError> {
        let features = self.features(observation, astronomy, instant)?;

        debug!(
            "precipitation={} clouds={} wind={} phase={}",
            features.precipitation.category,
            features.clouds.category,
            features.wind.category,
            features.day_phase
        );

        let icon_class = self.icons.resolve((
            features.precipitation.category,
            features.clouds.category,
            features.wind.category,
            features.night_flag(),
        ))?;

        Ok(IconResult { icon_class, conditions: features.conditions(), features })
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(Scale::default(), Scale::default(), Scale::default(), IconMode::default())
    }
}
