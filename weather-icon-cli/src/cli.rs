use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::Select;
use log::info;
use std::{
    fs,
    path::{Path, PathBuf},
};
use weather_icon_core::{
    Config, IconMode, IconResult, ScaleSetting, features, model::parse_timestamp,
    parse_astronomy, parse_observation,
};

/// Offered ahead of the presets when a scale is custom-defined in the config.
const KEEP_CUSTOM: &str = "keep current custom scale";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-icon",
    version,
    about = "Pick a Weather Icons class for an hour of weather"
)]
pub struct Cli {
    /// Use this config file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify one hour of weather read from OnPoint JSON files.
    Classify {
        /// Hourly history record (a single object or the API's array).
        #[arg(long)]
        weather: PathBuf,

        /// Daily astronomy record; without it, day/night-neutral icons are used.
        #[arg(long)]
        astronomy: Option<PathBuf>,

        /// ISO 8601 timestamp to classify at; if absent, means "now".
        #[arg(long)]
        at: Option<String>,

        /// Print the full result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Choose scales and icon mode interactively.
    Configure,

    /// Show where the config lives and what it contains.
    Config,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let config_path = match self.config {
            Some(path) => path,
            None => Config::config_file_path()?,
        };

        match self.command {
            Command::Classify { weather, astronomy, at, json } => {
                let result =
                    classify_files(&config_path, &weather, astronomy.as_deref(), at.as_deref())?;
                print_result(&result, json)?;
            }
            Command::Configure => {
                let mut config = Config::load_from(&config_path)?;
                configure(&mut config)?;
                config.save_to(&config_path)?;
                println!("Saved configuration to {}", config_path.display());
            }
            Command::Config => {
                let config = Config::load_from(&config_path)?;
                println!("# {}", config_path.display());
                print!("{}", config.to_toml()?);
            }
        }

        Ok(())
    }
}

/// Classify the records in `weather` (and `astronomy`, if given) with the
/// scales from the config at `config_path`.
fn classify_files(
    config_path: &Path,
    weather: &Path,
    astronomy: Option<&Path>,
    at: Option<&str>,
) -> anyhow::Result<IconResult> {
    let config = Config::load_from(config_path)?;
    let classifier = config.classifier()?;
    info!(
        "Scales from {}: precipitation={} clouds={} wind={} mode={}",
        config_path.display(),
        classifier.precipitation_scale().name(),
        classifier.cloud_scale().name(),
        classifier.wind_scale().name(),
        classifier.icon_mode()
    );

    let observation = parse_observation(&read(weather)?)
        .with_context(|| format!("Bad weather record in {}", weather.display()))?;

    let astronomy = match astronomy {
        Some(path) => Some(
            parse_astronomy(&read(path)?)
                .with_context(|| format!("Bad astronomy record in {}", path.display()))?,
        ),
        None => None,
    };

    let instant = match at {
        Some(s) => {
            Some(parse_timestamp(s).ok_or_else(|| anyhow!("Cannot parse timestamp '{s}'"))?)
        }
        None => None,
    };

    Ok(classifier.classify(&observation, astronomy.as_ref(), instant)?)
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn print_result(result: &IconResult, json: bool) -> anyhow::Result<()> {
    if json {
        let out = serde_json::to_string_pretty(result).context("Failed to serialize result")?;
        println!("{out}");
    } else {
        println!("{}", result.icon_class);
        println!("{}", result.conditions);
    }

    Ok(())
}

/// Preset names to offer for a scale, led by [`KEEP_CUSTOM`] when the
/// current setting is a custom bucket list.
fn scale_choices<C>(current: &ScaleSetting<C>, presets: &[&'static str]) -> Vec<&'static str> {
    let mut choices = Vec::with_capacity(presets.len() + 1);
    if matches!(current, ScaleSetting::Custom(_)) {
        choices.push(KEEP_CUSTOM);
    }
    choices.extend_from_slice(presets);
    choices
}

fn configure(config: &mut Config) -> anyhow::Result<()> {
    let choices = scale_choices(&config.precipitation, features::PRECIPITATION_PRESETS);
    let precipitation = Select::new("Precipitation scale:", choices)
        .prompt()
        .context("Precipitation scale selection cancelled")?;
    if precipitation != KEEP_CUSTOM {
        config.set_precipitation_preset(precipitation);
    }

    let choices = scale_choices(&config.clouds, features::CLOUD_PRESETS);
    let clouds = Select::new("Cloud cover scale:", choices)
        .prompt()
        .context("Cloud cover scale selection cancelled")?;
    if clouds != KEEP_CUSTOM {
        config.set_cloud_preset(clouds);
    }

    let choices = scale_choices(&config.wind, features::WIND_PRESETS);
    let wind = Select::new("Wind scale:", choices)
        .prompt()
        .context("Wind scale selection cancelled")?;
    if wind != KEEP_CUSTOM {
        config.set_wind_preset(wind);
    }

    let mode = Select::new("Icon mode:", IconMode::all().to_vec())
        .prompt()
        .context("Icon mode selection cancelled")?;
    config.icon_mode = mode;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use weather_icon_core::{Bucket, WindCategory};

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_classify_args() {
        let cli = Cli::try_parse_from([
            "weather-icon",
            "classify",
            "--weather",
            "hour.json",
            "--at",
            "2024-06-01T12:00:00Z",
        ])
        .expect("valid args");

        match cli.command {
            Command::Classify { weather, astronomy, at, json } => {
                assert_eq!(weather, PathBuf::from("hour.json"));
                assert!(astronomy.is_none());
                assert_eq!(at.as_deref(), Some("2024-06-01T12:00:00Z"));
                assert!(!json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn classify_requires_weather() {
        assert!(Cli::try_parse_from(["weather-icon", "classify"]).is_err());
    }

    #[test]
    fn classify_reads_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let weather = dir.path().join("hour.json");
        fs::write(&weather, r#"[{"precip":0.0,"snowfall":0.0,"cldCvr":0,"windSpd":0}]"#).unwrap();
        let config = dir.path().join("config.toml");

        let result = classify_files(&config, &weather, None, None).expect("classifies");
        assert_eq!(result.icon_class, "wi-day-sunny");
        assert_eq!(result.conditions, "Clear, no wind.");

        let cli = Cli {
            config: Some(config),
            command: Command::Classify { weather, astronomy: None, at: None, json: true },
        };
        assert!(cli.run().is_ok());
    }

    #[test]
    fn classify_rejects_bad_timestamp() {
        let dir = tempfile::tempdir().expect("temp dir");
        let weather = dir.path().join("hour.json");
        fs::write(&weather, r#"{"precip":0,"snowfall":0,"cldCvr":0,"windSpd":0}"#).unwrap();

        let err = classify_files(&dir.path().join("config.toml"), &weather, None, Some("noon"))
            .unwrap_err();
        assert!(err.to_string().contains("Cannot parse timestamp 'noon'"));
    }

    #[test]
    fn preset_setting_offers_presets_only() {
        let current = ScaleSetting::<WindCategory>::default();
        let choices = scale_choices(&current, features::WIND_PRESETS);
        assert_eq!(choices, features::WIND_PRESETS);
    }

    #[test]
    fn custom_setting_offers_keep_current_first() {
        let custom = ScaleSetting::Custom(vec![Bucket::above("blowing", WindCategory::Strong)]);
        let choices = scale_choices(&custom, features::WIND_PRESETS);

        assert_eq!(choices[0], KEEP_CUSTOM);
        assert_eq!(&choices[1..], features::WIND_PRESETS);
    }
}
