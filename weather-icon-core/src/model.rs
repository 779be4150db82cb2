use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    day_phase::{DayPhase, NightFlag},
    error::ClassifyError,
    features::{CloudCategory, Feature, PrecipCategory, WindCategory},
};

/// One hour of readings: inches per hour, percent, and mph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub precipitation: f64,
    pub snowfall: f64,
    pub cloud_cover: f64,
    pub wind_speed: f64,
}

impl WeatherObservation {
    /// Reject NaN, infinities and out-of-range readings, naming the offending
    /// field. Amounts and wind speed must be non-negative; cloud cover is a
    /// percentage in `[0, 100]`.
    pub fn validate(&self) -> Result<(), ClassifyError> {
        let fields = [
            ("precip", self.precipitation, f64::INFINITY),
            ("snowfall", self.snowfall, f64::INFINITY),
            ("cldCvr", self.cloud_cover, 100.0),
            ("windSpd", self.wind_speed, f64::INFINITY),
        ];
        let in_range = |value: f64, max: f64| value.is_finite() && (0.0..=max).contains(&value);

        match fields.into_iter().find(|&(_, value, max)| !in_range(value, max)) {
            Some((field, value, _)) => {
                Err(ClassifyError::InvalidValue { field: field.to_string(), value })
            }
            None => Ok(()),
        }
    }
}

/// An hourly record as the OnPoint history resource returns it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawObservation {
    pub precip: Option<f64>,
    pub snowfall: Option<f64>,
    #[serde(rename = "cldCvr")]
    pub cld_cvr: Option<f64>,
    #[serde(rename = "windSpd")]
    pub wind_spd: Option<f64>,
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ClassifyError> {
    value.ok_or_else(|| ClassifyError::MissingField(field.to_string()))
}

impl TryFrom<RawObservation> for WeatherObservation {
    type Error = ClassifyError;

    fn try_from(raw: RawObservation) -> Result<Self, Self::Error> {
        let obs = WeatherObservation {
            precipitation: required(raw.precip, "precip")?,
            snowfall: required(raw.snowfall, "snowfall")?,
            cloud_cover: required(raw.cld_cvr, "cldCvr")?,
            wind_speed: required(raw.wind_spd, "windSpd")?,
        };
        obs.validate()?;

        Ok(obs)
    }
}

/// Sun event times for one day at one location, in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AstronomyDay {
    pub astronomical_twilight_begin: DateTime<Utc>,
    pub nautical_twilight_begin: DateTime<Utc>,
    pub civil_twilight_begin: DateTime<Utc>,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub civil_twilight_end: DateTime<Utc>,
    pub nautical_twilight_end: DateTime<Utc>,
    pub astronomical_twilight_end: DateTime<Utc>,
}

impl AstronomyDay {
    /// Check that the events run in chronological order.
    pub fn check_order(&self) -> Result<(), ClassifyError> {
        let events = [
            ("astronomical_twilight_begin", self.astronomical_twilight_begin),
            ("nautical_twilight_begin", self.nautical_twilight_begin),
            ("civil_twilight_begin", self.civil_twilight_begin),
            ("sunrise", self.sunrise),
            ("sunset", self.sunset),
            ("civil_twilight_end", self.civil_twilight_end),
            ("nautical_twilight_end", self.nautical_twilight_end),
            ("astronomical_twilight_end", self.astronomical_twilight_end),
        ];

        for pair in events.windows(2) {
            let (earlier, a) = pair[0];
            let (later, b) = pair[1];
            if b < a {
                return Err(ClassifyError::InvalidAstronomy(format!(
                    "{later} ({b}) is before {earlier} ({a})"
                )));
            }
        }

        Ok(())
    }
}

/// A daily record as the OnPoint astronomy resource returns it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAstronomy {
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub astronomical_twilight_begin: Option<String>,
    pub astronomical_twilight_end: Option<String>,
    pub nautical_twilight_begin: Option<String>,
    pub nautical_twilight_end: Option<String>,
    pub civil_twilight_begin: Option<String>,
    pub civil_twilight_end: Option<String>,
}

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an ISO 8601 timestamp. The date and time may be separated by `T` or
/// a space, seconds may carry a fraction, and offsets may be written `+hh:mm`
/// or `+hhmm`; a timestamp without an offset is taken as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = OFFSET_FORMATS.iter().find_map(|f| DateTime::parse_from_str(s, f).ok()) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .map(|ndt| ndt.and_utc())
}

fn timestamp(value: Option<String>, field: &str) -> Result<DateTime<Utc>, ClassifyError> {
    let s = required(value, field)?;
    parse_timestamp(&s).ok_or_else(|| {
        ClassifyError::InvalidAstronomy(format!("cannot parse {field} timestamp '{s}'"))
    })
}

impl TryFrom<RawAstronomy> for AstronomyDay {
    type Error = ClassifyError;

    fn try_from(raw: RawAstronomy) -> Result<Self, Self::Error> {
        let day = AstronomyDay {
            astronomical_twilight_begin: timestamp(
                raw.astronomical_twilight_begin,
                "astronomical_twilight_begin",
            )?,
            nautical_twilight_begin: timestamp(
                raw.nautical_twilight_begin,
                "nautical_twilight_begin",
            )?,
            civil_twilight_begin: timestamp(raw.civil_twilight_begin, "civil_twilight_begin")?,
            sunrise: timestamp(raw.sunrise, "sunrise")?,
            sunset: timestamp(raw.sunset, "sunset")?,
            civil_twilight_end: timestamp(raw.civil_twilight_end, "civil_twilight_end")?,
            nautical_twilight_end: timestamp(raw.nautical_twilight_end, "nautical_twilight_end")?,
            astronomical_twilight_end: timestamp(
                raw.astronomical_twilight_end,
                "astronomical_twilight_end",
            )?,
        };
        day.check_order()?;

        Ok(day)
    }
}

/// Decode one record from an OnPoint response body. The API answers with an
/// array of periods (the first one is used) or with `{"message": ...}` on
/// failure; a bare record object is accepted too.
pub fn parse_record<T: DeserializeOwned>(json: &str) -> Result<T, ClassifyError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| ClassifyError::Payload(e.to_string()))?;

    let record = match value {
        serde_json::Value::Array(mut items) => {
            if items.is_empty() {
                return Err(ClassifyError::Payload("response contained no records".into()));
            }
            items.swap_remove(0)
        }
        serde_json::Value::Object(ref map) if map.contains_key("message") => {
            let message = &map["message"];
            let message = message.as_str().map_or_else(|| message.to_string(), str::to_string);
            return Err(ClassifyError::Payload(message));
        }
        other => other,
    };

    serde_json::from_value(record).map_err(|e| ClassifyError::Payload(e.to_string()))
}

pub fn parse_observation(json: &str) -> Result<WeatherObservation, ClassifyError> {
    parse_record::<RawObservation>(json)?.try_into()
}

pub fn parse_astronomy(json: &str) -> Result<AstronomyDay, ClassifyError> {
    parse_record::<RawAstronomy>(json)?.try_into()
}

/// The four features an icon is chosen from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalFeatures {
    pub precipitation: Feature<PrecipCategory>,
    pub clouds: Feature<CloudCategory>,
    pub wind: Feature<WindCategory>,
    pub day_phase: DayPhase,
}

impl CategoricalFeatures {
    pub fn night_flag(&self) -> NightFlag {
        self.day_phase.night_flag()
    }

    /// Non-empty phrases joined with ", ", capitalised, ending in a period.
    pub fn conditions(&self) -> String {
        let phrases = [
            self.clouds.phrase.as_str(),
            self.precipitation.phrase.as_str(),
            self.wind.phrase.as_str(),
            self.day_phase.phrase(),
        ];
        let joined =
            phrases.iter().filter(|p| !p.is_empty()).copied().collect::<Vec<_>>().join(", ");

        let mut chars = joined.chars();
        match chars.next() {
            Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
            None => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IconResult {
    pub icon_class: &'static str,
    pub conditions: String,
    pub features: CategoricalFeatures,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const HISTORY: &str = r#"[{"timestamp":"2024-06-01T12:00:00-04:00","precip":0.02,
        "snowfall":0,"cldCvr":40,"windSpd":6.5,"temp":71.2}]"#;

    const ASTRONOMY: &str = r#"[{"timestamp":"2024-06-01T00:00:00-04:00",
        "astronomical_twilight_begin":"2024-06-01T03:31:00-04:00",
        "nautical_twilight_begin":"2024-06-01T04:17:00-04:00",
        "civil_twilight_begin":"2024-06-01T04:56:00-04:00",
        "sunrise":"2024-06-01T05:28:00-04:00",
        "sunset":"2024-06-01T20:21:00-04:00",
        "civil_twilight_end":"2024-06-01T20:53:00-04:00",
        "nautical_twilight_end":"2024-06-01T21:32:00-04:00",
        "astronomical_twilight_end":"2024-06-01T22:18:00-04:00"}]"#;

    #[test]
    fn parses_history_array() {
        let obs = parse_observation(HISTORY).expect("valid history");

        assert_eq!(
            obs,
            WeatherObservation {
                precipitation: 0.02,
                snowfall: 0.0,
                cloud_cover: 40.0,
                wind_speed: 6.5,
            }
        );
    }

    #[test]
    fn missing_field_is_named() {
        let err = parse_observation(r#"{"precip":0,"snowfall":0,"cldCvr":10}"#).unwrap_err();
        assert_eq!(err, ClassifyError::MissingField("windSpd".into()));
    }

    #[test]
    fn null_field_counts_as_missing() {
        let err = parse_observation(r#"{"precip":null,"snowfall":0,"cldCvr":10,"windSpd":1}"#)
            .unwrap_err();
        assert_eq!(err, ClassifyError::MissingField("precip".into()));
    }

    #[test]
    fn api_message_becomes_payload_error() {
        let err = parse_observation(r#"{"message":"Invalid API key."}"#).unwrap_err();
        assert_eq!(err, ClassifyError::Payload("Invalid API key.".into()));
    }

    #[test]
    fn empty_array_is_rejected() {
        let err = parse_observation("[]").unwrap_err();
        assert!(matches!(err, ClassifyError::Payload(_)));
    }

    #[test]
    fn parses_astronomy_with_offsets() {
        let day = parse_astronomy(ASTRONOMY).expect("valid astronomy");

        assert_eq!(day.sunrise, Utc.with_ymd_and_hms(2024, 6, 1, 9, 28, 0).unwrap());
        assert_eq!(
            day.astronomical_twilight_end,
            Utc.with_ymd_and_hms(2024, 6, 2, 2, 18, 0).unwrap()
        );
    }

    #[test]
    fn missing_astronomy_field_is_named() {
        let json = ASTRONOMY.replace(r#""sunset":"2024-06-01T20:21:00-04:00","#, "");
        let err = parse_astronomy(&json).unwrap_err();

        assert_eq!(err, ClassifyError::MissingField("sunset".into()));
    }

    #[test]
    fn unparsable_timestamp_is_invalid_astronomy() {
        let json = ASTRONOMY.replace("2024-06-01T05:28:00-04:00", "dawn-ish");
        let err = parse_astronomy(&json).unwrap_err();

        assert!(matches!(err, ClassifyError::InvalidAstronomy(ref m) if m.contains("sunrise")));
    }

    #[test]
    fn out_of_order_astronomy_is_rejected() {
        let json = ASTRONOMY.replace("2024-06-01T20:21:00-04:00", "2024-06-01T04:00:00-04:00");
        let err = parse_astronomy(&json).unwrap_err();

        assert!(matches!(err, ClassifyError::InvalidAstronomy(_)));
    }

    #[test]
    fn timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 6, 1, 16, 0, 0).unwrap();

        assert_eq!(parse_timestamp("2024-06-01T12:00:00-04:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-06-01T12:00:00-0400"), Some(expected));
        assert_eq!(parse_timestamp("2024-06-01T16:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-06-01T16:00:00.000"), Some(expected));
        assert_eq!(parse_timestamp("2024-06-01 16:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-06-01 12:00:00-0400"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn non_finite_value_is_rejected() {
        let obs = WeatherObservation {
            precipitation: 0.0,
            snowfall: 0.0,
            cloud_cover: f64::NAN,
            wind_speed: 0.0,
        };

        assert!(matches!(
            obs.validate(),
            Err(ClassifyError::InvalidValue { ref field, .. }) if field == "cldCvr"
        ));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let err = parse_observation(r#"{"precip":-1,"snowfall":0,"cldCvr":10,"windSpd":1}"#)
            .unwrap_err();
        assert_eq!(err, ClassifyError::InvalidValue { field: "precip".into(), value: -1.0 });

        let err = parse_observation(r#"{"precip":0,"snowfall":-0.5,"cldCvr":10,"windSpd":1}"#)
            .unwrap_err();
        assert_eq!(err, ClassifyError::InvalidValue { field: "snowfall".into(), value: -0.5 });

        let err = parse_observation(r#"{"precip":0,"snowfall":0,"cldCvr":101,"windSpd":1}"#)
            .unwrap_err();
        assert_eq!(err, ClassifyError::InvalidValue { field: "cldCvr".into(), value: 101.0 });

        let err = parse_observation(r#"{"precip":0,"snowfall":0,"cldCvr":10,"windSpd":-2}"#)
            .unwrap_err();
        assert_eq!(err, ClassifyError::InvalidValue { field: "windSpd".into(), value: -2.0 });
    }

    #[test]
    fn range_edges_are_accepted() {
        let obs = parse_observation(r#"{"precip":0,"snowfall":0,"cldCvr":100,"windSpd":0}"#)
            .expect("edges are in range");
        assert_eq!(obs.cloud_cover, 100.0);
    }

    #[test]
    fn conditions_skip_empty_phrases() {
        let features = CategoricalFeatures {
            precipitation: Feature { category: PrecipCategory::None, phrase: String::new() },
            clouds: Feature { category: CloudCategory::Clear, phrase: "clear".into() },
            wind: Feature { category: WindCategory::Calm, phrase: "no wind".into() },
            day_phase: DayPhase::Unknown,
        };

        assert_eq!(features.conditions(), "Clear, no wind.");
    }
}
