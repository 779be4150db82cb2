//! Where an instant falls within a day's light cycle.

use chrono::{DateTime, Duration, Utc};
use log::trace;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::AstronomyDay;

/// Half-width of the sunrise and sunset windows.
pub const SUN_EVENT_PAD_MINUTES: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPhase {
    Night,
    AstronomicalTwilight,
    NauticalTwilight,
    CivilTwilight,
    Sunrise,
    Day,
    Sunset,
    /// No astronomy data was supplied.
    Unknown,
}

impl DayPhase {
    /// Phrase used in the condition sentence. Empty for `Unknown`.
    pub fn phrase(&self) -> &'static str {
        match self {
            DayPhase::Night => "night",
            DayPhase::AstronomicalTwilight => "astronomical twilight",
            DayPhase::NauticalTwilight => "nautical twilight",
            DayPhase::CivilTwilight => "civil twilight",
            DayPhase::Sunrise => "sunrise",
            DayPhase::Day => "day",
            DayPhase::Sunset => "sunset",
            DayPhase::Unknown => "",
        }
    }

    pub fn is_twilight(&self) -> bool {
        matches!(
            self,
            DayPhase::AstronomicalTwilight | DayPhase::NauticalTwilight | DayPhase::CivilTwilight
        )
    }

    pub fn night_flag(&self) -> NightFlag {
        match self {
            DayPhase::Night
            | DayPhase::AstronomicalTwilight
            | DayPhase::NauticalTwilight
            | DayPhase::CivilTwilight => NightFlag::Night,
            DayPhase::Sunrise | DayPhase::Day | DayPhase::Sunset => NightFlag::Day,
            DayPhase::Unknown => NightFlag::Unknown,
        }
    }
}

impl fmt::Display for DayPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayPhase::Unknown => f.write_str("unknown"),
            other => f.write_str(other.phrase()),
        }
    }
}

/// Which family of icons to draw from: night, day, or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NightFlag {
    Night,
    Day,
    Unknown,
}

impl NightFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            NightFlag::Night => "night",
            NightFlag::Day => "day",
            NightFlag::Unknown => "unknown",
        }
    }

    pub const fn all() -> &'static [NightFlag] {
        &[NightFlag::Night, NightFlag::Day, NightFlag::Unknown]
    }
}

impl fmt::Display for NightFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upper bounds of the ten bounded intervals of the day, in ascending order,
/// each paired with the phase it closes. Anything after the last bound is
/// night again.
fn boundaries(astro: &AstronomyDay) -> [(DateTime<Utc>, DayPhase); 10] {
    let pad = Duration::minutes(SUN_EVENT_PAD_MINUTES);

    [
        (astro.astronomical_twilight_begin, DayPhase::Night),
        (astro.nautical_twilight_begin, DayPhase::AstronomicalTwilight),
        (astro.civil_twilight_begin, DayPhase::NauticalTwilight),
        (astro.sunrise - pad, DayPhase::CivilTwilight),
        (astro.sunrise + pad, DayPhase::Sunrise),
        (astro.sunset - pad, DayPhase::Day),
        (astro.sunset + pad, DayPhase::Sunset),
        (astro.civil_twilight_end, DayPhase::CivilTwilight),
        (astro.nautical_twilight_end, DayPhase::NauticalTwilight),
        (astro.astronomical_twilight_end, DayPhase::AstronomicalTwilight),
    ]
}

/// Phase of `instant` for the given day. Intervals are `(previous, bound]`
/// and the first match wins, so every instant gets exactly one phase.
pub fn day_phase(astronomy: Option<&AstronomyDay>, instant: DateTime<Utc>) -> DayPhase {
    let Some(astro) = astronomy else {
        return DayPhase::Unknown;
    };

    let phase = boundaries(astro)
        .into_iter()
        .find(|(bound, _)| instant <= *bound)
        .map_or(DayPhase::Night, |(_, phase)| phase);

    trace!("instant {instant} falls in {phase}");
    phase
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, h, m, 0).unwrap()
    }

    fn june_day() -> AstronomyDay {
        AstronomyDay {
            astronomical_twilight_begin: at(3, 0),
            nautical_twilight_begin: at(3, 45),
            civil_twilight_begin: at(4, 30),
            sunrise: at(5, 0),
            sunset: at(20, 0),
            civil_twilight_end: at(20, 30),
            nautical_twilight_end: at(21, 15),
            astronomical_twilight_end: at(22, 0),
        }
    }

    #[test]
    fn no_astronomy_is_unknown() {
        let phase = day_phase(None, at(12, 0));

        assert_eq!(phase, DayPhase::Unknown);
        assert_eq!(phase.night_flag(), NightFlag::Unknown);
    }

    #[test]
    fn walks_through_every_interval() {
        let astro = june_day();
        let cases = [
            (at(1, 0), DayPhase::Night),
            (at(3, 10), DayPhase::AstronomicalTwilight),
            (at(4, 0), DayPhase::NauticalTwilight),
            (at(4, 40), DayPhase::CivilTwilight),
            (at(5, 2), DayPhase::Sunrise),
            (at(12, 0), DayPhase::Day),
            (at(19, 58), DayPhase::Sunset),
            (at(20, 20), DayPhase::CivilTwilight),
            (at(21, 0), DayPhase::NauticalTwilight),
            (at(21, 30), DayPhase::AstronomicalTwilight),
            (at(23, 30), DayPhase::Night),
        ];

        for (instant, expected) in cases {
            assert_eq!(day_phase(Some(&astro), instant), expected, "at {instant}");
        }
    }

    #[test]
    fn bounds_belong_to_the_earlier_interval() {
        let astro = june_day();

        assert_eq!(day_phase(Some(&astro), at(3, 0)), DayPhase::Night);
        assert_eq!(day_phase(Some(&astro), at(4, 55)), DayPhase::CivilTwilight);
        assert_eq!(day_phase(Some(&astro), at(5, 5)), DayPhase::Sunrise);
        assert_eq!(day_phase(Some(&astro), at(19, 55)), DayPhase::Day);
        assert_eq!(day_phase(Some(&astro), at(20, 5)), DayPhase::Sunset);
        assert_eq!(day_phase(Some(&astro), at(22, 0)), DayPhase::AstronomicalTwilight);
        assert_eq!(
            day_phase(Some(&astro), at(22, 0) + Duration::seconds(1)),
            DayPhase::Night
        );
    }

    #[test]
    fn every_minute_of_the_day_gets_a_known_phase() {
        let astro = june_day();
        let start = at(0, 0);

        for minute in 0..24 * 60 {
            let phase = day_phase(Some(&astro), start + Duration::minutes(minute));
            assert_ne!(phase, DayPhase::Unknown);
        }
    }

    #[test]
    fn twilight_counts_as_night() {
        assert_eq!(DayPhase::CivilTwilight.night_flag(), NightFlag::Night);
        assert_eq!(DayPhase::AstronomicalTwilight.night_flag(), NightFlag::Night);
        assert_eq!(DayPhase::Sunrise.night_flag(), NightFlag::Day);
        assert_eq!(DayPhase::Sunset.night_flag(), NightFlag::Day);
        assert!(DayPhase::NauticalTwilight.is_twilight());
        assert!(!DayPhase::Night.is_twilight());
    }
}
