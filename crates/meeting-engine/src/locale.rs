//! Display locales for labels produced by the geo and timezone helpers.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Language of rendered labels. Ukrainian is the client's primary locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Uk,
    En,
}

/// Unit words used in distance and duration labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitWords {
    pub meters: &'static str,
    pub kilometers: &'static str,
    pub minutes: &'static str,
    pub hours: &'static str,
}

const UK_UNITS: UnitWords = UnitWords {
    meters: "м",
    kilometers: "км",
    minutes: "хв",
    hours: "год",
};

const EN_UNITS: UnitWords = UnitWords {
    meters: "m",
    kilometers: "km",
    minutes: "min",
    hours: "h",
};

impl Locale {
    pub fn units(self) -> UnitWords {
        match self {
            Locale::Uk => UK_UNITS,
            Locale::En => EN_UNITS,
        }
    }

    /// `strftime` pattern for a date and time, e.g. `17.10.2026, 14:30`.
    pub(crate) fn date_time_pattern(self) -> &'static str {
        match self {
            Locale::Uk => "%d.%m.%Y, %H:%M",
            Locale::En => "%m/%d/%Y, %-I:%M %p",
        }
    }

    pub(crate) fn date_pattern(self) -> &'static str {
        match self {
            Locale::Uk => "%d.%m.%Y",
            Locale::En => "%m/%d/%Y",
        }
    }

    pub(crate) fn time_pattern(self) -> &'static str {
        match self {
            Locale::Uk => "%H:%M",
            Locale::En => "%-I:%M %p",
        }
    }
}

impl FromStr for Locale {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uk" | "uk-ua" | "ua" => Ok(Locale::Uk),
            "en" | "en-us" | "en-gb" => Ok(Locale::En),
            other => Err(EngineError::InvalidConfig(format!(
                "unknown locale '{}', expected 'uk' or 'en'",
                other
            ))),
        }
    }
}
