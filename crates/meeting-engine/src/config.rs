//! Scheduling settings shared by the CLI and bindings.
//!
//! ```toml
//! max_instances = 52
//! default_timezone = "Europe/Kyiv"
//! wall_clock = true
//! dst_policy = "skip"
//! travel_speed_kmh = 30.0
//! locale = "en"
//! ```
//!
//! Every key is optional; missing keys take the defaults below.

use serde::{Deserialize, Serialize};

use crate::dst::DstPolicy;
use crate::error::{EngineError, Result};
use crate::expander::{ExpansionOptions, MAX_INSTANCES};
use crate::geo::DEFAULT_TRAVEL_SPEED_KMH;
use crate::locale::Locale;
use crate::timezone::parse_timezone;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Upper bound on generated instances. Values above 100 are rejected.
    pub max_instances: usize,
    /// Zone for seeds that carry none. `None` means UTC.
    pub default_timezone: Option<String>,
    /// Keep local meeting times across DST changes instead of stepping in UTC.
    pub wall_clock: bool,
    pub dst_policy: DstPolicy,
    pub travel_speed_kmh: f64,
    pub locale: Locale,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            max_instances: MAX_INSTANCES,
            default_timezone: None,
            wall_clock: false,
            dst_policy: DstPolicy::default(),
            travel_speed_kmh: DEFAULT_TRAVEL_SPEED_KMH,
            locale: Locale::default(),
        }
    }
}

impl ScheduleConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: ScheduleConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_instances > MAX_INSTANCES {
            return Err(EngineError::InvalidConfig(format!(
                "max_instances {} exceeds the hard cap of {}",
                self.max_instances, MAX_INSTANCES
            )));
        }
        if !(self.travel_speed_kmh.is_finite() && self.travel_speed_kmh > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "travel_speed_kmh must be a positive number, got {}",
                self.travel_speed_kmh
            )));
        }
        if let Some(name) = &self.default_timezone {
            if parse_timezone(name).is_none() {
                return Err(EngineError::InvalidTimezone(name.clone()));
            }
        }
        Ok(())
    }

    pub fn expansion_options(&self) -> ExpansionOptions {
        ExpansionOptions {
            max_instances: self.max_instances,
            default_timezone: self.default_timezone.clone(),
            wall_clock: self.wall_clock,
            dst_policy: self.dst_policy,
        }
    }
}
