//! Plain meeting records as the scheduling core sees them.
//!
//! Field names follow the backend's `meetings` table so records fetched by the
//! client deserialize directly. Only the columns the scheduling computation reads
//! are modelled.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::geo::Coordinates;

/// Lifecycle status of a meeting. Only the excluded UI reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

/// How a seed meeting repeats.
///
/// Deserialization is lenient: any text outside the known set becomes
/// [`RecurrenceFrequency::Unrecognized`], which the expander never advances.
/// Use [`FromStr`] when unknown values must be rejected instead.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecurrenceFrequency {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Unrecognized(String),
}

impl RecurrenceFrequency {
    pub fn as_str(&self) -> &str {
        match self {
            RecurrenceFrequency::None => "none",
            RecurrenceFrequency::Daily => "daily",
            RecurrenceFrequency::Weekly => "weekly",
            RecurrenceFrequency::Monthly => "monthly",
            RecurrenceFrequency::Unrecognized(raw) => raw,
        }
    }

    /// Whether this value produces derived instances at all.
    pub fn is_recurring(&self) -> bool {
        matches!(
            self,
            RecurrenceFrequency::Daily | RecurrenceFrequency::Weekly | RecurrenceFrequency::Monthly
        )
    }

    fn from_known(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Some(RecurrenceFrequency::None),
            "daily" => Some(RecurrenceFrequency::Daily),
            "weekly" => Some(RecurrenceFrequency::Weekly),
            "monthly" => Some(RecurrenceFrequency::Monthly),
            _ => None,
        }
    }
}

impl FromStr for RecurrenceFrequency {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_known(s).ok_or_else(|| EngineError::InvalidFrequency(s.to_string()))
    }
}

impl From<String> for RecurrenceFrequency {
    fn from(s: String) -> Self {
        Self::from_known(&s).unwrap_or(RecurrenceFrequency::Unrecognized(s))
    }
}

impl From<RecurrenceFrequency> for String {
    fn from(f: RecurrenceFrequency) -> Self {
        f.as_str().to_string()
    }
}

impl fmt::Display for RecurrenceFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A half-open `[start, end)` interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeSlot {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Half-open overlap test. Touching slots (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// One scheduled time block: a seed meeting or a derived instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    /// Backend row identifier. `None` for instances not yet inserted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// IANA name of the zone the meeting was scheduled in.
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub status: MeetingStatus,
    #[serde(default)]
    pub participants: BTreeSet<String>,
    #[serde(default)]
    pub recurrence_frequency: RecurrenceFrequency,
    #[serde(default)]
    pub recurrence_end_date: Option<DateTime<Utc>>,
    /// Seed this instance was derived from. A relation only; never followed.
    #[serde(default)]
    pub parent_meeting_id: Option<String>,
}

impl Meeting {
    /// A scheduled, non-recurring meeting with no optional fields set.
    pub fn new(
        title: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: None,
            location: None,
            latitude: None,
            longitude: None,
            start_time,
            end_time,
            timezone: None,
            status: MeetingStatus::Scheduled,
            participants: BTreeSet::new(),
            recurrence_frequency: RecurrenceFrequency::None,
            recurrence_end_date: None,
            parent_meeting_id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    pub fn with_recurrence(
        mut self,
        frequency: RecurrenceFrequency,
        end_date: Option<DateTime<Utc>>,
    ) -> Self {
        self.recurrence_frequency = frequency;
        self.recurrence_end_date = end_date;
        self
    }

    pub fn slot(&self) -> TimeSlot {
        TimeSlot::new(self.start_time, self.end_time)
    }

    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    /// The coordinate pair, when both halves are present.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
            _ => None,
        }
    }

    /// Reject meetings whose end is not strictly after their start.
    ///
    /// The scheduling operations never call this; it is the rejection path for
    /// callers validating user input before persisting.
    pub fn validate(&self) -> Result<()> {
        if self.end_time <= self.start_time {
            return Err(EngineError::InvalidInterval {
                start: self.start_time.to_rfc3339(),
                end: self.end_time.to_rfc3339(),
            });
        }
        Ok(())
    }
}

/// Parse a single meeting record from JSON.
pub fn meeting_from_json(json: &str) -> Result<Meeting> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a JSON array of meeting records, keeping their order.
pub fn meetings_from_json(json: &str) -> Result<Vec<Meeting>> {
    Ok(serde_json::from_str(json)?)
}
