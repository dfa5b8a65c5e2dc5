//! DST transition policies for recurring meetings.
//!
//! Wall-clock recurrence steps are taken on the meeting's local time. Resolving
//! a wall-clock value back to an instant can hit a spring-forward gap (no such
//! local time) or a fall-back overlap (two instants share it).

use chrono::{DateTime, Duration, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Policy for occurrences whose local time does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DstPolicy {
    /// Drop occurrences that fall in the DST gap (e.g. 03:30 on the spring-forward night in Kyiv).
    Skip,
    /// Move the occurrence forward by the length of the gap.
    #[default]
    ShiftForward,
}

/// Resolve a local wall-clock time in `tz` to a UTC instant.
///
/// Ambiguous times resolve to the earlier instant. Times inside a gap follow
/// `policy`; `None` means the occurrence is skipped.
pub fn resolve_local(local: NaiveDateTime, tz: Tz, policy: DstPolicy) -> Option<DateTime<Utc>> {
    if let Some(dt) = tz.from_local_datetime(&local).earliest() {
        return Some(dt.with_timezone(&Utc));
    }

    match policy {
        DstPolicy::Skip => None,
        DstPolicy::ShiftForward => shift_past_gap(local, tz),
    }
}

/// Longest gap searched for. Whole skipped days exist (Pacific/Apia, 2011).
const MAX_GAP_HOURS: i64 = 7 * 24;

/// Read the gap's local time with the offset in force just before the
/// transition, so 03:30 in a 03:00→04:00 gap becomes 04:30.
fn shift_past_gap(local: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    let before = (1..=MAX_GAP_HOURS).find_map(|hours| {
        let probe = local.checked_sub_signed(Duration::hours(hours))?;
        tz.from_local_datetime(&probe).earliest()
    })?;
    let offset = i64::from(before.offset().fix().local_minus_utc());
    local.checked_sub_signed(Duration::seconds(offset)).map(|utc| utc.and_utc())
}
