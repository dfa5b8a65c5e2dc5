//! Detect scheduling conflicts against already-booked meetings.
//!
//! Intervals are half-open: a meeting ending at 11:00 and another starting at
//! 11:00 do not conflict.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Meeting, TimeSlot};

/// Outcome of checking one candidate interval.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConflictVerdict {
    pub has_conflict: bool,
    /// The first colliding meeting in caller order, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicting_meeting: Option<Meeting>,
}

impl ConflictVerdict {
    fn clear() -> Self {
        Self::default()
    }

    fn with(meeting: &Meeting) -> Self {
        Self {
            has_conflict: true,
            conflicting_meeting: Some(meeting.clone()),
        }
    }
}

/// A conflict found while validating an expanded series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceConflict {
    /// Position of the instance in the slice that was checked.
    pub instance_index: usize,
    pub instance: TimeSlot,
    pub conflicting_meeting: Meeting,
    pub overlap_minutes: i64,
}

/// Check `[new_start, new_end)` against `existing`.
///
/// The meeting whose `id` equals `exclude_id` is ignored, so an edited meeting
/// can be re-validated against the list that still contains its old version.
/// The first overlapping meeting in slice order is reported.
pub fn check_conflict(
    new_start: DateTime<Utc>,
    new_end: DateTime<Utc>,
    existing: &[Meeting],
    exclude_id: Option<&str>,
) -> ConflictVerdict {
    check_slot(&TimeSlot::new(new_start, new_end), existing, exclude_id)
}

/// [`check_conflict`] for a ready-made slot.
pub fn check_slot(
    slot: &TimeSlot,
    existing: &[Meeting],
    exclude_id: Option<&str>,
) -> ConflictVerdict {
    existing
        .iter()
        .filter(|m| !is_excluded(m, exclude_id))
        .find(|m| collides(slot, &m.slot()))
        .map(ConflictVerdict::with)
        .unwrap_or_else(ConflictVerdict::clear)
}

/// Validate every instance of an expanded series in one pass.
///
/// Each conflicting instance is reported once, against the first existing
/// meeting it overlaps.
pub fn check_instances(instances: &[Meeting], existing: &[Meeting]) -> Vec<InstanceConflict> {
    let mut conflicts = Vec::new();

    for (instance_index, instance) in instances.iter().enumerate() {
        let slot = instance.slot();
        if let Some(hit) = existing.iter().find(|m| collides(&slot, &m.slot())) {
            conflicts.push(InstanceConflict {
                instance_index,
                instance: slot,
                conflicting_meeting: hit.clone(),
                overlap_minutes: overlap_minutes(&slot, &hit.slot()),
            });
        }
    }

    conflicts
}

/// Overlap length in whole minutes; 0 when the slots do not overlap.
///
/// The overlap is `min(a.end, b.end) - max(a.start, b.start)`.
pub fn overlap_minutes(a: &TimeSlot, b: &TimeSlot) -> i64 {
    if !a.overlaps(b) {
        return 0;
    }
    let overlap_start = a.start.max(b.start);
    let overlap_end = a.end.min(b.end);
    (overlap_end - overlap_start).num_minutes()
}

/// The candidate collides when its start falls inside the existing slot, its
/// end falls inside it, or it covers the slot entirely. For a well-formed
/// candidate this is the half-open overlap test; it is spelled out so an
/// inverted candidate still gets a defined answer.
fn collides(candidate: &TimeSlot, existing: &TimeSlot) -> bool {
    let starts_inside = existing.start <= candidate.start && candidate.start < existing.end;
    let ends_inside = existing.start < candidate.end && candidate.end <= existing.end;
    let covers = candidate.start <= existing.start && candidate.end >= existing.end;
    starts_inside || ends_inside || covers
}

fn is_excluded(meeting: &Meeting, exclude_id: Option<&str>) -> bool {
    match (exclude_id, meeting.id.as_deref()) {
        (Some(excluded), Some(id)) => excluded == id,
        _ => false,
    }
}
