//! Recurrence expansion -- turns one seed meeting into its later occurrences.
//!
//! By default steps are fixed lengths on the UTC timeline: a day is 24 hours,
//! a week 168 hours, and month arithmetic works on the UTC date. With
//! [`ExpansionOptions::wall_clock`] set, steps are taken on the seed's local
//! wall clock instead (its own timezone, then the configured default, then
//! UTC), so a 10:00 meeting stays at 10:00 across DST changes.
//!
//! Month steps keep the day-of-month and let it roll into the next month when
//! the target month is too short: Jan 31 → Mar 3 → Apr 3.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::dst::{resolve_local, DstPolicy};
use crate::model::{Meeting, RecurrenceFrequency};
use crate::timezone::parse_timezone;

/// Hard cap on expansion steps, whatever the caller asks for.
pub const MAX_INSTANCES: usize = 100;

/// Knobs for [`generate_instances_with`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExpansionOptions {
    /// Stop after this many steps. Clamped to [`MAX_INSTANCES`].
    pub max_instances: usize,
    /// Zone used when the seed carries none (or an unknown one).
    pub default_timezone: Option<String>,
    /// Step on the local wall clock of the seed's zone instead of UTC.
    pub wall_clock: bool,
    /// Only consulted when `wall_clock` is set.
    pub dst_policy: DstPolicy,
}

impl Default for ExpansionOptions {
    fn default() -> Self {
        Self {
            max_instances: MAX_INSTANCES,
            default_timezone: None,
            wall_clock: false,
            dst_policy: DstPolicy::default(),
        }
    }
}

/// Expand `seed` into the occurrences after it, up to and including `end_date`.
///
/// Returns instances in ascending start order. The seed's own slot is never
/// part of the result. `RecurrenceFrequency::None` yields nothing.
///
/// Instances copy every field of the seed except the timestamps, `id` (the
/// caller assigns one on insert) and the frequency, which becomes `None`.
/// `parent_meeting_id` is left as the seed had it; see [`link_to_parent`].
pub fn generate_instances(
    seed: &Meeting,
    frequency: &RecurrenceFrequency,
    end_date: DateTime<Utc>,
) -> Vec<Meeting> {
    generate_instances_with(seed, frequency, end_date, &ExpansionOptions::default())
}

/// [`generate_instances`] with explicit options.
pub fn generate_instances_with(
    seed: &Meeting,
    frequency: &RecurrenceFrequency,
    end_date: DateTime<Utc>,
    options: &ExpansionOptions,
) -> Vec<Meeting> {
    if *frequency == RecurrenceFrequency::None || end_date <= seed.start_time {
        return Vec::new();
    }
    if let RecurrenceFrequency::Unrecognized(raw) = frequency {
        log::warn!("unrecognized recurrence frequency '{raw}', no occurrences will advance");
    }

    let tz = if options.wall_clock {
        zone_for(seed, options)
    } else {
        Tz::UTC
    };
    let duration = seed.duration();
    let cap = options.max_instances.min(MAX_INSTANCES);

    let mut running = seed.start_time.with_timezone(&tz).naive_local();
    let mut instances: Vec<Meeting> = Vec::new();

    for _ in 0..cap {
        let Some(next) = step(running, frequency) else {
            break;
        };
        running = next;

        // The bound is checked on the shifted instant so a skipped gap
        // occurrence still ends the series at the right place.
        let Some(reached) = resolve_local(running, tz, DstPolicy::ShiftForward) else {
            log::debug!("no offset found for {running} in {tz}, skipping occurrence");
            continue;
        };
        if reached > end_date {
            break;
        }
        if reached <= seed.start_time {
            continue;
        }

        let Some(start) = resolve_local(running, tz, options.dst_policy) else {
            log::debug!("skipping occurrence at {running} (inside a DST gap in {tz})");
            continue;
        };
        // A gap a whole day long shifts onto the next occurrence.
        if instances.last().is_some_and(|last| start <= last.start_time) {
            log::debug!("occurrence at {running} collapses onto the previous one in {tz}");
            continue;
        }
        instances.push(instance_of(seed, start, duration));
    }

    if cap > 0 && instances.len() == cap {
        log::debug!("recurrence expansion stopped at the {cap}-instance cap");
    }

    instances
}

/// Expand a seed using its own `recurrence_frequency` and `recurrence_end_date`.
///
/// A seed without an end date produces no instances.
pub fn expand_seed(seed: &Meeting, options: &ExpansionOptions) -> Vec<Meeting> {
    match seed.recurrence_end_date {
        Some(end_date) => {
            generate_instances_with(seed, &seed.recurrence_frequency, end_date, options)
        }
        None => Vec::new(),
    }
}

/// Point every instance at the persisted seed.
pub fn link_to_parent(instances: &mut [Meeting], parent_id: &str) {
    for instance in instances {
        instance.parent_meeting_id = Some(parent_id.to_string());
    }
}

fn zone_for(seed: &Meeting, options: &ExpansionOptions) -> Tz {
    seed.timezone
        .as_deref()
        .and_then(parse_timezone)
        .or_else(|| options.default_timezone.as_deref().and_then(parse_timezone))
        .unwrap_or(Tz::UTC)
}

/// Advance the running wall-clock date by one step. Unrecognized
/// frequencies do not move. `None` only on calendar overflow.
fn step(local: NaiveDateTime, frequency: &RecurrenceFrequency) -> Option<NaiveDateTime> {
    match frequency {
        RecurrenceFrequency::Daily => local.checked_add_signed(Duration::days(1)),
        RecurrenceFrequency::Weekly => local.checked_add_signed(Duration::days(7)),
        RecurrenceFrequency::Monthly => add_month_rolling(local),
        RecurrenceFrequency::None | RecurrenceFrequency::Unrecognized(_) => Some(local),
    }
}

/// Add one calendar month, letting an out-of-range day spill into the
/// following month instead of clamping.
fn add_month_rolling(local: NaiveDateTime) -> Option<NaiveDateTime> {
    let date = local.date();
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let rolled = first.checked_add_signed(Duration::days(i64::from(date.day()) - 1))?;
    Some(rolled.and_time(local.time()))
}

fn instance_of(seed: &Meeting, start: DateTime<Utc>, duration: Duration) -> Meeting {
    Meeting {
        id: None,
        start_time: start,
        end_time: start + duration,
        recurrence_frequency: RecurrenceFrequency::None,
        ..seed.clone()
    }
}
