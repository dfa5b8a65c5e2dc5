//! WASM bindings for meeting-engine.
//!
//! Exposes recurrence expansion, conflict checks and the geo/time label helpers
//! to the JavaScript client via `wasm-bindgen`. Meetings and coordinate lists
//! cross the boundary as JSON strings; timestamps as ISO 8601 strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p meeting-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target bundler --out-dir packages/meeting-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/meeting_engine_wasm.wasm
//! ```

use chrono::{DateTime, Utc};
use meeting_engine::geo::DEFAULT_TRAVEL_SPEED_KMH;
use meeting_engine::model::{meeting_from_json, meetings_from_json};
use meeting_engine::timezone::parse_timestamp;
use meeting_engine::{Coordinates, Locale, RecurrenceFrequency};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Helpers shared by the exports
// ---------------------------------------------------------------------------

fn timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    parse_timestamp(s).map_err(|e| e.to_string())
}

/// Missing or unknown locale codes fall back to the default locale.
fn locale(code: Option<&str>) -> Locale {
    code.and_then(|c| c.parse().ok()).unwrap_or_default()
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// Native-testable implementations
// ---------------------------------------------------------------------------

fn generate_instances_impl(
    seed_json: &str,
    frequency: &str,
    end_date: &str,
) -> Result<String, String> {
    let seed = meeting_from_json(seed_json).map_err(|e| e.to_string())?;
    let frequency = RecurrenceFrequency::from(frequency.to_string());
    let end = timestamp(end_date)?;

    let instances = meeting_engine::generate_instances(&seed, &frequency, end);
    to_json(&instances)
}

fn check_conflict_impl(
    new_start: &str,
    new_end: &str,
    existing_json: &str,
    exclude_id: Option<&str>,
) -> Result<String, String> {
    let start = timestamp(new_start)?;
    let end = timestamp(new_end)?;
    let existing = meetings_from_json(existing_json).map_err(|e| e.to_string())?;

    let verdict = meeting_engine::check_conflict(start, end, &existing, exclude_id);
    to_json(&verdict)
}

fn bounds_impl(points_json: &str) -> Result<String, String> {
    let points: Vec<Coordinates> = serde_json::from_str(points_json)
        .map_err(|e| format!("Invalid coordinates JSON: {}", e))?;

    to_json(&meeting_engine::get_bounds_for_coordinates(&points))
}

fn format_in_timezone_impl(
    ts: &str,
    timezone: Option<&str>,
    locale_code: Option<&str>,
) -> Result<String, String> {
    let ts = timestamp(ts)?;
    Ok(meeting_engine::format_in_timezone(ts, timezone, locale(locale_code)))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Expand a seed meeting into its later occurrences.
///
/// `seed_json` is one meeting record. Unknown `frequency` values yield an
/// empty array. Returns a JSON array of meeting records.
#[wasm_bindgen(js_name = "generateInstances")]
pub fn generate_instances(
    seed_json: &str,
    frequency: &str,
    end_date: &str,
) -> Result<String, JsValue> {
    generate_instances_impl(seed_json, frequency, end_date).map_err(|e| JsValue::from_str(&e))
}

/// Check `[new_start, new_end)` against a JSON array of meetings.
///
/// Returns `{"has_conflict": bool, "conflicting_meeting"?: {...}}`.
#[wasm_bindgen(js_name = "checkConflict")]
pub fn check_conflict(
    new_start: &str,
    new_end: &str,
    existing_json: &str,
    exclude_id: Option<String>,
) -> Result<String, JsValue> {
    check_conflict_impl(new_start, new_end, existing_json, exclude_id.as_deref())
        .map_err(|e| JsValue::from_str(&e))
}

#[wasm_bindgen(js_name = "calculateDistance")]
pub fn calculate_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    meeting_engine::calculate_distance(lat1, lon1, lat2, lon2)
}

#[wasm_bindgen(js_name = "formatDistance")]
pub fn format_distance(km: f64, locale_code: Option<String>) -> String {
    meeting_engine::format_distance(km, locale(locale_code.as_deref()))
}

/// Travel-time label; `speed_kmh` defaults to 40.
#[wasm_bindgen(js_name = "estimateTravelTime")]
pub fn estimate_travel_time(
    km: f64,
    speed_kmh: Option<f64>,
    locale_code: Option<String>,
) -> String {
    meeting_engine::estimate_travel_time(
        km,
        speed_kmh.unwrap_or(DEFAULT_TRAVEL_SPEED_KMH),
        locale(locale_code.as_deref()),
    )
}

/// Map viewport for a JSON array of `{latitude, longitude}` objects.
#[wasm_bindgen(js_name = "getBoundsForCoordinates")]
pub fn get_bounds_for_coordinates(points_json: &str) -> Result<String, JsValue> {
    bounds_impl(points_json).map_err(|e| JsValue::from_str(&e))
}

/// Date-and-time label in `timezone`; unknown zones render in local time.
#[wasm_bindgen(js_name = "formatInTimezone")]
pub fn format_in_timezone(
    ts: &str,
    timezone: Option<String>,
    locale_code: Option<String>,
) -> Result<String, JsValue> {
    format_in_timezone_impl(ts, timezone.as_deref(), locale_code.as_deref())
        .map_err(|e| JsValue::from_str(&e))
}
