//! Map helpers for meeting locations: great-circle distance, distance and
//! travel-time labels, and the viewport that encloses a set of pins.

use serde::{Deserialize, Serialize};

use crate::locale::Locale;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Average city driving speed assumed by [`estimate_travel_time`].
pub const DEFAULT_TRAVEL_SPEED_KMH: f64 = 40.0;

/// Viewport center used when there is nothing to show (Kyiv).
pub const FALLBACK_CENTER: Coordinates = Coordinates {
    latitude: 50.4501,
    longitude: 30.5234,
};

/// Span of the fallback viewport, in degrees on each axis.
pub const FALLBACK_DELTA: f64 = 0.5;

/// Smallest span on either axis, so coincident points still get a usable viewport.
pub const MIN_DELTA: f64 = 0.01;

/// Padding factor applied to the raw min/max range.
const DELTA_PADDING: f64 = 1.5;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to `other` in kilometers.
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        calculate_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

/// A map viewport: center point plus latitude/longitude span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub center: Coordinates,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

/// Haversine distance between two points, in kilometers.
pub fn calculate_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    // Rounding can push `a` a hair past 1 for near-antipodal points.
    let a = ((d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2))
    .min(1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Render a distance for display.
///
/// - below 1 km: rounded meters (`450 м`)
/// - 1 km up to 10 km: one decimal (`2.5 км`)
/// - 10 km and above: whole kilometers (`12 км`)
pub fn format_distance(km: f64, locale: Locale) -> String {
    let words = locale.units();
    if km < 1.0 {
        format!("{} {}", (km * 1000.0).round() as i64, words.meters)
    } else if km < 10.0 {
        // Ties round away from zero, as the client's `toFixed(1)` does.
        let tenths = (km * 10.0).round() / 10.0;
        format!("{:.1} {}", tenths, words.kilometers)
    } else {
        format!("{} {}", km.round() as i64, words.kilometers)
    }
}

/// Estimate how long the trip takes at `speed_kmh` and render it.
///
/// Under an hour only minutes are shown; otherwise hours, plus minutes when
/// they are not zero. A speed that is not a positive finite number falls back
/// to [`DEFAULT_TRAVEL_SPEED_KMH`].
pub fn estimate_travel_time(km: f64, speed_kmh: f64, locale: Locale) -> String {
    let speed = if speed_kmh.is_finite() && speed_kmh > 0.0 {
        speed_kmh
    } else {
        log::debug!("unusable travel speed {speed_kmh}, using the default");
        DEFAULT_TRAVEL_SPEED_KMH
    };

    let minutes = (km / speed * 60.0).round() as i64;
    let words = locale.units();

    if minutes < 60 {
        return format!("{} {}", minutes, words.minutes);
    }

    let hours = minutes / 60;
    let rest = minutes % 60;
    if rest == 0 {
        format!("{} {}", hours, words.hours)
    } else {
        format!("{} {} {} {}", hours, words.hours, rest, words.minutes)
    }
}

/// Compute the viewport that encloses every point.
///
/// An empty slice yields the Kyiv fallback with a 0.5° span. Otherwise the
/// center is the midpoint of the extremes and each span is 1.5× the range,
/// never less than [`MIN_DELTA`].
pub fn get_bounds_for_coordinates(points: &[Coordinates]) -> BoundingBox {
    let Some(first) = points.first() else {
        return BoundingBox {
            center: FALLBACK_CENTER,
            latitude_delta: FALLBACK_DELTA,
            longitude_delta: FALLBACK_DELTA,
        };
    };

    let (mut min_lat, mut max_lat) = (first.latitude, first.latitude);
    let (mut min_lon, mut max_lon) = (first.longitude, first.longitude);
    for p in &points[1..] {
        min_lat = min_lat.min(p.latitude);
        max_lat = max_lat.max(p.latitude);
        min_lon = min_lon.min(p.longitude);
        max_lon = max_lon.max(p.longitude);
    }

    BoundingBox {
        center: Coordinates::new((min_lat + max_lat) / 2.0, (min_lon + max_lon) / 2.0),
        latitude_delta: ((max_lat - min_lat) * DELTA_PADDING).max(MIN_DELTA),
        longitude_delta: ((max_lon - min_lon) * DELTA_PADDING).max(MIN_DELTA),
    }
}
