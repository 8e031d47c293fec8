/// Country classification for geo events
use crate::domain::{CountryRegion, REGIONS};

pub const UNKNOWN_REGION: &str = "Unknown";

/// Classify against the built-in region table
pub fn classify(title: &str, longitude: f64, latitude: f64) -> &'static str {
    classify_in(&REGIONS, title, longitude, latitude)
}

/// Title substring first, then bounding box, in table order.
///
/// A title hit returns without looking at coordinates.
pub fn classify_in(
    table: &[CountryRegion],
    title: &str,
    longitude: f64,
    latitude: f64,
) -> &'static str {
    if let Some(region) = table.iter().find(|r| title.contains(r.name)) {
        return region.name;
    }

    table
        .iter()
        .find(|r| r.contains(longitude, latitude))
        .map(|r| r.name)
        .unwrap_or(UNKNOWN_REGION)
}
