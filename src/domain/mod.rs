/// Domain models for the application
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use std::str::FromStr;

/// One close-approach window of a near-Earth object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloseApproach {
    pub epoch_millis: i64,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_full: Option<String>,
    pub miss_distance_km: f64,
    pub relative_velocity_kph: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orbiting_body: Option<String>,
}

/// Near-Earth object as received from the NEO feed.
///
/// `approaches` is never empty; the ingestion layer drops records without
/// any close-approach data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearEarthObject {
    pub id: String,
    pub name: String,
    pub diameter_min_m: f64,
    pub diameter_max_m: f64,
    pub absolute_magnitude: f64,
    pub is_hazardous: bool,
    pub approaches: Vec<CloseApproach>,
}

impl NearEarthObject {
    /// First-listed approach, the one charts group by
    pub fn first_approach(&self) -> Option<&CloseApproach> {
        self.approaches.first()
    }

    /// Approach with the earliest epoch timestamp
    pub fn closest_approach(&self) -> Option<&CloseApproach> {
        self.approaches.iter().min_by_key(|a| a.epoch_millis)
    }

    /// Whether any approach falls on `date`
    pub fn approaches_on(&self, date: NaiveDate) -> bool {
        self.approaches.iter().any(|a| a.date == date)
    }
}

/// Natural event (wildfire) with its first reported position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub event_time: DateTime<Utc>,
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoEvent {
    pub fn event_date(&self) -> NaiveDate {
        self.event_time.date_naive()
    }

    pub fn year_month(&self) -> YearMonth {
        YearMonth::of(self.event_date())
    }
}

/// Event tagged with the region it was classified into
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedEvent {
    #[serde(flatten)]
    pub event: GeoEvent,
    pub country: &'static str,
}

/// Named bounding box used by the geo classifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CountryRegion {
    pub name: &'static str,
    pub lat_min: f64,
    pub lat_max: f64,
    pub lng_min: f64,
    pub lng_max: f64,
}

impl CountryRegion {
    pub const fn new(name: &'static str, lat_min: f64, lat_max: f64, lng_min: f64, lng_max: f64) -> Self {
        Self {
            name,
            lat_min,
            lat_max,
            lng_min,
            lng_max,
        }
    }

    /// Inclusive containment check
    pub fn contains(&self, longitude: f64, latitude: f64) -> bool {
        latitude >= self.lat_min
            && latitude <= self.lat_max
            && longitude >= self.lng_min
            && longitude <= self.lng_max
    }
}

/// Region table for wildfire classification. Order matters: the first
/// match wins, so continental boxes listed early shadow later sub-regions.
pub const REGIONS: [CountryRegion; 10] = [
    CountryRegion::new("USA", 24.0, 49.0, -125.0, -66.0),
    CountryRegion::new("Australia", -44.0, -10.0, 112.0, 154.0),
    CountryRegion::new("Canada", 42.0, 83.0, -141.0, -52.0),
    CountryRegion::new("Brazil", -35.0, 5.0, -74.0, -34.0),
    CountryRegion::new("Russia", 41.0, 81.0, 19.0, 180.0),
    CountryRegion::new("India", 8.0, 37.0, 68.0, 97.0),
    CountryRegion::new("African Continent", -35.0, 37.0, -25.0, 55.0),
    CountryRegion::new("South Africa", -35.0, -22.0, 16.0, 33.0),
    CountryRegion::new("Central Africa", -10.0, 10.0, 15.0, 30.0),
    CountryRegion::new("European Countries", 35.0, 72.0, -25.0, 45.0),
];

/// Validated NEO query window (at most seven days wide).
///
/// Only the validator builds these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueryWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl QueryWindow {
    pub(crate) fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

/// Calendar month used by the wildfire month filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    /// The month before this one
    pub fn pred(self) -> Self {
        if self.month <= 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    /// Display label, e.g. "March 2025"
    pub fn label(&self) -> String {
        const NAMES: [&str; 12] = [
            "January",
            "February",
            "March",
            "April",
            "May",
            "June",
            "July",
            "August",
            "September",
            "October",
            "November",
            "December",
        ];
        let idx = (self.month.clamp(1, 12) - 1) as usize;
        format!("{} {}", NAMES[idx], self.year)
    }
}

impl FromStr for YearMonth {
    type Err = String;

    /// Parse `YYYY-MM`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("invalid month '{}', expected YYYY-MM", s);
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(Self::new(year, month))
    }
}

/// Astronomy picture of the day
#[derive(Debug, Clone, Serialize)]
pub struct Apod {
    pub date: Option<NaiveDate>,
    pub title: String,
    pub explanation: Option<String>,
    pub url: Option<String>,
    pub hd_url: Option<String>,
    pub media_type: Option<String>,
    pub copyright: Option<String>,
}

/// Mars rover photo
#[derive(Debug, Clone, Serialize)]
pub struct MarsPhoto {
    pub id: i64,
    pub sol: i64,
    pub earth_date: Option<NaiveDate>,
    pub img_src: String,
    pub camera: Option<String>,
    pub camera_full_name: Option<String>,
    pub rover: Option<String>,
}

/// View-level lifecycle of a NEO query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum QueryPhase {
    Idle,
    Validating,
    Rejected { message: String },
    Fetching,
    Failed { message: String },
    Loaded,
}

/// Records visible to the caller. `Unqueried` and an empty `Results`
/// are different states.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "records", rename_all = "snake_case")]
pub enum NeoView {
    Unqueried,
    Results(Vec<NearEarthObject>),
}

/// Health check response
#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub now: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approach(day: u32, epoch: i64) -> CloseApproach {
        CloseApproach {
            epoch_millis: epoch,
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            date_full: None,
            miss_distance_km: 1.0,
            relative_velocity_kph: 1.0,
            orbiting_body: None,
        }
    }

    #[test]
    fn test_closest_approach_picks_earliest_epoch() {
        let neo = NearEarthObject {
            id: "1".into(),
            name: "(2025 AA)".into(),
            diameter_min_m: 1.0,
            diameter_max_m: 2.0,
            absolute_magnitude: 20.0,
            is_hazardous: false,
            approaches: vec![approach(5, 500), approach(2, 200), approach(9, 900)],
        };
        assert_eq!(neo.first_approach().unwrap().epoch_millis, 500);
        assert_eq!(neo.closest_approach().unwrap().epoch_millis, 200);
    }

    #[test]
    fn test_region_contains_is_inclusive() {
        let usa = REGIONS[0];
        assert!(usa.contains(-125.0, 24.0));
        assert!(usa.contains(-66.0, 49.0));
        assert!(!usa.contains(-65.9, 30.0));
    }

    #[test]
    fn test_year_month_pred_wraps_year() {
        assert_eq!(YearMonth::new(2025, 1).pred(), YearMonth::new(2024, 12));
        assert_eq!(YearMonth::new(2025, 7).pred(), YearMonth::new(2025, 6));
    }

    #[test]
    fn test_year_month_label() {
        assert_eq!(YearMonth::new(2025, 3).label(), "March 2025");
    }

    #[test]
    fn test_year_month_from_str() {
        assert_eq!("2025-03".parse::<YearMonth>(), Ok(YearMonth::new(2025, 3)));
        assert!("2025-13".parse::<YearMonth>().is_err());
        assert!("March 2025".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_neo_view_serializes_state_tag() {
        let json = serde_json::to_value(NeoView::Unqueried).unwrap();
        assert_eq!(json["state"], "unqueried");
        let json = serde_json::to_value(NeoView::Results(vec![])).unwrap();
        assert_eq!(json["state"], "results");
        assert_eq!(json["records"], serde_json::json!([]));
    }
}
