/// Record filter over a NEO working set
use crate::domain::NearEarthObject;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    /// Keep records with any approach on this day
    pub approach_date: Option<NaiveDate>,
    /// Keep only potentially hazardous records
    pub hazardous_only: bool,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.approach_date.is_none() && !self.hazardous_only
    }

    pub fn matches(&self, neo: &NearEarthObject) -> bool {
        let date_ok = self.approach_date.map_or(true, |d| neo.approaches_on(d));
        let hazard_ok = !self.hazardous_only || neo.is_hazardous;
        date_ok && hazard_ok
    }
}

/// Narrow `records` to those matching every set criterion, preserving order
pub fn filter(records: &[NearEarthObject], criteria: &FilterCriteria) -> Vec<NearEarthObject> {
    records
        .iter()
        .filter(|neo| criteria.matches(neo))
        .cloned()
        .collect()
}
