/// Wildfire event filtering by year, month and region
use crate::domain::{ClassifiedEvent, GeoEvent, YearMonth};
use crate::engine::geo::classify;
use chrono::{Datelike, NaiveDate};

/// Map filters. `None` means "All".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub year: Option<i32>,
    pub month: Option<YearMonth>,
    pub country: Option<String>,
}

impl EventFilter {
    pub fn matches(&self, event: &ClassifiedEvent) -> bool {
        let date = event.event.event_date();
        self.year.map_or(true, |y| date.year() == y)
            && self.month.map_or(true, |m| event.event.year_month() == m)
            && self.country.as_deref().map_or(true, |c| event.country == c)
    }
}

/// Tag each event with its region
pub fn classify_events(events: &[GeoEvent]) -> Vec<ClassifiedEvent> {
    events
        .iter()
        .map(|e| ClassifiedEvent {
            country: classify(&e.title, e.longitude, e.latitude),
            event: e.clone(),
        })
        .collect()
}

pub fn filter_events(events: &[GeoEvent], filter: &EventFilter) -> Vec<ClassifiedEvent> {
    classify_events(events)
        .into_iter()
        .filter(|e| filter.matches(e))
        .collect()
}

/// The last `count` months up to and including the month of `today`,
/// oldest first
pub fn recent_months(today: NaiveDate, count: usize) -> Vec<YearMonth> {
    let mut months = Vec::with_capacity(count);
    let mut current = YearMonth::of(today);
    for _ in 0..count {
        months.push(current);
        current = current.pred();
    }
    months.reverse();
    months
}
