/// Per-day and hazard aggregation for charts
use crate::domain::NearEarthObject;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregate {
    /// Records per first-approach day
    pub per_day_counts: BTreeMap<NaiveDate, usize>,
    pub hazardous_count: usize,
    pub non_hazardous_count: usize,
}

/// Count records per first-approach day and split them by hazard flag.
///
/// A record with several approaches is counted once, on its first-listed one.
pub fn aggregate(records: &[NearEarthObject]) -> Aggregate {
    let mut out = Aggregate {
        per_day_counts: per_day_counts(records),
        ..Aggregate::default()
    };
    for neo in records {
        if neo.is_hazardous {
            out.hazardous_count += 1;
        } else {
            out.non_hazardous_count += 1;
        }
    }
    out
}

fn per_day_counts<'a, I>(records: I) -> BTreeMap<NaiveDate, usize>
where
    I: IntoIterator<Item = &'a NearEarthObject>,
{
    let mut counts = BTreeMap::new();
    for neo in records {
        if let Some(first) = neo.first_approach() {
            *counts.entry(first.date).or_insert(0) += 1;
        }
    }
    counts
}

/// Chart-only category filter. It narrows what is plotted, never the
/// hazard totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartCategory {
    #[default]
    All,
    Hazardous,
    NonHazardous,
}

impl ChartCategory {
    pub fn includes(self, neo: &NearEarthObject) -> bool {
        match self {
            ChartCategory::All => true,
            ChartCategory::Hazardous => neo.is_hazardous,
            ChartCategory::NonHazardous => !neo.is_hazardous,
        }
    }
}

impl FromStr for ChartCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(ChartCategory::All),
            "hazardous" => Ok(ChartCategory::Hazardous),
            "non_hazardous" | "non-hazardous" => Ok(ChartCategory::NonHazardous),
            other => Err(format!("unknown chart category '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub name: String,
    pub diameter_max_m: f64,
    pub velocity_kph: f64,
    pub hazardous: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedValue {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSummary {
    pub category: ChartCategory,
    pub plotted: usize,
    pub per_day_counts: BTreeMap<NaiveDate, usize>,
    pub hazardous_count: usize,
    pub non_hazardous_count: usize,
    pub size_vs_velocity: Vec<ScatterPoint>,
    pub max_diameter_m: Vec<NamedValue>,
    pub velocity_kph: Vec<NamedValue>,
    pub miss_distance_km: Vec<NamedValue>,
}

/// Chart series for `records` under a category filter
pub fn chart_summary(records: &[NearEarthObject], category: ChartCategory) -> ChartSummary {
    let totals = aggregate(records);
    let plotted: Vec<&NearEarthObject> = records.iter().filter(|n| category.includes(n)).collect();

    let mut size_vs_velocity = Vec::with_capacity(plotted.len());
    let mut max_diameter_m = Vec::with_capacity(plotted.len());
    let mut velocity_kph = Vec::with_capacity(plotted.len());
    let mut miss_distance_km = Vec::with_capacity(plotted.len());

    for neo in &plotted {
        max_diameter_m.push(NamedValue {
            name: neo.name.clone(),
            value: neo.diameter_max_m,
        });
        let Some(first) = neo.first_approach() else {
            continue;
        };
        size_vs_velocity.push(ScatterPoint {
            name: neo.name.clone(),
            diameter_max_m: neo.diameter_max_m,
            velocity_kph: first.relative_velocity_kph,
            hazardous: neo.is_hazardous,
        });
        velocity_kph.push(NamedValue {
            name: neo.name.clone(),
            value: first.relative_velocity_kph,
        });
        miss_distance_km.push(NamedValue {
            name: neo.name.clone(),
            value: first.miss_distance_km,
        });
    }

    ChartSummary {
        category,
        plotted: plotted.len(),
        per_day_counts: per_day_counts(plotted.iter().copied()),
        hazardous_count: totals.hazardous_count,
        non_hazardous_count: totals.non_hazardous_count,
        size_vs_velocity,
        max_diameter_m,
        velocity_kph,
        miss_distance_km,
    }
}
