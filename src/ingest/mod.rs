/// Normalization of upstream JSON into typed records
use crate::domain::{Apod, CloseApproach, GeoEvent, MarsPhoto, NearEarthObject};
use crate::errors::{ApiError, ApiResult};
use crate::utils::{at, num, num_at, parse_day, s_pick, t_pick};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// Records kept and dropped by one ingestion pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestReport {
    pub accepted: usize,
    pub skipped: usize,
}

/// Flatten the date-keyed `near_earth_objects` map into one list
pub fn neo_feed(payload: &Value) -> ApiResult<(Vec<NearEarthObject>, IngestReport)> {
    let groups = payload
        .get("near_earth_objects")
        .and_then(|v| v.as_object())
        .ok_or_else(|| ApiError::Upstream("NEO feed has no near_earth_objects map".into()))?;

    let mut report = IngestReport::default();
    let mut records = Vec::new();
    for (date_key, entries) in groups {
        let Some(entries) = entries.as_array() else {
            warn!("NEO feed group {} is not an array", date_key);
            continue;
        };
        for raw in entries {
            match neo(raw) {
                Some(record) => {
                    records.push(record);
                    report.accepted += 1;
                }
                None => {
                    warn!(
                        "Skipping malformed NEO record {:?} in group {}",
                        s_pick(raw, &["id", "name"]),
                        date_key
                    );
                    report.skipped += 1;
                }
            }
        }
    }
    Ok((records, report))
}

/// One NEO entry; `None` if a required field is missing or it has no approaches
pub fn neo(raw: &Value) -> Option<NearEarthObject> {
    let id = s_pick(raw, &["id", "neo_reference_id"])?;
    let name = s_pick(raw, &["name"])?;
    let approaches: Vec<CloseApproach> = raw
        .get("close_approach_data")?
        .as_array()?
        .iter()
        .map(close_approach)
        .collect::<Option<_>>()?;
    if approaches.is_empty() {
        return None;
    }
    let is_hazardous = raw.get("is_potentially_hazardous_asteroid")?.as_bool()?;

    Some(NearEarthObject {
        id,
        name,
        diameter_min_m: num_at(raw, &["estimated_diameter", "meters", "estimated_diameter_min"])
            .unwrap_or(0.0),
        diameter_max_m: num_at(raw, &["estimated_diameter", "meters", "estimated_diameter_max"])
            .unwrap_or(0.0),
        absolute_magnitude: raw.get("absolute_magnitude_h").and_then(num).unwrap_or(0.0),
        is_hazardous,
        approaches,
    })
}

fn close_approach(raw: &Value) -> Option<CloseApproach> {
    let date = raw
        .get("close_approach_date")
        .and_then(|v| v.as_str())
        .and_then(parse_day)?;
    let epoch_millis = raw.get("epoch_date_close_approach")?.as_i64()?;
    Some(CloseApproach {
        epoch_millis,
        date,
        date_full: s_pick(raw, &["close_approach_date_full"]),
        miss_distance_km: num_at(raw, &["miss_distance", "kilometers"]).unwrap_or(0.0),
        relative_velocity_kph: num_at(raw, &["relative_velocity", "kilometers_per_hour"])
            .unwrap_or(0.0),
        orbiting_body: s_pick(raw, &["orbiting_body"]),
    })
}

/// EONET event list; events without a dated, positioned geometry are dropped
pub fn events(payload: &Value) -> ApiResult<(Vec<GeoEvent>, IngestReport)> {
    let list = payload
        .get("events")
        .and_then(|v| v.as_array())
        .or_else(|| payload.as_array())
        .ok_or_else(|| ApiError::Upstream("event feed has no events array".into()))?;

    let mut report = IngestReport::default();
    let mut out = Vec::with_capacity(list.len());
    for raw in list {
        match event(raw) {
            Some(e) => {
                out.push(e);
                report.accepted += 1;
            }
            None => report.skipped += 1,
        }
    }
    if report.skipped > 0 {
        warn!("Skipped {} events without usable geometry", report.skipped);
    }
    Ok((out, report))
}

fn event(raw: &Value) -> Option<GeoEvent> {
    let title = s_pick(raw, &["title"])?;
    let geometry = ["geometries", "geometry"]
        .iter()
        .find_map(|k| raw.get(*k).and_then(|g| g.as_array()))?
        .first()?;
    let coords = geometry.get("coordinates")?.as_array()?;
    let longitude = coords.first().and_then(num)?;
    let latitude = coords.get(1).and_then(num)?;

    Some(GeoEvent {
        id: s_pick(raw, &["id"]),
        title,
        event_time: t_pick(geometry, &["date"])?,
        longitude,
        latitude,
    })
}

pub fn apod(payload: &Value) -> ApiResult<Apod> {
    let title = s_pick(payload, &["title"])
        .ok_or_else(|| ApiError::Upstream("APOD payload has no title".into()))?;
    Ok(Apod {
        date: payload.get("date").and_then(|v| v.as_str()).and_then(parse_day),
        title,
        explanation: s_pick(payload, &["explanation"]),
        url: s_pick(payload, &["url"]),
        hd_url: s_pick(payload, &["hdurl", "hd_url"]),
        media_type: s_pick(payload, &["media_type"]),
        copyright: s_pick(payload, &["copyright"]).map(|c| c.trim().to_string()),
    })
}

/// Rover photos, at most `limit` of them
pub fn mars_photos(payload: &Value, limit: usize) -> ApiResult<Vec<MarsPhoto>> {
    let list = payload
        .get("photos")
        .and_then(|v| v.as_array())
        .ok_or_else(|| ApiError::Upstream("Mars payload has no photos array".into()))?;

    Ok(list.iter().filter_map(mars_photo).take(limit).collect())
}

fn mars_photo(raw: &Value) -> Option<MarsPhoto> {
    Some(MarsPhoto {
        id: raw.get("id")?.as_i64()?,
        sol: raw.get("sol").and_then(|v| v.as_i64()).unwrap_or(0),
        earth_date: raw.get("earth_date").and_then(|v| v.as_str()).and_then(parse_day),
        img_src: s_pick(raw, &["img_src"])?,
        camera: at(raw, &["camera", "name"]).and_then(|v| v.as_str()).map(String::from),
        camera_full_name: at(raw, &["camera", "full_name"])
            .and_then(|v| v.as_str())
            .map(String::from),
        rover: at(raw, &["rover", "name"]).and_then(|v| v.as_str()).map(String::from),
    })
}
