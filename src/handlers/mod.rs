/// HTTP request handlers
use crate::domain::{Health, REGIONS};
use crate::engine::{parse_date, ChartCategory, ChartSummary, EventFilter, FilterCriteria};
use crate::errors::{ApiError, ApiResult};
use crate::services::{
    AsteroidTracker, ChatReply, HomeService, MarsService, NeoDetail, TrackerStatus,
    WildfireService,
};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<AsteroidTracker>,
    pub wildfires: Arc<WildfireService>,
    pub home: Arc<HomeService>,
    pub mars: Arc<MarsService>,
}

/// Successful response wrapper
#[derive(Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub ok: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self { ok: true, data }
    }
}

type Reply<T> = ApiResult<Json<SuccessResponse<T>>>;

fn ok<T: Serialize>(data: T) -> Reply<T> {
    Ok(Json(SuccessResponse::new(data)))
}

/// Treat missing, blank and "All" the same
fn selected(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

fn required_date(value: Option<&str>, name: &str) -> ApiResult<NaiveDate> {
    let raw = selected(value)
        .ok_or_else(|| ApiError::InvalidInput(format!("{} is required", name)))?;
    Ok(parse_date(raw)?)
}

/// Health check handler
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        now: Utc::now(),
    })
}

#[derive(Debug, Deserialize)]
pub struct NeoQueryParams {
    #[serde(alias = "startDate")]
    pub start: Option<String>,
    #[serde(alias = "endDate")]
    pub end: Option<String>,
}

/// Submit a NEO query window
pub async fn query_neo(
    Query(params): Query<NeoQueryParams>,
    State(state): State<AppState>,
) -> Reply<TrackerStatus> {
    let start = required_date(params.start.as_deref(), "start")?;
    let end = required_date(params.end.as_deref(), "end")?;
    ok(state.tracker.submit(start, end).await?)
}

#[derive(Debug, Deserialize)]
pub struct NeoFilterParams {
    pub date: Option<String>,
    pub hazardous: Option<String>,
}

impl NeoFilterParams {
    fn to_criteria(&self) -> ApiResult<FilterCriteria> {
        let approach_date = selected(self.date.as_deref()).map(parse_date).transpose()?;
        let hazardous_only = match self.hazardous.as_deref().map(str::trim) {
            None | Some("") => false,
            Some(v) if v.eq_ignore_ascii_case("true") => true,
            Some(v) if v.eq_ignore_ascii_case("false") => false,
            Some(v) => {
                return Err(ApiError::InvalidInput(format!(
                    "invalid hazardous flag '{}', expected true or false",
                    v
                )))
            }
        };
        Ok(FilterCriteria {
            approach_date,
            hazardous_only,
        })
    }
}

/// Apply the record filter to the current working set
pub async fn filter_neo(
    Query(params): Query<NeoFilterParams>,
    State(state): State<AppState>,
) -> Reply<TrackerStatus> {
    let criteria = params.to_criteria()?;
    ok(state.tracker.apply_filters(criteria).await?)
}

/// Current lifecycle phase and visible records
pub async fn neo_state(State(state): State<AppState>) -> Reply<TrackerStatus> {
    ok(state.tracker.status().await)
}

#[derive(Debug, Deserialize)]
pub struct ChartParams {
    pub category: Option<String>,
}

pub async fn neo_chart(
    Query(params): Query<ChartParams>,
    State(state): State<AppState>,
) -> Reply<ChartSummary> {
    let category = params
        .category
        .as_deref()
        .unwrap_or("all")
        .parse::<ChartCategory>()
        .map_err(ApiError::InvalidInput)?;
    ok(state.tracker.chart(category).await)
}

pub async fn neo_detail(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Reply<NeoDetail> {
    ok(state.tracker.find(&id).await?)
}

#[derive(Debug, Deserialize)]
pub struct WildfireParams {
    pub year: Option<String>,
    pub month: Option<String>,
    pub country: Option<String>,
}

impl WildfireParams {
    fn to_filter(&self) -> ApiResult<EventFilter> {
        let year = selected(self.year.as_deref())
            .map(|y| {
                y.parse::<i32>()
                    .map_err(|_| ApiError::InvalidInput(format!("invalid year '{}'", y)))
            })
            .transpose()?;
        let month = selected(self.month.as_deref())
            .map(|m| m.parse().map_err(ApiError::InvalidInput))
            .transpose()?;
        let country = selected(self.country.as_deref()).map(String::from);
        Ok(EventFilter {
            year,
            month,
            country,
        })
    }
}

/// Classified wildfire events matching the map filters
pub async fn list_wildfires(
    Query(params): Query<WildfireParams>,
    State(state): State<AppState>,
) -> ApiResult<Json<Value>> {
    let filter = params.to_filter()?;
    let events = state.wildfires.events(&filter).await?;
    Ok(Json(serde_json::json!(SuccessResponse::new(
        serde_json::json!({
            "count": events.len(),
            "events": events
        })
    ))))
}

pub async fn refresh_wildfires(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let report = state.wildfires.refresh().await?;
    Ok(Json(serde_json::json!(SuccessResponse::new(
        serde_json::json!({
            "ingest": report
        })
    ))))
}

/// Month choices for the map, oldest first
pub async fn wildfire_months() -> Json<Value> {
    let months: Vec<Value> = WildfireService::months(Utc::now().date_naive())
        .into_iter()
        .map(|m| {
            serde_json::json!({
                "value": format!("{:04}-{:02}", m.year, m.month),
                "label": m.label()
            })
        })
        .collect();
    Json(serde_json::json!(SuccessResponse::new(serde_json::json!({
        "months": months
    }))))
}

pub async fn wildfire_regions() -> Json<Value> {
    Json(serde_json::json!(SuccessResponse::new(serde_json::json!({
        "regions": REGIONS
    }))))
}

pub async fn get_apod(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let apod = state.home.apod().await?;
    Ok(Json(serde_json::json!(SuccessResponse::new(apod))))
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub prompt: String,
}

impl ChatRequest {
    /// Decode a raw body; an empty body counts as a blank prompt
    fn from_body(body: &[u8]) -> ApiResult<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| ApiError::InvalidInput(format!("invalid chat request: {}", e)))
    }
}

pub async fn chat(State(state): State<AppState>, body: Bytes) -> Reply<ChatReply> {
    let request = ChatRequest::from_body(&body)?;
    ok(state.home.chat(&request.prompt).await?)
}

#[derive(Debug, Deserialize)]
pub struct MarsParams {
    pub sol: Option<String>,
}

impl MarsParams {
    fn sol(&self) -> ApiResult<Option<u32>> {
        selected(self.sol.as_deref())
            .map(|s| {
                s.parse::<u32>()
                    .map_err(|_| ApiError::InvalidInput(format!("invalid sol '{}'", s)))
            })
            .transpose()
    }
}

pub async fn mars_photos(
    Query(params): Query<MarsParams>,
    State(state): State<AppState>,
) -> ApiResult<Json<Value>> {
    let photos = state.mars.photos(params.sol()?).await?;
    Ok(Json(serde_json::json!(SuccessResponse::new(
        serde_json::json!({
            "count": photos.len(),
            "photos": photos
        })
    ))))
}
