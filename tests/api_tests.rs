//! Router tests driving the axum app with in-memory upstreams.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use nasa_explorer::clients::{EventSource, HomeSource, MarsSource, NeoSource};
use nasa_explorer::domain::QueryWindow;
use nasa_explorer::errors::{ApiError, ApiResult};
use nasa_explorer::handlers::AppState;
use nasa_explorer::routes::build_router;
use nasa_explorer::services::{AsteroidTracker, HomeService, MarsService, WildfireService};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

struct Upstream {
    neo: Value,
    fail: bool,
    neo_calls: AtomicUsize,
}

impl Upstream {
    fn respond(&self, payload: Value) -> ApiResult<Value> {
        if self.fail {
            return Err(ApiError::UpstreamStatus {
                status: 503,
                what: "test upstream".into(),
            });
        }
        Ok(payload)
    }
}

#[async_trait]
impl NeoSource for Upstream {
    async fn fetch_neo_feed(&self, _window: &QueryWindow) -> ApiResult<Value> {
        self.neo_calls.fetch_add(1, Ordering::SeqCst);
        self.respond(self.neo.clone())
    }
}

#[async_trait]
impl EventSource for Upstream {
    async fn fetch_events(&self) -> ApiResult<Value> {
        self.respond(json!({
            "events": [
                {"title": "Wildfire near Sacramento, USA", "geometries": [{"date": "2025-01-10T00:00:00Z", "coordinates": [-121.5, 38.6]}]},
                {"title": "Fire", "geometries": [{"date": "2025-01-12T00:00:00Z", "coordinates": [25.0, -30.0]}]},
                {"title": "Old fire", "geometries": [{"date": "2024-08-01T00:00:00Z", "coordinates": [200.0, 90.0]}]}
            ]
        }))
    }
}

#[async_trait]
impl HomeSource for Upstream {
    async fn fetch_apod(&self) -> ApiResult<Value> {
        self.respond(json!({"date": "2025-01-10", "title": "Orion Nebula", "media_type": "image"}))
    }

    async fn ask(&self, prompt: &str) -> ApiResult<Value> {
        self.respond(json!({ "response": format!("echo: {prompt}") }))
    }
}

#[async_trait]
impl MarsSource for Upstream {
    async fn fetch_photos(&self, sol: u32) -> ApiResult<Value> {
        self.respond(json!({
            "photos": [{"id": 1, "sol": sol, "img_src": "https://mars/1.jpg", "rover": {"name": "Curiosity"}}]
        }))
    }
}

fn raw_neo(id: &str, hazardous: bool, dates: &[&str]) -> Value {
    let approaches: Vec<Value> = dates
        .iter()
        .map(|d| {
            json!({
                "close_approach_date": d,
                "epoch_date_close_approach": 1736136720000i64,
                "relative_velocity": {"kilometers_per_hour": "50000.0"},
                "miss_distance": {"kilometers": "4000000.0"}
            })
        })
        .collect();
    json!({
        "id": id,
        "name": format!("({id})"),
        "absolute_magnitude_h": 21.0,
        "estimated_diameter": {"meters": {"estimated_diameter_min": 50.0, "estimated_diameter_max": 110.0}},
        "is_potentially_hazardous_asteroid": hazardous,
        "close_approach_data": approaches
    })
}

fn upstream(fail: bool) -> Arc<Upstream> {
    Arc::new(Upstream {
        neo: json!({
            "near_earth_objects": {
                "2025-01-06": [
                    raw_neo("1", true, &["2025-01-06"]),
                    raw_neo("2", true, &["2025-01-06", "2025-01-08"]),
                    raw_neo("3", false, &["2025-01-06"])
                ],
                "2025-01-08": [raw_neo("4", false, &["2025-01-08"])]
            }
        }),
        fail,
        neo_calls: AtomicUsize::new(0),
    })
}

fn app(source: Arc<Upstream>) -> Router {
    build_router(AppState {
        tracker: Arc::new(AsteroidTracker::new(source.clone())),
        wildfires: Arc::new(WildfireService::new(source.clone())),
        home: Arc::new(HomeService::new(source.clone())),
        mars: Arc::new(MarsService::new(source, 1000, 60)),
    })
}

async fn send(app: &Router, req: Request<Body>) -> Value {
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(app: &Router, uri: &str) -> Value {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

#[tokio::test]
async fn test_health() {
    let body = get(&app(upstream(false)), "/health").await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_state_before_any_query_is_unqueried() {
    let body = get(&app(upstream(false)), "/neo/state").await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["phase"]["phase"], "idle");
    assert_eq!(body["view"]["state"], "unqueried");
}

#[tokio::test]
async fn test_wide_window_is_rejected_without_fetch() {
    let source = upstream(false);
    let app = app(source.clone());
    let body = get(&app, "/neo/query?start=2025-01-01&end=2025-01-09").await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"]["code"], "RANGE_TOO_LARGE");
    assert_eq!(source.neo_calls.load(Ordering::SeqCst), 0);

    let state = get(&app, "/neo/state").await;
    assert_eq!(state["phase"]["phase"], "rejected");
}

#[tokio::test]
async fn test_query_then_filter_then_chart() {
    let app = app(upstream(false));

    let body = get(&app, "/neo/query?startDate=2025-01-06&endDate=2025-01-08").await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["phase"]["phase"], "loaded");
    assert_eq!(body["total"], 4);
    assert_eq!(body["view"]["records"].as_array().unwrap().len(), 4);

    let body = get(&app, "/neo/filter?date=2025-01-08").await;
    let ids: Vec<&str> = body["view"]["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["2", "4"]);

    let body = get(&app, "/neo/filter?date=2025-01-08&hazardous=true").await;
    assert_eq!(body["view"]["records"].as_array().unwrap().len(), 1);

    let body = get(&app, "/neo/filter?date=&hazardous=false").await;
    assert_eq!(body["view"]["records"].as_array().unwrap().len(), 4);

    let chart = get(&app, "/neo/chart?category=hazardous").await;
    assert_eq!(chart["hazardous_count"], 2);
    assert_eq!(chart["non_hazardous_count"], 2);
    assert_eq!(chart["plotted"], 2);
    assert_eq!(chart["per_day_counts"]["2025-01-06"], 2);
}

#[tokio::test]
async fn test_filter_without_query_reports_no_active_query() {
    let body = get(&app(upstream(false)), "/neo/filter?hazardous=true").await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"]["code"], "NO_ACTIVE_QUERY");
}

#[tokio::test]
async fn test_empty_filter_result_is_distinct_from_unqueried() {
    let app = app(upstream(false));
    get(&app, "/neo/query?start=2025-01-06&end=2025-01-08").await;
    let body = get(&app, "/neo/filter?date=2025-01-07").await;
    assert_eq!(body["view"]["state"], "results");
    assert_eq!(body["view"]["records"], json!([]));
}

#[tokio::test]
async fn test_upstream_failure_surfaces_message() {
    let app = app(upstream(true));
    let body = get(&app, "/neo/query?start=2025-01-06&end=2025-01-08").await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"]["code"], "UPSTREAM_5XX");
    let state = get(&app, "/neo/state").await;
    assert_eq!(state["phase"]["phase"], "failed");
}

#[tokio::test]
async fn test_bad_date_is_invalid_input() {
    let body = get(&app(upstream(false)), "/neo/query?start=soon&end=2025-01-08").await;
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_neo_detail() {
    let app = app(upstream(false));
    get(&app, "/neo/query?start=2025-01-06&end=2025-01-08").await;
    let body = get(&app, "/neo/2").await;
    assert_eq!(body["neo"]["id"], "2");
    assert_eq!(body["closest_approach"]["date"], "2025-01-06");
    let missing = get(&app, "/neo/99").await;
    assert_eq!(missing["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_wildfires_are_classified_and_filtered() {
    let app = app(upstream(false));
    let body = get(&app, "/wildfires").await;
    assert_eq!(body["count"], 3);
    let countries: Vec<&str> = body["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["country"].as_str().unwrap())
        .collect();
    assert_eq!(countries, vec!["USA", "African Continent", "Unknown"]);

    let body = get(&app, "/wildfires?year=2025&month=2025-01&country=USA").await;
    assert_eq!(body["count"], 1);

    let body = get(&app, "/wildfires?year=All&country=Unknown").await;
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn test_wildfire_months_and_regions() {
    let app = app(upstream(false));
    let months = get(&app, "/wildfires/months").await;
    assert_eq!(months["months"].as_array().unwrap().len(), 6);
    let regions = get(&app, "/wildfires/regions").await;
    assert_eq!(regions["regions"][0]["name"], "USA");
    assert_eq!(regions["regions"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_apod_and_mars() {
    let app = app(upstream(false));
    let apod = get(&app, "/apod").await;
    assert_eq!(apod["title"], "Orion Nebula");
    let mars = get(&app, "/mars/photos?sol=42").await;
    assert_eq!(mars["count"], 1);
    assert_eq!(mars["photos"][0]["sol"], 42);
}

#[tokio::test]
async fn test_chat_relay() {
    let failing = app(upstream(true));
    let app = app(upstream(false));
    let req = Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"prompt": "hi"}"#))
        .unwrap();
    let body = send(&app, req).await;
    assert_eq!(body["message"], "echo: hi");

    let req = Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"prompt": "hi"}"#))
        .unwrap();
    let body = send(&failing, req).await;
    assert_eq!(body["message"], "Oops! Couldn't fetch a response. Try again later.");
}

fn assert_invalid_input(body: &Value) {
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_malformed_hazardous_flag_is_invalid_input() {
    let app = app(upstream(false));
    get(&app, "/neo/query?start=2025-01-06&end=2025-01-08").await;
    assert_invalid_input(&get(&app, "/neo/filter?hazardous=yes").await);

    let body = get(&app, "/neo/filter?hazardous=true").await;
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_malformed_sol_is_invalid_input() {
    let app = app(upstream(false));
    assert_invalid_input(&get(&app, "/mars/photos?sol=abc").await);
}

#[tokio::test]
async fn test_chat_without_prompt_is_invalid_input() {
    let app = app(upstream(false));
    let req = Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();
    assert_invalid_input(&send(&app, req).await);

    let req = Request::builder()
        .method("POST")
        .uri("/chat")
        .body(Body::from("prompt=hi"))
        .unwrap();
    assert_invalid_input(&send(&app, req).await);
}
