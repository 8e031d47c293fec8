/// Business logic services layer
use crate::clients::{EventSource, HomeSource, MarsSource, NeoSource};
use crate::domain::{
    Apod, ClassifiedEvent, CloseApproach, GeoEvent, MarsPhoto, NearEarthObject, NeoView,
    QueryPhase, QueryWindow, YearMonth,
};
use crate::engine::{
    chart_summary, filter, filter_events, recent_months, validate, ChartCategory, ChartSummary,
    EventFilter, FilterCriteria,
};
use crate::errors::{ApiError, ApiResult};
use crate::ingest::{self, IngestReport};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

/// Result set of the last successful NEO query
#[derive(Debug, Clone)]
struct Snapshot {
    window: QueryWindow,
    records: Vec<NearEarthObject>,
    report: IngestReport,
    criteria: FilterCriteria,
    filtered: Vec<NearEarthObject>,
}

#[derive(Debug)]
struct TrackerState {
    phase: QueryPhase,
    snapshot: Option<Snapshot>,
}

impl TrackerState {
    fn status(&self) -> TrackerStatus {
        match &self.snapshot {
            Some(s) => TrackerStatus {
                phase: self.phase.clone(),
                window: Some(s.window),
                criteria: Some(s.criteria),
                total: s.records.len(),
                ingest: Some(s.report.clone()),
                view: NeoView::Results(s.filtered.clone()),
            },
            None => TrackerStatus {
                phase: self.phase.clone(),
                window: None,
                criteria: None,
                total: 0,
                ingest: None,
                view: NeoView::Unqueried,
            },
        }
    }
}

/// What the asteroid view sees after an operation
#[derive(Debug, Clone, Serialize)]
pub struct TrackerStatus {
    pub phase: QueryPhase,
    pub window: Option<QueryWindow>,
    pub criteria: Option<FilterCriteria>,
    /// Size of the unfiltered working set
    pub total: usize,
    pub ingest: Option<IngestReport>,
    pub view: NeoView,
}

/// One record with its closest approach resolved
#[derive(Debug, Clone, Serialize)]
pub struct NeoDetail {
    pub neo: NearEarthObject,
    pub closest_approach: Option<CloseApproach>,
}

/// Asteroid tracker: validates query windows, fetches the feed, and keeps
/// the latest working set plus its filtered view.
pub struct AsteroidTracker {
    source: Arc<dyn NeoSource>,
    state: RwLock<TrackerState>,
}

impl AsteroidTracker {
    pub fn new(source: Arc<dyn NeoSource>) -> Self {
        Self {
            source,
            state: RwLock::new(TrackerState {
                phase: QueryPhase::Idle,
                snapshot: None,
            }),
        }
    }

    /// Run one query attempt. A rejected window never reaches the upstream
    /// and leaves the previous results in place; a fetch discards them.
    pub async fn submit(&self, start: NaiveDate, end: NaiveDate) -> ApiResult<TrackerStatus> {
        self.state.write().await.phase = QueryPhase::Validating;

        let window = match validate(start, end) {
            Ok(window) => window,
            Err(e) => {
                warn!("Rejected NEO window {} .. {}: {} days", start, end, e.days);
                self.state.write().await.phase = QueryPhase::Rejected {
                    message: e.to_string(),
                };
                return Err(e.into());
            }
        };

        {
            let mut state = self.state.write().await;
            state.phase = QueryPhase::Fetching;
            state.snapshot = None;
        }
        info!("Fetching NEO feed for {} .. {}", window.start, window.end);

        let result = self.load(&window).await;

        let mut state = self.state.write().await;
        match result {
            Ok((records, report)) => {
                info!(
                    "Loaded {} NEO records ({} skipped)",
                    report.accepted, report.skipped
                );
                state.snapshot = Some(Snapshot {
                    window,
                    filtered: records.clone(),
                    records,
                    report,
                    criteria: FilterCriteria::default(),
                });
                state.phase = QueryPhase::Loaded;
                Ok(state.status())
            }
            Err(e) => {
                error!("NEO fetch error: {:?}", e);
                state.phase = QueryPhase::Failed {
                    message: e.to_string(),
                };
                Err(e)
            }
        }
    }

    async fn load(&self, window: &QueryWindow) -> ApiResult<(Vec<NearEarthObject>, IngestReport)> {
        let payload = self.source.fetch_neo_feed(window).await?;
        ingest::neo_feed(&payload)
    }

    /// Re-filter the full working set. Never narrows an earlier filtered view.
    pub async fn apply_filters(&self, criteria: FilterCriteria) -> ApiResult<TrackerStatus> {
        let mut state = self.state.write().await;
        let snapshot = state.snapshot.as_mut().ok_or(ApiError::NoActiveQuery)?;
        snapshot.filtered = filter(&snapshot.records, &criteria);
        snapshot.criteria = criteria;
        info!(
            "Applied NEO filter {:?}: {} of {} records",
            criteria,
            snapshot.filtered.len(),
            snapshot.records.len()
        );
        Ok(state.status())
    }

    pub async fn status(&self) -> TrackerStatus {
        self.state.read().await.status()
    }

    /// Chart series over the current filtered view
    pub async fn chart(&self, category: ChartCategory) -> ChartSummary {
        let state = self.state.read().await;
        let records = state
            .snapshot
            .as_ref()
            .map(|s| s.filtered.as_slice())
            .unwrap_or(&[]);
        chart_summary(records, category)
    }

    /// Detail of one record from the working set
    pub async fn find(&self, id: &str) -> ApiResult<NeoDetail> {
        let state = self.state.read().await;
        let neo = state
            .snapshot
            .as_ref()
            .and_then(|s| s.records.iter().find(|n| n.id == id))
            .ok_or_else(|| ApiError::NotFound(format!("NEO {}", id)))?;
        Ok(NeoDetail {
            closest_approach: neo.closest_approach().cloned(),
            neo: neo.clone(),
        })
    }
}

/// Wildfire map service. Events are loaded once and filtered on demand.
pub struct WildfireService {
    source: Arc<dyn EventSource>,
    events: RwLock<Option<Vec<GeoEvent>>>,
}

impl WildfireService {
    pub fn new(source: Arc<dyn EventSource>) -> Self {
        Self {
            source,
            events: RwLock::new(None),
        }
    }

    /// Replace the held event list with a fresh fetch
    pub async fn refresh(&self) -> ApiResult<IngestReport> {
        let payload = self.source.fetch_events().await.map_err(|e| {
            error!("Error fetching wildfires: {:?}", e);
            e
        })?;
        let (events, report) = ingest::events(&payload)?;
        info!("Loaded {} wildfire events", events.len());
        *self.events.write().await = Some(events);
        Ok(report)
    }

    pub async fn events(&self, filter: &EventFilter) -> ApiResult<Vec<ClassifiedEvent>> {
        if self.events.read().await.is_none() {
            self.refresh().await?;
        }
        let events = self.events.read().await;
        Ok(events
            .as_deref()
            .map(|list| filter_events(list, filter))
            .unwrap_or_default())
    }

    /// Month choices for the map filter
    pub fn months(today: NaiveDate) -> Vec<YearMonth> {
        recent_months(today, 6)
    }
}

/// Reply shown in the chat panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub message: String,
    pub sender: &'static str,
}

pub const CHAT_FALLBACK: &str = "Oops! Couldn't fetch a response. Try again later.";
const CHAT_EMPTY: &str = "No response received.";

/// Home page service: picture of the day and the chat assistant relay
pub struct HomeService {
    source: Arc<dyn HomeSource>,
}

impl HomeService {
    pub fn new(source: Arc<dyn HomeSource>) -> Self {
        Self { source }
    }

    pub async fn apod(&self) -> ApiResult<Apod> {
        let payload = self.source.fetch_apod().await?;
        ingest::apod(&payload)
    }

    /// Relay a prompt. Upstream failures become the fallback reply.
    pub async fn chat(&self, prompt: &str) -> ApiResult<ChatReply> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ApiError::InvalidInput("prompt is empty".into()));
        }

        let message = match self.source.ask(prompt).await {
            Ok(payload) => payload
                .get("response")
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .unwrap_or(CHAT_EMPTY)
                .to_string(),
            Err(e) => {
                warn!("Chat relay error: {:?}", e);
                CHAT_FALLBACK.to_string()
            }
        };
        Ok(ChatReply {
            message,
            sender: "assistant",
        })
    }
}

/// Mars gallery service
pub struct MarsService {
    source: Arc<dyn MarsSource>,
    default_sol: u32,
    limit: usize,
}

impl MarsService {
    pub fn new(source: Arc<dyn MarsSource>, default_sol: u32, limit: usize) -> Self {
        Self {
            source,
            default_sol,
            limit,
        }
    }

    pub async fn photos(&self, sol: Option<u32>) -> ApiResult<Vec<MarsPhoto>> {
        let sol = sol.unwrap_or(self.default_sol);
        let payload = self.source.fetch_photos(sol).await.map_err(|e| {
            error!("Failed to fetch Mars photos for sol {}: {:?}", sol, e);
            e
        })?;
        ingest::mars_photos(&payload, self.limit)
    }
}
