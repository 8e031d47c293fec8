/// Filter and aggregation engine (pure, synchronous, no I/O)

pub mod aggregate;
pub mod events;
pub mod filter;
pub mod geo;
pub mod validator;

pub use aggregate::{aggregate, chart_summary, Aggregate, ChartCategory, ChartSummary};
pub use events::{classify_events, filter_events, recent_months, EventFilter};
pub use filter::{filter, FilterCriteria};
pub use geo::{classify, classify_in, UNKNOWN_REGION};
pub use validator::{parse_date, validate, DateParseError, RangeTooLarge, MAX_WINDOW_DAYS};
