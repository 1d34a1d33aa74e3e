//! Marketplace Web Service list API
//!
//! Paginated list operations against MWS: request parameters, dispatch,
//! response normalization, per-group throttling and result accumulation.

pub mod client;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod normalize;
pub mod pagination;
pub mod params;
pub mod resilience;
pub mod resources;

pub use client::MwsClient;
pub use dispatch::{Dispatcher, HttpDispatcher, MockDispatcher, SentRequest};
pub use error::{DispatchError, FetchError, FetchResult};
pub use normalize::{FieldExtractor, FieldKind, FieldValue, Page, Record, RecordLayout};
pub use pagination::{CountSpec, Cursor, FetchSummary, ListSpec, OperationRef, PaginationController, ResultStore};
pub use params::RequestParameters;
pub use resilience::{ApiLogger, LogLevel, MonitoringConfig, ResilienceConfig, ThrottleConfig, ThrottleDecision, ThrottleGovernor};
pub use resources::{DestinationList, FeedList, ListResource, OrderItemList, ParticipationList, ProductSearch, ReportList};
