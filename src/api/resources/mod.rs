//! Typed adapters over [`PaginationController`] for individual MWS lists

pub mod destinations;
pub mod feeds;
pub mod order_items;
pub mod participations;
pub mod products;
pub mod reports;

pub use destinations::DestinationList;
pub use feeds::FeedList;
pub use order_items::OrderItemList;
pub use participations::ParticipationList;
pub use products::ProductSearch;
pub use reports::ReportList;

use crate::api::constants::params;
use crate::api::error::{FetchError, FetchResult};
use crate::api::normalize::Record;
use crate::api::pagination::{FetchSummary, PaginationController};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};

/// Shared behaviour of every list resource
#[async_trait]
pub trait ListResource: Send {
    fn controller(&self) -> &PaginationController;

    fn controller_mut(&mut self) -> &mut PaginationController;

    /// Follow continuation tokens automatically during `fetch`
    fn set_use_token(&mut self, enabled: bool) {
        self.controller_mut().set_auto_continue(enabled);
    }

    async fn fetch(&mut self) -> FetchResult<FetchSummary> {
        self.controller_mut().fetch().await
    }

    async fn fetch_next(&mut self) -> FetchResult<Option<FetchSummary>> {
        self.controller_mut().fetch_next().await
    }

    fn records(&self) -> Option<&[Record]> {
        self.controller().results()
    }

    fn record(&self, index: usize) -> Option<&Record> {
        self.controller().result(index)
    }

    fn has_more(&self) -> bool {
        self.controller().has_more()
    }

    /// Text of one field of one record
    fn field(&self, index: usize, name: &str) -> Option<&str> {
        self.controller().store().field(index, name)
    }
}

/// Reject blank identifiers before they reach the parameter set
pub(crate) fn non_empty<'a>(name: &str, value: &'a str) -> FetchResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        Err(FetchError::Configuration(format!("{} cannot be empty", name)))
    } else {
        Ok(value)
    }
}

/// Replace a `Prefix.Member.N` list filter
pub(crate) fn set_id_list<I, S>(controller: &mut PaginationController, prefix: &str, values: I) -> FetchResult<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let values: Vec<String> = values
        .into_iter()
        .map(|v| non_empty(prefix, v.as_ref()).map(str::to_string))
        .collect::<FetchResult<_>>()?;

    if values.is_empty() {
        return Err(FetchError::Configuration(format!("{} needs at least one value", prefix)));
    }

    controller.params_mut().set_list(prefix, values);
    Ok(())
}

pub(crate) fn set_max_count(controller: &mut PaginationController, max: u32) -> FetchResult<()> {
    if !(1..=100).contains(&max) {
        return Err(FetchError::Configuration(format!(
            "MaxCount must be between 1 and 100, got {}",
            max
        )));
    }
    controller.params_mut().set(params::MAX_COUNT, max);
    Ok(())
}

/// Set a from/to time window. Either bound may be left untouched; once both
/// are stored, a start later than the end is moved to one second before it.
pub(crate) fn set_time_window(
    controller: &mut PaginationController,
    (from_name, to_name): (&str, &str),
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) {
    let parameters = controller.params_mut();
    if let Some(from) = from {
        parameters.set(from_name, format_time(from));
    }
    if let Some(to) = to {
        parameters.set(to_name, format_time(to));
    }

    let stored = |name: &str| {
        parameters
            .get(name)
            .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
            .map(|time| time.with_timezone(&Utc))
    };
    if let (Some(from), Some(to)) = (stored(from_name), stored(to_name)) {
        if from > to {
            parameters.set(from_name, format_time(to - TimeDelta::seconds(1)));
        }
    }
}

pub(crate) fn format_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}
