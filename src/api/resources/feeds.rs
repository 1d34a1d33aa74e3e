//! Feed submission list (`GetFeedSubmissionList`)

use super::{ListResource, set_id_list, set_max_count, set_time_window};
use crate::api::constants::sections;
use crate::api::error::FetchResult;
use crate::api::normalize::{FieldExtractor, RecordLayout};
use crate::api::pagination::{CountSpec, ListSpec, OperationRef, PaginationController};
use chrono::{DateTime, Utc};

const SUBMISSION_IDS: &str = "FeedSubmissionIdList.Id";
const FEED_TYPES: &str = "FeedTypeList.Type";
const STATUSES: &str = "FeedProcessingStatusList.Status";
const SUBMITTED_FROM: &str = "SubmittedFromDate";
const SUBMITTED_TO: &str = "SubmittedToDate";

pub struct FeedList {
    controller: PaginationController,
}

impl FeedList {
    pub fn new(controller: PaginationController) -> Self {
        Self { controller }
    }

    pub fn spec() -> ListSpec {
        let layout = RecordLayout::new(
            "FeedSubmissionInfo",
            vec![
                FieldExtractor::text("FeedSubmissionId").required(),
                FieldExtractor::text("FeedType").required(),
                FieldExtractor::text("SubmittedDate").required(),
                FieldExtractor::text("FeedProcessingStatus").required(),
                FieldExtractor::text("StartedProcessingDate"),
                FieldExtractor::text("CompletedProcessingDate"),
            ],
        );

        ListSpec::new("GetFeedSubmissionList", layout)
            .paginated()
            .with_count(OperationRef::new("GetFeedSubmissionCount"), &["MaxCount", "FeedSubmissionIdList."])
            .section(sections::REPORTS_PATH, sections::REPORTS_VERSION)
    }

    pub fn set_feed_ids<I, S>(&mut self, ids: I) -> FetchResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        set_id_list(&mut self.controller, SUBMISSION_IDS, ids)
    }

    pub fn reset_feed_ids(&mut self) {
        self.controller.params_mut().remove_prefix("FeedSubmissionIdList.");
    }

    pub fn set_feed_types<I, S>(&mut self, types: I) -> FetchResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        set_id_list(&mut self.controller, FEED_TYPES, types)
    }

    pub fn reset_feed_types(&mut self) {
        self.controller.params_mut().remove_prefix("FeedTypeList.");
    }

    /// Processing states to include, e.g. `_SUBMITTED_` or `_DONE_`
    pub fn set_feed_statuses<I, S>(&mut self, statuses: I) -> FetchResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        set_id_list(&mut self.controller, STATUSES, statuses)
    }

    pub fn reset_feed_statuses(&mut self) {
        self.controller.params_mut().remove_prefix("FeedProcessingStatusList.");
    }

    pub fn set_max_count(&mut self, max: u32) -> FetchResult<()> {
        set_max_count(&mut self.controller, max)
    }

    pub fn set_time_limits(&mut self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) {
        set_time_window(&mut self.controller, (SUBMITTED_FROM, SUBMITTED_TO), from, to);
    }

    pub fn reset_time_limits(&mut self) {
        let parameters = self.controller.params_mut();
        parameters.remove(SUBMITTED_FROM);
        parameters.remove(SUBMITTED_TO);
    }

    pub async fn fetch_count(&mut self) -> FetchResult<Option<u64>> {
        self.controller.fetch_count().await
    }

    pub fn count(&self) -> Option<u64> {
        self.controller.count()
    }

    /// Cancel the submissions matching the current filters. The cancelled
    /// submissions replace the list and the reported count is returned.
    /// Status filters and `MaxCount` are not sent.
    pub async fn cancel_feeds(&mut self) -> FetchResult<Option<u64>> {
        let cancel = CountSpec::new(
            OperationRef::new("CancelFeedSubmissions"),
            &["MaxCount", "FeedProcessingStatusList."],
        );
        self.controller.fetch_action(&cancel).await
    }

    pub fn feed_id(&self, index: usize) -> Option<&str> {
        self.field(index, "FeedSubmissionId")
    }

    pub fn feed_type(&self, index: usize) -> Option<&str> {
        self.field(index, "FeedType")
    }

    pub fn date_submitted(&self, index: usize) -> Option<&str> {
        self.field(index, "SubmittedDate")
    }

    pub fn feed_status(&self, index: usize) -> Option<&str> {
        self.field(index, "FeedProcessingStatus")
    }

    pub fn date_started(&self, index: usize) -> Option<&str> {
        self.field(index, "StartedProcessingDate")
    }

    pub fn date_completed(&self, index: usize) -> Option<&str> {
        self.field(index, "CompletedProcessingDate")
    }
}

impl ListResource for FeedList {
    fn controller(&self) -> &PaginationController {
        &self.controller
    }

    fn controller_mut(&mut self) -> &mut PaginationController {
        &mut self.controller
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dispatch::MockDispatcher;
    use crate::api::resilience::ThrottleGovernor;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_count_drops_id_filter() {
        let mock = MockDispatcher::with_responses([
            "<GetFeedSubmissionCountResponse><GetFeedSubmissionCountResult><Count>3</Count></GetFeedSubmissionCountResult></GetFeedSubmissionCountResponse>",
        ]);
        let mut feeds = FeedList::new(PaginationController::new(
            FeedList::spec(),
            "https://mws.test",
            Arc::new(mock.clone()),
            ThrottleGovernor::unlimited(),
        ));
        feeds.set_feed_ids(["2291326430", "2291326431"]).unwrap();
        feeds.set_feed_statuses(["_DONE_"]).unwrap();
        feeds.set_max_count(10).unwrap();

        assert_eq!(feeds.fetch_count().await.unwrap(), Some(3));

        let sent = &mock.sent()[0].params;
        assert_eq!(sent.get("Action"), Some("GetFeedSubmissionCount"));
        assert_eq!(sent.get("FeedProcessingStatusList.Status.1"), Some("_DONE_"));
        assert!(!sent.contains("FeedSubmissionIdList.Id.1"));
        assert!(!sent.contains("MaxCount"));
        // the list filters are still configured
        assert_eq!(feeds.controller().params().get("FeedSubmissionIdList.Id.2"), Some("2291326431"));
    }

    #[tokio::test]
    async fn test_cancel_replaces_list_with_cancelled() {
        let mock = MockDispatcher::with_responses([
            "<GetFeedSubmissionListResponse><GetFeedSubmissionListResult>\
             <NextToken>abc</NextToken><HasNext>true</HasNext>\
             <FeedSubmissionInfo><FeedSubmissionId>1</FeedSubmissionId><FeedType>_POST_PRODUCT_DATA_</FeedType>\
             <SubmittedDate>2009-02-20T02:10:35+00:00</SubmittedDate><FeedProcessingStatus>_SUBMITTED_</FeedProcessingStatus></FeedSubmissionInfo>\
             </GetFeedSubmissionListResult></GetFeedSubmissionListResponse>",
            "<CancelFeedSubmissionsResponse><CancelFeedSubmissionsResult><Count>1</Count>\
             <FeedSubmissionInfo><FeedSubmissionId>1</FeedSubmissionId><FeedType>_POST_PRODUCT_DATA_</FeedType>\
             <SubmittedDate>2009-02-20T02:10:35+00:00</SubmittedDate><FeedProcessingStatus>_CANCELLED_</FeedProcessingStatus></FeedSubmissionInfo>\
             </CancelFeedSubmissionsResult></CancelFeedSubmissionsResponse>",
        ]);
        let mut feeds = FeedList::new(PaginationController::new(
            FeedList::spec(),
            "https://mws.test",
            Arc::new(mock.clone()),
            ThrottleGovernor::unlimited(),
        ));
        feeds.set_feed_ids(["1"]).unwrap();
        feeds.set_feed_statuses(["_SUBMITTED_"]).unwrap();
        feeds.set_max_count(5).unwrap();
        feeds.fetch().await.unwrap();
        assert!(feeds.has_more());

        assert_eq!(feeds.cancel_feeds().await.unwrap(), Some(1));

        assert_eq!(feeds.records().map(<[_]>::len), Some(1));
        assert_eq!(feeds.feed_status(0), Some("_CANCELLED_"));
        assert_eq!(feeds.count(), Some(1));
        assert!(!feeds.has_more());

        let sent = &mock.sent()[1].params;
        assert_eq!(sent.get("Action"), Some("CancelFeedSubmissions"));
        assert_eq!(sent.get("FeedSubmissionIdList.Id.1"), Some("1"));
        assert!(!sent.contains("FeedProcessingStatusList.Status.1"));
        assert!(!sent.contains("MaxCount"));
        assert!(!sent.contains("NextToken"));
    }
}
