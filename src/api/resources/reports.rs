//! Report list (`GetReportList`)

use super::{ListResource, set_id_list, set_max_count, set_time_window};
use crate::api::constants::sections;
use crate::api::error::FetchResult;
use crate::api::normalize::{FieldExtractor, RecordLayout};
use crate::api::pagination::{ListSpec, OperationRef, PaginationController};
use chrono::{DateTime, Utc};

const REQUEST_IDS: &str = "ReportRequestIdList.Id";
const REPORT_TYPES: &str = "ReportTypeList.Type";
const ACKNOWLEDGED: &str = "Acknowledged";
const AVAILABLE_FROM: &str = "AvailableFromDate";
const AVAILABLE_TO: &str = "AvailableToDate";

/// Reports available for download
pub struct ReportList {
    controller: PaginationController,
}

impl ReportList {
    pub fn new(controller: PaginationController) -> Self {
        Self { controller }
    }

    pub fn spec() -> ListSpec {
        let layout = RecordLayout::new(
            "ReportInfo",
            vec![
                FieldExtractor::text("ReportId").required(),
                FieldExtractor::text("ReportType").required(),
                FieldExtractor::text("ReportRequestId").required(),
                FieldExtractor::text("AvailableDate").required(),
                FieldExtractor::text("Acknowledged").required(),
                FieldExtractor::text("AcknowledgedDate"),
            ],
        );

        ListSpec::new("GetReportList", layout)
            .paginated()
            .with_count(OperationRef::new("GetReportCount"), &["MaxCount", "ReportRequestIdList."])
            .section(sections::REPORTS_PATH, sections::REPORTS_VERSION)
    }

    /// Only list reports produced by these report requests
    pub fn set_request_ids<I, S>(&mut self, ids: I) -> FetchResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        set_id_list(&mut self.controller, REQUEST_IDS, ids)
    }

    pub fn reset_request_ids(&mut self) {
        self.controller.params_mut().remove_prefix("ReportRequestIdList.");
    }

    pub fn set_report_types<I, S>(&mut self, types: I) -> FetchResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        set_id_list(&mut self.controller, REPORT_TYPES, types)
    }

    pub fn reset_report_types(&mut self) {
        self.controller.params_mut().remove_prefix("ReportTypeList.");
    }

    /// Page size, 1 to 100
    pub fn set_max_count(&mut self, max: u32) -> FetchResult<()> {
        set_max_count(&mut self.controller, max)
    }

    /// `Some(flag)` filters on the acknowledged state, `None` removes the filter
    pub fn set_acknowledged_filter(&mut self, acknowledged: Option<bool>) {
        match acknowledged {
            Some(flag) => {
                self.controller.params_mut().set(ACKNOWLEDGED, flag);
            }
            None => {
                self.controller.params_mut().remove(ACKNOWLEDGED);
            }
        }
    }

    pub fn set_time_limits(&mut self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) {
        set_time_window(&mut self.controller, (AVAILABLE_FROM, AVAILABLE_TO), from, to);
    }

    pub fn reset_time_limits(&mut self) {
        let parameters = self.controller.params_mut();
        parameters.remove(AVAILABLE_FROM);
        parameters.remove(AVAILABLE_TO);
    }

    /// Number of reports matching the current filters
    pub async fn fetch_count(&mut self) -> FetchResult<Option<u64>> {
        self.controller.fetch_count().await
    }

    pub fn count(&self) -> Option<u64> {
        self.controller.count()
    }

    pub fn report_id(&self, index: usize) -> Option<&str> {
        self.field(index, "ReportId")
    }

    pub fn report_type(&self, index: usize) -> Option<&str> {
        self.field(index, "ReportType")
    }

    pub fn report_request_id(&self, index: usize) -> Option<&str> {
        self.field(index, "ReportRequestId")
    }

    pub fn available_date(&self, index: usize) -> Option<&str> {
        self.field(index, "AvailableDate")
    }

    pub fn is_acknowledged(&self, index: usize) -> Option<bool> {
        self.field(index, "Acknowledged").map(|v| v.eq_ignore_ascii_case("true"))
    }

    /// Present only for acknowledged reports
    pub fn acknowledged_date(&self, index: usize) -> Option<&str> {
        self.field(index, "AcknowledgedDate")
    }
}

impl ListResource for ReportList {
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

    const PAGE: &str = r#"<GetReportListResponse>
  <GetReportListResult>
    <HasNext>false</HasNext>
    <ReportInfo>
      <ReportId>2291326454</ReportId>
      <ReportType>_GET_MERCHANT_LISTINGS_DATA_</ReportType>
      <ReportRequestId>2291326454</ReportRequestId>
      <AvailableDate>2009-01-21T02:10:39+00:00</AvailableDate>
      <Acknowledged>true</Acknowledged>
      <AcknowledgedDate>2009-02-20T02:10:35+00:00</AcknowledgedDate>
    </ReportInfo>
  </GetReportListResult>
</GetReportListResponse>"#;

    fn list(mock: &MockDispatcher) -> ReportList {
        ReportList::new(PaginationController::new(
            ReportList::spec(),
            "https://mws.test",
            Arc::new(mock.clone()),
            ThrottleGovernor::unlimited(),
        ))
    }

    #[tokio::test]
    async fn test_getters() {
        let mock = MockDispatcher::with_responses([PAGE]);
        let mut reports = list(&mock);

        assert_eq!(reports.report_id(0), None);
        reports.fetch().await.unwrap();

        assert_eq!(reports.report_id(0), Some("2291326454"));
        assert_eq!(reports.report_type(0), Some("_GET_MERCHANT_LISTINGS_DATA_"));
        assert_eq!(reports.is_acknowledged(0), Some(true));
        assert_eq!(reports.acknowledged_date(0), Some("2009-02-20T02:10:35+00:00"));
        assert_eq!(reports.report_id(1), None);
        assert!(!reports.has_more());
    }

    #[test]
    fn test_filters() {
        let mut reports = list(&MockDispatcher::new());
        reports.set_report_types(["_GET_ORDERS_DATA_"]).unwrap();
        reports.set_acknowledged_filter(Some(false));
        assert!(reports.set_max_count(500).is_err());

        let parameters = reports.controller().params();
        assert_eq!(parameters.get("ReportTypeList.Type.1"), Some("_GET_ORDERS_DATA_"));
        assert_eq!(parameters.get("Acknowledged"), Some("false"));
        assert!(!parameters.contains("MaxCount"));

        reports.set_acknowledged_filter(None);
        reports.reset_report_types();
        assert!(reports.controller().params().is_empty());
    }
}
