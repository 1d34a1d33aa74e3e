use super::constants::params;
use super::dispatch::{Dispatcher, HttpDispatcher};
use super::error::FetchResult;
use super::pagination::{ListSpec, PaginationController};
use super::resilience::{ApiLogger, ResilienceConfig, ThrottleGovernor};
use super::resources::{DestinationList, FeedList, OrderItemList, ParticipationList, ProductSearch, ReportList};
use std::sync::Arc;
use std::time::Duration;

/// Seller session against one MWS endpoint.
///
/// Every list built from a client shares its dispatcher and throttle
/// governor, so request budgets are tracked per seller rather than per list.
#[derive(Clone)]
pub struct MwsClient {
    base_url: String,
    seller_id: Option<String>,
    dispatcher: Arc<dyn Dispatcher>,
    governor: ThrottleGovernor,
    logger: ApiLogger,
    max_pages: Option<usize>,
}

impl MwsClient {
    pub fn new(base_url: impl Into<String>, dispatcher: Arc<dyn Dispatcher>, resilience: &ResilienceConfig) -> Self {
        Self {
            base_url: base_url.into(),
            seller_id: None,
            dispatcher,
            governor: ThrottleGovernor::new(resilience.throttle.clone()),
            logger: ApiLogger::new(resilience.monitoring.clone()),
            max_pages: resilience.max_pages,
        }
    }

    /// Client talking to the live service over HTTP
    pub fn live(
        base_url: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
        resilience: &ResilienceConfig,
    ) -> FetchResult<Self> {
        let dispatcher = HttpDispatcher::new(timeout, user_agent)?;
        Ok(Self::new(base_url, Arc::new(dispatcher), resilience))
    }

    pub fn with_seller_id(mut self, seller_id: impl Into<String>) -> Self {
        self.seller_id = Some(seller_id.into());
        self
    }

    /// Share a governor with another client of the same seller
    pub fn with_governor(mut self, governor: ThrottleGovernor) -> Self {
        self.governor = governor;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn seller_id(&self) -> Option<&str> {
        self.seller_id.as_deref()
    }

    pub fn governor(&self) -> &ThrottleGovernor {
        &self.governor
    }

    /// Build a controller for any list operation
    pub fn controller(&self, spec: ListSpec) -> PaginationController {
        let mut controller =
            PaginationController::new(spec, &self.base_url, Arc::clone(&self.dispatcher), self.governor.clone())
                .with_logger(self.logger.clone())
                .with_max_pages(self.max_pages);

        if let Some(seller_id) = &self.seller_id {
            controller = controller.with_base_param(params::SELLER_ID, seller_id);
        }
        controller
    }

    pub fn reports(&self) -> ReportList {
        ReportList::new(self.controller(ReportList::spec()))
    }

    pub fn feeds(&self) -> FeedList {
        FeedList::new(self.controller(FeedList::spec()))
    }

    pub fn order_items(&self, order_id: &str) -> FetchResult<OrderItemList> {
        let mut list = OrderItemList::new(self.controller(OrderItemList::spec()));
        list.set_order_id(order_id)?;
        Ok(list)
    }

    pub fn participations(&self) -> ParticipationList {
        ParticipationList::new(self.controller(ParticipationList::spec()))
    }

    pub fn destinations(&self, marketplace_id: &str) -> FetchResult<DestinationList> {
        let mut list = DestinationList::new(self.controller(DestinationList::spec()));
        list.set_marketplace_id(marketplace_id)?;
        Ok(list)
    }

    /// Search scoped to one marketplace; the query is set on the returned list
    pub fn product_search(&self, marketplace_id: &str) -> FetchResult<ProductSearch> {
        let mut search = ProductSearch::new(self.controller(ProductSearch::spec()));
        search.set_marketplace_id(marketplace_id)?;
        Ok(search)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dispatch::MockDispatcher;
    use crate::api::resources::ListResource;

    #[tokio::test]
    async fn test_lists_share_governor_and_seller() {
        let mock = MockDispatcher::with_responses([
            "<GetReportListResponse><GetReportListResult/></GetReportListResponse>",
        ]);
        let client = MwsClient::new("https://mws.test/", Arc::new(mock.clone()), &ResilienceConfig::default())
            .with_seller_id("A1SELLER");

        let mut reports = client.reports();
        reports.fetch().await.unwrap();

        let sent = mock.sent();
        assert_eq!(sent[0].endpoint, "https://mws.test");
        assert_eq!(sent[0].params.get("SellerId"), Some("A1SELLER"));
        assert_eq!(sent[0].params.get("Version"), Some("2009-01-01"));
        assert_eq!(client.governor().remaining("GetReportList"), 9);
    }

    #[test]
    fn test_section_endpoint_per_list() {
        let client = MwsClient::new("https://mws.test", Arc::new(MockDispatcher::new()), &ResilienceConfig::default());
        let items = client.order_items("058-1233752-8214740").unwrap();

        assert_eq!(items.controller().endpoint(), "https://mws.test/Orders/2013-09-01");
        assert!(client.order_items("").is_err());
    }

    #[test]
    fn test_page_cap_of_zero_is_raised() {
        let resilience = ResilienceConfig::builder().max_pages(Some(0)).build();
        let client = MwsClient::new("https://mws.test", Arc::new(MockDispatcher::new()), &resilience);

        assert_eq!(client.reports().controller().max_pages(), Some(1));
        assert!(client.product_search("ATVPDKIKX0DER").is_ok());
        assert!(client.product_search("").is_err());
    }
}
