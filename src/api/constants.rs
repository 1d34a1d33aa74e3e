//! Protocol constants for the Marketplace Web Service query API

/// Default regional endpoint (North America)
pub const DEFAULT_ENDPOINT: &str = "https://mws.amazonservices.com";

/// User agent sent with every request
pub const USER_AGENT: &str = "mws-client/0.1";

/// Suffix appended to an action name to find its result element
pub const RESULT_SUFFIX: &str = "Result";

/// Suffix appended to an action or group name for continuation calls
pub const NEXT_TOKEN_SUFFIX: &str = "ByNextToken";

/// Request/response parameter names shared by every operation
pub mod params {
    pub const ACTION: &str = "Action";
    pub const VERSION: &str = "Version";
    pub const SELLER_ID: &str = "SellerId";
    pub const NEXT_TOKEN: &str = "NextToken";
    pub const HAS_NEXT: &str = "HasNext";
    pub const COUNT: &str = "Count";
    pub const MARKETPLACE_ID: &str = "MarketplaceId";
    pub const AMAZON_ORDER_ID: &str = "AmazonOrderId";
    pub const MAX_COUNT: &str = "MaxCount";
    pub const QUERY: &str = "Query";
    pub const QUERY_CONTEXT_ID: &str = "QueryContextId";
}

/// API sections, each with its own path and version
pub mod sections {
    /// Reports and feeds live at the endpoint root
    pub const REPORTS_PATH: &str = "";
    pub const REPORTS_VERSION: &str = "2009-01-01";

    pub const ORDERS_PATH: &str = "/Orders/2013-09-01";
    pub const ORDERS_VERSION: &str = "2013-09-01";

    pub const SELLERS_PATH: &str = "/Sellers/2011-07-01";
    pub const SELLERS_VERSION: &str = "2011-07-01";

    pub const SUBSCRIPTIONS_PATH: &str = "/Subscriptions/2013-07-01";
    pub const SUBSCRIPTIONS_VERSION: &str = "2013-07-01";

    pub const PRODUCTS_PATH: &str = "/Products/2011-10-01";
    pub const PRODUCTS_VERSION: &str = "2011-10-01";
}

/// Build the full endpoint URL for a section
pub fn section_endpoint(base_url: &str, section_path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), section_path)
}

/// Name of the element holding an action's payload (e.g. `GetReportListResult`)
pub fn result_element(action: &str) -> String {
    format!("{}{}", action, RESULT_SUFFIX)
}

/// Continuation variant of an action or throttle group
pub fn by_next_token(name: &str) -> String {
    format!("{}{}", name, NEXT_TOKEN_SUFFIX)
}
