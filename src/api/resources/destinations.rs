//! Registered notification destinations (`ListRegisteredDestinations`)

use super::{ListResource, non_empty};
use crate::api::constants::{params, sections};
use crate::api::error::FetchResult;
use crate::api::normalize::{FieldExtractor, RecordLayout};
use crate::api::pagination::{ListSpec, PaginationController};
use indexmap::IndexMap;

/// Single-page list; the operation has no continuation
pub struct DestinationList {
    controller: PaginationController,
}

impl DestinationList {
    pub fn new(controller: PaginationController) -> Self {
        Self { controller }
    }

    pub fn spec() -> ListSpec {
        let layout = RecordLayout::new(
            "member",
            vec![
                FieldExtractor::text("DeliveryChannel").required(),
                FieldExtractor::pairs("AttributeList", "Key", "Value").required(),
            ],
        )
        .in_container("DestinationList");

        ListSpec::new("ListRegisteredDestinations", layout)
            .require(params::MARKETPLACE_ID)
            .section(sections::SUBSCRIPTIONS_PATH, sections::SUBSCRIPTIONS_VERSION)
    }

    pub fn set_marketplace_id(&mut self, marketplace_id: &str) -> FetchResult<()> {
        let marketplace_id = non_empty(params::MARKETPLACE_ID, marketplace_id)?;
        self.controller.params_mut().set(params::MARKETPLACE_ID, marketplace_id);
        Ok(())
    }

    pub fn delivery_channel(&self, index: usize) -> Option<&str> {
        self.field(index, "DeliveryChannel")
    }

    pub fn attributes(&self, index: usize) -> Option<&IndexMap<String, String>> {
        self.record(index).and_then(|r| r.map("AttributeList"))
    }

    pub fn attribute(&self, index: usize, key: &str) -> Option<&str> {
        self.record(index).and_then(|r| r.map_value("AttributeList", key))
    }
}

impl ListResource for DestinationList {
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
    async fn test_attributes_and_no_continuation() {
        let mock = MockDispatcher::with_responses([r#"<ListRegisteredDestinationsResponse>
  <ListRegisteredDestinationsResult>
    <DestinationList>
      <member>
        <DeliveryChannel>SQS</DeliveryChannel>
        <AttributeList>
          <member><Key>sqsQueueUrl</Key><Value>https://sqs.us-east-1.amazonaws.com/51471EXAMPLE/mws_notifications</Value></member>
        </AttributeList>
      </member>
    </DestinationList>
    <NextToken>ignored</NextToken>
  </ListRegisteredDestinationsResult>
</ListRegisteredDestinationsResponse>"#]);
        let mut destinations = DestinationList::new(PaginationController::new(
            DestinationList::spec(),
            "https://mws.test",
            Arc::new(mock.clone()),
            ThrottleGovernor::unlimited(),
        ));
        destinations.set_marketplace_id("ATVPDKIKX0DER").unwrap();
        destinations.set_use_token(true);

        destinations.fetch().await.unwrap();

        assert_eq!(destinations.delivery_channel(0), Some("SQS"));
        assert_eq!(
            destinations.attribute(0, "sqsQueueUrl"),
            Some("https://sqs.us-east-1.amazonaws.com/51471EXAMPLE/mws_notifications")
        );
        assert_eq!(mock.call_count(), 1);
        assert!(!destinations.has_more());
        assert_eq!(destinations.fetch_next().await.unwrap(), None);
    }
}
