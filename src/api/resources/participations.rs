//! Marketplace participations of the seller (`ListMarketplaceParticipations`)

use super::ListResource;
use crate::api::constants::sections;
use crate::api::normalize::{FieldExtractor, Record, RecordLayout};
use crate::api::pagination::{ListSpec, PaginationController, ResultStore};

const MARKETPLACES: &str = "marketplaces";

pub struct ParticipationList {
    controller: PaginationController,
}

impl ParticipationList {
    pub fn new(controller: PaginationController) -> Self {
        Self { controller }
    }

    pub fn spec() -> ListSpec {
        let layout = RecordLayout::new(
            "Participation",
            vec![
                FieldExtractor::text("MarketplaceId").required(),
                FieldExtractor::text("SellerId").required(),
                FieldExtractor::text("Suspended").at("HasSellerSuspendedListings").required(),
            ],
        )
        .in_container("ListParticipations");

        let marketplaces = RecordLayout::new(
            "Marketplace",
            vec![
                FieldExtractor::text("MarketplaceId").required(),
                FieldExtractor::text("Name").required(),
                FieldExtractor::text("Country").at("DefaultCountryCode").required(),
                FieldExtractor::text("Currency").at("DefaultCurrencyCode").required(),
                FieldExtractor::text("Language").at("DefaultLanguageCode").required(),
                FieldExtractor::text("Domain").at("DomainName").required(),
            ],
        )
        .in_container("ListMarketplaces");

        ListSpec::new("ListMarketplaceParticipations", layout)
            .with_companion(MARKETPLACES, marketplaces)
            .paginated()
            .section(sections::SELLERS_PATH, sections::SELLERS_VERSION)
    }

    pub fn marketplace_id(&self, index: usize) -> Option<&str> {
        self.field(index, "MarketplaceId")
    }

    pub fn seller_id(&self, index: usize) -> Option<&str> {
        self.field(index, "SellerId")
    }

    /// `Yes` or `No` as reported by the service
    pub fn suspension_status(&self, index: usize) -> Option<&str> {
        self.field(index, "Suspended")
    }

    /// Marketplaces described alongside the participations, `None` before any fetch
    pub fn marketplaces(&self) -> Option<&[Record]> {
        self.controller.companion(MARKETPLACES).and_then(ResultStore::all)
    }

    pub fn marketplace(&self, index: usize) -> Option<&Record> {
        self.controller.companion(MARKETPLACES).and_then(|store| store.get(index))
    }

    pub fn marketplace_name(&self, index: usize) -> Option<&str> {
        self.marketplace(index).and_then(|r| r.text("Name"))
    }

    pub fn marketplace_country(&self, index: usize) -> Option<&str> {
        self.marketplace(index).and_then(|r| r.text("Country"))
    }

    pub fn marketplace_currency(&self, index: usize) -> Option<&str> {
        self.marketplace(index).and_then(|r| r.text("Currency"))
    }

    pub fn marketplace_language(&self, index: usize) -> Option<&str> {
        self.marketplace(index).and_then(|r| r.text("Language"))
    }

    pub fn marketplace_domain(&self, index: usize) -> Option<&str> {
        self.marketplace(index).and_then(|r| r.text("Domain"))
    }
}

impl ListResource for ParticipationList {
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
    async fn test_marketplaces_read_next_to_participations() {
        let mock = MockDispatcher::with_responses([r#"<ListMarketplaceParticipationsResponse>
  <ListMarketplaceParticipationsResult>
    <ListParticipations>
      <Participation>
        <MarketplaceId>A1F83G8C2ARO7P</MarketplaceId>
        <SellerId>A135KKEKJAIBJ56</SellerId>
        <HasSellerSuspendedListings>No</HasSellerSuspendedListings>
      </Participation>
    </ListParticipations>
    <ListMarketplaces>
      <Marketplace>
        <MarketplaceId>A1F83G8C2ARO7P</MarketplaceId>
        <Name>Amazon.co.uk</Name>
        <DefaultCountryCode>GB</DefaultCountryCode>
        <DefaultCurrencyCode>GBP</DefaultCurrencyCode>
        <DefaultLanguageCode>en_GB</DefaultLanguageCode>
        <DomainName>www.amazon.co.uk</DomainName>
      </Marketplace>
    </ListMarketplaces>
  </ListMarketplaceParticipationsResult>
</ListMarketplaceParticipationsResponse>"#]);
        let mut participations = ParticipationList::new(PaginationController::new(
            ParticipationList::spec(),
            "https://mws.test",
            Arc::new(mock.clone()),
            ThrottleGovernor::unlimited(),
        ));
        assert!(participations.marketplaces().is_none());

        participations.fetch().await.unwrap();

        assert_eq!(participations.seller_id(0), Some("A135KKEKJAIBJ56"));
        assert_eq!(participations.marketplaces().map(<[_]>::len), Some(1));
        assert_eq!(participations.marketplace_name(0), Some("Amazon.co.uk"));
        assert_eq!(participations.marketplace_country(0), Some("GB"));
        assert_eq!(participations.marketplace_currency(0), Some("GBP"));
        assert_eq!(participations.marketplace_language(0), Some("en_GB"));
        assert_eq!(participations.marketplace_domain(0), Some("www.amazon.co.uk"));
        assert!(participations.marketplace(1).is_none());
    }
}
