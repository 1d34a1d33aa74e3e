//! Catalog search by free-text query (`ListMatchingProducts`)

use super::{ListResource, non_empty};
use crate::api::constants::{params, sections};
use crate::api::error::FetchResult;
use crate::api::normalize::{FieldExtractor, RecordLayout};
use crate::api::pagination::{ListSpec, PaginationController};
use indexmap::IndexMap;

/// Single page of at most ten matches; `Query` must be set before fetching
pub struct ProductSearch {
    controller: PaginationController,
}

impl ProductSearch {
    pub fn new(controller: PaginationController) -> Self {
        Self { controller }
    }

    pub fn spec() -> ListSpec {
        let layout = RecordLayout::new(
            "Product",
            vec![
                FieldExtractor::text("ASIN").at("Identifiers/MarketplaceASIN/ASIN").required(),
                FieldExtractor::text("MarketplaceId").at("Identifiers/MarketplaceASIN/MarketplaceId").required(),
                FieldExtractor::text("Title").at("AttributeSets/ItemAttributes/Title"),
                FieldExtractor::text("Brand").at("AttributeSets/ItemAttributes/Brand"),
                FieldExtractor::text("ProductGroup").at("AttributeSets/ItemAttributes/ProductGroup"),
                FieldExtractor::pairs("SalesRankings", "ProductCategoryId", "Rank"),
            ],
        )
        .in_container("Products");

        ListSpec::new("ListMatchingProducts", layout)
            .require(params::MARKETPLACE_ID)
            .require(params::QUERY)
            .section(sections::PRODUCTS_PATH, sections::PRODUCTS_VERSION)
    }

    pub fn set_query(&mut self, query: &str) -> FetchResult<()> {
        let query = non_empty(params::QUERY, query)?;
        self.controller.params_mut().set(params::QUERY, query);
        Ok(())
    }

    /// Narrow the search to one product category, e.g. `Books`
    pub fn set_context_id(&mut self, context: &str) -> FetchResult<()> {
        let context = non_empty(params::QUERY_CONTEXT_ID, context)?;
        self.controller.params_mut().set(params::QUERY_CONTEXT_ID, context);
        Ok(())
    }

    pub fn reset_context_id(&mut self) {
        self.controller.params_mut().remove(params::QUERY_CONTEXT_ID);
    }

    pub fn set_marketplace_id(&mut self, marketplace_id: &str) -> FetchResult<()> {
        let marketplace_id = non_empty(params::MARKETPLACE_ID, marketplace_id)?;
        self.controller.params_mut().set(params::MARKETPLACE_ID, marketplace_id);
        Ok(())
    }

    pub fn asin(&self, index: usize) -> Option<&str> {
        self.field(index, "ASIN")
    }

    pub fn marketplace_id(&self, index: usize) -> Option<&str> {
        self.field(index, "MarketplaceId")
    }

    pub fn title(&self, index: usize) -> Option<&str> {
        self.field(index, "Title")
    }

    pub fn brand(&self, index: usize) -> Option<&str> {
        self.field(index, "Brand")
    }

    pub fn product_group(&self, index: usize) -> Option<&str> {
        self.field(index, "ProductGroup")
    }

    /// Rank per product category
    pub fn sales_rankings(&self, index: usize) -> Option<&IndexMap<String, String>> {
        self.record(index).and_then(|r| r.map("SalesRankings"))
    }
}

impl ListResource for ProductSearch {
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

    fn search(mock: &MockDispatcher) -> ProductSearch {
        let mut search = ProductSearch::new(PaginationController::new(
            ProductSearch::spec(),
            "https://mws.test",
            Arc::new(mock.clone()),
            ThrottleGovernor::unlimited(),
        ));
        search.set_marketplace_id("ATVPDKIKX0DER").unwrap();
        search
    }

    #[tokio::test]
    async fn test_missing_query_is_not_sent() {
        let mock = MockDispatcher::with_responses([
            "<ListMatchingProductsResponse><ListMatchingProductsResult/></ListMatchingProductsResponse>",
        ]);
        let mut search = search(&mock);

        let err = search.fetch().await.unwrap_err();

        assert!(err.is_configuration());
        assert_eq!(mock.call_count(), 0);
        assert!(search.set_query("  ").is_err());
    }

    #[tokio::test]
    async fn test_search_reads_nested_identifiers() {
        let mock = MockDispatcher::with_responses([r#"<ListMatchingProductsResponse>
  <ListMatchingProductsResult>
    <Products xmlns:ns2="http://mws.amazonservices.com/schema/Products/2011-10-01/default.xsd">
      <Product>
        <Identifiers>
          <MarketplaceASIN>
            <MarketplaceId>ATVPDKIKX0DER</MarketplaceId>
            <ASIN>059035342X</ASIN>
          </MarketplaceASIN>
        </Identifiers>
        <AttributeSets>
          <ns2:ItemAttributes>
            <ns2:Title>Harry Potter and the Sorcerer's Stone</ns2:Title>
            <ns2:ProductGroup>Book</ns2:ProductGroup>
          </ns2:ItemAttributes>
        </AttributeSets>
        <SalesRankings>
          <SalesRank>
            <ProductCategoryId>book_display_on_website</ProductCategoryId>
            <Rank>401</Rank>
          </SalesRank>
        </SalesRankings>
      </Product>
    </Products>
  </ListMatchingProductsResult>
</ListMatchingProductsResponse>"#]);
        let mut search = search(&mock);
        search.set_query("harry potter").unwrap();
        search.set_context_id("Books").unwrap();

        search.fetch().await.unwrap();

        assert_eq!(search.asin(0), Some("059035342X"));
        assert_eq!(search.marketplace_id(0), Some("ATVPDKIKX0DER"));
        assert_eq!(search.title(0), Some("Harry Potter and the Sorcerer's Stone"));
        assert_eq!(search.product_group(0), Some("Book"));
        assert_eq!(search.brand(0), None);
        assert_eq!(
            search.sales_rankings(0).and_then(|r| r.get("book_display_on_website")).map(String::as_str),
            Some("401")
        );
        assert!(!search.has_more());

        let sent = &mock.sent()[0];
        assert_eq!(sent.endpoint, "https://mws.test/Products/2011-10-01");
        assert_eq!(sent.params.get("Query"), Some("harry potter"));
        assert_eq!(sent.params.get("QueryContextId"), Some("Books"));
        assert_eq!(sent.params.get("Version"), Some("2011-10-01"));
    }
}
