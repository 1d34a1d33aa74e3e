//! Items of one order (`ListOrderItems`)

use super::{ListResource, non_empty};
use crate::api::constants::{params, sections};
use crate::api::error::FetchResult;
use crate::api::normalize::{FieldExtractor, RecordLayout};
use crate::api::pagination::{ListSpec, PaginationController};
use indexmap::IndexMap;

const MONEY_FIELDS: [&str; 11] = [
    "ItemPrice",
    "ShippingPrice",
    "GiftWrapPrice",
    "ItemTax",
    "ShippingTax",
    "GiftWrapTax",
    "ShippingDiscount",
    "PromotionDiscount",
    "CODFee",
    "CODFeeDiscount",
    "TaxCollection",
];

pub struct OrderItemList {
    controller: PaginationController,
}

impl OrderItemList {
    pub fn new(controller: PaginationController) -> Self {
        Self { controller }
    }

    pub fn spec() -> ListSpec {
        let mut fields = vec![
            FieldExtractor::text("ASIN").required(),
            FieldExtractor::text("SellerSKU").required(),
            FieldExtractor::text("OrderItemId").required(),
            FieldExtractor::text("Title").required(),
            FieldExtractor::text("QuantityOrdered").required(),
            FieldExtractor::text("QuantityShipped"),
            FieldExtractor::text("BuyerCustomizedInfo").at("BuyerCustomizedInfo/CustomizedURL"),
            FieldExtractor::group(
                "PointsGranted",
                &["PointsNumber", "PointsMonetaryValue/Amount", "PointsMonetaryValue/CurrencyCode"],
            ),
            FieldExtractor::text("PriceDesignation"),
            FieldExtractor::text("GiftMessageText"),
            FieldExtractor::text("GiftWrapLevel"),
            FieldExtractor::text("ConditionNote"),
            FieldExtractor::text("ConditionId"),
            FieldExtractor::text("ConditionSubtypeId"),
        ];
        fields.extend(MONEY_FIELDS.iter().map(|name| FieldExtractor::money(*name)));
        fields.push(FieldExtractor::list("PromotionIds"));

        ListSpec::new("ListOrderItems", RecordLayout::new("OrderItem", fields).in_container("OrderItems"))
            .paginated()
            .require(params::AMAZON_ORDER_ID)
            .section(sections::ORDERS_PATH, sections::ORDERS_VERSION)
    }

    pub fn set_order_id(&mut self, order_id: &str) -> FetchResult<()> {
        let order_id = non_empty(params::AMAZON_ORDER_ID, order_id)?;
        self.controller.params_mut().set(params::AMAZON_ORDER_ID, order_id);
        Ok(())
    }

    pub fn order_id(&self) -> Option<&str> {
        self.controller.params().get(params::AMAZON_ORDER_ID)
    }

    pub fn asin(&self, index: usize) -> Option<&str> {
        self.field(index, "ASIN")
    }

    pub fn seller_sku(&self, index: usize) -> Option<&str> {
        self.field(index, "SellerSKU")
    }

    pub fn order_item_id(&self, index: usize) -> Option<&str> {
        self.field(index, "OrderItemId")
    }

    pub fn title(&self, index: usize) -> Option<&str> {
        self.field(index, "Title")
    }

    pub fn quantity_ordered(&self, index: usize) -> Option<u32> {
        self.field(index, "QuantityOrdered").and_then(|q| q.parse().ok())
    }

    pub fn quantity_shipped(&self, index: usize) -> Option<u32> {
        self.field(index, "QuantityShipped").and_then(|q| q.parse().ok())
    }

    /// Shipped share of the ordered quantity, 0.0 to 1.0
    pub fn percent_shipped(&self, index: usize) -> Option<f64> {
        let ordered = self.quantity_ordered(index)?;
        let shipped = self.quantity_shipped(index)?;
        (ordered > 0).then(|| f64::from(shipped) / f64::from(ordered))
    }

    /// Money field as `Amount`/`CurrencyCode`, e.g. `"ItemPrice"`
    pub fn money(&self, index: usize, name: &str) -> Option<&IndexMap<String, String>> {
        self.record(index).and_then(|r| r.map(name))
    }

    pub fn item_price(&self, index: usize) -> Option<&str> {
        self.record(index).and_then(|r| r.map_value("ItemPrice", "Amount"))
    }

    pub fn promotion_ids(&self, index: usize) -> Option<&[String]> {
        self.record(index).and_then(|r| r.list("PromotionIds"))
    }
}

impl ListResource for OrderItemList {
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

    fn list(mock: &MockDispatcher) -> OrderItemList {
        OrderItemList::new(PaginationController::new(
            OrderItemList::spec(),
            "https://mws.test",
            Arc::new(mock.clone()),
            ThrottleGovernor::unlimited(),
        ))
    }

    #[test]
    fn test_order_id_validation() {
        let mut items = list(&MockDispatcher::new());

        assert!(items.set_order_id("  ").unwrap_err().is_configuration());
        items.set_order_id("777").unwrap();
        assert_eq!(items.order_id(), Some("777"));
    }

    #[tokio::test]
    async fn test_fetch_without_order_id() {
        let mock = MockDispatcher::with_responses(["<ListOrderItemsResponse/>"]);
        let mut items = list(&mock);

        assert!(items.fetch().await.unwrap_err().is_configuration());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_percent_shipped() {
        let mock = MockDispatcher::with_responses([r#"<ListOrderItemsResponse><ListOrderItemsResult>
            <OrderItems>
              <OrderItem><ASIN>A</ASIN><QuantityOrdered>4</QuantityOrdered><QuantityShipped>1</QuantityShipped></OrderItem>
              <OrderItem><ASIN>B</ASIN><QuantityOrdered>2</QuantityOrdered></OrderItem>
            </OrderItems>
        </ListOrderItemsResult></ListOrderItemsResponse>"#]);
        let mut items = list(&mock);
        items.set_order_id("058-1233752-8214740").unwrap();
        items.fetch().await.unwrap();

        assert_eq!(items.percent_shipped(0), Some(0.25));
        assert_eq!(items.percent_shipped(1), None);
        assert_eq!(items.seller_sku(1), Some(""));
        assert_eq!(mock.sent()[0].endpoint, "https://mws.test/Orders/2013-09-01");
    }
}
