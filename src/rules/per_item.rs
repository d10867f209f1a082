//! Per-Item Costing
//!
//! Charges a flat unit price for every remaining unit of one item.

use rust_decimal::Decimal;

use crate::{
    basket::{BasketError, CostingBasket},
    items::ItemKey,
    products::ProductCode,
    rules::{RuleError, checked_charge, validate},
};

/// Flat per-unit price for an item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PerItemCosting<I: ItemKey = ProductCode> {
    item: I,
    unit_price: Decimal,
}

impl<I: ItemKey> PerItemCosting<I> {
    /// Create a new per-item costing rule.
    ///
    /// # Errors
    ///
    /// - [`RuleError::BlankItem`]: the item identity is blank.
    /// - [`RuleError::NegativeUnitPrice`]: the unit price is below zero.
    pub fn new(item: I, unit_price: Decimal) -> Result<Self, RuleError> {
        validate(&item, unit_price)?;

        Ok(Self { item, unit_price })
    }

    /// Return the item
    pub fn item(&self) -> &I {
        &self.item
    }

    /// Return the unit price
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Charge every remaining unit of the item and zero its count.
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::CostOverflow`] if the charge doesn't fit in a `Decimal`.
    pub fn apply_to_basket(
        &self,
        basket: &CostingBasket<I>,
    ) -> Result<CostingBasket<I>, BasketError> {
        let Some(count) = basket.count(&self.item) else {
            return Ok(basket.clone());
        };

        let charge = checked_charge(&self.item, self.unit_price, count)?;

        basket.charge(&self.item, 0, charge)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn charges_all_units_and_zeroes_count() -> TestResult {
        let rule = PerItemCosting::new("classic", Decimal::new(26999, 2))?;
        let basket = CostingBasket::from_items(&["classic", "classic", "premium"]);

        let result = rule.apply_to_basket(&basket)?;

        assert_eq!(result.cost(), Decimal::new(53998, 2));
        assert_eq!(result.count(&"classic"), Some(0));
        assert_eq!(result.count(&"premium"), Some(1));

        Ok(())
    }

    #[test]
    fn absent_item_returns_same_basket() -> TestResult {
        let rule = PerItemCosting::new("standout", Decimal::ONE)?;
        let basket = CostingBasket::from_items(&["classic"]);

        let result = rule.apply_to_basket(&basket)?;

        assert_eq!(result, basket);
        assert!(result.shares_counts_with(&basket));

        Ok(())
    }

    #[test]
    fn zeroed_count_charges_nothing_more() -> TestResult {
        let rule = PerItemCosting::new("classic", Decimal::TEN)?;
        let basket = CostingBasket::from_items(&["classic"]);

        let once = rule.apply_to_basket(&basket)?;
        let twice = rule.apply_to_basket(&once)?;

        assert_eq!(once.cost(), Decimal::TEN);
        assert_eq!(twice.cost(), Decimal::TEN);

        Ok(())
    }

    #[test]
    fn oversized_charge_fails() -> TestResult {
        let rule = PerItemCosting::new("big", Decimal::MAX)?;
        let basket = CostingBasket::from_items(&["big", "big"]);

        let result = rule.apply_to_basket(&basket);

        assert_eq!(result, Err(BasketError::CostOverflow("big".to_string())));

        Ok(())
    }

    #[test]
    fn blank_item_is_rejected() {
        let result = PerItemCosting::new(String::new(), Decimal::ONE);

        assert_eq!(result, Err(RuleError::BlankItem));
    }

    #[test]
    fn negative_price_is_rejected() {
        let result = PerItemCosting::new(ProductCode::from("classic"), Decimal::new(-1, 0));

        assert!(matches!(result, Err(RuleError::NegativeUnitPrice(_, _))));
    }
}
