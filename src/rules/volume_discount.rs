//! Volume Discount
//!
//! "Get N for the price of M": for every `get` units of an item, charge for
//! `for_price_of` of them. Units that don't make up a whole group are left in
//! the basket for a later rule to price.

use std::num::NonZeroUsize;

use rust_decimal::Decimal;

use crate::{
    basket::{BasketError, CostingBasket},
    items::ItemKey,
    products::ProductCode,
    rules::{RuleError, checked_charge, validate},
};

/// N-for-M volume discount on an item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VolumeDiscount<I: ItemKey = ProductCode> {
    item: I,
    unit_price: Decimal,
    get: NonZeroUsize,
    for_price_of: usize,
}

impl<I: ItemKey> VolumeDiscount<I> {
    /// Create a new volume discount.
    ///
    /// # Errors
    ///
    /// - [`RuleError::BlankItem`]: the item identity is blank.
    /// - [`RuleError::NegativeUnitPrice`]: the unit price is below zero.
    /// - [`RuleError::ZeroGet`]: `get` is zero.
    pub fn new(
        item: I,
        unit_price: Decimal,
        get: usize,
        for_price_of: usize,
    ) -> Result<Self, RuleError> {
        validate(&item, unit_price)?;

        let get = NonZeroUsize::new(get).ok_or_else(|| RuleError::ZeroGet(item.to_string()))?;

        Ok(Self {
            item,
            unit_price,
            get,
            for_price_of,
        })
    }

    /// Return the item
    pub fn item(&self) -> &I {
        &self.item
    }

    /// Return the unit price
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Size of each discounted group
    pub fn get(&self) -> usize {
        self.get.get()
    }

    /// Units charged for in each group
    pub fn for_price_of(&self) -> usize {
        self.for_price_of
    }

    /// Charge each whole group at the discounted price, leaving the remainder unpriced.
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

        let groups = count / self.get;
        let remainder = count % self.get;

        let paid_units = groups
            .checked_mul(self.for_price_of)
            .ok_or_else(|| BasketError::CostOverflow(self.item.to_string()))?;
        let charge = checked_charge(&self.item, self.unit_price, paid_units)?;

        basket.charge(&self.item, remainder, charge)
    }
}
