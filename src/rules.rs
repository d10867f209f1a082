//! Pricing Rules
//!
//! A pricing rule takes a basket and returns a new one in which some units of a
//! single item have been charged for. Rules are a closed set of variants so the
//! calculator can match on them exhaustively.

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    basket::{BasketError, CostingBasket},
    items::ItemKey,
    products::ProductCode,
};

pub mod per_item;
pub mod volume_discount;

pub use per_item::PerItemCosting;
pub use volume_discount::VolumeDiscount;

/// Errors raised while constructing a pricing rule.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// Item identity was empty or whitespace.
    #[error("pricing rule has a blank item identity")]
    BlankItem,

    /// Volume discount with a `get` of zero (item).
    #[error("volume discount for {0} must get at least one unit")]
    ZeroGet(String),

    /// Unit price below zero (item, price).
    #[error("unit price for {0} cannot be negative, got {1}")]
    NegativeUnitPrice(String, Decimal),
}

/// Pricing rule
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PricingRule<I: ItemKey = ProductCode> {
    /// Charge a flat unit price for every remaining unit of an item.
    PerItemCosting(PerItemCosting<I>),

    /// Charge for `for_price_of` units out of every `get`.
    VolumeDiscount(VolumeDiscount<I>),
}

impl<I: ItemKey> PricingRule<I> {
    /// Item this rule prices.
    pub fn item(&self) -> &I {
        match self {
            PricingRule::PerItemCosting(rule) => rule.item(),
            PricingRule::VolumeDiscount(rule) => rule.item(),
        }
    }

    /// Unit price the rule charges from.
    pub fn unit_price(&self) -> Decimal {
        match self {
            PricingRule::PerItemCosting(rule) => rule.unit_price(),
            PricingRule::VolumeDiscount(rule) => rule.unit_price(),
        }
    }

    /// Apply the rule, returning the resulting basket.
    ///
    /// A basket that does not hold the rule's item is returned as-is.
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::CostOverflow`] if the charge doesn't fit in a `Decimal`.
    pub fn apply_to_basket(
        &self,
        basket: &CostingBasket<I>,
    ) -> Result<CostingBasket<I>, BasketError> {
        match self {
            PricingRule::PerItemCosting(rule) => rule.apply_to_basket(basket),
            PricingRule::VolumeDiscount(rule) => rule.apply_to_basket(basket),
        }
    }
}

impl<I: ItemKey> fmt::Display for PricingRule<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingRule::PerItemCosting(rule) => {
                write!(f, "{} at {} each", rule.item(), rule.unit_price())
            }
            PricingRule::VolumeDiscount(rule) => write!(
                f,
                "{} {} for {} at {} each",
                rule.item(),
                rule.get(),
                rule.for_price_of(),
                rule.unit_price()
            ),
        }
    }
}

impl<I: ItemKey> From<PerItemCosting<I>> for PricingRule<I> {
    fn from(rule: PerItemCosting<I>) -> Self {
        PricingRule::PerItemCosting(rule)
    }
}

impl<I: ItemKey> From<VolumeDiscount<I>> for PricingRule<I> {
    fn from(rule: VolumeDiscount<I>) -> Self {
        PricingRule::VolumeDiscount(rule)
    }
}

/// Multiply money by a unit count, failing on overflow.
fn checked_charge<I: ItemKey>(
    item: &I,
    amount: Decimal,
    units: usize,
) -> Result<Decimal, BasketError> {
    amount
        .checked_mul(Decimal::from(units))
        .ok_or_else(|| BasketError::CostOverflow(item.to_string()))
}

/// Reject blank items and negative prices shared by every rule variant.
fn validate<I: ItemKey>(item: &I, unit_price: Decimal) -> Result<(), RuleError> {
    if item.is_blank() {
        return Err(RuleError::BlankItem);
    }

    if unit_price < Decimal::ZERO {
        return Err(RuleError::NegativeUnitPrice(item.to_string(), unit_price));
    }

    Ok(())
}
