//! Costing Basket
//!
//! The working state threaded through a costing pass: how many units of each
//! item are still waiting to be priced, and how much has been charged so far.

use std::{fmt, sync::Arc};

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    items::{ItemCounts, ItemKey, count_items},
    products::ProductCode,
};

/// Errors raised while charging a basket.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BasketError {
    /// A charge, or the cost after adding it, is too large for a `Decimal` (item).
    #[error("cost overflowed while charging for {0}")]
    CostOverflow(String),
}

/// Item that was still unpriced once every rule had run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Leftover<I: ItemKey = ProductCode> {
    /// Item identity
    pub item: I,

    /// Units of the item that no rule accounted for
    pub count: usize,
}

impl<I: ItemKey> fmt::Display for Leftover<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.item, self.count)
    }
}

/// Basket of remaining item counts and accumulated cost.
///
/// Baskets are never changed in place. Every rule application produces a new
/// basket, and the count map is shared between baskets until one of them needs
/// a different count.
#[derive(Debug, Clone, PartialEq)]
pub struct CostingBasket<I: ItemKey = ProductCode> {
    item_counts: Arc<ItemCounts<I>>,
    cost: Decimal,
}

impl<I: ItemKey> CostingBasket<I> {
    /// Create a basket from item counts and an accumulated cost.
    pub fn new(item_counts: ItemCounts<I>, cost: Decimal) -> Self {
        Self {
            item_counts: Arc::new(item_counts),
            cost,
        }
    }

    /// Create a zero-cost basket holding the given items.
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a I>) -> Self
    where
        I: 'a,
    {
        Self::new(count_items(items), Decimal::ZERO)
    }

    /// Remaining quantity of each item.
    pub fn item_counts(&self) -> &ItemCounts<I> {
        &self.item_counts
    }

    /// Cost accumulated so far.
    pub fn cost(&self) -> Decimal {
        self.cost
    }

    /// Remaining quantity of `item`, or `None` if the basket never held it.
    pub fn count(&self, item: &I) -> Option<usize> {
        self.item_counts.get(item).copied()
    }

    /// Whether the basket holds a count for `item`, even a zero one.
    pub fn contains(&self, item: &I) -> bool {
        self.item_counts.contains_key(item)
    }

    /// Total units across all items still waiting to be priced.
    pub fn remaining_units(&self) -> usize {
        self.item_counts.values().sum()
    }

    /// Whether every item has been fully priced.
    pub fn is_settled(&self) -> bool {
        self.item_counts.values().all(|count| *count == 0)
    }

    /// Items with a nonzero remaining count, ordered by item.
    pub fn leftovers(&self) -> Vec<Leftover<I>> {
        let mut leftovers: Vec<Leftover<I>> = self
            .item_counts
            .iter()
            .filter(|(_, count)| **count != 0)
            .map(|(item, count)| Leftover {
                item: item.clone(),
                count: *count,
            })
            .collect();

        leftovers.sort_unstable_by(|a, b| a.item.cmp(&b.item));

        leftovers
    }

    /// Whether both baskets share the same underlying count map.
    pub fn shares_counts_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.item_counts, &other.item_counts)
    }

    /// Return a new basket with `item` set to `remaining` units and `charge` added to the cost.
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::CostOverflow`] if the new cost doesn't fit in a `Decimal`.
    pub(crate) fn charge(
        &self,
        item: &I,
        remaining: usize,
        charge: Decimal,
    ) -> Result<Self, BasketError> {
        debug_assert!(
            charge >= Decimal::ZERO,
            "basket cost must never decrease, got charge {charge}"
        );

        let cost = self
            .cost
            .checked_add(charge)
            .ok_or_else(|| BasketError::CostOverflow(item.to_string()))?;

        let mut item_counts = (*self.item_counts).clone();
        item_counts.insert(item.clone(), remaining);

        Ok(Self {
            item_counts: Arc::new(item_counts),
            cost,
        })
    }
}

impl<I: ItemKey> Default for CostingBasket<I> {
    fn default() -> Self {
        Self::new(ItemCounts::default(), Decimal::ZERO)
    }
}
