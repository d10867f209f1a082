//! Checkout
//!
//! Collects the items of one transaction and prices them against a fixed,
//! ordered list of pricing rules.

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;

use crate::{
    basket::{BasketError, CostingBasket, Leftover},
    calculator::{CostingObserver, NoopObserver, apply_costings_with_observer},
    items::ItemKey,
    products::ProductCode,
    receipt::{Receipt, ReceiptRecorder},
    rules::PricingRule,
};

/// Errors raised while totalling a checkout.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CostingError<I: ItemKey = ProductCode> {
    /// Items left with a nonzero count after every rule had run.
    #[error("Unable to cost the following items/quantities: {}", describe_leftovers(.0))]
    UnpricedItems(Vec<Leftover<I>>),

    /// The total grew past what a `Decimal` can hold.
    #[error(transparent)]
    Overflow(#[from] BasketError),
}

impl<I: ItemKey> CostingError<I> {
    /// Items that could not be priced, ordered by item. Empty for an overflow.
    pub fn leftovers(&self) -> &[Leftover<I>] {
        match self {
            CostingError::UnpricedItems(leftovers) => leftovers,
            CostingError::Overflow(_) => &[],
        }
    }
}

fn describe_leftovers<I: ItemKey>(leftovers: &[Leftover<I>]) -> String {
    leftovers
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Checkout for a single transaction.
#[derive(Debug, Clone)]
pub struct Checkout<I: ItemKey = ProductCode> {
    items: Vec<I>,
    rules: Arc<[PricingRule<I>]>,
}

impl<I: ItemKey> Checkout<I> {
    /// Create an empty checkout that will price items with `rules`, in order.
    pub fn new(rules: impl Into<Arc<[PricingRule<I>]>>) -> Self {
        Self {
            items: Vec::new(),
            rules: rules.into(),
        }
    }

    /// Add an item. Any identity is accepted, priced or not.
    pub fn add(&mut self, item: I) -> &mut Self {
        self.items.push(item);

        self
    }

    /// Items added so far, in the order they were added.
    pub fn items(&self) -> &[I] {
        &self.items
    }

    /// Rules this checkout prices with.
    pub fn rules(&self) -> &[PricingRule<I>] {
        &self.rules
    }

    /// Number of items added.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no items have been added.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Price every added item.
    ///
    /// Calling this repeatedly without adding items gives the same answer.
    ///
    /// # Errors
    ///
    /// Returns [`CostingError::UnpricedItems`] listing every item the rules did
    /// not fully account for, or [`CostingError::Overflow`] if the total doesn't
    /// fit in a `Decimal`. No partial total is returned.
    #[tracing::instrument(skip(self), fields(items = self.items.len(), rules = self.rules.len()))]
    pub fn total(&self) -> Result<Decimal, CostingError<I>> {
        self.run(&mut NoopObserver)
    }

    /// Price every added item, keeping a line per rule that charged something.
    ///
    /// # Errors
    ///
    /// Returns a [`CostingError`] under the same conditions as [`Checkout::total`].
    #[tracing::instrument(skip(self), fields(items = self.items.len(), rules = self.rules.len()))]
    pub fn receipt(&self) -> Result<Receipt<I>, CostingError<I>> {
        let mut recorder = ReceiptRecorder::new();
        let total = self.run(&mut recorder)?;

        Ok(recorder.into_receipt(total))
    }

    fn run<O: CostingObserver<I>>(&self, observer: &mut O) -> Result<Decimal, CostingError<I>> {
        let basket = CostingBasket::from_items(&self.items);
        let result = apply_costings_with_observer(basket, &self.rules, observer)
            .inspect_err(|error| warn!(%error, "checkout total overflowed"))?;

        let leftovers = result.leftovers();

        if !leftovers.is_empty() {
            warn!(
                unpriced = %describe_leftovers(&leftovers),
                "checkout has items no pricing rule accounted for"
            );

            return Err(CostingError::UnpricedItems(leftovers));
        }

        Ok(result.cost())
    }
}

impl<I: ItemKey> Extend<I> for Checkout<I> {
    fn extend<T: IntoIterator<Item = I>>(&mut self, iter: T) {
        self.items.extend(iter);
    }
}
