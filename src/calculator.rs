//! Cost Calculator
//!
//! Folds an ordered list of pricing rules over a basket, left to right. Each
//! rule sees the basket produced by the rule before it, so the order of the
//! list matters whenever two rules price the same item. The fold stops at the
//! first rule whose charge overflows.

use tracing::debug;

use crate::{
    basket::{BasketError, CostingBasket},
    items::ItemKey,
    rules::PricingRule,
};

/// Observer hook for watching a costing pass step by step.
///
/// The calculator stays the only implementation of the fold; observers just
/// record what happened, e.g. to build a receipt.
pub trait CostingObserver<I: ItemKey> {
    /// Called after `rule` turned `before` into `after`.
    fn on_rule_applied(
        &mut self,
        rule: &PricingRule<I>,
        before: &CostingBasket<I>,
        after: &CostingBasket<I>,
    );
}

/// Observer that ignores every step.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl<I: ItemKey> CostingObserver<I> for NoopObserver {
    fn on_rule_applied(
        &mut self,
        _rule: &PricingRule<I>,
        _before: &CostingBasket<I>,
        _after: &CostingBasket<I>,
    ) {
    }
}

/// Apply each rule in order to the basket produced by the previous one.
///
/// An empty rule list returns the input basket.
///
/// # Errors
///
/// Returns [`BasketError::CostOverflow`] if any rule's charge overflows.
pub fn apply_costings<I: ItemKey>(
    basket: CostingBasket<I>,
    rules: &[PricingRule<I>],
) -> Result<CostingBasket<I>, BasketError> {
    apply_costings_with_observer(basket, rules, &mut NoopObserver)
}

/// Same as [`apply_costings`], reporting every step to `observer`.
///
/// # Errors
///
/// Returns [`BasketError::CostOverflow`] if any rule's charge overflows. The
/// observer has seen every step before the failing one.
pub fn apply_costings_with_observer<I, O>(
    basket: CostingBasket<I>,
    rules: &[PricingRule<I>],
    observer: &mut O,
) -> Result<CostingBasket<I>, BasketError>
where
    I: ItemKey,
    O: CostingObserver<I> + ?Sized,
{
    rules.iter().try_fold(basket, |basket, rule| {
        let next = rule.apply_to_basket(&basket)?;

        debug!(
            rule = %rule,
            cost = %next.cost(),
            remaining = next.remaining_units(),
            "applied pricing rule"
        );

        observer.on_rule_applied(rule, &basket, &next);

        Ok(next)
    })
}
