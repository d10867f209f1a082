//! Items

use std::{fmt, hash::Hash};

use rustc_hash::FxHashMap;

/// Identity of a sellable item.
///
/// Identities are compared and hashed structurally. They are also ordered so
/// that anything reported back to a caller (leftovers, receipts) comes out in a
/// stable order, and displayable so they can appear in error messages.
pub trait ItemKey: Clone + Eq + Hash + Ord + fmt::Debug + fmt::Display {
    /// Returns `true` when the identity carries no usable value.
    ///
    /// Pricing rules refuse blank identities at construction time.
    fn is_blank(&self) -> bool {
        false
    }
}

impl ItemKey for String {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl ItemKey for &str {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl ItemKey for u32 {}

/// Remaining quantity of each item in a basket.
pub type ItemCounts<I> = FxHashMap<I, usize>;

/// Groups a sequence of items into per-item occurrence counts.
///
/// Only items that occur at least once get a key; the order of the input has
/// no effect on the result.
pub fn count_items<'a, I>(items: impl IntoIterator<Item = &'a I>) -> ItemCounts<I>
where
    I: ItemKey + 'a,
{
    items
        .into_iter()
        .fold(ItemCounts::default(), |mut counts, item| {
            *counts.entry(item.clone()).or_default() += 1;
            counts
        })
}
