//! Receipt
//!
//! Line-by-line record of a costing pass: which rule priced how many units of
//! which item, and what it charged.

use std::io;

use rust_decimal::Decimal;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{Alignment, Style, Theme, object::Columns},
};
use thiserror::Error;

use crate::{
    basket::CostingBasket, calculator::CostingObserver, items::ItemKey, products::ProductCode,
    rules::PricingRule,
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Output could not be written.
    #[error("failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// Units of one item priced by one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLine<I: ItemKey = ProductCode> {
    /// Item that was priced
    pub item: I,

    /// Description of the rule that priced it
    pub rule: String,

    /// Units the rule consumed
    pub units: usize,

    /// Amount the rule added to the total
    pub charge: Decimal,
}

/// Final receipt for a fully priced checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt<I: ItemKey = ProductCode> {
    lines: Vec<ReceiptLine<I>>,
    total: Decimal,
}

impl<I: ItemKey> Receipt<I> {
    /// Create a new receipt with the given lines and total.
    pub fn new(lines: Vec<ReceiptLine<I>>, total: Decimal) -> Self {
        Self { lines, total }
    }

    /// Lines in the order the rules were applied
    pub fn lines(&self) -> &[ReceiptLine<I>] {
        &self.lines
    }

    /// Total amount payable
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Number of units priced across all lines
    pub fn units(&self) -> usize {
        self.lines.iter().map(|line| line.units).sum()
    }

    /// Render the receipt as a table followed by the total.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if writing to `out` fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["Item", "Rule", "Units", "Charge"]);

        for line in &self.lines {
            builder.push_record([
                line.item.to_string(),
                line.rule.clone(),
                line.units.to_string(),
                line.charge.to_string(),
            ]);
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(
            1,
            HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
        );

        table.with(theme);
        table.modify(Columns::new(2..4), Alignment::right());

        writeln!(out, "{table}")?;
        writeln!(out, " Total: {}", self.total)?;

        Ok(())
    }
}

/// Observer that turns a costing pass into receipt lines.
#[derive(Debug)]
pub struct ReceiptRecorder<I: ItemKey = ProductCode> {
    lines: Vec<ReceiptLine<I>>,
}

impl<I: ItemKey> ReceiptRecorder<I> {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Finish recording, producing a receipt with the given total.
    pub fn into_receipt(self, total: Decimal) -> Receipt<I> {
        Receipt::new(self.lines, total)
    }
}

impl<I: ItemKey> Default for ReceiptRecorder<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ItemKey> CostingObserver<I> for ReceiptRecorder<I> {
    fn on_rule_applied(
        &mut self,
        rule: &PricingRule<I>,
        before: &CostingBasket<I>,
        after: &CostingBasket<I>,
    ) {
        if after.shares_counts_with(before) {
            return;
        }

        let item = rule.item();
        let units = before
            .count(item)
            .unwrap_or_default()
            .saturating_sub(after.count(item).unwrap_or_default());
        let charge = after.cost() - before.cost();

        if units == 0 && charge.is_zero() {
            return;
        }

        self.lines.push(ReceiptLine {
            item: item.clone(),
            rule: rule.to_string(),
            units,
            charge,
        });
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        calculator::apply_costings_with_observer,
        rules::{PerItemCosting, VolumeDiscount},
    };

    use super::*;

    #[test]
    fn recorder_skips_rules_that_did_nothing() -> TestResult {
        let price = Decimal::new(26999, 2);
        let rules: [PricingRule<&'static str>; 3] = [
            VolumeDiscount::new("classic", price, 3, 2)?.into(),
            PerItemCosting::new("classic", price)?.into(),
            PerItemCosting::new("premium", Decimal::ONE)?.into(),
        ];
        let basket = CostingBasket::from_items(&["classic"; 4]);
        let mut recorder = ReceiptRecorder::new();

        let result = apply_costings_with_observer(basket, &rules, &mut recorder)?;
        let receipt = recorder.into_receipt(result.cost());

        assert_eq!(receipt.lines().len(), 2);
        assert_eq!(receipt.units(), 4);
        assert_eq!(receipt.total(), Decimal::new(26999 * 3, 2));

        Ok(())
    }

    #[test]
    fn recorder_skips_partial_groups() -> TestResult {
        let rule: PricingRule<&'static str> =
            VolumeDiscount::new("classic", Decimal::ONE, 3, 2)?.into();
        let basket = CostingBasket::from_items(&["classic"; 2]);
        let mut recorder = ReceiptRecorder::new();

        apply_costings_with_observer(basket, &[rule], &mut recorder)?;

        assert!(recorder.into_receipt(Decimal::ZERO).lines().is_empty());

        Ok(())
    }

    #[test]
    fn write_to_renders_lines_and_total() -> TestResult {
        let receipt = Receipt::new(
            vec![ReceiptLine {
                item: "classic",
                rule: "classic at 269.99 each".to_string(),
                units: 2,
                charge: Decimal::new(53998, 2),
            }],
            Decimal::new(53998, 2),
        );
        let mut out = Vec::new();

        receipt.write_to(&mut out)?;
        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("Item"), "missing header in {rendered}");
        assert!(rendered.contains("classic at 269.99 each"));
        assert!(rendered.contains("539.98"));
        assert!(rendered.ends_with(" Total: 539.98\n"));

        Ok(())
    }
}
