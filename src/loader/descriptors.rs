//! Rule Descriptors
//!
//! Serialized form of a pricing rule as it appears in a pricing document.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{
    loader::LoaderError,
    products::ProductCode,
    rules::{PerItemCosting, PricingRule, VolumeDiscount},
};

/// Customer code -> ordered rule descriptors, as read from a pricing document.
pub type PricingDocument = BTreeMap<String, Vec<RuleDescriptor>>;

/// Flat per-unit price
pub const RETAIL: &str = "retail";

/// Customer-specific flat per-unit price
pub const DISCOUNT: &str = "discount";

/// "Get N for the price of M" volume discount
pub const N_FOR_M: &str = "nForM";

/// Single pricing rule descriptor.
///
/// `pricing` selects the kind of rule; the other fields are read according to
/// that kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDescriptor {
    /// Rule kind: `retail`, `discount` or `nForM`
    pub pricing: String,

    /// Product the rule prices
    pub product_code: ProductCode,

    /// Unit price. Optional for `nForM`, which falls back to the default retail price.
    ///
    /// JSON numbers are read exactly, without passing through `f64`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<Decimal>,

    /// Group size for `nForM`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<i64>,

    /// Units paid for per group for `nForM`
    #[serde(default, rename = "for", skip_serializing_if = "Option::is_none")]
    pub for_price_of: Option<i64>,
}

/// YAML form of a [`RuleDescriptor`].
///
/// YAML parsers hand plain numbers over as `f64`, so the cost is read from the
/// scalar's text instead.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct YamlRuleDescriptor {
    pricing: String,

    product_code: ProductCode,

    #[serde(default, deserialize_with = "rust_decimal::serde::str_option::deserialize")]
    cost: Option<Decimal>,

    #[serde(default)]
    get: Option<i64>,

    #[serde(default, rename = "for")]
    for_price_of: Option<i64>,
}

impl From<YamlRuleDescriptor> for RuleDescriptor {
    fn from(descriptor: YamlRuleDescriptor) -> Self {
        Self {
            pricing: descriptor.pricing,
            product_code: descriptor.product_code,
            cost: descriptor.cost,
            get: descriptor.get,
            for_price_of: descriptor.for_price_of,
        }
    }
}

impl RuleDescriptor {
    /// Convert to a [`PricingRule`].
    ///
    /// `retail_costs` supplies the unit price for `nForM` descriptors that don't
    /// carry their own.
    ///
    /// # Errors
    ///
    /// Returns a [`LoaderError`] if the kind is unknown, a required field is
    /// missing or negative, no retail price can be found, or the rule itself is
    /// invalid.
    pub fn try_into_rule(
        self,
        customer: &str,
        retail_costs: &FxHashMap<ProductCode, Decimal>,
    ) -> Result<PricingRule, LoaderError> {
        match self.pricing.as_str() {
            RETAIL | DISCOUNT => {
                let cost = self.required_cost(customer)?;

                PerItemCosting::new(self.product_code, cost)
                    .map(PricingRule::from)
                    .map_err(|source| LoaderError::InvalidRule {
                        customer: customer.to_string(),
                        source,
                    })
            }
            N_FOR_M => {
                let get = self.quantity(customer, "get", self.get)?;
                let for_price_of = self.quantity(customer, "for", self.for_price_of)?;

                let cost = match self.cost {
                    Some(cost) => cost,
                    None => retail_costs.get(&self.product_code).copied().ok_or_else(|| {
                        LoaderError::MissingRetailCost {
                            customer: customer.to_string(),
                            product: self.product_code.to_string(),
                        }
                    })?,
                };

                VolumeDiscount::new(self.product_code, cost, get, for_price_of)
                    .map(PricingRule::from)
                    .map_err(|source| LoaderError::InvalidRule {
                        customer: customer.to_string(),
                        source,
                    })
            }
            other => Err(LoaderError::UnknownRuleKind {
                customer: customer.to_string(),
                kind: other.to_string(),
            }),
        }
    }

    /// Product and unit price, if this is a flat per-unit price with a cost.
    pub(crate) fn retail_cost(&self) -> Option<(&ProductCode, Decimal)> {
        match self.pricing.as_str() {
            RETAIL | DISCOUNT => self.cost.map(|cost| (&self.product_code, cost)),
            _ => None,
        }
    }

    fn required_cost(&self, customer: &str) -> Result<Decimal, LoaderError> {
        self.cost.ok_or_else(|| LoaderError::MissingField {
            customer: customer.to_string(),
            product: self.product_code.to_string(),
            field: "cost",
        })
    }

    fn quantity(
        &self,
        customer: &str,
        field: &'static str,
        value: Option<i64>,
    ) -> Result<usize, LoaderError> {
        let value = value.ok_or_else(|| LoaderError::MissingField {
            customer: customer.to_string(),
            product: self.product_code.to_string(),
            field,
        })?;

        usize::try_from(value).map_err(|_err| LoaderError::NegativeQuantity {
            customer: customer.to_string(),
            product: self.product_code.to_string(),
            field,
            value,
        })
    }
}
