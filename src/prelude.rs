//! Tariff prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    basket::{BasketError, CostingBasket, Leftover},
    calculator::{CostingObserver, NoopObserver, apply_costings, apply_costings_with_observer},
    checkout::{Checkout, CostingError},
    items::{ItemCounts, ItemKey},
    loader::{LoaderError, load_path, load_repository},
    products::ProductCode,
    receipt::{Receipt, ReceiptError, ReceiptLine, ReceiptRecorder},
    repository::{
        CustomerRuleTable, DEFAULT_CUSTOMER_CODE, PricingRulesRepository, RepositoryError,
        UnknownCustomerPolicy,
    },
    rules::{PerItemCosting, PricingRule, RuleError, VolumeDiscount},
};
