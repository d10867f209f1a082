//! Pricing Rules Repository
//!
//! Resolves which ordered rule list applies to a customer. A customer's own
//! rules run first, followed by the default rules, so customer-specific prices
//! consume units before the defaults ever see them.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{checkout::Checkout, items::ItemKey, products::ProductCode, rules::PricingRule};

/// Customer code whose rules apply to everyone.
pub const DEFAULT_CUSTOMER_CODE: &str = "default";

/// Customer code -> customer-specific rules, not yet merged with the defaults.
pub type CustomerRuleTable<I = ProductCode> = FxHashMap<String, Vec<PricingRule<I>>>;

/// Errors raised by the pricing rules repository.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The rule table has no entry for the default customer.
    #[error("pricing rules must contain rules for '{}'", DEFAULT_CUSTOMER_CODE)]
    MissingDefaultRules,

    /// No rules exist for the customer and unknown customers are rejected.
    #[error("no pricing rules for customer '{0}'")]
    UnknownCustomer(String),
}

/// What to do when asked for a customer the table doesn't know.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum UnknownCustomerPolicy {
    /// Treat the customer as a default customer.
    #[default]
    FallbackToDefault,

    /// Fail with [`RepositoryError::UnknownCustomer`].
    Reject,
}

/// Pricing rules repository
#[derive(Debug, Clone)]
pub struct PricingRulesRepository<I: ItemKey = ProductCode> {
    default_rules: Arc<[PricingRule<I>]>,

    /// Customer rules already followed by the default rules
    customer_rules: FxHashMap<String, Arc<[PricingRule<I>]>>,

    unknown_customer_policy: UnknownCustomerPolicy,
}

impl<I: ItemKey> PricingRulesRepository<I> {
    /// Build a repository from a customer rule table.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::MissingDefaultRules`] if the table has no
    /// entry for [`DEFAULT_CUSTOMER_CODE`].
    pub fn new(mut table: CustomerRuleTable<I>) -> Result<Self, RepositoryError> {
        let default_rules: Arc<[PricingRule<I>]> = table
            .remove(DEFAULT_CUSTOMER_CODE)
            .ok_or(RepositoryError::MissingDefaultRules)?
            .into();

        let customer_rules = table
            .into_iter()
            .map(|(code, mut rules)| {
                rules.extend(default_rules.iter().cloned());

                (code, Arc::<[PricingRule<I>]>::from(rules))
            })
            .collect();

        Ok(Self {
            default_rules,
            customer_rules,
            unknown_customer_policy: UnknownCustomerPolicy::default(),
        })
    }

    /// Set the policy for customers the table doesn't know.
    #[must_use]
    pub fn with_unknown_customer_policy(mut self, policy: UnknownCustomerPolicy) -> Self {
        self.unknown_customer_policy = policy;

        self
    }

    /// Policy applied to unknown customers.
    pub fn unknown_customer_policy(&self) -> UnknownCustomerPolicy {
        self.unknown_customer_policy
    }

    /// The default rules alone.
    pub fn default_rules(&self) -> &[PricingRule<I>] {
        &self.default_rules
    }

    /// Whether the table has customer-specific rules for `customer_code`.
    pub fn contains_customer(&self, customer_code: &str) -> bool {
        customer_code == DEFAULT_CUSTOMER_CODE || self.customer_rules.contains_key(customer_code)
    }

    /// Every known customer code, including the default, sorted.
    pub fn customer_codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self
            .customer_rules
            .keys()
            .map(String::as_str)
            .chain([DEFAULT_CUSTOMER_CODE])
            .collect();

        codes.sort_unstable();

        codes
    }

    /// Ordered rules for `customer_code`: the customer's own rules followed by
    /// the default rules.
    ///
    /// The default customer gets the default rules alone. Unknown customers are
    /// handled according to the [`UnknownCustomerPolicy`].
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::UnknownCustomer`] for an unknown customer
    /// when the policy is [`UnknownCustomerPolicy::Reject`].
    #[tracing::instrument(skip(self))]
    pub fn pricing_rules(
        &self,
        customer_code: &str,
    ) -> Result<Arc<[PricingRule<I>]>, RepositoryError> {
        if customer_code == DEFAULT_CUSTOMER_CODE {
            return Ok(Arc::clone(&self.default_rules));
        }

        if let Some(rules) = self.customer_rules.get(customer_code) {
            debug!(rules = rules.len(), "resolved customer pricing rules");

            return Ok(Arc::clone(rules));
        }

        match self.unknown_customer_policy {
            UnknownCustomerPolicy::FallbackToDefault => {
                warn!("unknown customer, falling back to default pricing rules");

                Ok(Arc::clone(&self.default_rules))
            }
            UnknownCustomerPolicy::Reject => {
                Err(RepositoryError::UnknownCustomer(customer_code.to_string()))
            }
        }
    }

    /// Start a checkout priced with the rules for `customer_code`.
    ///
    /// # Errors
    ///
    /// See [`PricingRulesRepository::pricing_rules`].
    pub fn checkout(&self, customer_code: &str) -> Result<Checkout<I>, RepositoryError> {
        Ok(Checkout::new(self.pricing_rules(customer_code)?))
    }
}
