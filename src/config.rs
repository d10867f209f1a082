//! Checkout CLI configuration

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::{products::ProductCode, repository::UnknownCustomerPolicy};

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Tariff checkout configuration
#[derive(Debug, Parser)]
#[command(name = "tariff", about = "Price a checkout against customer pricing rules", long_about = None)]
pub struct CheckoutConfig {
    /// Pricing document (.json, .yml or .yaml)
    #[arg(long, env = "TARIFF_RULES", default_value = "fixtures/pricing.json")]
    pub rules: PathBuf,

    /// Customer code to price for
    #[arg(short, long)]
    pub customer: String,

    /// Product code to add to the checkout; repeat for more items
    #[arg(short, long = "product", required = true, num_args = 1..)]
    pub products: Vec<ProductCode>,

    /// Fail for customers with no pricing rules instead of using the defaults
    #[arg(long, env = "TARIFF_STRICT_CUSTOMERS")]
    pub strict_customers: bool,

    /// Logging
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl CheckoutConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        Self::try_parse()
    }

    /// How the repository should treat a customer it has no rules for.
    pub fn unknown_customer_policy(&self) -> UnknownCustomerPolicy {
        if self.strict_customers {
            UnknownCustomerPolicy::Reject
        } else {
            UnknownCustomerPolicy::FallbackToDefault
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn repeated_products_are_collected_in_order() -> TestResult {
        let config = CheckoutConfig::try_parse_from([
            "tariff",
            "--rules",
            "rules.yml",
            "-c",
            "secondbite",
            "-p",
            "classic",
            "-p",
            "classic",
            "--product",
            "premium",
        ])?;

        assert_eq!(config.rules, PathBuf::from("rules.yml"));
        assert_eq!(config.customer, "secondbite");
        assert_eq!(
            config.products,
            vec![
                ProductCode::from("classic"),
                ProductCode::from("classic"),
                ProductCode::from("premium"),
            ]
        );

        Ok(())
    }

    #[test]
    fn several_products_after_one_flag() -> TestResult {
        let config =
            CheckoutConfig::try_parse_from(["tariff", "-c", "default", "-p", "classic", "premium"])?;

        assert_eq!(config.products.len(), 2);

        Ok(())
    }

    #[test]
    fn strict_customers_selects_reject_policy() -> TestResult {
        let config = CheckoutConfig::try_parse_from([
            "tariff",
            "-c",
            "nobody",
            "-p",
            "classic",
            "--strict-customers",
        ])?;

        assert_eq!(config.unknown_customer_policy(), UnknownCustomerPolicy::Reject);

        Ok(())
    }

    #[test]
    fn json_log_format_is_accepted() -> TestResult {
        let config = CheckoutConfig::try_parse_from([
            "tariff",
            "-c",
            "default",
            "-p",
            "classic",
            "--log-format",
            "json",
        ])?;

        assert_eq!(config.logging.log_format, LogFormat::Json);

        Ok(())
    }

    #[test]
    fn products_are_required() {
        let result = CheckoutConfig::try_parse_from(["tariff", "-c", "default"]);

        assert!(result.is_err(), "parsed without any products");
    }
}
