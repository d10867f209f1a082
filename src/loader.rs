//! Rule Loader
//!
//! Reads a pricing document (JSON or YAML) into a [`CustomerRuleTable`].

use std::{
    collections::BTreeMap,
    ffi::OsStr,
    fs, io,
    path::{Path, PathBuf},
};

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    products::ProductCode,
    repository::{CustomerRuleTable, DEFAULT_CUSTOMER_CODE, PricingRulesRepository, RepositoryError},
    rules::RuleError,
};

mod descriptors;

use descriptors::YamlRuleDescriptor;

pub use descriptors::{DISCOUNT, N_FOR_M, PricingDocument, RETAIL, RuleDescriptor};

/// Errors raised while loading a pricing document.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The document could not be read.
    #[error("failed to read pricing document: {0}")]
    Io(#[from] io::Error),

    /// The document is not valid JSON for a pricing document.
    #[error("failed to parse JSON pricing document: {0}")]
    Json(#[from] serde_json::Error),

    /// The document is not valid YAML for a pricing document.
    #[error("failed to parse YAML pricing document: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// The file extension doesn't name a supported format.
    #[error("unsupported pricing document format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// A descriptor names a kind of rule that doesn't exist.
    #[error("unknown pricing '{kind}' for customer '{customer}'")]
    UnknownRuleKind {
        /// Customer the descriptor belongs to
        customer: String,

        /// Unrecognised `pricing` value
        kind: String,
    },

    /// A descriptor lacks a field its kind requires.
    #[error("pricing for '{product}' (customer '{customer}') is missing '{field}'")]
    MissingField {
        /// Customer the descriptor belongs to
        customer: String,

        /// Product the descriptor prices
        product: String,

        /// Name of the missing field
        field: &'static str,
    },

    /// A quantity field is negative.
    #[error("pricing for '{product}' (customer '{customer}') has negative '{field}': {value}")]
    NegativeQuantity {
        /// Customer the descriptor belongs to
        customer: String,

        /// Product the descriptor prices
        product: String,

        /// Name of the offending field
        field: &'static str,

        /// Value found in the document
        value: i64,
    },

    /// An `nForM` descriptor has no cost and the default customer has no retail price for it.
    #[error(
        "no retail cost for '{product}' in '{}' rules, needed by customer '{customer}'",
        DEFAULT_CUSTOMER_CODE
    )]
    MissingRetailCost {
        /// Customer the descriptor belongs to
        customer: String,

        /// Product the descriptor prices
        product: String,
    },

    /// The descriptor was well formed but describes an invalid rule.
    #[error("invalid pricing rule for customer '{customer}': {source}")]
    InvalidRule {
        /// Customer the descriptor belongs to
        customer: String,

        /// Rule validation failure
        #[source]
        source: RuleError,
    },

    /// The document has no rules for the default customer.
    #[error("pricing document has no '{}' customer", DEFAULT_CUSTOMER_CODE)]
    MissingDefaultCustomer,

    /// The loaded rules could not form a repository.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Supported pricing document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// JSON (`.json`)
    Json,

    /// YAML (`.yml`, `.yaml`)
    Yaml,
}

impl DocumentFormat {
    /// Pick a format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self, LoaderError> {
        let extension = path
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Ok(DocumentFormat::Json),
            Some("yml" | "yaml") => Ok(DocumentFormat::Yaml),
            _ => Err(LoaderError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Load a customer rule table from a file.
///
/// # Errors
///
/// Returns a [`LoaderError`] if the file can't be read or parsed, or any
/// descriptor is invalid.
pub fn load_path(path: impl AsRef<Path>) -> Result<CustomerRuleTable, LoaderError> {
    let path = path.as_ref();
    let format = DocumentFormat::from_path(path)?;
    let contents = fs::read_to_string(path)?;

    let table = match format {
        DocumentFormat::Json => from_json_str(&contents)?,
        DocumentFormat::Yaml => from_yaml_str(&contents)?,
    };

    info!(
        path = %path.display(),
        customers = table.len(),
        "loaded pricing rules"
    );

    Ok(table)
}

/// Load a repository from a file, ready to resolve customer rules.
///
/// # Errors
///
/// See [`load_path`] and [`PricingRulesRepository::new`].
pub fn load_repository(path: impl AsRef<Path>) -> Result<PricingRulesRepository, LoaderError> {
    Ok(PricingRulesRepository::new(load_path(path)?)?)
}

/// Parse a JSON pricing document.
///
/// # Errors
///
/// Returns a [`LoaderError`] if the JSON is malformed or any descriptor is invalid.
pub fn from_json_str(json: &str) -> Result<CustomerRuleTable, LoaderError> {
    from_document(serde_json::from_str(json)?)
}

/// Parse a YAML pricing document.
///
/// # Errors
///
/// Returns a [`LoaderError`] if the YAML is malformed or any descriptor is invalid.
pub fn from_yaml_str(yaml: &str) -> Result<CustomerRuleTable, LoaderError> {
    let document: BTreeMap<String, Vec<YamlRuleDescriptor>> = serde_norway::from_str(yaml)?;

    from_document(
        document
            .into_iter()
            .map(|(customer, descriptors)| {
                (customer, descriptors.into_iter().map(RuleDescriptor::from).collect())
            })
            .collect(),
    )
}

/// Convert a parsed document into a customer rule table.
///
/// Each customer's rules keep the order of their descriptors.
///
/// # Errors
///
/// Returns [`LoaderError::MissingDefaultCustomer`] if the document has no
/// default customer, otherwise the first descriptor error encountered.
pub fn from_document(document: PricingDocument) -> Result<CustomerRuleTable, LoaderError> {
    let retail_costs = default_retail_costs(&document)?;

    let mut table: CustomerRuleTable = FxHashMap::default();

    for (customer, descriptors) in document {
        let rules = descriptors
            .into_iter()
            .map(|descriptor| descriptor.try_into_rule(&customer, &retail_costs))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(customer = %customer, rules = rules.len(), "loaded customer pricing rules");

        table.insert(customer, rules);
    }

    Ok(table)
}

/// Unit prices from the default customer's flat-price descriptors. The first
/// price listed for a product wins, matching the order rules are applied in.
fn default_retail_costs(
    document: &PricingDocument,
) -> Result<FxHashMap<ProductCode, Decimal>, LoaderError> {
    let defaults = document
        .get(DEFAULT_CUSTOMER_CODE)
        .ok_or(LoaderError::MissingDefaultCustomer)?;

    let mut costs = FxHashMap::default();

    for (product, cost) in defaults.iter().filter_map(RuleDescriptor::retail_cost) {
        costs.entry(product.clone()).or_insert(cost);
    }

    Ok(costs)
}
