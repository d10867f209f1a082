//! Loading pricing documents from disk.

use std::{fs, path::PathBuf};

use rstest::rstest;
use rust_decimal::Decimal;
use tempfile::TempDir;
use testresult::TestResult;

use tariff::{loader::LoaderError, prelude::*};

fn write_document(dir: &TempDir, name: &str, contents: &str) -> TestResult<PathBuf> {
    let path = dir.path().join(name);
    fs::write(&path, contents)?;

    Ok(path)
}

#[test]
fn yaml_document_prices_checkout() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_document(
        &dir,
        "rules.yaml",
        "
default:
  - pricing: retail
    productCode: widget
    cost: 2.50
bulk:
  - pricing: nForM
    productCode: widget
    get: 4
    for: 3
",
    )?;

    let repository = load_repository(&path)?;
    let mut checkout = repository.checkout("bulk")?;
    checkout.extend(["widget"; 5].map(ProductCode::from));

    assert_eq!(checkout.total()?, Decimal::new(1000, 2));

    Ok(())
}

#[rstest]
#[case::json(
    "rules.json",
    r#"{ "default": [{ "pricing": "retail", "productCode": "gold", "cost": 1234567890123456.79 }] }"#
)]
#[case::yaml(
    "rules.yml",
    "default:\n  - pricing: retail\n    productCode: gold\n    cost: 1234567890123456.79\n"
)]
fn long_costs_are_loaded_exactly(#[case] name: &str, #[case] contents: &str) -> TestResult {
    let dir = TempDir::new()?;
    let path = write_document(&dir, name, contents)?;

    let repository = load_repository(&path)?;
    let mut checkout = repository.checkout("default")?;
    checkout.add(ProductCode::from("gold"));

    assert_eq!(
        checkout.total()?,
        Decimal::new(123_456_789_012_345_679, 2),
        "cost from {name} lost precision"
    );

    Ok(())
}

#[test]
fn explicit_n_for_m_cost_is_used() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_document(
        &dir,
        "rules.json",
        r#"{
            "default": [{ "pricing": "retail", "productCode": "widget", "cost": 2.50 }],
            "bulk": [{ "pricing": "nForM", "productCode": "widget", "get": 2, "for": 1, "cost": 2.00 }]
        }"#,
    )?;

    let repository = load_repository(&path)?;
    let mut checkout = repository.checkout("bulk")?;
    checkout.extend(["widget"; 3].map(ProductCode::from));

    assert_eq!(checkout.total()?, Decimal::new(450, 2));

    Ok(())
}

#[test]
fn unknown_pricing_kind_fails_the_load() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_document(
        &dir,
        "rules.json",
        r#"{ "default": [{ "pricing": "halfPrice", "productCode": "widget", "cost": 1 }] }"#,
    )?;

    let result = load_repository(&path);

    assert!(
        matches!(&result, Err(LoaderError::UnknownRuleKind { kind, .. }) if kind == "halfPrice"),
        "expected unknown rule kind, got {result:?}"
    );

    Ok(())
}

#[test]
fn n_for_m_without_default_price_fails_the_load() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_document(
        &dir,
        "rules.json",
        r#"{
            "default": [],
            "bulk": [{ "pricing": "nForM", "productCode": "widget", "get": 2, "for": 1 }]
        }"#,
    )?;

    let result = load_repository(&path);

    assert!(
        matches!(&result, Err(LoaderError::MissingRetailCost { product, customer })
            if product == "widget" && customer == "bulk"),
        "expected missing retail cost, got {result:?}"
    );

    Ok(())
}

#[test]
fn negative_get_fails_the_load() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_document(
        &dir,
        "rules.json",
        r#"{ "default": [{ "pricing": "nForM", "productCode": "widget", "get": -3, "for": 2, "cost": 1 }] }"#,
    )?;

    let result = load_repository(&path);

    assert!(
        matches!(
            &result,
            Err(LoaderError::NegativeQuantity {
                field: "get",
                value: -3,
                ..
            })
        ),
        "expected negative quantity, got {result:?}"
    );

    Ok(())
}

#[test]
fn negative_cost_fails_the_load() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_document(
        &dir,
        "rules.json",
        r#"{ "default": [{ "pricing": "retail", "productCode": "widget", "cost": -1 }] }"#,
    )?;

    let result = load_repository(&path);

    assert!(
        matches!(
            &result,
            Err(LoaderError::InvalidRule {
                source: RuleError::NegativeUnitPrice(..),
                ..
            })
        ),
        "expected invalid rule, got {result:?}"
    );

    Ok(())
}

#[test]
fn missing_default_customer_fails_the_load() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_document(&dir, "rules.yml", "bulk: []\n")?;

    let result = load_repository(&path);

    assert!(
        matches!(&result, Err(LoaderError::MissingDefaultCustomer)),
        "expected missing default customer, got {result:?}"
    );

    Ok(())
}

#[test]
fn unsupported_extension_is_rejected_before_reading() {
    let result = load_path("rules.toml");

    assert!(
        matches!(&result, Err(LoaderError::UnsupportedFormat(path)) if path.ends_with("rules.toml")),
        "expected unsupported format, got {result:?}"
    );
}

#[test]
fn missing_file_is_an_io_error() -> TestResult {
    let dir = TempDir::new()?;

    let result = load_path(dir.path().join("absent.json"));

    assert!(
        matches!(&result, Err(LoaderError::Io(_))),
        "expected io error, got {result:?}"
    );

    Ok(())
}

#[test]
fn malformed_yaml_is_a_yaml_error() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_document(&dir, "rules.yml", "default: [ { pricing: retail\n")?;

    let result = load_path(&path);

    assert!(
        matches!(&result, Err(LoaderError::Yaml(_))),
        "expected yaml error, got {result:?}"
    );

    Ok(())
}
