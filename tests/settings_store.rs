//! Integration tests for the YAML settings store

use std::fs;

use jiff::civil::date;
use rust_decimal::Decimal;
use testresult::TestResult;

use promogate::{
    context::{RequestContext, RequestKind},
    settings::{DEFAULT_PROMO_NAME, SettingsError, SettingsProvider, YamlSettingsProvider},
};

#[test]
fn missing_file_loads_inactive_defaults() -> TestResult {
    let dir = tempfile::tempdir()?;
    let provider = YamlSettingsProvider::new(dir.path().join("promo.yml"));

    let settings = provider.load()?.normalize();

    assert!(!settings.activate);
    assert_eq!(settings.promo_name, DEFAULT_PROMO_NAME);
    assert_eq!(settings.discount_percentage, Decimal::ZERO);

    Ok(())
}

#[test]
fn saved_settings_are_normalised() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("promo.yml");

    fs::write(
        &path,
        "activate: true\n\
         promo_start: \"2024-01-01\"\n\
         promo_end: \"not a date\"\n\
         product_categories: [9, 3, 9]\n\
         discount_percentage: 150\n\
         minimum_cart: -5\n\
         promo_name: \"  \"\n",
    )?;

    let settings = YamlSettingsProvider::new(&path).load()?.normalize();

    assert!(settings.activate);
    assert_eq!(settings.promo_start, Some(date(2024, 1, 1)));
    assert_eq!(settings.promo_end, None);
    assert_eq!(settings.required_categories.len(), 2);
    assert_eq!(settings.discount_percentage, Decimal::ONE_HUNDRED);
    assert_eq!(settings.minimum_cart, Decimal::ZERO);
    assert_eq!(settings.promo_name, DEFAULT_PROMO_NAME);

    Ok(())
}

#[test]
fn malformed_yaml_is_an_error() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("promo.yml");

    fs::write(&path, "activate: [unterminated\n")?;

    let result = YamlSettingsProvider::new(&path).load();

    assert!(matches!(result, Err(SettingsError::Yaml(_))));

    Ok(())
}

#[test]
fn unreadable_store_leaves_the_promotion_inactive() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("promo.yml");

    fs::write(&path, "activate: [unterminated\n")?;

    let provider = YamlSettingsProvider::new(&path);
    let ctx = RequestContext::new(&provider, RequestKind::Storefront);

    assert!(!ctx.settings().activate);

    Ok(())
}

#[test]
fn edits_are_visible_to_the_next_request() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("promo.yml");
    let provider = YamlSettingsProvider::new(&path);

    fs::write(&path, "activate: false\n")?;

    let first = RequestContext::new(&provider, RequestKind::Ajax);

    assert!(!first.settings().activate);

    fs::write(&path, "activate: true\n")?;

    assert!(!first.settings().activate, "a request keeps its snapshot");

    let second = RequestContext::new(&provider, RequestKind::Ajax);

    assert!(second.settings().activate);

    Ok(())
}
