//! Unit tests for error construction and aggregation.

use std::io;

use camino::Utf8Path;
use rstest::rstest;

use super::{I18nError, ResourceError};

#[rstest]
fn aggregate_of_nothing_is_none() {
    assert!(I18nError::aggregate(Vec::new()).is_none());
}

#[rstest]
fn aggregate_of_one_unwraps_the_error() {
    let outcome = I18nError::aggregate(vec![I18nError::CoordinatorClosed]);
    assert!(
        matches!(outcome, Some(I18nError::CoordinatorClosed)),
        "expected the single error back, got {outcome:?}"
    );
}

#[rstest]
fn aggregate_numbers_each_entry() {
    let outcome = I18nError::aggregate(vec![
        I18nError::UnknownProvider {
            provider: "app".to_owned(),
        },
        I18nError::configuration("common", "empty resource id"),
    ])
    .expect("two errors aggregate");

    let I18nError::Aggregate(aggregate) = &outcome else {
        panic!("expected aggregate, got {outcome:?}");
    };
    assert_eq!(aggregate.len(), 2);
    let rendered = outcome.to_string();
    assert!(rendered.contains("1: no message provider is registered as 'app'"));
    assert!(rendered.contains("2: invalid configuration for 'common': empty resource id"));
}

#[rstest]
#[case::dashed("zh-CN")]
#[case::underscored("zh_CN")]
#[case::bare("fr")]
fn parse_locale_accepts_common_forms(#[case] raw: &str) {
    assert!(I18nError::parse_locale(raw).is_ok(), "{raw} should parse");
}

#[rstest]
fn parse_locale_reports_the_raw_value() {
    let err = I18nError::parse_locale("not a locale!").expect_err("must fail");
    assert!(
        matches!(&err, I18nError::InvalidLocale { value, .. } if value == "not a locale!"),
        "unexpected error {err:?}"
    );
}

#[rstest]
fn io_not_found_maps_to_resource_not_found() {
    let err = ResourceError::io(
        Utf8Path::new("i18n/app_en.properties"),
        io::Error::from(io::ErrorKind::NotFound),
    );
    assert!(matches!(err, ResourceError::NotFound { ref resource } if resource == "i18n/app_en.properties"));
}

#[rstest]
fn io_other_failures_keep_the_path() {
    let err = ResourceError::io(
        Utf8Path::new("i18n/app_en.properties"),
        io::Error::from(io::ErrorKind::PermissionDenied),
    );
    assert!(matches!(err, ResourceError::Io { .. }));
    assert!(err.to_string().starts_with("I/O error at i18n/app_en.properties"));
}
