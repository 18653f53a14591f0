//! Unit tests for locale fallback chains and locale contexts.

use rstest::rstest;
use serial_test::serial;
use test_helpers::env;
use unic_langid::{LanguageIdentifier, langid};

use super::*;

#[rstest]
#[case::region_to_language(langid!("zh-CN"), langid!("en"), vec![langid!("zh-CN"), langid!("zh"), langid!("en")])]
#[case::language_only(langid!("fr"), langid!("en"), vec![langid!("fr"), langid!("en")])]
#[case::default_requested(langid!("en"), langid!("en"), vec![langid!("en")])]
#[case::default_inside_chain(langid!("en-GB"), langid!("en"), vec![langid!("en-GB"), langid!("en")])]
#[case::script_and_region(
    langid!("zh-Hant-TW"),
    langid!("en"),
    vec![langid!("zh-Hant-TW"), langid!("zh-Hant"), langid!("zh"), langid!("en")]
)]
#[case::variant(
    langid!("de-DE-1996"),
    langid!("en"),
    vec![langid!("de-DE-1996"), langid!("de-DE"), langid!("de"), langid!("en")]
)]
fn fallback_chain_narrows_then_defaults(
    #[case] requested: LanguageIdentifier,
    #[case] default: LanguageIdentifier,
    #[case] expected: Vec<LanguageIdentifier>,
) {
    assert_eq!(fallback_chain(&requested, &default), expected);
}

#[rstest]
fn fallback_chain_is_deterministic() {
    let requested = langid!("pt-BR");
    let default = langid!("es");
    assert_eq!(
        fallback_chain(&requested, &default),
        fallback_chain(&requested, &default)
    );
}

#[rstest]
#[case("zh_CN.UTF-8", Some(langid!("zh-CN")))]
#[case("de_DE@euro", Some(langid!("de-DE")))]
#[case("en", Some(langid!("en")))]
#[case("C", None)]
#[case("POSIX", None)]
#[case("", None)]
#[case("!!", None)]
fn posix_locales_parse(#[case] raw: &str, #[case] expected: Option<LanguageIdentifier>) {
    assert_eq!(parse_posix_locale(raw), expected);
}

#[rstest]
fn fixed_locale_reports_its_locale() {
    let context = FixedLocale::new(langid!("ja"));
    assert_eq!(context.current_locale(), Some(langid!("ja")));
    assert_eq!(NoLocaleContext.current_locale(), None);
}

#[rstest]
#[serial]
fn env_context_prefers_lc_all() {
    let _scope = env::locale_scope(Some("zh_CN.UTF-8"), Some("de_DE.UTF-8"), Some("fr_FR.UTF-8"));
    assert_eq!(EnvLocaleContext.current_locale(), Some(langid!("zh-CN")));
}

#[rstest]
#[serial]
fn env_context_falls_through_empty_variables() {
    let _scope = env::locale_scope(Some(""), None, Some("pt_BR.UTF-8"));
    assert_eq!(EnvLocaleContext.current_locale(), Some(langid!("pt-BR")));
}

#[rstest]
#[serial]
fn env_context_without_variables_reports_nothing() {
    let _scope = env::locale_scope(None, None, None);
    assert_eq!(EnvLocaleContext.current_locale(), None);
}
