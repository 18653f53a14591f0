//! Tests for layered settings and building a resolver from them.

use std::sync::Arc;

use camino::Utf8Path;
use rstest::rstest;
use unic_langid::langid;

use super::*;
use crate::{MemoryResourceStore, MessageArgs, NoLocaleContext};

#[allow(deprecated, reason = "figment::Jail is used for test isolation only")]
fn jail_expect_with<F>(f: F)
where
    F: FnOnce(&mut figment::Jail) -> figment::error::Result<()>,
{
    figment::Jail::expect_with(f);
}

const SETTINGS_TOML: &str = r#"
default_locale = "en"
missing_message = "code"
cache_capacity = 64

[reload]
batch_window_ms = 50

[[providers]]
source = "app"
priority = 1
resources = { en = "app_en" }

[[providers]]
source = "common"
resources = { en = "common_en", zh-CN = "common_zh_CN" }
"#;

fn store() -> Arc<dyn ResourceStore> {
    Arc::new(
        MemoryResourceStore::new()
            .with_resource("common_en", [("a.greeting", "Hi")])
            .with_resource("common_zh_CN", [("a.greeting", "你好")])
            .with_resource("app_en", [("a.greeting", "Hello"), ("b.only", "B")]),
    )
}

#[rstest]
fn defaults_apply_without_layers() {
    jail_expect_with(|_| {
        let settings = I18nSettings::load(None).map_err(|err| err.to_string())?;
        assert_eq!(settings, I18nSettings::default());
        assert_eq!(settings.source, "composite");
        assert_eq!(settings.reload.timeout_ms, 5_000);
        Ok(())
    });
}

#[rstest]
fn file_values_are_read() {
    jail_expect_with(|jail| {
        jail.create_file("i18n.toml", SETTINGS_TOML)?;
        let settings = I18nSettings::load(Some(Utf8Path::new("i18n.toml")))
            .map_err(|err| err.to_string())?;

        assert_eq!(settings.default_locale.as_deref(), Some("en"));
        assert_eq!(settings.missing_message, MissingMessagePolicy::Code);
        assert_eq!(settings.cache_capacity, 64);
        assert_eq!(settings.reload.batch_window_ms, 50);
        assert_eq!(settings.reload.timeout_ms, 5_000);
        assert_eq!(settings.providers.len(), 2);
        let common = settings.providers.get(1).expect("second provider");
        assert_eq!(common.priority, 0);
        assert_eq!(
            common.resources.get("zh-CN").map(String::as_str),
            Some("common_zh_CN")
        );
        Ok(())
    });
}

#[rstest]
fn environment_overrides_the_file() {
    jail_expect_with(|jail| {
        jail.create_file("i18n.toml", SETTINGS_TOML)?;
        jail.set_env("MSGSOURCE_CACHE_CAPACITY", "8");
        jail.set_env("MSGSOURCE_MISSING_MESSAGE", "empty");
        jail.set_env("MSGSOURCE_RELOAD__TIMEOUT_MS", "0");
        let settings = I18nSettings::load(Some(Utf8Path::new("i18n.toml")))
            .map_err(|err| err.to_string())?;

        assert_eq!(settings.cache_capacity, 8);
        assert_eq!(settings.missing_message, MissingMessagePolicy::Empty);
        assert_eq!(settings.reload.timeout(), None);
        assert_eq!(settings.reload.batch_window_ms, 50);
        Ok(())
    });
}

#[rstest]
fn malformed_values_are_settings_errors() {
    jail_expect_with(|jail| {
        jail.set_env("MSGSOURCE_MISSING_MESSAGE", "shout");
        let err = I18nSettings::load(None).expect_err("unknown policy");
        assert!(matches!(err, I18nError::Settings(_)));
        Ok(())
    });
}

#[rstest]
fn missing_file_contributes_nothing() {
    jail_expect_with(|_| {
        let settings = I18nSettings::load(Some(Utf8Path::new("absent.toml")))
            .map_err(|err| err.to_string())?;
        assert_eq!(settings, I18nSettings::default());
        Ok(())
    });
}

#[rstest]
fn settings_build_a_prioritised_resolver() {
    jail_expect_with(|jail| {
        jail.create_file("i18n.toml", SETTINGS_TOML)?;
        let settings = I18nSettings::load(Some(Utf8Path::new("i18n.toml")))
            .map_err(|err| err.to_string())?;
        let messages = settings
            .build_composite(&store(), Arc::new(NoLocaleContext))
            .map_err(|err| err.to_string())?;

        let order: Vec<&str> = messages.providers().map(|p| p.source()).collect();
        assert_eq!(order, ["common", "app"]);
        let args = MessageArgs::new();
        assert_eq!(messages.message("a.greeting", Some(&langid!("zh-CN")), &args), "你好");
        assert_eq!(messages.message("b.only", None, &args), "B");
        assert_eq!(messages.message("nope", None, &args), "nope");
        Ok(())
    });
}

#[rstest]
#[case::resolver_locale(Some("not a locale!"), "en")]
#[case::resource_locale(None, "@@")]
fn malformed_locales_are_configuration_errors(
    #[case] default_locale: Option<&str>,
    #[case] resource_locale: &str,
) {
    let settings = I18nSettings {
        default_locale: default_locale.map(str::to_owned),
        providers: vec![ProviderSettings {
            source: "common".to_owned(),
            priority: 0,
            default_locale: None,
            resources: IndexMap::from([(resource_locale.to_owned(), "common_en".to_owned())]),
        }],
        ..I18nSettings::default()
    };

    let err = settings
        .build_composite(&store(), Arc::new(NoLocaleContext))
        .expect_err("locale is malformed");
    assert!(matches!(err, I18nError::Configuration { .. }));
}
