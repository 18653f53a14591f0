//! Steps covering provider ordering and locale fallback.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::fixtures::{CountingProvider, ResolutionContext};
use anyhow::{Result, anyhow, ensure};
use message_source::{
    CompositeMessageSource, LanguageIdentifier, MemoryResourceStore, MessageArgs,
    ResourceMessageProvider, langid,
};
use rstest_bdd_macros::{given, then, when};

#[derive(Debug, Clone)]
pub struct MessageCode(String);

impl From<String> for MessageCode {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::str::FromStr for MessageCode {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(value.to_owned()))
    }
}

impl AsRef<str> for MessageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct LocaleTag(String);

impl From<String> for LocaleTag {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::str::FromStr for LocaleTag {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(value.to_owned()))
    }
}

impl LocaleTag {
    /// Parses the captured tag.
    pub fn parse(&self) -> Result<LanguageIdentifier> {
        self.0
            .parse()
            .map_err(|err| anyhow!("invalid locale {:?}: {err}", self.0))
    }
}

#[derive(Debug, Clone)]
struct ExpectedText(String);

impl From<String> for ExpectedText {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::str::FromStr for ExpectedText {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(value.to_owned()))
    }
}

impl AsRef<str> for ExpectedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resolves `code` for `locale` and records the result.
pub fn resolve(context: &ResolutionContext, code: &str, locale: &LanguageIdentifier) -> Result<()> {
    let resolved = context
        .messages
        .with_ref(|messages| messages.message(code, Some(locale), &MessageArgs::new()))
        .ok_or_else(|| anyhow!("resolver must be built"))?;
    context.resolved.set(resolved);
    Ok(())
}

#[given("the common and app providers")]
fn common_and_app(context: &ResolutionContext) -> Result<()> {
    let store = Arc::new(
        MemoryResourceStore::new()
            .with_resource("common_en", [("a.greeting", "Hi")])
            .with_resource("common_zh_CN", [("a.greeting", "你好")])
            .with_resource("app_en", [("a.greeting", "Hello"), ("b.only", "B")]),
    );
    let common_store: Arc<MemoryResourceStore> = Arc::clone(&store);
    let common = ResourceMessageProvider::builder("common", common_store)
        .default_locale(langid!("en"))
        .resource(langid!("en"), "common_en")
        .resource(langid!("zh-CN"), "common_zh_CN")
        .build()?;
    let app_store: Arc<MemoryResourceStore> = Arc::clone(&store);
    let app = ResourceMessageProvider::builder("app", app_store)
        .default_locale(langid!("en"))
        .resource(langid!("en"), "app_en")
        .build()?;
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = CountingProvider {
        inner: app,
        calls: Arc::clone(&calls),
    };

    let messages = CompositeMessageSource::builder()
        .with_ranked_provider(0, common)
        .with_ranked_provider(1, counted)
        .try_build()?;
    context.store.set(store);
    context.messages.set(Arc::new(messages));
    context.app_calls.set(calls);
    Ok(())
}

#[when("I resolve {code} for {locale}")]
fn resolve_code(context: &ResolutionContext, code: MessageCode, locale: LocaleTag) -> Result<()> {
    resolve(context, code.as_ref(), &locale.parse()?)
}

#[then("the message reads {expected}")]
fn message_reads(context: &ResolutionContext, expected: ExpectedText) -> Result<()> {
    let actual = context
        .resolved
        .take()
        .ok_or_else(|| anyhow!("expected a resolved message"))?;
    ensure!(
        actual == expected.as_ref(),
        "resolved {actual:?}; expected {:?}",
        expected.as_ref()
    );
    Ok(())
}

#[then("the message is empty")]
fn message_is_empty(context: &ResolutionContext) -> Result<()> {
    let actual = context
        .resolved
        .take()
        .ok_or_else(|| anyhow!("expected a resolved message"))?;
    ensure!(actual.is_empty(), "expected an empty message, got {actual:?}");
    Ok(())
}

#[then("the app provider was not consulted")]
fn app_not_consulted(context: &ResolutionContext) -> Result<()> {
    let calls = context
        .app_calls
        .with_ref(|calls| calls.load(Ordering::SeqCst))
        .ok_or_else(|| anyhow!("providers must be registered"))?;
    ensure!(calls == 0, "app provider was consulted {calls} time(s)");
    Ok(())
}
