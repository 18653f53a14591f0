//! Shared fixtures for the behavioural scenarios.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use message_source::{
    CompositeMessageSource, LanguageIdentifier, MemoryResourceStore, MessageArgs,
    MessageProvider, ReloadReport, ResourceBacked, ResourceMessageProvider,
};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// Provider wrapper counting how often the resolver consults it.
pub struct CountingProvider {
    pub inner: ResourceMessageProvider,
    pub calls: Arc<AtomicUsize>,
}

impl MessageProvider for CountingProvider {
    fn message(
        &self,
        code: &str,
        locale: &LanguageIdentifier,
        args: &MessageArgs,
    ) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.message(code, locale, args)
    }

    fn supported_locales(&self) -> &[LanguageIdentifier] {
        self.inner.supported_locales()
    }

    fn default_locale(&self) -> &LanguageIdentifier {
        self.inner.default_locale()
    }

    fn source(&self) -> &str {
        self.inner.source()
    }

    fn as_resource_backed(&self) -> Option<&dyn ResourceBacked> {
        self.inner.as_resource_backed()
    }

    fn destroy(&self) {
        self.inner.destroy();
    }
}

/// State shared between the steps of one scenario.
#[derive(Debug, Default, ScenarioState)]
pub struct ResolutionContext {
    pub store: Slot<Arc<MemoryResourceStore>>,
    pub messages: Slot<Arc<CompositeMessageSource>>,
    pub app_calls: Slot<Arc<AtomicUsize>>,
    pub resolved: Slot<String>,
    pub report: Slot<ReloadReport>,
}

/// Creates an empty scenario state.
#[fixture]
pub fn context() -> ResolutionContext {
    ResolutionContext::default()
}
