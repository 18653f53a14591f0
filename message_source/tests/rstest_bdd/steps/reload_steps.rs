//! Steps covering resource reloads.

use crate::fixtures::ResolutionContext;
use crate::steps::resolution_steps::{LocaleTag, MessageCode, resolve};
use anyhow::{Result, anyhow, ensure};
use rstest_bdd_macros::{given, then, when};

#[derive(Debug, Clone)]
struct ResourceId(String);

impl From<String> for ResourceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::str::FromStr for ResourceId {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(value.to_owned()))
    }
}

impl AsRef<str> for ResourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
struct Template(String);

impl From<String> for Template {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::str::FromStr for Template {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(value.to_owned()))
    }
}

#[given("{code} was already resolved for {locale}")]
fn already_resolved(
    context: &ResolutionContext,
    code: MessageCode,
    locale: LocaleTag,
) -> Result<()> {
    resolve(context, code.as_ref(), &locale.parse()?)?;
    let cached = context
        .messages
        .with_ref(|messages| messages.cached_entries())
        .ok_or_else(|| anyhow!("resolver must be built"))?;
    ensure!(cached > 0, "the resolution should have been cached");
    Ok(())
}

#[when("resource {resource} maps {code} to {message}")]
fn resource_maps(
    context: &ResolutionContext,
    resource: ResourceId,
    code: MessageCode,
    message: Template,
) -> Result<()> {
    context
        .store
        .with_ref(|store| store.insert(resource.as_ref(), [(code.as_ref(), message.0.as_str())]))
        .ok_or_else(|| anyhow!("store must be set up"))
}

#[when("resource {resource} disappears")]
fn resource_disappears(context: &ResolutionContext, resource: ResourceId) -> Result<()> {
    let removed = context
        .store
        .with_ref(|store| store.remove(resource.as_ref()))
        .ok_or_else(|| anyhow!("store must be set up"))?;
    ensure!(removed.is_some(), "resource {} was not stored", resource.as_ref());
    Ok(())
}

#[when("I reload {resource}")]
fn reload(context: &ResolutionContext, resource: ResourceId) -> Result<()> {
    let report = context
        .messages
        .with_ref(|messages| messages.reload([resource.as_ref()]))
        .ok_or_else(|| anyhow!("resolver must be built"))?;
    context.report.set(report);
    Ok(())
}

#[then("the reload succeeded")]
fn reload_succeeded(context: &ResolutionContext) -> Result<()> {
    let report = context
        .report
        .take()
        .ok_or_else(|| anyhow!("expected a reload report"))?;
    ensure!(report.is_success(), "reload failed: {report:?}");
    ensure!(!report.reloaded().is_empty(), "nothing was reloaded");
    Ok(())
}

#[then("the reload failed for {resource}")]
fn reload_failed(context: &ResolutionContext, resource: ResourceId) -> Result<()> {
    let report = context
        .report
        .take()
        .ok_or_else(|| anyhow!("expected a reload report"))?;
    ensure!(
        report
            .failures()
            .iter()
            .any(|failure| failure.resource == resource.as_ref()),
        "no failure recorded for {}: {report:?}",
        resource.as_ref()
    );
    Ok(())
}

#[then("the reload ignored {resource}")]
fn reload_ignored(context: &ResolutionContext, resource: ResourceId) -> Result<()> {
    let report = context
        .report
        .take()
        .ok_or_else(|| anyhow!("expected a reload report"))?;
    ensure!(
        report.ignored().iter().any(|id| id == resource.as_ref()),
        "{} was not ignored: {report:?}",
        resource.as_ref()
    );
    ensure!(report.reloaded().is_empty(), "nothing should be reloaded");
    Ok(())
}
