//! Reloading resources while the resolver keeps serving.
//!
//! A reload maps changed resource identifiers to their owning providers,
//! reinitializes them, and invalidates the resolver cache once every commit
//! of the pass is visible. Failures never escape as errors: they are logged
//! and listed in a [`ReloadReport`].
//!
//! [`CompositeMessageSource::reload_bounded`] runs the loads on the blocking
//! pool under a shared deadline, and [`ReloadCoordinator`] batches change
//! notifications arriving close together into one such pass.

mod coordinator;

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, timeout_at};

pub use coordinator::{ReloadCoordinator, ReloadHandle, ReloadSettings};

use crate::provider::StagedResource;
use crate::{CompositeMessageSource, I18nError, MessageProvider};

/// A resource that failed to reload in one provider.
#[derive(Debug, Clone)]
pub struct ReloadFailure {
    /// Resource identifier.
    pub resource: String,
    /// Source name of the provider that kept its previous mapping.
    pub provider: String,
    /// Why the reload failed.
    pub error: Arc<I18nError>,
}

/// Outcome of one reload pass.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct ReloadReport {
    reloaded: Vec<String>,
    failures: Vec<ReloadFailure>,
    ignored: Vec<String>,
}

impl ReloadReport {
    pub(crate) const fn new(ignored: Vec<String>) -> Self {
        Self {
            reloaded: Vec::new(),
            failures: Vec::new(),
            ignored,
        }
    }

    /// Resources committed by at least one owning provider.
    #[must_use]
    pub fn reloaded(&self) -> &[String] {
        &self.reloaded
    }

    /// Per-provider failures; the affected providers kept their data.
    #[must_use]
    pub fn failures(&self) -> &[ReloadFailure] {
        &self.failures
    }

    /// Identifiers no resource-backed provider owns.
    #[must_use]
    pub fn ignored(&self) -> &[String] {
        &self.ignored
    }

    /// Whether the pass completed without failures.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn record_success(&mut self, resource: &str) {
        if !self.reloaded.iter().any(|known| known == resource) {
            self.reloaded.push(resource.to_owned());
        }
    }

    pub(crate) fn record_failure(&mut self, resource: &str, provider: &str, error: I18nError) {
        self.failures.push(ReloadFailure {
            resource: resource.to_owned(),
            provider: provider.to_owned(),
            error: Arc::new(error),
        });
    }
}

/// Resource identifiers of a pass, resolved to their owners.
#[derive(Default)]
pub(crate) struct ReloadPlan {
    pub(crate) targets: Vec<ReloadTarget>,
    pub(crate) ignored: Vec<String>,
}

impl ReloadPlan {
    pub(crate) fn contains(&self, resource: &str) -> bool {
        self.targets.iter().any(|target| target.resource == resource)
            || self.ignored.iter().any(|known| known == resource)
    }
}

pub(crate) struct ReloadTarget {
    pub(crate) resource: String,
    pub(crate) providers: Vec<Arc<dyn MessageProvider>>,
}

type StageOutcome = Result<StagedResource, I18nError>;

impl CompositeMessageSource {
    /// Reloads `resources` with every load running on the blocking pool.
    ///
    /// All loads share one deadline of `limit` from the start of the call.
    /// A load that misses it is reported as [`I18nError::Timeout`] and its
    /// data is discarded even if it completes later, so the provider keeps
    /// its previous mapping. Loads that finish in time are committed, after
    /// which the cache is invalidated once.
    ///
    /// Overlapping reloads of one resource commit in the order their loads
    /// observed the store. A destroyed resolver reports every identifier as
    /// [`I18nError::ProviderDestroyed`].
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn reload_bounded<I, S>(&self, resources: I, limit: Option<Duration>) -> ReloadReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.is_destroyed() {
            return self.destroyed_report(resources);
        }
        let plan = self.plan_reload(resources);
        let deadline = limit.map(|after| (Instant::now() + after, after));

        let mut pending = Vec::new();
        for target in &plan.targets {
            for provider in &target.providers {
                let task_provider = Arc::clone(provider);
                let resource = target.resource.clone();
                let task = tokio::task::spawn_blocking(move || stage(task_provider.as_ref(), &resource));
                pending.push((target.resource.as_str(), Arc::clone(provider), task));
            }
        }

        let mut report = ReloadReport::new(plan.ignored.clone());
        for (resource, provider, task) in pending {
            let joined = match deadline {
                Some((at, after)) => match timeout_at(at, task).await {
                    Ok(joined) => joined,
                    Err(_elapsed) => {
                        report.record_failure(
                            resource,
                            provider.source(),
                            I18nError::Timeout {
                                resource: resource.to_owned(),
                                after,
                            },
                        );
                        continue;
                    }
                },
                None => task.await,
            };
            let outcome = joined.unwrap_or_else(|err| {
                Err(I18nError::ReloadTask {
                    resource: resource.to_owned(),
                    message: err.to_string(),
                })
            });
            let committed = outcome.and_then(|staged| commit(provider.as_ref(), staged));
            match committed {
                Ok(()) => report.record_success(resource),
                Err(err) => report.record_failure(resource, provider.source(), err),
            }
        }

        self.finish_reload(&report);
        report
    }
}

fn stage(provider: &dyn MessageProvider, resource: &str) -> StageOutcome {
    let backed = provider
        .as_resource_backed()
        .ok_or_else(|| I18nError::NotResourceBacked {
            provider: provider.source().to_owned(),
        })?;
    backed.stage_resource(resource)
}

fn commit(provider: &dyn MessageProvider, staged: StagedResource) -> Result<(), I18nError> {
    let backed = provider
        .as_resource_backed()
        .ok_or_else(|| I18nError::NotResourceBacked {
            provider: provider.source().to_owned(),
        })?;
    backed.commit_resource(staged)
}
