//! Background task turning change notifications into batched reloads.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{Instant, timeout_at};

use super::ReloadReport;
use crate::{CompositeMessageSource, I18nError};

const REPORT_CHANNEL_CAPACITY: usize = 16;

/// Timing of the reload coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReloadSettings {
    /// Milliseconds to keep collecting notifications after the first one of
    /// a batch.
    pub batch_window_ms: u64,
    /// Milliseconds each reload pass may spend loading; `0` disables the
    /// limit.
    pub timeout_ms: u64,
}

impl Default for ReloadSettings {
    fn default() -> Self {
        Self {
            batch_window_ms: 250,
            timeout_ms: 5_000,
        }
    }
}

impl ReloadSettings {
    /// Batching window as a [`Duration`].
    #[must_use]
    pub const fn batch_window(&self) -> Duration {
        Duration::from_millis(self.batch_window_ms)
    }

    /// Per-pass load limit, or `None` when unbounded.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        if self.timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.timeout_ms))
        }
    }
}

/// Receives resource change notifications for a resolver.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use message_source::{
///     CompositeMessageSource, MemoryResourceStore, ReloadCoordinator, ReloadSettings,
///     ResourceMessageProvider, langid,
/// };
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), message_source::I18nError> {
/// let store = Arc::new(MemoryResourceStore::new().with_resource("app_en", [("k", "v")]));
/// let app = ResourceMessageProvider::builder("app", store)
///     .resource(langid!("en"), "app_en")
///     .build()?;
/// let messages = Arc::new(CompositeMessageSource::builder().with_provider(app).try_build()?);
///
/// let handle = ReloadCoordinator::new(Arc::clone(&messages), ReloadSettings::default()).spawn();
/// let mut reports = handle.subscribe();
/// handle.notify("app_en")?;
/// let report = reports.recv().await.expect("a report is published");
/// assert_eq!(report.reloaded(), ["app_en"]);
/// handle.shutdown().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ReloadCoordinator {
    composite: Arc<CompositeMessageSource>,
    settings: ReloadSettings,
}

/// Handle to a running [`ReloadCoordinator`].
#[derive(Debug)]
pub struct ReloadHandle {
    notifications: mpsc::UnboundedSender<String>,
    reports: broadcast::Sender<Arc<ReloadReport>>,
    task: JoinHandle<()>,
}

impl ReloadCoordinator {
    /// Prepares a coordinator reloading `composite`.
    #[must_use]
    pub const fn new(composite: Arc<CompositeMessageSource>, settings: ReloadSettings) -> Self {
        Self {
            composite,
            settings,
        }
    }

    /// Starts the coordinator on the current Tokio runtime.
    #[must_use]
    pub fn spawn(self) -> ReloadHandle {
        let (notifications, receiver) = mpsc::unbounded_channel();
        let (reports, _) = broadcast::channel(REPORT_CHANNEL_CAPACITY);
        let task = tokio::spawn(self.run(receiver, reports.clone()));
        ReloadHandle {
            notifications,
            reports,
            task,
        }
    }

    async fn run(
        self,
        mut receiver: mpsc::UnboundedReceiver<String>,
        reports: broadcast::Sender<Arc<ReloadReport>>,
    ) {
        while let Some(first) = receiver.recv().await {
            let mut batch = vec![first];
            let closed = collect_batch(&mut receiver, &mut batch, self.settings.batch_window()).await;

            tracing::debug!(resources = ?batch, "reloading changed message resources");
            let report = self
                .composite
                .reload_bounded(batch, self.settings.timeout())
                .await;
            if reports.send(Arc::new(report)).is_err() {
                tracing::trace!("no subscribers for reload report");
            }
            if closed {
                break;
            }
        }
        tracing::debug!("reload coordinator stopped");
    }
}

/// Gathers notifications until the window after the first one closes.
///
/// Returns `true` when the sending side has gone away.
async fn collect_batch(
    receiver: &mut mpsc::UnboundedReceiver<String>,
    batch: &mut Vec<String>,
    window: Duration,
) -> bool {
    let deadline = Instant::now() + window;
    loop {
        match timeout_at(deadline, receiver.recv()).await {
            Ok(Some(resource)) => {
                if !batch.contains(&resource) {
                    batch.push(resource);
                }
            }
            Ok(None) => return true,
            Err(_elapsed) => return false,
        }
    }
}

impl ReloadHandle {
    /// Reports that `resource` changed.
    ///
    /// # Errors
    ///
    /// Returns [`I18nError::CoordinatorClosed`] once the coordinator has
    /// stopped.
    pub fn notify(&self, resource: impl Into<String>) -> Result<(), I18nError> {
        self.notifications
            .send(resource.into())
            .map_err(|_closed| I18nError::CoordinatorClosed)
    }

    /// Reports several changed resources at once.
    ///
    /// # Errors
    ///
    /// Returns [`I18nError::CoordinatorClosed`] once the coordinator has
    /// stopped.
    pub fn notify_all<I, S>(&self, resources: I) -> Result<(), I18nError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        resources
            .into_iter()
            .try_for_each(|resource| self.notify(resource))
    }

    /// Subscribes to the reports of subsequent reload passes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<ReloadReport>> {
        self.reports.subscribe()
    }

    /// Stops accepting notifications, finishes any pending batch and waits
    /// for the task to exit.
    pub async fn shutdown(self) {
        drop(self.notifications);
        if let Err(err) = self.task.await {
            tracing::warn!(error = %err, "reload coordinator task failed");
        }
    }
}
