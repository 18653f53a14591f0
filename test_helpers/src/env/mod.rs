//! Guards for mutating environment variables in tests.
//!
//! Every mutation takes a global re-entrant lock and returns an RAII guard
//! that restores the previous value (or removes the variable) on drop.
//! Guards for the same key stack and restore in LIFO order. A [`LocaleScope`]
//! keeps the lock for its whole lifetime so that locale detection sees a
//! consistent set of variables.
//!
//! # Examples
//!
//! ```
//! use test_helpers::env;
//!
//! let _scope = env::locale_scope(None, None, Some("fr_FR.UTF-8"));
//! assert_eq!(std::env::var("LANG").as_deref(), Ok("fr_FR.UTF-8"));
//! assert!(std::env::var("LC_ALL").is_err());
//! ```

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

/// Locale variables in the order POSIX consults them.
pub const LOCALE_VARIABLES: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// Restores one environment variable on drop.
#[must_use = "dropping restores the prior value"]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
}

impl fmt::Debug for EnvVarGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarGuard")
            .field("key", &self.key)
            .field("had_original", &self.original.is_some())
            .finish_non_exhaustive()
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _guard = ENV_MUTEX.lock();
        if let Some(value) = self.original.take() {
            // SAFETY: `ENV_MUTEX` is held.
            unsafe { env::set_var(&self.key, value) };
        } else {
            // SAFETY: `ENV_MUTEX` is held.
            unsafe { env::remove_var(&self.key) };
        }
    }
}

fn mutate<F>(key: String, mutator: F) -> EnvVarGuard
where
    F: FnOnce(&str),
{
    let _guard = ENV_MUTEX.lock();
    let original = env::var_os(&key);
    mutator(&key);
    EnvVarGuard { key, original }
}

/// Sets `key` to `value` until the guard drops.
///
/// ```
/// use test_helpers::env;
///
/// let guard = env::set_var("MSGSOURCE_DOC_KEY", "on");
/// assert_eq!(std::env::var("MSGSOURCE_DOC_KEY").as_deref(), Ok("on"));
/// drop(guard);
/// assert!(std::env::var("MSGSOURCE_DOC_KEY").is_err());
/// ```
pub fn set_var<K, V>(key: K, value: V) -> EnvVarGuard
where
    K: Into<String>,
    V: AsRef<OsStr>,
{
    // SAFETY: `mutate` holds `ENV_MUTEX` while the closure runs.
    mutate(key.into(), |name| unsafe { env::set_var(name, value.as_ref()) })
}

/// Removes `key` until the guard drops.
pub fn remove_var<K>(key: K) -> EnvVarGuard
where
    K: Into<String>,
{
    // SAFETY: `mutate` holds `ENV_MUTEX` while the closure runs.
    mutate(key.into(), |name| unsafe { env::remove_var(name) })
}

/// Holds the environment lock together with the guards it protects.
#[must_use = "dropping releases the environment lock and restores the variables"]
pub struct LocaleScope {
    guards: Vec<EnvVarGuard>,
    _lock: ReentrantMutexGuard<'static, ()>,
}

impl fmt::Debug for LocaleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleScope")
            .field("guards", &self.guards)
            .finish_non_exhaustive()
    }
}

impl Drop for LocaleScope {
    fn drop(&mut self) {
        // Restore before the lock field is released.
        drop(std::mem::take(&mut self.guards));
    }
}

/// Sets or clears `LC_ALL`, `LC_MESSAGES` and `LANG` for the scope's
/// lifetime. `None` removes the variable.
pub fn locale_scope(
    lc_all: Option<&str>,
    lc_messages: Option<&str>,
    lang: Option<&str>,
) -> LocaleScope {
    let lock = ENV_MUTEX.lock();
    let guards = LOCALE_VARIABLES
        .into_iter()
        .zip([lc_all, lc_messages, lang])
        .map(|(key, value)| value.map_or_else(|| remove_var(key), |text| set_var(key, text)))
        .collect();
    LocaleScope {
        guards,
        _lock: lock,
    }
}

/// Runs `f` while holding the environment lock.
pub fn with_lock<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock();
    f()
}

#[cfg(test)]
mod tests;
