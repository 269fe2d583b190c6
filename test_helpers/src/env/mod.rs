//! Serialised mutation of process environment variables in tests.
//!
//! Every mutation takes a global re-entrant lock and returns an
//! [`EnvVarGuard`] that puts the previous value back (or removes the variable)
//! when dropped. Guards for the same key restore in LIFO order.
//!
//! Tests that need several variables to change together should use
//! [`scope`], which keeps the lock held until every guard it owns has been
//! restored.
//!
//! # Examples
//!
//! ```
//! use test_helpers::env;
//!
//! let _scope = env::scope([("APP_ENV", Some("test")), ("SITE_CONFIG", None)]);
//! assert_eq!(std::env::var("APP_ENV").as_deref(), Ok("test"));
//! assert!(std::env::var("SITE_CONFIG").is_err());
//! ```

use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// Restores one variable to its prior state on drop.
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
            .finish()
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let original = self.original.take();
        with_lock(|| write(&self.key, original.as_deref()));
    }
}

/// Holds the environment lock and a set of guards.
///
/// Guards are restored before the lock is released.
#[must_use = "dropping restores the variables and releases the lock"]
pub struct EnvScope {
    guards: Vec<EnvVarGuard>,
    _lock: ReentrantMutexGuard<'static, ()>,
}

impl fmt::Debug for EnvScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvScope")
            .field("guards", &self.guards)
            .finish_non_exhaustive()
    }
}

impl Drop for EnvScope {
    fn drop(&mut self) {
        while let Some(guard) = self.guards.pop() {
            drop(guard);
        }
    }
}

/// Sets `key` to `value` until the returned guard is dropped.
///
/// ```
/// use test_helpers::env;
///
/// let guard = env::set_var("MINCONF.db.pass", "secret");
/// assert_eq!(std::env::var("MINCONF.db.pass").as_deref(), Ok("secret"));
/// drop(guard);
/// ```
pub fn set_var<K, V>(key: K, value: V) -> EnvVarGuard
where
    K: Into<String>,
    V: AsRef<OsStr>,
{
    replace(key.into(), Some(value.as_ref()))
}

/// Removes `key` until the returned guard is dropped.
pub fn remove_var<K: Into<String>>(key: K) -> EnvVarGuard {
    replace(key.into(), None)
}

/// Applies every `(key, value)` pair, removing keys whose value is `None`,
/// and holds the lock until the scope is dropped.
pub fn scope<I, K, V>(vars: I) -> EnvScope
where
    I: IntoIterator<Item = (K, Option<V>)>,
    K: Into<String>,
    V: AsRef<OsStr>,
{
    let lock = ENV_MUTEX.lock();
    let guards = vars
        .into_iter()
        .map(|(key, value)| match value {
            Some(text) => set_var(key, text),
            None => remove_var(key),
        })
        .collect();
    EnvScope {
        guards,
        _lock: lock,
    }
}

fn replace(key: String, value: Option<&OsStr>) -> EnvVarGuard {
    with_lock(|| {
        let original = env::var_os(&key);
        write(&key, value);
        EnvVarGuard { key, original }
    })
}

fn with_lock<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock();
    f()
}

/// Callers must hold `ENV_MUTEX`.
fn write(key: &str, value: Option<&OsStr>) {
    match value {
        // SAFETY: `ENV_MUTEX` serialises every mutation made through this crate.
        Some(text) => unsafe { env::set_var(key, text) },
        // SAFETY: as above.
        None => unsafe { env::remove_var(key) },
    }
}
