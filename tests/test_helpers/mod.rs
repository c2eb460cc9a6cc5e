//! Scoped process environment for configuration tests.

use std::env;
use std::ffi::OsString;
use std::sync::{Mutex, MutexGuard, PoisonError};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Every variable the configuration layer reads.
pub const CONFIG_KEYS: [&str; 6] = [
    "TASKMIND_SHEET_URL",
    "GOOGLE_SHEET_URL",
    "TASKMIND_REQUEST_TIMEOUT_SECS",
    "TASKMIND_QUIET_PERIOD_MS",
    "TASKMIND_LOAD_ATTEMPTS",
    "TASKMIND_LOAD_BACKOFF_MS",
];

/// Holds the environment lock and restores the previous values on drop.
pub struct ScopedEnv {
    previous: Vec<(&'static str, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl ScopedEnv {
    /// Clears every configuration variable, then sets `pairs`.
    pub fn config(pairs: &[(&str, &str)]) -> Self {
        let lock = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = CONFIG_KEYS
            .iter()
            .map(|key| (*key, env::var_os(key)))
            .collect();

        for key in CONFIG_KEYS {
            let value = pairs
                .iter()
                .find_map(|(name, value)| (*name == key).then_some(*value));
            // SAFETY: ENV_LOCK serialises environment mutation across tests.
            unsafe {
                match value {
                    Some(new_value) => env::set_var(key, new_value),
                    None => env::remove_var(key),
                }
            }
        }

        Self {
            previous,
            _lock: lock,
        }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..) {
            // SAFETY: the lock is still held until this guard is gone.
            unsafe {
                match value {
                    Some(previous) => env::set_var(key, previous),
                    None => env::remove_var(key),
                }
            }
        }
    }
}
