use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{OptionKind, OptionValue};
use crate::error::{BridgeError, BridgeResult};

/// Observer called with `(key, new_value)` after each successful write.
pub type OptionWatcher = Arc<dyn Fn(&str, &OptionValue) + Send + Sync>;

/// Canonical holder of editor configuration values.
///
/// Cheap to clone; all clones share the same state behind a single lock, so the
/// script binding and the native editor always observe the same values. The lock
/// is never held while watchers run.
#[derive(Clone, Default)]
pub struct OptionStore {
    values: Arc<RwLock<HashMap<String, OptionValue>>>,
    watchers: Arc<RwLock<Vec<OptionWatcher>>>,
}

impl OptionStore {
    /// Create an empty store with no declared options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with the editor's built-in options and their defaults.
    pub fn with_defaults() -> Self {
        let store = Self::new();
        store.declare("wrap", OptionValue::Bool(false));
        store.declare("lineBreak", OptionValue::Bool(false));
        store.declare("tabWidth", OptionValue::Int(4));
        store.declare("theme", OptionValue::Str("gruvbox-dark".to_string()));
        store
    }

    /// Declare an option key with its default value.
    ///
    /// The default's type becomes the option's declared kind for all later
    /// writes. Re-declaring a key resets it.
    pub fn declare(&self, key: &str, default: OptionValue) {
        self.values.write().insert(key.to_string(), default);
    }

    /// Read the current value of `key`.
    pub fn read(&self, key: &str) -> BridgeResult<OptionValue> {
        self.values
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| BridgeError::UnknownOption(key.to_string()))
    }

    /// Replace the value of `key`.
    ///
    /// All-or-nothing: a kind mismatch or unknown key leaves the stored value
    /// unchanged. Watchers are notified after the lock is released.
    pub fn write(&self, key: &str, value: OptionValue) -> BridgeResult<()> {
        {
            let mut values = self.values.write();
            let current = values
                .get_mut(key)
                .ok_or_else(|| BridgeError::UnknownOption(key.to_string()))?;
            if current.kind() != value.kind() {
                return Err(BridgeError::InvalidOptionValue {
                    key: key.to_string(),
                    expected: current.kind(),
                    found: value.kind(),
                });
            }
            *current = value.clone();
        }

        tracing::trace!(key, ?value, "option written");
        let watchers: Vec<OptionWatcher> = self.watchers.read().clone();
        for watcher in watchers {
            watcher(key, &value);
        }

        Ok(())
    }

    /// Register an observer for successful writes.
    pub fn watch(&self, watcher: OptionWatcher) {
        self.watchers.write().push(watcher);
    }

    /// The declared kind of `key`, if it exists.
    pub fn kind(&self, key: &str) -> Option<OptionKind> {
        self.values.read().get(key).map(OptionValue::kind)
    }
}
