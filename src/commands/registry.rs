use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use rhai::{AST, FnPtr};

use crate::error::{BridgeError, BridgeResult};

/// A registered command callback.
///
/// A script function pointer is only callable against the AST it was compiled
/// in, so each entry carries the owning AST. That also keeps the callback valid
/// after a later script replaces the engine's current AST.
#[derive(Clone)]
pub struct CommandEntry {
    pub callback: FnPtr,
    pub ast: Arc<AST>,
}

/// Flat name → callback map, shared between the script binding and the editor.
///
/// One flat namespace, keyed by exact string equality. Cheap to clone; clones
/// share state. Entries live until replaced or every handle is dropped.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    commands: Arc<RwLock<HashMap<String, CommandEntry>>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `callback`, replacing any prior binding.
    ///
    /// Visible to subsequent dispatches immediately. Registering from inside a
    /// running callback affects future dispatches, not the in-flight one.
    pub fn register(&self, name: &str, callback: FnPtr, ast: Arc<AST>) -> BridgeResult<()> {
        if name.is_empty() {
            return Err(BridgeError::InvalidCommandName);
        }

        let replaced = self
            .commands
            .write()
            .insert(name.to_string(), CommandEntry { callback, ast })
            .is_some();
        tracing::debug!(name, replaced, "command registered");
        Ok(())
    }

    /// Look up the entry for `name`, cloned out so no lock is held while the
    /// caller invokes the callback.
    pub fn get(&self, name: &str) -> Option<CommandEntry> {
        self.commands.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.read().contains_key(name)
    }

    /// Names of all registered commands, in no particular order.
    pub fn names(&self) -> Vec<String> {
        self.commands.read().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_ast() -> Arc<AST> {
        Arc::new(rhai::Engine::new().compile("").unwrap())
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = CommandRegistry::new();
        registry
            .register("save", FnPtr::new("do_save").unwrap(), empty_ast())
            .unwrap();

        assert!(registry.contains("save"));
        assert_eq!(registry.get("save").unwrap().callback.fn_name(), "do_save");
        assert!(registry.get("Save").is_none()); // case-sensitive
    }

    #[test]
    fn test_reregistration_replaces() {
        let registry = CommandRegistry::new();
        registry
            .register("save", FnPtr::new("first").unwrap(), empty_ast())
            .unwrap();
        registry
            .register("save", FnPtr::new("second").unwrap(), empty_ast())
            .unwrap();

        assert_eq!(registry.get("save").unwrap().callback.fn_name(), "second");
        assert_eq!(registry.names(), vec!["save".to_string()]);
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let registry = CommandRegistry::new();
        let err = registry
            .register("", FnPtr::new("cb").unwrap(), empty_ast())
            .unwrap_err();
        assert!(matches!(err, BridgeError::InvalidCommandName));
        assert!(registry.names().is_empty());
    }
}
