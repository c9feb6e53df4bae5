//! The main Rhai scripting engine for quill
//!
//! Owns the configured Rhai engine and the canonical editor state it exposes:
//! the option store behind `Quill.opt` and the command registry behind
//! `Quill.createCommand`. The native editor talks to the same state through
//! the engine itself or through a clonable [`BridgeHandle`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use rhai::{AST, Dynamic, Engine, Scope};

use super::api::{self, Quill};
use crate::commands::CommandRegistry;
use crate::error::{BridgeError, BridgeResult};
use crate::options::{OptionStore, OptionValue};
use crate::value::Value;

/// Shared slot holding the AST of the script code currently executing.
///
/// `createCommand` must pair each callback with the AST that defines it.
/// [`ScriptEngine::eval`] fills the slot right before running a compiled
/// script, and dispatch fills it with the callback's owning AST, so a command
/// registered from inside another command lands against the right script.
#[derive(Clone, Default)]
pub(super) struct CurrentAst(Arc<RwLock<Option<Arc<AST>>>>);

impl CurrentAst {
    pub(super) fn set(&self, ast: Arc<AST>) {
        *self.0.write() = Some(ast);
    }

    pub(super) fn get(&self) -> Option<Arc<AST>> {
        self.0.read().clone()
    }
}

/// The scripting engine for quill.
pub struct ScriptEngine {
    engine: Arc<Engine>,
    api: Quill,
    options: OptionStore,
    commands: CommandRegistry,
    current_ast: CurrentAst,
}

impl ScriptEngine {
    /// Create a script engine over the editor's built-in options.
    pub fn new() -> Self {
        Self::with_options(OptionStore::with_defaults())
    }

    /// Create a script engine over an existing option store.
    pub fn with_options(options: OptionStore) -> Self {
        let commands = CommandRegistry::new();
        let current_ast = CurrentAst::default();

        let mut engine = Self::create_engine();
        let api = api::register(&mut engine, &options, &commands, &current_ast);

        options.watch(Arc::new(|key, value| {
            tracing::debug!(key, ?value, "option changed");
        }));

        Self {
            engine: Arc::new(engine),
            api,
            options,
            commands,
            current_ast,
        }
    }

    fn create_engine() -> Engine {
        let mut engine = Engine::new();

        // Safety limits
        engine.set_max_expr_depths(64, 64);
        engine.set_max_operations(100_000);

        engine.on_print(|msg| tracing::info!(target: "script", "{msg}"));

        engine
    }

    /// Evaluate a Rhai script string.
    ///
    /// The script runs to completion in a fresh scope containing the `Quill`
    /// root object; commands it registers and options it sets are visible to
    /// native code as soon as this returns.
    pub fn eval(&mut self, script: &str) -> BridgeResult<()> {
        let ast = Arc::new(self.engine.compile(script)?);
        self.current_ast.set(Arc::clone(&ast));

        let mut scope = Scope::new();
        scope.push("Quill", self.api.clone());
        self.engine
            .run_ast_with_scope(&mut scope, &ast)
            .map_err(BridgeError::Script)
    }

    /// Load and execute a script file.
    pub fn load_file(&mut self, path: &Path) -> BridgeResult<()> {
        let content = std::fs::read_to_string(path)?;
        self.eval(&content)
    }

    /// Get the config directory path.
    /// Uses ~/.config/quill/ on all platforms for consistency.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("quill"))
    }

    /// Get the default config file path.
    pub fn config_file() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("init.rhai"))
    }

    /// Load the default config file if it exists.
    pub fn load_default(&mut self) -> BridgeResult<()> {
        if let Some(config_file) = Self::config_file() {
            if config_file.exists() {
                return self.load_file(&config_file);
            }
        }
        Ok(()) // No config file is fine
    }

    /// Invoke the command registered under `name` with `args`.
    pub fn dispatch(&self, name: &str, args: Vec<Value>) -> BridgeResult<Value> {
        self.handle().dispatch(name, args)
    }

    /// Read the current value of an option.
    pub fn read_option(&self, key: &str) -> BridgeResult<OptionValue> {
        self.options.read(key)
    }

    /// Write an option value, visible to scripts immediately.
    pub fn write_option(&self, key: &str, value: OptionValue) -> BridgeResult<()> {
        self.options.write(key, value)
    }

    /// A clonable handle for native editor threads.
    pub fn handle(&self) -> BridgeHandle {
        BridgeHandle {
            engine: Arc::clone(&self.engine),
            options: self.options.clone(),
            commands: self.commands.clone(),
            current_ast: self.current_ast.clone(),
        }
    }

    /// The option store shared with scripts.
    pub fn options(&self) -> OptionStore {
        self.options.clone()
    }

    /// The command registry shared with scripts.
    pub fn commands(&self) -> CommandRegistry {
        self.commands.clone()
    }
}

impl Default for ScriptEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Native-side view of the bridge.
///
/// Clonable and shareable across editor threads: dispatch commands and
/// read/write options, without access to script evaluation.
#[derive(Clone)]
pub struct BridgeHandle {
    engine: Arc<Engine>,
    options: OptionStore,
    commands: CommandRegistry,
    current_ast: CurrentAst,
}

impl BridgeHandle {
    /// Invoke the command registered under `name` with `args`.
    ///
    /// Fails with [`BridgeError::UnknownCommand`] if nothing is registered
    /// under `name`, and with [`BridgeError::CommandFailed`] if the callback
    /// raises; a failing callback stays registered.
    pub fn dispatch(&self, name: &str, args: Vec<Value>) -> BridgeResult<Value> {
        let entry = self
            .commands
            .get(name)
            .ok_or_else(|| BridgeError::UnknownCommand(name.to_string()))?;

        tracing::debug!(name, args = args.len(), "dispatching command");
        let call_args: Vec<Dynamic> = args.iter().map(Value::to_dynamic).collect();

        // The entry is cloned out of the registry, so the callback runs with no
        // lock held and may itself register commands; those pair with the
        // callback's own script.
        self.current_ast.set(Arc::clone(&entry.ast));
        let result: Dynamic = entry
            .callback
            .call(&self.engine, &entry.ast, call_args)
            .map_err(|source| BridgeError::CommandFailed {
                name: name.to_string(),
                source,
            })?;

        Ok(Value::from_dynamic(&result))
    }

    /// Read the current value of an option.
    pub fn read_option(&self, key: &str) -> BridgeResult<OptionValue> {
        self.options.read(key)
    }

    /// Write an option value, visible to scripts immediately.
    pub fn write_option(&self, key: &str, value: OptionValue) -> BridgeResult<()> {
        self.options.write(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_command_then_dispatch() {
        let mut engine = ScriptEngine::new();
        engine
            .eval(r#"Quill.createCommand("hello", || "world");"#)
            .unwrap();

        let result = engine.dispatch("hello", vec![]).unwrap();
        assert_eq!(result, Value::Str("world".to_string()));
    }

    #[test]
    fn test_dispatch_unknown_command_fails() {
        let engine = ScriptEngine::new();
        let err = engine.dispatch("goodbye", vec![]).unwrap_err();
        assert!(matches!(err, BridgeError::UnknownCommand(name) if name == "goodbye"));
    }

    #[test]
    fn test_command_receives_args() {
        let mut engine = ScriptEngine::new();
        engine
            .eval(r#"Quill.createCommand("add", |a, b| a + b);"#)
            .unwrap();

        let result = engine
            .dispatch("add", vec![Value::Int(2), Value::Int(3)])
            .unwrap();
        assert_eq!(result, Value::Int(5));
    }

    #[test]
    fn test_named_function_as_command() {
        let mut engine = ScriptEngine::new();
        engine
            .eval(
                r#"
                fn greet(who) {
                    "hello, " + who
                }
                Quill.createCommand("greet", Fn("greet"));
            "#,
            )
            .unwrap();

        let result = engine
            .dispatch("greet", vec![Value::Str("quill".to_string())])
            .unwrap();
        assert_eq!(result, Value::Str("hello, quill".to_string()));
    }

    #[test]
    fn test_reregistration_replaces_callback() {
        let mut engine = ScriptEngine::new();
        engine
            .eval(
                r#"
                Quill.createCommand("greet", || "first");
                Quill.createCommand("greet", || "second");
            "#,
            )
            .unwrap();

        let result = engine.dispatch("greet", vec![]).unwrap();
        assert_eq!(result, Value::Str("second".to_string()));
    }

    #[test]
    fn test_empty_command_name_is_a_script_error() {
        let mut engine = ScriptEngine::new();
        let err = engine
            .eval(r#"Quill.createCommand("", || "nothing");"#)
            .unwrap_err();
        assert!(matches!(err, BridgeError::Script(_)));
        assert!(engine.commands().names().is_empty());
    }

    #[test]
    fn test_failing_callback_stays_registered() {
        let mut engine = ScriptEngine::new();
        engine
            .eval(r#"Quill.createCommand("boom", || { throw "kaboom"; });"#)
            .unwrap();

        let err = engine.dispatch("boom", vec![]).unwrap_err();
        assert!(matches!(err, BridgeError::CommandFailed { name, .. } if name == "boom"));

        // The registry is not corrupted by the failure
        assert!(engine.commands().contains("boom"));
        assert!(engine.dispatch("boom", vec![]).is_err());
    }

    #[test]
    fn test_command_can_register_another_command() {
        let mut engine = ScriptEngine::new();
        engine
            .eval(
                r#"
                Quill.createCommand("outer", || {
                    Quill.createCommand("inner", || "from inner");
                    "from outer"
                });
            "#,
            )
            .unwrap();

        assert!(!engine.commands().contains("inner"));
        let result = engine.dispatch("outer", vec![]).unwrap();
        assert_eq!(result, Value::Str("from outer".to_string()));

        // Registration made inside the callback affects future dispatches
        let result = engine.dispatch("inner", vec![]).unwrap();
        assert_eq!(result, Value::Str("from inner".to_string()));
    }

    #[test]
    fn test_commands_survive_later_script_loads() {
        let mut engine = ScriptEngine::new();
        engine
            .eval(r#"Quill.createCommand("hello", || "world");"#)
            .unwrap();
        engine
            .eval(r#"Quill.createCommand("other", || "thing");"#)
            .unwrap();

        // "hello" still calls into the script that defined it
        let result = engine.dispatch("hello", vec![]).unwrap();
        assert_eq!(result, Value::Str("world".to_string()));
    }

    #[test]
    fn test_script_set_option_visible_to_native() {
        let mut engine = ScriptEngine::new();
        assert_eq!(
            engine.read_option("wrap").unwrap(),
            OptionValue::Bool(false)
        );

        engine.eval("Quill.opt.wrap = true;").unwrap();
        assert_eq!(engine.read_option("wrap").unwrap(), OptionValue::Bool(true));
    }

    #[test]
    fn test_native_write_visible_to_script() {
        let mut engine = ScriptEngine::new();
        engine.write_option("tabWidth", OptionValue::Int(8)).unwrap();

        engine
            .eval(r#"if Quill.opt.tabWidth != 8 { throw "stale read"; }"#)
            .unwrap();
    }

    #[test]
    fn test_script_reads_and_writes_theme() {
        let mut engine = ScriptEngine::new();
        engine.eval(r#"Quill.opt.theme = "nord";"#).unwrap();
        assert_eq!(
            engine.read_option("theme").unwrap(),
            OptionValue::Str("nord".to_string())
        );
    }

    #[test]
    fn test_wrong_typed_assignment_leaves_option_unchanged() {
        let mut engine = ScriptEngine::new();
        engine.eval("Quill.opt.wrap = true;").unwrap();

        let err = engine.eval(r#"Quill.opt.wrap = "not-a-boolean";"#).unwrap_err();
        assert!(matches!(err, BridgeError::Script(_)));
        assert_eq!(engine.read_option("wrap").unwrap(), OptionValue::Bool(true));
    }

    #[test]
    fn test_multiple_options_in_one_script() {
        let mut engine = ScriptEngine::new();
        engine
            .eval(
                r#"
                Quill.opt.wrap = true;
                Quill.opt.lineBreak = true;
                Quill.opt.tabWidth = 2;
            "#,
            )
            .unwrap();

        assert_eq!(engine.read_option("wrap").unwrap(), OptionValue::Bool(true));
        assert_eq!(
            engine.read_option("lineBreak").unwrap(),
            OptionValue::Bool(true)
        );
        assert_eq!(engine.read_option("tabWidth").unwrap(), OptionValue::Int(2));
    }

    #[test]
    fn test_dispatch_from_another_thread() {
        let mut engine = ScriptEngine::new();
        engine
            .eval(r#"Quill.createCommand("hello", || "world");"#)
            .unwrap();

        let handle = engine.handle();
        let result = std::thread::spawn(move || handle.dispatch("hello", vec![]))
            .join()
            .unwrap()
            .unwrap();
        assert_eq!(result, Value::Str("world".to_string()));
    }

    #[test]
    fn test_handle_reads_and_writes_options() {
        let engine = ScriptEngine::new();
        let handle = engine.handle();

        handle.write_option("lineBreak", OptionValue::Bool(true)).unwrap();
        assert_eq!(
            engine.read_option("lineBreak").unwrap(),
            OptionValue::Bool(true)
        );
        assert_eq!(
            handle.read_option("lineBreak").unwrap(),
            OptionValue::Bool(true)
        );
    }

    #[test]
    fn test_parse_error_is_reported() {
        let mut engine = ScriptEngine::new();
        let err = engine.eval("Quill.createCommand(").unwrap_err();
        assert!(matches!(err, BridgeError::Compile(_)));
    }
}
