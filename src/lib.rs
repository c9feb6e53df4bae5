//! quill - host-script binding layer for the quill editor
//!
//! Embedded Rhai scripts drive the editor through a single root object:
//! - `Quill.createCommand(name, callback)` - register a named editor command
//! - `Quill.opt.*` - live, typed editor options as bare read/write properties
//!
//! The native editor owns the canonical state and reaches it from the other
//! side of the boundary: [`ScriptEngine::dispatch`] invokes registered
//! commands by name, and the [`OptionStore`] serves reads during rendering
//! without going through script-facing property semantics.

pub mod commands;
pub mod error;
pub mod options;
pub mod scripting;
pub mod value;

pub use commands::{CommandEntry, CommandRegistry};
pub use error::{BridgeError, BridgeResult};
pub use options::{OptionKind, OptionStore, OptionValue, OptionWatcher};
pub use scripting::{BridgeHandle, ScriptEngine};
pub use value::Value;
