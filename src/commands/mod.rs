//! Script-registered editor commands
//!
//! Scripts call `Quill.createCommand(name, callback)` to bind a callback under
//! a name; the native editor dispatches by name through the
//! [`ScriptEngine`](crate::ScriptEngine) without knowing anything about script
//! internals.

mod registry;

pub use registry::{CommandEntry, CommandRegistry};
