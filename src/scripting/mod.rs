//! Scripting module - Rhai runtime for the editor's host-script bridge
//!
//! Scripts see a single root object in every scope:
//! - `Quill.createCommand(name, callback)` - register an editor command
//! - `Quill.opt.<key>` - live editor options as bare read/write properties
//!
//! The native editor drives the same state through [`ScriptEngine`] and
//! [`BridgeHandle`]: dispatch commands by name, read and write options.

mod api;
mod engine;

pub use engine::{BridgeHandle, ScriptEngine};
