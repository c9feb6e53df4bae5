//! `Quill.createCommand` - command registration from script code

use rhai::{Engine, EvalAltResult, FnPtr};

use super::{Quill, to_script_error};
use crate::commands::CommandRegistry;
use crate::scripting::engine::CurrentAst;

/// Register `Quill.createCommand(name, callback)`.
///
/// The callback is paired with the AST of the script being evaluated, so it
/// stays callable after later scripts load. Registering an existing name
/// replaces the prior binding.
pub(super) fn register(
    engine: &mut Engine,
    commands: &CommandRegistry,
    current_ast: &CurrentAst,
) {
    let registry = commands.clone();
    let current = current_ast.clone();

    engine.register_fn(
        "createCommand",
        move |_quill: &mut Quill,
              name: &str,
              callback: FnPtr|
              -> Result<(), Box<EvalAltResult>> {
            let ast = current.get().ok_or_else(|| -> Box<EvalAltResult> {
                "createCommand called outside of a running script".into()
            })?;
            registry
                .register(name, callback, ast)
                .map_err(to_script_error)
        },
    );
}
