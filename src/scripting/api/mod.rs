//! The `Quill` root object exposed to scripts
//!
//! One instance is pushed into every script scope. It owns a handle to the
//! command registry (reached through `createCommand`) and to the option store
//! (reached through the `opt` property); the native editor holds the same
//! handles, so everything a script sees is live state, never a copy.

mod command;
mod opt;

use rhai::{Engine, EvalAltResult};

use self::opt::QuillOpt;
use super::engine::CurrentAst;
use crate::commands::CommandRegistry;
use crate::error::BridgeError;
use crate::options::OptionStore;

/// The root binding object, visible to scripts as `Quill`.
#[derive(Clone)]
pub(super) struct Quill {
    opt: QuillOpt,
}

/// Register the script-facing API and build the root object to push into
/// script scopes.
pub(super) fn register(
    engine: &mut Engine,
    options: &OptionStore,
    commands: &CommandRegistry,
    current_ast: &CurrentAst,
) -> Quill {
    engine.register_type_with_name::<Quill>("Quill");

    command::register(engine, commands, current_ast);
    opt::register(engine);

    // `Quill.opt` hands out the proxy; the no-op setter is the write-back sink
    // Rhai needs for chained property assignment (`Quill.opt.wrap = true`).
    engine.register_get("opt", |quill: &mut Quill| quill.opt.clone());
    engine.register_set("opt", |_quill: &mut Quill, _opt: QuillOpt| {});

    Quill {
        opt: QuillOpt::new(options.clone()),
    }
}

/// Surface a bridge error to the script that triggered it.
fn to_script_error(err: BridgeError) -> Box<EvalAltResult> {
    err.to_string().into()
}
