//! `Quill.opt` - editor options as bare script properties
//!
//! Usage in Rhai:
//! ```rhai
//! Quill.opt.wrap = true;
//! Quill.opt.tabWidth = 2;
//! let t = Quill.opt.theme;
//! ```
//!
//! Each property is a paired getter/setter closing over the option store
//! handle carried by the proxy, so every access round-trips through canonical
//! state. Setters are typed to the option's declared kind; assigning the wrong
//! type is a script error and leaves the stored value untouched.

use rhai::{Engine, EvalAltResult};

use super::to_script_error;
use crate::options::{OptionStore, OptionValue};

/// Property proxy handed out by `Quill.opt`.
#[derive(Clone)]
pub(super) struct QuillOpt {
    options: OptionStore,
}

impl QuillOpt {
    pub(super) fn new(options: OptionStore) -> Self {
        Self { options }
    }
}

/// Register the `QuillOpt` type and one property pair per option key.
pub(super) fn register(engine: &mut Engine) {
    engine.register_type_with_name::<QuillOpt>("QuillOpt");

    register_bool(engine, "wrap");
    register_bool(engine, "lineBreak");
    register_int(engine, "tabWidth");
    register_str(engine, "theme");
}

fn register_bool(engine: &mut Engine, key: &'static str) {
    engine.register_get(
        key,
        move |opt: &mut QuillOpt| -> Result<bool, Box<EvalAltResult>> {
            let value = opt.options.read(key).map_err(to_script_error)?;
            Ok(value.as_bool().unwrap_or_default())
        },
    );
    engine.register_set(
        key,
        move |opt: &mut QuillOpt, value: bool| -> Result<(), Box<EvalAltResult>> {
            opt.options
                .write(key, OptionValue::Bool(value))
                .map_err(to_script_error)
        },
    );
}

fn register_int(engine: &mut Engine, key: &'static str) {
    engine.register_get(
        key,
        move |opt: &mut QuillOpt| -> Result<i64, Box<EvalAltResult>> {
            let value = opt.options.read(key).map_err(to_script_error)?;
            Ok(value.as_int().unwrap_or_default())
        },
    );
    engine.register_set(
        key,
        move |opt: &mut QuillOpt, value: i64| -> Result<(), Box<EvalAltResult>> {
            opt.options
                .write(key, OptionValue::Int(value))
                .map_err(to_script_error)
        },
    );
}

fn register_str(engine: &mut Engine, key: &'static str) {
    engine.register_get(
        key,
        move |opt: &mut QuillOpt| -> Result<String, Box<EvalAltResult>> {
            let value = opt.options.read(key).map_err(to_script_error)?;
            Ok(value.as_str().unwrap_or_default().to_string())
        },
    );
    engine.register_set(
        key,
        move |opt: &mut QuillOpt, value: String| -> Result<(), Box<EvalAltResult>> {
            opt.options
                .write(key, OptionValue::Str(value))
                .map_err(to_script_error)
        },
    );
}
