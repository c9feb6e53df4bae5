//! Dynamic values crossing the host/script boundary.
//!
//! Command callbacks accept a variable-length, variably-typed argument list and
//! produce a result of unspecified type. On the native side both are represented
//! as [`Value`], a closed sum the editor can pattern-match exhaustively, converted
//! to and from `rhai::Dynamic` at the boundary.

use std::collections::HashMap;

use rhai::Dynamic;
use serde::{Deserialize, Serialize};

/// A dynamically-typed value passed between the editor and script code.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Unit / no value.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Vec<Value>),
    Map(HashMap<String, Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Convert a script-side value into a [`Value`].
    ///
    /// Script types with no native counterpart (custom types, function pointers)
    /// collapse to [`Value::Null`].
    pub fn from_dynamic(value: &Dynamic) -> Self {
        if value.is_unit() {
            Self::Null
        } else if value.is_bool() {
            Self::Bool(value.as_bool().unwrap_or(false))
        } else if value.is_int() {
            Self::Int(value.as_int().unwrap_or(0))
        } else if value.is_float() {
            Self::Float(value.as_float().unwrap_or(0.0))
        } else if value.is_string() {
            Self::Str(value.clone().into_string().unwrap_or_default())
        } else if value.is_array() {
            let items = value.clone().into_array().unwrap_or_default();
            Self::Array(items.iter().map(Self::from_dynamic).collect())
        } else if value.is_map() {
            let entries = value.clone().cast::<rhai::Map>();
            Self::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), Self::from_dynamic(&v)))
                    .collect(),
            )
        } else {
            Self::Null
        }
    }

    /// Convert into a script-side value.
    pub fn to_dynamic(&self) -> Dynamic {
        match self {
            Self::Null => Dynamic::UNIT,
            Self::Bool(b) => Dynamic::from(*b),
            Self::Int(i) => Dynamic::from(*i),
            Self::Float(f) => Dynamic::from(*f),
            Self::Str(s) => Dynamic::from(s.clone()),
            Self::Array(items) => {
                let array: rhai::Array = items.iter().map(Self::to_dynamic).collect();
                Dynamic::from(array)
            }
            Self::Map(entries) => {
                let mut map = rhai::Map::new();
                for (k, v) in entries {
                    map.insert(k.clone().into(), v.to_dynamic());
                }
                Dynamic::from(map)
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_values_survive_the_boundary() {
        let value = Value::Map(HashMap::from([
            ("flag".to_string(), Value::Bool(true)),
            (
                "items".to_string(),
                Value::Array(vec![Value::Int(1), Value::Str("two".to_string())]),
            ),
        ]));

        let round_tripped = Value::from_dynamic(&value.to_dynamic());
        assert_eq!(round_tripped, value);
    }

    #[test]
    fn test_unknown_script_types_collapse_to_null() {
        let fn_ptr = Dynamic::from(rhai::FnPtr::new("anything").unwrap());
        assert_eq!(Value::from_dynamic(&fn_ptr), Value::Null);
    }

    #[test]
    fn test_serializes_untagged() {
        let value = Value::Array(vec![Value::Int(3), Value::Str("x".to_string())]);
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"[3,"x"]"#);
    }
}
