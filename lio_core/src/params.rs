// lio_core/src/params.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{LioError, Result};

/// A single primitive pipeline parameter.
///
/// Deserializes untagged so a TOML table like `param2 = 5` maps straight onto
/// `Param::Int(5)`. Variant order matters: integers must be tried before floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Param {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

/// A parameter set keyed by name. Ordered so listings are stable.
pub type ParamMap = BTreeMap<String, Param>;

impl Param {
    pub fn type_name(&self) -> &'static str {
        match self {
            Param::Bool(_) => "bool",
            Param::Int(_) => "int",
            Param::Float(_) => "float",
            Param::Str(_) => "string",
        }
    }

    /// Extracts a bool, reporting a typed error against `key` otherwise.
    pub fn expect_bool(&self, key: &str) -> Result<bool> {
        match self {
            Param::Bool(v) => Ok(*v),
            other => Err(other.type_error(key, "bool")),
        }
    }

    pub fn expect_int(&self, key: &str) -> Result<i64> {
        match self {
            Param::Int(v) => Ok(*v),
            other => Err(other.type_error(key, "int")),
        }
    }

    /// Integers widen to floats; TOML users routinely write `3` for `3.0`.
    pub fn expect_float(&self, key: &str) -> Result<f64> {
        match self {
            Param::Float(v) => Ok(*v),
            Param::Int(v) => Ok(*v as f64),
            other => Err(other.type_error(key, "float")),
        }
    }

    pub fn expect_str(&self, key: &str) -> Result<String> {
        match self {
            Param::Str(v) => Ok(v.clone()),
            other => Err(other.type_error(key, "string")),
        }
    }

    fn type_error(&self, key: &str, expected: &'static str) -> LioError {
        LioError::ParamType {
            key: key.to_string(),
            expected,
            found: self.type_name(),
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Bool(v) => write!(f, "{}", v),
            Param::Int(v) => write!(f, "{}", v),
            Param::Float(v) => write!(f, "{:?}", v),
            Param::Str(v) => write!(f, "\"{}\"", v),
        }
    }
}

impl From<bool> for Param {
    fn from(v: bool) -> Self {
        Param::Bool(v)
    }
}

impl From<i64> for Param {
    fn from(v: i64) -> Self {
        Param::Int(v)
    }
}

impl From<i32> for Param {
    fn from(v: i32) -> Self {
        Param::Int(v as i64)
    }
}

impl From<f64> for Param {
    fn from(v: f64) -> Self {
        Param::Float(v)
    }
}

impl From<&str> for Param {
    fn from(v: &str) -> Self {
        Param::Str(v.to_string())
    }
}

impl From<String> for Param {
    fn from(v: String) -> Self {
        Param::Str(v)
    }
}

/// Layers `overrides` on top of `defaults`. Keys absent from `defaults` are kept
/// so the pipeline itself gets to reject them.
pub fn merge_params(defaults: &ParamMap, overrides: &ParamMap) -> ParamMap {
    let mut merged = defaults.clone();
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    merged
}
