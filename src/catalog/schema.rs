use crate::graph::ParamValue;
use serde::Serialize;
use std::fmt;

/// Scalar kind of a user-editable parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Int,
    Float,
    Bool,
    #[serde(rename = "string")]
    Text,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamKind::Int => "int",
            ParamKind::Float => "float",
            ParamKind::Bool => "bool",
            ParamKind::Text => "string",
        };
        f.write_str(name)
    }
}

/// One entry of a node variant's parameter schema, as a property editor
/// would render it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub label: &'static str,
    pub default: ParamValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl ParameterSpec {
    pub fn int(name: &'static str, label: &'static str, default: i64, min: i64, max: i64) -> Self {
        Self {
            name,
            kind: ParamKind::Int,
            label,
            default: ParamValue::Int(default),
            min: Some(min as f64),
            max: Some(max as f64),
        }
    }

    pub fn float(
        name: &'static str,
        label: &'static str,
        default: impl Into<ParamValue>,
        min: f64,
        max: f64,
    ) -> Self {
        Self {
            name,
            kind: ParamKind::Float,
            label,
            default: default.into(),
            min: Some(min),
            max: Some(max),
        }
    }

    /// Whether `value` has the right kind and lies inside the declared range.
    pub fn accepts(&self, value: &ParamValue) -> bool {
        let numeric = match (self.kind, value) {
            (ParamKind::Bool, ParamValue::Bool(_)) => return true,
            (ParamKind::Text, ParamValue::Text(_)) => return true,
            (ParamKind::Int, ParamValue::Int(v)) => *v as f64,
            (ParamKind::Float, ParamValue::Int(v)) => *v as f64,
            (ParamKind::Float, ParamValue::Float(v)) => *v,
            _ => return false,
        };
        self.min.is_none_or(|min| numeric >= min) && self.max.is_none_or(|max| numeric <= max)
    }
}
