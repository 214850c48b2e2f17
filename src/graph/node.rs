use super::port::{PortDefinition, PortDirection};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Parameter keys starting with this prefix hold per-port inline overrides
/// set from the property editor, e.g. `_input_period`.
pub const INPUT_OVERRIDE_PREFIX: &str = "_input_";

/// Stable identifier of a node inside a graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&NodeId> for NodeId {
    fn from(value: &NodeId) -> Self {
        value.clone()
    }
}

/// Placement hint on the canvas. Ignored by analysis and code generation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A scalar node parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    /// Integer view used for window sizes. Floats truncate, text is parsed.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            ParamValue::Float(v) if v.is_finite() => Some(v.trunc() as i64),
            ParamValue::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().filter(|v| v.is_finite()).map(|v| v as i64))
            }
            _ => None,
        }
    }

    /// The text substituted into an expression when this value feeds a port.
    pub fn render(&self) -> String {
        match self {
            ParamValue::Bool(b) => python_bool(*b).to_string(),
            ParamValue::Int(v) => v.to_string(),
            ParamValue::Float(v) => python_float(*v),
            ParamValue::Text(s) => s.clone(),
        }
    }

    /// The value as a literal in the generated source. Text is quoted the
    /// way Python's `repr` quotes a `str`.
    pub fn literal(&self) -> String {
        match self {
            ParamValue::Text(s) => python_repr(s),
            other => other.render(),
        }
    }
}

fn python_repr(text: &str) -> String {
    let quote = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || ('\u{7f}'..='\u{a0}').contains(&c) => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

fn python_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

fn python_float(value: f64) -> String {
    if value.is_nan() {
        "float('nan')".to_string()
    } else if value.is_infinite() {
        if value > 0.0 {
            "float('inf')".to_string()
        } else {
            "-float('inf')".to_string()
        }
    } else if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

/// A vertex of the blueprint graph.
///
/// The port set is fixed by the node's type tag when the catalog constructs
/// it. Parameters are the only mutable state besides the placement hint and
/// are changed through [`Graph`](super::Graph) so observers hear about it.
#[derive(Debug, Clone)]
pub struct Node {
    pub(super) id: NodeId,
    pub(super) type_tag: String,
    pub(super) position: Point,
    pub(super) parameters: BTreeMap<String, ParamValue>,
    pub(super) inputs: Vec<PortDefinition>,
    pub(super) outputs: Vec<PortDefinition>,
}

impl Node {
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn parameters(&self) -> &BTreeMap<String, ParamValue> {
        &self.parameters
    }

    pub fn parameter(&self, key: &str) -> Option<&ParamValue> {
        self.parameters.get(key)
    }

    pub fn input_ports(&self) -> &[PortDefinition] {
        &self.inputs
    }

    pub fn output_ports(&self) -> &[PortDefinition] {
        &self.outputs
    }

    pub fn input_port(&self, name: &str) -> Option<&PortDefinition> {
        self.inputs.iter().find(|p| p.name == name)
    }

    pub fn output_port(&self, name: &str) -> Option<&PortDefinition> {
        self.outputs.iter().find(|p| p.name == name)
    }

    pub fn port(&self, name: &str, direction: PortDirection) -> Option<&PortDefinition> {
        match direction {
            PortDirection::Input => self.input_port(name),
            PortDirection::Output => self.output_port(name),
        }
    }

    /// The value an unconnected input falls back to: the inline override,
    /// then the plain parameter, then the port's static default.
    pub fn fallback_value(&self, port: &str) -> Option<&ParamValue> {
        self.parameters
            .get(&format!("{}{}", INPUT_OVERRIDE_PREFIX, port))
            .or_else(|| self.parameters.get(port))
            .or_else(|| self.input_port(port).and_then(|p| p.default_value.as_ref()))
    }

    /// The identifier emitted code binds this node's result to.
    ///
    /// The id is escaped injectively: alphanumerics pass through and every
    /// other byte, `_` included, becomes `_` plus two hex digits. Distinct
    /// ids therefore never share a name.
    pub fn variable_name(&self, suffix: &str) -> String {
        let tag: String = self
            .type_tag
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        let mut base = format!("_{}_", tag);
        for byte in self.id.as_str().bytes() {
            if byte.is_ascii_alphanumeric() {
                base.push(byte as char);
            } else {
                base.push_str(&format!("_{:02x}", byte));
            }
        }
        if suffix.is_empty() {
            base
        } else {
            format!("{}_{}", base, suffix)
        }
    }
}
