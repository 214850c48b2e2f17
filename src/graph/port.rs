use super::node::{NodeId, ParamValue};
use crate::types::DataType;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDirection {
    Input,
    Output,
}

/// Static description of a port, declared by a node variant.
#[derive(Debug, Clone, PartialEq)]
pub struct PortDefinition {
    /// Unique among the ports of the same node and direction.
    pub name: &'static str,
    pub data_type: DataType,
    pub direction: PortDirection,
    pub label: &'static str,
    pub default_value: Option<ParamValue>,
    /// Inputs only. A required input needs a connection or some fallback value.
    pub required: bool,
    /// Inputs only. Outputs always fan out.
    pub multi_connect: bool,
}

impl PortDefinition {
    pub fn input(name: &'static str, data_type: DataType, label: &'static str) -> Self {
        Self {
            name,
            data_type,
            direction: PortDirection::Input,
            label,
            default_value: None,
            required: true,
            multi_connect: false,
        }
    }

    pub fn output(name: &'static str, data_type: DataType, label: &'static str) -> Self {
        Self {
            name,
            data_type,
            direction: PortDirection::Output,
            label,
            default_value: None,
            required: false,
            multi_connect: true,
        }
    }

    /// An input that may stay unconnected, falling back to `default`.
    pub fn with_default(mut self, default: impl Into<ParamValue>) -> Self {
        self.default_value = Some(default.into());
        self.required = false;
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn multi(mut self) -> Self {
        self.multi_connect = true;
        self
    }
}

/// Addresses one port of one node inside a graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PortRef {
    pub node: NodeId,
    pub port: String,
    pub direction: PortDirection,
}

impl PortRef {
    pub fn input(node: impl Into<NodeId>, port: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            port: port.into(),
            direction: PortDirection::Input,
        }
    }

    pub fn output(node: impl Into<NodeId>, port: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            port: port.into(),
            direction: PortDirection::Output,
        }
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.node, self.port)
    }
}
