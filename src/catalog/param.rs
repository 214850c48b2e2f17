//! Constants and inline arithmetic. Nothing here emits statements.

use super::{Category, NodeBehavior, NodeCatalog, NodeScope, ParameterSpec};
use crate::graph::PortDefinition;
use crate::types::DataType;

/// A single user-set number surfaced on one output port.
struct Constant {
    node_type: &'static str,
    title: &'static str,
    description: &'static str,
    spec: fn() -> ParameterSpec,
}

impl NodeBehavior for Constant {
    fn node_type(&self) -> &str {
        self.node_type
    }

    fn category(&self) -> Category {
        Category::Param
    }

    fn title(&self) -> &str {
        self.title
    }

    fn description(&self) -> &str {
        self.description
    }

    fn input_ports(&self) -> Vec<PortDefinition> {
        Vec::new()
    }

    fn output_ports(&self) -> Vec<PortDefinition> {
        let spec = (self.spec)();
        vec![PortDefinition::output(spec.name, DataType::Number, spec.label)]
    }

    fn parameter_schema(&self) -> Vec<ParameterSpec> {
        vec![(self.spec)()]
    }

    fn output_expression(&self, scope: &NodeScope<'_>, _port: &str) -> String {
        let spec = (self.spec)();
        scope
            .node()
            .parameter(spec.name)
            .unwrap_or(&spec.default)
            .render()
    }
}

macro_rules! define_arithmetic_nodes {
    ( $( ($struct_name:ident, $node_type:expr, $title:expr, $operator:literal, $identity:expr) ),* $(,)? ) => {
        $(
            struct $struct_name;

            impl NodeBehavior for $struct_name {
                fn node_type(&self) -> &str { $node_type }
                fn category(&self) -> Category { Category::Param }
                fn title(&self) -> &str { $title }
                fn description(&self) -> &str { concat!("A ", $operator, " B") }

                fn input_ports(&self) -> Vec<PortDefinition> {
                    vec![
                        PortDefinition::input("a", DataType::Number, "A").optional(),
                        PortDefinition::input("b", DataType::Number, "B").optional(),
                    ]
                }

                fn output_ports(&self) -> Vec<PortDefinition> {
                    vec![PortDefinition::output("result", DataType::Number, "Result")]
                }

                fn output_expression(&self, scope: &NodeScope<'_>, _port: &str) -> String {
                    format!(
                        "({} {} {})",
                        scope.input_or("a", "0"),
                        $operator,
                        scope.input_or("b", $identity)
                    )
                }
            }
        )*

        fn register_arithmetic(catalog: &mut NodeCatalog) {
            $( catalog.register(Box::new($struct_name)); )*
        }
    };
}

define_arithmetic_nodes! {
    (AddNode, "param.add", "Add +", "+", "0"),
    (SubNode, "param.sub", "Subtract -", "-", "0"),
    (MulNode, "param.mul", "Multiply *", "*", "0"),
    (DivNode, "param.div", "Divide /", "/", "1"),
}

struct GetLastNode;

impl NodeBehavior for GetLastNode {
    fn node_type(&self) -> &str {
        "param.get_last"
    }

    fn category(&self) -> Category {
        Category::Param
    }

    fn title(&self) -> &str {
        "Last Value"
    }

    fn description(&self) -> &str {
        "The most recent element of a series"
    }

    fn input_ports(&self) -> Vec<PortDefinition> {
        vec![PortDefinition::input("series", DataType::Series, "Series")]
    }

    fn output_ports(&self) -> Vec<PortDefinition> {
        vec![PortDefinition::output("value", DataType::Number, "Value")]
    }

    fn output_expression(&self, scope: &NodeScope<'_>, _port: &str) -> String {
        format!("{}[-1]", scope.input_or("series", "None"))
    }
}

pub(super) fn register(catalog: &mut NodeCatalog) {
    let constants = [
        Constant {
            node_type: "param.number",
            title: "Number",
            description: "A constant number",
            spec: || ParameterSpec::float("value", "Value", 0_i64, -999_999.0, 999_999.0),
        },
        Constant {
            node_type: "param.period",
            title: "Period",
            description: "A window length",
            spec: || ParameterSpec::int("period", "Period", 20, 1, 500),
        },
        Constant {
            node_type: "param.quantity",
            title: "Quantity",
            description: "An order size",
            spec: || ParameterSpec::int("quantity", "Quantity", 100, 100, 100_000),
        },
        Constant {
            node_type: "param.percent",
            title: "Percent",
            description: "A percentage",
            spec: || ParameterSpec::float("percent", "Percent", 5.0, 0.0, 100.0),
        },
    ];

    for constant in constants {
        catalog.register(Box::new(constant));
    }
    register_arithmetic(catalog);
    catalog.register(Box::new(GetLastNode));
}
