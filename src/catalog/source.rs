//! Nodes that read the strategy's external state directly. They take no
//! inputs and never emit statements.

use super::{Category, NodeBehavior, NodeCatalog, NodeScope};
use crate::graph::PortDefinition;
use crate::types::DataType;

macro_rules! define_source_nodes {
    ( $( ($struct_name:ident, $node_type:expr, $title:expr, $description:expr,
          fallback: $fallback:expr,
          [ $( ($port:literal, $data_type:expr, $label:expr, $accessor:expr) ),+ $(,)? ]) ),* $(,)? ) => {
        $(
            struct $struct_name;

            impl NodeBehavior for $struct_name {
                fn node_type(&self) -> &str { $node_type }
                fn category(&self) -> Category { Category::Data }
                fn title(&self) -> &str { $title }
                fn description(&self) -> &str { $description }

                fn input_ports(&self) -> Vec<PortDefinition> {
                    Vec::new()
                }

                fn output_ports(&self) -> Vec<PortDefinition> {
                    vec![ $( PortDefinition::output($port, $data_type, $label) ),+ ]
                }

                fn output_expression(&self, _scope: &NodeScope<'_>, port: &str) -> String {
                    let accessor = match port {
                        $( $port => $accessor, )+
                        _ => $fallback,
                    };
                    accessor.to_string()
                }
            }
        )*

        pub(super) fn register(catalog: &mut NodeCatalog) {
            $( catalog.register(Box::new($struct_name)); )*
        }
    };
}

define_source_nodes! {
    (BarNode, "data.bar", "Bar", "Open, high, low, close and volume of the current bar",
        fallback: "bar.close",
        [
            ("open", DataType::Number, "Open", "bar.open"),
            ("high", DataType::Number, "High", "bar.high"),
            ("low", DataType::Number, "Low", "bar.low"),
            ("close", DataType::Number, "Close", "bar.close"),
            ("volume", DataType::Number, "Volume", "bar.volume"),
        ]),
    (PositionNode, "data.position", "Position", "Size of the currently held position",
        fallback: "self.position",
        [
            ("quantity", DataType::Number, "Quantity", "self.position"),
            ("has_position", DataType::Boolean, "Has position", "(self.position > 0)"),
        ]),
    (CashNode, "data.cash", "Cash", "Available cash and total account value",
        fallback: "self.cash",
        [
            ("cash", DataType::Number, "Cash", "self.cash"),
            ("total", DataType::Number, "Total value", "self.total_value"),
        ]),
}
