//! Comparison and boolean operators. These never emit statements; their
//! output is the operator applied inline to the input expressions.

use super::{Category, NodeBehavior, NodeCatalog, NodeScope};
use crate::graph::PortDefinition;
use crate::types::DataType;

macro_rules! define_logic_nodes {
    ( $( ($struct_name:ident, $node_type:expr, $title:expr, $description:expr, Unary, $operator:expr) ),* $(,)? ;
      $( ($bi_struct_name:ident, $bi_node_type:expr, $bi_title:expr, $bi_description:expr, Binary, $operand_type:expr, $bi_operator:expr) ),* $(,)? ) => {
        $(
            struct $struct_name;

            impl NodeBehavior for $struct_name {
                fn node_type(&self) -> &str { $node_type }
                fn category(&self) -> Category { Category::Logic }
                fn title(&self) -> &str { $title }
                fn description(&self) -> &str { $description }

                fn input_ports(&self) -> Vec<PortDefinition> {
                    vec![PortDefinition::input("input", DataType::Boolean, "Input")]
                }

                fn output_ports(&self) -> Vec<PortDefinition> {
                    vec![PortDefinition::output("result", DataType::Boolean, "Result")]
                }

                fn output_expression(&self, scope: &NodeScope<'_>, _port: &str) -> String {
                    format!("({} {})", $operator, scope.input_or("input", "None"))
                }
            }
        )*
        $(
            struct $bi_struct_name;

            impl NodeBehavior for $bi_struct_name {
                fn node_type(&self) -> &str { $bi_node_type }
                fn category(&self) -> Category { Category::Logic }
                fn title(&self) -> &str { $bi_title }
                fn description(&self) -> &str { $bi_description }

                fn input_ports(&self) -> Vec<PortDefinition> {
                    vec![
                        PortDefinition::input("a", $operand_type, "A"),
                        PortDefinition::input("b", $operand_type, "B"),
                    ]
                }

                fn output_ports(&self) -> Vec<PortDefinition> {
                    vec![PortDefinition::output("result", DataType::Boolean, "Result")]
                }

                fn output_expression(&self, scope: &NodeScope<'_>, _port: &str) -> String {
                    format!(
                        "({} {} {})",
                        scope.input_or("a", "None"),
                        $bi_operator,
                        scope.input_or("b", "None")
                    )
                }
            }
        )*

        pub(super) fn register(catalog: &mut NodeCatalog) {
            $( catalog.register(Box::new($struct_name)); )*
            $( catalog.register(Box::new($bi_struct_name)); )*
        }
    };
}

define_logic_nodes! {
    (NotNode, "logic.not", "Not", "Negates a condition", Unary, "not"),

    ;

    (GreaterNode, "logic.greater", "Greater >", "A is greater than B", Binary, DataType::Number, ">"),
    (LessNode, "logic.less", "Less <", "A is less than B", Binary, DataType::Number, "<"),
    (EqualNode, "logic.equal", "Equal ==", "A equals B", Binary, DataType::Number, "=="),
    (GreaterEqualNode, "logic.greater_equal", "Greater or equal >=", "A is greater than or equal to B", Binary, DataType::Number, ">="),
    (LessEqualNode, "logic.less_equal", "Less or equal <=", "A is less than or equal to B", Binary, DataType::Number, "<="),
    (AndNode, "logic.and", "And", "Both A and B hold", Binary, DataType::Boolean, "and"),
    (OrNode, "logic.or", "Or", "A or B holds", Binary, DataType::Boolean, "or"),
}
