//! Order-placing nodes. They have no outputs and are always terminal.

use super::{Category, CodeGenContext, NodeBehavior, NodeCatalog, NodeScope, ParameterSpec};
use crate::graph::PortDefinition;
use crate::types::DataType;

const DEFAULT_QUANTITY: i64 = 100;
const DEFAULT_PRICE: &str = "bar.close";

#[derive(Clone, Copy)]
enum Side {
    Buy,
    Sell,
}

/// How an order is sized.
#[derive(Clone, Copy)]
enum Sizing {
    /// A `quantity` port, defaulting to the given lot.
    Quantity(i64),
    /// An optional `quantity` port that falls back to the whole position.
    QuantityOrPosition,
    /// Always the whole position.
    WholePosition,
}

struct TradeAction {
    node_type: &'static str,
    title: &'static str,
    description: &'static str,
    side: Side,
    sizing: Sizing,
    /// Folds the position check into the condition line instead of nesting.
    combined_guard: bool,
}

impl TradeAction {
    fn position_guard(&self) -> &'static str {
        match self.side {
            Side::Buy => "self.position == 0",
            Side::Sell => "self.position > 0",
        }
    }

    fn action(&self) -> &'static str {
        match self.side {
            Side::Buy => "self.buy",
            Side::Sell => "self.sell",
        }
    }

    fn quantity(&self, scope: &NodeScope<'_>) -> String {
        match self.sizing {
            Sizing::Quantity(lot) => scope.input_or("quantity", &lot.to_string()),
            Sizing::QuantityOrPosition => scope.input_or("quantity", "self.position"),
            Sizing::WholePosition => "self.position".to_string(),
        }
    }
}

impl NodeBehavior for TradeAction {
    fn node_type(&self) -> &str {
        self.node_type
    }

    fn category(&self) -> Category {
        Category::Trade
    }

    fn title(&self) -> &str {
        self.title
    }

    fn description(&self) -> &str {
        self.description
    }

    fn input_ports(&self) -> Vec<PortDefinition> {
        let mut ports = vec![
            PortDefinition::input("condition", DataType::Boolean, "Condition"),
            PortDefinition::input("price", DataType::Number, "Price").optional(),
        ];
        match self.sizing {
            Sizing::Quantity(lot) => {
                ports.push(PortDefinition::input("quantity", DataType::Number, "Quantity").with_default(lot));
            }
            Sizing::QuantityOrPosition => {
                ports.push(PortDefinition::input("quantity", DataType::Number, "Quantity").optional());
            }
            Sizing::WholePosition => {}
        }
        ports
    }

    fn output_ports(&self) -> Vec<PortDefinition> {
        Vec::new()
    }

    fn parameter_schema(&self) -> Vec<ParameterSpec> {
        match self.sizing {
            Sizing::Quantity(lot) => vec![ParameterSpec::int("quantity", "Quantity", lot, 100, 10_000)],
            _ => Vec::new(),
        }
    }

    fn emit(&self, scope: &NodeScope<'_>, ctx: &mut CodeGenContext) {
        let condition = scope.input_or("condition", "False");
        let price = scope.input_or("price", DEFAULT_PRICE);
        let order = format!("{}({}, {})", self.action(), price, self.quantity(scope));

        let block = if self.combined_guard {
            format!("if {} and {}:\n    {}", self.position_guard(), condition, order)
        } else {
            format!(
                "if {}:\n    if {}:\n        {}",
                condition,
                self.position_guard(),
                order
            )
        };
        ctx.add_code(block);
    }

    fn output_expression(&self, _scope: &NodeScope<'_>, _port: &str) -> String {
        String::new()
    }
}

pub(super) fn register(catalog: &mut NodeCatalog) {
    let variants = [
        TradeAction {
            node_type: "trade.buy",
            title: "Buy",
            description: "Buy when the condition holds and nothing is held",
            side: Side::Buy,
            sizing: Sizing::Quantity(DEFAULT_QUANTITY),
            combined_guard: false,
        },
        TradeAction {
            node_type: "trade.sell",
            title: "Sell",
            description: "Sell when the condition holds and a position is open",
            side: Side::Sell,
            sizing: Sizing::QuantityOrPosition,
            combined_guard: false,
        },
        TradeAction {
            node_type: "trade.sell_all",
            title: "Sell All",
            description: "Close the whole position when the condition holds",
            side: Side::Sell,
            sizing: Sizing::WholePosition,
            combined_guard: false,
        },
        TradeAction {
            node_type: "trade.conditional_buy",
            title: "Buy If Flat",
            description: "Buy when flat and the condition holds",
            side: Side::Buy,
            sizing: Sizing::Quantity(DEFAULT_QUANTITY),
            combined_guard: true,
        },
        TradeAction {
            node_type: "trade.conditional_sell",
            title: "Sell If Long",
            description: "Close the position when long and the condition holds",
            side: Side::Sell,
            sizing: Sizing::WholePosition,
            combined_guard: true,
        },
    ];

    for variant in variants {
        catalog.register(Box::new(variant));
    }
}
