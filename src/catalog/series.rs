//! Windowed history nodes: each binds one bounded slice of past bars to a
//! variable.

use super::{Category, CodeGenContext, NodeBehavior, NodeCatalog, NodeScope, ParameterSpec};
use crate::graph::PortDefinition;
use crate::types::DataType;

const DEFAULT_COUNT: i64 = 20;

/// Where the history slice comes from.
enum History {
    /// The dedicated close-price accessor.
    Closes,
    /// A field projected out of the bar window.
    BarField(&'static str),
}

struct WindowedSeries {
    node_type: &'static str,
    title: &'static str,
    description: &'static str,
    output: &'static str,
    output_label: &'static str,
    suffix: &'static str,
    history: History,
}

impl NodeBehavior for WindowedSeries {
    fn node_type(&self) -> &str {
        self.node_type
    }

    fn category(&self) -> Category {
        Category::Data
    }

    fn title(&self) -> &str {
        self.title
    }

    fn description(&self) -> &str {
        self.description
    }

    fn input_ports(&self) -> Vec<PortDefinition> {
        vec![PortDefinition::input("count", DataType::Number, "Count").with_default(DEFAULT_COUNT)]
    }

    fn output_ports(&self) -> Vec<PortDefinition> {
        vec![
            PortDefinition::output(self.output, DataType::Series, self.output_label),
            PortDefinition::output("current", DataType::Number, "Current"),
        ]
    }

    fn parameter_schema(&self) -> Vec<ParameterSpec> {
        vec![ParameterSpec::int("count", "Count", DEFAULT_COUNT, 1, 500)]
    }

    fn emit(&self, scope: &NodeScope<'_>, ctx: &mut CodeGenContext) {
        let count = scope.input_or("count", &DEFAULT_COUNT.to_string());
        let var = scope.variable_name(self.suffix);
        let slice = match self.history {
            History::Closes => format!("self.get_close_prices({})", count),
            History::BarField(field) => format!("[b.{} for b in self.get_bars({})]", field, count),
        };
        ctx.add_code(format!("{} = {}", var, slice));
    }

    fn output_expression(&self, scope: &NodeScope<'_>, port: &str) -> String {
        let var = scope.variable_name(self.suffix);
        if port == "current" {
            format!("{}[-1]", var)
        } else {
            var
        }
    }
}

pub(super) fn register(catalog: &mut NodeCatalog) {
    let variants = [
        WindowedSeries {
            node_type: "data.close_prices",
            title: "Close Prices",
            description: "The most recent N close prices",
            output: "prices",
            output_label: "Prices",
            suffix: "closes",
            history: History::Closes,
        },
        WindowedSeries {
            node_type: "data.open_prices",
            title: "Open Prices",
            description: "The most recent N open prices",
            output: "prices",
            output_label: "Prices",
            suffix: "opens",
            history: History::BarField("open"),
        },
        WindowedSeries {
            node_type: "data.high_prices",
            title: "High Prices",
            description: "The most recent N high prices",
            output: "prices",
            output_label: "Prices",
            suffix: "highs",
            history: History::BarField("high"),
        },
        WindowedSeries {
            node_type: "data.low_prices",
            title: "Low Prices",
            description: "The most recent N low prices",
            output: "prices",
            output_label: "Prices",
            suffix: "lows",
            history: History::BarField("low"),
        },
        WindowedSeries {
            node_type: "data.volume_series",
            title: "Volume Series",
            description: "The most recent N volumes",
            output: "volumes",
            output_label: "Volumes",
            suffix: "volumes",
            history: History::BarField("volume"),
        },
    ];

    for variant in variants {
        catalog.register(Box::new(variant));
    }
}
