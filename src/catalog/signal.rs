use super::{
    Category, CodeGenContext, INDICATORS_IMPORT, NodeBehavior, NodeCatalog, NodeScope, ParameterSpec,
};
use crate::graph::PortDefinition;
use crate::types::DataType;

/// Fast/slow crossing detector. The crossing helper scans the whole
/// series, so its result is bound once and reused.
struct Crossing {
    node_type: &'static str,
    title: &'static str,
    description: &'static str,
    function: &'static str,
}

impl NodeBehavior for Crossing {
    fn node_type(&self) -> &str {
        self.node_type
    }

    fn category(&self) -> Category {
        Category::Signal
    }

    fn title(&self) -> &str {
        self.title
    }

    fn description(&self) -> &str {
        self.description
    }

    fn input_ports(&self) -> Vec<PortDefinition> {
        vec![
            PortDefinition::input("fast", DataType::Series, "Fast"),
            PortDefinition::input("slow", DataType::Series, "Slow"),
        ]
    }

    fn output_ports(&self) -> Vec<PortDefinition> {
        vec![PortDefinition::output("signal", DataType::Boolean, "Signal")]
    }

    fn emit(&self, scope: &NodeScope<'_>, ctx: &mut CodeGenContext) {
        ctx.add_import(INDICATORS_IMPORT);
        ctx.add_code(format!(
            "{} = TechnicalIndicators.{}({}, {})[-1]",
            scope.variable_name(self.function),
            self.function,
            scope.input_or("fast", "None"),
            scope.input_or("slow", "None"),
        ));
    }

    fn output_expression(&self, scope: &NodeScope<'_>, _port: &str) -> String {
        scope.variable_name(self.function)
    }
}

/// `value <op> level`, inline. Thresholded variants carry the level as a
/// parameter with a default.
struct Threshold {
    node_type: &'static str,
    title: &'static str,
    description: &'static str,
    value: (&'static str, &'static str),
    level: (&'static str, &'static str),
    operator: &'static str,
    default_level: Option<i64>,
}

impl NodeBehavior for Threshold {
    fn node_type(&self) -> &str {
        self.node_type
    }

    fn category(&self) -> Category {
        Category::Signal
    }

    fn title(&self) -> &str {
        self.title
    }

    fn description(&self) -> &str {
        self.description
    }

    fn input_ports(&self) -> Vec<PortDefinition> {
        let (value, value_label) = self.value;
        let (level, level_label) = self.level;
        let level_port = PortDefinition::input(level, DataType::Number, level_label);
        vec![
            PortDefinition::input(value, DataType::Number, value_label),
            match self.default_level {
                Some(default) => level_port.with_default(default),
                None => level_port,
            },
        ]
    }

    fn output_ports(&self) -> Vec<PortDefinition> {
        vec![PortDefinition::output("signal", DataType::Boolean, "Signal")]
    }

    fn parameter_schema(&self) -> Vec<ParameterSpec> {
        self.default_level
            .map(|default| ParameterSpec::float(self.level.0, self.level.1, default, 0.0, 100.0))
            .into_iter()
            .collect()
    }

    fn output_expression(&self, scope: &NodeScope<'_>, _port: &str) -> String {
        let fallback = self
            .default_level
            .map_or_else(|| "None".to_string(), |level| level.to_string());
        format!(
            "({} {} {})",
            scope.input_or(self.value.0, "None"),
            self.operator,
            scope.input_or(self.level.0, &fallback)
        )
    }
}

pub(super) fn register(catalog: &mut NodeCatalog) {
    catalog.register(Box::new(Crossing {
        node_type: "signal.cross_over",
        title: "Cross Over",
        description: "Fast line crosses above slow line",
        function: "cross_over",
    }));
    catalog.register(Box::new(Crossing {
        node_type: "signal.cross_under",
        title: "Cross Under",
        description: "Fast line crosses below slow line",
        function: "cross_under",
    }));

    let thresholds = [
        Threshold {
            node_type: "signal.break_up",
            title: "Break Up",
            description: "Price breaks above a level",
            value: ("price", "Price"),
            level: ("level", "Upper level"),
            operator: ">",
            default_level: None,
        },
        Threshold {
            node_type: "signal.break_down",
            title: "Break Down",
            description: "Price breaks below a level",
            value: ("price", "Price"),
            level: ("level", "Lower level"),
            operator: "<",
            default_level: None,
        },
        Threshold {
            node_type: "signal.oversold",
            title: "Oversold",
            description: "Indicator enters the oversold zone",
            value: ("value", "Value"),
            level: ("threshold", "Threshold"),
            operator: "<",
            default_level: Some(30),
        },
        Threshold {
            node_type: "signal.overbought",
            title: "Overbought",
            description: "Indicator enters the overbought zone",
            value: ("value", "Value"),
            level: ("threshold", "Threshold"),
            operator: ">",
            default_level: Some(70),
        },
    ];

    for threshold in thresholds {
        catalog.register(Box::new(threshold));
    }
}
