//! Technical indicators. Each variant emits a single call into the
//! indicator library and exposes its result through one of three output
//! shapes.

use super::{
    Category, CodeGenContext, INDICATORS_IMPORT, NodeBehavior, NodeCatalog, NodeScope, ParamKind,
    ParameterSpec,
};
use crate::graph::{ParamValue, PortDefinition};
use crate::types::DataType;
use itertools::Itertools;

/// A numeric tuning input, exposed both as a port and as a parameter.
struct Tuning {
    name: &'static str,
    label: &'static str,
    kind: ParamKind,
    default: f64,
    min: f64,
    max: f64,
}

impl Tuning {
    const fn int(name: &'static str, label: &'static str, default: i64, min: i64, max: i64) -> Self {
        Self {
            name,
            label,
            kind: ParamKind::Int,
            default: default as f64,
            min: min as f64,
            max: max as f64,
        }
    }

    const fn float(name: &'static str, label: &'static str, default: f64, min: f64, max: f64) -> Self {
        Self {
            name,
            label,
            kind: ParamKind::Float,
            default,
            min,
            max,
        }
    }

    fn default_value(&self) -> ParamValue {
        match self.kind {
            ParamKind::Int => ParamValue::Int(self.default as i64),
            _ => ParamValue::Float(self.default),
        }
    }

    fn spec(&self) -> ParameterSpec {
        ParameterSpec {
            name: self.name,
            kind: self.kind,
            label: self.label,
            default: self.default_value(),
            min: Some(self.min),
            max: Some(self.max),
        }
    }
}

/// How the emitted result is read by downstream nodes.
enum Shape {
    /// `var = f(..)`; the named port is the whole series, `current` its
    /// last element.
    SeriesWithCurrent {
        port: &'static str,
        label: &'static str,
    },
    /// `var = f(..)`; each port is an attribute of the result.
    Fields(&'static [(&'static str, &'static str)]),
    /// `var_a, var_b = f(..)`; each port is its own variable.
    Tuple(&'static [(&'static str, &'static str)]),
}

struct Indicator {
    node_type: &'static str,
    title: &'static str,
    description: &'static str,
    function: &'static str,
    suffix: &'static str,
    series: &'static [(&'static str, &'static str)],
    tuning: &'static [Tuning],
    shape: Shape,
}

impl Indicator {
    fn call(&self, scope: &NodeScope<'_>) -> String {
        let series = self
            .series
            .iter()
            .map(|(port, _)| scope.input_or(port, "None"));
        let tuning = self
            .tuning
            .iter()
            .map(|t| scope.input_or(t.name, &t.default_value().render()));
        format!(
            "TechnicalIndicators.{}({})",
            self.function,
            series.chain(tuning).join(", ")
        )
    }
}

impl NodeBehavior for Indicator {
    fn node_type(&self) -> &str {
        self.node_type
    }

    fn category(&self) -> Category {
        Category::Indicator
    }

    fn title(&self) -> &str {
        self.title
    }

    fn description(&self) -> &str {
        self.description
    }

    fn input_ports(&self) -> Vec<PortDefinition> {
        let series = self
            .series
            .iter()
            .map(|&(name, label)| PortDefinition::input(name, DataType::Series, label));
        let tuning = self.tuning.iter().map(|t| {
            PortDefinition::input(t.name, DataType::Number, t.label).with_default(t.default_value())
        });
        series.chain(tuning).collect()
    }

    fn output_ports(&self) -> Vec<PortDefinition> {
        match &self.shape {
            Shape::SeriesWithCurrent { port, label } => vec![
                PortDefinition::output(*port, DataType::Series, *label),
                PortDefinition::output("current", DataType::Number, "Current"),
            ],
            Shape::Fields(ports) | Shape::Tuple(ports) => ports
                .iter()
                .map(|&(name, label)| PortDefinition::output(name, DataType::Series, label))
                .collect(),
        }
    }

    fn parameter_schema(&self) -> Vec<ParameterSpec> {
        self.tuning.iter().map(Tuning::spec).collect()
    }

    fn emit(&self, scope: &NodeScope<'_>, ctx: &mut CodeGenContext) {
        let var = scope.variable_name(self.suffix);
        let call = self.call(scope);
        ctx.add_import(INDICATORS_IMPORT);
        match &self.shape {
            Shape::SeriesWithCurrent { .. } | Shape::Fields(_) => {
                ctx.add_code(format!("{} = {}", var, call));
            }
            Shape::Tuple(ports) => {
                let targets = ports.iter().map(|(name, _)| format!("{}_{}", var, name)).join(", ");
                ctx.add_code(format!("{} = {}", targets, call));
            }
        }
    }

    fn output_expression(&self, scope: &NodeScope<'_>, port: &str) -> String {
        let var = scope.variable_name(self.suffix);
        match &self.shape {
            Shape::SeriesWithCurrent { .. } if port == "current" => format!("{}[-1]", var),
            Shape::SeriesWithCurrent { .. } => var,
            Shape::Fields(ports) if ports.iter().any(|(name, _)| *name == port) => {
                format!("{}.{}", var, port)
            }
            Shape::Fields(_) => var,
            Shape::Tuple(ports) => {
                let name = ports
                    .iter()
                    .map(|(name, _)| *name)
                    .find(|name| *name == port)
                    .or_else(|| ports.first().map(|(name, _)| *name))
                    .unwrap_or(port);
                format!("{}_{}", var, name)
            }
        }
    }
}

const DATA: &[(&str, &str)] = &[("data", "Data")];
const HLC: &[(&str, &str)] = &[("high", "High"), ("low", "Low"), ("close", "Close")];

fn moving(
    node_type: &'static str,
    title: &'static str,
    description: &'static str,
    function: &'static str,
    suffix: &'static str,
    tuning: &'static [Tuning],
) -> Indicator {
    Indicator {
        node_type,
        title,
        description,
        function,
        suffix,
        series: DATA,
        tuning,
        shape: Shape::SeriesWithCurrent {
            port: suffix,
            label: title,
        },
    }
}

const PERIOD_20: &[Tuning] = &[Tuning::int("period", "Period", 20, 1, 500)];
const PERIOD_14: &[Tuning] = &[Tuning::int("period", "Period", 14, 1, 100)];
const MACD_TUNING: &[Tuning] = &[
    Tuning::int("fast", "Fast period", 12, 1, 100),
    Tuning::int("slow", "Slow period", 26, 1, 200),
    Tuning::int("signal", "Signal period", 9, 1, 50),
];
const BOLL_TUNING: &[Tuning] = &[
    Tuning::int("period", "Period", 20, 1, 200),
    Tuning::float("std", "Std multiplier", 2.0, 0.5, 5.0),
];
const KDJ_TUNING: &[Tuning] = &[Tuning::int("n", "Period", 9, 1, 100)];
const CCI_TUNING: &[Tuning] = &[Tuning::int("period", "Period", 20, 1, 200)];
const DMI_TUNING: &[Tuning] = &[Tuning::int("period", "Period", 14, 2, 200)];

pub(super) fn register(catalog: &mut NodeCatalog) {
    let variants = [
        moving("indicator.ma", "MA", "Simple moving average", "MA", "ma", PERIOD_20),
        moving("indicator.ema", "EMA", "Exponential moving average", "EMA", "ema", PERIOD_20),
        moving("indicator.wma", "WMA", "Weighted moving average", "WMA", "wma", PERIOD_20),
        Indicator {
            node_type: "indicator.macd",
            title: "MACD",
            description: "Moving average convergence divergence",
            function: "MACD",
            suffix: "macd_result",
            series: DATA,
            tuning: MACD_TUNING,
            shape: Shape::Fields(&[("dif", "DIF"), ("dea", "DEA"), ("macd", "MACD histogram")]),
        },
        moving("indicator.rsi", "RSI", "Relative strength index", "RSI", "rsi", PERIOD_14),
        Indicator {
            node_type: "indicator.boll",
            title: "Bollinger Bands",
            description: "Bollinger bands around a moving average",
            function: "BOLL",
            suffix: "boll",
            series: DATA,
            tuning: BOLL_TUNING,
            shape: Shape::Fields(&[("upper", "Upper"), ("middle", "Middle"), ("lower", "Lower")]),
        },
        Indicator {
            node_type: "indicator.kdj",
            title: "KDJ",
            description: "Stochastic oscillator",
            function: "KDJ",
            suffix: "kdj",
            series: HLC,
            tuning: KDJ_TUNING,
            shape: Shape::Fields(&[("k", "K"), ("d", "D"), ("j", "J")]),
        },
        Indicator {
            node_type: "indicator.atr",
            title: "ATR",
            description: "Average true range",
            function: "ATR",
            suffix: "atr",
            series: HLC,
            tuning: PERIOD_14,
            shape: Shape::SeriesWithCurrent {
                port: "atr",
                label: "ATR",
            },
        },
        Indicator {
            node_type: "indicator.cci",
            title: "CCI",
            description: "Commodity channel index",
            function: "CCI",
            suffix: "cci",
            series: HLC,
            tuning: CCI_TUNING,
            shape: Shape::SeriesWithCurrent {
                port: "cci",
                label: "CCI",
            },
        },
        Indicator {
            node_type: "indicator.obv",
            title: "OBV",
            description: "On-balance volume",
            function: "OBV",
            suffix: "obv",
            series: &[("close", "Close"), ("volume", "Volume")],
            tuning: &[],
            shape: Shape::SeriesWithCurrent {
                port: "obv",
                label: "OBV",
            },
        },
        Indicator {
            node_type: "indicator.vwap",
            title: "VWAP",
            description: "Volume weighted average price",
            function: "VWAP",
            suffix: "vwap",
            series: &[("high", "High"), ("low", "Low"), ("close", "Close"), ("volume", "Volume")],
            tuning: &[],
            shape: Shape::SeriesWithCurrent {
                port: "vwap",
                label: "VWAP",
            },
        },
        Indicator {
            node_type: "indicator.dmi",
            title: "DMI",
            description: "Directional movement index (PDI, MDI and ADX)",
            function: "DMI",
            suffix: "dmi",
            series: HLC,
            tuning: DMI_TUNING,
            shape: Shape::Tuple(&[("pdi", "PDI"), ("mdi", "MDI"), ("adx", "ADX")]),
        },
    ];

    for variant in variants {
        catalog.register(Box::new(variant));
    }
}
