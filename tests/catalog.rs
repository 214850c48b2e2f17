//! Tests for the node catalog and the expressions each variant produces.
mod common;
use common::*;
use sekkei::catalog::{INDICATORS_IMPORT, ParamKind};
use sekkei::prelude::*;

fn scope_expression(graph: &Graph, id: &NodeId, port: &str) -> String {
    let node = graph.node(id).unwrap();
    let behavior = graph.catalog().get(node.type_tag()).unwrap();
    behavior.output_expression(&NodeScope::new(graph, node), port)
}

fn emitted(graph: &Graph, id: &NodeId) -> CodeGenContext {
    let node = graph.node(id).unwrap();
    let behavior = graph.catalog().get(node.type_tag()).unwrap();
    let mut ctx = CodeGenContext::new();
    behavior.emit(&NodeScope::new(graph, node), &mut ctx);
    ctx
}

#[test]
fn test_builtin_catalog_covers_every_family() {
    let catalog = NodeCatalog::builtin();
    let expected = [
        "data.bar",
        "data.position",
        "data.cash",
        "data.close_prices",
        "data.open_prices",
        "data.high_prices",
        "data.low_prices",
        "data.volume_series",
        "indicator.ma",
        "indicator.ema",
        "indicator.wma",
        "indicator.macd",
        "indicator.rsi",
        "indicator.boll",
        "indicator.kdj",
        "indicator.atr",
        "indicator.cci",
        "indicator.obv",
        "indicator.vwap",
        "indicator.dmi",
        "logic.not",
        "logic.greater",
        "logic.less",
        "logic.equal",
        "logic.greater_equal",
        "logic.less_equal",
        "logic.and",
        "logic.or",
        "signal.cross_over",
        "signal.cross_under",
        "signal.break_up",
        "signal.break_down",
        "signal.oversold",
        "signal.overbought",
        "trade.buy",
        "trade.sell",
        "trade.sell_all",
        "trade.conditional_buy",
        "trade.conditional_sell",
        "param.number",
        "param.period",
        "param.quantity",
        "param.percent",
        "param.add",
        "param.sub",
        "param.mul",
        "param.div",
        "param.get_last",
    ];

    for tag in expected {
        assert!(catalog.contains(tag), "missing node type '{}'", tag);
    }
    assert_eq!(catalog.len(), expected.len());
    assert_eq!(catalog.node_types().collect::<Vec<_>>(), expected);
}

#[test]
fn test_categories_group_variants() {
    let catalog = NodeCatalog::builtin();
    let trades: Vec<_> = catalog
        .by_category(Category::Trade)
        .into_iter()
        .map(|info| info.node_type)
        .collect();
    assert_eq!(
        trades,
        ["trade.buy", "trade.sell", "trade.sell_all", "trade.conditional_buy", "trade.conditional_sell"]
    );

    for category in catalog.categories() {
        assert!(!catalog.by_category(*category).is_empty(), "empty category {}", category);
    }
    assert_eq!(Category::Indicator.to_string(), "indicator");
}

#[test]
fn test_search_matches_title_and_description() {
    let catalog = NodeCatalog::builtin();
    let hits: Vec<_> = catalog.search("moving average").into_iter().map(|i| i.node_type).collect();
    assert!(hits.contains(&"indicator.ma".to_string()));
    assert!(hits.contains(&"indicator.ema".to_string()));
    assert!(hits.contains(&"indicator.macd".to_string()));
    assert!(catalog.search("no such block").is_empty());
}

#[test]
fn test_node_info_serializes_with_type_key() {
    let info = NodeCatalog::builtin().node_info("signal.cross_over").unwrap();
    let json = serde_json::to_value(&info).unwrap();
    assert_eq!(json["type"], "signal.cross_over");
    assert_eq!(json["category"], "signal");
    assert_eq!(json["title"], "Cross Over");
}

#[test]
fn test_alias_constructs_the_same_variant() {
    let catalog = NodeCatalog::builtin()
        .with_alias("SMA", "indicator.ma")
        .with_alias("Broken", "indicator.nope");
    assert!(catalog.contains("SMA"));
    assert!(!catalog.contains("Broken"));

    let mut graph = Graph::with_catalog(std::sync::Arc::new(catalog));
    let sma = add(&mut graph, "SMA");
    let node = graph.node(&sma).unwrap();
    assert_eq!(node.type_tag(), "SMA");
    assert_eq!(node.parameter("period"), Some(&ParamValue::Int(20)));
    assert_eq!(graph.catalog().get("SMA").unwrap().title(), "MA");
}

#[test]
fn test_parameter_schema_defaults_and_bounds() {
    let catalog = NodeCatalog::builtin();
    let macd = catalog.get("indicator.macd").unwrap();
    let names: Vec<_> = macd.parameter_schema().iter().map(|s| s.name).collect();
    assert_eq!(names, ["fast", "slow", "signal"]);

    let boll = catalog.get("indicator.boll").unwrap().parameter_schema();
    let std_spec = boll.iter().find(|s| s.name == "std").unwrap();
    assert_eq!(std_spec.kind, ParamKind::Float);
    assert_eq!(std_spec.default, ParamValue::Float(2.0));
    assert!(std_spec.accepts(&ParamValue::Float(2.5)));
    assert!(!std_spec.accepts(&ParamValue::Float(9.0)));

    let buy = catalog.get("trade.buy").unwrap().default_parameters();
    assert_eq!(buy.get("quantity"), Some(&ParamValue::Int(100)));
    assert!(catalog.get("logic.and").unwrap().default_parameters().is_empty());
}

#[test]
fn test_bar_outputs_are_field_accessors() {
    let mut graph = Graph::new();
    let bar = add(&mut graph, "data.bar");
    let position = add(&mut graph, "data.position");
    let cash = add(&mut graph, "data.cash");

    assert_eq!(scope_expression(&graph, &bar, "high"), "bar.high");
    assert_eq!(scope_expression(&graph, &bar, "volume"), "bar.volume");
    assert_eq!(scope_expression(&graph, &bar, "unknown"), "bar.close");
    assert_eq!(scope_expression(&graph, &position, "has_position"), "(self.position > 0)");
    assert_eq!(scope_expression(&graph, &cash, "total"), "self.total_value");
    assert!(emitted(&graph, &bar).statements().is_empty());
}

#[test]
fn test_series_nodes_bind_a_window() {
    let mut graph = Graph::new();
    let closes = add(&mut graph, "data.close_prices");
    let highs = add(&mut graph, "data.high_prices");
    graph.set_parameter(&highs, "count", 50).unwrap();

    let ctx = emitted(&graph, &closes);
    let var = format!("_data_close_prices_{}_closes", closes);
    assert_eq!(ctx.statements(), [format!("{} = self.get_close_prices(20)", var)]);
    assert_eq!(scope_expression(&graph, &closes, "prices"), var);
    assert_eq!(scope_expression(&graph, &closes, "current"), format!("{}[-1]", var));

    let ctx = emitted(&graph, &highs);
    assert_eq!(
        ctx.statements(),
        [format!("_data_high_prices_{}_highs = [b.high for b in self.get_bars(50)]", highs)]
    );
}

#[test]
fn test_indicator_emits_library_call_and_import() {
    let trend = create_trend_graph();
    let ctx = emitted(&trend.graph, &trend.ma);

    assert_eq!(
        ctx.statements(),
        [format!(
            "_indicator_ma_{}_ma = TechnicalIndicators.MA(_data_close_prices_{}_closes, 20)",
            trend.ma, trend.closes
        )]
    );
    assert_eq!(ctx.imports().collect::<Vec<_>>(), [INDICATORS_IMPORT]);
}

#[test]
fn test_indicator_without_series_renders_none() {
    let mut graph = Graph::new();
    let rsi = add(&mut graph, "indicator.rsi");
    let ctx = emitted(&graph, &rsi);
    assert_eq!(
        ctx.statements(),
        [format!("_indicator_rsi_{}_rsi = TechnicalIndicators.RSI(None, 14)", rsi)]
    );
}

#[test]
fn test_multi_output_indicators() {
    let mut graph = Graph::new();
    let closes = add(&mut graph, "data.close_prices");
    let macd = add(&mut graph, "indicator.macd");
    let dmi = add(&mut graph, "indicator.dmi");
    connect(&mut graph, &closes, "prices", &macd, "data");

    let ctx = emitted(&graph, &macd);
    let var = format!("_indicator_macd_{}_macd_result", macd);
    assert_eq!(
        ctx.statements(),
        [format!(
            "{} = TechnicalIndicators.MACD(_data_close_prices_{}_closes, 12, 26, 9)",
            var, closes
        )]
    );
    assert_eq!(scope_expression(&graph, &macd, "dea"), format!("{}.dea", var));

    let ctx = emitted(&graph, &dmi);
    let var = format!("_indicator_dmi_{}_dmi", dmi);
    assert_eq!(
        ctx.statements(),
        [format!(
            "{v}_pdi, {v}_mdi, {v}_adx = TechnicalIndicators.DMI(None, None, None, 14)",
            v = var
        )]
    );
    assert_eq!(scope_expression(&graph, &dmi, "adx"), format!("{}_adx", var));
}

#[test]
fn test_boll_float_tuning_renders_with_decimal() {
    let mut graph = Graph::new();
    let boll = add(&mut graph, "indicator.boll");
    let ctx = emitted(&graph, &boll);
    assert!(ctx.statements()[0].ends_with("TechnicalIndicators.BOLL(None, 20, 2.0)"));
}

#[test]
fn test_input_value_precedence() {
    let mut graph = Graph::new();
    let ma = add(&mut graph, "indicator.ma");
    let period = add(&mut graph, "param.period");

    // Port default only.
    graph.remove_parameter(&ma, "period").unwrap();
    let node = graph.node(&ma).unwrap();
    assert_eq!(NodeScope::new(&graph, node).input_value("period").as_deref(), Some("20"));

    // Plain parameter.
    graph.set_parameter(&ma, "period", 30).unwrap();
    let node = graph.node(&ma).unwrap();
    assert_eq!(NodeScope::new(&graph, node).input_value("period").as_deref(), Some("30"));

    // Inline override beats the parameter.
    graph.set_parameter(&ma, "_input_period", 40).unwrap();
    let node = graph.node(&ma).unwrap();
    assert_eq!(NodeScope::new(&graph, node).input_value("period").as_deref(), Some("40"));

    // A connection beats everything.
    graph.set_parameter(&period, "period", 55).unwrap();
    connect(&mut graph, &period, "period", &ma, "period");
    let node = graph.node(&ma).unwrap();
    assert_eq!(NodeScope::new(&graph, node).input_value("period").as_deref(), Some("55"));
}

#[test]
fn test_unresolved_input_is_none() {
    let mut graph = Graph::new();
    let gt = add(&mut graph, "logic.greater");
    let node = graph.node(&gt).unwrap();
    assert_eq!(NodeScope::new(&graph, node).input_value("a"), None);
    assert_eq!(scope_expression(&graph, &gt, "result"), "(None > None)");
}

#[test]
fn test_logic_nodes_compose_inline() {
    let mut graph = Graph::new();
    let bar = add(&mut graph, "data.bar");
    let position = add(&mut graph, "data.position");
    let gt = add(&mut graph, "logic.greater");
    let not = add(&mut graph, "logic.not");
    let and = add(&mut graph, "logic.and");

    connect(&mut graph, &bar, "close", &gt, "a");
    connect(&mut graph, &bar, "open", &gt, "b");
    connect(&mut graph, &position, "has_position", &not, "input");
    connect(&mut graph, &gt, "result", &and, "a");
    connect(&mut graph, &not, "result", &and, "b");

    assert_eq!(
        scope_expression(&graph, &and, "result"),
        "((bar.close > bar.open) and (not (self.position > 0)))"
    );
    assert!(emitted(&graph, &and).statements().is_empty());
}

#[test]
fn test_crossing_binds_latest_signal() {
    let mut graph = Graph::new();
    let closes = add(&mut graph, "data.close_prices");
    let fast = add(&mut graph, "indicator.ema");
    let slow = add(&mut graph, "indicator.ma");
    let cross = add(&mut graph, "signal.cross_over");
    connect(&mut graph, &closes, "prices", &fast, "data");
    connect(&mut graph, &closes, "prices", &slow, "data");
    connect(&mut graph, &fast, "ema", &cross, "fast");
    connect(&mut graph, &slow, "ma", &cross, "slow");

    let ctx = emitted(&graph, &cross);
    let var = format!("_signal_cross_over_{}_cross_over", cross);
    assert_eq!(
        ctx.statements(),
        [format!(
            "{} = TechnicalIndicators.cross_over(_indicator_ema_{}_ema, _indicator_ma_{}_ma)[-1]",
            var, fast, slow
        )]
    );
    assert_eq!(ctx.imports().collect::<Vec<_>>(), [INDICATORS_IMPORT]);
    assert_eq!(scope_expression(&graph, &cross, "signal"), var);
}

#[test]
fn test_threshold_signals() {
    let mut graph = Graph::new();
    let rsi = add(&mut graph, "indicator.rsi");
    let oversold = add(&mut graph, "signal.oversold");
    let overbought = add(&mut graph, "signal.overbought");
    let breakout = add(&mut graph, "signal.break_up");
    connect(&mut graph, &rsi, "current", &oversold, "value");
    connect(&mut graph, &rsi, "current", &overbought, "value");
    graph.set_parameter(&overbought, "threshold", 80).unwrap();

    let current = format!("_indicator_rsi_{}_rsi[-1]", rsi);
    assert_eq!(scope_expression(&graph, &oversold, "signal"), format!("({} < 30)", current));
    assert_eq!(scope_expression(&graph, &overbought, "signal"), format!("({} > 80)", current));
    assert_eq!(scope_expression(&graph, &breakout, "signal"), "(None > None)");
}

#[test]
fn test_trade_nodes_guard_on_position() {
    let mut graph = Graph::new();
    let bar = add(&mut graph, "data.bar");
    let gt = add(&mut graph, "logic.greater");
    let sell = add(&mut graph, "trade.sell");
    let sell_all = add(&mut graph, "trade.sell_all");
    let cond_buy = add(&mut graph, "trade.conditional_buy");
    connect(&mut graph, &bar, "close", &gt, "a");
    connect(&mut graph, &bar, "open", &gt, "b");
    for trade in [&sell, &sell_all, &cond_buy] {
        connect(&mut graph, &gt, "result", trade, "condition");
    }
    connect(&mut graph, &bar, "low", &sell, "price");

    let condition = "(bar.close > bar.open)";
    assert_eq!(
        emitted(&graph, &sell).statements(),
        [format!(
            "if {}:\n    if self.position > 0:\n        self.sell(bar.low, self.position)",
            condition
        )]
    );
    assert_eq!(
        emitted(&graph, &sell_all).statements(),
        [format!(
            "if {}:\n    if self.position > 0:\n        self.sell(bar.close, self.position)",
            condition
        )]
    );
    assert_eq!(
        emitted(&graph, &cond_buy).statements(),
        [format!(
            "if self.position == 0 and {}:\n    self.buy(bar.close, 100)",
            condition
        )]
    );
    assert_eq!(scope_expression(&graph, &sell, "anything"), "");
}

#[test]
fn test_unconnected_trade_condition_never_fires() {
    let mut graph = Graph::new();
    let buy = add(&mut graph, "trade.buy");
    assert_eq!(
        emitted(&graph, &buy).statements(),
        ["if False:\n    if self.position == 0:\n        self.buy(bar.close, 100)"]
    );
}

#[test]
fn test_param_constants_and_arithmetic() {
    let mut graph = Graph::new();
    let number = add(&mut graph, "param.number");
    let percent = add(&mut graph, "param.percent");
    let mul = add(&mut graph, "param.mul");
    let div = add(&mut graph, "param.div");
    let closes = add(&mut graph, "data.close_prices");
    let last = add(&mut graph, "param.get_last");

    graph.set_parameter(&number, "value", 1.5).unwrap();
    connect(&mut graph, &number, "value", &mul, "a");
    connect(&mut graph, &percent, "percent", &mul, "b");
    connect(&mut graph, &mul, "result", &div, "a");
    connect(&mut graph, &closes, "prices", &last, "series");

    assert_eq!(scope_expression(&graph, &percent, "percent"), "5.0");
    assert_eq!(scope_expression(&graph, &mul, "result"), "(1.5 * 5.0)");
    assert_eq!(scope_expression(&graph, &div, "result"), "((1.5 * 5.0) / 1)");
    assert_eq!(
        scope_expression(&graph, &last, "value"),
        format!("_data_close_prices_{}_closes[-1]", closes)
    );
}

#[test]
fn test_codegen_context_deduplicates() {
    let mut ctx = CodeGenContext::new();
    let id = NodeId::new("n1");
    assert!(ctx.mark_generated(&id));
    assert!(!ctx.mark_generated(&id));
    assert!(ctx.is_generated(&id));

    ctx.add_import("import b");
    ctx.add_import("import a");
    ctx.add_import("import b");
    ctx.add_code("x = 1");
    let (statements, imports) = ctx.into_parts();
    assert_eq!(statements, ["x = 1"]);
    assert_eq!(imports, ["import a", "import b"]);
}
