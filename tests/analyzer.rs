//! Tests for ordering, cycle detection, validation and lookback.
mod common;
use common::*;
use sekkei::analyzer::{CYCLE_ISSUE, NO_TRADE_ISSUE};
use sekkei::prelude::*;

#[test]
fn test_topological_order_puts_producers_first() {
    let trend = create_trend_graph();
    let analyzer = GraphAnalyzer::new(&trend.graph);
    let topo = analyzer.topological_order();

    assert!(!topo.has_cycle);
    assert_eq!(topo.order.len(), 4);
    for connection in trend.graph.connections() {
        assert!(
            index_of(&topo.order, &connection.source.node) < index_of(&topo.order, &connection.target.node),
            "{} must precede {}",
            connection.source.node,
            connection.target.node
        );
    }
}

#[test]
fn test_order_is_independent_of_insertion_order() {
    // Consumers are added before their producers.
    let mut graph = Graph::new();
    let buy = add(&mut graph, "trade.buy");
    let above = add(&mut graph, "logic.greater");
    let ma = add(&mut graph, "indicator.ma");
    let closes = add(&mut graph, "data.close_prices");
    connect(&mut graph, &closes, "prices", &ma, "data");
    connect(&mut graph, &closes, "current", &above, "a");
    connect(&mut graph, &ma, "current", &above, "b");
    connect(&mut graph, &above, "result", &buy, "condition");

    let order = GraphAnalyzer::new(&graph).execution_order().unwrap();
    assert_eq!(order, [closes, ma, above, buy]);
}

#[test]
fn test_disconnected_nodes_are_all_ordered() {
    let mut graph = Graph::new();
    let first = add(&mut graph, "data.bar");
    let second = add(&mut graph, "param.number");
    let order = GraphAnalyzer::new(&graph).execution_order().unwrap();
    assert_eq!(order, [first, second]);
}

#[test]
fn test_cycle_is_detected() {
    let (graph, first, second) = create_cyclic_graph();
    let analyzer = GraphAnalyzer::new(&graph);

    assert!(analyzer.detect_cycle());
    let topo = analyzer.topological_order();
    assert!(topo.has_cycle);
    assert!(!topo.order.contains(&first));
    assert!(!topo.order.contains(&second));

    match analyzer.execution_order() {
        Err(AnalysisError::CycleDetected { unresolved }) => {
            assert!(unresolved.contains(&first.to_string()));
            assert!(unresolved.contains(&second.to_string()));
        }
        other => panic!("Expected CycleDetected, got {:?}", other),
    }
}

#[test]
fn test_cyclic_graph_reports_only_the_cycle() {
    let (graph, _, _) = create_cyclic_graph();
    let report = validate(&graph);
    assert_eq!(report.issues, [CYCLE_ISSUE]);
}

#[test]
fn test_valid_graph_has_no_issues() {
    let trend = create_trend_graph();
    let report = validate(&trend.graph);
    assert!(report.is_valid(), "unexpected issues: {:?}", report.issues);
}

#[test]
fn test_single_missing_input_is_reported() {
    let mut trend = create_trend_graph();
    let b_connection = trend
        .graph
        .incoming(&PortRef::input(&trend.above, "b"))
        .map(|c| c.id)
        .next()
        .unwrap();
    trend.graph.remove_connection(b_connection).unwrap();

    let report = validate(&trend.graph);
    assert_eq!(
        report.issues,
        [format!("node 'Greater >' ({}) has unconnected required input 'b'", trend.above)]
    );
}

#[test]
fn test_fallback_value_satisfies_required_input() {
    let mut trend = create_trend_graph();
    let id = trend
        .graph
        .incoming(&PortRef::input(&trend.above, "b"))
        .map(|c| c.id)
        .next()
        .unwrap();
    trend.graph.remove_connection(id).unwrap();
    trend.graph.set_parameter(&trend.above, "_input_b", 100.0).unwrap();

    assert!(validate(&trend.graph).is_valid());
}

#[test]
fn test_ports_with_defaults_are_not_required() {
    let mut graph = Graph::new();
    let closes = add(&mut graph, "data.close_prices");
    let ma = add(&mut graph, "indicator.ma");
    let gt = add(&mut graph, "logic.greater");
    let buy = add(&mut graph, "trade.buy");
    connect(&mut graph, &closes, "prices", &ma, "data");
    connect(&mut graph, &ma, "current", &gt, "a");
    connect(&mut graph, &closes, "current", &gt, "b");
    connect(&mut graph, &gt, "result", &buy, "condition");
    // Removing the parameter leaves only the static port default.
    graph.remove_parameter(&ma, "period").unwrap();

    assert!(validate(&graph).is_valid());
}

#[test]
fn test_missing_trade_node_is_reported() {
    let graph = create_graph_without_trade();
    let report = validate(&graph);
    assert_eq!(report.issues, [NO_TRADE_ISSUE]);
}

#[test]
fn test_empty_graph_only_lacks_a_trade_node() {
    let graph = Graph::new();
    assert_eq!(validate(&graph).issues, [NO_TRADE_ISSUE]);
}

#[test]
fn test_validation_accumulates_every_issue() {
    let mut graph = Graph::new();
    let ma = add(&mut graph, "indicator.ma");
    let gt = add(&mut graph, "logic.greater");

    let report = validate(&graph);
    assert_eq!(
        report.issues,
        [
            format!("node 'MA' ({}) has unconnected required input 'data'", ma),
            format!("node 'Greater >' ({}) has unconnected required input 'a'", gt),
            format!("node 'Greater >' ({}) has unconnected required input 'b'", gt),
            NO_TRADE_ISSUE.to_string(),
        ]
    );
}

#[test]
fn test_lookback_uses_period_plus_one() {
    let trend = create_trend_graph();
    assert_eq!(GraphAnalyzer::new(&trend.graph).required_lookback(), 21);
}

#[test]
fn test_lookback_takes_the_largest_window() {
    let mut graph = Graph::new();
    let closes = add(&mut graph, "data.close_prices");
    let ma = add(&mut graph, "indicator.ma");
    let macd = add(&mut graph, "indicator.macd");
    graph.set_parameter(&closes, "count", 30).unwrap();
    graph.set_parameter(&ma, "period", 26).unwrap();
    graph.set_parameter(&macd, "slow", 26).unwrap();

    let lookback = GraphAnalyzer::new(&graph).required_lookback();
    assert!(lookback >= 36, "lookback {} too small", lookback);
    assert_eq!(lookback, 36);

    graph.set_parameter(&closes, "count", 120).unwrap();
    assert_eq!(GraphAnalyzer::new(&graph).required_lookback(), 120);
}

#[test]
fn test_lookback_is_at_least_one() {
    let mut graph = Graph::new();
    assert_eq!(GraphAnalyzer::new(&graph).required_lookback(), 1);

    let bar = add(&mut graph, "data.bar");
    graph.set_parameter(&bar, "period", -5).unwrap();
    assert_eq!(GraphAnalyzer::new(&graph).required_lookback(), 1);
}

#[test]
fn test_lookback_reads_text_windows() {
    let mut graph = Graph::new();
    let ma = add(&mut graph, "indicator.ma");
    graph.set_parameter(&ma, "period", "40").unwrap();
    assert_eq!(GraphAnalyzer::new(&graph).required_lookback(), 41);
}

#[test]
fn test_dependencies_walk_upstream_only() {
    let trend = create_trend_graph();
    let analyzer = GraphAnalyzer::new(&trend.graph);

    let deps = analyzer.dependencies(&trend.buy);
    assert_eq!(deps.len(), 3);
    assert!(deps.contains(&trend.above));
    assert!(deps.contains(&trend.ma));
    assert!(deps.contains(&trend.closes));
    assert!(!deps.contains(&trend.buy));

    assert!(analyzer.dependencies(&trend.closes).is_empty());
    assert_eq!(analyzer.dependencies(&trend.ma), [trend.closes.clone()]);
}

#[test]
fn test_dependencies_terminate_on_cycles() {
    let (graph, first, second) = create_cyclic_graph();
    let deps = GraphAnalyzer::new(&graph).dependencies(&first);
    assert_eq!(deps, [second]);
}

#[test]
fn test_category_queries() {
    let trend = create_trend_graph();
    let analyzer = GraphAnalyzer::new(&trend.graph);

    let trades: Vec<_> = analyzer.trade_nodes().iter().map(|n| n.id().clone()).collect();
    assert_eq!(trades, [trend.buy.clone()]);
    let data: Vec<_> = analyzer.data_nodes().iter().map(|n| n.id().clone()).collect();
    assert_eq!(data, [trend.closes.clone()]);
    assert_eq!(analyzer.nodes_in_category(Category::Logic).len(), 1);
    assert!(analyzer.nodes_in_category(Category::Signal).is_empty());
}
