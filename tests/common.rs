//! Common test utilities for building blueprint graphs.
use sekkei::prelude::*;

/// Node ids of the trend-following graph built by [`create_trend_graph`].
#[allow(dead_code)]
pub struct TrendGraph {
    pub graph: Graph,
    pub closes: NodeId,
    pub ma: NodeId,
    pub above: NodeId,
    pub buy: NodeId,
}

/// Creates a complete, valid strategy graph.
///
/// Logic: `closes.current > ma(closes, 20).current` -> buy 100
#[allow(dead_code)]
pub fn create_trend_graph() -> TrendGraph {
    let mut graph = Graph::new();
    let closes = add(&mut graph, "data.close_prices");
    let ma = add(&mut graph, "indicator.ma");
    let above = add(&mut graph, "logic.greater");
    let buy = add(&mut graph, "trade.buy");

    graph.set_parameter(&closes, "count", 20).unwrap();
    graph.set_parameter(&ma, "period", 20).unwrap();
    graph.set_parameter(&buy, "quantity", 100).unwrap();

    connect(&mut graph, &closes, "prices", &ma, "data");
    connect(&mut graph, &closes, "current", &above, "a");
    connect(&mut graph, &ma, "current", &above, "b");
    connect(&mut graph, &above, "result", &buy, "condition");

    TrendGraph {
        graph,
        closes,
        ma,
        above,
        buy,
    }
}

/// Two moving averages that each smooth the other's output.
#[allow(dead_code)]
pub fn create_cyclic_graph() -> (Graph, NodeId, NodeId) {
    let mut graph = Graph::new();
    let first = add(&mut graph, "indicator.ma");
    let second = add(&mut graph, "indicator.ema");
    let buy = add(&mut graph, "trade.buy");
    let above = add(&mut graph, "logic.greater");

    connect(&mut graph, &first, "ma", &second, "data");
    connect(&mut graph, &second, "ema", &first, "data");
    connect(&mut graph, &first, "current", &above, "a");
    connect(&mut graph, &second, "current", &above, "b");
    connect(&mut graph, &above, "result", &buy, "condition");

    (graph, first, second)
}

/// Source and indicator only: structurally sound but never trades.
#[allow(dead_code)]
pub fn create_graph_without_trade() -> Graph {
    let mut graph = Graph::new();
    let closes = add(&mut graph, "data.close_prices");
    let rsi = add(&mut graph, "indicator.rsi");
    connect(&mut graph, &closes, "prices", &rsi, "data");
    graph
}

#[allow(dead_code)]
pub fn add(graph: &mut Graph, type_tag: &str) -> NodeId {
    let x = graph.node_count() as f64 * 200.0;
    graph
        .add_node(type_tag, Point::new(x, 0.0))
        .unwrap_or_else(|e| panic!("failed to add '{}': {}", type_tag, e))
}

#[allow(dead_code)]
pub fn connect(graph: &mut Graph, from: &NodeId, output: &str, to: &NodeId, input: &str) {
    graph
        .add_connection(PortRef::output(from, output), PortRef::input(to, input))
        .unwrap_or_else(|e| panic!("failed to connect {}.{} -> {}.{}: {}", from, output, to, input, e));
}

/// Position of `id` in `order`.
#[allow(dead_code)]
pub fn index_of(order: &[NodeId], id: &NodeId) -> usize {
    order
        .iter()
        .position(|n| n == id)
        .unwrap_or_else(|| panic!("node {} missing from order", id))
}
