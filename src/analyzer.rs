//! Dependency analysis over a blueprint graph: ordering, cycle detection,
//! structural validation and history requirements.

use crate::catalog::Category;
use crate::error::AnalysisError;
use crate::graph::{Graph, Node, NodeId, PortRef};
use ahash::{AHashMap, AHashSet};
use std::collections::VecDeque;

pub const CYCLE_ISSUE: &str = "graph contains a dependency cycle";
pub const NO_TRADE_ISSUE: &str = "no trade node: the strategy will never place an order";

/// Extra bars requested on top of a slow window to let internal smoothing
/// settle.
const SLOW_WINDOW_MARGIN: i64 = 10;

/// Result of Kahn's algorithm. When `has_cycle` is set, `order` holds only
/// the nodes that could be ordered.
#[derive(Debug, Clone, PartialEq)]
pub struct TopologicalOrder {
    pub order: Vec<NodeId>,
    pub has_cycle: bool,
}

/// Accumulated structural issues. Never short-circuits.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationReport {
    pub issues: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

pub struct GraphAnalyzer<'g> {
    graph: &'g Graph,
}

impl<'g> GraphAnalyzer<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    /// Orders nodes so every producer precedes its consumers.
    ///
    /// Ready nodes are dequeued in graph insertion order; callers must only
    /// rely on producer-before-consumer ordering.
    pub fn topological_order(&self) -> TopologicalOrder {
        let mut in_degree: AHashMap<&NodeId, usize> =
            self.graph.nodes().map(|n| (n.id(), 0)).collect();
        let mut successors: AHashMap<&NodeId, Vec<&NodeId>> = AHashMap::new();

        for connection in self.graph.connections() {
            let (from, to) = (&connection.source.node, &connection.target.node);
            if !in_degree.contains_key(from) {
                continue;
            }
            if let Some(degree) = in_degree.get_mut(to) {
                *degree += 1;
                successors.entry(from).or_default().push(to);
            }
        }

        let mut queue: VecDeque<&NodeId> = self
            .graph
            .nodes()
            .map(Node::id)
            .filter(|id| in_degree.get(id) == Some(&0))
            .collect();

        let mut order = Vec::with_capacity(self.graph.node_count());
        while let Some(id) = queue.pop_front() {
            order.push(id.clone());
            for &next in successors.get(id).into_iter().flatten() {
                if let Some(degree) = in_degree.get_mut(next) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(next);
                    }
                }
            }
        }

        let has_cycle = order.len() < self.graph.node_count();
        TopologicalOrder { order, has_cycle }
    }

    /// The generation order, or an error naming the nodes caught in a cycle.
    pub fn execution_order(&self) -> Result<Vec<NodeId>, AnalysisError> {
        let TopologicalOrder { order, has_cycle } = self.topological_order();
        if !has_cycle {
            return Ok(order);
        }

        let ordered: AHashSet<&NodeId> = order.iter().collect();
        let unresolved: Vec<String> = self
            .graph
            .nodes()
            .map(Node::id)
            .filter(|id| !ordered.contains(id))
            .map(NodeId::to_string)
            .collect();
        log::warn!("cannot order graph, {} node(s) form a cycle", unresolved.len());
        Err(AnalysisError::CycleDetected { unresolved })
    }

    pub fn detect_cycle(&self) -> bool {
        self.topological_order().has_cycle
    }

    /// Every node reachable upstream of `node` through its input ports,
    /// in depth-first discovery order. `node` itself is never included.
    pub fn dependencies(&self, node: &NodeId) -> Vec<NodeId> {
        let mut visited: AHashSet<NodeId> = AHashSet::new();
        visited.insert(node.clone());
        let mut found = Vec::new();
        self.collect_dependencies(node, &mut visited, &mut found);
        found
    }

    fn collect_dependencies(
        &self,
        node: &NodeId,
        visited: &mut AHashSet<NodeId>,
        found: &mut Vec<NodeId>,
    ) {
        for upstream in upstream_nodes(self.graph, node) {
            if visited.insert(upstream.clone()) {
                found.push(upstream.clone());
                self.collect_dependencies(&upstream, visited, found);
            }
        }
    }

    pub fn nodes_in_category(&self, category: Category) -> Vec<&'g Node> {
        let catalog = self.graph.catalog();
        self.graph
            .nodes()
            .filter(|n| catalog.get(n.type_tag()).is_some_and(|b| b.category() == category))
            .collect()
    }

    pub fn trade_nodes(&self) -> Vec<&'g Node> {
        self.nodes_in_category(Category::Trade)
    }

    pub fn data_nodes(&self) -> Vec<&'g Node> {
        self.nodes_in_category(Category::Data)
    }

    /// Collects every structural issue: a cycle, required inputs with
    /// neither a connection nor a fallback value, and a missing trade node.
    pub fn validate(&self) -> ValidationReport {
        let mut issues = Vec::new();

        if self.detect_cycle() {
            issues.push(CYCLE_ISSUE.to_string());
        }

        let catalog = self.graph.catalog();
        for node in self.graph.nodes() {
            for port in node.input_ports().iter().filter(|p| p.required) {
                let port_ref = PortRef::input(node.id(), port.name);
                let connected = self.graph.incoming(&port_ref).next().is_some();
                if connected || node.fallback_value(port.name).is_some() {
                    continue;
                }
                let title = catalog
                    .get(node.type_tag())
                    .map_or(node.type_tag(), |b| b.title());
                issues.push(format!(
                    "node '{}' ({}) has unconnected required input '{}'",
                    title,
                    node.id(),
                    port.name
                ));
            }
        }

        if self.trade_nodes().is_empty() {
            issues.push(NO_TRADE_ISSUE.to_string());
        }

        ValidationReport { issues }
    }

    /// Minimum number of bars the strategy needs before its body can run.
    ///
    /// Each node contributes from its own window parameters: `period + 1`,
    /// `count`, and `slow` plus a smoothing margin. Never less than 1.
    pub fn required_lookback(&self) -> usize {
        let mut lookback: i64 = 1;
        for node in self.graph.nodes() {
            let window = |key: &str| node.parameter(key).and_then(|v| v.as_i64()).filter(|v| *v > 0);
            if let Some(period) = window("period") {
                lookback = lookback.max(period.saturating_add(1));
            }
            if let Some(count) = window("count") {
                lookback = lookback.max(count);
            }
            if let Some(slow) = window("slow") {
                lookback = lookback.max(slow.saturating_add(SLOW_WINDOW_MARGIN));
            }
        }
        usize::try_from(lookback).unwrap_or(usize::MAX)
    }
}

/// Source nodes feeding `node`, following input ports in declaration order
/// and connections in creation order.
pub(crate) fn upstream_nodes(graph: &Graph, node: &NodeId) -> Vec<NodeId> {
    let Some(node) = graph.node(node) else {
        return Vec::new();
    };
    node.input_ports()
        .iter()
        .flat_map(|port| {
            let port_ref = PortRef::input(node.id(), port.name);
            graph
                .incoming(&port_ref)
                .filter(|c| graph.contains_node(&c.source.node))
                .map(|c| c.source.node.clone())
                .collect::<Vec<_>>()
        })
        .collect()
}
