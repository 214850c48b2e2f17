use crate::graph::{Graph, Node, PortRef};

/// A node viewed from inside the graph it belongs to.
///
/// Passed to [`NodeBehavior`](super::NodeBehavior) so a variant can resolve
/// its inputs against upstream nodes without holding references into the
/// graph itself.
#[derive(Clone, Copy)]
pub struct NodeScope<'g> {
    graph: &'g Graph,
    node: &'g Node,
    depth: usize,
}

impl<'g> NodeScope<'g> {
    pub fn new(graph: &'g Graph, node: &'g Node) -> Self {
        Self {
            graph,
            node,
            depth: 0,
        }
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn node(&self) -> &'g Node {
        self.node
    }

    pub fn variable_name(&self, suffix: &str) -> String {
        self.node.variable_name(suffix)
    }

    /// Resolves the expression feeding an input port.
    ///
    /// A connected port yields the upstream node's output expression.
    /// Otherwise the node's fallback chain applies (inline override, plain
    /// parameter, port default). `None` when nothing is available.
    pub fn input_value(&self, port: &str) -> Option<String> {
        let port_ref = PortRef::input(self.node.id(), port);
        if let Some(connection) = self.graph.incoming(&port_ref).next() {
            // Expressions only nest as deep as the graph is long, unless it
            // contains a cycle.
            if self.depth > self.graph.node_count() {
                log::warn!("input resolution for {} exceeded graph depth", port_ref);
                return None;
            }
            let upstream = self.graph.node(&connection.source.node)?;
            let behavior = self.graph.catalog().get(upstream.type_tag())?;
            let scope = NodeScope {
                graph: self.graph,
                node: upstream,
                depth: self.depth + 1,
            };
            return Some(behavior.output_expression(&scope, &connection.source.port));
        }

        self.node.fallback_value(port).map(|v| v.render())
    }

    /// [`input_value`](Self::input_value) with a literal used when the port
    /// resolves to nothing.
    pub fn input_or(&self, port: &str, fallback: &str) -> String {
        self.input_value(port)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}
