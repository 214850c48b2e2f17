//! The blueprint graph: an arena of nodes and connections.
//!
//! Ports are addressed by `(node id, port name, direction)` through
//! [`PortRef`]; neither nodes nor ports hold references to each other, so the
//! graph can be freely cloned, serialized and walked.

use crate::catalog::NodeCatalog;
use crate::error::GraphError;
use crate::types::can_connect;
use ahash::AHashMap;
use std::fmt;
use std::sync::Arc;

mod connection;
mod document;
mod drag;
mod events;
mod node;
mod port;

pub use connection::{Connection, ConnectionId};
pub use document::{BlueprintDocument, ConnectionRecord, IntoBlueprint, NodeRecord};
pub use drag::DragState;
pub use events::{GraphEvent, GraphObserver};
pub use node::{INPUT_OVERRIDE_PREFIX, Node, NodeId, ParamValue, Point};
pub use port::{PortDefinition, PortDirection, PortRef};

pub struct Graph {
    catalog: Arc<NodeCatalog>,
    nodes: AHashMap<NodeId, Node>,
    /// Insertion order of `nodes`, which fixes iteration order everywhere.
    order: Vec<NodeId>,
    connections: Vec<Connection>,
    next_node_seq: u64,
    next_connection_id: u64,
    drag: DragState,
    observers: Vec<GraphObserver>,
}

impl Graph {
    /// An empty graph backed by the built-in node catalog.
    pub fn new() -> Self {
        Self::with_catalog(Arc::new(NodeCatalog::builtin()))
    }

    pub fn with_catalog(catalog: Arc<NodeCatalog>) -> Self {
        Self {
            catalog,
            nodes: AHashMap::new(),
            order: Vec::new(),
            connections: Vec::new(),
            next_node_seq: 0,
            next_connection_id: 0,
            drag: DragState::Idle,
            observers: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &NodeCatalog {
        &self.catalog
    }

    pub fn catalog_handle(&self) -> Arc<NodeCatalog> {
        Arc::clone(&self.catalog)
    }

    /// Registers a callback invoked after every structural mutation.
    pub fn subscribe(&mut self, observer: impl FnMut(&GraphEvent) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn notify(&mut self, event: GraphEvent) {
        log::debug!("graph event: {:?}", event);
        for observer in &mut self.observers {
            observer(&event);
        }
    }

    // --- Nodes ---

    /// Creates a node of the given catalog type with its default parameters.
    pub fn add_node(&mut self, type_tag: &str, position: Point) -> Result<NodeId, GraphError> {
        let id = self.fresh_node_id();
        self.insert_node(id, type_tag, position)
    }

    /// Creates a node under a caller-chosen id, e.g. when loading a document.
    pub fn add_node_with_id(
        &mut self,
        id: impl Into<NodeId>,
        type_tag: &str,
        position: Point,
    ) -> Result<NodeId, GraphError> {
        let id = id.into();
        if self.nodes.contains_key(&id) {
            return Err(GraphError::DuplicateNodeId(id.to_string()));
        }
        self.insert_node(id, type_tag, position)
    }

    fn insert_node(
        &mut self,
        id: NodeId,
        type_tag: &str,
        position: Point,
    ) -> Result<NodeId, GraphError> {
        ensure_finite_position(&id, position)?;
        let behavior = self
            .catalog
            .get(type_tag)
            .ok_or_else(|| GraphError::UnknownNodeType {
                type_tag: type_tag.to_string(),
            })?;

        let node = Node {
            id: id.clone(),
            type_tag: type_tag.to_string(),
            position,
            parameters: behavior.default_parameters(),
            inputs: behavior.input_ports(),
            outputs: behavior.output_ports(),
        };

        self.nodes.insert(id.clone(), node);
        self.order.push(id.clone());
        self.notify(GraphEvent::NodeAdded(id.clone()));
        Ok(id)
    }

    fn fresh_node_id(&mut self) -> NodeId {
        loop {
            self.next_node_seq += 1;
            let candidate = NodeId::new(format!("{:08x}", self.next_node_seq));
            if !self.nodes.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// Removes a node after disconnecting every incident connection.
    pub fn remove_node(&mut self, id: &NodeId) -> Result<Node, GraphError> {
        if !self.nodes.contains_key(id) {
            return Err(GraphError::NodeNotFound {
                node_id: id.to_string(),
            });
        }

        let incident: Vec<ConnectionId> = self
            .connections
            .iter()
            .filter(|c| c.touches(id))
            .map(|c| c.id)
            .collect();
        for conn_id in incident {
            self.remove_connection(conn_id)?;
        }

        if self.drag.origin().is_some_and(|origin| &origin.node == id) {
            self.drag = DragState::Idle;
        }

        self.order.retain(|n| n != id);
        let node = self.nodes.remove(id).ok_or_else(|| GraphError::NodeNotFound {
            node_id: id.to_string(),
        })?;
        self.notify(GraphEvent::NodeRemoved(id.clone()));
        Ok(node)
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn node_mut(&mut self, id: &NodeId) -> Result<&mut Node, GraphError> {
        self.nodes.get_mut(id).ok_or_else(|| GraphError::NodeNotFound {
            node_id: id.to_string(),
        })
    }

    pub fn set_parameter(
        &mut self,
        id: &NodeId,
        key: &str,
        value: impl Into<ParamValue>,
    ) -> Result<(), GraphError> {
        let value = value.into();
        // JSON has no spelling for NaN or infinity.
        if matches!(value, ParamValue::Float(v) if !v.is_finite()) {
            return Err(GraphError::NonFiniteValue {
                node_id: id.to_string(),
                field: key.to_string(),
            });
        }
        self.node_mut(id)?.parameters.insert(key.to_string(), value);
        self.notify(GraphEvent::ParameterChanged {
            node: id.clone(),
            key: key.to_string(),
        });
        Ok(())
    }

    pub fn remove_parameter(
        &mut self,
        id: &NodeId,
        key: &str,
    ) -> Result<Option<ParamValue>, GraphError> {
        let removed = self.node_mut(id)?.parameters.remove(key);
        if removed.is_some() {
            self.notify(GraphEvent::ParameterChanged {
                node: id.clone(),
                key: key.to_string(),
            });
        }
        Ok(removed)
    }

    /// Moves a node. Placement is not semantic, so no event is emitted.
    pub fn set_position(&mut self, id: &NodeId, position: Point) -> Result<(), GraphError> {
        ensure_finite_position(id, position)?;
        self.node_mut(id)?.position = position;
        Ok(())
    }

    /// Removes every node and connection.
    pub fn clear(&mut self) {
        self.connections.clear();
        self.nodes.clear();
        self.order.clear();
        self.drag = DragState::Idle;
        self.notify(GraphEvent::Cleared);
    }

    // --- Ports and connections ---

    pub fn port_definition(&self, port: &PortRef) -> Option<&PortDefinition> {
        self.nodes
            .get(&port.node)
            .and_then(|n| n.port(&port.port, port.direction))
    }

    fn require_port(&self, port: &PortRef) -> Result<&PortDefinition, GraphError> {
        let node = self
            .nodes
            .get(&port.node)
            .ok_or_else(|| GraphError::NodeNotFound {
                node_id: port.node.to_string(),
            })?;
        node.port(&port.port, port.direction)
            .ok_or_else(|| GraphError::PortNotFound {
                node_id: port.node.to_string(),
                port: port.port.clone(),
            })
    }

    /// All finalized connections in creation order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    /// Connections arriving at an input port.
    pub fn incoming<'a>(&'a self, port: &'a PortRef) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| &c.target == port)
    }

    /// Connections leaving an output port.
    pub fn outgoing<'a>(&'a self, port: &'a PortRef) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| &c.source == port)
    }

    pub fn incident_connections<'a>(
        &'a self,
        node: &'a NodeId,
    ) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| c.touches(node))
    }

    /// Whether `port` would accept a new connection with `candidate` on the
    /// other end.
    ///
    /// Requires opposite directions and distinct nodes, rejects a singular
    /// input that is already filled, and checks type compatibility in the
    /// source-to-target direction.
    pub fn can_accept_connection(&self, port: &PortRef, candidate: &PortRef) -> bool {
        let (Some(own), Some(other)) = (self.port_definition(port), self.port_definition(candidate))
        else {
            return false;
        };

        if port.direction == candidate.direction || port.node == candidate.node {
            return false;
        }

        match port.direction {
            PortDirection::Input => {
                if !own.multi_connect && self.incoming(port).next().is_some() {
                    return false;
                }
                can_connect(other.data_type, own.data_type)
            }
            PortDirection::Output => can_connect(own.data_type, other.data_type),
        }
    }

    /// Connects an output port to an input port.
    ///
    /// A singular input that already holds a connection has it replaced.
    pub fn add_connection(
        &mut self,
        source: PortRef,
        target: PortRef,
    ) -> Result<ConnectionId, GraphError> {
        let rejected = |reason: String| GraphError::ConnectionRejected {
            from: source.to_string(),
            to: target.to_string(),
            reason,
        };

        if source.direction != PortDirection::Output || target.direction != PortDirection::Input {
            return Err(rejected(
                "connections run from an output port to an input port".to_string(),
            ));
        }
        if source.node == target.node {
            return Err(rejected("a node cannot be connected to itself".to_string()));
        }

        let source_type = self.require_port(&source)?.data_type;
        let target_def = self.require_port(&target)?;
        let (target_type, multi_connect) = (target_def.data_type, target_def.multi_connect);
        if !can_connect(source_type, target_type) {
            return Err(rejected(format!(
                "a {} output cannot feed a {} input",
                source_type, target_type
            )));
        }

        if let Some(existing) = self
            .connections
            .iter()
            .find(|c| c.source == source && c.target == target)
        {
            return Ok(existing.id);
        }

        if !multi_connect {
            let replaced: Vec<ConnectionId> = self.incoming(&target).map(|c| c.id).collect();
            for id in replaced {
                log::debug!("replacing connection {} into singular input {}", id, target);
                self.remove_connection(id)?;
            }
        }

        self.next_connection_id += 1;
        let id = ConnectionId(self.next_connection_id);
        self.connections.push(Connection { id, source, target });
        self.notify(GraphEvent::ConnectionAdded(id));
        Ok(id)
    }

    /// Detaches a connection from both of its ports and drops it.
    pub fn remove_connection(&mut self, id: ConnectionId) -> Result<Connection, GraphError> {
        let index = self
            .connections
            .iter()
            .position(|c| c.id == id)
            .ok_or(GraphError::ConnectionNotFound(id.0))?;
        let removed = self.connections.remove(index);
        self.notify(GraphEvent::ConnectionRemoved(id));
        Ok(removed)
    }

    // --- Drag gesture ---

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// Begins a drag from `port`. Any gesture already in progress is dropped.
    pub fn start_connection(&mut self, port: PortRef) -> Result<(), GraphError> {
        self.require_port(&port)?;
        self.drag = DragState::Dragging {
            origin: port,
            cursor: Point::default(),
        };
        Ok(())
    }

    pub fn update_dragging(&mut self, point: Point) {
        if let DragState::Dragging { cursor, .. } = &mut self.drag {
            *cursor = point;
        }
    }

    /// Ends the drag on `target`.
    ///
    /// Returns `false` and leaves the graph untouched when no drag is active
    /// or `target` cannot accept the origin port. Either way the gesture ends.
    pub fn finish_connection(&mut self, target: &PortRef) -> bool {
        let DragState::Dragging { origin, .. } = std::mem::take(&mut self.drag) else {
            return false;
        };

        if !self.can_accept_connection(target, &origin) {
            log::debug!("rejected drag from {} to {}", origin, target);
            return false;
        }

        let (source, sink) = match origin.direction {
            PortDirection::Output => (origin, target.clone()),
            PortDirection::Input => (target.clone(), origin),
        };
        self.add_connection(source, sink).is_ok()
    }

    pub fn cancel_connection(&mut self) {
        self.drag = DragState::Idle;
    }
}

fn ensure_finite_position(id: &NodeId, position: Point) -> Result<(), GraphError> {
    if position.x.is_finite() && position.y.is_finite() {
        Ok(())
    } else {
        Err(GraphError::NonFiniteValue {
            node_id: id.to_string(),
            field: "position".to_string(),
        })
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Graph {
    /// Clones nodes, connections and the catalog handle. Observers and any
    /// in-progress drag stay with the original.
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            nodes: self.nodes.clone(),
            order: self.order.clone(),
            connections: self.connections.clone(),
            next_node_seq: self.next_node_seq,
            next_connection_id: self.next_connection_id,
            drag: DragState::Idle,
            observers: Vec::new(),
        }
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.order)
            .field("connections", &self.connections)
            .field("drag", &self.drag)
            .field("observers", &self.observers.len())
            .finish()
    }
}
