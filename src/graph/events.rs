use super::connection::ConnectionId;
use super::node::NodeId;

/// Structural changes broadcast to graph observers, typically so a preview
/// can be regenerated.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    NodeAdded(NodeId),
    NodeRemoved(NodeId),
    ConnectionAdded(ConnectionId),
    ConnectionRemoved(ConnectionId),
    ParameterChanged { node: NodeId, key: String },
    Cleared,
}

pub type GraphObserver = Box<dyn FnMut(&GraphEvent) + Send>;
