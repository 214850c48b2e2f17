use super::{Graph, NodeId, ParamValue, Point, PortRef};
use crate::catalog::NodeCatalog;
use crate::error::{DocumentError, GraphError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// The persisted form of a graph.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BlueprintDocument {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub connections: Vec<ConnectionRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub node_id: NodeId,
    pub node_type: String,
    #[serde(default)]
    pub position: Point,
    #[serde(default)]
    pub parameters: BTreeMap<String, ParamValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub source_node: NodeId,
    pub source_port: String,
    pub target_node: NodeId,
    pub target_port: String,
}

/// Converts a foreign representation into a [`BlueprintDocument`].
pub trait IntoBlueprint {
    fn into_blueprint(self) -> Result<BlueprintDocument, DocumentError>;
}

impl IntoBlueprint for BlueprintDocument {
    fn into_blueprint(self) -> Result<BlueprintDocument, DocumentError> {
        Ok(self)
    }
}

impl IntoBlueprint for &str {
    fn into_blueprint(self) -> Result<BlueprintDocument, DocumentError> {
        BlueprintDocument::from_json(self)
    }
}

impl IntoBlueprint for String {
    fn into_blueprint(self) -> Result<BlueprintDocument, DocumentError> {
        BlueprintDocument::from_json(&self)
    }
}

impl IntoBlueprint for serde_json::Value {
    fn into_blueprint(self) -> Result<BlueprintDocument, DocumentError> {
        serde_json::from_value(self).map_err(|e| DocumentError::Json(e.to_string()))
    }
}

impl BlueprintDocument {
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        serde_json::from_str(json).map_err(|e| DocumentError::Json(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self).map_err(|e| DocumentError::Json(e.to_string()))
    }
}

impl Graph {
    /// Snapshot of nodes (insertion order) and finalized connections.
    pub fn to_document(&self) -> BlueprintDocument {
        let nodes = self
            .nodes()
            .map(|node| NodeRecord {
                node_id: node.id().clone(),
                node_type: node.type_tag().to_string(),
                position: node.position(),
                parameters: node.parameters().clone(),
            })
            .collect();

        let connections = self
            .connections()
            .iter()
            .map(|c| ConnectionRecord {
                source_node: c.source.node.clone(),
                source_port: c.source.port.clone(),
                target_node: c.target.node.clone(),
                target_port: c.target.port.clone(),
            })
            .collect();

        BlueprintDocument { nodes, connections }
    }

    /// Rebuilds a graph from a document.
    ///
    /// Stored parameters replace the catalog defaults wholesale. Connections
    /// whose endpoints no longer exist are dropped with a warning; any other
    /// rejected connection is an error.
    pub fn from_document(
        catalog: Arc<NodeCatalog>,
        document: impl IntoBlueprint,
    ) -> Result<Self, DocumentError> {
        let document = document.into_blueprint()?;
        let mut graph = Graph::with_catalog(catalog);

        for record in document.nodes {
            let id = graph.add_node_with_id(record.node_id, &record.node_type, record.position)?;
            let node = graph.node_mut(&id)?;
            node.parameters = record.parameters;
        }

        for record in document.connections {
            let source = PortRef::output(record.source_node, record.source_port);
            let target = PortRef::input(record.target_node, record.target_port);
            match graph.add_connection(source.clone(), target.clone()) {
                Ok(_) => {}
                Err(GraphError::NodeNotFound { .. }) | Err(GraphError::PortNotFound { .. }) => {
                    log::warn!(
                        "dropping connection {} -> {}: endpoint does not exist",
                        source,
                        target
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(graph)
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        self.to_document().to_json()
    }

    /// Parses a JSON document against the built-in catalog.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Self::from_document(Arc::new(NodeCatalog::builtin()), json)
    }
}
