use thiserror::Error;

/// Errors raised while building or mutating a blueprint graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node type '{type_tag}' is not registered in the catalog")]
    UnknownNodeType { type_tag: String },

    #[error("Node '{node_id}' not found in the graph")]
    NodeNotFound { node_id: String },

    #[error("Node '{node_id}' has no port named '{port}'")]
    PortNotFound { node_id: String, port: String },

    #[error("A node with id '{0}' already exists in the graph")]
    DuplicateNodeId(String),

    #[error("Node '{node_id}': '{field}' must be a finite number")]
    NonFiniteValue { node_id: String, field: String },

    #[error("Connection #{0} not found in the graph")]
    ConnectionNotFound(u64),

    #[error("Cannot connect '{from}' to '{to}': {reason}")]
    ConnectionRejected {
        from: String,
        to: String,
        reason: String,
    },
}

/// Errors raised when the dependency structure of a graph cannot be ordered.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error(
        "The graph contains a dependency cycle; {} node(s) could not be ordered: {}",
        .unresolved.len(),
        .unresolved.join(", ")
    )]
    CycleDetected { unresolved: Vec<String> },
}

/// Errors that can occur when loading a serialized blueprint.
#[derive(Error, Debug, Clone)]
pub enum DocumentError {
    #[error("Failed to parse blueprint JSON: {0}")]
    Json(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Reasons the generator refused to produce an executable strategy.
#[derive(Error, Debug, Clone)]
pub enum GenerateError {
    #[error("Blueprint validation failed with {} issue(s)", .0.len())]
    Invalid(Vec<String>),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}
