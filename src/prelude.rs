//! Prelude module for convenient imports
//!
//! Re-exports the types needed to build, validate and generate a blueprint
//! without importing each module individually.
//!
//! ```rust
//! use sekkei::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let graph = Graph::from_json(r#"{"nodes": [], "connections": []}"#)?;
//! assert!(!validate(&graph).is_valid());
//! # Ok(())
//! # }
//! ```

// Graph model
pub use crate::graph::{
    BlueprintDocument, DragState, Graph, GraphEvent, IntoBlueprint, NodeId, ParamValue, Point,
    PortDirection, PortRef,
};
pub use crate::types::{DataType, can_connect};

// Catalog
pub use crate::catalog::{Category, CodeGenContext, NodeBehavior, NodeCatalog, NodeScope};

// Analysis and generation
pub use crate::analyzer::{GraphAnalyzer, ValidationReport};
pub use crate::codegen::{CodeGenerator, GeneratedStrategy, generate, generate_preview, validate};

// Error types
pub use crate::error::{AnalysisError, DocumentError, GenerateError, GraphError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
