use crate::graph::NodeId;
use ahash::AHashSet;
use std::collections::BTreeSet;

/// Accumulator for one generation pass: emitted statements, import lines
/// and the set of nodes that have already emitted.
///
/// A fresh context is created per generation call and never reused.
#[derive(Debug, Default)]
pub struct CodeGenContext {
    statements: Vec<String>,
    imports: BTreeSet<String>,
    generated: AHashSet<NodeId>,
}

impl CodeGenContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a statement. Multi-line statements keep their relative
    /// indentation and are indented as a block at assembly.
    pub fn add_code(&mut self, statement: impl Into<String>) {
        self.statements.push(statement.into());
    }

    pub fn add_import(&mut self, import: impl Into<String>) {
        self.imports.insert(import.into());
    }

    /// Records that `node` has emitted. Returns `false` if it already had.
    pub fn mark_generated(&mut self, node: &NodeId) -> bool {
        self.generated.insert(node.clone())
    }

    pub fn is_generated(&self, node: &NodeId) -> bool {
        self.generated.contains(node)
    }

    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    /// Import lines, sorted and deduplicated.
    pub fn imports(&self) -> impl Iterator<Item = &str> + '_ {
        self.imports.iter().map(String::as_str)
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<String>) {
        (self.statements, self.imports.into_iter().collect())
    }
}
