//! Lowers a blueprint graph into strategy source.
//!
//! Generation validates the graph, orders it, then walks the order asking
//! each node to emit once, producers first. Any refusal becomes a
//! diagnostic text artifact at the [`CodeGenerator::generate`] boundary so a
//! live preview never fails on an unfinished graph.

use crate::analyzer::{GraphAnalyzer, ValidationReport, upstream_nodes};
use crate::catalog::{CodeGenContext, NodeScope};
use crate::error::GenerateError;
use crate::graph::{Graph, INPUT_OVERRIDE_PREFIX, NodeId, ParamValue};
use ahash::AHashMap;

mod assemble;

use assemble::Sections;

pub const DEFAULT_STRATEGY_NAME: &str = "BlueprintStrategy";
pub const EMPTY_PREVIEW: &str =
    "# Create nodes on the canvas and connect them; code is generated automatically";

/// Layout and naming choices for the generated module.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorOptions {
    pub base_class: String,
    pub base_import: String,
    pub indent: usize,
    pub header_line: String,
    /// History accessor used by the insufficient-data guard.
    pub data_accessor: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            base_class: "BaseStrategy".to_string(),
            base_import: "from core.strategy.base import BaseStrategy".to_string(),
            indent: 4,
            header_line: "Generated by the blueprint visual editor".to_string(),
            data_accessor: "get_close_prices".to_string(),
        }
    }
}

/// A successfully generated strategy together with the manifest it was
/// assembled from.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedStrategy {
    pub name: String,
    pub source: String,
    /// Sorted, deduplicated import lines excluding the base class import.
    pub imports: Vec<String>,
    pub parameters: Vec<(String, ParamValue)>,
    pub lookback: usize,
    /// Emitted statements in generation order. May span several lines.
    pub statements: Vec<String>,
}

pub struct GeneratorBuilder<'g> {
    graph: &'g Graph,
    options: GeneratorOptions,
}

impl<'g> GeneratorBuilder<'g> {
    pub fn with_base_class(mut self, name: &str, import_line: &str) -> Self {
        self.options.base_class = name.to_string();
        self.options.base_import = import_line.to_string();
        self
    }

    pub fn with_indent(mut self, spaces: usize) -> Self {
        self.options.indent = spaces.max(1);
        self
    }

    pub fn with_header_line(mut self, text: &str) -> Self {
        self.options.header_line = text.to_string();
        self
    }

    pub fn with_data_accessor(mut self, accessor: &str) -> Self {
        self.options.data_accessor = accessor.to_string();
        self
    }

    pub fn build(self) -> CodeGenerator<'g> {
        CodeGenerator {
            graph: self.graph,
            analyzer: GraphAnalyzer::new(self.graph),
            options: self.options,
        }
    }
}

pub struct CodeGenerator<'g> {
    graph: &'g Graph,
    analyzer: GraphAnalyzer<'g>,
    options: GeneratorOptions,
}

impl<'g> CodeGenerator<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self::builder(graph).build()
    }

    pub fn builder(graph: &'g Graph) -> GeneratorBuilder<'g> {
        GeneratorBuilder {
            graph,
            options: GeneratorOptions::default(),
        }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    pub fn analyzer(&self) -> &GraphAnalyzer<'g> {
        &self.analyzer
    }

    pub fn validate(&self) -> ValidationReport {
        self.analyzer.validate()
    }

    /// Validates, orders and emits the graph.
    pub fn compile(&self, name: &str) -> Result<GeneratedStrategy, GenerateError> {
        let report = self.analyzer.validate();
        if !report.is_valid() {
            log::debug!("validation failed with {} issue(s)", report.issues.len());
            return Err(GenerateError::Invalid(report.issues));
        }
        let order = self.analyzer.execution_order()?;

        let mut ctx = CodeGenContext::new();
        for id in &order {
            self.emit_with_dependencies(id, &mut ctx);
        }
        let (statements, imports) = ctx.into_parts();
        let imports: Vec<String> = imports
            .into_iter()
            .filter(|line| *line != self.options.base_import)
            .collect();

        let parameters = self.collect_parameters();
        let lookback = self.analyzer.required_lookback();
        let source = assemble::assemble(
            &self.options,
            &Sections {
                name,
                imports: &imports,
                parameters: &parameters,
                lookback,
                statements: &statements,
            },
        );

        log::info!(
            "generated strategy '{}': {} statement(s), lookback {}",
            name,
            statements.len(),
            lookback
        );

        Ok(GeneratedStrategy {
            name: name.to_string(),
            source,
            imports,
            parameters,
            lookback,
            statements,
        })
    }

    /// Strategy source, or a diagnostic artifact when the graph is invalid
    /// or cyclic.
    pub fn generate(&self, name: &str) -> String {
        match self.compile(name) {
            Ok(strategy) => strategy.source,
            Err(GenerateError::Invalid(issues)) => assemble::validation_failure(&issues),
            Err(GenerateError::Analysis(e)) => assemble::blocked(&e.to_string()),
        }
    }

    /// Like [`generate`](Self::generate) with the default name, but an empty
    /// graph yields a placeholder comment.
    pub fn generate_preview(&self) -> String {
        if self.graph.is_empty() {
            return EMPTY_PREVIEW.to_string();
        }
        self.generate(DEFAULT_STRATEGY_NAME)
    }

    /// Emits every producer of `id` before `id` itself, each at most once.
    fn emit_with_dependencies(&self, id: &NodeId, ctx: &mut CodeGenContext) {
        if !ctx.mark_generated(id) {
            return;
        }
        for upstream in upstream_nodes(self.graph, id) {
            self.emit_with_dependencies(&upstream, ctx);
        }

        let Some(node) = self.graph.node(id) else {
            return;
        };
        match self.graph.catalog().get(node.type_tag()) {
            Some(behavior) => {
                log::debug!("emitting {} ({})", node.id(), node.type_tag());
                behavior.emit(&NodeScope::new(self.graph, node), ctx);
            }
            None => log::warn!("no behavior registered for node type '{}'", node.type_tag()),
        }
    }

    /// Class-level parameter declarations keyed `<variant>_<param>`.
    ///
    /// A later node of the same variant overwrites the value but keeps the
    /// position of the first declaration.
    fn collect_parameters(&self) -> Vec<(String, ParamValue)> {
        let mut parameters: Vec<(String, ParamValue)> = Vec::new();
        let mut positions: AHashMap<String, usize> = AHashMap::new();

        for node in self.graph.nodes() {
            let variant = node.type_tag().rsplit('.').next().unwrap_or(node.type_tag());
            for (key, value) in node.parameters() {
                if key.starts_with(INPUT_OVERRIDE_PREFIX) {
                    continue;
                }
                let name = format!("{}_{}", variant, key);
                match positions.get(&name) {
                    Some(&index) => parameters[index].1 = value.clone(),
                    None => {
                        positions.insert(name.clone(), parameters.len());
                        parameters.push((name, value.clone()));
                    }
                }
            }
        }
        parameters
    }
}

/// Validates `graph` with the default analyzer.
pub fn validate(graph: &Graph) -> ValidationReport {
    GraphAnalyzer::new(graph).validate()
}

/// Generates strategy source for `graph` with default options.
pub fn generate(graph: &Graph, name: &str) -> String {
    CodeGenerator::new(graph).generate(name)
}

pub fn generate_preview(graph: &Graph) -> String {
    CodeGenerator::new(graph).generate_preview()
}
