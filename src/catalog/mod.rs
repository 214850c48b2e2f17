//! Node variants and the registry that constructs nodes by type tag.
//!
//! Every variant implements [`NodeBehavior`]. The built-in families live in
//! one module each and register themselves through [`NodeCatalog::builtin`];
//! callers extend the catalog with [`NodeCatalog::register`] and
//! [`NodeCatalog::with_alias`].

use crate::graph::{ParamValue, PortDefinition};
use ahash::AHashMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

mod context;
mod indicator;
mod logic;
mod param;
mod schema;
mod scope;
mod series;
mod signal;
mod source;
mod trade;

pub use context::CodeGenContext;
pub use schema::{ParamKind, ParameterSpec};
pub use scope::NodeScope;

/// Import line shared by every indicator and crossing detector.
pub const INDICATORS_IMPORT: &str = "from core.indicators.technical import TechnicalIndicators";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Data,
    Indicator,
    Signal,
    Logic,
    Trade,
    Param,
}

impl Category {
    /// Palette order.
    pub const ALL: [Category; 6] = [
        Category::Data,
        Category::Indicator,
        Category::Signal,
        Category::Logic,
        Category::Trade,
        Category::Param,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Data => "data",
            Category::Indicator => "indicator",
            Category::Signal => "signal",
            Category::Logic => "logic",
            Category::Trade => "trade",
            Category::Param => "param",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The contract every node variant fulfils.
pub trait NodeBehavior: Send + Sync {
    fn node_type(&self) -> &str;
    fn category(&self) -> Category;
    fn title(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Fixed input ports, in declaration order.
    fn input_ports(&self) -> Vec<PortDefinition>;
    fn output_ports(&self) -> Vec<PortDefinition>;

    fn parameter_schema(&self) -> Vec<ParameterSpec> {
        Vec::new()
    }

    /// Parameters a freshly created node starts with.
    fn default_parameters(&self) -> BTreeMap<String, ParamValue> {
        self.parameter_schema()
            .into_iter()
            .map(|spec| (spec.name.to_string(), spec.default))
            .collect()
    }

    /// Appends this node's statements and imports. Called at most once per
    /// node per generation pass.
    fn emit(&self, _scope: &NodeScope<'_>, _ctx: &mut CodeGenContext) {}

    /// The expression downstream nodes substitute for `port`.
    fn output_expression(&self, scope: &NodeScope<'_>, port: &str) -> String;
}

/// Summary of a registered variant for palettes and listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeInfo {
    #[serde(rename = "type")]
    pub node_type: String,
    pub category: Category,
    pub title: String,
    pub description: String,
}

/// Registry of node variants keyed by type tag.
pub struct NodeCatalog {
    behaviors: AHashMap<String, Arc<dyn NodeBehavior>>,
    order: Vec<String>,
}

impl NodeCatalog {
    /// A catalog with no variants.
    pub fn empty() -> Self {
        Self {
            behaviors: AHashMap::new(),
            order: Vec::new(),
        }
    }

    /// A catalog holding every built-in variant.
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        source::register(&mut catalog);
        series::register(&mut catalog);
        indicator::register(&mut catalog);
        logic::register(&mut catalog);
        signal::register(&mut catalog);
        trade::register(&mut catalog);
        param::register(&mut catalog);
        catalog
    }

    /// Adds a variant under its own type tag, replacing any previous one.
    pub fn register(&mut self, behavior: Box<dyn NodeBehavior>) {
        let tag = behavior.node_type().to_string();
        self.insert(tag, Arc::from(behavior));
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_behavior(mut self, behavior: Box<dyn NodeBehavior>) -> Self {
        self.register(behavior);
        self
    }

    /// Makes `user_tag` construct the same variant as `builtin_tag`.
    /// Unknown targets are ignored.
    pub fn with_alias(mut self, user_tag: &str, builtin_tag: &str) -> Self {
        match self.behaviors.get(builtin_tag).cloned() {
            Some(behavior) => self.insert(user_tag.to_string(), behavior),
            None => log::warn!(
                "cannot alias '{}' to unknown node type '{}'",
                user_tag,
                builtin_tag
            ),
        }
        self
    }

    fn insert(&mut self, tag: String, behavior: Arc<dyn NodeBehavior>) {
        if self.behaviors.insert(tag.clone(), behavior).is_none() {
            self.order.push(tag);
        }
    }

    pub fn get(&self, type_tag: &str) -> Option<&dyn NodeBehavior> {
        self.behaviors.get(type_tag).map(|b| b.as_ref())
    }

    pub fn contains(&self, type_tag: &str) -> bool {
        self.behaviors.contains_key(type_tag)
    }

    /// Registered type tags in registration order.
    pub fn node_types(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn categories(&self) -> &'static [Category] {
        &Category::ALL
    }

    pub fn node_info(&self, type_tag: &str) -> Option<NodeInfo> {
        self.get(type_tag).map(|b| NodeInfo {
            node_type: type_tag.to_string(),
            category: b.category(),
            title: b.title().to_string(),
            description: b.description().to_string(),
        })
    }

    /// Variants of one category, in registration order.
    pub fn by_category(&self, category: Category) -> Vec<NodeInfo> {
        self.node_types()
            .filter_map(|tag| self.node_info(tag))
            .filter(|info| info.category == category)
            .collect()
    }

    /// Case-insensitive search over type tag, title and description.
    pub fn search(&self, keyword: &str) -> Vec<NodeInfo> {
        let keyword = keyword.to_lowercase();
        self.node_types()
            .filter_map(|tag| self.node_info(tag))
            .filter(|info| {
                info.node_type.to_lowercase().contains(&keyword)
                    || info.title.to_lowercase().contains(&keyword)
                    || info.description.to_lowercase().contains(&keyword)
            })
            .collect()
    }
}

impl Default for NodeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for NodeCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeCatalog")
            .field("node_types", &self.order)
            .finish()
    }
}
