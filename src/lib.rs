//! # Sekkei - Blueprint Strategy Compiler
//!
//! **Sekkei** turns a visual blueprint, a directed graph of typed trading
//! blocks, into the source of a per-bar strategy callback. Blocks read market
//! data, compute indicators, compare values, derive signals and place
//! orders; connections carry typed values between their ports.
//!
//! ## Core Workflow
//!
//! 1.  **Build a Graph**: Create a [`Graph`](graph::Graph) backed by a
//!     [`NodeCatalog`](catalog::NodeCatalog), add nodes by type tag and connect
//!     output ports to input ports. Or load one from JSON, or implement
//!     [`IntoBlueprint`](graph::IntoBlueprint) for your own format.
//! 2.  **Validate**: The [`GraphAnalyzer`](analyzer::GraphAnalyzer) orders the
//!     graph and reports cycles, unconnected required inputs and missing trade
//!     nodes as plain issue strings.
//! 3.  **Generate**: The [`CodeGenerator`](codegen::CodeGenerator) emits each
//!     node once, producers first, and assembles imports, a parameter block and
//!     a guarded `on_bar` body. Invalid graphs yield a diagnostic artifact
//!     instead of code.
//!
//! ## Quick Start
//!
//! ```rust
//! use sekkei::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut graph = Graph::new();
//!     let closes = graph.add_node("data.close_prices", Point::new(0.0, 0.0))?;
//!     let ma = graph.add_node("indicator.ma", Point::new(200.0, 0.0))?;
//!     let above = graph.add_node("logic.greater", Point::new(400.0, 0.0))?;
//!     let buy = graph.add_node("trade.buy", Point::new(600.0, 0.0))?;
//!
//!     graph.add_connection(PortRef::output(&closes, "prices"), PortRef::input(&ma, "data"))?;
//!     graph.add_connection(PortRef::output(&closes, "current"), PortRef::input(&above, "a"))?;
//!     graph.add_connection(PortRef::output(&ma, "current"), PortRef::input(&above, "b"))?;
//!     graph.add_connection(PortRef::output(&above, "result"), PortRef::input(&buy, "condition"))?;
//!
//!     let strategy = CodeGenerator::new(&graph).compile("TrendStrategy")?;
//!     println!("{}", strategy.source);
//!     Ok(())
//! }
//! ```

pub mod analyzer;
pub mod catalog;
pub mod codegen;
pub mod error;
pub mod graph;
pub mod prelude;
pub mod types;
