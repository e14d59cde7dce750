//! # Go Front-End
//!
//! Loads a Go module with tree-sitter and hands the graph core a resolved
//! [`Program`](symgraph_graph::Program).
//!
//! ## Architecture
//!
//! ```text
//! Patterns (./..., ./pkg, example.com/m/pkg)
//!     │
//!     ├──> Module (go.mod lookup)
//!     │
//!     ├──> Loader (parallel parse, build constraints, package grouping)
//!     │
//!     ├──> Universe
//!     │    ├─> Phase 0: declared type names
//!     │    ├─> Phase 1: package-level declarations, method sets
//!     │    └─> Phase 2: inferred types of untyped values
//!     │
//!     └──> Lowering (parallel, per file)
//!          ├─> Scopes for locals
//!          ├─> Typer for selector operands
//!          └─> Syntax outline
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use symgraph_go::LoadConfig;
//! use symgraph_graph::GraphBuilder;
//!
//! let program = symgraph_go::load(&["./...".to_string()], &LoadConfig::new(".")).unwrap();
//! let graph = GraphBuilder::default().build(&program);
//! println!("{} nodes", graph.nodes.len());
//! ```

mod config;
mod error;
mod imports;
mod index;
mod infer;
mod loader;
mod lower;
mod module;
mod parse;
mod program;
mod scope;
mod types;

pub use config::LoadConfig;
pub use error::{GoError, Result};
pub use module::Module;
pub use program::{load, GoProgram};
