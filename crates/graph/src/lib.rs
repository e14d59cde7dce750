//! # Symbol Graph
//!
//! Whole-program symbol dependency graph extraction.
//!
//! ## Architecture
//!
//! ```text
//! Program (front-end: symbols + syntax outlines)
//!     │
//!     ├──> Registry (phase 1)
//!     │      └─ One node per type, field, method, function, const, var
//!     │
//!     ├──> Reference Resolver (phase 2, per unit, parallel)
//!     │      ├─ Name uses
//!     │      └─ Member accesses on struct receivers
//!     │
//!     ├──> Structural Deriver (phase 2, per type, parallel)
//!     │      └─ Method, field and interface links
//!     │
//!     └──> Assembler (phase 3)
//!            ├─ Drop dangling links
//!            └─ Sorted {nodes, links}
//! ```

mod assembler;
mod builder;
mod config;
mod error;
mod links;
mod registry;
mod resolver;
mod structural;
mod symbol;
mod types;

pub use assembler::assemble;
pub use builder::GraphBuilder;
pub use config::ExtractConfig;
pub use error::{GraphError, Result};
pub use links::LinkSet;
pub use registry::Registry;
pub use resolver::ReferenceResolver;
pub use structural::StructuralDeriver;
pub use symbol::{
    FieldSymbol, MethodSymbol, Position, Program, ResolvedProgram, SourceRange, Symbol,
    SymbolKind, SymbolRef, Syntax, SyntaxUnit, TypeExpr, TypeShape, TypeSymbol,
};
pub use types::{Graph, Link, Node, NodeKind, Subtype};
