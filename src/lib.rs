//! importgraph - Static Python import dependency graph discovery
//!
//! This crate builds the transitive import graph of a Python source text
//! without executing any code: imports are recognized lexically, resolved
//! through a caller-supplied environment, and expanded recursively into a
//! queryable graph.

pub mod builder;
pub mod graph;
pub mod parser;
pub mod resolver;

pub use builder::GraphBuilder;
pub use graph::{DependencyGraph, GraphError, ModuleRef, ENTRY_POINT};
pub use parser::{parse, ImportEntry, ImportStatement};
pub use resolver::{FileReader, FsReader, ModuleResolver, ReadError, ResolveError, ResolvedModule};
