//! Module dependency graph storage and queries.
//!
//! [`DependencyGraph`] owns the nodes and edges produced by a build; the
//! builder mutates it through [`DependencyGraph::ensure_node`] and
//! [`DependencyGraph::record_edge`] and callers query it afterwards. Node
//! views are handed out as [`ModuleRef`], which answers degree and depth
//! questions against the live edge set.

mod module_graph;

pub use module_graph::{DependencyGraph, GraphError, ModuleNode, ModuleRef, ENTRY_POINT};
