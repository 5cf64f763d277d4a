//! Dependency graph implementation using petgraph.
//!
//! Nodes are canonical module names; edges point from an importing module to
//! the module it imports. The entry point itself is represented by the
//! [`ENTRY_POINT`] sentinel node, which is always present and is the unique
//! depth-0 node. Degrees and dependent sets are derived from the edge set
//! rather than stored, so they cannot drift out of sync with the graph.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use thiserror::Error;

/// Name of the sentinel node standing for the analyzed source text itself.
///
/// It has no dependents and a depth of zero; every other node is reachable
/// from it.
pub const ENTRY_POINT: &str = "<terminal>";

/// Errors raised by graph queries.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The requested canonical name has no node in this graph.
    #[error("module '{0}' is not present in the graph")]
    NotFound(String),
}

/// A discovered module: the node weight stored in the graph.
#[derive(Debug, Clone)]
pub struct ModuleNode {
    /// Canonical dotted name, or [`ENTRY_POINT`].
    pub name: String,

    /// Filesystem origin of the module's source, when resolution produced
    /// one.
    pub origin: Option<PathBuf>,

    /// Shortest hop count from the entry point. Maintained by
    /// [`DependencyGraph::assign_depths`].
    pub depth: usize,
}

/// A directed graph of module dependencies.
///
/// Edges run from the dependent module to its dependency; duplicate edges
/// between the same pair are collapsed, so a module importing the same
/// target twice contributes a single edge.
///
/// # Example
///
/// ```rust
/// use importgraph::graph::{DependencyGraph, ENTRY_POINT};
///
/// let mut graph = DependencyGraph::new();
/// graph.ensure_node("os", None);
/// graph.record_edge(ENTRY_POINT, "os");
/// graph.assign_depths();
///
/// assert_eq!(graph.size(), 2);
/// let os = graph.get("os").unwrap();
/// assert_eq!(os.depth(), 1);
/// assert!(os.dependents().contains(ENTRY_POINT));
/// ```
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// The underlying directed graph.
    graph: DiGraph<ModuleNode, ()>,
    /// Maps canonical names to node indices for O(1) lookup.
    indices: HashMap<String, NodeIndex>,
    /// Index of the entry-point sentinel.
    root: NodeIndex,
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyGraph {
    /// Creates a graph containing only the entry-point sentinel.
    pub fn new() -> Self {
        let mut graph = DiGraph::new();
        let root = graph.add_node(ModuleNode {
            name: ENTRY_POINT.to_string(),
            origin: None,
            depth: 0,
        });
        let mut indices = HashMap::new();
        indices.insert(ENTRY_POINT.to_string(), root);
        Self {
            graph,
            indices,
            root,
        }
    }

    /// Returns the node for `name`, creating it if absent.
    ///
    /// An existing node keeps its origin; a node first created without one
    /// picks up the origin from a later sighting.
    pub fn ensure_node(&mut self, name: &str, origin: Option<PathBuf>) -> NodeIndex {
        if let Some(&idx) = self.indices.get(name) {
            if let Some(origin) = origin {
                let node = &mut self.graph[idx];
                if node.origin.is_none() {
                    node.origin = Some(origin);
                }
            }
            return idx;
        }

        let idx = self.graph.add_node(ModuleNode {
            name: name.to_string(),
            origin,
            depth: 0,
        });
        self.indices.insert(name.to_string(), idx);
        idx
    }

    /// Records the edge "`owner` imports `target`".
    ///
    /// Both nodes must already exist. Duplicate edges are collapsed and
    /// self-edges are rejected; returns `true` only when the edge is
    /// actually present afterwards.
    pub fn record_edge(&mut self, owner: &str, target: &str) -> bool {
        if owner == target {
            return false;
        }
        let (Some(&from), Some(&to)) = (self.indices.get(owner), self.indices.get(target)) else {
            return false;
        };
        self.graph.update_edge(from, to, ());
        true
    }

    /// Recomputes every node's depth as the shortest hop count from the
    /// entry point, walking the finished edge set breadth-first. Insertion
    /// order plays no part.
    pub fn assign_depths(&mut self) {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        seen.insert(self.root);
        self.graph[self.root].depth = 0;
        queue.push_back((self.root, 0usize));

        while let Some((idx, depth)) = queue.pop_front() {
            let next: Vec<NodeIndex> = self
                .graph
                .neighbors_directed(idx, Direction::Outgoing)
                .collect();
            for neighbor in next {
                if seen.insert(neighbor) {
                    self.graph[neighbor].depth = depth + 1;
                    queue.push_back((neighbor, depth + 1));
                }
            }
        }
    }

    /// Total node count, entry point included.
    pub fn size(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of dependency edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether a node exists for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.indices.contains_key(name)
    }

    /// Looks up the node for `name`.
    pub fn get(&self, name: &str) -> Result<ModuleRef<'_>, GraphError> {
        match self.indices.get(name) {
            Some(&index) => Ok(ModuleRef { graph: self, index }),
            None => Err(GraphError::NotFound(name.to_string())),
        }
    }

    /// Iterates over every node, in creation order.
    pub fn iter(&self) -> impl Iterator<Item = ModuleRef<'_>> + '_ {
        self.graph
            .node_indices()
            .map(move |index| ModuleRef { graph: self, index })
    }

    /// Filesystem origins of every node that has one, lazily, in
    /// node-creation order. Distinct canonical names sharing a file yield
    /// duplicates.
    pub fn origins(&self) -> impl Iterator<Item = &Path> + '_ {
        self.graph.node_weights().filter_map(|n| n.origin.as_deref())
    }

    /// All nodes whose canonical name equals `prefix` or sits beneath it
    /// (`prefix` followed by a dot). No meaningful order.
    ///
    /// # Example
    ///
    /// ```rust
    /// use importgraph::graph::{DependencyGraph, ENTRY_POINT};
    ///
    /// let mut graph = DependencyGraph::new();
    /// graph.ensure_node("pkg", None);
    /// graph.ensure_node("pkg.util", None);
    /// graph.ensure_node("pkgother", None);
    /// graph.record_edge(ENTRY_POINT, "pkg");
    ///
    /// let scoped = graph.get_all_scoped("pkg");
    /// assert_eq!(scoped.len(), 2);
    /// ```
    pub fn get_all_scoped(&self, prefix: &str) -> Vec<ModuleRef<'_>> {
        self.iter()
            .filter(|node| {
                let name = node.name();
                name == prefix
                    || (name.starts_with(prefix) && name[prefix.len()..].starts_with('.'))
            })
            .collect()
    }
}

/// A view of a single node, resolving degree queries against the live edge
/// set.
#[derive(Clone, Copy)]
pub struct ModuleRef<'g> {
    graph: &'g DependencyGraph,
    index: NodeIndex,
}

impl<'g> ModuleRef<'g> {
    fn node(&self) -> &'g ModuleNode {
        &self.graph.graph[self.index]
    }

    /// Canonical dotted name, or [`ENTRY_POINT`].
    pub fn name(&self) -> &'g str {
        &self.node().name
    }

    /// Filesystem origin, if any.
    pub fn origin(&self) -> Option<&'g Path> {
        self.node().origin.as_deref()
    }

    /// Shortest hop count from the entry point.
    pub fn depth(&self) -> usize {
        self.node().depth
    }

    /// Out-degree: how many distinct modules this node imports.
    pub fn dependencies(&self) -> usize {
        self.graph
            .graph
            .edges_directed(self.index, Direction::Outgoing)
            .count()
    }

    /// Names of the modules that import this node.
    pub fn dependents(&self) -> HashSet<&'g str> {
        self.graph
            .graph
            .edges_directed(self.index, Direction::Incoming)
            .map(|edge| self.graph.graph[edge.source()].name.as_str())
            .collect()
    }
}

impl std::fmt::Debug for ModuleRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleRef")
            .field("name", &self.name())
            .field("depth", &self.depth())
            .field("dependencies", &self.dependencies())
            .field("dependents", &self.dependents())
            .finish()
    }
}
