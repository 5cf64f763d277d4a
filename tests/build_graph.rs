//! End-to-end graph builds over a real directory tree, using the default
//! filesystem reader and a resolver that follows the usual package layout
//! (`pkg/__init__.py` for packages, `mod.py` for modules).

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use importgraph::{
    DependencyGraph, GraphBuilder, ModuleResolver, ResolveError, ResolvedModule, ENTRY_POINT,
};

/// Resolves dotted names against a single source root.
struct DirResolver {
    root: PathBuf,
}

impl ModuleResolver for DirResolver {
    fn resolve(
        &self,
        name: &str,
        package: &str,
        level: usize,
    ) -> Result<ResolvedModule, ResolveError> {
        let full =
            qualify(name, package, level).ok_or_else(|| ResolveError::Unresolvable(name.to_string()))?;
        let stem = full.replace('.', "/");
        let init = self.root.join(&stem).join("__init__.py");
        if init.is_file() {
            return Ok(ResolvedModule::with_origin(full, init));
        }
        let file = self.root.join(format!("{stem}.py"));
        if file.is_file() {
            return Ok(ResolvedModule::with_origin(full, file));
        }
        Err(ResolveError::Unresolvable(full))
    }
}

/// Anchors a relative name at its package: `level` dots keep
/// `len(package) - (level - 1)` leading package components.
fn qualify(name: &str, package: &str, level: usize) -> Option<String> {
    if level == 0 {
        return Some(name.to_string());
    }
    let parts: Vec<&str> = package.split('.').filter(|p| !p.is_empty()).collect();
    if parts.len() < level {
        return None;
    }
    let base = parts[..parts.len() - (level - 1)].join(".");
    if name.is_empty() {
        Some(base)
    } else {
        Some(format!("{base}.{name}"))
    }
}

fn write_module(root: &Path, relative: &str, source: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, source).unwrap();
}

/// A small application tree with a package, a subpackage, relative imports,
/// and one unresolvable builtin-style dependency.
fn app_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_module(root, "app/__init__.py", "");
    write_module(root, "app/db.py", "import sqlite3\n");
    write_module(root, "app/web/__init__.py", "from . import views\n");
    write_module(
        root,
        "app/web/views.py",
        "from ..db import connect\nfrom . import helpers\n",
    );
    write_module(root, "app/web/helpers.py", "import app.db\n");
    dir
}

fn build(dir: &TempDir, entry: &str) -> (GraphBuilder<DirResolver>, DependencyGraph) {
    let mut builder = GraphBuilder::new(DirResolver {
        root: dir.path().to_path_buf(),
    });
    let graph = builder.build(entry, "");
    (builder, graph)
}

#[test]
fn test_transitive_build_over_real_tree() {
    let dir = app_tree();
    let (_, graph) = build(&dir, "from app import web\n");

    // entry, app.web, app.web.views, app.db, app.web.helpers, sqlite3
    assert_eq!(graph.size(), 6);

    assert_eq!(graph.get(ENTRY_POINT).unwrap().depth(), 0);
    assert_eq!(graph.get("app.web").unwrap().depth(), 1);
    assert_eq!(graph.get("app.web.views").unwrap().depth(), 2);
    assert_eq!(graph.get("app.db").unwrap().depth(), 3);
    assert_eq!(graph.get("app.web.helpers").unwrap().depth(), 3);
    assert_eq!(graph.get("sqlite3").unwrap().depth(), 4);

    // Both views and helpers import the database module.
    let db_dependents = graph.get("app.db").unwrap().dependents();
    assert!(db_dependents.contains("app.web.views"));
    assert!(db_dependents.contains("app.web.helpers"));
    assert_eq!(db_dependents.len(), 2);

    // sqlite3 never resolved to a file.
    assert!(graph.get("sqlite3").unwrap().origin().is_none());
}

#[test]
fn test_origins_follow_discovery_order() {
    let dir = app_tree();
    let (_, graph) = build(&dir, "from app import web\n");

    let origins: Vec<PathBuf> = graph.origins().map(Path::to_path_buf).collect();
    let expected: Vec<PathBuf> = [
        "app/web/__init__.py",
        "app/web/views.py",
        "app/db.py",
        "app/web/helpers.py",
    ]
    .iter()
    .map(|rel| dir.path().join(rel))
    .collect();
    assert_eq!(origins, expected);
}

#[test]
fn test_scoped_query_selects_subtree() {
    let dir = app_tree();
    let (_, graph) = build(&dir, "from app import web\n");

    let mut scoped: Vec<&str> = graph
        .get_all_scoped("app.web")
        .iter()
        .map(|node| node.name())
        .collect();
    scoped.sort_unstable();
    assert_eq!(scoped, vec!["app.web", "app.web.helpers", "app.web.views"]);

    assert_eq!(graph.get_all_scoped("app").len(), 4);
    assert!(graph.get_all_scoped("missing").is_empty());
}

#[test]
fn test_rebuild_serves_modules_from_cache() {
    let dir = app_tree();
    let (mut builder, first) = build(&dir, "from app import web\n");

    // Rewriting a source after the first build must not change the second
    // one, because expansion results are replayed from the cache.
    write_module(dir.path(), "app/db.py", "import os\n");
    let second = builder.build("from app import web\n", "");

    assert_eq!(second.size(), first.size());
    assert!(second.contains("sqlite3"));
    assert!(!second.contains("os"));
}

#[test]
fn test_entry_source_is_reparsed_every_build() {
    let dir = app_tree();
    let (mut builder, _) = build(&dir, "from app import web\n");

    let graph = builder.build("import app.db\n", "");
    assert!(graph.contains("app.db"));
    assert!(graph.contains("sqlite3"));
    assert!(!graph.contains("app.web"));
    assert_eq!(graph.get("app.db").unwrap().depth(), 1);
}

#[test]
fn test_entry_anchored_inside_package() {
    let dir = app_tree();
    let mut builder = GraphBuilder::new(DirResolver {
        root: dir.path().to_path_buf(),
    });

    // Source analyzed as if it lived inside app.web.
    let graph = builder.build("from . import helpers\n", "app.web");
    assert!(graph.contains("app.web.helpers"));
    assert_eq!(
        graph.get("app.web.helpers").unwrap().dependents(),
        std::collections::HashSet::from([ENTRY_POINT])
    );
}
