//! External capability seams: module resolution and source reading.
//!
//! The graph builder never decides what a dotted name means on disk; that is
//! the host environment's job. Callers supply a [`ModuleResolver`]
//! (equivalent to the runtime's own module-search rules, e.g. CPython's
//! `importlib.util.find_spec`) and optionally a [`FileReader`]. The default
//! reader pulls sources straight from the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A dotted name could not be mapped to a module.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No module exists under this name in the caller's environment.
    #[error("unable to resolve module '{0}'")]
    Unresolvable(String),
}

/// A resolved origin could not be turned into source text.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The underlying read failed.
    #[error("failed to read source: {0}")]
    Io(#[from] std::io::Error),
}

/// The outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModule {
    /// Fully-resolved dotted name, independent of local aliasing.
    pub canonical_name: String,

    /// Filesystem location of the module's source, if it has one. Built-in,
    /// compiled, and namespace modules resolve without an origin.
    pub origin: Option<PathBuf>,
}

impl ResolvedModule {
    /// Creates a resolved module with a filesystem origin.
    pub fn with_origin(canonical_name: impl Into<String>, origin: impl Into<PathBuf>) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            origin: Some(origin.into()),
        }
    }

    /// Creates a resolved module without an origin (built-in, frozen,
    /// namespace package).
    pub fn builtin(canonical_name: impl Into<String>) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            origin: None,
        }
    }
}

/// Maps a dotted name to a canonical module.
///
/// `level` counts leading relative-import dots and is resolved against
/// `package`, the anchoring package of the importing module; `level == 0`
/// uses `name` verbatim. Resolution is one-shot against a filesystem
/// snapshot — the builder never retries.
pub trait ModuleResolver {
    fn resolve(
        &self,
        name: &str,
        package: &str,
        level: usize,
    ) -> Result<ResolvedModule, ResolveError>;
}

/// Turns a resolved origin into source text.
pub trait FileReader {
    fn read(&self, origin: &Path) -> Result<String, ReadError>;
}

/// Default [`FileReader`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl FileReader for FsReader {
    fn read(&self, origin: &Path) -> Result<String, ReadError> {
        Ok(fs::read_to_string(origin)?)
    }
}
