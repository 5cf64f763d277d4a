//! Shared types for import statement recognition.
//!
//! This module defines the descriptor structures produced by the import
//! recognizer. A descriptor captures exactly what a single `import` or
//! `from ... import ...` statement says, in source order, before any
//! resolution happens.

use std::fmt;

/// A single imported name with its optional `as` alias.
///
/// Aliases only affect the local binding in the importing file; they never
/// affect module identity, so the graph builder ignores them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
    /// The imported name as written (dotted for plain imports, a bare
    /// identifier inside a `from`-list).
    pub name: String,

    /// The local alias from an `as` clause, if present.
    pub alias: Option<String>,
}

impl ImportEntry {
    /// Creates a new entry without an alias.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    /// Creates a new entry carrying an `as` alias.
    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: Some(alias.into()),
        }
    }
}

impl fmt::Display for ImportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{} as {}", self.name, alias),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A recognized import statement.
///
/// Produced by [`crate::parser::parse`] in order of appearance. Only the two
/// import statement shapes exist; everything else in the source is skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportStatement {
    /// `import a.b as x, c` — one or more dotted names.
    Import {
        /// Imported names in written order.
        entries: Vec<ImportEntry>,
    },

    /// `from ..pkg.mod import a as x, b` — a module reference with a
    /// relative level and one or more imported names.
    ImportFrom {
        /// Count of leading relative-import dots (0 for absolute imports).
        level: usize,
        /// Dotted module text after the dots; empty only for the dots-only
        /// form `from . import x`.
        module: String,
        /// Imported names in written order.
        entries: Vec<ImportEntry>,
    },
}

impl ImportStatement {
    /// Returns the entries of either statement form.
    pub fn entries(&self) -> &[ImportEntry] {
        match self {
            ImportStatement::Import { entries } => entries,
            ImportStatement::ImportFrom { entries, .. } => entries,
        }
    }
}

impl fmt::Display for ImportStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportStatement::Import { entries } => {
                write!(f, "import ")?;
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", entry)?;
                }
                Ok(())
            }
            ImportStatement::ImportFrom {
                level,
                module,
                entries,
            } => {
                write!(f, "from {}{} import ", ".".repeat(*level), module)?;
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", entry)?;
                }
                Ok(())
            }
        }
    }
}
