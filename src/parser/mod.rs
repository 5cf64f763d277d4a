//! Import statement recognition.
//!
//! A pure text-to-descriptor transform: no I/O, no resolution, no graph
//! knowledge. The recognizer understands exactly two statement shapes —
//! `import a, b as c` and `from ..mod import x, y as z` — and is built as a
//! string/comment-aware tokenizer feeding a minimal recursive-descent
//! recognizer, so import-shaped text inside string literals or comments is
//! never misread as an import.
//!
//! # Example
//!
//! ```rust
//! use importgraph::parser::{parse, ImportStatement};
//!
//! let stmts = parse("from os import (\n    path,\n    getcwd,\n)\n");
//! match &stmts[0] {
//!     ImportStatement::ImportFrom { level, module, entries } => {
//!         assert_eq!(*level, 0);
//!         assert_eq!(module, "os");
//!         assert_eq!(entries.len(), 2);
//!     }
//!     _ => unreachable!(),
//! }
//! ```

mod imports;
mod lexer;
mod types;

pub use imports::parse;
pub use types::{ImportEntry, ImportStatement};
