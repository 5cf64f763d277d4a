//! Recursive-descent recognizer for the two Python import statement forms.
//!
//! The recognizer walks the lexer's token stream one logical line at a time.
//! A line starting with anything other than the `import` or `from` keyword is
//! skipped outright; a line that starts like an import but turns out
//! malformed is dropped whole, never reported as an error and never emitted
//! as a partial descriptor.

use super::lexer::{tokenize, Token};
use super::types::{ImportEntry, ImportStatement};

/// Extracts every recognizable import statement from `source`, in order of
/// appearance. Never fails: malformed or non-matching input is omitted.
///
/// # Example
///
/// ```rust
/// use importgraph::parser::{parse, ImportStatement};
///
/// let stmts = parse("import os\nfrom sys import path\n");
/// assert_eq!(stmts.len(), 2);
/// assert!(matches!(stmts[0], ImportStatement::Import { .. }));
/// assert!(matches!(stmts[1], ImportStatement::ImportFrom { level: 0, .. }));
/// ```
pub fn parse(source: &str) -> Vec<ImportStatement> {
    let tokens = tokenize(source);
    let mut cursor = Cursor::new(&tokens);
    let mut statements = Vec::new();

    while !cursor.at_end() {
        cursor.skip_newlines();
        if cursor.at_end() {
            break;
        }

        let recognized = match cursor.peek() {
            Token::Name("import") => parse_import(&mut cursor),
            Token::Name("from") => parse_import_from(&mut cursor),
            _ => None,
        };
        if let Some(stmt) = recognized {
            statements.push(stmt);
        }

        // Discard whatever remains of the logical line, matched or not.
        cursor.skip_to_newline();
    }

    statements
}

/// `import dotted [as name] (, dotted [as name])*`
fn parse_import(cursor: &mut Cursor<'_, '_>) -> Option<ImportStatement> {
    cursor.bump(); // `import`

    // A parenthesized list is only legal after `from ... import`.
    if cursor.peek() == Token::OpenParen {
        return None;
    }

    let mut entries = Vec::new();
    loop {
        let name = parse_dotted_name(cursor)?;
        let alias = parse_alias(cursor)?;
        entries.push(ImportEntry { name, alias });

        match cursor.peek() {
            Token::Comma => cursor.bump(),
            Token::Newline => break,
            _ => return None,
        }
    }

    Some(ImportStatement::Import { entries })
}

/// `from dots? dotted? import names`, where `names` is a bare comma list, a
/// parenthesized list (free line breaks, optional trailing comma), or `*`.
fn parse_import_from(cursor: &mut Cursor<'_, '_>) -> Option<ImportStatement> {
    cursor.bump(); // `from`

    let mut level = 0usize;
    while cursor.peek() == Token::Dot {
        cursor.bump();
        level += 1;
    }

    let module = match cursor.peek() {
        Token::Name(name) if !is_keyword(name) => parse_dotted_name(cursor)?,
        _ => String::new(),
    };
    // `from import x` has neither dots nor a module.
    if level == 0 && module.is_empty() {
        return None;
    }

    if !cursor.eat_name("import") {
        return None;
    }

    let entries = match cursor.peek() {
        Token::OpenParen => {
            cursor.bump();
            let entries = parse_paren_list(cursor)?;
            if cursor.peek() != Token::Newline {
                return None;
            }
            entries
        }
        Token::Star => {
            cursor.bump();
            if cursor.peek() != Token::Newline {
                return None;
            }
            vec![ImportEntry::new("*")]
        }
        _ => {
            let mut entries = Vec::new();
            loop {
                let name = parse_plain_name(cursor)?;
                let alias = parse_alias(cursor)?;
                entries.push(ImportEntry { name, alias });

                match cursor.peek() {
                    Token::Comma => cursor.bump(),
                    Token::Newline => break,
                    _ => return None,
                }
            }
            entries
        }
    };

    // An empty parenthesized list is tolerated but describes nothing.
    if entries.is_empty() {
        return None;
    }

    Some(ImportStatement::ImportFrom {
        level,
        module,
        entries,
    })
}

/// Contents of `( ... )`: zero or more aliased names, comma separated, with
/// an optional trailing comma. The opening paren is already consumed; this
/// consumes through the closing paren.
fn parse_paren_list(cursor: &mut Cursor<'_, '_>) -> Option<Vec<ImportEntry>> {
    let mut entries = Vec::new();
    loop {
        match cursor.peek() {
            Token::CloseParen => {
                cursor.bump();
                return Some(entries);
            }
            Token::Name(name) if !is_keyword(name) => {
                cursor.bump();
                let alias = parse_alias(cursor)?;
                entries.push(ImportEntry {
                    name: name.to_string(),
                    alias,
                });
                match cursor.peek() {
                    Token::Comma => cursor.bump(),
                    Token::CloseParen => {
                        cursor.bump();
                        return Some(entries);
                    }
                    _ => return None,
                }
            }
            _ => return None,
        }
    }
}

/// `a.b.c` — at least one name, dot separated.
fn parse_dotted_name(cursor: &mut Cursor<'_, '_>) -> Option<String> {
    let mut dotted = String::new();
    loop {
        match cursor.peek() {
            Token::Name(name) if !is_keyword(name) => {
                cursor.bump();
                dotted.push_str(name);
            }
            _ => return None,
        }
        if cursor.peek() == Token::Dot {
            cursor.bump();
            dotted.push('.');
        } else {
            return Some(dotted);
        }
    }
}

/// A bare identifier inside a `from`-list (dotted names are not legal there).
fn parse_plain_name(cursor: &mut Cursor<'_, '_>) -> Option<String> {
    match cursor.peek() {
        Token::Name(name) if !is_keyword(name) => {
            cursor.bump();
            Some(name.to_string())
        }
        _ => None,
    }
}

/// Optional `as name` clause. `Some(None)` means no clause; `None` means the
/// clause was started but malformed, poisoning the statement.
fn parse_alias(cursor: &mut Cursor<'_, '_>) -> Option<Option<String>> {
    if !cursor.eat_name("as") {
        return Some(None);
    }
    match cursor.peek() {
        Token::Name(name) if !is_keyword(name) => {
            cursor.bump();
            Some(Some(name.to_string()))
        }
        _ => None,
    }
}

fn is_keyword(name: &str) -> bool {
    matches!(name, "import" | "from" | "as")
}

struct Cursor<'t, 'a> {
    tokens: &'t [Token<'a>],
    pos: usize,
}

impl<'t, 'a> Cursor<'t, 'a> {
    fn new(tokens: &'t [Token<'a>]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Current token; reads as an endless newline once exhausted.
    fn peek(&self) -> Token<'a> {
        self.tokens.get(self.pos).copied().unwrap_or(Token::Newline)
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn eat_name(&mut self, expected: &str) -> bool {
        if self.peek() == Token::Name(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn skip_newlines(&mut self) {
        while !self.at_end() && self.peek() == Token::Newline {
            self.bump();
        }
    }

    /// Advances past the next newline, discarding everything before it.
    fn skip_to_newline(&mut self) {
        while !self.at_end() {
            let done = self.peek() == Token::Newline;
            self.bump();
            if done {
                break;
            }
        }
    }
}
