//! String- and comment-aware tokenizer for import recognition.
//!
//! Produces the flat token stream the recursive-descent recognizer consumes.
//! The lexer does the heavy lifting that naive line matching cannot: string
//! literals (including triple-quoted and prefixed forms) and `#` comments are
//! consumed opaquely, backslash-continued lines are joined, and physical
//! newlines inside brackets are suppressed so a parenthesized name list spans
//! a single logical line.

/// A lexical token. Everything the import grammar has no use for collapses
/// into [`Token::Other`]; the recognizer drops any statement containing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    /// An identifier, maximal munch: `importos` is one name, never a keyword.
    Name(&'a str),
    Dot,
    Comma,
    Star,
    OpenParen,
    CloseParen,
    /// End of a logical line: a physical newline at bracket depth zero, or a
    /// `;` statement separator.
    Newline,
    /// String literals, numbers, operators, stray punctuation.
    Other,
}

/// Tokenizes `source`. The stream always ends with a [`Token::Newline`].
pub(crate) fn tokenize(source: &str) -> Vec<Token<'_>> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    depth: usize,
    tokens: Vec<Token<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            depth: 0,
            tokens: Vec::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn run(mut self) -> Vec<Token<'a>> {
        while let Some(c) = self.peek() {
            match c {
                '\n' => {
                    self.bump();
                    if self.depth == 0 {
                        self.tokens.push(Token::Newline);
                    }
                }
                '\\' => {
                    self.bump();
                    self.eat('\r');
                    // Backslash-newline joins physical lines; a lone
                    // backslash is junk.
                    if !self.eat('\n') {
                        self.tokens.push(Token::Other);
                    }
                }
                '#' => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                '\'' | '"' => {
                    self.bump();
                    self.scan_string(c);
                    self.tokens.push(Token::Other);
                }
                '(' => {
                    self.bump();
                    self.depth += 1;
                    self.tokens.push(Token::OpenParen);
                }
                ')' => {
                    self.bump();
                    self.depth = self.depth.saturating_sub(1);
                    self.tokens.push(Token::CloseParen);
                }
                '[' | '{' => {
                    self.bump();
                    self.depth += 1;
                    self.tokens.push(Token::Other);
                }
                ']' | '}' => {
                    self.bump();
                    self.depth = self.depth.saturating_sub(1);
                    self.tokens.push(Token::Other);
                }
                ',' => {
                    self.bump();
                    self.tokens.push(Token::Comma);
                }
                '.' => {
                    self.bump();
                    self.tokens.push(Token::Dot);
                }
                '*' => {
                    self.bump();
                    self.tokens.push(Token::Star);
                }
                ';' => {
                    self.bump();
                    self.tokens.push(Token::Newline);
                }
                c if is_name_start(c) => self.scan_name(),
                c if c.is_ascii_digit() => {
                    self.scan_number();
                    self.tokens.push(Token::Other);
                }
                c if c.is_whitespace() => self.bump(),
                _ => {
                    self.bump();
                    self.tokens.push(Token::Other);
                }
            }
        }

        if self.tokens.last() != Some(&Token::Newline) {
            self.tokens.push(Token::Newline);
        }

        self.tokens
    }

    fn scan_name(&mut self) {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_name_continue(c) {
                self.bump();
            } else {
                break;
            }
        }
        let text = &self.source[start..self.pos];

        // A short run of string-prefix letters glued to a quote starts a
        // prefixed literal (r"...", f'...', rb"..."), not a name.
        if is_string_prefix(text) {
            if let Some(q @ ('\'' | '"')) = self.peek() {
                self.bump();
                self.scan_string(q);
                self.tokens.push(Token::Other);
                return;
            }
        }

        self.tokens.push(Token::Name(text));
    }

    /// Consumes a string literal whose opening quote `q` was already eaten.
    /// A backslash always shields the following character from terminating
    /// the scan, which is sufficient for raw strings too: in Python a raw
    /// literal still cannot end on a backslashed quote.
    fn scan_string(&mut self, q: char) {
        let triple = {
            let rest = &self.source[self.pos..];
            let mut chars = rest.chars();
            chars.next() == Some(q) && chars.next() == Some(q)
        };
        if triple {
            self.bump();
            self.bump();
            loop {
                match self.peek() {
                    // Unterminated literal swallows the rest of the input.
                    None => return,
                    Some('\\') => {
                        self.bump();
                        self.bump();
                    }
                    Some(c) if c == q => {
                        let mut rest = self.source[self.pos..].chars();
                        rest.next();
                        if rest.next() == Some(q) && rest.next() == Some(q) {
                            self.bump();
                            self.bump();
                            self.bump();
                            return;
                        }
                        self.bump();
                    }
                    Some(_) => self.bump(),
                }
            }
        } else {
            loop {
                match self.peek() {
                    None => return,
                    Some('\\') => {
                        self.bump();
                        self.bump();
                    }
                    Some(c) if c == q => {
                        self.bump();
                        return;
                    }
                    // Unterminated single-line literal: hand the newline
                    // back to the main loop.
                    Some('\n') => return,
                    Some(_) => self.bump(),
                }
            }
        }
    }

    fn scan_number(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '.' {
                self.bump();
            } else {
                break;
            }
        }
    }
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_string_prefix(text: &str) -> bool {
    !text.is_empty()
        && text.len() <= 3
        && text.chars().all(|c| matches!(c, 'r' | 'R' | 'b' | 'B' | 'u' | 'U' | 'f' | 'F'))
}
