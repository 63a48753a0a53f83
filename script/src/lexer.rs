use crate::error::*;
use rtt_api::model::{LineColumn, TextRange};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    /// An unescaped string literal value.
    String(String),
    /// The raw content of a template literal.
    Template {
        value: String,
        substitutions: bool,
    },
    Number,
    Punct(char),
    /// `=>`
    Arrow,
    /// `...`
    Ellipsis,
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: TextRange,
}

impl Token {
    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct(c)
    }
}

/// Offsets of line starts, to convert byte offsets into lines and columns.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { line_starts }
    }

    pub fn line_column(&self, text: &str, offset: usize) -> LineColumn {
        let mut offset = offset.min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        LineColumn {
            line,
            column: text[self.line_starts[line]..offset].chars().count(),
        }
    }
}

/// Splits a script into tokens. The last token is always `Eof`.
pub fn tokenize(text: &str) -> Result<Vec<Token>, ScriptError> {
    let mut lexer = Lexer {
        text,
        position: 0,
        lines: LineIndex::new(text),
    };
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let end = token.kind == TokenKind::Eof;
        tokens.push(token);
        if end {
            return Ok(tokens);
        }
    }
}

struct Lexer<'a> {
    text: &'a str,
    position: usize,
    lines: LineIndex,
}

impl<'a> Lexer<'a> {
    fn current(&self) -> Option<char> {
        self.text[self.position..].chars().next()
    }

    fn ahead(&self, count: usize) -> Option<char> {
        self.text[self.position..].chars().nth(count)
    }

    fn consume(&mut self) {
        if let Some(c) = self.current() {
            self.position += c.len_utf8();
        }
    }

    fn error(&self, kind: ScriptErrorKind, offset: usize) -> ScriptError {
        ScriptError::new(kind, self.lines.line_column(self.text, offset))
    }

    fn skip_trivia(&mut self) -> Result<(), ScriptError> {
        loop {
            match (self.current(), self.ahead(1)) {
                (Some(c), _) if c.is_whitespace() => self.consume(),
                (Some('/'), Some('/')) => {
                    while !matches!(self.current(), None | Some('\n')) {
                        self.consume();
                    }
                }
                (Some('/'), Some('*')) => {
                    let start = self.position;
                    match self.text[self.position + 2..].find("*/") {
                        Some(end) => self.position += 2 + end + 2,
                        None => return Err(self.error(ScriptErrorKind::PrematureEOF, start)),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, ScriptError> {
        self.skip_trivia()?;
        let start = self.position;
        let c = match self.current() {
            Some(c) => c,
            None => {
                return Ok(Token {
                    kind: TokenKind::Eof,
                    range: TextRange::new(start, 0),
                })
            }
        };
        let kind = match c {
            c if is_identifier_start(c) => {
                while self.current().map_or(false, is_identifier_part) {
                    self.consume();
                }
                TokenKind::Identifier
            }
            '0'..='9' => {
                while self
                    .current()
                    .map_or(false, |c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
                {
                    self.consume();
                }
                TokenKind::Number
            }
            '"' | '\'' => TokenKind::String(self.read_string(c)?),
            '`' => self.read_template()?,
            '=' if self.ahead(1) == Some('>') => {
                self.consume();
                self.consume();
                TokenKind::Arrow
            }
            '.' if self.ahead(1) == Some('.') && self.ahead(2) == Some('.') => {
                self.position += 3;
                TokenKind::Ellipsis
            }
            c if c.is_ascii_punctuation() => {
                self.consume();
                TokenKind::Punct(c)
            }
            c => return Err(self.error(ScriptErrorKind::UnexpectedChar(c), start)),
        };
        Ok(Token {
            kind,
            range: TextRange::new(start, self.position - start),
        })
    }

    fn read_string(&mut self, quote: char) -> Result<String, ScriptError> {
        let start = self.position;
        let mut value = String::new();
        self.consume();
        loop {
            match self.current() {
                None | Some('\n') => {
                    return Err(self.error(ScriptErrorKind::UnterminatedString, start))
                }
                Some(c) if c == quote => {
                    self.consume();
                    return Ok(value);
                }
                Some('\\') => {
                    self.consume();
                    self.read_escape(&mut value, start)?;
                }
                Some(c) => {
                    value.push(c);
                    self.consume();
                }
            }
        }
    }

    fn read_escape(&mut self, buffer: &mut String, start: usize) -> Result<(), ScriptError> {
        let c = match self.current() {
            Some(c) => c,
            None => return Err(self.error(ScriptErrorKind::UnterminatedString, start)),
        };
        self.consume();
        match c {
            'n' => buffer.push('\n'),
            't' => buffer.push('\t'),
            'r' => buffer.push('\r'),
            'b' => buffer.push('\u{8}'),
            'f' => buffer.push('\u{C}'),
            'v' => buffer.push('\u{B}'),
            '0' => buffer.push('\0'),
            '\n' => (),
            'x' => buffer.push(self.read_hexa_char(2, start)?),
            'u' if self.current() == Some('{') => {
                self.consume();
                let digits_start = self.position;
                while self.current().map_or(false, |c| c.is_ascii_hexdigit()) {
                    self.consume();
                }
                let point = u32::from_str_radix(&self.text[digits_start..self.position], 16)
                    .ok()
                    .and_then(std::char::from_u32);
                match (point, self.current()) {
                    (Some(point), Some('}')) => {
                        self.consume();
                        buffer.push(point)
                    }
                    (_, Some(c)) => {
                        return Err(self.error(ScriptErrorKind::UnexpectedChar(c), self.position))
                    }
                    (_, None) => return Err(self.error(ScriptErrorKind::PrematureEOF, start)),
                }
            }
            'u' => buffer.push(self.read_hexa_char(4, start)?),
            c => buffer.push(c),
        }
        Ok(())
    }

    fn read_hexa_char(&mut self, len: usize, start: usize) -> Result<char, ScriptError> {
        let mut value = 0;
        for _ in 0..len {
            match self.current() {
                Some(c) if c.is_ascii_hexdigit() => {
                    value = value * 16 + c.to_digit(16).unwrap_or(0);
                    self.consume();
                }
                Some(c) => {
                    return Err(self.error(ScriptErrorKind::UnexpectedChar(c), self.position))
                }
                None => return Err(self.error(ScriptErrorKind::UnterminatedString, start)),
            }
        }
        std::char::from_u32(value)
            .ok_or_else(|| self.error(ScriptErrorKind::UnexpectedChar('u'), start))
    }

    fn read_template(&mut self) -> Result<TokenKind, ScriptError> {
        let start = self.position;
        let mut value = String::new();
        let mut substitutions = false;
        let mut depth = 0usize;
        self.consume();
        loop {
            match self.current() {
                None => return Err(self.error(ScriptErrorKind::UnterminatedString, start)),
                Some('`') if depth == 0 => {
                    self.consume();
                    return Ok(TokenKind::Template {
                        value,
                        substitutions,
                    });
                }
                Some('\\') if depth == 0 => {
                    self.consume();
                    self.read_escape(&mut value, start)?;
                }
                Some('$') if depth == 0 && self.ahead(1) == Some('{') => {
                    substitutions = true;
                    depth = 1;
                    value.push_str("${");
                    self.consume();
                    self.consume();
                }
                Some(c) => {
                    match c {
                        '{' if depth > 0 => depth += 1,
                        '}' if depth > 0 => depth -= 1,
                        _ => (),
                    }
                    value.push(c);
                    self.consume();
                }
            }
        }
    }
}

fn is_identifier_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphabetic()
}

fn is_identifier_part(c: char) -> bool {
    is_identifier_start(c) || c.is_alphanumeric()
}
