use rtt_api::model::LineColumn;
use std::error::Error;
use std::fmt;
use std::io;

/// Error that might be returned while loading or parsing a script.
///
/// It might wrap an IO error or be a syntax error.
#[derive(Debug)]
pub struct ScriptError {
    pub(crate) kind: ScriptErrorKind,
    pub(crate) file: Option<String>,
    pub(crate) position: Option<LineColumn>,
}

#[derive(Debug)]
pub enum ScriptErrorKind {
    IO(io::Error),
    PrematureEOF,
    UnexpectedChar(char),
    UnterminatedString,
    TooDeeplyNested,
    UnexpectedToken { found: String, expected: &'static str },
}

impl ScriptError {
    pub(crate) fn new(kind: ScriptErrorKind, position: LineColumn) -> Self {
        Self {
            kind,
            file: None,
            position: Some(position),
        }
    }

    pub(crate) fn in_file(mut self, file: &str) -> Self {
        self.file = Some(file.to_owned());
        self
    }

    pub fn kind(&self) -> &ScriptErrorKind {
        &self.kind
    }

    /// The 0-based position of the error, if it is a syntax error.
    pub fn position(&self) -> Option<LineColumn> {
        self.position
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ScriptErrorKind::IO(error) => return error.fmt(f),
            ScriptErrorKind::PrematureEOF => write!(f, "premature end of file"),
            ScriptErrorKind::UnexpectedChar(c) => {
                write!(f, "unexpected character '{}'", c.escape_debug())
            }
            ScriptErrorKind::UnterminatedString => write!(f, "unterminated string literal"),
            ScriptErrorKind::TooDeeplyNested => write!(f, "too deeply nested code"),
            ScriptErrorKind::UnexpectedToken { found, expected } => {
                write!(f, "unexpected '{}', expecting {}", found, expected)
            }
        }?;
        match (&self.file, self.position) {
            (Some(file), Some(position)) => write!(f, " at {}:{}", file, position),
            (None, Some(position)) => write!(f, " at {}", position),
            (Some(file), None) => write!(f, " in {}", file),
            (None, None) => Ok(()),
        }
    }
}

impl Error for ScriptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            ScriptErrorKind::IO(error) => Some(error),
            _ => None,
        }
    }
}

impl From<io::Error> for ScriptError {
    fn from(error: io::Error) -> Self {
        Self {
            kind: ScriptErrorKind::IO(error),
            file: None,
            position: None,
        }
    }
}

impl From<ScriptError> for io::Error {
    fn from(error: ScriptError) -> Self {
        match error.kind {
            ScriptErrorKind::IO(error) => error,
            _ => io::Error::new(io::ErrorKind::InvalidData, error),
        }
    }
}
