//! Data structures exchanged with a host: text positions, syntax node shapes and diagnostics.

use std::fmt;

/// A range in the text of a source file, as byte offsets.
///
/// `start` excludes leading trivia like whitespace and comments.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash, Default)]
pub struct TextRange {
    /// Offset of the first byte.
    pub start: usize,
    /// Number of bytes covered.
    pub length: usize,
}

impl TextRange {
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    /// Offset just after the last byte.
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// A 0-based line and column pair.
///
/// The default string formatter is returning the 1-based `line:column` form used by editors.
///
/// ```
/// use rtt_api::model::LineColumn;
///
/// assert_eq!("3:5", LineColumn { line: 2, column: 4 }.to_string())
/// ```
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash, Default)]
pub struct LineColumn {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for LineColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// The position of a node: its absolute range and the 0-based line and column of its start.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash, Default)]
pub struct Location {
    pub start: usize,
    pub length: usize,
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn range(&self) -> TextRange {
        TextRange::new(self.start, self.length)
    }

    pub fn line_column(&self) -> LineColumn {
        LineColumn {
            line: self.line,
            column: self.column,
        }
    }
}

/// The syntactic shape of a node, as far as a type-test harness needs to know it.
///
/// `N` is the host node handle. Every node kind the harness does not care about is [`NodeShape::Other`].
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum NodeShape<'a, N> {
    /// `callee<type_arguments>(arguments)`
    Call {
        callee: N,
        type_arguments: &'a [N],
        arguments: &'a [N],
    },
    /// A bare identifier reference.
    Identifier { name: &'a str },
    /// A string literal or a template literal without substitutions, `value` being unescaped.
    StringLiteral { value: &'a str },
    /// `object.name`
    PropertyAccess { object: N, name: &'a str },
    /// Arrow functions, function expressions and function declarations.
    ///
    /// `body` is either a block or, for expression-bodied arrows, the expression itself.
    FunctionLike { body: Option<N> },
    /// `[elements]`
    ArrayLiteral { elements: &'a [N] },
    /// `{properties}`
    ObjectLiteral { properties: &'a [N] },
    /// `name: initializer` inside an object literal.
    PropertyAssignment { name: &'a str, initializer: N },
    Other,
}

impl<'a, N> NodeShape<'a, N> {
    pub fn is_call(&self) -> bool {
        matches!(self, NodeShape::Call { .. })
    }

    pub fn is_function_like(&self) -> bool {
        matches!(self, NodeShape::FunctionLike { .. })
    }
}

/// The category of a [`Diagnostic`].
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash)]
pub enum Severity {
    Error,
    Warning,
    Suggestion,
    Message,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Suggestion => "suggestion",
            Severity::Message => "message",
        })
    }
}

/// A diagnostic reported by a host session.
///
/// The field order is the standard diagnostic order: file, start, length, code, message and severity.
///
/// ```
/// use rtt_api::model::{Diagnostic, Severity};
///
/// let diagnostic = Diagnostic {
///     file: "a.spec-types.ts".to_owned(),
///     start: 10,
///     length: 4,
///     code: "2304".to_owned(),
///     message: "Cannot find name 'foo'.".to_owned(),
///     severity: Severity::Error,
/// };
/// assert_eq!("a.spec-types.ts(10,4): error 2304: Cannot find name 'foo'.", diagnostic.to_string())
/// ```
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Hash)]
pub struct Diagnostic {
    pub file: String,
    pub start: usize,
    pub length: usize,
    pub code: String,
    pub message: String,
    pub severity: Severity,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({},{}): {} {}: {}",
            self.file, self.start, self.length, self.severity, self.code, self.message
        )
    }
}

/// Orders diagnostics by the standard rule and removes exact duplicates.
///
/// ```
/// use rtt_api::model::{sort_and_deduplicate_diagnostics, Diagnostic, Severity};
///
/// let at = |start| Diagnostic {
///     file: "a.ts".to_owned(),
///     start,
///     length: 1,
///     code: "2304".to_owned(),
///     message: "Cannot find name 'x'.".to_owned(),
///     severity: Severity::Error,
/// };
/// let sorted = sort_and_deduplicate_diagnostics(vec![at(7), at(2), at(7)]);
/// assert_eq!(vec![at(2), at(7)], sorted)
/// ```
pub fn sort_and_deduplicate_diagnostics(mut diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
    diagnostics.sort();
    diagnostics.dedup();
    diagnostics
}
