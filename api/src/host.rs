//! Interfaces a host has to implement to be driven by a type-level test harness.
//!
//! The host owns parsing and type-checking. The harness only reads syntax trees and
//! asks for type information, one call at a time and from a single thread.

use crate::model::{Diagnostic, LineColumn, Location, NodeShape, TextRange};
use std::fmt;

/// A parsed file.
pub trait SourceFile {
    /// A cheap handle to a node of this file.
    type Node: Copy + Eq + fmt::Debug;

    /// The name of the file, as shown in reports.
    fn file_name(&self) -> &str;

    /// The full text of the file.
    fn text(&self) -> &str;

    /// The node covering the whole file.
    fn root(&self) -> Self::Node;

    /// The children of `node` in source order.
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    /// What `node` looks like.
    fn shape(&self, node: Self::Node) -> NodeShape<'_, Self::Node>;

    /// The range of `node`, leading trivia excluded.
    fn range(&self, node: Self::Node) -> TextRange;

    /// Converts a byte offset into a 0-based line and column.
    ///
    /// Offsets past the end of the text are clamped to it.
    ///
    /// ```
    /// use rtt_api::host::SourceFile;
    /// use rtt_api::model::{LineColumn, NodeShape, TextRange};
    ///
    /// struct Text(&'static str);
    ///
    /// impl SourceFile for Text {
    ///     type Node = ();
    ///     fn file_name(&self) -> &str { "text.ts" }
    ///     fn text(&self) -> &str { self.0 }
    ///     fn root(&self) {}
    ///     fn children(&self, _: ()) -> Vec<()> { Vec::new() }
    ///     fn shape(&self, _: ()) -> NodeShape<'_, ()> { NodeShape::Other }
    ///     fn range(&self, _: ()) -> TextRange { TextRange::new(0, self.0.len()) }
    /// }
    ///
    /// assert_eq!(LineColumn { line: 1, column: 2 }, Text("ab\ncde").line_and_column(5));
    /// ```
    fn line_and_column(&self, offset: usize) -> LineColumn {
        let text = self.text();
        let mut offset = offset.min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &text[..offset];
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        LineColumn {
            line: before.matches('\n').count(),
            column: before[line_start..].chars().count(),
        }
    }

    /// The location of `node`, ready to be reported.
    fn location(&self, node: Self::Node) -> Location {
        let range = self.range(node);
        let LineColumn { line, column } = self.line_and_column(range.start);
        Location {
            start: range.start,
            length: range.length,
            line,
            column,
        }
    }
}

/// Type information over the nodes `N` of a program.
pub trait TypeChecker<N> {
    /// A resolved call signature.
    type Signature;
    /// A resolved type.
    type Type;

    /// Resolves the signature a call expression binds to, if any.
    fn resolved_signature(&self, call: N) -> Option<Self::Signature>;

    fn return_type_of_signature(&self, signature: &Self::Signature) -> Self::Type;

    /// Resolves the explicit type argument at `index` of a call expression.
    fn type_from_type_argument(&self, call: N, index: usize) -> Option<Self::Type>;

    /// The type of an expression.
    fn type_at_location(&self, node: N) -> Option<Self::Type>;

    /// The type argument at `index` of a generic type instance like `Wrapper<T>`.
    fn resolved_type_argument(&self, ty: &Self::Type, index: usize) -> Option<Self::Type>;

    /// The display form of a type.
    fn type_to_string(&self, ty: &Self::Type) -> String;
}

/// A set of parsed files sharing one type-checking context.
pub trait Program {
    type File: SourceFile;
    type Checker: TypeChecker<<Self::File as SourceFile>::Node>;

    /// The files of the program, in the order the host supplies them.
    fn source_files(&self) -> Vec<&Self::File>;

    fn source_file(&self, file_name: &str) -> Option<&Self::File>;

    fn type_checker(&self) -> &Self::Checker;
}

/// A live analysis session of an editor host.
pub trait LanguageSession {
    type Program: Program;

    /// The current program, if the session has one.
    fn program(&self) -> Option<&Self::Program>;

    /// The semantic diagnostics of a file, as computed by the host.
    fn semantic_diagnostics(&self, file_name: &str) -> Vec<Diagnostic>;

    /// Writes a message to the host logging channel.
    fn log(&self, message: &str);

    /// Orders diagnostics and removes duplicates.
    ///
    /// Defaults to [`sort_and_deduplicate_diagnostics`](../model/fn.sort_and_deduplicate_diagnostics.html).
    fn sort_and_deduplicate(&self, diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
        crate::model::sort_and_deduplicate_diagnostics(diagnostics)
    }
}
