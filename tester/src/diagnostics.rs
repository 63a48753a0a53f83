//! Injection of failing type tests into the diagnostics of an editor session.

use crate::resolver::VerdictResolver;
use rtt_api::host::{LanguageSession, Program, SourceFile};
use rtt_api::model::{Diagnostic, Severity};
use tracing::{debug, warn};

/// The code of the diagnostics reporting failing assertions.
pub const DIAGNOSTIC_CODE: &str = "readable-test-types";
/// Prefix of the messages written to the session logging channel.
pub const LOG_PREFIX: &str = "Readable-Types:: ";

/// Wraps a [`LanguageSession`] to add an error on every call returning a failure sentinel.
///
/// The session diagnostics are never altered; the added ones are merged with them using the
/// session ordering.
///
/// ```
/// use rtt_api::host::LanguageSession;
/// use rtt_script::{ScriptProgram, ScriptSession};
/// use rtt_tester::diagnostics::TypeTestSession;
///
/// let program = ScriptProgram::from_source(
///     "a.spec-types.ts",
///     "declare function fails(): RTT_FAIL<'Expected `number`'>;\nfails();",
/// )?;
/// let session = TypeTestSession::new(ScriptSession::new(program));
/// let diagnostics = session.semantic_diagnostics("a.spec-types.ts");
/// assert_eq!(1, diagnostics.len());
/// assert_eq!("Test is failing: Expected `number`", diagnostics[0].message);
/// # Result::<_, rtt_script::ScriptError>::Ok(())
/// ```
pub struct TypeTestSession<S: LanguageSession> {
    inner: S,
}

impl<S: LanguageSession> TypeTestSession<S> {
    pub fn new(inner: S) -> Self {
        let session = Self { inner };
        session.note("readable-types-plugin loaded");
        session
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Writes to the session logging channel.
    fn note(&self, message: &str) {
        self.inner.log(&format!("{}{}", LOG_PREFIX, message));
    }

    fn failing_calls(&self, file: &<S::Program as Program>::File) -> Vec<Diagnostic> {
        let checker = match self.inner.program() {
            Some(program) => program.type_checker(),
            None => return Vec::new(),
        };
        let resolver = VerdictResolver::new(file, checker);
        let mut diagnostics = Vec::new();
        let mut stack = vec![file.root()];
        while let Some(node) = stack.pop() {
            if file.shape(node).is_call() {
                if let Some(payload) = resolver.failure_payload(node) {
                    let range = file.range(node);
                    diagnostics.push(Diagnostic {
                        file: file.file_name().to_owned(),
                        start: range.start,
                        length: range.length,
                        code: DIAGNOSTIC_CODE.to_owned(),
                        message: format!("Test is failing: {}", payload.message),
                        severity: Severity::Error,
                    });
                }
            }
            stack.extend(file.children(node).into_iter().rev());
        }
        diagnostics
    }
}

impl<S: LanguageSession> LanguageSession for TypeTestSession<S> {
    type Program = S::Program;

    fn program(&self) -> Option<&S::Program> {
        self.inner.program()
    }

    /// The session diagnostics of `file_name` with an error for each failing assertion call.
    fn semantic_diagnostics(&self, file_name: &str) -> Vec<Diagnostic> {
        let diagnostics = self.inner.semantic_diagnostics(file_name);
        let file = match self
            .inner
            .program()
            .and_then(|program| program.source_file(file_name))
        {
            Some(file) => file,
            None => {
                warn!("source file {} not found", file_name);
                self.note("SourceFile not found");
                return diagnostics;
            }
        };
        let failing = self.failing_calls(file);
        if failing.is_empty() {
            return diagnostics;
        }
        debug!("{} failing type tests in {}", failing.len(), file_name);
        let mut combined = diagnostics;
        combined.extend(failing);
        self.inner.sort_and_deduplicate(combined)
    }

    fn log(&self, message: &str) {
        self.inner.log(message)
    }

    fn sort_and_deduplicate(&self, diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
        self.inner.sort_and_deduplicate(diagnostics)
    }
}
