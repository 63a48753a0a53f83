use crate::program::ScriptProgram;
use crate::tree::{NodeData, ScriptFile};
use rtt_api::host::{LanguageSession, Program, SourceFile};
use rtt_api::model::{Diagnostic, Severity};
use std::cell::RefCell;
use std::collections::HashSet;
use tracing::info;

const KEYWORDS: &[&str] = &[
    "if", "for", "while", "switch", "catch", "super", "this", "typeof", "import", "require",
];

/// An editor session over a [`ScriptProgram`].
///
/// Its semantic diagnostics report calls to names that are declared nowhere in the program.
/// Logged messages are forwarded to `tracing` and kept for inspection.
#[derive(Debug, Default)]
pub struct ScriptSession {
    program: Option<ScriptProgram>,
    log: RefCell<Vec<String>>,
}

impl ScriptSession {
    pub fn new(program: ScriptProgram) -> Self {
        Self {
            program: Some(program),
            log: RefCell::default(),
        }
    }

    /// A session that has not built its program yet.
    pub fn without_program() -> Self {
        Self::default()
    }

    /// The messages written to the logging channel so far.
    pub fn logged(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    fn undeclared_callees(&self, program: &ScriptProgram, file: &ScriptFile) -> Vec<Diagnostic> {
        let descendants = file.descendants();
        let locals = descendants
            .iter()
            .filter_map(|node| match file.data(*node) {
                Some(NodeData::VariableDeclaration { name, .. })
                | Some(NodeData::Parameter { name, .. }) => Some(name.as_str()),
                _ => None,
            })
            .collect::<HashSet<_>>();
        descendants
            .iter()
            .filter_map(|node| match file.data(*node) {
                Some(NodeData::Call { callee, .. }) => Some(*callee),
                _ => None,
            })
            .filter_map(|callee| match file.data(callee) {
                Some(NodeData::Identifier { name })
                    if !program.is_declared(name)
                        && !locals.contains(name.as_str())
                        && !KEYWORDS.contains(&name.as_str()) =>
                {
                    let range = file.range(callee);
                    Some(Diagnostic {
                        file: file.file_name().to_owned(),
                        start: range.start,
                        length: range.length,
                        code: "2304".to_owned(),
                        message: format!("Cannot find name '{}'.", name),
                        severity: Severity::Error,
                    })
                }
                _ => None,
            })
            .collect()
    }
}

impl LanguageSession for ScriptSession {
    type Program = ScriptProgram;

    fn program(&self) -> Option<&ScriptProgram> {
        self.program.as_ref()
    }

    fn semantic_diagnostics(&self, file_name: &str) -> Vec<Diagnostic> {
        match &self.program {
            Some(program) => match program.source_file(file_name) {
                Some(file) => self.undeclared_callees(program, file),
                None => Vec::new(),
            },
            None => Vec::new(),
        }
    }

    fn log(&self, message: &str) {
        info!(target: "rtt_script::session", "{}", message);
        self.log.borrow_mut().push(message.to_owned());
    }
}
