use crate::error::ScriptError;
use crate::tree::{NodeData, ScriptFile, ScriptNode};
use crate::types;
use rtt_api::host::{Program, SourceFile, TypeChecker};
use std::collections::HashMap;
use std::fmt;
use tracing::trace;

const MAX_TYPE_DEPTH: usize = 32;

/// A type, kept as its display text.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct ScriptType(pub String);

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The signature a call resolved to, with its type parameters substituted.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ScriptSignature {
    function: String,
    return_type: ScriptType,
}

impl ScriptSignature {
    /// The name of the called function.
    pub fn function(&self) -> &str {
        &self.function
    }
}

#[derive(Debug, Clone)]
struct FunctionDeclaration {
    type_parameters: Vec<String>,
    return_type: Option<ScriptNode>,
}

#[derive(Debug, Clone, Copy)]
enum ValueDeclaration {
    Annotation(ScriptNode),
    Initializer(ScriptNode),
}

/// A set of scripts sharing their top-level declarations.
///
/// It is also its own type checker: calls resolve against the declared functions by name and
/// types are the declared texts.
///
/// ```
/// use rtt_api::host::{Program, SourceFile, TypeChecker};
/// use rtt_script::ScriptProgram;
///
/// let program = ScriptProgram::from_sources(vec![
///     ("lib.d.ts", "declare function check<T>(): Checked<T>;"),
///     ("a.spec-types.ts", "check<string>();"),
/// ])?;
/// let checker = program.type_checker();
/// let file = program.source_file("a.spec-types.ts").unwrap();
/// let statement = file.children(file.root())[0];
/// let call = file.children(statement)[0];
/// let signature = checker.resolved_signature(call).unwrap();
/// let return_type = checker.return_type_of_signature(&signature);
/// assert_eq!("Checked<string>", checker.type_to_string(&return_type));
/// # Result::<_, rtt_script::ScriptError>::Ok(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptProgram {
    files: Vec<ScriptFile>,
    functions: HashMap<String, FunctionDeclaration>,
    values: HashMap<String, ValueDeclaration>,
}

impl ScriptProgram {
    /// Parses all the given `(file name, text)` pairs into one program.
    pub fn from_sources<N: Into<String>, T: Into<String>>(
        sources: impl IntoIterator<Item = (N, T)>,
    ) -> Result<Self, ScriptError> {
        let mut program = Self::default();
        for (name, text) in sources {
            program.add_source(name, text)?;
        }
        Ok(program)
    }

    /// Parses a single script into a program.
    pub fn from_source(name: impl Into<String>, text: impl Into<String>) -> Result<Self, ScriptError> {
        Self::from_sources(vec![(name.into(), text.into())])
    }

    /// Parses a script and adds it to the program.
    ///
    /// On a syntax error the program is left unchanged.
    pub fn add_source(
        &mut self,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<(), ScriptError> {
        let file = ScriptFile::parse_with_id(self.files.len() as u32, name.into(), text.into())?;
        for statement in file.statements() {
            match file.data(*statement) {
                Some(NodeData::FunctionDeclaration {
                    name,
                    type_parameters,
                    return_type,
                    ..
                }) => {
                    self.functions
                        .entry(name.clone())
                        .or_insert_with(|| FunctionDeclaration {
                            type_parameters: type_parameters.clone(),
                            return_type: *return_type,
                        });
                }
                Some(NodeData::VariableDeclaration {
                    name,
                    type_annotation,
                    initializer,
                }) => {
                    let declaration = match (type_annotation, initializer) {
                        (Some(annotation), _) => ValueDeclaration::Annotation(*annotation),
                        (None, Some(initializer)) => ValueDeclaration::Initializer(*initializer),
                        (None, None) => continue,
                    };
                    self.values.entry(name.clone()).or_insert(declaration);
                }
                _ => (),
            }
        }
        self.files.push(file);
        Ok(())
    }

    /// Returns `true` if a function or a value with this name is declared at the top level of a file.
    pub fn is_declared(&self, name: &str) -> bool {
        self.functions.contains_key(name) || self.values.contains_key(name)
    }

    fn file(&self, node: ScriptNode) -> Option<&ScriptFile> {
        self.files.get(node.file as usize)
    }

    fn data(&self, node: ScriptNode) -> Option<&NodeData> {
        self.file(node)?.data(node)
    }

    fn type_text(&self, node: ScriptNode) -> Option<ScriptType> {
        match self.data(node)? {
            NodeData::Type { text } => Some(ScriptType(text.trim().to_owned())),
            _ => None,
        }
    }

    /// A variable declared anywhere in the file of `node`.
    fn local_value(&self, node: ScriptNode, name: &str) -> Option<ValueDeclaration> {
        let file = self.file(node)?;
        file.descendants()
            .into_iter()
            .find_map(|candidate| match file.data(candidate) {
                Some(NodeData::VariableDeclaration {
                    name: candidate_name,
                    type_annotation,
                    initializer,
                }) if candidate_name == name => match (type_annotation, initializer) {
                    (Some(annotation), _) => Some(ValueDeclaration::Annotation(*annotation)),
                    (None, Some(initializer)) => Some(ValueDeclaration::Initializer(*initializer)),
                    (None, None) => None,
                },
                _ => None,
            })
    }

    fn value_type(&self, value: ValueDeclaration, depth: usize) -> Option<ScriptType> {
        match value {
            ValueDeclaration::Annotation(annotation) => self.type_text(annotation),
            ValueDeclaration::Initializer(initializer) => self.type_of(initializer, depth + 1),
        }
    }

    fn type_of(&self, node: ScriptNode, depth: usize) -> Option<ScriptType> {
        if depth > MAX_TYPE_DEPTH {
            return None;
        }
        match self.data(node)? {
            NodeData::Identifier { name } => {
                let value = self
                    .local_value(node, name)
                    .or_else(|| self.values.get(name).copied())?;
                self.value_type(value, depth)
            }
            NodeData::Call { .. } => {
                let signature = self.resolved_signature(node)?;
                Some(signature.return_type)
            }
            NodeData::Parenthesized { expression } => self.type_of(*expression, depth + 1),
            NodeData::StringLiteral { value } => Some(ScriptType(format!("{:?}", value))),
            NodeData::NumericLiteral => {
                let range = self.file(node)?.range(node);
                let text = self.file(node)?.text();
                Some(ScriptType(text[range.start..range.end()].to_owned()))
            }
            _ => None,
        }
    }
}

impl TypeChecker<ScriptNode> for ScriptProgram {
    type Signature = ScriptSignature;
    type Type = ScriptType;

    fn resolved_signature(&self, call: ScriptNode) -> Option<ScriptSignature> {
        let (callee, type_arguments) = match self.data(call)? {
            NodeData::Call {
                callee,
                type_arguments,
                ..
            } => (*callee, type_arguments),
            _ => return None,
        };
        let name = match self.data(callee)? {
            NodeData::Identifier { name } | NodeData::PropertyAccess { name, .. } => name,
            _ => return None,
        };
        let declaration = self.functions.get(name)?;
        let bindings = declaration
            .type_parameters
            .iter()
            .enumerate()
            .map(|(i, parameter)| {
                let argument = type_arguments
                    .get(i)
                    .and_then(|argument| self.type_text(*argument))
                    .map_or_else(|| "unknown".to_owned(), |ty| ty.0);
                (parameter.clone(), argument)
            })
            .collect::<Vec<_>>();
        let return_type = match declaration.return_type.and_then(|ty| self.type_text(ty)) {
            Some(ty) => ScriptType(types::substitute(&ty.0, &bindings)),
            None => ScriptType("void".to_owned()),
        };
        trace!("call to {} resolved to {}", name, return_type);
        Some(ScriptSignature {
            function: name.clone(),
            return_type,
        })
    }

    fn return_type_of_signature(&self, signature: &ScriptSignature) -> ScriptType {
        signature.return_type.clone()
    }

    fn type_from_type_argument(&self, call: ScriptNode, index: usize) -> Option<ScriptType> {
        match self.data(call)? {
            NodeData::Call { type_arguments, .. } => self.type_text(*type_arguments.get(index)?),
            _ => None,
        }
    }

    fn type_at_location(&self, node: ScriptNode) -> Option<ScriptType> {
        self.type_of(node, 0)
    }

    fn resolved_type_argument(&self, ty: &ScriptType, index: usize) -> Option<ScriptType> {
        types::type_arguments(&ty.0)
            .into_iter()
            .nth(index)
            .map(ScriptType)
    }

    fn type_to_string(&self, ty: &ScriptType) -> String {
        ty.0.clone()
    }
}

impl Program for ScriptProgram {
    type File = ScriptFile;
    type Checker = Self;

    fn source_files(&self) -> Vec<&ScriptFile> {
        self.files.iter().collect()
    }

    fn source_file(&self, file_name: &str) -> Option<&ScriptFile> {
        self.files.iter().find(|f| f.file_name() == file_name)
    }

    fn type_checker(&self) -> &Self {
        self
    }
}
