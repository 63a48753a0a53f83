//! Arena syntax tree of a parsed script.

use crate::error::ScriptError;
use crate::lexer::LineIndex;
use crate::parser::parse_script;
use rtt_api::host::SourceFile;
use rtt_api::model::{LineColumn, NodeShape, TextRange};

/// A handle to a node of a [`ScriptFile`].
///
/// It carries the file it belongs to, so a program-wide oracle can resolve it.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash)]
pub struct ScriptNode {
    pub(crate) file: u32,
    pub(crate) index: u32,
}

#[derive(Debug, Clone)]
pub(crate) enum NodeData {
    SourceFile {
        statements: Vec<ScriptNode>,
    },
    Block {
        statements: Vec<ScriptNode>,
    },
    ExpressionStatement {
        expression: ScriptNode,
    },
    ReturnStatement {
        expression: Option<ScriptNode>,
    },
    ImportDeclaration,
    /// Interfaces and other declarations only kept for their range.
    Skipped,
    FunctionDeclaration {
        name: String,
        type_parameters: Vec<String>,
        parameters: Vec<ScriptNode>,
        return_type: Option<ScriptNode>,
        body: Option<ScriptNode>,
    },
    VariableDeclaration {
        name: String,
        type_annotation: Option<ScriptNode>,
        initializer: Option<ScriptNode>,
    },
    TypeAlias {
        aliased: ScriptNode,
    },
    Parameter {
        name: String,
        type_annotation: Option<ScriptNode>,
        initializer: Option<ScriptNode>,
    },
    Type {
        text: String,
    },
    Call {
        callee: ScriptNode,
        type_arguments: Vec<ScriptNode>,
        arguments: Vec<ScriptNode>,
    },
    Identifier {
        name: String,
    },
    StringLiteral {
        value: String,
    },
    TemplateLiteral,
    NumericLiteral,
    PropertyAccess {
        object: ScriptNode,
        name: String,
    },
    Parenthesized {
        expression: ScriptNode,
    },
    Function {
        parameters: Vec<ScriptNode>,
        return_type: Option<ScriptNode>,
        body: ScriptNode,
    },
    ArrayLiteral {
        elements: Vec<ScriptNode>,
    },
    ObjectLiteral {
        properties: Vec<ScriptNode>,
    },
    PropertyAssignment {
        name: String,
        initializer: ScriptNode,
    },
    ShorthandProperty,
    Method {
        function: ScriptNode,
    },
    Spread {
        expression: ScriptNode,
    },
    /// Operands of unary, binary and conditional operators.
    Binary {
        operands: Vec<ScriptNode>,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct NodeEntry {
    pub(crate) data: NodeData,
    pub(crate) range: TextRange,
}

/// A parsed script.
///
/// It implements the `SourceFile` trait.
///
/// ```
/// use rtt_api::host::SourceFile;
/// use rtt_api::model::NodeShape;
/// use rtt_script::ScriptFile;
///
/// let file = ScriptFile::parse("a.spec-types.ts", "describeType('group', () => {});")?;
/// let statement = file.children(file.root())[0];
/// let call = file.children(statement)[0];
/// match file.shape(call) {
///     NodeShape::Call { arguments, .. } => assert_eq!(2, arguments.len()),
///     shape => panic!("unexpected shape {:?}", shape),
/// }
/// # Result::<_, rtt_script::ScriptError>::Ok(())
/// ```
#[derive(Debug, Clone)]
pub struct ScriptFile {
    id: u32,
    name: String,
    text: String,
    nodes: Vec<NodeEntry>,
    root: ScriptNode,
    lines: LineIndex,
}

impl ScriptFile {
    /// Parses a standalone script.
    pub fn parse(name: impl Into<String>, text: impl Into<String>) -> Result<Self, ScriptError> {
        Self::parse_with_id(0, name.into(), text.into())
    }

    pub(crate) fn parse_with_id(id: u32, name: String, text: String) -> Result<Self, ScriptError> {
        let lines = LineIndex::new(&text);
        let (nodes, root) = parse_script(id, &text, &lines).map_err(|e| e.in_file(&name))?;
        Ok(Self {
            id,
            name,
            text,
            nodes,
            root,
            lines,
        })
    }

    pub(crate) fn data(&self, node: ScriptNode) -> Option<&NodeData> {
        self.entry(node).map(|e| &e.data)
    }

    fn entry(&self, node: ScriptNode) -> Option<&NodeEntry> {
        if node.file == self.id {
            self.nodes.get(node.index as usize)
        } else {
            None
        }
    }

    /// The top-level statements of the file.
    pub(crate) fn statements(&self) -> &[ScriptNode] {
        match self.data(self.root) {
            Some(NodeData::SourceFile { statements }) => statements,
            _ => &[],
        }
    }

    /// All nodes of the file in pre-order.
    pub(crate) fn descendants(&self) -> Vec<ScriptNode> {
        let mut result = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            result.push(node);
            stack.extend(self.children(node).into_iter().rev());
        }
        result
    }
}

impl SourceFile for ScriptFile {
    type Node = ScriptNode;

    fn file_name(&self) -> &str {
        &self.name
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn root(&self) -> ScriptNode {
        self.root
    }

    fn children(&self, node: ScriptNode) -> Vec<ScriptNode> {
        let data = match self.data(node) {
            Some(data) => data,
            None => return Vec::new(),
        };
        match data {
            NodeData::SourceFile { statements } | NodeData::Block { statements } => {
                statements.clone()
            }
            NodeData::ExpressionStatement { expression }
            | NodeData::Parenthesized { expression }
            | NodeData::Spread { expression } => vec![*expression],
            NodeData::ReturnStatement { expression } => expression.iter().copied().collect(),
            NodeData::FunctionDeclaration {
                parameters,
                return_type,
                body,
                ..
            } => parameters
                .iter()
                .chain(return_type)
                .chain(body)
                .copied()
                .collect(),
            NodeData::VariableDeclaration {
                type_annotation,
                initializer,
                ..
            }
            | NodeData::Parameter {
                type_annotation,
                initializer,
                ..
            } => type_annotation.iter().chain(initializer).copied().collect(),
            NodeData::TypeAlias { aliased } => vec![*aliased],
            NodeData::Call {
                callee,
                type_arguments,
                arguments,
            } => std::iter::once(callee)
                .chain(type_arguments)
                .chain(arguments)
                .copied()
                .collect(),
            NodeData::PropertyAccess { object, .. } => vec![*object],
            NodeData::Function {
                parameters,
                return_type,
                body,
            } => parameters
                .iter()
                .chain(return_type)
                .chain(std::iter::once(body))
                .copied()
                .collect(),
            NodeData::ArrayLiteral { elements } => elements.clone(),
            NodeData::Binary { operands } => operands.clone(),
            NodeData::ObjectLiteral { properties } => properties.clone(),
            NodeData::PropertyAssignment { initializer, .. } => vec![*initializer],
            NodeData::Method { function } => vec![*function],
            NodeData::ImportDeclaration
            | NodeData::Skipped
            | NodeData::Type { .. }
            | NodeData::Identifier { .. }
            | NodeData::StringLiteral { .. }
            | NodeData::TemplateLiteral
            | NodeData::NumericLiteral
            | NodeData::ShorthandProperty => Vec::new(),
        }
    }

    fn shape(&self, node: ScriptNode) -> NodeShape<'_, ScriptNode> {
        match self.data(node) {
            Some(NodeData::Call {
                callee,
                type_arguments,
                arguments,
            }) => NodeShape::Call {
                callee: *callee,
                type_arguments: type_arguments.as_slice(),
                arguments: arguments.as_slice(),
            },
            Some(NodeData::Identifier { name }) => NodeShape::Identifier {
                name: name.as_str(),
            },
            Some(NodeData::StringLiteral { value }) => NodeShape::StringLiteral {
                value: value.as_str(),
            },
            Some(NodeData::PropertyAccess { object, name }) => NodeShape::PropertyAccess {
                object: *object,
                name: name.as_str(),
            },
            Some(NodeData::Function { body, .. }) => NodeShape::FunctionLike { body: Some(*body) },
            Some(NodeData::FunctionDeclaration { body, .. }) => {
                NodeShape::FunctionLike { body: *body }
            }
            Some(NodeData::ArrayLiteral { elements }) => NodeShape::ArrayLiteral {
                elements: elements.as_slice(),
            },
            Some(NodeData::ObjectLiteral { properties }) => NodeShape::ObjectLiteral {
                properties: properties.as_slice(),
            },
            Some(NodeData::PropertyAssignment { name, initializer }) => {
                NodeShape::PropertyAssignment {
                    name: name.as_str(),
                    initializer: *initializer,
                }
            }
            _ => NodeShape::Other,
        }
    }

    fn range(&self, node: ScriptNode) -> TextRange {
        self.entry(node).map(|e| e.range).unwrap_or_default()
    }

    fn line_and_column(&self, offset: usize) -> LineColumn {
        self.lines.line_column(&self.text, offset)
    }
}
