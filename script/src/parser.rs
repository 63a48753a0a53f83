//! Recursive descent parser for type-test scripts.
//!
//! It understands the subset of TypeScript used by type tests: declarations, calls with explicit
//! type arguments, arrow functions, array and object literals. Types are kept as raw text.

use crate::error::*;
use crate::lexer::*;
use crate::tree::*;
use rtt_api::model::TextRange;

/// Maximum number of nested expressions and blocks.
const MAX_NESTING: usize = 256;

pub(crate) fn parse_script(
    file: u32,
    text: &str,
    lines: &LineIndex,
) -> Result<(Vec<NodeEntry>, ScriptNode), ScriptError> {
    let tokens = tokenize(text)?;
    let mut parser = Parser {
        text,
        lines,
        tokens,
        position: 0,
        depth: 0,
        file,
        nodes: Vec::new(),
    };
    let statements = parser.parse_statements(None)?;
    let root = parser.push(
        NodeData::SourceFile { statements },
        TextRange::new(0, text.len()),
    );
    Ok((parser.nodes, root))
}

struct Parser<'a> {
    text: &'a str,
    lines: &'a LineIndex,
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
    file: u32,
    nodes: Vec<NodeEntry>,
}

impl<'a> Parser<'a> {
    fn current(&self) -> &Token {
        self.peek(0)
    }

    fn peek(&self, count: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.position + count).min(last)]
    }

    fn bump(&mut self) -> Token {
        let token = self.current().clone();
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
        token
    }

    fn token_text(&self, token: &Token) -> &'a str {
        &self.text[token.range.start..token.range.end()]
    }

    fn is_keyword(&self, token: &Token, keyword: &str) -> bool {
        token.kind == TokenKind::Identifier && self.token_text(token) == keyword
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.is_keyword(self.current(), keyword)
    }

    fn at_punct(&self, c: char) -> bool {
        self.current().is_punct(c)
    }

    fn eat_punct(&mut self, c: char) -> bool {
        if self.at_punct(c) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, c: char, expected: &'static str) -> Result<Token, ScriptError> {
        if self.at_punct(c) {
            Ok(self.bump())
        } else {
            self.unexpected(expected)
        }
    }

    fn expect_identifier(&mut self, expected: &'static str) -> Result<String, ScriptError> {
        if self.current().kind == TokenKind::Identifier {
            let token = self.bump();
            Ok(self.token_text(&token).to_owned())
        } else {
            self.unexpected(expected)
        }
    }

    fn unexpected<T>(&self, expected: &'static str) -> Result<T, ScriptError> {
        let token = self.current();
        let kind = if token.kind == TokenKind::Eof {
            ScriptErrorKind::PrematureEOF
        } else {
            ScriptErrorKind::UnexpectedToken {
                found: self.token_text(token).to_owned(),
                expected,
            }
        };
        Err(ScriptError::new(
            kind,
            self.lines.line_column(self.text, token.range.start),
        ))
    }

    /// Enters a nested expression or block, failing past `MAX_NESTING` levels.
    fn nest<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ScriptError>,
    ) -> Result<T, ScriptError> {
        if self.depth >= MAX_NESTING {
            return Err(ScriptError::new(
                ScriptErrorKind::TooDeeplyNested,
                self.lines.line_column(self.text, self.current().range.start),
            ));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// End offset of the last consumed token.
    fn previous_end(&self) -> usize {
        if self.position == 0 {
            0
        } else {
            self.tokens[self.position - 1].range.end()
        }
    }

    fn range_from(&self, start: usize) -> TextRange {
        TextRange::new(start, self.previous_end().saturating_sub(start))
    }

    /// Returns `true` if a line break separates the current token from the previous one.
    fn line_break_before(&self) -> bool {
        self.position > 0
            && self.text[self.previous_end()..self.current().range.start].contains('\n')
    }

    fn push(&mut self, data: NodeData, range: TextRange) -> ScriptNode {
        let node = ScriptNode {
            file: self.file,
            index: self.nodes.len() as u32,
        };
        self.nodes.push(NodeEntry { data, range });
        node
    }

    fn parse_statements(&mut self, end: Option<char>) -> Result<Vec<ScriptNode>, ScriptError> {
        let mut statements = Vec::new();
        loop {
            while self.eat_punct(';') {}
            if self.current().kind == TokenKind::Eof {
                return match end {
                    None => Ok(statements),
                    Some(_) => self.unexpected("'}'"),
                };
            }
            if end.map_or(false, |end| self.at_punct(end)) {
                return Ok(statements);
            }
            statements.push(self.parse_statement()?);
        }
    }

    fn parse_statement(&mut self) -> Result<ScriptNode, ScriptError> {
        let start = self.current().range.start;
        if self.at_keyword("import") {
            return self.parse_import(start);
        }
        while self.at_keyword("export") {
            self.bump();
            if self.at_keyword("default") {
                self.bump();
            }
        }
        if self.at_keyword("declare") {
            self.bump();
            return if self.at_keyword("function") {
                self.parse_function_declaration(start, true)
            } else if self.at_keyword("const") || self.at_keyword("let") || self.at_keyword("var")
            {
                self.parse_variable_declaration(start)
            } else {
                self.unexpected("function or variable declaration")
            };
        }
        if self.at_keyword("function") && self.peek(1).kind == TokenKind::Identifier {
            return self.parse_function_declaration(start, false);
        }
        if self.at_keyword("const") || self.at_keyword("let") || self.at_keyword("var") {
            return self.parse_variable_declaration(start);
        }
        if self.at_keyword("type")
            && self.peek(1).kind == TokenKind::Identifier
            && (self.peek(2).is_punct('=') || self.peek(2).is_punct('<'))
        {
            return self.parse_type_alias(start);
        }
        if self.at_keyword("interface") && self.peek(1).kind == TokenKind::Identifier {
            while !self.at_punct('{') {
                if self.current().kind == TokenKind::Eof {
                    return self.unexpected("'{'");
                }
                self.bump();
            }
            self.skip_balanced()?;
            return Ok(self.push(NodeData::Skipped, self.range_from(start)));
        }
        if self.at_keyword("return") {
            self.bump();
            let expression = if self.at_punct(';')
                || self.at_punct('}')
                || self.current().kind == TokenKind::Eof
                || self.line_break_before()
            {
                None
            } else {
                Some(self.parse_expression()?)
            };
            self.eat_punct(';');
            return Ok(self.push(
                NodeData::ReturnStatement { expression },
                self.range_from(start),
            ));
        }
        if self.at_punct('{') {
            return self.parse_block();
        }
        let expression = self.parse_expression()?;
        self.eat_punct(';');
        Ok(self.push(
            NodeData::ExpressionStatement { expression },
            self.range_from(start),
        ))
    }

    fn parse_import(&mut self, start: usize) -> Result<ScriptNode, ScriptError> {
        self.bump();
        loop {
            match self.bump().kind {
                TokenKind::String(_) => break,
                TokenKind::Eof => return self.unexpected("module specifier"),
                _ => (),
            }
        }
        self.eat_punct(';');
        Ok(self.push(NodeData::ImportDeclaration, self.range_from(start)))
    }

    fn parse_block(&mut self) -> Result<ScriptNode, ScriptError> {
        self.nest(Self::parse_block_content)
    }

    fn parse_block_content(&mut self) -> Result<ScriptNode, ScriptError> {
        let start = self.expect_punct('{', "'{'")?.range.start;
        let statements = self.parse_statements(Some('}'))?;
        self.expect_punct('}', "'}'")?;
        Ok(self.push(NodeData::Block { statements }, self.range_from(start)))
    }

    fn parse_function_declaration(
        &mut self,
        start: usize,
        declare: bool,
    ) -> Result<ScriptNode, ScriptError> {
        self.bump(); // function
        let name = self.expect_identifier("function name")?;
        let type_parameters = if self.at_punct('<') {
            self.parse_type_parameters()?
        } else {
            Vec::new()
        };
        let parameters = self.parse_parameters()?;
        let return_type = if self.eat_punct(':') {
            Some(if declare {
                self.parse_type(|t| t.is_punct(';'), true)?
            } else {
                self.parse_type(|t| t.is_punct(';') || t.is_punct('{'), true)?
            })
        } else {
            None
        };
        let body = if !declare && self.at_punct('{') {
            Some(self.parse_block()?)
        } else {
            self.eat_punct(';');
            None
        };
        Ok(self.push(
            NodeData::FunctionDeclaration {
                name,
                type_parameters,
                parameters,
                return_type,
                body,
            },
            self.range_from(start),
        ))
    }

    fn parse_variable_declaration(&mut self, start: usize) -> Result<ScriptNode, ScriptError> {
        self.bump(); // const, let or var
        let name = self.expect_identifier("variable name")?;
        let type_annotation = if self.eat_punct(':') {
            Some(self.parse_type(|t| t.is_punct(';') || t.is_punct('='), true)?)
        } else {
            None
        };
        let initializer = if self.eat_punct('=') {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.eat_punct(';');
        Ok(self.push(
            NodeData::VariableDeclaration {
                name,
                type_annotation,
                initializer,
            },
            self.range_from(start),
        ))
    }

    fn parse_type_alias(&mut self, start: usize) -> Result<ScriptNode, ScriptError> {
        self.bump(); // type
        self.expect_identifier("type name")?;
        if self.at_punct('<') {
            self.parse_type_parameters()?;
        }
        self.expect_punct('=', "'='")?;
        let aliased = self.parse_type(|t| t.is_punct(';'), true)?;
        self.eat_punct(';');
        Ok(self.push(
            NodeData::TypeAlias { aliased },
            self.range_from(start),
        ))
    }

    /// Parses `<T, U extends X = Y>` and returns the parameter names.
    fn parse_type_parameters(&mut self) -> Result<Vec<String>, ScriptError> {
        self.expect_punct('<', "'<'")?;
        let mut names = Vec::new();
        loop {
            names.push(self.expect_identifier("type parameter")?);
            if !self.at_punct(',') && !self.at_punct('>') {
                self.parse_type(|t| t.is_punct(',') || t.is_punct('>'), false)?;
            }
            if self.eat_punct('>') {
                return Ok(names);
            }
            self.expect_punct(',', "',' or '>'")?;
        }
    }

    fn parse_parameters(&mut self) -> Result<Vec<ScriptNode>, ScriptError> {
        self.expect_punct('(', "'('")?;
        let mut parameters = Vec::new();
        while !self.at_punct(')') {
            let start = self.current().range.start;
            if self.current().kind == TokenKind::Ellipsis {
                self.bump();
            }
            let name = if self.at_punct('{') || self.at_punct('[') {
                self.skip_balanced()?;
                String::new()
            } else {
                self.expect_identifier("parameter name")?
            };
            self.eat_punct('?');
            let type_annotation = if self.eat_punct(':') {
                Some(self.parse_type(
                    |t| t.is_punct(',') || t.is_punct(')') || t.is_punct('='),
                    false,
                )?)
            } else {
                None
            };
            let initializer = if self.eat_punct('=') {
                Some(self.parse_expression()?)
            } else {
                None
            };
            parameters.push(self.push(
                NodeData::Parameter {
                    name,
                    type_annotation,
                    initializer,
                },
                self.range_from(start),
            ));
            if !self.eat_punct(',') {
                break;
            }
        }
        self.expect_punct(')', "')'")?;
        Ok(parameters)
    }

    /// Captures a type as raw text until `is_end` matches a token outside of brackets.
    ///
    /// If `line_breaks_end` is set, a line break ends the type where a statement could end.
    fn parse_type(
        &mut self,
        is_end: impl Fn(&Token) -> bool,
        line_breaks_end: bool,
    ) -> Result<ScriptNode, ScriptError> {
        let start = self.current().range.start;
        let first = self.position;
        let mut depth = 0usize;
        loop {
            let token = self.current();
            if token.kind == TokenKind::Eof {
                break;
            }
            if depth == 0 {
                if is_end(token) || token.is_punct(')') || token.is_punct(']') {
                    break;
                }
                if token.is_punct('}') || token.is_punct('>') {
                    break;
                }
                if line_breaks_end
                    && self.position > first
                    && self.line_break_before()
                    && !self.type_continues()
                {
                    break;
                }
            }
            match token.kind {
                TokenKind::Punct('(') | TokenKind::Punct('[') | TokenKind::Punct('{')
                | TokenKind::Punct('<') => depth += 1,
                TokenKind::Punct(')') | TokenKind::Punct(']') | TokenKind::Punct('}')
                | TokenKind::Punct('>') => depth -= 1,
                _ => (),
            }
            self.bump();
        }
        if self.position == first {
            return self.unexpected("type");
        }
        let range = self.range_from(start);
        Ok(self.push(
            NodeData::Type {
                text: self.text[range.start..range.end()].to_owned(),
            },
            range,
        ))
    }

    /// Whether the type around a line break goes on, like in `A |\n B` or `A\n | B`.
    fn type_continues(&self) -> bool {
        let previous = &self.tokens[self.position - 1];
        let current = self.current();
        let continues_after = match previous.kind {
            TokenKind::Punct(c) => "|&=,:?<([{.".contains(c),
            TokenKind::Arrow => true,
            _ => self.is_keyword(previous, "extends") || self.is_keyword(previous, "keyof"),
        };
        let continues_before = match current.kind {
            TokenKind::Punct(c) => "|&?:.[".contains(c),
            TokenKind::Arrow => true,
            _ => self.is_keyword(current, "extends"),
        };
        continues_after || continues_before
    }

    /// Skips a bracketed region starting at the current token.
    fn skip_balanced(&mut self) -> Result<(), ScriptError> {
        let mut depth = 0usize;
        loop {
            match self.current().kind {
                TokenKind::Punct('(') | TokenKind::Punct('[') | TokenKind::Punct('{') => {
                    depth += 1
                }
                TokenKind::Punct(')') | TokenKind::Punct(']') | TokenKind::Punct('}') => {
                    depth = depth.saturating_sub(1)
                }
                TokenKind::Eof => return self.unexpected("closing bracket"),
                _ => (),
            }
            self.bump();
            if depth == 0 {
                return Ok(());
            }
        }
    }

    /// Parses an expression. Operators are only kept as the list of their operands.
    fn parse_expression(&mut self) -> Result<ScriptNode, ScriptError> {
        self.nest(Self::parse_operators)
    }

    fn parse_operators(&mut self) -> Result<ScriptNode, ScriptError> {
        let start = self.current().range.start;
        let first = self.parse_unary()?;
        let mut operands = vec![first];
        let mut open_conditionals = 0usize;
        loop {
            if self.at_punct(':') && open_conditionals > 0 {
                open_conditionals -= 1;
                self.bump();
            } else if self.at_punct('?') && !self.peek(1).is_punct('?') {
                open_conditionals += 1;
                self.bump();
            } else if self.at_operator() {
                while self.at_operator() {
                    self.bump();
                }
            } else {
                break;
            }
            operands.push(self.parse_unary()?);
        }
        if operands.len() == 1 {
            Ok(first)
        } else {
            Ok(self.push(NodeData::Binary { operands }, self.range_from(start)))
        }
    }

    fn at_operator(&self) -> bool {
        match self.current().kind {
            TokenKind::Punct(c) => "+-*/%<>=!&|^?".contains(c),
            _ => self.at_keyword("instanceof") || self.at_keyword("in"),
        }
    }

    fn parse_unary(&mut self) -> Result<ScriptNode, ScriptError> {
        while matches!(self.current().kind, TokenKind::Punct(c) if "!-+~".contains(c))
            || ["typeof", "void", "await", "new", "delete"]
                .iter()
                .any(|k| self.at_keyword(k) && self.peek(1).kind != TokenKind::Arrow)
        {
            self.bump();
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<ScriptNode, ScriptError> {
        let start = self.current().range.start;
        let mut expression = self.parse_primary()?;
        loop {
            if self.at_punct('.') || (self.at_punct('?') && self.peek(1).is_punct('.')) {
                if self.at_punct('?') {
                    self.bump();
                }
                self.bump();
                let name = self.expect_identifier("property name")?;
                expression = self.push(
                    NodeData::PropertyAccess {
                        object: expression,
                        name,
                    },
                    self.range_from(start),
                );
            } else if self.at_punct('(') || self.at_punct('<') {
                let type_arguments = if self.at_punct('<') {
                    match self.try_parse_type_arguments() {
                        Some(type_arguments) => type_arguments,
                        None => return Ok(expression),
                    }
                } else {
                    Vec::new()
                };
                let arguments = self.parse_arguments()?;
                expression = self.push(
                    NodeData::Call {
                        callee: expression,
                        type_arguments,
                        arguments,
                    },
                    self.range_from(start),
                );
            } else if self.at_punct('[') && !self.line_break_before() {
                self.bump();
                let index = self.parse_expression()?;
                self.expect_punct(']', "']'")?;
                expression = self.push(
                    NodeData::Binary {
                        operands: vec![expression, index],
                    },
                    self.range_from(start),
                );
            } else if self.at_punct('!') && !self.peek(1).is_punct('=') {
                self.bump();
            } else if self.at_keyword("as") || self.at_keyword("satisfies") {
                self.bump();
                self.parse_type(
                    |t| t.is_punct(';') || t.is_punct(','),
                    true,
                )?;
            } else {
                return Ok(expression);
            }
        }
    }

    /// Parses `<...>` if it is followed by `(`, or rewinds so `<` is read as an operator.
    fn try_parse_type_arguments(&mut self) -> Option<Vec<ScriptNode>> {
        let position = self.position;
        let node_count = self.nodes.len();
        match self.parse_type_arguments() {
            Ok(type_arguments) if self.at_punct('(') => Some(type_arguments),
            _ => {
                self.position = position;
                self.nodes.truncate(node_count);
                None
            }
        }
    }

    fn parse_type_arguments(&mut self) -> Result<Vec<ScriptNode>, ScriptError> {
        self.expect_punct('<', "'<'")?;
        let mut arguments = Vec::new();
        loop {
            arguments.push(self.parse_type(|t| t.is_punct(','), false)?);
            if self.eat_punct('>') {
                return Ok(arguments);
            }
            self.expect_punct(',', "',' or '>'")?;
        }
    }

    fn parse_arguments(&mut self) -> Result<Vec<ScriptNode>, ScriptError> {
        self.expect_punct('(', "'('")?;
        let arguments = self.parse_list(')')?;
        self.expect_punct(')', "')'")?;
        Ok(arguments)
    }

    /// Parses comma separated expressions until `end`, trailing comma allowed.
    fn parse_list(&mut self, end: char) -> Result<Vec<ScriptNode>, ScriptError> {
        let mut elements = Vec::new();
        while !self.at_punct(end) {
            elements.push(self.parse_element()?);
            if !self.eat_punct(',') {
                break;
            }
        }
        Ok(elements)
    }

    fn parse_element(&mut self) -> Result<ScriptNode, ScriptError> {
        if self.current().kind == TokenKind::Ellipsis {
            let start = self.bump().range.start;
            let expression = self.parse_expression()?;
            Ok(self.push(NodeData::Spread { expression }, self.range_from(start)))
        } else {
            self.parse_expression()
        }
    }

    fn parse_primary(&mut self) -> Result<ScriptNode, ScriptError> {
        let start = self.current().range.start;
        match self.current().kind.clone() {
            TokenKind::Identifier => {
                if self.at_keyword("function") {
                    return self.parse_function_expression();
                }
                if self.at_keyword("async")
                    && (self.peek(1).is_punct('(')
                        || (self.peek(1).kind == TokenKind::Identifier
                            && self.peek(2).kind == TokenKind::Arrow))
                {
                    self.bump();
                    return self.parse_primary();
                }
                if self.peek(1).kind == TokenKind::Arrow {
                    return self.parse_arrow_function();
                }
                let token = self.bump();
                let name = self.token_text(&token).to_owned();
                Ok(self.push(NodeData::Identifier { name }, token.range))
            }
            TokenKind::String(value) => {
                let token = self.bump();
                Ok(self.push(NodeData::StringLiteral { value }, token.range))
            }
            TokenKind::Template {
                value,
                substitutions,
            } => {
                let token = self.bump();
                let data = if substitutions {
                    NodeData::TemplateLiteral
                } else {
                    NodeData::StringLiteral { value }
                };
                Ok(self.push(data, token.range))
            }
            TokenKind::Number => {
                let token = self.bump();
                Ok(self.push(NodeData::NumericLiteral, token.range))
            }
            TokenKind::Punct('(') => {
                if self.is_arrow_ahead() {
                    return self.parse_arrow_function();
                }
                self.bump();
                let expression = self.parse_expression()?;
                self.expect_punct(')', "')'")?;
                Ok(self.push(
                    NodeData::Parenthesized { expression },
                    self.range_from(start),
                ))
            }
            TokenKind::Punct('[') => {
                self.bump();
                let elements = self.parse_list(']')?;
                self.expect_punct(']', "']'")?;
                Ok(self.push(NodeData::ArrayLiteral { elements }, self.range_from(start)))
            }
            TokenKind::Punct('{') => self.parse_object_literal(),
            _ => self.unexpected("expression"),
        }
    }

    /// At `(`, finds out if the parenthesis opens arrow function parameters.
    fn is_arrow_ahead(&self) -> bool {
        let mut depth = 0usize;
        for (offset, token) in self.tokens[self.position..].iter().enumerate() {
            match token.kind {
                TokenKind::Punct('(') | TokenKind::Punct('[') | TokenKind::Punct('{') => {
                    depth += 1
                }
                TokenKind::Punct(')') | TokenKind::Punct(']') | TokenKind::Punct('}') => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        let next = self.peek(offset + 1);
                        return next.kind == TokenKind::Arrow || next.is_punct(':');
                    }
                }
                TokenKind::Eof => return false,
                _ => (),
            }
        }
        false
    }

    fn parse_arrow_function(&mut self) -> Result<ScriptNode, ScriptError> {
        let start = self.current().range.start;
        let parameters = if self.current().kind == TokenKind::Identifier {
            let token = self.bump();
            let name = self.token_text(&token).to_owned();
            vec![self.push(
                NodeData::Parameter {
                    name,
                    type_annotation: None,
                    initializer: None,
                },
                token.range,
            )]
        } else {
            self.parse_parameters()?
        };
        let return_type = if self.eat_punct(':') {
            Some(self.parse_type(|t| t.kind == TokenKind::Arrow, false)?)
        } else {
            None
        };
        if self.current().kind != TokenKind::Arrow {
            return self.unexpected("'=>'");
        }
        self.bump();
        let body = if self.at_punct('{') {
            self.parse_block()?
        } else {
            self.parse_expression()?
        };
        Ok(self.push(
            NodeData::Function {
                parameters,
                return_type,
                body,
            },
            self.range_from(start),
        ))
    }

    fn parse_function_expression(&mut self) -> Result<ScriptNode, ScriptError> {
        let start = self.bump().range.start; // function
        if self.current().kind == TokenKind::Identifier {
            self.bump();
        }
        let parameters = self.parse_parameters()?;
        let return_type = if self.eat_punct(':') {
            Some(self.parse_type(|t| t.is_punct('{'), false)?)
        } else {
            None
        };
        let body = self.parse_block()?;
        Ok(self.push(
            NodeData::Function {
                parameters,
                return_type,
                body,
            },
            self.range_from(start),
        ))
    }

    fn parse_object_literal(&mut self) -> Result<ScriptNode, ScriptError> {
        let start = self.expect_punct('{', "'{'")?.range.start;
        let mut properties = Vec::new();
        while !self.at_punct('}') {
            properties.push(self.parse_property()?);
            if !self.eat_punct(',') {
                break;
            }
        }
        self.expect_punct('}', "'}'")?;
        Ok(self.push(
            NodeData::ObjectLiteral { properties },
            self.range_from(start),
        ))
    }

    fn parse_property(&mut self) -> Result<ScriptNode, ScriptError> {
        let start = self.current().range.start;
        if self.current().kind == TokenKind::Ellipsis {
            return self.parse_element();
        }
        let name = match &self.current().kind {
            TokenKind::Identifier | TokenKind::Number => self.token_text(self.current()).to_owned(),
            TokenKind::String(value) => value.clone(),
            _ => return self.unexpected("property name"),
        };
        self.bump();
        if self.eat_punct(':') {
            let initializer = self.parse_expression()?;
            Ok(self.push(
                NodeData::PropertyAssignment { name, initializer },
                self.range_from(start),
            ))
        } else if self.at_punct('(') {
            let function_start = self.current().range.start;
            let parameters = self.parse_parameters()?;
            let return_type = if self.eat_punct(':') {
                Some(self.parse_type(|t| t.is_punct('{'), false)?)
            } else {
                None
            };
            let body = self.parse_block()?;
            let function = self.push(
                NodeData::Function {
                    parameters,
                    return_type,
                    body,
                },
                self.range_from(function_start),
            );
            Ok(self.push(NodeData::Method { function }, self.range_from(start)))
        } else {
            Ok(self.push(
                NodeData::ShorthandProperty,
                self.range_from(start),
            ))
        }
    }
}
