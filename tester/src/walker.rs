//! Discovery of test groups and test cases in a syntax tree.

use crate::report::{TestCase, TestGroup, TestNode, Verdict};
use crate::resolver::VerdictResolver;
use rtt_api::host::{SourceFile, TypeChecker};
use rtt_api::model::NodeShape;
use tracing::debug;

/// Names of the functions introducing a group of tests.
pub const GROUP_NAMES: [&str; 2] = ["describeType", "describe"];
/// Names of the functions introducing a test.
pub const TEST_NAMES: [&str; 2] = ["testType", "test"];

enum Site<N> {
    Group { description: N, callback: N },
    Test { description: N, callback: N },
}

/// A group being built: `pending` holds the nodes left to visit, last one first.
struct Frame<N> {
    /// `None` for the file itself.
    description: Option<String>,
    children: Vec<TestNode>,
    pending: Vec<N>,
}

/// Walks a file to build its tree of test results.
///
/// ```
/// use rtt_api::host::Program;
/// use rtt_script::ScriptProgram;
/// use rtt_tester::report::Status;
/// use rtt_tester::walker::TreeWalker;
///
/// let program = ScriptProgram::from_source(
///     "a.spec-types.ts",
///     "declare function fails(): RTT_FAIL<'Expected `number`'>;\n\
///      describeType('numbers', () => { testType('is a number', () => fails()); });",
/// )?;
/// let file = program.source_file("a.spec-types.ts").unwrap();
/// let groups = TreeWalker::new(file, program.type_checker()).walk();
/// assert_eq!(1, groups.len());
/// assert_eq!(Status::Failed, groups[0].status());
/// # Result::<_, rtt_script::ScriptError>::Ok(())
/// ```
pub struct TreeWalker<'a, F: SourceFile, C: TypeChecker<F::Node>> {
    file: &'a F,
    resolver: VerdictResolver<'a, F, C>,
}

impl<'a, F: SourceFile, C: TypeChecker<F::Node>> TreeWalker<'a, F, C> {
    pub fn new(file: &'a F, checker: &'a C) -> Self {
        Self {
            file,
            resolver: VerdictResolver::new(file, checker),
        }
    }

    /// Returns the top-level groups of the file in source order.
    ///
    /// Tests outside of any group are ignored. Nesting depth is only bounded by memory.
    pub fn walk(&self) -> Vec<TestGroup> {
        let mut frames = vec![Frame {
            description: None,
            children: Vec::new(),
            pending: vec![self.file.root()],
        }];
        while let Some(frame) = frames.last_mut() {
            let node = match frame.pending.pop() {
                Some(node) => node,
                None => {
                    if let Some(finished) = frames.pop() {
                        if let Some(groups) = self.close(finished, frames.last_mut()) {
                            return groups;
                        }
                    }
                    continue;
                }
            };
            match self.site(node) {
                Some(Site::Group {
                    description,
                    callback,
                }) => {
                    let pending = match self.file.shape(callback) {
                        NodeShape::FunctionLike { body: Some(body) } => vec![body],
                        _ => Vec::new(),
                    };
                    frames.push(Frame {
                        description: Some(self.description(description)),
                        children: Vec::new(),
                        pending,
                    });
                }
                Some(Site::Test {
                    description,
                    callback,
                }) => {
                    if frame.description.is_some() {
                        frame
                            .children
                            .push(TestNode::Case(self.case(description, callback)));
                    } else {
                        debug!(
                            "test '{}' outside of a group is ignored",
                            self.description(description)
                        );
                    }
                }
                None => frame
                    .pending
                    .extend(self.file.children(node).into_iter().rev()),
            }
        }
        Vec::new()
    }

    /// Builds the group of a fully visited frame into its parent.
    ///
    /// Returns the top-level groups once the file frame is closed.
    fn close(
        &self,
        frame: Frame<F::Node>,
        parent: Option<&mut Frame<F::Node>>,
    ) -> Option<Vec<TestGroup>> {
        let description = match frame.description {
            Some(description) => description,
            None => {
                return Some(
                    frame
                        .children
                        .into_iter()
                        .filter_map(|child| match child {
                            TestNode::Group(group) => Some(group),
                            TestNode::Case(_) => None,
                        })
                        .collect(),
                )
            }
        };
        let group = TestGroup::new(description, frame.children);
        debug!(
            "group '{}' with {} children: {:?}",
            group.description(),
            group.children().len(),
            group.status()
        );
        match parent {
            Some(parent) => {
                parent.children.push(TestNode::Group(group));
                None
            }
            None => Some(vec![group]),
        }
    }

    fn site(&self, node: F::Node) -> Option<Site<F::Node>> {
        let (callee, arguments) = match self.file.shape(node) {
            NodeShape::Call {
                callee, arguments, ..
            } => (callee, arguments),
            _ => return None,
        };
        let name = match self.file.shape(callee) {
            NodeShape::Identifier { name } => name,
            _ => return None,
        };
        if arguments.len() < 2 {
            return None;
        }
        let (description, callback) = (arguments[0], arguments[1]);
        if GROUP_NAMES.contains(&name) && self.file.shape(callback).is_function_like() {
            Some(Site::Group {
                description,
                callback,
            })
        } else if TEST_NAMES.contains(&name) {
            Some(Site::Test {
                description,
                callback,
            })
        } else {
            None
        }
    }

    fn description(&self, node: F::Node) -> String {
        match self.file.shape(node) {
            NodeShape::StringLiteral { value } => value.to_owned(),
            NodeShape::Identifier { name } => name.to_owned(),
            _ => String::new(),
        }
    }

    fn case(&self, description: F::Node, callback: F::Node) -> TestCase {
        let description = self.description(description);
        let verdict = self.first_failure(self.assertions(callback));
        debug!("test '{}': {:?}", description, verdict.status());
        TestCase {
            description,
            verdict,
        }
    }

    /// The assertion calls of a test callback in source order.
    fn assertions(&self, callback: F::Node) -> Vec<F::Node> {
        match self.file.shape(callback) {
            NodeShape::FunctionLike { body: Some(body) } => {
                let mut calls = Vec::new();
                self.collect_calls(body, &mut calls);
                calls
            }
            NodeShape::ArrayLiteral { elements } => elements
                .iter()
                .copied()
                .filter(|element| self.file.shape(*element).is_call())
                .collect(),
            NodeShape::ObjectLiteral { properties } => properties
                .iter()
                .filter_map(|property| match self.file.shape(*property) {
                    NodeShape::PropertyAssignment { initializer, .. }
                        if self.file.shape(initializer).is_call() =>
                    {
                        Some(initializer)
                    }
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// The calls of a subtree in pre-order.
    fn collect_calls(&self, root: F::Node, calls: &mut Vec<F::Node>) {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if self.file.shape(node).is_call() {
                calls.push(node);
            }
            stack.extend(self.file.children(node).into_iter().rev());
        }
    }

    /// Only the first failing assertion is reported.
    fn first_failure(&self, assertions: Vec<F::Node>) -> Verdict {
        assertions
            .into_iter()
            .map(|call| self.resolver.resolve(call))
            .find(|verdict| verdict.status().is_failed())
            .unwrap_or(Verdict::Pass)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::report::Status;
    use rtt_api::model::TextRange;

    enum Fake {
        Call { callee: usize, arguments: Vec<usize> },
        Identifier(&'static str),
        Text(&'static str),
        Function(usize),
    }

    /// A file made of `depth` nested groups around a single failing test.
    #[derive(Default)]
    struct Nested {
        nodes: Vec<Fake>,
    }

    impl Nested {
        fn new(depth: usize) -> Self {
            let mut file = Self::default();
            let assertion = file.call("fails", Vec::new());
            let mut node = file.site("testType", "t", assertion);
            for _ in 0..depth {
                node = file.site("describeType", "level", node);
            }
            file
        }

        fn push(&mut self, node: Fake) -> usize {
            self.nodes.push(node);
            self.nodes.len() - 1
        }

        fn call(&mut self, name: &'static str, arguments: Vec<usize>) -> usize {
            let callee = self.push(Fake::Identifier(name));
            self.push(Fake::Call { callee, arguments })
        }

        fn site(&mut self, name: &'static str, description: &'static str, body: usize) -> usize {
            let description = self.push(Fake::Text(description));
            let callback = self.push(Fake::Function(body));
            self.call(name, vec![description, callback])
        }
    }

    impl SourceFile for Nested {
        type Node = usize;

        fn file_name(&self) -> &str {
            "nested.ts"
        }

        fn text(&self) -> &str {
            ""
        }

        fn root(&self) -> usize {
            self.nodes.len() - 1
        }

        fn children(&self, node: usize) -> Vec<usize> {
            match &self.nodes[node] {
                Fake::Call { callee, arguments } => {
                    std::iter::once(*callee).chain(arguments.iter().copied()).collect()
                }
                Fake::Function(body) => vec![*body],
                Fake::Identifier(_) | Fake::Text(_) => Vec::new(),
            }
        }

        fn shape(&self, node: usize) -> NodeShape<'_, usize> {
            match &self.nodes[node] {
                Fake::Call { callee, arguments } => NodeShape::Call {
                    callee: *callee,
                    type_arguments: &[],
                    arguments: arguments.as_slice(),
                },
                Fake::Identifier(name) => NodeShape::Identifier { name: *name },
                Fake::Text(value) => NodeShape::StringLiteral { value: *value },
                Fake::Function(body) => NodeShape::FunctionLike { body: Some(*body) },
            }
        }

        fn range(&self, _: usize) -> TextRange {
            TextRange::default()
        }
    }

    impl TypeChecker<usize> for Nested {
        type Signature = ();
        type Type = String;

        fn resolved_signature(&self, call: usize) -> Option<()> {
            match self.shape(call) {
                NodeShape::Call { callee, .. }
                    if self.shape(callee) == NodeShape::Identifier { name: "fails" } =>
                {
                    Some(())
                }
                _ => None,
            }
        }

        fn return_type_of_signature(&self, _: &()) -> String {
            "RTT_FAIL<'Expected `never`'>".to_owned()
        }

        fn type_from_type_argument(&self, _: usize, _: usize) -> Option<String> {
            None
        }

        fn type_at_location(&self, _: usize) -> Option<String> {
            None
        }

        fn resolved_type_argument(&self, _: &String, _: usize) -> Option<String> {
            None
        }

        fn type_to_string(&self, ty: &String) -> String {
            ty.clone()
        }
    }

    #[test]
    fn test_deep_nesting() {
        let depth = 2000;
        let file = Nested::new(depth);
        let groups = TreeWalker::new(&file, &file).walk();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].status(), Status::Failed);
        assert_eq!(groups[0].group_tally().failed, depth);
        assert_eq!(groups[0].case_tally().failed, 1);

        let mut group = &groups[0];
        for _ in 1..depth {
            group = match &group.children()[0] {
                TestNode::Group(group) => group,
                TestNode::Case(_) => panic!("a group is expected"),
            };
        }
        match &group.children()[0] {
            TestNode::Case(case) => assert_eq!(case.description, "t"),
            TestNode::Group(_) => panic!("a case is expected"),
        }
    }
}
