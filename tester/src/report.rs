//! The results of a type-test run.

use chrono::{DateTime, Duration, Utc};
use rtt_api::model::Location;

/// Number of source lines shown around a failing assertion, before and after it.
pub const EXCERPT_RADIUS: usize = 3;

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Status {
    Passed,
    Failed,
}

impl Status {
    pub fn is_failed(self) -> bool {
        self == Status::Failed
    }
}

/// The verdict of an assertion or of a test case.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Verdict {
    Pass,
    Fail { detail: FailureDetail },
}

impl Verdict {
    pub fn status(&self) -> Status {
        match self {
            Verdict::Pass => Status::Passed,
            Verdict::Fail { .. } => Status::Failed,
        }
    }

    pub fn detail(&self) -> Option<&FailureDetail> {
        match self {
            Verdict::Pass => None,
            Verdict::Fail { detail } => Some(detail),
        }
    }
}

/// Why an assertion failed and where.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct FailureDetail {
    /// The type the assertion received.
    pub received: String,
    /// The type explicitly given as first type argument of the assertion.
    pub expected: Option<String>,
    /// The expected type as written in the failure message.
    pub simplified_expected: Option<String>,
    /// The lines of the failure message.
    pub message: Vec<String>,
    pub location: Location,
    pub excerpt: SourceExcerpt,
}

impl FailureDetail {
    /// The explicit expected type, else the one from the failure message.
    pub fn expected_or_fallback(&self) -> Option<&str> {
        self.expected
            .as_deref()
            .or_else(|| self.simplified_expected.as_deref())
    }
}

/// Source lines around a position.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct SourceExcerpt {
    /// The 0-based number of the first line of `lines`.
    pub first_line: usize,
    pub lines: Vec<String>,
}

impl SourceExcerpt {
    /// Captures the lines `line - 3 ..= line + 3` of `text`, clipped to the text.
    ///
    /// ```
    /// use rtt_tester::report::SourceExcerpt;
    ///
    /// let excerpt = SourceExcerpt::capture("a\nb\nc\nd\ne", 1);
    /// assert_eq!(0, excerpt.first_line);
    /// assert_eq!(vec!["a", "b", "c", "d", "e"], excerpt.lines);
    /// ```
    pub fn capture(text: &str, line: usize) -> Self {
        let first_line = line.saturating_sub(EXCERPT_RADIUS);
        Self {
            first_line,
            lines: text
                .lines()
                .skip(first_line)
                .take(line + EXCERPT_RADIUS + 1 - first_line)
                .map(|line| line.to_owned())
                .collect(),
        }
    }
}

/// A single test.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TestCase {
    pub description: String,
    pub verdict: Verdict,
}

impl TestCase {
    pub fn status(&self) -> Status {
        self.verdict.status()
    }
}

/// A child of a [`TestGroup`].
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TestNode {
    Case(TestCase),
    Group(TestGroup),
}

impl TestNode {
    pub fn status(&self) -> Status {
        match self {
            TestNode::Case(case) => case.status(),
            TestNode::Group(group) => group.status(),
        }
    }
}

/// A named set of tests and nested groups.
///
/// Its status is computed from its children when it is built: it is failed iff one of its
/// descendant cases is failed.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TestGroup {
    description: String,
    status: Status,
    children: Vec<TestNode>,
}

impl TestGroup {
    pub fn new(description: impl Into<String>, children: Vec<TestNode>) -> Self {
        let status = if children.iter().any(|c| c.status().is_failed()) {
            Status::Failed
        } else {
            Status::Passed
        };
        Self {
            description: description.into(),
            status,
            children,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn children(&self) -> &[TestNode] {
        &self.children
    }

    /// Counts this group and its nested groups.
    pub fn group_tally(&self) -> Tally {
        let mut tally = Tally::default();
        let mut stack = vec![self];
        while let Some(group) = stack.pop() {
            tally.add(group.status);
            stack.extend(group.children.iter().filter_map(|child| match child {
                TestNode::Group(group) => Some(group),
                TestNode::Case(_) => None,
            }));
        }
        tally
    }

    /// Counts the cases of this group and of its nested groups.
    pub fn case_tally(&self) -> Tally {
        let mut tally = Tally::default();
        let mut stack = vec![self];
        while let Some(group) = stack.pop() {
            for child in &group.children {
                match child {
                    TestNode::Case(case) => tally.add(case.status()),
                    TestNode::Group(group) => stack.push(group),
                }
            }
        }
        tally
    }
}

/// The groups found in a file.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct FileResult {
    pub file_name: String,
    pub groups: Vec<TestGroup>,
}

impl FileResult {
    pub fn status(&self) -> Status {
        if self.groups.iter().any(|g| g.status().is_failed()) {
            Status::Failed
        } else {
            Status::Passed
        }
    }
}

/// Total, failed and passed counts.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default, Hash)]
pub struct Tally {
    pub total: usize,
    pub failed: usize,
    pub passed: usize,
}

impl Tally {
    pub fn add(&mut self, status: Status) {
        self.total += 1;
        match status {
            Status::Failed => self.failed += 1,
            Status::Passed => self.passed += 1,
        }
    }
}

impl std::ops::AddAssign for Tally {
    fn add_assign(&mut self, other: Self) {
        self.total += other.total;
        self.failed += other.failed;
        self.passed += other.passed;
    }
}

/// Run-wide counters. They only grow while files are recorded.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default, Hash)]
pub struct Counters {
    /// Test files, also known as suites.
    pub files: Tally,
    /// Groups, nested ones included.
    pub groups: Tally,
    pub cases: Tally,
}

/// The results of a run over all the files of a program.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RunResult {
    files: Vec<FileResult>,
    counters: Counters,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
}

impl RunResult {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            files: Vec::new(),
            counters: Counters::default(),
            started_at,
            finished_at: started_at,
        }
    }

    /// Adds the results of a file and updates the counters.
    pub fn record(&mut self, file: FileResult) {
        self.counters.files.add(file.status());
        for group in &file.groups {
            self.counters.groups += group.group_tally();
            self.counters.cases += group.case_tally();
        }
        self.files.push(file);
    }

    pub fn finish(&mut self, finished_at: DateTime<Utc>) {
        self.finished_at = finished_at;
    }

    pub fn files(&self) -> &[FileResult] {
        &self.files
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn duration(&self) -> Duration {
        self.finished_at - self.started_at
    }

    /// `1` if a test case failed, else `0`.
    pub fn exit_code(&self) -> i32 {
        if self.counters.cases.failed > 0 {
            1
        } else {
            0
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn case(description: &str, failed: bool) -> TestNode {
        let verdict = if failed {
            Verdict::Fail {
                detail: FailureDetail {
                    received: "string".to_owned(),
                    expected: None,
                    simplified_expected: Some("number".to_owned()),
                    message: vec!["Expected `number`".to_owned()],
                    location: Location::default(),
                    excerpt: SourceExcerpt::default(),
                },
            }
        } else {
            Verdict::Pass
        };
        TestNode::Case(TestCase {
            description: description.to_owned(),
            verdict,
        })
    }

    #[test]
    fn test_empty_group_passes() {
        assert_eq!(TestGroup::new("empty", Vec::new()).status(), Status::Passed);
    }

    #[test]
    fn test_nested_tallies() {
        let inner = TestGroup::new("inner", vec![case("a", true), case("b", false)]);
        let outer = TestGroup::new(
            "outer",
            vec![
                TestNode::Group(inner),
                TestNode::Group(TestGroup::new("ok", vec![case("c", false)])),
            ],
        );
        assert_eq!(outer.status(), Status::Failed);
        assert_eq!(
            outer.group_tally(),
            Tally {
                total: 3,
                failed: 2,
                passed: 1
            }
        );
        assert_eq!(
            outer.case_tally(),
            Tally {
                total: 3,
                failed: 1,
                passed: 2
            }
        );
    }

    #[test]
    fn test_record_and_exit_code() {
        let start = Utc::now();
        let mut run = RunResult::new(start);
        run.record(FileResult {
            file_name: "a.spec-types.ts".to_owned(),
            groups: vec![TestGroup::new("g", vec![case("a", false)])],
        });
        assert_eq!(run.exit_code(), 0);
        run.record(FileResult {
            file_name: "b.spec-types.ts".to_owned(),
            groups: vec![TestGroup::new("g", vec![case("b", true)])],
        });
        run.finish(start + Duration::milliseconds(12));
        assert_eq!(run.exit_code(), 1);
        assert_eq!(run.counters().files.failed, 1);
        assert_eq!(run.counters().cases.total, 2);
        assert_eq!(run.duration(), Duration::milliseconds(12));
    }

    #[test]
    fn test_excerpt_is_clipped() {
        let text = (0..20).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let excerpt = SourceExcerpt::capture(&text, 10);
        assert_eq!(excerpt.first_line, 7);
        assert_eq!(excerpt.lines, vec!["7", "8", "9", "10", "11", "12", "13"]);
        let excerpt = SourceExcerpt::capture(&text, 19);
        assert_eq!(excerpt.lines, vec!["16", "17", "18", "19"]);
    }
}
