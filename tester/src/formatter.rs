//! Textual report of a run, in the style of the usual test runners.

use crate::report::{
    FailureDetail, FileResult, RunResult, Status, Tally, TestCase, TestGroup, TestNode,
};
use std::io::{self, Write};

const INDENT: &str = "  ";

/// Writes the report of a [`RunResult`](../report/struct.RunResult.html).
///
/// Write a report into a `Vec` buffer:
/// ```
/// use chrono::Utc;
/// use rtt_tester::formatter::TextReportFormatter;
/// use rtt_tester::report::RunResult;
///
/// let mut formatter = TextReportFormatter::new(Vec::default(), false);
/// formatter.format(&RunResult::new(Utc::now()))?;
/// let report = String::from_utf8(formatter.finish()).unwrap();
/// assert!(report.contains("Tests:       0 failed, 0 passed, 0 total"));
/// # std::io::Result::Ok(())
/// ```
pub struct TextReportFormatter<W: Write> {
    write: W,
    verbose: bool,
}

impl<W: Write> TextReportFormatter<W> {
    /// Builds a new formatter from a `Write` implementation
    pub fn new(write: W, verbose: bool) -> Self {
        Self { write, verbose }
    }

    /// Writes the report of a run
    pub fn format(&mut self, run: &RunResult) -> Result<(), io::Error> {
        self.write.write_all(render(run, self.verbose).as_bytes())
    }

    /// Finishes writing and returns the underlying `Write`
    pub fn finish(self) -> W {
        self.write
    }
}

/// Renders the report of a run.
///
/// Passing groups and cases are only shown if `verbose` is set. Failures are repeated in the
/// summary at the end.
pub fn render(run: &RunResult, verbose: bool) -> String {
    let mut renderer = Renderer {
        verbose,
        output: String::new(),
        records: String::new(),
    };
    for file in run.files() {
        renderer.file(file);
    }
    renderer.summary(run);
    renderer.output
}

enum Item<'a> {
    Group(&'a TestGroup),
    Case(&'a TestCase),
}

impl<'a> From<&'a TestNode> for Item<'a> {
    fn from(node: &'a TestNode) -> Self {
        match node {
            TestNode::Group(group) => Item::Group(group),
            TestNode::Case(case) => Item::Case(case),
        }
    }
}

struct Renderer {
    verbose: bool,
    output: String,
    /// Lines repeated in the summary.
    records: String,
}

impl Renderer {
    fn line(&mut self, record: bool, depth: usize, text: &str) {
        let line = if text.is_empty() {
            "\n".to_owned()
        } else {
            format!("{}{}\n", INDENT.repeat(depth), text)
        };
        if record {
            self.records.push_str(&line);
        }
        self.output.push_str(&line);
    }

    fn file(&mut self, file: &FileResult) {
        match file.status() {
            Status::Failed => self.line(true, 0, &format!(" FAIL  {}", file.file_name)),
            Status::Passed => self.line(false, 0, &format!(" PASS  {}", file.file_name)),
        }
        let mut stack = file
            .groups
            .iter()
            .rev()
            .map(|group| (Item::Group(group), 1))
            .collect::<Vec<_>>();
        while let Some((item, depth)) = stack.pop() {
            match item {
                Item::Case(case) => self.case(file, case, depth),
                Item::Group(group) => {
                    let failed = group.status().is_failed();
                    if failed || self.verbose {
                        self.line(failed, depth, group.description());
                    }
                    stack.extend(
                        group
                            .children()
                            .iter()
                            .rev()
                            .map(|child| (Item::from(child), depth + 1)),
                    );
                }
            }
        }
    }

    fn case(&mut self, file: &FileResult, case: &TestCase, depth: usize) {
        let detail = match case.verdict.detail() {
            Some(detail) => detail,
            None => {
                if self.verbose {
                    self.line(false, depth, &format!("✓ {}", case.description));
                }
                return;
            }
        };
        self.line(true, depth, &format!("⨯ {}", case.description));
        self.line(true, depth, "");
        self.failure(file, detail, depth + 1);
        self.line(true, depth, "");
    }

    fn failure(&mut self, file: &FileResult, detail: &FailureDetail, depth: usize) {
        self.line(true, depth, "Received:");
        self.line(true, depth + 1, &detail.received);
        self.line(true, depth, "Expected:");
        self.line(true, depth + 1, detail.expected_or_fallback().unwrap_or(""));
        self.line(true, depth, "");
        let mut message = detail.message.iter();
        self.line(
            true,
            depth,
            &format!("Error: {}", message.next().map_or("", String::as_str)),
        );
        for line in message {
            self.line(true, depth, &format!("       {}", line));
        }
        self.line(true, depth, "");
        for line in excerpt(detail) {
            self.line(true, depth, &line);
        }
        self.line(true, depth, "");
        self.line(
            true,
            depth,
            &format!("at {}:{}", file.file_name, detail.location.line_column()),
        );
    }

    fn summary(&mut self, run: &RunResult) {
        let counters = run.counters();
        let records = std::mem::take(&mut self.records);
        self.line(false, 0, "");
        self.line(false, 0, "Summary:");
        self.line(false, 0, "");
        self.output.push_str(&records);
        self.line(false, 0, &tally_line("Tests:", counters.cases));
        self.line(false, 0, &tally_line("Groups:", counters.groups));
        self.line(false, 0, &tally_line("Test Suites:", counters.files));
        let duration = run.duration();
        let time = format!(
            "{:<13}{:.3} s",
            "Time:",
            duration.num_milliseconds() as f64 / 1000.
        );
        self.line(false, 0, &time);
    }
}

fn tally_line(label: &str, tally: Tally) -> String {
    format!(
        "{:<13}{} failed, {} passed, {} total",
        label, tally.failed, tally.passed, tally.total
    )
}

/// The source lines around a failure, the failing one marked with `>` and underlined with `^`.
fn excerpt(detail: &FailureDetail) -> Vec<String> {
    let excerpt = &detail.excerpt;
    let location = detail.location;
    let last_number = excerpt.first_line + excerpt.lines.len();
    let width = last_number.to_string().len();
    let mut lines = Vec::with_capacity(excerpt.lines.len() + 1);
    for (offset, text) in excerpt.lines.iter().enumerate() {
        let line = excerpt.first_line + offset;
        let marker = if line == location.line { '>' } else { ' ' };
        lines.push(
            format!("{} {:>width$} | {}", marker, line + 1, text, width = width)
                .trim_end()
                .to_owned(),
        );
        if line == location.line {
            let mut bytes = 0;
            let carets = text
                .chars()
                .skip(location.column)
                .take_while(|c| {
                    bytes += c.len_utf8();
                    bytes <= location.length
                })
                .count()
                .max(1);
            lines.push(format!(
                "  {:>width$} | {}{}",
                "",
                " ".repeat(location.column),
                "^".repeat(carets),
                width = width
            ));
        }
    }
    lines
}
