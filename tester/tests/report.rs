use rtt_script::ScriptProgram;
use rtt_tester::config::Config;
use rtt_tester::formatter::{render, TextReportFormatter};
use rtt_tester::report::RunResult;
use rtt_tester::TypeTester;
use std::error::Error;

const DECLARATIONS: &str = r#"
declare function pass(): true;
declare function failA(): RTT_FAIL<"Expected `number` got `string`">;
"#;

const FAILING: &str = "describeType('strings', () => {
  testType('passes', () => pass());
  testType('fails', () => {
    failA();
  });
});
describeType('numbers', () => {
  testType('passes too', () => pass());
});
";

const PASSING: &str = "describeType('booleans', () => {
  testType('passes', () => pass());
});
";

fn run() -> Result<RunResult, Box<dyn Error>> {
    let program = ScriptProgram::from_sources(vec![
        ("lib.d.ts", DECLARATIONS),
        ("a.spec-types.ts", FAILING),
        ("b.spec-types.ts", PASSING),
    ])?;
    Ok(TypeTester::new(&program, &Config::default()).run())
}

#[test]
fn failures_are_reported_with_their_context() -> Result<(), Box<dyn Error>> {
    let report = render(&run()?, false);
    assert!(report.contains(" FAIL  a.spec-types.ts\n"));
    assert!(report.contains(" PASS  b.spec-types.ts\n"));
    assert!(report.contains("\n  strings\n"));
    assert!(report.contains("\n    ⨯ fails\n"));
    assert!(report.contains(
        "\n      Received:\n        Error displaying received type, please check it in the code manually.\n"
    ));
    assert!(report.contains("\n      Expected:\n        number\n"));
    assert!(report.contains("\n      Error: Expected `number` got `string`\n"));
    assert!(report.contains("\n      > 4 |     failA();\n          |     ^^^^^^^\n"));
    assert!(report.contains("\n      at a.spec-types.ts:4:5\n"));
    Ok(())
}

#[test]
fn passing_results_are_only_shown_when_verbose() -> Result<(), Box<dyn Error>> {
    let run = run()?;

    let quiet = render(&run, false);
    assert!(!quiet.contains('✓'));
    assert!(!quiet.contains("\n  numbers\n"));
    assert!(!quiet.contains("booleans"));

    let verbose = render(&run, true);
    assert!(verbose.contains("\n    ✓ passes\n"));
    assert!(verbose.contains("\n  numbers\n    ✓ passes too\n"));
    assert!(verbose.contains("\n  booleans\n"));
    Ok(())
}

#[test]
fn summary_repeats_failures_and_counts() -> Result<(), Box<dyn Error>> {
    let report = render(&run()?, false);
    let summary = &report[report.find("\nSummary:\n").ok_or("no summary")?..];
    assert!(summary.contains(" FAIL  a.spec-types.ts\n"));
    assert!(summary.contains("    ⨯ fails\n"));
    assert!(!summary.contains(" PASS "));
    assert_eq!(report.matches(" FAIL  a.spec-types.ts").count(), 2);
    assert!(summary.contains("Tests:       1 failed, 3 passed, 4 total\n"));
    assert!(summary.contains("Groups:      1 failed, 2 passed, 3 total\n"));
    assert!(summary.contains("Test Suites: 1 failed, 1 passed, 2 total\n"));
    assert!(summary.contains("Time:        "));
    Ok(())
}

#[test]
fn formatter_writes_the_rendered_report() -> Result<(), Box<dyn Error>> {
    let run = run()?;
    let mut formatter = TextReportFormatter::new(Vec::default(), true);
    formatter.format(&run)?;
    assert_eq!(String::from_utf8(formatter.finish())?, render(&run, true));
    Ok(())
}
