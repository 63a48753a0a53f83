use crate::config::Config;
use crate::report::{FileResult, RunResult};
use crate::walker::TreeWalker;
use chrono::Utc;
use rtt_api::host::{Program, SourceFile};
use tracing::{debug, info};

/// Runs the type tests of all the selected files of a program, one file after the other.
///
/// ```
/// use rtt_script::ScriptProgram;
/// use rtt_tester::config::Config;
/// use rtt_tester::TypeTester;
///
/// let program = ScriptProgram::from_sources(vec![
///     ("lib.d.ts", "declare function passes(): true;"),
///     ("a.spec-types.ts", "describeType('group', () => { testType('case', () => passes()); });"),
/// ])?;
/// let result = TypeTester::new(&program, &Config::default()).run();
/// assert_eq!(1, result.files().len());
/// assert_eq!(1, result.counters().cases.passed);
/// assert_eq!(0, result.exit_code());
/// # Result::<_, rtt_script::ScriptError>::Ok(())
/// ```
pub struct TypeTester<'a, P: Program> {
    program: &'a P,
    config: &'a Config,
}

impl<'a, P: Program> TypeTester<'a, P> {
    pub fn new(program: &'a P, config: &'a Config) -> Self {
        Self { program, config }
    }

    pub fn run(&self) -> RunResult {
        let mut result = RunResult::new(Utc::now());
        let checker = self.program.type_checker();
        for file in self.program.source_files() {
            let file_name = file.file_name();
            if !self.config.matches(file_name) {
                debug!("skipping {}", file_name);
                continue;
            }
            info!("testing {}", file_name);
            let groups = TreeWalker::new(file, checker).walk();
            result.record(FileResult {
                file_name: file_name.to_owned(),
                groups,
            });
        }
        result.finish(Utc::now());
        result
    }
}
