use clap::Parser;
use rtt_tester::config::{CommandLineOptions, Config, ProjectConfig};
use rtt_tester::formatter::TextReportFormatter;
use rtt_tester::sources::{build_program, load_sources};
use rtt_tester::{TesterError, TypeTester};
use std::env;
use std::io::{self, Write};
use std::process;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "rtft")]
#[command(about = "Runs the type-level tests of the TypeScript files below the current directory")]
struct Args {
    /// See all the info about tests
    #[arg(long)]
    verbose: bool,

    /// Regex to include files, replaces the configured ones
    #[arg(long, value_name = "REGEX")]
    include: Option<String>,

    /// Regex to exclude files, replaces the configured ones
    #[arg(long, value_name = "REGEX")]
    exclude: Option<String>,

    /// A single file to test, implies --verbose
    path: Option<String>,
}

fn main() {
    init_logging();
    let args = Args::parse();
    match run(args) {
        Ok(code) => process::exit(code),
        Err(error) => {
            eprintln!("error: {}", error);
            process::exit(1)
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .compact()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn run(args: Args) -> Result<i32, TesterError> {
    let directory = env::current_dir().map_err(|e| TesterError::Io(".".to_owned(), e))?;
    let options = CommandLineOptions {
        verbose: args.verbose,
        include: args.include,
        exclude: args.exclude,
        path: args.path,
    };
    let config = Config::new(&options, &ProjectConfig::read_or_default(&directory))?;
    let program = build_program(load_sources(&directory));
    let result = TypeTester::new(&program, &config).run();
    debug!(
        "run started at {} took {} ms",
        result.started_at(),
        result.duration().num_milliseconds()
    );

    let stdout = io::stdout();
    let mut formatter = TextReportFormatter::new(stdout.lock(), config.verbose);
    formatter
        .format(&result)
        .map_err(|e| TesterError::Io("<stdout>".to_owned(), e))?;
    let mut output = formatter.finish();
    if config.verbose {
        writeln!(output, "Used configuration: {}\n", config)
            .map_err(|e| TesterError::Io("<stdout>".to_owned(), e))?;
    }
    Ok(result.exit_code())
}
