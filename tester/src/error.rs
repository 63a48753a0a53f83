use std::error::Error;
use std::fmt;
use std::io;

/// Error returned while preparing a run.
///
/// The run itself never fails: malformed assertions are reported as test results.
#[derive(Debug)]
pub enum TesterError {
    Io(String, io::Error),
    InvalidPattern(String, regex::Error),
    Config(String, serde_json::Error),
    Host(Box<dyn Error + Send + Sync + 'static>),
}

impl fmt::Display for TesterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TesterError::Io(file, error) => write!(f, "I/O error on file {}: {}", file, error),
            TesterError::InvalidPattern(pattern, error) => {
                write!(f, "invalid file pattern {}: {}", pattern, error)
            }
            TesterError::Config(file, error) => {
                write!(f, "invalid configuration file {}: {}", file, error)
            }
            TesterError::Host(error) => error.fmt(f),
        }
    }
}

impl Error for TesterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TesterError::Io(_, error) => Some(error),
            TesterError::InvalidPattern(_, error) => Some(error),
            TesterError::Config(_, error) => Some(error),
            TesterError::Host(error) => Some(error.as_ref()),
        }
    }
}

impl From<rtt_script::ScriptError> for TesterError {
    fn from(error: rtt_script::ScriptError) -> Self {
        TesterError::Host(Box::new(error))
    }
}
