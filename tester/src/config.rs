//! Selection of the files to test.

use crate::error::TesterError;
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{info, warn};

/// Name of the project configuration file.
pub const CONFIG_FILE_NAME: &str = "rtt.config.json";
pub const DEFAULT_INCLUDE: &str = r".*(\.(spec|test)(-types)?\.ts)$";
pub const DEFAULT_EXCLUDE: &str = r".*node_modules.*";

/// The content of the project configuration file.
///
/// ```
/// use rtt_tester::config::ProjectConfig;
///
/// let config: ProjectConfig = serde_json::from_str(r#"{"testing": {"include": ["types/.*"]}}"#)?;
/// assert_eq!(Some(vec!["types/.*".to_owned()]), config.testing.include);
/// # Result::<_, serde_json::Error>::Ok(())
/// ```
#[derive(Deserialize, Debug, Clone, Default, Eq, PartialEq)]
#[serde(default)]
pub struct ProjectConfig {
    pub testing: TestingConfig,
}

#[derive(Deserialize, Debug, Clone, Default, Eq, PartialEq)]
#[serde(default)]
pub struct TestingConfig {
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
}

impl ProjectConfig {
    /// Reads the configuration file of `directory`.
    ///
    /// Returns `None` if there is no such file.
    pub fn read(directory: &Path) -> Result<Option<Self>, TesterError> {
        let path = directory.join(CONFIG_FILE_NAME);
        let name = path.display().to_string();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(TesterError::Io(name, error)),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| TesterError::Config(name, e))
    }

    /// Like [`read`](#method.read) but falls back to the defaults on any error.
    pub fn read_or_default(directory: &Path) -> Self {
        match Self::read(directory) {
            Ok(Some(config)) => config,
            Ok(None) => {
                info!("no configuration file found ({})", CONFIG_FILE_NAME);
                Self::default()
            }
            Err(error) => {
                warn!("error loading configuration: {}", error);
                Self::default()
            }
        }
    }
}

/// Options given on the command line.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct CommandLineOptions {
    pub verbose: bool,
    pub include: Option<String>,
    pub exclude: Option<String>,
    /// A single path to test.
    pub path: Option<String>,
}

/// Which files are tested and how results are shown.
#[derive(Debug, Clone)]
pub struct Config {
    pub verbose: bool,
    pub include: Vec<Regex>,
    pub exclude: Vec<Regex>,
}

impl Config {
    /// Merges the command line options with the project configuration.
    ///
    /// A path on the command line replaces the include patterns and enables verbose output.
    ///
    /// ```
    /// use rtt_tester::config::{CommandLineOptions, Config, ProjectConfig};
    ///
    /// let options = CommandLineOptions {
    ///     path: Some(r"types\string.spec.ts".to_owned()),
    ///     ..CommandLineOptions::default()
    /// };
    /// let config = Config::new(&options, &ProjectConfig::default())?;
    /// assert!(config.verbose);
    /// assert!(config.matches("src/types/string.spec.ts"));
    /// assert!(!config.matches("src/types/number.spec.ts"));
    /// # Result::<_, rtt_tester::TesterError>::Ok(())
    /// ```
    pub fn new(options: &CommandLineOptions, project: &ProjectConfig) -> Result<Self, TesterError> {
        let include = if let Some(path) = &options.path {
            vec![path.replace('\\', "/")]
        } else if let Some(include) = &options.include {
            vec![include.clone()]
        } else if let Some(include) = &project.testing.include {
            include.clone()
        } else {
            vec![DEFAULT_INCLUDE.to_owned()]
        };
        let exclude = if let Some(exclude) = &options.exclude {
            vec![exclude.clone()]
        } else if let Some(exclude) = &project.testing.exclude {
            exclude.clone()
        } else {
            vec![DEFAULT_EXCLUDE.to_owned()]
        };
        Ok(Self {
            verbose: options.verbose || options.path.is_some(),
            include: compile(&include)?,
            exclude: compile(&exclude)?,
        })
    }

    /// Returns `true` if the file is included and not excluded.
    pub fn matches(&self, file_name: &str) -> bool {
        self.include.iter().any(|r| r.is_match(file_name))
            && !self.exclude.iter().any(|r| r.is_match(file_name))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(&CommandLineOptions::default(), &ProjectConfig::default()).unwrap_or_else(|_| {
            Self {
                verbose: false,
                include: Vec::new(),
                exclude: Vec::new(),
            }
        })
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{{")?;
        writeln!(f, "  verbose: {},", self.verbose)?;
        writeln!(f, "  include: {:?},", patterns(&self.include))?;
        writeln!(f, "  exclude: {:?},", patterns(&self.exclude))?;
        write!(f, "}}")
    }
}

fn patterns(regexes: &[Regex]) -> Vec<&str> {
    regexes.iter().map(Regex::as_str).collect()
}

fn compile(patterns: &[String]) -> Result<Vec<Regex>, TesterError> {
    patterns
        .iter()
        .map(|p| Regex::new(p).map_err(|e| TesterError::InvalidPattern(p.clone(), e)))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.verbose);
        assert!(config.matches("src/string.spec-types.ts"));
        assert!(config.matches("src/string.test.ts"));
        assert!(!config.matches("src/string.ts"));
        assert!(!config.matches("node_modules/lib/a.spec.ts"));
    }

    #[test]
    fn test_precedence() -> Result<(), TesterError> {
        let project: ProjectConfig = serde_json::from_str(
            r#"{"testing": {"include": ["from-config"], "exclude": ["ignored"]}}"#,
        )
        .map_err(|e| TesterError::Config("inline".to_owned(), e))?;

        let config = Config::new(&CommandLineOptions::default(), &project)?;
        assert!(config.matches("from-config.ts"));
        assert!(!config.matches("from-config.ignored.ts"));

        let options = CommandLineOptions {
            include: Some("from-cli".to_owned()),
            exclude: Some("nothing".to_owned()),
            ..CommandLineOptions::default()
        };
        let config = Config::new(&options, &project)?;
        assert!(!config.verbose);
        assert!(!config.matches("from-config.ts"));
        assert!(config.matches("from-cli.ignored.ts"));
        Ok(())
    }

    #[test]
    fn test_invalid_pattern() {
        let options = CommandLineOptions {
            include: Some("(".to_owned()),
            ..CommandLineOptions::default()
        };
        assert!(matches!(
            Config::new(&options, &ProjectConfig::default()),
            Err(TesterError::InvalidPattern(_, _))
        ));
    }

    fn project_directory(name: &str, config: Option<&str>) -> io::Result<std::path::PathBuf> {
        let directory =
            std::env::temp_dir().join(format!("rtt-config-{}-{}", std::process::id(), name));
        fs::create_dir_all(&directory)?;
        let path = directory.join(CONFIG_FILE_NAME);
        match config {
            Some(config) => fs::write(path, config)?,
            None => {
                if path.exists() {
                    fs::remove_file(path)?;
                }
            }
        }
        Ok(directory)
    }

    #[test]
    fn test_read_project_config() -> Result<(), Box<dyn std::error::Error>> {
        let directory = project_directory(
            "valid",
            Some(r#"{"testing": {"include": ["types/.*"], "exclude": ["skip"]}}"#),
        )?;
        let expected = ProjectConfig {
            testing: TestingConfig {
                include: Some(vec!["types/.*".to_owned()]),
                exclude: Some(vec!["skip".to_owned()]),
            },
        };
        assert_eq!(ProjectConfig::read(&directory)?, Some(expected.clone()));
        assert_eq!(ProjectConfig::read_or_default(&directory), expected);
        fs::remove_dir_all(directory)?;
        Ok(())
    }

    #[test]
    fn test_invalid_project_config_falls_back_to_defaults() -> Result<(), Box<dyn std::error::Error>>
    {
        let directory = project_directory("invalid", Some("{\"testing\": "))?;
        assert!(matches!(
            ProjectConfig::read(&directory),
            Err(TesterError::Config(_, _))
        ));
        assert_eq!(
            ProjectConfig::read_or_default(&directory),
            ProjectConfig::default()
        );
        fs::remove_dir_all(directory)?;
        Ok(())
    }

    #[test]
    fn test_missing_project_config() -> Result<(), Box<dyn std::error::Error>> {
        let directory = project_directory("missing", None)?;
        assert_eq!(ProjectConfig::read(&directory)?, None);
        assert_eq!(
            ProjectConfig::read_or_default(&directory),
            ProjectConfig::default()
        );
        fs::remove_dir_all(directory)?;
        Ok(())
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Config::default().to_string(),
            "{\n  verbose: false,\n  include: [\".*(\\\\.(spec|test)(-types)?\\\\.ts)$\"],\n  exclude: [\".*node_modules.*\"],\n}"
        );
    }
}
