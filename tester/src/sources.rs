//! Loading of the scripts of a project.

use rtt_script::ScriptProgram;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

fn is_skipped(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    entry.depth() > 0
        && entry.file_type().is_dir()
        && (name.starts_with('.') || name == "node_modules" || name == "target")
}

/// Reads all the `.ts` files below `directory`, named by their relative path.
///
/// Hidden, `node_modules` and `target` directories are not visited. Unreadable entries are
/// skipped with a warning.
pub fn load_sources(directory: &Path) -> Vec<(String, String)> {
    let mut sources = Vec::new();
    for entry in WalkDir::new(directory)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped(e))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                warn!("skipping unreadable entry: {}", error);
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().map_or(true, |e| e != "ts") {
            continue;
        }
        let name = path
            .strip_prefix(directory)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");
        match fs::read_to_string(path) {
            Ok(text) => {
                debug!("loading {}", name);
                sources.push((name, text));
            }
            Err(error) => warn!("skipping {}: {}", name, error),
        }
    }
    info!("{} files loaded", sources.len());
    sources
}

/// Builds a program from scripts, leaving out the ones that do not parse.
///
/// ```
/// use rtt_api::host::Program;
/// use rtt_tester::sources::build_program;
///
/// let program = build_program(vec![
///     ("lib.ts", "enum Unsupported { A, B }"),
///     ("a.spec.ts", "describeType('group', () => {});"),
/// ]);
/// assert!(program.source_file("lib.ts").is_none());
/// assert!(program.source_file("a.spec.ts").is_some());
/// ```
pub fn build_program<N: Into<String>, T: Into<String>>(
    sources: impl IntoIterator<Item = (N, T)>,
) -> ScriptProgram {
    let mut program = ScriptProgram::default();
    for (name, text) in sources {
        let name = name.into();
        if let Err(error) = program.add_source(name.as_str(), text) {
            warn!("skipping {}: {}", name, error);
        }
    }
    program
}
