//! Emission of the harvested build requirements.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{error, info};

/// Render the log block listing every capability.
///
/// # Examples
///
/// ```
/// use gleaner::output::render_block;
/// use std::collections::BTreeSet;
///
/// let brs = BTreeSet::from(["mvn(junit:junit)".to_string()]);
/// assert_eq!(
///     render_block(&brs),
///     "BEGIN MAVEN BUILD DEPENDENCIES\nBuildRequires:  mvn(junit:junit)"
/// );
/// ```
pub fn render_block(build_requires: &BTreeSet<String>) -> String {
    let mut block = String::from("BEGIN MAVEN BUILD DEPENDENCIES");
    for capability in build_requires {
        block.push_str("\nBuildRequires:  ");
        block.push_str(capability);
    }
    block
}

/// Log the capabilities and write them to `output_file`, one per line.
///
/// A failed write is logged and otherwise ignored.
pub fn emit(build_requires: &BTreeSet<String>, output_file: Option<&Path>) {
    info!("{}", render_block(build_requires));
    info!("END MAVEN BUILD DEPENDENCIES");

    let Some(path) = output_file else {
        return;
    };
    let contents: String = build_requires.iter().map(|capability| format!("{capability}\n")).collect();
    if let Err(e) = fs::write(path, contents) {
        error!("I/O exception when writing output file {}: {}", path.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn build_requires() -> BTreeSet<String> {
        ["mvn(org.example:lib)", "mvn(junit:junit) = 4"].iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_empty_block() {
        assert_eq!(render_block(&BTreeSet::new()), "BEGIN MAVEN BUILD DEPENDENCIES");
    }

    #[test]
    fn test_output_file_lines_are_sorted() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("brs.txt");
        emit(&build_requires(), Some(&path));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "mvn(junit:junit) = 4\nmvn(org.example:lib)\n"
        );
    }

    #[test]
    fn test_empty_set_truncates_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("brs.txt");
        fs::write(&path, "stale\n").unwrap();
        emit(&BTreeSet::new(), Some(&path));
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_unwritable_path_is_not_fatal() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing").join("brs.txt");
        emit(&build_requires(), Some(&path));
        assert!(!path.exists());
    }
}
