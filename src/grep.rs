//! Regex search over downloaded repository files.
//!
//! Every file selected by the repository walk is scanned line by line.
//! Files with at least one match come back most recently modified first.

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use std::time::SystemTime;

use crate::config::ReposConfig;
use crate::repo::{local_repository_names, walk_files};

#[derive(Debug, Clone, Serialize)]
pub struct LineMatch {
    pub text: String,
    /// 1-based.
    pub line: usize,
    /// 1-based, counted in characters.
    pub column: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileMatches {
    pub resource_path: String,
    pub modified_at: Option<String>,
    pub matches: Vec<LineMatch>,
    #[serde(skip)]
    modified: Option<SystemTime>,
}

/// Search one repository, or every downloaded repository when `repository`
/// is `None`.
pub fn grep_files(
    config: &ReposConfig,
    repository: Option<&str>,
    pattern: &str,
) -> Result<Vec<FileMatches>> {
    let regex = Regex::new(pattern).with_context(|| format!("Invalid pattern: {}", pattern))?;

    let names = match repository {
        Some(name) => vec![name.to_string()],
        None => local_repository_names(config)?,
    };

    let mut results = Vec::new();
    for name in &names {
        for file in walk_files(config, name)? {
            let matches = scan(&regex, &file.content);
            if matches.is_empty() {
                continue;
            }
            let modified = std::fs::metadata(&file.absolute_path)
                .and_then(|m| m.modified())
                .ok();
            results.push(FileMatches {
                resource_path: file.resource_path,
                modified_at: modified
                    .map(|t| chrono::DateTime::<chrono::Utc>::from(t).to_rfc3339()),
                matches,
                modified,
            });
        }
    }

    results.sort_by(|a, b| {
        b.modified
            .cmp(&a.modified)
            .then_with(|| a.resource_path.cmp(&b.resource_path))
    });
    Ok(results)
}

fn scan(regex: &Regex, content: &str) -> Vec<LineMatch> {
    let mut matches = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        for m in regex.find_iter(line) {
            matches.push(LineMatch {
                text: m.as_str().to_string(),
                line: idx + 1,
                column: line[..m.start()].chars().count() + 1,
            });
        }
    }
    matches
}

pub fn run_grep(config: &ReposConfig, repository: Option<&str>, pattern: &str) -> Result<()> {
    let results = grep_files(config, repository, pattern)?;
    if results.is_empty() {
        println!("No matches.");
        return Ok(());
    }
    for file in &results {
        println!("{}", file.resource_path);
        for m in &file.matches {
            println!("  {}:{}  {}", m.line, m.column, m.text);
        }
        if let Some(modified) = &file.modified_at {
            println!("  modified: {}", modified);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_scan_positions() {
        let re = Regex::new(r"fn \w+").unwrap();
        let found = scan(&re, "use x;\n  fn alpha() {} fn beta() {}\n");
        assert_eq!(found.len(), 2);
        assert_eq!((found[0].line, found[0].column), (2, 3));
        assert_eq!(found[0].text, "fn alpha");
        assert_eq!((found[1].line, found[1].column), (2, 17));
    }

    #[test]
    fn test_column_counts_characters() {
        let re = Regex::new("x").unwrap();
        let found = scan(&re, "ééx");
        assert_eq!(found[0].column, 3);
    }

    #[test]
    fn test_grep_sorts_by_recent_modification() {
        let tmp = TempDir::new().unwrap();
        let config = ReposConfig {
            root: tmp.path().to_path_buf(),
            ..ReposConfig::default()
        };
        write(tmp.path(), "octo/one/old.py", "TODO: old");
        write(tmp.path(), "octo/one/none.py", "nothing here");
        std::thread::sleep(Duration::from_millis(1100));
        write(tmp.path(), "octo/two/new.py", "TODO: new");

        let all = grep_files(&config, None, "TODO").unwrap();
        let paths: Vec<&str> = all.iter().map(|f| f.resource_path.as_str()).collect();
        assert_eq!(paths, vec!["octo/two/new.py", "octo/one/old.py"]);

        let one = grep_files(&config, Some("octo/one"), "TODO").unwrap();
        assert_eq!(one.len(), 1);
    }

    #[test]
    fn test_invalid_pattern() {
        let tmp = TempDir::new().unwrap();
        let config = ReposConfig {
            root: tmp.path().to_path_buf(),
            ..ReposConfig::default()
        };
        let err = grep_files(&config, None, "(unclosed").unwrap_err();
        assert!(err.to_string().contains("Invalid pattern"));
    }
}
