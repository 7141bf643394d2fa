// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Control-file discovery.
//
// CUPS names job control files `c` followed by the zero-padded job number
// (`c00001`).  Support dumps bury them in folders named after the issue they
// were collected for, e.g. `dumps/123456/var/spool/cups/c00042` or
// `dumps/ABC-123-45678-printer/spool/c00042`.

use std::cmp::Ordering;
use std::fs;
use std::path::{Component, Path, PathBuf};

use regex::Regex;
use tracing::{debug, info, instrument, warn};

use ippspool_core::ScanConfig;
use ippspool_core::error::{IppspoolError, Result};

/// A control file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlFile {
    pub path: PathBuf,
    /// Issue the file was collected for.
    pub issue: String,
    pub file_name: String,
}

/// Compiled discovery patterns.
#[derive(Debug, Clone)]
pub struct Discovery {
    file_pattern: Regex,
    issue_pattern: Regex,
}

impl Discovery {
    pub fn new(config: &ScanConfig) -> Result<Self> {
        Ok(Self {
            file_pattern: compile("file_pattern", &config.file_pattern)?,
            issue_pattern: compile("issue_pattern", &config.issue_pattern)?,
        })
    }

    /// Whether `name` looks like a control file.
    pub fn is_control_file(&self, name: &str) -> bool {
        !is_hidden(name) && self.file_pattern.is_match(name)
    }

    /// Issue id for a file in `dir`: the first path component matching the
    /// issue pattern, else the name of `dir` itself.
    pub fn issue_for(&self, dir: &Path) -> Option<String> {
        let parts: Vec<&str> = dir
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect();
        parts
            .iter()
            .find(|part| self.issue_pattern.is_match(part))
            .or_else(|| parts.last())
            .map(|part| (*part).to_owned())
    }

    /// Walk `root` and return every control file below it.
    ///
    /// Each directory's files come before its subdirectories; both are
    /// visited in case-insensitive name order.
    #[instrument(skip_all, fields(root = %root.display()))]
    pub fn find(&self, root: &Path) -> Result<Vec<ControlFile>> {
        if !root.is_dir() {
            return Err(IppspoolError::Scan(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        let mut found = Vec::new();
        self.walk(root, &mut found)?;
        info!(count = found.len(), "control files found");
        Ok(found)
    }

    fn walk(&self, dir: &Path, found: &mut Vec<ControlFile>) -> Result<()> {
        let (files, dirs) = list_dir(dir)?;

        for name in files {
            if !self.is_control_file(&name) {
                continue;
            }
            let path = dir.join(&name);
            match self.issue_for(dir) {
                Some(issue) => {
                    debug!(path = %path.display(), %issue, "control file");
                    found.push(ControlFile {
                        path,
                        issue,
                        file_name: name,
                    });
                }
                None => warn!(path = %path.display(), "no issue for control file, skipped"),
            }
        }

        for name in dirs {
            self.walk(&dir.join(name), found)?;
        }
        Ok(())
    }
}

/// Files to decode for `path`: the path itself when it is a file, else every
/// non-hidden file below it.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn input_files(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.is_dir() {
        if !path.exists() {
            return Err(IppspoolError::Scan(format!("{} not found", path.display())));
        }
        return Ok(vec![path.to_path_buf()]);
    }

    let mut out = Vec::new();
    let mut pending = vec![path.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let (files, dirs) = list_dir(&dir)?;
        out.extend(files.into_iter().map(|name| dir.join(name)));
        // Reversed so the stack pops them in order.
        pending.extend(dirs.into_iter().rev().map(|name| dir.join(name)));
    }
    debug!(count = out.len(), "input files");
    Ok(out)
}

/// Non-hidden file and directory names of `dir`, each sorted.
fn list_dir(dir: &Path) -> Result<(Vec<String>, Vec<String>)> {
    let mut files = Vec::new();
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let Ok(name) = entry.file_name().into_string() else {
            warn!(dir = %dir.display(), "skipping non-UTF-8 file name");
            continue;
        };
        if is_hidden(&name) {
            continue;
        }
        // Symlinked directories are not followed; symlinked files are kept.
        if entry.file_type()?.is_dir() {
            dirs.push(name);
        } else if entry.path().is_file() {
            files.push(name);
        }
    }
    files.sort_by(|a, b| name_order(a, b));
    dirs.sort_by(|a, b| name_order(a, b));
    Ok((files, dirs))
}

/// Case-insensitive, then case-sensitive.
fn name_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

fn compile(field: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| IppspoolError::Config(format!("scan.{field}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, rel.as_bytes()).unwrap();
    }

    fn discovery() -> Discovery {
        Discovery::new(&ScanConfig::default()).unwrap()
    }

    #[test]
    fn file_pattern_matches_control_files_only() {
        let d = discovery();
        assert!(d.is_control_file("c00001"));
        assert!(d.is_control_file("c123"));
        assert!(d.is_control_file("c1234567890"));
        assert!(!d.is_control_file("c12"));
        assert!(!d.is_control_file("c12345678901"));
        assert!(!d.is_control_file("d00001"));
        assert!(!d.is_control_file("c00001.bak"));
        assert!(!d.is_control_file("C00001"));
    }

    #[test]
    fn issue_comes_from_matching_component() {
        let d = discovery();
        assert_eq!(
            d.issue_for(Path::new("/dumps/123456/var/spool/cups")).as_deref(),
            Some("123456")
        );
        assert_eq!(
            d.issue_for(Path::new("dumps/ABC-123-45678-site/spool")).as_deref(),
            Some("ABC-123-45678-site")
        );
        // Six digits must be the whole component.
        assert_eq!(
            d.issue_for(Path::new("dumps/1234567/spool")).as_deref(),
            Some("spool")
        );
        assert_eq!(d.issue_for(Path::new("/")), None);
    }

    #[test]
    fn find_walks_sorted_and_skips_hidden() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        touch(root, "123456/spool/c00002");
        touch(root, "123456/spool/c00001");
        touch(root, "123456/spool/d00001");
        touch(root, "123456/spool/.c00003");
        touch(root, "123456/.cache/c00004");
        touch(root, "loose/c00005");
        touch(root, "Alpha/c00006");

        let found = discovery().find(root).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|f| (f.issue.as_str(), f.file_name.as_str()))
            .collect();
        assert_eq!(
            names,
            vec![
                ("123456", "c00001"),
                ("123456", "c00002"),
                ("Alpha", "c00006"),
                ("loose", "c00005"),
            ]
        );
    }

    #[test]
    fn find_rejects_a_file_root() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(
            discovery().find(tmp.path()),
            Err(IppspoolError::Scan(_))
        ));
    }

    #[test]
    fn bad_pattern_is_a_config_error() {
        let config = ScanConfig {
            file_pattern: "(".into(),
            ..ScanConfig::default()
        };
        assert!(matches!(Discovery::new(&config), Err(IppspoolError::Config(_))));
    }

    #[test]
    fn input_files_for_file_and_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        touch(root, "b/c00002");
        touch(root, "a/c00001");
        touch(root, "top");
        touch(root, ".hidden");

        let files = input_files(root).unwrap();
        let rel: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            rel,
            vec![
                PathBuf::from("top"),
                PathBuf::from("a/c00001"),
                PathBuf::from("b/c00002"),
            ]
        );

        let single = root.join("top");
        assert_eq!(input_files(&single).unwrap(), vec![single.clone()]);
        assert!(input_files(&root.join("missing")).is_err());
    }
}
