use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};

/// File name pattern for documents inside a group directory.
pub const DOCUMENT_PATTERN: &str = "*.md";

/// A candidate document found inside a group directory.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Name of the group directory containing the file.
    pub group: String,
    /// Path as found under the root (root joined with group and file name).
    pub path: PathBuf,
}

/// A group directory and the number of candidate documents inside it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct GroupSummary {
    pub name: String,
    pub documents: usize,
}

/// List the group directories directly under `root`.
///
/// A missing or unlistable root yields no groups. Symlinked directories
/// count as groups.
pub fn discover_groups(root: &Path) -> Vec<(String, PathBuf)> {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(root = %root.display(), error = %e, "cannot list root");
            return Vec::new();
        }
    };

    let mut groups: Vec<(String, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter_map(|path| {
            let name = path.file_name()?.to_string_lossy().into_owned();
            Some((name, path))
        })
        .collect();

    groups.sort_by(|a, b| a.0.cmp(&b.0));
    groups
}

/// Find candidate documents one level below `root`.
///
/// Only the group named `group_filter` is visited when a filter is given.
/// An empty filter means no filter.
/// Candidates are matched by file name alone; whether they can actually be
/// read is decided later, so a directory named `x.md` is still returned.
pub fn discover_files(
    root: &Path,
    group_filter: Option<&str>,
) -> Vec<DiscoveredFile> {
    let group_filter = group_filter.filter(|wanted| !wanted.is_empty());
    let matcher = document_matcher();
    let mut results = Vec::new();

    for (group, dir) in discover_groups(root) {
        if group_filter.is_some_and(|wanted| wanted != group) {
            continue;
        }
        walk_group(&matcher, &group, &dir, &mut results);
    }

    results.sort_by(|a, b| a.path.cmp(&b.path));
    results
}

/// Summarize every group under `root` with its candidate document count.
pub fn list_groups(root: &Path) -> Vec<GroupSummary> {
    let matcher = document_matcher();
    discover_groups(root)
        .into_iter()
        .map(|(name, dir)| {
            let mut files = Vec::new();
            walk_group(&matcher, &name, &dir, &mut files);
            GroupSummary {
                name,
                documents: files.len(),
            }
        })
        .collect()
}

fn document_matcher() -> GlobMatcher {
    Glob::new(DOCUMENT_PATTERN)
        .expect("DOCUMENT_PATTERN is a valid glob")
        .compile_matcher()
}

fn walk_group(
    matcher: &GlobMatcher,
    group: &str,
    dir: &Path,
    results: &mut Vec<DiscoveredFile>,
) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(group, error = %e, "skipping unreadable group");
            return;
        }
    };

    for entry in entries.filter_map(|entry| entry.ok()) {
        if matcher.is_match(entry.file_name()) {
            results.push(DiscoveredFile {
                group: group.to_string(),
                path: entry.path(),
            });
        }
    }
}
