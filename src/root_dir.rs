use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use crate::{
    document::Document,
    ingestion,
    walker::{self, GroupSummary},
};

/// Environment variable overriding the artifact root.
pub const ROOT_ENV: &str = "DOCSIFT_PATH";

/// Root used when neither `--path` nor the environment names one.
pub const DEFAULT_ROOT: &str = ".claude/plugins/trivial";

/// The directory whose subdirectories are document groups.
#[derive(Debug, Clone)]
pub struct RootDir {
    root: PathBuf,
}

impl RootDir {
    /// Resolve the root from, in order of priority:
    /// 1. An explicit path (from --path)
    /// 2. The DOCSIFT_PATH environment variable
    /// 3. `.claude/plugins/trivial` under the working directory
    ///
    /// The directory is not required to exist.
    pub fn resolve(explicit: Option<&Path>) -> Self {
        Self::resolve_with(explicit, std::env::var_os(ROOT_ENV))
    }

    fn resolve_with(explicit: Option<&Path>, env: Option<OsString>) -> Self {
        let root = match (explicit, env) {
            (Some(path), _) => path.to_path_buf(),
            (None, Some(val)) if !val.is_empty() => PathBuf::from(val),
            _ => PathBuf::from(DEFAULT_ROOT),
        };
        Self { root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Load the documents of one group, or of every group.
    pub fn load(&self, group: Option<&str>) -> Vec<Document> {
        ingestion::load_documents(&self.root, group)
    }

    pub fn groups(&self) -> Vec<GroupSummary> {
        walker::list_groups(&self.root)
    }
}
