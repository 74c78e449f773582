use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use crate::{
    frontmatter::{Metadata, extract_metadata},
    tokenizer::tokenize,
};

/// A loaded document, immutable once built.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    content: String,
    metadata: Metadata,
    tokens: Vec<String>,
}

impl Document {
    /// Build a document from its path and decoded content.
    pub fn new(path: PathBuf, content: String) -> Self {
        let metadata = extract_metadata(&content);
        let tokens = tokenize(&content);
        Self {
            path,
            content,
            metadata,
            tokens,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the directory directly containing this document.
    pub fn group(&self) -> Cow<'_, str> {
        self.path
            .parent()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy())
            .unwrap_or(Cow::Borrowed(""))
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}
