use std::path::Path;

use crate::{
    document::Document,
    error::Result,
    walker::{self, DiscoveredFile},
};

/// Read one discovered file into a [`Document`].
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected, so
/// this only fails when the file itself cannot be read.
pub fn read_document(file: &DiscoveredFile) -> Result<Document> {
    let bytes = std::fs::read(&file.path)?;
    let content = String::from_utf8_lossy(&bytes).into_owned();
    Ok(Document::new(file.path.clone(), content))
}

/// Load every readable document under `root`.
///
/// Groups are the directories directly under `root`; when `group_filter` is
/// set only that group is loaded. Files that fail to read are logged and
/// skipped. A missing root loads nothing.
pub fn load_documents(root: &Path, group_filter: Option<&str>) -> Vec<Document> {
    let files = walker::discover_files(root, group_filter);

    let documents: Vec<Document> = files
        .iter()
        .filter_map(|file| match read_document(file) {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::debug!(
                    path = %file.path.display(),
                    error = %e,
                    "skipping unreadable document"
                );
                None
            }
        })
        .collect();

    tracing::debug!(
        root = %root.display(),
        discovered = files.len(),
        loaded = documents.len(),
        "loaded documents"
    );
    documents
}
