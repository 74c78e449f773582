use serde::{Serialize, Serializer};

/// Marker that opens and closes a front-matter block.
pub const MARKER: &str = "---";

/// Key/value pairs parsed from a document's front-matter.
///
/// Keeps keys in first-seen order. Inserting an existing key replaces its
/// value without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Parse the `---` delimited header at the start of `content`.
///
/// Only lines with a colon contribute; they are split on the first colon
/// and both halves are trimmed. A missing opening or closing marker yields
/// empty metadata.
pub fn extract_metadata(content: &str) -> Metadata {
    let mut metadata = Metadata::new();

    let Some(rest) = content.strip_prefix(MARKER) else {
        return metadata;
    };
    let Some((header, _body)) = rest.split_once(MARKER) else {
        return metadata;
    };

    for line in header.trim().lines() {
        if let Some((key, value)) = line.split_once(':') {
            metadata.insert(key.trim(), value.trim());
        }
    }

    metadata
}
