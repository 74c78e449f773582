use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::{
    bm25,
    cli::SearchArgs,
    document::Document,
    error::Result,
    frontmatter::Metadata,
    text_util,
    tokenizer::tokenize,
};

/// Metadata keys not repeated in human output because the group line
/// already shows them.
const HIDDEN_METADATA_KEYS: &[&str] = &["agent", "group"];

/// A ranked document ready for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub rank: usize,
    pub score: f64,
    #[serde(serialize_with = "serialize_path_lossy")]
    pub path: PathBuf,
    pub group: String,
    pub metadata: Metadata,
    pub snippet: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse<'a> {
    pub query: &'a str,
    pub result_count: usize,
    pub results: &'a [SearchHit],
}

/// Execute the search pipeline over an already loaded corpus.
///
/// 1. BM25 ranking of every document
/// 2. Filter by --min-score
/// 3. Limit to --top results (unless --all)
/// 4. Snippet extraction for the survivors
pub fn execute_search(
    args: &SearchArgs,
    documents: &[Document],
) -> Result<Vec<SearchHit>> {
    let params = args.bm25_params();
    params.validate()?;

    let ranked = bm25::rank(&args.query, documents, documents.len(), params);
    let limit = if args.all { ranked.len() } else { args.count };
    let query_terms = tokenize(&args.query);

    Ok(ranked
        .into_iter()
        .filter(|r| args.min_score.is_none_or(|min| r.score >= min))
        .take(limit)
        .enumerate()
        .map(|(i, r)| SearchHit {
            rank: i + 1,
            score: r.score,
            path: r.document.path().to_path_buf(),
            group: r.document.group().into_owned(),
            metadata: r.document.metadata().clone(),
            snippet: text_util::extract_snippet(
                r.document.content(),
                &query_terms,
                args.context,
            ),
        })
        .collect())
}

/// Format results for human-readable terminal output.
pub fn format_human(results: &[SearchHit], query: &str) {
    if results.is_empty() {
        println!("No matching documents found.");
        return;
    }

    println!("Found {} result(s) for: {query}\n", results.len());

    for r in results {
        println!("## {}. {}", r.rank, display_path(&r.path).display());
        println!("**Group**: {} | **Score**: {:.2}", r.group, r.score);

        let meta = metadata_line(&r.metadata);
        if !meta.is_empty() {
            println!("**Metadata**: {meta}");
        }

        println!("\n> {}\n", text_util::collapse_whitespace(&r.snippet));
    }
}

/// Format results as JSON output.
pub fn format_json(results: &[SearchHit], query: &str) -> Result<()> {
    let response = SearchResponse {
        query,
        result_count: results.len(),
        results,
    };
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

/// Format results as plain file paths (one per line).
pub fn format_files(results: &[SearchHit]) {
    for r in results {
        println!("{}", r.path.display());
    }
}

/// Join displayable metadata as `key: value | key: value`.
pub fn metadata_line(metadata: &Metadata) -> String {
    metadata
        .iter()
        .filter(|(key, _)| !HIDDEN_METADATA_KEYS.contains(key))
        .map(|(key, value)| format!("{key}: {value}"))
        .collect::<Vec<_>>()
        .join(" | ")
}

// Non-UTF-8 file names are legal on some platforms; they must not fail the
// whole response.
fn serialize_path_lossy<S: Serializer>(
    path: &Path,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

/// Show `path` relative to the working directory when it lies below it.
fn display_path(path: &Path) -> PathBuf {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::load_documents;

    /// Lay out three documents across groups `a` and `b`.
    fn setup_corpus() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        std::fs::create_dir(&a).unwrap();
        std::fs::create_dir(&b).unwrap();

        std::fs::write(
            a.join("ownership.md"),
            "---\nagent: a\ntitle: Ownership\n---\n\
             Rust ownership rules keep memory safe. The borrow checker \
             enforces ownership at compile time.",
        )
        .unwrap();
        std::fs::write(
            a.join("pasta.md"),
            "Boil water in a large pot. Add salt and cook the pasta.",
        )
        .unwrap();
        std::fs::write(
            b.join("garden.md"),
            "Water your plants regularly and prune dead leaves.",
        )
        .unwrap();

        tmp
    }

    #[test]
    fn relevant_document_scores_highest() {
        let tmp = setup_corpus();
        let docs = load_documents(tmp.path(), None);
        let mut args = SearchArgs::new("rust ownership");
        args.count = 2;

        let results = execute_search(&args, &docs).unwrap();

        assert_eq!(results.len(), 2);
        assert!(results[0].path.ends_with("a/ownership.md"));
        assert!(results[0].score > results[1].score);
        assert_eq!(results[0].group, "a");
        assert_eq!(results[0].metadata.get("title"), Some("Ownership"));
    }

    #[test]
    fn ranks_are_sequential() {
        let tmp = setup_corpus();
        let docs = load_documents(tmp.path(), None);

        let results = execute_search(&SearchArgs::new("water"), &docs).unwrap();

        assert_eq!(results.len(), 3);
        for (i, r) in results.iter().enumerate() {
            assert_eq!(r.rank, i + 1);
        }
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn group_filter_excludes_other_groups() {
        let tmp = setup_corpus();
        let docs = load_documents(tmp.path(), Some("a"));

        let results = execute_search(&SearchArgs::new("water"), &docs).unwrap();

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.group == "a"));
    }

    #[test]
    fn min_score_filters_before_limit() {
        let tmp = setup_corpus();
        let docs = load_documents(tmp.path(), None);
        let mut args = SearchArgs::new("pasta");
        args.min_score = Some(0.01);

        let results = execute_search(&args, &docs).unwrap();

        assert_eq!(results.len(), 1);
        assert!(results[0].path.ends_with("a/pasta.md"));
    }

    #[test]
    fn all_ignores_count() {
        let tmp = setup_corpus();
        let docs = load_documents(tmp.path(), None);
        let mut args = SearchArgs::new("water");
        args.count = 1;
        args.all = true;

        assert_eq!(execute_search(&args, &docs).unwrap().len(), 3);
    }

    #[test]
    fn empty_corpus_returns_nothing() {
        let results = execute_search(&SearchArgs::new("anything"), &[]).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn snippet_points_at_first_match() {
        let tmp = setup_corpus();
        let docs = load_documents(tmp.path(), None);
        let mut args = SearchArgs::new("borrow");
        args.context = 10;

        let results = execute_search(&args, &docs).unwrap();

        let snippet = &results[0].snippet;
        assert!(snippet.starts_with("..."));
        assert!(snippet.contains("borrow"));
    }

    #[test]
    fn invalid_params_are_rejected() {
        let mut args = SearchArgs::new("q");
        args.b = 2.0;
        assert!(execute_search(&args, &[]).is_err());
    }

    #[test]
    fn metadata_line_hides_group_keys() {
        let mut metadata = Metadata::new();
        metadata.insert("agent", "librarian");
        metadata.insert("title", "Foo");
        metadata.insert("status", "draft");

        assert_eq!(metadata_line(&metadata), "title: Foo | status: draft");
        assert_eq!(metadata_line(&Metadata::new()), "");
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_file_name_serializes_lossily() {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("a");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("good.md"), "shared words").unwrap();
        std::fs::write(
            dir.join(OsStr::from_bytes(b"bad\xff.md")),
            "shared words",
        )
        .unwrap();

        let docs = load_documents(tmp.path(), None);
        assert_eq!(docs.len(), 2);
        let results = execute_search(&SearchArgs::new("shared"), &docs).unwrap();
        let response = SearchResponse {
            query: "shared",
            result_count: results.len(),
            results: &results,
        };

        let value = serde_json::to_value(&response).unwrap();
        let paths: Vec<&str> = value["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["path"].as_str().unwrap())
            .collect();
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().any(|p| p.ends_with("bad\u{fffd}.md")));
    }

    #[test]
    fn response_serializes_camel_case() {
        let hit = SearchHit {
            rank: 1,
            score: 1.5,
            path: PathBuf::from("root/a/doc.md"),
            group: "a".to_string(),
            metadata: Metadata::new(),
            snippet: "text".to_string(),
        };
        let response = SearchResponse {
            query: "q",
            result_count: 1,
            results: std::slice::from_ref(&hit),
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["resultCount"], 1);
        assert_eq!(value["results"][0]["path"], "root/a/doc.md");
        assert_eq!(value["results"][0]["group"], "a");
    }
}
