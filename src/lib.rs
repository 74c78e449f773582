//! docsift - BM25 keyword search over grouped markdown artifacts.
//!
//! docsift reads `*.md` files from the subdirectories ("groups") of a root
//! directory, parses their optional `---` front-matter, and ranks them
//! against a free-text query with [BM25](https://en.wikipedia.org/wiki/Okapi_BM25).
//! The corpus is loaded and scored fresh on every query; nothing is
//! persisted.
//!
//! # Quick start
//!
//! ```no_run
//! use docsift::{RootDir, cli::SearchArgs, search};
//!
//! let root = RootDir::resolve(None);
//! let documents = root.load(Some("librarian"));
//!
//! let mut args = SearchArgs::new("release checklist");
//! args.count = 5;
//!
//! let results = search::execute_search(&args, &documents).unwrap();
//! for r in &results {
//!     println!("{} [{}] (score: {:.2})", r.path.display(), r.group, r.score);
//! }
//! ```

pub mod bm25;
pub mod cli;
pub mod document;
pub mod error;
pub mod frontmatter;
pub mod ingestion;
pub mod mcp;
pub mod root_dir;
pub mod search;
pub mod text_util;
pub mod tokenizer;
pub mod walker;

pub use bm25::{Bm25Params, IdfFlavor, ScoredDocument, rank};
pub use document::Document;
pub use error::{Error, Result};
pub use frontmatter::{Metadata, extract_metadata};
pub use ingestion::load_documents;
pub use root_dir::RootDir;
pub use text_util::extract_snippet;
pub use tokenizer::tokenize;
