use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::{
    bm25::{self, Bm25Params, IdfFlavor},
    text_util::DEFAULT_SNIPPET_CONTEXT,
};

#[derive(Debug, Parser)]
#[command(
    name = "docsift",
    about = "BM25 keyword search over grouped markdown artifacts"
)]
pub struct Cli {
    /// Directory whose subdirectories hold the documents
    #[arg(short, long, global = true)]
    pub path: Option<PathBuf>,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rank documents against a query
    Search(SearchArgs),
    /// List document groups and how many documents each holds
    Groups(GroupsArgs),
    /// Start MCP server for AI agent integration
    Mcp,
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

/// IDF formula selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IdfArg {
    /// ln((N - n + 0.5) / (n + 0.5) + 1), never negative
    PlusOne,
    /// Classic Okapi IDF with an epsilon floor, may go negative
    Okapi,
}

// -- Search --

#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// The search query
    pub query: String,

    /// Number of results to return
    #[arg(short = 'n', long = "top", visible_alias = "count", default_value = "10")]
    pub count: usize,

    /// Search only within this group
    #[arg(short = 'g', long, visible_alias = "agent", short_alias = 'a')]
    pub group: Option<String>,

    /// Return every document, ignoring --top
    #[arg(long)]
    pub all: bool,

    /// Drop results scoring below this value
    #[arg(long, allow_negative_numbers = true)]
    pub min_score: Option<f64>,

    /// Output results as JSON
    #[arg(long, conflicts_with = "files")]
    pub json: bool,

    /// Output only file paths (one per line)
    #[arg(long)]
    pub files: bool,

    /// Characters of context on each side of the snippet match
    #[arg(long, default_value_t = DEFAULT_SNIPPET_CONTEXT)]
    pub context: usize,

    /// BM25 term frequency saturation
    #[arg(long, default_value_t = bm25::DEFAULT_K1)]
    pub k1: f64,

    /// BM25 length normalization
    #[arg(long, default_value_t = bm25::DEFAULT_B)]
    pub b: f64,

    /// IDF formula
    #[arg(long, value_enum, default_value_t = IdfArg::PlusOne)]
    pub idf: IdfArg,

    /// Negative IDF floor factor for --idf okapi
    #[arg(long, default_value_t = bm25::DEFAULT_EPSILON)]
    pub epsilon: f64,
}

impl SearchArgs {
    /// Search arguments with every option at its default.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            count: 10,
            group: None,
            all: false,
            min_score: None,
            json: false,
            files: false,
            context: DEFAULT_SNIPPET_CONTEXT,
            k1: bm25::DEFAULT_K1,
            b: bm25::DEFAULT_B,
            idf: IdfArg::PlusOne,
            epsilon: bm25::DEFAULT_EPSILON,
        }
    }

    pub fn bm25_params(&self) -> Bm25Params {
        let idf = match self.idf {
            IdfArg::PlusOne => IdfFlavor::PlusOne,
            IdfArg::Okapi => IdfFlavor::Okapi {
                epsilon: self.epsilon,
            },
        };
        Bm25Params {
            k1: self.k1,
            b: self.b,
            idf,
        }
    }
}

// -- Groups --

#[derive(Debug, Parser)]
pub struct GroupsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "docsift",
            &mut std::io::stdout(),
        );
    }
}
