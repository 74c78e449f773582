use std::process::ExitCode;

use clap::Parser;
use docsift::{
    RootDir,
    cli::{Cli, Command, SearchArgs},
    error::{self, Error},
    mcp,
    search,
};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("DOCSIFT_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> error::Result<()> {
    let root = RootDir::resolve(cli.path.as_deref());

    match cli.command {
        Command::Search(args) => cmd_search(&root, &args)?,
        Command::Groups(args) => cmd_groups(&root, args.json)?,
        Command::Mcp => mcp::run_mcp(root)?,
        Command::Completions(args) => args.generate(),
    }

    Ok(())
}

fn cmd_search(root: &RootDir, args: &SearchArgs) -> error::Result<()> {
    let documents = root.load(args.group.as_deref());
    if documents.is_empty() {
        return Err(Error::NoDocuments(root.path().to_path_buf()));
    }

    let results = search::execute_search(args, &documents)?;

    if args.json {
        search::format_json(&results, &args.query)?;
    } else if args.files {
        search::format_files(&results);
    } else {
        search::format_human(&results, &args.query);
    }
    Ok(())
}

fn cmd_groups(root: &RootDir, json: bool) -> error::Result<()> {
    let groups = root.groups();

    if json {
        println!("{}", serde_json::to_string(&groups)?);
    } else if groups.is_empty() {
        println!("No groups found in {}", root.path().display());
    } else {
        for group in &groups {
            println!("{}\t{}", group.name, group.documents);
        }
    }
    Ok(())
}
