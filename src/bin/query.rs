//! One-shot query against a generated search index file.

use docindex::engine::{IndexBuilder, IndexOptions};
use docindex::store::load_store;

use std::path::PathBuf;

fn print_help() {
    println!("docindex-query v{}", env!("CARGO_PKG_VERSION"));
    println!("Build an index from DOCS_FILE and print the ranked hits for QUERY\n");
    println!("USAGE:");
    println!("    docindex-query [--limit N] <DOCS_FILE> <QUERY...>\n");
    println!("OPTIONS:");
    println!("    -l, --limit N    Print at most N hits (default: all)");
    println!("    -h, --help       Show this help message");
}

#[derive(Debug, PartialEq)]
struct Args {
    limit: Option<usize>,
    docs: PathBuf,
    query: String,
}

/// Parse the arguments after the program name. `Ok(None)` means help was asked for.
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<Args>, String> {
    let mut limit = None;
    let mut positional = Vec::new();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "-l" | "--limit" => {
                let v = args.next().ok_or("--limit needs a value")?;
                limit = Some(v.parse().map_err(|_| format!("bad limit {:?}", v))?);
            }
            _ => positional.push(arg),
        }
    }
    if positional.len() < 2 {
        return Err("expected <DOCS_FILE> <QUERY...>".into());
    }
    let docs = PathBuf::from(positional.remove(0));
    Ok(Some(Args {
        limit,
        docs,
        query: positional.join(" "),
    }))
}

fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "docindex=warn");
    }
    env_logger::init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(Some(args)) => args,
        Ok(None) => {
            print_help();
            return;
        }
        Err(e) => {
            eprintln!("docindex-query: {e}");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(args) {
        eprintln!("docindex-query: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let store = load_store(&args.docs)?;
    let index = IndexBuilder::new(IndexOptions::default()).build(&store)?;
    let hits = match args.limit {
        Some(n) => index.search_limited(&args.query, n)?,
        None => index.search(&args.query)?,
    };

    for hit in &hits {
        let (kind, number, title) = store
            .get(&hit.id)
            .map(|d| (d.kind.as_str(), d.number.as_str(), d.title.as_str()))
            .unwrap_or_default();
        println!("{:>8.4}  {:<28} {} {} {}", hit.score, hit.id, kind, number, title);
    }
    println!("{} hit(s)", hits.len());
    Ok(())
}
