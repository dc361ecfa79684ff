//! Compile `.proto` schemas into a descriptor set.
//!
//! Usage: `protoset [-I root]... [-o out] [-f json|pb] [file]`
//!
//! Reads the entry schema from `file` (stdin when absent or `-`),
//! resolves imports against the `-I` roots, and writes the descriptor
//! set as protojson (default) or binary wire bytes. Unresolved-import
//! diagnostics go to stderr; any fatal error exits non-zero.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use protoset::{compile, SearchPath};

#[derive(Parser, Debug)]
#[command(name = "protoset")]
#[command(about = "Compile .proto schemas into a descriptor set", version)]
struct Args {
    /// Input .proto file; stdin when absent or '-'
    filename: Option<PathBuf>,

    /// Import search root, highest priority first (repeatable)
    #[arg(short = 'I', long = "proto-path", value_name = "DIR")]
    proto_path: Vec<PathBuf>,

    /// Output file; stdout when absent or '-'
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// protojson, multiline
    Json,
    /// descriptor.proto wire bytes
    Pb,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("{}", err);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let (entry_name, entry_source) = read_entry(args)?;
    let search = SearchPath::new(args.proto_path.clone());

    let set = compile(&search, &entry_name, &entry_source, &mut |line| {
        eprintln!("{}", line)
    })?;

    let bytes = match args.format {
        Format::Json => {
            let mut json = set.to_json()?;
            json.push('\n');
            json.into_bytes()
        }
        Format::Pb => set.encode(),
    };

    match &args.out {
        Some(path) if path.as_os_str() != "-" => fs::write(path, bytes)?,
        _ => io::stdout().write_all(&bytes)?,
    }
    Ok(())
}

fn read_entry(args: &Args) -> Result<(String, String), io::Error> {
    match &args.filename {
        Some(path) if path.as_os_str() != "-" => {
            Ok((path.display().to_string(), fs::read_to_string(path)?))
        }
        _ => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok(("<stdin>".to_string(), source))
        }
    }
}
