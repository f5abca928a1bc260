// Copyright (C) Brian G. Milnes 2025

//! Parse a PHP file and display its tree

use anyhow::{bail, Context, Result};
use clap::Parser;
use phpinspect::tool_runner::tool_runner::run_simple;
use phpinspect::{describe_errors, parse_source};
use std::path::PathBuf;

macro_rules! log {
    ($($arg:tt)*) => {{
        use std::io::Write;
        let msg = format!($($arg)*);
        println!("{}", msg);
        if let Ok(mut file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("analyses/phpinspect-parse.log")
        {
            let _ = writeln!(file, "{}", msg);
        }
    }};
}

#[derive(Parser)]
#[command(name = "phpinspect-parse")]
#[command(about = "Parse and display the tree of a PHP file", long_about = None)]
struct Args {
    /// Path to the PHP file to parse
    #[arg(short, long)]
    path: PathBuf,

    /// Output format (tree, text)
    #[arg(short, long, default_value = "tree")]
    format: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let parent_dir = args.path.parent().unwrap_or_else(|| std::path::Path::new(".")).to_path_buf();

    run_simple(parent_dir, || {
        let source = std::fs::read_to_string(&args.path).with_context(|| format!("Failed to read {}", args.path.display()))?;
        let parse = parse_source(&source);
        let tree = parse.tree();
        match args.format.as_str() {
            "tree" => log!("{}", tree.debug_dump().trim_end()),
            // round trip through the tree, byte for byte
            "text" => log!("{}", tree.text()),
            other => bail!("Unknown format: {other} (expected tree or text)"),
        }
        for error in describe_errors(&source, parse.errors()) {
            eprintln!("Warning: syntax error at {error}");
        }
        tree.check_integrity().map_err(anyhow::Error::msg)?;
        Ok(format!(
            "Parsed {} ({} nodes, {} syntax errors)",
            args.path.display(),
            tree.arena_len(),
            parse.errors().len()
        ))
    })
}
