// Copyright (C) Brian G. Milnes 2025

//! phpinspect - tree-based PHP inspection and fix engine
//!
//! This library parses PHP into a lossless arena tree, runs pattern rules
//! over it, and applies the fixes some of those rules attach to their
//! findings.

pub mod syntax_kind;
pub mod lexer;
pub mod tree;
pub mod parser;
pub mod ast_utils;
pub mod equivalence;
pub mod cost;
pub mod hierarchy;
pub mod options;
pub mod diagnostics;
pub mod rules;
pub mod visitor;
pub mod analyzer;
pub mod fixer;
pub mod args;
pub mod logging;
pub mod tool_runner;

use anyhow::{Context, Result};
use std::path::Path;

// Re-export commonly used items
pub use syntax_kind::syntax_kind::SyntaxKind;
pub use tree::tree::{Handle, NodeId, StructureError, Tree, TreeBuilder};
pub use parser::parser::{parse_file, parse_fragment, parse_snippet, parse_source, Fragment, FragmentKind, Parse, ParseError};
pub use analyzer::analyzer::{analyze, Analyzer, Scan};
pub use diagnostics::diagnostics::{Collector, FileReport, Location, Match, Reporter, Severity};
pub use equivalence::equivalence::{are_equivalent, are_equivalent_across};
pub use cost::cost::{cost, CouplingCheck, SharedVariableCoupling};
pub use hierarchy::hierarchy::{ClassHierarchy, MemoHierarchy, NoHierarchy, TreeHierarchy};
pub use options::options::{Options, OptionsError};
pub use fixer::fixer::{apply_all, apply_fix, apply_plan, fix_all, AppliedFix, Document, Edit, EditError, EditPlan, Fix};
pub use visitor::visitor::{walk, Dispatch, IssueVisitor};
pub use rules::{default_rules, Rule, RuleContext};
pub use args::args::{find_php_files, format_number, get_search_dirs, OutputFormat, StandardArgs};

/// Parse `source`, recovering from syntax errors, and run `analyzer` over it.
pub fn check_source(source: &str, analyzer: &Analyzer) -> Vec<Match> {
    let parse = parse_source(source);
    let hierarchy = TreeHierarchy::from_tree(parse.tree());
    analyzer.scan(parse.tree(), &hierarchy).collect()
}

/// Inspect one file; the report names the file as given. Syntax errors do
/// not stop the rules, they are listed in the report.
pub fn check_file(file: &Path, analyzer: &Analyzer) -> Result<FileReport> {
    let source = std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let parse = parse_source(&source);
    let hierarchy = TreeHierarchy::from_tree(parse.tree());
    let matches = analyzer.scan(parse.tree(), &hierarchy).collect();
    Ok(FileReport {
        file: file.display().to_string(),
        matches,
        syntax_errors: describe_errors(&source, parse.errors()),
    })
}

/// `line N: message` for each error.
pub fn describe_errors(source: &str, errors: &[ParseError]) -> Vec<String> {
    errors
        .iter()
        .map(|e| {
            let line = source[..e.offset.min(source.len())].matches('\n').count() + 1;
            format!("line {line}: {}", e.message)
        })
        .collect()
}

/// Review a PHP file and print its findings; returns how many there were.
pub fn review(file: &Path, options: &Options, format: OutputFormat) -> Result<usize> {
    let analyzer = Analyzer::new(options.clone());
    let report = check_file(file, &analyzer)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            for warning in report.warning_lines() {
                eprintln!("Warning: {warning}");
            }
            for line in report.text_lines() {
                println!("{line}");
            }
        }
    }
    Ok(report.matches.len())
}

/// Apply every available fix to `source`. A file with syntax errors is
/// refused rather than rewritten around text the parser skipped.
pub fn fix_source(source: &str, options: &Options) -> Result<(String, Vec<AppliedFix>)> {
    let mut tree = parse_file(source)?;
    let applied = fix_all(&mut tree, options);
    Ok((tree.text(), applied))
}

/// Fix a PHP file, writing it back when `in_place`, printing it otherwise.
pub fn fix_file(file: &Path, options: &Options, in_place: bool) -> Result<Vec<AppliedFix>> {
    let source = std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let (fixed, applied) = fix_source(&source, options).with_context(|| format!("Failed to fix {}", file.display()))?;
    if in_place {
        if fixed != source {
            std::fs::write(file, &fixed).with_context(|| format!("Failed to write {}", file.display()))?;
        }
    } else {
        print!("{fixed}");
    }
    Ok(applied)
}

/// Parse a PHP file and display its tree; returns the number of syntax
/// errors, whose text shows up under `ERROR` nodes.
pub fn parse(file: &Path) -> Result<usize> {
    let source = std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let parse = parse_source(&source);
    print!("{}", parse.tree().debug_dump());
    for error in describe_errors(&source, parse.errors()) {
        eprintln!("Warning: {}: syntax error at {error}", file.display());
    }
    Ok(parse.errors().len())
}
