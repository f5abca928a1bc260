// Copyright (C) Brian G. Milnes 2025

//! Common test utilities for integration tests

#![allow(dead_code)]

use phpinspect::ast_utils::ast_utils::find_nodes;
use phpinspect::{analyze, parse_file, Match, NodeId, Options, SyntaxKind, Tree};
use std::fs;
use std::path::{Path, PathBuf};

/// Wrap statements in an open tag, one trailing newline.
pub fn php(body: &str) -> String {
    format!("<?php\n{body}\n")
}

pub fn parse(source: &str) -> Tree {
    parse_file(source).unwrap_or_else(|e| panic!("test source failed to parse: {e}\n{source}"))
}

/// The `n`th node of `kind` in pre-order.
pub fn nth(tree: &Tree, kind: SyntaxKind, n: usize) -> NodeId {
    let found = find_nodes(tree, tree.root(), kind);
    *found.get(n).unwrap_or_else(|| panic!("no {kind:?} number {n} in:\n{}", tree.debug_dump()))
}

pub fn first(tree: &Tree, kind: SyntaxKind) -> NodeId {
    nth(tree, kind, 0)
}

/// Matches of one rule over an already parsed tree.
pub fn rule_matches(tree: &Tree, rule: &str, options: &Options) -> Vec<Match> {
    analyze(tree, options).into_iter().filter(|m| m.rule == rule).collect()
}

pub fn messages(matches: &[Match]) -> Vec<String> {
    matches.iter().map(|m| m.message.clone()).collect()
}

/// Source text of the node a match is anchored on.
pub fn anchor_text(tree: &Tree, found: &Match) -> String {
    tree.text_of(found.anchor.id).trim().to_string()
}

pub fn write_php(dir: &Path, name: &str, source: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, source).unwrap();
    path
}

/// Parse a summary count such as "1,234".
pub fn parse_number(text: &str) -> Result<usize, std::num::ParseIntError> {
    text.replace(',', "").parse()
}

/// The numbers of a "Summary: ..." line, in order.
pub fn summary_numbers(stdout: &str) -> Vec<usize> {
    let line = stdout
        .lines()
        .find(|line| line.starts_with("Summary:"))
        .unwrap_or_else(|| panic!("Summary line not found in:\n{stdout}"));
    line.trim_start_matches("Summary:")
        .split(',')
        .filter_map(|part| part.split_whitespace().next())
        .map(|n| parse_number(n).unwrap())
        .collect()
}
