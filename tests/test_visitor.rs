// Copyright (C) Brian G. Milnes 2025

//! Tests for visitor module

mod common;
use common::{first, parse, php};

use phpinspect::rules::loop_accumulation::loop_accumulation::RULE_ID as LOOP_RULE;
use phpinspect::SyntaxKind::*;
use phpinspect::{default_rules, walk, Analyzer, Dispatch, IssueVisitor, NoHierarchy, Options, TreeHierarchy};

#[test]
fn test_dispatch_by_kind() {
    let rules = default_rules();
    let dispatch = Dispatch::new(&rules);
    assert_eq!(dispatch.rules_for(IF_STMT), &[2]);
    assert_eq!(dispatch.rules_for(METHOD_CALL_EXPR), &[3]);
    assert!(dispatch.rules_for(CLASS_DECL).is_empty());
    assert!(dispatch.rules_for(WHITESPACE).is_empty());
}

#[test]
fn test_walk_visits_nodes_in_preorder() {
    let tree = parse(&php("$a = f(1);"));
    let mut kinds = Vec::new();
    walk(&tree, tree.root(), |node| kinds.push(tree.kind(node)));
    assert_eq!(kinds, vec![SOURCE_FILE, EXPR_STMT, ASSIGN_EXPR, VARIABLE, CALL_EXPR, NAME_REF, ARG_LIST, LITERAL]);
}

#[test]
fn test_visitor_traversal() {
    let tree = parse(&php("function main() {\n    echo 'Hello, world!';\n}"));
    let analyzer = Analyzer::new(Options::default());
    let mut visitor = IssueVisitor::new(&analyzer);
    visitor.visit(&tree, &TreeHierarchy::from_tree(&tree));
    assert!(visitor.collector.matches.is_empty());
    assert_eq!(visitor.collector.summary(), "no findings");
}

#[test]
fn test_visitor_collects_per_rule_counts() {
    let source = php("\
while ($more) {
    $a = array_merge($a, $b);
    $c = array_replace($c, $d);
}
if ($x or $y) {}");
    let tree = parse(&source);
    let analyzer = Analyzer::new(Options::default());
    let mut visitor = IssueVisitor::new(&analyzer);
    visitor.visit(&tree, &NoHierarchy);
    let collector = visitor.into_collector();
    assert_eq!(collector.count(LOOP_RULE), 2);
    assert_eq!(collector.count("not-optimal-if-conditions"), 1);
    assert_eq!(collector.count("unused-mock"), 0);
    assert_eq!(collector.summary(), "not-optimal-if-conditions: 1, slow-array-operations-in-loop: 2");
}

#[test]
fn test_visit_subtree_only() {
    let tree = parse(&php("if ($x or $y) {}\nwhile ($more) { $a = array_merge($a, $b); }"));
    let analyzer = Analyzer::new(Options::default());
    let mut visitor = IssueVisitor::new(&analyzer);
    visitor.visit_subtree(&tree, first(&tree, WHILE_STMT), &NoHierarchy);
    assert_eq!(visitor.collector.matches.len(), 1);
    assert_eq!(visitor.collector.matches[0].rule, LOOP_RULE);
}
