// Copyright (C) Brian G. Milnes 2025

//! Tests for the cascade-string-replacement rule and its fixes

mod common;
use common::{anchor_text, first, parse, php, rule_matches};

use phpinspect::ast_utils::ast_utils::{assignment_value, statements};
use phpinspect::rules::cascade_replace::cascade_replace::RULE_ID;
use phpinspect::SyntaxKind::*;
use phpinspect::{apply_fix, are_equivalent_across, parse_fragment, Fix, FragmentKind, Match, Options, Severity, Tree};

const CASCADING: &str = "This str_replace(...) call can be merged with the previous.";
const NESTING: &str = "This str_replace(...) call can be merged with its parent.";
const SEARCH: &str = "Can be replaced with the string from the array.";

fn find(found: &[Match], message: &str) -> Match {
    found
        .iter()
        .find(|m| m.message == message)
        .cloned()
        .unwrap_or_else(|| panic!("no match {message:?} in {found:#?}"))
}

/// Parse, find the match carrying `message`, apply its fix, return the tree.
fn fixed(body: &str, message: &str, options: &Options) -> Tree {
    let mut tree = parse(&php(body));
    let found = rule_matches(&tree, RULE_ID, options);
    let fix = find(&found, message).fix.expect("match carries a fix");
    apply_fix(&mut tree, &fix).unwrap();
    assert!(tree.check_integrity().is_ok());
    tree
}

#[test]
fn test_cascading_calls_merge_into_one() {
    let body = "$x = str_replace(['a'], ['1'], $s);\n$x = str_replace(['b'], ['2'], $x);";
    let before = parse(&php(body));
    let count_before = statements(&before, before.root()).len();

    let tree = fixed(body, CASCADING, &Options::default());
    assert_eq!(statements(&tree, tree.root()).len(), count_before - 1);
    assert_eq!(tree.text(), "<?php\n$x = str_replace(array('a', 'b'), array('1', '2'), $s);\n");

    let assignment = first(&tree, ASSIGN_EXPR);
    let merged = assignment_value(&tree, assignment).unwrap();
    let expected = parse_fragment("str_replace(['a','b'],['1','2'],$s)", FragmentKind::Expression).unwrap();
    assert!(are_equivalent_across(&tree, merged, &expected.tree, expected.node));
}

#[test]
fn test_merge_keeps_configured_short_arrays() {
    let options = Options { use_short_array_syntax: true, ..Options::default() };
    let body = "$x = str_replace(['a'], ['1'], $s);\n$x = str_replace(['b'], ['2'], $x);";
    let tree = fixed(body, CASCADING, &options);
    assert_eq!(tree.text(), "<?php\n$x = str_replace(['a', 'b'], ['1', '2'], $s);\n");
}

#[test]
fn test_cascading_match_shape() {
    let tree = parse(&php("$x = str_replace('a', 'b', $s);\n$x = str_replace('c', 'd', $x);"));
    let found = rule_matches(&tree, RULE_ID, &Options::default());
    let cascading = find(&found, CASCADING);
    assert_eq!(cascading.severity, Severity::Warning);
    assert_eq!(anchor_text(&tree, &cascading), "str_replace('c', 'd', $x)");
    assert_eq!(cascading.location.line, 3);
    assert!(matches!(cascading.fix, Some(Fix::MergeReplaceCalls { short_arrays: false, .. })));
    assert_eq!(cascading.fix.as_ref().unwrap().name(), "Merge str_replace(...) calls");
}

#[test]
fn test_cascading_into_return() {
    let tree = fixed("$x = str_replace('a', 'b', $s);\nreturn str_replace('c', 'd', $x);", CASCADING, &Options::default());
    assert_eq!(tree.text(), "<?php\nreturn str_replace(array('a', 'c'), array('b', 'd'), $s);\n");
}

#[test]
fn test_identical_replacements_collapse_to_one_literal() {
    let tree = fixed("$x = str_replace('a', '', $s);\n$x = str_replace('b', '', $x);", CASCADING, &Options::default());
    assert_eq!(tree.text(), "<?php\n$x = str_replace(array('a', 'b'), '', $s);\n");
}

#[test]
fn test_scalar_replacement_is_broadcast() {
    let tree = fixed("$x = str_replace(['a', 'b'], '-', $s);\n$x = str_replace('c', '+', $x);", CASCADING, &Options::default());
    assert_eq!(tree.text(), "<?php\n$x = str_replace(array('a', 'b', 'c'), array('-', '-', '+'), $s);\n");
}

#[test]
fn test_different_destination_is_not_cascading() {
    let tree = parse(&php("$x = str_replace('a', 'b', $s);\n$y = str_replace('c', 'd', $x);"));
    let found = rule_matches(&tree, RULE_ID, &Options::default());
    assert!(found.iter().all(|m| m.message != CASCADING));
}

#[test]
fn test_unrelated_previous_statement() {
    let tree = parse(&php("$y = str_replace('a', 'b', $s);\n$x = str_replace('c', 'd', $x);"));
    assert!(rule_matches(&tree, RULE_ID, &Options::default()).is_empty());
}

#[test]
fn test_nested_call_merges_into_parent() {
    let body = "$y = str_replace('a', 'b', str_replace('c', 'd', $s));";
    let tree = parse(&php(body));
    let found = rule_matches(&tree, RULE_ID, &Options::default());
    let nesting = find(&found, NESTING);
    assert_eq!(anchor_text(&tree, &nesting), "str_replace('c', 'd', $s)");

    let tree = fixed(body, NESTING, &Options::default());
    assert_eq!(tree.text(), "<?php\n$y = str_replace(array('c', 'a'), array('d', 'b'), $s);\n");
    assert_eq!(statements(&tree, tree.root()).len(), 1);
}

#[test]
fn test_repeated_search_literal_is_simplified() {
    let body = "$y = str_replace(['a', 'a', 'a'], $r, $s);";
    let tree = parse(&php(body));
    let found = rule_matches(&tree, RULE_ID, &Options::default());
    let search = find(&found, SEARCH);
    assert_eq!(search.severity, Severity::WeakWarning);
    assert_eq!(anchor_text(&tree, &search), "['a', 'a', 'a']");
    match &search.fix {
        Some(Fix::SimplifySearchArgument { replacement, .. }) => assert_eq!(replacement, "'a'"),
        other => panic!("unexpected fix {other:?}"),
    }

    let tree = fixed(body, SEARCH, &Options::default());
    assert_eq!(tree.text(), "<?php\n$y = str_replace('a', $r, $s);\n");
}

#[test]
fn test_mixed_search_array_is_left_alone() {
    for body in [
        "$y = str_replace(['a', 'b'], $r, $s);",
        "$y = str_replace(['a', $b], $r, $s);",
        "$y = str_replace(['k' => 'a'], $r, $s);",
        "$y = str_replace(['a', \"a\"], $r, $s);",
    ] {
        let tree = parse(&php(body));
        assert!(rule_matches(&tree, RULE_ID, &Options::default()).is_empty(), "{body}");
    }
}

#[test]
fn test_only_three_argument_calls() {
    let tree = parse(&php("$x = str_replace('a', 'b');\n$x = str_replace('c', 'd', $x, $count);"));
    assert!(rule_matches(&tree, RULE_ID, &Options::default()).is_empty());
}

#[test]
fn test_fixed_tree_does_not_report_the_same_match() {
    let body = "$x = str_replace('a', 'b', $s);\n$x = str_replace('c', 'd', $x);";
    let tree = fixed(body, CASCADING, &Options::default());
    let again = rule_matches(&tree, RULE_ID, &Options::default());
    assert!(again.iter().all(|m| m.message != CASCADING), "{again:#?}");
}
