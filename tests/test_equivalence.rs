// Copyright (C) Brian G. Milnes 2025

//! Tests for structural equivalence

mod common;
use common::parse;

use phpinspect::equivalence::equivalence::int_value;
use phpinspect::{are_equivalent, are_equivalent_across, parse_fragment, Fragment, FragmentKind};

fn expr(text: &str) -> Fragment {
    parse_fragment(text, FragmentKind::Expression).unwrap()
}

fn equivalent(a: &str, b: &str) -> bool {
    let (x, y) = (expr(a), expr(b));
    are_equivalent_across(&x.tree, x.node, &y.tree, y.node)
}

const SAMPLE: &str = r#"<?php
function f($a, $b) {
    if (isset($a['k']) && $a['k'] !== null || !is_array($b)) {
        return str_replace(['x', 'y'], "z", $a . $b);
    }
    $o = new Foo($a, 0x10);
    return $o->run(fn($v) => $v - 1) ?? Foo::BAR;
}
"#;

#[test]
fn test_equivalence_is_reflexive() {
    let tree = parse(SAMPLE);
    for node in tree.preorder(tree.root()) {
        assert!(are_equivalent(&tree, node, node), "{:?} {:?}", tree.kind(node), tree.text_of(node));
    }
}

#[test]
fn test_equivalence_is_symmetric() {
    let tree = parse(SAMPLE);
    let nodes: Vec<_> = tree.descendants(tree.root()).collect();
    for a in &nodes {
        for b in &nodes {
            assert_eq!(are_equivalent(&tree, *a, *b), are_equivalent(&tree, *b, *a));
        }
    }
}

#[test]
fn test_formatting_and_parentheses_are_ignored() {
    assert!(equivalent("f( $a+1 )", "(f($a + 1))"));
    assert!(equivalent("$a /* note */ . $b", "$a.$b"));
}

#[test]
fn test_operand_order_matters() {
    assert!(!equivalent("$a - $b", "$b - $a"));
    assert!(!equivalent("$a - $b", "$a + $b"));
}

#[test]
fn test_literals_compare_by_value() {
    assert!(equivalent("0x10", "16"));
    assert!(equivalent("1_000", "1000"));
    assert!(equivalent("'a'", "\"a\""));
    assert!(equivalent("1.50", "1.5"));
    assert!(!equivalent("'1'", "1"));
    assert!(!equivalent("'a'", "'b'"));
}

#[test]
fn test_arrays_compare_by_elements_whatever_the_syntax() {
    assert!(equivalent("array('a', 'b')", "['a','b']"));
    assert!(equivalent("['k' => 1, 2,]", "array('k' => 1, 2)"));
    assert!(equivalent("array()", "[]"));
    assert!(!equivalent("['a', 'b']", "['b', 'a']"));
    assert!(!equivalent("['a']", "['a', 'b']"));
    assert!(!equivalent("['k' => 1]", "[1]"));
}

#[test]
fn test_function_names_ignore_case() {
    assert!(equivalent("STRLEN($a)", "strlen($a)"));
    assert!(equivalent("\\strlen($a)", "strlen($a)"));
    assert!(equivalent("new foo()", "new Foo()"));
    assert!(!equivalent("$a", "$A"));
    assert!(!equivalent("$o->Name", "$o->name"));
}

#[test]
fn test_inequivalent_operators() {
    assert!(equivalent("$a != $b", "$a <> $b"));
    assert!(!equivalent("$a == $b", "$a === $b"));
}

#[test]
fn test_int_value() {
    assert_eq!(int_value("0x1F"), Some(31));
    assert_eq!(int_value("0b101"), Some(5));
    assert_eq!(int_value("010"), Some(8));
    assert_eq!(int_value("0o17"), Some(15));
    assert_eq!(int_value("1_000"), Some(1000));
    assert_eq!(int_value("0"), Some(0));
}
