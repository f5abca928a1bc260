// Copyright (C) Brian G. Milnes 2025

//! Tests for the not-optimal-if-conditions rule

mod common;
use common::{anchor_text, first, messages, parse, php, rule_matches};

use phpinspect::rules::if_conditions::if_conditions::{split_conditions, RULE_ID};
use phpinspect::SyntaxKind::*;
use phpinspect::ast_utils::ast_utils::condition;
use phpinspect::{Match, Options, Severity, Tree};

const ORDERING: &str = "This condition execution costs less than the previous one.";
const WRAP: &str = "Confusing conditions structure: please wrap needed with '(...)'.";
const DUPLICATE_CALL: &str = "This call is duplicated in conditions set.";
const ISSET_AND: &str = "This can be merged into the previous 'isset(..., ...[, ...])'.";
const ISSET_OR: &str = "This can be merged into the previous '!isset(..., ...[, ...])'.";
const AMBIGUOUS: &str = "This condition is ambiguous and can be safely removed.";
const COMPLEMENTARY: &str = "Probable bug: ensure this behaves properly with 'instanceof(...)' in this scenario.";
const DUPLICATE_CONDITION: &str = "This condition is duplicated in another if/elseif branch.";
const NULL_COMPARISON: &str = "This null comparison is redundant: 'isset(...)' already checks it.";
const USE_AND: &str = "'&&' should be used instead.";
const USE_OR: &str = "'||' should be used instead.";

fn check_with(body: &str, options: &Options) -> (Vec<Match>, Tree) {
    let tree = parse(&php(body));
    (rule_matches(&tree, RULE_ID, options), tree)
}

fn check(body: &str) -> (Vec<Match>, Tree) {
    check_with(body, &Options::default())
}

fn terms_text(condition_source: &str) -> (Option<phpinspect::SyntaxKind>, Vec<String>) {
    let tree = parse(&php(&format!("if ({condition_source}) {{}}")));
    let cond = condition(&tree, first(&tree, IF_STMT)).unwrap();
    let terms = split_conditions(&tree, cond);
    (terms.op, terms.terms.iter().map(|t| tree.text_of(*t).trim().to_string()).collect())
}

#[test]
fn test_split_conditions() {
    assert_eq!(terms_text("$a && $b && $c"), (Some(AMP2), vec!["$a".into(), "$b".into(), "$c".into()]));
    assert_eq!(terms_text("($a || $b)"), (Some(PIPE2), vec!["$a".into(), "$b".into()]));
    assert_eq!(terms_text("($a && $b) && ($c)"), (Some(AMP2), vec!["$a && $b".into(), "$c".into()]));
    assert_eq!(terms_text("$a and $b"), (Some(AND_KW), vec!["$a".into(), "$b".into()]));
    assert_eq!(terms_text("$a"), (None, vec!["$a".into()]));
    assert_eq!(terms_text("$a || $b && $c"), (Some(PIPE2), vec!["$a".into(), "$b && $c".into()]));
}

#[test]
fn test_cheaper_term_after_expensive_one() {
    let (found, tree) = check("if (expensiveCall() && $x === 1) {}");
    assert_eq!(messages(&found), vec![ORDERING]);
    assert_eq!(anchor_text(&tree, &found[0]), "$x === 1");
    assert_eq!(found[0].severity, Severity::WeakWarning);
}

#[test]
fn test_cheap_term_first_is_fine() {
    let (found, _) = check("if (is_array($x) && expensiveCall($x)) {}");
    assert!(found.is_empty(), "{found:#?}");
}

#[test]
fn test_coupled_terms_are_not_reordered() {
    let (found, _) = check("if ($x->load() && $x !== null) {}");
    assert!(found.is_empty(), "{found:#?}");
}

#[test]
fn test_configured_cheap_function() {
    let body = "if (f($a) && my_check($b)) {}";
    let (found, _) = check(body);
    assert!(found.is_empty());
    let options = Options { cheap_functions: vec!["my_check".to_string()], ..Options::default() };
    let (found, _) = check_with(body, &options);
    assert_eq!(messages(&found), vec![ORDERING]);
}

#[test]
fn test_mixed_operators_need_parentheses() {
    let (found, tree) = check("if ($a && $b || f()) {}");
    assert_eq!(messages(&found), vec![WRAP]);
    assert_eq!(anchor_text(&tree, &found[0]), "$a && $b");
    assert_eq!(found[0].severity, Severity::Error);

    let (found, _) = check("if (($a && $b) || f()) {}");
    assert!(found.is_empty());

    let options = Options { report_missing_parentheses: false, ..Options::default() };
    let (found, _) = check_with("if ($a && $b || f()) {}", &options);
    assert!(found.is_empty());
}

#[test]
fn test_duplicated_call_operands() {
    let (found, tree) = check("if (f($x) > 1 && f($x) < 5) {}");
    assert_eq!(messages(&found), vec![DUPLICATE_CALL]);
    assert_eq!(anchor_text(&tree, &found[0]), "f($x)");
    assert_eq!(found[0].location.column, 18);
}

#[test]
fn test_multiple_isset_in_conjunction() {
    let (found, tree) = check("if (isset($a) && isset($b) && isset($c)) {}");
    assert_eq!(messages(&found), vec![ISSET_AND, ISSET_AND]);
    assert_eq!(anchor_text(&tree, &found[0]), "isset($b)");
}

#[test]
fn test_multiple_negated_isset_in_disjunction() {
    let (found, tree) = check("if (!isset($a) || !isset($b)) {}");
    assert_eq!(messages(&found), vec![ISSET_OR]);
    assert_eq!(anchor_text(&tree, &found[0]), "isset($b)");

    let (found, _) = check("if (isset($a) || isset($b)) {}");
    assert!(found.is_empty());
}

#[test]
fn test_instanceof_with_identity_check() {
    let (found, tree) = check("if ($a instanceof Foo && $a === $b) {}");
    assert_eq!(messages(&found), vec![COMPLEMENTARY]);
    assert_eq!(anchor_text(&tree, &found[0]), "$a === $b");

    let (found, _) = check("if ($a instanceof Foo || $a === $b) {}");
    assert!(found.is_empty());
}

#[test]
fn test_instanceof_of_a_subclass_is_ambiguous() {
    let body = "class Base {}\nclass Child extends Base {}\nif ($o instanceof Base || $o instanceof Child) {}";
    let (found, tree) = check(body);
    assert_eq!(messages(&found), vec![AMBIGUOUS]);
    assert_eq!(anchor_text(&tree, &found[0]), "$o instanceof Child");

    let (found, tree) = check("if ($e instanceof InvalidArgumentException || $e instanceof Exception) {}");
    assert_eq!(messages(&found), vec![AMBIGUOUS]);
    assert_eq!(anchor_text(&tree, &found[0]), "$e instanceof InvalidArgumentException");
}

#[test]
fn test_unknown_class_does_not_hide_ambiguous_tests() {
    let body = "if ($x instanceof Unknown || $x instanceof \\DateTime || $x instanceof \\DateTimeInterface) {}";
    let (found, tree) = check(body);
    assert_eq!(messages(&found), vec![AMBIGUOUS]);
    assert_eq!(anchor_text(&tree, &found[0]), "$x instanceof \\DateTime");
}

#[test]
fn test_instanceof_on_different_subjects() {
    let body = "class Base {}\nclass Child extends Base {}\nif ($a instanceof Base || $b instanceof Child) {}";
    let (found, _) = check(body);
    assert!(found.is_empty());
}

#[test]
fn test_isset_then_null_comparison() {
    let (found, tree) = check("if (isset($a) && $a !== null) {}");
    assert_eq!(messages(&found), vec![NULL_COMPARISON]);
    assert_eq!(anchor_text(&tree, &found[0]), "$a !== null");

    let (found, _) = check("if ($x) {} elseif (isset($b['k']) && null != $b['k']) {}");
    assert_eq!(messages(&found), vec![NULL_COMPARISON]);

    let options = Options { report_isset_null_comparison: false, ..Options::default() };
    let (found, _) = check_with("if (isset($a) && $a !== null) {}", &options);
    assert!(found.is_empty());
}

#[test]
fn test_isset_null_comparison_in_elseif_branch() {
    let (found, tree) = check("if ($a) {} elseif (isset($b) && $b !== null) {}");
    assert_eq!(messages(&found), vec![NULL_COMPARISON]);
    assert_eq!(anchor_text(&tree, &found[0]), "$b !== null");
    let clause = tree.ancestors(found[0].anchor.id).find(|a| tree.kind(*a) == ELSE_IF_CLAUSE);
    assert!(clause.is_some());
}

#[test]
fn test_literal_operators() {
    let (found, tree) = check("if ($a and $b) {}\nif ($c or $d) {}");
    assert_eq!(messages(&found), vec![USE_AND, USE_OR]);
    assert_eq!(anchor_text(&tree, &found[0]), "and");
    assert_eq!(tree.kind(found[1].anchor.id), OR_KW);
    assert_eq!((found[0].location.line, found[0].location.column), (2, 8));

    let options = Options { report_literal_operators: false, ..Options::default() };
    let (found, _) = check_with("if ($a and $b) {}", &options);
    assert!(found.is_empty());
}

#[test]
fn test_bare_variables_repeat_legitimately() {
    let (found, _) = check("if ($a && $b) {} elseif ($a && $c) {}");
    assert!(found.is_empty(), "{found:#?}");
    let (found, _) = check("if (!$a) {} elseif ($a === false) {} elseif ($this->ready) {} elseif ($this->ready) {}");
    assert!(found.is_empty(), "{found:#?}");
}

#[test]
fn test_duplicated_call_across_branches() {
    let (found, tree) = check("if (f($x) || g()) {} elseif (f($x)) {}");
    assert_eq!(messages(&found), vec![DUPLICATE_CONDITION]);
    assert_eq!(found[0].severity, Severity::Warning);
    assert_eq!(anchor_text(&tree, &found[0]), "f($x)");
    assert_eq!(tree.kind(tree.parent(found[0].anchor.id).unwrap()), ELSE_IF_CLAUSE);
}

#[test]
fn test_duplicate_of_enclosing_condition() {
    let (found, tree) = check("if (f($x)) {\n    if (g() && f($x)) {}\n}");
    assert_eq!(messages(&found), vec![DUPLICATE_CONDITION]);
    assert_eq!(found[0].location.line, 3);
    assert_eq!(anchor_text(&tree, &found[0]), "f($x)");

    let (found, _) = check("if (f($x)) {\n    $g = function () use ($x) {\n        if (f($x)) {}\n    };\n}");
    assert!(found.is_empty(), "{found:#?}");

    let options = Options { report_duplicate_conditions: false, ..Options::default() };
    let (found, _) = check_with("if (f($x) || g()) {} elseif (f($x)) {}", &options);
    assert!(found.is_empty());
}
