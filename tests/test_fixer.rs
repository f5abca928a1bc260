// Copyright (C) Brian G. Milnes 2025

//! Tests for fixer module

mod common;
use common::{first, nth, parse, php};

use phpinspect::fixer::fixer::MAX_FIX_ROUNDS;
use phpinspect::SyntaxKind::*;
use phpinspect::{
    analyze, apply_all, apply_fix, apply_plan, fix_all, parse_file, Document, Edit, EditError, EditPlan, Fix,
    FragmentKind, Options,
};
use std::thread;

/// The second statement cascades into the first, whose search array also
/// simplifies: two fixes touching the same call.
const OVERLAPPING: &str = "$x = str_replace(['a', 'a'], 'b', $s);\n$x = str_replace('c', 'd', $x);";

fn fixes_of(source: &str) -> Vec<Fix> {
    let tree = parse(source);
    analyze(&tree, &Options::default()).into_iter().filter_map(|m| m.fix).collect()
}

#[test]
fn test_fix_preserves_code() {
    let source = php("$x = str_replace('a', 'b', $s);\n$x = str_replace('c', 'd', $x);");
    let mut tree = parse(&source);
    let fixes = fixes_of(&source);
    assert_eq!(fixes.len(), 1);
    let applied = apply_fix(&mut tree, &fixes[0]).unwrap();
    assert_eq!(applied.name, "Merge str_replace(...) calls");
    assert_eq!(applied.edits, 3);
    assert!(parse_file(&tree.text()).is_ok());
}

#[test]
fn test_overlapping_fix_is_invalidated() {
    let source = php(OVERLAPPING);
    let mut tree = parse(&source);
    let fixes = fixes_of(&source);
    assert_eq!(fixes.iter().map(Fix::name).collect::<Vec<_>>(), vec!["Simplify this argument", "Merge str_replace(...) calls"]);

    apply_fix(&mut tree, &fixes[0]).unwrap();
    let after_first = tree.text();
    assert_eq!(after_first, php("$x = str_replace('a', 'b', $s);\n$x = str_replace('c', 'd', $x);"));

    let err = apply_fix(&mut tree, &fixes[1]).unwrap_err();
    assert!(matches!(err, EditError::Invalidated { .. }), "{err}");
    assert!(matches!(fixes[1].plan(&tree), Err(EditError::Invalidated { .. })));
    assert_eq!(tree.text(), after_first);
}

#[test]
fn test_apply_all_reports_each_fix() {
    let source = php(OVERLAPPING);
    let mut tree = parse(&source);
    let results = apply_all(&mut tree, &fixes_of(&source));
    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(EditError::Invalidated { .. })));
}

#[test]
fn test_plan_is_all_or_nothing() {
    let mut tree = parse(&php("$a = 1;\n$b = 2;"));
    let before = tree.text();
    let statement = first(&tree, EXPR_STMT);
    let plan = EditPlan {
        name: "remove twice",
        edits: vec![Edit::Delete { target: statement }, Edit::Delete { target: statement }],
    };
    assert!(matches!(apply_plan(&mut tree, &plan), Err(EditError::Invalidated { .. })));
    assert_eq!(tree.text(), before);
    assert!(tree.is_attached(statement));

    let literal = first(&tree, LITERAL);
    let plan = EditPlan {
        name: "broken text",
        edits: vec![
            Edit::Delete { target: nth(&tree, EXPR_STMT, 1) },
            Edit::Replace { target: literal, kind: FragmentKind::Expression, text: "1 +".to_string() },
        ],
    };
    assert!(matches!(apply_plan(&mut tree, &plan), Err(EditError::Parse(_))));
    assert_eq!(tree.text(), before);
}

#[test]
fn test_insert_sibling() {
    let mut tree = parse(&php("$a = 1;"));
    let anchor = first(&tree, EXPR_STMT);
    let after = EditPlan {
        name: "append",
        edits: vec![Edit::InsertSibling { anchor, after: true, kind: FragmentKind::Statement, text: "$b = 2;".to_string() }],
    };
    let applied = apply_plan(&mut tree, &after).unwrap();
    assert_eq!(applied.edits, 1);
    assert_eq!(tree.text(), "<?php\n$a = 1;$b = 2;\n");

    let before = EditPlan {
        name: "prepend",
        edits: vec![Edit::InsertSibling { anchor, after: false, kind: FragmentKind::Statement, text: "$z = 0;".to_string() }],
    };
    apply_plan(&mut tree, &before).unwrap();
    assert_eq!(tree.text(), "<?php\n$z = 0;$a = 1;$b = 2;\n");
    assert!(tree.check_integrity().is_ok());
    assert_eq!(tree.kind(nth(&tree, EXPR_STMT, 2)), EXPR_STMT);
}

#[test]
fn test_simplify_plan_rejects_other_nodes() {
    let tree = parse(&php("$y = str_replace('a', $r, $s);"));
    let literal = first(&tree, LITERAL);
    let fix = Fix::SimplifySearchArgument { array: tree.handle(literal), replacement: "'a'".to_string() };
    assert!(matches!(fix.plan(&tree), Err(EditError::Malformed { .. })));
}

#[test]
fn test_fix_all_runs_until_clean() {
    let mut tree = parse(&php(OVERLAPPING));
    let applied = fix_all(&mut tree, &Options::default());
    let names: Vec<_> = applied.iter().map(|a| a.name).collect();
    assert_eq!(names, vec!["Simplify this argument", "Merge str_replace(...) calls"]);
    assert!(applied.len() <= MAX_FIX_ROUNDS * 2);
    assert_eq!(tree.text(), php("$x = str_replace(array('a', 'c'), array('b', 'd'), $s);"));

    assert!(fix_all(&mut tree, &Options::default()).is_empty());
    assert!(analyze(&tree, &Options::default()).iter().all(|m| m.fix.is_none()));
}

#[test]
fn test_fix_all_without_fixable_matches() {
    let source = php("foreach ($xs as $x) { $acc = array_merge($acc, $x); }");
    let mut tree = parse(&source);
    assert!(fix_all(&mut tree, &Options::default()).is_empty());
    assert_eq!(tree.text(), source);
}

#[test]
fn test_document_serializes_writers() {
    let source = php(OVERLAPPING);
    let fixes = fixes_of(&source);
    let document = Document::new(parse(&source));

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let tree = document.read().unwrap();
                assert!(tree.check_integrity().is_ok());
                assert!(tree.text().starts_with("<?php\n$x = str_replace("));
            });
        }
        scope.spawn(|| {
            document.apply_fix(&fixes[0]).unwrap();
        });
    });

    let results = document.apply_all(&fixes[1..]).unwrap();
    assert!(matches!(results[0], Err(EditError::Invalidated { .. })));
    assert_eq!(document.text().unwrap(), php("$x = str_replace('a', 'b', $s);\n$x = str_replace('c', 'd', $x);"));

    let tree = document.into_inner().unwrap();
    assert!(tree.check_integrity().is_ok());
}
