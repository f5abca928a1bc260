// Copyright (C) Brian G. Milnes 2025

//! Tests for class hierarchy lookups

mod common;
use common::parse;

use phpinspect::hierarchy::hierarchy::normalize_class_name;
use phpinspect::{ClassHierarchy, MemoHierarchy, NoHierarchy, TreeHierarchy};
use std::cell::Cell;
use std::collections::HashSet;

const SOURCE: &str = r#"<?php
namespace App\Model;

use Vendor\Lib\Thing as T;
use Vendor\Lib\Other;

interface Shape extends \Countable {}
class Base implements Shape {}
class Child extends Base {}
class Leaf extends Child implements \JsonSerializable {}
class Loop extends Loop {}
"#;

fn hierarchy() -> TreeHierarchy {
    TreeHierarchy::from_tree(&parse(SOURCE))
}

#[test]
fn test_normalize_class_name() {
    assert_eq!(normalize_class_name("\\App\\Model\\Child "), "app\\model\\child");
}

#[test]
fn test_resolve_declared_and_imported_names() {
    let h = hierarchy();
    assert_eq!(h.resolve("Child").as_deref(), Some("app\\model\\child"));
    assert_eq!(h.resolve("T").as_deref(), Some("vendor\\lib\\thing"));
    assert_eq!(h.resolve("Other\\Sub").as_deref(), Some("vendor\\lib\\other\\sub"));
    assert_eq!(h.resolve("\\Exception").as_deref(), Some("exception"));
    assert_eq!(h.resolve("Exception").as_deref(), Some("exception"));
    assert_eq!(h.resolve("Unknown").as_deref(), Some("app\\model\\unknown"));
    assert_eq!(h.resolve("  "), None);
}

#[test]
fn test_ancestor_closure() {
    let h = hierarchy();
    let ancestors = h.ancestors("app\\model\\leaf").unwrap();
    let expected: HashSet<String> = ["app\\model\\child", "app\\model\\base", "app\\model\\shape", "countable", "jsonserializable"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(ancestors, expected);
    assert!(h.ancestors("app\\model\\shape").unwrap().contains("countable"));
}

#[test]
fn test_builtin_types() {
    let h = hierarchy();
    let ancestors = h.ancestors("InvalidArgumentException").unwrap();
    assert!(ancestors.contains("logicexception"));
    assert!(ancestors.contains("exception"));
    assert!(ancestors.contains("throwable"));
    assert!(h.ancestors("countable").unwrap().is_empty());
}

#[test]
fn test_unknown_and_cyclic_classes() {
    let h = hierarchy();
    assert_eq!(h.ancestors("app\\model\\missing"), None);
    assert!(h.ancestors("app\\model\\loop").unwrap().is_empty());
}

#[test]
fn test_no_hierarchy_resolves_nothing() {
    assert_eq!(NoHierarchy.resolve("Foo"), None);
    assert_eq!(NoHierarchy.ancestors("foo"), None);
}

struct Counting {
    inner: TreeHierarchy,
    calls: Cell<usize>,
}

impl ClassHierarchy for Counting {
    fn resolve(&self, name: &str) -> Option<String> {
        self.inner.resolve(name)
    }

    fn ancestors(&self, class: &str) -> Option<HashSet<String>> {
        self.calls.set(self.calls.get() + 1);
        self.inner.ancestors(class)
    }
}

#[test]
fn test_memo_hierarchy_caches_per_pass() {
    let counting = Counting { inner: hierarchy(), calls: Cell::new(0) };
    let memo = MemoHierarchy::new(&counting);
    let first = memo.ancestors("App\\Model\\Leaf");
    let second = memo.ancestors("app\\model\\leaf");
    assert_eq!(first, second);
    assert_eq!(memo.ancestors("app\\model\\missing"), None);
    assert_eq!(memo.ancestors("app\\model\\missing"), None);
    assert_eq!(counting.calls.get(), 2);
    assert_eq!(memo.resolve("Child").as_deref(), Some("app\\model\\child"));
}
