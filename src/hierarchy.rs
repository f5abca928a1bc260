// Copyright (C) Brian G. Milnes 2025

//! Class and interface inheritance lookup
//!
//! Class names are compared in normalized form: fully qualified, without a
//! leading `\`, lowercase.

pub mod hierarchy {
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet, VecDeque};
    use crate::ast_utils::ast_utils::{decl_name, extends_names, find_nodes, first_child_of_kind, implements_names};
    use crate::syntax_kind::syntax_kind::SyntaxKind::*;
    use crate::tree::tree::{NodeId, Tree};

    pub fn normalize_class_name(name: &str) -> String {
        name.trim().trim_start_matches('\\').to_ascii_lowercase()
    }

    pub trait ClassHierarchy {
        /// Resolve a class reference as written in source to its normalized
        /// fully qualified name.
        fn resolve(&self, name: &str) -> Option<String> {
            Some(normalize_class_name(name))
        }

        /// Every ancestor class and interface of `class`, itself excluded.
        /// `None` when the class is unknown.
        fn ancestors(&self, class: &str) -> Option<HashSet<String>>;
    }

    /// A hierarchy that knows nothing; every lookup is unresolvable.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct NoHierarchy;

    impl ClassHierarchy for NoHierarchy {
        fn resolve(&self, _name: &str) -> Option<String> {
            None
        }

        fn ancestors(&self, _class: &str) -> Option<HashSet<String>> {
            None
        }
    }

    const BUILTIN_PARENTS: &[(&str, &[&str])] = &[
        ("traversable", &[]),
        ("iterator", &["traversable"]),
        ("iteratoraggregate", &["traversable"]),
        ("seekableiterator", &["iterator"]),
        ("outeriterator", &["iterator"]),
        ("recursiveiterator", &["iterator"]),
        ("arrayaccess", &[]),
        ("countable", &[]),
        ("serializable", &[]),
        ("stringable", &[]),
        ("jsonserializable", &[]),
        ("unitenum", &[]),
        ("backedenum", &["unitenum"]),
        ("throwable", &["stringable"]),
        ("exception", &["throwable"]),
        ("error", &["throwable"]),
        ("errorexception", &["exception"]),
        ("logicexception", &["exception"]),
        ("badfunctioncallexception", &["logicexception"]),
        ("badmethodcallexception", &["badfunctioncallexception"]),
        ("domainexception", &["logicexception"]),
        ("invalidargumentexception", &["logicexception"]),
        ("lengthexception", &["logicexception"]),
        ("outofrangeexception", &["logicexception"]),
        ("runtimeexception", &["exception"]),
        ("outofboundsexception", &["runtimeexception"]),
        ("overflowexception", &["runtimeexception"]),
        ("rangeexception", &["runtimeexception"]),
        ("underflowexception", &["runtimeexception"]),
        ("unexpectedvalueexception", &["runtimeexception"]),
        ("jsonexception", &["exception"]),
        ("typeerror", &["error"]),
        ("argumentcounterror", &["typeerror"]),
        ("arithmeticerror", &["error"]),
        ("divisionbyzeroerror", &["arithmeticerror"]),
        ("valueerror", &["error"]),
        ("datetimeinterface", &[]),
        ("datetime", &["datetimeinterface"]),
        ("datetimeimmutable", &["datetimeinterface"]),
        ("arrayiterator", &["seekableiterator", "arrayaccess", "serializable", "countable"]),
        ("arrayobject", &["iteratoraggregate", "arrayaccess", "serializable", "countable"]),
        ("generator", &["iterator"]),
        ("splobjectstorage", &["countable", "iterator", "serializable", "arrayaccess"]),
        ("closure", &[]),
        ("stdclass", &[]),
    ];

    /// Hierarchy of the classes and interfaces declared in one tree, merged
    /// with the built-in PHP types.
    #[derive(Debug, Clone, Default)]
    pub struct TreeHierarchy {
        parents: HashMap<String, Vec<String>>,
        imports: HashMap<String, String>,
        namespace: String,
        short_names: HashMap<String, Vec<String>>,
    }

    impl TreeHierarchy {
        pub fn from_tree(tree: &Tree) -> Self {
            let mut hierarchy = TreeHierarchy::default();
            for (name, parents) in BUILTIN_PARENTS {
                hierarchy.parents.insert(name.to_string(), parents.iter().map(|p| p.to_string()).collect());
            }

            if let Some(ns) = find_nodes(tree, tree.root(), NAMESPACE_DECL).first() {
                if let Some(name) = first_child_of_kind(tree, *ns, NAME) {
                    hierarchy.namespace = normalize_class_name(&tree.text_of(name));
                }
            }

            for item in find_nodes(tree, tree.root(), USE_ITEM) {
                let Some(target) = first_child_of_kind(tree, item, NAME_REF) else { continue };
                let target = normalize_class_name(&tree.text_of(target));
                let alias = match first_child_of_kind(tree, item, NAME) {
                    Some(alias) => normalize_class_name(&tree.text_of(alias)),
                    None => target.rsplit('\\').next().unwrap_or(&target).to_string(),
                };
                hierarchy.imports.insert(alias, target);
            }

            let mut declared: Vec<(String, Vec<String>)> = Vec::new();
            for decl in tree.descendants(tree.root()) {
                if !tree.kind(decl).is_class_like() {
                    continue;
                }
                let Some(name) = decl_name(tree, decl) else { continue };
                let fqn = hierarchy.qualify(&normalize_class_name(&name));
                let parents: Vec<String> = extends_names(tree, decl)
                    .into_iter()
                    .chain(implements_names(tree, decl))
                    .collect();
                declared.push((fqn, parents));
            }
            for (fqn, _) in &declared {
                let short = fqn.rsplit('\\').next().unwrap_or(fqn).to_string();
                hierarchy.short_names.entry(short).or_default().push(fqn.clone());
            }
            for (fqn, parents) in declared {
                let resolved = parents.iter().filter_map(|p| hierarchy.resolve(p)).collect();
                hierarchy.parents.insert(fqn, resolved);
            }
            hierarchy
        }

        fn qualify(&self, name: &str) -> String {
            if self.namespace.is_empty() {
                name.to_string()
            } else {
                format!("{}\\{}", self.namespace, name)
            }
        }
    }

    impl ClassHierarchy for TreeHierarchy {
        fn resolve(&self, name: &str) -> Option<String> {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return None;
            }
            if trimmed.starts_with('\\') {
                return Some(normalize_class_name(trimmed));
            }
            let normalized = normalize_class_name(trimmed);
            let (head, tail) = match normalized.split_once('\\') {
                Some((head, tail)) => (head.to_string(), Some(tail.to_string())),
                None => (normalized.clone(), None),
            };
            if let Some(target) = self.imports.get(&head) {
                return Some(match tail {
                    Some(tail) => format!("{target}\\{tail}"),
                    None => target.clone(),
                });
            }
            let qualified = self.qualify(&normalized);
            if self.parents.contains_key(&qualified) {
                return Some(qualified);
            }
            if self.parents.contains_key(&normalized) {
                return Some(normalized);
            }
            match self.short_names.get(&normalized).map(Vec::as_slice) {
                Some([only]) => Some(only.clone()),
                _ => Some(qualified),
            }
        }

        fn ancestors(&self, class: &str) -> Option<HashSet<String>> {
            let class = normalize_class_name(class);
            let direct = self.parents.get(&class)?;
            let mut seen = HashSet::new();
            let mut queue: VecDeque<String> = direct.iter().cloned().collect();
            while let Some(next) = queue.pop_front() {
                if next == class || !seen.insert(next.clone()) {
                    continue;
                }
                if let Some(grand) = self.parents.get(&next) {
                    queue.extend(grand.iter().cloned());
                }
            }
            Some(seen)
        }
    }

    /// Memoizes inheritance closures for the duration of one pass.
    pub struct MemoHierarchy<'h> {
        inner: &'h dyn ClassHierarchy,
        cache: RefCell<HashMap<String, Option<HashSet<String>>>>,
    }

    impl<'h> MemoHierarchy<'h> {
        pub fn new(inner: &'h dyn ClassHierarchy) -> Self {
            MemoHierarchy { inner, cache: RefCell::new(HashMap::new()) }
        }
    }

    impl ClassHierarchy for MemoHierarchy<'_> {
        fn resolve(&self, name: &str) -> Option<String> {
            self.inner.resolve(name)
        }

        fn ancestors(&self, class: &str) -> Option<HashSet<String>> {
            let key = normalize_class_name(class);
            if let Some(hit) = self.cache.borrow().get(&key) {
                return hit.clone();
            }
            let computed = self.inner.ancestors(&key);
            self.cache.borrow_mut().insert(key, computed.clone());
            computed
        }
    }
}
