// Copyright (C) Brian G. Milnes 2025

//! Visitor pattern implementation for traversing PHP trees

pub mod visitor {
    use std::collections::HashMap;
    use crate::analyzer::analyzer::Analyzer;
    use crate::diagnostics::diagnostics::Collector;
    use crate::hierarchy::hierarchy::{ClassHierarchy, MemoHierarchy};
    use crate::rules::Rule;
    use crate::syntax_kind::syntax_kind::SyntaxKind;
    use crate::tree::tree::{NodeId, Tree};

    /// Rule indices keyed by the node kinds they asked for.
    #[derive(Debug, Default, Clone)]
    pub struct Dispatch {
        by_kind: HashMap<SyntaxKind, Vec<usize>>,
    }

    impl Dispatch {
        pub fn new(rules: &[Box<dyn Rule>]) -> Self {
            let mut by_kind: HashMap<SyntaxKind, Vec<usize>> = HashMap::new();
            for (index, rule) in rules.iter().enumerate() {
                for kind in rule.interests() {
                    let slot = by_kind.entry(*kind).or_default();
                    if !slot.contains(&index) {
                        slot.push(index);
                    }
                }
            }
            Dispatch { by_kind }
        }

        pub fn rules_for(&self, kind: SyntaxKind) -> &[usize] {
            self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or(&[])
        }
    }

    /// Depth-first pre-order over the composite nodes under `root`
    pub fn walk<F>(tree: &Tree, root: NodeId, mut visit: F)
    where
        F: FnMut(NodeId),
    {
        for node in tree.preorder(root) {
            if !tree.is_token(node) {
                visit(node);
            }
        }
    }

    /// A visitor that collects matches while traversing the tree
    pub struct IssueVisitor<'a> {
        analyzer: &'a Analyzer,
        pub collector: Collector,
    }

    impl<'a> IssueVisitor<'a> {
        pub fn new(analyzer: &'a Analyzer) -> Self {
            IssueVisitor { analyzer, collector: Collector::new() }
        }

        /// Visit every node of the tree
        pub fn visit(&mut self, tree: &Tree, hierarchy: &dyn ClassHierarchy) {
            self.visit_subtree(tree, tree.root(), hierarchy);
        }

        pub fn visit_subtree(&mut self, tree: &Tree, root: NodeId, hierarchy: &dyn ClassHierarchy) {
            let memo = MemoHierarchy::new(hierarchy);
            let analyzer = self.analyzer;
            let collector = &mut self.collector;
            walk(tree, root, |node| analyzer.visit_node(tree, &memo, node, &mut *collector));
        }

        pub fn into_collector(self) -> Collector {
            self.collector
        }
    }
}
