// Copyright (C) Brian G. Milnes 2025

//! Analyzer module for identifying issues in PHP code
//!
//! The `Analyzer` owns the rule set for one run. Scanning a tree walks it
//! depth first and hands every composite node to the rules interested in
//! its kind; matches come out in walk order, and within one node in rule
//! order.

pub mod analyzer {
    use std::collections::{HashSet, VecDeque};
    use crate::cost::cost::{CouplingCheck, SharedVariableCoupling};
    use crate::diagnostics::diagnostics::{Match, Reporter};
    use crate::hierarchy::hierarchy::{ClassHierarchy, MemoHierarchy, TreeHierarchy};
    use crate::options::options::Options;
    use crate::rules::{default_rules, Rule, RuleContext};
    use crate::tree::tree::{NodeId, Preorder, Tree};
    use crate::visitor::visitor::Dispatch;

    pub struct Analyzer {
        rules: Vec<Box<dyn Rule>>,
        options: Options,
        cheap: HashSet<String>,
        dispatch: Dispatch,
        coupling: Box<dyn CouplingCheck + Send + Sync>,
    }

    impl Analyzer {
        /// The shipped rules, minus those disabled in `options`.
        pub fn new(options: Options) -> Self {
            Self::with_rules(options, default_rules())
        }

        pub fn with_rules(options: Options, rules: Vec<Box<dyn Rule>>) -> Self {
            let rules: Vec<Box<dyn Rule>> = rules.into_iter().filter(|r| options.is_rule_enabled(r.id())).collect();
            let dispatch = Dispatch::new(&rules);
            let cheap = options.cheap_function_set();
            Analyzer { rules, options, cheap, dispatch, coupling: Box::new(SharedVariableCoupling) }
        }

        /// Replace the coupling predicate used by condition ordering.
        pub fn with_coupling(mut self, coupling: impl CouplingCheck + Send + Sync + 'static) -> Self {
            self.coupling = Box::new(coupling);
            self
        }

        pub fn options(&self) -> &Options {
            &self.options
        }

        pub fn rule_ids(&self) -> Vec<&'static str> {
            self.rules.iter().map(|r| r.id()).collect()
        }

        /// Run the interested rules on a single node.
        pub fn visit_node(&self, tree: &Tree, hierarchy: &dyn ClassHierarchy, node: NodeId, sink: &mut dyn Reporter) {
            let ctx = RuleContext {
                tree,
                options: &self.options,
                hierarchy,
                coupling: self.coupling.as_ref(),
                cheap_functions: &self.cheap,
            };
            for &index in self.dispatch.rules_for(tree.kind(node)) {
                self.rules[index].check(&ctx, node, sink);
            }
        }

        /// Lazily produce the matches of the whole tree.
        pub fn scan<'a>(&'a self, tree: &'a Tree, hierarchy: &'a dyn ClassHierarchy) -> Scan<'a> {
            Scan {
                analyzer: self,
                tree,
                hierarchy: MemoHierarchy::new(hierarchy),
                nodes: tree.preorder(tree.root()),
                pending: VecDeque::new(),
            }
        }
    }

    /// Iterator over the matches of one tree. Nodes are visited on demand.
    pub struct Scan<'a> {
        analyzer: &'a Analyzer,
        tree: &'a Tree,
        hierarchy: MemoHierarchy<'a>,
        nodes: Preorder<'a>,
        pending: VecDeque<Match>,
    }

    impl Iterator for Scan<'_> {
        type Item = Match;

        fn next(&mut self) -> Option<Match> {
            loop {
                if let Some(found) = self.pending.pop_front() {
                    return Some(found);
                }
                let node = self.nodes.next()?;
                if self.tree.is_token(node) {
                    continue;
                }
                self.analyzer.visit_node(self.tree, &self.hierarchy, node, &mut self.pending);
            }
        }
    }

    /// Analyze a parsed PHP tree with the shipped rules and return every match
    pub fn analyze(tree: &Tree, options: &Options) -> Vec<Match> {
        let analyzer = Analyzer::new(options.clone());
        let hierarchy = TreeHierarchy::from_tree(tree);
        analyzer.scan(tree, &hierarchy).collect()
    }
}
