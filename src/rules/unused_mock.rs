// Copyright (C) Brian G. Milnes 2025

//! Rule: PHPUnit mocks that are created but never used

pub mod unused_mock {
    use std::sync::OnceLock;
    use regex::Regex;
    use crate::ast_utils::ast_utils::{
        assignment_target, callee_name, decl_name, enclosing_class, enclosing_function, extends_names,
        function_body, has_parent_of_kind, receiver, variable_name, variable_references,
    };
    use crate::diagnostics::diagnostics::{Match, Reporter, Severity};
    use crate::rules::{Rule, RuleContext};
    use crate::syntax_kind::syntax_kind::SyntaxKind::{self, *};
    use crate::tree::tree::{NodeId, Tree};

    pub const RULE_ID: &str = "unused-mock";

    const MESSAGE: &str = "The mock seems to be not used, consider deleting it.";

    const MOCK_FACTORIES: &[&str] = &["createMock", "getMock"];

    struct TestNames {
        class: Regex,
        parent: Regex,
        method: Regex,
    }

    fn test_names() -> &'static TestNames {
        static NAMES: OnceLock<TestNames> = OnceLock::new();
        NAMES.get_or_init(|| TestNames {
            class: Regex::new(r"Test$").expect("constant pattern"),
            parent: Regex::new(r"TestCase$").expect("constant pattern"),
            method: Regex::new(r"^test").expect("constant pattern"),
        })
    }

    /// Inside a test class (`*Test`, or extending `*TestCase`) or a
    /// `test*` method.
    pub fn is_test_context(tree: &Tree, node: NodeId) -> bool {
        let names = test_names();
        if let Some(class) = enclosing_class(tree, node) {
            if decl_name(tree, class).is_some_and(|n| names.class.is_match(&n)) {
                return true;
            }
            if extends_names(tree, class).iter().any(|p| names.parent.is_match(p)) {
                return true;
            }
        }
        enclosing_function(tree, node)
            .filter(|f| tree.kind(*f) == METHOD_DECL)
            .and_then(|m| decl_name(tree, m))
            .is_some_and(|n| names.method.is_match(&n))
    }

    #[derive(Debug, Default, Clone, Copy)]
    pub struct UnusedMock;

    impl Rule for UnusedMock {
        fn id(&self) -> &'static str {
            RULE_ID
        }

        fn interests(&self) -> &'static [SyntaxKind] {
            &[METHOD_CALL_EXPR]
        }

        fn check(&self, ctx: &RuleContext<'_>, call: NodeId, sink: &mut dyn Reporter) {
            let tree = ctx.tree;
            let is_mocking = callee_name(tree, call).is_some_and(|n| MOCK_FACTORIES.contains(&n.as_str()));
            if !is_mocking || !is_test_context(tree, call) {
                return;
            }
            let Some(assignment) = tree.parent(call).filter(|p| tree.kind(*p) == ASSIGN_EXPR) else { return };
            if !has_parent_of_kind(tree, assignment, EXPR_STMT) {
                return;
            }
            let Some(container) = assignment_target(tree, assignment).filter(|t| tree.kind(*t) == VARIABLE) else {
                return;
            };
            let Some(body) = enclosing_function(tree, call).and_then(|f| function_body(tree, f)) else { return };
            if tree.kind(body) != BLOCK {
                return;
            }
            let Some(name) = variable_name(tree, container) else { return };

            let is_used = variable_references(tree, body, &name)
                .into_iter()
                .filter(|v| *v != container)
                .any(|v| is_real_use(tree, v));
            if !is_used {
                sink.report(Match::new(tree, RULE_ID, container, MESSAGE, Severity::Unused));
            }
        }
    }

    /// Every reference counts except being the receiver of `->expects(...)`.
    fn is_real_use(tree: &Tree, reference: NodeId) -> bool {
        match tree.parent(reference) {
            Some(call) if tree.kind(call) == METHOD_CALL_EXPR => {
                receiver(tree, call) != Some(reference) || callee_name(tree, call).as_deref() != Some("expects")
            }
            _ => true,
        }
    }
}
