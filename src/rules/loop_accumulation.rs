// Copyright (C) Brian G. Milnes 2025

//! Rule: array merging inside loops
//!
//! `$acc = array_merge($acc, $chunk)` in a loop copies the accumulator on
//! every iteration. Collecting the chunks and merging once is linear.

pub mod loop_accumulation {
    use crate::ast_utils::ast_utils::{arguments, assignment_target, callee_name, is_call_to, statements};
    use crate::diagnostics::diagnostics::{Match, Reporter, Severity};
    use crate::equivalence::equivalence::are_equivalent;
    use crate::rules::{Rule, RuleContext};
    use crate::syntax_kind::syntax_kind::SyntaxKind::{self, *};
    use crate::tree::tree::{NodeId, Tree};

    pub const RULE_ID: &str = "slow-array-operations-in-loop";

    const GREEDY_FUNCTIONS: &[&str] = &["array_merge", "array_merge_recursive", "array_replace", "array_replace_recursive"];

    #[derive(Debug, Default, Clone, Copy)]
    pub struct SlowArrayOperationsInLoop;

    impl Rule for SlowArrayOperationsInLoop {
        fn id(&self) -> &'static str {
            RULE_ID
        }

        fn interests(&self) -> &'static [SyntaxKind] {
            &[CALL_EXPR]
        }

        fn check(&self, ctx: &RuleContext<'_>, call: NodeId, sink: &mut dyn Reporter) {
            let tree = ctx.tree;
            if !is_call_to(tree, call, GREEDY_FUNCTIONS) {
                return;
            }
            let Some(parent) = tree.parent(call) else { return };
            let context = if tree.kind(parent) == ARG_LIST {
                match tree.parent(parent) {
                    Some(grand) => grand,
                    None => return,
                }
            } else {
                parent
            };
            if !is_target_context(tree, context) || !is_inside_loop(tree, context) {
                return;
            }
            // a method argument has no destination to compare against
            if tree.kind(context) != ASSIGN_EXPR || !is_self_accumulation(tree, context, call) {
                return;
            }
            let name = callee_name(tree, call).unwrap_or_default();
            sink.report(Match::new(
                tree,
                RULE_ID,
                call,
                format!("'{name}(...)' is used in a loop and is a resources greedy construction."),
                Severity::Warning,
            ));
        }
    }

    /// An assignment or method call forming a whole statement of a block
    /// that does not end in `break` or `return`.
    fn is_target_context(tree: &Tree, context: NodeId) -> bool {
        if !matches!(tree.kind(context), ASSIGN_EXPR | METHOD_CALL_EXPR) {
            return false;
        }
        let Some(statement) = tree.parent(context).filter(|s| tree.kind(*s) == EXPR_STMT) else {
            return false;
        };
        let Some(block) = tree.parent(statement).filter(|b| tree.kind(*b) == BLOCK) else {
            return false;
        };
        match statements(tree, block).last() {
            Some(last) => !matches!(tree.kind(*last), BREAK_STMT | RETURN_STMT),
            None => true,
        }
    }

    fn is_inside_loop(tree: &Tree, node: NodeId) -> bool {
        tree.ancestors(node)
            .take_while(|a| !tree.kind(*a).is_function_like() && tree.kind(*a) != SOURCE_FILE)
            .any(|a| tree.kind(a).is_loop())
    }

    fn is_self_accumulation(tree: &Tree, assignment: NodeId, call: NodeId) -> bool {
        let Some(target) = assignment_target(tree, assignment) else { return false };
        arguments(tree, call).into_iter().any(|arg| are_equivalent(tree, target, arg))
    }
}
