// Copyright (C) Brian G. Milnes 2025

//! Expression cost estimation and condition coupling
//!
//! `cost` is a heuristic ordinal used only to compare neighbouring
//! conditions of a short-circuit chain. It is not a time estimate.

pub mod cost {
    use std::collections::HashSet;
    use crate::ast_utils::ast_utils::{arguments, callee_name, find_nodes, operand, receiver, variable_name};
    use crate::syntax_kind::syntax_kind::SyntaxKind::*;
    use crate::tree::tree::{NodeId, Tree};

    /// Functions cheap enough to be treated like a variable read.
    pub const DEFAULT_CHEAP_FUNCTIONS: &[&str] = &[
        "array_key_exists",
        "defined",
        "is_array",
        "is_string",
        "is_bool",
        "is_int",
        "is_float",
        "is_resource",
        "is_numeric",
        "is_scalar",
        "is_object",
    ];

    const CALL_COST: u32 = 5;
    const OPERATOR_COST: u32 = 1;
    const UNKNOWN_COST: u32 = 10;

    /// Cost rank of an expression. `cheap` holds lowercase function names.
    pub fn cost(tree: &Tree, expr: NodeId, cheap: &HashSet<String>) -> u32 {
        let sum_args = |node: NodeId| -> u32 { arguments(tree, node).into_iter().map(|a| cost(tree, a, cheap)).sum() };
        let sum_children = |node: NodeId| -> u32 { tree.child_nodes(node).map(|c| cost(tree, c, cheap)).sum() };

        match tree.kind(expr) {
            LITERAL | VARIABLE | NAME_REF | CLASS_CONST_FETCH | STATIC_PROPERTY_FETCH => 0,
            PROPERTY_FETCH => receiver(tree, expr).map(|r| cost(tree, r, cheap)).unwrap_or(0),
            ARRAY_ACCESS_EXPR => sum_children(expr),
            ISSET_EXPR | EMPTY_EXPR => sum_args(expr),
            CALL_EXPR => {
                let is_cheap = callee_name(tree, expr)
                    .map(|name| cheap.contains(&name.to_ascii_lowercase()))
                    .unwrap_or(false);
                let base = if is_cheap { 0 } else { CALL_COST };
                base + sum_args(expr)
            }
            METHOD_CALL_EXPR | STATIC_CALL_EXPR | NEW_EXPR => CALL_COST + sum_args(expr),
            UNARY_EXPR | PAREN_EXPR | CAST_EXPR | POSTFIX_EXPR => {
                operand(tree, expr).map(|o| cost(tree, o, cheap)).unwrap_or(0)
            }
            BINARY_EXPR | ASSIGN_EXPR | TERNARY_EXPR => sum_children(expr) + OPERATOR_COST,
            _ => UNKNOWN_COST,
        }
    }

    pub fn default_cheap_functions() -> HashSet<String> {
        DEFAULT_CHEAP_FUNCTIONS.iter().map(|s| s.to_string()).collect()
    }

    /// Decides whether `later` must stay after `earlier` in a condition
    /// chain even though it is cheaper.
    pub trait CouplingCheck {
        fn is_coupled(&self, tree: &Tree, earlier: NodeId, later: NodeId) -> bool;
    }

    /// Conservative default: terms are coupled when the earlier one writes
    /// anything, or when both read a common variable or property.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct SharedVariableCoupling;

    impl CouplingCheck for SharedVariableCoupling {
        fn is_coupled(&self, tree: &Tree, earlier: NodeId, later: NodeId) -> bool {
            if has_side_effect(tree, earlier) {
                return true;
            }
            let earlier_vars = read_variables(tree, earlier);
            if read_variables(tree, later).iter().any(|v| earlier_vars.contains(v)) {
                return true;
            }
            let earlier_props = property_fetches(tree, earlier);
            property_fetches(tree, later).iter().any(|p| earlier_props.contains(p))
        }
    }

    fn has_side_effect(tree: &Tree, node: NodeId) -> bool {
        tree.descendants(node).any(|n| match tree.kind(n) {
            ASSIGN_EXPR | POSTFIX_EXPR => true,
            UNARY_EXPR => tree
                .non_trivia_children(n)
                .next()
                .is_some_and(|op| matches!(tree.kind(op), PLUS2 | MINUS2)),
            _ => false,
        })
    }

    fn read_variables(tree: &Tree, node: NodeId) -> HashSet<String> {
        find_nodes(tree, node, VARIABLE)
            .into_iter()
            .filter_map(|v| variable_name(tree, v))
            .filter(|name| name != "this")
            .collect()
    }

    fn property_fetches(tree: &Tree, node: NodeId) -> HashSet<String> {
        find_nodes(tree, node, PROPERTY_FETCH)
            .into_iter()
            .map(|p| tree.text_of(p).split_whitespace().collect::<String>())
            .collect()
    }
}
