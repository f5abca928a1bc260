// Copyright (C) Brian G. Milnes 2025

//! Structural equivalence of expressions
//!
//! Two subtrees are equivalent when they denote the same computation up to
//! formatting: trivia is ignored, parentheses are transparent, literals are
//! compared by value, arrays by their elements whichever syntax spells them,
//! and names the way PHP resolves them.
//!
//! The relation is reflexive and symmetric. It is not guaranteed to be
//! transitive: `0x10` and `16` are equivalent integers, but a string and an
//! integer are never equivalent even when PHP would coerce one to the other.

pub mod equivalence {
    use crate::ast_utils::ast_utils::{array_elements, operator_kind, unparenthesized, unquote};
    use crate::syntax_kind::syntax_kind::SyntaxKind::{self, *};
    use crate::tree::tree::{NodeId, Tree};

    /// Equivalence of two nodes of the same tree.
    pub fn are_equivalent(tree: &Tree, a: NodeId, b: NodeId) -> bool {
        are_equivalent_across(tree, a, tree, b)
    }

    /// Equivalence of nodes living in two different trees.
    pub fn are_equivalent_across(ta: &Tree, a: NodeId, tb: &Tree, b: NodeId) -> bool {
        let a = unparenthesized(ta, a);
        let b = unparenthesized(tb, b);
        let kind = ta.kind(a);
        if kind != tb.kind(b) {
            return false;
        }
        if ta.is_token(a) || tb.is_token(b) {
            return ta.is_token(a) && tb.is_token(b) && tokens_equivalent(ta, a, tb, b);
        }
        match kind {
            LITERAL => literals_equivalent(ta, a, tb, b),
            NAME_REF => names_equivalent(ta, a, tb, b),
            ARRAY_EXPR => arrays_equivalent(ta, a, tb, b),
            BINARY_EXPR | UNARY_EXPR | POSTFIX_EXPR | ASSIGN_EXPR => {
                operator_kind(ta, a) == operator_kind(tb, b) && children_equivalent(ta, a, tb, b)
            }
            _ => children_equivalent(ta, a, tb, b),
        }
    }

    fn children_equivalent(ta: &Tree, a: NodeId, tb: &Tree, b: NodeId) -> bool {
        let left: Vec<NodeId> = ta.non_trivia_children(a).collect();
        let right: Vec<NodeId> = tb.non_trivia_children(b).collect();
        left.len() == right.len()
            && left.iter().zip(&right).all(|(x, y)| are_equivalent_across(ta, *x, tb, *y))
    }

    /// `array(...)` and `[...]` compare by their elements; a trailing comma
    /// does not count.
    fn arrays_equivalent(ta: &Tree, a: NodeId, tb: &Tree, b: NodeId) -> bool {
        let left = array_elements(ta, a);
        let right = array_elements(tb, b);
        left.len() == right.len()
            && left.iter().zip(&right).all(|(x, y)| children_equivalent(ta, *x, tb, *y))
    }

    fn tokens_equivalent(ta: &Tree, a: NodeId, tb: &Tree, b: NodeId) -> bool {
        let kind = ta.kind(a);
        let (Some(x), Some(y)) = (ta.token_text(a), tb.token_text(b)) else {
            return false;
        };
        match kind {
            STRING => unquote(x) == unquote(y),
            INT_NUMBER => match (int_value(x), int_value(y)) {
                (Some(i), Some(j)) => i == j,
                _ => x == y,
            },
            FLOAT_NUMBER => match (x.replace('_', "").parse::<f64>(), y.replace('_', "").parse::<f64>()) {
                (Ok(i), Ok(j)) => i == j,
                _ => x == y,
            },
            // keywords and operators are identified by kind (`<>` is `!=`)
            k if k.is_keyword() || is_operator_or_punct(k) => true,
            _ => x == y,
        }
    }

    fn is_operator_or_punct(kind: SyntaxKind) -> bool {
        (kind as u16) >= (L_PAREN as u16) && (kind as u16) <= (MINUS2 as u16)
    }

    fn literals_equivalent(ta: &Tree, a: NodeId, tb: &Tree, b: NodeId) -> bool {
        match (ta.non_trivia_children(a).next(), tb.non_trivia_children(b).next()) {
            (Some(x), Some(y)) => ta.kind(x) == tb.kind(y) && tokens_equivalent(ta, x, tb, y),
            _ => false,
        }
    }

    /// Function, method and class names are case-insensitive in PHP;
    /// properties and constants are not.
    fn names_equivalent(ta: &Tree, a: NodeId, tb: &Tree, b: NodeId) -> bool {
        let x = ta.text_of(a);
        let y = tb.text_of(b);
        let x = x.trim().trim_start_matches('\\');
        let y = y.trim().trim_start_matches('\\');
        if name_is_case_insensitive(ta, a) && name_is_case_insensitive(tb, b) {
            x.eq_ignore_ascii_case(y)
        } else {
            x == y
        }
    }

    fn name_is_case_insensitive(tree: &Tree, name: NodeId) -> bool {
        let Some(parent) = tree.parent(name) else { return false };
        let first_node = tree.child_nodes(parent).next() == Some(name);
        match tree.kind(parent) {
            CALL_EXPR | NEW_EXPR | METHOD_CALL_EXPR => true,
            STATIC_CALL_EXPR => true,
            CLASS_CONST_FETCH | STATIC_PROPERTY_FETCH => first_node,
            BINARY_EXPR => operator_kind(tree, parent) == Some(INSTANCEOF_KW) && !first_node,
            _ => false,
        }
    }

    /// Numeric value of a PHP integer literal: decimal, `0x`, `0b`, `0o`
    /// or leading-zero octal, `_` separators allowed.
    pub fn int_value(text: &str) -> Option<i128> {
        let clean: String = text.chars().filter(|c| *c != '_').collect();
        let lower = clean.to_ascii_lowercase();
        if let Some(hex) = lower.strip_prefix("0x") {
            i128::from_str_radix(hex, 16).ok()
        } else if let Some(bin) = lower.strip_prefix("0b") {
            i128::from_str_radix(bin, 2).ok()
        } else if let Some(oct) = lower.strip_prefix("0o") {
            i128::from_str_radix(oct, 8).ok()
        } else if lower.len() > 1 && lower.starts_with('0') {
            i128::from_str_radix(&lower[1..], 8).ok()
        } else {
            lower.parse().ok()
        }
    }
}
