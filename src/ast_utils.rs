// Copyright (C) Brian G. Milnes 2025

//! Tree query utilities for analyzing PHP code
//!
//! Kind-specific accessors over the arena tree. Every accessor returns
//! `None` (or an empty list) when the node does not have the expected shape,
//! which rules treat as "does not apply".

pub mod ast_utils {
    use crate::syntax_kind::syntax_kind::SyntaxKind::{self, *};
    use crate::tree::tree::{NodeId, Tree};

    /// Find all nodes of a specific kind in the subtree
    pub fn find_nodes(tree: &Tree, root: NodeId, kind: SyntaxKind) -> Vec<NodeId> {
        tree.preorder(root).filter(|n| tree.kind(*n) == kind).collect()
    }

    /// Find all nodes matching a predicate
    pub fn find_nodes_where<F>(tree: &Tree, root: NodeId, predicate: F) -> Vec<NodeId>
    where
        F: Fn(NodeId) -> bool,
    {
        tree.preorder(root).filter(|n| predicate(*n)).collect()
    }

    pub fn children_of_kind(tree: &Tree, node: NodeId, kind: SyntaxKind) -> Vec<NodeId> {
        tree.children(node).iter().copied().filter(|c| tree.kind(*c) == kind).collect()
    }

    pub fn first_child_of_kind(tree: &Tree, node: NodeId, kind: SyntaxKind) -> Option<NodeId> {
        tree.children(node).iter().copied().find(|c| tree.kind(*c) == kind)
    }

    /// A direct token child of the given kind.
    pub fn token_of_kind(tree: &Tree, node: NodeId, kind: SyntaxKind) -> Option<NodeId> {
        tree.children(node).iter().copied().find(|c| tree.is_token(*c) && tree.kind(*c) == kind)
    }

    pub fn has_parent_of_kind(tree: &Tree, node: NodeId, kind: SyntaxKind) -> bool {
        tree.parent(node).is_some_and(|p| tree.kind(p) == kind)
    }

    fn nth_child_node(tree: &Tree, node: NodeId, n: usize) -> Option<NodeId> {
        tree.child_nodes(node).nth(n)
    }

    // -----------------------------------------------------------------
    // Calls
    // -----------------------------------------------------------------

    /// The `NAME_REF` naming the called function or method.
    pub fn callee_ref(tree: &Tree, call: NodeId) -> Option<NodeId> {
        match tree.kind(call) {
            CALL_EXPR => nth_child_node(tree, call, 0).filter(|n| tree.kind(*n) == NAME_REF),
            METHOD_CALL_EXPR | STATIC_CALL_EXPR => nth_child_node(tree, call, 1).filter(|n| tree.kind(*n) == NAME_REF),
            _ => None,
        }
    }

    /// Callee name as written, without a leading namespace separator.
    pub fn callee_name(tree: &Tree, call: NodeId) -> Option<String> {
        let name = callee_ref(tree, call)?;
        let text = tree.text_of(name);
        Some(text.trim().trim_start_matches('\\').to_string())
    }

    /// Case-insensitive callee check, as PHP resolves function names.
    pub fn is_call_to(tree: &Tree, call: NodeId, names: &[&str]) -> bool {
        callee_name(tree, call).is_some_and(|name| names.iter().any(|n| name.eq_ignore_ascii_case(n)))
    }

    pub fn arg_list(tree: &Tree, node: NodeId) -> Option<NodeId> {
        first_child_of_kind(tree, node, ARG_LIST)
    }

    /// Ordered argument expressions of a call, `new`, `isset` or `empty`.
    pub fn arguments(tree: &Tree, node: NodeId) -> Vec<NodeId> {
        match arg_list(tree, node) {
            Some(list) => tree.child_nodes(list).collect(),
            None => Vec::new(),
        }
    }

    /// Receiver of a method call, or object of a property fetch.
    pub fn receiver(tree: &Tree, node: NodeId) -> Option<NodeId> {
        match tree.kind(node) {
            METHOD_CALL_EXPR | PROPERTY_FETCH | STATIC_CALL_EXPR | CLASS_CONST_FETCH | STATIC_PROPERTY_FETCH => {
                nth_child_node(tree, node, 0)
            }
            _ => None,
        }
    }

    // -----------------------------------------------------------------
    // Operators
    // -----------------------------------------------------------------

    /// Operator token of a binary, unary, postfix or assignment expression.
    pub fn operator(tree: &Tree, node: NodeId) -> Option<NodeId> {
        match tree.kind(node) {
            BINARY_EXPR | UNARY_EXPR | POSTFIX_EXPR | ASSIGN_EXPR => {
                tree.non_trivia_children(node).find(|c| tree.is_token(*c))
            }
            _ => None,
        }
    }

    pub fn operator_kind(tree: &Tree, node: NodeId) -> Option<SyntaxKind> {
        operator(tree, node).map(|op| tree.kind(op))
    }

    pub fn left_operand(tree: &Tree, node: NodeId) -> Option<NodeId> {
        match tree.kind(node) {
            BINARY_EXPR | ASSIGN_EXPR => nth_child_node(tree, node, 0),
            _ => None,
        }
    }

    pub fn right_operand(tree: &Tree, node: NodeId) -> Option<NodeId> {
        match tree.kind(node) {
            BINARY_EXPR | ASSIGN_EXPR => nth_child_node(tree, node, 1),
            _ => None,
        }
    }

    /// Operand of a unary, postfix, cast or parenthesised expression.
    pub fn operand(tree: &Tree, node: NodeId) -> Option<NodeId> {
        match tree.kind(node) {
            UNARY_EXPR | POSTFIX_EXPR | CAST_EXPR | PAREN_EXPR => nth_child_node(tree, node, 0),
            _ => None,
        }
    }

    /// Strip any number of enclosing parentheses.
    pub fn unparenthesized(tree: &Tree, node: NodeId) -> NodeId {
        let mut current = node;
        while tree.kind(current) == PAREN_EXPR {
            match operand(tree, current) {
                Some(inner) => current = inner,
                None => break,
            }
        }
        current
    }

    pub fn assignment_target(tree: &Tree, node: NodeId) -> Option<NodeId> {
        (tree.kind(node) == ASSIGN_EXPR).then(|| nth_child_node(tree, node, 0)).flatten()
    }

    pub fn assignment_value(tree: &Tree, node: NodeId) -> Option<NodeId> {
        (tree.kind(node) == ASSIGN_EXPR).then(|| nth_child_node(tree, node, 1)).flatten()
    }

    /// `$name` of a variable node, without the dollar sign.
    pub fn variable_name(tree: &Tree, node: NodeId) -> Option<String> {
        if tree.kind(node) != VARIABLE {
            return None;
        }
        let token = token_of_kind(tree, node, VAR_NAME)?;
        tree.token_text(token).map(|t| t.trim_start_matches('$').to_string())
    }

    // -----------------------------------------------------------------
    // Statements
    // -----------------------------------------------------------------

    /// Condition of an `if`, `elseif` or `while`.
    pub fn condition(tree: &Tree, node: NodeId) -> Option<NodeId> {
        match tree.kind(node) {
            IF_STMT | ELSE_IF_CLAUSE | WHILE_STMT => nth_child_node(tree, node, 0),
            DO_WHILE_STMT => nth_child_node(tree, node, 1),
            _ => None,
        }
    }

    pub fn else_if_clauses(tree: &Tree, if_stmt: NodeId) -> Vec<NodeId> {
        children_of_kind(tree, if_stmt, ELSE_IF_CLAUSE)
    }

    /// Statement nodes of a block or file, in order.
    pub fn statements(tree: &Tree, block: NodeId) -> Vec<NodeId> {
        tree.child_nodes(block).filter(|n| tree.kind(*n).is_statement()).collect()
    }

    /// The statement right before `stmt` in its block, trivia skipped.
    pub fn previous_statement(tree: &Tree, stmt: NodeId) -> Option<NodeId> {
        let mut current = tree.prev_sibling(stmt);
        while let Some(sibling) = current {
            if !tree.is_trivia(sibling) {
                return (!tree.is_token(sibling)).then_some(sibling);
            }
            current = tree.prev_sibling(sibling);
        }
        None
    }

    /// Closest enclosing function, method or closure.
    pub fn enclosing_function(tree: &Tree, node: NodeId) -> Option<NodeId> {
        tree.ancestors(node).find(|a| tree.kind(*a).is_function_like())
    }

    pub fn function_body(tree: &Tree, function: NodeId) -> Option<NodeId> {
        match tree.kind(function) {
            ARROW_FN_EXPR => tree.child_nodes(function).last(),
            _ => first_child_of_kind(tree, function, BLOCK),
        }
    }

    pub fn enclosing_class(tree: &Tree, node: NodeId) -> Option<NodeId> {
        tree.ancestors(node).find(|a| tree.kind(*a).is_class_like())
    }

    /// Declared name of a function, method, class, interface, trait or enum.
    pub fn decl_name(tree: &Tree, decl: NodeId) -> Option<String> {
        first_child_of_kind(tree, decl, NAME).map(|n| tree.text_of(n).trim().to_string())
    }

    fn list_names(tree: &Tree, decl: NodeId, list: SyntaxKind) -> Vec<String> {
        match first_child_of_kind(tree, decl, list) {
            Some(list) => children_of_kind(tree, list, NAME_REF)
                .into_iter()
                .map(|n| tree.text_of(n).trim().to_string())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn extends_names(tree: &Tree, decl: NodeId) -> Vec<String> {
        list_names(tree, decl, EXTENDS_LIST)
    }

    pub fn implements_names(tree: &Tree, decl: NodeId) -> Vec<String> {
        list_names(tree, decl, IMPLEMENTS_LIST)
    }

    // -----------------------------------------------------------------
    // Literals and arrays
    // -----------------------------------------------------------------

    pub fn literal_token(tree: &Tree, node: NodeId) -> Option<NodeId> {
        (tree.kind(node) == LITERAL).then(|| tree.non_trivia_children(node).next()).flatten()
    }

    pub fn is_string_literal(tree: &Tree, node: NodeId) -> bool {
        literal_token(tree, node).is_some_and(|t| tree.kind(t) == STRING)
    }

    /// Value of a quoted PHP string. Single quotes only unescape `\'` and
    /// `\\`; double quotes handle the common escapes.
    pub fn unquote(text: &str) -> String {
        let Some(quote) = text.chars().next() else { return String::new() };
        let inner = text.get(1..text.len().saturating_sub(1)).unwrap_or("");
        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            let Some(next) = chars.next() else {
                out.push('\\');
                break;
            };
            let unescaped = match (quote, next) {
                ('\'', '\'') | (_, '\\') => Some(next),
                ('"', '"') => Some('"'),
                ('"', 'n') => Some('\n'),
                ('"', 't') => Some('\t'),
                ('"', 'r') => Some('\r'),
                ('"', '$') => Some('$'),
                ('"', '0') => Some('\0'),
                _ => None,
            };
            match unescaped {
                Some(u) => out.push(u),
                None => {
                    out.push('\\');
                    out.push(next);
                }
            }
        }
        out
    }

    pub fn array_elements(tree: &Tree, array: NodeId) -> Vec<NodeId> {
        if tree.kind(array) != ARRAY_EXPR {
            return Vec::new();
        }
        children_of_kind(tree, array, ARRAY_ELEMENT)
    }

    pub fn element_key(tree: &Tree, element: NodeId) -> Option<NodeId> {
        token_of_kind(tree, element, FAT_ARROW)?;
        nth_child_node(tree, element, 0)
    }

    pub fn element_value(tree: &Tree, element: NodeId) -> Option<NodeId> {
        tree.child_nodes(element).last()
    }

    /// `[...]` as opposed to `array(...)`.
    pub fn is_short_array(tree: &Tree, array: NodeId) -> bool {
        tree.non_trivia_children(array).next().is_some_and(|t| tree.kind(t) == L_BRACK)
    }

    /// Nodes in `scope` that are variables named `name`.
    pub fn variable_references(tree: &Tree, scope: NodeId, name: &str) -> Vec<NodeId> {
        find_nodes_where(tree, scope, |n| {
            tree.kind(n) == VARIABLE && variable_name(tree, n).as_deref() == Some(name)
        })
    }
}
