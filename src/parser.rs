// Copyright (C) Brian G. Milnes 2025

//! PHP parser on top of tree-sitter-php
//!
//! tree-sitter does the parsing and the error recovery; this module lowers
//! its concrete tree into the lossless arena `Tree` through `TreeBuilder`.
//! Bytes between two grammar nodes become trivia of the enclosing node, so
//! whitespace between two statements belongs to their block and never to
//! either statement. Grammar leaves are classified with the lexer.

pub mod parser {
    use thiserror::Error;
    use tree_sitter::Node;
    use crate::lexer::lexer::classify;
    use crate::syntax_kind::syntax_kind::SyntaxKind::{self, *};
    use crate::tree::tree::{Checkpoint, NodeId, Tree, TreeBuilder};

    #[derive(Debug, Clone, Error, PartialEq, Eq)]
    #[error("parse error at offset {offset}: {message}")]
    pub struct ParseError {
        pub message: String,
        pub offset: usize,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum FragmentKind {
        Expression,
        Statement,
        Token,
    }

    /// A parsed snippet: its own tree and the node of interest in it.
    #[derive(Debug, Clone)]
    pub struct Fragment {
        pub tree: Tree,
        pub node: NodeId,
    }

    /// Result of a recovering parse: always a full tree, plus what the
    /// grammar rejected. Rejected text sits in `ERROR` nodes.
    #[derive(Debug, Clone)]
    pub struct Parse {
        tree: Tree,
        errors: Vec<ParseError>,
    }

    impl Parse {
        pub fn tree(&self) -> &Tree {
            &self.tree
        }

        pub fn into_tree(self) -> Tree {
            self.tree
        }

        pub fn errors(&self) -> &[ParseError] {
            &self.errors
        }

        /// The tree, or the first syntax error.
        pub fn ok(self) -> Result<Tree, ParseError> {
            match self.errors.into_iter().next() {
                Some(error) => Err(error),
                None => Ok(self.tree),
            }
        }
    }

    const SNIPPET_PREFIX: &str = "<?php ";

    /// Parse a whole PHP file, recovering from syntax errors.
    pub fn parse_source(source: &str) -> Parse {
        lower_source(source, 0)
    }

    /// Parse a whole PHP file, failing on its first syntax error.
    pub fn parse_file(source: &str) -> Result<Tree, ParseError> {
        parse_source(source).ok()
    }

    /// Parse PHP code that has no open tag, recovering from syntax errors.
    pub fn parse_snippet(text: &str) -> Parse {
        lower_source(&format!("{SNIPPET_PREFIX}{text}"), SNIPPET_PREFIX.len())
    }

    /// Parse a snippet of PHP code (no open tag) as a single expression,
    /// statement or token.
    pub fn parse_fragment(text: &str, kind: FragmentKind) -> Result<Fragment, ParseError> {
        let tree = match kind {
            FragmentKind::Token => token_fragment(text)?,
            FragmentKind::Expression => expression_fragment(text)?,
            FragmentKind::Statement => {
                let tree = parse_snippet(text).ok()?;
                if tree.non_trivia_children(tree.root()).count() != 1 {
                    return Err(ParseError { message: "expected exactly one statement".to_string(), offset: 0 });
                }
                tree
            }
        };
        let node = tree
            .non_trivia_children(tree.root())
            .next()
            .ok_or_else(|| ParseError { message: "empty fragment".to_string(), offset: 0 })?;
        Ok(Fragment { tree, node })
    }

    fn token_fragment(text: &str) -> Result<Tree, ParseError> {
        let kind = classify(text).filter(|k| !k.is_trivia()).ok_or_else(|| ParseError {
            message: format!("expected a single token, found `{}`", snippet(text)),
            offset: 0,
        })?;
        let mut builder = TreeBuilder::new();
        builder.start_node(SOURCE_FILE);
        builder.token(kind, text);
        builder.finish_node();
        Ok(builder.finish())
    }

    /// `text;` must parse as one expression statement ending at our `;`.
    fn expression_fragment(text: &str) -> Result<Tree, ParseError> {
        let source = format!("{SNIPPET_PREFIX}{text};");
        let base = SNIPPET_PREFIX.len();
        let syntax = grammar_parse(&source)?;
        let root = syntax.root_node();

        let mut lower = Lowering::new(&source, base);
        lower.check_errors(root);
        if let Some(error) = lower.errors.into_iter().next() {
            return Err(error);
        }

        let statements: Vec<Node<'_>> = named_children(root)
            .into_iter()
            .map(|(n, _)| n)
            .filter(|n| !matches!(n.kind(), "php_tag" | "comment"))
            .collect();
        let statement = match statements.as_slice() {
            [only] if only.kind() == "expression_statement" && only.end_byte() == source.len() => *only,
            _ => return Err(ParseError { message: "expected a single expression".to_string(), offset: 0 }),
        };

        let mut lower = Lowering::new(&source, base);
        lower.builder.start_node(SOURCE_FILE);
        let parts = children(statement);
        for (child, field) in &parts[..parts.len().saturating_sub(1)] {
            lower.child(Some(statement), *child, *field);
        }
        lower.gap(source.len() - 1);
        lower.builder.finish_node();
        Ok(lower.builder.finish())
    }

    fn grammar_parse(source: &str) -> Result<tree_sitter::Tree, ParseError> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_php::LANGUAGE_PHP.into())
            .map_err(|e| ParseError { message: format!("failed to load the PHP grammar: {e}"), offset: 0 })?;
        parser
            .parse(source, None)
            .ok_or_else(|| ParseError { message: "the PHP grammar produced no tree".to_string(), offset: 0 })
    }

    /// Lower everything after the first `base` bytes of `source`.
    fn lower_source(source: &str, base: usize) -> Parse {
        let syntax = match grammar_parse(source) {
            Ok(syntax) => syntax,
            Err(error) => {
                let mut builder = TreeBuilder::new();
                builder.start_node(SOURCE_FILE);
                if source.len() > base {
                    builder.start_node(ERROR);
                    builder.token(ERROR_TOKEN, &source[base..]);
                    builder.finish_node();
                }
                builder.finish_node();
                return Parse { tree: builder.finish(), errors: vec![error] };
            }
        };

        let root = syntax.root_node();
        let mut lower = Lowering::new(source, base);
        lower.builder.start_node(SOURCE_FILE);
        if root.kind() == "program" {
            lower.children_of(root);
        } else {
            lower.child(None, root, None);
        }
        lower.gap(source.len());
        lower.builder.finish_node();
        Parse { tree: lower.builder.finish(), errors: lower.errors }
    }

    fn children(node: Node<'_>) -> Vec<(Node<'_>, Option<&'static str>)> {
        let mut cursor = node.walk();
        let mut out = Vec::new();
        if cursor.goto_first_child() {
            loop {
                out.push((cursor.node(), cursor.field_name()));
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }
        out
    }

    fn named_children(node: Node<'_>) -> Vec<(Node<'_>, Option<&'static str>)> {
        children(node).into_iter().filter(|(n, _)| n.is_named()).collect()
    }

    fn first_name_child(node: Node<'_>) -> Option<Node<'_>> {
        children(node)
            .into_iter()
            .map(|(n, _)| n)
            .find(|n| matches!(n.kind(), "name" | "namespace_name" | "qualified_name"))
    }

    fn snippet(text: &str) -> String {
        let line = text.lines().next().unwrap_or("");
        match line.char_indices().nth(30) {
            Some((at, _)) => format!("{}...", &line[..at]),
            None => line.to_string(),
        }
    }

    /// Grammar node kinds that map one to one onto a node kind.
    fn node_kind(kind: &str) -> Option<SyntaxKind> {
        let mapped = match kind {
            "expression_statement" | "function_static_declaration" | "exit_statement" => EXPR_STMT,
            "compound_statement" | "colon_block" | "declaration_list" | "enum_declaration_list" => BLOCK,
            "empty_statement" => EMPTY_STMT,
            "echo_statement" => ECHO_STMT,
            "if_statement" => IF_STMT,
            "else_if_clause" => ELSE_IF_CLAUSE,
            "else_clause" => ELSE_CLAUSE,
            "while_statement" => WHILE_STMT,
            "do_statement" => DO_WHILE_STMT,
            "for_statement" => FOR_STMT,
            "foreach_statement" => FOREACH_STMT,
            "switch_statement" => SWITCH_STMT,
            "case_statement" | "default_statement" => CASE_CLAUSE,
            "try_statement" => TRY_STMT,
            "catch_clause" => CATCH_CLAUSE,
            "finally_clause" => FINALLY_CLAUSE,
            "return_statement" => RETURN_STMT,
            "break_statement" => BREAK_STMT,
            "continue_statement" => CONTINUE_STMT,
            "global_declaration" => GLOBAL_STMT,
            "unset_statement" => UNSET_STMT,
            "declare_statement" => DECLARE_STMT,
            "named_label_statement" => LABEL_STMT,
            "goto_statement" => GOTO_STMT,
            "function_definition" => FUNCTION_DECL,
            "class_declaration" => CLASS_DECL,
            "interface_declaration" => INTERFACE_DECL,
            "trait_declaration" => TRAIT_DECL,
            "enum_declaration" => ENUM_DECL,
            "enum_case" => ENUM_CASE,
            "base_clause" => EXTENDS_LIST,
            "class_interface_clause" => IMPLEMENTS_LIST,
            "method_declaration" => METHOD_DECL,
            "property_declaration" => PROPERTY_DECL,
            "const_declaration" => CONST_DECL,
            "use_declaration" | "namespace_use_declaration" => USE_DECL,
            "namespace_use_clause" => USE_ITEM,
            "namespace_definition" => NAMESPACE_DECL,
            "formal_parameters" => PARAM_LIST,
            "simple_parameter" | "variadic_parameter" | "property_promotion_parameter" => PARAM,
            "anonymous_function_use_clause" => CLOSURE_USE,
            "anonymous_function" | "anonymous_function_creation_expression" => CLOSURE_EXPR,
            "arrow_function" => ARROW_FN_EXPR,
            "assignment_expression" | "reference_assignment_expression" | "augmented_assignment_expression" => {
                ASSIGN_EXPR
            }
            "binary_expression" => BINARY_EXPR,
            "unary_op_expression"
            | "error_suppression_expression"
            | "throw_expression"
            | "print_intrinsic"
            | "clone_expression"
            | "include_expression"
            | "include_once_expression"
            | "require_expression"
            | "require_once_expression" => UNARY_EXPR,
            "cast_expression" => CAST_EXPR,
            "conditional_expression" => TERNARY_EXPR,
            "parenthesized_expression" => PAREN_EXPR,
            "member_call_expression" | "nullsafe_member_call_expression" => METHOD_CALL_EXPR,
            "scoped_call_expression" => STATIC_CALL_EXPR,
            "member_access_expression" | "nullsafe_member_access_expression" => PROPERTY_FETCH,
            "scoped_property_access_expression" => STATIC_PROPERTY_FETCH,
            "class_constant_access_expression" => CLASS_CONST_FETCH,
            "subscript_expression" => ARRAY_ACCESS_EXPR,
            "object_creation_expression" => NEW_EXPR,
            "array_creation_expression" => ARRAY_EXPR,
            "array_element_initializer" => ARRAY_ELEMENT,
            "arguments" => ARG_LIST,
            "match_expression" => MATCH_EXPR,
            "match_conditional_expression" | "match_default_expression" => MATCH_ARM,
            "yield_expression" => YIELD_EXPR,
            "dynamic_variable_name" => VARIABLE,
            _ => return None,
        };
        Some(mapped)
    }

    const TYPE_KINDS: &[&str] = &[
        "named_type",
        "primitive_type",
        "optional_type",
        "union_type",
        "intersection_type",
        "disjunctive_normal_form_type",
        "bottom_type",
        "type_list",
    ];

    /// Statements whose condition is written in bare parens.
    const CONDITION_PARENTS: &[&str] = &[
        "if_statement",
        "else_if_clause",
        "while_statement",
        "do_statement",
        "switch_statement",
        "match_expression",
    ];

    /// Nodes whose own `name` child declares something.
    const DECLARING_PARENTS: &[&str] = &[
        "function_definition",
        "method_declaration",
        "class_declaration",
        "interface_declaration",
        "trait_declaration",
        "enum_declaration",
        "enum_case",
        "namespace_definition",
    ];

    struct Lowering<'s> {
        src: &'s str,
        base: usize,
        /// Bytes before `pos` are already in the builder.
        pos: usize,
        builder: TreeBuilder,
        errors: Vec<ParseError>,
    }

    impl<'s> Lowering<'s> {
        fn new(src: &'s str, base: usize) -> Self {
            Lowering { src, base, pos: base, builder: TreeBuilder::new(), errors: Vec::new() }
        }

        fn error(&mut self, message: String, at: usize) {
            self.errors.push(ParseError { message, offset: at.saturating_sub(self.base) });
        }

        /// Collect errors without building anything.
        fn check_errors(&mut self, node: Node<'_>) {
            if node.is_missing() {
                self.error(format!("expected `{}`", node.kind()), node.start_byte());
            } else if node.is_error() {
                let text = snippet(self.text(node));
                self.error(format!("unexpected `{text}`"), node.start_byte());
            } else if node.has_error() {
                for (child, _) in children(node) {
                    self.check_errors(child);
                }
            }
        }

        /// Emit the source between `pos` and `to`: whitespace runs as
        /// trivia, anything else as error tokens.
        fn gap(&mut self, to: usize) {
            if to <= self.pos {
                return;
            }
            let start = self.pos;
            let text = &self.src[start..to];
            let mut run_start = 0;
            let mut run_ws = None;
            for (at, c) in text.char_indices() {
                let ws = c.is_whitespace();
                if let Some(prev) = run_ws.filter(|prev| *prev != ws) {
                    self.gap_run(&text[run_start..at], prev, start + run_start);
                    run_start = at;
                }
                run_ws = Some(ws);
            }
            if let Some(ws) = run_ws {
                self.gap_run(&text[run_start..], ws, start + run_start);
            }
            self.pos = to;
        }

        fn gap_run(&mut self, text: &str, whitespace: bool, at: usize) {
            if whitespace {
                self.builder.token(WHITESPACE, text);
            } else {
                self.error(format!("unexpected `{}`", snippet(text)), at);
                self.builder.token(ERROR_TOKEN, text);
            }
        }

        fn leaf(&mut self, kind: SyntaxKind, node: Node<'_>) {
            if node.has_error() {
                self.check_errors(node);
            }
            self.gap(node.start_byte());
            let end = node.end_byte();
            if end > self.pos {
                self.builder.token(kind, &self.src[self.pos..end]);
                self.pos = end;
            }
        }

        fn wrapped_leaf(&mut self, node_kind: SyntaxKind, token_kind: SyntaxKind, node: Node<'_>) {
            self.gap(node.start_byte());
            self.builder.start_node(node_kind);
            self.leaf(token_kind, node);
            self.builder.finish_node();
        }

        fn composite(&mut self, kind: SyntaxKind, node: Node<'_>) {
            self.gap(node.start_byte());
            self.builder.start_node(kind);
            self.children_of(node);
            self.gap(node.end_byte());
            self.builder.finish_node();
        }

        fn children_of(&mut self, node: Node<'_>) {
            for (child, field) in children(node) {
                self.child(Some(node), child, field);
            }
        }

        fn transparent(&mut self, node: Node<'_>) {
            self.children_of(node);
            self.gap(node.end_byte());
        }

        fn text(&self, node: Node<'_>) -> &'s str {
            &self.src[node.start_byte()..node.end_byte()]
        }

        fn child(&mut self, parent: Option<Node<'_>>, node: Node<'_>, field: Option<&'static str>) {
            if node.is_missing() {
                self.error(format!("expected `{}`", node.kind()), node.start_byte());
                return;
            }
            if node.start_byte() == node.end_byte() || node.end_byte() <= self.base {
                return;
            }
            if node.is_error() {
                let text = snippet(self.text(node));
                self.error(format!("unexpected `{text}`"), node.start_byte());
                self.composite(ERROR, node);
                return;
            }

            let parent_kind = parent.map_or("", |p| p.kind());
            match node.kind() {
                "comment" | "attribute_list" => self.leaf(COMMENT, node),
                "php_tag" => self.leaf(OPEN_TAG, node),
                "text" => self.leaf(INLINE_HTML, node),
                "variable_name" => self.wrapped_leaf(VARIABLE, VAR_NAME, node),
                "integer" => self.wrapped_leaf(LITERAL, INT_NUMBER, node),
                "float" => self.wrapped_leaf(LITERAL, FLOAT_NUMBER, node),
                "string" | "encapsed_string" => self.wrapped_leaf(LITERAL, STRING, node),
                "heredoc" | "nowdoc" => self.wrapped_leaf(LITERAL, HEREDOC, node),
                "boolean" => {
                    let kind = if self.text(node).eq_ignore_ascii_case("true") { TRUE_KW } else { FALSE_KW };
                    self.wrapped_leaf(LITERAL, kind, node);
                }
                "null" => self.wrapped_leaf(LITERAL, NULL_KW, node),
                "cast_type" => self.leaf(IDENT, node),
                "name" | "qualified_name" | "namespace_name" => self.name(parent, node, field),
                "relative_scope" => {
                    let kind = classify(self.text(node)).unwrap_or(IDENT);
                    self.wrapped_leaf(NAME_REF, kind, node);
                }
                "shell_command_expression" => self.wrapped_leaf(SHELL_EXPR, SHELL_COMMAND, node),
                kind if TYPE_KINDS.contains(&kind) => self.wrapped_leaf(TYPE_REF, IDENT, node),
                "parenthesized_expression" if CONDITION_PARENTS.contains(&parent_kind) => self.transparent(node),
                "namespace_use_clause" if parent_kind == "namespace_use_group" => self.transparent(node),
                "else_clause" => self.else_clause(node),
                "function_call_expression" => self.call(node),
                "update_expression" => {
                    let prefix = node.child(0).is_some_and(|op| matches!(op.kind(), "++" | "--"));
                    self.composite(if prefix { UNARY_EXPR } else { POSTFIX_EXPR }, node);
                }
                "static_variable_declaration" => {
                    if children(node).iter().any(|(c, _)| c.kind() == "=") {
                        self.composite(ASSIGN_EXPR, node);
                    } else {
                        self.transparent(node);
                    }
                }
                "list_literal" => self.list_literal(node),
                kind => match node_kind(kind) {
                    Some(mapped) => self.composite(mapped, node),
                    None if node.child_count() == 0 => {
                        let text = self.text(node);
                        let fallback = if text.starts_with(|c: char| c.is_alphabetic()) { IDENT } else { ERROR_TOKEN };
                        self.leaf(classify(text).unwrap_or(fallback), node);
                    }
                    None => self.transparent(node),
                },
            }
        }

        /// Declared names become `NAME`, named-argument and label names stay
        /// bare identifiers, everything else is a `NAME_REF`.
        fn name(&mut self, parent: Option<Node<'_>>, node: Node<'_>, field: Option<&'static str>) {
            let parent_kind = parent.map_or("", |p| p.kind());
            let named_argument = parent_kind == "argument"
                && (field == Some("name") || node.next_sibling().is_some_and(|n| n.kind() == ":"));
            if named_argument || matches!(parent_kind, "named_label_statement" | "goto_statement") {
                self.leaf(IDENT, node);
                return;
            }

            let declared = match parent {
                Some(p) if DECLARING_PARENTS.contains(&parent_kind) => match field {
                    Some(field) => field == "name",
                    None => first_name_child(p).is_some_and(|first| first.id() == node.id()),
                },
                Some(p) if parent_kind == "const_element" => p.start_byte() == node.start_byte(),
                _ => {
                    parent_kind == "namespace_aliasing_clause"
                        || field == Some("alias")
                        || (parent_kind == "namespace_use_clause"
                            && node.prev_sibling().is_some_and(|p| p.kind().eq_ignore_ascii_case("as")))
                }
            };
            self.wrapped_leaf(if declared { NAME } else { NAME_REF }, IDENT, node);
        }

        /// `isset(...)` and `empty(...)` get their own node kinds.
        fn call(&mut self, node: Node<'_>) {
            let callee = node.child_by_field_name("function").or_else(|| node.named_child(0));
            let special = callee.and_then(|c| match self.text(c).to_ascii_lowercase().as_str() {
                "isset" => Some((ISSET_EXPR, ISSET_KW)),
                "empty" => Some((EMPTY_EXPR, EMPTY_KW)),
                _ => None,
            });
            let (Some(callee), Some((kind, keyword))) = (callee, special) else {
                self.composite(CALL_EXPR, node);
                return;
            };
            self.gap(node.start_byte());
            self.builder.start_node(kind);
            for (child, field) in children(node) {
                if child.id() == callee.id() {
                    self.leaf(keyword, child);
                } else {
                    self.child(Some(node), child, field);
                }
            }
            self.gap(node.end_byte());
            self.builder.finish_node();
        }

        /// `else if (...)` is an else-if clause of the outer statement; the
        /// nested statement's own alternatives follow it as siblings.
        fn else_clause(&mut self, node: Node<'_>) {
            let nested = node
                .child_by_field_name("body")
                .or_else(|| named_children(node).into_iter().map(|(n, _)| n).find(|n| n.kind() != "comment"))
                .filter(|body| body.kind() == "if_statement");
            let Some(nested) = nested else {
                self.composite(ELSE_CLAUSE, node);
                return;
            };

            self.gap(node.start_byte());
            self.builder.start_node(ELSE_IF_CLAUSE);
            let mut deferred = Vec::new();
            for (child, field) in children(node) {
                if child.id() != nested.id() {
                    self.child(Some(node), child, field);
                    continue;
                }
                for (inner, inner_field) in children(nested) {
                    let alternative = matches!(inner.kind(), "else_if_clause" | "else_clause");
                    if alternative || !deferred.is_empty() {
                        deferred.push((inner, inner_field));
                    } else {
                        self.child(Some(nested), inner, inner_field);
                    }
                }
            }
            self.builder.finish_node();
            for (inner, inner_field) in deferred {
                self.child(Some(nested), inner, inner_field);
            }
        }

        /// `list($a, , $b)` and `[$a, $b]` targets: each comma-separated
        /// run becomes one array element.
        fn list_literal(&mut self, node: Node<'_>) {
            self.gap(node.start_byte());
            self.builder.start_node(ARRAY_EXPR);
            let mut element = None;
            for (child, field) in children(node) {
                let delimiter = matches!(child.kind(), "list" | "(" | ")" | "[" | "]" | ",");
                if delimiter {
                    self.close_element(element.take());
                } else if element.is_none() && child.kind() != "comment" {
                    self.gap(child.start_byte());
                    element = Some(self.builder.checkpoint());
                }
                self.child(Some(node), child, field);
            }
            self.close_element(element);
            self.gap(node.end_byte());
            self.builder.finish_node();
        }

        fn close_element(&mut self, element: Option<Checkpoint>) {
            if let Some(checkpoint) = element {
                self.builder.start_node_at(checkpoint, ARRAY_ELEMENT);
                self.builder.finish_node();
            }
        }
    }
}
