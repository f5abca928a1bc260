// Copyright (C) Brian G. Milnes 2025

//! Rule: cascading and nested `str_replace(...)` calls
//!
//! Detects replacements that can be folded into one call and plans the
//! text of the merged call for the fixer.

pub mod cascade_replace {
    use std::collections::BTreeSet;
    use crate::ast_utils::ast_utils::{
        array_elements, arguments, assignment_target, assignment_value, callee_ref, element_key, element_value,
        is_call_to, is_short_array, is_string_literal, previous_statement, unparenthesized, variable_name,
    };
    use crate::diagnostics::diagnostics::{Match, Reporter, Severity};
    use crate::equivalence::equivalence::are_equivalent;
    use crate::fixer::fixer::{Edit, EditError, Fix};
    use crate::parser::parser::FragmentKind;
    use crate::rules::{Rule, RuleContext};
    use crate::syntax_kind::syntax_kind::SyntaxKind::{self, *};
    use crate::tree::tree::{NodeId, Tree};

    pub const RULE_ID: &str = "cascade-string-replacement";

    const REPLACE_FUNCTION: &str = "str_replace";

    const MESSAGE_CASCADING: &str = "This str_replace(...) call can be merged with the previous.";
    const MESSAGE_NESTING: &str = "This str_replace(...) call can be merged with its parent.";
    const MESSAGE_SEARCH: &str = "Can be replaced with the string from the array.";

    #[derive(Debug, Default, Clone, Copy)]
    pub struct CascadeStringReplacement;

    impl Rule for CascadeStringReplacement {
        fn id(&self) -> &'static str {
            RULE_ID
        }

        fn interests(&self) -> &'static [SyntaxKind] {
            &[ASSIGN_EXPR, RETURN_STMT]
        }

        fn check(&self, ctx: &RuleContext<'_>, node: NodeId, sink: &mut dyn Reporter) {
            let tree = ctx.tree;
            let Some(call) = replace_call_of(tree, node) else { return };
            let args = arguments(tree, call);
            let [search, _, subject] = args[..] else { return };
            let short_arrays = ctx.options.use_short_array_syntax;

            if let Some(previous) = cascaded_call(tree, node, subject) {
                let fix = Fix::MergeReplaceCalls {
                    patch: tree.handle(call),
                    eliminate: tree.handle(previous),
                    short_arrays,
                };
                sink.report(Match::new(tree, RULE_ID, call, MESSAGE_CASCADING, Severity::Warning).with_fix(fix));
            }

            if is_replace_call(tree, subject) {
                let fix = Fix::MergeReplaceCalls {
                    patch: tree.handle(call),
                    eliminate: tree.handle(subject),
                    short_arrays,
                };
                sink.report(Match::new(tree, RULE_ID, subject, MESSAGE_NESTING, Severity::Warning).with_fix(fix));
            }

            if let Some(literal) = single_search_literal(tree, search) {
                let fix = Fix::SimplifySearchArgument { array: tree.handle(search), replacement: literal };
                sink.report(Match::new(tree, RULE_ID, search, MESSAGE_SEARCH, Severity::WeakWarning).with_fix(fix));
            }
        }
    }

    fn is_replace_call(tree: &Tree, node: NodeId) -> bool {
        tree.kind(node) == CALL_EXPR
            && is_call_to(tree, node, &[REPLACE_FUNCTION])
            && arguments(tree, node).len() == 3
    }

    /// The `str_replace` call whose result is assigned or returned by `node`.
    fn replace_call_of(tree: &Tree, node: NodeId) -> Option<NodeId> {
        let value = match tree.kind(node) {
            ASSIGN_EXPR => assignment_value(tree, node)?,
            RETURN_STMT => tree.child_nodes(node).next()?,
            _ => return None,
        };
        let value = unparenthesized(tree, value);
        is_replace_call(tree, value).then_some(value)
    }

    /// The call of the previous statement when it feeds its result into
    /// this one through the same variable.
    fn cascaded_call(tree: &Tree, node: NodeId, subject: NodeId) -> Option<NodeId> {
        let statement = match tree.kind(node) {
            RETURN_STMT => node,
            _ => tree.parent(node).filter(|p| tree.kind(*p) == EXPR_STMT)?,
        };
        let previous = previous_statement(tree, statement).filter(|p| tree.kind(*p) == EXPR_STMT)?;
        let previous_assignment = tree.child_nodes(previous).next().filter(|a| tree.kind(*a) == ASSIGN_EXPR)?;
        let previous_call = replace_call_of(tree, previous_assignment)?;

        let transition = assignment_target(tree, previous_assignment)?;
        let transition_name = variable_name(tree, transition)?;
        if variable_name(tree, subject)? != transition_name {
            return None;
        }
        let storage = match tree.kind(node) {
            ASSIGN_EXPR => assignment_target(tree, node)?,
            _ => subject,
        };
        are_equivalent(tree, transition, storage).then_some(previous_call)
    }

    /// Text of the one string literal an all-literal search array repeats.
    fn single_search_literal(tree: &Tree, search: NodeId) -> Option<String> {
        if tree.kind(search) != ARRAY_EXPR {
            return None;
        }
        let mut literals = BTreeSet::new();
        for element in array_elements(tree, search) {
            let value = element_value(tree, element)?;
            if element_key(tree, element).is_some() || !is_string_literal(tree, value) {
                return None;
            }
            literals.insert(tree.text_of(value).trim().to_string());
        }
        match literals.len() {
            1 => literals.into_iter().next(),
            _ => None,
        }
    }

    // -----------------------------------------------------------------
    // Fix planning
    // -----------------------------------------------------------------

    /// An argument as the merge sees it: one value, or a list of element texts.
    #[derive(Debug, Clone, PartialEq)]
    enum Piece {
        Scalar { text: String, literal: bool },
        Array { elements: Vec<String>, original: Option<(String, bool)> },
    }

    impl Piece {
        fn read(tree: &Tree, node: NodeId) -> Piece {
            if tree.kind(node) == ARRAY_EXPR {
                let elements = array_elements(tree, node)
                    .into_iter()
                    .map(|e| tree.text_of(e).trim().to_string())
                    .collect();
                let original = Some((tree.text_of(node).trim().to_string(), is_short_array(tree, node)));
                return Piece::Array { elements, original };
            }
            Piece::Scalar { text: tree.text_of(node).trim().to_string(), literal: is_string_literal(tree, node) }
        }

        /// A one-element array holding a single string literal counts as
        /// that literal.
        fn unboxed(tree: &Tree, node: NodeId) -> Piece {
            if let [element] = array_elements(tree, node)[..] {
                if element_key(tree, element).is_none() {
                    if let Some(value) = element_value(tree, element).filter(|v| is_string_literal(tree, *v)) {
                        return Piece::Scalar { text: tree.text_of(value).trim().to_string(), literal: true };
                    }
                }
            }
            Piece::read(tree, node)
        }

        fn into_elements(self) -> Vec<String> {
            match self {
                Piece::Scalar { text, .. } => vec![text],
                Piece::Array { elements, .. } => elements,
            }
        }

        fn render(&self, short_arrays: bool) -> String {
            match self {
                Piece::Scalar { text, .. } => text.clone(),
                Piece::Array { original: Some((text, short)), .. } if *short == short_arrays => text.clone(),
                Piece::Array { elements, .. } => render_array(elements, short_arrays),
            }
        }
    }

    fn render_array(elements: &[String], short_arrays: bool) -> String {
        let body = elements.join(", ");
        if short_arrays {
            format!("[{body}]")
        } else {
            format!("array({body})")
        }
    }

    /// Values of the eliminated call go first, then those of the patched one.
    fn merge(to: Piece, from: Piece) -> Piece {
        let mut elements = from.into_elements();
        elements.extend(to.into_elements());
        Piece::Array { elements, original: None }
    }

    /// A literal replacement used with several searches, repeated once per
    /// search so the lists stay aligned after merging.
    fn expanded_replacement(tree: &Tree, search: NodeId, replacement: NodeId) -> Piece {
        let searches = array_elements(tree, search).len();
        if is_string_literal(tree, replacement) && tree.kind(search) == ARRAY_EXPR && searches > 1 {
            let text = tree.text_of(replacement).trim().to_string();
            return Piece::Array { elements: vec![text; searches], original: None };
        }
        Piece::read(tree, replacement)
    }

    fn replace_arguments(tree: &Tree, call: NodeId) -> Result<[NodeId; 3], EditError> {
        let args = arguments(tree, call);
        match args[..] {
            [search, replacement, subject] if tree.kind(call) == CALL_EXPR => Ok([search, replacement, subject]),
            _ => Err(EditError::Malformed { reason: "expected a str_replace call with three arguments".to_string() }),
        }
    }

    /// Edits that fold `eliminate` into `patch`: one call carrying both
    /// search and replacement lists and the subject of `eliminate`. When
    /// `eliminate` was a statement of its own, that statement goes too.
    pub fn plan_merge(tree: &Tree, patch: NodeId, eliminate: NodeId, short_arrays: bool) -> Result<Vec<Edit>, EditError> {
        let [to_search, to_replacement, _] = replace_arguments(tree, patch)?;
        let [from_search, from_replacement, from_subject] = replace_arguments(tree, eliminate)?;

        let replacement = match (Piece::unboxed(tree, to_replacement), Piece::unboxed(tree, from_replacement)) {
            (
                to @ Piece::Scalar { literal: true, .. },
                Piece::Scalar { text: from_text, literal: true },
            ) if to.render(short_arrays) == from_text => to,
            _ => merge(
                expanded_replacement(tree, to_search, to_replacement),
                expanded_replacement(tree, from_search, from_replacement),
            ),
        };
        let search = merge(Piece::read(tree, to_search), Piece::read(tree, from_search));
        let subject = Piece::read(tree, from_subject);

        let callee = callee_ref(tree, patch)
            .map(|c| tree.text_of(c).trim().to_string())
            .unwrap_or_else(|| REPLACE_FUNCTION.to_string());
        let text = format!(
            "{callee}({}, {}, {})",
            search.render(short_arrays),
            replacement.render(short_arrays),
            subject.render(short_arrays)
        );

        let mut edits = vec![Edit::Replace { target: patch, kind: FragmentKind::Expression, text }];
        let statement = tree
            .parent(eliminate)
            .filter(|p| tree.kind(*p) == ASSIGN_EXPR)
            .and_then(|assignment| tree.parent(assignment))
            .filter(|s| tree.kind(*s) == EXPR_STMT);
        if let Some(statement) = statement {
            if let Some(space) = tree.next_sibling(statement).filter(|s| tree.kind(*s) == WHITESPACE) {
                edits.push(Edit::Delete { target: space });
            }
            edits.push(Edit::Delete { target: statement });
        }
        Ok(edits)
    }

    /// Replace a repeated-literal search array with the literal itself.
    pub fn plan_simplify(tree: &Tree, array: NodeId, replacement: &str) -> Result<Vec<Edit>, EditError> {
        if tree.kind(array) != ARRAY_EXPR {
            return Err(EditError::Malformed { reason: "search argument is no longer an array".to_string() });
        }
        Ok(vec![Edit::Replace { target: array, kind: FragmentKind::Expression, text: replacement.to_string() }])
    }
}
