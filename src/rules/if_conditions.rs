// Copyright (C) Brian G. Milnes 2025

//! Rule: questionable `if`/`elseif` conditions
//!
//! Each branch condition is split into its top-level `&&`/`||` terms. The
//! terms of one branch are checked for ordering by cost, confusing operator
//! mixes, duplicated calls, mergeable `isset`, and inconsistent `instanceof`
//! tests. The terms of all branches are then checked for duplicates against
//! each other and against the conditions of enclosing `if` statements.

pub mod if_conditions {
    use crate::ast_utils::ast_utils::{
        arguments, condition, else_if_clauses, left_operand, literal_token, operand, operator, operator_kind,
        right_operand, unparenthesized,
    };
    use crate::cost::cost::cost;
    use crate::diagnostics::diagnostics::{Match, Reporter, Severity};
    use crate::equivalence::equivalence::are_equivalent;
    use crate::rules::{Rule, RuleContext};
    use crate::syntax_kind::syntax_kind::SyntaxKind::{self, *};
    use crate::tree::tree::{NodeId, Tree};

    pub const RULE_ID: &str = "not-optimal-if-conditions";

    const MESSAGE_ORDERING: &str = "This condition execution costs less than the previous one.";
    const MESSAGE_WRAP: &str = "Confusing conditions structure: please wrap needed with '(...)'.";
    const MESSAGE_DUPLICATE_CALL: &str = "This call is duplicated in conditions set.";
    const MESSAGE_ISSET_AND: &str = "This can be merged into the previous 'isset(..., ...[, ...])'.";
    const MESSAGE_ISSET_OR: &str = "This can be merged into the previous '!isset(..., ...[, ...])'.";
    const MESSAGE_AMBIGUOUS: &str = "This condition is ambiguous and can be safely removed.";
    const MESSAGE_COMPLEMENTARY: &str = "Probable bug: ensure this behaves properly with 'instanceof(...)' in this scenario.";
    const MESSAGE_DUPLICATE_CONDITION: &str = "This condition is duplicated in another if/elseif branch.";
    const MESSAGE_NULL_COMPARISON: &str = "This null comparison is redundant: 'isset(...)' already checks it.";
    const MESSAGE_USE_AND: &str = "'&&' should be used instead.";
    const MESSAGE_USE_OR: &str = "'||' should be used instead.";

    /// Top-level terms of one condition, in source order.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Terms {
        /// The operator joining the terms; `None` for a single term.
        pub op: Option<SyntaxKind>,
        pub terms: Vec<NodeId>,
    }

    impl Terms {
        fn is_conjunction(&self) -> bool {
            matches!(self.op, Some(AMP2 | AND_KW))
        }

        fn is_disjunction(&self) -> bool {
            matches!(self.op, Some(PIPE2 | OR_KW))
        }
    }

    /// Split a condition on its outermost logical operator. Only the left
    /// chain of the same operator is flattened; parentheses around the
    /// condition and around each term are dropped.
    pub fn split_conditions(tree: &Tree, cond: NodeId) -> Terms {
        let root = unparenthesized(tree, cond);
        let op = match operator_kind(tree, root) {
            Some(op) if tree.kind(root) == BINARY_EXPR && op.is_logical_op() => op,
            _ => return Terms { op: None, terms: vec![root] },
        };

        let mut rights = Vec::new();
        let mut current = root;
        while tree.kind(current) == BINARY_EXPR && operator_kind(tree, current) == Some(op) {
            let (Some(left), Some(right)) = (left_operand(tree, current), right_operand(tree, current)) else {
                break;
            };
            rights.push(right);
            current = left;
        }
        let mut terms = vec![unparenthesized(tree, current)];
        terms.extend(rights.into_iter().rev().map(|r| unparenthesized(tree, r)));
        Terms { op: Some(op), terms }
    }

    #[derive(Debug, Default, Clone, Copy)]
    pub struct NotOptimalIfConditions;

    impl Rule for NotOptimalIfConditions {
        fn id(&self) -> &'static str {
            RULE_ID
        }

        fn interests(&self) -> &'static [SyntaxKind] {
            &[IF_STMT]
        }

        fn check(&self, ctx: &RuleContext<'_>, if_stmt: NodeId, sink: &mut dyn Reporter) {
            let tree = ctx.tree;
            let branches: Vec<NodeId> = std::iter::once(if_stmt).chain(else_if_clauses(tree, if_stmt)).collect();

            let mut all_terms: Vec<NodeId> = Vec::new();
            for branch in branches {
                let Some(cond) = condition(tree, branch) else { continue };
                let terms = split_conditions(tree, cond);
                check_branch(ctx, &terms, sink);
                if ctx.options.report_literal_operators {
                    check_literal_operators(tree, cond, sink);
                }
                all_terms.extend(terms.terms);
            }

            if ctx.options.report_duplicate_conditions {
                check_duplicated_conditions(tree, if_stmt, all_terms, sink);
            }
        }
    }

    fn check_branch(ctx: &RuleContext<'_>, terms: &Terms, sink: &mut dyn Reporter) {
        check_ordering(ctx, terms, sink);
        if ctx.options.report_missing_parentheses {
            check_missing_parentheses(ctx.tree, terms, sink);
        }
        if ctx.options.report_duplicate_conditions {
            check_duplicated_calls(ctx.tree, terms, sink);
        }
        check_multiple_isset(ctx.tree, terms, sink);
        check_instanceof_complementarity(ctx.tree, terms, sink);
        check_ambiguous_instanceof(ctx, terms, sink);
        if ctx.options.report_isset_null_comparison {
            check_isset_null_comparison(ctx.tree, terms, sink);
        }
    }

    fn report(tree: &Tree, sink: &mut dyn Reporter, node: NodeId, message: &str, severity: Severity) {
        sink.report(Match::new(tree, RULE_ID, node, message, severity));
    }

    fn check_ordering(ctx: &RuleContext<'_>, terms: &Terms, sink: &mut dyn Reporter) {
        let tree = ctx.tree;
        let mut previous: Option<(NodeId, u32)> = None;
        for &term in &terms.terms {
            let current_cost = cost(tree, term, ctx.cheap_functions);
            if let Some((earlier, earlier_cost)) = previous {
                if current_cost < earlier_cost && !ctx.coupling.is_coupled(tree, earlier, term) {
                    report(tree, sink, term, MESSAGE_ORDERING, Severity::WeakWarning);
                }
            }
            previous = Some((term, current_cost));
        }
    }

    fn check_missing_parentheses(tree: &Tree, terms: &Terms, sink: &mut dyn Reporter) {
        for &term in &terms.terms {
            let mixed = tree.kind(term) == BINARY_EXPR && matches!(operator_kind(tree, term), Some(AMP2 | PIPE2));
            let wrapped = tree.parent(term).is_some_and(|p| tree.kind(p) == PAREN_EXPR);
            if mixed && !wrapped {
                report(tree, sink, term, MESSAGE_WRAP, Severity::Error);
            }
        }
    }

    /// Calls used as direct operands of binary terms; every one equivalent
    /// to an earlier call is reported once.
    fn check_duplicated_calls(tree: &Tree, terms: &Terms, sink: &mut dyn Reporter) {
        if terms.terms.len() < 2 {
            return;
        }
        let mut calls: Vec<Option<NodeId>> = terms
            .terms
            .iter()
            .filter(|t| tree.kind(**t) == BINARY_EXPR)
            .flat_map(|t| [left_operand(tree, *t), right_operand(tree, *t)])
            .flatten()
            .filter(|c| tree.kind(*c).is_call())
            .map(Some)
            .collect();

        for outer in 0..calls.len() {
            let Some(expression) = calls[outer].take() else { continue };
            for slot in calls.iter_mut() {
                if let Some(candidate) = *slot {
                    if are_equivalent(tree, candidate, expression) {
                        report(tree, sink, candidate, MESSAGE_DUPLICATE_CALL, Severity::Warning);
                        *slot = None;
                    }
                }
            }
        }
    }

    fn negated_isset(tree: &Tree, term: NodeId) -> Option<NodeId> {
        if tree.kind(term) != UNARY_EXPR || operator_kind(tree, term) != Some(BANG) {
            return None;
        }
        let inner = unparenthesized(tree, operand(tree, term)?);
        (tree.kind(inner) == ISSET_EXPR).then_some(inner)
    }

    fn check_multiple_isset(tree: &Tree, terms: &Terms, sink: &mut dyn Reporter) {
        if terms.is_conjunction() {
            let issets = terms.terms.iter().copied().filter(|t| tree.kind(*t) == ISSET_EXPR);
            for later in issets.skip(1) {
                report(tree, sink, later, MESSAGE_ISSET_AND, Severity::Warning);
            }
        } else if terms.is_disjunction() {
            let issets = terms.terms.iter().filter_map(|t| negated_isset(tree, *t));
            for later in issets.skip(1) {
                report(tree, sink, later, MESSAGE_ISSET_OR, Severity::Warning);
            }
        }
    }

    fn is_instanceof(tree: &Tree, term: NodeId) -> bool {
        tree.kind(term) == BINARY_EXPR && operator_kind(tree, term) == Some(INSTANCEOF_KW)
    }

    /// `$a instanceof Foo && $a === $b`: a type test combined with an
    /// identity test on the same subject.
    fn check_instanceof_complementarity(tree: &Tree, terms: &Terms, sink: &mut dyn Reporter) {
        if !terms.is_conjunction() || terms.terms.len() < 2 {
            return;
        }
        let Some(subject) = terms
            .terms
            .iter()
            .find(|t| is_instanceof(tree, **t))
            .and_then(|t| left_operand(tree, *t))
        else {
            return;
        };

        for &term in &terms.terms {
            if tree.kind(term) != BINARY_EXPR || !operator_kind(tree, term).is_some_and(|op| op.is_equality_op()) {
                continue;
            }
            let (Some(left), Some(right)) = (left_operand(tree, term), right_operand(tree, term)) else { continue };
            if are_equivalent(tree, subject, left) || are_equivalent(tree, subject, right) {
                report(tree, sink, term, MESSAGE_COMPLEMENTARY, Severity::WeakWarning);
            }
        }
    }

    /// Among `instanceof` tests of one subject, a test whose class already
    /// inherits from another tested class is redundant.
    fn check_ambiguous_instanceof(ctx: &RuleContext<'_>, terms: &Terms, sink: &mut dyn Reporter) {
        let tree = ctx.tree;
        if terms.terms.len() < 2 {
            return;
        }
        let tests: Vec<NodeId> = terms.terms.iter().copied().filter(|t| is_instanceof(tree, *t)).collect();
        if tests.len() < 2 {
            return;
        }

        let mut groups: Vec<(NodeId, Vec<(NodeId, String)>)> = Vec::new();
        for test in tests {
            let (Some(subject), Some(class_ref)) = (left_operand(tree, test), right_operand(tree, test)) else {
                continue;
            };
            if tree.kind(class_ref) != NAME_REF {
                continue;
            }
            let Some(class) = ctx.hierarchy.resolve(&tree.text_of(class_ref)) else { continue };
            match groups.iter_mut().find(|(known, _)| are_equivalent(tree, *known, subject)) {
                Some((_, members)) => members.push((test, class)),
                None => groups.push((subject, vec![(test, class)])),
            }
        }

        for (_, members) in groups.iter().filter(|(_, m)| m.len() > 1) {
            for (test, class) in members {
                let Some(parents) = ctx.hierarchy.ancestors(class) else { continue };
                let redundant = members
                    .iter()
                    .any(|(other, other_class)| other != test && parents.contains(other_class));
                if redundant {
                    report(tree, sink, *test, MESSAGE_AMBIGUOUS, Severity::WeakWarning);
                }
            }
        }
    }

    fn is_keyword_literal(tree: &Tree, node: NodeId, kinds: &[SyntaxKind]) -> bool {
        literal_token(tree, node).is_some_and(|t| kinds.contains(&tree.kind(t)))
    }

    /// `isset($a) && $a !== null`: the comparison repeats what `isset` checks.
    fn check_isset_null_comparison(tree: &Tree, terms: &Terms, sink: &mut dyn Reporter) {
        let checked: Vec<NodeId> = terms
            .terms
            .iter()
            .filter(|t| tree.kind(**t) == ISSET_EXPR)
            .flat_map(|t| arguments(tree, *t))
            .collect();
        if checked.is_empty() {
            return;
        }

        for &term in &terms.terms {
            if tree.kind(term) != BINARY_EXPR || !operator_kind(tree, term).is_some_and(|op| op.is_equality_op()) {
                continue;
            }
            let (Some(left), Some(right)) = (left_operand(tree, term), right_operand(tree, term)) else { continue };
            let compared = if is_keyword_literal(tree, right, &[NULL_KW]) {
                left
            } else if is_keyword_literal(tree, left, &[NULL_KW]) {
                right
            } else {
                continue;
            };
            if checked.iter().any(|arg| are_equivalent(tree, *arg, compared)) {
                report(tree, sink, term, MESSAGE_NULL_COMPARISON, Severity::Warning);
            }
        }
    }

    /// `and`/`or` anywhere in the condition, reported on the operator.
    fn check_literal_operators(tree: &Tree, cond: NodeId, sink: &mut dyn Reporter) {
        for node in tree.descendants(cond).filter(|n| tree.kind(*n) == BINARY_EXPR) {
            let Some(op) = operator(tree, node) else { continue };
            match tree.kind(op) {
                AND_KW => report(tree, sink, op, MESSAGE_USE_AND, Severity::Warning),
                OR_KW => report(tree, sink, op, MESSAGE_USE_OR, Severity::Warning),
                _ => {}
            }
        }
    }

    /// Terms of enclosing `if` and `elseif` conditions, innermost first.
    /// The walk stops at the nearest function, method or closure boundary.
    fn parent_conditions(tree: &Tree, if_stmt: NodeId) -> Vec<NodeId> {
        let mut collected = Vec::new();
        let scope = tree
            .ancestors(if_stmt)
            .take_while(|a| !tree.kind(*a).is_function_like() && tree.kind(*a) != SOURCE_FILE);
        for ancestor in scope.filter(|a| tree.kind(*a) == IF_STMT) {
            let branches = std::iter::once(ancestor).chain(else_if_clauses(tree, ancestor));
            for cond in branches.filter_map(|b| condition(tree, b)) {
                collected.extend(split_conditions(tree, cond).terms);
            }
        }
        collected
    }

    /// Variables, constants and fields (possibly negated or compared to a
    /// boolean) repeat legitimately and are never reported as duplicates.
    fn is_bare_check(tree: &Tree, term: NodeId) -> bool {
        let mut candidate = term;
        if tree.kind(candidate) == UNARY_EXPR && operator_kind(tree, candidate) == Some(BANG) {
            match operand(tree, candidate) {
                Some(inner) => candidate = unparenthesized(tree, inner),
                None => return true,
            }
        }
        if tree.kind(candidate) == BINARY_EXPR {
            if let (Some(left), Some(right)) = (left_operand(tree, candidate), right_operand(tree, candidate)) {
                if is_keyword_literal(tree, right, &[TRUE_KW, FALSE_KW]) {
                    candidate = left;
                } else if is_keyword_literal(tree, left, &[TRUE_KW, FALSE_KW]) {
                    candidate = right;
                }
            }
        }
        matches!(tree.kind(candidate), VARIABLE | NAME_REF | LITERAL | PROPERTY_FETCH | STATIC_PROPERTY_FETCH)
    }

    fn check_duplicated_conditions(tree: &Tree, if_stmt: NodeId, terms: Vec<NodeId>, sink: &mut dyn Reporter) {
        let mut own: Vec<Option<NodeId>> = terms.into_iter().map(Some).collect();
        let mut parents: Vec<Option<NodeId>> = parent_conditions(tree, if_stmt).into_iter().map(Some).collect();

        for outer in 0..own.len() {
            let Some(expression) = own[outer].take() else { continue };
            if is_bare_check(tree, expression) {
                continue;
            }

            for slot in own.iter_mut() {
                if let Some(candidate) = *slot {
                    if are_equivalent(tree, candidate, expression) {
                        report(tree, sink, candidate, MESSAGE_DUPLICATE_CONDITION, Severity::Warning);
                        *slot = None;
                    }
                }
            }

            for slot in parents.iter_mut() {
                if let Some(candidate) = *slot {
                    if are_equivalent(tree, candidate, expression) {
                        report(tree, sink, expression, MESSAGE_DUPLICATE_CONDITION, Severity::Warning);
                        *slot = None;
                    }
                }
            }
        }
    }
}
