// Copyright (C) Brian G. Milnes 2025

//! Pattern rules
//!
//! Each rule declares the node kinds it is interested in and is invoked once
//! per matching node of a walk. Rules never fail: a node without the
//! expected shape simply produces no match.

pub mod cascade_replace;
pub mod if_conditions;
pub mod loop_accumulation;
pub mod unused_mock;

use std::collections::HashSet;
use crate::cost::cost::CouplingCheck;
use crate::diagnostics::diagnostics::Reporter;
use crate::hierarchy::hierarchy::ClassHierarchy;
use crate::options::options::Options;
use crate::syntax_kind::syntax_kind::SyntaxKind;
use crate::tree::tree::{NodeId, Tree};

pub use cascade_replace::cascade_replace::CascadeStringReplacement;
pub use if_conditions::if_conditions::NotOptimalIfConditions;
pub use loop_accumulation::loop_accumulation::SlowArrayOperationsInLoop;
pub use unused_mock::unused_mock::UnusedMock;

/// Everything a rule may consult while checking one node.
pub struct RuleContext<'a> {
    pub tree: &'a Tree,
    pub options: &'a Options,
    pub hierarchy: &'a dyn ClassHierarchy,
    pub coupling: &'a dyn CouplingCheck,
    pub cheap_functions: &'a HashSet<String>,
}

pub trait Rule: Send + Sync {
    /// Stable identifier used in reports and in `disabled_rules`.
    fn id(&self) -> &'static str;

    /// Node kinds this rule is invoked on.
    fn interests(&self) -> &'static [SyntaxKind];

    fn check(&self, ctx: &RuleContext<'_>, node: NodeId, sink: &mut dyn Reporter);
}

/// The four shipped rules, in reporting order.
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(SlowArrayOperationsInLoop),
        Box::new(CascadeStringReplacement),
        Box::new(NotOptimalIfConditions),
        Box::new(UnusedMock),
    ]
}
