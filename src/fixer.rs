// Copyright (C) Brian G. Milnes 2025

//! Fixer module for rewriting PHP trees
//!
//! A `Fix` is planned against the tree as it is now: every replacement text
//! is computed before anything changes. The plan is then applied to a staged
//! copy of the arena, which replaces the live tree only when every edit
//! succeeded. A failed fix leaves the tree exactly as it was.

pub mod fixer {
    use std::sync::{RwLock, RwLockReadGuard};
    use thiserror::Error;
    use crate::analyzer::analyzer::Analyzer;
    use crate::hierarchy::hierarchy::TreeHierarchy;
    use crate::options::options::Options;
    use crate::parser::parser::{parse_fragment, FragmentKind, ParseError};
    use crate::rules::cascade_replace::cascade_replace::{plan_merge, plan_simplify};
    use crate::tree::tree::{Handle, NodeId, StructureError, Tree};

    /// Upper bound on scan/apply rounds in `fix_all`.
    pub const MAX_FIX_ROUNDS: usize = 8;

    #[derive(Debug, Error)]
    pub enum EditError {
        #[error("node {node:?} was changed or removed after the match was reported")]
        Invalidated { node: NodeId },
        #[error("cannot apply fix: {reason}")]
        Malformed { reason: String },
        #[error(transparent)]
        Parse(#[from] ParseError),
        #[error(transparent)]
        Structure(#[from] StructureError),
        #[error("document lock poisoned by a panicking writer")]
        Poisoned,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Fix {
        /// Fold `eliminate` into `patch` and drop the statement that held
        /// `eliminate`, if any.
        MergeReplaceCalls { patch: Handle, eliminate: Handle, short_arrays: bool },
        /// Replace a search array by the one literal it repeats.
        SimplifySearchArgument { array: Handle, replacement: String },
    }

    impl Fix {
        pub fn name(&self) -> &'static str {
            match self {
                Fix::MergeReplaceCalls { .. } => "Merge str_replace(...) calls",
                Fix::SimplifySearchArgument { .. } => "Simplify this argument",
            }
        }

        pub fn handles(&self) -> Vec<Handle> {
            match self {
                Fix::MergeReplaceCalls { patch, eliminate, .. } => vec![*patch, *eliminate],
                Fix::SimplifySearchArgument { array, .. } => vec![*array],
            }
        }

        /// Validate the captured handles and compute the edits.
        pub fn plan(&self, tree: &Tree) -> Result<EditPlan, EditError> {
            if let Some(stale) = self.handles().into_iter().find(|h| !tree.is_valid(*h)) {
                return Err(EditError::Invalidated { node: stale.id });
            }
            let edits = match self {
                Fix::MergeReplaceCalls { patch, eliminate, short_arrays } => {
                    plan_merge(tree, patch.id, eliminate.id, *short_arrays)?
                }
                Fix::SimplifySearchArgument { array, replacement } => plan_simplify(tree, array.id, replacement)?,
            };
            Ok(EditPlan { name: self.name(), edits })
        }
    }

    /// One structural edit. Fragment text is parsed back into nodes when
    /// the edit is applied.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Edit {
        InsertSibling { anchor: NodeId, after: bool, kind: FragmentKind, text: String },
        Replace { target: NodeId, kind: FragmentKind, text: String },
        Delete { target: NodeId },
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct EditPlan {
        pub name: &'static str,
        pub edits: Vec<Edit>,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct AppliedFix {
        pub name: &'static str,
        pub edits: usize,
    }

    fn ensure_attached(tree: &Tree, node: NodeId) -> Result<(), EditError> {
        if node.index() >= tree.arena_len() || !tree.is_attached(node) {
            return Err(EditError::Invalidated { node });
        }
        Ok(())
    }

    fn graft_fragment(tree: &mut Tree, text: &str, kind: FragmentKind) -> Result<NodeId, EditError> {
        let fragment = parse_fragment(text, kind)?;
        Ok(tree.graft(&fragment.tree, fragment.node))
    }

    fn apply_edit(tree: &mut Tree, edit: &Edit) -> Result<(), EditError> {
        match edit {
            Edit::InsertSibling { anchor, after, kind, text } => {
                ensure_attached(tree, *anchor)?;
                let parent = tree.parent(*anchor).ok_or(StructureError::IsRoot(*anchor))?;
                let index = tree.index_in_parent(*anchor) + usize::from(*after);
                let node = graft_fragment(tree, text, *kind)?;
                tree.insert_child(parent, index, node)?;
            }
            Edit::Replace { target, kind, text } => {
                ensure_attached(tree, *target)?;
                let node = graft_fragment(tree, text, *kind)?;
                tree.replace(*target, node)?;
            }
            Edit::Delete { target } => {
                ensure_attached(tree, *target)?;
                tree.remove(*target)?;
            }
        }
        Ok(())
    }

    /// Apply every edit of `plan` or none of them.
    pub fn apply_plan(tree: &mut Tree, plan: &EditPlan) -> Result<AppliedFix, EditError> {
        let mut staged = tree.clone();
        for edit in &plan.edits {
            apply_edit(&mut staged, edit)?;
        }
        staged.check_integrity().map_err(|reason| EditError::Malformed { reason })?;
        *tree = staged;
        Ok(AppliedFix { name: plan.name, edits: plan.edits.len() })
    }

    pub fn apply_fix(tree: &mut Tree, fix: &Fix) -> Result<AppliedFix, EditError> {
        let plan = fix.plan(tree)?;
        apply_plan(tree, &plan)
    }

    /// Apply fixes in order. A fix whose nodes were touched by an earlier
    /// one fails on its own; the others still apply.
    pub fn apply_all(tree: &mut Tree, fixes: &[Fix]) -> Vec<Result<AppliedFix, EditError>> {
        fixes.iter().map(|fix| apply_fix(tree, fix)).collect()
    }

    /// Scan and fix until nothing fixable is left or the round limit is hit.
    pub fn fix_all(tree: &mut Tree, options: &Options) -> Vec<AppliedFix> {
        let analyzer = Analyzer::new(options.clone());
        let mut applied = Vec::new();
        for _ in 0..MAX_FIX_ROUNDS {
            let hierarchy = TreeHierarchy::from_tree(tree);
            let fixes: Vec<Fix> = analyzer.scan(tree, &hierarchy).filter_map(|m| m.fix).collect();
            if fixes.is_empty() {
                break;
            }
            let before = applied.len();
            applied.extend(apply_all(tree, &fixes).into_iter().flatten());
            if applied.len() == before {
                break;
            }
        }
        applied
    }

    /// A tree shared between readers that scan it and one writer at a time
    /// that fixes it.
    #[derive(Debug)]
    pub struct Document {
        tree: RwLock<Tree>,
    }

    impl Document {
        pub fn new(tree: Tree) -> Self {
            Document { tree: RwLock::new(tree) }
        }

        pub fn read(&self) -> Result<RwLockReadGuard<'_, Tree>, EditError> {
            self.tree.read().map_err(|_| EditError::Poisoned)
        }

        pub fn apply_fix(&self, fix: &Fix) -> Result<AppliedFix, EditError> {
            let mut tree = self.tree.write().map_err(|_| EditError::Poisoned)?;
            apply_fix(&mut tree, fix)
        }

        /// The whole batch runs under one write lock.
        pub fn apply_all(&self, fixes: &[Fix]) -> Result<Vec<Result<AppliedFix, EditError>>, EditError> {
            let mut tree = self.tree.write().map_err(|_| EditError::Poisoned)?;
            Ok(apply_all(&mut tree, fixes))
        }

        pub fn text(&self) -> Result<String, EditError> {
            Ok(self.read()?.text())
        }

        pub fn into_inner(self) -> Result<Tree, EditError> {
            self.tree.into_inner().map_err(|_| EditError::Poisoned)
        }
    }
}
