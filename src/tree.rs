// Copyright (C) Brian G. Milnes 2025

//! Arena-backed syntax tree
//!
//! Nodes are addressed by stable `NodeId` indices. Parent links, child order
//! and sibling positions are plain index fields that the structural edit
//! primitives keep consistent; there are no pointers to invalidate.
//!
//! The tree is lossless: tokens (trivia included) are leaves and the text of
//! any node is the concatenation of its leaves.

pub mod tree {
    use std::fmt::Write as _;
    use serde::Serialize;
    use thiserror::Error;
    use crate::syntax_kind::syntax_kind::SyntaxKind;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
    pub struct NodeId(u32);

    impl NodeId {
        pub fn index(self) -> usize {
            self.0 as usize
        }
    }

    /// A node id together with the version observed when it was captured.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Handle {
        pub id: NodeId,
        pub version: u32,
    }

    #[derive(Debug, Error, PartialEq, Eq)]
    pub enum StructureError {
        #[error("node {0:?} is not attached to the tree")]
        NotAttached(NodeId),
        #[error("node {0:?} is the root and cannot be moved")]
        IsRoot(NodeId),
        #[error("node {0:?} already has a parent")]
        AlreadyAttached(NodeId),
        #[error("child index {index} out of bounds for node {parent:?}")]
        OutOfBounds { parent: NodeId, index: usize },
    }

    #[derive(Debug, Clone)]
    struct NodeData {
        kind: SyntaxKind,
        text: Option<String>,
        parent: Option<NodeId>,
        children: Vec<NodeId>,
        index_in_parent: usize,
        version: u32,
        attached: bool,
    }

    #[derive(Debug, Clone)]
    pub struct Tree {
        nodes: Vec<NodeData>,
        root: NodeId,
    }

    impl Tree {
        pub fn root(&self) -> NodeId {
            self.root
        }

        /// Number of arena slots, detached nodes included.
        pub fn arena_len(&self) -> usize {
            self.nodes.len()
        }

        fn data(&self, id: NodeId) -> &NodeData {
            &self.nodes[id.index()]
        }

        fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
            &mut self.nodes[id.index()]
        }

        pub fn kind(&self, id: NodeId) -> SyntaxKind {
            self.data(id).kind
        }

        pub fn is_token(&self, id: NodeId) -> bool {
            self.data(id).text.is_some()
        }

        pub fn is_trivia(&self, id: NodeId) -> bool {
            self.kind(id).is_trivia()
        }

        /// Text of a token leaf; `None` for composite nodes.
        pub fn token_text(&self, id: NodeId) -> Option<&str> {
            self.data(id).text.as_deref()
        }

        pub fn parent(&self, id: NodeId) -> Option<NodeId> {
            self.data(id).parent
        }

        pub fn children(&self, id: NodeId) -> &[NodeId] {
            &self.data(id).children
        }

        /// Children that are not whitespace or comments.
        pub fn non_trivia_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
            self.children(id).iter().copied().filter(move |c| !self.is_trivia(*c))
        }

        /// Composite children only (no tokens at all).
        pub fn child_nodes(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
            self.children(id).iter().copied().filter(move |c| !self.is_token(*c))
        }

        pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
            let data = self.data(id);
            let parent = data.parent?;
            self.children(parent).get(data.index_in_parent + 1).copied()
        }

        pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
            let data = self.data(id);
            let parent = data.parent?;
            let index = data.index_in_parent.checked_sub(1)?;
            self.children(parent).get(index).copied()
        }

        pub fn index_in_parent(&self, id: NodeId) -> usize {
            self.data(id).index_in_parent
        }

        pub fn version(&self, id: NodeId) -> u32 {
            self.data(id).version
        }

        pub fn is_attached(&self, id: NodeId) -> bool {
            id.index() < self.nodes.len() && self.data(id).attached
        }

        pub fn handle(&self, id: NodeId) -> Handle {
            Handle { id, version: self.version(id) }
        }

        /// A handle is valid while its node is attached and unchanged.
        pub fn is_valid(&self, handle: Handle) -> bool {
            self.is_attached(handle.id) && self.version(handle.id) == handle.version
        }

        pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
            Ancestors { tree: self, next: self.parent(id) }
        }

        /// Depth-first pre-order walk of the subtree rooted at `id`.
        pub fn preorder(&self, id: NodeId) -> Preorder<'_> {
            Preorder { tree: self, stack: vec![id] }
        }

        /// Composite nodes of the subtree in pre-order, tokens skipped.
        pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
            self.preorder(id).filter(move |n| !self.is_token(*n))
        }

        pub fn text_of(&self, id: NodeId) -> String {
            let mut out = String::new();
            self.write_text(id, &mut out);
            out
        }

        pub fn write_text(&self, id: NodeId, out: &mut String) {
            for node in self.preorder(id) {
                if let Some(text) = self.token_text(node) {
                    out.push_str(text);
                }
            }
        }

        pub fn text_len(&self, id: NodeId) -> usize {
            self.preorder(id).filter_map(|n| self.token_text(n)).map(str::len).sum()
        }

        /// Source text of the whole tree.
        pub fn text(&self) -> String {
            self.text_of(self.root)
        }

        /// Byte offset of the start of `id` in the rendered tree text.
        pub fn offset_of(&self, id: NodeId) -> usize {
            let mut offset = 0;
            let mut current = id;
            while let Some(parent) = self.parent(current) {
                let index = self.index_in_parent(current);
                offset += self.children(parent)[..index].iter().map(|c| self.text_len(*c)).sum::<usize>();
                current = parent;
            }
            offset
        }

        /// 1-based line and column of the first character of `id`.
        pub fn line_col(&self, id: NodeId) -> (usize, usize) {
            let offset = self.offset_of(id);
            let text = self.text();
            let before = &text[..offset.min(text.len())];
            let line = before.matches('\n').count() + 1;
            let column = before.rsplit('\n').next().map(|l| l.chars().count()).unwrap_or(0) + 1;
            (line, column)
        }

        /// Verify the parent/child/sibling invariant over the attached tree.
        pub fn check_integrity(&self) -> Result<(), String> {
            if self.parent(self.root).is_some() {
                return Err("root has a parent".to_string());
            }
            for node in self.preorder(self.root) {
                if !self.is_attached(node) {
                    return Err(format!("{node:?} reachable from root but detached"));
                }
                for (index, child) in self.children(node).iter().enumerate() {
                    let data = self.data(*child);
                    if data.parent != Some(node) {
                        return Err(format!("{child:?} has wrong parent"));
                    }
                    if data.index_in_parent != index {
                        return Err(format!("{child:?} has stale sibling index"));
                    }
                    if self.children(node).iter().filter(|c| *c == child).count() != 1 {
                        return Err(format!("{child:?} registered twice under {node:?}"));
                    }
                }
                if self.is_token(node) && !self.children(node).is_empty() {
                    return Err(format!("token {node:?} has children"));
                }
            }
            Ok(())
        }

        /// Indented `KIND@start..end` dump, tokens shown with their text.
        pub fn debug_dump(&self) -> String {
            let mut out = String::new();
            self.dump_node(self.root, 0, 0, &mut out);
            out
        }

        fn dump_node(&self, id: NodeId, depth: usize, start: usize, out: &mut String) -> usize {
            let len = self.text_len(id);
            let indent = "  ".repeat(depth);
            match self.token_text(id) {
                Some(text) => {
                    let _ = writeln!(out, "{indent}{:?}@{}..{} {:?}", self.kind(id), start, start + len, text);
                }
                None => {
                    let _ = writeln!(out, "{indent}{:?}@{}..{}", self.kind(id), start, start + len);
                    let mut offset = start;
                    for child in self.children(id) {
                        offset = self.dump_node(*child, depth + 1, offset, out);
                    }
                }
            }
            start + len
        }

        // ---------------------------------------------------------------
        // Structural edit primitives
        // ---------------------------------------------------------------

        /// Copy the subtree `root` of `other` into this arena, detached.
        pub fn graft(&mut self, other: &Tree, root: NodeId) -> NodeId {
            let data = other.data(root);
            let children: Vec<NodeId> = data.children.iter().map(|c| self.graft(other, *c)).collect();
            let id = self.alloc(data.kind, data.text.clone(), children);
            self.data_mut(id).attached = false;
            id
        }

        /// Insert a detached subtree as child number `index` of `parent`.
        pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<(), StructureError> {
            if !self.is_attached(parent) {
                return Err(StructureError::NotAttached(parent));
            }
            if child == self.root {
                return Err(StructureError::IsRoot(child));
            }
            if self.data(child).parent.is_some() || self.data(child).attached {
                return Err(StructureError::AlreadyAttached(child));
            }
            if index > self.children(parent).len() {
                return Err(StructureError::OutOfBounds { parent, index });
            }
            self.data_mut(parent).children.insert(index, child);
            self.data_mut(child).parent = Some(parent);
            self.reindex(parent);
            self.set_attached(child, true);
            self.bump(parent);
            Ok(())
        }

        /// Unlink `node` from its parent; the subtree becomes detached.
        pub fn remove(&mut self, node: NodeId) -> Result<usize, StructureError> {
            if node == self.root {
                return Err(StructureError::IsRoot(node));
            }
            if !self.is_attached(node) {
                return Err(StructureError::NotAttached(node));
            }
            let parent = self.parent(node).ok_or(StructureError::NotAttached(node))?;
            let index = self.index_in_parent(node);
            self.data_mut(parent).children.remove(index);
            self.data_mut(node).parent = None;
            self.reindex(parent);
            self.set_attached(node, false);
            self.bump(parent);
            Ok(index)
        }

        /// Put the detached subtree `replacement` where `old` was.
        pub fn replace(&mut self, old: NodeId, replacement: NodeId) -> Result<(), StructureError> {
            if self.data(replacement).attached {
                return Err(StructureError::AlreadyAttached(replacement));
            }
            let parent = self.parent(old).ok_or(StructureError::IsRoot(old))?;
            let index = self.remove(old)?;
            self.insert_child(parent, index, replacement)
        }

        fn reindex(&mut self, parent: NodeId) {
            let children = self.data(parent).children.clone();
            for (index, child) in children.into_iter().enumerate() {
                self.data_mut(child).index_in_parent = index;
            }
        }

        fn set_attached(&mut self, root: NodeId, attached: bool) {
            let mut stack = vec![root];
            while let Some(id) = stack.pop() {
                let data = self.data_mut(id);
                data.attached = attached;
                data.version += 1;
                stack.extend(data.children.iter().copied());
            }
        }

        /// Bump the version of `id` and every ancestor.
        fn bump(&mut self, id: NodeId) {
            let mut current = Some(id);
            while let Some(node) = current {
                let data = self.data_mut(node);
                data.version += 1;
                current = data.parent;
            }
        }

        fn alloc(&mut self, kind: SyntaxKind, text: Option<String>, children: Vec<NodeId>) -> NodeId {
            let id = NodeId(self.nodes.len() as u32);
            for (index, child) in children.iter().enumerate() {
                let data = self.data_mut(*child);
                data.parent = Some(id);
                data.index_in_parent = index;
            }
            self.nodes.push(NodeData {
                kind,
                text,
                parent: None,
                children,
                index_in_parent: 0,
                version: 0,
                attached: true,
            });
            id
        }
    }

    pub struct Ancestors<'a> {
        tree: &'a Tree,
        next: Option<NodeId>,
    }

    impl Iterator for Ancestors<'_> {
        type Item = NodeId;

        fn next(&mut self) -> Option<NodeId> {
            let current = self.next?;
            self.next = self.tree.parent(current);
            Some(current)
        }
    }

    pub struct Preorder<'a> {
        tree: &'a Tree,
        stack: Vec<NodeId>,
    }

    impl Iterator for Preorder<'_> {
        type Item = NodeId;

        fn next(&mut self) -> Option<NodeId> {
            let current = self.stack.pop()?;
            self.stack.extend(self.tree.children(current).iter().rev().copied());
            Some(current)
        }
    }

    #[derive(Debug, Clone, Copy)]
    pub struct Checkpoint(usize);

    /// Bottom-up tree construction with the same protocol as rowan's
    /// `GreenNodeBuilder`.
    #[derive(Debug, Default)]
    pub struct TreeBuilder {
        nodes: Vec<NodeData>,
        stack: Vec<(SyntaxKind, Vec<NodeId>)>,
        last_finished: Option<NodeId>,
    }

    impl TreeBuilder {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn start_node(&mut self, kind: SyntaxKind) {
            self.stack.push((kind, Vec::new()));
        }

        pub fn token(&mut self, kind: SyntaxKind, text: &str) {
            let id = self.alloc(kind, Some(text.to_string()), Vec::new());
            if let Some((_, children)) = self.stack.last_mut() {
                children.push(id);
            }
        }

        pub fn checkpoint(&self) -> Checkpoint {
            Checkpoint(self.stack.last().map(|(_, c)| c.len()).unwrap_or(0))
        }

        /// Open a node that adopts everything emitted since `checkpoint`.
        pub fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
            let adopted = match self.stack.last_mut() {
                Some((_, children)) if checkpoint.0 <= children.len() => children.split_off(checkpoint.0),
                _ => Vec::new(),
            };
            self.stack.push((kind, adopted));
        }

        pub fn finish_node(&mut self) {
            if let Some((kind, children)) = self.stack.pop() {
                let id = self.alloc(kind, None, children);
                match self.stack.last_mut() {
                    Some((_, siblings)) => siblings.push(id),
                    None => self.last_finished = Some(id),
                }
            }
        }

        /// Close any open nodes and return the finished tree.
        pub fn finish(mut self) -> Tree {
            while !self.stack.is_empty() {
                self.finish_node();
            }
            let root = match self.last_finished {
                Some(root) => root,
                None => {
                    self.start_node(SyntaxKind::SOURCE_FILE);
                    self.finish_node();
                    self.last_finished.unwrap_or(NodeId(0))
                }
            };
            Tree { nodes: self.nodes, root }
        }

        fn alloc(&mut self, kind: SyntaxKind, text: Option<String>, children: Vec<NodeId>) -> NodeId {
            let id = NodeId(self.nodes.len() as u32);
            for (index, child) in children.iter().enumerate() {
                let data = &mut self.nodes[child.index()];
                data.parent = Some(id);
                data.index_in_parent = index;
            }
            self.nodes.push(NodeData {
                kind,
                text,
                parent: None,
                children,
                index_in_parent: 0,
                version: 0,
                attached: true,
            });
            id
        }
    }
}
