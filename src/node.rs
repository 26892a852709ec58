//! Arena of trie nodes linked first-child / next-sibling.
//!
//! A parent owns its whole child chain; `next_sibling` is only a structural
//! link. Nodes are never freed, so a [`NodeId`] stays valid for the lifetime
//! of the arena.

use std::ops::{Index, IndexMut};

use crate::store::{SubstrRef, WordId};

/// Index of a node in the [`NodeArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The synthetic, unlabeled root.
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    /// Edge label; `None` only on the root.
    pub label: Option<SubstrRef>,
    pub first_child: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    /// Set when an indexed word ends exactly at this node.
    pub word: Option<WordId>,
}

impl Node {
    /// A childless node ending `word`.
    pub fn leaf(label: SubstrRef, word: WordId) -> Self {
        Self {
            label: Some(label),
            first_child: None,
            next_sibling: None,
            word: Some(word),
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.first_child.is_none()
    }
}

#[derive(Clone)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::with_capacity(1)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(Node {
            label: None,
            first_child: None,
            next_sibling: None,
            word: None,
        });
        Self { nodes }
    }

    pub fn push(&mut self, node: Node) -> NodeId {
        let idx = self.nodes.len();
        assert!(idx <= u32::MAX as usize, "node arena overflow");
        self.nodes.push(node);
        NodeId(idx as u32)
    }

    /// Number of nodes, root included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self[id].first_child
    }

    #[inline]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self[id].next_sibling
    }

    /// Walks the sibling chain under `parent`.
    pub fn children(&self, parent: NodeId) -> Children<'_> {
        Children {
            arena: self,
            next: self.first_child(parent),
        }
    }

    pub fn last_child(&self, parent: NodeId) -> Option<NodeId> {
        self.children(parent).last()
    }

    pub fn heap_bytes(&self) -> usize {
        self.nodes.capacity() * std::mem::size_of::<Node>()
    }

    pub fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
    }
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<NodeId> for NodeArena {
    type Output = Node;

    #[inline]
    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

impl IndexMut<NodeId> for NodeArena {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }
}

/// Iterator over one sibling chain.
#[derive(Clone)]
pub struct Children<'a> {
    arena: &'a NodeArena,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    #[inline]
    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.arena.next_sibling(id);
        Some(id)
    }
}
