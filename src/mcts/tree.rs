//! Arena-based search tree.
//!
//! Uses a flat `Vec<SearchNode>` with index-based references. A fresh tree is
//! built by every oracle call and handed back read-only for introspection.

use serde::{Deserialize, Serialize};

use super::node::{NodeId, SearchNode};
use super::view::NodeView;
use crate::core::Move;

/// Arena-based search tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,

    /// Nodes that still have untried moves.
    open: usize,
}

impl SearchTree {
    /// Create a tree holding only `root`.
    pub fn new(root: SearchNode) -> Self {
        let mut tree = Self {
            nodes: Vec::with_capacity(1024),
            open: 0,
        };
        tree.alloc(root);
        tree
    }

    /// The root node ID (always 0).
    #[inline]
    #[must_use]
    pub fn root_id(&self) -> NodeId {
        NodeId::new(0)
    }

    /// Read-only view of the root.
    #[must_use]
    pub fn root(&self) -> NodeView<'_> {
        NodeView::new(self, self.root_id())
    }

    /// Read-only view of any node.
    #[must_use]
    pub fn view(&self, id: NodeId) -> Option<NodeView<'_>> {
        ((id.raw() as usize) < self.nodes.len()).then(|| NodeView::new(self, id))
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a node, returning its ID.
    pub(crate) fn alloc(&mut self, node: SearchNode) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        if !node.untried.is_empty() {
            self.open += 1;
        }
        self.nodes.push(node);
        id
    }

    /// Take one untried move out of `id`, by position.
    pub(crate) fn take_untried(&mut self, id: NodeId, index: usize) -> Move {
        let node = self.get_mut(id);
        let mv = node.untried.swap_remove(index);
        if node.untried.is_empty() {
            self.open -= 1;
        }
        mv
    }

    /// Link an allocated child under its parent.
    pub(crate) fn attach(&mut self, parent: NodeId, child: SearchNode) -> NodeId {
        let id = self.alloc(child);
        self.get_mut(parent).children.push(id);
        id
    }

    /// Whether every reachable state already has a node.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.open == 0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SearchNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i as u32), n))
    }

    /// Get statistics about the tree.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        TreeStats {
            node_count: self.nodes.len(),
            max_depth: self.nodes.iter().map(|n| n.depth).max().unwrap_or(0),
            terminal_count: self.nodes.iter().filter(|n| n.is_terminal()).count(),
            open_count: self.open,
        }
    }
}

/// Shape statistics for a search tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    pub node_count: usize,
    pub max_depth: u16,
    pub terminal_count: usize,
    /// Nodes with moves left to expand.
    pub open_count: usize,
}
