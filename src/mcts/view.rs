//! Read-only introspection of a finished search.

use serde::{Deserialize, Serialize};

use super::node::{NodeId, SearchNode};
use super::tree::SearchTree;
use crate::core::{Move, Team, TeamMap};

/// Borrowed view of one node in a `SearchTree`.
#[derive(Clone, Copy, Debug)]
pub struct NodeView<'a> {
    tree: &'a SearchTree,
    id: NodeId,
}

impl<'a> NodeView<'a> {
    pub(crate) fn new(tree: &'a SearchTree, id: NodeId) -> Self {
        Self { tree, id }
    }

    fn node(&self) -> &'a SearchNode {
        self.tree.get(self.id)
    }

    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Move that led here (None for the root).
    #[must_use]
    pub fn mv(&self) -> Option<&'a Move> {
        self.node().mv.as_ref()
    }

    /// Label of the state at this node.
    #[must_use]
    pub fn label(&self) -> &'a str {
        &self.node().label
    }

    #[must_use]
    pub fn to_move(&self) -> Team {
        self.node().to_move
    }

    #[must_use]
    pub fn visits(&self) -> u32 {
        self.node().visits
    }

    /// Accumulated reward per team.
    #[must_use]
    pub fn reward_by_team(&self) -> TeamMap<f64> {
        self.node().reward_by_team
    }

    #[must_use]
    pub fn mean_reward(&self, team: Team) -> f64 {
        self.node().mean_reward(team)
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.node().is_terminal()
    }

    /// Expanded children in expansion order.
    pub fn children(&self) -> impl Iterator<Item = NodeView<'a>> + 'a {
        let tree = self.tree;
        self.node().children.iter().map(move |&id| NodeView::new(tree, id))
    }

    /// Expanded children, most visited first.
    #[must_use]
    pub fn children_by_visits(&self) -> Vec<NodeView<'a>> {
        let mut children: Vec<_> = self.children().collect();
        children.sort_by(|a, b| b.visits().cmp(&a.visits()));
        children
    }

    /// Child reached by `mv`, if it was expanded.
    #[must_use]
    pub fn child(&self, mv: &Move) -> Option<NodeView<'a>> {
        self.children().find(|c| c.mv() == Some(mv))
    }

    /// Serializable snapshot down to `depth` levels of children.
    ///
    /// At depth 0 only the child count is reported.
    #[must_use]
    pub fn stats(&self, depth: usize) -> NodeStats {
        let node = self.node();
        NodeStats {
            mv: node.mv.clone(),
            label: node.label.clone(),
            visits: node.visits,
            rewards: node.reward_by_team,
            child_count: node.children.len(),
            children: (depth > 0).then(|| {
                self.children_by_visits()
                    .iter()
                    .map(|c| c.stats(depth - 1))
                    .collect()
            }),
        }
    }
}

/// Owned snapshot of a node and optionally its subtree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeStats {
    #[serde(rename = "move")]
    pub mv: Option<Move>,
    pub label: String,
    pub visits: u32,
    pub rewards: TeamMap<f64>,
    pub child_count: usize,
    /// Children sorted by visits; None past the requested depth.
    pub children: Option<Vec<NodeStats>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SearchTree {
        let mut tree = SearchTree::new(SearchNode::new(
            NodeId::NONE,
            None,
            "root".into(),
            Team::A,
            0,
            vec![Move::from("a"), Move::from("b")],
        ));
        let root = tree.root_id();
        for (mv, visits) in [("a", 3), ("b", 7)] {
            let index = tree.get(root).untried.iter().position(|m| m.as_str() == mv).unwrap();
            tree.take_untried(root, index);
            let mut child =
                SearchNode::new(root, Some(Move::from(mv)), mv.into(), Team::B, 1, vec![]);
            child.visits = visits;
            child.reward_by_team[Team::A] = f64::from(visits) / 2.0;
            tree.attach(root, child);
        }
        tree.get_mut(root).visits = 10;
        tree
    }

    #[test]
    fn test_view_navigation() {
        let tree = sample();
        let root = tree.root();
        assert_eq!(root.label(), "root");
        assert_eq!(root.mv(), None);
        assert_eq!(root.visits(), 10);

        let b = root.child(&Move::from("b")).unwrap();
        assert_eq!(b.visits(), 7);
        assert_eq!(b.to_move(), Team::B);
        assert!((b.mean_reward(Team::A) - 0.5).abs() < 1e-9);
        assert!(root.child(&Move::from("c")).is_none());

        let order: Vec<_> = root.children_by_visits().iter().map(|c| c.label()).collect();
        assert_eq!(order, vec!["b", "a"]);
    }

    #[test]
    fn test_stats_depth() {
        let tree = sample();
        let shallow = tree.root().stats(0);
        assert_eq!(shallow.child_count, 2);
        assert!(shallow.children.is_none());

        let deep = tree.root().stats(1);
        let children = deep.children.unwrap();
        assert_eq!(children[0].mv, Some(Move::from("b")));
        assert_eq!(children[0].visits, 7);
        assert!(children[0].children.is_none());
    }

    #[test]
    fn test_stats_serialize() {
        let tree = sample();
        let json = serde_json::to_value(tree.root().stats(1)).unwrap();
        assert_eq!(json["visits"], 10);
        assert_eq!(json["children"][0]["move"], "b");
        assert!(json["move"].is_null());
    }
}
