//! Index-based view of an expression tree with parent links.
//!
//! [`Rational`] nodes own their children and know nothing about their parent.
//! Tooling that needs to walk upwards (such as the graph export) builds a
//! [`TreeArena`], which lists the nodes in prefix order and records the index
//! of each node's parent.

use crate::{Node, Rational};

/// Index of a node in a [`TreeArena`]. The root has index `0`.
pub type NodeId = usize;

#[derive(Debug, Clone, Copy)]
pub struct ArenaNode<'a> {
    pub rational: &'a Rational,
    pub parent: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct TreeArena<'a> {
    nodes: Vec<ArenaNode<'a>>,
}

impl<'a> TreeArena<'a> {
    pub fn new(root: &'a Rational) -> Self {
        let mut arena = Self { nodes: Vec::new() };
        arena.visit(root, None);
        arena
    }

    fn visit(&mut self, rational: &'a Rational, parent: Option<NodeId>) {
        let id = self.nodes.len();
        self.nodes.push(ArenaNode { rational, parent });

        match rational.node() {
            Node::Epsilon | Node::Letter(_) => {}
            Node::Union(l, r) | Node::Concat(l, r) => {
                self.visit(l, Some(id));
                self.visit(r, Some(id));
            }
            Node::Star(e) => self.visit(e, Some(id)),
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&ArenaNode<'a>> {
        self.nodes.get(id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    pub fn is_root(&self, id: NodeId) -> bool {
        id == 0 && !self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in prefix order, together with their index.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &ArenaNode<'a>)> {
        self.nodes.iter().enumerate()
    }
}
