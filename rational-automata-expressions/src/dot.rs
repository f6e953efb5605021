use crate::{Node, Rational, TreeArena};
use std::io;
use std::io::Write;

impl Rational {
    /// Writes the tree as a graphviz digraph, annotating every node with its
    /// kind and numbered position range.
    ///
    /// Nodes are written in prefix order; the edge from a parent to a child is
    /// written right before the child itself.
    pub fn output_dot(&self, w: &mut impl Write) -> io::Result<()> {
        writeln!(w, "digraph {{")?;

        for (id, node) in TreeArena::new(self).iter() {
            if let Some(parent) = node.parent {
                writeln!(w, "node{parent} -> node{id};")?;
            }

            let r = node.rational;
            let (min, max) = (r.position_min(), r.position_max());
            let label = match r.node() {
                Node::Epsilon => format!("ε-{min}"),
                Node::Letter(c) => format!("{c}-{min}"),
                Node::Union(..) => format!("+ ({min}/{max})"),
                Node::Concat(..) => format!(". ({min}/{max})"),
                Node::Star(_) => format!("* ({min}/{max})"),
            };
            writeln!(w, "node{id} [label=\"{label}\"];")?;
        }

        writeln!(w, "}}")?;

        Ok(())
    }
}
