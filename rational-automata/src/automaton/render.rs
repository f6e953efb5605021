//! Render automata to graphviz `.dot` files.

use super::Automaton;
use std::fs::File;
use std::io;
use std::io::Write;
use std::path::Path;

impl Automaton {
    /// Visualize the automaton as a graph, by emitting a graphviz dot file.
    ///
    /// Final states are drawn as double circles; every initial state gets an
    /// incoming arrow from an invisible point.
    pub fn render<W: Write>(&self, output: &mut W) -> io::Result<()> {
        writeln!(output, "digraph {{")?;
        writeln!(output, "rankdir=LR;")?;

        for &state in &self.states {
            let shape = if self.is_final(state) {
                "doublecircle"
            } else {
                "circle"
            };
            writeln!(output, r#"state_{state} [shape="{shape}"][label="{state}"]"#)?;
        }

        for &state in &self.initial {
            writeln!(output, r#"start_{state} [shape="point"]"#)?;
            writeln!(output, "start_{state} -> state_{state}")?;
        }

        for (origin, letter, destination) in self.transitions() {
            writeln!(output, r#"state_{origin} -> state_{destination} [label="{letter}"]"#)?;
        }

        writeln!(output, "}}")?;

        Ok(())
    }

    /// [`render`](Automaton::render) directly to a file.
    pub fn render_to(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let mut w = File::create(path)?;
        self.render(&mut w)
    }
}
