//! Linear equation systems over languages, and their resolution with Arden's lemma.
//!
//! A [`System`] has one unknown `X_i` per automaton state, standing for the
//! language accepted from that state. Row `i` encodes
//!
//! ```text
//! X_i = Σ_j row[i][j] . X_j + row[i][n]
//! ```
//!
//! where the last column is the constant term, `ε` for final states. Absent
//! cells are the empty language. Arden's lemma (`X = A.X + B` has the least
//! solution `X = A*.B`) removes self references, and substitution removes the
//! unknown from the other rows.

use crate::{concat, display, union, Automaton, Rational, State};
use itertools::Itertools;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

pub type Row = Vec<Option<Rational>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct System {
    /// The automaton state each row stands for.
    states: Vec<State>,
    rows: Vec<Row>,
}

impl System {
    /// Builds the system of an automaton, with one row per state in increasing state order.
    pub fn from_automaton(automaton: &Automaton) -> Self {
        let states: Vec<State> = automaton.states().iter().copied().collect();
        let index: BTreeMap<State, usize> =
            states.iter().enumerate().map(|(i, &s)| (s, i)).collect();
        let n = states.len();

        let mut rows = vec![vec![None; n + 1]; n];
        for (origin, letter, destination) in automaton.transitions() {
            let cell = &mut rows[index[&origin]][index[&destination]];
            *cell = union(cell.take(), Some(Rational::letter(letter)));
        }
        for state in automaton.final_states() {
            rows[index[state]][n] = Some(Rational::epsilon());
        }

        Self { states, rows }
    }

    /// The number of unknowns.
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The row of the unknown standing for `state`.
    pub fn row_of(&self, state: State) -> Option<&Row> {
        let i = self.states.binary_search(&state).ok()?;
        self.rows.get(i)
    }

    /// The constant term of row `i`.
    pub fn constant(&self, i: usize) -> Option<&Rational> {
        self.rows.get(i)?.last()?.as_ref()
    }

    /// Eliminates the unknowns one at a time, in row order.
    ///
    /// Unknown `j` is first solved in its own row, then substituted in every
    /// other row, before moving on to `j + 1`. Afterwards every row only has
    /// its constant term left, which is the language accepted from its state.
    pub fn solve(&mut self) {
        for j in 0..self.size() {
            solve_row_for_self(&mut self.rows[j], j);
            log::trace!("X{j} = {}", DisplayRow(&self.rows[j]));

            let solved = self.rows[j].clone();
            for (k, row) in self.rows.iter_mut().enumerate() {
                if k != j {
                    substitute(row, j, &solved);
                }
            }
        }
    }
}

/// Applies Arden's lemma to unknown `i` in its own row.
///
/// With `A = row[i]` the self loop, every other cell `B` becomes `A*.B` and
/// column `i` is cleared. A row without self loop is left as is.
pub fn solve_row_for_self(row: &mut [Option<Rational>], i: usize) {
    let Some(self_loop) = row[i].take() else {
        return;
    };

    let closure = self_loop.star();
    for (k, cell) in row.iter_mut().enumerate() {
        if k != i {
            *cell = concat(Some(closure.clone()), cell.take());
        }
    }
}

/// Replaces unknown `i` in `target` by its value `solved`.
///
/// With `C = target[i]`, `C.solved[k]` is added to `target[k]` for every
/// present cell of `solved`, then `target[i]` is cleared.
pub fn substitute(target: &mut [Option<Rational>], i: usize, solved: &[Option<Rational>]) {
    let Some(coefficient) = target[i].take() else {
        return;
    };

    for (k, value) in solved.iter().enumerate() {
        if k == i {
            continue;
        }
        if let Some(value) = value {
            target[k] = union(
                target[k].take(),
                Some(coefficient.clone().concat(value.clone())),
            );
        }
    }
}

/// Extracts a rational expression from an automaton by solving its system.
///
/// Returns the union of the languages of the initial states, or `None` if the
/// automaton accepts nothing.
pub fn arden(automaton: &Automaton) -> Option<Rational> {
    let mut system = System::from_automaton(automaton);
    system.solve();

    automaton
        .initial_states()
        .iter()
        .filter_map(|&state| system.row_of(state))
        .fold(None, |expression, row| {
            union(expression, row.last().cloned().flatten())
        })
}

struct DisplayRow<'a>(&'a [Option<Rational>]);

impl Display for DisplayRow<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let n = self.0.len().saturating_sub(1);
        let terms = self.0.iter().enumerate().map(|(j, cell)| {
            if j < n {
                format!("{}X{j}", display(cell.as_ref()))
            } else {
                display(cell.as_ref()).to_string()
            }
        });
        write!(f, "{}", terms.format("\t+\t"))
    }
}

impl Display for System {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            writeln!(f, "X{i}\t= {}", DisplayRow(row))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{equivalent, glushkov, parse_rational};
    use pretty_assertions::assert_eq;

    fn system(input: &str) -> System {
        System::from_automaton(&glushkov(&mut parse_rational(input).unwrap()))
    }

    fn letter(c: char) -> Option<Rational> {
        Some(Rational::letter(c))
    }

    #[test]
    fn build_system() {
        let system = system("a.b");
        assert_eq!(system.size(), 3);
        assert_eq!(
            system.to_string(),
            "X0\t= ∅X0\t+\taX1\t+\t∅X2\t+\t∅\n\
             X1\t= ∅X0\t+\t∅X1\t+\tbX2\t+\t∅\n\
             X2\t= ∅X0\t+\t∅X1\t+\t∅X2\t+\tε\n"
        );
    }

    #[test]
    fn parallel_transitions_are_unioned() {
        let mut automaton = Automaton::new();
        automaton.add_initial(0);
        automaton.add_transition(0, 'a', 1);
        automaton.add_transition(0, 'b', 1);
        automaton.add_final(1);

        let system = System::from_automaton(&automaton);
        assert_eq!(
            system.rows()[0],
            vec![None, parse_rational("a + b").ok(), None]
        );
        assert_eq!(system.constant(1), Some(&Rational::epsilon()));
        assert_eq!(system.constant(0), None);
    }

    #[test]
    fn arden_on_self_loop() {
        let mut row = vec![letter('a'), letter('b'), Some(Rational::epsilon())];
        solve_row_for_self(&mut row, 0);
        assert_eq!(
            row,
            vec![
                None,
                Some(Rational::letter('a').star().concat(Rational::letter('b'))),
                Some(Rational::letter('a').star()),
            ]
        );
    }

    #[test]
    fn arden_without_self_loop_is_identity() {
        let row = vec![None, letter('b'), None, Some(Rational::epsilon())];
        let mut solved = row.clone();
        solve_row_for_self(&mut solved, 0);
        assert_eq!(solved, row);
    }

    #[test]
    fn substitution() {
        // X0 = a.X1 + c.X2 ; X1 = b.X2 + ε
        let mut target = vec![None, letter('a'), letter('c'), None];
        let solved = vec![None, None, letter('b'), Some(Rational::epsilon())];
        substitute(&mut target, 1, &solved);
        assert_eq!(
            target,
            vec![
                None,
                None,
                parse_rational("c + a.b").ok(),
                letter('a'),
            ]
        );

        // nothing to substitute
        let mut untouched = vec![letter('a'), None, None, None];
        substitute(&mut untouched, 1, &solved);
        assert_eq!(untouched, vec![letter('a'), None, None, None]);
    }

    #[test]
    fn solve_concatenation() {
        let mut system = system("a.b");
        system.solve();
        assert_eq!(system.constant(0), parse_rational("a.b").ok().as_ref());
        assert_eq!(system.constant(1), Some(&Rational::letter('b')));
        for row in system.rows() {
            assert!(row[..system.size()].iter().all(Option::is_none));
        }
    }

    #[test]
    fn solve_star() {
        let automaton = glushkov(&mut parse_rational("a*").unwrap());
        let expression = arden(&automaton).unwrap();
        assert_eq!(expression.to_string(), "(ε + [a . {a}*])");
    }

    #[test]
    fn round_trip() {
        for input in [
            "a",
            "a.b",
            "a*",
            "(a + b)*.a.b",
            "(a.b*)*.c",
            "a.(b + ε)*.c + (a.b)*",
            "ε",
            "(a + b.a)*.b",
        ] {
            let rational = parse_rational(input).unwrap();
            let automaton = glushkov(&mut rational.clone());
            let extracted = arden(&automaton).unwrap();
            assert!(
                equivalent(&rational, &extracted).unwrap(),
                "{input} became {extracted}"
            );
        }
    }

    #[test]
    fn round_trip_through_minimal_automaton() {
        let rational = parse_rational("(a + b)*.a.b").unwrap();
        let minimal = glushkov(&mut rational.clone()).minimize();
        let extracted = arden(&minimal).unwrap();
        assert!(equivalent(&rational, &extracted).unwrap());
    }

    #[test]
    fn empty_language() {
        let mut automaton = Automaton::new();
        automaton.add_initial(0);
        automaton.add_transition(0, 'a', 1);
        assert_eq!(arden(&automaton), None);
    }
}
