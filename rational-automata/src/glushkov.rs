use crate::{Automaton, Rational};

/// Builds the Glushkov (position) automaton of an expression.
///
/// The expression is numbered in place first. State `0` is the unique initial
/// state and stands for "no letter read yet"; state `p` stands for "the letter
/// at position `p` was just read", so the automaton has one state per letter
/// occurrence plus one. Every transition into `q` carries the letter at
/// position `q`.
pub fn glushkov(rational: &mut Rational) -> Automaton {
    let n = rational.number();
    let letters = rational.letters();
    let first = rational.first();
    let last = rational.last();

    log::debug!(
        "glushkov: {} positions in {}, first = {:?}, last = {:?}",
        n,
        rational,
        first,
        last
    );

    let mut automaton = Automaton::new();
    for state in 0..=n {
        automaton.add_state(state);
    }
    for &letter in &letters {
        automaton.add_letter(letter);
    }

    automaton.add_initial(0);
    if rational.contains_empty_word() {
        automaton.add_final(0);
    }

    for q in first {
        automaton.add_transition(0, letters[q - 1], q);
    }

    for (p, follow) in rational.follows().into_iter().enumerate().skip(1) {
        for q in follow {
            automaton.add_transition(p, letters[q - 1], q);
        }
    }

    for p in last {
        automaton.add_final(p);
    }

    automaton
}
