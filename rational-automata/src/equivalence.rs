use crate::{glushkov, parse_rational, Automaton, Error, Rational};
use std::collections::BTreeSet;

/// Returns true if two textual expressions denote the same language.
pub fn languages_equal(left: &str, right: &str) -> Result<bool, Error> {
    let left = parse_rational(left)?;
    let right = parse_rational(right)?;
    equivalent(&left, &right)
}

/// Returns true if two expressions denote the same language.
///
/// Both expressions are copied before numbering, so the arguments are left untouched.
pub fn equivalent(left: &Rational, right: &Rational) -> Result<bool, Error> {
    let left = glushkov(&mut left.clone());
    let right = glushkov(&mut right.clone());
    automata_equivalent(&left, &right)
}

/// Returns true if two automata accept the same language.
///
/// Each automaton is minimized and completed over the union of both alphabets,
/// so that its complement also contains the words using letters it never
/// mentions. The languages are equal when neither automaton accepts a word in
/// the complement of the other.
pub fn automata_equivalent(left: &Automaton, right: &Automaton) -> Result<bool, Error> {
    let alphabet: BTreeSet<char> = left.alphabet().union(right.alphabet()).copied().collect();
    let left = left.minimize().completed(&alphabet);
    let right = right.minimize().completed(&alphabet);

    log::info!(
        "comparing minimal automata of {} and {} states over {:?}",
        left.states().len(),
        right.states().len(),
        alphabet
    );

    let right_in_left = left
        .complement()?
        .intersect(&right)
        .prune_unreachable()
        .final_states()
        .is_empty();
    let left_in_right = right
        .complement()?
        .intersect(&left)
        .prune_unreachable()
        .final_states()
        .is_empty();

    log::info!("inclusions: left in right = {left_in_right}, right in left = {right_in_left}");

    Ok(left_in_right && right_in_left)
}
