//! Finite automata over `char` letters.
//!
//! An [`Automaton`] is a plain container: states are integers, and the
//! transition relation maps a `(state, letter)` pair to a set of destinations,
//! so nondeterministic automata (such as Glushkov automata) are represented as
//! they are. The language algebra needed for equivalence checking
//! (determinization, completion, minimization, complement, product) lives in
//! the `algebra` submodule.
//!
//! All collections are ordered, so iteration and rendering are reproducible.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

mod algebra;

#[cfg(feature = "dot")]
mod render;

pub type State = usize;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Automaton {
    states: BTreeSet<State>,
    alphabet: BTreeSet<char>,
    initial: BTreeSet<State>,
    finals: BTreeSet<State>,
    transitions: BTreeMap<(State, char), BTreeSet<State>>,
}

impl Automaton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_state(&mut self, state: State) {
        self.states.insert(state);
    }

    pub fn add_letter(&mut self, letter: char) {
        self.alphabet.insert(letter);
    }

    pub fn add_initial(&mut self, state: State) {
        self.states.insert(state);
        self.initial.insert(state);
    }

    pub fn add_final(&mut self, state: State) {
        self.states.insert(state);
        self.finals.insert(state);
    }

    /// Adds a transition, registering both states and the letter if needed.
    pub fn add_transition(&mut self, origin: State, letter: char, destination: State) {
        self.states.insert(origin);
        self.states.insert(destination);
        self.alphabet.insert(letter);
        self.transitions
            .entry((origin, letter))
            .or_default()
            .insert(destination);
    }

    pub fn states(&self) -> &BTreeSet<State> {
        &self.states
    }

    pub fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    pub fn initial_states(&self) -> &BTreeSet<State> {
        &self.initial
    }

    pub fn final_states(&self) -> &BTreeSet<State> {
        &self.finals
    }

    pub fn is_final(&self, state: State) -> bool {
        self.finals.contains(&state)
    }

    /// Destinations of the transitions leaving `state` on `letter`.
    pub fn transitions_from(&self, state: State, letter: char) -> impl Iterator<Item = State> + '_ {
        self.transitions
            .get(&(state, letter))
            .into_iter()
            .flatten()
            .copied()
    }

    fn successor(&self, state: State, letter: char) -> Option<State> {
        self.transitions_from(state, letter).next()
    }

    /// All transitions as `(origin, letter, destination)` triples, ordered by
    /// origin, then letter, then destination.
    pub fn transitions(&self) -> impl Iterator<Item = (State, char, State)> + '_ {
        self.transitions
            .iter()
            .flat_map(|(&(origin, letter), destinations)| {
                destinations
                    .iter()
                    .map(move |&destination| (origin, letter, destination))
            })
    }

    /// Returns true if some path labelled by `word` leads from an initial state to a final state.
    pub fn accepts(&self, word: impl IntoIterator<Item = char>) -> bool {
        let mut current = self.initial.clone();
        for letter in word {
            current = current
                .iter()
                .flat_map(|&state| self.transitions_from(state, letter))
                .collect();
            if current.is_empty() {
                return false;
            }
        }

        current.iter().any(|&state| self.is_final(state))
    }

    /// A state number not used by this automaton yet.
    fn fresh_state(&self) -> State {
        self.states.last().map_or(0, |last| last + 1)
    }

    fn reachable(&self) -> BTreeSet<State> {
        let mut visited = BTreeSet::new();
        let mut work_list: VecDeque<State> = self.initial.iter().copied().collect();

        while let Some(state) = work_list.pop_front() {
            if visited.insert(state) {
                for &letter in &self.alphabet {
                    work_list.extend(self.transitions_from(state, letter));
                }
            }
        }
        visited
    }

    /// Returns true if this automaton accepts no word at all.
    pub fn is_empty(&self) -> bool {
        self.reachable().is_disjoint(&self.finals)
    }
}
