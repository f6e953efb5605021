use super::{Automaton, State};
use crate::Error;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

impl Automaton {
    /// Returns an error unless this automaton has a single initial state and
    /// at most one destination per `(state, letter)` pair.
    pub fn check_deterministic(&self) -> Result<(), Error> {
        if self.initial.len() != 1 {
            return Err(Error::InitialStates {
                count: self.initial.len(),
            });
        }
        for (&(state, letter), destinations) in &self.transitions {
            if destinations.len() > 1 {
                return Err(Error::NotDeterministic { state, letter });
            }
        }
        Ok(())
    }

    /// Returns an error unless every state has a transition on every letter of the alphabet.
    pub fn check_complete(&self) -> Result<(), Error> {
        for &state in &self.states {
            for &letter in &self.alphabet {
                if self.successor(state, letter).is_none() {
                    return Err(Error::Incomplete { state, letter });
                }
            }
        }
        Ok(())
    }

    pub fn is_deterministic(&self) -> bool {
        self.check_deterministic().is_ok()
    }

    pub fn is_complete(&self) -> bool {
        self.check_complete().is_ok()
    }

    /// Subset construction. Only subsets reachable from the initial states are
    /// built, and the empty subset is left out, so the result may be incomplete.
    ///
    /// The initial subset becomes state `0`; other subsets are numbered in
    /// breadth-first discovery order.
    pub fn determinize(&self) -> Automaton {
        let mut dfa = Automaton::new();
        dfa.alphabet = self.alphabet.clone();
        if self.initial.is_empty() {
            return dfa;
        }

        let mut ids = BTreeMap::new();
        let mut work_list = VecDeque::new();
        ids.insert(self.initial.clone(), 0);
        work_list.push_back(self.initial.clone());
        dfa.add_initial(0);

        while let Some(subset) = work_list.pop_front() {
            let id = ids[&subset];
            if subset.iter().any(|&state| self.is_final(state)) {
                dfa.add_final(id);
            }

            for &letter in &self.alphabet {
                let next: BTreeSet<State> = subset
                    .iter()
                    .flat_map(|&state| self.transitions_from(state, letter))
                    .collect();
                if next.is_empty() {
                    continue;
                }

                let next_id = match ids.get(&next) {
                    Some(&next_id) => next_id,
                    None => {
                        let next_id = ids.len();
                        ids.insert(next.clone(), next_id);
                        work_list.push_back(next);
                        next_id
                    }
                };
                dfa.add_transition(id, letter, next_id);
            }
        }

        dfa
    }

    /// Widens the alphabet to include `alphabet` and sends every missing
    /// transition to a fresh, non-final sink state.
    ///
    /// The sink is only added when some transition is missing. An automaton
    /// without initial state gets the sink as initial state.
    pub fn completed(&self, alphabet: &BTreeSet<char>) -> Automaton {
        let mut complete = self.clone();
        complete.alphabet.extend(alphabet.iter().copied());

        let sink = complete.fresh_state();
        let letters: Vec<char> = complete.alphabet.iter().copied().collect();
        let states: Vec<State> = complete.states.iter().copied().collect();

        let mut sink_used = complete.initial.is_empty();
        if sink_used {
            complete.add_initial(sink);
        }

        for state in states {
            for &letter in &letters {
                if complete.successor(state, letter).is_none() {
                    complete.add_transition(state, letter, sink);
                    sink_used = true;
                }
            }
        }

        if sink_used {
            for &letter in &letters {
                complete.add_transition(sink, letter, sink);
            }
        }

        complete
    }

    /// Keeps only the states reachable from an initial state. State numbers are preserved.
    pub fn prune_unreachable(&self) -> Automaton {
        let reachable = self.reachable();

        let mut pruned = Automaton::new();
        pruned.alphabet = self.alphabet.clone();
        for &state in &reachable {
            pruned.add_state(state);
        }
        for &state in &self.initial {
            pruned.add_initial(state);
        }
        for &state in self.finals.intersection(&reachable) {
            pruned.add_final(state);
        }
        for (origin, letter, destination) in self.transitions() {
            if reachable.contains(&origin) {
                pruned.add_transition(origin, letter, destination);
            }
        }

        pruned
    }

    /// The minimal complete deterministic automaton of the same language,
    /// over the same alphabet.
    ///
    /// The automaton is determinized, completed and pruned first, then states
    /// are merged by partition refinement: two states stay in the same block
    /// as long as they agree on acceptance and, for every letter, their
    /// successors lie in the same block. Blocks are numbered in state order,
    /// so the initial state is `0`.
    pub fn minimize(&self) -> Automaton {
        let dfa = self
            .determinize()
            .completed(&self.alphabet)
            .prune_unreachable();

        let states: Vec<State> = dfa.states.iter().copied().collect();
        let letters: Vec<char> = dfa.alphabet.iter().copied().collect();

        let mut block: BTreeMap<State, usize> = states
            .iter()
            .map(|&state| (state, usize::from(dfa.is_final(state))))
            .collect();
        let mut block_count = 0;

        loop {
            let mut signatures = BTreeMap::new();
            let mut refined = BTreeMap::new();

            for &state in &states {
                let successors: Vec<Option<usize>> = letters
                    .iter()
                    .map(|&letter| dfa.successor(state, letter).map(|next| block[&next]))
                    .collect();
                let next_id = signatures.len();
                let id = *signatures
                    .entry((block[&state], successors))
                    .or_insert(next_id);
                refined.insert(state, id);
            }

            let stable = signatures.len() == block_count;
            block_count = signatures.len();
            block = refined;
            if stable {
                break;
            }
        }

        log::debug!(
            "minimized {} states into {} blocks",
            states.len(),
            block_count
        );

        let mut minimal = Automaton::new();
        minimal.alphabet = dfa.alphabet.clone();
        for &state in &states {
            minimal.add_state(block[&state]);
        }
        for &state in &dfa.initial {
            minimal.add_initial(block[&state]);
        }
        for &state in &dfa.finals {
            minimal.add_final(block[&state]);
        }
        for (origin, letter, destination) in dfa.transitions() {
            minimal.add_transition(block[&origin], letter, block[&destination]);
        }

        minimal
    }

    /// Swaps final and non-final states.
    ///
    /// This only yields the complement language on a deterministic and
    /// complete automaton; anything else is rejected.
    pub fn complement(&self) -> Result<Automaton, Error> {
        self.check_deterministic()?;
        self.check_complete()?;

        let mut complement = self.clone();
        complement.finals = self.states.difference(&self.finals).copied().collect();
        Ok(complement)
    }

    /// Product construction over the letters both automata share.
    ///
    /// Only pairs reachable from a pair of initial states are built; they are
    /// numbered in breadth-first discovery order.
    pub fn intersect(&self, other: &Automaton) -> Automaton {
        let mut product = Automaton::new();
        product.alphabet = self
            .alphabet
            .intersection(&other.alphabet)
            .copied()
            .collect();
        let letters: Vec<char> = product.alphabet.iter().copied().collect();

        let mut ids: BTreeMap<(State, State), State> = BTreeMap::new();
        let mut work_list = VecDeque::new();
        for &left in &self.initial {
            for &right in &other.initial {
                let id = ids.len();
                ids.insert((left, right), id);
                product.add_initial(id);
                work_list.push_back((left, right));
            }
        }

        while let Some((left, right)) = work_list.pop_front() {
            let id = ids[&(left, right)];
            if self.is_final(left) && other.is_final(right) {
                product.add_final(id);
            }

            for &letter in &letters {
                for next_left in self.transitions_from(left, letter) {
                    for next_right in other.transitions_from(right, letter) {
                        let pair = (next_left, next_right);
                        let next_id = match ids.get(&pair) {
                            Some(&next_id) => next_id,
                            None => {
                                let next_id = ids.len();
                                ids.insert(pair, next_id);
                                work_list.push_back(pair);
                                next_id
                            }
                        };
                        product.add_transition(id, letter, next_id);
                    }
                }
            }
        }

        product
    }
}

#[cfg(test)]
mod tests {
    use crate::{glushkov, parse_rational, Automaton, Error};
    use std::collections::BTreeSet;

    fn automaton(input: &str) -> Automaton {
        glushkov(&mut parse_rational(input).unwrap())
    }

    fn words() -> Vec<&'static str> {
        vec![
            "", "a", "b", "c", "aa", "ab", "ba", "bb", "aab", "aba", "abb", "bab", "abab",
            "aabb", "baab", "abc", "cab",
        ]
    }

    #[test]
    fn determinize_keeps_language() {
        for input in ["(a + b)*.a.b", "a.b + a.c", "(a.b + a)*", "ε"] {
            let nfa = automaton(input);
            let dfa = nfa.determinize();
            assert!(dfa.is_deterministic(), "{input}");
            for word in words() {
                assert_eq!(nfa.accepts(word.chars()), dfa.accepts(word.chars()), "{input} on {word:?}");
            }
        }
    }

    #[test]
    fn completion() {
        let dfa = automaton("a.b").determinize();
        assert!(!dfa.is_complete());

        let alphabet: BTreeSet<char> = "abc".chars().collect();
        let complete = dfa.completed(&alphabet);
        assert!(complete.is_complete());
        assert!(complete.is_deterministic());
        assert_eq!(complete.alphabet(), &alphabet);
        assert_eq!(complete.states().len(), dfa.states().len() + 1);
        for word in words() {
            assert_eq!(dfa.accepts(word.chars()), complete.accepts(word.chars()), "{word:?}");
        }

        // nothing to add
        assert_eq!(complete.completed(&alphabet), complete);

        let empty = Automaton::new().completed(&alphabet);
        assert_eq!(empty.states().len(), 1);
        assert!(empty.is_complete());
        assert!(empty.is_empty());
    }

    #[test]
    fn minimize() {
        // the ε-free prefix automaton of (a + b)*.a.b needs three states
        let minimal = automaton("(a + b)*.a.b").minimize();
        assert_eq!(minimal.states().len(), 3);
        assert!(minimal.is_deterministic());
        assert!(minimal.is_complete());
        assert!(minimal.initial_states().contains(&0));

        // a.b needs a sink
        assert_eq!(automaton("a.b").minimize().states().len(), 4);

        // a* + a.a* and a* are the same single state
        assert_eq!(automaton("a* + a.a*").minimize().states().len(), 1);

        for input in ["(a + b)*.a.b", "a.b + a.c", "(a.b + a)*", "a.(b + ε).b*"] {
            let nfa = automaton(input);
            let minimal = nfa.minimize();
            for word in words() {
                assert_eq!(nfa.accepts(word.chars()), minimal.accepts(word.chars()), "{input} on {word:?}");
            }
        }
    }

    #[test]
    fn complement() {
        let minimal = automaton("a.b*").minimize();
        let complement = minimal.complement().unwrap();
        for word in words() {
            if word.contains('c') {
                continue;
            }
            assert_ne!(minimal.accepts(word.chars()), complement.accepts(word.chars()), "{word:?}");
        }
    }

    #[test]
    fn complement_preconditions() {
        // Glushkov automata branch: two transitions on 'a' out of state 0
        assert!(matches!(
            automaton("a.b + a.c").complement(),
            Err(Error::NotDeterministic { state: 0, letter: 'a' })
        ));

        assert!(matches!(
            automaton("a.b").determinize().complement(),
            Err(Error::Incomplete { .. })
        ));

        assert!(matches!(
            Automaton::new().complement(),
            Err(Error::InitialStates { count: 0 })
        ));
    }

    #[test]
    fn intersect() {
        let left = automaton("(a + b)*.a");
        let right = automaton("a.(a + b)*");
        let product = left.intersect(&right);
        for word in words() {
            assert_eq!(
                product.accepts(word.chars()),
                left.accepts(word.chars()) && right.accepts(word.chars()),
                "{word:?}"
            );
        }

        // disjoint alphabets only share the empty word
        let product = automaton("a*").intersect(&automaton("b*"));
        assert!(product.accepts("".chars()));
        assert!(product.alphabet().is_empty());
    }

    #[test]
    fn prune() {
        let mut automaton = automaton("a.b");
        automaton.add_transition(5, 'a', 6);
        automaton.add_final(6);

        let pruned = automaton.prune_unreachable();
        assert_eq!(pruned.states().iter().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(pruned.final_states().iter().copied().collect::<Vec<_>>(), vec![2]);
        assert_eq!(pruned.transitions().count(), 2);
    }
}
