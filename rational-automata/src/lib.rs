//! Rational expressions and finite automata.
//!
//! * [`glushkov`] turns an expression into its position automaton.
//! * [`arden`] turns an automaton back into an expression, by solving its
//!   [`System`] of language equations.
//! * [`equivalent`] decides whether two expressions denote the same language,
//!   by comparing minimal automata.
//!
//! ```rust
//! use rational_automata::*;
//!
//! assert!(languages_equal("(a + b)*.a.b", "b*.a.(a + b.b*.a)*.b").unwrap());
//!
//! let automaton = glushkov(&mut rational!(a.b*));
//! assert!(automaton.accepts("abbb".chars()));
//!
//! let back = arden(&automaton).unwrap();
//! assert!(equivalent(&back, &rational!(a.b*)).unwrap());
//! ```

pub use rational_automata_expressions::*;

/// Compile-time checked rational expression literal.
///
/// Uses the same syntax as [`parse_rational`]:
///
/// ```rust
/// use rational_automata::*;
///
/// let r = rational!((a + ε).b*);
/// assert_eq!(r.to_string(), "[(a + ε) . {b}*]");
/// ```
pub use rational_automata_macros::rational;

pub mod automaton;
pub use automaton::{Automaton, State};

mod equivalence;
pub use equivalence::{automata_equivalent, equivalent, languages_equal};

mod glushkov;
pub use glushkov::glushkov;

pub mod system;
pub use system::{arden, System};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("expected exactly one initial state, found {count}")]
    InitialStates { count: usize },
    #[error("state {state} has several transitions on {letter:?}")]
    NotDeterministic { state: State, letter: char },
    #[error("state {state} has no transition on {letter:?}")]
    Incomplete { state: State, letter: char },
}
