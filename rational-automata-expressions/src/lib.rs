//! Rational expressions over `char` letters and the position analyses behind
//! the Glushkov construction: numbering, empty-word test, first, last and
//! follow sets.
//!
//! ```rust
//! use rational_automata_expressions::parse_rational;
//!
//! let mut r = parse_rational("(a + b)*.a.b").unwrap();
//! assert_eq!(r.number(), 4);
//! assert_eq!(r.first().into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
//! assert_eq!(r.to_string(), "[[{(a + b)}* . a] . b]");
//! ```

use proc_macro2::{LexError, TokenStream};
use thiserror::Error;

mod arena;
mod parse;
mod positions;
mod rational;

#[cfg(feature = "emit")]
mod emit;

#[cfg(feature = "dot")]
mod dot;

pub use arena::{ArenaNode, NodeId, TreeArena};
pub use positions::Positions;
pub use rational::{concat, display, star, union, Node, Position, Rational};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    #[error("parse error: {0}")]
    Parse(#[from] syn::Error),
}

/// parse a string to a rational expression
pub fn parse_rational(input: impl AsRef<str>) -> Result<Rational, ParseError> {
    let stream: TokenStream = input.as_ref().parse()?;
    Ok(parse_rational_token_stream(stream)?)
}

/// parse a rust [`TokenStream`](TokenStream) to a rational expression
pub fn parse_rational_token_stream(input: TokenStream) -> syn::Result<Rational> {
    syn::parse2(input)
}
