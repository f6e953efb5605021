use proc_macro::TokenStream;
use quote::quote;
use rational_automata_expressions::Rational;
use syn::parse_macro_input;

/// Builds a [`Rational`] from an expression checked at compile time.
///
/// ```rust
/// use rational_automata::{rational, parse_rational};
///
/// assert_eq!(rational!((a + b)*.c), parse_rational("(a + b)*.c").unwrap());
/// ```
#[proc_macro]
pub fn rational(input: TokenStream) -> TokenStream {
    let rational = parse_macro_input!(input as Rational);
    rational.emit(&quote!(::rational_automata)).into()
}
