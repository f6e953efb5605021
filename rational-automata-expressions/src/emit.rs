use crate::{Node, Rational};
use proc_macro2::TokenStream;
use quote::quote;

impl Rational {
    /// Rust code that rebuilds this expression through the constructors of [`Rational`].
    /// `krate` is the path under which `Rational` is reachable from the emitted code.
    pub fn emit(&self, krate: &TokenStream) -> TokenStream {
        match self.node() {
            Node::Epsilon => quote!(#krate::Rational::epsilon()),
            Node::Letter(c) => quote!(#krate::Rational::letter(#c)),
            Node::Union(l, r) => {
                let l = l.emit(krate);
                let r = r.emit(krate);
                quote!(#krate::Rational::union(#l, #r))
            }
            Node::Concat(l, r) => {
                let l = l.emit(krate);
                let r = r.emit(krate);
                quote!(#krate::Rational::concat(#l, #r))
            }
            Node::Star(e) => {
                let e = e.emit(krate);
                quote!(#krate::Rational::star(#e))
            }
        }
    }
}
