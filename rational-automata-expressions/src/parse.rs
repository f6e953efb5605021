use crate::Rational;
use std::collections::VecDeque;
use std::fmt::Debug;
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::{braced, bracketed, parenthesized, Ident, Token};

const EPSILON: char = 'ε';

#[derive(Clone, PartialEq, Eq)]
enum RationalSymbol {
    Epsilon,
    Star,
    Dot,
    Plus,
    Rational(Rational), // used for letters and grouped expressions
    End,
}

impl Debug for RationalSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Epsilon => write!(f, "'ε'"),
            Self::Star => write!(f, "'*'"),
            Self::Dot => write!(f, "'.'"),
            Self::Plus => write!(f, "'+'"),
            Self::Rational(rational) => write!(f, "{rational}"),
            Self::End => write!(f, "'$'"),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum ParserState {
    State0,
    State1,
    State2,
    State3,
    State4,
    State5,
    State6,
    State7,
    State8,
    State9,
}

#[derive(Clone)]
enum StackSymbol {
    State(ParserState),
    Symbol(RationalSymbol),
    Rational(Rational),
}

impl Debug for StackSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::State(state) => state.fmt(f),
            Self::Rational(rational) => write!(f, "({rational})"),
            Self::Symbol(symbol) => symbol.fmt(f),
        }
    }
}

/// Shift-reduce parser for rational expressions.
///
/// States:
/// - 0: start of input, 6: after `+`, 7: after `.`
/// - 1: a complete expression at the bottom of the stack
/// - 2, 3, 4: reduce `ε`, a letter or group, a star
/// - 5: two juxtaposed expressions
/// - 8: `R . R`, 9: `R + R`
struct RationalParser<'a> {
    input: ParseStream<'a>,
    state: ParserState,
    next: Option<RationalSymbol>,
    // letters of an identifier that were not handed out yet
    pending: VecDeque<RationalSymbol>,
    symbol_stack: Vec<StackSymbol>,
}

impl<'a> RationalParser<'a> {
    fn new(input: ParseStream<'a>) -> Self {
        Self {
            input,
            state: ParserState::State0,
            next: None,
            pending: VecDeque::new(),
            symbol_stack: vec![StackSymbol::State(ParserState::State0)],
        }
    }

    fn scan(&mut self) -> syn::Result<RationalSymbol> {
        if let Some(symbol) = self.pending.pop_front() {
            return Ok(symbol);
        }

        if self.input.is_empty() {
            return Ok(RationalSymbol::End);
        }

        // Rust performs bracket matching: leverage that for all three group kinds,
        // so that rendered expressions parse back.
        if self.input.peek(syn::token::Paren) {
            let inner;
            parenthesized!(inner in self.input);
            return Rational::parse(&inner).map(RationalSymbol::Rational);
        }
        if self.input.peek(syn::token::Bracket) {
            let inner;
            bracketed!(inner in self.input);
            return Rational::parse(&inner).map(RationalSymbol::Rational);
        }
        if self.input.peek(syn::token::Brace) {
            let inner;
            braced!(inner in self.input);
            return Rational::parse(&inner).map(RationalSymbol::Rational);
        }

        // Scan letters and 'ε': every character of an identifier is a symbol of its own
        if self.input.peek(Ident::peek_any) {
            let name = self.input.call(Ident::parse_any)?;
            self.pending.extend(name.to_string().chars().map(|c| {
                if c == EPSILON {
                    RationalSymbol::Epsilon
                } else {
                    RationalSymbol::Rational(Rational::letter(c))
                }
            }));
            return match self.pending.pop_front() {
                Some(symbol) => Ok(symbol),
                None => self.error("internal parsing error: empty identifier"),
            };
        }

        let lookahead = self.input.lookahead1();

        // Scan '*' symbol
        if lookahead.peek(Token![*]) {
            self.input.parse::<Token![*]>()?;
            return Ok(RationalSymbol::Star);
        }

        // Scan '.' symbol
        if lookahead.peek(Token![.]) {
            self.input.parse::<Token![.]>()?;
            return Ok(RationalSymbol::Dot);
        }

        // Scan '+' symbol
        if lookahead.peek(Token![+]) {
            self.input.parse::<Token![+]>()?;
            return Ok(RationalSymbol::Plus);
        }

        Err(lookahead.error())
    }

    fn shift(&mut self, new_state: ParserState) -> syn::Result<bool> {
        let next_symbol = self.next()?;
        self.symbol_stack.push(StackSymbol::Symbol(next_symbol));
        self.symbol_stack.push(StackSymbol::State(new_state));
        self.state = new_state;
        self.next = Some(self.scan()?);
        Ok(false) // not in accepting state
    }

    // reduce
    fn top_stack_symbol(&mut self) -> syn::Result<StackSymbol> {
        if let Some(StackSymbol::State(_)) = self.symbol_stack.pop() {
            if let Some(symbol) = self.symbol_stack.pop() {
                Ok(symbol)
            } else {
                self.error("internal parsing error: expected non-empty stack")
            }
        } else {
            self.error("internal parsing error: expected state on top of stack")
        }
    }

    fn top_symbol(&mut self) -> syn::Result<RationalSymbol> {
        if let StackSymbol::Symbol(symbol) = self.top_stack_symbol()? {
            Ok(symbol)
        } else {
            self.error("internal parsing error: expected symbol on top of stack")
        }
    }

    fn top_rational(&mut self) -> syn::Result<Rational> {
        if let StackSymbol::Rational(rational) = self.top_stack_symbol()? {
            Ok(rational)
        } else {
            self.error("internal parsing error: expected expression on top of stack")
        }
    }

    // reduce atoms

    fn reduce_epsilon(&mut self) -> syn::Result<bool> {
        if RationalSymbol::Epsilon == self.top_symbol()? {
            self.goto(Rational::epsilon())
        } else {
            self.error("internal parsing error: expected 'ε' on top of stack")
        }
    }

    // Reduces both letters and grouped expressions.
    fn reduce_atom(&mut self) -> syn::Result<bool> {
        match self.top_symbol()? {
            RationalSymbol::Rational(rational) => self.goto(rational),
            _ => self.error("internal parsing error: expected expression on top of stack"),
        }
    }

    fn reduce_star(&mut self) -> syn::Result<bool> {
        if RationalSymbol::Star != self.top_symbol()? {
            return self.error("internal parsing error: expected '*' on top of stack");
        }
        let rational = self.top_rational()?;
        self.goto(rational.star())
    }

    // reduce binary operators

    fn reduce_juxtaposition(&mut self) -> syn::Result<bool> {
        // right-hand-side is on top of stack ...
        let r = self.top_rational()?;
        let l = self.top_rational()?;
        self.goto(l.concat(r))
    }

    fn reduce_binary_infix(
        &mut self,
        expected: RationalSymbol,
        build: impl Fn(Rational, Rational) -> Rational,
    ) -> syn::Result<bool> {
        // right-hand-side is on top of stack ...
        let r = self.top_rational()?;
        if expected != self.top_symbol()? {
            return self.error("internal parsing error: incorrect operator on top level of stack");
        }
        let l = self.top_rational()?;
        self.goto(build(l, r))
    }

    fn reduce_dot(&mut self) -> syn::Result<bool> {
        self.reduce_binary_infix(RationalSymbol::Dot, Rational::concat)
    }

    fn reduce_plus(&mut self) -> syn::Result<bool> {
        self.reduce_binary_infix(RationalSymbol::Plus, Rational::union)
    }

    // goto jump table

    fn goto(&mut self, result: Rational) -> syn::Result<bool> {
        if let Some(StackSymbol::State(st)) = self.symbol_stack.last() {
            self.state = match st {
                ParserState::State0 => ParserState::State1,
                ParserState::State1 => ParserState::State5,
                ParserState::State5 => ParserState::State5,
                ParserState::State6 => ParserState::State9,
                ParserState::State7 => ParserState::State8,
                ParserState::State8 => ParserState::State5,
                ParserState::State9 => ParserState::State5,
                _ => {
                    return self.error(
                        "internal parsing error: cannot perform 'goto' action on current stack state",
                    )
                }
            };
            self.symbol_stack.push(StackSymbol::Rational(result));
            self.symbol_stack.push(StackSymbol::State(self.state));
            Ok(false)
        } else {
            self.error("internal parsing error: expected state on top of symbol stack")
        }
    }

    fn accept() -> syn::Result<bool> {
        Ok(true)
    }

    fn error<T>(&mut self, msg: &str) -> syn::Result<T> {
        Err(syn::Error::new(self.input.span(), msg))
    }

    fn init(&mut self) -> syn::Result<()> {
        self.next = Some(self.scan()?);
        Ok(())
    }

    fn next(&mut self) -> syn::Result<RationalSymbol> {
        if let Some(next) = self.next.clone() {
            Ok(next)
        } else {
            self.error("internal parsing error: forgot to initialize?")
        }
    }

    fn step(&mut self) -> syn::Result<bool> {
        match self.state {
            ParserState::State0 | ParserState::State6 | ParserState::State7 => {
                match self.next()? {
                    RationalSymbol::Epsilon => self.shift(ParserState::State2),
                    RationalSymbol::Rational(_) => self.shift(ParserState::State3),
                    _ => self.error("expected 'ε', letter or grouped expression here"),
                }
            }
            ParserState::State1 => match self.next()? {
                RationalSymbol::Epsilon => self.shift(ParserState::State2),
                RationalSymbol::Rational(_) => self.shift(ParserState::State3),
                RationalSymbol::Star => self.shift(ParserState::State4),
                RationalSymbol::Plus => self.shift(ParserState::State6),
                RationalSymbol::Dot => self.shift(ParserState::State7),
                RationalSymbol::End => Self::accept(),
            },
            ParserState::State2 => self.reduce_epsilon(),
            ParserState::State3 => self.reduce_atom(),
            ParserState::State4 => self.reduce_star(),
            ParserState::State5 => {
                match self.next()? {
                    // juxtaposition is right-associative, so shift in case of a new atom
                    RationalSymbol::Epsilon => self.shift(ParserState::State2),
                    RationalSymbol::Rational(_) => self.shift(ParserState::State3),
                    // star has priority over concatenation, so shift here
                    RationalSymbol::Star => self.shift(ParserState::State4),
                    // '.' is left-associative and '+' binds weaker, so reduce here
                    RationalSymbol::Dot => self.reduce_juxtaposition(),
                    RationalSymbol::Plus => self.reduce_juxtaposition(),
                    RationalSymbol::End => self.reduce_juxtaposition(),
                }
            }
            ParserState::State8 => {
                match self.next()? {
                    // juxtaposition binds the right operand first
                    RationalSymbol::Epsilon => self.shift(ParserState::State2),
                    RationalSymbol::Rational(_) => self.shift(ParserState::State3),
                    RationalSymbol::Star => self.shift(ParserState::State4),
                    // '.' is left-associative, so reduce eagerly
                    RationalSymbol::Dot => self.reduce_dot(),
                    RationalSymbol::Plus => self.reduce_dot(),
                    RationalSymbol::End => self.reduce_dot(),
                }
            }
            ParserState::State9 => {
                match self.next()? {
                    // '+' has lowest priority, so shift anything but another '+'
                    RationalSymbol::Epsilon => self.shift(ParserState::State2),
                    RationalSymbol::Rational(_) => self.shift(ParserState::State3),
                    RationalSymbol::Star => self.shift(ParserState::State4),
                    RationalSymbol::Dot => self.shift(ParserState::State7),
                    // '+' is left-associative, so reduce eagerly
                    RationalSymbol::Plus => self.reduce_plus(),
                    RationalSymbol::End => self.reduce_plus(),
                }
            }
        }
    }

    fn finalize(mut self) -> syn::Result<Rational> {
        let rational = self.top_rational()?;
        if let Some(StackSymbol::State(ParserState::State0)) = self.symbol_stack.pop() {
            if self.symbol_stack.is_empty() {
                Ok(rational)
            } else {
                self.error("error: residual input after parsing finished.")
            }
        } else {
            self.error("internal parsing error: expected state 0 on bottom of stack.")
        }
    }

    pub fn parse_rational(input: ParseStream<'a>) -> syn::Result<Rational> {
        let mut parser = RationalParser::new(input);
        parser.init()?;
        let mut accept = false;
        while !accept {
            accept = parser.step()?
        }
        parser.finalize()
    }
}

impl Parse for Rational {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        RationalParser::parse_rational(input)
    }
}

#[cfg(test)]
mod tests {
    use crate::{parse_rational, Rational};
    use pretty_assertions::assert_eq;

    fn l(c: char) -> Rational {
        Rational::letter(c)
    }

    #[test]
    fn test_atoms() {
        assert_eq!(parse_rational("a").unwrap(), l('a'));
        assert_eq!(parse_rational("Z").unwrap(), l('Z'));
        assert_eq!(parse_rational("ε").unwrap(), Rational::epsilon());
        assert_eq!(parse_rational("(a)").unwrap(), l('a'));
        assert_eq!(parse_rational("[a]").unwrap(), l('a'));
        assert_eq!(parse_rational("{a}").unwrap(), l('a'));
        // keywords are plain letter sequences here
        assert_eq!(
            parse_rational("if").unwrap(),
            l('i').concat(l('f'))
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(parse_rational("a*").unwrap(), l('a').star());
        assert_eq!(parse_rational("a.b").unwrap(), l('a').concat(l('b')));
        assert_eq!(parse_rational("a b").unwrap(), l('a').concat(l('b')));
        assert_eq!(parse_rational("ab").unwrap(), l('a').concat(l('b')));
        assert_eq!(parse_rational("a + b").unwrap(), l('a').union(l('b')));
        assert_eq!(
            parse_rational("(a*+b)").unwrap(),
            l('a').star().union(l('b'))
        );
        assert_eq!(parse_rational("ε.a").unwrap(), l('a'));
        assert_eq!(parse_rational("a.ε").unwrap(), l('a'));
    }

    #[test]
    fn test_disambiguation() {
        // union left-associative
        assert_eq!(
            parse_rational("a + b + c").unwrap(),
            l('a').union(l('b')).union(l('c'))
        );

        // dot left-associative
        assert_eq!(
            parse_rational("a.b.c").unwrap(),
            l('a').concat(l('b')).concat(l('c'))
        );

        // star < concat
        assert_eq!(
            parse_rational("ab*").unwrap(),
            l('a').concat(l('b').star())
        );
        assert_eq!(
            parse_rational("a.b*").unwrap(),
            l('a').concat(l('b').star())
        );

        // concat < union
        assert_eq!(
            parse_rational("a.b + c d").unwrap(),
            l('a').concat(l('b')).union(l('c').concat(l('d')))
        );
        assert_eq!(
            parse_rational("a + b.c").unwrap(),
            l('a').union(l('b').concat(l('c')))
        );

        // nested stars
        assert_eq!(parse_rational("a**").unwrap(), l('a').star().star());
        assert_eq!(
            parse_rational("(a + b)*.a").unwrap(),
            l('a').union(l('b')).star().concat(l('a'))
        );
    }

    #[test]
    fn test_rendering_parses_back() {
        for input in ["(a + b)*.a.b", "a.b* + c*", "ε + a", "((a + ε).b)*", "a b c + d"] {
            let rational = parse_rational(input).unwrap();
            let rendered = rational.to_string();
            assert_eq!(parse_rational(&rendered).unwrap(), rational, "{rendered}");
        }
    }

    #[test]
    fn test_errors() {
        assert!(parse_rational("").is_err());
        assert!(parse_rational("a +").is_err());
        assert!(parse_rational("+ a").is_err());
        assert!(parse_rational("a..b").is_err());
        assert!(parse_rational("*").is_err());
        assert!(parse_rational("()").is_err());
        assert!(parse_rational("a | b").is_err());
        assert!(parse_rational("a.(b").is_err());
    }
}
