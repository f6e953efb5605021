use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// A letter occurrence in a numbered expression.
///
/// Positions start at `1`; `0` is used as the bound of subtrees without letters.
pub type Position = usize;

/// The shape of a [`Rational`] node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    Epsilon,
    Letter(char),
    Union(Box<Rational>, Box<Rational>),
    Concat(Box<Rational>, Box<Rational>),
    Star(Box<Rational>),
}

/// A rational expression over `char` letters.
///
/// Every node carries the range of letter positions found in its subtree.
/// The range is only meaningful after [`Rational::number`] ran; equality and
/// hashing ignore it and compare the shape of the tree only.
#[derive(Debug, Clone)]
pub struct Rational {
    pub(crate) node: Node,
    pub(crate) min: Position,
    pub(crate) max: Position,
}

impl PartialEq for Rational {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl Eq for Rational {}

impl Hash for Rational {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node.hash(state)
    }
}

impl From<Node> for Rational {
    fn from(node: Node) -> Self {
        Self {
            node,
            min: 0,
            max: 0,
        }
    }
}

impl Rational {
    pub fn epsilon() -> Self {
        Node::Epsilon.into()
    }

    pub fn letter(letter: char) -> Self {
        Node::Letter(letter).into()
    }

    pub fn union(self, other: Rational) -> Self {
        Node::Union(Box::new(self), Box::new(other)).into()
    }

    /// Concatenates two expressions. An `ε` operand is dropped instead of
    /// being wrapped in a new node: `ε . a` is `a`.
    pub fn concat(self, other: Rational) -> Self {
        if self.is_epsilon() {
            other
        } else if other.is_epsilon() {
            self
        } else {
            Node::Concat(Box::new(self), Box::new(other)).into()
        }
    }

    pub fn star(self) -> Self {
        Node::Star(Box::new(self)).into()
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Smallest letter position in this subtree, `0` if it has no letters.
    pub fn position_min(&self) -> Position {
        self.min
    }

    /// Largest letter position in this subtree, `0` if it has no letters.
    pub fn position_max(&self) -> Position {
        self.max
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self.node, Node::Epsilon)
    }

    /// Returns true if the empty word belongs to the language of this expression.
    pub fn contains_empty_word(&self) -> bool {
        match &self.node {
            Node::Epsilon => true,
            Node::Letter(_) => false,
            Node::Union(l, r) => l.contains_empty_word() || r.contains_empty_word(),
            Node::Concat(l, r) => l.contains_empty_word() && r.contains_empty_word(),
            Node::Star(_) => true,
        }
    }

    pub fn alphabet(&self) -> BTreeSet<char> {
        let mut alphabet = BTreeSet::new();
        self.search_alphabet(&mut alphabet);
        alphabet
    }

    fn search_alphabet(&self, alphabet: &mut BTreeSet<char>) {
        match &self.node {
            Node::Epsilon => {}
            Node::Letter(c) => {
                alphabet.insert(*c);
            }
            Node::Star(e) => e.search_alphabet(alphabet),
            Node::Union(l, r) | Node::Concat(l, r) => {
                l.search_alphabet(alphabet);
                r.search_alphabet(alphabet);
            }
        }
    }
}

/// Union of two possibly absent expressions, where absence is the empty language.
pub fn union(left: Option<Rational>, right: Option<Rational>) -> Option<Rational> {
    match (left, right) {
        (None, r) => r,
        (l, None) => l,
        (Some(l), Some(r)) => Some(l.union(r)),
    }
}

/// Concatenation of two possibly absent expressions. The empty language absorbs.
pub fn concat(left: Option<Rational>, right: Option<Rational>) -> Option<Rational> {
    Some(left?.concat(right?))
}

/// Kleene star of a possibly absent expression: `∅*` is `ε`.
pub fn star(inner: Option<Rational>) -> Rational {
    inner.map_or_else(Rational::epsilon, Rational::star)
}

/// Displays a possibly absent expression, printing `∅` for the empty language.
pub fn display(rational: Option<&Rational>) -> impl Display + '_ {
    MaybeRational(rational)
}

struct MaybeRational<'a>(Option<&'a Rational>);

impl Display for MaybeRational<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(r) => write!(f, "{r}"),
            None => write!(f, "∅"),
        }
    }
}

impl Display for Rational {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.node {
            Node::Epsilon => write!(f, "ε"),
            Node::Letter(c) => write!(f, "{c}"),
            Node::Union(l, r) => write!(f, "({l} + {r})"),
            Node::Concat(l, r) => write!(f, "[{l} . {r}]"),
            Node::Star(e) => write!(f, "{{{e}}}*"),
        }
    }
}
