//! Position analyses over numbered expressions: numbering, first, last and follow sets.
//!
//! All set computations expect the tree to be numbered with [`Rational::number`];
//! on a tree that was never numbered every letter sits at position `0`.

use crate::rational::{Node, Position, Rational};
use std::collections::BTreeSet;

/// A set of letter positions.
pub type Positions = BTreeSet<Position>;

fn span(left: &Rational, right: &Rational) -> (Position, Position) {
    match (left.max, right.max) {
        (0, _) => (right.min, right.max),
        (_, 0) => (left.min, left.max),
        _ => (left.min, right.max),
    }
}

impl Rational {
    /// Numbers the letters of this expression from left to right, starting at 1,
    /// and stores the position range of every subtree.
    ///
    /// Running it again renumbers the whole tree. Returns the number of letters.
    pub fn number(&mut self) -> Position {
        self.number_after(0)
    }

    fn number_after(&mut self, last: Position) -> Position {
        match &mut self.node {
            Node::Epsilon => {
                (self.min, self.max) = (0, 0);
                last
            }
            Node::Letter(_) => {
                (self.min, self.max) = (last + 1, last + 1);
                last + 1
            }
            Node::Union(l, r) | Node::Concat(l, r) => {
                let last = l.number_after(last);
                let last = r.number_after(last);
                let (min, max) = span(l, r);
                (self.min, self.max) = (min, max);
                last
            }
            Node::Star(e) => {
                let last = e.number_after(last);
                let (min, max) = (e.min, e.max);
                (self.min, self.max) = (min, max);
                last
            }
        }
    }

    fn covers(&self, position: Position) -> bool {
        self.max != 0 && self.min <= position && position <= self.max
    }

    /// The positions a match of this expression can start with.
    pub fn first(&self) -> Positions {
        let mut positions = Positions::new();
        self.collect_first(&mut positions);
        positions
    }

    fn collect_first(&self, positions: &mut Positions) {
        match self.node() {
            Node::Epsilon => {}
            Node::Letter(_) => {
                positions.insert(self.min);
            }
            Node::Union(l, r) => {
                l.collect_first(positions);
                r.collect_first(positions);
            }
            Node::Concat(l, r) => {
                l.collect_first(positions);
                if l.contains_empty_word() {
                    r.collect_first(positions);
                }
            }
            Node::Star(e) => e.collect_first(positions),
        }
    }

    /// The positions a match of this expression can end with.
    pub fn last(&self) -> Positions {
        let mut positions = Positions::new();
        self.collect_last(&mut positions);
        positions
    }

    fn collect_last(&self, positions: &mut Positions) {
        match self.node() {
            Node::Epsilon => {}
            Node::Letter(_) => {
                positions.insert(self.max);
            }
            Node::Union(l, r) => {
                l.collect_last(positions);
                r.collect_last(positions);
            }
            Node::Concat(l, r) => {
                r.collect_last(positions);
                if r.contains_empty_word() {
                    l.collect_last(positions);
                }
            }
            Node::Star(e) => e.collect_last(positions),
        }
    }

    /// The positions that may immediately follow a match ending at `position`.
    ///
    /// Every concatenation whose left side can end at `position` contributes the
    /// first positions of its right side, and every star whose body can end at
    /// `position` contributes the first positions of its body.
    pub fn follow(&self, position: Position) -> Positions {
        let mut positions = Positions::new();
        self.collect_follow(position, &mut positions);
        positions
    }

    fn collect_follow(&self, position: Position, positions: &mut Positions) {
        // a subtree without `position` has it in none of its last sets
        if !self.covers(position) {
            return;
        }

        match self.node() {
            Node::Epsilon | Node::Letter(_) => {}
            Node::Union(l, r) => {
                l.collect_follow(position, positions);
                r.collect_follow(position, positions);
            }
            Node::Concat(l, r) => {
                if l.last().contains(&position) {
                    r.collect_first(positions);
                }
                l.collect_follow(position, positions);
                r.collect_follow(position, positions);
            }
            Node::Star(e) => {
                if e.last().contains(&position) {
                    e.collect_first(positions);
                }
                e.collect_follow(position, positions);
            }
        }
    }

    /// The follow sets of all positions at once, indexed by position.
    ///
    /// Index `0` holds an empty set. `follows()[p] == follow(p)` for every position `p`.
    pub fn follows(&self) -> Vec<Positions> {
        let mut table = vec![Positions::new(); self.max + 1];
        self.collect_follows(&mut table);
        table
    }

    fn collect_follows(&self, table: &mut [Positions]) {
        match self.node() {
            Node::Epsilon | Node::Letter(_) => {}
            Node::Union(l, r) => {
                l.collect_follows(table);
                r.collect_follows(table);
            }
            Node::Concat(l, r) => {
                let first = r.first();
                for p in l.last() {
                    table[p].extend(first.iter().copied());
                }
                l.collect_follows(table);
                r.collect_follows(table);
            }
            Node::Star(e) => {
                let first = e.first();
                for p in e.last() {
                    table[p].extend(first.iter().copied());
                }
                e.collect_follows(table);
            }
        }
    }

    /// The letter at `position`, if some letter of this expression has it.
    pub fn letter_at(&self, position: Position) -> Option<char> {
        if !self.covers(position) {
            return None;
        }

        match self.node() {
            Node::Epsilon => None,
            Node::Letter(c) => Some(*c),
            Node::Union(l, r) | Node::Concat(l, r) => {
                l.letter_at(position).or_else(|| r.letter_at(position))
            }
            Node::Star(e) => e.letter_at(position),
        }
    }

    /// The letters of this expression in position order.
    pub fn letters(&self) -> Vec<char> {
        let mut letters = Vec::new();
        self.search_letters(&mut letters);
        letters
    }

    fn search_letters(&self, letters: &mut Vec<char>) {
        match self.node() {
            Node::Epsilon => {}
            Node::Letter(c) => letters.push(*c),
            Node::Union(l, r) | Node::Concat(l, r) => {
                l.search_letters(letters);
                r.search_letters(letters);
            }
            Node::Star(e) => e.search_letters(letters),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{parse_rational, Node, Positions, Rational};

    fn set(positions: &[usize]) -> Positions {
        positions.iter().copied().collect()
    }

    fn numbered(input: &str) -> Rational {
        let mut r = parse_rational(input).unwrap();
        r.number();
        r
    }

    fn check_bounds(r: &Rational) {
        assert!(r.position_min() <= r.position_max());
        match r.node() {
            Node::Epsilon => assert_eq!((r.position_min(), r.position_max()), (0, 0)),
            Node::Letter(_) => assert_eq!(r.position_min(), r.position_max()),
            Node::Union(l, r2) | Node::Concat(l, r2) => {
                check_bounds(l);
                check_bounds(r2);
                if l.position_max() != 0 && r2.position_max() != 0 {
                    assert_eq!(r.position_min(), l.position_min());
                    assert_eq!(r.position_max(), r2.position_max());
                    assert_eq!(l.position_max() + 1, r2.position_min());
                }
            }
            Node::Star(e) => {
                check_bounds(e);
                assert_eq!(
                    (r.position_min(), r.position_max()),
                    (e.position_min(), e.position_max())
                );
            }
        }
    }

    #[test]
    fn numbering() {
        let mut r = parse_rational("a.(b + ε)*.c + (a.b)*").unwrap();
        assert_eq!(r.number(), 5);
        assert_eq!((r.position_min(), r.position_max()), (1, 5));
        check_bounds(&r);

        assert_eq!(
            (1..=5).map(|p| r.letter_at(p).unwrap()).collect::<String>(),
            "abcab"
        );
        assert_eq!(r.letters().into_iter().collect::<String>(), "abcab");
        assert_eq!(r.letter_at(0), None);
        assert_eq!(r.letter_at(6), None);

        // renumbering is stable
        assert_eq!(r.number(), 5);
        check_bounds(&r);

        let mut eps = Rational::epsilon();
        assert_eq!(eps.number(), 0);
        assert_eq!((eps.position_min(), eps.position_max()), (0, 0));
    }

    #[test]
    fn epsilon_does_not_reset_numbering() {
        let mut r = parse_rational("a.(ε + b).c").unwrap();
        assert_eq!(r.number(), 3);
        check_bounds(&r);
        assert_eq!(r.letter_at(3), Some('c'));
    }

    #[test]
    fn first_and_last() {
        let r = numbered("(a + b)*.a.b");
        assert_eq!(r.first(), set(&[1, 2, 3]));
        assert_eq!(r.last(), set(&[4]));

        let r = numbered("a.b* + c*");
        assert_eq!(r.first(), set(&[1, 3]));
        assert_eq!(r.last(), set(&[1, 2, 3]));

        let r = numbered("(a + ε).(b + ε)");
        assert_eq!(r.first(), set(&[1, 2]));
        assert_eq!(r.last(), set(&[1, 2]));

        let r = numbered("ε");
        assert!(r.first().is_empty());
        assert!(r.last().is_empty());
    }

    #[test]
    fn first_and_last_within_positions() {
        for input in ["a", "a*.b", "(a.b + c)*.d*", "ε + a.ε.b", "((a*)*)*"] {
            let r = numbered(input);
            let n = r.letters().len();
            let all: Positions = (1..=n).collect();
            assert!(r.first().is_subset(&all), "{input}");
            assert!(r.last().is_subset(&all), "{input}");
            assert_eq!(r.first().is_empty(), n == 0, "{input}");
            assert_eq!(r.last().is_empty(), n == 0, "{input}");
        }
    }

    #[test]
    fn follow() {
        let r = numbered("(a + b)*.a.b");
        assert_eq!(r.follow(1), set(&[1, 2, 3]));
        assert_eq!(r.follow(2), set(&[1, 2, 3]));
        assert_eq!(r.follow(3), set(&[4]));
        assert!(r.follow(4).is_empty());

        // positions 1 and 2 are followed through both stars
        let r = numbered("(a.b*)*.c");
        assert_eq!(r.follow(1), set(&[1, 2, 3]));
        assert_eq!(r.follow(2), set(&[1, 2, 3]));
        assert!(r.follow(3).is_empty());
    }

    #[test]
    fn follow_table_agrees() {
        for input in ["(a + b)*.a.b", "(a.b*)*.c", "a.(b + ε)*.c + (a.b)*", "ε", "a"] {
            let r = numbered(input);
            let table = r.follows();
            assert!(table[0].is_empty());
            for p in 1..table.len() {
                assert_eq!(table[p], r.follow(p), "{input} at {p}");
            }
        }
    }
}
