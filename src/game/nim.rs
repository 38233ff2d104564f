use crate::game::{Game, Points};
use std::cmp::min;
use std::fmt;

/// Players take turns adding 1 to `MAX_TAKE` to a running total. Whoever
/// brings it to `TARGET` wins.
pub struct Nim;

pub const TARGET: u32 = 10;
pub const MAX_TAKE: u32 = 3;

#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum Seat {
    First,
    Second,
}

impl Seat {
    pub fn other(self) -> Self {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Seat::First => write!(f, "First"),
            Seat::Second => write!(f, "Second"),
        }
    }
}

impl Game for Nim {
    type Move = u32;
    type State = (u32, Seat);
    type Player = Seat;

    fn new() -> Self::State {
        (0, Seat::First)
    }

    fn apply(s: &mut Self::State, m: Self::Move) {
        s.0 += m;
        s.1 = s.1.other();
    }

    fn players() -> Vec<Self::Player> {
        vec![Seat::First, Seat::Second]
    }

    fn current_player(s: &Self::State) -> Self::Player {
        s.1
    }

    fn legal_moves(s: &Self::State) -> Vec<Self::Move> {
        (1..=min(MAX_TAKE, TARGET - s.0)).collect()
    }

    fn points(s: &Self::State) -> Option<Points<Self>> {
        if Self::finished(s) {
            // the seat to move is the one that did not reach the target
            let p = s.1;
            Some(vec![(p, -1.0), (p.other(), 1.0)].into_iter().collect())
        } else {
            None
        }
    }

    fn finished(s: &Self::State) -> bool {
        s.0 >= TARGET
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::expand;
    use crate::game_tree::Player;
    use crate::solver::solve;

    #[test]
    fn moves_stop_at_the_target() {
        assert_eq!(Nim::legal_moves(&(0, Seat::First)), vec![1, 2, 3]);
        assert_eq!(Nim::legal_moves(&(TARGET - 2, Seat::Second)), vec![1, 2]);
    }

    #[test]
    fn reaching_the_target_wins() {
        let mut s = Nim::new();
        Nim::apply(&mut s, 3);
        Nim::apply(&mut s, 3);
        Nim::apply(&mut s, 3);
        assert!(!Nim::finished(&s));
        Nim::apply(&mut s, 1);
        let points = Nim::points(&s).unwrap();
        assert_eq!(points[&Seat::Second], 1.0);
        assert_eq!(points[&Seat::First], -1.0);
    }

    #[test]
    fn full_tree_has_every_line_of_play() {
        // n(r) = 1 + n(r-1) + n(r-2) + n(r-3) nodes with r left to go
        assert_eq!(expand::<Nim>().len(), 600);
    }

    #[test]
    fn first_player_opens_onto_a_multiple_of_four_from_the_target() {
        let tree = expand::<Nim>();
        let result = solve(&tree).unwrap();
        assert_eq!(result.action(tree.root()), Some(&"2".into()));
        assert_eq!(result.outcome.payoffs[&Player::from("First")], 1.0);
        // the losing side gives up as cheaply as the tie-break allows
        let line = result.actions().map(|a| a.0.as_str()).collect::<Vec<_>>();
        assert_eq!(line, vec!["2", "1", "3", "1", "3"]);
        assert_eq!(result.outcome.label, "2-1-3-1-3");
    }
}
