//! Regulation vs greenwashing.
//!
//! The Firm either invests genuinely (`A`) or greenwashes (`B`). Having seen
//! that, the Regulator audits (`C`) or ignores (`D`).

use crate::game_tree::{GameTree, Payoff};

pub const FIRM: &str = "Firm";
pub const REGULATOR: &str = "Regulator";
pub const TITLE: &str = "Regulation vs Greenwashing";

/// Payoffs as (Firm, Regulator), keyed by the two moves.
const OUTCOMES: [(&str, &str, Payoff, Payoff); 4] = [
    ("A", "C", 60.0, 45.0),
    ("A", "D", 60.0, 50.0),
    ("B", "C", 35.0, 60.0),
    ("B", "D", 110.0, -20.0),
];

/// What each move means; the bare letters stay the action identifiers.
const CAPTIONS: [(&str, &str); 4] = [
    ("A", "A_Genuine"),
    ("B", "B_Greenwash"),
    ("C", "C_Audit"),
    ("D", "D_Ignore"),
];

pub fn tree() -> GameTree {
    let mut b = GameTree::builder(vec![FIRM, REGULATOR]);
    for (action, caption) in CAPTIONS {
        b.caption(action, caption);
    }
    let mut firm = Vec::new();
    for first in ["A", "B"] {
        let mut responses = Vec::new();
        for &(f, r, firm_payoff, regulator_payoff) in OUTCOMES.iter().filter(|o| o.0 == first) {
            let leaf = b.terminal(
                format!("{}_then_{}", f, r),
                vec![(FIRM, firm_payoff), (REGULATOR, regulator_payoff)],
            );
            responses.push((r, leaf));
        }
        firm.push((first, b.decision(format!("R_{}", first), REGULATOR, responses)));
    }
    let root = b.decision("FF", FIRM, firm);
    b.build(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_tree::{Node, Player};

    #[test]
    fn every_outcome_is_a_leaf_two_moves_down() {
        let tree = tree();
        assert_eq!(tree.len(), 7);
        for &(f, r, firm, regulator) in OUTCOMES.iter() {
            let mid = tree.child(tree.root(), &f.into()).unwrap();
            let leaf = tree.child(mid, &r.into()).unwrap();
            match tree.node(leaf).unwrap() {
                Node::Terminal { name, payoffs } => {
                    assert_eq!(*name, format!("{}_then_{}", f, r));
                    assert_eq!(payoffs[&Player::from(FIRM)], firm);
                    assert_eq!(payoffs[&Player::from(REGULATOR)], regulator);
                }
                other => panic!("expected a leaf, got {:?}", other),
            }
        }
    }

    #[test]
    fn moves_carry_their_meaning() {
        let tree = tree();
        assert_eq!(tree.caption(&"B".into()), "B_Greenwash");
        assert_eq!(tree.caption(&"D".into()), "D_Ignore");
        let mid = tree.child(tree.root(), &"A".into()).unwrap();
        assert!(tree.child(mid, &"C".into()).is_some());
        assert!(tree.child(mid, &"C_Audit".into()).is_none());
    }

    #[test]
    fn regulator_moves_second() {
        let tree = tree();
        let root = tree.node(tree.root()).unwrap();
        assert_eq!(root.player(), Some(&Player::from(FIRM)));
        let mid = tree.child(tree.root(), &"B".into()).unwrap();
        let node = tree.node(mid).unwrap();
        assert_eq!(node.name(), "R_B");
        assert_eq!(node.player(), Some(&Player::from(REGULATOR)));
    }
}
