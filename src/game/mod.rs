pub mod nim;
pub mod regulation;

use crate::game_tree::{GameTree, GameTreeBuilder, NodeId, Payoff};
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

pub type Points<G> = HashMap<<G as Game>::Player, Payoff>;

/// A game described by its rules rather than by an explicit tree.
pub trait Game {
    type Move: Clone + Display;
    type State: Clone;
    type Player: Eq + Hash + Clone + Display;

    fn new() -> Self::State;
    fn apply(s: &mut Self::State, m: Self::Move);
    fn legal_moves(s: &Self::State) -> Vec<Self::Move>;
    fn players() -> Vec<Self::Player>;
    fn current_player(s: &Self::State) -> Self::Player;
    fn points(s: &Self::State) -> Option<Points<Self>>;
    fn finished(s: &Self::State) -> bool;
}

/// Enumerates every play of `G` from its initial state into an explicit tree.
///
/// Nodes are named after the moves leading to them, joined by `-`. The game
/// must end along every line of play, otherwise this does not terminate.
/// Finished states without points become leaves with no payoffs, and
/// unfinished states without legal moves become decisions without actions;
/// solving the tree reports both.
pub fn expand<G: Game>() -> GameTree {
    let mut builder = GameTree::builder(G::players().iter().map(ToString::to_string));
    let root = grow::<G>(&mut builder, G::new(), "");
    let tree = builder.build(root);
    log::debug!("expanded {} nodes", tree.len());
    tree
}

fn grow<G: Game>(b: &mut GameTreeBuilder, s: G::State, history: &str) -> NodeId {
    let name = if history.is_empty() { "root" } else { history };
    if G::finished(&s) {
        let points = G::points(&s).unwrap_or_default();
        return b.terminal(name, points.into_iter().map(|(p, x)| (p.to_string(), x)));
    }
    let mut children = Vec::new();
    for m in G::legal_moves(&s) {
        let label = m.to_string();
        let mut next = s.clone();
        G::apply(&mut next, m);
        let line = if history.is_empty() {
            label.clone()
        } else {
            format!("{}-{}", history, label)
        };
        children.push((label, grow::<G>(b, next, &line)));
    }
    b.decision(name, G::current_player(&s).to_string(), children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_tree::{Node, Player};

    /// One move, then whoever moved gets what they picked.
    struct Pick;

    impl Game for Pick {
        type Move = u8;
        type State = Option<u8>;
        type Player = &'static str;

        fn new() -> Self::State {
            None
        }

        fn apply(s: &mut Self::State, m: Self::Move) {
            *s = Some(m);
        }

        fn legal_moves(_: &Self::State) -> Vec<Self::Move> {
            vec![1, 2]
        }

        fn players() -> Vec<Self::Player> {
            vec!["me"]
        }

        fn current_player(_: &Self::State) -> Self::Player {
            "me"
        }

        fn points(s: &Self::State) -> Option<Points<Self>> {
            s.map(|m| vec![("me", m as Payoff)].into_iter().collect())
        }

        fn finished(s: &Self::State) -> bool {
            s.is_some()
        }
    }

    #[test]
    fn expansion_names_nodes_by_their_line() {
        let tree = expand::<Pick>();
        assert_eq!(tree.len(), 3);
        let root = tree.node(tree.root()).unwrap();
        assert_eq!(root.name(), "root");
        assert_eq!(root.player().map(|p| p.0.as_str()), Some("me"));
        let two = tree.child(tree.root(), &"2".into()).unwrap();
        match tree.node(two).unwrap() {
            Node::Terminal { name, payoffs } => {
                assert_eq!(name, "2");
                assert_eq!(payoffs[&Player::from("me")], 2.0);
            }
            other => panic!("expected a leaf, got {:?}", other),
        }
    }
}
