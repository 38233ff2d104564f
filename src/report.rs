use crate::game_tree::{Action, GameTree, Node, NodeId, Player, ScoreBoard};
use crate::solver::EquilibriumResult;
use itertools::Itertools;
use std::cmp::Reverse;
use std::fmt;

/// Human-readable account of a solved game.
///
/// Decision nodes are listed deepest stage first, grouped by the player who
/// moves there, each with the moves that lead to it, the chosen action and
/// the payoffs that choice anticipates, followed by what each of its actions
/// would have given the mover. The equilibrium path comes last.
pub struct Report<'a> {
    tree: &'a GameTree,
    result: &'a EquilibriumResult,
    players: Vec<Player>,
}

struct Line<'a> {
    depth: usize,
    node: NodeId,
    player: &'a Player,
    /// Line of the parent decision and the move taken there.
    via: Option<(usize, &'a Action)>,
}

impl<'a> Report<'a> {
    pub fn new(tree: &'a GameTree, result: &'a EquilibriumResult) -> Self {
        Report {
            tree,
            result,
            players: tree.referenced_players(),
        }
    }

    /// Decision nodes in pre-order, each pointing back at its parent's line.
    fn lines(&self) -> Vec<Line<'a>> {
        let tree: &'a GameTree = self.tree;
        let mut out = Vec::new();
        let mut stack = vec![(tree.root(), 0, None)];
        while let Some((id, depth, via)) = stack.pop() {
            if let Some(Node::Decision {
                player, actions, ..
            }) = tree.node(id)
            {
                let at = out.len();
                out.push(Line {
                    depth,
                    node: id,
                    player,
                    via,
                });
                for (action, child) in actions.iter().rev() {
                    stack.push((*child, depth + 1, Some((at, action))));
                }
            }
        }
        out
    }

    fn history(lines: &[Line<'a>], mut at: usize) -> Vec<(&'a Player, &'a Action)> {
        let mut moves = Vec::with_capacity(lines[at].depth);
        while let Some((parent, action)) = lines[at].via {
            moves.push((lines[parent].player, action));
            at = parent;
        }
        moves.reverse();
        moves
    }

    fn rank(&self, player: &Player) -> usize {
        self.players
            .iter()
            .position(|p| p == player)
            .unwrap_or(self.players.len())
    }

    fn tuple(&self, payoffs: &ScoreBoard) -> String {
        let values = self
            .players
            .iter()
            .map(|p| payoffs.get(p).map_or("?".to_owned(), |x| x.to_string()))
            .join(", ");
        format!("({}) = ({})", self.players.iter().join(", "), values)
    }
}

impl<'a> fmt::Display for Report<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let lines = self.lines();
        let order = (0..lines.len())
            .sorted_by_key(|&i| (Reverse(lines[i].depth), self.rank(lines[i].player)));
        for ((_, player), group) in &order.chunk_by(|&i| (lines[i].depth, lines[i].player)) {
            writeln!(f, "{} strategies (best responses by subgame):", player)?;
            for i in group {
                let line = &lines[i];
                let choice = match self.result.choice(line.node) {
                    Some(c) => c,
                    None => continue,
                };
                let history = Self::history(&lines, i);
                let context = if history.is_empty() {
                    "At the start".to_owned()
                } else {
                    format!(
                        "If {}",
                        history
                            .iter()
                            .map(|(p, a)| format!("{} chooses {}", p, a))
                            .join(", then ")
                    )
                };
                write!(f, "  {}: {} chooses {}", context, player, choice.action)?;
                match self.result.payoffs(self.tree, line.node) {
                    Some(payoffs) => writeln!(f, ", anticipating {}", self.tuple(payoffs))?,
                    None => writeln!(f)?,
                }
                self.alternatives(f, line)?;
            }
            writeln!(f)?;
        }
        let outcome = &self.result.outcome;
        writeln!(f, "SPNE (subgame perfect equilibrium):")?;
        for m in &outcome.path {
            writeln!(f, "  {} chooses {}", m.player, m.action)?;
        }
        writeln!(
            f,
            "  Outcome: {}, Payoffs {}",
            outcome.label,
            self.tuple(&outcome.payoffs)
        )
    }
}

impl<'a> Report<'a> {
    /// What the mover expects from each of its actions, and who moves next.
    fn alternatives(&self, f: &mut fmt::Formatter, line: &Line<'a>) -> fmt::Result {
        let actions = match self.tree.node(line.node) {
            Some(Node::Decision { actions, .. }) => actions,
            _ => return Ok(()),
        };
        for (action, child) in actions {
            let value = self
                .result
                .payoffs(self.tree, *child)
                .and_then(|p| p.get(line.player))
                .map_or("?".to_owned(), |x| x.to_string());
            write!(f, "    {}: {} gets {}", action, line.player, value)?;
            match self.result.choice(*child) {
                Some(next) => writeln!(f, " ({} will choose {})", next.player, next.action)?,
                None => writeln!(f)?,
            }
        }
        Ok(())
    }
}
