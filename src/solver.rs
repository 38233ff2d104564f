use crate::error::MalformedTreeError;
use crate::error::MalformedTreeError::*;
use crate::game_tree::{Action, GameTree, Node, NodeId, Payoff, Player, ScoreBoard};
use fnv::{FnvHashMap, FnvHashSet};
use std::cmp::Ordering;

/// How to pick between actions that give the mover the same payoff.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default)]
pub enum TieBreak {
    /// Lexicographically smallest action identifier.
    #[default]
    Lowest,
    /// Lexicographically largest action identifier, i.e. what maximizing the
    /// key `(payoff, action)` does.
    Highest,
}

/// The action a player takes at one decision node, with where it leads.
#[derive(Clone, Debug, PartialEq)]
pub struct Choice {
    pub player: Player,
    pub action: Action,
    pub child: NodeId,
    /// The leaf reached from this node under equilibrium play.
    pub leaf: NodeId,
}

/// One chosen action per decision node reachable from the root.
pub type Strategy = FnvHashMap<NodeId, Choice>;

#[derive(Clone, Debug, PartialEq)]
pub struct Move {
    pub node: NodeId,
    pub player: Player,
    pub action: Action,
    pub child: NodeId,
}

/// Where equilibrium play ends up.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    pub path: Vec<Move>,
    pub leaf: NodeId,
    pub label: String,
    pub payoffs: ScoreBoard,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EquilibriumResult {
    pub strategy: Strategy,
    pub outcome: Outcome,
}

impl EquilibriumResult {
    pub fn choice(&self, node: NodeId) -> Option<&Choice> {
        self.strategy.get(&node)
    }

    pub fn action(&self, node: NodeId) -> Option<&Action> {
        self.choice(node).map(|c| &c.action)
    }

    /// The payoff vector `node` resolves to: its own payoffs at a leaf, the
    /// payoffs of the leaf equilibrium play reaches otherwise.
    pub fn payoffs<'t>(&self, tree: &'t GameTree, node: NodeId) -> Option<&'t ScoreBoard> {
        let leaf = self.choice(node).map_or(node, |c| c.leaf);
        match tree.node(leaf)? {
            Node::Terminal { payoffs, .. } => Some(payoffs),
            Node::Decision { .. } => None,
        }
    }

    /// Whether the edge `from -> to` is played in equilibrium.
    pub fn is_on_path(&self, from: NodeId, to: NodeId) -> bool {
        self.outcome
            .path
            .iter()
            .any(|m| m.node == from && m.child == to)
    }

    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.outcome.path.iter().map(|m| &m.action)
    }
}

/// Solves with the default tie-break rule.
pub fn solve(tree: &GameTree) -> Result<EquilibriumResult, MalformedTreeError> {
    Solver::new().solve(tree)
}

/// Backward induction over a perfect-information game tree.
///
/// Each decision node takes the action that maximizes its owner's payoff,
/// given that every subgame below it is already resolved the same way. Other
/// players' payoffs play no part in a player's choice.
#[derive(Copy, Clone, Debug, Default)]
pub struct Solver {
    tie_break: TieBreak,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tie_break(mut self, rule: TieBreak) -> Self {
        self.tie_break = rule;
        self
    }

    pub fn solve(&self, tree: &GameTree) -> Result<EquilibriumResult, MalformedTreeError> {
        let mut induction = Induction {
            tree,
            tie_break: self.tie_break,
            players: tree.referenced_players(),
            strategy: Strategy::default(),
            open: FnvHashSet::default(),
            resolved: FnvHashSet::default(),
        };
        let end = induction.resolve(tree.root())?;
        if induction.resolved.len() < tree.len() {
            log::warn!(
                "{} of {} nodes are unreachable from the root and were ignored",
                tree.len() - induction.resolved.len(),
                tree.len()
            );
        }
        let outcome = induction.outcome(end);
        log::info!(
            "equilibrium reaches {} after {} moves",
            outcome.label,
            outcome.path.len()
        );
        Ok(EquilibriumResult {
            strategy: induction.strategy,
            outcome,
        })
    }
}

/// The leaf a subgame resolves to.
#[derive(Copy, Clone)]
struct Resolved<'t> {
    leaf: NodeId,
    label: &'t str,
    payoffs: &'t ScoreBoard,
}

/// A decision node whose children are still being resolved.
struct Frame<'t> {
    id: NodeId,
    player: &'t Player,
    actions: &'t [(Action, NodeId)],
    next: usize,
    // the action whose subgame is being resolved right now
    pending: Option<(&'t Action, NodeId)>,
    seen: FnvHashSet<&'t Action>,
    best: Option<(Payoff, &'t Action, NodeId, Resolved<'t>)>,
}

struct Induction<'t> {
    tree: &'t GameTree,
    tie_break: TieBreak,
    players: Vec<Player>,
    strategy: Strategy,
    // nodes on the current root-to-node path
    open: FnvHashSet<NodeId>,
    resolved: FnvHashSet<NodeId>,
}

impl<'t> Induction<'t> {
    /// Post-order over an explicit stack: every child is resolved before its
    /// parent chooses, and depth costs heap rather than call stack.
    fn resolve(&mut self, root: NodeId) -> Result<Resolved<'t>, MalformedTreeError> {
        let mut stack = Vec::new();
        let mut finished = self.enter(None, root, &mut stack)?;
        while let Some(frame) = stack.last_mut() {
            if let Some(sub) = finished.take() {
                self.offer(frame, sub)?;
            }
            let actions: &'t [(Action, NodeId)] = frame.actions;
            let descend = match actions.get(frame.next) {
                Some(&(ref action, child)) => {
                    frame.next += 1;
                    if !frame.seen.insert(action) {
                        return Err(DuplicateAction {
                            node: frame.id,
                            action: action.clone(),
                        });
                    }
                    frame.pending = Some((action, child));
                    Some((frame.id, child))
                }
                None => None,
            };
            finished = match descend {
                Some((parent, child)) => self.enter(Some(parent), child, &mut stack)?,
                None => match stack.pop() {
                    Some(done) => Some(self.close(done)?),
                    None => None,
                },
            };
        }
        finished.ok_or(DanglingRoot { root })
    }

    /// Resolves a leaf on the spot; a decision node is opened as a new frame.
    fn enter(
        &mut self,
        parent: Option<NodeId>,
        id: NodeId,
        stack: &mut Vec<Frame<'t>>,
    ) -> Result<Option<Resolved<'t>>, MalformedTreeError> {
        if self.open.contains(&id) {
            return Err(Cycle { node: id });
        }
        if self.resolved.contains(&id) {
            return Err(SharedChild { node: id });
        }
        let tree = self.tree;
        let node = tree.node(id).ok_or_else(|| match parent {
            Some(parent) => DanglingChild { parent, child: id },
            None => DanglingRoot { root: id },
        })?;
        match node {
            Node::Terminal { name, payoffs } => {
                self.check_payoffs(id, payoffs)?;
                self.resolved.insert(id);
                Ok(Some(Resolved {
                    leaf: id,
                    label: name,
                    payoffs,
                }))
            }
            Node::Decision {
                player, actions, ..
            } => {
                self.open.insert(id);
                stack.push(Frame {
                    id,
                    player,
                    actions,
                    next: 0,
                    pending: None,
                    seen: FnvHashSet::default(),
                    best: None,
                });
                Ok(None)
            }
        }
    }

    /// Weighs a resolved subgame against the frame's best action so far.
    fn offer(&self, frame: &mut Frame<'t>, sub: Resolved<'t>) -> Result<(), MalformedTreeError> {
        let (action, child) = match frame.pending.take() {
            Some(pending) => pending,
            None => return Ok(()),
        };
        let value = sub
            .payoffs
            .get(frame.player)
            .copied()
            .ok_or_else(|| MissingPayoff {
                node: sub.leaf,
                player: frame.player.clone(),
            })?;
        frame.best = match frame.best {
            Some(b) if !self.prefers((value, action), (b.0, b.1)) => Some(b),
            _ => Some((value, action, child, sub)),
        };
        Ok(())
    }

    fn close(&mut self, frame: Frame<'t>) -> Result<Resolved<'t>, MalformedTreeError> {
        let id = frame.id;
        let (value, action, child, sub) = frame.best.ok_or(NoActions { node: id })?;
        log::debug!("{} {} plays {} for {}", id, frame.player, action, value);
        self.strategy.insert(
            id,
            Choice {
                player: frame.player.clone(),
                action: action.clone(),
                child,
                leaf: sub.leaf,
            },
        );
        self.open.remove(&id);
        self.resolved.insert(id);
        Ok(sub)
    }

    fn prefers(
        &self,
        (value, action): (Payoff, &Action),
        (best, incumbent): (Payoff, &Action),
    ) -> bool {
        match value.partial_cmp(&best) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Equal) => match self.tie_break {
                TieBreak::Lowest => action < incumbent,
                TieBreak::Highest => action > incumbent,
            },
            _ => false,
        }
    }

    fn check_payoffs(&self, id: NodeId, payoffs: &ScoreBoard) -> Result<(), MalformedTreeError> {
        for player in &self.players {
            match payoffs.get(player) {
                None => {
                    return Err(MissingPayoff {
                        node: id,
                        player: player.clone(),
                    })
                }
                Some(x) if !x.is_finite() => {
                    return Err(InvalidPayoff {
                        node: id,
                        player: player.clone(),
                    })
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Replays the strategy from the root.
    fn outcome(&self, end: Resolved<'t>) -> Outcome {
        let mut path = Vec::new();
        let mut id = self.tree.root();
        while let Some(choice) = self.strategy.get(&id) {
            path.push(Move {
                node: id,
                player: choice.player.clone(),
                action: choice.action.clone(),
                child: choice.child,
            });
            id = choice.child;
        }
        Outcome {
            path,
            leaf: end.leaf,
            label: end.label.to_owned(),
            payoffs: end.payoffs.clone(),
        }
    }
}
