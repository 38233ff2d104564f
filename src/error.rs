use crate::game_tree::{Action, NodeId, Player};
use thiserror::Error;

/// Structural problems that make a tree unsolvable.
///
/// Every variant names the node where traversal stopped. A malformed tree
/// stays malformed, so there is nothing to retry: fix the definition and
/// solve again.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedTreeError {
    #[error("node {node} is its own descendant")]
    Cycle { node: NodeId },

    #[error("node {node} is reachable from more than one parent")]
    SharedChild { node: NodeId },

    #[error("node {parent} refers to missing child {child}")]
    DanglingChild { parent: NodeId, child: NodeId },

    #[error("root {root} does not exist")]
    DanglingRoot { root: NodeId },

    #[error("decision node {node} has no actions")]
    NoActions { node: NodeId },

    #[error("decision node {node} offers action {action} more than once")]
    DuplicateAction { node: NodeId, action: Action },

    #[error("terminal node {node} has no payoff for {player}")]
    MissingPayoff { node: NodeId, player: Player },

    #[error("terminal node {node} has a non-finite payoff for {player}")]
    InvalidPayoff { node: NodeId, player: Player },
}
