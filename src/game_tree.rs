use fnv::FnvHashMap;
use itertools::Itertools;
use std::fmt;

pub type Payoff = f64;
pub type ScoreBoard = FnvHashMap<Player, Payoff>;

#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Debug)]
pub struct Player(pub String);

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'a> From<&'a str> for Player {
    fn from(x: &'a str) -> Self {
        Player(x.to_owned())
    }
}

impl From<String> for Player {
    fn from(x: String) -> Self {
        Player(x)
    }
}

/// Actions compare by their identifier, which is what tie-breaking relies on.
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Debug)]
pub struct Action(pub String);

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'a> From<&'a str> for Action {
    fn from(x: &'a str) -> Self {
        Action(x.to_owned())
    }
}

impl From<String> for Action {
    fn from(x: String) -> Self {
        Action(x)
    }
}

#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Copy, Clone, Debug)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Decision {
        name: String,
        player: Player,
        actions: Vec<(Action, NodeId)>,
    },
    Terminal { name: String, payoffs: ScoreBoard },
}
use self::Node::*;

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Decision { name, .. } | Terminal { name, .. } => name.as_str(),
        }
    }

    /// The player to move, `None` at a leaf.
    pub fn player(&self) -> Option<&Player> {
        match self {
            Decision { player, .. } => Some(player),
            Terminal { .. } => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Terminal { .. })
    }
}

/// A finite extensive-form game of perfect information.
///
/// Nodes live in an arena and refer to their children by `NodeId`. The tree
/// is never modified after construction; solving only reads it. Structural
/// validity (no cycles, no shared or missing children, complete payoffs) is
/// checked when the tree is solved, since `from_parts` accepts arbitrary
/// node lists.
#[derive(Clone, Debug, PartialEq)]
pub struct GameTree {
    players: Vec<Player>,
    nodes: Vec<Node>,
    root: NodeId,
    // display text for actions, never used for comparison
    captions: FnvHashMap<Action, String>,
}

impl GameTree {
    pub fn builder<I, P>(players: I) -> GameTreeBuilder
    where
        I: IntoIterator<Item = P>,
        P: Into<Player>,
    {
        GameTreeBuilder {
            players: players.into_iter().map(Into::into).collect(),
            nodes: Vec::new(),
            captions: FnvHashMap::default(),
        }
    }

    pub fn from_parts(players: Vec<Player>, nodes: Vec<Node>, root: NodeId) -> Self {
        GameTree {
            players,
            nodes,
            root,
            captions: FnvHashMap::default(),
        }
    }

    /// How `action` is shown in diagrams: its caption if one was given, the
    /// identifier otherwise.
    pub fn caption<'a>(&'a self, action: &'a Action) -> &'a str {
        self.captions.get(action).map_or(action.0.as_str(), String::as_str)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node reached by playing `action` at `id`.
    pub fn child(&self, id: NodeId, action: &Action) -> Option<NodeId> {
        match self.node(id)? {
            Decision { actions, .. } => actions
                .iter()
                .find(|&&(ref a, _)| a == action)
                .map(|&(_, c)| c),
            Terminal { .. } => None,
        }
    }

    /// Every player the tree mentions: the declared players first, then any
    /// other owner or payoff holder in arena order.
    pub fn referenced_players(&self) -> Vec<Player> {
        let mentioned = self.nodes.iter().flat_map(|n| match n {
            Decision { player, .. } => vec![player],
            Terminal { payoffs, .. } => payoffs.keys().sorted().collect(),
        });
        self.players
            .iter()
            .chain(mentioned)
            .unique()
            .cloned()
            .collect()
    }
}

/// Builds a tree bottom-up: children are added before the nodes that point
/// at them, so every reference handed out by the builder is valid.
#[derive(Debug)]
pub struct GameTreeBuilder {
    players: Vec<Player>,
    nodes: Vec<Node>,
    captions: FnvHashMap<Action, String>,
}

impl GameTreeBuilder {
    pub fn terminal<S, I, P>(&mut self, name: S, payoffs: I) -> NodeId
    where
        S: Into<String>,
        I: IntoIterator<Item = (P, Payoff)>,
        P: Into<Player>,
    {
        self.push(Terminal {
            name: name.into(),
            payoffs: payoffs.into_iter().map(|(p, x)| (p.into(), x)).collect(),
        })
    }

    pub fn decision<S, P, I, A>(&mut self, name: S, player: P, actions: I) -> NodeId
    where
        S: Into<String>,
        P: Into<Player>,
        I: IntoIterator<Item = (A, NodeId)>,
        A: Into<Action>,
    {
        self.push(Decision {
            name: name.into(),
            player: player.into(),
            actions: actions.into_iter().map(|(a, c)| (a.into(), c)).collect(),
        })
    }

    /// Describes an action wherever it appears, e.g. `C` as `C_Audit`.
    pub fn caption<A, S>(&mut self, action: A, text: S) -> &mut Self
    where
        A: Into<Action>,
        S: Into<String>,
    {
        self.captions.insert(action.into(), text.into());
        self
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn build(self, root: NodeId) -> GameTree {
        GameTree {
            captions: self.captions,
            ..GameTree::from_parts(self.players, self.nodes, root)
        }
    }
}
