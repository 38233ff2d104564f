use crate::game_tree::{Action, GameTree, Node, NodeId};
use crate::solver::EquilibriumResult;
use fnv::FnvHashMap;
use itertools::Itertools;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, EdgeReference, NodeIndex};

#[derive(Debug)]
pub struct Vertex {
    pub id: NodeId,
    pub label: String,
    pub terminal: bool,
}

#[derive(Debug)]
pub struct Branch {
    pub action: Action,
    pub caption: String,
    pub equilibrium: bool,
}

/// The tree as a graph, with equilibrium edges marked.
pub fn graph(tree: &GameTree, result: &EquilibriumResult) -> DiGraph<Vertex, Branch> {
    let players = tree.referenced_players();
    let mut graph = DiGraph::new();
    let mut index = FnvHashMap::<NodeId, NodeIndex>::default();
    for (id, node) in tree.nodes() {
        let label = match node {
            Node::Decision { name, .. } => name.clone(),
            Node::Terminal { name, payoffs } => format!(
                "{}\n({})",
                name,
                players
                    .iter()
                    .map(|p| payoffs.get(p).map_or("?".to_owned(), |x| x.to_string()))
                    .join(", ")
            ),
        };
        let terminal = node.is_terminal();
        index.insert(id, graph.add_node(Vertex { id, label, terminal }));
    }
    for (id, node) in tree.nodes() {
        if let Node::Decision { actions, .. } = node {
            for (action, child) in actions {
                if let (Some(&a), Some(&b)) = (index.get(&id), index.get(child)) {
                    let equilibrium = result.is_on_path(id, *child);
                    let caption = tree.caption(action).to_owned();
                    graph.add_edge(
                        a,
                        b,
                        Branch {
                            action: action.clone(),
                            caption,
                            equilibrium,
                        },
                    );
                }
            }
        }
    }
    graph
}

/// Graphviz source for the game tree with the equilibrium path in red.
/// Decision nodes are light blue, leaves light green with their payoffs.
pub fn dot(tree: &GameTree, result: &EquilibriumResult, title: &str) -> String {
    let graph = graph(tree, result);
    let body = Dot::with_attr_getters(
        &graph,
        &[Config::GraphContentOnly, Config::NodeNoLabel, Config::EdgeNoLabel],
        &|_, e: EdgeReference<Branch>| {
            let branch = e.weight();
            format!(
                "label = \"{}\" color = {} penwidth = 2 ",
                escape(&branch.caption),
                if branch.equilibrium { "red" } else { "black" }
            )
        },
        &|_, (_, v): (NodeIndex, &Vertex)| {
            format!(
                "label = \"{}\" style = filled fillcolor = {} ",
                escape(&v.label),
                if v.terminal { "lightgreen" } else { "lightblue" }
            )
        },
    );
    format!(
        "digraph {{\n    label = \"{}: Game Tree (SPNE in red)\"\n    labelloc = t\n{:?}}}\n",
        escape(title),
        body
    )
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::regulation;
    use crate::solver::solve;
    use petgraph::visit::EdgeRef;

    #[test]
    fn equilibrium_edges_are_marked() {
        let tree = regulation::tree();
        let result = solve(&tree).unwrap();
        let graph = graph(&tree, &result);
        assert_eq!(graph.node_count(), 7);
        assert_eq!(graph.edge_count(), 6);
        let marked = graph
            .edge_references()
            .filter(|e| e.weight().equilibrium)
            .map(|e| (graph[e.source()].label.as_str(), e.weight().action.0.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(marked, vec![("R_A", "D"), ("FF", "A")]);
    }

    #[test]
    fn dot_colors_the_path_and_shows_payoffs() {
        let tree = regulation::tree();
        let result = solve(&tree).unwrap();
        let text = dot(&tree, &result, regulation::TITLE);
        assert!(text.starts_with("digraph {\n"));
        assert!(text.contains("Regulation vs Greenwashing: Game Tree (SPNE in red)"));
        assert_eq!(text.matches("color = red").count(), 2);
        assert_eq!(text.matches("color = black").count(), 4);
        assert!(text.contains("label = \"A_then_D\\n(60, 50)\""));
        assert!(text.contains("label = \"B_then_D\\n(110, -20)\""));
        assert_eq!(text.matches("fillcolor = lightblue").count(), 3);
        assert!(text.trim_end().ends_with('}'));
    }

    #[test]
    fn edges_show_captions_where_given() {
        let tree = regulation::tree();
        let result = solve(&tree).unwrap();
        let text = dot(&tree, &result, regulation::TITLE);
        for caption in ["A_Genuine", "B_Greenwash"] {
            assert_eq!(text.matches(&format!("label = \"{}\"", caption)).count(), 1);
        }
        for caption in ["C_Audit", "D_Ignore"] {
            assert_eq!(text.matches(&format!("label = \"{}\"", caption)).count(), 2);
        }
        assert!(text.contains("label = \"D_Ignore\" color = red"));

        let mut b = GameTree::builder(vec!["P"]);
        let leaf = b.terminal("end", vec![("P", 0.0)]);
        let root = b.decision("start", "P", vec![("go", leaf)]);
        let tree = b.build(root);
        let result = solve(&tree).unwrap();
        assert!(dot(&tree, &result, "t").contains("label = \"go\" color = red"));
    }

    #[test]
    fn labels_are_escaped() {
        assert_eq!(escape("say \"hi\"\nnow"), "say \\\"hi\\\"\\nnow");
    }
}
