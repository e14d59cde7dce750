use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;
use symgraph_graph::{Graph, Node, NodeKind};

/// Read-only index over an assembled graph.
///
/// Node weights are positions in `graph.nodes`, so the petgraph index and the
/// wire model never disagree.
pub struct GraphView {
    graph: Graph,
    index: DiGraph<usize, ()>,
    by_id: HashMap<String, NodeIndex>,
    methods: HashMap<String, Vec<String>>,
}

impl GraphView {
    pub fn new(graph: Graph) -> Self {
        let mut index = DiGraph::with_capacity(graph.nodes.len(), graph.links.len());
        let mut by_id = HashMap::with_capacity(graph.nodes.len());
        let mut methods: HashMap<String, Vec<String>> = HashMap::new();

        for (position, node) in graph.nodes.iter().enumerate() {
            by_id.insert(node.id.clone(), index.add_node(position));
            if let (true, Some(parent)) = (node.is_method(), &node.parent_id) {
                methods.entry(parent.clone()).or_default().push(node.id.clone());
            }
        }

        let mut skipped = 0usize;
        for link in &graph.links {
            match (by_id.get(&link.from), by_id.get(&link.to)) {
                (Some(from), Some(to)) => {
                    index.add_edge(*from, *to, ());
                }
                _ => skipped += 1,
            }
        }
        if skipped > 0 {
            log::debug!("Ignored {} links with unknown endpoints", skipped);
        }

        for ids in methods.values_mut() {
            ids.sort();
        }

        Self {
            graph,
            index,
            by_id,
            methods,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.by_id.get(id).map(|ix| &self.graph.nodes[self.index[*ix]])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Method nodes declared on the type `type_id`, sorted.
    pub fn methods_of(&self, type_id: &str) -> &[String] {
        self.methods.get(type_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// `id` itself, plus its methods when it is a type. Unknown ids expand
    /// to nothing.
    pub fn expand(&self, id: &str) -> Vec<String> {
        let Some(node) = self.node(id) else {
            return Vec::new();
        };
        let mut ids = vec![node.id.clone()];
        if node.kind == NodeKind::Type {
            ids.extend(self.methods_of(id).iter().cloned());
        }
        ids
    }

    /// Nodes adjacent to `id` in `direction`.
    pub fn neighbors(&self, id: &str, direction: Direction) -> Vec<&Node> {
        let Some(ix) = self.by_id.get(id) else {
            return Vec::new();
        };
        self.index
            .neighbors_directed(*ix, direction)
            .map(|n| &self.graph.nodes[self.index[n]])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use symgraph_graph::{Link, Subtype};

    fn node(id: &str, kind: NodeKind, subtype: Subtype, parent: Option<&str>) -> Node {
        Node {
            kind,
            subtype: Some(subtype),
            package: "pkg".to_string(),
            id: id.to_string(),
            display_name: id.to_string(),
            parent_id: parent.map(str::to_string),
            is_test: false,
            source_range: None,
        }
    }

    fn view() -> GraphView {
        GraphView::new(Graph {
            nodes: vec![
                node("(*pkg.A).Close", NodeKind::Func, Subtype::Method, Some("pkg.A")),
                node("(pkg.A).Open", NodeKind::Func, Subtype::Method, Some("pkg.A")),
                node("(pkg.A).f", NodeKind::Var, Subtype::Field, Some("pkg.A")),
                node("pkg.A", NodeKind::Type, Subtype::Struct, None),
                node("pkg.run", NodeKind::Func, Subtype::Func, None),
            ],
            links: vec![
                Link::new("pkg.run", "pkg.A"),
                Link::new("pkg.run", "pkg.missing"),
            ],
        })
    }

    #[test]
    fn type_expands_to_its_methods_only() {
        let view = view();
        assert_eq!(
            view.expand("pkg.A"),
            vec!["pkg.A", "(*pkg.A).Close", "(pkg.A).Open"]
        );
        assert_eq!(view.expand("pkg.run"), vec!["pkg.run"]);
        assert!(view.expand("pkg.nope").is_empty());
    }

    #[test]
    fn neighbors_follow_known_links() {
        let view = view();
        let out: Vec<&str> = view
            .neighbors("pkg.run", Direction::Outgoing)
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(out, vec!["pkg.A"]);

        let into: Vec<&str> = view
            .neighbors("pkg.A", Direction::Incoming)
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(into, vec!["pkg.run"]);
    }
}
