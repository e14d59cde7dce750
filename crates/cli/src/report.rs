use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use symgraph_graph::{Graph, Node};
use symgraph_viewer::Viewer;

/// Dependency listing: one block per node with outgoing links.
///
/// ```text
/// <id> (<label>):
///   - <target id>
/// ```
pub fn render_listing(graph: &Graph) -> String {
    let nodes: HashMap<&str, &Node> = graph.nodes.iter().map(|n| (n.id.as_str(), n)).collect();

    let mut targets: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for link in &graph.links {
        targets
            .entry(link.from.as_str())
            .or_default()
            .insert(link.to.as_str());
    }

    let mut lines = Vec::new();
    for (from, to) in targets {
        let Some(node) = nodes.get(from) else {
            log::debug!("Skipping links from unknown node {from}");
            continue;
        };
        lines.push(format!("{from} ({}):", node.label()));
        lines.extend(to.into_iter().map(|target| format!("  - {target}")));
    }
    lines.join("\n")
}

/// Headless focus over a selection, as the viewer sidebar shows it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FocusReport {
    pub selected: Vec<String>,
    pub outgoing: Vec<String>,
    pub incoming: Vec<String>,
}

impl FocusReport {
    /// Type ids expand to their methods; unknown ids select nothing.
    pub fn compute(graph: Graph, ids: &[String]) -> Self {
        let mut viewer = Viewer::new(graph);
        viewer.select_all(ids.iter().map(String::as_str));
        match viewer.frame().sidebar {
            Some(sidebar) => Self {
                selected: sidebar.selected,
                outgoing: sidebar.outgoing,
                incoming: sidebar.incoming,
            },
            None => Self::default(),
        }
    }

    pub fn render_text(&self) -> String {
        let mut lines = Vec::new();
        for (title, ids) in [
            ("Selected", &self.selected),
            ("Outgoing", &self.outgoing),
            ("Incoming", &self.incoming),
        ] {
            lines.push(format!("{title} ({}):", ids.len()));
            lines.extend(ids.iter().map(|id| format!("  - {id}")));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use symgraph_graph::{Link, NodeKind, Subtype};

    fn node(id: &str, kind: NodeKind, subtype: Subtype, parent: Option<&str>) -> Node {
        Node {
            kind,
            subtype: Some(subtype),
            package: "bank".to_string(),
            id: id.to_string(),
            display_name: id.to_string(),
            parent_id: parent.map(str::to_string),
            is_test: false,
            source_range: None,
        }
    }

    fn account() -> Graph {
        Graph {
            nodes: vec![
                node(
                    "(*bank.Account).Withdraw",
                    NodeKind::Func,
                    Subtype::Method,
                    Some("bank.Account"),
                ),
                node(
                    "(bank.Account).Balance",
                    NodeKind::Var,
                    Subtype::Field,
                    Some("bank.Account"),
                ),
                node("bank.Account", NodeKind::Type, Subtype::Struct, None),
                node("bank.Limit", NodeKind::Const, Subtype::Basic, None),
            ],
            links: vec![
                Link::new("(*bank.Account).Withdraw", "bank.Account"),
                Link::new("(*bank.Account).Withdraw", "(bank.Account).Balance"),
                Link::new("(*bank.Account).Withdraw", "bank.Limit"),
                Link::new("(bank.Account).Balance", "bank.Account"),
            ],
        }
    }

    #[test]
    fn listing_groups_targets_by_source() {
        assert_eq!(
            render_listing(&account()),
            "(*bank.Account).Withdraw (method):\n\
             \x20 - (bank.Account).Balance\n\
             \x20 - bank.Account\n\
             \x20 - bank.Limit\n\
             (bank.Account).Balance (var):\n\
             \x20 - bank.Account"
        );
    }

    #[test]
    fn listing_of_unlinked_graph_is_empty() {
        let mut graph = account();
        graph.links.clear();
        assert_eq!(render_listing(&graph), "");
    }

    #[test]
    fn focus_expands_types() {
        let report = FocusReport::compute(account(), &["bank.Account".to_string()]);
        assert_eq!(
            report,
            FocusReport {
                selected: vec![
                    "(*bank.Account).Withdraw".to_string(),
                    "bank.Account".to_string()
                ],
                outgoing: vec![
                    "(bank.Account).Balance".to_string(),
                    "bank.Limit".to_string()
                ],
                incoming: vec!["(bank.Account).Balance".to_string()],
            }
        );
        assert_eq!(
            report.render_text(),
            "Selected (2):\n\
             \x20 - (*bank.Account).Withdraw\n\
             \x20 - bank.Account\n\
             Outgoing (2):\n\
             \x20 - (bank.Account).Balance\n\
             \x20 - bank.Limit\n\
             Incoming (1):\n\
             \x20 - (bank.Account).Balance"
        );
    }

    #[test]
    fn unknown_ids_focus_nothing() {
        let report = FocusReport::compute(account(), &["bank.Missing".to_string()]);
        assert_eq!(report, FocusReport::default());
    }
}
