use crate::focus::{Focus, LinkClass, Sidebar};
use crate::fragment;
use crate::graph_view::GraphView;
use crate::group::Group;
use crate::state::ViewState;
use std::collections::BTreeSet;
use symgraph_graph::{Graph, Link, Node};

/// Node as drawn in a frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameNode<'a> {
    pub node: &'a Node,
    pub group: Group,
    pub selected: bool,
    pub muted: bool,
}

/// Link as drawn in a frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLink<'a> {
    pub link: &'a Link,
    pub class: LinkClass,
}

/// Everything the page renders, derived from the state alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<'a> {
    pub nodes: Vec<FrameNode<'a>>,
    pub links: Vec<FrameLink<'a>>,
    /// Present while a visible node is selected
    pub sidebar: Option<Sidebar>,
    pub labels: bool,
    pub distance: i32,
    pub charge: i32,
}

/// Focus/selection state machine.
///
/// Handlers only mutate [`ViewState`]; [`Viewer::frame`] is the single pure
/// recompute of what is shown.
pub struct Viewer {
    view: GraphView,
    state: ViewState,
}

impl Viewer {
    pub fn new(graph: Graph) -> Self {
        Self {
            view: GraphView::new(graph),
            state: ViewState::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn graph(&self) -> &Graph {
        self.view.graph()
    }

    /// Select `id`, expanded to the type's methods for type nodes.
    ///
    /// Additive selection toggles every expanded id; plain selection
    /// replaces the selection.
    pub fn select(&mut self, id: &str, additive: bool) {
        let expanded = self.view.expand(id);
        if additive {
            for id in expanded {
                if !self.state.selection.remove(&id) {
                    self.state.selection.insert(id);
                }
            }
        } else {
            self.state.selection = expanded.into_iter().collect();
        }
    }

    /// Replace the selection with the union of the expansions of `ids`.
    pub fn select_all<'i>(&mut self, ids: impl IntoIterator<Item = &'i str>) {
        self.state.selection = ids
            .into_iter()
            .flat_map(|id| self.view.expand(id))
            .collect();
    }

    pub fn reset(&mut self) {
        self.state.selection.clear();
    }

    pub fn toggle_group(&mut self, group: Group) {
        if !self.state.groups.remove(&group) {
            self.state.groups.insert(group);
        }
    }

    pub fn set_labels(&mut self, labels: bool) {
        self.state.labels = labels;
    }

    pub fn set_distance(&mut self, distance: i32) {
        self.state.set_distance(distance);
    }

    pub fn set_charge(&mut self, charge: i32) {
        self.state.set_charge(charge);
    }

    /// Case-insensitive substring match on display names, sorted by id.
    pub fn search(&self, term: &str) -> Vec<&Node> {
        if term.is_empty() {
            return Vec::new();
        }
        let term = term.to_lowercase();
        let mut matches: Vec<&Node> = self
            .graph()
            .nodes
            .iter()
            .filter(|node| node.display_name.to_lowercase().contains(&term))
            .collect();
        matches.sort_by(|a, b| a.id.cmp(&b.id));
        matches
    }

    pub fn fragment(&self) -> String {
        fragment::encode(&self.state)
    }

    pub fn restore(&mut self, fragment: &str) {
        self.state = fragment::decode(fragment);
    }

    pub fn frame(&self) -> Frame<'_> {
        let visible = |node: &Node| self.state.is_active(Group::of(node));
        let focus = Focus::compute(&self.view, &self.state.selection, visible);

        let nodes: Vec<FrameNode> = self
            .graph()
            .nodes
            .iter()
            .filter(|node| visible(*node))
            .map(|node| FrameNode {
                node,
                group: Group::of(node),
                selected: focus
                    .as_ref()
                    .is_some_and(|focus| focus.selected.contains(&node.id)),
                muted: focus.as_ref().is_some_and(|focus| focus.is_muted(&node.id)),
            })
            .collect();

        let shown: BTreeSet<&str> = nodes.iter().map(|n| n.node.id.as_str()).collect();
        let links = self
            .graph()
            .links
            .iter()
            .filter(|link| shown.contains(link.from.as_str()) && shown.contains(link.to.as_str()))
            .map(|link| FrameLink {
                link,
                class: focus
                    .as_ref()
                    .map_or(LinkClass::Plain, |focus| focus.classify(link)),
            })
            .collect();

        Frame {
            nodes,
            links,
            sidebar: focus.map(|focus| focus.sidebar),
            labels: self.state.labels,
            distance: self.state.distance,
            charge: self.state.charge,
        }
    }
}
