use crate::graph_view::GraphView;
use petgraph::Direction;
use std::collections::BTreeSet;
use symgraph_graph::{Link, Node};

/// Highlight class of a link in the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkClass {
    /// No focus
    Plain,
    /// Focus active, link outside the neighbourhood
    Muted,
    /// Selected node to an unselected one
    Outbound,
    /// Unselected node to a selected one
    Inbound,
    /// Both ends selected
    Internal,
}

impl LinkClass {
    pub const ALL: [LinkClass; 5] = [
        LinkClass::Plain,
        LinkClass::Muted,
        LinkClass::Outbound,
        LinkClass::Inbound,
        LinkClass::Internal,
    ];

    /// CSS class the page gives the link.
    pub fn css_class(self) -> &'static str {
        match self {
            LinkClass::Plain => "plain",
            LinkClass::Muted => "muted",
            LinkClass::Outbound => "outbound",
            LinkClass::Inbound => "inbound",
            LinkClass::Internal => "internal",
        }
    }

    /// Id of the arrow marker drawn at the link's midpoint.
    pub fn marker(self) -> &'static str {
        match self {
            LinkClass::Plain | LinkClass::Muted => "arrow-default",
            LinkClass::Outbound => "arrow-outgoing",
            LinkClass::Inbound => "arrow-incoming",
            LinkClass::Internal => "arrow-internal",
        }
    }
}

/// Sidebar lists, each de-duplicated and sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sidebar {
    pub selected: Vec<String>,
    pub outgoing: Vec<String>,
    pub incoming: Vec<String>,
}

/// Focus over the visible graph for a non-empty selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Focus {
    pub selected: BTreeSet<String>,
    pub neighbourhood: BTreeSet<String>,
    pub sidebar: Sidebar,
}

impl Focus {
    /// `None` when no selected node is visible.
    pub fn compute(
        view: &GraphView,
        selection: &BTreeSet<String>,
        visible: impl Fn(&Node) -> bool,
    ) -> Option<Self> {
        let selected: BTreeSet<String> = selection
            .iter()
            .filter(|id| view.node(id).is_some_and(&visible))
            .cloned()
            .collect();
        if selected.is_empty() {
            return None;
        }

        let mut outgoing = BTreeSet::new();
        let mut incoming = BTreeSet::new();
        for id in &selected {
            for target in view.neighbors(id, Direction::Outgoing) {
                if visible(target) && !selected.contains(&target.id) {
                    outgoing.insert(target.id.clone());
                }
            }
            for source in view.neighbors(id, Direction::Incoming) {
                if visible(source) && !selected.contains(&source.id) {
                    incoming.insert(source.id.clone());
                }
            }
        }

        let neighbourhood = selected
            .iter()
            .chain(&outgoing)
            .chain(&incoming)
            .cloned()
            .collect();

        Some(Self {
            sidebar: Sidebar {
                selected: selected.iter().cloned().collect(),
                outgoing: outgoing.into_iter().collect(),
                incoming: incoming.into_iter().collect(),
            },
            selected,
            neighbourhood,
        })
    }

    pub fn classify(&self, link: &Link) -> LinkClass {
        match (
            self.selected.contains(&link.from),
            self.selected.contains(&link.to),
        ) {
            (true, true) => LinkClass::Internal,
            (true, false) => LinkClass::Outbound,
            (false, true) => LinkClass::Inbound,
            (false, false) => LinkClass::Muted,
        }
    }

    pub fn is_muted(&self, id: &str) -> bool {
        !self.neighbourhood.contains(id)
    }
}
