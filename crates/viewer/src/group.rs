use std::fmt;
use symgraph_graph::{Node, NodeKind};

/// Filter category of a node in the viewer legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Group {
    Test,
    Type,
    Method,
    Func,
    Const,
    Var,
}

impl Group {
    /// Legend order.
    pub const ALL: [Group; 6] = [
        Group::Test,
        Group::Type,
        Group::Method,
        Group::Func,
        Group::Const,
        Group::Var,
    ];

    /// Test artifacts form their own group regardless of kind; methods are
    /// split out of functions.
    pub fn of(node: &Node) -> Self {
        if node.is_test {
            return Self::Test;
        }
        if node.is_method() {
            return Self::Method;
        }
        match node.kind {
            NodeKind::Type => Self::Type,
            NodeKind::Func => Self::Func,
            NodeKind::Const => Self::Const,
            NodeKind::Var => Self::Var,
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|group| group.as_str() == name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Type => "type",
            Self::Method => "method",
            Self::Func => "func",
            Self::Const => "const",
            Self::Var => "var",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use symgraph_graph::Subtype;

    fn node(kind: NodeKind, subtype: Option<Subtype>, is_test: bool) -> Node {
        Node {
            kind,
            subtype,
            package: "pkg".to_string(),
            id: "pkg.X".to_string(),
            display_name: "X".to_string(),
            parent_id: None,
            is_test,
            source_range: None,
        }
    }

    #[test]
    fn test_flag_wins_over_kind() {
        assert_eq!(Group::of(&node(NodeKind::Func, Some(Subtype::Method), true)), Group::Test);
        assert_eq!(Group::of(&node(NodeKind::Func, Some(Subtype::Method), false)), Group::Method);
        assert_eq!(Group::of(&node(NodeKind::Func, Some(Subtype::Func), false)), Group::Func);
        assert_eq!(Group::of(&node(NodeKind::Var, Some(Subtype::Field), false)), Group::Var);
    }

    #[test]
    fn names_round_trip() {
        for group in Group::ALL {
            assert_eq!(Group::parse(group.as_str()), Some(group));
        }
        assert_eq!(Group::parse("struct"), None);
    }
}
