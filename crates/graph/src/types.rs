use crate::error::Result;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Type,
    Func,
    Const,
    Var,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Func => "func",
            Self::Const => "const",
            Self::Var => "var",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind refinement. Meaning depends on the node kind:
/// types are `struct | interface | basic | func | name`,
/// functions `method | func`, variables `field | basic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subtype {
    Struct,
    Interface,
    Basic,
    Func,
    Name,
    Method,
    Field,
}

impl Subtype {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Struct => "struct",
            Self::Interface => "interface",
            Self::Basic => "basic",
            Self::Func => "func",
            Self::Name => "name",
            Self::Method => "method",
            Self::Field => "field",
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Graph node as emitted in the output artifact.
///
/// Field order is part of the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<Subtype>,

    /// Package path (empty when unknown)
    #[serde(rename = "pkg", default)]
    pub package: String,

    pub id: String,

    /// `Name`, or `Owner.Name` for fields and methods
    #[serde(rename = "name")]
    pub display_name: String,

    #[serde(rename = "parent", default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    #[serde(rename = "test", default, skip_serializing_if = "is_false")]
    pub is_test: bool,

    #[serde(rename = "position", default, skip_serializing_if = "Option::is_none")]
    pub source_range: Option<String>,
}

impl Node {
    pub fn is_method(&self) -> bool {
        self.kind == NodeKind::Func && self.subtype == Some(Subtype::Method)
    }

    /// Label used by text listings: the kind, refined to `method` for methods.
    pub fn label(&self) -> &'static str {
        if self.is_method() {
            "method"
        } else {
            self.kind.as_str()
        }
    }
}

/// Directed dependency `from -> to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Link {
    pub from: String,
    pub to: String,
}

impl Link {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Assembled symbol dependency graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub nodes: Vec<Node>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub links: Vec<Link>,
}

impl Graph {
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Compact JSON, safe to embed inside an HTML `<script>` element.
    pub fn to_json(&self) -> Result<String> {
        Ok(escape_html(&serde_json::to_string(self)?))
    }

    /// Two-space indented JSON with the same escaping as [`Graph::to_json`].
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(escape_html(&serde_json::to_string_pretty(self)?))
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

/// Rewrite `<`, `>`, `&`, U+2028 and U+2029 as `\uXXXX` escapes.
///
/// These characters can only occur inside JSON strings, so the rewrite keeps
/// the document valid.
fn escape_html(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for ch in json.chars() {
        match ch {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(ch),
        }
    }
    out
}
