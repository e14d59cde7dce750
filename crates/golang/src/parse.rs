use crate::error::{GoError, Result};
use symgraph_graph::{Position, SourceRange};
use tree_sitter::{Node, Parser, Tree};

pub fn parser() -> Result<Parser> {
    let language: tree_sitter::Language = tree_sitter_go::LANGUAGE.into();
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| GoError::tree_sitter(format!("Failed to set language: {e}")))?;
    Ok(parser)
}

/// Parse one file; any syntax error is fatal.
pub fn parse(parser: &mut Parser, source: &str, file: &str) -> Result<Tree> {
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| GoError::tree_sitter(format!("Parser produced no tree for {file}")))?;

    let root = tree.root_node();
    if root.has_error() {
        let at = first_error(root).unwrap_or(root).start_position();
        return Err(GoError::Syntax {
            file: file.to_string(),
            line: at.row + 1,
            column: at.column + 1,
        });
    }

    Ok(tree)
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .filter(|child| child.has_error() || child.is_missing())
        .find_map(first_error);
    found
}

pub fn text<'a>(node: Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or_default()
}

/// 1-based source range of a node.
pub fn range(node: Node, file: &str) -> SourceRange {
    let start = node.start_position();
    let end = node.end_position();
    SourceRange {
        file: file.to_string(),
        start: Position {
            line: start.row + 1,
            column: start.column + 1,
        },
        end: Position {
            line: end.row + 1,
            column: end.column + 1,
        },
    }
}

/// Named children, skipping comments.
pub fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// All children bound to `field`.
pub fn field_children<'t>(node: Node<'t>, field: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children_by_field_name(field, &mut cursor).collect()
}

/// Text of a string literal without its quotes.
pub fn unquote(literal: &str) -> &str {
    literal.trim_matches(|c| c == '"' || c == '`')
}
