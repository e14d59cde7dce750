use crate::error::Result;
use symgraph_graph::Graph;

const TEMPLATE: &str = include_str!("../assets/viewer.html");

/// Marker in the page template replaced by the graph JSON.
pub const DATA_PLACEHOLDER: &str = "DATA_PLACEHOLDER";

/// Self-contained exploration page for `graph`. The force-layout library is
/// loaded from `/d3.js`.
pub fn render(graph: &Graph) -> Result<String> {
    let json = graph.to_json()?;
    Ok(TEMPLATE.replacen(DATA_PLACEHOLDER, &json, 1))
}
