use crate::links::LinkSet;
use crate::registry::Registry;
use crate::types::{Graph, Link};

/// Final pass: drop links with an untracked endpoint and emit the graph.
///
/// Nodes come out sorted by id and links by `(from, to)`, so two runs over
/// the same program produce identical output.
pub fn assemble(registry: Registry, candidates: LinkSet) -> Graph {
    let mut dropped = 0usize;
    let links: Vec<Link> = candidates
        .iter()
        .filter(|(from, to)| {
            let keep = registry.contains(from) && registry.contains(to);
            if !keep {
                dropped += 1;
            }
            keep
        })
        .map(|(from, to)| Link::new(from, to))
        .collect();

    if dropped > 0 {
        log::debug!("Dropped {} dangling links", dropped);
    }

    Graph {
        nodes: registry.into_nodes(),
        links,
    }
}
