use crate::assembler::assemble;
use crate::config::ExtractConfig;
use crate::registry::Registry;
use crate::resolver::ReferenceResolver;
use crate::structural::StructuralDeriver;
use crate::symbol::Program;
use crate::types::Graph;

/// Build the symbol dependency graph of a resolved program
pub struct GraphBuilder {
    config: ExtractConfig,
}

impl GraphBuilder {
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    pub fn build(&self, program: &dyn Program) -> Graph {
        // Phase 1: node table, complete before any link is attributed
        let registry = Registry::build(program.symbols(), &self.config);

        // Phase 2: usage and structural links, in parallel
        let (usages, structural) = rayon::join(
            || ReferenceResolver::new(&registry, &self.config).resolve(program.units()),
            || StructuralDeriver::new(&registry).derive(program.symbols()),
        );
        let candidates = usages.union(structural);

        // Phase 3: filter and emit
        let graph = assemble(registry, candidates);

        log::info!(
            "Built symbol graph: {} nodes, {} links",
            graph.nodes.len(),
            graph.links.len()
        );

        graph
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new(ExtractConfig::default())
    }
}
