use crate::config::LoadConfig;
use crate::error::Result;
use crate::imports::Imports;
use crate::index::Universe;
use crate::loader;
use crate::lower::FileLowering;
use crate::module::Module;
use rayon::prelude::*;
use symgraph_graph::{Program, Symbol, SyntaxUnit};

/// A loaded, type-resolved Go program
#[derive(Debug)]
pub struct GoProgram {
    module: Module,
    symbols: Vec<Symbol>,
    units: Vec<SyntaxUnit>,
}

impl GoProgram {
    pub fn module(&self) -> &Module {
        &self.module
    }
}

impl Program for GoProgram {
    fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    fn units(&self) -> &[SyntaxUnit] {
        &self.units
    }
}

/// Load the packages matched by `patterns` from the module enclosing
/// `config.working_dir`.
///
/// Any unreadable file, syntax error or unmatched pattern aborts the load.
pub fn load(patterns: &[String], config: &LoadConfig) -> Result<GoProgram> {
    let module = Module::find(&config.working_dir)?;

    // Phase 1: discover and parse
    let packages = loader::load_packages(&module, patterns, config)?;

    // Phase 2: imports and package-level declarations
    let package_names = Universe::package_names(&packages);
    let imports: Vec<Vec<Imports>> = packages
        .par_iter()
        .map(|package| {
            package
                .files
                .iter()
                .map(|file| Imports::collect(file.tree.root_node(), &file.source, &package_names))
                .collect()
        })
        .collect();
    let universe = Universe::build(&packages, &imports);
    let symbols = universe.symbols();

    // Phase 3: per-file syntax outlines
    let units: Vec<SyntaxUnit> = packages
        .par_iter()
        .zip(imports.par_iter())
        .flat_map_iter(|(package, imports)| {
            let universe = &universe;
            package
                .files
                .iter()
                .zip(imports)
                .map(move |(file, imports)| FileLowering::new(universe, package, imports, file).lower())
        })
        .collect();

    log::info!(
        "Resolved {} symbols in {} files",
        symbols.len(),
        units.len()
    );

    Ok(GoProgram {
        module,
        symbols,
        units,
    })
}
