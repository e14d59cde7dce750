use crate::config::LoadConfig;
use crate::error::{GoError, Result};
use crate::module::Module;
use crate::parse;
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tree_sitter::Tree;

/// Parsed Go source file
pub struct SourceFile {
    pub path: PathBuf,

    /// Path relative to the module root, `/`-separated
    pub relative: String,

    pub source: String,
    pub tree: Tree,

    /// `_test.go` file or member of an external test package
    pub test: bool,
}

/// One package: the files of a directory sharing a package clause.
pub struct Package {
    pub name: String,
    pub path: String,
    pub dir: PathBuf,
    pub files: Vec<SourceFile>,
}

impl Package {
    pub fn is_external_test(&self) -> bool {
        self.name.ends_with("_test")
    }
}

/// Directories a pattern list expands to, in sorted order.
fn expand_patterns(module: &Module, patterns: &[String], config: &LoadConfig) -> Result<Vec<(PathBuf, bool)>> {
    let working_dir = config
        .working_dir
        .canonicalize()
        .map_err(|e| GoError::io(&config.working_dir, e))?;

    let mut dirs: BTreeMap<PathBuf, bool> = BTreeMap::new();
    for pattern in patterns {
        let (base, recursive) = match pattern.strip_suffix("...") {
            Some(base) => (base.trim_end_matches('/'), true),
            None => (pattern.as_str(), false),
        };
        let base = if base.is_empty() { "." } else { base };
        let dir = resolve_dir(module, &working_dir, base)
            .ok_or_else(|| GoError::PackageNotFound(pattern.clone()))?;

        if !dir.starts_with(&module.root) {
            return Err(GoError::PackageNotFound(pattern.clone()));
        }

        if recursive {
            for found in walk_package_dirs(&dir) {
                dirs.entry(found).or_insert(false);
            }
        } else {
            dirs.insert(dir, true);
        }
    }

    Ok(dirs.into_iter().collect())
}

fn resolve_dir(module: &Module, working_dir: &Path, base: &str) -> Option<PathBuf> {
    let is_path = base == "."
        || base == ".."
        || base.starts_with("./")
        || base.starts_with("../")
        || Path::new(base).is_absolute();

    let candidate = if is_path {
        Some(working_dir.join(base))
    } else {
        module
            .dir_of(base)
            .or_else(|| Some(working_dir.join(base)))
    }?;

    candidate.canonicalize().ok().filter(|dir| dir.is_dir())
}

/// Package directories below `root` the way `./...` sees them.
fn walk_package_dirs(root: &Path) -> Vec<PathBuf> {
    let walk_root = root.to_path_buf();
    let mut builder = WalkBuilder::new(root);
    builder.standard_filters(false).follow_links(false);
    builder.filter_entry(move |entry| {
        let path = entry.path();
        if path == walk_root {
            return true;
        }
        if !entry.file_type().is_some_and(|t| t.is_dir()) {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') || name.starts_with('_') || name == "testdata" || name == "vendor" {
            return false;
        }
        // nested module
        !path.join("go.mod").is_file()
    });

    let mut dirs = Vec::new();
    for result in builder.build() {
        match result {
            Ok(entry) => dirs.push(entry.into_path()),
            Err(e) => log::warn!("Failed to read entry: {e}"),
        }
    }
    dirs
}

/// Go files of one directory that belong to the build.
fn list_go_files(dir: &Path, config: &LoadConfig) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| GoError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| GoError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.ends_with(".go") || name.starts_with('.') || name.starts_with('_') {
            continue;
        }
        if name.ends_with("_test.go") && !config.include_tests {
            log::debug!("Skipping test file {}", path.display());
            continue;
        }
        if !matches_platform(name) {
            log::debug!("Skipping {} built for another platform", path.display());
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

const KNOWN_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "js", "linux",
    "nacl", "netbsd", "openbsd", "plan9", "solaris", "wasip1", "windows", "zos",
];

const KNOWN_ARCH: &[&str] = &[
    "386", "amd64", "arm", "arm64", "loong64", "mips", "mipsle", "mips64", "mips64le", "ppc64",
    "ppc64le", "riscv64", "s390x", "wasm",
];

fn host_os() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    }
}

fn host_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "powerpc64" => "ppc64",
        other => other,
    }
}

/// Filename build constraints: `name_GOOS.go`, `name_GOARCH.go`, `name_GOOS_GOARCH.go`.
fn matches_platform(file_name: &str) -> bool {
    let stem = file_name.trim_end_matches(".go");
    let stem = stem.strip_suffix("_test").unwrap_or(stem);
    let parts: Vec<&str> = stem.split('_').collect();

    match parts.as_slice() {
        [_, .., os, arch] if KNOWN_OS.contains(os) && KNOWN_ARCH.contains(arch) => {
            *os == host_os() && *arch == host_arch()
        }
        [_, .., last] if KNOWN_OS.contains(last) => *last == host_os(),
        [_, .., last] if KNOWN_ARCH.contains(last) => *last == host_arch(),
        _ => true,
    }
}

fn is_ignored_by_build_tag(source: &str) -> bool {
    source
        .lines()
        .map(str::trim)
        .take_while(|line| !line.starts_with("package "))
        .any(|line| line == "//go:build ignore" || line == "// +build ignore")
}

struct ParsedFile {
    dir: PathBuf,
    package: String,
    file: SourceFile,
}

fn package_clause(tree: &Tree, source: &str) -> Option<String> {
    let root = tree.root_node();
    let clause = parse::named_children(root)
        .into_iter()
        .find(|n| n.kind() == "package_clause")?;
    let name = parse::named_children(clause).into_iter().next()?;
    Some(parse::text(name, source).to_string())
}

fn load_file(
    parser: &mut tree_sitter::Parser,
    module: &Module,
    dir: &Path,
    path: &Path,
) -> Result<Option<ParsedFile>> {
    let source = fs::read_to_string(path).map_err(|e| GoError::io(path, e))?;
    if is_ignored_by_build_tag(&source) {
        log::debug!("Skipping {} (build tag ignore)", path.display());
        return Ok(None);
    }

    let relative = module.relative(path);
    let tree = parse::parse(parser, &source, &relative)?;
    let package = package_clause(&tree, &source).ok_or_else(|| GoError::Syntax {
        file: relative.clone(),
        line: 1,
        column: 1,
    })?;

    let is_test_file = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with("_test.go"));
    let test = is_test_file || package.ends_with("_test");

    Ok(Some(ParsedFile {
        dir: dir.to_path_buf(),
        package,
        file: SourceFile {
            path: path.to_path_buf(),
            relative,
            source,
            tree,
            test,
        },
    }))
}

/// Discover, read and parse the packages matched by `patterns`.
pub fn load_packages(module: &Module, patterns: &[String], config: &LoadConfig) -> Result<Vec<Package>> {
    let dirs = expand_patterns(module, patterns, config)?;

    let mut work = Vec::new();
    for (dir, explicit) in &dirs {
        let files = list_go_files(dir, config)?;
        if files.is_empty() {
            if *explicit {
                return Err(GoError::NoGoFiles(dir.clone()));
            }
            continue;
        }
        work.extend(files.into_iter().map(|file| (dir.clone(), file)));
    }

    let parsed = work
        .par_iter()
        .map_init(
            || parse::parser().ok(),
            |parser, (dir, path)| match parser {
                Some(parser) => load_file(parser, module, dir, path),
                None => Err(GoError::tree_sitter("Failed to create Go parser")),
            },
        )
        .collect::<Result<Vec<_>>>()?;

    let packages = group_packages(module, parsed.into_iter().flatten())?;
    log::info!(
        "Loaded {} packages ({} files) from module {}",
        packages.len(),
        packages.iter().map(|p| p.files.len()).sum::<usize>(),
        module.path
    );
    Ok(packages)
}

fn group_packages(module: &Module, parsed: impl Iterator<Item = ParsedFile>) -> Result<Vec<Package>> {
    let mut by_dir: BTreeMap<PathBuf, Vec<ParsedFile>> = BTreeMap::new();
    for file in parsed {
        by_dir.entry(file.dir.clone()).or_default().push(file);
    }

    let mut packages = Vec::new();
    for (dir, files) in by_dir {
        let Some(path) = module.import_path(&dir) else {
            continue;
        };

        let mut regular: Option<Package> = None;
        let mut external: Option<Package> = None;
        for parsed in files {
            let is_external = parsed.package.ends_with("_test") && parsed.file.test;
            let slot = if is_external { &mut external } else { &mut regular };
            match slot {
                Some(package) if package.name != parsed.package => {
                    return Err(GoError::MixedPackages {
                        dir,
                        first: package.name.clone(),
                        second: parsed.package,
                    });
                }
                Some(package) => package.files.push(parsed.file),
                None => {
                    let package_path = if is_external {
                        format!("{path}_test")
                    } else {
                        path.clone()
                    };
                    *slot = Some(Package {
                        name: parsed.package,
                        path: package_path,
                        dir: dir.clone(),
                        files: vec![parsed.file],
                    });
                }
            }
        }

        if let (Some(regular), Some(external)) = (&regular, &external) {
            if external.name != format!("{}_test", regular.name) {
                return Err(GoError::MixedPackages {
                    dir,
                    first: regular.name.clone(),
                    second: external.name.clone(),
                });
            }
        }

        packages.extend(regular);
        packages.extend(external);
    }

    Ok(packages)
}
