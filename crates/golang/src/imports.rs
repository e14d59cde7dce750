use crate::parse;
use std::collections::HashMap;
use tree_sitter::Node;

/// Import table of one file
#[derive(Debug, Clone, Default)]
pub struct Imports {
    aliases: HashMap<String, String>,
    dot: Vec<String>,
}

impl Imports {
    /// Collect the imports of a `source_file` node. `package_names` maps
    /// import paths of loaded packages to their declared names.
    pub fn collect(root: Node, source: &str, package_names: &HashMap<String, String>) -> Self {
        let mut imports = Self::default();
        for decl in parse::named_children(root) {
            if decl.kind() != "import_declaration" {
                continue;
            }
            for child in parse::named_children(decl) {
                match child.kind() {
                    "import_spec" => imports.add_spec(child, source, package_names),
                    "import_spec_list" => {
                        for spec in parse::named_children(child) {
                            if spec.kind() == "import_spec" {
                                imports.add_spec(spec, source, package_names);
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
        imports
    }

    fn add_spec(&mut self, spec: Node, source: &str, package_names: &HashMap<String, String>) {
        let Some(path) = spec.child_by_field_name("path") else {
            return;
        };
        let path = parse::unquote(parse::text(path, source)).to_string();

        let alias = spec.child_by_field_name("name").map(|n| parse::text(n, source));
        match alias {
            Some(".") => self.dot.push(path),
            Some("_") => {}
            Some(alias) => {
                self.aliases.insert(alias.to_string(), path);
            }
            None => {
                let name = package_names
                    .get(&path)
                    .cloned()
                    .unwrap_or_else(|| default_import_name(&path).to_string());
                self.aliases.insert(name, path);
            }
        }
    }

    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    pub fn dot_imports(&self) -> &[String] {
        &self.dot
    }
}

/// Conventional package name of an import path that is not loaded:
/// `gopkg.in/yaml.v3` -> `yaml`, `example.com/api/v2` -> `api`,
/// `github.com/x/go-redis` -> `redis`.
pub fn default_import_name(path: &str) -> &str {
    let mut segments = path.rsplit('/');
    let mut last = segments.next().unwrap_or(path);
    if is_major_version(last) {
        if let Some(previous) = segments.next() {
            last = previous;
        }
    }
    if let Some((base, version)) = last.rsplit_once('.') {
        if is_major_version(version) {
            last = base;
        }
    }
    last.strip_prefix("go-").unwrap_or(last)
}

fn is_major_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_names_follow_go_conventions() {
        assert_eq!(default_import_name("fmt"), "fmt");
        assert_eq!(default_import_name("net/http"), "http");
        assert_eq!(default_import_name("gopkg.in/yaml.v3"), "yaml");
        assert_eq!(default_import_name("example.com/api/v2"), "api");
        assert_eq!(default_import_name("github.com/x/go-redis"), "redis");
    }

    #[test]
    fn collects_aliases_dot_and_loaded_names() {
        let source = r#"package main

import (
    "fmt"
    store "example.com/m/internal/storage"
    . "example.com/m/helpers"
    _ "embed"
    "example.com/m/pkg/v2"
)
"#;
        let mut parser = parse::parser().unwrap();
        let tree = parse::parse(&mut parser, source, "main.go").unwrap();

        let mut names = HashMap::new();
        names.insert("example.com/m/pkg/v2".to_string(), "accounts".to_string());
        let imports = Imports::collect(tree.root_node(), source, &names);

        assert_eq!(imports.resolve("fmt"), Some("fmt"));
        assert_eq!(imports.resolve("store"), Some("example.com/m/internal/storage"));
        assert_eq!(imports.resolve("accounts"), Some("example.com/m/pkg/v2"));
        assert_eq!(imports.resolve("embed"), None);
        assert_eq!(imports.dot_imports(), &["example.com/m/helpers".to_string()]);
    }
}
