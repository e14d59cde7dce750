use crate::imports::Imports;
use crate::infer::Typer;
use crate::loader::{Package, SourceFile};
use crate::parse;
use crate::scope::{Binding, Scopes};
use crate::types::{GoType, Signature};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap, HashSet};
use symgraph_graph::{
    FieldSymbol, MethodSymbol, SourceRange, Symbol, SymbolKind, TypeShape, TypeSymbol,
};
use tree_sitter::Node;

/// Rounds of package-level value type inference; each round lets untyped
/// values see the types inferred for values they depend on.
const INFERENCE_ROUNDS: usize = 2;

/// Length of `type A = B` chains followed for method receivers.
const MAX_ALIAS_CHAIN: usize = 8;

#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub name: String,
    pub underlying: GoType,
    pub alias: bool,
    pub methods: Vec<MethodDecl>,
    pub range: Option<SourceRange>,
    pub test: bool,
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: String,
    /// Printed receiver type: `*example.com/m/pkg.List[T]`
    pub receiver: String,
    pub signature: Signature,
    pub range: Option<SourceRange>,
    pub test: bool,
}

#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub name: String,
    pub signature: Signature,
    pub range: Option<SourceRange>,
    pub test: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Const,
    Var,
}

#[derive(Debug, Clone)]
pub struct ValueDecl {
    pub name: String,
    pub kind: ValueKind,
    pub ty: GoType,
    pub range: Option<SourceRange>,
    pub test: bool,
}

/// Package-level declarations of one package
#[derive(Debug, Clone, Default)]
pub struct PackageIndex {
    pub path: String,
    pub name: String,
    pub types: BTreeMap<String, TypeDecl>,
    pub funcs: BTreeMap<String, FuncDecl>,
    pub values: BTreeMap<String, ValueDecl>,
    /// Methods whose receiver base type is not declared in the package
    pub orphan_methods: Vec<MethodDecl>,
}

impl PackageIndex {
    fn declares(&self, name: &str) -> bool {
        self.types.contains_key(name)
            || self.funcs.contains_key(name)
            || self.values.contains_key(name)
    }
}

/// Receiver clause of a method declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receiver<'s> {
    pub name: Option<&'s str>,
    pub base: &'s str,
    pub pointer: bool,
    pub type_params: Vec<&'s str>,
}

impl Receiver<'_> {
    /// Receiver type as the type checker prints it, on `base` (the spelled
    /// base after alias resolution).
    pub fn printed(&self, package: &str, base: &str) -> String {
        let star = if self.pointer { "*" } else { "" };
        if self.type_params.is_empty() {
            format!("{star}{package}.{base}")
        } else {
            format!("{star}{package}.{base}[{}]", self.type_params.join(", "))
        }
    }

    /// Receiver type, bound to `base` (the receiver's own base after alias
    /// resolution).
    pub fn base_type(&self, package: &str, base: &str) -> GoType {
        let named = GoType::named(package, base);
        if self.pointer {
            GoType::pointer(named)
        } else {
            named
        }
    }
}

pub fn receiver_of<'s>(method: Node, source: &'s str) -> Option<Receiver<'s>> {
    let list = method.child_by_field_name("receiver")?;
    let param = parse::named_children(list)
        .into_iter()
        .find(|n| n.kind() == "parameter_declaration")?;
    let name = param
        .child_by_field_name("name")
        .map(|n| parse::text(n, source));

    let mut ty = param.child_by_field_name("type")?;
    let mut pointer = false;
    loop {
        match ty.kind() {
            "pointer_type" => {
                pointer = true;
                ty = *parse::named_children(ty).first()?;
            }
            "parenthesized_type" => ty = *parse::named_children(ty).first()?,
            _ => break,
        }
    }

    let (base, type_params) = match ty.kind() {
        "generic_type" => {
            let base = parse::text(ty.child_by_field_name("type")?, source);
            let params = ty
                .child_by_field_name("type_arguments")
                .map(|args| {
                    parse::named_children(args)
                        .into_iter()
                        .map(|arg| parse::text(arg, source))
                        .collect()
                })
                .unwrap_or_default();
            (base, params)
        }
        _ => (parse::text(ty, source), Vec::new()),
    };

    Some(Receiver {
        name,
        base,
        pointer,
        type_params,
    })
}

/// Names bound by the type parameter list of a declaration.
pub fn type_parameter_names<'s>(decl: Node, source: &'s str) -> Vec<&'s str> {
    let Some(list) = decl.child_by_field_name("type_parameters") else {
        return Vec::new();
    };
    parse::named_children(list)
        .into_iter()
        .filter(|n| n.kind() == "type_parameter_declaration")
        .flat_map(|n| parse::field_children(n, "name"))
        .map(|n| parse::text(n, source))
        .collect()
}

/// Top-level type specs of a file, including those inside grouped declarations.
pub fn type_specs(root: Node) -> Vec<Node> {
    parse::named_children(root)
        .into_iter()
        .filter(|n| n.kind() == "type_declaration")
        .flat_map(parse::named_children)
        .filter(|n| matches!(n.kind(), "type_spec" | "type_alias"))
        .collect()
}

/// Top-level const and var specs of a file.
pub fn value_specs(root: Node) -> Vec<(ValueKind, Node)> {
    let mut specs = Vec::new();
    for decl in parse::named_children(root) {
        let kind = match decl.kind() {
            "const_declaration" => ValueKind::Const,
            "var_declaration" => ValueKind::Var,
            _ => continue,
        };
        collect_value_specs(decl, kind, &mut specs);
    }
    specs
}

fn collect_value_specs<'t>(node: Node<'t>, kind: ValueKind, out: &mut Vec<(ValueKind, Node<'t>)>) {
    for child in parse::named_children(node) {
        match child.kind() {
            "const_spec" | "var_spec" => out.push((kind, child)),
            "var_spec_list" => collect_value_specs(child, kind, out),
            _ => {}
        }
    }
}

/// All packages of the program, indexed by import path.
#[derive(Debug, Default)]
pub struct Universe {
    packages: HashMap<String, PackageIndex>,
    type_names: HashMap<String, HashSet<String>>,
    /// Local `type A = T` aliases, `A` to `T`
    aliases: HashMap<String, HashMap<String, String>>,
    package_names: HashMap<String, String>,
}

impl Universe {
    /// Import path to declared package name, for every loaded package.
    pub fn package_names(packages: &[Package]) -> HashMap<String, String> {
        packages
            .iter()
            .filter(|p| !p.is_external_test())
            .map(|p| (p.path.clone(), p.name.clone()))
            .collect()
    }

    pub fn build(packages: &[Package], imports: &[Vec<Imports>]) -> Self {
        let mut universe = Self {
            packages: HashMap::new(),
            type_names: collect_type_names(packages),
            aliases: collect_aliases(packages),
            package_names: Self::package_names(packages),
        };

        let indexes: Vec<PackageIndex> = packages
            .par_iter()
            .zip(imports.par_iter())
            .map(|(package, imports)| universe.index_package(package, imports))
            .collect();
        for index in indexes {
            universe.packages.insert(index.path.clone(), index);
        }

        for _ in 0..INFERENCE_ROUNDS {
            let updates: Vec<(String, String, GoType)> = packages
                .par_iter()
                .zip(imports.par_iter())
                .flat_map_iter(|(package, imports)| universe.infer_values(package, imports))
                .collect();
            if updates.is_empty() {
                break;
            }
            for (package, name, ty) in updates {
                if let Some(value) = universe
                    .packages
                    .get_mut(&package)
                    .and_then(|index| index.values.get_mut(&name))
                {
                    value.ty = ty;
                }
            }
        }

        log::debug!(
            "Indexed {} packages, {} declared types",
            universe.packages.len(),
            universe.type_names.values().map(HashSet::len).sum::<usize>()
        );
        universe
    }

    pub fn package(&self, path: &str) -> Option<&PackageIndex> {
        self.packages.get(path)
    }

    pub fn package_name(&self, path: &str) -> Option<&str> {
        self.package_names.get(path).map(String::as_str)
    }

    pub fn type_decl(&self, package: &str, name: &str) -> Option<&TypeDecl> {
        self.packages.get(package)?.types.get(name)
    }

    pub fn is_type(&self, package: &str, name: &str) -> bool {
        self.type_names
            .get(package)
            .is_some_and(|names| names.contains(name))
    }

    /// Type a method receiver named `base` binds to, following local aliases.
    pub fn receiver_base<'n>(&'n self, package: &str, base: &'n str) -> &'n str {
        let Some(aliases) = self.aliases.get(package) else {
            return base;
        };
        let mut current = base;
        for _ in 0..MAX_ALIAS_CHAIN {
            match aliases.get(current) {
                Some(target) => current = target,
                None => break,
            }
        }
        current
    }

    /// `name` is a package-level type, function, constant or variable.
    pub fn declares(&self, package: &str, name: &str) -> bool {
        self.is_type(package, name)
            || self
                .packages
                .get(package)
                .is_some_and(|index| index.declares(name))
    }

    fn index_package(&self, package: &Package, imports: &[Imports]) -> PackageIndex {
        let mut index = PackageIndex {
            path: package.path.clone(),
            name: package.name.clone(),
            ..PackageIndex::default()
        };
        let mut methods: Vec<(String, MethodDecl)> = Vec::new();

        for (file, imports) in package.files.iter().zip(imports) {
            let root = file.tree.root_node();
            let mut scopes = Scopes::new();

            for node in parse::named_children(root) {
                match node.kind() {
                    "function_declaration" => {
                        let Some(name) = node.child_by_field_name("name") else {
                            continue;
                        };
                        let name = parse::text(name, &file.source);
                        if name == "init" || name == "_" {
                            continue;
                        }
                        bind_type_params(&mut scopes, node, &file.source);
                        let typer = self.typer(package, imports, file, &scopes);
                        let signature = typer.signature(
                            node.child_by_field_name("parameters"),
                            node.child_by_field_name("result"),
                        );
                        scopes.pop();
                        index.funcs.insert(
                            name.to_string(),
                            FuncDecl {
                                name: name.to_string(),
                                signature,
                                range: Some(parse::range(node, &file.relative)),
                                test: file.test,
                            },
                        );
                    }
                    "method_declaration" => {
                        let (Some(name), Some(receiver)) = (
                            node.child_by_field_name("name"),
                            receiver_of(node, &file.source),
                        ) else {
                            continue;
                        };
                        let name = parse::text(name, &file.source);
                        if name == "_" {
                            continue;
                        }
                        scopes.push();
                        for param in &receiver.type_params {
                            scopes.bind(param, Binding::TypeParam);
                        }
                        let typer = self.typer(package, imports, file, &scopes);
                        let signature = typer.signature(
                            node.child_by_field_name("parameters"),
                            node.child_by_field_name("result"),
                        );
                        scopes.pop();
                        let base = self.receiver_base(&package.path, receiver.base);
                        methods.push((
                            base.to_string(),
                            MethodDecl {
                                name: name.to_string(),
                                receiver: receiver.printed(&package.path, base),
                                signature,
                                range: Some(parse::range(node, &file.relative)),
                                test: file.test,
                            },
                        ));
                    }
                    _ => {}
                }
            }

            for spec in type_specs(root) {
                let (Some(name), Some(ty)) = (
                    spec.child_by_field_name("name"),
                    spec.child_by_field_name("type"),
                ) else {
                    continue;
                };
                let name = parse::text(name, &file.source);
                bind_type_params(&mut scopes, spec, &file.source);
                let underlying = self.typer(package, imports, file, &scopes).resolve_type(ty);
                scopes.pop();
                index.types.insert(
                    name.to_string(),
                    TypeDecl {
                        name: name.to_string(),
                        underlying,
                        alias: spec.kind() == "type_alias",
                        methods: Vec::new(),
                        range: Some(parse::range(spec, &file.relative)),
                        test: file.test,
                    },
                );
            }

            let typer = self.typer(package, imports, file, &scopes);
            let mut previous_type = GoType::Unknown;
            for (kind, spec) in value_specs(root) {
                let explicit = spec.child_by_field_name("type").map(|t| typer.resolve_type(t));
                let has_values = spec.child_by_field_name("value").is_some();
                let ty = match (explicit, has_values) {
                    (Some(ty), _) => ty,
                    (None, true) => GoType::Unknown,
                    // implicit repetition inside a const group
                    (None, false) => previous_type.clone(),
                };
                if kind == ValueKind::Const {
                    previous_type = ty.clone();
                }

                for name in parse::field_children(spec, "name") {
                    let name = parse::text(name, &file.source);
                    if name == "_" {
                        continue;
                    }
                    index.values.insert(
                        name.to_string(),
                        ValueDecl {
                            name: name.to_string(),
                            kind,
                            ty: ty.clone(),
                            range: Some(parse::range(spec, &file.relative)),
                            test: file.test,
                        },
                    );
                }
            }
        }

        for (base, method) in methods {
            match index.types.get_mut(&base) {
                Some(decl) => decl.methods.push(method),
                None => index.orphan_methods.push(method),
            }
        }
        for decl in index.types.values_mut() {
            decl.methods.sort_by(|a, b| a.name.cmp(&b.name));
        }

        index
    }

    fn typer<'a>(
        &'a self,
        package: &'a Package,
        imports: &'a Imports,
        file: &'a SourceFile,
        scopes: &'a Scopes,
    ) -> Typer<'a> {
        Typer::new(
            self,
            &package.path,
            imports,
            &file.source,
            &file.relative,
            scopes,
        )
    }

    /// Types of untyped package-level values whose initializer now types.
    fn infer_values(&self, package: &Package, imports: &[Imports]) -> Vec<(String, String, GoType)> {
        let Some(index) = self.packages.get(&package.path) else {
            return Vec::new();
        };
        let scopes = Scopes::new();
        let mut updates = Vec::new();

        for (file, imports) in package.files.iter().zip(imports) {
            let typer = self.typer(package, imports, file, &scopes);
            for (_, spec) in value_specs(file.tree.root_node()) {
                if spec.child_by_field_name("type").is_some() {
                    continue;
                }
                let Some(values) = spec.child_by_field_name("value") else {
                    continue;
                };
                let values = parse::named_children(values);
                let names = parse::field_children(spec, "name");
                let tuple = match values.as_slice() {
                    [single] if names.len() > 1 => match typer.type_of(*single) {
                        GoType::Tuple(types) => Some(types),
                        _ => None,
                    },
                    _ => None,
                };

                for (i, name) in names.iter().enumerate() {
                    let name = parse::text(*name, &file.source);
                    let known = index
                        .values
                        .get(name)
                        .is_some_and(|value| !value.ty.is_unknown());
                    if known {
                        continue;
                    }
                    let ty = match &tuple {
                        Some(types) => types.get(i).cloned().unwrap_or(GoType::Unknown),
                        None => values
                            .get(i)
                            .map(|value| typer.type_of(*value))
                            .unwrap_or(GoType::Unknown),
                    };
                    if !ty.is_unknown() {
                        updates.push((package.path.clone(), name.to_string(), ty));
                    }
                }
            }
        }
        updates
    }

    /// Symbols handed to the graph core, sorted by package and name.
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut paths: Vec<&String> = self.packages.keys().collect();
        paths.sort();

        let mut symbols = Vec::new();
        for path in paths {
            let index = &self.packages[path];
            let package = Some(path.clone());

            for decl in index.types.values() {
                symbols.push(Symbol {
                    package: package.clone(),
                    name: decl.name.clone(),
                    kind: SymbolKind::Type(TypeSymbol {
                        shape: self.shape_of(path, decl),
                        methods: decl
                            .methods
                            .iter()
                            .filter(|_| !decl.alias)
                            .map(|method| MethodSymbol {
                                name: method.name.clone(),
                                receiver: method.receiver.clone(),
                                test: method.test,
                                range: method.range.clone(),
                            })
                            .collect(),
                    }),
                    test: decl.test,
                    range: decl.range.clone(),
                });
            }

            for func in index.funcs.values() {
                symbols.push(Symbol {
                    package: package.clone(),
                    name: func.name.clone(),
                    kind: SymbolKind::Function { receiver: None },
                    test: func.test,
                    range: func.range.clone(),
                });
            }

            for method in &index.orphan_methods {
                symbols.push(Symbol {
                    package: package.clone(),
                    name: method.name.clone(),
                    kind: SymbolKind::Function {
                        receiver: Some(method.receiver.clone()),
                    },
                    test: method.test,
                    range: method.range.clone(),
                });
            }

            for value in index.values.values() {
                symbols.push(Symbol {
                    package: package.clone(),
                    name: value.name.clone(),
                    kind: match value.kind {
                        ValueKind::Const => SymbolKind::Constant,
                        ValueKind::Var => SymbolKind::Variable,
                    },
                    test: value.test,
                    range: value.range.clone(),
                });
            }
        }
        symbols
    }

    /// Structural shape of a named type, following `type A B` chains to the
    /// declaration that spells out the structure.
    fn shape_of(&self, package: &str, decl: &TypeDecl) -> TypeShape {
        let mut owner = format!("{package}.{}", decl.name);
        let mut current = decl.underlying.clone();
        for _ in 0..8 {
            let GoType::Named { package, name } = &current else {
                break;
            };
            let Some(next) = self.type_decl(package, name) else {
                return TypeShape::Opaque;
            };
            owner = format!("{package}.{name}");
            current = next.underlying.clone();
        }

        match current {
            GoType::Struct(fields) => TypeShape::Struct {
                fields: fields
                    .into_iter()
                    .map(|field| FieldSymbol {
                        name: field.name,
                        ty: field.ty.to_type_expr(),
                        range: field.range,
                    })
                    .collect(),
            },
            GoType::Interface(interface) => TypeShape::Interface {
                methods: interface
                    .methods
                    .into_iter()
                    .map(|method| MethodSymbol {
                        name: method.name,
                        receiver: owner.clone(),
                        test: decl.test,
                        range: method.range,
                    })
                    .collect(),
                embeds: interface.embeds.iter().map(GoType::to_type_expr).collect(),
            },
            GoType::Basic(name) if matches!(name.as_str(), "any" | "error" | "comparable") => {
                TypeShape::Interface {
                    methods: Vec::new(),
                    embeds: Vec::new(),
                }
            }
            GoType::Basic(_) => TypeShape::Basic,
            GoType::Func(_) => TypeShape::Signature,
            _ => TypeShape::Opaque,
        }
    }
}

fn bind_type_params(scopes: &mut Scopes, decl: Node, source: &str) {
    scopes.push();
    for name in type_parameter_names(decl, source) {
        scopes.bind(name, Binding::TypeParam);
    }
}

fn collect_aliases(packages: &[Package]) -> HashMap<String, HashMap<String, String>> {
    let mut aliases: HashMap<String, HashMap<String, String>> = HashMap::new();
    for package in packages {
        let entry = aliases.entry(package.path.clone()).or_default();
        for file in &package.files {
            for spec in type_specs(file.tree.root_node()) {
                if spec.kind() != "type_alias" {
                    continue;
                }
                let (Some(name), Some(target)) = (
                    spec.child_by_field_name("name"),
                    spec.child_by_field_name("type"),
                ) else {
                    continue;
                };
                if target.kind() == "type_identifier" {
                    entry.insert(
                        parse::text(name, &file.source).to_string(),
                        parse::text(target, &file.source).to_string(),
                    );
                }
            }
        }
    }
    aliases
}

fn collect_type_names(packages: &[Package]) -> HashMap<String, HashSet<String>> {
    let mut names: HashMap<String, HashSet<String>> = HashMap::new();
    for package in packages {
        let entry = names.entry(package.path.clone()).or_default();
        for file in &package.files {
            for spec in type_specs(file.tree.root_node()) {
                if let Some(name) = spec.child_by_field_name("name") {
                    entry.insert(parse::text(name, &file.source).to_string());
                }
            }
        }
    }
    names
}
