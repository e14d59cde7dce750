use crate::imports::Imports;
use crate::index::{self, Universe};
use crate::infer::{Member, Typer};
use crate::loader::{Package, SourceFile};
use crate::parse;
use crate::scope::{Binding, Scopes};
use crate::types::GoType;
use symgraph_graph::{SymbolRef, Syntax, SyntaxUnit};
use tree_sitter::Node;

/// Lowers one parsed file into the resolved syntax outline the graph core
/// walks.
///
/// Package-level names become [`Syntax::Name`], selectors on values become
/// [`Syntax::MemberAccess`] with the operand's static type, and every
/// declaration construct becomes a [`Syntax::Declaration`]. Locals are
/// tracked in [`Scopes`] so they never shadow into package-level links.
pub struct FileLowering<'a> {
    universe: &'a Universe,
    package: &'a str,
    imports: &'a Imports,
    source: &'a str,
    file: &'a SourceFile,
    scopes: Scopes,
}

impl<'a> FileLowering<'a> {
    pub fn new(
        universe: &'a Universe,
        package: &'a Package,
        imports: &'a Imports,
        file: &'a SourceFile,
    ) -> Self {
        Self {
            universe,
            package: &package.path,
            imports,
            source: &file.source,
            file,
            scopes: Scopes::new(),
        }
    }

    pub fn lower(mut self) -> SyntaxUnit {
        let root = self.file.tree.root_node();
        let mut items = Vec::new();

        for node in parse::named_children(root) {
            match node.kind() {
                "function_declaration" => items.push(self.function(node)),
                "method_declaration" => items.push(self.method(node)),
                "type_declaration" => {
                    for spec in parse::named_children(node) {
                        if matches!(spec.kind(), "type_spec" | "type_alias") {
                            items.push(self.package_type(spec));
                        }
                    }
                }
                "const_declaration" | "var_declaration" => {
                    let mut specs = Vec::new();
                    collect_specs(node, &mut specs);
                    for spec in specs {
                        items.push(self.package_value(spec));
                    }
                }
                _ => {}
            }
        }

        SyntaxUnit {
            file: self.file.relative.clone(),
            items,
        }
    }

    fn typer(&self) -> Typer<'_> {
        Typer::new(
            self.universe,
            self.package,
            self.imports,
            self.source,
            &self.file.relative,
            &self.scopes,
        )
    }

    fn text(&self, node: Node) -> &'a str {
        parse::text(node, self.source)
    }

    /// Package-level symbol a bare name refers to, unless a local shadows it.
    fn resolve_name(&self, name: &str) -> Option<SymbolRef> {
        if self.scopes.lookup(name).is_some() {
            return None;
        }
        self.typer()
            .package_of(name)
            .map(|package| SymbolRef::package(package, name))
    }

    // Top-level declarations

    fn function(&mut self, node: Node) -> Syntax {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n))
            .unwrap_or("_");
        let declares = (name != "init" && name != "_")
            .then(|| SymbolRef::package(self.package, name));

        self.scopes.push();
        for param in index::type_parameter_names(node, self.source) {
            self.scopes.bind(param, Binding::TypeParam);
        }
        let mut children = Vec::new();
        if let Some(params) = node.child_by_field_name("type_parameters") {
            self.node(params, &mut children);
        }
        self.function_body(node, &mut children);
        self.scopes.pop();

        Syntax::Declaration { declares, children }
    }

    fn method(&mut self, node: Node) -> Syntax {
        let name = node.child_by_field_name("name").map(|n| self.text(n));
        let receiver = index::receiver_of(node, self.source);
        let base = receiver
            .as_ref()
            .map(|receiver| self.universe.receiver_base(self.package, receiver.base));
        let declares = match (&receiver, base, name) {
            (Some(receiver), Some(base), Some(name)) if name != "_" => {
                Some(SymbolRef::method(receiver.printed(self.package, base), name))
            }
            _ => None,
        };

        self.scopes.push();
        let mut children = Vec::new();
        if let Some(receiver) = &receiver {
            for param in &receiver.type_params {
                self.scopes.bind(param, Binding::TypeParam);
            }
            if let (Some(name), Some(base)) = (receiver.name, base) {
                let ty = receiver.base_type(self.package, base);
                self.scopes.bind(name, Binding::Value(ty));
            }
        }
        if let Some(list) = node.child_by_field_name("receiver") {
            self.node(list, &mut children);
        }
        self.function_body(node, &mut children);
        self.scopes.pop();

        Syntax::Declaration { declares, children }
    }

    /// Parameters, results and body of a function, method or literal. The
    /// caller owns the scope.
    fn function_body(&mut self, node: Node, out: &mut Vec<Syntax>) {
        if let Some(params) = node.child_by_field_name("parameters") {
            self.bind_parameters(params, out);
        }
        if let Some(result) = node.child_by_field_name("result") {
            if result.kind() == "parameter_list" {
                self.bind_parameters(result, out);
            } else {
                self.node(result, out);
            }
        }
        if let Some(body) = node.child_by_field_name("body") {
            self.statements(body, out);
        }
    }

    fn bind_parameters(&mut self, list: Node, out: &mut Vec<Syntax>) {
        let params: Vec<(Option<String>, GoType)> = self
            .typer()
            .parameters(list)
            .into_iter()
            .map(|(name, ty)| (name.map(str::to_string), ty))
            .collect();
        self.node(list, out);
        for (name, ty) in params {
            if let Some(name) = name {
                self.scopes.bind(&name, Binding::Value(ty));
            }
        }
    }

    fn package_type(&mut self, spec: Node) -> Syntax {
        let name = spec
            .child_by_field_name("name")
            .map(|n| self.text(n))
            .unwrap_or("_");
        let owner = SymbolRef::package(self.package, name);
        let owner_id = owner.id();

        self.scopes.push();
        for param in index::type_parameter_names(spec, self.source) {
            self.scopes.bind(param, Binding::TypeParam);
        }
        let mut children = Vec::new();
        if let Some(params) = spec.child_by_field_name("type_parameters") {
            self.node(params, &mut children);
        }
        if let Some(ty) = spec.child_by_field_name("type") {
            match ty.kind() {
                "struct_type" => self.struct_members(ty, &owner_id, &mut children),
                "interface_type" => self.interface_members(ty, &owner_id, &mut children),
                _ => self.node(ty, &mut children),
            }
        }
        self.scopes.pop();

        Syntax::Declaration {
            declares: Some(owner),
            children,
        }
    }

    fn struct_members(&mut self, node: Node, owner_id: &str, out: &mut Vec<Syntax>) {
        let Some(list) = parse::named_children(node)
            .into_iter()
            .find(|n| n.kind() == "field_declaration_list")
        else {
            return;
        };

        for decl in parse::named_children(list) {
            if decl.kind() != "field_declaration" {
                continue;
            }
            let Some(ty) = decl.child_by_field_name("type") else {
                continue;
            };
            match parse::field_children(decl, "name").first() {
                Some(name) => {
                    let mut children = Vec::new();
                    self.node(ty, &mut children);
                    out.push(Syntax::Declaration {
                        declares: Some(SymbolRef::member(owner_id, self.text(*name))),
                        children,
                    });
                }
                // embedded
                None => self.node(ty, out),
            }
        }
    }

    fn interface_members(&mut self, node: Node, owner_id: &str, out: &mut Vec<Syntax>) {
        for elem in parse::named_children(node) {
            match elem.kind() {
                "method_elem" | "method_spec" => {
                    let Some(name) = elem.child_by_field_name("name") else {
                        continue;
                    };
                    let mut children = Vec::new();
                    for field in ["parameters", "result"] {
                        if let Some(child) = elem.child_by_field_name(field) {
                            self.node(child, &mut children);
                        }
                    }
                    out.push(Syntax::Declaration {
                        declares: Some(SymbolRef::method(owner_id, self.text(name))),
                        children,
                    });
                }
                _ => self.node(elem, out),
            }
        }
    }

    fn package_value(&mut self, spec: Node) -> Syntax {
        let declares = parse::field_children(spec, "name")
            .first()
            .map(|n| self.text(*n))
            .filter(|name| *name != "_")
            .map(|name| SymbolRef::package(self.package, name));

        let mut children = Vec::new();
        for field in ["type", "value"] {
            if let Some(child) = spec.child_by_field_name(field) {
                self.node(child, &mut children);
            }
        }
        Syntax::Declaration { declares, children }
    }

    // Local declarations

    fn local_values(&mut self, decl: Node, out: &mut Vec<Syntax>) {
        let mut specs = Vec::new();
        collect_specs(decl, &mut specs);

        let mut previous = GoType::Unknown;
        for spec in specs {
            let mut children = Vec::new();
            for field in ["type", "value"] {
                if let Some(child) = spec.child_by_field_name(field) {
                    self.node(child, &mut children);
                }
            }
            out.push(Syntax::Declaration {
                declares: None,
                children,
            });

            let names = parse::field_children(spec, "name");
            let types = self.spec_types(spec, names.len(), &previous);
            if spec.kind() == "const_spec" {
                previous = types.first().cloned().unwrap_or(GoType::Unknown);
            }
            for (name, ty) in names.into_iter().zip(types) {
                let name = self.text(name);
                self.scopes.bind(name, Binding::Value(ty));
            }
        }
    }

    /// Types of the names of a value spec, distributing multi-value calls.
    fn spec_types(&self, spec: Node, count: usize, previous: &GoType) -> Vec<GoType> {
        let typer = self.typer();
        if let Some(ty) = spec.child_by_field_name("type") {
            return vec![typer.resolve_type(ty); count];
        }
        match spec.child_by_field_name("value") {
            Some(values) => self.assigned_types(&parse::named_children(values), count),
            None => vec![previous.clone(); count],
        }
    }

    fn assigned_types(&self, values: &[Node], count: usize) -> Vec<GoType> {
        let typer = self.typer();
        if let ([single], true) = (values, count > 1) {
            return match typer.type_of(*single) {
                GoType::Tuple(mut types) => {
                    types.resize(count, GoType::Unknown);
                    types
                }
                // v, ok forms
                ty => {
                    let mut types = vec![ty, GoType::basic("bool")];
                    types.resize(count, GoType::Unknown);
                    types
                }
            };
        }
        (0..count)
            .map(|i| {
                values
                    .get(i)
                    .map(|value| typer.type_of(*value))
                    .unwrap_or(GoType::Unknown)
            })
            .collect()
    }

    fn local_types(&mut self, decl: Node, out: &mut Vec<Syntax>) {
        for spec in parse::named_children(decl) {
            if !matches!(spec.kind(), "type_spec" | "type_alias") {
                continue;
            }
            let (Some(name), Some(ty)) = (
                spec.child_by_field_name("name"),
                spec.child_by_field_name("type"),
            ) else {
                continue;
            };
            let name = self.text(name);
            let resolved = self.typer().resolve_type(ty);
            self.scopes.bind(name, Binding::Type(resolved));

            let mut children = Vec::new();
            self.node(ty, &mut children);
            out.push(Syntax::Declaration {
                declares: None,
                children,
            });
        }
    }

    fn short_var(&mut self, node: Node, out: &mut Vec<Syntax>) {
        let values = node
            .child_by_field_name("right")
            .map(parse::named_children)
            .unwrap_or_default();
        for value in &values {
            self.node(*value, out);
        }

        let names = node
            .child_by_field_name("left")
            .map(parse::named_children)
            .unwrap_or_default();
        let types = self.assigned_types(&values, names.len());
        for (name, ty) in names.into_iter().zip(types) {
            if name.kind() == "identifier" {
                let name = self.text(name);
                self.scopes.bind(name, Binding::Value(ty));
            }
        }
    }

    // Statements and expressions

    fn statements(&mut self, block: Node, out: &mut Vec<Syntax>) {
        for child in parse::named_children(block) {
            self.node(child, out);
        }
    }

    fn scoped(&mut self, node: Node, out: &mut Vec<Syntax>) {
        self.scopes.push();
        self.statements(node, out);
        self.scopes.pop();
    }

    fn node(&mut self, node: Node, out: &mut Vec<Syntax>) {
        match node.kind() {
            "identifier" | "type_identifier" => {
                if let Some(symbol) = self.resolve_name(self.text(node)) {
                    out.push(Syntax::Name(symbol));
                }
            }
            "qualified_type" => {
                let (Some(package), Some(name)) = (
                    node.child_by_field_name("package"),
                    node.child_by_field_name("name"),
                ) else {
                    return;
                };
                if let Some(path) = self.imports.resolve(self.text(package)) {
                    out.push(Syntax::Name(SymbolRef::package(path, self.text(name))));
                }
            }
            "selector_expression" => self.selector(node, out),
            "parameter_declaration" | "variadic_parameter_declaration" => {
                if let Some(ty) = node.child_by_field_name("type") {
                    self.node(ty, out);
                }
            }
            "type_parameter_declaration" => {
                if let Some(constraint) = node.child_by_field_name("type") {
                    self.node(constraint, out);
                }
            }
            "block" | "if_statement" | "for_statement" | "expression_switch_statement"
            | "select_statement" | "expression_case" | "default_case" => self.scoped(node, out),
            "short_var_declaration" => self.short_var(node, out),
            "var_declaration" | "const_declaration" => self.local_values(node, out),
            "type_declaration" => self.local_types(node, out),
            "range_clause" => self.range_clause(node, out),
            "type_switch_statement" => self.type_switch(node, out),
            "communication_case" => self.communication_case(node, out),
            "func_literal" => {
                self.scopes.push();
                self.function_body(node, out);
                self.scopes.pop();
            }
            "composite_literal" => {
                let expected = self.typer().type_of(node);
                if let Some(ty) = node.child_by_field_name("type") {
                    self.node(ty, out);
                }
                if let Some(body) = node.child_by_field_name("body") {
                    self.literal_value(body, &expected, out);
                }
            }
            "literal_value" => self.literal_value(node, &GoType::Unknown, out),
            "field_identifier" | "package_identifier" | "label_name" | "comment" => {}
            _ => self.statements(node, out),
        }
    }

    fn selector(&mut self, node: Node, out: &mut Vec<Syntax>) {
        let (Some(operand), Some(field)) = (
            node.child_by_field_name("operand"),
            node.child_by_field_name("field"),
        ) else {
            return;
        };
        let member = self.text(field);

        if operand.kind() == "identifier" {
            if let Some(path) = self.typer().import_path(self.text(operand)) {
                out.push(Syntax::Name(SymbolRef::package(path, member)));
                return;
            }
        }

        let (receiver, found) = {
            let typer = self.typer();
            let mut receiver = typer.type_of(operand);
            if receiver.is_unknown() {
                if let Some(ty) = typer.expr_as_type(operand) {
                    receiver = ty;
                }
            }
            let found = typer.lookup_member(&receiver, member);
            (receiver, found)
        };

        let mut children = Vec::new();
        self.node(operand, &mut children);
        match &found {
            Some(Member::Method { receiver, .. })
            | Some(Member::InterfaceMethod {
                owner: Some(receiver),
                ..
            }) => out.push(Syntax::Name(SymbolRef::method(receiver.as_str(), member))),
            _ => {}
        }
        out.push(Syntax::MemberAccess {
            member: found.is_some().then(|| member.to_string()),
            receiver: (!receiver.is_unknown()).then(|| receiver.to_type_expr()),
            children,
        });
    }

    fn range_clause(&mut self, node: Node, out: &mut Vec<Syntax>) {
        let right = node.child_by_field_name("right");
        if let Some(right) = right {
            self.node(right, out);
        }
        let Some(left) = node.child_by_field_name("left") else {
            return;
        };

        let mut cursor = node.walk();
        let declares = node.children(&mut cursor).any(|c| c.kind() == ":=");
        if !declares {
            self.node(left, out);
            return;
        }

        let (key, value) = match right {
            Some(right) => {
                let typer = self.typer();
                typer.range_types(&typer.type_of(right))
            }
            None => (GoType::Unknown, GoType::Unknown),
        };
        for (name, ty) in parse::named_children(left).into_iter().zip([key, value]) {
            if name.kind() == "identifier" {
                let name = self.text(name);
                self.scopes.bind(name, Binding::Value(ty));
            }
        }
    }

    fn type_switch(&mut self, node: Node, out: &mut Vec<Syntax>) {
        self.scopes.push();
        if let Some(init) = node.child_by_field_name("initializer") {
            self.node(init, out);
        }
        let value = node.child_by_field_name("value");
        if let Some(value) = value {
            self.node(value, out);
        }
        let alias = node
            .child_by_field_name("alias")
            .and_then(|list| parse::named_children(list).first().copied())
            .map(|n| self.text(n));
        let value_type = value
            .map(|v| self.typer().type_of(v))
            .unwrap_or(GoType::Unknown);

        for case in parse::named_children(node) {
            if !matches!(case.kind(), "type_case" | "default_case") {
                continue;
            }
            self.scopes.push();
            let types = parse::field_children(case, "type");
            for ty in &types {
                self.node(*ty, out);
            }
            if let Some(alias) = alias {
                let bound = match types.as_slice() {
                    [single] => self.typer().resolve_type(*single),
                    _ => value_type.clone(),
                };
                self.scopes.bind(alias, Binding::Value(bound));
            }
            for child in parse::named_children(case) {
                if !types.iter().any(|ty| ty.id() == child.id()) {
                    self.node(child, out);
                }
            }
            self.scopes.pop();
        }
        self.scopes.pop();
    }

    fn communication_case(&mut self, node: Node, out: &mut Vec<Syntax>) {
        self.scopes.push();
        let communication = node.child_by_field_name("communication");
        if let Some(receive) = communication.filter(|c| c.kind() == "receive_statement") {
            self.receive(receive, out);
        } else if let Some(send) = communication {
            self.node(send, out);
        }
        for child in parse::named_children(node) {
            if communication.map(|c| c.id()) != Some(child.id()) {
                self.node(child, out);
            }
        }
        self.scopes.pop();
    }

    fn receive(&mut self, node: Node, out: &mut Vec<Syntax>) {
        let right = node.child_by_field_name("right");
        if let Some(right) = right {
            self.node(right, out);
        }
        let Some(left) = node.child_by_field_name("left") else {
            return;
        };
        let mut cursor = node.walk();
        let declares = node.children(&mut cursor).any(|c| c.kind() == ":=");
        if !declares {
            self.node(left, out);
            return;
        }

        let names = parse::named_children(left);
        let types = self.assigned_types(&right.into_iter().collect::<Vec<_>>(), names.len());
        for (name, ty) in names.into_iter().zip(types) {
            if name.kind() == "identifier" {
                let name = self.text(name);
                self.scopes.bind(name, Binding::Value(ty));
            }
        }
    }

    /// Elements of a composite literal of type `expected`. Keys of struct
    /// literals name fields and are not lowered.
    fn literal_value(&mut self, node: Node, expected: &GoType, out: &mut Vec<Syntax>) {
        let underlying = {
            let typer = self.typer();
            typer.underlying(typer.underlying(expected).strip_pointer())
        };
        let (skip_keys, element) = match underlying {
            GoType::Slice(elem) | GoType::Array(elem) => (false, *elem),
            GoType::Map(_, value) => (false, *value),
            _ => (true, GoType::Unknown),
        };

        for child in parse::named_children(node) {
            match child.kind() {
                "keyed_element" => {
                    let parts = parse::named_children(child);
                    let key = child.child_by_field_name("key").or(parts.first().copied());
                    let value = child.child_by_field_name("value").or(parts.last().copied());
                    if let (Some(key), false) = (key, skip_keys) {
                        self.element(key, &GoType::Unknown, out);
                    }
                    if let Some(value) = value {
                        self.element(value, &element, out);
                    }
                }
                _ => self.element(child, &element, out),
            }
        }
    }

    fn element(&mut self, node: Node, expected: &GoType, out: &mut Vec<Syntax>) {
        match node.kind() {
            "literal_element" => {
                if let Some(inner) = parse::named_children(node).first() {
                    self.element(*inner, expected, out);
                }
            }
            "literal_value" => self.literal_value(node, expected, out),
            _ => self.node(node, out),
        }
    }
}

/// Const and var specs of a declaration, flattening `var ( ... )` lists.
fn collect_specs<'t>(node: Node<'t>, out: &mut Vec<Node<'t>>) {
    for child in parse::named_children(node) {
        match child.kind() {
            "const_spec" | "var_spec" => out.push(child),
            "var_spec_list" => collect_specs(child, out),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::path::PathBuf;

    const PKG: &str = "example.com/m/bank";

    fn lower(source: &str) -> SyntaxUnit {
        let mut parser = parse::parser().unwrap();
        let tree = parse::parse(&mut parser, source, "bank/account.go").unwrap();
        let package = Package {
            name: "bank".to_string(),
            path: PKG.to_string(),
            dir: PathBuf::from("bank"),
            files: vec![SourceFile {
                path: PathBuf::from("bank/account.go"),
                relative: "bank/account.go".to_string(),
                source: source.to_string(),
                tree,
                test: false,
            }],
        };
        let imports: Vec<Imports> = package
            .files
            .iter()
            .map(|f| Imports::collect(f.tree.root_node(), &f.source, &HashMap::new()))
            .collect();
        let packages = vec![package];
        let universe = Universe::build(&packages, std::slice::from_ref(&imports));
        FileLowering::new(&universe, &packages[0], &imports[0], &packages[0].files[0]).lower()
    }

    /// Flattened `(enclosing declaration, referenced id)` pairs.
    fn names(unit: &SyntaxUnit) -> Vec<(String, String)> {
        fn walk(syntax: &Syntax, enclosing: &str, out: &mut Vec<(String, String)>) {
            match syntax {
                Syntax::Declaration { declares, children } => {
                    let id = declares.as_ref().map(SymbolRef::id);
                    let enclosing = id.as_deref().unwrap_or(enclosing);
                    for child in children {
                        walk(child, enclosing, out);
                    }
                }
                Syntax::Name(symbol) => out.push((enclosing.to_string(), symbol.id())),
                Syntax::MemberAccess { children, .. } => {
                    for child in children {
                        walk(child, enclosing, out);
                    }
                }
            }
        }
        let mut out = Vec::new();
        for item in &unit.items {
            walk(item, "", &mut out);
        }
        out.sort();
        out.dedup();
        out
    }

    fn member_accesses(unit: &SyntaxUnit) -> Vec<(Option<String>, Vec<String>)> {
        fn walk(syntax: &Syntax, out: &mut Vec<(Option<String>, Vec<String>)>) {
            match syntax {
                Syntax::Declaration { children, .. } => {
                    children.iter().for_each(|c| walk(c, out));
                }
                Syntax::Name(_) => {}
                Syntax::MemberAccess {
                    member,
                    receiver,
                    children,
                } => {
                    let types = receiver
                        .as_ref()
                        .map(|r| r.named_types().iter().map(|s| s.id()).collect())
                        .unwrap_or_default();
                    out.push((member.clone(), types));
                    children.iter().for_each(|c| walk(c, out));
                }
            }
        }
        let mut out = Vec::new();
        unit.items.iter().for_each(|item| walk(item, &mut out));
        out
    }

    #[test]
    fn method_body_references_receiver_fields() {
        let unit = lower(
            r#"package bank

type Account struct {
    Balance int
}

func (a *Account) Withdraw(amount int) {
    a.Balance -= amount
}
"#,
        );

        assert_eq!(
            names(&unit),
            vec![(
                "(*example.com/m/bank.Account).Withdraw".to_string(),
                "example.com/m/bank.Account".to_string()
            )]
        );
        assert_eq!(
            member_accesses(&unit),
            vec![(
                Some("Balance".to_string()),
                vec!["example.com/m/bank.Account".to_string()]
            )]
        );
    }

    #[test]
    fn fields_and_interface_methods_are_declarations() {
        let unit = lower(
            r#"package bank

type Ledger struct {
    Owner, Name string
    Entries []Entry
}

type Entry struct{}

type Store interface {
    Load(id string) (*Ledger, error)
}
"#,
        );

        assert_eq!(
            names(&unit),
            vec![
                (
                    "(example.com/m/bank.Ledger).Entries".to_string(),
                    "example.com/m/bank.Entry".to_string()
                ),
                (
                    "(example.com/m/bank.Store).Load".to_string(),
                    "example.com/m/bank.Ledger".to_string()
                ),
            ]
        );
    }

    #[test]
    fn locals_shadow_package_names() {
        let unit = lower(
            r#"package bank

var limit = 10

func Check(n int) bool {
    if limit := 5; n > limit {
        return false
    }
    return n < limit
}
"#,
        );

        assert_eq!(
            names(&unit),
            vec![(
                "example.com/m/bank.Check".to_string(),
                "example.com/m/bank.limit".to_string()
            )]
        );
    }

    #[test]
    fn calls_on_values_reach_concrete_methods() {
        let unit = lower(
            r#"package bank

type Account struct{}

func (a Account) Close() {}

func Open() Account { return Account{} }

func Run() {
    acct := Open()
    acct.Close()
}
"#,
        );

        let run: Vec<String> = names(&unit)
            .into_iter()
            .filter(|(from, _)| from == "example.com/m/bank.Run")
            .map(|(_, to)| to)
            .collect();
        assert_eq!(
            run,
            vec![
                "(example.com/m/bank.Account).Close".to_string(),
                "example.com/m/bank.Open".to_string(),
            ]
        );
    }

    #[test]
    fn struct_literal_keys_are_not_references() {
        let unit = lower(
            r#"package bank

var Name = "x"

type Account struct {
    Name string
}

func New() *Account {
    return &Account{Name: Name}
}
"#,
        );

        let new: Vec<String> = names(&unit)
            .into_iter()
            .filter(|(from, _)| from == "example.com/m/bank.New")
            .map(|(_, to)| to)
            .collect();
        assert_eq!(
            new,
            vec![
                "example.com/m/bank.Account".to_string(),
                "example.com/m/bank.Name".to_string(),
            ]
        );
    }

    #[test]
    fn init_and_blank_are_not_declarations() {
        let unit = lower(
            r#"package bank

var total int

func init() {
    total = 1
}
"#,
        );

        assert_eq!(
            names(&unit),
            vec![("".to_string(), "example.com/m/bank.total".to_string())]
        );
    }
}
