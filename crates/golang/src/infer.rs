use crate::imports::Imports;
use crate::index::Universe;
use crate::parse;
use crate::scope::{Binding, Scopes};
use crate::types::{
    is_predeclared_type, Builtin, Field, GoType, InterfaceMethod, InterfaceType, Signature,
};
use tree_sitter::Node;

/// Embedding depth searched for promoted fields and methods.
const MAX_EMBED_DEPTH: usize = 5;

/// Length of `type A B` chains followed when resolving underlying types.
const MAX_NAMED_CHAIN: usize = 8;

/// Result of selecting a member of a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Field(GoType),
    /// Concrete method, with the printed receiver of its declaration
    Method {
        receiver: String,
        signature: Signature,
    },
    /// Interface method, with the id of the interface declaring it when it
    /// has one
    InterfaceMethod {
        owner: Option<String>,
        signature: Signature,
    },
}

impl Member {
    pub fn value_type(&self) -> GoType {
        match self {
            Self::Field(ty) => ty.clone(),
            Self::Method { signature, .. } | Self::InterfaceMethod { signature, .. } => {
                GoType::Func(Box::new(signature.clone()))
            }
        }
    }
}

pub fn is_type_node(kind: &str) -> bool {
    matches!(
        kind,
        "type_identifier"
            | "qualified_type"
            | "generic_type"
            | "pointer_type"
            | "slice_type"
            | "array_type"
            | "implicit_length_array_type"
            | "map_type"
            | "channel_type"
            | "function_type"
            | "struct_type"
            | "interface_type"
            | "parenthesized_type"
    )
}

/// Static typing of type expressions and value expressions in one file.
///
/// Pure: it only reads the package index, the file's imports and the scopes
/// of the code being lowered.
pub struct Typer<'a> {
    universe: &'a Universe,
    package: &'a str,
    imports: &'a Imports,
    source: &'a str,
    file: &'a str,
    scopes: &'a Scopes,
}

impl<'a> Typer<'a> {
    pub fn new(
        universe: &'a Universe,
        package: &'a str,
        imports: &'a Imports,
        source: &'a str,
        file: &'a str,
        scopes: &'a Scopes,
    ) -> Self {
        Self {
            universe,
            package,
            imports,
            source,
            file,
            scopes,
        }
    }

    fn text(&self, node: Node) -> &'a str {
        parse::text(node, self.source)
    }

    /// Import path behind `name` when it names an import in this file.
    pub fn import_path(&self, name: &str) -> Option<&'a str> {
        if self.scopes.lookup(name).is_some() || self.universe.declares(self.package, name) {
            return None;
        }
        self.imports.resolve(name)
    }

    /// Package declaring `name` at package level, as visible from this file.
    pub fn package_of(&self, name: &str) -> Option<&'a str> {
        if self.universe.declares(self.package, name) {
            return Some(self.package);
        }
        self.imports
            .dot_imports()
            .iter()
            .find(|path| self.universe.declares(path, name))
            .map(String::as_str)
    }

    fn type_package_of(&self, name: &str) -> Option<&'a str> {
        if self.universe.is_type(self.package, name) {
            return Some(self.package);
        }
        self.imports
            .dot_imports()
            .iter()
            .find(|path| self.universe.is_type(path, name))
            .map(String::as_str)
    }

    // Type expressions

    pub fn resolve_type(&self, node: Node) -> GoType {
        match node.kind() {
            "type_identifier" | "identifier" => self.named_type(self.text(node)),
            "qualified_type" => {
                let (Some(package), Some(name)) = (
                    node.child_by_field_name("package"),
                    node.child_by_field_name("name"),
                ) else {
                    return GoType::Unknown;
                };
                match self.imports.resolve(self.text(package)) {
                    Some(path) => GoType::named(path, self.text(name)),
                    None => GoType::Unknown,
                }
            }
            "generic_type" => node
                .child_by_field_name("type")
                .map(|base| self.resolve_type(base))
                .unwrap_or(GoType::Unknown),
            "pointer_type" => match parse::named_children(node).first() {
                Some(inner) => GoType::pointer(self.resolve_type(*inner)),
                None => GoType::Unknown,
            },
            "slice_type" => GoType::Slice(Box::new(self.field_type(node, "element"))),
            "array_type" | "implicit_length_array_type" => {
                GoType::Array(Box::new(self.field_type(node, "element")))
            }
            "map_type" => GoType::Map(
                Box::new(self.field_type(node, "key")),
                Box::new(self.field_type(node, "value")),
            ),
            "channel_type" => GoType::Chan(Box::new(self.field_type(node, "value"))),
            "function_type" => GoType::Func(Box::new(self.signature(
                node.child_by_field_name("parameters"),
                node.child_by_field_name("result"),
            ))),
            "struct_type" => GoType::Struct(self.struct_fields(node)),
            "interface_type" => GoType::Interface(self.interface_type(node)),
            "parenthesized_type" | "type_elem" | "type_constraint" | "constraint_elem" => {
                match parse::named_children(node).as_slice() {
                    [single] => self.resolve_type(*single),
                    _ => GoType::Unknown,
                }
            }
            _ => GoType::Unknown,
        }
    }

    fn field_type(&self, node: Node, field: &str) -> GoType {
        node.child_by_field_name(field)
            .map(|child| self.resolve_type(child))
            .unwrap_or(GoType::Unknown)
    }

    fn named_type(&self, name: &str) -> GoType {
        match self.scopes.lookup(name) {
            Some(Binding::Type(ty)) => return ty.clone(),
            Some(Binding::TypeParam) => return GoType::TypeParam(name.to_string()),
            Some(Binding::Value(_)) | None => {}
        }
        if let Some(package) = self.type_package_of(name) {
            return GoType::named(package, name);
        }
        if is_predeclared_type(name) {
            return GoType::basic(name);
        }
        GoType::Unknown
    }

    pub fn signature(&self, parameters: Option<Node>, result: Option<Node>) -> Signature {
        let params = parameters
            .map(|list| self.parameter_types(list))
            .unwrap_or_default();
        let results = match result {
            None => Vec::new(),
            Some(list) if list.kind() == "parameter_list" => self.parameter_types(list),
            Some(single) => vec![self.resolve_type(single)],
        };
        Signature { params, results }
    }

    /// Declared parameters of a parameter list: `(name, type)` per name, or
    /// one unnamed entry per unnamed parameter.
    pub fn parameters(&self, list: Node) -> Vec<(Option<&'a str>, GoType)> {
        let mut out = Vec::new();
        for param in parse::named_children(list) {
            let ty = match param.kind() {
                "parameter_declaration" => self.field_type(param, "type"),
                "variadic_parameter_declaration" => {
                    GoType::Slice(Box::new(self.field_type(param, "type")))
                }
                _ => continue,
            };
            let names = parse::field_children(param, "name");
            if names.is_empty() {
                out.push((None, ty));
            } else {
                for name in names {
                    out.push((Some(self.text(name)), ty.clone()));
                }
            }
        }
        out
    }

    fn parameter_types(&self, list: Node) -> Vec<GoType> {
        self.parameters(list).into_iter().map(|(_, ty)| ty).collect()
    }

    pub fn struct_fields(&self, node: Node) -> Vec<Field> {
        let Some(list) = parse::named_children(node)
            .into_iter()
            .find(|n| n.kind() == "field_declaration_list")
        else {
            return Vec::new();
        };

        let mut fields = Vec::new();
        for decl in parse::named_children(list) {
            if decl.kind() != "field_declaration" {
                continue;
            }
            let Some(type_node) = decl.child_by_field_name("type") else {
                continue;
            };
            let ty = self.resolve_type(type_node);
            let range = Some(parse::range(decl, self.file));
            let names = parse::field_children(decl, "name");

            if names.is_empty() {
                let mut cursor = decl.walk();
                let pointer = decl.children(&mut cursor).any(|c| c.kind() == "*");
                fields.push(Field {
                    name: embedded_name(type_node, self.source).to_string(),
                    ty: if pointer { GoType::pointer(ty) } else { ty },
                    embedded: true,
                    range,
                });
            } else {
                for name in names {
                    fields.push(Field {
                        name: self.text(name).to_string(),
                        ty: ty.clone(),
                        embedded: false,
                        range: range.clone(),
                    });
                }
            }
        }
        fields
    }

    pub fn interface_type(&self, node: Node) -> InterfaceType {
        let mut interface = InterfaceType::default();
        for elem in parse::named_children(node) {
            match elem.kind() {
                "method_elem" | "method_spec" => {
                    let Some(name) = elem.child_by_field_name("name") else {
                        continue;
                    };
                    interface.methods.push(InterfaceMethod {
                        name: self.text(name).to_string(),
                        signature: self.signature(
                            elem.child_by_field_name("parameters"),
                            elem.child_by_field_name("result"),
                        ),
                        range: Some(parse::range(elem, self.file)),
                    });
                }
                "type_elem" | "constraint_elem" => {
                    if let [single] = parse::named_children(elem).as_slice() {
                        interface.embeds.push(self.resolve_type(*single));
                    }
                }
                "type_identifier" | "qualified_type" | "generic_type" => {
                    interface.embeds.push(self.resolve_type(elem));
                }
                _ => {}
            }
        }
        interface
    }

    // Value expressions

    /// The type a value expression denotes when it is used as a type:
    /// conversions, method expressions and `new`/`make` arguments.
    pub fn expr_as_type(&self, node: Node) -> Option<GoType> {
        match node.kind() {
            "identifier" => {
                let name = self.text(node);
                match self.scopes.lookup(name) {
                    Some(Binding::Type(ty)) => return Some(ty.clone()),
                    Some(Binding::TypeParam) => return Some(GoType::TypeParam(name.to_string())),
                    Some(Binding::Value(_)) => return None,
                    None => {}
                }
                if let Some(package) = self.type_package_of(name) {
                    return Some(GoType::named(package, name));
                }
                if self.package_of(name).is_none() && is_predeclared_type(name) {
                    return Some(GoType::basic(name));
                }
                None
            }
            "selector_expression" => {
                let operand = node.child_by_field_name("operand")?;
                let field = node.child_by_field_name("field")?;
                if operand.kind() != "identifier" {
                    return None;
                }
                let path = self.import_path(self.text(operand))?;
                let name = self.text(field);
                self.universe
                    .is_type(path, name)
                    .then(|| GoType::named(path, name))
            }
            "parenthesized_expression" => parse::named_children(node)
                .first()
                .and_then(|inner| self.expr_as_type(*inner)),
            "unary_expression" => {
                let operator = node.child_by_field_name("operator")?;
                if self.text(operator) != "*" {
                    return None;
                }
                let operand = node.child_by_field_name("operand")?;
                self.expr_as_type(operand).map(GoType::pointer)
            }
            "index_expression" => {
                let operand = node.child_by_field_name("operand")?;
                self.expr_as_type(operand)
            }
            kind if is_type_node(kind) => Some(self.resolve_type(node)),
            _ => None,
        }
    }

    pub fn type_of(&self, node: Node) -> GoType {
        match node.kind() {
            "identifier" => self.identifier_type(self.text(node)),
            "int_literal" | "iota" => GoType::basic("int"),
            "float_literal" => GoType::basic("float64"),
            "imaginary_literal" => GoType::basic("complex128"),
            "rune_literal" => GoType::basic("rune"),
            "interpreted_string_literal" | "raw_string_literal" => GoType::basic("string"),
            "true" | "false" => GoType::basic("bool"),
            "parenthesized_expression" => parse::named_children(node)
                .first()
                .map(|inner| self.type_of(*inner))
                .unwrap_or(GoType::Unknown),
            "selector_expression" => self.selector_type(node),
            "call_expression" => self.call_type(node),
            "composite_literal" => self.field_type(node, "type"),
            "func_literal" => GoType::Func(Box::new(self.signature(
                node.child_by_field_name("parameters"),
                node.child_by_field_name("result"),
            ))),
            "unary_expression" => self.unary_type(node),
            "binary_expression" => self.binary_type(node),
            "index_expression" => self.index_type(node),
            "slice_expression" => {
                let operand = self.expr_field_type(node, "operand");
                match self.underlying(operand.strip_pointer()) {
                    GoType::Array(elem) if matches!(operand, GoType::Pointer(_)) => {
                        GoType::Slice(elem)
                    }
                    _ => operand,
                }
            }
            "type_assertion_expression" | "type_conversion_expression" => {
                self.field_type(node, "type")
            }
            _ => GoType::Unknown,
        }
    }

    fn expr_field_type(&self, node: Node, field: &str) -> GoType {
        node.child_by_field_name(field)
            .map(|child| self.type_of(child))
            .unwrap_or(GoType::Unknown)
    }

    fn identifier_type(&self, name: &str) -> GoType {
        match self.scopes.lookup(name) {
            Some(Binding::Value(ty)) => return ty.clone(),
            Some(_) => return GoType::Unknown,
            None => {}
        }
        if let Some(package) = self.package_of(name) {
            return self.package_member_type(package, name);
        }
        match name {
            "true" | "false" => GoType::basic("bool"),
            "iota" => GoType::basic("int"),
            _ => GoType::Unknown,
        }
    }

    fn package_member_type(&self, package: &str, name: &str) -> GoType {
        let Some(index) = self.universe.package(package) else {
            return GoType::Unknown;
        };
        if let Some(value) = index.values.get(name) {
            return value.ty.clone();
        }
        if let Some(func) = index.funcs.get(name) {
            return GoType::Func(Box::new(func.signature.clone()));
        }
        GoType::Unknown
    }

    fn selector_type(&self, node: Node) -> GoType {
        let (Some(operand), Some(field)) = (
            node.child_by_field_name("operand"),
            node.child_by_field_name("field"),
        ) else {
            return GoType::Unknown;
        };
        let name = self.text(field);

        if operand.kind() == "identifier" {
            if let Some(path) = self.import_path(self.text(operand)) {
                return self.package_member_type(path, name);
            }
        }

        let mut receiver = self.type_of(operand);
        if receiver.is_unknown() {
            match self.expr_as_type(operand) {
                Some(ty) => receiver = ty,
                None => return GoType::Unknown,
            }
        }
        self.lookup_member(&receiver, name)
            .map(|member| member.value_type())
            .unwrap_or(GoType::Unknown)
    }

    fn call_type(&self, node: Node) -> GoType {
        let Some(function) = node.child_by_field_name("function") else {
            return GoType::Unknown;
        };
        let arguments = node
            .child_by_field_name("arguments")
            .map(parse::named_children)
            .unwrap_or_default();

        if function.kind() == "identifier" {
            let name = self.text(function);
            let shadowed = self.scopes.lookup(name).is_some() || self.package_of(name).is_some();
            if let (false, Some(builtin)) = (shadowed, Builtin::from_name(name)) {
                return self.builtin_type(builtin, &arguments);
            }
        }

        if let Some(ty) = self.expr_as_type(function) {
            return ty;
        }

        match self.underlying(&self.type_of(function)) {
            GoType::Func(signature) => signature.call_result(),
            _ => GoType::Unknown,
        }
    }

    fn builtin_type(&self, builtin: Builtin, arguments: &[Node]) -> GoType {
        let first = arguments.first().copied();
        let as_type = |node: Node| {
            if is_type_node(node.kind()) {
                self.resolve_type(node)
            } else {
                self.expr_as_type(node).unwrap_or(GoType::Unknown)
            }
        };
        match builtin {
            Builtin::New => first.map(|n| GoType::pointer(as_type(n))).unwrap_or(GoType::Unknown),
            Builtin::Make => first.map(as_type).unwrap_or(GoType::Unknown),
            Builtin::Append | Builtin::Min | Builtin::Max => {
                first.map(|n| self.type_of(n)).unwrap_or(GoType::Unknown)
            }
            Builtin::Len | Builtin::Cap => GoType::basic("int"),
            Builtin::Other => GoType::Unknown,
        }
    }

    fn unary_type(&self, node: Node) -> GoType {
        let operand = self.expr_field_type(node, "operand");
        let operator = node
            .child_by_field_name("operator")
            .map(|op| self.text(op))
            .unwrap_or_default();
        match operator {
            "&" => GoType::pointer(operand),
            "*" => match operand {
                GoType::Pointer(inner) => *inner,
                _ => GoType::Unknown,
            },
            "<-" => match self.underlying(&operand) {
                GoType::Chan(elem) => *elem,
                _ => GoType::Unknown,
            },
            "!" => GoType::basic("bool"),
            _ => operand,
        }
    }

    fn binary_type(&self, node: Node) -> GoType {
        let operator = node
            .child_by_field_name("operator")
            .map(|op| self.text(op))
            .unwrap_or_default();
        if matches!(operator, "==" | "!=" | "<" | "<=" | ">" | ">=" | "&&" | "||") {
            return GoType::basic("bool");
        }
        let left = self.expr_field_type(node, "left");
        if left.is_unknown() && !matches!(operator, "<<" | ">>") {
            return self.expr_field_type(node, "right");
        }
        left
    }

    fn index_type(&self, node: Node) -> GoType {
        let operand = self.expr_field_type(node, "operand");
        let base = match self.underlying(&operand) {
            GoType::Pointer(inner) => self.underlying(&inner),
            other => other,
        };
        match base {
            GoType::Slice(elem) | GoType::Array(elem) => *elem,
            GoType::Map(_, value) => *value,
            GoType::Basic(name) if name == "string" => GoType::basic("byte"),
            // generic instantiation
            GoType::Func(_) => operand,
            _ => GoType::Unknown,
        }
    }

    // Type structure

    /// Underlying type, following `type A B` chains and aliases.
    pub fn underlying(&self, ty: &GoType) -> GoType {
        let mut current = ty.clone();
        for _ in 0..MAX_NAMED_CHAIN {
            let GoType::Named { package, name } = &current else {
                return current;
            };
            match self.universe.type_decl(package, name) {
                Some(decl) => current = decl.underlying.clone(),
                None => return GoType::Unknown,
            }
        }
        GoType::Unknown
    }

    /// Field or method `name` selected on a value of type `ty`, searching
    /// embedded fields and interfaces.
    pub fn lookup_member(&self, ty: &GoType, name: &str) -> Option<Member> {
        self.find_member(ty, name, 0)
    }

    fn find_member(&self, ty: &GoType, name: &str, depth: usize) -> Option<Member> {
        if depth > MAX_EMBED_DEPTH {
            return None;
        }
        match ty.strip_pointer() {
            GoType::Named {
                package,
                name: type_name,
            } => {
                let decl = self.universe.type_decl(package, type_name)?;
                if decl.alias {
                    return self.find_member(&decl.underlying, name, depth + 1);
                }
                if let Some(method) = decl.methods.iter().find(|m| m.name == name) {
                    return Some(Member::Method {
                        receiver: method.receiver.clone(),
                        signature: method.signature.clone(),
                    });
                }
                let (owner, underlying) = self.declaring(package, type_name, &decl.underlying);
                self.find_in_structure(&underlying, name, Some(&owner), depth)
            }
            other => self.find_in_structure(other, name, None, depth),
        }
    }

    /// Structure of a named type together with the id of the declaration
    /// that spells it out (`B` for `type A B`).
    fn declaring(&self, package: &str, name: &str, underlying: &GoType) -> (String, GoType) {
        let mut owner = format!("{package}.{name}");
        let mut current = underlying.clone();
        for _ in 0..MAX_NAMED_CHAIN {
            let GoType::Named { package, name } = &current else {
                break;
            };
            let Some(next) = self.universe.type_decl(package, name) else {
                return (owner, GoType::Unknown);
            };
            owner = format!("{package}.{name}");
            current = next.underlying.clone();
        }
        (owner, current)
    }

    fn find_in_structure(
        &self,
        ty: &GoType,
        name: &str,
        owner: Option<&str>,
        depth: usize,
    ) -> Option<Member> {
        match ty {
            GoType::Struct(fields) => {
                if let Some(field) = fields.iter().find(|f| f.name == name) {
                    return Some(Member::Field(field.ty.clone()));
                }
                fields
                    .iter()
                    .filter(|f| f.embedded)
                    .find_map(|f| self.find_member(&f.ty, name, depth + 1))
            }
            GoType::Interface(interface) => {
                if let Some(method) = interface.methods.iter().find(|m| m.name == name) {
                    return Some(Member::InterfaceMethod {
                        owner: owner.map(str::to_string),
                        signature: method.signature.clone(),
                    });
                }
                interface
                    .embeds
                    .iter()
                    .find_map(|embedded| self.find_member(embedded, name, depth + 1))
            }
            _ => None,
        }
    }

    /// Key and value types produced by `for k, v := range x`.
    pub fn range_types(&self, ty: &GoType) -> (GoType, GoType) {
        let int = GoType::basic("int");
        match self.underlying(ty) {
            GoType::Slice(elem) | GoType::Array(elem) => (int, *elem),
            GoType::Pointer(inner) => match self.underlying(&inner) {
                GoType::Array(elem) => (int, *elem),
                _ => (GoType::Unknown, GoType::Unknown),
            },
            GoType::Map(key, value) => (*key, *value),
            GoType::Chan(elem) => (*elem, GoType::Unknown),
            GoType::Basic(name) if name == "string" => (int, GoType::basic("rune")),
            basic @ GoType::Basic(_) => (basic, GoType::Unknown),
            _ => (GoType::Unknown, GoType::Unknown),
        }
    }
}

/// Field name an embedded type introduces: `*pkg.Inner[T]` -> `Inner`.
fn embedded_name<'s>(node: Node, source: &'s str) -> &'s str {
    match node.kind() {
        "qualified_type" => node
            .child_by_field_name("name")
            .map(|name| parse::text(name, source))
            .unwrap_or_default(),
        "generic_type" | "pointer_type" => node
            .child_by_field_name("type")
            .or_else(|| parse::named_children(node).first().copied())
            .map(|inner| embedded_name(inner, source))
            .unwrap_or_default(),
        _ => parse::text(node, source),
    }
}
