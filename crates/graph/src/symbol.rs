//! Front-end boundary: resolved symbols and resolved syntax outlines.
//!
//! A front-end (a language's own compiler, or a scope-tracking parser) turns a
//! program into these values. Everything downstream of this module is agnostic
//! of the source language.

use std::fmt;

/// Reference to a program symbol, convertible into a node id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SymbolRef {
    /// Package-level type, function, constant or variable.
    Package {
        package: Option<String>,
        name: String,
    },

    /// Method bound to a receiver, keyed by the receiver's printed type
    /// (`*example.com/m/pkg.Account`). Interface methods use the interface id.
    Method { receiver: String, name: String },

    /// Struct member, keyed by the owning type's node id.
    Member { owner: String, name: String },
}

impl SymbolRef {
    pub fn package(package: impl Into<String>, name: impl Into<String>) -> Self {
        let package = package.into();
        Self::Package {
            package: (!package.is_empty()).then_some(package),
            name: name.into(),
        }
    }

    pub fn method(receiver: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Method {
            receiver: receiver.into(),
            name: name.into(),
        }
    }

    pub fn member(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Member {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Canonical node id for this reference.
    #[must_use]
    pub fn id(&self) -> String {
        match self {
            Self::Package {
                package: Some(package),
                name,
            } => format!("{package}.{name}"),
            Self::Package {
                package: None,
                name,
            } => name.clone(),
            Self::Method { receiver, name } => format!("({receiver}).{name}"),
            Self::Member { owner, name } => format!("({owner}).{name}"),
        }
    }

    /// Local name of the referenced symbol.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Package { name, .. } | Self::Method { name, .. } | Self::Member { name, .. } => {
                name
            }
        }
    }
}

/// Static type as far as the graph cares: named types and the wrappers
/// around them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Named(SymbolRef),
    Pointer(Box<TypeExpr>),
    Slice(Box<TypeExpr>),
    Array(Box<TypeExpr>),
    Map(Box<TypeExpr>, Box<TypeExpr>),
    Chan(Box<TypeExpr>),
    Other,
}

impl TypeExpr {
    /// Named types left after stripping pointer, slice, array, map and
    /// channel wrappers. Maps yield their key type before their value type.
    #[must_use]
    pub fn named_types(&self) -> Vec<&SymbolRef> {
        let mut out = Vec::new();
        self.collect_named(&mut out);
        out
    }

    fn collect_named<'a>(&'a self, out: &mut Vec<&'a SymbolRef>) {
        match self {
            Self::Named(symbol) => out.push(symbol),
            Self::Pointer(inner) | Self::Slice(inner) | Self::Array(inner) | Self::Chan(inner) => {
                inner.collect_named(out);
            }
            Self::Map(key, value) => {
                key.collect_named(out);
                value.collect_named(out);
            }
            Self::Other => {}
        }
    }
}

/// 1-based line/column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Source range of a declaration, rendered as `file:line:col-line:col`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRange {
    pub file: String,
    pub start: Position,
    pub end: Position,
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}-{}:{}",
            self.file, self.start.line, self.start.column, self.end.line, self.end.column
        )
    }
}

/// Resolved top-level program symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    /// Package path, `None` when the front-end knows none.
    pub package: Option<String>,
    pub name: String,
    pub kind: SymbolKind,
    /// Declared in a test-only file or compilation unit.
    pub test: bool,
    pub range: Option<SourceRange>,
}

impl Symbol {
    /// Reference to the symbol itself under the package-level id rule.
    #[must_use]
    pub fn symbol_ref(&self) -> SymbolRef {
        match &self.kind {
            SymbolKind::Function {
                receiver: Some(receiver),
            } => SymbolRef::method(receiver.clone(), self.name.clone()),
            _ => SymbolRef::Package {
                package: self.package.clone(),
                name: self.name.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolKind {
    Type(TypeSymbol),
    /// Function, or a method with the printed receiver type when it could not
    /// be attached to a declared type.
    Function { receiver: Option<String> },
    Constant,
    Variable,
    /// A construct the front-end saw but the graph has no node kind for.
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeSymbol {
    pub shape: TypeShape,
    /// Method set bound to the named type.
    pub methods: Vec<MethodSymbol>,
}

/// Underlying structural shape of a named type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeShape {
    Struct { fields: Vec<FieldSymbol> },
    Interface {
        methods: Vec<MethodSymbol>,
        embeds: Vec<TypeExpr>,
    },
    Basic,
    Signature,
    Opaque,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSymbol {
    pub name: String,
    pub ty: TypeExpr,
    pub range: Option<SourceRange>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodSymbol {
    pub name: String,
    /// Printed receiver type; for interface methods the interface id.
    pub receiver: String,
    pub test: bool,
    pub range: Option<SourceRange>,
}

impl MethodSymbol {
    #[must_use]
    pub fn symbol_ref(&self) -> SymbolRef {
        SymbolRef::method(self.receiver.clone(), self.name.clone())
    }
}

/// Pruned, resolved syntax tree of one compilation unit.
///
/// Only the constructs the reference resolver looks at survive lowering;
/// everything else is transparent.
#[derive(Debug, Clone, PartialEq)]
pub enum Syntax {
    /// Declaration construct (function, method, field, type spec, value spec).
    /// `declares` is the symbol its declared name resolves to, if any.
    Declaration {
        declares: Option<SymbolRef>,
        children: Vec<Syntax>,
    },

    /// Simple name resolved to a symbol.
    Name(SymbolRef),

    /// Member access `x.member`. `member` is set when the member resolved to a
    /// symbol; `receiver` is the static type of `x` when known.
    MemberAccess {
        member: Option<String>,
        receiver: Option<TypeExpr>,
        children: Vec<Syntax>,
    },
}

/// One compilation unit (a source file) as seen by the reference resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxUnit {
    pub file: String,
    pub items: Vec<Syntax>,
}

/// A fully resolved program handed over by a front-end.
pub trait Program: Sync {
    fn symbols(&self) -> &[Symbol];
    fn units(&self) -> &[SyntaxUnit];
}

/// Program assembled from plain parts.
#[derive(Debug, Clone, Default)]
pub struct ResolvedProgram {
    pub symbols: Vec<Symbol>,
    pub units: Vec<SyntaxUnit>,
}

impl Program for ResolvedProgram {
    fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    fn units(&self) -> &[SyntaxUnit] {
        &self.units
    }
}
