use symgraph_graph::{SourceRange, SymbolRef, TypeExpr};

/// Static Go type as far as the front-end tracks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoType {
    Named {
        package: String,
        name: String,
    },
    Basic(String),
    Pointer(Box<GoType>),
    Slice(Box<GoType>),
    Array(Box<GoType>),
    Map(Box<GoType>, Box<GoType>),
    Chan(Box<GoType>),
    Func(Box<Signature>),
    Struct(Vec<Field>),
    Interface(InterfaceType),
    /// Multiple results of a call
    Tuple(Vec<GoType>),
    TypeParam(String),
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<GoType>,
    pub results: Vec<GoType>,
}

impl Signature {
    /// Type of a call expression invoking this signature.
    pub fn call_result(&self) -> GoType {
        match self.results.as_slice() {
            [] => GoType::Unknown,
            [single] => single.clone(),
            many => GoType::Tuple(many.to_vec()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: GoType,
    pub embedded: bool,
    pub range: Option<SourceRange>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceType {
    pub methods: Vec<InterfaceMethod>,
    pub embeds: Vec<GoType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceMethod {
    pub name: String,
    pub signature: Signature,
    pub range: Option<SourceRange>,
}

impl GoType {
    pub fn named(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Named {
            package: package.into(),
            name: name.into(),
        }
    }

    pub fn basic(name: impl Into<String>) -> Self {
        Self::Basic(name.into())
    }

    pub fn pointer(inner: GoType) -> Self {
        Self::Pointer(Box::new(inner))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Strip one level of pointer indirection.
    pub fn strip_pointer(&self) -> &GoType {
        match self {
            Self::Pointer(inner) => inner,
            other => other,
        }
    }

    /// Convert to the language-neutral form the graph core understands.
    pub fn to_type_expr(&self) -> TypeExpr {
        match self {
            Self::Named { package, name } => {
                TypeExpr::Named(SymbolRef::package(package.as_str(), name.as_str()))
            }
            Self::Pointer(inner) => TypeExpr::Pointer(Box::new(inner.to_type_expr())),
            Self::Slice(inner) => TypeExpr::Slice(Box::new(inner.to_type_expr())),
            Self::Array(inner) => TypeExpr::Array(Box::new(inner.to_type_expr())),
            Self::Chan(inner) => TypeExpr::Chan(Box::new(inner.to_type_expr())),
            Self::Map(key, value) => {
                TypeExpr::Map(Box::new(key.to_type_expr()), Box::new(value.to_type_expr()))
            }
            _ => TypeExpr::Other,
        }
    }
}

/// Predeclared types of the universe scope.
pub const PREDECLARED_TYPES: &[&str] = &[
    "any",
    "bool",
    "byte",
    "comparable",
    "complex64",
    "complex128",
    "error",
    "float32",
    "float64",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "rune",
    "string",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
];

pub fn is_predeclared_type(name: &str) -> bool {
    PREDECLARED_TYPES.contains(&name)
}

/// Predeclared functions whose result type depends on their arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Append,
    Len,
    Cap,
    Make,
    New,
    Min,
    Max,
    Other,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Self> {
        let builtin = match name {
            "append" => Self::Append,
            "len" => Self::Len,
            "cap" => Self::Cap,
            "make" => Self::Make,
            "new" => Self::New,
            "min" => Self::Min,
            "max" => Self::Max,
            "clear" | "close" | "complex" | "copy" | "delete" | "imag" | "panic" | "print"
            | "println" | "real" | "recover" => Self::Other,
            _ => return None,
        };
        Some(builtin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_expr_keeps_wrappers_and_drops_structure() {
        let ty = GoType::Map(
            Box::new(GoType::basic("string")),
            Box::new(GoType::pointer(GoType::named("example.com/m", "Account"))),
        );
        let expr = ty.to_type_expr();
        let named: Vec<String> = expr.named_types().iter().map(|s| s.id()).collect();
        assert_eq!(named, vec!["example.com/m.Account".to_string()]);

        assert_eq!(GoType::Struct(vec![]).to_type_expr(), TypeExpr::Other);
    }

    #[test]
    fn call_result_of_multi_value_signature() {
        let sig = Signature {
            params: vec![],
            results: vec![GoType::basic("int"), GoType::basic("error")],
        };
        assert_eq!(
            sig.call_result(),
            GoType::Tuple(vec![GoType::basic("int"), GoType::basic("error")])
        );
        assert!(Signature::default().call_result().is_unknown());
    }
}
