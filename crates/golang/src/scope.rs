use crate::types::GoType;
use std::collections::HashMap;

/// What a local name stands for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// Variable, parameter or local constant of the given type
    Value(GoType),
    /// Local type declaration
    Type(GoType),
    TypeParam,
}

/// Lexical scopes of a function body, innermost last.
///
/// Package-level names never live here; anything not found in a frame falls
/// through to the package index.
#[derive(Debug, Default)]
pub struct Scopes {
    frames: Vec<HashMap<String, Binding>>,
}

impl Scopes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self) {
        self.frames.push(HashMap::new());
    }

    pub fn pop(&mut self) {
        self.frames.pop();
    }

    /// Bind `name` in the innermost frame. Blank identifiers are never bound.
    pub fn bind(&mut self, name: &str, binding: Binding) {
        if name == "_" {
            return;
        }
        if self.frames.is_empty() {
            self.frames.push(HashMap::new());
        }
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.to_string(), binding);
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }
}
