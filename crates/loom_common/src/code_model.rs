//! Language-neutral description of generated code.
//!
//! Build providers emit [`CodeCompileUnit`]s; compiler backends consume them.
//! Nothing here knows about any target language's syntax.

use serde::{Deserialize, Serialize};

/// One unit of generated code: namespaces with their types, raw source
/// snippets, and the external assemblies the unit references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeCompileUnit {
    /// Namespaces declared by this unit, in emission order.
    pub namespaces: Vec<CodeNamespace>,
    /// Source text passed through to the backend verbatim.
    pub snippets: Vec<String>,
    /// Names of external assemblies the unit references.
    pub referenced_assemblies: Vec<String>,
}

impl CodeCompileUnit {
    /// Creates an empty unit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the namespace called `name`, creating it if needed.
    pub fn namespace_mut(&mut self, name: &str) -> &mut CodeNamespace {
        let idx = match self.namespaces.iter().position(|ns| ns.name == name) {
            Some(idx) => idx,
            None => {
                self.namespaces.push(CodeNamespace::new(name));
                self.namespaces.len() - 1
            }
        };
        &mut self.namespaces[idx]
    }

    /// Adds `assembly` to the references unless already present.
    pub fn add_reference(&mut self, assembly: impl Into<String>) {
        let assembly = assembly.into();
        if !self.referenced_assemblies.contains(&assembly) {
            self.referenced_assemblies.push(assembly);
        }
    }

    /// Fully qualified names of every type in the unit.
    pub fn type_names(&self) -> impl Iterator<Item = String> + '_ {
        self.namespaces.iter().flat_map(|ns| {
            ns.types
                .iter()
                .map(move |ty| qualified_name(&ns.name, &ty.name))
        })
    }

    /// Returns `true` when the unit declares nothing and carries no snippets.
    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty() && self.namespaces.iter().all(|ns| ns.types.is_empty())
    }
}

/// Joins a namespace and a type name with `.`, omitting the dot for the
/// global namespace.
pub fn qualified_name(namespace: &str, type_name: &str) -> String {
    if namespace.is_empty() {
        type_name.to_string()
    } else {
        format!("{namespace}.{type_name}")
    }
}

/// A namespace and the types declared in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeNamespace {
    /// Dotted namespace name; empty for the global namespace.
    pub name: String,
    /// Types declared in this namespace.
    pub types: Vec<TypeDeclaration>,
}

impl CodeNamespace {
    /// Creates an empty namespace.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
        }
    }
}

/// A class declaration, possibly one fragment of a partial type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDeclaration {
    /// Simple type name.
    pub name: String,
    /// Whether this declaration is one fragment of a partial type.
    pub is_partial: bool,
    /// Whether the type may not be derived from.
    pub is_sealed: bool,
    /// Fully qualified base type, if any.
    pub base_type: Option<String>,
    /// Declared members.
    pub members: Vec<TypeMember>,
}

impl TypeDeclaration {
    /// Creates a non-partial, unsealed type with no members.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_partial: false,
            is_sealed: false,
            base_type: None,
            members: Vec::new(),
        }
    }

    /// Marks the declaration as a partial fragment.
    pub fn partial(mut self) -> Self {
        self.is_partial = true;
        self
    }

    /// Marks the type as sealed.
    pub fn sealed(mut self) -> Self {
        self.is_sealed = true;
        self
    }

    /// Sets the base type.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base_type = Some(base.into());
        self
    }

    /// Returns the member called `name`.
    pub fn member(&self, name: &str) -> Option<&TypeMember> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// What a member is.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum MemberKind {
    /// A stored field.
    Field,
    /// A property with a getter.
    Property,
    /// A method.
    Method,
}

/// A member of a [`TypeDeclaration`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMember {
    /// Member name.
    pub name: String,
    /// Field, property, or method.
    pub kind: MemberKind,
    /// The member's type (return type for methods).
    pub type_name: String,
}

impl TypeMember {
    /// Creates a member.
    pub fn new(name: impl Into<String>, kind: MemberKind, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            type_name: type_name.into(),
        }
    }
}

/// Returns `true` when `name` is a valid identifier: a letter or `_`
/// followed by letters, digits, or `_`.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}
