//! Correlation of partial type fragments across code units.

use loom_common::{qualified_name, CodeCompileUnit, CodeNamespace, TypeDeclaration};
use std::cell::OnceCell;
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// One type declaration located in its unit and namespace.
///
/// The fully qualified [`type_name`](Self::type_name) is computed on first
/// read and remembered, including the `None` case. The memo is a plain
/// [`OnceCell`], so a value is not `Sync` and must not be shared between
/// threads.
#[derive(Debug)]
pub struct CompileUnitPartialType<'a> {
    unit: &'a CodeCompileUnit,
    namespace: Option<&'a CodeNamespace>,
    declaration: Option<&'a TypeDeclaration>,
    type_name: OnceCell<Option<String>>,
}

impl<'a> CompileUnitPartialType<'a> {
    /// Correlates `declaration`, found in `namespace` of `unit`.
    pub fn new(
        unit: &'a CodeCompileUnit,
        namespace: Option<&'a CodeNamespace>,
        declaration: Option<&'a TypeDeclaration>,
    ) -> Self {
        Self {
            unit,
            namespace,
            declaration,
            type_name: OnceCell::new(),
        }
    }

    /// The unit that owns the declaration.
    pub fn unit(&self) -> &'a CodeCompileUnit {
        self.unit
    }

    /// The enclosing namespace.
    pub fn namespace(&self) -> Option<&'a CodeNamespace> {
        self.namespace
    }

    /// The type declaration.
    pub fn declaration(&self) -> Option<&'a TypeDeclaration> {
        self.declaration
    }

    /// `Namespace.Type`, just `Type` in the global namespace, or `None`
    /// when the namespace or the declaration is missing.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name
            .get_or_init(|| {
                let namespace = self.namespace?;
                let declaration = self.declaration?;
                Some(qualified_name(&namespace.name, &declaration.name))
            })
            .as_deref()
    }
}

/// Merges partial fragments of the same type across `units`.
///
/// Fragments are grouped by fully qualified name; a member of a later
/// fragment whose name already appears in an earlier fragment of the same
/// type is removed. Returns the number of members removed.
pub fn merge_partial_types(units: &mut [CodeCompileUnit]) -> usize {
    let mut fragments: Vec<(String, usize, usize, usize)> = Vec::new();
    for (u, unit) in units.iter().enumerate() {
        for (n, namespace) in unit.namespaces.iter().enumerate() {
            for (t, declaration) in namespace.types.iter().enumerate() {
                if !declaration.is_partial {
                    continue;
                }
                let partial = CompileUnitPartialType::new(unit, Some(namespace), Some(declaration));
                if let Some(name) = partial.type_name() {
                    fragments.push((name.to_string(), u, n, t));
                }
            }
        }
    }

    let mut known: HashMap<String, HashSet<String>> = HashMap::new();
    let mut removed = 0;
    for (name, u, n, t) in fragments {
        let members = &mut units[u].namespaces[n].types[t].members;
        let seen = known.entry(name).or_default();
        let before = members.len();
        members.retain(|m| seen.insert(m.name.clone()));
        removed += before - members.len();
    }
    if removed > 0 {
        trace!(removed, "dropped duplicate partial type members");
    }
    removed
}
