//! Resolution of generic variable names to concrete types.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::TypeName;

/// Maps a declared type-parameter name to the type it is bound or resolved
/// to. Produced by class and method signatures from their declared
/// parameter lists, and consumed by [`TypeName::reify`].
pub trait GenericsContext {
    /// Look up the type for a generic variable name, if this context
    /// knows one.
    fn type_of(&self, name: &str) -> Option<TypeName>;

    /// Nest this context under a parent. The child is consulted first and
    /// the parent answers anything the child cannot, which models a
    /// method's type parameters shadowing its class's.
    fn under<'a>(&'a self, parent: &'a dyn GenericsContext) -> Nested<'a>
    where
        Self: Sized,
    {
        Nested {
            child: self,
            parent,
        }
    }
}

/// Child-first composition of two contexts. See [`GenericsContext::under`].
pub struct Nested<'a> {
    child: &'a dyn GenericsContext,
    parent: &'a dyn GenericsContext,
}

impl GenericsContext for Nested<'_> {
    fn type_of(&self, name: &str) -> Option<TypeName> {
        self.child
            .type_of(name)
            .or_else(|| self.parent.type_of(name))
    }
}

impl GenericsContext for IndexMap<String, TypeName> {
    fn type_of(&self, name: &str) -> Option<TypeName> {
        self.get(name).cloned()
    }
}

impl GenericsContext for HashMap<String, TypeName> {
    fn type_of(&self, name: &str) -> Option<TypeName> {
        self.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_prefers_child() {
        let mut child = HashMap::new();
        child.insert("T".to_string(), TypeName::object("java/lang/String"));
        let mut parent = HashMap::new();
        parent.insert("T".to_string(), TypeName::object("java/lang/Number"));
        parent.insert("U".to_string(), TypeName::object("java/lang/Long"));

        let nested = child.under(&parent);
        assert_eq!(
            "Ljava/lang/String;",
            nested.type_of("T").expect("child wins").internal_name()
        );
        assert_eq!(
            "Ljava/lang/Long;",
            nested.type_of("U").expect("parent fallback").internal_name()
        );
        assert!(nested.type_of("V").is_none());
    }
}
