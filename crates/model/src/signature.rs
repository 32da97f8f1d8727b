//! Parsed class and method signatures.

use std::fmt;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::context::GenericsContext;
use crate::name::TypeName;

/// A parsed class signature: the declared type parameters, in declaration
/// order, and the supertype list (superclass first, then interfaces).
/// `Display` reproduces the exact text it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassSignature {
    type_parameters: IndexMap<String, TypeName>,
    supertypes: Vec<TypeName>,
}

impl ClassSignature {
    pub fn new(type_parameters: IndexMap<String, TypeName>, supertypes: Vec<TypeName>) -> Self {
        ClassSignature {
            type_parameters,
            supertypes,
        }
    }

    pub fn type_parameters(&self) -> &IndexMap<String, TypeName> {
        &self.type_parameters
    }

    pub fn supertypes(&self) -> &[TypeName] {
        &self.supertypes
    }

    pub fn superclass(&self) -> Option<&TypeName> {
        self.supertypes.first()
    }

    pub fn interfaces(&self) -> &[TypeName] {
        self.supertypes.get(1..).unwrap_or_default()
    }

    /// Rewrite every raw class name in the signature through `rewrite`,
    /// without re-parsing anything.
    pub fn transform<F>(&self, rewrite: &F) -> ClassSignature
    where
        F: Fn(&str) -> String,
    {
        ClassSignature {
            type_parameters: self
                .type_parameters
                .iter()
                .map(|(name, bound)| (name.clone(), bound.transform(rewrite)))
                .collect(),
            supertypes: self
                .supertypes
                .iter()
                .map(|t| t.transform(rewrite))
                .collect(),
        }
    }
}

impl GenericsContext for ClassSignature {
    fn type_of(&self, name: &str) -> Option<TypeName> {
        self.type_parameters.get(name).cloned()
    }
}

impl fmt::Display for ClassSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.type_parameters.is_empty() {
            f.write_str("<")?;
            for (name, bound) in &self.type_parameters {
                write!(f, "{}:{}", name, bound.internal_name())?;
            }
            f.write_str(">")?;
        }
        for supertype in &self.supertypes {
            f.write_str(supertype.internal_name())?;
        }
        Ok(())
    }
}

impl Serialize for ClassSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A parsed method signature: declared type parameters, argument types and
/// the return type. `Display` reproduces the exact text it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    type_parameters: IndexMap<String, TypeName>,
    arguments: Vec<TypeName>,
    return_type: TypeName,
}

impl MethodSignature {
    pub fn new(
        type_parameters: IndexMap<String, TypeName>,
        arguments: Vec<TypeName>,
        return_type: TypeName,
    ) -> Self {
        MethodSignature {
            type_parameters,
            arguments,
            return_type,
        }
    }

    pub fn type_parameters(&self) -> &IndexMap<String, TypeName> {
        &self.type_parameters
    }

    pub fn arguments(&self) -> &[TypeName] {
        &self.arguments
    }

    pub fn return_type(&self) -> &TypeName {
        &self.return_type
    }

    /// Rewrite every raw class name in the signature through `rewrite`,
    /// without re-parsing anything.
    pub fn transform<F>(&self, rewrite: &F) -> MethodSignature
    where
        F: Fn(&str) -> String,
    {
        MethodSignature {
            type_parameters: self
                .type_parameters
                .iter()
                .map(|(name, bound)| (name.clone(), bound.transform(rewrite)))
                .collect(),
            arguments: self.arguments.iter().map(|t| t.transform(rewrite)).collect(),
            return_type: self.return_type.transform(rewrite),
        }
    }

    /// Resolve generic variables in the arguments and return type against
    /// a context. `None` when nothing changed. The method's own declared
    /// parameters can serve as the context, or be nested under a class's
    /// via [`GenericsContext::under`].
    pub fn reify(&self, ctx: &dyn GenericsContext) -> Option<MethodSignature> {
        let new_return = self.return_type.reify(ctx);
        let mut changed = new_return.is_some();
        let arguments: Vec<TypeName> = self
            .arguments
            .iter()
            .map(|a| match a.reify(ctx) {
                Some(n) => {
                    changed = true;
                    n
                }
                None => a.clone(),
            })
            .collect();
        changed.then(|| MethodSignature {
            type_parameters: self.type_parameters.clone(),
            arguments,
            return_type: new_return.unwrap_or_else(|| self.return_type.clone()),
        })
    }

    pub fn is_fully_specified(&self) -> bool {
        self.return_type.is_fully_specified()
            && self.arguments.iter().all(TypeName::is_fully_specified)
    }

    /// A loose Java-like rendering for debug output, with placeholder
    /// argument names.
    pub fn to_code(&self) -> String {
        let mut out = String::new();
        if !self.type_parameters.is_empty() {
            out.push('<');
            for (i, (name, bound)) in self.type_parameters.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(name);
                out.push(':');
                out.push_str(&bound.source_name());
            }
            out.push('>');
        }
        out.push_str(&self.return_type.source_name());
        out.push_str(" (");
        for (i, argument) in self.arguments.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&argument.source_name());
            out.push(' ');
            out.push((b'a' + (i % 26) as u8) as char);
        }
        out.push(')');
        out
    }
}

impl GenericsContext for MethodSignature {
    fn type_of(&self, name: &str) -> Option<TypeName> {
        self.type_parameters.get(name).cloned()
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.type_parameters.is_empty() {
            f.write_str("<")?;
            for (name, bound) in &self.type_parameters {
                write!(f, "{}:{}", name, bound.internal_name())?;
            }
            f.write_str(">")?;
        }
        f.write_str("(")?;
        for argument in &self.arguments {
            f.write_str(argument.internal_name())?;
        }
        f.write_str(")")?;
        f.write_str(self.return_type.internal_name())
    }
}

impl Serialize for MethodSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::Primitive;

    fn string_list_method() -> MethodSignature {
        let mut params = IndexMap::new();
        params.insert("T".to_string(), TypeName::object("java/lang/Object"));
        MethodSignature::new(
            params,
            vec![TypeName::parameterized(
                TypeName::object("java/util/List"),
                vec![TypeName::type_parameter("T")],
            )],
            TypeName::primitive(Primitive::Void),
        )
    }

    #[test]
    fn method_display_round_trips_structure() {
        let sig = string_list_method();
        assert_eq!(
            "<T:Ljava/lang/Object;>(Ljava/util/List<TT;>;)V",
            sig.to_string()
        );
    }

    #[test]
    fn method_reifies_against_own_parameters() {
        let sig = string_list_method();
        assert!(!sig.is_fully_specified());
        let reified = sig.reify(&sig).expect("T resolves to its bound");
        assert_eq!(
            "<T:Ljava/lang/Object;>(Ljava/util/List<Ljava/lang/Object;>;)V",
            reified.to_string()
        );
        assert!(reified.is_fully_specified());
        assert!(reified.reify(&sig).is_none());
    }

    #[test]
    fn class_signature_accessors() {
        let mut params = IndexMap::new();
        params.insert("S".to_string(), TypeName::object("java/lang/Number"));
        let sig = ClassSignature::new(
            params,
            vec![
                TypeName::object("java/lang/Object"),
                TypeName::object("java/lang/Iterable"),
            ],
        );
        assert_eq!(
            "Ljava/lang/Object;",
            sig.superclass().expect("present").internal_name()
        );
        assert_eq!(1, sig.interfaces().len());
        assert_eq!(
            "<S:Ljava/lang/Number;>Ljava/lang/Object;Ljava/lang/Iterable;",
            sig.to_string()
        );
    }

    #[test]
    fn transform_rewrites_all_positions() {
        let sig = string_list_method();
        let moved = sig.transform(&|s: &str| s.replace("java/util/", "shaded/java/util/"));
        assert_eq!(
            "<T:Ljava/lang/Object;>(Lshaded/java/util/List<TT;>;)V",
            moved.to_string()
        );
        // identity keeps the value equal
        assert_eq!(sig, sig.transform(&|s: &str| s.to_string()));
    }

    #[test]
    fn to_code_is_readable() {
        let sig = string_list_method();
        assert_eq!("<T:java.lang.Object>void (java.util.List<T> a)", sig.to_code());
    }
}
