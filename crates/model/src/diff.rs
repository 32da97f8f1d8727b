//! Structural difference between two type trees, used to classify API
//! changes as compatible or incompatible.

use std::collections::HashSet;
use std::fmt;

use crate::name::TypeName;
use crate::signature::MethodSignature;
use crate::visit::TypeVisit;

/// A semantic node paired with the semantic depth it was found at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DepthTypeName {
    pub depth: usize,
    pub type_name: TypeName,
}

impl fmt::Display for DepthTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.depth, self.type_name.source_name_truncated())
    }
}

/// The parts present on only one side of a comparison of two types.
///
/// This is a set difference over the flattened semantic node lists of the
/// two trees, not an edit distance; notational wrappers are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeNameDifference {
    befores: Vec<DepthTypeName>,
    afters: Vec<DepthTypeName>,
}

impl TypeNameDifference {
    pub fn differences(before: &TypeName, after: &TypeName) -> TypeNameDifference {
        if before == after {
            return TypeNameDifference::default();
        }
        let mut befores = semantic_nodes(before);
        let mut afters = semantic_nodes(after);
        let in_after: HashSet<DepthTypeName> = afters.iter().cloned().collect();
        let in_before: HashSet<DepthTypeName> = befores.iter().cloned().collect();
        befores.retain(|n| !in_after.contains(n));
        afters.retain(|n| !in_before.contains(n));
        TypeNameDifference { befores, afters }
    }

    /// Pairwise differences of two argument lists, with surplus arguments
    /// on either side reported as whole-type additions or removals.
    pub fn arguments_difference(
        before: &MethodSignature,
        after: &MethodSignature,
    ) -> Vec<TypeNameDifference> {
        let a = before.arguments();
        let b = after.arguments();
        let shared = a.len().min(b.len());
        let mut result = Vec::with_capacity(a.len().max(b.len()));
        for i in 0..shared {
            result.push(TypeNameDifference::differences(&a[i], &b[i]));
        }
        for removed in &a[shared..] {
            result.push(TypeNameDifference::removed(removed));
        }
        for added in &b[shared..] {
            result.push(TypeNameDifference::added(added));
        }
        result
    }

    pub fn removed(t: &TypeName) -> TypeNameDifference {
        TypeNameDifference {
            befores: semantic_nodes(t),
            afters: Vec::new(),
        }
    }

    pub fn added(t: &TypeName) -> TypeNameDifference {
        TypeNameDifference {
            befores: Vec::new(),
            afters: semantic_nodes(t),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.befores.is_empty() && self.afters.is_empty()
    }

    pub fn befores(&self) -> &[DepthTypeName] {
        &self.befores
    }

    pub fn afters(&self) -> &[DepthTypeName] {
        &self.afters
    }
}

fn semantic_nodes(t: &TypeName) -> Vec<DepthTypeName> {
    let mut result = Vec::new();
    t.accept(&mut |ctx: &TypeVisit<'_>, node: &TypeName| {
        if node.is_semantic() {
            result.push(DepthTypeName {
                depth: ctx.semantic_depth,
                type_name: node.clone(),
            });
        }
    });
    result
}

impl fmt::Display for TypeNameDifference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-none-");
        }
        if self.befores.is_empty() {
            f.write_str("added ")?;
        } else if self.afters.is_empty() {
            f.write_str("removed ")?;
        } else {
            f.write_str("changed ")?;
        }
        let rows = self.befores.len().max(self.afters.len());
        for i in 0..rows {
            if i > 0 {
                writeln!(f)?;
            }
            let before = self.befores.get(i).map(ToString::to_string).unwrap_or_default();
            let after = self.afters.get(i).map(ToString::to_string).unwrap_or_default();
            write!(f, "{}/{}", before, after)?;
        }
        Ok(())
    }
}
