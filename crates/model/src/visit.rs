//! Pre-order traversal over a type tree with depth and nesting-reason
//! bookkeeping.

use std::fmt::Write as _;

use crate::name::{TypeName, TypeNameKind};

/// Why a node sits underneath its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeNesting {
    /// The outermost node, or a node that is essentially the same type as
    /// its parent (the target of a generic application).
    Itself,
    /// Wrapped for notational reasons only, such as the object prefix or
    /// the interface-bound marker.
    Wrapped,
    /// A generic argument of the parent.
    TypeArgument,
    /// The bound of a capture.
    Captured,
    /// A peer in an intersection.
    Peer,
    /// The component type of an array.
    ArrayComponent,
    /// The outer portion of an inner-class chain.
    InnerClassOf,
}

/// The context record handed to a visitor for each node.
#[derive(Clone, Copy)]
pub struct TypeVisit<'a> {
    /// The parent node, absent at the root.
    pub parent: Option<&'a TypeName>,
    /// Depth counted only across nodes that change the expressed type.
    pub semantic_depth: usize,
    pub nesting: TypeNesting,
    /// Raw tree depth, counting every node.
    pub depth: usize,
}

impl TypeName {
    /// Visit this node and everything beneath it, pre-order. The semantic
    /// depth increments only when descending through a node for which
    /// [`TypeName::is_semantic`] holds.
    pub fn accept<F>(&self, visitor: &mut F)
    where
        F: FnMut(&TypeVisit<'_>, &TypeName),
    {
        self.accept_inner(
            TypeVisit {
                parent: None,
                semantic_depth: 0,
                nesting: TypeNesting::Itself,
                depth: 0,
            },
            visitor,
        );
    }

    fn accept_inner<F>(&self, ctx: TypeVisit<'_>, visitor: &mut F)
    where
        F: FnMut(&TypeVisit<'_>, &TypeName),
    {
        visitor(&ctx, self);
        let child = |nesting| TypeVisit {
            parent: Some(self),
            semantic_depth: ctx.semantic_depth + usize::from(self.is_semantic()),
            nesting,
            depth: ctx.depth + 1,
        };
        match self.kind() {
            TypeNameKind::Prefixed { inner, .. } => {
                inner.accept_inner(child(TypeNesting::Wrapped), visitor);
            }
            TypeNameKind::Array(component) => {
                component.accept_inner(child(TypeNesting::ArrayComponent), visitor);
            }
            TypeNameKind::Parameterized { target, arguments } => {
                target.accept_inner(child(TypeNesting::Itself), visitor);
                for argument in arguments {
                    argument.accept_inner(child(TypeNesting::TypeArgument), visitor);
                }
            }
            TypeNameKind::Capture { bound, .. } => {
                if let Some(bound) = bound {
                    bound.accept_inner(child(TypeNesting::Captured), visitor);
                }
            }
            TypeNameKind::Intersection(members) => {
                for member in members {
                    member.accept_inner(child(TypeNesting::Peer), visitor);
                }
            }
            TypeNameKind::InterfaceBound(inner) => {
                inner.accept_inner(child(TypeNesting::Wrapped), visitor);
            }
            TypeNameKind::InnerClass { outer, .. } => {
                outer.accept_inner(child(TypeNesting::InnerClassOf), visitor);
            }
            _ => {}
        }
    }

    /// An indented one-node-per-line dump of the tree, for debugging.
    pub fn tree_string(&self) -> String {
        let mut out = String::new();
        self.accept(&mut |ctx: &TypeVisit<'_>, node: &TypeName| {
            let _ = writeln!(
                out,
                "{:indent$}{} {} {:?}{} @ {}",
                "",
                node.internal_name(),
                node.kind_label(),
                ctx.nesting,
                if node.is_semantic() { " semantic" } else { "" },
                ctx.depth,
                indent = ctx.depth * 2,
            );
        });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::CaptureKind;

    #[test]
    fn semantic_depth_skips_notational_wrappers() {
        // Map<? super String, ? extends Number>
        let t = TypeName::parameterized(
            TypeName::object("java/util/Map"),
            vec![
                TypeName::capture(CaptureKind::Super, Some(TypeName::object("java/lang/String"))),
                TypeName::capture(
                    CaptureKind::Extends,
                    Some(TypeName::object("java/lang/Number")),
                ),
            ],
        );

        let mut string_visit = None;
        t.accept(&mut |ctx: &TypeVisit<'_>, node: &TypeName| {
            if node.internal_name() == "java/lang/String" {
                string_visit = Some((ctx.semantic_depth, ctx.depth, ctx.nesting));
            }
        });
        // Raw sits under Prefixed (notational) under Capture (semantic)
        // under the Parameterized root (semantic).
        let (semantic, raw, nesting) = string_visit.expect("visited the raw leaf");
        assert_eq!(2, semantic);
        assert_eq!(3, raw);
        assert_eq!(TypeNesting::Wrapped, nesting);
    }

    #[test]
    fn parents_are_reported() {
        let t = TypeName::array(TypeName::object("java/lang/String"));
        let mut roots = 0;
        let mut nested = 0;
        t.accept(&mut |ctx: &TypeVisit<'_>, _node: &TypeName| {
            match ctx.parent {
                None => roots += 1,
                Some(_) => nested += 1,
            }
        });
        assert_eq!(1, roots);
        assert_eq!(2, nested);
    }

    #[test]
    fn tree_string_covers_every_node() {
        let t = TypeName::array(TypeName::object("java/lang/String"));
        let dump = t.tree_string();
        assert_eq!(3, dump.lines().count());
        assert!(dump.contains("ArrayComponent"));
    }
}
