//! The central type-name tree.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use serde::{Serialize, Serializer};

use crate::context::GenericsContext;
use crate::intern;
use crate::primitive::{CaptureKind, Primitive, TypePrefix};

/// One node in an immutable type tree, parsed from (and rendering back to)
/// the JVM's internal encoding of a type.
///
/// Equality and hashing are defined purely on the internal form, which is
/// rendered once on first use and cached. Children are reference counted,
/// so rebuilding operations such as [`TypeName::transform`] share every
/// subtree they did not touch.
#[derive(Debug, Clone)]
pub struct TypeName {
    kind: TypeNameKind,
    internal: OnceLock<Arc<str>>,
}

/// The closed set of type-name shapes.
#[derive(Debug, Clone)]
pub enum TypeNameKind {
    /// A primitive type, one descriptor code character.
    Primitive(Primitive),
    /// A bare slash-delimited internal class name with no decoration.
    Raw(Arc<str>),
    /// A structural prefix (and, for objects, the trailing semicolon)
    /// applied to a child type.
    Prefixed {
        prefix: TypePrefix,
        inner: Arc<TypeName>,
    },
    /// One level of array nesting.
    Array(Arc<TypeName>),
    /// A generic type applied to its argument list.
    Parameterized {
        target: Arc<TypeName>,
        arguments: Vec<TypeName>,
    },
    /// An unresolved generic variable reference, `TK;` in the encoding.
    TypeParameter(Arc<str>),
    /// A wildcard bound. The bound is absent for the bare `?` form.
    Capture {
        capture: CaptureKind,
        bound: Option<Arc<TypeName>>,
    },
    /// The bare `*` wildcard used in non-signature generic arguments.
    Wildcard,
    /// Two or more types combined into an intersection bound.
    Intersection(Vec<TypeName>),
    /// A bound declared with the leading `:` marking an interface type.
    /// Notational only; the wrapped type is unchanged.
    InterfaceBound(Arc<TypeName>),
    /// One `.Segment` link of the dotted chain produced when an inner
    /// class of a generic outer class is referenced. The segment is kept
    /// verbatim, which lets this parser accept (and reproduce) trailing
    /// shapes some reference signature readers choke on.
    InnerClass {
        outer: Arc<TypeName>,
        segment: Arc<str>,
    },
}

impl TypeName {
    fn from_kind(kind: TypeNameKind) -> TypeName {
        TypeName {
            kind,
            internal: OnceLock::new(),
        }
    }

    pub fn kind(&self) -> &TypeNameKind {
        &self.kind
    }

    pub fn primitive(p: Primitive) -> TypeName {
        TypeName::from_kind(TypeNameKind::Primitive(p))
    }

    /// A bare internal name such as `java/lang/String`. Common JDK names
    /// come out of a shared interning table rather than a fresh allocation.
    pub fn raw(name: impl Into<Arc<str>>) -> TypeName {
        let name: Arc<str> = name.into();
        intern::common(&name).unwrap_or_else(|| TypeName::from_kind(TypeNameKind::Raw(name)))
    }

    pub(crate) fn raw_uninterned(name: &str) -> TypeName {
        TypeName::from_kind(TypeNameKind::Raw(Arc::from(name)))
    }

    /// An internal name wrapped as an object reference, `L...;` in the
    /// encoding.
    pub fn object(name: impl Into<Arc<str>>) -> TypeName {
        TypeName::prefixed(TypePrefix::Object, TypeName::raw(name))
    }

    pub fn prefixed(prefix: TypePrefix, inner: TypeName) -> TypeName {
        TypeName::from_kind(TypeNameKind::Prefixed {
            prefix,
            inner: Arc::new(inner),
        })
    }

    pub fn array(component: TypeName) -> TypeName {
        TypeName::from_kind(TypeNameKind::Array(Arc::new(component)))
    }

    pub fn parameterized(target: TypeName, arguments: Vec<TypeName>) -> TypeName {
        TypeName::from_kind(TypeNameKind::Parameterized {
            target: Arc::new(target),
            arguments,
        })
    }

    pub fn type_parameter(name: impl Into<Arc<str>>) -> TypeName {
        TypeName::from_kind(TypeNameKind::TypeParameter(name.into()))
    }

    pub fn capture(capture: CaptureKind, bound: Option<TypeName>) -> TypeName {
        TypeName::from_kind(TypeNameKind::Capture {
            capture,
            bound: bound.map(Arc::new),
        })
    }

    pub fn wildcard() -> TypeName {
        TypeName::from_kind(TypeNameKind::Wildcard)
    }

    /// Combine a list of types into an intersection. A single-element list
    /// collapses to that element. Empty lists are a caller bug.
    pub fn intersection(members: Vec<TypeName>) -> TypeName {
        assert!(!members.is_empty(), "empty intersection");
        if members.len() == 1 {
            members.into_iter().next().expect("length checked")
        } else {
            TypeName::from_kind(TypeNameKind::Intersection(members))
        }
    }

    /// Mark a bound as an interface type. Already-marked types pass
    /// through unchanged.
    pub fn interface_bound(inner: TypeName) -> TypeName {
        if matches!(inner.kind, TypeNameKind::InterfaceBound(_)) {
            inner
        } else {
            TypeName::from_kind(TypeNameKind::InterfaceBound(Arc::new(inner)))
        }
    }

    pub fn inner_class(outer: TypeName, segment: impl Into<Arc<str>>) -> TypeName {
        TypeName::from_kind(TypeNameKind::InnerClass {
            outer: Arc::new(outer),
            segment: segment.into(),
        })
    }

    /// The internal form of this type, exactly as it appeared in the
    /// signature it was parsed from. Rendered lazily and cached.
    pub fn internal_name(&self) -> &str {
        self.internal.get_or_init(|| {
            let mut out = String::new();
            self.write_internal(&mut out);
            Arc::from(out)
        })
    }

    /// The internal form less any trailing semicolon, so that generics or
    /// inner-class segments can be appended to it.
    pub fn name_base(&self) -> String {
        let mut out = String::new();
        self.write_name_base(&mut out);
        out
    }

    fn write_internal(&self, out: &mut String) {
        match &self.kind {
            TypeNameKind::Primitive(p) => out.push(p.code()),
            TypeNameKind::Raw(name) => out.push_str(name),
            TypeNameKind::Prefixed { prefix, inner } => {
                out.push(prefix.marker());
                inner.write_internal(out);
                out.push_str(prefix.suffix());
            }
            TypeNameKind::Array(component) => {
                out.push('[');
                component.write_internal(out);
            }
            TypeNameKind::Parameterized { .. } => {
                self.write_name_base(out);
                out.push(';');
            }
            TypeNameKind::TypeParameter(name) => {
                out.push('T');
                out.push_str(name);
                out.push(';');
            }
            TypeNameKind::Capture { capture, bound } => {
                out.push(capture.marker());
                if let Some(bound) = bound {
                    bound.write_internal(out);
                }
            }
            TypeNameKind::Wildcard => out.push('*'),
            TypeNameKind::Intersection(members) => {
                for member in members {
                    member.write_internal(out);
                }
            }
            TypeNameKind::InterfaceBound(inner) => {
                out.push(':');
                inner.write_internal(out);
            }
            // No semicolon of its own; a trailing segment carries whatever
            // text it was captured with.
            TypeNameKind::InnerClass { .. } => self.write_name_base(out),
        }
    }

    fn write_name_base(&self, out: &mut String) {
        match &self.kind {
            TypeNameKind::Primitive(p) => out.push(p.code()),
            TypeNameKind::Raw(name) => out.push_str(name),
            TypeNameKind::Prefixed { prefix, inner } => {
                out.push(prefix.marker());
                inner.write_name_base(out);
            }
            TypeNameKind::Array(component) => {
                out.push('[');
                component.write_name_base(out);
            }
            TypeNameKind::Parameterized { target, arguments } => {
                target.write_name_base(out);
                out.push('<');
                for argument in arguments {
                    argument.write_internal(out);
                }
                out.push('>');
            }
            TypeNameKind::TypeParameter(name) => {
                out.push('T');
                out.push_str(name);
            }
            TypeNameKind::Capture { capture, bound } => {
                out.push(capture.marker());
                if let Some(bound) = bound {
                    bound.write_internal(out);
                }
            }
            TypeNameKind::Wildcard => out.push('*'),
            TypeNameKind::Intersection(members) => {
                for member in members {
                    member.write_internal(out);
                }
            }
            TypeNameKind::InterfaceBound(inner) => {
                out.push(':');
                inner.write_name_base(out);
            }
            TypeNameKind::InnerClass { outer, segment } => {
                outer.write_name_base(out);
                out.push('.');
                out.push_str(segment);
            }
        }
    }

    /// The dot-delimited rendering used in source code, with generic
    /// arguments as `<A, B>` and captures as `? extends A`.
    pub fn source_name(&self) -> String {
        match &self.kind {
            TypeNameKind::Primitive(p) => p.source_name().to_string(),
            TypeNameKind::Raw(name) => dotted(name),
            TypeNameKind::Prefixed { prefix, inner } => match prefix {
                TypePrefix::Array => format!("{}[]", inner.source_name()),
                _ => inner.source_name(),
            },
            TypeNameKind::Array(component) => format!("{}[]", component.source_name()),
            TypeNameKind::Parameterized { target, arguments } => {
                let args: Vec<String> = arguments.iter().map(TypeName::source_name).collect();
                format!("{}<{}>", target.source_name(), args.join(", "))
            }
            TypeNameKind::TypeParameter(name) => name.to_string(),
            TypeNameKind::Capture { capture, bound } => match bound {
                Some(bound) if capture.requires_argument() => {
                    format!("? {} {}", capture.keyword(), bound.source_name())
                }
                _ => "?".to_string(),
            },
            TypeNameKind::Wildcard => "?".to_string(),
            TypeNameKind::Intersection(members) => {
                let parts: Vec<String> = members.iter().map(TypeName::source_name).collect();
                parts.join(" & ")
            }
            TypeNameKind::InterfaceBound(inner) => inner.source_name(),
            TypeNameKind::InnerClass { outer, segment } => {
                format!("{}.{}", outer.source_name(), segment)
            }
        }
    }

    /// [`TypeName::source_name`] with any `java.lang.` package prefix
    /// elided, recursively.
    pub fn source_name_truncated(&self) -> String {
        match &self.kind {
            TypeNameKind::Raw(name) => match name.strip_prefix("java/lang/") {
                Some(rest) => dotted(rest),
                None => dotted(name),
            },
            TypeNameKind::Prefixed { prefix, inner } => match prefix {
                TypePrefix::Array => format!("{}[]", inner.source_name_truncated()),
                _ => inner.source_name_truncated(),
            },
            TypeNameKind::Array(component) => format!("{}[]", component.source_name_truncated()),
            TypeNameKind::Parameterized { target, arguments } => {
                let args: Vec<String> = arguments
                    .iter()
                    .map(TypeName::source_name_truncated)
                    .collect();
                format!("{}<{}>", target.source_name_truncated(), args.join(", "))
            }
            TypeNameKind::Capture { capture, bound } => match bound {
                Some(bound) if capture.requires_argument() => {
                    format!("? {} {}", capture.keyword(), bound.source_name_truncated())
                }
                _ => "?".to_string(),
            },
            TypeNameKind::Intersection(members) => {
                let parts: Vec<String> = members
                    .iter()
                    .map(TypeName::source_name_truncated)
                    .collect();
                parts.join(" & ")
            }
            TypeNameKind::InterfaceBound(inner) => inner.source_name_truncated(),
            TypeNameKind::InnerClass { outer, segment } => {
                format!("{}.{}", outer.source_name_truncated(), segment)
            }
            _ => self.source_name(),
        }
    }

    /// The unqualified name.
    pub fn simple_name(&self) -> String {
        match &self.kind {
            TypeNameKind::Primitive(p) => p.source_name().to_string(),
            TypeNameKind::Raw(name) => {
                let tail = name.rsplit('/').next().unwrap_or(name);
                tail.replace('$', ".")
            }
            TypeNameKind::Prefixed { prefix, inner } => match prefix {
                TypePrefix::Array => format!("{}[]", inner.simple_name()),
                _ => inner.simple_name(),
            },
            TypeNameKind::Array(component) => format!("{}[]", component.simple_name()),
            TypeNameKind::Parameterized { target, .. } => target.simple_name(),
            TypeNameKind::TypeParameter(name) => name.to_string(),
            TypeNameKind::Capture { capture, bound } => match bound {
                Some(bound) if capture.requires_argument() => {
                    format!("? {} {}", capture.keyword(), bound.simple_name())
                }
                _ => "?".to_string(),
            },
            TypeNameKind::Wildcard => "?".to_string(),
            TypeNameKind::Intersection(members) => {
                let parts: Vec<String> = members.iter().map(TypeName::simple_name).collect();
                parts.join(" & ")
            }
            TypeNameKind::InterfaceBound(inner) => inner.simple_name(),
            TypeNameKind::InnerClass { segment, .. } => segment.to_string(),
        }
    }

    /// The dotted package of the underlying class name, or the empty
    /// string for primitives, variables and wildcards.
    pub fn package_name(&self) -> String {
        match &self.kind {
            TypeNameKind::Raw(name) => match name.rfind('/') {
                Some(ix) => dotted(&name[..ix]),
                None => String::new(),
            },
            TypeNameKind::Prefixed { inner, .. } => inner.package_name(),
            TypeNameKind::Array(component) => component.package_name(),
            TypeNameKind::Parameterized { target, .. } => target.package_name(),
            TypeNameKind::Capture { bound, .. } => bound
                .as_deref()
                .map(TypeName::package_name)
                .unwrap_or_default(),
            TypeNameKind::Intersection(members) => members
                .first()
                .map(TypeName::package_name)
                .unwrap_or_default(),
            TypeNameKind::InterfaceBound(inner) => inner.package_name(),
            TypeNameKind::InnerClass { outer, .. } => outer.package_name(),
            _ => String::new(),
        }
    }

    /// This type with all generic applications stripped.
    pub fn raw_name(&self) -> TypeName {
        match &self.kind {
            TypeNameKind::Parameterized { target, .. } => target.raw_name(),
            TypeNameKind::Array(component) => TypeName::array(component.raw_name()),
            TypeNameKind::Prefixed { prefix, inner } => {
                TypeName::prefixed(*prefix, inner.raw_name())
            }
            TypeNameKind::Capture { capture, bound } => {
                TypeName::capture(*capture, bound.as_deref().map(TypeName::raw_name))
            }
            TypeNameKind::Intersection(members) => members
                .first()
                .expect("intersections are never empty")
                .raw_name(),
            TypeNameKind::InterfaceBound(inner) => TypeName::interface_bound(inner.raw_name()),
            TypeNameKind::InnerClass { outer, segment } => {
                TypeName::inner_class(outer.raw_name(), Arc::clone(segment))
            }
            _ => self.clone(),
        }
    }

    /// Whether this node alters the type being expressed. The object
    /// prefix wrapper and the interface-bound marker only affect how the
    /// signature is spelled, not what the type is.
    pub fn is_semantic(&self) -> bool {
        !matches!(
            self.kind,
            TypeNameKind::Prefixed {
                prefix: TypePrefix::Object,
                ..
            } | TypeNameKind::InterfaceBound(_)
        )
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, TypeNameKind::Primitive(_))
    }

    /// True for arrays whose innermost component is a primitive.
    pub fn is_primitive_array(&self) -> bool {
        match &self.kind {
            TypeNameKind::Array(component) => match &component.kind {
                TypeNameKind::Array(_) => component.is_primitive_array(),
                _ => component.is_primitive(),
            },
            _ => false,
        }
    }

    /// True when, modulo notational wrappers and captures, this type is
    /// nothing but a generic variable reference.
    pub fn is_type_parameter(&self) -> bool {
        match &self.kind {
            TypeNameKind::TypeParameter(_) => true,
            TypeNameKind::Capture {
                bound: Some(bound), ..
            } => bound.is_type_parameter(),
            TypeNameKind::InterfaceBound(inner) => inner.is_type_parameter(),
            _ => false,
        }
    }

    /// True when no unresolved generic variable remains anywhere in the
    /// tree. Types that fail this can be completed with
    /// [`TypeName::reify`] given a context that knows the missing names.
    pub fn is_fully_specified(&self) -> bool {
        !self.contains_type_parameter()
    }

    fn contains_type_parameter(&self) -> bool {
        match &self.kind {
            TypeNameKind::TypeParameter(_) => true,
            TypeNameKind::Prefixed { inner, .. } => inner.contains_type_parameter(),
            TypeNameKind::Array(component) => component.contains_type_parameter(),
            TypeNameKind::Parameterized { target, arguments } => {
                target.contains_type_parameter()
                    || arguments.iter().any(TypeName::contains_type_parameter)
            }
            TypeNameKind::Capture { bound, .. } => bound
                .as_deref()
                .is_some_and(TypeName::contains_type_parameter),
            TypeNameKind::Intersection(members) => {
                members.iter().any(TypeName::contains_type_parameter)
            }
            TypeNameKind::InterfaceBound(inner) => inner.contains_type_parameter(),
            TypeNameKind::InnerClass { outer, .. } => outer.contains_type_parameter(),
            _ => false,
        }
    }

    /// Rebuild this tree with every raw internal name (and inner-class
    /// segment) passed through `rewrite`. Subtrees the rewrite does not
    /// touch are shared with the original, and an untouched tree comes
    /// back as a cheap clone of `self`.
    pub fn transform<F>(&self, rewrite: &F) -> TypeName
    where
        F: Fn(&str) -> String,
    {
        self.transform_inner(rewrite)
            .unwrap_or_else(|| self.clone())
    }

    fn transform_inner<F>(&self, rewrite: &F) -> Option<TypeName>
    where
        F: Fn(&str) -> String,
    {
        match &self.kind {
            TypeNameKind::Raw(name) => {
                let rewritten = rewrite(name);
                (rewritten.as_str() != name.as_ref()).then(|| TypeName::raw(rewritten))
            }
            TypeNameKind::Prefixed { prefix, inner } => {
                let new_inner = inner.transform_inner(rewrite)?;
                Some(TypeName::prefixed(*prefix, new_inner))
            }
            TypeNameKind::Array(component) => {
                let new_component = component.transform_inner(rewrite)?;
                Some(TypeName::array(new_component))
            }
            TypeNameKind::Parameterized { target, arguments } => {
                let new_target = target.transform_inner(rewrite);
                let mut changed = new_target.is_some();
                let new_arguments: Vec<TypeName> = arguments
                    .iter()
                    .map(|a| match a.transform_inner(rewrite) {
                        Some(n) => {
                            changed = true;
                            n
                        }
                        None => a.clone(),
                    })
                    .collect();
                changed.then(|| TypeName::from_kind(TypeNameKind::Parameterized {
                    target: match new_target {
                        Some(t) => Arc::new(t),
                        None => Arc::clone(target),
                    },
                    arguments: new_arguments,
                }))
            }
            TypeNameKind::Capture { capture, bound } => {
                let new_bound = bound.as_deref()?.transform_inner(rewrite)?;
                Some(TypeName::capture(*capture, Some(new_bound)))
            }
            TypeNameKind::Intersection(members) => {
                let mut changed = false;
                let new_members: Vec<TypeName> = members
                    .iter()
                    .map(|m| match m.transform_inner(rewrite) {
                        Some(n) => {
                            changed = true;
                            n
                        }
                        None => m.clone(),
                    })
                    .collect();
                changed.then(|| TypeName::from_kind(TypeNameKind::Intersection(new_members)))
            }
            TypeNameKind::InterfaceBound(inner) => {
                let new_inner = inner.transform_inner(rewrite)?;
                Some(TypeName::interface_bound(new_inner))
            }
            TypeNameKind::InnerClass { outer, segment } => {
                let new_outer = outer.transform_inner(rewrite);
                let new_segment = rewrite(segment);
                if new_outer.is_none() && new_segment.as_str() == segment.as_ref() {
                    return None;
                }
                Some(TypeName::from_kind(TypeNameKind::InnerClass {
                    outer: match new_outer {
                        Some(o) => Arc::new(o),
                        None => Arc::clone(outer),
                    },
                    segment: Arc::from(new_segment),
                }))
            }
            _ => None,
        }
    }

    /// Substitute concrete types for the generic variables the context can
    /// resolve. Returns `None` when nothing changed, so callers can keep
    /// the tree they already have. Names the context does not know are
    /// left in place rather than treated as errors.
    pub fn reify(&self, ctx: &dyn GenericsContext) -> Option<TypeName> {
        match &self.kind {
            TypeNameKind::TypeParameter(name) => ctx.type_of(name),
            TypeNameKind::Prefixed { prefix, inner } => inner
                .reify(ctx)
                .map(|n| TypeName::prefixed(*prefix, n)),
            TypeNameKind::Array(component) => component.reify(ctx).map(TypeName::array),
            TypeNameKind::Parameterized { target, arguments } => {
                let new_target = target.reify(ctx);
                let mut changed = new_target.is_some();
                let new_arguments: Vec<TypeName> = arguments
                    .iter()
                    .map(|a| match a.reify(ctx) {
                        Some(n) => {
                            changed = true;
                            n
                        }
                        None => a.clone(),
                    })
                    .collect();
                changed.then(|| TypeName::from_kind(TypeNameKind::Parameterized {
                    target: match new_target {
                        Some(t) => Arc::new(t),
                        None => Arc::clone(target),
                    },
                    arguments: new_arguments,
                }))
            }
            TypeNameKind::Capture { capture, bound } => bound
                .as_deref()?
                .reify(ctx)
                .map(|n| TypeName::capture(*capture, Some(n))),
            TypeNameKind::Intersection(members) => {
                let mut changed = false;
                let new_members: Vec<TypeName> = members
                    .iter()
                    .map(|m| match m.reify(ctx) {
                        Some(n) => {
                            changed = true;
                            n
                        }
                        None => m.clone(),
                    })
                    .collect();
                changed.then(|| TypeName::from_kind(TypeNameKind::Intersection(new_members)))
            }
            TypeNameKind::InterfaceBound(inner) => {
                inner.reify(ctx).map(TypeName::interface_bound)
            }
            TypeNameKind::InnerClass { outer, segment } => outer
                .reify(ctx)
                .map(|o| TypeName::inner_class(o, Arc::clone(segment))),
            _ => None,
        }
    }

    /// A short label for the variant, used in debug output.
    pub fn kind_label(&self) -> &'static str {
        match &self.kind {
            TypeNameKind::Primitive(_) => "Primitive",
            TypeNameKind::Raw(_) => "Raw",
            TypeNameKind::Prefixed { .. } => "Prefixed",
            TypeNameKind::Array(_) => "Array",
            TypeNameKind::Parameterized { .. } => "Parameterized",
            TypeNameKind::TypeParameter(_) => "TypeParameter",
            TypeNameKind::Capture { .. } => "Capture",
            TypeNameKind::Wildcard => "Wildcard",
            TypeNameKind::Intersection(_) => "Intersection",
            TypeNameKind::InterfaceBound(_) => "InterfaceBound",
            TypeNameKind::InnerClass { .. } => "InnerClass",
        }
    }
}

fn dotted(name: &str) -> String {
    name.replace('/', ".").replace('$', ".")
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.internal_name())
    }
}

impl PartialEq for TypeName {
    fn eq(&self, other: &Self) -> bool {
        self.internal_name() == other.internal_name()
    }
}

impl Eq for TypeName {}

impl Hash for TypeName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.internal_name().hash(state);
    }
}

impl PartialOrd for TypeName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw_name()
            .source_name()
            .cmp(&other.raw_name().source_name())
            .then_with(|| self.internal_name().cmp(other.internal_name()))
    }
}

impl Serialize for TypeName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.internal_name())
    }
}
