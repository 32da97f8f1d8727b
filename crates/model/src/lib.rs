//! Immutable model of JVM type names and generic signatures.
//!
//! A [`TypeName`] is one node in an acyclic tree built by the companion
//! parsing crate from the JVM's internal encoding of a type (slash
//! delimited, with various prefixes and suffixes). Nodes are created once,
//! never edited, and are cheap to clone and share across threads; rendering
//! back to the internal form reproduces the exact text the node was parsed
//! from.

pub mod context;
pub mod diff;
mod intern;
pub mod name;
pub mod primitive;
pub mod signature;
pub mod visit;

pub use context::{GenericsContext, Nested};
pub use diff::{DepthTypeName, TypeNameDifference};
pub use name::{TypeName, TypeNameKind};
pub use primitive::{CaptureKind, Primitive, TypePrefix};
pub use signature::{ClassSignature, MethodSignature};
pub use visit::{TypeNesting, TypeVisit};
