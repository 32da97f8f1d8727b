//! Parsers for the JVM's internal type encodings: field and method
//! descriptors, and the richer generic signature grammar layered over
//! them.
//!
//! Each entry point takes one signature string, runs a fresh
//! [`Cursor`](cursor::Cursor) over it, and hands back an immutable tree
//! from `sigscope-model`. Rendering that tree's internal form reproduces
//! the input byte for byte. Class files that carry no generic signature
//! can feed their plain descriptors through the same entry points; the
//! descriptor grammar is a subset.
//!
//! Parsing is pure, CPU-bound recursion over stack-local state, so any
//! number of threads can parse independently and share the resulting
//! trees freely.

pub mod cursor;
pub mod error;
mod limiter;
mod signatures;
mod types;

pub use error::{Result, SignatureError};
pub use sigscope_model::{ClassSignature, MethodSignature, TypeName};

use cursor::Cursor;

/// Parse a field descriptor or field/type signature.
pub fn parse_field_signature(input: &str) -> Result<TypeName> {
    tracing::trace!(input, "parsing field signature");
    let mut cur = Cursor::new(input);
    types::parse_type(&mut cur)
}

/// Parse a class signature: optional type-parameter declarations followed
/// by the superclass and implemented interfaces.
pub fn parse_class_signature(input: &str) -> Result<ClassSignature> {
    tracing::trace!(input, "parsing class signature");
    let mut cur = Cursor::new(input);
    signatures::class_signature(&mut cur)
}

/// Parse a method descriptor or generic method signature.
pub fn parse_method_signature(input: &str) -> Result<MethodSignature> {
    tracing::trace!(input, "parsing method signature");
    let mut cur = Cursor::new(input);
    signatures::method_signature(&mut cur)
}
