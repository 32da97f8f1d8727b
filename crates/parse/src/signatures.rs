//! Parsers for the declaration-site grammar: type-parameter lists and
//! whole class/method signatures.

use indexmap::IndexMap;
use sigscope_model::{ClassSignature, MethodSignature, TypeName};

use crate::cursor::{Cursor, DelimiterPair};
use crate::error::{Result, SignatureError};
use crate::limiter::LoopLimiter;
use crate::types::parse_type;

/// Read the declared name of one type parameter, up to its `:` separator.
/// `None` (position restored) when no name-colon pair is in reach, which
/// ends a declaration list.
fn declared_name(cur: &mut Cursor<'_>) -> Result<Option<String>> {
    cur.advance_if('<');
    let mut found = None;
    cur.provisionally(|cur| match cur.scan_to(':', &[';', '>', '(', ')']) {
        Some(name) => {
            found = Some(name.to_string());
            Ok(true)
        }
        None => Ok(false),
    })?;
    Ok(found)
}

/// Parse `Name:Bound(:Bound)*` pairs until the declaration list runs out.
/// The bound grammar handles the colon-joined continuation itself, so
/// each pair parses as one (possibly intersection) type.
pub(crate) fn type_parameter_pairs(cur: &mut Cursor<'_>) -> Result<IndexMap<String, TypeName>> {
    let mut result = IndexMap::new();
    let mut limiter = LoopLimiter::new("type-parameters");
    while !cur.is_at_end() && !limiter.is_broken() {
        match declared_name(cur)? {
            Some(name) => {
                let bound = parse_type(cur)?;
                result.insert(name, bound);
                cur.advance_if(';');
            }
            None => {
                if result.is_empty() {
                    return Err(SignatureError::parse("no type parameter name found", cur));
                }
                limiter.break_loop();
            }
        }
        limiter.tick(cur)?;
    }
    Ok(result)
}

/// The optional `<...>` type-parameter declaration opening a class
/// signature. Only recognized at the very start of the input; an
/// unbalanced list leaves the cursor untouched and declares nothing.
fn leading_type_parameters(cur: &mut Cursor<'_>) -> Result<IndexMap<String, TypeName>> {
    if cur.position() != 0 {
        return Ok(IndexMap::new());
    }
    let mut params = IndexMap::new();
    cur.try_consume('<', |cur| {
        let Some(close) = cur.delimiter_scan(DelimiterPair::ANGLES, &['(']) else {
            return Ok(false);
        };
        cur.with_limit(close, |cur| {
            params = type_parameter_pairs(cur)?;
            Ok(true)
        })?;
        Ok(true)
    })?;
    Ok(params)
}

/// Parse a class signature: optional type-parameter declarations, then
/// the superclass and any interfaces until the input is exhausted.
pub(crate) fn class_signature(cur: &mut Cursor<'_>) -> Result<ClassSignature> {
    let type_parameters = leading_type_parameters(cur)?;
    let mut supertypes = Vec::new();
    let mut limiter = LoopLimiter::new("class-signature");
    while !cur.is_done() && !limiter.is_broken() {
        supertypes.push(parse_type(cur)?);
        cur.advance_if('>');
        cur.advance_if(';');
        limiter.tick(cur)?;
    }
    Ok(ClassSignature::new(type_parameters, supertypes))
}

/// Parse a method signature: optional type-parameter declarations, the
/// parenthesized argument list, then exactly one return type.
pub(crate) fn method_signature(cur: &mut Cursor<'_>) -> Result<MethodSignature> {
    let mut type_parameters = IndexMap::new();
    if cur.current() == Some('<') {
        type_parameters = type_parameter_pairs(cur)?;
        cur.advance_if('>');
    }
    let mut arguments = Vec::new();
    if cur.current() == Some('(') && cur.lookahead(1) != Some(')') {
        arguments = method_arguments(cur)?;
    } else if cur.current() == Some('(') && cur.lookahead(1) == Some(')') {
        cur.advance(2);
    }
    let return_type = parse_type(cur)?;
    Ok(MethodSignature::new(type_parameters, arguments, return_type))
}

fn method_arguments(cur: &mut Cursor<'_>) -> Result<Vec<TypeName>> {
    cur.advance_if('(');
    if cur.advance_if(')') {
        return Ok(Vec::new());
    }
    let mut result = Vec::new();
    if let Some(end) = cur.delimiter_scan(DelimiterPair::PARENS, &[]) {
        if end > cur.position() {
            cur.with_limit(end, |cur| {
                let mut limiter = LoopLimiter::new("method-arguments");
                while !cur.is_done() && !limiter.is_broken() {
                    let argument = parse_type(cur)?;
                    cur.advance_if(';');
                    result.push(argument);
                    limiter.tick(cur)?;
                }
                Ok(!result.is_empty())
            })?;
        }
    }
    cur.advance_if(')');
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_pairs_keep_order() {
        let mut cur = Cursor::new("<A:Ljava/lang/Object;B:Ljava/lang/Number;>(");
        let pairs = type_parameter_pairs(&mut cur).expect("parses");
        let names: Vec<&String> = pairs.keys().collect();
        assert_eq!(vec!["A", "B"], names);
    }

    #[test]
    fn missing_name_is_an_error() {
        let mut cur = Cursor::new("<<<<");
        assert!(matches!(
            type_parameter_pairs(&mut cur),
            Err(SignatureError::Parse { .. })
        ));
    }

    #[test]
    fn descriptor_without_declarations() {
        let mut cur = Cursor::new("(I)V");
        let sig = method_signature(&mut cur).expect("parses");
        assert!(sig.type_parameters().is_empty());
        assert_eq!(1, sig.arguments().len());
        assert_eq!("(I)V", sig.to_string());
    }

    #[test]
    fn empty_argument_list() {
        let mut cur = Cursor::new("()Ljava/lang/String;");
        let sig = method_signature(&mut cur).expect("parses");
        assert!(sig.arguments().is_empty());
        assert_eq!("()Ljava/lang/String;", sig.to_string());
    }

    #[test]
    fn empty_class_signature_is_empty() {
        let mut cur = Cursor::new("");
        let sig = class_signature(&mut cur).expect("parses");
        assert!(sig.type_parameters().is_empty());
        assert!(sig.supertypes().is_empty());
        assert_eq!("", sig.to_string());
    }
}
