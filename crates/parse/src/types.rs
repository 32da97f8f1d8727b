//! The recursive-descent core of the type grammar.

use sigscope_model::{CaptureKind, Primitive, TypeName};

use crate::cursor::{Cursor, DelimiterPair};
use crate::error::{Result, SignatureError};
use crate::limiter::LoopLimiter;

fn is_ident_start(c: char) -> bool {
    unicode_ident::is_xid_start(c) || c == '$' || c == '_'
}

fn is_ident_part(c: char) -> bool {
    unicode_ident::is_xid_continue(c) || c == '$'
}

/// Read a slash-delimited class name (or a bare identifier), consuming
/// one trailing semicolon if present. `None`, with the position restored,
/// when no identifier characters are found.
pub(crate) fn class_name(cur: &mut Cursor<'_>) -> Option<String> {
    let saved = cur.checkpoint();
    let mut name = String::new();
    let mut at_start = true;
    loop {
        match cur.current() {
            Some('/') => {
                name.push('/');
                at_start = true;
                cur.bump();
            }
            Some(c) if (at_start && is_ident_start(c)) || (!at_start && is_ident_part(c)) => {
                name.push(c);
                at_start = false;
                cur.bump();
            }
            _ => {
                cur.advance_if(';');
                break;
            }
        }
    }
    if name.is_empty() {
        cur.restore(saved);
        None
    } else {
        Some(name)
    }
}

/// Parse one type from the field/argument/return-type grammar.
///
/// Dispatches on the current character: primitives, object types with
/// optional generic arguments and inner-class segments, arrays, type
/// parameter references, wildcards, captures, interface markers, and
/// colon-joined intersections (with or without a leading type).
pub(crate) fn parse_type(cur: &mut Cursor<'_>) -> Result<TypeName> {
    match cur.current() {
        Some(':') => {
            cur.bump();
            return Ok(TypeName::interface_bound(parse_type(cur)?));
        }
        Some('T') => {
            cur.bump();
            let name = class_name(cur)
                .ok_or_else(|| SignatureError::parse("missing type parameter name", cur))?;
            return Ok(TypeName::type_parameter(name));
        }
        Some('*') => {
            cur.bump();
            return Ok(TypeName::wildcard());
        }
        Some('-') => {
            cur.bump();
            return Ok(TypeName::capture(CaptureKind::Super, Some(parse_type(cur)?)));
        }
        Some('+') => {
            cur.bump();
            return Ok(TypeName::capture(
                CaptureKind::Extends,
                Some(parse_type(cur)?),
            ));
        }
        Some('[') => {
            cur.bump();
            return Ok(TypeName::array(parse_type(cur)?));
        }
        _ => {}
    }

    let mut result = if cur.current() == Some('L') {
        cur.bump();
        let name = class_name(cur)
            .ok_or_else(|| SignatureError::parse("missing class name after 'L'", cur))?;
        Some(TypeName::object(name))
    } else if let Some(p) = cur.current().and_then(Primitive::from_code) {
        cur.bump();
        Some(TypeName::primitive(p))
    } else {
        None
    };
    cur.advance_if(';');

    if result.is_none() && cur.current() == Some(':') {
        // a bounds list with no leading type
        let mut members = Vec::new();
        let mut limiter = LoopLimiter::new("intersection");
        while cur.current() == Some(':') {
            cur.bump();
            members.push(parse_type(cur)?);
            cur.advance_if(';');
            limiter.tick(cur)?;
        }
        if !members.is_empty() {
            result = Some(TypeName::intersection(members));
        }
    } else if result.is_some() && cur.current() == Some(':') {
        // further interface-marked bounds joined onto a leading type
        let mut members = vec![result.take().expect("leading type present")];
        let mut limiter = LoopLimiter::new("intersection");
        while cur.current() == Some(':') {
            cur.bump();
            members.push(TypeName::interface_bound(parse_type(cur)?));
            cur.advance_if(';');
            limiter.tick(cur)?;
        }
        result = Some(TypeName::intersection(members));
    }

    // Generic arguments discovered after an apparently complete type, as
    // when a class name was read up to its '<'.
    if cur.current() == Some('<') {
        if let Some(base) = result.take() {
            cur.bump();
            let arguments = parse_generic_arguments(cur)?;
            result = Some(if arguments.is_empty() {
                base
            } else {
                TypeName::parameterized(base, arguments)
            });
        }
    }

    if result.is_some() && (cur.current() == Some('.') || cur.prev() == Some('.')) {
        if cur.prev() == Some('.') {
            cur.backup();
        }
        result = Some(append_inner_generics(
            cur,
            result.take().expect("checked above"),
        )?);
    }

    result.ok_or_else(|| SignatureError::parse("did not find a type name", cur))
}

/// Parse one element of a use-site generic argument list. `Ok(None)` when
/// the current character opens no production, which ends the list.
pub(crate) fn parse_generic_item(cur: &mut Cursor<'_>) -> Result<Option<TypeName>> {
    let Some(c) = cur.current() else {
        return Ok(None);
    };
    if let Some(p) = Primitive::from_code(c) {
        cur.bump();
        return Ok(Some(TypeName::primitive(p)));
    }
    let mut result = match c {
        '[' => {
            cur.bump();
            let component = parse_generic_item(cur)?
                .ok_or_else(|| SignatureError::parse("missing array component type", cur))?;
            return Ok(Some(TypeName::array(component)));
        }
        '*' => {
            cur.bump();
            return Ok(Some(TypeName::wildcard()));
        }
        '-' => {
            cur.bump();
            let bound = parse_generic_item(cur)?
                .ok_or_else(|| SignatureError::parse("missing capture bound", cur))?;
            Some(TypeName::capture(CaptureKind::Super, Some(bound)))
        }
        '+' => {
            cur.bump();
            let bound = parse_generic_item(cur)?
                .ok_or_else(|| SignatureError::parse("missing capture bound", cur))?;
            Some(TypeName::capture(CaptureKind::Extends, Some(bound)))
        }
        'T' => {
            cur.bump();
            let name = class_name(cur)
                .ok_or_else(|| SignatureError::parse("missing type parameter name", cur))?;
            cur.advance_if(';');
            return Ok(Some(TypeName::type_parameter(name)));
        }
        'L' => {
            cur.bump();
            let name = class_name(cur)
                .ok_or_else(|| SignatureError::parse("missing class name after 'L'", cur))?;
            let mut item = TypeName::object(name);
            match cur.current() {
                Some(';') => {
                    cur.bump();
                }
                Some('<') => {
                    let arguments = parse_generic_arguments(cur)?;
                    if !arguments.is_empty() {
                        item = TypeName::parameterized(item, arguments);
                    }
                }
                _ => {}
            }
            Some(item)
        }
        _ => None,
    };
    if result.is_some() && (cur.current() == Some('.') || cur.prev() == Some('.')) {
        if cur.prev() == Some('.') {
            cur.backup();
        }
        result = Some(append_inner_generics(
            cur,
            result.take().expect("checked above"),
        )?);
    }
    Ok(result)
}

/// Parse the contents of a `<...>` generic argument list at a use site.
/// The result is empty (not an error) when no balanced close delimiter is
/// in reach, and the cursor is left where it started in that case.
pub(crate) fn parse_generic_arguments(cur: &mut Cursor<'_>) -> Result<Vec<TypeName>> {
    cur.advance_if('<');
    let mut names: Vec<TypeName> = Vec::new();
    cur.provisionally(|cur| {
        let Some(close) = cur.delimiter_scan(DelimiterPair::ANGLES, &['(']) else {
            return Ok(false);
        };
        cur.with_limit(close + 1, |cur| {
            let mut limiter = LoopLimiter::new("generic-arguments");
            while !cur.is_done() && !limiter.is_broken() {
                if cur.current() == Some('*') {
                    names.push(TypeName::wildcard());
                    cur.bump();
                } else {
                    match parse_generic_item(cur)? {
                        Some(item) => {
                            names.push(item);
                            cur.advance_if('>');
                        }
                        None => limiter.break_loop(),
                    }
                }
                limiter.tick(cur)?;
            }
            Ok(!names.is_empty())
        })
    })?;
    Ok(names)
}

/// Continue a type across `.Segment` links once a dot has been seen (or
/// just overshot). When a closing paren lies ahead, the walk is scoped to
/// stop before it.
pub(crate) fn append_inner_generics(cur: &mut Cursor<'_>, start: TypeName) -> Result<TypeName> {
    if let Some(ix) = cur.position_of(')').filter(|&ix| ix > 0) {
        let mut out = start.clone();
        cur.with_limit(ix, |cur| {
            out = walk_inner_segments(cur, start.clone())?;
            Ok(out != start)
        })?;
        Ok(out)
    } else {
        walk_inner_segments(cur, start)
    }
}

fn walk_inner_segments(cur: &mut Cursor<'_>, start: TypeName) -> Result<TypeName> {
    let mut result = start;
    let mut limiter = LoopLimiter::new("inner-class");
    while !cur.is_done() && !limiter.is_broken() {
        cur.advance_if('.');
        let mut segment = cur
            .scan_to('.', &['<', '>', '(', ')', ';'])
            .map(str::to_string);
        if segment.is_none() {
            segment = cur.scan_to('<', &['>', '(', ')', ';']).map(str::to_string);
            if cur.prev() == Some('<') {
                cur.backup();
            }
        }
        if segment.is_none() && !cur.is_done() {
            let applied = apply_generics(cur, result.clone())?;
            if applied != result {
                result = applied;
                if cur.prev() == Some('.') {
                    cur.backup();
                }
                limiter.tick(cur)?;
                continue;
            }
            // Nothing further parses: keep the rest verbatim as the tail
            // segment. This is what lets signatures some reference
            // readers reject round-trip here.
            segment = cur.consume_remainder().map(str::to_string);
        }
        let Some(segment) = segment else {
            limiter.break_loop();
            limiter.tick(cur)?;
            continue;
        };
        result = TypeName::inner_class(result, segment);
        result = apply_generics(cur, result)?;
        limiter.tick(cur)?;
    }
    Ok(result)
}

/// Apply a `<...>` argument list to `base` if one starts here.
pub(crate) fn apply_generics(cur: &mut Cursor<'_>, base: TypeName) -> Result<TypeName> {
    if cur.advance_if('<') {
        let arguments = parse_generic_arguments(cur)?;
        if !arguments.is_empty() {
            return Ok(TypeName::parameterized(base, arguments));
        }
    }
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> TypeName {
        let mut cur = Cursor::new(text);
        parse_type(&mut cur).expect("parses")
    }

    #[test]
    fn class_names_stop_at_structure() {
        let mut cur = Cursor::new("java/util/Map<TK;>");
        assert_eq!(Some("java/util/Map".to_string()), class_name(&mut cur));
        assert_eq!(Some('<'), cur.current());
    }

    #[test]
    fn class_name_eats_one_trailing_semicolon() {
        let mut cur = Cursor::new("java/lang/String;X");
        assert_eq!(Some("java/lang/String".to_string()), class_name(&mut cur));
        assert_eq!(Some('X'), cur.current());
    }

    #[test]
    fn empty_class_name_restores_position() {
        let mut cur = Cursor::new(";;");
        assert_eq!(None, class_name(&mut cur));
        assert_eq!(0, cur.position());
    }

    #[test]
    fn primitive_dispatch() {
        assert_eq!("I", parse("I").internal_name());
        assert_eq!("void", parse("V").source_name());
    }

    #[test]
    fn simple_object() {
        let t = parse("Ljava/lang/String;");
        assert_eq!("Ljava/lang/String;", t.internal_name());
        assert_eq!("java.lang.String", t.source_name());
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let mut cur = Cursor::new("Q");
        assert!(matches!(
            parse_type(&mut cur),
            Err(SignatureError::Parse { .. })
        ));
        let mut empty = Cursor::new("");
        assert!(parse_type(&mut empty).is_err());
    }

    #[test]
    fn generic_item_returns_none_at_close() {
        let mut cur = Cursor::new(">rest");
        assert!(parse_generic_item(&mut cur).expect("no error").is_none());
        assert_eq!(Some('>'), cur.current());
    }
}
