//! A backtracking character cursor over a signature string.

use std::fmt;

use crate::error::Result;

/// Open/close delimiter pairs the scans understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimiterPair {
    pub open: char,
    pub close: char,
}

impl DelimiterPair {
    pub const ANGLES: DelimiterPair = DelimiterPair {
        open: '<',
        close: '>',
    };
    pub const PARENS: DelimiterPair = DelimiterPair {
        open: '(',
        close: ')',
    };

    pub fn is_open(self, c: char) -> bool {
        c == self.open
    }

    pub fn is_close(self, c: char) -> bool {
        c == self.close
    }
}

/// A saved cursor state; see [`Cursor::checkpoint`].
#[derive(Debug, Clone, Copy)]
pub struct Checkpoint {
    position: usize,
    limit: Option<usize>,
}

/// Tracks a byte position and an optional upper bound over an input
/// string. Every structural character of the grammar is ASCII, so limit
/// arithmetic stays on char boundaries; reading past the limit yields
/// `None` rather than panicking, and the grammar parsers treat that as
/// end of input.
///
/// Mutable and single-owner; a fresh cursor is created for each string
/// parsed.
#[derive(Debug)]
pub struct Cursor<'a> {
    text: &'a str,
    position: usize,
    limit: Option<usize>,
}

impl<'a> Cursor<'a> {
    pub fn new(text: &'a str) -> Cursor<'a> {
        Cursor {
            text,
            position: 0,
            limit: None,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// The active upper bound, in bytes: the pushed limit if one is set,
    /// the end of the input otherwise.
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(self.text.len())
    }

    fn bound(&self) -> usize {
        self.limit().min(self.text.len())
    }

    /// The unread portion of the scoped input.
    pub fn remaining(&self) -> &'a str {
        if self.position >= self.bound() {
            ""
        } else {
            &self.text[self.position..self.bound()]
        }
    }

    pub fn is_done(&self) -> bool {
        self.position >= self.bound()
    }

    /// One character short of [`Cursor::is_done`].
    pub fn is_at_end(&self) -> bool {
        self.position + 1 >= self.bound()
    }

    pub fn current(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    pub fn lookahead(&self, n: usize) -> Option<char> {
        self.remaining().chars().nth(n)
    }

    /// The character just behind the position, if it is within bounds.
    pub fn prev(&self) -> Option<char> {
        if self.position == 0 || self.position > self.bound() {
            return None;
        }
        self.text[..self.position].chars().next_back()
    }

    /// Advance by up to `n` characters, stopping at the limit.
    pub fn advance(&mut self, n: usize) {
        for _ in 0..n {
            match self.current() {
                Some(c) => self.position += c.len_utf8(),
                None => break,
            }
        }
    }

    pub fn bump(&mut self) {
        self.advance(1);
    }

    /// Step back one character.
    pub fn backup(&mut self) {
        if self.position == 0 {
            return;
        }
        self.position = (self.position - 1).min(self.text.len());
        while self.position > 0 && !self.text.is_char_boundary(self.position) {
            self.position -= 1;
        }
    }

    /// Advance past `expected` if it is the current character.
    pub fn advance_if(&mut self, expected: char) -> bool {
        if self.current() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume up to the given byte offset (clamped to the limit) and
    /// return the consumed slice.
    pub fn consume_to(&mut self, end: usize) -> &'a str {
        let start = self.position;
        let real_end = end.min(self.bound());
        if real_end <= start {
            return "";
        }
        self.position = real_end;
        &self.text[start..real_end]
    }

    /// Everything from the position to the limit; the position lands at
    /// the end of the full input.
    pub fn consume_remainder(&mut self) -> Option<&'a str> {
        if self.is_done() {
            return None;
        }
        let result = &self.text[self.position..self.bound()];
        self.position = self.text.len();
        Some(result)
    }

    /// First occurrence of `target` within the scoped range, as an
    /// absolute byte offset.
    pub fn position_of(&self, target: char) -> Option<usize> {
        let base = self.position;
        self.remaining()
            .char_indices()
            .find(|&(_, c)| c == target)
            .map(|(i, _)| base + i)
    }

    /// Scan forward for `target`, returning the slice before it and
    /// advancing past it. Fails without moving if a stop character or the
    /// limit is reached first.
    pub fn scan_to(&mut self, target: char, stop: &[char]) -> Option<&'a str> {
        if self.is_done() {
            return None;
        }
        let start = self.position;
        for (i, c) in self.remaining().char_indices() {
            if stop.contains(&c) {
                return None;
            }
            if c == target {
                let at = start + i;
                self.position = at + c.len_utf8();
                return Some(&self.text[start..at]);
            }
        }
        None
    }

    /// Find the close delimiter matching the scope the cursor currently
    /// sits in, honoring nesting of the pair. Fails on a stop character or
    /// if the scoped range runs out at a nonzero depth.
    pub fn delimiter_scan(&self, pair: DelimiterPair, stop: &[char]) -> Option<usize> {
        if self.is_done() {
            return None;
        }
        let base = self.position;
        let mut depth = 0usize;
        for (i, c) in self.remaining().char_indices() {
            if stop.contains(&c) {
                return None;
            }
            if pair.is_open(c) {
                depth += 1;
            } else if pair.is_close(c) {
                if depth > 0 {
                    depth -= 1;
                } else {
                    return Some(base + i);
                }
            }
        }
        None
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            position: self.position,
            limit: self.limit,
        }
    }

    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.position = checkpoint.position;
        self.limit = checkpoint.limit;
    }

    /// Run `body` and roll the position back if it reports failure.
    /// Errors are fatal and propagate without restoring.
    pub fn provisionally<F>(&mut self, body: F) -> Result<bool>
    where
        F: FnOnce(&mut Cursor<'a>) -> Result<bool>,
    {
        let saved = self.checkpoint();
        let ok = body(self)?;
        if !ok {
            self.restore(saved);
        }
        Ok(ok)
    }

    /// If `expected` is current, consume it and run `body`, rolling back
    /// the consumption on failure.
    pub fn try_consume<F>(&mut self, expected: char, body: F) -> Result<bool>
    where
        F: FnOnce(&mut Cursor<'a>) -> Result<bool>,
    {
        if self.current() != Some(expected) {
            return Ok(false);
        }
        let saved = self.checkpoint();
        self.bump();
        let ok = body(self)?;
        if !ok {
            self.restore(saved);
        }
        Ok(ok)
    }

    /// Scope the cursor to `[position, new_limit)` for the duration of
    /// `body`. On success the position lands one past `new_limit`; the
    /// callers that scan to a closing delimiter rely on that overshoot to
    /// consume the delimiter's trailing character. On failure both
    /// position and limit are restored.
    pub fn with_limit<F>(&mut self, new_limit: usize, body: F) -> Result<bool>
    where
        F: FnOnce(&mut Cursor<'a>) -> Result<bool>,
    {
        let saved = self.checkpoint();
        self.limit = Some(new_limit);
        let ok = body(self)?;
        if ok {
            self.position = new_limit + 1;
            self.limit = saved.limit;
        } else {
            self.restore(saved);
        }
        Ok(ok)
    }
}

impl fmt::Display for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.text)?;
        let caret_col = self.text[..self.position.min(self.text.len())]
            .chars()
            .count();
        let mut markers: Vec<char> = vec![' '; self.text.chars().count() + 1];
        if let Some(slot) = markers.get_mut(caret_col) {
            *slot = '^';
        }
        if let Some(limit) = self.limit {
            let limit_col = self.text[..limit.min(self.text.len())].chars().count();
            if let Some(slot) = markers.get_mut(limit_col) {
                *slot = 'x';
            }
        }
        f.write_str(&markers.into_iter().collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_delimiter_scan() {
        let mut cur = Cursor::new("<foo,bar,baz>()");
        cur.bump();
        let ix = cur.delimiter_scan(DelimiterPair::ANGLES, &['(']).expect("found");
        assert_eq!(12, ix);
        assert_eq!('>', "<foo,bar,baz>()".as_bytes()[ix] as char);
    }

    #[test]
    fn delimiter_scan_with_nesting() {
        let text =
            "<K::java/util/Map<Ljava/lang/String;Ljava/lang/Iterable<Ljava/lang/Number;>;>;>;()";
        let mut cur = Cursor::new(text);
        assert_eq!(Some('<'), cur.current());
        cur.bump();
        assert_eq!(Some('K'), cur.current());
        assert_eq!(1, cur.position());

        let end = cur.delimiter_scan(DelimiterPair::ANGLES, &['(']).expect("outer close");
        cur.with_limit(end, |cur| {
            assert_eq!(
                "K::java/util/Map<Ljava/lang/String;Ljava/lang/Iterable<Ljava/lang/Number;>;>;",
                cur.remaining()
            );
            let next_start = cur.position_of('<').expect("nested open");
            cur.consume_to(next_start + 1);
            let next = cur.delimiter_scan(DelimiterPair::ANGLES, &['(']).expect("nested close");
            cur.with_limit(next, |cur| {
                assert_eq!(
                    "Ljava/lang/String;Ljava/lang/Iterable<Ljava/lang/Number;>;",
                    cur.remaining()
                );
                Ok(true)
            })?;
            Ok(true)
        })
        .expect("no parse errors");
    }

    #[test]
    fn scan_to_stops_and_consumes() {
        let mut cur = Cursor::new("En.Sub<TR;>");
        assert_eq!(Some("En"), cur.scan_to('.', &['<', ';']));
        assert_eq!(Some('S'), cur.current());
        // stop character blocks the scan and leaves the position alone
        assert_eq!(None, cur.scan_to('.', &['<', ';']));
        assert_eq!(Some('S'), cur.current());
    }

    #[test]
    fn with_limit_overshoots_on_success() {
        let mut cur = Cursor::new("ab>;rest");
        let close = cur.position_of('>').expect("close");
        cur.with_limit(close, |cur| {
            assert_eq!("ab", cur.remaining());
            cur.advance(2);
            Ok(true)
        })
        .expect("no parse errors");
        // one past the limit, which lands past the '>' itself
        assert_eq!(close + 1, cur.position());
        assert_eq!(Some(';'), cur.current());
    }

    #[test]
    fn with_limit_restores_on_failure() {
        let mut cur = Cursor::new("abc>def");
        cur.with_limit(3, |cur| {
            cur.advance(2);
            Ok(false)
        })
        .expect("no parse errors");
        assert_eq!(0, cur.position());
        assert_eq!(cur.text.len(), cur.limit());
    }

    #[test]
    fn provisional_rollback() {
        let mut cur = Cursor::new("hello");
        let ok = cur
            .provisionally(|cur| {
                cur.advance(3);
                Ok(false)
            })
            .expect("no parse errors");
        assert!(!ok);
        assert_eq!(0, cur.position());
    }

    #[test]
    fn reads_past_the_end_yield_none() {
        let mut cur = Cursor::new("x");
        assert_eq!(Some('x'), cur.current());
        cur.bump();
        assert_eq!(None, cur.current());
        assert_eq!(None, cur.lookahead(3));
        assert!(cur.is_done());
        cur.bump();
        assert_eq!(1, cur.position());
        assert_eq!(None, cur.consume_remainder());
    }

    #[test]
    fn backup_recovers_one_character() {
        let mut cur = Cursor::new("a.b");
        cur.advance(2);
        assert_eq!(Some('.'), cur.prev());
        cur.backup();
        assert_eq!(Some('.'), cur.current());
        cur.restore(Checkpoint {
            position: 0,
            limit: None,
        });
        assert_eq!(Some('a'), cur.current());
    }
}
