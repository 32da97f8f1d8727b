//! Guard against non-terminating parser loops.
//!
//! The grammar parsers can fail to make progress on garbage input. Valid
//! signatures produced by a JVM are always finite and never come near the
//! ceiling, so hitting it is treated as fatal rather than recoverable.

use crate::cursor::Cursor;
use crate::error::{Result, SignatureError};

const MAX_LOOPS: usize = 150;

pub(crate) struct LoopLimiter {
    parser: &'static str,
    loops: usize,
    broken: bool,
}

impl LoopLimiter {
    pub(crate) fn new(parser: &'static str) -> LoopLimiter {
        LoopLimiter {
            parser,
            loops: 0,
            broken: false,
        }
    }

    /// Request an exit at the top of the next iteration.
    pub(crate) fn break_loop(&mut self) {
        self.broken = true;
    }

    pub(crate) fn is_broken(&self) -> bool {
        self.broken
    }

    /// Count one iteration, aborting the parse once the ceiling is hit.
    pub(crate) fn tick(&mut self, cur: &Cursor<'_>) -> Result<()> {
        self.loops += 1;
        if self.loops >= MAX_LOOPS {
            tracing::debug!(
                parser = self.parser,
                position = cur.position(),
                "iteration ceiling exceeded"
            );
            return Err(SignatureError::MalformedInput {
                parser: self.parser,
                context: cur.to_string(),
            });
        }
        Ok(())
    }
}
