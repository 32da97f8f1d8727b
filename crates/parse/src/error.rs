use thiserror::Error;

use crate::cursor::Cursor;

/// Failures raised by the signature grammar.
///
/// `Parse` is an ordinary grammar violation; the input class file should
/// be treated as unparseable. `MalformedInput` means a parser loop hit
/// its iteration ceiling, which never happens on input a JVM actually
/// produced, so it signals corrupt data rather than a grammar corner.
/// Neither is retried.
#[derive(Error, Debug)]
pub enum SignatureError {
    #[error("malformed signature at offset {position}: {message}\n{context}")]
    Parse {
        message: String,
        position: usize,
        context: String,
    },
    #[error("{parser} parser exceeded its iteration ceiling on pathological input\n{context}")]
    MalformedInput {
        parser: &'static str,
        context: String,
    },
}

impl SignatureError {
    pub(crate) fn parse(message: impl Into<String>, cur: &Cursor<'_>) -> SignatureError {
        SignatureError::Parse {
            message: message.into(),
            position: cur.position(),
            context: cur.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SignatureError>;
