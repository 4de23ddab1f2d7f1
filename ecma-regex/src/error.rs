//! Compiler and executor error kinds.

use thiserror::Error;

/// Everything that can go wrong compiling or running a pattern.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid collating element at offset {offset}")]
    Collate { offset: usize },

    #[error("invalid character class name at offset {offset}")]
    Ctype { offset: usize },

    #[error("trailing or malformed escape at offset {offset}")]
    Escape { offset: usize },

    #[error("backreference to non-existent group at offset {offset}")]
    Backref { offset: usize },

    #[error("unmatched or malformed `[...]` at offset {offset}")]
    Brack { offset: usize },

    #[error("unmatched `(` or `)` at offset {offset}")]
    Paren { offset: usize },

    #[error("unmatched `{{` or `}}` at offset {offset}")]
    Brace { offset: usize },

    #[error("invalid repeat count in `{{...}}` at offset {offset}")]
    BadBrace { offset: usize },

    #[error("invalid character range (start > end) at offset {offset}")]
    Range { offset: usize },

    #[error("out of memory while compiling pattern")]
    Space,

    #[error("quantifier applied to nothing to repeat at offset {offset}")]
    BadRepeat { offset: usize },

    #[error("pattern exceeds complexity limits ({detail})")]
    Complexity { detail: &'static str },

    #[error("backtracking stack exhausted")]
    Stack,

    #[error("input is not valid UTF-8 at byte offset {offset}")]
    Utf8 { offset: usize },

    #[error("unknown or unsupported Unicode property `{name}` at offset {offset}")]
    Property { name: String, offset: usize },

    #[error("`\\` at offset {offset} does not begin a recognised escape")]
    NoEscape { offset: usize },

    #[error("invalid class-set operator at offset {offset}")]
    Operator { offset: usize },

    #[error("class-set complement of a class containing strings at offset {offset}")]
    Complement { offset: usize },

    #[error("invalid inline flag modifier at offset {offset}")]
    Modifier { offset: usize },

    #[error("variable-length lookbehind is not supported in this build (offset {offset})")]
    Lookbehind { offset: usize },

    #[error("internal compiler invariant violated: {detail}")]
    Internal { detail: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
