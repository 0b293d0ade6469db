use std::io;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur when encoding or decoding binary NBT.
#[derive(Debug, Error)]
pub enum Error {
    /// The input ended mid-value. Distinct from [`Error::Malformed`] so a
    /// caller streaming bytes can tell "wait for more" apart from "give up".
    #[error("unexpected end of NBT input")]
    Incomplete,

    /// The bytes cannot be valid NBT.
    #[error("{0}")]
    Malformed(Box<str>),

    /// Nesting exceeded the depth bound. Separate from malformed so
    /// adversarial inputs can be reported for what they are.
    #[error("reached maximum nesting depth")]
    TooDeep,

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn malformed(msg: impl Into<Box<str>>) -> Self {
        Self::Malformed(msg.into())
    }
}
