//! Load errors.
//!
//! Every failure aborts the whole load. The error carries the resolved chunk
//! name so the caller can tell which chunk failed and why.

use core::fmt;

use thiserror::Error;

use crate::String;

/// A failed load, qualified by the chunk's display name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{chunk}: {kind}")]
pub struct UndumpError {
    /// Display name resolved from the caller's name hint.
    pub chunk: String,
    pub kind: ErrorKind,
}

impl UndumpError {
    pub fn new(chunk: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            chunk: chunk.into(),
            kind,
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

/// Why a load failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// The byte source ran out before a decode step was complete.
    #[error("truncated precompiled chunk")]
    TruncatedInput,

    #[error("not a precompiled chunk")]
    SignatureMismatch,

    #[error("version mismatch in precompiled chunk")]
    VersionMismatch { found: u8 },

    #[error("format mismatch in precompiled chunk")]
    FormatMismatch { found: u8 },

    /// The integrity literal was altered, typically by newline or text-mode
    /// conversion of the file.
    #[error("corrupted precompiled chunk")]
    IntegrityMismatch,

    #[error("{ty} size mismatch in precompiled chunk")]
    SizeMismatch { ty: PlatformType, found: u8 },

    #[error("endianness mismatch in precompiled chunk")]
    EndiannessMismatch { found: i64 },

    #[error("float format mismatch in precompiled chunk")]
    FloatFormatMismatch,

    /// A buffer the chunk asked for could not be allocated.
    #[error("not enough memory to load precompiled chunk")]
    OutOfMemory,

    #[error("malformed precompiled chunk ({0})")]
    Consistency(Consistency),

    /// The verification hook rejected the loaded prototype tree.
    #[error("precompiled chunk failed verification ({reason})")]
    Verification { reason: String },
}

impl From<Consistency> for ErrorKind {
    fn from(fault: Consistency) -> Self {
        ErrorKind::Consistency(fault)
    }
}

/// Internal invariants that a well-formed chunk never violates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Consistency {
    #[error("unknown constant tag {0}")]
    UnknownConstantTag(u8),

    #[error("closure declares {declared} upvalues but its prototype has {actual}")]
    UpvalueCountMismatch { declared: usize, actual: usize },

    #[error("negative count {0}")]
    NegativeCount(i32),

    #[error("absent string in constant pool")]
    AbsentConstantString,

    #[error("short string of length {0} exceeds the short string limit")]
    ShortStringTooLong(usize),

    #[error("{names} upvalue names for {upvalues} upvalues")]
    UpvalueNameOutOfRange { names: usize, upvalues: usize },

    #[error("functions nested deeper than {0} levels")]
    NestingTooDeep(usize),

    #[error("block too big")]
    SizeOverflow,
}

/// Platform types whose sizes are recorded in the chunk header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformType {
    Int,
    Size,
    Instruction,
    Integer,
    Number,
}

impl fmt::Display for PlatformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlatformType::Int => "int",
            PlatformType::Size => "size_t",
            PlatformType::Instruction => "Instruction",
            PlatformType::Integer => "integer",
            PlatformType::Number => "number",
        };
        f.write_str(name)
    }
}
