//! Public error type for the undump API.
//!
//! Wraps core load errors and I/O failures, and attaches `miette` codes and
//! help text so hosts can render them consistently.

use std::fmt::Display;

use miette::Diagnostic;
use thiserror::Error;
use undump_core::{ErrorKind, UndumpError};

#[derive(Debug, Error)]
pub enum Error {
    /// The chunk was read but could not be loaded.
    #[error(transparent)]
    Load(#[from] UndumpError),

    /// The chunk could not be read at all.
    #[error("{chunk}: cannot read precompiled chunk")]
    Io {
        chunk: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// The load failure, if this is one.
    pub fn kind(&self) -> Option<&ErrorKind> {
        match self {
            Error::Load(err) => Some(&err.kind),
            Error::Io { .. } => None,
        }
    }

    fn code_str(&self) -> &'static str {
        let Error::Load(err) = self else {
            return "undump::io";
        };
        match err.kind {
            ErrorKind::TruncatedInput => "undump::truncated",
            ErrorKind::SignatureMismatch => "undump::signature",
            ErrorKind::VersionMismatch { .. } => "undump::version",
            ErrorKind::FormatMismatch { .. } => "undump::format",
            ErrorKind::IntegrityMismatch => "undump::corrupted",
            ErrorKind::SizeMismatch { .. } => "undump::size_mismatch",
            ErrorKind::EndiannessMismatch { .. } => "undump::endianness",
            ErrorKind::FloatFormatMismatch => "undump::float_format",
            ErrorKind::OutOfMemory => "undump::memory",
            ErrorKind::Consistency(_) => "undump::malformed",
            ErrorKind::Verification { .. } => "undump::verification",
        }
    }

    fn help_str(&self) -> Option<&'static str> {
        match self.kind()? {
            ErrorKind::TruncatedInput => Some("the chunk ends early; check that the whole file was copied"),
            ErrorKind::SignatureMismatch => Some("this does not look like a precompiled chunk"),
            ErrorKind::VersionMismatch { .. } | ErrorKind::FormatMismatch { .. } => {
                Some("the chunk was produced by an incompatible compiler; recompile it from source")
            }
            ErrorKind::IntegrityMismatch => {
                Some("the file was probably transferred in text mode or had its line endings converted")
            }
            ErrorKind::SizeMismatch { .. }
            | ErrorKind::EndiannessMismatch { .. }
            | ErrorKind::FloatFormatMismatch => {
                Some("the chunk was compiled for a different platform; recompile it on this one")
            }
            ErrorKind::OutOfMemory => {
                Some("the chunk declares more data than can be allocated; it is probably corrupted")
            }
            ErrorKind::Consistency(_) | ErrorKind::Verification { .. } => None,
        }
    }
}

impl Diagnostic for Error {
    fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        Some(Box::new(self.code_str()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        self.help_str()
            .map(|help| Box::new(help) as Box<dyn Display + 'a>)
    }
}
