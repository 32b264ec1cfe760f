#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

//! Loader for precompiled chunks.
//!
//! Rebuilds a compiled function (instructions, constants, nested prototypes,
//! upvalue descriptors and debug metadata) from a byte stream produced by the
//! chunk dumper, without going through the source compiler.
//!
//! ```ignore
//! use bumpalo::Bump;
//! use undump_core::{StringTable, undump};
//!
//! let arena = Bump::new();
//! let strings = StringTable::new(&arena);
//! // `bytes` starts right after the first signature byte.
//! let closure = undump(strings, &mut &bytes[1..], "@main.luac")?;
//! println!("{}", closure.proto.listing());
//! ```

extern crate alloc;

// Re-export for convenience so other modules don't need alloc:: prefix
#[allow(unused_imports)]
pub(crate) use alloc::{boxed::Box, format, string::String, string::ToString, vec, vec::Vec};

pub mod error;
pub mod listing;
pub mod options;
pub mod proto;
pub mod source;
pub mod strings;
pub mod undump;
pub mod value;

pub use error::{Consistency, ErrorKind, PlatformType, UndumpError};
pub use options::{LoadOptions, NoVerify, Verifier, VerifyError};
pub use proto::{Closure, Instruction, LocVar, Proto, UpvalDesc};
pub use source::{ByteSource, Truncated};
pub use strings::{LuaStr, StringTable};
pub use undump::{chunk_name, undump, undump_with};
pub use value::Value;

#[cfg(feature = "std")]
pub use source::IoSource;

/// Test utilities for enabling logging and building chunks in tests
#[cfg(test)]
pub mod test_utils;
