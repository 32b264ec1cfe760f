//! Undump - loader for precompiled chunks
//!
//! # Overview
//!
//! A host that ships pre-built scripts can skip the source compiler entirely:
//! a precompiled chunk already holds the compiled main function, its nested
//! functions, constants, upvalue descriptors and (optionally) debug info.
//! This crate validates such a chunk against the current platform and rebuilds
//! the whole prototype tree in one pass.
//!
//! # Quick Start
//!
//! ```ignore
//! use undump::{Bump, StringTable};
//!
//! // Strings (interned and long) live in the runtime's arena
//! let arena = Bump::new();
//! let strings = StringTable::new(&arena);
//!
//! let bytes = std::fs::read("init.luac")?;
//! let closure = undump::load(strings, &bytes, "@init.luac")?;
//!
//! assert_eq!(closure.upvalues.len(), closure.proto.upvalues.len());
//! println!("{}", closure.proto.listing());
//! ```
//!
//! # Failure model
//!
//! Any problem aborts the whole load and nothing partially loaded is handed
//! back. Errors name the chunk (`init.luac: truncated precompiled chunk`) and
//! carry `miette` diagnostics, see [`render_error`].

mod error;
mod error_renderer;

use std::io::Read;
use std::path::Path;

pub use bumpalo::Bump;
pub use error::Error;
pub use error_renderer::{render_error, render_error_to_string, render_error_to_string_no_color};

// Re-export public API from undump_core
pub use undump_core::{
    ByteSource, Closure, Consistency, ErrorKind, Instruction, IoSource, LoadOptions, LocVar,
    LuaStr, NoVerify, PlatformType, Proto, StringTable, UndumpError, UpvalDesc, Value, Verifier,
    VerifyError, chunk_name, undump, undump_with,
};
pub use undump_core::undump::header;

/// Load a chunk held in memory.
///
/// Unlike [`undump`], `bytes` starts at the very beginning of the chunk,
/// signature included.
pub fn load<'a>(
    strings: &'a StringTable<'a>,
    bytes: &[u8],
    name: &str,
) -> Result<Closure<'a>, Error> {
    load_with(strings, bytes, name, &LoadOptions::default(), &NoVerify)
}

/// Like [`load`], with explicit options and a verification hook.
pub fn load_with<'a, V: Verifier + ?Sized>(
    strings: &'a StringTable<'a>,
    bytes: &[u8],
    name: &str,
    options: &LoadOptions,
    verifier: &V,
) -> Result<Closure<'a>, Error> {
    let Some((&first, mut rest)) = bytes.split_first() else {
        return Err(UndumpError::new(chunk_name(name), ErrorKind::TruncatedInput).into());
    };
    check_binary(first, name)?;
    Ok(undump_with(strings, &mut rest, name, options, verifier)?)
}

/// Load a chunk from any reader, signature included.
pub fn load_reader<'a, R: Read>(
    strings: &'a StringTable<'a>,
    reader: R,
    name: &str,
) -> Result<Closure<'a>, Error> {
    let mut source = IoSource::new(reader);
    let mut first = [0u8; 1];
    if source.read_exact(&mut first).is_err() {
        return Err(UndumpError::new(chunk_name(name), ErrorKind::TruncatedInput).into());
    }
    check_binary(first[0], name)?;
    Ok(undump(strings, &mut source, name)?)
}

/// Load a chunk file, naming it `@<path>` in errors.
pub fn load_file<'a>(
    strings: &'a StringTable<'a>,
    path: impl AsRef<Path>,
) -> Result<Closure<'a>, Error> {
    let path = path.as_ref();
    let name = format!("@{}", path.display());
    tracing::debug!(path = %path.display(), "reading chunk file");
    let bytes = std::fs::read(path).map_err(|source| Error::Io {
        chunk: chunk_name(&name).to_string(),
        source,
    })?;
    load(strings, &bytes, &name)
}

fn check_binary(first: u8, name: &str) -> Result<(), Error> {
    if first != header::SIGNATURE[0] {
        return Err(UndumpError::new(chunk_name(name), ErrorKind::SignatureMismatch).into());
    }
    Ok(())
}
