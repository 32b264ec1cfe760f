//! Loading precompiled chunks.
//!
//! The pipeline is a single forward pass: header, root upvalue count, then the
//! root prototype, which recurses depth-first into its children in stream
//! order.

mod function;
pub mod header;
mod state;

use crate::{
    String,
    error::{Consistency, ErrorKind, UndumpError},
    options::{LoadOptions, NoVerify, Verifier},
    proto::Closure,
    source::ByteSource,
    strings::StringTable,
};

use state::LoadState;

/// Resolve the name used in error messages from the caller's name hint.
///
/// `@file` and `=name` drop their marker; a name starting with the binary
/// signature byte is reported as `binary string`.
pub fn chunk_name(name: &str) -> &str {
    match name.as_bytes().first().copied() {
        Some(b'@' | b'=') => &name[1..],
        Some(b) if b == header::SIGNATURE[0] => "binary string",
        _ => name,
    }
}

/// Load a chunk with default options and no verification.
///
/// `source` must be positioned right after the first signature byte, which
/// the caller has already checked.
pub fn undump<'a, S: ByteSource + ?Sized>(
    strings: &'a StringTable<'a>,
    source: &mut S,
    name: &str,
) -> Result<Closure<'a>, UndumpError> {
    undump_with(strings, source, name, &LoadOptions::default(), &NoVerify)
}

/// Load a chunk, then run `verifier` over the loaded prototype tree.
pub fn undump_with<'a, S, V>(
    strings: &'a StringTable<'a>,
    source: &mut S,
    name: &str,
    options: &LoadOptions,
    verifier: &V,
) -> Result<Closure<'a>, UndumpError>
where
    S: ByteSource + ?Sized,
    V: Verifier + ?Sized,
{
    let chunk = chunk_name(name);
    tracing::debug!(chunk, "loading precompiled chunk");
    let mut state = LoadState::new(source, strings, options);
    load_main(&mut state, verifier).map_err(|kind| {
        tracing::debug!(chunk, error = %kind, "failed to load chunk");
        UndumpError::new(String::from(chunk), kind)
    })
}

fn load_main<'a, S, V>(
    state: &mut LoadState<'_, 'a, S>,
    verifier: &V,
) -> Result<Closure<'a>, ErrorKind>
where
    S: ByteSource + ?Sized,
    V: Verifier + ?Sized,
{
    state.check_header()?;
    tracing::debug!("header accepted");
    let mut closure = Closure::new(usize::from(state.read_byte()?));
    state.load_function(&mut closure.proto, None)?;
    if closure.upvalues.len() != closure.proto.upvalues.len() {
        return Err(Consistency::UpvalueCountMismatch {
            declared: closure.upvalues.len(),
            actual: closure.proto.upvalues.len(),
        }
        .into());
    }
    verifier
        .verify(&closure.proto)
        .map_err(|err| ErrorKind::Verification { reason: err.reason })?;
    Ok(closure)
}
