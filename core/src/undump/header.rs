//! Chunk header constants and validation.
//!
//! The header records how the producer laid out its values. The loader does
//! no conversion, so every field has to match exactly.

use core::mem::size_of;

use super::state::{LoadResult, LoadState};
use crate::{
    error::{ErrorKind, PlatformType},
    proto::Instruction,
    source::ByteSource,
};

/// Marks a binary chunk. Callers check the first byte themselves to tell
/// binary from text input.
pub const SIGNATURE: &[u8; 4] = b"\x1bLua";
pub const VERSION: u8 = 0x53;
pub const FORMAT: u8 = 0;
/// Catches newline and text-mode conversions of the file.
pub const DATA: &[u8; 6] = b"\x19\x93\r\n\x1a\n";
/// Written with the producer's integer layout to detect byte order.
pub const CHECK_INTEGER: i64 = 0x5678;
/// Written with the producer's float layout to detect representation.
pub const CHECK_NUMBER: f64 = 370.5;

const PLATFORM_SIZES: [(PlatformType, usize); 5] = [
    (PlatformType::Int, size_of::<i32>()),
    (PlatformType::Size, size_of::<usize>()),
    (PlatformType::Instruction, size_of::<Instruction>()),
    (PlatformType::Integer, size_of::<i64>()),
    (PlatformType::Number, size_of::<f64>()),
];

impl<'s, 'a, S: ByteSource + ?Sized> LoadState<'s, 'a, S> {
    /// Validate the header, starting after the first signature byte.
    pub(crate) fn check_header(&mut self) -> LoadResult<()> {
        self.check_literal(&SIGNATURE[1..], ErrorKind::SignatureMismatch)?;
        let version = self.read_byte()?;
        if version != VERSION {
            return Err(ErrorKind::VersionMismatch { found: version });
        }
        let format = self.read_byte()?;
        if format != FORMAT {
            return Err(ErrorKind::FormatMismatch { found: format });
        }
        self.check_literal(DATA, ErrorKind::IntegrityMismatch)?;
        for (ty, size) in PLATFORM_SIZES {
            let found = self.read_byte()?;
            if usize::from(found) != size {
                return Err(ErrorKind::SizeMismatch { ty, found });
            }
        }
        let int = self.read_integer()?;
        if int != CHECK_INTEGER {
            return Err(ErrorKind::EndiannessMismatch { found: int });
        }
        if self.read_number()? != CHECK_NUMBER {
            return Err(ErrorKind::FloatFormatMismatch);
        }
        Ok(())
    }

    fn check_literal(&mut self, expected: &[u8], err: ErrorKind) -> LoadResult<()> {
        // Large enough for either literal.
        let mut buf = [0u8; SIGNATURE.len() + DATA.len()];
        let buf = &mut buf[..expected.len()];
        self.read_block(buf)?;
        if *buf != *expected {
            return Err(err);
        }
        Ok(())
    }
}
