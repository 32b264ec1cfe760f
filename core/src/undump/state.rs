//! Load context and the primitive decoders.

use crate::{
    Vec,
    error::{Consistency, ErrorKind},
    options::LoadOptions,
    source::ByteSource,
    strings::{LuaStr, MAX_SHORT_LEN, StringTable},
};

pub(crate) type LoadResult<T> = Result<T, ErrorKind>;

/// Length marker announcing a full-width size field.
const EXTENDED_SIZE: u8 = 0xFF;

/// Bytes read per step when the source cannot vouch for a length.
const READ_CHUNK: usize = 4096;

/// Elements reserved up front when the source cannot vouch for a count.
const UNVOUCHED_CAPACITY: usize = 256;

/// How a string's storage is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StrKind {
    /// Decided by length: up to [`MAX_SHORT_LEN`] is interned.
    ByLength,
    Short,
    Long,
}

/// Everything a decode step needs, passed explicitly down the call tree.
pub(crate) struct LoadState<'s, 'a, S: ?Sized> {
    pub(crate) source: &'s mut S,
    pub(crate) strings: &'a StringTable<'a>,
    pub(crate) options: &'s LoadOptions,
    /// Current prototype nesting depth.
    pub(crate) depth: usize,
}

impl<'s, 'a, S: ByteSource + ?Sized> LoadState<'s, 'a, S> {
    pub(crate) fn new(
        source: &'s mut S,
        strings: &'a StringTable<'a>,
        options: &'s LoadOptions,
    ) -> Self {
        Self {
            source,
            strings,
            options,
            depth: 0,
        }
    }

    pub(crate) fn read_block(&mut self, buf: &mut [u8]) -> LoadResult<()> {
        self.source
            .read_exact(buf)
            .map_err(|_| ErrorKind::TruncatedInput)
    }

    fn read_array<const N: usize>(&mut self) -> LoadResult<[u8; N]> {
        let mut buf = [0u8; N];
        self.read_block(&mut buf)?;
        Ok(buf)
    }

    pub(crate) fn read_byte(&mut self) -> LoadResult<u8> {
        let [b] = self.read_array::<1>()?;
        Ok(b)
    }

    /// Native `int`.
    pub(crate) fn read_int(&mut self) -> LoadResult<i32> {
        Ok(i32::from_ne_bytes(self.read_array()?))
    }

    pub(crate) fn read_size(&mut self) -> LoadResult<usize> {
        Ok(usize::from_ne_bytes(self.read_array()?))
    }

    pub(crate) fn read_number(&mut self) -> LoadResult<f64> {
        Ok(f64::from_ne_bytes(self.read_array()?))
    }

    pub(crate) fn read_integer(&mut self) -> LoadResult<i64> {
        Ok(i64::from_ne_bytes(self.read_array()?))
    }

    /// Read an element count for elements at least `elem_size` bytes wide.
    pub(crate) fn read_count(&mut self, elem_size: usize) -> LoadResult<usize> {
        let n = self.read_int()?;
        let n = usize::try_from(n).map_err(|_| Consistency::NegativeCount(n))?;
        let bytes = n.checked_mul(elem_size).ok_or(Consistency::SizeOverflow)?;
        self.ensure_available(bytes)?;
        Ok(n)
    }

    /// Whether the source vouches for `bytes` more bytes.
    ///
    /// With pre-checking on, a source that knows it is too short fails here
    /// with [`ErrorKind::TruncatedInput`].
    pub(crate) fn ensure_available(&self, bytes: usize) -> LoadResult<bool> {
        match self.source.remaining() {
            Some(left) if left >= bytes => Ok(true),
            Some(_) if self.options.pre_check_remaining => Err(ErrorKind::TruncatedInput),
            _ => Ok(false),
        }
    }

    /// An empty vector for `n` elements of at least `elem_size` encoded bytes.
    ///
    /// Only counts the source vouches for are reserved up front; the rest
    /// grow as elements actually arrive.
    pub(crate) fn alloc_vec<T>(&self, n: usize, elem_size: usize) -> LoadResult<Vec<T>> {
        let vouched = n
            .checked_mul(elem_size)
            .map_or(Ok(false), |bytes| self.ensure_available(bytes))?;
        let capacity = if vouched { n } else { n.min(UNVOUCHED_CAPACITY) };
        let mut list = Vec::new();
        list.try_reserve_exact(capacity).map_err(|_| ErrorKind::OutOfMemory)?;
        Ok(list)
    }

    /// Read `n` native `int`s copied verbatim.
    pub(crate) fn read_int_vector(&mut self, n: usize) -> LoadResult<Vec<i32>> {
        self.read_words(n, i32::from_ne_bytes)
    }

    /// Read `n` instruction words copied verbatim.
    pub(crate) fn read_code_vector(&mut self, n: usize) -> LoadResult<Vec<u32>> {
        self.read_words(n, u32::from_ne_bytes)
    }

    fn read_words<T>(&mut self, n: usize, from: fn([u8; 4]) -> T) -> LoadResult<Vec<T>> {
        let len = n.checked_mul(4).ok_or(Consistency::SizeOverflow)?;
        let raw = self.read_raw(len)?;
        let mut words = Vec::new();
        words.try_reserve_exact(n).map_err(|_| ErrorKind::OutOfMemory)?;
        words.extend(raw.chunks_exact(4).map(|w| from([w[0], w[1], w[2], w[3]])));
        Ok(words)
    }

    /// Read `len` raw bytes into a fresh buffer.
    ///
    /// Unless the source vouches for them, the buffer grows one bounded
    /// chunk at a time, so a forged length fails on the missing bytes
    /// instead of on the allocation.
    fn read_raw(&mut self, len: usize) -> LoadResult<Vec<u8>> {
        let step = if self.ensure_available(len)? {
            len
        } else {
            READ_CHUNK
        };
        let mut out = Vec::new();
        while out.len() < len {
            let start = out.len();
            let take = (len - start).min(step);
            out.try_reserve(take).map_err(|_| ErrorKind::OutOfMemory)?;
            out.resize(start + take, 0);
            self.read_block(&mut out[start..])?;
        }
        Ok(out)
    }

    /// Decode a possibly absent string.
    ///
    /// A size byte of 0 means absent; [`EXTENDED_SIZE`] means a full-width
    /// size follows. The stored size is the length plus one.
    pub(crate) fn read_string(&mut self, kind: StrKind) -> LoadResult<Option<LuaStr<'a>>> {
        let mut size = usize::from(self.read_byte()?);
        if size == usize::from(EXTENDED_SIZE) {
            size = self.read_size()?;
        }
        if size == 0 {
            return Ok(None);
        }
        let len = size - 1;
        let short = match kind {
            StrKind::ByLength => len <= MAX_SHORT_LEN,
            StrKind::Short if len > MAX_SHORT_LEN => {
                return Err(Consistency::ShortStringTooLong(len).into());
            }
            StrKind::Short => true,
            StrKind::Long => false,
        };
        let vouched = self.ensure_available(len)?;
        if short {
            let mut buf = [0u8; MAX_SHORT_LEN];
            self.read_block(&mut buf[..len])?;
            Ok(Some(self.strings.intern(&buf[..len])))
        } else if vouched {
            // Read straight into the final allocation.
            let bytes = self.strings.alloc_long(len);
            self.read_block(bytes)?;
            Ok(Some(LuaStr::Long(bytes)))
        } else {
            let raw = self.read_raw(len)?;
            let bytes = self.strings.alloc_long(len);
            bytes.copy_from_slice(&raw);
            Ok(Some(LuaStr::Long(bytes)))
        }
    }
}
