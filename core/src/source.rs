//! Sequential byte sources.
//!
//! A read of N bytes either fills the whole buffer or fails with [`Truncated`].
//! There is no peeking and no rewinding.

/// Fewer bytes remained than a read asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncated;

/// A sequential, possibly buffered, stream of bytes.
pub trait ByteSource {
    /// Fill `buf` completely from the stream.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Truncated>;

    /// Number of bytes still available, if the source knows it.
    ///
    /// The loader uses this to reject counts that can never be satisfied
    /// before allocating for them.
    fn remaining(&self) -> Option<usize> {
        None
    }
}

impl ByteSource for &[u8] {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Truncated> {
        if self.len() < buf.len() {
            // Consume what is left so a failed source stays exhausted.
            *self = &self[self.len()..];
            return Err(Truncated);
        }
        let (head, tail) = self.split_at(buf.len());
        buf.copy_from_slice(head);
        *self = tail;
        Ok(())
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Truncated> {
        (**self).read_exact(buf)
    }

    fn remaining(&self) -> Option<usize> {
        (**self).remaining()
    }
}

/// Adapts any [`std::io::Read`] into a [`ByteSource`].
///
/// End of stream and read errors both surface as [`Truncated`]; the
/// underlying I/O error is logged.
#[cfg(feature = "std")]
pub struct IoSource<R> {
    reader: R,
}

#[cfg(feature = "std")]
impl<R: std::io::Read> IoSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read> ByteSource for IoSource<R> {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Truncated> {
        self.reader.read_exact(buf).map_err(|err| {
            if err.kind() != std::io::ErrorKind::UnexpectedEof {
                tracing::warn!(error = %err, "chunk reader failed");
            }
            Truncated
        })
    }
}
