use crate::undump::header;
use crate::Vec;

/// Initialize tracing subscriber for tests with DEBUG level
/// Call this at the start of tests where you want to see logging output
pub fn init_test_logging() {
    use tracing_subscriber::{EnvFilter, fmt};

    // Try to initialize, ignore error if already initialized
    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Byte-level writer for hand-made chunks.
#[derive(Default)]
pub struct ChunkBuilder {
    bytes: Vec<u8>,
}

impl ChunkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything after the first signature byte, as the loader expects it.
    pub fn header(self) -> Self {
        self.raw(&header::SIGNATURE[1..])
            .byte(header::VERSION)
            .byte(header::FORMAT)
            .raw(header::DATA)
            .byte(4)
            .byte(core::mem::size_of::<usize>() as u8)
            .byte(4)
            .byte(8)
            .byte(8)
            .integer(header::CHECK_INTEGER)
            .number(header::CHECK_NUMBER)
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn byte(mut self, b: u8) -> Self {
        self.bytes.push(b);
        self
    }

    pub fn int(self, v: i32) -> Self {
        self.raw(&v.to_ne_bytes())
    }

    pub fn size(self, v: usize) -> Self {
        self.raw(&v.to_ne_bytes())
    }

    pub fn integer(self, v: i64) -> Self {
        self.raw(&v.to_ne_bytes())
    }

    pub fn number(self, v: f64) -> Self {
        self.raw(&v.to_ne_bytes())
    }

    pub fn no_string(self) -> Self {
        self.byte(0)
    }

    pub fn string(self, s: impl AsRef<[u8]>) -> Self {
        let s = s.as_ref();
        let size = s.len() + 1;
        let this = if size < 0xFF {
            self.byte(size as u8)
        } else {
            self.byte(0xFF).size(size)
        };
        this.raw(s)
    }

    /// A function with no code, constants, upvalues, children or debug info.
    pub fn empty_function(self, source: Option<&[u8]>) -> Self {
        let this = match source {
            Some(s) => self.string(s),
            None => self.no_string(),
        };
        this.int(0)
            .int(0)
            .byte(0)
            .byte(1)
            .byte(2)
            .int(0) // code
            .int(0) // constants
            .int(0) // upvalues
            .int(0) // protos
            .int(0) // line info
            .int(0) // locals
            .int(0) // upvalue names
    }

    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }
}
