//! Strings as the runtime holds them.
//!
//! Short strings are interned in a [`StringTable`] so equal contents share one
//! allocation. Long strings are allocated once at their final size and owned
//! by whatever slot references them.

use bumpalo::Bump;
use core::cell::RefCell;
use core::fmt;
use core::hash::{Hash, Hasher};
use hashbrown::{DefaultHashBuilder, HashSet};

/// Longest string that goes through the interning table.
pub const MAX_SHORT_LEN: usize = 40;

/// An immutable byte string living in the runtime's arena.
///
/// Equality and hashing look at contents only; use [`LuaStr::ptr_eq`] to
/// check whether two values are the same allocation.
#[derive(Clone, Copy)]
pub enum LuaStr<'a> {
    /// Interned; equal contents are the same allocation.
    Short(&'a [u8]),
    /// Uniquely allocated.
    Long(&'a [u8]),
}

impl<'a> LuaStr<'a> {
    pub fn as_bytes(&self) -> &'a [u8] {
        match *self {
            LuaStr::Short(bytes) | LuaStr::Long(bytes) => bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    pub fn is_short(&self) -> bool {
        matches!(self, LuaStr::Short(_))
    }

    /// True if both values refer to the same allocation.
    pub fn ptr_eq(&self, other: &LuaStr<'_>) -> bool {
        let (a, b) = (self.as_bytes(), other.as_bytes());
        core::ptr::eq(a.as_ptr(), b.as_ptr()) && a.len() == b.len()
    }
}

impl PartialEq for LuaStr<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for LuaStr<'_> {}

impl Hash for LuaStr<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl fmt::Display for LuaStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.as_bytes().utf8_chunks() {
            f.write_str(chunk.valid())?;
            for byte in chunk.invalid() {
                write!(f, "\\x{:02x}", byte)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for LuaStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_short() { "Short" } else { "Long" };
        write!(f, "{}(\"", kind)?;
        for chunk in self.as_bytes().utf8_chunks() {
            write!(f, "{}", chunk.valid().escape_debug())?;
            for byte in chunk.invalid() {
                write!(f, "\\x{:02x}", byte)?;
            }
        }
        f.write_str("\")")
    }
}

/// Deduplicating table for short strings, backed by an arena.
///
/// Owned by one runtime instance. It is not `Sync`; loads that share a table
/// must be serialized by the host.
pub struct StringTable<'a> {
    // Arena holding every string created through this table.
    arena: &'a Bump,
    interned: RefCell<HashSet<&'a [u8], DefaultHashBuilder, &'a Bump>>,
}

impl<'a> StringTable<'a> {
    pub fn new(arena: &'a Bump) -> &'a Self {
        arena.alloc(Self {
            arena,
            interned: RefCell::new(HashSet::new_in(arena)),
        })
    }

    /// Return the shared string with these contents, creating it if needed.
    pub fn intern(&self, bytes: &[u8]) -> LuaStr<'a> {
        if let Some(&interned) = self.interned.borrow().get(bytes) {
            return LuaStr::Short(interned);
        }
        let arena_bytes: &'a [u8] = self.arena.alloc_slice_copy(bytes);
        self.interned.borrow_mut().insert(arena_bytes);
        LuaStr::Short(arena_bytes)
    }

    /// Allocate a zeroed buffer of exactly `len` bytes for a long string.
    ///
    /// The caller fills it in place and freezes it with [`LuaStr::Long`].
    pub fn alloc_long(&self, len: usize) -> &'a mut [u8] {
        self.arena.alloc_slice_fill_copy(len, 0u8)
    }

    /// Number of distinct interned strings.
    pub fn len(&self) -> usize {
        self.interned.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
