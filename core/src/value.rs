use core::fmt;

use crate::strings::LuaStr;

/// Type tags as written before each constant in a chunk.
pub mod tag {
    pub const NIL: u8 = 0;
    pub const BOOLEAN: u8 = 1;
    pub const FLOAT: u8 = 3;
    pub const INTEGER: u8 = 3 | (1 << 4);
    pub const SHORT_STRING: u8 = 4;
    pub const LONG_STRING: u8 = 4 | (1 << 4);
}

/// A constant pool entry.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Value<'a> {
    #[default]
    Nil,
    Boolean(bool),
    Float(f64),
    Integer(i64),
    Str(LuaStr<'a>),
}

impl<'a> Value<'a> {
    /// The tag this value is written with.
    pub fn tag(&self) -> u8 {
        match self {
            Value::Nil => tag::NIL,
            Value::Boolean(_) => tag::BOOLEAN,
            Value::Float(_) => tag::FLOAT,
            Value::Integer(_) => tag::INTEGER,
            Value::Str(s) if s.is_short() => tag::SHORT_STRING,
            Value::Str(_) => tag::LONG_STRING,
        }
    }

    pub fn as_str(&self) -> Option<LuaStr<'a>> {
        match *self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Float(n) => write!(f, "{:?}", n),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Str(s) => write!(f, "\"{}\"", s),
        }
    }
}
