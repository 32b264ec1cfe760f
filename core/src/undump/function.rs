//! The recursive prototype loader.

use super::state::{LoadResult, LoadState, StrKind};
use crate::{
    Vec,
    error::{Consistency, ErrorKind},
    proto::{LocVar, Proto, UpvalDesc},
    source::ByteSource,
    strings::LuaStr,
    value::{Value, tag},
};

impl<'s, 'a, S: ByteSource + ?Sized> LoadState<'s, 'a, S> {
    /// Fill `f`, and everything nested in it, from the stream.
    ///
    /// `parent_source` is used when the stream carries no source name for
    /// this function.
    pub(crate) fn load_function(
        &mut self,
        f: &mut Proto<'a>,
        parent_source: Option<LuaStr<'a>>,
    ) -> LoadResult<()> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(Consistency::NestingTooDeep(self.options.max_depth).into());
        }
        f.source = self.read_string(StrKind::ByLength)?.or(parent_source);
        f.line_defined = self.read_int()?;
        f.last_line_defined = self.read_int()?;
        f.num_params = self.read_byte()?;
        f.is_vararg = self.read_byte()? != 0;
        f.max_stack_size = self.read_byte()?;
        self.load_code(f)?;
        self.load_constants(f)?;
        self.load_upvalues(f)?;
        self.load_protos(f)?;
        self.load_debug(f)?;
        tracing::trace!(
            line = f.line_defined,
            code = f.code.len(),
            constants = f.constants.len(),
            upvalues = f.upvalues.len(),
            protos = f.protos.len(),
            "loaded function"
        );
        self.depth -= 1;
        Ok(())
    }

    fn load_code(&mut self, f: &mut Proto<'a>) -> LoadResult<()> {
        let n = self.read_count(4)?;
        f.code = self.read_code_vector(n)?;
        Ok(())
    }

    fn load_constants(&mut self, f: &mut Proto<'a>) -> LoadResult<()> {
        let n = self.read_count(1)?;
        let mut constants = self.alloc_vec(n, 1)?;
        for _ in 0..n {
            let k = self.load_constant()?;
            push(&mut constants, k)?;
        }
        f.constants = constants;
        Ok(())
    }

    fn load_constant(&mut self) -> LoadResult<Value<'a>> {
        let t = self.read_byte()?;
        let value = match t {
            tag::NIL => Value::Nil,
            tag::BOOLEAN => Value::Boolean(self.read_byte()? != 0),
            tag::FLOAT => Value::Float(self.read_number()?),
            tag::INTEGER => Value::Integer(self.read_integer()?),
            tag::SHORT_STRING | tag::LONG_STRING => {
                let kind = if t == tag::SHORT_STRING {
                    StrKind::Short
                } else {
                    StrKind::Long
                };
                let s = self
                    .read_string(kind)?
                    .ok_or(Consistency::AbsentConstantString)?;
                Value::Str(s)
            }
            other => return Err(Consistency::UnknownConstantTag(other).into()),
        };
        Ok(value)
    }

    fn load_upvalues(&mut self, f: &mut Proto<'a>) -> LoadResult<()> {
        let n = self.read_count(2)?;
        let mut upvalues = self.alloc_vec(n, 2)?;
        for _ in 0..n {
            let upval = UpvalDesc {
                instack: self.read_byte()? != 0,
                index: self.read_byte()?,
                name: None,
            };
            push(&mut upvalues, upval)?;
        }
        f.upvalues = upvalues;
        Ok(())
    }

    fn load_protos(&mut self, f: &mut Proto<'a>) -> LoadResult<()> {
        let n = self.read_count(1)?;
        let mut protos = self.alloc_vec(n, 1)?;
        for _ in 0..n {
            let mut child = Proto::default();
            self.load_function(&mut child, f.source)?;
            push(&mut protos, child)?;
        }
        f.protos = protos;
        Ok(())
    }

    fn load_debug(&mut self, f: &mut Proto<'a>) -> LoadResult<()> {
        let n = self.read_count(4)?;
        f.line_info = self.read_int_vector(n)?;

        let n = self.read_count(9)?;
        let mut loc_vars = self.alloc_vec(n, 9)?;
        for _ in 0..n {
            let var = LocVar {
                name: self.read_string(StrKind::ByLength)?,
                start_pc: self.read_int()?,
                end_pc: self.read_int()?,
            };
            push(&mut loc_vars, var)?;
        }
        f.loc_vars = loc_vars;

        let n = self.read_count(1)?;
        if n > f.upvalues.len() {
            return Err(ErrorKind::Consistency(Consistency::UpvalueNameOutOfRange {
                names: n,
                upvalues: f.upvalues.len(),
            }));
        }
        for upval in f.upvalues.iter_mut().take(n) {
            upval.name = self.read_string(StrKind::ByLength)?;
        }
        Ok(())
    }
}

fn push<T>(list: &mut Vec<T>, item: T) -> LoadResult<()> {
    list.try_reserve(1).map_err(|_| ErrorKind::OutOfMemory)?;
    list.push(item);
    Ok(())
}
