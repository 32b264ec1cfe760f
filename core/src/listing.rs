//! Human-readable listing of a loaded prototype tree.

use core::fmt;

use crate::{proto::Proto, strings::LuaStr};

/// Displays a prototype and all nested prototypes, depth-first.
pub struct Listing<'p, 'a> {
    proto: &'p Proto<'a>,
}

impl<'a> Proto<'a> {
    pub fn listing(&self) -> Listing<'_, 'a> {
        Listing { proto: self }
    }
}

impl fmt::Display for Listing<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_function(f, self.proto)
    }
}

struct SourceName<'a>(Option<LuaStr<'a>>);

impl fmt::Display for SourceName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(source) = self.0 else {
            return f.write_str("=?");
        };
        match source.as_bytes().first().copied() {
            Some(b'@' | b'=') => {
                write!(f, "{}", LuaStr::Short(&source.as_bytes()[1..]))
            }
            Some(0x1b) => f.write_str("(binary string)"),
            _ => f.write_str("(string)"),
        }
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

fn write_function(f: &mut fmt::Formatter<'_>, p: &Proto<'_>) -> fmt::Result {
    let kind = if p.is_main() { "main" } else { "function" };
    writeln!(
        f,
        "{} <{}:{},{}> ({} instruction{})",
        kind,
        SourceName(p.source),
        p.line_defined,
        p.last_line_defined,
        p.code.len(),
        plural(p.code.len())
    )?;
    writeln!(
        f,
        "{}{} param{}, {} slot{}, {} upvalue{}, {} local{}, {} constant{}, {} function{}",
        p.num_params,
        if p.is_vararg { "+" } else { "" },
        plural(usize::from(p.num_params)),
        p.max_stack_size,
        plural(usize::from(p.max_stack_size)),
        p.upvalues.len(),
        plural(p.upvalues.len()),
        p.loc_vars.len(),
        plural(p.loc_vars.len()),
        p.constants.len(),
        plural(p.constants.len()),
        p.protos.len(),
        plural(p.protos.len()),
    )?;
    for (pc, word) in p.code.iter().enumerate() {
        match p.line_info.get(pc) {
            Some(line) => writeln!(f, "\t{}\t[{}]\t0x{:08x}", pc + 1, line, word)?,
            None => writeln!(f, "\t{}\t[-]\t0x{:08x}", pc + 1, word)?,
        }
    }

    writeln!(f, "constants ({}):", p.constants.len())?;
    for (i, k) in p.constants.iter().enumerate() {
        writeln!(f, "\t{}\t{}", i + 1, k)?;
    }

    writeln!(f, "locals ({}):", p.loc_vars.len())?;
    for (i, var) in p.loc_vars.iter().enumerate() {
        let name = var.name.unwrap_or(LuaStr::Short(b"?"));
        writeln!(
            f,
            "\t{}\t{}\t{}\t{}",
            i,
            name,
            i64::from(var.start_pc) + 1,
            i64::from(var.end_pc) + 1
        )?;
    }

    writeln!(f, "upvalues ({}):", p.upvalues.len())?;
    for (i, up) in p.upvalues.iter().enumerate() {
        let name = up.name.unwrap_or(LuaStr::Short(b"-"));
        writeln!(f, "\t{}\t{}\t{}\t{}", i, name, u8::from(up.instack), up.index)?;
    }

    for child in &p.protos {
        writeln!(f)?;
        write_function(f, child)?;
    }
    Ok(())
}
