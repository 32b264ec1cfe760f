use crate::{Vec, strings::LuaStr, value::Value};

/// One fixed-width instruction word. The loader never decodes it.
pub type Instruction = u32;

/// Describes where a function finds one of its upvalues.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UpvalDesc<'a> {
    /// Captured from the enclosing function's stack frame (true) or from the
    /// enclosing closure's own upvalues (false).
    pub instack: bool,
    pub index: u8,
    /// Only present when the chunk carries debug information.
    pub name: Option<LuaStr<'a>>,
}

/// A local variable and the instruction range where it is active.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LocVar<'a> {
    pub name: Option<LuaStr<'a>>,
    pub start_pc: i32,
    pub end_pc: i32,
}

/// The static description of one function body.
///
/// A prototype owns its nested prototypes, so a loaded chunk is always a tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Proto<'a> {
    /// Chunk source name. Nested functions without their own share the
    /// parent's string.
    pub source: Option<LuaStr<'a>>,
    pub line_defined: i32,
    pub last_line_defined: i32,
    pub num_params: u8,
    pub is_vararg: bool,
    /// Number of registers the function needs.
    pub max_stack_size: u8,
    pub code: Vec<Instruction>,
    pub constants: Vec<Value<'a>>,
    pub upvalues: Vec<UpvalDesc<'a>>,
    pub protos: Vec<Proto<'a>>,
    /// Source line per instruction (empty when stripped).
    pub line_info: Vec<i32>,
    pub loc_vars: Vec<LocVar<'a>>,
}

impl<'a> Proto<'a> {
    /// Whether this is a main chunk rather than a nested function.
    pub fn is_main(&self) -> bool {
        self.line_defined == 0
    }

    /// Total number of prototypes in this tree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.protos.iter().map(Proto::count).sum::<usize>()
    }

    /// Depth of the tree; a prototype with no children has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.protos.iter().map(Proto::depth).max().unwrap_or(0)
    }
}

/// The loaded main function, paired with its (still unbound) upvalue slots.
#[derive(Clone, Debug, PartialEq)]
pub struct Closure<'a> {
    pub proto: Proto<'a>,
    /// One slot per declared upvalue. Binding them is up to the host.
    pub upvalues: Vec<Option<Value<'a>>>,
}

impl<'a> Closure<'a> {
    pub fn new(num_upvalues: usize) -> Self {
        Self {
            proto: Proto::default(),
            upvalues: crate::vec![None; num_upvalues],
        }
    }
}
