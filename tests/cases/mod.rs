#![allow(dead_code)]

use once_cell::sync::Lazy;
use undump::{LocVar, LuaStr, Proto, UpvalDesc, Value, header};

/// Dumps a prototype tree the way the chunk producer does.
#[derive(Default)]
pub struct Dumper {
    out: Vec<u8>,
}

impl Dumper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&mut self) -> &mut Self {
        self.raw(header::SIGNATURE);
        self.byte(header::VERSION);
        self.byte(header::FORMAT);
        self.raw(header::DATA);
        self.byte(4);
        self.byte(std::mem::size_of::<usize>() as u8);
        self.byte(4);
        self.byte(8);
        self.byte(8);
        self.raw(&header::CHECK_INTEGER.to_ne_bytes());
        self.raw(&header::CHECK_NUMBER.to_ne_bytes());
        self
    }

    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.out.extend_from_slice(bytes);
        self
    }

    pub fn byte(&mut self, b: u8) -> &mut Self {
        self.out.push(b);
        self
    }

    pub fn int(&mut self, v: i32) -> &mut Self {
        self.raw(&v.to_ne_bytes())
    }

    fn count(&mut self, n: usize) -> &mut Self {
        self.int(i32::try_from(n).expect("count fits in an int"))
    }

    pub fn string(&mut self, s: Option<&[u8]>) -> &mut Self {
        let Some(s) = s else {
            return self.byte(0);
        };
        let size = s.len() + 1;
        if size < 0xFF {
            self.byte(size as u8);
        } else {
            self.byte(0xFF);
            self.raw(&size.to_ne_bytes());
        }
        self.raw(s)
    }

    pub fn function(&mut self, f: &Proto<'_>, parent_source: Option<LuaStr<'_>>) -> &mut Self {
        // A child sharing its parent's source is written without one.
        if f.source.is_some() && f.source == parent_source {
            self.string(None);
        } else {
            self.string(f.source.map(|s| s.as_bytes()));
        }
        self.int(f.line_defined);
        self.int(f.last_line_defined);
        self.byte(f.num_params);
        self.byte(u8::from(f.is_vararg));
        self.byte(f.max_stack_size);

        self.count(f.code.len());
        for word in &f.code {
            self.raw(&word.to_ne_bytes());
        }

        self.count(f.constants.len());
        for k in &f.constants {
            self.byte(k.tag());
            match *k {
                Value::Nil => {}
                Value::Boolean(b) => {
                    self.byte(u8::from(b));
                }
                Value::Float(n) => {
                    self.raw(&n.to_ne_bytes());
                }
                Value::Integer(i) => {
                    self.raw(&i.to_ne_bytes());
                }
                Value::Str(s) => {
                    self.string(Some(s.as_bytes()));
                }
            }
        }

        self.count(f.upvalues.len());
        for up in &f.upvalues {
            self.byte(u8::from(up.instack));
            self.byte(up.index);
        }

        self.count(f.protos.len());
        for child in &f.protos {
            self.function(child, f.source);
        }

        self.count(f.line_info.len());
        for line in &f.line_info {
            self.int(*line);
        }
        self.count(f.loc_vars.len());
        for var in &f.loc_vars {
            self.string(var.name.map(|s| s.as_bytes()));
            self.int(var.start_pc);
            self.int(var.end_pc);
        }
        let names = f
            .upvalues
            .iter()
            .rposition(|up| up.name.is_some())
            .map_or(0, |last| last + 1);
        self.count(names);
        for up in &f.upvalues[..names] {
            self.string(up.name.map(|s| s.as_bytes()));
        }
        self
    }

    pub fn finish(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.out)
    }
}

/// A complete chunk for `main`, declaring as many upvalues as it has.
pub fn dump(main: &Proto<'_>) -> Vec<u8> {
    let upvalues = u8::try_from(main.upvalues.len()).expect("upvalue count fits in a byte");
    dump_declaring(main, upvalues)
}

pub fn dump_declaring(main: &Proto<'_>, upvalues: u8) -> Vec<u8> {
    Dumper::new()
        .header()
        .byte(upvalues)
        .function(main, None)
        .finish()
}

pub const SOURCE: LuaStr<'static> = LuaStr::Short(b"@cases.lua");

pub fn env() -> UpvalDesc<'static> {
    UpvalDesc {
        instack: true,
        index: 0,
        name: Some(LuaStr::Short(b"_ENV")),
    }
}

pub fn leaf(line: i32, code: &[u32]) -> Proto<'static> {
    Proto {
        source: Some(SOURCE),
        line_defined: line,
        last_line_defined: line + 2,
        max_stack_size: 2,
        code: code.to_vec(),
        line_info: vec![line; code.len()],
        ..Proto::default()
    }
}

pub struct TestCase {
    pub name: &'static str,
    pub main: Proto<'static>,
}

pub static TEST_CASES: Lazy<Vec<TestCase>> = Lazy::new(|| {
    vec![
        TestCase {
            name: "empty_main",
            main: Proto {
                source: Some(SOURCE),
                is_vararg: true,
                max_stack_size: 2,
                code: vec![0x0080_0026],
                upvalues: vec![env()],
                line_info: vec![1],
                ..Proto::default()
            },
        },
        TestCase {
            name: "every_constant_kind",
            main: Proto {
                source: Some(SOURCE),
                is_vararg: true,
                max_stack_size: 4,
                code: vec![0x0000_0001, 0x0000_4041, 0x0080_0026],
                constants: vec![
                    Value::Nil,
                    Value::Boolean(true),
                    Value::Boolean(false),
                    Value::Integer(-42),
                    Value::Integer(i64::MAX),
                    Value::Float(0.5),
                    Value::Float(-1.0e300),
                    Value::Str(LuaStr::Short(b"")),
                    Value::Str(LuaStr::Short(b"print")),
                    Value::Str(LuaStr::Long(&[b'x'; 300])),
                ],
                upvalues: vec![env()],
                line_info: vec![1, 2, 2],
                ..Proto::default()
            },
        },
        TestCase {
            name: "nested_three_deep",
            main: Proto {
                source: Some(SOURCE),
                is_vararg: true,
                max_stack_size: 2,
                code: vec![0x0000_002c, 0x0080_0026],
                upvalues: vec![env()],
                protos: vec![Proto {
                    line_defined: 1,
                    last_line_defined: 9,
                    num_params: 2,
                    code: vec![0x0000_002c, 0x0100_001f],
                    upvalues: vec![UpvalDesc {
                        instack: false,
                        index: 0,
                        name: Some(LuaStr::Short(b"_ENV")),
                    }],
                    protos: vec![Proto {
                        upvalues: vec![
                            UpvalDesc {
                                instack: true,
                                index: 0,
                                name: Some(LuaStr::Short(b"a")),
                            },
                            UpvalDesc {
                                instack: true,
                                index: 1,
                                name: Some(LuaStr::Short(b"b")),
                            },
                        ],
                        ..leaf(3, &[0x0000_0005, 0x0080_001f])
                    }],
                    loc_vars: vec![
                        LocVar {
                            name: Some(LuaStr::Short(b"a")),
                            start_pc: 0,
                            end_pc: 2,
                        },
                        LocVar {
                            name: Some(LuaStr::Short(b"b")),
                            start_pc: 0,
                            end_pc: 2,
                        },
                    ],
                    ..leaf(1, &[0x0000_002c, 0x0100_001f])
                }],
                line_info: vec![9, 9],
                ..Proto::default()
            },
        },
        TestCase {
            name: "siblings_keep_order",
            main: Proto {
                source: Some(SOURCE),
                is_vararg: true,
                max_stack_size: 3,
                code: vec![0x0000_002c, 0x0000_806c, 0x0080_0026],
                upvalues: vec![env()],
                protos: vec![leaf(1, &[0x0080_001f]), leaf(4, &[]), leaf(7, &[1, 2, 3])],
                line_info: vec![3, 6, 9],
                ..Proto::default()
            },
        },
        TestCase {
            name: "stripped_debug_info",
            main: Proto {
                source: None,
                is_vararg: true,
                max_stack_size: 2,
                code: vec![0x0080_0026],
                upvalues: vec![UpvalDesc {
                    instack: true,
                    index: 0,
                    name: None,
                }],
                protos: vec![Proto {
                    source: None,
                    line_defined: 1,
                    last_line_defined: 1,
                    code: vec![0x0080_001f],
                    ..Proto::default()
                }],
                ..Proto::default()
            },
        },
        TestCase {
            name: "child_with_own_source",
            main: Proto {
                source: Some(SOURCE),
                is_vararg: true,
                code: vec![0x0080_0026],
                upvalues: vec![env()],
                protos: vec![Proto {
                    source: Some(LuaStr::Short(b"=loadstring")),
                    ..leaf(1, &[0x0080_001f])
                }],
                ..Proto::default()
            },
        },
    ]
});
