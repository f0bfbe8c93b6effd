//! Grammar → Rust source.
//!
//! A single linear pass over the grammar. Nothing is buffered beyond what the
//! underlying writer does: each item is written as soon as it is known, so an
//! I/O failure part way through leaves exactly the items emitted so far.
//!
//! Layout is fixed so that the same grammar always yields the same bytes:
//! a blank line before every item, four-space indent, `, ` between payload
//! fields and a trailing comma after every variant.
use std::io::{self, Write};

use crate::grammar::{Grammar, NodeFamily, RootShape, RootSpec};

pub const ROOT_STRUCT: &str = "AST";
pub const VISITOR_SUFFIX: &str = "Visitor";
pub const VISIT_PREFIX: &str = "visit_";
pub const RESULT_PARAM: &str = "E";

// ————————————————————————————————————————————————————————————————————————————
// NAMING
// ————————————————————————————————————————————————————————————————————————————

/// `expr` → `Expr`, `binOp` → `BinOp`. Only the first character changes.
pub fn union_name(family: &str) -> String {
    let mut chars = family.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `expr` → `ExprVisitor`
pub fn visitor_name(family: &str) -> String {
    format!("{}{VISITOR_SUFFIX}", union_name(family))
}

/// `binOp` → `visit_binop`
pub fn visit_method_name(family: &str) -> String {
    format!("{VISIT_PREFIX}{}", family.to_lowercase())
}

/// Parameter name of the visit method; keywords go through a raw identifier.
fn param_name(family: &str) -> String {
    let lower = family.to_lowercase();
    if RESERVED.contains(&lower.as_str()) {
        format!("r#{lower}")
    } else {
        lower
    }
}

// `self`, `super`, `crate` and `Self` cannot be raw identifiers; they are left alone.
pub(crate) const RESERVED: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

// ————————————————————————————————————————————————————————————————————————————
// EMITTER
// ————————————————————————————————————————————————————————————————————————————

pub struct Emitter<W: Write> {
    out: W,
}

impl<W: Write> Emitter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// The whole module: scanner import, root container, then every family in
    /// declaration order.
    pub fn emit_all(&mut self, grammar: &Grammar) -> io::Result<()> {
        self.emit_prelude(&grammar.scanner_path)?;
        self.emit_root(&grammar.root)?;
        for family in grammar.families() {
            self.emit_family(family)?;
        }
        Ok(())
    }

    pub fn emit_prelude(&mut self, scanner_path: &str) -> io::Result<()> {
        writeln!(self.out, "use {scanner_path}::{{Literal, Token}};")
    }

    pub fn emit_root(&mut self, root: &RootSpec) -> io::Result<()> {
        let node = format!("Box<{}>", union_name(&root.family));
        let ty = match root.shape {
            RootShape::Single => node,
            RootShape::Sequence => format!("Vec<{node}>"),
        };
        writeln!(self.out)?;
        writeln!(self.out, "pub struct {ROOT_STRUCT} {{")?;
        writeln!(self.out, "    pub root: {ty},")?;
        writeln!(self.out, "}}")
    }

    /// The family's union immediately followed by its visitor trait.
    pub fn emit_family(&mut self, family: &NodeFamily) -> io::Result<()> {
        self.emit_union(family)?;
        self.emit_visitor(family)
    }

    fn emit_union(&mut self, family: &NodeFamily) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "pub enum {} {{", union_name(&family.name))?;
        for variant in &family.variants {
            if variant.fields.is_empty() {
                writeln!(self.out, "    {},", variant.name)?;
            } else {
                let fields = variant.fields.iter().map(|f| f.as_str()).collect::<Vec<_>>();
                writeln!(self.out, "    {}({}),", variant.name, fields.join(", "))?;
            }
        }
        writeln!(self.out, "}}")
    }

    fn emit_visitor(&mut self, family: &NodeFamily) -> io::Result<()> {
        let union = union_name(&family.name);
        writeln!(self.out)?;
        writeln!(self.out, "pub trait {}<{RESULT_PARAM}> {{", visitor_name(&family.name))?;
        writeln!(
            self.out,
            "    fn {}(&mut self, {}: &Box<{union}>) -> {RESULT_PARAM};",
            visit_method_name(&family.name),
            param_name(&family.name),
        )?;
        writeln!(self.out, "}}")
    }
}

/// Render the module into memory.
pub fn render(grammar: &Grammar) -> String {
    let mut buf = Vec::<u8>::new();
    // Both calls are infallible: Vec<u8> never rejects a write, and every piece is a `&str`.
    Emitter::new(&mut buf)
        .emit_all(grammar)
        .expect("writing into a Vec<u8> cannot fail");
    String::from_utf8(buf).expect("emitted text is built from UTF-8 strings")
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
