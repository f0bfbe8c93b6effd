//! Grammar description: the ordered table of node families the emitter walks.
//!
//! A grammar is either one of the built-in presets or a JSON document loaded
//! from disk. Either way it is immutable once built and is read in declaration
//! order only: families in order, variants in order, fields in order.
use std::path::Path;
use serde::Deserialize;

use crate::error::{Error, Result};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Opaque payload type text, copied verbatim into the emitted variant.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FieldType(pub String);

/// One arm of a family's tagged union.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Variant {
    pub name: String,
    /// Positional payload, in emitted order.
    #[serde(default)]
    pub fields: Vec<FieldType>,
}

/// One syntactic category (`expr`, `stmt`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeFamily {
    pub name: String,
    pub variants: Vec<Variant>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RootShape {
    /// `root: Box<F>`
    Single,
    /// `root: Vec<Box<F>>`
    Sequence,
}

/// Which family the `AST` container holds, and how many of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RootSpec {
    pub family: String,
    pub shape: RootShape,
}

/// A complete generator input: the families plus the knobs that shape the
/// artifact around them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Grammar {
    /// Artifact stem; the file is written as `<base_name>.rs`.
    pub base_name: String,
    pub root: RootSpec,
    /// Module path the scanner's `Literal` and `Token` are imported from.
    #[serde(default = "default_scanner_path")]
    pub scanner_path: String,
    pub families: Vec<NodeFamily>,
}

pub const DEFAULT_SCANNER_PATH: &str = "crate::scanner";

fn default_scanner_path() -> String {
    DEFAULT_SCANNER_PATH.to_string()
}

// ————————————————————————————————————————————————————————————————————————————
// BUILDERS
// ————————————————————————————————————————————————————————————————————————————

impl FieldType {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FieldType {
    fn from(value: &str) -> Self {
        FieldType(value.to_string())
    }
}

impl NodeFamily {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), variants: Vec::new() }
    }

    /// Append a variant; declaration order is emission order.
    pub fn variant<I, F>(mut self, name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<FieldType>,
    {
        self.variants.push(Variant {
            name: name.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        });
        self
    }
}

impl Grammar {
    pub fn new(base_name: impl Into<String>, root: RootSpec, families: Vec<NodeFamily>) -> Self {
        Self {
            base_name: base_name.into(),
            root,
            scanner_path: default_scanner_path(),
            families,
        }
    }

    pub fn with_scanner_path(mut self, scanner_path: impl Into<String>) -> Self {
        self.scanner_path = scanner_path.into();
        self
    }

    pub fn families(&self) -> impl Iterator<Item = &NodeFamily> {
        self.families.iter()
    }

    pub fn variant_count(&self) -> usize {
        self.families.iter().map(|f| f.variants.len()).sum()
    }

    pub fn family(&self, name: &str) -> Option<&NodeFamily> {
        self.families.iter().find(|f| f.name == name)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// PRESETS
// ————————————————————————————————————————————————————————————————————————————

fn expr_core() -> NodeFamily {
    NodeFamily::new("expr")
        .variant("Literal", ["Literal"])
        .variant("Binary", ["Box<Expr>", "Token", "Box<Expr>"])
        .variant("Unary", ["Token", "Box<Expr>"])
        .variant("Grouping", ["Box<Expr>"])
}

impl Grammar {
    /// Expression-only grammar: a single `Expr` at the root, written to `expr.rs`.
    pub fn expr_preset() -> Self {
        Grammar::new(
            "expr",
            RootSpec { family: "expr".into(), shape: RootShape::Single },
            vec![expr_core()],
        )
    }

    /// Statement-oriented grammar: a program is a sequence of `Stmt`, written to `ast.rs`.
    pub fn program_preset() -> Self {
        let expr = NodeFamily::new("expr")
            .variant("Assign", ["Token", "Box<Expr>"])
            .variant("Literal", ["Literal"])
            .variant("Logical", ["Box<Expr>", "Token", "Box<Expr>"])
            .variant("Binary", ["Box<Expr>", "Token", "Box<Expr>"])
            .variant("Unary", ["Token", "Box<Expr>"])
            .variant("Grouping", ["Box<Expr>"])
            .variant("Variable", ["Token"]);
        let stmt = NodeFamily::new("stmt")
            .variant("Block", ["Vec<Box<Stmt>>"])
            .variant("Expression", ["Box<Expr>"])
            .variant("If", ["Box<Expr>", "Box<Stmt>", "Option<Box<Stmt>>"])
            .variant("Print", ["Box<Expr>"])
            .variant("Var", ["Token", "Box<Expr>"])
            .variant("While", ["Box<Expr>", "Box<Stmt>"]);
        Grammar::new(
            "ast",
            RootSpec { family: "stmt".into(), shape: RootShape::Sequence },
            vec![expr, stmt],
        )
    }
}

// ————————————————————————————————————————————————————————————————————————————
// LOADING
// ————————————————————————————————————————————————————————————————————————————

impl Grammar {
    /// Parse a JSON grammar document. `origin` only labels errors.
    pub fn from_json_str(src: &str, origin: &Path) -> Result<Self> {
        crate::path_de::from_str_with_path::<Grammar>(src).map_err(|err| Error::GrammarParse {
            path: origin.to_path_buf(),
            json_path: err.json_path,
            message: err.message,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let src = std::fs::read_to_string(path).map_err(|source| Error::GrammarRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&src, path)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
