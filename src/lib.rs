//! Generates the AST module of a tree-walking interpreter: a root `AST`
//! container, one enum per node family and one visitor trait per family.
pub mod cli;
pub mod emit;
pub mod error;
pub mod grammar;
pub mod path_de;
pub mod sink;
pub mod validate;

pub use error::{Error, Result};
pub use grammar::{FieldType, Grammar, NodeFamily, RootShape, RootSpec, Variant};
