use std::path::PathBuf;
use thiserror::Error;

use crate::validate::Diagnostic;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Opening, writing or flushing the output artifact failed.
    #[error("I/O failure on `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot read grammar file `{}`", path.display())]
    GrammarRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed grammar file `{}` at {json_path}: {message}", path.display())]
    GrammarParse {
        path: PathBuf,
        json_path: String,
        message: String,
    },
    #[error("grammar rejected with {} problem(s)", .0.len())]
    Invalid(Vec<Diagnostic>),
}
