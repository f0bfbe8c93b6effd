//! The output artifact.
//!
//! `Sink::open` is the only way to get a handle and `Sink::write_with`
//! consumes it, so a sink is opened once, written once and finalized once.
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::emit::Emitter;
use crate::error::{Error, Result};
use crate::grammar::Grammar;

pub const EXTENSION: &str = "rs";

/// `<dir>/<base_name>.rs`
pub fn artifact_path(dir: &Path, base_name: &str) -> PathBuf {
    dir.join(format!("{base_name}.{EXTENSION}"))
}

#[derive(Debug)]
pub struct Sink {
    path: PathBuf,
    out: BufWriter<File>,
}

impl Sink {
    /// Create (or truncate) the artifact. Fails without creating anything when
    /// `dir` is missing or not writable.
    pub fn open(dir: &Path, base_name: &str) -> Result<Self> {
        let path = artifact_path(dir, base_name);
        let file = File::create(&path).map_err(|source| Error::Io { path: path.clone(), source })?;
        Ok(Self { path, out: BufWriter::new(file) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` against the open artifact and finalize it. The buffer is
    /// flushed whether or not `f` succeeded; a partial artifact stays on disk.
    /// The first failure wins.
    pub fn write_with<F>(mut self, f: F) -> Result<PathBuf>
    where
        F: FnOnce(&mut dyn Write) -> io::Result<()>,
    {
        let written = f(&mut self.out);
        let flushed = self.out.flush();
        let path = self.path;
        match written.and(flushed) {
            Ok(()) => Ok(path),
            Err(source) => Err(Error::Io { path, source }),
        }
    }
}

/// Open `<dir>/<grammar.base_name>.rs` and emit the whole module into it.
pub fn generate(dir: &Path, grammar: &Grammar) -> Result<PathBuf> {
    let sink = Sink::open(dir, &grammar.base_name)?;
    sink.write_with(|out| Emitter::new(out).emit_all(grammar))
}
