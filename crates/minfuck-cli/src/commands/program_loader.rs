use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use minfuck_bytecode::{Module, ModuleError};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("You must supply a filename")]
    MissingPath,
    #[error("failed to read '{}': {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Format(#[from] ModuleError),
}

impl LoadError {
    /// Print the diagnostic. Usage and format errors go to stdout, where
    /// existing tooling expects them; I/O failures go to stderr.
    pub fn report(&self) {
        match self {
            LoadError::MissingPath | LoadError::Format(_) => println!("{self}"),
            LoadError::Read { .. } => eprintln!("error: {self}"),
        }
    }
}

pub fn load_program(path: Option<&Path>) -> Result<Module, LoadError> {
    let path = path.ok_or(LoadError::MissingPath)?;
    let bytes = fs::read(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "read program");

    Ok(Module::from_bytes(bytes)?)
}
