use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

/// The command line names a file that cannot be compiled
#[derive(Error, Diagnostic, Debug)]
#[error("Invalid input: {} does not exist or is not a file", .path.display())]
#[diagnostic(code("E-001"))]
pub struct InvalidInput {
    pub path: PathBuf,
}

impl InvalidInput {
    /// Fail unless `path` names an existing file
    pub fn check(path: &Path) -> Result<(), InvalidInput> {
        if path.is_file() { Ok(()) } else { Err(InvalidInput { path: path.to_path_buf() }) }
    }
}
