use std::path::PathBuf;
use std::sync::Arc;

use miette::Diagnostic;
use thiserror::Error;

use watling_lang_backend::BackendError;
use watling_lang_parser::ParseError;
use watling_lang_printer::SExpError;

pub type MainResult<T = ()> = Result<T, MainError>;

#[derive(Error, Diagnostic, Debug, Clone)]
#[error(transparent)]
#[diagnostic(transparent)]
pub enum MainError {
    Parser(#[from] ParseError),
    Backend(#[from] BackendError),
    Printer(#[from] SExpError),
    Driver(#[from] DriverError),
}

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum DriverError {
    #[error("File not found: {}", .0.display())]
    #[diagnostic(code("D-001"))]
    FileNotFound(PathBuf),
    #[error("IO error: {0}")]
    #[diagnostic(code("D-002"))]
    Io(#[from] Arc<std::io::Error>),
}
