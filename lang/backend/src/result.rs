use miette::{Diagnostic, SourceSpan};
use thiserror::Error;
use watling_lang_parser::ParseError;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum BackendError {
    #[error("Parameter ${name} of function {function} has no type annotation")]
    #[diagnostic(code("B-001"), help("Annotate the parameter with int, float, i32, i64, f32 or f64"))]
    MissingParameterType {
        name: String,
        function: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Unsupported construct: {kind}")]
    #[diagnostic(code("B-002"))]
    UnsupportedConstruct {
        kind: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Undeclared symbol {name}")]
    #[diagnostic(code("B-003"))]
    UndeclaredSymbol {
        name: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Impossible: no active file")]
    #[diagnostic(code("B-004"))]
    NoActiveFile,
    #[error("Cannot infer the type of this {kind}")]
    #[diagnostic(code("B-005"))]
    AmbiguousNodeType {
        kind: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Macro {name} expects {expected} argument(s), but {given} were given")]
    #[diagnostic(code("B-006"))]
    MalformedMacroPattern {
        name: String,
        expected: usize,
        given: usize,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Invalid macro pattern {pattern:?}")]
    #[diagnostic(code("B-007"), help("Macro patterns only support %s placeholders and %% escapes"))]
    InvalidMacroPattern {
        pattern: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Invalid attribute {name}: {reason}")]
    #[diagnostic(code("B-008"))]
    InvalidAttribute {
        name: String,
        reason: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Unsupported type {name}")]
    #[diagnostic(code("B-009"), help("Supported types are int, float, array, void, i32, i64, f32 and f64"))]
    UnsupportedType {
        name: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Cyclic inclusion of {path}")]
    #[diagnostic(code("B-010"))]
    IncludeCycle {
        path: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("File not found: {path}")]
    #[diagnostic(code("B-011"))]
    FileNotFound {
        path: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Could not read {path}: {message}")]
    #[diagnostic(code("B-012"))]
    Io { path: String, message: String },
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),
}

impl BackendError {
    /// Attach a source location to errors raised by a collaborator that has none
    pub fn at(self, location: Option<SourceSpan>) -> Self {
        match self {
            BackendError::FileNotFound { path, span: None } => {
                BackendError::FileNotFound { path, span: location }
            }
            BackendError::UndeclaredSymbol { name, span: None } => {
                BackendError::UndeclaredSymbol { name, span: location }
            }
            other => other,
        }
    }
}

pub type BackendResult<T = ()> = Result<T, BackendError>;
