use lalrpop_util::ParseError as LalrpopError;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::lexer::{LexerError, Token};

#[derive(Error, Diagnostic, Debug, Clone)]
pub enum ParseError {
    #[error("Invalid token")]
    #[diagnostic(code("P-001"))]
    InvalidToken {
        #[label]
        span: SourceSpan,
    },
    #[error("Unexpected end of file. Expected {expected}")]
    #[diagnostic(code("P-002"))]
    UnrecognizedEof {
        expected: String,
        #[label]
        span: SourceSpan,
    },
    #[error("Unexpected \"{token}\", expected {expected}")]
    #[diagnostic(code("P-003"))]
    UnrecognizedToken {
        token: String,
        expected: String,
        #[label]
        span: SourceSpan,
    },
    #[error("Extra token {token}")]
    #[diagnostic(code("P-004"))]
    ExtraToken {
        token: String,
        #[label]
        span: SourceSpan,
    },
    #[error("{error}")]
    #[diagnostic(code("P-005"))]
    User {
        error: String,
        #[label]
        span: SourceSpan,
    },
}

fn separated<I: IntoIterator<Item = String>>(s: &str, iter: I) -> String {
    let vec: Vec<_> = iter.into_iter().collect();
    vec.join(s)
}

fn span(start: usize, end: usize) -> SourceSpan {
    SourceSpan::new(start.into(), end.saturating_sub(start))
}

impl From<LalrpopError<usize, Token, LexerError>> for ParseError {
    fn from(err: LalrpopError<usize, Token, LexerError>) -> Self {
        use LalrpopError::*;
        match err {
            InvalidToken { location } => ParseError::InvalidToken { span: span(location, location) },
            UnrecognizedEof { location, expected } => ParseError::UnrecognizedEof {
                expected: separated(", ", expected),
                span: span(location, location),
            },
            UnrecognizedToken { token: (l, tok, r), expected } => ParseError::UnrecognizedToken {
                token: tok.to_string(),
                expected: separated(", ", expected),
                span: span(l, r),
            },
            ExtraToken { token: (l, tok, r) } => {
                ParseError::ExtraToken { token: tok.to_string(), span: span(l, r) }
            }
            User { error } => {
                ParseError::User { error: error.kind.to_string(), span: span(error.start, error.end) }
            }
        }
    }
}
