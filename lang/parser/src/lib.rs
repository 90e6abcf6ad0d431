//! # Parser
//!
//! Lexing and parsing of the statically annotated source subset into the
//! syntax tree of [watling_lang_ast].

mod grammar;
pub mod lexer;
mod result;

use grammar::php::{ExpParser, ItemsParser};
use grammar::util::fold_namespaces;
use lexer::Lexer;
pub use result::*;
use watling_lang_ast::{Exp, Module};

/// Parse a single expression
pub fn parse_exp(s: &str) -> Result<Exp, ParseError> {
    ExpParser::new().parse(Lexer::new(s)).map_err(From::from)
}

/// Parse the contents of a source file
pub fn parse_module(s: &str) -> Result<Module, ParseError> {
    let items = ItemsParser::new().parse(Lexer::new(s))?;
    Ok(fold_namespaces(items))
}
