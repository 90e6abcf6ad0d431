//! # Syntax tree
//!
//! The node tree produced by the parser and consumed by the code generator.
//! It covers the statically annotated subset of the source language that can be
//! lowered to WebAssembly text: numeric literals, variables, assignments, arithmetic,
//! calls, functions with attributes, namespaces, `use` aliases, classes and file inclusion.

mod decls;
mod exp;
mod ident;
mod traits;

pub use decls::*;
pub use exp::*;
pub use ident::*;
pub use traits::*;

pub use watling_lang_miette_util::Span;

pub type HashMap<K, V> = std::collections::HashMap<K, V, fxhash::FxBuildHasher>;
