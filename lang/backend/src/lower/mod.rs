//! Lowering of the syntax tree to WebAssembly text

use watling_lang_ast::Stmt;
use watling_lang_parser::parse_module;

use crate::ctx::Ctx;
use crate::result::BackendResult;
use crate::types::WasmType;

mod decls;
mod exprs;
mod stmts;

pub trait ToWat {
    fn to_wat(&self, ctx: &mut Ctx<'_>) -> BackendResult<String>;
}

pub trait InferType {
    fn infer_type(&self, ctx: &Ctx<'_>) -> BackendResult<WasmType>;
}

/// Statements are emitted one per line; statements without output are dropped
impl ToWat for [Stmt] {
    fn to_wat(&self, ctx: &mut Ctx<'_>) -> BackendResult<String> {
        let mut out = Vec::new();
        for stmt in self {
            let wat = stmt.to_wat(ctx)?;
            if !wat.is_empty() {
                out.push(wat);
            }
        }
        Ok(out.join("\n"))
    }
}

/// Parse and lower a unit as the file `name`
pub fn compile_unit(ctx: &mut Ctx<'_>, name: &str, text: String) -> BackendResult<String> {
    ctx.sources.insert(name.to_owned(), text.clone());
    ctx.in_file(name, |ctx| {
        let module = parse_module(&text)?;
        module.stmts.to_wat(ctx)
    })
}

/// Join the non-empty parts with single spaces
pub(crate) fn join_parts<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let parts: Vec<String> = parts
        .into_iter()
        .map(|part| part.as_ref().to_owned())
        .filter(|part| !part.is_empty())
        .collect();
    parts.join(" ")
}

/// Wrap `parts` in an S-expression list
pub(crate) fn sexp<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    format!("({})", join_parts(parts))
}

/// A WebAssembly text string literal
pub(crate) fn wat_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_skips_empty_parts() {
        assert_eq!(join_parts(["func", "", "$__f", ""]), "func $__f");
        assert_eq!(sexp(["call", "$__f"]), "(call $__f)");
    }

    #[test]
    fn string_escapes() {
        assert_eq!(wat_string("console"), "\"console\"");
        assert_eq!(wat_string("a\"b\\c"), "\"a\\\"b\\\\c\"");
    }
}
