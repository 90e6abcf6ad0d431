//! A small S-expression tree for WebAssembly text.
//!
//! The compiler emits WAT as flat text. To lay it out we read it back into a tree of
//! atoms and lists and print that tree with the `pretty` combinators.

use miette::{Diagnostic, SourceSpan};
use pretty::DocAllocator;
use thiserror::Error;

use crate::theme::ThemeExt;
use crate::types::*;

#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum SExpError {
    #[error("Unexpected `)`")]
    #[diagnostic(code("W-001"))]
    UnexpectedClose {
        #[label]
        span: SourceSpan,
    },
    #[error("Unclosed `(`")]
    #[diagnostic(code("W-002"))]
    Unclosed {
        #[label("opened here")]
        span: SourceSpan,
    },
    #[error("Unterminated string")]
    #[diagnostic(code("W-003"))]
    UnterminatedString {
        #[label]
        span: SourceSpan,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SExp {
    Atom(String),
    List(Vec<SExp>),
}

/// A sequence of toplevel forms, usually a single `(module ...)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wat {
    pub forms: Vec<SExp>,
}

impl Wat {
    pub fn parse(text: &str) -> Result<Wat, SExpError> {
        let mut parser = Parser { text, pos: 0 };
        let mut forms = Vec::new();
        while let Some(token) = parser.next_token()? {
            match token {
                Token::Open(start) => forms.push(parser.list(start)?),
                Token::Close(start) => {
                    return Err(SExpError::UnexpectedClose { span: (start, 1).into() });
                }
                Token::Atom(atom) => forms.push(SExp::Atom(atom.to_owned())),
            }
        }
        Ok(Wat { forms })
    }
}

enum Token<'t> {
    Open(usize),
    Close(usize),
    Atom(&'t str),
}

struct Parser<'t> {
    text: &'t str,
    pos: usize,
}

impl<'t> Parser<'t> {
    fn list(&mut self, start: usize) -> Result<SExp, SExpError> {
        let mut items = Vec::new();
        loop {
            match self.next_token()? {
                Some(Token::Open(inner)) => items.push(self.list(inner)?),
                Some(Token::Close(_)) => return Ok(SExp::List(items)),
                Some(Token::Atom(atom)) => items.push(SExp::Atom(atom.to_owned())),
                None => return Err(SExpError::Unclosed { span: (start, 1).into() }),
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Token<'t>>, SExpError> {
        let rest = &self.text[self.pos..];
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
        let start = self.pos;

        let Some(first) = trimmed.chars().next() else {
            return Ok(None);
        };
        match first {
            '(' => {
                self.pos += 1;
                Ok(Some(Token::Open(start)))
            }
            ')' => {
                self.pos += 1;
                Ok(Some(Token::Close(start)))
            }
            '"' => {
                let len = string_len(trimmed).ok_or(SExpError::UnterminatedString {
                    span: (start, trimmed.len()).into(),
                })?;
                self.pos += len;
                Ok(Some(Token::Atom(&trimmed[..len])))
            }
            _ => {
                let len = trimmed
                    .find(|c: char| c.is_whitespace() || c == '(' || c == ')')
                    .unwrap_or(trimmed.len());
                self.pos += len;
                Ok(Some(Token::Atom(&trimmed[..len])))
            }
        }
    }
}

/// The length of the string literal at the start of `s`, including both quotes
fn string_len(s: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in s.char_indices().skip(1) {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some(i + 1),
            _ => {}
        }
    }
    None
}

fn print_atom<'a>(atom: &'a str, alloc: &'a Alloc<'a>) -> Builder<'a> {
    match atom {
        "i32" | "i64" | "f32" | "f64" => alloc.typ(atom),
        _ if atom.starts_with('$') => alloc.ident(atom),
        _ if atom.starts_with('"') => alloc.string(atom),
        _ if atom.starts_with(|c: char| c.is_ascii_digit() || c == '-') => alloc.number(atom),
        _ => alloc.text(atom),
    }
}

impl<'a> Print<'a> for SExp {
    fn print(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        match self {
            SExp::Atom(atom) => print_atom(atom, alloc),
            SExp::List(items) => {
                let items = items.iter().enumerate().map(|(i, item)| match item {
                    SExp::Atom(head) if i == 0 => alloc.keyword(head),
                    item => item.print(cfg, alloc),
                });
                alloc
                    .text("(")
                    .append(alloc.intersperse(items, alloc.line()).nest(cfg.indent))
                    .append(alloc.text(")"))
                    .group()
            }
        }
    }
}

impl<'a> Print<'a> for Wat {
    fn print(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let forms = self.forms.iter().map(|form| form.print(cfg, alloc));
        alloc.intersperse(forms, alloc.hardline()).append(alloc.hardline())
    }
}

#[cfg(test)]
mod tests {
    use crate::{PrintCfg, PrintToString};

    use super::*;

    fn atom(s: &str) -> SExp {
        SExp::Atom(s.to_owned())
    }

    #[test]
    fn parse_nested_lists() {
        let wat = Wat::parse("(module\n(func $f (result i64) (i64.const 1)))").unwrap();
        assert_eq!(
            wat.forms,
            vec![SExp::List(vec![
                atom("module"),
                SExp::List(vec![
                    atom("func"),
                    atom("$f"),
                    SExp::List(vec![atom("result"), atom("i64")]),
                    SExp::List(vec![atom("i64.const"), atom("1")]),
                ]),
            ])]
        );
    }

    #[test]
    fn strings_keep_spaces_and_parens() {
        let wat = Wat::parse(r#"(export "a (b) \" c")"#).unwrap();
        assert_eq!(wat.forms, vec![SExp::List(vec![atom("export"), atom(r#""a (b) \" c""#)])]);
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(Wat::parse("(module"), Err(SExpError::Unclosed { .. })));
        assert!(matches!(Wat::parse("(module))"), Err(SExpError::UnexpectedClose { .. })));
        assert!(matches!(
            Wat::parse(r#"(export "x)"#),
            Err(SExpError::UnterminatedString { .. })
        ));
    }

    #[test]
    fn short_lists_stay_on_one_line() {
        let wat = Wat::parse("(module\n(func $f   (result i64)\n(i64.const 1)))").unwrap();
        assert_eq!(wat.print_to_string(None), "(module (func $f (result i64) (i64.const 1)))\n");
    }

    #[test]
    fn long_lists_break_with_nesting() {
        let wat =
            Wat::parse("(module (func $f (param $a i64) (result i64) (local.get $a)))").unwrap();
        let cfg = PrintCfg { width: 40, ..PrintCfg::default() };
        let expected = "\
(module
  (func
    $f
    (param $a i64)
    (result i64)
    (local.get $a)))
";
        assert_eq!(wat.print_to_string(Some(&cfg)), expected);
    }
}
