use lalrpop_util::ParseError;
use watling_lang_ast::{
    Exp, HasSpan, Literal, LiteralKind, Module, Name, Namespace, Neg, Span, Stmt,
};

use crate::lexer::{LexerError, LexicalError, Token};

pub fn span(l: usize, r: usize) -> Span {
    Span::new(l, r)
}

/// A top-level item of a file
///
/// The statement form `namespace A\B;` governs every statement up to the next
/// such header, so it is parsed as a marker and folded into a [Namespace] afterwards.
#[derive(Debug, Clone)]
pub enum Item {
    Header { span: Span, name: Name },
    Stmt(Stmt),
}

pub fn fold_namespaces(items: Vec<Item>) -> Module {
    let mut stmts = Vec::new();
    let mut current: Option<Namespace> = None;
    for item in items {
        match item {
            Item::Header { span, name } => {
                stmts.extend(current.take().map(Stmt::Namespace));
                current = Some(Namespace { span: Some(span), name: Some(name), stmts: vec![] });
            }
            Item::Stmt(stmt) => match &mut current {
                Some(ns) => {
                    if let (Some(ns_span), Some(stmt_span)) = (ns.span, stmt.span()) {
                        ns.span = Some(ns_span.merge(stmt_span));
                    }
                    ns.stmts.push(stmt)
                }
                None => stmts.push(stmt),
            },
        }
    }
    stmts.extend(current.map(Stmt::Namespace));
    Module { stmts }
}

/// An operand of a multiplicative expression
#[derive(Debug, Clone)]
pub enum Operand {
    /// An integer literal with all of its leading minus signs applied
    Int { span: Span, value: i128 },
    Exp(Exp),
}

impl Operand {
    /// Unary minus; literals are negated in place
    pub fn negate(self, span: Span) -> Operand {
        match self {
            Operand::Int { value, .. } => Operand::Int { span, value: -value },
            Operand::Exp(Exp::Lit(Literal { kind: LiteralKind::Int(n), .. })) => {
                Operand::Int { span, value: -i128::from(n) }
            }
            Operand::Exp(Exp::Lit(Literal { kind: LiteralKind::Float(n), .. })) => {
                Operand::Exp(Exp::Lit(Literal { span: Some(span), kind: LiteralKind::Float(-n) }))
            }
            Operand::Exp(exp) => Operand::Exp(Exp::Neg(Neg { span: Some(span), exp: Box::new(exp) })),
        }
    }

    pub fn into_exp(self) -> Result<Exp, ParseError<usize, Token, LexerError>> {
        match self {
            Operand::Int { span, value } => {
                let n = i64::try_from(value).map_err(|_| ParseError::User {
                    error: LexerError {
                        kind: LexicalError::InvalidNumber,
                        start: span.start(),
                        end: span.end(),
                    },
                })?;
                Ok(Exp::Lit(Literal { span: Some(span), kind: LiteralKind::Int(n) }))
            }
            Operand::Exp(exp) => Ok(exp),
        }
    }
}
