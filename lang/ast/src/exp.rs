use std::fmt;

use derivative::Derivative;
use watling_lang_miette_util::Span;

use crate::{HasSpan, Name};

/// An expression
#[derive(Debug, Clone, PartialEq)]
pub enum Exp {
    Lit(Literal),
    Str(StrLit),
    Array(ArrayLit),
    Variable(Variable),
    Assign(Assign),
    BinOp(BinOp),
    Neg(Neg),
    Call(Call),
    Include(Include),
}

impl Exp {
    /// A short human readable description of the node, used in diagnostics
    pub fn describe(&self) -> &'static str {
        match self {
            Exp::Lit(Literal { kind: LiteralKind::Int(_), .. }) => "integer literal",
            Exp::Lit(Literal { kind: LiteralKind::Float(_), .. }) => "float literal",
            Exp::Str(_) => "string literal",
            Exp::Array(_) => "array literal",
            Exp::Variable(_) => "variable",
            Exp::Assign(_) => "assignment",
            Exp::BinOp(_) => "binary operation",
            Exp::Neg(_) => "negation",
            Exp::Call(_) => "function call",
            Exp::Include(_) => "include expression",
        }
    }
}

impl HasSpan for Exp {
    fn span(&self) -> Option<Span> {
        match self {
            Exp::Lit(e) => e.span,
            Exp::Str(e) => e.span,
            Exp::Array(e) => e.span,
            Exp::Variable(e) => e.span,
            Exp::Assign(e) => e.span,
            Exp::BinOp(e) => e.span,
            Exp::Neg(e) => e.span,
            Exp::Call(e) => e.span,
            Exp::Include(e) => e.span,
        }
    }
}

// Literals
//
//

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralKind {
    Int(i64),
    Float(f64),
}

/// A numeric literal
#[derive(Debug, Clone, Derivative)]
#[derivative(PartialEq)]
pub struct Literal {
    #[derivative(PartialEq = "ignore")]
    pub span: Option<Span>,
    pub kind: LiteralKind,
}

/// A string literal with its escapes already resolved
#[derive(Debug, Clone, Derivative)]
#[derivative(PartialEq)]
pub struct StrLit {
    #[derivative(PartialEq = "ignore")]
    pub span: Option<Span>,
    pub value: String,
}

/// An array literal `[a, b, c]`
#[derive(Debug, Clone, Derivative)]
#[derivative(PartialEq)]
pub struct ArrayLit {
    #[derivative(PartialEq = "ignore")]
    pub span: Option<Span>,
    pub items: Vec<Exp>,
}

impl ArrayLit {
    /// The items of the array if all of them are string literals
    pub fn as_strings(&self) -> Option<Vec<&str>> {
        self.items
            .iter()
            .map(|item| match item {
                Exp::Str(s) => Some(s.value.as_str()),
                _ => None,
            })
            .collect()
    }
}

// Variables
//
//

/// A variable occurrence `$name`; the sigil is not part of `name`
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Variable {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub name: String,
}

impl Variable {
    pub fn from_string(name: &str) -> Self {
        Variable { span: None, name: name.to_owned() }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.name)
    }
}

/// An assignment `$var = exp`
#[derive(Debug, Clone, Derivative)]
#[derivative(PartialEq)]
pub struct Assign {
    #[derivative(PartialEq = "ignore")]
    pub span: Option<Span>,
    pub var: Variable,
    pub exp: Box<Exp>,
}

// Arithmetic
//
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOpKind {
    /// The WebAssembly instruction suffix implementing the operator
    pub fn instruction(&self) -> &'static str {
        match self {
            BinOpKind::Add => "add",
            BinOpKind::Sub => "sub",
            BinOpKind::Mul => "mul",
            BinOpKind::Div => "div",
        }
    }
}

impl fmt::Display for BinOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinOpKind::Add => "+",
            BinOpKind::Sub => "-",
            BinOpKind::Mul => "*",
            BinOpKind::Div => "/",
        };
        write!(f, "{s}")
    }
}

/// A binary arithmetic operation
#[derive(Debug, Clone, Derivative)]
#[derivative(PartialEq)]
pub struct BinOp {
    #[derivative(PartialEq = "ignore")]
    pub span: Option<Span>,
    pub op: BinOpKind,
    pub lhs: Box<Exp>,
    pub rhs: Box<Exp>,
}

/// Unary minus applied to a non-literal expression
#[derive(Debug, Clone, Derivative)]
#[derivative(PartialEq)]
pub struct Neg {
    #[derivative(PartialEq = "ignore")]
    pub span: Option<Span>,
    pub exp: Box<Exp>,
}

// Calls
//
//

/// A call of a named function `name(args...)`
#[derive(Debug, Clone, Derivative)]
#[derivative(PartialEq)]
pub struct Call {
    #[derivative(PartialEq = "ignore")]
    pub span: Option<Span>,
    pub name: Name,
    pub args: Vec<Exp>,
}

// File inclusion
//
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncludeKind {
    Include,
    IncludeOnce,
    Require,
    RequireOnce,
}

impl IncludeKind {
    /// Whether an already compiled file is skipped
    pub fn is_once(&self) -> bool {
        matches!(self, IncludeKind::IncludeOnce | IncludeKind::RequireOnce)
    }
}

impl fmt::Display for IncludeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IncludeKind::Include => "include",
            IncludeKind::IncludeOnce => "include_once",
            IncludeKind::Require => "require",
            IncludeKind::RequireOnce => "require_once",
        };
        write!(f, "{s}")
    }
}

/// An `include`/`require` expression
#[derive(Debug, Clone, Derivative)]
#[derivative(PartialEq)]
pub struct Include {
    #[derivative(PartialEq = "ignore")]
    pub span: Option<Span>,
    pub kind: IncludeKind,
    pub path: Box<Exp>,
}
