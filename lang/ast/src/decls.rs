use derivative::Derivative;
use watling_lang_miette_util::Span;

use crate::{Exp, HasSpan, Ident, Name, Variable};

/// A parsed source file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Module {
    pub stmts: Vec<Stmt>,
}

/// A statement
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(ExprStmt),
    Return(Return),
    Function(Function),
    Namespace(Namespace),
    Use(Use),
    Class(Class),
}

impl HasSpan for Stmt {
    fn span(&self) -> Option<Span> {
        match self {
            Stmt::Expr(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Function(s) => s.span,
            Stmt::Namespace(s) => s.span,
            Stmt::Use(s) => s.span,
            Stmt::Class(s) => s.span,
        }
    }
}

/// An expression evaluated for its effect, `exp;`
#[derive(Debug, Clone, Derivative)]
#[derivative(PartialEq)]
pub struct ExprStmt {
    #[derivative(PartialEq = "ignore")]
    pub span: Option<Span>,
    pub exp: Exp,
}

#[derive(Debug, Clone, Derivative)]
#[derivative(PartialEq)]
pub struct Return {
    #[derivative(PartialEq = "ignore")]
    pub span: Option<Span>,
    pub exp: Option<Exp>,
}

// Functions
//
//

/// A top-level function declaration
///
/// ```text
/// #[WasmExport]
/// function add(int $a, int $b): int { return $a + $b; }
/// ```
#[derive(Debug, Clone, Derivative)]
#[derivative(PartialEq)]
pub struct Function {
    #[derivative(PartialEq = "ignore")]
    pub span: Option<Span>,
    pub attributes: Vec<Attribute>,
    pub name: Ident,
    pub params: Vec<Param>,
    pub ret_typ: Option<Type>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, Derivative)]
#[derivative(PartialEq)]
pub struct Param {
    #[derivative(PartialEq = "ignore")]
    pub span: Option<Span>,
    pub typ: Option<Type>,
    pub var: Variable,
    /// Default values are parsed but have no effect on the generated code
    pub default: Option<Exp>,
}

/// A type annotation such as `int` or `?float`
#[derive(Debug, Clone, Derivative)]
#[derivative(PartialEq)]
pub struct Type {
    #[derivative(PartialEq = "ignore")]
    pub span: Option<Span>,
    pub name: Name,
    pub nullable: bool,
}

impl Type {
    pub fn from_string(name: &str) -> Self {
        Type { span: None, name: Name::from_string(name), nullable: false }
    }
}

// Attributes
//
//

/// An attribute `#[Name(args...)]` attached to a declaration
#[derive(Debug, Clone, Derivative)]
#[derivative(PartialEq)]
pub struct Attribute {
    #[derivative(PartialEq = "ignore")]
    pub span: Option<Span>,
    pub name: Name,
    pub args: Vec<Arg>,
}

impl Attribute {
    /// Look up an argument either by its parameter name or by its position
    ///
    /// A named argument takes precedence over a positional one.
    pub fn arg(&self, position: usize, name: &str) -> Option<&Exp> {
        self.args
            .iter()
            .find(|arg| arg.name.as_ref().is_some_and(|n| n.id == name))
            .or_else(|| self.args.get(position).filter(|arg| arg.name.is_none()))
            .map(|arg| &arg.value)
    }
}

impl HasSpan for Attribute {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

/// An attribute argument, optionally named: `value` or `name: value`
#[derive(Debug, Clone, Derivative)]
#[derivative(PartialEq)]
pub struct Arg {
    #[derivative(PartialEq = "ignore")]
    pub span: Option<Span>,
    pub name: Option<Ident>,
    pub value: Exp,
}

// Namespaces
//
//

/// A namespace declaration
///
/// Both the braced form `namespace A\B { ... }` and the statement form
/// `namespace A\B;` are represented with the statements they govern.
/// A braced namespace without a name refers to the global namespace.
#[derive(Debug, Clone, Derivative)]
#[derivative(PartialEq)]
pub struct Namespace {
    #[derivative(PartialEq = "ignore")]
    pub span: Option<Span>,
    pub name: Option<Name>,
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UseKind {
    /// `use A\B;` imports a class or namespace
    Normal,
    /// `use function A\b;`
    Function,
    /// `use const A\B;`
    Const,
}

/// A `use` declaration, possibly with several comma separated items
#[derive(Debug, Clone, Derivative)]
#[derivative(PartialEq)]
pub struct Use {
    #[derivative(PartialEq = "ignore")]
    pub span: Option<Span>,
    pub kind: UseKind,
    pub items: Vec<UseItem>,
}

/// A single imported path with an optional alias, `A\B as C`
#[derive(Debug, Clone, Derivative)]
#[derivative(PartialEq)]
pub struct UseItem {
    #[derivative(PartialEq = "ignore")]
    pub span: Option<Span>,
    pub path: Name,
    pub alias: Option<Ident>,
}

impl UseItem {
    /// The name under which the imported path is visible
    pub fn visible_name(&self) -> &str {
        match &self.alias {
            Some(alias) => &alias.id,
            None => self.path.last_segment(),
        }
    }
}

// Classes
//
//

/// A class declaration; only its name and attributes are retained
#[derive(Debug, Clone, Derivative)]
#[derivative(PartialEq)]
pub struct Class {
    #[derivative(PartialEq = "ignore")]
    pub span: Option<Span>,
    pub attributes: Vec<Attribute>,
    pub name: Ident,
}
