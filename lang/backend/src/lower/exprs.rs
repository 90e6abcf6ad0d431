use watling_lang_ast::*;
use watling_lang_miette_util::ToMiette;

use super::{InferType, ToWat, compile_unit, sexp};
use crate::ctx::Ctx;
use crate::result::{BackendError, BackendResult};
use crate::types::WasmType;

impl ToWat for Exp {
    fn to_wat(&self, ctx: &mut Ctx<'_>) -> BackendResult<String> {
        match self {
            Exp::Lit(lit) => lit.to_wat(ctx),
            Exp::Variable(var) => var.to_wat(ctx),
            Exp::Assign(assign) => assign.to_wat(ctx),
            Exp::BinOp(binop) => binop.to_wat(ctx),
            Exp::Call(call) => call.to_wat(ctx),
            Exp::Include(include) => include.to_wat(ctx),
            Exp::Str(_) | Exp::Array(_) | Exp::Neg(_) => Err(BackendError::UnsupportedConstruct {
                kind: self.describe().to_owned(),
                span: self.span().to_miette(),
            }),
        }
    }
}

impl InferType for Exp {
    fn infer_type(&self, ctx: &Ctx<'_>) -> BackendResult<WasmType> {
        match self {
            Exp::Lit(Literal { kind: LiteralKind::Int(_), .. }) => Ok(WasmType::I64),
            Exp::Lit(Literal { kind: LiteralKind::Float(_), .. }) => Ok(WasmType::F64),
            Exp::Variable(var) => ctx.variables()?.get_type(&var.name, var.span),
            // Only the left operand determines the type of an arithmetic operation
            Exp::BinOp(binop) => binop.lhs.infer_type(ctx),
            Exp::Call(call) => ctx.function_type(&call.name),
            Exp::Str(_) | Exp::Array(_) | Exp::Assign(_) | Exp::Neg(_) | Exp::Include(_) => {
                Err(BackendError::AmbiguousNodeType {
                    kind: self.describe().to_owned(),
                    span: self.span().to_miette(),
                })
            }
        }
    }
}

/// Input:
///
/// ```text
/// 42
/// 1.5
/// ```
///
/// Output:
///
/// ```wat
/// (i64.const 42)
/// (f64.const 1.5)
/// ```
impl ToWat for Literal {
    fn to_wat(&self, _ctx: &mut Ctx<'_>) -> BackendResult<String> {
        Ok(match self.kind {
            LiteralKind::Int(n) => format!("({}.const {n})", WasmType::I64),
            LiteralKind::Float(n) => format!("({}.const {n:?})", WasmType::F64),
        })
    }
}

impl ToWat for Variable {
    fn to_wat(&self, ctx: &mut Ctx<'_>) -> BackendResult<String> {
        let vis = ctx.variables()?.visibility();
        Ok(format!("({vis}.get ${})", self.name))
    }
}

/// Input:
///
/// ```text
/// $x = 1
/// ```
///
/// Output:
///
/// ```wat
/// (local.set $x (i64.const 1))
/// ```
///
/// and `(local $x i64)` among the declarations of the enclosing scope.
/// Parameters are already declared by their function signature and keep
/// their declaration.
impl ToWat for Assign {
    fn to_wat(&self, ctx: &mut Ctx<'_>) -> BackendResult<String> {
        let Assign { var, exp, .. } = self;
        let typ = exp.infer_type(ctx)?;
        let rhs = exp.to_wat(ctx)?;
        let variables = ctx.variables_mut()?;
        let vis = variables.visibility();
        let is_param =
            variables.lookup(&var.name).is_some_and(|symbol| symbol.declaration.is_empty());
        if !is_param {
            variables.declare(&var.name, typ, &format!("({vis} ${} {typ})", var.name));
        }
        Ok(format!("({vis}.set ${} {rhs})", var.name))
    }
}

/// Input:
///
/// ```text
/// $a + $b
/// ```
///
/// Output:
///
/// ```wat
/// (i64.add (local.get $a) (local.get $b))
/// ```
impl ToWat for BinOp {
    fn to_wat(&self, ctx: &mut Ctx<'_>) -> BackendResult<String> {
        let BinOp { op, lhs, rhs, .. } = self;
        let typ = lhs.infer_type(ctx)?;
        let lhs = lhs.to_wat(ctx)?;
        let rhs = rhs.to_wat(ctx)?;
        Ok(format!("({typ}.{} {lhs} {rhs})", op.instruction()))
    }
}

/// Input:
///
/// ```text
/// sum(1, 2)
/// ```
///
/// Output:
///
/// ```wat
/// (call $__sum (i64.const 1) (i64.const 2))
/// ```
///
/// Calls of macros are replaced by the macro's pattern instead.
impl ToWat for Call {
    fn to_wat(&self, ctx: &mut Ctx<'_>) -> BackendResult<String> {
        let Call { span, name, args } = self;
        let symbol = ctx.resolve_function(name)?;
        let args = args.iter().map(|arg| arg.to_wat(ctx)).collect::<BackendResult<Vec<_>>>()?;
        if let Some(mac) = ctx.macros.get(&symbol) {
            return mac.render(&args).ok_or_else(|| BackendError::MalformedMacroPattern {
                name: name.id.clone(),
                expected: mac.arity(),
                given: args.len(),
                span: span.to_miette(),
            });
        }
        log::trace!("Emitting call of {symbol}");
        Ok(sexp(std::iter::once("call".to_owned()).chain(std::iter::once(symbol)).chain(args)))
    }
}

/// The included unit is compiled in place. `*_once` variants emit nothing for
/// a unit that was already compiled during this run.
impl ToWat for Include {
    fn to_wat(&self, ctx: &mut Ctx<'_>) -> BackendResult<String> {
        let Include { span, kind, path } = self;
        let Exp::Str(StrLit { value: path, .. }) = &**path else {
            return Err(BackendError::UnsupportedConstruct {
                kind: format!("{kind} of a {}", path.describe()),
                span: span.to_miette(),
            });
        };
        let from = ctx.current_file()?.name.clone();
        let resolved = ctx.source.resolve(Some(&from), path);
        if kind.is_once() && ctx.is_compiled(&resolved) {
            log::debug!("Skipping {kind} of {resolved}: already compiled");
            return Ok(String::new());
        }
        let text = ctx.source.read_to_string(&resolved).map_err(|err| err.at(span.to_miette()))?;
        compile_unit(ctx, &resolved, text).map_err(|err| match err {
            BackendError::IncludeCycle { path, span: None } => {
                BackendError::IncludeCycle { path, span: span.to_miette() }
            }
            err => err,
        })
    }
}
