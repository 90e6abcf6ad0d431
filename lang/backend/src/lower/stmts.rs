use watling_lang_ast::*;

use super::ToWat;
use crate::ctx::Ctx;
use crate::result::BackendResult;
use crate::scope::{ROOT_NAMESPACE, UseAlias};

impl ToWat for Stmt {
    fn to_wat(&self, ctx: &mut Ctx<'_>) -> BackendResult<String> {
        match self {
            Stmt::Expr(ExprStmt { exp, .. }) => exp.to_wat(ctx),
            Stmt::Return(ret) => ret.to_wat(ctx),
            Stmt::Function(function) => function.to_wat(ctx),
            Stmt::Namespace(namespace) => namespace.to_wat(ctx),
            Stmt::Use(use_decl) => use_decl.to_wat(ctx),
            // Classes only carry attribute declarations and have no runtime representation
            Stmt::Class(_) => Ok(String::new()),
        }
    }
}

impl ToWat for Return {
    fn to_wat(&self, ctx: &mut Ctx<'_>) -> BackendResult<String> {
        match &self.exp {
            Some(exp) => Ok(format!("(return {})", exp.to_wat(ctx)?)),
            None => Ok(String::new()),
        }
    }
}

/// The statements of a namespace are lowered with the namespace active and
/// inside the namespace's own variable scope.
impl ToWat for Namespace {
    fn to_wat(&self, ctx: &mut Ctx<'_>) -> BackendResult<String> {
        let name = self.name.as_ref().map(|name| name.path()).unwrap_or(ROOT_NAMESPACE);
        ctx.in_namespace(name, |ctx| {
            let key = ctx.namespace()?.decl_key().to_owned();
            ctx.in_variable_scope(&key, |ctx| self.stmts.to_wat(ctx))
        })
    }
}

impl ToWat for Use {
    fn to_wat(&self, ctx: &mut Ctx<'_>) -> BackendResult<String> {
        let file = ctx.current_file_mut()?;
        for item in &self.items {
            let alias = item.alias.as_ref().map(|alias| alias.id.as_str());
            let alias = UseAlias::new(&item.path.id, alias, self.kind);
            log::debug!("Adding alias {} for {} in {}", alias.visible_name(), alias.path, file.name);
            file.add_use(alias);
        }
        Ok(String::new())
    }
}
