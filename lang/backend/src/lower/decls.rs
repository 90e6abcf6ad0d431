use watling_lang_ast::*;
use watling_lang_miette_util::ToMiette;

use super::{ToWat, join_parts, sexp, wat_string};
use crate::ctx::Ctx;
use crate::macros::Macro;
use crate::result::{BackendError, BackendResult};
use crate::types::WasmType;

const WASM_IMPORT: &str = "Wasm\\Core\\WasmImport";
const WASM_EXPORT: &str = "Wasm\\Core\\WasmExport";
const WASM_START: &str = "Wasm\\Core\\WasmStart";
const MACRO: &str = "Wasm\\Core\\Macro";

/// The code generation directives attached to a function
#[derive(Default)]
struct Directives<'a> {
    import: Option<&'a Attribute>,
    export: bool,
    start: bool,
    mac: Option<&'a Attribute>,
}

impl<'a> Directives<'a> {
    /// Attributes are resolved like class names in the current file.
    /// `WasmImport`, `WasmExport` and `WasmStart` are also recognized by their short names.
    fn collect(ctx: &Ctx<'_>, attributes: &'a [Attribute]) -> BackendResult<Self> {
        let file = ctx.current_file()?;
        let mut directives = Directives::default();
        for attr in attributes {
            let path = file.resolve_path(&attr.name.id);
            let short = attr.name.id.as_str();
            if path == WASM_IMPORT || short == "WasmImport" {
                directives.import = Some(attr);
            } else if path == WASM_EXPORT || short == "WasmExport" {
                directives.export = true;
            } else if path == WASM_START || short == "WasmStart" {
                directives.start = true;
            } else if path == MACRO {
                directives.mac = Some(attr);
            }
        }
        Ok(directives)
    }
}

fn invalid_attribute(attr: &Attribute, reason: &str) -> BackendError {
    BackendError::InvalidAttribute {
        name: attr.name.id.clone(),
        reason: reason.to_owned(),
        span: attr.span.to_miette(),
    }
}

fn string_arg<'a>(attr: &'a Attribute, position: usize, name: &str) -> BackendResult<&'a str> {
    match attr.arg(position, name) {
        Some(Exp::Str(s)) => Ok(&s.value),
        Some(_) => Err(invalid_attribute(attr, &format!("argument `{name}` must be a string"))),
        None => Err(invalid_attribute(attr, &format!("missing argument `{name}`"))),
    }
}

/// The module and field names of an import, from `["module", "field"]` or `"module.field"`
fn import_path(attr: &Attribute) -> BackendResult<Vec<String>> {
    let segments: Vec<String> = match attr.arg(0, "name") {
        Some(Exp::Array(array)) => array
            .as_strings()
            .ok_or_else(|| invalid_attribute(attr, "import path segments must be strings"))?
            .into_iter()
            .map(ToOwned::to_owned)
            .collect(),
        Some(Exp::Str(s)) => s.value.split('.').map(ToOwned::to_owned).collect(),
        Some(_) => return Err(invalid_attribute(attr, "import path must be an array or a string")),
        None => return Err(invalid_attribute(attr, "missing import path")),
    };
    if segments.is_empty() || segments.iter().any(String::is_empty) {
        return Err(invalid_attribute(attr, "import path segments must not be empty"));
    }
    Ok(segments)
}

/// Lowering helpers for function declarations
trait FunctionExt {
    fn register_macro(&self, ctx: &mut Ctx<'_>, attr: &Attribute) -> BackendResult;
    fn param_type(&self, param: &Param) -> BackendResult<WasmType>;
    fn check_body(&self) -> BackendResult;
}

impl FunctionExt for Function {
    /// Register the function as a macro: `#[Macro(pattern, type)]`
    fn register_macro(&self, ctx: &mut Ctx<'_>, attr: &Attribute) -> BackendResult {
        let pattern = string_arg(attr, 0, "macro")?;
        let type_name = string_arg(attr, 1, "type")?;
        let result = WasmType::from_name(type_name).ok_or_else(|| {
            BackendError::UnsupportedType { name: type_name.to_owned(), span: attr.span.to_miette() }
        })?;
        let mac = Macro::parse(pattern, result).ok_or_else(|| BackendError::InvalidMacroPattern {
            pattern: pattern.to_owned(),
            span: attr.span.to_miette(),
        })?;
        let symbol = ctx.namespace_mut()?.add_function(&self.name.id);
        ctx.macros.register(&symbol, mac);
        ctx.variables_mut()?.declare(&symbol, result, "");
        Ok(())
    }

    fn param_type(&self, param: &Param) -> BackendResult<WasmType> {
        let Some(typ) = &param.typ else {
            return Err(BackendError::MissingParameterType {
                name: param.var.name.clone(),
                function: self.name.id.clone(),
                span: param.span.to_miette(),
            });
        };
        match WasmType::from_annotation(typ)? {
            WasmType::Void => Err(BackendError::UnsupportedType {
                name: typ.name.id.clone(),
                span: typ.span.to_miette(),
            }),
            typ => Ok(typ),
        }
    }

    /// Function bodies are flat: declarations may only appear at file or namespace level
    fn check_body(&self) -> BackendResult {
        for stmt in &self.body {
            let kind = match stmt {
                Stmt::Function(_) => "function declaration",
                Stmt::Namespace(_) => "namespace declaration",
                _ => continue,
            };
            return Err(BackendError::UnsupportedConstruct {
                kind: format!("{kind} inside function {}", self.name.id),
                span: stmt.span().to_miette(),
            });
        }
        Ok(())
    }
}

/// Input:
///
/// ```text
/// #[WasmExport]
/// function sum(int $a, int $b): int
/// {
///     return $a + $b;
/// }
/// ```
///
/// Output:
///
/// ```wat
/// (func $__sum (export "sum") (param $a i64) (param $b i64) (result i64)
///   (return (i64.add (local.get $a) (local.get $b))))
/// ```
///
/// Imported functions only contribute an `(import ..)` to the module and macros
/// contribute nothing.
impl ToWat for Function {
    fn to_wat(&self, ctx: &mut Ctx<'_>) -> BackendResult<String> {
        let directives = Directives::collect(ctx, &self.attributes)?;
        if let Some(attr) = directives.mac {
            self.register_macro(ctx, attr)?;
            return Ok(String::new());
        }

        self.check_body()?;
        let symbol = ctx.namespace_mut()?.add_function(&self.name.id);

        let mut params = Vec::with_capacity(self.params.len());
        for param in &self.params {
            let typ = self.param_type(param)?;
            let name = &param.var.name;
            ctx.in_variable_scope(&symbol, |ctx| {
                ctx.variables_mut()?.declare(name, typ, "");
                Ok(())
            })?;
            params.push(format!("(param ${name} {typ})"));
        }

        let ret_typ = match &self.ret_typ {
            Some(typ) => WasmType::from_annotation(typ)?,
            None => WasmType::Void,
        };
        let result = ret_typ.result_clause();
        ctx.variables_mut()?.declare(&symbol, ret_typ, &result);

        if let Some(attr) = directives.import {
            let path = import_path(attr)?;
            let signature = sexp(
                ["func".to_owned(), symbol.clone()].into_iter().chain(params).chain([result]),
            );
            let module_path = join_parts(path.iter().map(|segment| wat_string(segment)));
            log::debug!("Importing {symbol} from {}", path.join("."));
            ctx.module.imports.push(format!("(import {module_path} {signature})"));
            return Ok(String::new());
        }

        if directives.start {
            log::debug!("Setting start function to {symbol}");
            ctx.module.start = Some(symbol.clone());
        }

        let export = if directives.export {
            format!("(export {})", wat_string(&self.name.id))
        } else {
            String::new()
        };

        let body = ctx.in_variable_scope(&symbol, |ctx| {
            let body = self.body.to_wat(ctx)?;
            let declarations = ctx.variables()?.declarations();
            Ok(join_parts([declarations, body]))
        })?;

        log::trace!("Emitting function {symbol}");
        Ok(sexp(
            ["func".to_owned(), symbol, export].into_iter().chain(params).chain([result, body]),
        ))
    }
}
