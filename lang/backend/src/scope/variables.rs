use watling_lang_ast::HashMap;
use watling_lang_miette_util::{Span, ToMiette};

use crate::result::{BackendError, BackendResult};
use crate::types::WasmType;

/// The scope key of module level code
pub const GLOBAL_SCOPE: &str = "__global__";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub typ: WasmType,
    /// The text emitted for this symbol in the prologue of its scope, possibly empty
    pub declaration: String,
}

/// Symbol tables keyed by scope
///
/// Exactly one key is active at any time. Declarations and lookups go to the
/// active key. Symbols stay in the table after their key has been left, so the
/// types of functions and variables remain available to later lookups.
#[derive(Debug, Clone)]
pub struct VariableScope {
    scopes: HashMap<String, Vec<Symbol>>,
    /// Stack of entered keys; the last one is active
    active: Vec<String>,
}

impl Default for VariableScope {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableScope {
    pub fn new() -> Self {
        let mut scopes = HashMap::default();
        scopes.insert(GLOBAL_SCOPE.to_owned(), Vec::new());
        VariableScope { scopes, active: vec![GLOBAL_SCOPE.to_owned()] }
    }

    pub fn active_key(&self) -> &str {
        self.active.last().map(String::as_str).unwrap_or(GLOBAL_SCOPE)
    }

    pub fn is_global(&self) -> bool {
        self.active_key() == GLOBAL_SCOPE
    }

    /// `global` or `local`, depending on the active key
    pub fn visibility(&self) -> &'static str {
        if self.is_global() { "global" } else { "local" }
    }

    /// Insert or overwrite a symbol in the active scope
    ///
    /// An overwritten symbol keeps its original position in the declaration order.
    pub fn declare(&mut self, name: &str, typ: WasmType, declaration: &str) {
        let key = self.active_key().to_owned();
        let symbols = self.scopes.entry(key).or_default();
        let symbol = Symbol { name: name.to_owned(), typ, declaration: declaration.to_owned() };
        match symbols.iter_mut().find(|s| s.name == name) {
            Some(existing) => *existing = symbol,
            None => symbols.push(symbol),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.lookup_in(self.active_key(), name)
    }

    pub fn lookup_in(&self, key: &str, name: &str) -> Option<&Symbol> {
        self.scopes.get(key)?.iter().find(|s| s.name == name)
    }

    pub fn get_type(&self, name: &str, span: Option<Span>) -> BackendResult<WasmType> {
        self.lookup(name).map(|s| s.typ).ok_or_else(|| BackendError::UndeclaredSymbol {
            name: name.to_owned(),
            span: span.to_miette(),
        })
    }

    pub fn get_type_in(&self, key: &str, name: &str) -> Option<WasmType> {
        self.lookup_in(key, name).map(|s| s.typ)
    }

    /// The non-empty declaration fragments of the active scope, in declaration order
    pub fn declarations(&self) -> String {
        self.scopes
            .get(self.active_key())
            .map(|symbols| {
                symbols
                    .iter()
                    .map(|s| s.declaration.as_str())
                    .filter(|d| !d.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default()
    }

    pub fn enter(&mut self, key: &str) {
        self.scopes.entry(key.to_owned()).or_default();
        self.active.push(key.to_owned());
    }

    pub fn leave(&mut self) {
        if self.active.len() > 1 {
            self.active.pop();
        }
    }

    /// Run `f` with `key` as the active scope and restore the previous key afterwards
    pub fn create<T, F>(&mut self, key: &str, f: F) -> T
    where
        F: FnOnce(&mut VariableScope) -> T,
    {
        self.enter(key);
        let res = f(self);
        self.leave();
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_global() {
        let scope = VariableScope::new();
        assert!(scope.is_global());
        assert_eq!(scope.visibility(), "global");
    }

    #[test]
    fn redeclaration_overwrites_in_place() {
        let mut scope = VariableScope::new();
        scope.declare("a", WasmType::I64, "(global $a i64)");
        scope.declare("b", WasmType::F64, "(global $b f64)");
        scope.declare("a", WasmType::I32, "(global $a i32)");
        assert_eq!(scope.get_type("a", None).unwrap(), WasmType::I32);
        assert_eq!(scope.declarations(), "(global $a i32) (global $b f64)");
    }

    #[test]
    fn declarations_skip_empty_fragments() {
        let mut scope = VariableScope::new();
        scope.create("$__f", |scope| {
            scope.declare("param", WasmType::I64, "");
            scope.declare("x", WasmType::I64, "(local $x i64)");
            assert_eq!(scope.declarations(), "(local $x i64)");
        });
    }

    #[test]
    fn create_restores_previous_key() {
        let mut scope = VariableScope::new();
        let inner = scope.create("$__f", |scope| {
            assert!(!scope.is_global());
            scope.create("$__g", |scope| scope.active_key().to_owned())
        });
        assert_eq!(inner, "$__g");
        assert!(scope.is_global());
    }

    #[test]
    fn create_restores_on_failure() {
        let mut scope = VariableScope::new();
        let res: BackendResult<()> =
            scope.create("$__f", |scope| scope.get_type("missing", None).map(|_| ()));
        assert!(matches!(res, Err(BackendError::UndeclaredSymbol { .. })));
        assert!(scope.is_global());
    }

    #[test]
    fn symbols_outlive_their_scope() {
        let mut scope = VariableScope::new();
        scope.create("$__f", |scope| scope.declare("x", WasmType::F32, "(local $x f32)"));
        assert!(scope.lookup("x").is_none());
        assert_eq!(scope.get_type_in("$__f", "x"), Some(WasmType::F32));
    }
}
