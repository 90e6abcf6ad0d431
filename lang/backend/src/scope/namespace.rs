use watling_lang_ast::HashMap;

use super::variables::{GLOBAL_SCOPE, VariableScope};

/// The name of the namespace every file starts in
pub const ROOT_NAMESPACE: &str = "\\";

/// Form the module level identifier of `name` declared in `namespace`
///
/// Namespace separators are replaced by underscores, so `i64_load` in
/// `Wasm\Core` becomes `$Wasm_Core_i64_load` and `sum` in the root namespace
/// becomes `$__sum`.
pub fn qualified_name(namespace: &str, name: &str) -> String {
    format!("${namespace}\\{name}").replace('\\', "_")
}

/// Join a namespace path and a name with a separator; the root namespace adds nothing
pub fn join_path(namespace: &str, name: &str) -> String {
    if namespace.is_empty() || namespace == ROOT_NAMESPACE {
        name.to_owned()
    } else {
        format!("{namespace}\\{name}")
    }
}

#[derive(Debug, Clone)]
pub struct NamespaceScope {
    pub name: String,
    /// Short function names mapped to their qualified names
    functions: HashMap<String, String>,
    pub variables: VariableScope,
}

impl NamespaceScope {
    pub fn new(name: &str) -> Self {
        NamespaceScope {
            name: name.to_owned(),
            functions: HashMap::default(),
            variables: VariableScope::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.name == ROOT_NAMESPACE
    }

    /// The variable scope key for code directly inside this namespace
    pub fn decl_key(&self) -> &str {
        if self.is_root() { GLOBAL_SCOPE } else { &self.name }
    }

    pub fn qualify(&self, name: &str) -> String {
        qualified_name(&self.name, name)
    }

    /// Register a function and return its qualified name
    pub fn add_function(&mut self, name: &str) -> String {
        let qualified = self.qualify(name);
        self.functions.insert(name.to_owned(), qualified.clone());
        qualified
    }

    pub fn function(&self, name: &str) -> Option<&str> {
        self.functions.get(name).map(String::as_str)
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualification() {
        assert_eq!(qualified_name(ROOT_NAMESPACE, "sum"), "$__sum");
        assert_eq!(qualified_name("Wasm\\Core", "i64_load"), "$Wasm_Core_i64_load");
    }

    #[test]
    fn qualification_is_deterministic() {
        let mut ns = NamespaceScope::new("App");
        let first = ns.add_function("add");
        let second = ns.add_function("add");
        assert_eq!(first, second);
        assert_ne!(first, NamespaceScope::new("Lib").qualify("add"));
    }

    #[test]
    fn root_namespace_declares_globally() {
        assert_eq!(NamespaceScope::new(ROOT_NAMESPACE).decl_key(), GLOBAL_SCOPE);
        assert_eq!(NamespaceScope::new("App").decl_key(), "App");
    }

    #[test]
    fn join_namespace_path() {
        assert_eq!(join_path(ROOT_NAMESPACE, "f"), "f");
        assert_eq!(join_path("Wasm\\Core", "Macro"), "Wasm\\Core\\Macro");
    }
}
