use watling_lang_ast::{NAMESPACE_SEPARATOR, UseKind, split_last_segment};

use super::namespace::{NamespaceScope, ROOT_NAMESPACE, join_path, qualified_name};

/// An alias introduced by a `use` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseAlias {
    /// The imported path without a leading separator, e.g. `Wasm\Core\i64_load`
    pub path: String,
    pub alias: Option<String>,
    pub kind: UseKind,
}

impl UseAlias {
    pub fn new(path: &str, alias: Option<&str>, kind: UseKind) -> Self {
        UseAlias {
            path: path.trim_start_matches(NAMESPACE_SEPARATOR).to_owned(),
            alias: alias.map(ToOwned::to_owned),
            kind,
        }
    }

    /// The name under which the path is visible in the importing file
    pub fn visible_name(&self) -> &str {
        self.alias.as_deref().unwrap_or_else(|| self.last_segment())
    }

    pub fn last_segment(&self) -> &str {
        split_last_segment(&self.path).1
    }

    /// The namespace the imported symbol lives in
    pub fn namespace(&self) -> &str {
        split_last_segment(&self.path).0.unwrap_or(ROOT_NAMESPACE)
    }
}

/// The symbol tables of one compiled unit
///
/// Every file starts in the root namespace. Namespaces are created on first
/// entry and kept for the rest of the run.
#[derive(Debug, Clone)]
pub struct FileScope {
    pub name: String,
    uses: Vec<UseAlias>,
    namespaces: Vec<NamespaceScope>,
    /// Stack of entered namespaces as indices into `namespaces`
    active: Vec<usize>,
}

impl FileScope {
    pub fn new(name: &str) -> Self {
        FileScope {
            name: name.to_owned(),
            uses: Vec::new(),
            namespaces: vec![NamespaceScope::new(ROOT_NAMESPACE)],
            active: vec![0],
        }
    }

    pub fn add_use(&mut self, alias: UseAlias) {
        self.uses.push(alias);
    }

    /// Whether an unqualified function name is declared in the active namespace or aliased
    pub fn knows_function(&self, name: &str) -> bool {
        self.namespace().has_function(name) || self.find_alias(name).is_some()
    }

    /// The active namespace
    pub fn namespace(&self) -> &NamespaceScope {
        &self.namespaces[self.active_index()]
    }

    pub fn namespace_mut(&mut self) -> &mut NamespaceScope {
        let idx = self.active_index();
        &mut self.namespaces[idx]
    }

    fn active_index(&self) -> usize {
        self.active.last().copied().unwrap_or(0)
    }

    pub fn find_namespace(&self, name: &str) -> Option<&NamespaceScope> {
        self.namespaces.iter().find(|ns| ns.name == name)
    }

    /// Make `name` the active namespace, creating it if necessary
    pub fn enter_namespace(&mut self, name: &str) {
        let idx = match self.namespaces.iter().position(|ns| ns.name == name) {
            Some(idx) => idx,
            None => {
                self.namespaces.push(NamespaceScope::new(name));
                self.namespaces.len() - 1
            }
        };
        self.active.push(idx);
    }

    pub fn leave_namespace(&mut self) {
        if self.active.len() > 1 {
            self.active.pop();
        }
    }

    fn find_alias(&self, name: &str) -> Option<&UseAlias> {
        self.uses.iter().find(|alias| alias.visible_name() == name)
    }

    /// Resolve an unqualified function name to its qualified form
    ///
    /// 1. A function registered under `name` in `namespace` (default: the active one)
    /// 2. An alias whose visible name is `name`
    /// 3. Otherwise `name` itself
    pub fn qualify(&self, name: &str, namespace: Option<&str>) -> String {
        let ns = match namespace {
            Some(namespace) => self.find_namespace(namespace),
            None => Some(self.namespace()),
        };
        if let Some(qualified) = ns.and_then(|ns| ns.function(name)) {
            return qualified.to_owned();
        }
        if let Some(alias) = self.find_alias(name) {
            return qualified_name(alias.namespace(), alias.last_segment());
        }
        name.to_owned()
    }

    /// The namespace an unqualified name refers to, using the same search as [FileScope::qualify]
    pub fn namespace_of(&self, name: &str) -> String {
        if self.namespace().has_function(name) {
            return self.namespace().name.clone();
        }
        if let Some(alias) = self.find_alias(name) {
            return alias.namespace().to_owned();
        }
        self.namespace().name.clone()
    }

    /// Split a name containing separators into its namespace and short name
    ///
    /// `\A\f` is absolute. `A\f` is resolved through a namespace alias matching
    /// its first segment, and relative to the active namespace otherwise.
    fn resolve_qualified(&self, name: &str) -> (String, String) {
        if let Some(absolute) = name.strip_prefix(NAMESPACE_SEPARATOR) {
            let (ns, short) = split_last_segment(absolute);
            return (ns.unwrap_or(ROOT_NAMESPACE).to_owned(), short.to_owned());
        }
        let (ns, short) = split_last_segment(name);
        let ns = ns.unwrap_or_default();
        let (first, rest) = ns.split_once(NAMESPACE_SEPARATOR).unwrap_or((ns, ""));
        let alias = self
            .uses
            .iter()
            .find(|alias| alias.kind == UseKind::Normal && alias.visible_name() == first);
        let resolved = match alias {
            Some(alias) if rest.is_empty() => alias.path.clone(),
            Some(alias) => format!("{}\\{rest}", alias.path),
            None => join_path(&self.namespace().name, ns),
        };
        (resolved, short.to_owned())
    }

    /// The namespace and the qualified symbol a called function name refers to
    pub fn resolve_function(&self, name: &str) -> (String, String) {
        if name.contains(NAMESPACE_SEPARATOR) {
            let (ns, short) = self.resolve_qualified(name);
            let symbol = qualified_name(&ns, &short);
            (ns, symbol)
        } else {
            let ns = self.namespace_of(name);
            let symbol = self.qualify(name, Some(&ns));
            (ns, symbol)
        }
    }

    /// The full path a class-like name refers to, e.g. `Wasm\Core\Macro` for `Macro`
    /// after `use Wasm\Core\Macro;`
    pub fn resolve_path(&self, name: &str) -> String {
        if name.contains(NAMESPACE_SEPARATOR) {
            let (ns, short) = self.resolve_qualified(name);
            join_path(&ns, &short)
        } else {
            join_path(&self.namespace_of(name), name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_with_uses(uses: &[(&str, Option<&str>, UseKind)]) -> FileScope {
        let mut file = FileScope::new("test.php");
        for (path, alias, kind) in uses {
            file.add_use(UseAlias::new(path, *alias, *kind));
        }
        file
    }

    #[test]
    fn qualify_prefers_local_function() {
        let mut file = file_with_uses(&[("Lib\\sum", None, UseKind::Function)]);
        file.namespace_mut().add_function("sum");
        assert_eq!(file.qualify("sum", None), "$__sum");
    }

    #[test]
    fn qualify_through_alias() {
        let file = file_with_uses(&[("Wasm\\Core\\i64_load", None, UseKind::Function)]);
        assert_eq!(file.qualify("i64_load", None), "$Wasm_Core_i64_load");
        assert_eq!(file.namespace_of("i64_load"), "Wasm\\Core");
    }

    #[test]
    fn qualify_through_renamed_alias() {
        let file = file_with_uses(&[("Wasm\\Core\\i64_load", Some("load"), UseKind::Function)]);
        assert_eq!(file.qualify("load", None), "$Wasm_Core_i64_load");
        assert_eq!(file.qualify("i64_load", None), "i64_load");
    }

    #[test]
    fn alias_matching_is_segment_aware() {
        let file = file_with_uses(&[("Lib\\my_load", None, UseKind::Function)]);
        assert_eq!(file.qualify("load", None), "load");
    }

    #[test]
    fn unresolved_name_is_unchanged() {
        let file = FileScope::new("test.php");
        assert_eq!(file.qualify("missing", None), "missing");
        assert_eq!(file.namespace_of("missing"), ROOT_NAMESPACE);
    }

    #[test]
    fn namespaces_are_stacked() {
        let mut file = FileScope::new("test.php");
        file.enter_namespace("A");
        file.namespace_mut().add_function("f");
        file.enter_namespace("B");
        assert_eq!(file.namespace().name, "B");
        file.leave_namespace();
        assert_eq!(file.qualify("f", None), "$A_f");
        file.leave_namespace();
        assert!(file.namespace().is_root());
        assert_eq!(file.qualify("f", Some("A")), "$A_f");
        file.leave_namespace();
        assert!(file.namespace().is_root());
    }

    #[test]
    fn qualified_function_names() {
        let mut file = file_with_uses(&[("Wasm\\Core", None, UseKind::Normal)]);
        assert_eq!(
            file.resolve_function("\\Wasm\\Core\\i64_load"),
            ("Wasm\\Core".to_owned(), "$Wasm_Core_i64_load".to_owned())
        );
        assert_eq!(
            file.resolve_function("Core\\i64_load"),
            ("Wasm\\Core".to_owned(), "$Wasm_Core_i64_load".to_owned())
        );
        file.enter_namespace("App");
        assert_eq!(
            file.resolve_function("Util\\f"),
            ("App\\Util".to_owned(), "$App_Util_f".to_owned())
        );
    }

    #[test]
    fn attribute_paths() {
        let mut file = file_with_uses(&[("Wasm\\Core\\WasmExport", None, UseKind::Normal)]);
        assert_eq!(file.resolve_path("WasmExport"), "Wasm\\Core\\WasmExport");
        assert_eq!(file.resolve_path("\\Wasm\\Core\\Macro"), "Wasm\\Core\\Macro");
        file.enter_namespace("Wasm\\Core");
        assert_eq!(file.resolve_path("Macro"), "Wasm\\Core\\Macro");
    }
}
