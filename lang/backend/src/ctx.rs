use watling_lang_ast::{HashMap, NAMESPACE_SEPARATOR, Name};
use watling_lang_miette_util::ToMiette;

use crate::macros::MacroTable;
use crate::module::WatModule;
use crate::result::{BackendError, BackendResult};
use crate::scope::{FileScope, NamespaceScope, VariableScope};
use crate::source::SourceLoader;
use crate::types::WasmType;

/// The state of one compilation run
///
/// Owns every file scope of the run together with the stack of files,
/// namespaces and variable scopes that are currently entered. Entering any of
/// them goes through a closure, and the previous state is restored when the
/// closure returns, whether it succeeded or not.
pub struct Ctx<'a> {
    pub source: &'a mut dyn SourceLoader,
    /// File scopes keyed by resolved path
    files: HashMap<String, FileScope>,
    /// Paths of `files` in the order they were first entered
    file_order: Vec<String>,
    /// The entered files; the last one is the current file
    file_stack: Vec<String>,
    pub macros: MacroTable,
    pub module: WatModule,
    /// The text of every unit compiled so far
    pub sources: HashMap<String, String>,
    /// The innermost file a failure escaped from
    pub error_origin: Option<String>,
}

impl<'a> Ctx<'a> {
    pub fn new(source: &'a mut dyn SourceLoader) -> Self {
        Ctx {
            source,
            files: HashMap::default(),
            file_order: Vec::new(),
            file_stack: Vec::new(),
            macros: MacroTable::default(),
            module: WatModule::default(),
            sources: HashMap::default(),
            error_origin: None,
        }
    }

    pub fn current_file(&self) -> BackendResult<&FileScope> {
        self.file_stack
            .last()
            .and_then(|name| self.files.get(name))
            .ok_or(BackendError::NoActiveFile)
    }

    pub fn current_file_mut(&mut self) -> BackendResult<&mut FileScope> {
        self.file_stack
            .last()
            .and_then(|name| self.files.get_mut(name))
            .ok_or(BackendError::NoActiveFile)
    }

    pub fn namespace(&self) -> BackendResult<&NamespaceScope> {
        Ok(self.current_file()?.namespace())
    }

    pub fn namespace_mut(&mut self) -> BackendResult<&mut NamespaceScope> {
        Ok(self.current_file_mut()?.namespace_mut())
    }

    pub fn variables(&self) -> BackendResult<&VariableScope> {
        Ok(&self.namespace()?.variables)
    }

    pub fn variables_mut(&mut self) -> BackendResult<&mut VariableScope> {
        Ok(&mut self.namespace_mut()?.variables)
    }

    /// Whether a unit with this path has been entered during this run
    pub fn is_compiled(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    /// Run `f` with `name` as the current file
    ///
    /// The file scope is created on first use and reused afterwards. Entering a
    /// file that is already being compiled fails with [BackendError::IncludeCycle].
    pub fn in_file<T, F>(&mut self, name: &str, f: F) -> BackendResult<T>
    where
        F: FnOnce(&mut Ctx<'a>) -> BackendResult<T>,
    {
        if self.file_stack.iter().any(|entered| entered == name) {
            return Err(BackendError::IncludeCycle { path: name.to_owned(), span: None });
        }
        if !self.files.contains_key(name) {
            self.files.insert(name.to_owned(), FileScope::new(name));
            self.file_order.push(name.to_owned());
        }
        log::debug!("Entering file {name}");
        self.file_stack.push(name.to_owned());
        let res = f(self);
        self.file_stack.pop();
        if res.is_err() && self.error_origin.is_none() {
            self.error_origin = Some(name.to_owned());
        }
        res
    }

    /// Run `f` with `name` as the active namespace of the current file
    pub fn in_namespace<T, F>(&mut self, name: &str, f: F) -> BackendResult<T>
    where
        F: FnOnce(&mut Ctx<'a>) -> BackendResult<T>,
    {
        log::debug!("Entering namespace {name}");
        self.current_file_mut()?.enter_namespace(name);
        let res = f(self);
        self.current_file_mut()?.leave_namespace();
        res
    }

    /// Run `f` with `key` as the active variable scope of the active namespace
    pub fn in_variable_scope<T, F>(&mut self, key: &str, f: F) -> BackendResult<T>
    where
        F: FnOnce(&mut Ctx<'a>) -> BackendResult<T>,
    {
        self.variables_mut()?.enter(key);
        let res = f(self);
        self.variables_mut()?.leave();
        res
    }

    /// The files of the run other than the current one, in the order they were first entered
    fn other_files<'s>(&'s self, current: &'s FileScope) -> impl Iterator<Item = &'s FileScope> {
        self.file_order
            .iter()
            .filter(move |other| **other != current.name)
            .filter_map(move |other| self.files.get(other))
    }

    /// The namespace and the qualified symbol a called name refers to
    ///
    /// Included files are compiled in place, so an unqualified name that is
    /// unknown to the current file also resolves to a function declared in the
    /// same namespace of any file compiled earlier in the run.
    fn resolve(&self, name: &str) -> BackendResult<(String, String)> {
        let file = self.current_file()?;
        if name.contains(NAMESPACE_SEPARATOR) || file.knows_function(name) {
            return Ok(file.resolve_function(name));
        }
        let namespace = &file.namespace().name;
        let included = self
            .other_files(file)
            .filter_map(|other| other.find_namespace(namespace))
            .find_map(|ns| ns.function(name).map(|symbol| (ns.name.clone(), symbol.to_owned())));
        Ok(included.unwrap_or_else(|| file.resolve_function(name)))
    }

    /// The qualified symbol a called name refers to
    pub fn resolve_function(&self, name: &Name) -> BackendResult<String> {
        Ok(self.resolve(&name.id)?.1)
    }

    /// The declared type of a called function or macro
    ///
    /// The owning namespace is looked up in the current file first and then in
    /// every other file of the run, in the order the files were compiled.
    pub fn function_type(&self, name: &Name) -> BackendResult<WasmType> {
        let file = self.current_file()?;
        let (namespace, symbol) = self.resolve(&name.id)?;
        std::iter::once(file)
            .chain(self.other_files(file))
            .filter_map(|file| file.find_namespace(&namespace))
            .find_map(|ns| ns.variables.get_type_in(ns.decl_key(), &symbol))
            .ok_or_else(|| BackendError::UndeclaredSymbol {
                name: symbol,
                span: name.span.to_miette(),
            })
    }
}
