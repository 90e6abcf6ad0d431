use std::path::Path;

use miette::NamedSource;

use watling_lang_backend::{BackendError, BackendResult, Compiler, CompilerConfig, SourceLoader};
use watling_lang_printer::Wat;

use crate::cache::Cache;
use crate::fs::*;
use crate::paths::std_source;
use crate::result::{DriverError, MainError, MainResult};

/// A database tracking the source files of a compilation
pub struct Database {
    /// The source provider of the files, with the standard library layered on top
    pub source: Box<dyn FileSource>,
    /// The source code text of each file read so far
    pub files: Cache<String>,
    /// The file the last failed compilation originated in
    error_origin: Option<String>,
}

impl Database {
    pub fn from_source<S: FileSource + 'static>(source: S) -> Self {
        Self {
            source: Box::new(std_source().fallback_to(source)),
            files: Cache::default(),
            error_origin: None,
        }
    }

    /// Create a new database reading files relative to the current working directory
    pub fn from_cwd() -> Self {
        Self::from_source(FileSystemSource::new("."))
    }

    // Source
    //
    //

    pub fn source(&mut self, path: &str) -> Result<String, DriverError> {
        match self.files.get_unless_stale(path) {
            Some(source) => {
                log::debug!("Found source in cache: {path}");
                Ok(source.clone())
            }
            None => self.recompute_source(path),
        }
    }

    fn recompute_source(&mut self, path: &str) -> Result<String, DriverError> {
        log::debug!("Reading source: {path}");
        let source = self.source.read_to_string(Path::new(path))?;
        self.files.insert(path.to_owned(), source.clone());
        Ok(source)
    }

    pub fn write_source(&mut self, path: &Path, source: &str) -> MainResult {
        self.files.invalidate(&path.to_string_lossy());
        self.source.write_string(path, source).map_err(MainError::from)
    }

    // Compilation
    //
    //

    /// Compile the file at `path` together with the standard library to WebAssembly text
    ///
    /// Files included by the root are resolved relative to its directory.
    pub fn compile(&mut self, path: &Path) -> MainResult<String> {
        let name = path.to_string_lossy().into_owned();
        self.error_origin = None;
        let text = self.source(&name)?;

        let config = CompilerConfig { root_name: name.clone(), ..CompilerConfig::default() };
        let mut compiler = Compiler::new(config, self);
        let result = compiler.compile_root(&text);
        let origin = compiler.error_origin().map(ToOwned::to_owned);

        result.map_err(|err| {
            self.error_origin = origin.or(Some(name));
            MainError::from(err)
        })
    }

    /// Compile the file at `path` and read the result back as a tree for pretty printing
    pub fn compile_pretty(&mut self, path: &Path) -> MainResult<Wat> {
        let wat = self.compile(path)?;
        Ok(Wat::parse(&wat)?)
    }

    /// Turn an error into a report, attaching the text of the file it originated in
    pub fn pretty_error(&self, err: MainError) -> miette::Report {
        let origin = match err {
            MainError::Printer(_) | MainError::Driver(_) => None,
            _ => self.error_origin.as_deref(),
        };
        let miette_error: miette::Error = err.into();
        match origin.and_then(|name| Some((name, self.files.get_even_if_stale(name)?))) {
            Some((name, source)) => {
                miette_error.with_source_code(NamedSource::new(name, source.to_owned()))
            }
            None => miette_error,
        }
    }

    pub fn error_origin(&self) -> Option<&str> {
        self.error_origin.as_deref()
    }
}

impl SourceLoader for Database {
    fn read_to_string(&mut self, path: &str) -> BackendResult<String> {
        self.source(path).map_err(|err| match err {
            DriverError::FileNotFound(_) => {
                BackendError::FileNotFound { path: path.to_owned(), span: None }
            }
            err => BackendError::Io { path: path.to_owned(), message: err.to_string() },
        })
    }
}
