use std::path::{Path, PathBuf};

pub use file_system::FileSystemSource;

use watling_lang_ast::HashMap;

use crate::result::DriverError;

pub trait FileSource {
    /// Check if a file with the given path exists
    fn exists(&mut self, path: &Path) -> bool;
    /// Read the contents of a file with the given path
    fn read_to_string(&mut self, path: &Path) -> Result<String, DriverError>;
    /// Write the contents of a file with the given path
    ///
    /// Depending on the source, this may write to disk or to memory
    fn write_string(&mut self, path: &Path, source: &str) -> Result<(), DriverError>;
    /// If a path is requested that is not managed by this source, fall back to another source
    fn fallback_to<S: FileSource>(self, fallback: S) -> OverlaySource<Self, S>
    where
        Self: Sized,
    {
        OverlaySource::new(self, fallback)
    }
}

mod file_system {
    use std::io;
    use std::sync::Arc;

    use super::*;

    /// A file source that reads from and writes to the file system
    ///
    /// Relative paths are resolved against `root`.
    pub struct FileSystemSource {
        root: PathBuf,
    }

    impl FileSystemSource {
        pub fn new<P: AsRef<Path>>(root: P) -> Self {
            Self { root: root.as_ref().to_path_buf() }
        }
    }

    impl FileSource for FileSystemSource {
        fn exists(&mut self, path: &Path) -> bool {
            self.root.join(path).is_file()
        }

        fn read_to_string(&mut self, path: &Path) -> Result<String, DriverError> {
            let full_path = self.root.join(path);
            let source = std::fs::read_to_string(&full_path).map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => DriverError::FileNotFound(path.to_path_buf()),
                _ => DriverError::Io(Arc::new(err)),
            })?;
            // Windows checkouts may carry \r\n line endings.
            // Spans are computed on \n line endings on all platforms.
            Ok(source.replace("\r\n", "\n"))
        }

        fn write_string(&mut self, path: &Path, source: &str) -> Result<(), DriverError> {
            let full_path = self.root.join(path);
            std::fs::write(&full_path, source).map_err(Arc::new).map_err(DriverError::Io)
        }
    }
}

/// A file source that keeps files in memory
#[derive(Default)]
pub struct InMemorySource {
    files: HashMap<PathBuf, String>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<P: Into<PathBuf>>(&mut self, path: P, source: String) {
        self.files.insert(path.into(), source);
    }
}

impl FileSource for InMemorySource {
    fn exists(&mut self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read_to_string(&mut self, path: &Path) -> Result<String, DriverError> {
        self.files.get(path).cloned().ok_or_else(|| DriverError::FileNotFound(path.to_path_buf()))
    }

    fn write_string(&mut self, path: &Path, source: &str) -> Result<(), DriverError> {
        self.files.insert(path.to_path_buf(), source.to_owned());
        Ok(())
    }
}

/// A source that first tries to access files from the first source, and falls back to the second
pub struct OverlaySource<S1, S2> {
    first: S1,
    second: S2,
}

impl<S1, S2> OverlaySource<S1, S2> {
    pub fn new(first: S1, second: S2) -> Self {
        Self { first, second }
    }
}

impl<S1, S2> FileSource for OverlaySource<S1, S2>
where
    S1: FileSource,
    S2: FileSource,
{
    fn exists(&mut self, path: &Path) -> bool {
        self.first.exists(path) || self.second.exists(path)
    }

    fn read_to_string(&mut self, path: &Path) -> Result<String, DriverError> {
        match self.first.read_to_string(path) {
            Ok(source) => Ok(source),
            Err(DriverError::FileNotFound(_)) => self.second.read_to_string(path),
            Err(err) => Err(err),
        }
    }

    fn write_string(&mut self, path: &Path, source: &str) -> Result<(), DriverError> {
        if self.first.exists(path) {
            self.first.write_string(path, source)
        } else {
            self.second.write_string(path, source)
        }
    }
}
