use std::path::Path;

use crate::result::BackendResult;

/// Access to the text of source units
///
/// The compiler asks for every unit it compiles through this trait: the
/// standard library, included files and their resolution relative to each other.
pub trait SourceLoader {
    /// Resolve `path` as referenced from the unit `from`
    ///
    /// Relative paths are resolved against the directory of `from`. Units without
    /// a directory component (and the root unit) resolve against the working directory.
    fn resolve(&self, from: Option<&str>, path: &str) -> String {
        let path = Path::new(path);
        if path.is_absolute() {
            return path.to_string_lossy().into_owned();
        }
        match from.and_then(|from| Path::new(from).parent()) {
            Some(dir) if !dir.as_os_str().is_empty() => dir.join(path).to_string_lossy().into_owned(),
            _ => path.to_string_lossy().into_owned(),
        }
    }

    fn read_to_string(&mut self, path: &str) -> BackendResult<String>;
}


#[cfg(test)]
mod tests {
    use super::test_util::MemoryLoader;
    use super::*;

    #[test]
    fn resolve_relative_to_including_unit() {
        let loader = MemoryLoader::default();
        assert_eq!(loader.resolve(Some("src/main.php"), "lib.php"), "src/lib.php");
        assert_eq!(loader.resolve(Some("$root"), "lib.php"), "lib.php");
        assert_eq!(loader.resolve(None, "std/core.php"), "std/core.php");
        assert_eq!(loader.resolve(Some("src/main.php"), "/abs/lib.php"), "/abs/lib.php");
    }
}
