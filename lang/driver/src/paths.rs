use crate::fs::InMemorySource;

/// The name under which the core library is compiled
pub const CORE_PATH: &str = "std/core.php";

/// The core library is embedded in the binary
pub const CORE_SOURCE: &str = include_str!("../../../std/core.php");

/// An in-memory source serving the standard library units
pub fn std_source() -> InMemorySource {
    let mut source = InMemorySource::new();
    source.insert(CORE_PATH, CORE_SOURCE.to_owned());
    source
}
