//! Symbol tables of a compilation run
//!
//! A run keeps one [FileScope] per compiled unit. Each file owns the namespaces
//! declared in it, and each namespace owns a single [VariableScope] whose keys
//! distinguish the namespace level from the bodies of its functions.

mod file;
mod namespace;
mod variables;

pub use file::*;
pub use namespace::*;
pub use variables::*;
