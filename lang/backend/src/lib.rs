//! # Code generation
//!
//! Lowers the syntax tree to WebAssembly text.
//!
//! The [Compiler] compiles the standard library units followed by a root unit.
//! While lowering, the [Ctx] tracks one [FileScope] per unit, the namespaces
//! declared in each file and a [VariableScope] per namespace. Functions
//! annotated with `#[Macro]` are recorded in the [MacroTable] and substituted
//! at their call sites.

mod ctx;
mod lower;
mod macros;
mod module;
mod result;
mod scope;
mod source;
mod types;

pub use ctx::Ctx;
pub use lower::{InferType, ToWat, compile_unit};
pub use macros::{Macro, MacroTable};
pub use module::{Compiler, CompilerConfig, WatModule};
pub use result::{BackendError, BackendResult};
pub use scope::*;
pub use source::SourceLoader;
pub use types::WasmType;
