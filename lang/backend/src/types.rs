use std::fmt;

use watling_lang_ast::Type;
use watling_lang_miette_util::ToMiette;

use crate::result::{BackendError, BackendResult};

/// The numeric value types of WebAssembly, plus `Void` for functions without a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WasmType {
    I32,
    I64,
    F32,
    F64,
    Void,
}

impl WasmType {
    /// Map a source type name to its WebAssembly type
    ///
    /// | source             | wasm |
    /// |--------------------|------|
    /// | `int`, `array`, `i64` | i64 |
    /// | `float`, `f64`     | f64  |
    /// | `i32`, `f32`       | itself |
    /// | `void`             | no value |
    pub fn from_name(name: &str) -> Option<WasmType> {
        match name {
            "int" | "array" | "i64" => Some(WasmType::I64),
            "float" | "f64" => Some(WasmType::F64),
            "i32" => Some(WasmType::I32),
            "f32" => Some(WasmType::F32),
            "void" => Some(WasmType::Void),
            _ => None,
        }
    }

    pub fn from_annotation(typ: &Type) -> BackendResult<WasmType> {
        WasmType::from_name(typ.name.path()).ok_or_else(|| BackendError::UnsupportedType {
            name: typ.name.id.clone(),
            span: typ.span.to_miette(),
        })
    }

    /// The `(result ..)` clause of a function signature; empty for `Void`
    pub fn result_clause(self) -> String {
        match self {
            WasmType::Void => String::new(),
            typ => format!("(result {typ})"),
        }
    }
}

impl fmt::Display for WasmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WasmType::I32 => "i32",
            WasmType::I64 => "i64",
            WasmType::F32 => "f32",
            WasmType::F64 => "f64",
            WasmType::Void => "void",
        };
        write!(f, "{s}")
    }
}
