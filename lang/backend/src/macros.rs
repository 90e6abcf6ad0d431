//! Call-site text substitution
//!
//! A function annotated with `#[Macro(pattern, type)]` has no body in the
//! generated module. Calls to it are replaced by its pattern, with every `%s`
//! filled by the generated text of the corresponding argument.

use watling_lang_ast::HashMap;

use crate::types::WasmType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Macro {
    /// The literal text around the placeholders; one more than the number of placeholders
    segments: Vec<String>,
    pub result: WasmType,
}

impl Macro {
    /// Parse a pattern with `%s` placeholders and `%%` escapes
    ///
    /// Returns `None` if the pattern contains any other `%` sequence.
    pub fn parse(pattern: &str, result: WasmType) -> Option<Macro> {
        let mut segments = vec![String::new()];
        let mut chars = pattern.chars();
        while let Some(c) = chars.next() {
            if c != '%' {
                segments.last_mut()?.push(c);
                continue;
            }
            match chars.next() {
                Some('s') => segments.push(String::new()),
                Some('%') => segments.last_mut()?.push('%'),
                _ => return None,
            }
        }
        Some(Macro { segments, result })
    }

    /// The number of arguments the pattern expects
    pub fn arity(&self) -> usize {
        self.segments.len() - 1
    }

    /// Substitute the arguments into the pattern; `None` if their number does not match
    pub fn render(&self, args: &[String]) -> Option<String> {
        if args.len() != self.arity() {
            return None;
        }
        let mut out = String::new();
        for (idx, segment) in self.segments.iter().enumerate() {
            out.push_str(segment);
            if let Some(arg) = args.get(idx) {
                out.push_str(arg);
            }
        }
        Some(out)
    }
}

/// Registered macros, keyed by the qualified name of their function
#[derive(Debug, Clone, Default)]
pub struct MacroTable {
    macros: HashMap<String, Macro>,
}

impl MacroTable {
    pub fn register(&mut self, name: &str, mac: Macro) {
        log::debug!("Registering macro {name} with {} argument(s)", mac.arity());
        self.macros.insert(name.to_owned(), mac);
    }

    pub fn get(&self, name: &str) -> Option<&Macro> {
        self.macros.get(name)
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(args: &[&str]) -> Vec<String> {
        args.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn substitutes_arguments_in_order() {
        let store = Macro::parse("(i64.store %s %s)", WasmType::Void).unwrap();
        assert_eq!(store.arity(), 2);
        assert_eq!(
            store.render(&args(&["(i64.const 8)", "(local.get $x)"])).unwrap(),
            "(i64.store (i64.const 8) (local.get $x))"
        );
    }

    #[test]
    fn percent_escape() {
        let mac = Macro::parse("%% %s", WasmType::I64).unwrap();
        assert_eq!(mac.arity(), 1);
        assert_eq!(mac.render(&args(&["x"])).unwrap(), "% x");
    }

    #[test]
    fn rejects_unknown_conversions() {
        assert!(Macro::parse("(i64.load %d)", WasmType::I64).is_none());
        assert!(Macro::parse("trailing %", WasmType::I64).is_none());
    }

    #[test]
    fn argument_count_mismatch() {
        let load = Macro::parse("(i64.load %s)", WasmType::I64).unwrap();
        assert!(load.render(&args(&[])).is_none());
        assert!(load.render(&args(&["a", "b"])).is_none());
    }

    #[test]
    fn table_lookup() {
        let mut table = MacroTable::default();
        assert!(table.is_empty());
        table.register("$Wasm_Core_i64_load", Macro::parse("(i64.load %s)", WasmType::I64).unwrap());
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("$Wasm_Core_i64_load").map(|m| m.result), Some(WasmType::I64));
        assert!(table.get("$__i64_load").is_none());
    }
}
