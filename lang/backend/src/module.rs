use watling_lang_ast::HashMap;

use crate::ctx::Ctx;
use crate::lower::compile_unit;
use crate::result::BackendResult;
use crate::source::SourceLoader;

/// The module level forms collected while lowering
#[derive(Debug, Clone, Default)]
pub struct WatModule {
    pub imports: Vec<String>,
    /// The qualified name of the start function; the last one declared wins
    pub start: Option<String>,
}

impl WatModule {
    /// Wrap the compiled bodies into a `(module ..)`
    pub fn assemble(&self, bodies: &[String]) -> String {
        let imports = self.imports.join(" ");
        let bodies: Vec<&str> =
            bodies.iter().map(String::as_str).filter(|body| !body.is_empty()).collect();
        let start = self.start.as_ref().map(|name| format!("(start {name})")).unwrap_or_default();
        format!("(module\n{imports}\n{}\n{start})", bodies.join("\n"))
    }
}

#[derive(Debug, Clone)]
pub struct CompilerConfig {
    /// Standard library units, compiled in this order before the root unit
    pub std_units: Vec<String>,
    /// The name under which the root unit is compiled
    pub root_name: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig { std_units: vec!["std/core.php".to_owned()], root_name: "$root".to_owned() }
    }
}

pub struct Compiler<'a> {
    config: CompilerConfig,
    source: &'a mut dyn SourceLoader,
    /// The text of every unit compiled by the last run
    sources: HashMap<String, String>,
    /// The file the failure of the last run originated in
    error_origin: Option<String>,
}

impl<'a> Compiler<'a> {
    pub fn new(config: CompilerConfig, source: &'a mut dyn SourceLoader) -> Self {
        Compiler { config, source, sources: HashMap::default(), error_origin: None }
    }

    /// Compile the standard library followed by `text` into a WebAssembly text module
    ///
    /// Every call starts from fresh file scopes, macros and module state.
    pub fn compile_root(&mut self, text: &str) -> BackendResult<String> {
        let mut ctx = Ctx::new(&mut *self.source);
        let res = compile_units(&self.config, &mut ctx, text);
        self.sources = std::mem::take(&mut ctx.sources);
        self.error_origin = ctx.error_origin.take();
        res
    }

    pub fn error_origin(&self) -> Option<&str> {
        self.error_origin.as_deref()
    }

    /// The text of a unit compiled by the last run
    pub fn source_text(&self, name: &str) -> Option<&str> {
        self.sources.get(name).map(String::as_str)
    }
}

fn compile_units(config: &CompilerConfig, ctx: &mut Ctx<'_>, text: &str) -> BackendResult<String> {
    let mut bodies = Vec::with_capacity(config.std_units.len() + 1);
    for unit in &config.std_units {
        let path = ctx.source.resolve(None, unit);
        let unit_text = ctx.source.read_to_string(&path)?;
        bodies.push(compile_unit(ctx, &path, unit_text)?);
    }
    bodies.push(compile_unit(ctx, &config.root_name, text.to_owned())?);
    log::debug!(
        "Assembling module from {} unit(s) with {} import(s) and {} macro(s)",
        bodies.len(),
        ctx.module.imports.len(),
        ctx.macros.len()
    );
    Ok(ctx.module.assemble(&bodies))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::BackendError;
    use crate::source::test_util::MemoryLoader;

    fn compile_with(loader: &mut MemoryLoader, src: &str) -> BackendResult<String> {
        Compiler::new(CompilerConfig::default(), loader).compile_root(src)
    }

    fn compile(src: &str) -> BackendResult<String> {
        compile_with(&mut MemoryLoader::new(), src)
    }

    const EXAMPLE: &str = r#"<?php

#[WasmImport(['console', 'log'])]
function logValue(int $value): void {}

#[WasmExport]
function sum(int $a, int $b): int
{
    return $a + $b;
}

#[WasmStart]
function main(): void
{
    logValue(sum(1, 2));
}
"#;

    #[test]
    fn end_to_end() {
        let wat = compile(EXAMPLE).unwrap();
        let expected = [
            "(module",
            r#"(import "console" "log" (func $__logValue (param $value i64)))"#,
            r#"(func $__sum (export "sum") (param $a i64) (param $b i64) (result i64) (return (i64.add (local.get $a) (local.get $b))))"#,
            "(func $__main (call $__logValue (call $__sum (i64.const 1) (i64.const 2))))",
            "(start $__main))",
        ]
        .join("\n");
        assert_eq!(wat, expected);
    }

    #[test]
    fn literal_types() {
        let wat = compile("<?php function f(): void { $i = 9223372036854775807; $x = 0.5; }").unwrap();
        assert!(wat.contains("(local $i i64) (local $x f64)"));
        assert!(wat.contains("(local.set $i (i64.const 9223372036854775807))"));
        assert!(wat.contains("(local.set $x (f64.const 0.5))"));
    }

    #[test]
    fn assignment_roundtrip() {
        let src = "<?php #[WasmExport] function f(): int { $x = 1; return $x; }";
        let wat = compile(src).unwrap();
        assert!(wat.contains(
            "(func $__f (export \"f\") (result i64) (local $x i64) (local.set $x (i64.const 1))\n(return (local.get $x)))"
        ));
    }

    #[test]
    fn top_level_assignment_is_global() {
        let wat = compile("<?php $x = 2; $y = $x * 3;").unwrap();
        assert!(wat.contains("(global.set $x (i64.const 2))"));
        assert!(wat.contains("(global.set $y (i64.mul (global.get $x) (i64.const 3)))"));
    }

    #[test]
    fn binop_type_follows_left_operand() {
        let src = "<?php function f(float $a, int $b): float { return $a - $b; }";
        let wat = compile(src).unwrap();
        assert!(wat.contains("(f64.sub (local.get $a) (local.get $b))"));
    }

    #[test]
    fn param_reassignment_keeps_param() {
        let src = "<?php function f(int $a): int { $a = $a + 1; return $a; }";
        let wat = compile(src).unwrap();
        assert!(wat.contains(
            "(func $__f (param $a i64) (result i64) (local.set $a (i64.add (local.get $a) (i64.const 1)))"
        ));
        assert!(!wat.contains("(local $a"));
    }

    #[test]
    fn same_function_in_different_namespaces() {
        let src = r"<?php
            namespace A { function add(int $a, int $b): int { return $a + $b; } }
            namespace B { function add(int $a, int $b): int { return $a + $b; } }
        ";
        let wat = compile(src).unwrap();
        assert!(wat.contains("(func $A_add "));
        assert!(wat.contains("(func $B_add "));
        assert_eq!(compile(src).unwrap(), wat);
    }

    #[test]
    fn import_bypass() {
        let src = r#"<?php
            #[WasmImport("env.tick")]
            function tick(i32 $n): f32 {}
            function run(): f32 { return tick(1); }
        "#;
        let wat = compile(src).unwrap();
        assert_eq!(wat.matches("(import ").count(), 1);
        assert!(wat.contains(r#"(import "env" "tick" (func $__tick (param $n i32) (result f32)))"#));
        assert!(!wat.lines().any(|line| line.starts_with("(func $__tick")));
        assert!(wat.contains("(func $__run (result f32) (return (call $__tick (i64.const 1))))"));
    }

    #[test]
    fn macro_substitution() {
        let src = r#"<?php
            use Wasm\Core\Macro;

            #[Macro('(i64.load %s)', 'i64')]
            function load(int $offset): int {}

            function f(): int { return load(42); }
        "#;
        let wat = compile(src).unwrap();
        assert!(wat.contains("(return (i64.load (i64.const 42)))"));
        assert!(!wat.contains("(call $__load"));
        assert!(!wat.contains("(func $__load"));
    }

    #[test]
    fn stdlib_macros_through_use_function() {
        let src = r"<?php
            use function Wasm\Core\i64_load;
            use function Wasm\Core\i64_store;

            function f(): void {
                $x = i64_load(8);
                i64_store(16, $x);
            }
        ";
        let wat = compile(src).unwrap();
        assert!(wat.contains("(local $x i64) (local.set $x (i64.load (i64.const 8)))"));
        assert!(wat.contains("(i64.store (i64.const 16) (local.get $x))"));
    }

    #[test]
    fn qualified_macro_call() {
        let src = r"<?php function f(): f64 { return \Wasm\Core\f64_load(0); }";
        let wat = compile(src).unwrap();
        assert!(wat.contains("(return (f64.load (i64.const 0)))"));
    }

    #[test]
    fn macro_argument_count_mismatch() {
        let src = r"<?php use function Wasm\Core\i64_load; i64_load(1, 2);";
        let err = compile(src).unwrap_err();
        assert!(matches!(
            err,
            BackendError::MalformedMacroPattern { expected: 1, given: 2, .. }
        ));
    }

    #[test]
    fn invalid_macro_pattern() {
        let src = r"<?php #[\Wasm\Core\Macro('(i64.load %d)', 'i64')] function f(int $a): int {}";
        assert!(matches!(compile(src).unwrap_err(), BackendError::InvalidMacroPattern { .. }));
    }

    #[test]
    fn start_and_export_together() {
        let src = "<?php #[WasmStart, WasmExport] function boot(): void {}";
        let wat = compile(src).unwrap();
        assert!(wat.contains(r#"(func $__boot (export "boot"))"#));
        assert!(wat.ends_with("(start $__boot))"));
    }

    #[test]
    fn last_start_wins() {
        let src = "<?php #[WasmStart] function a(): void {} #[WasmStart] function b(): void {}";
        assert!(compile(src).unwrap().ends_with("(start $__b))"));
    }

    #[test]
    fn missing_parameter_type() {
        let err = compile("<?php function f($a): int { return 1; }").unwrap_err();
        assert!(matches!(
            err,
            BackendError::MissingParameterType { ref name, ref function, .. } if name == "a" && function == "f"
        ));
    }

    #[test]
    fn unsupported_types_and_constructs() {
        assert!(matches!(
            compile("<?php function f(string $s): void {}").unwrap_err(),
            BackendError::UnsupportedType { .. }
        ));
        assert!(matches!(
            compile("<?php function f(): void { $s = 'hello'; }").unwrap_err(),
            BackendError::AmbiguousNodeType { .. }
        ));
        assert!(matches!(
            compile("<?php 'hello';").unwrap_err(),
            BackendError::UnsupportedConstruct { .. }
        ));
    }

    #[test]
    fn undeclared_variable() {
        let err = compile("<?php function f(): int { return $y + 1; }").unwrap_err();
        assert!(matches!(err, BackendError::UndeclaredSymbol { ref name, .. } if name == "y"));
    }

    #[test]
    fn unresolved_call_is_left_unqualified() {
        let wat = compile("<?php function f(): void { later(); }").unwrap();
        assert!(wat.contains("(call later)"));
    }

    #[test]
    fn namespace_header_with_use_alias() {
        let src = r"<?php
            namespace App\Math;

            use Wasm\Core\WasmExport;

            #[WasmExport]
            function twice(int $x): int { return $x * 2; }

            function four(): int { return twice(2); }
        ";
        let wat = compile(src).unwrap();
        assert!(wat.contains(r#"(func $App_Math_twice (export "twice") (param $x i64)"#));
        assert!(wat.contains("(return (call $App_Math_twice (i64.const 2)))"));
    }

    #[test]
    fn include_compiles_inline() {
        let mut loader = MemoryLoader::new()
            .with("lib/util.php", "<?php function one(): int { return 1; }")
            .with("lib/helpers.php", "<?php include 'util.php';");
        let src = "<?php require 'lib/helpers.php'; function two(): int { return 2; }";
        let wat = compile_with(&mut loader, src).unwrap();
        assert!(wat.contains("(func $__one (result i64) (return (i64.const 1)))\n(func $__two"));
    }

    #[test]
    fn include_once_skips_compiled_units() {
        let mut loader =
            MemoryLoader::new().with("util.php", "<?php function one(): int { return 1; }");
        let src = "<?php include_once 'util.php'; require_once 'util.php';";
        let wat = compile_with(&mut loader, src).unwrap();
        assert_eq!(wat.matches("(func $__one").count(), 1);
    }

    #[test]
    fn include_cycle() {
        let mut loader = MemoryLoader::new()
            .with("a.php", "<?php include 'b.php';")
            .with("b.php", "<?php include 'a.php';");
        let mut compiler = Compiler::new(CompilerConfig::default(), &mut loader);
        let err = compiler.compile_root("<?php include 'a.php';").unwrap_err();
        assert!(matches!(err, BackendError::IncludeCycle { ref path, span: Some(_) } if path == "a.php"));
        assert_eq!(compiler.error_origin(), Some("b.php"));
    }

    #[test]
    fn missing_include() {
        let err = compile("<?php include 'nope.php';").unwrap_err();
        assert!(matches!(err, BackendError::FileNotFound { span: Some(_), .. }));
    }

    #[test]
    fn calls_into_included_functions() {
        let mut loader = MemoryLoader::new()
            .with("lib.php", "<?php function f(): int { return 1; }")
            .with("ns.php", "<?php namespace App; function g(): f64 { return 0.5; }");
        let src = r"<?php
            include 'lib.php';
            include 'ns.php';
            function h(): int { $x = f(); return $x; }
            namespace App { function k(): f64 { $y = g(); return $y; } }
        ";
        let wat = compile_with(&mut loader, src).unwrap();
        assert!(wat.contains("(func $__h (result i64) (local $x i64) (local.set $x (call $__f))"));
        assert!(wat.contains("(func $App_k (result f64) (local $y f64) (local.set $y (call $App_g))"));
    }

    #[test]
    fn namespace_top_level_variables_are_local() {
        let src = r"<?php
            namespace App;
            $x = 1;
            $y = $x + 2;
        ";
        let wat = compile(src).unwrap();
        assert!(wat.contains("(local.set $x (i64.const 1))"));
        assert!(wat.contains("(local.set $y (i64.add (local.get $x) (i64.const 2)))"));
        assert!(!wat.contains("global."));
    }

    #[test]
    fn nested_declarations_are_rejected() {
        let src = "<?php function outer(): int { function inner(): int { return 1; } return 2; }";
        assert!(matches!(
            compile(src).unwrap_err(),
            BackendError::UnsupportedConstruct { ref kind, span: Some(_) }
                if kind == "function declaration inside function outer"
        ));
        let src = "<?php function outer(): void { namespace A { } }";
        assert!(matches!(
            compile(src).unwrap_err(),
            BackendError::UnsupportedConstruct { ref kind, .. }
                if kind == "namespace declaration inside function outer"
        ));
    }

    #[test]
    fn calls_across_files_are_typed() {
        let mut loader = MemoryLoader::new()
            .with("lib.php", "<?php namespace Lib; function seven(): i32 { return 7; }");
        let src = r"<?php
            include 'lib.php';
            use function Lib\seven;
            function f(): i32 { $x = seven(); return $x; }
        ";
        let wat = compile_with(&mut loader, src).unwrap();
        assert!(wat.contains("(local $x i32) (local.set $x (call $Lib_seven))"));
    }

    #[test]
    fn error_origin_and_sources() {
        let mut loader = MemoryLoader::new().with("bad.php", "<?php function f($a) {}");
        let mut compiler = Compiler::new(CompilerConfig::default(), &mut loader);
        assert!(compiler.compile_root("<?php include 'bad.php';").is_err());
        assert_eq!(compiler.error_origin(), Some("bad.php"));
        assert_eq!(compiler.source_text("bad.php"), Some("<?php function f($a) {}"));
        assert!(compiler.source_text("$root").is_some());
    }

    #[test]
    fn state_is_fresh_per_run() {
        let mut loader = MemoryLoader::new();
        let mut compiler = Compiler::new(CompilerConfig::default(), &mut loader);
        let first = compiler.compile_root(EXAMPLE).unwrap();
        let second = compiler.compile_root(EXAMPLE).unwrap();
        assert_eq!(first, second);
        assert_eq!(second.matches("(import ").count(), 1);
        assert!(compiler.error_origin().is_none());
    }

    #[test]
    fn parse_errors_are_reported() {
        let err = compile("<?php function f( {}").unwrap_err();
        assert!(matches!(err, BackendError::Parse(_)));
    }
}
