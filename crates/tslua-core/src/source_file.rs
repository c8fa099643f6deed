//! Per-file translation driver
//!
//! Owns the one step the `Translator` itself can't: deciding a file's
//! prologue and epilogue. Everything inside the body is the translator's
//! job; everything wrapped around it — the `luacheck` pragma, the runtime
//! import, `_exports`, and the module-shape check — lives here so the
//! translator stays a pure per-statement dispatcher.

use crate::ast::{ScriptType, SourceFile};
use crate::config::TranspileConfig;
use crate::error::{Result, TranslationError};
use crate::resolver::ModuleResolver;
use crate::runtime;
use crate::translate::Translator;

/// Translates one compilation unit to a complete string of target source.
///
/// `script_type_override` in `config` wins over `source.script_type` when
/// set (e.g. the CLI forcing a type for stdin input with no other
/// signal); otherwise the file's own declared type governs.
pub fn translate_source_file<R: ModuleResolver>(
    source: &SourceFile,
    resolver: &R,
    config: &TranspileConfig,
) -> Result<String> {
    let script_type = config.script_type_override.unwrap_or(source.script_type);
    let mut translator = Translator::new(
        source.file_name.clone(),
        source.script_context,
        script_type,
        resolver,
        config,
    );

    let (hoist, body, export) = translator.translate_top_level_stmts(&source.statements)?;

    // `is_module()` isn't known until the whole body has been walked: an
    // export deep inside a namespace still counts.
    if matches!(script_type, ScriptType::Module) && !translator.ctx.is_module() {
        return Err(TranslationError::ModuleWithNoExports(source.file_name.clone()));
    }

    let mut out = String::new();
    out.push_str("-- luacheck: ignore\n");
    out.push_str(&format!(
        "local {} = require(\"{}\");\n",
        runtime::RUNTIME_NAMESPACE,
        config.runtime_module
    ));
    if translator.ctx.is_module() {
        out.push_str("local _exports = {};\n");
    }
    if !hoist.is_empty() {
        out.push_str(&format!("local {};\n", hoist.join(", ")));
    }
    out.push_str(&body);
    for e in &export {
        out.push_str(e);
        out.push('\n');
    }
    if translator.ctx.is_module() {
        out.push_str("return _exports;\n");
    }
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Unwrapping is acceptable in tests
mod tests {
    use super::*;
    use crate::ast::{Expr, ExportDecl, ExportKind, ScriptContext, Stmt};
    use crate::resolver::FixedTableResolver;

    fn resolver() -> FixedTableResolver {
        FixedTableResolver::new()
    }

    #[test]
    fn module_with_export_gets_exports_table_and_epilogue() {
        let source = SourceFile {
            file_name: "a.ts".to_string(),
            script_context: ScriptContext::None,
            script_type: ScriptType::Module,
            statements: vec![Stmt::Export(ExportDecl {
                kind: ExportKind::ExportAssignment(Expr::NumericLiteral { text: "1".to_string() }),
            })],
        };
        let out = translate_source_file(&source, &resolver(), &TranspileConfig::default()).expect("ok");
        assert!(out.starts_with("-- luacheck: ignore\n"));
        assert!(out.contains("local TS = require(\"@rbx/ts\");"));
        assert!(out.contains("local _exports = {};"));
        assert!(out.trim_end().ends_with("return _exports;"));
    }

    fn call_stmt() -> Stmt {
        Stmt::Expr(Expr::Call {
            callee: Box::new(Expr::Identifier {
                name: "doSomething".to_string(),
                symbol: None,
                ty: crate::ast::Ty::unknown(),
            }),
            args: vec![],
            returns_tuple: false,
        })
    }

    #[test]
    fn script_with_no_exports_has_no_exports_table() {
        let source = SourceFile {
            file_name: "b.ts".to_string(),
            script_context: ScriptContext::None,
            script_type: ScriptType::Script,
            statements: vec![call_stmt()],
        };
        let out = translate_source_file(&source, &resolver(), &TranspileConfig::default()).expect("ok");
        assert!(!out.contains("_exports"));
        assert!(!out.trim_end().ends_with("return _exports;"));
    }

    #[test]
    fn module_type_with_no_export_is_rejected() {
        let source = SourceFile {
            file_name: "c.ts".to_string(),
            script_context: ScriptContext::None,
            script_type: ScriptType::Module,
            statements: vec![call_stmt()],
        };
        let err = translate_source_file(&source, &resolver(), &TranspileConfig::default()).unwrap_err();
        assert_eq!(err.discriminant(), "module-with-no-exports");
    }

    #[test]
    fn script_with_export_is_rejected() {
        let source = SourceFile {
            file_name: "d.ts".to_string(),
            script_context: ScriptContext::None,
            script_type: ScriptType::Script,
            statements: vec![Stmt::Export(ExportDecl {
                kind: ExportKind::ExportAssignment(Expr::NumericLiteral { text: "1".to_string() }),
            })],
        };
        let err = translate_source_file(&source, &resolver(), &TranspileConfig::default()).unwrap_err();
        assert_eq!(err.discriminant(), "export-in-script");
    }
}
