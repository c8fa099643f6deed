//! tslua-core — a type-directed source-to-source translator
//!
//! # Overview
//!
//! `tslua-core` walks a fully typed abstract syntax tree of a statically
//! typed, curly-brace OO language and emits textual source in a
//! dynamically typed scripting language with prototype-free OO
//! conventions, 1-based arrays, and `nil`-valued absence.
//!
//! # Architecture
//!
//! **This is a LIBRARY with NO I/O.**
//! - Accepts an already-parsed [`ast::SourceFile`], not file paths or text
//! - Returns `Result<String>`, not stdout writes
//! - Pure translation, no side effects beyond the one mutable
//!   [`context::EmissionContext`] owned by a single [`translate::Translator`]
//!
//! CLI interfaces handle I/O, file discovery, and caching separately (see
//! the sibling `tslua-cli` crate).
//!
//! # Example
//!
//! ```
//! use tslua_core::ast::{Expr, ExportDecl, ExportKind, ScriptContext, ScriptType, SourceFile, Stmt};
//! use tslua_core::config::TranspileConfig;
//! use tslua_core::resolver::FixedTableResolver;
//! use tslua_core::translate_source_file;
//!
//! let source = SourceFile {
//!     file_name: "a.ts".to_string(),
//!     script_context: ScriptContext::None,
//!     script_type: ScriptType::Module,
//!     statements: vec![Stmt::Export(ExportDecl {
//!         kind: ExportKind::ExportAssignment(Expr::NumericLiteral { text: "1".to_string() }),
//!     })],
//! };
//! let resolver = FixedTableResolver::new();
//! let lua = translate_source_file(&source, &resolver, &TranspileConfig::default())?;
//! assert!(lua.trim_end().ends_with("return _exports;"));
//! # Ok::<(), tslua_core::error::TranslationError>(())
//! ```
//!
//! # Design principles
//!
//! 1. **Zero partial output** — a failing file never returns a half-built
//!    string; the error short-circuits translation.
//! 2. **Result types everywhere** — no panics outside tests (enforced by
//!    clippy lints in `Cargo.toml`).
//! 3. **Dependency injection** — module resolution is a trait
//!    ([`resolver::ModuleResolver`]) the caller supplies, never global state.
//! 4. **One mutable struct** — all translator state lives in
//!    [`context::EmissionContext`], reset per file.

pub mod ast;
pub mod config;
pub mod context;
pub mod error;
pub mod resolver;
pub mod runtime;
pub mod source_file;
pub mod translate;

pub use config::TranspileConfig;
pub use error::{Result, TranslationError};
pub use resolver::ModuleResolver;
pub use source_file::translate_source_file;
pub use translate::Translator;

/// Library version, re-exported for CLI `--version` banners.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
