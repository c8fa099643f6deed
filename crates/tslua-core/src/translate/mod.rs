//! Node-kind translators
//!
//! ARCHITECTURE: a single stateful translator instance bound to one
//! compilation unit at a time, dispatching on node kind to a family of
//! specialized translators that recursively invoke one another.
//! [`Translator`] is that instance: it owns the
//! [`EmissionContext`], borrows a [`ModuleResolver`] and [`TranspileConfig`]
//! for the duration of one file, and exposes one method per translator
//! family (`translate/expr.rs`, `translate/binding.rs`, `translate/stmt.rs`,
//! `translate/decl.rs`). Each family is implemented as a set of methods
//! rather than free functions, favoring tagged-variant dispatch by
//! exhaustive match over virtual dispatch, since every translator needs
//! the same context.

pub mod binding;
pub mod decl;
pub mod expr;
pub mod stmt;

use crate::ast::{NodeLoc, ScriptType};
use crate::config::TranspileConfig;
use crate::context::EmissionContext;
use crate::error::{Result, TranslationError};
use crate::resolver::ModuleResolver;

/// The translator instance for one compilation unit.
pub struct Translator<'a, R: ModuleResolver> {
    pub ctx: EmissionContext,
    pub resolver: &'a R,
    pub config: &'a TranspileConfig,
    pub file_name: String,
    /// `Module` files must end in `return _exports;`; `Script` files must
    /// never emit an export.
    pub(crate) script_type: ScriptType,
    /// Line of the nearest enclosing `Expr::Loc`/`Stmt::Loc` wrapper seen
    /// during the current recursive descent, used to label errors raised
    /// by nodes that don't carry their own location.
    pub(crate) current_line: Option<u32>,
    /// True while translating the body of a function/method whose
    /// declared return type is a tuple, so `return` lowering
    /// knows whether to strip array-literal braces or unpack a tuple-typed
    /// expression.
    pub(crate) current_function_returns_tuple: bool,
    /// True while translating a constructor body; `return` is rejected
    /// there.
    pub(crate) in_constructor: bool,
}

impl<'a, R: ModuleResolver> Translator<'a, R> {
    pub fn new(
        file_name: impl Into<String>,
        script_context: crate::ast::ScriptContext,
        script_type: ScriptType,
        resolver: &'a R,
        config: &'a TranspileConfig,
    ) -> Self {
        Self {
            ctx: EmissionContext::new(script_context),
            resolver,
            config,
            file_name: file_name.into(),
            script_type,
            current_line: None,
            current_function_returns_tuple: false,
            in_constructor: false,
        }
    }

    /// Builds a human-readable node label for error messages, anchored to
    /// the most recently seen `Loc` wrapper.
    pub fn label(&self) -> String {
        NodeLoc {
            file: self.file_name.clone(),
            line: self.current_line.unwrap_or(0),
        }
        .to_string()
    }

    /// Renders one line of already-complete text at the current indent,
    /// newline-terminated. The workhorse every statement translator uses
    /// so indentation bookkeeping lives in exactly one place.
    pub(crate) fn indent_line(&self, text: impl AsRef<str>) -> String {
        format!("{}{}\n", self.ctx.indent(), text.as_ref())
    }

    /// Applies the current indent to every non-empty line of a
    /// pre-rendered multi-line fragment (e.g. a [`binding::BindingLowering`]
    /// rendering, which has no indentation of its own).
    pub(crate) fn indent_each_line(&self, text: &str) -> String {
        let mut out = String::new();
        for line in text.lines() {
            if line.is_empty() {
                continue;
            }
            out.push_str(&self.indent_line(line));
        }
        out
    }

    /// Registers `name` as exported from the enclosing scope: an export
    /// binding into the current namespace object (or the file's `_exports`
    /// table) plus the file-is-a-module flag.
    /// Rejects the export immediately if this file is a bare script.
    pub(crate) fn push_export_name(&mut self, name: &str) -> Result<()> {
        if matches!(self.script_type, ScriptType::Script) {
            return Err(TranslationError::ExportInScript(self.label()));
        }
        let target = self.ctx.current_namespace().unwrap_or("_exports").to_string();
        self.ctx.export(format!("{target}.{name} = {name};"));
        self.ctx.mark_module();
        Ok(())
    }
}
