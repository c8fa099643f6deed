//! Translator configuration
//!
//! ARCHITECTURE: builder-style, with `with_*` setters and a `Default` impl.
//! `TranspileConfig` is a small bag of knobs the core accepts but never
//! reaches for ambient/global state to find.

use crate::ast::ScriptType;

/// Configuration accepted by a single `translate` call.
#[derive(Debug, Clone)]
pub struct TranspileConfig {
    /// Forces the file's script type when the provider can't determine one
    /// (e.g. a file with no exports and no script-context signal). `None`
    /// defers to `SourceFile::script_type`.
    pub script_type_override: Option<ScriptType>,
    /// Callers' default `@rbx-client`/`@rbx-server` JSDoc cross-context
    /// gating, used to construct the `ModuleResolver` passed alongside this
    /// config — the resolver's `no_heuristics()` query is what the
    /// translator actually consults, not a translator-local flag.
    pub no_heuristics: bool,
    /// Module specifier the emitted runtime `require` binds to.
    pub runtime_module: String,
}

impl Default for TranspileConfig {
    fn default() -> Self {
        Self {
            script_type_override: None,
            no_heuristics: false,
            runtime_module: "@rbx/ts".to_string(),
        }
    }
}

impl TranspileConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_type_override(mut self, script_type: ScriptType) -> Self {
        self.script_type_override = Some(script_type);
        self
    }

    pub fn no_heuristics(mut self, value: bool) -> Self {
        self.no_heuristics = value;
        self
    }

    pub fn runtime_module(mut self, module: impl Into<String>) -> Self {
        self.runtime_module = module.into();
        self
    }
}
