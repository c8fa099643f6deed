//! Emission context: the translator's sole mutable state
//!
//! ARCHITECTURE: a small struct wrapping mutable state, constructed once
//! per transformation and threaded through every transform function by
//! `&mut` reference. `EmissionContext` holds exactly the fields a
//! translation pass needs and nothing more.
//!
//! The scoped-acquisition discipline — every statemented scope pushes a
//! fresh `idStack`/`exportStack`/`hoistStack` frame on entry and pops all
//! three on exit, popping even when the scope's translation fails partway
//! through — is implemented with a `ScopeGuard` RAII type for
//! unwinding-safe releases.

use crate::ast::ScriptContext;

/// One per-scope frame of the hoist stack: identifiers that must be
/// declared at the head of the enclosing statemented block.
pub type HoistFrame = Vec<String>;

/// One per-scope frame of the export stack: textual export-binding
/// statements appended at the end of the enclosing statemented block.
pub type ExportFrame = Vec<String>;

/// The translator's sole mutable state, owned by one instance, reset per
/// file.
#[derive(Debug)]
pub struct EmissionContext {
    /// Current indentation prefix (tabs).
    indent: String,
    hoist_stack: Vec<HoistFrame>,
    export_stack: Vec<ExportFrame>,
    /// Stack of synthetic identifiers naming the current namespace object.
    /// Empty ⇒ file-level.
    namespace_stack: Vec<String>,
    /// Stack of counters; synthetic identifiers combine the sum of all
    /// counters to guarantee uniqueness across nested scopes.
    id_stack: Vec<u64>,
    /// Cursor identifying the nearest enclosing loop that requires
    /// `continue`-simulation; `-1` when none.
    continue_id: i64,
    /// Set true the first time an export is emitted; governs the file
    /// epilogue.
    is_module: bool,
    script_context: ScriptContext,
}

impl EmissionContext {
    pub fn new(script_context: ScriptContext) -> Self {
        Self {
            indent: String::new(),
            hoist_stack: Vec::new(),
            export_stack: Vec::new(),
            namespace_stack: Vec::new(),
            id_stack: Vec::new(),
            continue_id: -1,
            is_module: false,
            script_context,
        }
    }

    pub fn script_context(&self) -> ScriptContext {
        self.script_context
    }

    pub fn is_module(&self) -> bool {
        self.is_module
    }

    /// Marks the file as a module. Transitions only false→true.
    pub fn mark_module(&mut self) {
        self.is_module = true;
    }

    pub fn indent(&self) -> &str {
        &self.indent
    }

    pub fn push_indent(&mut self) {
        self.indent.push('\t');
    }

    pub fn pop_indent(&mut self) {
        self.indent.pop();
    }

    pub fn namespace_stack(&self) -> &[String] {
        &self.namespace_stack
    }

    /// The synthetic identifier currently bound to the enclosing namespace
    /// object, if any.
    pub fn current_namespace(&self) -> Option<&str> {
        self.namespace_stack.last().map(String::as_str)
    }

    pub fn push_namespace(&mut self, synthetic_name: String) {
        self.namespace_stack.push(synthetic_name);
    }

    pub fn pop_namespace(&mut self) {
        self.namespace_stack.pop();
    }

    /// Enters the loop-continue cursor by one level, returning the cursor
    /// value to use for this loop's `_continue_<n>` variable.
    pub fn enter_continue(&mut self) -> i64 {
        self.continue_id += 1;
        self.continue_id
    }

    pub fn exit_continue(&mut self) {
        self.continue_id -= 1;
    }

    pub fn continue_id(&self) -> i64 {
        self.continue_id
    }

    /// Allocates a fresh synthetic identifier of the form `_<n>`, where `n`
    /// is the sum of all counter values currently on `idStack`. The
    /// top-of-stack counter is incremented on each allocation.
    pub fn fresh_ident(&mut self) -> String {
        let sum: u64 = self.id_stack.iter().sum();
        if let Some(top) = self.id_stack.last_mut() {
            *top += 1;
        }
        format!("_{sum}")
    }

    pub fn hoist(&mut self, name: impl Into<String>) {
        if let Some(frame) = self.hoist_stack.last_mut() {
            frame.push(name.into());
        }
    }

    pub fn export(&mut self, binding_stmt: impl Into<String>) {
        if let Some(frame) = self.export_stack.last_mut() {
            frame.push(binding_stmt.into());
        }
    }

    /// Enters one statemented scope, pushing a fresh frame onto each of
    /// `idStack`, `exportStack`, and `hoistStack`. The returned guard pops
    /// all three frames on drop, including on an error unwind through `?`,
    /// so every push has a matched pop on every exit path.
    pub fn enter_scope(&mut self) -> ScopeGuard<'_> {
        self.id_stack.push(0);
        self.export_stack.push(Vec::new());
        self.hoist_stack.push(Vec::new());
        ScopeGuard {
            ctx: self,
            popped: false,
        }
    }
}

/// RAII guard returned by [`EmissionContext::enter_scope`]. Its `Drop` impl
/// pops the `idStack`/`exportStack`/`hoistStack` frames pushed on entry,
/// regardless of whether the scope's body returned normally or via an
/// error propagated with `?`.
pub struct ScopeGuard<'a> {
    ctx: &'a mut EmissionContext,
    popped: bool,
}

impl ScopeGuard<'_> {
    /// Pops the frames early and returns their contents, for callers that
    /// need the hoist/export lines before the guard would otherwise drop
    /// (the common case: finishing a scope's body and flushing its frames
    /// into the surrounding text).
    pub fn finish(mut self) -> (HoistFrame, ExportFrame) {
        let hoist = self.ctx.hoist_stack.pop().unwrap_or_default();
        let export = self.ctx.export_stack.pop().unwrap_or_default();
        self.ctx.id_stack.pop();
        self.popped = true;
        (hoist, export)
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        if self.popped {
            return;
        }
        self.ctx.hoist_stack.pop();
        self.ctx.export_stack.pop();
        self.ctx.id_stack.pop();
    }
}
