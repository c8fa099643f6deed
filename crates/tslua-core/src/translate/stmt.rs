//! Statement, control-flow, and import/export translation
//!
//! ARCHITECTURE: `continue` has no target-language equivalent, so every
//! loop body is inspected ahead of time for a reachable `continue`
//! (`contains_continue`, not recursing into nested loops or function
//! bodies — those have their own target). When present, the body is
//! wrapped `repeat ... until true` behind a `_continue_<n>` flag: the
//! flag starts false, `continue` sets it and breaks the inner `repeat`,
//! and a trailing `if not _continue_<n> then break end` re-raises a real
//! `break` that escaped the inner repeat early. `switch` fallthrough uses
//! the same `repeat ... until true` idiom, gated on a `fallThrough` flag
//! instead.

use crate::ast::{
    BindingPattern, CatchClause, Expr, ExprContext, ExportKind, ForInKey, ForInit, ImportBinding,
    Stmt, SwitchCase, VarKind, VariableDeclarator,
};
use crate::error::{Result, TranslationError};
use crate::resolver::ModuleResolver;
use crate::runtime;

use super::binding::BindingLowering;
use super::expr::strip_loc;
use super::Translator;

fn strip_stmt_loc(stmt: &Stmt) -> &Stmt {
    match stmt {
        Stmt::Loc(_, inner) => strip_stmt_loc(inner),
        other => other,
    }
}

fn to_block_slice(stmt: &Stmt) -> &[Stmt] {
    match strip_stmt_loc(stmt) {
        Stmt::Block(stmts) => stmts.as_slice(),
        other => std::slice::from_ref(other),
    }
}

fn ensure_semicolon(s: String) -> String {
    if s.trim_end().ends_with(';') {
        s
    } else {
        format!("{s};")
    }
}

fn is_valid_expr_statement(e: &Expr) -> bool {
    use crate::ast::PrefixOp;
    match strip_loc(e) {
        Expr::Call { .. }
        | Expr::New { .. }
        | Expr::Assign { .. }
        | Expr::CompoundAssign { .. }
        | Expr::Postfix { .. } => true,
        Expr::Prefix { op, .. } => {
            matches!(op, PrefixOp::Await | PrefixOp::Increment | PrefixOp::Decrement)
        }
        _ => false,
    }
}

/// True if a bare `continue` is reachable from `stmts` without crossing
/// into a nested loop or function/class body (each of those has its own
/// `continue` target, or none at all).
fn contains_continue(stmts: &[Stmt]) -> bool {
    stmts.iter().any(stmt_contains_continue)
}

fn stmt_contains_continue(stmt: &Stmt) -> bool {
    match strip_stmt_loc(stmt) {
        Stmt::Continue => true,
        Stmt::Block(stmts) => contains_continue(stmts),
        Stmt::If { then_branch, else_branch, .. } => {
            stmt_contains_continue(then_branch)
                || else_branch.as_deref().is_some_and(stmt_contains_continue)
        }
        Stmt::Switch { cases, .. } => cases.iter().any(|c| contains_continue(&c.body)),
        Stmt::Try { block, handler, finalizer } => {
            contains_continue(block)
                || handler.as_ref().is_some_and(|h| contains_continue(&h.body))
                || finalizer.as_ref().is_some_and(|f| contains_continue(f))
        }
        Stmt::Labeled { body, .. } => stmt_contains_continue(body),
        // Nested loops, function/class/namespace bodies have their own
        // scope for `continue`/`break` (or none at all); do not recurse.
        _ => false,
    }
}

/// True if every element of a binding-pattern array is a bare identifier
/// with no default, no nested pattern — that shape lowers to a flat
/// `local a, b = f(x);` multi-assignment rather than a
/// table-collecting destructure.
fn is_flat_identifier_array(elements: &[Option<crate::ast::BindingElement>]) -> bool {
    elements.iter().all(|e| match e {
        Some(elem) => {
            !elem.is_rest
                && elem.default.is_none()
                && matches!(elem.pattern, BindingPattern::Identifier { .. })
        }
        None => false,
    })
}

impl<'a, R: ModuleResolver> Translator<'a, R> {
    /// Translates one statement to zero or more complete, indented,
    /// newline-terminated lines.
    pub fn translate_stmt(&mut self, stmt: &Stmt) -> Result<String> {
        match stmt {
            Stmt::Loc(loc, inner) => {
                let prev = self.current_line;
                self.current_line = Some(loc.line);
                let out = self.translate_stmt(inner);
                self.current_line = prev;
                out
            }
            Stmt::Empty | Stmt::TypeOnly => Ok(String::new()),
            Stmt::Expr(e) => {
                if !is_valid_expr_statement(e) {
                    return Err(TranslationError::InvalidExpressionStatement(self.label()));
                }
                let s = self.translate_expr_ctx(e, ExprContext::Statement)?;
                Ok(self.indent_line(ensure_semicolon(s)))
            }
            Stmt::Block(stmts) => {
                let mut out = self.indent_line("do");
                out.push_str(&self.translate_block_stmts(stmts)?);
                out.push_str(&self.indent_line("end"));
                Ok(out)
            }
            Stmt::VariableDeclaration { kind, declarators, exported } => {
                if matches!(kind, VarKind::Var) {
                    return Err(TranslationError::VarDeclaration(self.label()));
                }
                self.translate_variable_declaration(declarators, *exported)
            }
            Stmt::If { cond, then_branch, else_branch } => {
                self.translate_if(cond, then_branch, else_branch.as_deref(), false)
            }
            Stmt::While { cond, body } => {
                let c = self.translate_expr(cond)?;
                let mut out = self.indent_line(format!("while {c} do"));
                out.push_str(&self.translate_loop_core(to_block_slice(body), None, None)?);
                out.push_str(&self.indent_line("end"));
                Ok(out)
            }
            Stmt::DoWhile { body, cond } => {
                let mut out = self.indent_line("repeat");
                out.push_str(&self.translate_loop_core(to_block_slice(body), None, None)?);
                let c = self.translate_expr(cond)?;
                out.push_str(&self.indent_line(format!("until not ({c})")));
                Ok(out)
            }
            Stmt::For { init, cond, update, body } => self.translate_for(init, cond.as_ref(), update.as_ref(), body),
            Stmt::ForIn { key, init, object, body } => {
                if init.is_some() {
                    return Err(TranslationError::UnexpectedForInInitializer(self.label()));
                }
                let var_name = match key {
                    ForInKey::Identifier(name) => name,
                    ForInKey::Pattern(_) => return Err(TranslationError::BindingPatternInForIn(self.label())),
                };
                if var_name.is_empty() {
                    return Err(TranslationError::EmptyForVariableName(self.label()));
                }
                let obj = self.translate_expr(object)?;
                let mut out = self.indent_line(format!("for {var_name} in pairs({obj}) do"));
                out.push_str(&self.translate_loop_core(to_block_slice(body), None, None)?);
                out.push_str(&self.indent_line("end"));
                Ok(out)
            }
            Stmt::ForOf { pattern, object, body } => self.translate_for_of(pattern, object, body),
            Stmt::Break => Ok(self.indent_line("break;")),
            Stmt::Continue => {
                let id = self.ctx.continue_id();
                if id < 0 {
                    Ok(self.indent_line("break;"))
                } else {
                    Ok(self.indent_line(format!("_continue_{id} = true; break;")))
                }
            }
            Stmt::Return(expr) => self.translate_return(expr.as_ref()),
            Stmt::Throw(expr) => {
                let e = self.translate_expr(expr)?;
                Ok(self.indent_line(format!("{}.{}({e});", runtime::RUNTIME_NAMESPACE, runtime::HELPER_ERROR)))
            }
            Stmt::Switch { discriminant, cases } => self.translate_switch(discriminant, cases),
            Stmt::Try { block, handler, finalizer } => self.translate_try(block, handler.as_ref(), finalizer.as_deref()),
            Stmt::Labeled { .. } => Err(TranslationError::LabeledStatement(self.label())),
            Stmt::FunctionDecl(decl) => self.translate_function_decl(decl),
            Stmt::ClassDecl(decl) => self.translate_class_decl(decl),
            Stmt::NamespaceDecl(decl) => self.translate_namespace_decl(decl),
            Stmt::EnumDecl(decl) => self.translate_enum_decl(decl),
            Stmt::Import(decl) => self.translate_import(decl),
            Stmt::Export(decl) => self.translate_export(decl),
        }
    }

    /// Translates a `Vec<Stmt>` that is the direct body of a statemented
    /// scope: pushes one indent level, enters a context scope, translates
    /// every statement, then flushes the hoist/export frames.
    pub(crate) fn translate_block_stmts(&mut self, stmts: &[Stmt]) -> Result<String> {
        self.ctx.push_indent();
        let guard = self.ctx.enter_scope();
        let mut body = String::new();
        for s in stmts {
            body.push_str(&self.translate_stmt(s)?);
        }
        let (hoist, export) = guard.finish();
        let mut out = String::new();
        if !hoist.is_empty() {
            out.push_str(&self.indent_line(format!("local {};", hoist.join(", "))));
        }
        out.push_str(&body);
        for e in &export {
            out.push_str(&self.indent_line(e));
        }
        self.ctx.pop_indent();
        Ok(out)
    }

    /// Translates the top-level statement list of a compilation unit:
    /// like [`Self::translate_block_stmts`] but at indent `""` and
    /// without an enclosing `do ... end`, returning the hoist/export
    /// frames separately so the file driver can place the runtime import
    /// and `_exports` declaration around them.
    pub(crate) fn translate_top_level_stmts(&mut self, stmts: &[Stmt]) -> Result<(Vec<String>, String, Vec<String>)> {
        let guard = self.ctx.enter_scope();
        let mut body = String::new();
        for s in stmts {
            body.push_str(&self.translate_stmt(s)?);
        }
        let (hoist, export) = guard.finish();
        Ok((hoist, body, export))
    }

    fn translate_branch_as_block(&mut self, stmt: &Stmt) -> Result<String> {
        self.translate_block_stmts(to_block_slice(stmt))
    }

    fn translate_if(&mut self, cond: &Expr, then_branch: &Stmt, else_branch: Option<&Stmt>, is_elseif: bool) -> Result<String> {
        let keyword = if is_elseif { "elseif" } else { "if" };
        let c = self.translate_expr(cond)?;
        let mut out = self.indent_line(format!("{keyword} {c} then"));
        out.push_str(&self.translate_branch_as_block(then_branch)?);
        match else_branch {
            None => {
                out.push_str(&self.indent_line("end"));
            }
            Some(stmt) => {
                if let Stmt::If { cond: c2, then_branch: t2, else_branch: e2 } = strip_stmt_loc(stmt) {
                    out.push_str(&self.translate_if(c2, t2, e2.as_deref(), true)?);
                } else {
                    out.push_str(&self.indent_line("else"));
                    out.push_str(&self.translate_branch_as_block(stmt)?);
                    out.push_str(&self.indent_line("end"));
                }
            }
        }
        Ok(out)
    }

    /// Translates the body of any loop construct, applying
    /// `continue`-simulation when `contains_continue` finds one reachable,
    /// and appending `trailer` (a C-style `for` header's increment clause,
    /// translated in statement position) after the simulation guard so it
    /// still runs on `continue` but not on a real `break`.
    /// `extra` renders binding-pattern destructuring lines (for
    /// `for...of` over a non-identifier pattern) ahead of the body.
    fn translate_loop_core(&mut self, stmts: &[Stmt], trailer: Option<&Expr>, extra: Option<&BindingLowering>) -> Result<String> {
        let id = self.ctx.enter_continue();
        let needs_sim = contains_continue(stmts);
        self.ctx.push_indent();
        let mut out = String::new();

        if needs_sim {
            let var = format!("_continue_{id}");
            out.push_str(&self.indent_line(format!("local {var} = false;")));
            out.push_str(&self.indent_line("repeat"));
            self.ctx.push_indent();
            let guard = self.ctx.enter_scope();
            let mut inner = String::new();
            if let Some(extra) = extra {
                inner.push_str(&self.indent_each_line(&extra.render_declaration()));
            }
            for s in stmts {
                inner.push_str(&self.translate_stmt(s)?);
            }
            let (hoist, export) = guard.finish();
            if !hoist.is_empty() {
                out.push_str(&self.indent_line(format!("local {};", hoist.join(", "))));
            }
            out.push_str(&inner);
            for e in &export {
                out.push_str(&self.indent_line(e));
            }
            out.push_str(&self.indent_line(format!("{var} = true;")));
            self.ctx.pop_indent();
            out.push_str(&self.indent_line("until true"));
            out.push_str(&self.indent_line(format!("if not {var} then break end")));
        } else {
            let guard = self.ctx.enter_scope();
            let mut inner = String::new();
            if let Some(extra) = extra {
                inner.push_str(&self.indent_each_line(&extra.render_declaration()));
            }
            for s in stmts {
                inner.push_str(&self.translate_stmt(s)?);
            }
            let (hoist, export) = guard.finish();
            if !hoist.is_empty() {
                out.push_str(&self.indent_line(format!("local {};", hoist.join(", "))));
            }
            out.push_str(&inner);
            for e in &export {
                out.push_str(&self.indent_line(e));
            }
        }

        if let Some(trailer) = trailer {
            let s = self.translate_expr_ctx(trailer, ExprContext::Statement)?;
            out.push_str(&self.indent_line(ensure_semicolon(s)));
        }

        self.ctx.pop_indent();
        self.ctx.exit_continue();
        Ok(out)
    }

    fn translate_for(&mut self, init: &ForInit, cond: Option<&Expr>, update: Option<&Expr>, body: &Stmt) -> Result<String> {
        let mut out = self.indent_line("do");
        self.ctx.push_indent();
        match init {
            ForInit::VarDecl { kind, declarators } => {
                if matches!(kind, VarKind::Var) {
                    return Err(TranslationError::VarDeclaration(self.label()));
                }
                out.push_str(&self.translate_variable_declaration(declarators, false)?);
            }
            ForInit::Expr(e) => {
                let s = self.translate_expr_ctx(e, ExprContext::Statement)?;
                out.push_str(&self.indent_line(ensure_semicolon(s)));
            }
            ForInit::None => {}
        }
        let cond_str = match cond {
            Some(c) => self.translate_expr(c)?,
            None => "true".to_string(),
        };
        out.push_str(&self.indent_line(format!("while {cond_str} do")));
        out.push_str(&self.translate_loop_core(to_block_slice(body), update, None)?);
        out.push_str(&self.indent_line("end"));
        self.ctx.pop_indent();
        out.push_str(&self.indent_line("end"));
        Ok(out)
    }

    fn translate_for_of(&mut self, pattern: &BindingPattern, object: &Expr, body: &Stmt) -> Result<String> {
        let obj = self.translate_expr(object)?;
        match pattern {
            BindingPattern::Identifier { name, .. } => {
                let mut out = self.indent_line(format!("for _, {name} in pairs({obj}) do"));
                out.push_str(&self.translate_loop_core(to_block_slice(body), None, None)?);
                out.push_str(&self.indent_line("end"));
                Ok(out)
            }
            pattern => {
                let tmp = self.ctx.fresh_ident();
                let mut out = self.indent_line(format!("for _, {tmp} in pairs({obj}) do"));
                let mut lowering = BindingLowering::default();
                self.ctx.push_indent();
                self.lower_binding_pattern(pattern, &tmp, &mut lowering)?;
                self.ctx.pop_indent();
                out.push_str(&self.translate_loop_core(to_block_slice(body), None, Some(&lowering))?);
                out.push_str(&self.indent_line("end"));
                Ok(out)
            }
        }
    }

    fn translate_return(&mut self, expr: Option<&Expr>) -> Result<String> {
        if self.in_constructor {
            return Err(TranslationError::ReturnInConstructor(self.label()));
        }
        let Some(expr) = expr else {
            return Ok(self.indent_line("return;"));
        };
        if self.current_function_returns_tuple {
            if let Expr::ArrayLiteral { elements } = strip_loc(expr) {
                let mut parts = Vec::with_capacity(elements.len());
                for el in elements {
                    match el {
                        crate::ast::ArrayElement::Item(e) => parts.push(self.translate_expr(e)?),
                        crate::ast::ArrayElement::Spread(e) => {
                            let s = self.translate_expr(e)?;
                            parts.push(format!("unpack({s})"));
                        }
                    }
                }
                return Ok(self.indent_line(format!("return {};", parts.join(", "))));
            }
            let s = self.translate_expr(expr)?;
            return Ok(self.indent_line(format!("return unpack({s});")));
        }
        let s = self.translate_expr(expr)?;
        Ok(self.indent_line(format!("return {s};")))
    }

    fn translate_switch(&mut self, discriminant: &Expr, cases: &[SwitchCase]) -> Result<String> {
        let disc_str = self.translate_expr(discriminant)?;
        let disc = self.ctx.fresh_ident();
        let fall_through = self.ctx.fresh_ident();
        let mut out = self.indent_line("repeat");
        self.ctx.push_indent();
        let guard = self.ctx.enter_scope();
        let mut body = String::new();
        body.push_str(&self.indent_line(format!("local {disc} = {disc_str};")));
        body.push_str(&self.indent_line(format!("local {fall_through} = false;")));
        for case in cases {
            let last_is_terminal = case
                .body
                .last()
                .is_some_and(|s| matches!(strip_stmt_loc(s), Stmt::Break | Stmt::Return(_)));
            let guard_expr = match &case.test {
                Some(test) => {
                    let t = self.translate_expr(test)?;
                    format!("{fall_through} or {disc} == ({t})")
                }
                None => fall_through.clone(),
            };
            body.push_str(&self.indent_line(format!("if {guard_expr} then")));
            self.ctx.push_indent();
            let case_guard = self.ctx.enter_scope();
            let mut case_body = String::new();
            for s in &case.body {
                case_body.push_str(&self.translate_stmt(s)?);
            }
            let (hoist, export) = case_guard.finish();
            if !hoist.is_empty() {
                body.push_str(&self.indent_line(format!("local {};", hoist.join(", "))));
            }
            body.push_str(&case_body);
            for e in &export {
                body.push_str(&self.indent_line(e));
            }
            if !last_is_terminal {
                body.push_str(&self.indent_line(format!("{fall_through} = true;")));
            }
            self.ctx.pop_indent();
            body.push_str(&self.indent_line("end"));
        }
        let (hoist, export) = guard.finish();
        if !hoist.is_empty() {
            out.push_str(&self.indent_line(format!("local {};", hoist.join(", "))));
        }
        out.push_str(&body);
        for e in &export {
            out.push_str(&self.indent_line(e));
        }
        self.ctx.pop_indent();
        out.push_str(&self.indent_line("until true"));
        Ok(out)
    }

    /// Lowers `try`/`catch`/`finally` via `pcall`. Known weakness: an
    /// uncaught error inside `try` is swallowed by `pcall`
    /// and never propagates past this construct, and `finally` always
    /// runs unconditionally after the `catch` (if any), never on a
    /// separate unwind path. This is a deliberately imperfect
    /// approximation of `try`/`catch`/`finally` semantics, not a bug to
    /// fix.
    fn translate_try(&mut self, block: &[Stmt], handler: Option<&CatchClause>, finalizer: Option<&[Stmt]>) -> Result<String> {
        let ok = self.ctx.fresh_ident();
        let err = self.ctx.fresh_ident();
        let mut out = self.indent_line(format!("local {ok}, {err} = pcall(function()"));
        out.push_str(&self.translate_block_stmts(block)?);
        out.push_str(&self.indent_line("end);"));
        if let Some(handler) = handler {
            out.push_str(&self.indent_line(format!("if not {ok} then")));
            self.ctx.push_indent();
            let guard = self.ctx.enter_scope();
            let mut body = String::new();
            if let Some(param) = &handler.param_name {
                body.push_str(&self.indent_line(format!(
                    "local {param} = {}.{}({err});",
                    runtime::RUNTIME_NAMESPACE,
                    runtime::HELPER_DECODE_ERROR
                )));
            }
            for s in &handler.body {
                body.push_str(&self.translate_stmt(s)?);
            }
            let (hoist, export) = guard.finish();
            if !hoist.is_empty() {
                out.push_str(&self.indent_line(format!("local {};", hoist.join(", "))));
            }
            out.push_str(&body);
            for e in &export {
                out.push_str(&self.indent_line(e));
            }
            self.ctx.pop_indent();
            out.push_str(&self.indent_line("end"));
        }
        if let Some(finalizer) = finalizer {
            out.push_str(&self.translate_block_stmts_as("do", finalizer)?);
        }
        Ok(out)
    }

    fn translate_block_stmts_as(&mut self, keyword: &str, stmts: &[Stmt]) -> Result<String> {
        let mut out = self.indent_line(keyword);
        out.push_str(&self.translate_block_stmts(stmts)?);
        out.push_str(&self.indent_line("end"));
        Ok(out)
    }

    fn translate_variable_declaration(&mut self, declarators: &[VariableDeclarator], exported: bool) -> Result<String> {
        if declarators.len() == 1 {
            let decl = &declarators[0];
            if let (BindingPattern::Array { elements }, Some(init)) = (&decl.pattern, &decl.init) {
                if is_flat_identifier_array(elements) {
                    if let Expr::Call { returns_tuple: true, .. } = strip_loc(init) {
                        let names: Vec<String> = elements
                            .iter()
                            .map(|e| match e {
                                Some(elem) => match &elem.pattern {
                                    BindingPattern::Identifier { name, .. } => name.clone(),
                                    _ => unreachable!("checked by is_flat_identifier_array"),
                                },
                                None => unreachable!("checked by is_flat_identifier_array"),
                            })
                            .collect();
                        let init_str = self.translate_expr(init)?;
                        let out = self.indent_line(format!("local {} = {init_str};", names.join(", ")));
                        if exported {
                            for n in &names {
                                self.push_export_name(n)?;
                            }
                        }
                        return Ok(out);
                    }
                }
            }
        }

        let mut out = String::new();
        for decl in declarators {
            out.push_str(&self.translate_one_declarator(decl, exported)?);
        }
        Ok(out)
    }

    fn translate_one_declarator(&mut self, decl: &VariableDeclarator, exported: bool) -> Result<String> {
        match &decl.pattern {
            BindingPattern::Identifier { name, .. } => {
                let init = match decl.init.as_ref().map(|e| (e, strip_loc(e))) {
                    None | Some((_, Expr::UndefinedLiteral)) => None,
                    Some((init, _)) => Some(init),
                };
                let out = match init {
                    None => self.indent_line(format!("local {name};")),
                    Some(init) => {
                        let init_str = self.translate_expr(init)?;
                        let rendered = if let Expr::Call { returns_tuple: true, .. } = strip_loc(init) {
                            if decl.ty.is_tuple {
                                format!("{{ {init_str} }}")
                            } else {
                                format!("({init_str})")
                            }
                        } else {
                            init_str
                        };
                        self.indent_line(format!("local {name} = {rendered};"))
                    }
                };
                if exported {
                    self.push_export_name(name)?;
                }
                Ok(out)
            }
            pattern => {
                let Some(init) = decl.init.as_ref() else {
                    return Err(TranslationError::MissingDeclaratorInitializer(self.label()));
                };
                let init_str = self.translate_expr(init)?;
                let tmp = self.ctx.fresh_ident();
                let mut out = self.indent_line(format!("local {tmp} = {init_str};"));
                let mut lowering = BindingLowering::default();
                self.lower_binding_pattern(pattern, &tmp, &mut lowering)?;
                out.push_str(&self.indent_each_line(&lowering.render_declaration()));
                if exported {
                    for n in &lowering.declared_names {
                        self.push_export_name(n)?;
                    }
                }
                Ok(out)
            }
        }
    }

    fn translate_import(&mut self, decl: &crate::ast::ImportDecl) -> Result<String> {
        let require_expr = self
            .resolver
            .get_relative_import_path(&self.file_name, &decl.specifier, &decl.specifier)?;
        if decl.bindings.len() == 1 {
            let line = match &decl.bindings[0] {
                ImportBinding::Default(local) => format!("local {local} = ({require_expr})._default;"),
                ImportBinding::Namespace(local) => format!("local {local} = {require_expr};"),
                ImportBinding::Named { source_name, local } => {
                    format!("local {local} = ({require_expr}).{source_name};")
                }
            };
            return Ok(self.indent_line(line));
        }
        let tmp = self.ctx.fresh_ident();
        let mut out = self.indent_line(format!("local {tmp} = {require_expr};"));
        for binding in &decl.bindings {
            let line = match binding {
                ImportBinding::Default(local) => format!("local {local} = {tmp}._default;"),
                ImportBinding::Namespace(local) => format!("local {local} = {tmp};"),
                ImportBinding::Named { source_name, local } => format!("local {local} = {tmp}.{source_name};"),
            };
            out.push_str(&self.indent_line(line));
        }
        Ok(out)
    }

    fn translate_export(&mut self, decl: &crate::ast::ExportDecl) -> Result<String> {
        if matches!(self.script_type, crate::ast::ScriptType::Script) {
            return Err(TranslationError::ExportInScript(self.label()));
        }
        let target = self.ctx.current_namespace().unwrap_or("_exports").to_string();
        let out = match &decl.kind {
            ExportKind::Star { specifier } => {
                let require_expr = self
                    .resolver
                    .get_relative_import_path(&self.file_name, specifier, specifier)?;
                self.indent_line(format!(
                    "{}.{}({require_expr}, {target});",
                    runtime::RUNTIME_NAMESPACE,
                    runtime::HELPER_EXPORT_NAMESPACE
                ))
            }
            ExportKind::Named { names, specifier } => {
                let mut out = String::new();
                match specifier {
                    Some(spec) => {
                        let require_expr = self.resolver.get_relative_import_path(&self.file_name, spec, spec)?;
                        let tmp = self.ctx.fresh_ident();
                        out.push_str(&self.indent_line(format!("local {tmp} = {require_expr};")));
                        for (source, local) in names {
                            out.push_str(&self.indent_line(format!("{target}.{local} = {tmp}.{source};")));
                        }
                    }
                    None => {
                        for (source, local) in names {
                            out.push_str(&self.indent_line(format!("{target}.{local} = {source};")));
                        }
                    }
                }
                out
            }
            ExportKind::ExportAssignment(expr) => {
                let e = self.translate_expr(expr)?;
                self.indent_line(format!("{target} = {e};"))
            }
            ExportKind::Default(expr) => {
                let e = self.translate_expr(expr)?;
                self.indent_line(format!("{target}._default = {e};"))
            }
        };
        self.ctx.mark_module();
        Ok(out)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Unwrapping is acceptable in tests
mod tests {
    use super::*;
    use crate::ast::{BindingElement, Expr as E, ScriptContext, ScriptType, Ty};
    use crate::config::TranspileConfig;
    use crate::resolver::FixedTableResolver;

    fn translator(resolver: &FixedTableResolver, config: &TranspileConfig) -> Translator<'_, FixedTableResolver> {
        Translator::new("x.ts", ScriptContext::None, ScriptType::Module, resolver, config)
    }

    fn translator_script(resolver: &FixedTableResolver, config: &TranspileConfig) -> Translator<'_, FixedTableResolver> {
        Translator::new("x.ts", ScriptContext::None, ScriptType::Script, resolver, config)
    }

    #[test]
    fn while_loop_without_continue_emits_plain_while() {
        let resolver = FixedTableResolver::new();
        let config = TranspileConfig::default();
        let mut t = translator(&resolver, &config);
        let stmt = Stmt::While {
            cond: E::BooleanLiteral(true),
            body: Box::new(Stmt::Block(vec![Stmt::Break])),
        };
        let out = t.translate_stmt(&stmt).expect("ok");
        assert!(out.contains("while true do"));
        assert!(!out.contains("_continue_"));
    }

    #[test]
    fn while_loop_with_continue_wraps_body_in_repeat_until_true() {
        let resolver = FixedTableResolver::new();
        let config = TranspileConfig::default();
        let mut t = translator(&resolver, &config);
        let stmt = Stmt::While {
            cond: E::BooleanLiteral(true),
            body: Box::new(Stmt::Block(vec![Stmt::Continue])),
        };
        let out = t.translate_stmt(&stmt).expect("ok");
        assert!(out.contains("local _continue_0 = false;"));
        assert!(out.contains("repeat"));
        assert!(out.contains("_continue_0 = true; break;"));
        assert!(out.contains("until true"));
        assert!(out.contains("if not _continue_0 then break end"));
    }

    #[test]
    fn for_loop_update_runs_after_continue_guard() {
        let resolver = FixedTableResolver::new();
        let config = TranspileConfig::default();
        let mut t = translator(&resolver, &config);
        let stmt = Stmt::For {
            init: ForInit::None,
            cond: Some(E::BooleanLiteral(true)),
            update: Some(E::Postfix {
                op: crate::ast::PostfixOp::Increment,
                operand: Box::new(E::Identifier {
                    name: "i".to_string(),
                    symbol: None,
                    ty: Ty::number(),
                }),
                context: ExprContext::Statement,
            }),
            body: Box::new(Stmt::Block(vec![Stmt::Continue])),
        };
        let out = t.translate_stmt(&stmt).expect("ok");
        let guard_pos = out.find("if not _continue_0 then break end").expect("guard present");
        let update_pos = out.find("i = i + 1").expect("update present");
        assert!(update_pos > guard_pos);
    }

    #[test]
    fn for_in_translates_to_pairs_loop() {
        let resolver = FixedTableResolver::new();
        let config = TranspileConfig::default();
        let mut t = translator(&resolver, &config);
        let stmt = Stmt::ForIn {
            key: ForInKey::Identifier("k".to_string()),
            init: None,
            object: E::Identifier { name: "obj".to_string(), symbol: None, ty: Ty::unknown() },
            body: Box::new(Stmt::Block(vec![])),
        };
        let out = t.translate_stmt(&stmt).expect("ok");
        assert!(out.contains("for k in pairs(obj) do"));
    }

    #[test]
    fn for_in_with_legacy_initializer_is_rejected() {
        let resolver = FixedTableResolver::new();
        let config = TranspileConfig::default();
        let mut t = translator(&resolver, &config);
        let stmt = Stmt::ForIn {
            key: ForInKey::Identifier("k".to_string()),
            init: Some(E::NumericLiteral { text: "0".to_string() }),
            object: E::Identifier { name: "obj".to_string(), symbol: None, ty: Ty::unknown() },
            body: Box::new(Stmt::Block(vec![])),
        };
        let err = t.translate_stmt(&stmt).unwrap_err();
        assert_eq!(err.discriminant(), "unexpected-for-in-initializer");
    }

    #[test]
    fn for_in_with_binding_pattern_key_is_rejected() {
        let resolver = FixedTableResolver::new();
        let config = TranspileConfig::default();
        let mut t = translator(&resolver, &config);
        let stmt = Stmt::ForIn {
            key: ForInKey::Pattern(BindingPattern::Array { elements: vec![] }),
            init: None,
            object: E::Identifier { name: "obj".to_string(), symbol: None, ty: Ty::unknown() },
            body: Box::new(Stmt::Block(vec![])),
        };
        let err = t.translate_stmt(&stmt).unwrap_err();
        assert_eq!(err.discriminant(), "binding-pattern-in-for-in");
    }

    #[test]
    fn for_in_empty_variable_name_is_rejected() {
        let resolver = FixedTableResolver::new();
        let config = TranspileConfig::default();
        let mut t = translator(&resolver, &config);
        let stmt = Stmt::ForIn {
            key: ForInKey::Identifier(String::new()),
            init: None,
            object: E::Identifier { name: "obj".to_string(), symbol: None, ty: Ty::unknown() },
            body: Box::new(Stmt::Block(vec![])),
        };
        let err = t.translate_stmt(&stmt).unwrap_err();
        assert_eq!(err.discriminant(), "empty-for-variable-name");
    }

    #[test]
    fn var_declaration_is_rejected() {
        let resolver = FixedTableResolver::new();
        let config = TranspileConfig::default();
        let mut t = translator(&resolver, &config);
        let stmt = Stmt::VariableDeclaration {
            kind: VarKind::Var,
            declarators: vec![],
            exported: false,
        };
        let err = t.translate_stmt(&stmt).unwrap_err();
        assert_eq!(err.discriminant(), "var-declaration");
    }

    #[test]
    fn tuple_typed_variable_collects_all_returns_into_a_table() {
        let resolver = FixedTableResolver::new();
        let config = TranspileConfig::default();
        let mut t = translator(&resolver, &config);
        let decl = VariableDeclarator {
            pattern: BindingPattern::Identifier { name: "x".to_string(), captured_into_this: false },
            init: Some(E::Call {
                callee: Box::new(E::Identifier { name: "f".to_string(), symbol: None, ty: Ty::unknown() }),
                args: vec![],
                returns_tuple: true,
            }),
            ty: Ty { is_tuple: true, ..Ty::unknown() },
        };
        let stmt = Stmt::VariableDeclaration {
            kind: VarKind::Let,
            declarators: vec![decl],
            exported: false,
        };
        let out = t.translate_stmt(&stmt).expect("ok");
        assert_eq!(out, "local x = { f() };\n");
    }

    #[test]
    fn flat_array_pattern_of_a_tuple_call_becomes_multi_assignment() {
        let resolver = FixedTableResolver::new();
        let config = TranspileConfig::default();
        let mut t = translator(&resolver, &config);
        let decl = VariableDeclarator {
            pattern: BindingPattern::Array {
                elements: vec![
                    Some(BindingElement {
                        pattern: BindingPattern::Identifier { name: "a".to_string(), captured_into_this: false },
                        default: None,
                        is_rest: false,
                    }),
                    Some(BindingElement {
                        pattern: BindingPattern::Identifier { name: "b".to_string(), captured_into_this: false },
                        default: None,
                        is_rest: false,
                    }),
                ],
            },
            init: Some(E::Call {
                callee: Box::new(E::Identifier { name: "f".to_string(), symbol: None, ty: Ty::unknown() }),
                args: vec![],
                returns_tuple: true,
            }),
            ty: Ty::unknown(),
        };
        let stmt = Stmt::VariableDeclaration {
            kind: VarKind::Const,
            declarators: vec![decl],
            exported: false,
        };
        let out = t.translate_stmt(&stmt).expect("ok");
        assert_eq!(out, "local a, b = f();\n");
    }

    #[test]
    fn switch_fallthrough_uses_repeat_until_true_with_flag() {
        let resolver = FixedTableResolver::new();
        let config = TranspileConfig::default();
        let mut t = translator(&resolver, &config);
        let stmt = Stmt::Switch {
            discriminant: E::Identifier { name: "x".to_string(), symbol: None, ty: Ty::number() },
            cases: vec![
                SwitchCase { test: Some(E::NumericLiteral { text: "1".to_string() }), body: vec![] },
                SwitchCase { test: None, body: vec![Stmt::Break] },
            ],
        };
        let out = t.translate_stmt(&stmt).expect("ok");
        assert!(out.contains("repeat"));
        assert!(out.contains("until true"));
        assert!(out.contains("_1 = true;"));
    }

    #[test]
    fn try_catch_finally_uses_pcall_and_always_runs_finally() {
        let resolver = FixedTableResolver::new();
        let config = TranspileConfig::default();
        let mut t = translator(&resolver, &config);
        let stmt = Stmt::Try {
            block: vec![Stmt::Throw(E::StringLiteral { value: "boom".to_string() })],
            handler: Some(CatchClause {
                param_name: Some("e".to_string()),
                body: vec![],
            }),
            finalizer: Some(vec![Stmt::Break]),
        };
        let out = t.translate_stmt(&stmt).expect("ok");
        assert!(out.contains("pcall(function()"));
        assert!(out.contains("TS.decodeError"));
        assert!(out.contains("do\n"));
    }

    #[test]
    fn export_in_script_file_is_rejected() {
        let resolver = FixedTableResolver::new();
        let config = TranspileConfig::default();
        let mut t = translator_script(&resolver, &config);
        let stmt = Stmt::Export(crate::ast::ExportDecl {
            kind: ExportKind::Default(E::NumericLiteral { text: "1".to_string() }),
        });
        let err = t.translate_stmt(&stmt).unwrap_err();
        assert_eq!(err.discriminant(), "export-in-script");
    }

    #[test]
    fn single_named_import_inlines_require() {
        let resolver = FixedTableResolver::new().with_mapping("./m", "require(\"./m\")");
        let config = TranspileConfig::default();
        let mut t = translator(&resolver, &config);
        let decl = crate::ast::ImportDecl {
            specifier: "./m".to_string(),
            bindings: vec![ImportBinding::Named { source_name: "foo".to_string(), local: "foo".to_string() }],
        };
        let out = t.translate_import(&decl).expect("ok");
        assert_eq!(out, "local foo = (require(\"./m\")).foo;\n");
    }
}
