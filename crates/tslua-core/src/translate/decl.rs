//! Function, class, namespace, and enum declaration translation
//!

use crate::ast::{
    ClassDecl, ClassMember, ConstructorDecl, EnumDecl, EnumMemberValue, FunctionDecl, MethodKind,
    MethodMember, NamespaceDecl, PropertyMember, Stmt,
};
use crate::error::{Result, TranslationError};
use crate::resolver::ModuleResolver;
use crate::runtime;

use super::binding::LoweredParams;
use super::Translator;

fn format_plain_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl<'a, R: ModuleResolver> Translator<'a, R> {
    pub(crate) fn translate_function_decl(&mut self, decl: &FunctionDecl) -> Result<String> {
        let lowered = self.lower_params(&decl.params)?;
        let prefix = lowered.body_prefix();

        match &decl.name {
            Some(name) => {
                self.ctx.hoist(name.clone());
                let mut out = self.indent_line(format!("function {name}({})", lowered.names.join(", ")));
                out.push_str(&self.translate_function_body(&prefix, &decl.body, decl.returns_tuple)?);
                out.push_str(&self.indent_line("end"));
                if decl.exported {
                    self.push_export_name(name)?;
                }
                Ok(out)
            }
            // Anonymous function declarations only arise as `export default
            // function(...) {}`; there is no local to hoist, so the
            // function goes straight onto the export target.
            None => {
                let target = self.ctx.current_namespace().unwrap_or("_exports").to_string();
                let mut out = self.indent_line(format!(
                    "{target}._default = function({})",
                    lowered.names.join(", ")
                ));
                out.push_str(&self.translate_function_body(&prefix, &decl.body, decl.returns_tuple)?);
                out.push_str(&self.indent_line("end;"));
                self.ctx.mark_module();
                Ok(out)
            }
        }
    }

    /// Translates a plain (non-constructor) function/method body: applies
    /// `prefix` (parameter-lowering text, already rendered, unindented),
    /// then the statements, flushing the scope's hoist/export frames
    /// around them.
    pub(crate) fn translate_function_body(&mut self, prefix: &str, stmts: &[Stmt], returns_tuple: bool) -> Result<String> {
        let prev_tuple = self.current_function_returns_tuple;
        self.current_function_returns_tuple = returns_tuple;
        self.ctx.push_indent();
        let guard = self.ctx.enter_scope();
        let mut body = String::new();
        body.push_str(&self.indent_each_line(prefix));
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
        self.current_function_returns_tuple = prev_tuple;
        Ok(out)
    }

    fn translate_method_member(&mut self, target: &str, member: &MethodMember) -> Result<String> {
        let lowered = self.lower_params(&member.params)?;
        let mut params = vec!["self".to_string()];
        params.extend(lowered.names.iter().cloned());
        let prefix = lowered.body_prefix();
        let mut out = self.indent_line(format!("{target}.{} = function({})", member.name, params.join(", ")));
        out.push_str(&self.translate_function_body(&prefix, &member.body, member.returns_tuple)?);
        out.push_str(&self.indent_line("end;"));
        Ok(out)
    }

    pub(crate) fn translate_class_decl(&mut self, decl: &ClassDecl) -> Result<String> {
        for member in &decl.members {
            if let ClassMember::Method(m) = member {
                if runtime::is_reserved_metamethod(&m.name) {
                    let Some(mm) = runtime::reserved_metamethod_name(&m.name) else {
                        unreachable!("checked by is_reserved_metamethod");
                    };
                    return Err(TranslationError::ReservedMetamethod(self.label(), mm));
                }
            }
        }

        let base_name = decl.base.as_ref().and_then(|b| b.symbol_name.clone());
        self.ctx.hoist(decl.name.clone());

        let mut out = self.indent_line("do");
        self.ctx.push_indent();
        let guard = self.ctx.enter_scope();
        let mut body = String::new();
        let class = decl.name.as_str();

        // 1. class table (static members live directly on it).
        match &base_name {
            Some(base) => {
                body.push_str(&self.indent_line(format!(
                    "{class} = setmetatable({{}}, {{ __index = {base} }});"
                )));
            }
            None => body.push_str(&self.indent_line(format!("{class} = {{}};"))),
        }
        for member in &decl.members {
            if let ClassMember::Method(m) = member {
                if m.is_static && m.kind == MethodKind::Method {
                    body.push_str(&self.translate_method_member(class, m)?);
                }
            }
        }

        // 2. prototype table, captured under a synthetic local so getter
        // overrides on Cls.__index can still fall back to it by reference.
        let proto = self.ctx.fresh_ident();
        match &base_name {
            Some(base) => {
                body.push_str(&self.indent_line(format!(
                    "{class}.__index = setmetatable({{}}, {{ __index = {base} }});"
                )));
            }
            None => body.push_str(&self.indent_line(format!("{class}.__index = {{}};"))),
        }
        body.push_str(&self.indent_line(format!("local {proto} = {class}.__index;")));
        for member in &decl.members {
            if let ClassMember::Method(m) = member {
                if !m.is_static && m.kind == MethodKind::Method {
                    body.push_str(&self.translate_method_member(&proto, m)?);
                }
            }
        }

        // 3. metamethod trampolines.
        for member in &decl.members {
            if let ClassMember::Method(m) = member {
                if !m.is_static && m.kind == MethodKind::Method && runtime::is_installable_metamethod(&m.name) {
                    body.push_str(&self.indent_line(format!(
                        "{class}.{0} = function(self, ...) return self:{0}(...) end;",
                        m.name
                    )));
                }
            }
        }

        // 4. factory.
        if !decl.is_abstract {
            body.push_str(&self.indent_line(format!(
                "{class}.new = function(...) return {class}.constructor(setmetatable({{}}, {class}), ...) end;"
            )));
        }

        // 5. constructor.
        let extra_initializers: Vec<&PropertyMember> = decl
            .members
            .iter()
            .filter_map(|m| match m {
                ClassMember::Property(p) if !p.is_static => Some(p),
                _ => None,
            })
            .collect();
        body.push_str(&self.translate_constructor(class, base_name.as_deref(), decl.constructor.as_ref(), &extra_initializers)?);

        // 6. static properties.
        for member in &decl.members {
            if let ClassMember::Property(p) = member {
                if p.is_static {
                    body.push_str(&self.translate_static_property(class, p)?);
                }
            }
        }

        // 7. getters.
        let getters: Vec<&MethodMember> = decl
            .members
            .iter()
            .filter_map(|m| match m {
                ClassMember::Method(mm) if mm.kind == MethodKind::Getter => Some(mm),
                _ => None,
            })
            .collect();
        if !getters.is_empty() {
            body.push_str(&self.indent_line(format!("{class}._getters = {{}};")));
            for g in &getters {
                body.push_str(&self.translate_method_member(&format!("{class}._getters"), g)?);
            }
            body.push_str(&self.indent_line(format!("{class}.__index = function(self, key)")));
            self.ctx.push_indent();
            body.push_str(&self.indent_line(format!("local getter = {class}._getters[key];")));
            body.push_str(&self.indent_line("if getter then return getter(self) end;"));
            body.push_str(&self.indent_line(format!("return {proto}[key];")));
            self.ctx.pop_indent();
            body.push_str(&self.indent_line("end;"));
        }

        // 8. setters.
        let setters: Vec<&MethodMember> = decl
            .members
            .iter()
            .filter_map(|m| match m {
                ClassMember::Method(mm) if mm.kind == MethodKind::Setter => Some(mm),
                _ => None,
            })
            .collect();
        if !setters.is_empty() {
            body.push_str(&self.indent_line(format!("{class}._setters = {{}};")));
            for s in &setters {
                body.push_str(&self.translate_method_member(&format!("{class}._setters"), s)?);
            }
            body.push_str(&self.indent_line(format!("{class}.__newindex = function(self, key, value)")));
            self.ctx.push_indent();
            body.push_str(&self.indent_line(format!("local setter = {class}._setters[key];")));
            body.push_str(&self.indent_line("if setter then setter(self, value) else rawset(self, key, value) end;"));
            self.ctx.pop_indent();
            body.push_str(&self.indent_line("end;"));
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

        if decl.exported {
            self.push_export_name(&decl.name)?;
        }
        Ok(out)
    }

    fn translate_static_property(&mut self, class: &str, prop: &PropertyMember) -> Result<String> {
        let value = match &prop.initializer {
            Some(e) => self.translate_expr(e)?,
            None => "nil".to_string(),
        };
        Ok(self.indent_line(format!("{class}.{} = {value};", prop.name)))
    }

    /// Emits the constructor body in strict order: defaults, the leading
    /// `super(...)` call (if textually first in the
    /// user body), parameter initializers (captured-into-`this` and
    /// destructuring expansions), the accumulated extra initializers
    /// (instance-property initial values, declaration order), the
    /// remaining user statements, then a mandatory `return self`.
    fn translate_constructor(
        &mut self,
        class: &str,
        base_name: Option<&str>,
        ctor: Option<&ConstructorDecl>,
        extra_initializers: &[&PropertyMember],
    ) -> Result<String> {
        let (params, lowered, body_stmts, super_call_first) = match ctor {
            Some(c) => {
                let lowered = self.lower_params(&c.params)?;
                (lowered.names.clone(), lowered, c.body.as_slice(), c.super_call_first.as_ref())
            }
            None => (Vec::new(), LoweredParams { names: Vec::new(), defaults: Vec::new(), bindings: Vec::new(), rest_collect: None }, &[][..], None),
        };

        let mut formal = vec!["self".to_string()];
        if ctor.is_none() && base_name.is_some() {
            formal.push("...".to_string());
        } else {
            formal.extend(params.iter().cloned());
        }

        let mut out = self.indent_line(format!("{class}.constructor = function({})", formal.join(", ")));
        self.ctx.push_indent();
        let guard = self.ctx.enter_scope();
        let was_in_constructor = self.in_constructor;
        self.in_constructor = true;
        let mut body = String::new();

        match ctor {
            None => {
                if let Some(base) = base_name {
                    body.push_str(&self.indent_line(format!("{base}.constructor(self, ...);")));
                }
            }
            Some(_) => {
                // Phase 1: defaults (nil-check lines only; captured-into-this
                // self-assignments are deferred to phase 3).
                for d in &lowered.defaults {
                    if d.starts_with("if ") {
                        body.push_str(&self.indent_line(d));
                    }
                }

                // Phase 2: leading super-call, if the user body starts with one.
                let mut remaining = body_stmts;
                if let Some(args) = super_call_first {
                    if let Some(base) = base_name {
                        let mut rendered = Vec::with_capacity(args.len());
                        for a in args {
                            let s = self.translate_expr(&a.expr)?;
                            rendered.push(if a.is_spread { format!("unpack({s})") } else { s });
                        }
                        let joined = if rendered.is_empty() {
                            "self".to_string()
                        } else {
                            format!("self, {}", rendered.join(", "))
                        };
                        body.push_str(&self.indent_line(format!("{base}.constructor({joined});")));
                    }
                    remaining = &body_stmts[1.min(body_stmts.len())..];
                }

                // Phase 3: parameter initializers (captured-into-this,
                // destructuring expansions, rest collection).
                for d in &lowered.defaults {
                    if d.starts_with("self.") {
                        body.push_str(&self.indent_line(d));
                    }
                }
                if let Some(rest) = &lowered.rest_collect {
                    body.push_str(&self.indent_line(rest));
                }
                for b in &lowered.bindings {
                    body.push_str(&self.indent_each_line(&b.render_declaration()));
                }

                // Phase 4: extra initializers (instance-property initial
                // values, declaration order).
                for p in extra_initializers {
                    let value = match &p.initializer {
                        Some(e) => self.translate_expr(e)?,
                        None => "nil".to_string(),
                    };
                    body.push_str(&self.indent_line(format!("self.{} = {value};", p.name)));
                }

                // Phase 5: remaining user statements.
                for s in remaining {
                    body.push_str(&self.translate_stmt(s)?);
                }
            }
        }

        body.push_str(&self.indent_line("return self;"));

        let (hoist, export) = guard.finish();
        if !hoist.is_empty() {
            out.push_str(&self.indent_line(format!("local {};", hoist.join(", "))));
        }
        out.push_str(&body);
        for e in &export {
            out.push_str(&self.indent_line(e));
        }
        self.ctx.pop_indent();
        self.in_constructor = was_in_constructor;
        out.push_str(&self.indent_line("end;"));
        Ok(out)
    }

    pub(crate) fn translate_namespace_decl(&mut self, decl: &NamespaceDecl) -> Result<String> {
        if is_type_only_body(&decl.body) {
            return Ok(String::new());
        }
        self.ctx.hoist(decl.name.clone());
        let mut out = self.indent_line(format!("{} = {{}};", decl.name));
        out.push_str(&self.indent_line("do"));

        // namespaceStack holds a synthetic alias for the namespace object,
        // not its source name directly, so nested exports never collide
        // with a same-named declaration re-opened elsewhere.
        self.ctx.push_indent();
        let alias = self.ctx.fresh_ident();
        out.push_str(&self.indent_line(format!("local {alias} = {};", decl.name)));
        self.ctx.pop_indent();

        self.ctx.push_namespace(alias);
        let body = self.translate_block_stmts(&decl.body);
        self.ctx.pop_namespace();
        out.push_str(&body?);
        out.push_str(&self.indent_line("end"));
        if decl.exported {
            self.push_export_name(&decl.name)?;
        }
        Ok(out)
    }

    pub(crate) fn translate_enum_decl(&mut self, decl: &EnumDecl) -> Result<String> {
        if decl.is_const {
            return Ok(String::new());
        }
        self.ctx.hoist(decl.name.clone());
        let name = decl.name.as_str();
        let mut out = self.indent_line(format!("{name} = {name} or {{}};"));
        out.push_str(&self.indent_line("do"));
        self.ctx.push_indent();
        let mut body = String::new();
        let mut next_auto = 0f64;
        for member in &decl.members {
            match &member.value {
                EnumMemberValue::Auto => {
                    let v = format_plain_number(next_auto);
                    body.push_str(&self.indent_line(format!("{name}.{} = {v};", member.name)));
                    body.push_str(&self.indent_line(format!("{name}[{v}] = \"{}\";", member.name)));
                    next_auto += 1.0;
                }
                EnumMemberValue::Number(n) => {
                    let v = format_plain_number(*n);
                    body.push_str(&self.indent_line(format!("{name}.{} = {v};", member.name)));
                    body.push_str(&self.indent_line(format!("{name}[{v}] = \"{}\";", member.name)));
                    next_auto = n + 1.0;
                }
                EnumMemberValue::Str(s) => {
                    body.push_str(&self.indent_line(format!(
                        "{name}.{} = \"{}\";",
                        member.name,
                        runtime::escape_string(s)
                    )));
                }
            }
        }
        self.ctx.pop_indent();
        out.push_str(&body);
        out.push_str(&self.indent_line("end"));
        if decl.exported {
            self.push_export_name(&decl.name)?;
        }
        Ok(out)
    }
}

/// True if every statement of a namespace body (transitively, through
/// nested namespaces) is type-only erasure.
fn is_type_only_body(stmts: &[Stmt]) -> bool {
    stmts.iter().all(|s| match strip(s) {
        Stmt::TypeOnly | Stmt::Empty => true,
        Stmt::NamespaceDecl(ns) => is_type_only_body(&ns.body),
        _ => false,
    })
}

fn strip(stmt: &Stmt) -> &Stmt {
    match stmt {
        Stmt::Loc(_, inner) => strip(inner),
        other => other,
    }
}
