//! Binding-pattern and parameter lowering

use crate::ast::{BindingElement, BindingPattern, Expr, ObjectBindingProperty, Param};
use crate::error::{Result, TranslationError};
use crate::resolver::ModuleResolver;

use super::Translator;

/// The three textual fragments a binding pattern walk accumulates, in
/// emission order.
#[derive(Debug, Default)]
pub struct BindingLowering {
    /// Introduces temporaries for nested patterns.
    pub pre_statements: Vec<String>,
    /// Flat declaration of every leaf identifier.
    pub declared_names: Vec<String>,
    pub declared_inits: Vec<String>,
    /// Applies default values (`if x == nil then x = <default> end`).
    pub post_statements: Vec<String>,
}

impl BindingLowering {
    /// Renders `local a, b, c = initA, initB, initC;` followed by the
    /// post-statements, in order.
    pub fn render_declaration(&self) -> String {
        let mut out = String::new();
        for stmt in &self.pre_statements {
            out.push_str(stmt);
            out.push('\n');
        }
        if !self.declared_names.is_empty() {
            out.push_str("local ");
            out.push_str(&self.declared_names.join(", "));
            out.push_str(" = ");
            out.push_str(&self.declared_inits.join(", "));
            out.push_str(";\n");
        }
        for stmt in &self.post_statements {
            out.push_str(stmt);
            out.push('\n');
        }
        out
    }
}

impl<'a, R: ModuleResolver> Translator<'a, R> {
    /// Walks a binding pattern against a root expression (already
    /// translated to target text), accumulating the three fragments above.
    /// Array patterns use 1-based numeric keys; object patterns use string
    /// keys.
    pub fn lower_binding_pattern(&mut self, pattern: &BindingPattern, root_expr: &str, out: &mut BindingLowering) -> Result<()> {
        match pattern {
            BindingPattern::Identifier { name, captured_into_this } => {
                out.declared_names.push(name.clone());
                out.declared_inits.push(root_expr.to_string());
                if *captured_into_this {
                    out.post_statements.push(format!("self.{name} = {name};"));
                }
                Ok(())
            }
            BindingPattern::Array { elements } => {
                for (i, elem) in elements.iter().enumerate() {
                    let Some(elem) = elem else { continue };
                    if elem.is_rest {
                        return Err(TranslationError::SpreadInBindingPattern(self.label()));
                    }
                    let index_expr = format!("{root_expr}[{}]", i + 1);
                    self.lower_binding_element(elem, &index_expr, out)?;
                }
                Ok(())
            }
            BindingPattern::Object { properties } => {
                for prop in properties {
                    if prop.is_rest {
                        return Err(TranslationError::SpreadInBindingPattern(self.label()));
                    }
                    let field_expr = crate::runtime::safe_index(root_expr, &prop.source_name);
                    self.lower_object_binding_property(prop, &field_expr, out)?;
                }
                Ok(())
            }
        }
    }

    fn lower_binding_element(&mut self, elem: &BindingElement, field_expr: &str, out: &mut BindingLowering) -> Result<()> {
        match &elem.pattern {
            BindingPattern::Identifier { name, captured_into_this } => {
                out.declared_names.push(name.clone());
                out.declared_inits.push(field_expr.to_string());
                if let Some(default) = &elem.default {
                    let default_str = self.translate_expr(default)?;
                    out.post_statements.push(format!(
                        "if {name} == nil then {name} = {default_str} end"
                    ));
                }
                if *captured_into_this {
                    out.post_statements.push(format!("self.{name} = {name};"));
                }
                Ok(())
            }
            nested => {
                let tmp = self.ctx.fresh_ident();
                out.pre_statements.push(format!("local {tmp} = {field_expr};"));
                if let Some(default) = &elem.default {
                    let default_str = self.translate_expr(default)?;
                    out.pre_statements.push(format!("if {tmp} == nil then {tmp} = {default_str} end"));
                }
                self.lower_binding_pattern(nested, &tmp, out)
            }
        }
    }

    fn lower_object_binding_property(&mut self, prop: &ObjectBindingProperty, field_expr: &str, out: &mut BindingLowering) -> Result<()> {
        match &prop.pattern {
            BindingPattern::Identifier { name, captured_into_this } => {
                out.declared_names.push(name.clone());
                out.declared_inits.push(field_expr.to_string());
                if let Some(default) = &prop.default {
                    let default_str = self.translate_expr(default)?;
                    out.post_statements.push(format!(
                        "if {name} == nil then {name} = {default_str} end"
                    ));
                }
                if *captured_into_this {
                    out.post_statements.push(format!("self.{name} = {name};"));
                }
                Ok(())
            }
            nested => {
                let tmp = self.ctx.fresh_ident();
                out.pre_statements.push(format!("local {tmp} = {field_expr};"));
                if let Some(default) = &prop.default {
                    let default_str = self.translate_expr(default)?;
                    out.pre_statements.push(format!("if {tmp} == nil then {tmp} = {default_str} end"));
                }
                self.lower_binding_pattern(nested, &tmp, out)
            }
        }
    }

    /// Lowers a parameter list to its target-language parameter names plus
    /// body-prefix statements. Constructor contexts keep
    /// default-value statements in a separate list so the caller can emit
    /// them before the super-call; ordinary functions splice
    /// them directly into `defaults`.
    pub fn lower_params(&mut self, params: &[Param]) -> Result<LoweredParams> {
        let mut names = Vec::new();
        let mut defaults = Vec::new();
        let mut bindings = Vec::new();
        let mut rest_collect = None;

        for param in params {
            if param.is_rest {
                let BindingPattern::Identifier { name, .. } = &param.pattern else {
                    return Err(TranslationError::MissingParameterChild(self.label()));
                };
                names.push("...".to_string());
                rest_collect = Some(format!("local {name} = {{ ... }};"));
                continue;
            }
            match &param.pattern {
                BindingPattern::Identifier { name, captured_into_this } => {
                    names.push(name.clone());
                    if let Some(default) = &param.default {
                        let default_str = self.translate_expr(default)?;
                        defaults.push(format!("if {name} == nil then {name} = {default_str} end"));
                    }
                    if *captured_into_this {
                        defaults.push(format!("self.{name} = {name};"));
                    }
                }
                nested => {
                    let tmp = self.ctx.fresh_ident();
                    names.push(tmp.clone());
                    let mut lowering = BindingLowering::default();
                    if let Some(default) = &param.default {
                        let default_str = self.translate_expr(default)?;
                        lowering
                            .pre_statements
                            .push(format!("if {tmp} == nil then {tmp} = {default_str} end"));
                    }
                    self.lower_binding_pattern(nested, &tmp, &mut lowering)?;
                    bindings.push(lowering);
                }
            }
        }

        Ok(LoweredParams {
            names,
            defaults,
            bindings,
            rest_collect,
        })
    }
}

pub struct LoweredParams {
    pub names: Vec<String>,
    /// `if p == nil then p = <default> end` lines, in parameter order.
    pub defaults: Vec<String>,
    /// Full binding-pattern lowerings for destructured parameters, in
    /// parameter order.
    pub bindings: Vec<BindingLowering>,
    /// Statement collecting varargs into a local array, when the last
    /// parameter is a rest parameter.
    pub rest_collect: Option<String>,
}

impl LoweredParams {
    /// Body-prefix statements: defaults, then rest-collection, then
    /// destructuring expansions (defaults before body; rest marker
    /// precedes its collection).
    pub fn body_prefix(&self) -> String {
        let mut out = String::new();
        for d in &self.defaults {
            out.push_str(d);
            out.push('\n');
        }
        if let Some(rest) = &self.rest_collect {
            out.push_str(rest);
            out.push('\n');
        }
        for b in &self.bindings {
            out.push_str(&b.render_declaration());
        }
        out
    }
}
