//! Literal, identifier, and expression translation

use crate::ast::{
    Argument, ArrayElement, AssignOp, BinaryOp, Expr, ExprContext, KnownType, ObjectProperty,
    PostfixOp, PrefixOp, PropertyKey,
};
use crate::error::{Result, TranslationError};
use crate::resolver::ModuleResolver;
use crate::runtime;

use super::Translator;

impl<'a, R: ModuleResolver> Translator<'a, R> {
    /// Translates an expression evaluated for its value (the common case).
    pub fn translate_expr(&mut self, expr: &Expr) -> Result<String> {
        self.translate_expr_ctx(expr, ExprContext::Value)
    }

    /// Translates an expression, tracking whether it sits directly in
    /// statement position (an expression-statement, or a `for` header's
    /// increment clause) — the distinction that decides whether
    /// compound-assignment/increment lowering needs an IIFE wrapper.
    pub fn translate_expr_ctx(&mut self, expr: &Expr, position: ExprContext) -> Result<String> {
        match expr {
            Expr::Loc(loc, inner) => {
                let prev = self.current_line;
                self.current_line = Some(loc.line);
                let out = self.translate_expr_ctx(inner, position);
                self.current_line = prev;
                out
            }
            Expr::NullLiteral => Err(TranslationError::NullLiteral(self.label())),
            Expr::UndefinedLiteral => Ok("nil".to_string()),
            Expr::BooleanLiteral(b) => Ok(b.to_string()),
            Expr::NumericLiteral { text } => Ok(format_numeric_literal(text)),
            Expr::StringLiteral { value } | Expr::NoSubstitutionTemplate { value } => {
                Ok(quote(value))
            }
            Expr::TemplateExpr { fragments, exprs } => self.translate_template(fragments, exprs),
            Expr::Identifier { name, ty: _, symbol: _ } => self.translate_identifier(name),
            Expr::This => Ok("self".to_string()),
            Expr::Super { .. } => Ok("self".to_string()),
            Expr::ArrayLiteral { elements } => self.translate_array_literal(elements),
            Expr::ObjectLiteral { properties } => self.translate_object_literal(properties),
            Expr::Binary { op, left, right } => self.translate_binary(*op, left, right),
            Expr::Prefix { op, operand, context } => self.translate_prefix(*op, operand, *context),
            Expr::Postfix { op, operand, context } => self.translate_postfix(*op, operand, *context),
            Expr::Assign { target, value } => self.translate_assign(target, value),
            Expr::CompoundAssign { op, target, value, context } => {
                self.translate_compound_assign(*op, target, value, *context)
            }
            Expr::Conditional { cond, then_branch, else_branch, then_ty } => {
                self.translate_conditional(cond, then_branch, else_branch, then_ty.admits_falsy())
            }
            Expr::PropertyAccess { receiver, property, symbol, receiver_ty } => {
                self.translate_property_access(receiver, property, symbol.as_ref(), receiver_ty)
            }
            Expr::ElementAccess { receiver, index, receiver_ty } => {
                self.translate_element_access(receiver, index, receiver_ty)
            }
            Expr::Call { callee, args, returns_tuple } => {
                self.translate_call(callee, args, *returns_tuple, position)
            }
            Expr::New { callee, args, has_parens } => self.translate_new(callee, args, *has_parens),
            Expr::Parenthesized(inner) => {
                let s = self.translate_expr(inner)?;
                Ok(format!("({s})"))
            }
            Expr::Spread(inner) => {
                let s = self.translate_expr(inner)?;
                Ok(format!("unpack({s})"))
            }
        }
    }

    fn translate_identifier(&self, name: &str) -> Result<String> {
        if runtime::is_reserved_word(name) {
            return Err(TranslationError::ReservedWordIdentifier(self.label(), name.to_string()));
        }
        if runtime::is_runtime_prefixed_class(name) {
            return Ok(format!("{}.{name}", runtime::RUNTIME_NAMESPACE));
        }
        Ok(name.to_string())
    }

    fn translate_template(&mut self, fragments: &[String], exprs: &[Expr]) -> Result<String> {
        let mut parts = Vec::new();
        for (i, fragment) in fragments.iter().enumerate() {
            if !fragment.is_empty() {
                parts.push(quote(fragment));
            }
            if let Some(e) = exprs.get(i) {
                let translated = self.translate_expr(e)?;
                parts.push(format!("tostring({translated})"));
            }
        }
        if parts.is_empty() {
            return Ok(quote(""));
        }
        Ok(parts.join(" .. "))
    }

    fn translate_array_literal(&mut self, elements: &[ArrayElement]) -> Result<String> {
        if elements.iter().any(|e| matches!(e, ArrayElement::Spread(_))) {
            // Runtime call interleaving inline groups and spread expressions.
            let mut groups: Vec<String> = Vec::new();
            let mut current_group: Vec<String> = Vec::new();
            for element in elements {
                match element {
                    ArrayElement::Item(e) => current_group.push(self.translate_expr(e)?),
                    ArrayElement::Spread(e) => {
                        if !current_group.is_empty() {
                            groups.push(format!("{{ {} }}", current_group.join(", ")));
                            current_group.clear();
                        }
                        groups.push(self.translate_expr(e)?);
                    }
                }
            }
            if !current_group.is_empty() {
                groups.push(format!("{{ {} }}", current_group.join(", ")));
            }
            return Ok(format!(
                "{}.array_concat({})",
                runtime::RUNTIME_NAMESPACE,
                groups.join(", ")
            ));
        }
        let mut items = Vec::with_capacity(elements.len());
        for element in elements {
            let ArrayElement::Item(e) = element else {
                unreachable!("spread elements handled above");
            };
            items.push(self.translate_expr(e)?);
        }
        Ok(format!("{{ {} }}", items.join(", ")))
    }

    fn translate_object_literal(&mut self, properties: &[ObjectProperty]) -> Result<String> {
        if properties.iter().any(|p| matches!(p, ObjectProperty::Spread(_))) {
            let mut segments: Vec<String> = Vec::new();
            let mut current: Vec<String> = Vec::new();
            for prop in properties {
                match prop {
                    ObjectProperty::KeyValue { key, value } => {
                        current.push(self.translate_object_entry(key, value)?);
                    }
                    ObjectProperty::Spread(e) => {
                        if !current.is_empty() {
                            segments.push(format!("{{ {} }}", current.join(", ")));
                            current.clear();
                        }
                        segments.push(self.translate_expr(e)?);
                    }
                }
            }
            if !current.is_empty() {
                segments.push(format!("{{ {} }}", current.join(", ")));
            }
            if !matches!(properties.first(), Some(ObjectProperty::KeyValue { .. })) {
                segments.insert(0, "{}".to_string());
            }
            return Ok(format!(
                "{}.Object_assign({})",
                runtime::RUNTIME_NAMESPACE,
                segments.join(", ")
            ));
        }
        let mut entries = Vec::with_capacity(properties.len());
        for prop in properties {
            let ObjectProperty::KeyValue { key, value } = prop else {
                unreachable!("spread entries handled above");
            };
            entries.push(self.translate_object_entry(key, value)?);
        }
        Ok(format!("{{ {} }}", entries.join(", ")))
    }

    fn translate_object_entry(&mut self, key: &PropertyKey, value: &Expr) -> Result<String> {
        let value_str = self.translate_expr(value)?;
        match key {
            PropertyKey::Ident(name) if runtime::is_valid_identifier(name) => {
                Ok(format!("{name} = {value_str}"))
            }
            PropertyKey::Ident(name) => Ok(format!(
                "[\"{}\"] = {value_str}",
                runtime::escape_string(name)
            )),
            PropertyKey::StringLit(s) => Ok(format!("[\"{}\"] = {value_str}", runtime::escape_string(s))),
            PropertyKey::NumericLit(n) => Ok(format!("[{}] = {value_str}", format_numeric_literal(n))),
            PropertyKey::Computed(e) => {
                let key_str = self.translate_expr(e)?;
                Ok(format!("[{key_str}] = {value_str}"))
            }
        }
    }

    fn translate_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> Result<String> {
        let l = self.translate_expr(left)?;
        let r = self.translate_expr(right)?;
        let left_ty = expr_ty(left);
        let right_ty = expr_ty(right);
        match op {
            BinaryOp::StrictEq => Ok(format!("{l} == {r}")),
            BinaryOp::StrictNe => Ok(format!("{l} ~= {r}")),
            BinaryOp::LooseEq => Err(TranslationError::LooseEquality(self.label(), "==")),
            BinaryOp::LooseNe => Err(TranslationError::LooseEquality(self.label(), "!=")),
            BinaryOp::Add => {
                let is_string = left_ty.map(|t| t.is_string).unwrap_or(false)
                    || right_ty.map(|t| t.is_string).unwrap_or(false);
                let both_number = left_ty.map(|t| t.is_number).unwrap_or(false)
                    && right_ty.map(|t| t.is_number).unwrap_or(false);
                if is_string {
                    Ok(format!("({l}) .. {r}"))
                } else if both_number {
                    Ok(format!("{l} + {r}"))
                } else {
                    Ok(format!("{}.{}({l}, {r})", runtime::RUNTIME_NAMESPACE, runtime::HELPER_ADD))
                }
            }
            BinaryOp::Sub => Ok(format!("{l} - {r}")),
            BinaryOp::Mul => Ok(format!("{l} * {r}")),
            BinaryOp::Div => Ok(format!("{l} / {r}")),
            BinaryOp::Mod => Ok(format!("{l} % {r}")),
            BinaryOp::Pow => Ok(format!("{l} ^ {r}")),
            BinaryOp::Lt => Ok(format!("{l} < {r}")),
            BinaryOp::Le => Ok(format!("{l} <= {r}")),
            BinaryOp::Gt => Ok(format!("{l} > {r}")),
            BinaryOp::Ge => Ok(format!("{l} >= {r}")),
            BinaryOp::BitOr => {
                if is_zero_literal(right) {
                    Ok(format!("{}.{}({l})", runtime::RUNTIME_NAMESPACE, runtime::HELPER_ROUND))
                } else {
                    Ok(format!("{}.{}({l}, {r})", runtime::RUNTIME_NAMESPACE, runtime::HELPER_BOR))
                }
            }
            BinaryOp::BitAnd => Ok(format!("{}.{}({l}, {r})", runtime::RUNTIME_NAMESPACE, runtime::HELPER_BAND)),
            BinaryOp::BitXor => Ok(format!("{}.{}({l}, {r})", runtime::RUNTIME_NAMESPACE, runtime::HELPER_BXOR)),
            BinaryOp::Shl => Ok(format!("{}.{}({l}, {r})", runtime::RUNTIME_NAMESPACE, runtime::HELPER_BLSH)),
            BinaryOp::Shr => Ok(format!("{}.{}({l}, {r})", runtime::RUNTIME_NAMESPACE, runtime::HELPER_BRSH)),
            BinaryOp::And => Ok(format!("{l} and {r}")),
            BinaryOp::Or => Ok(format!("{l} or {r}")),
            BinaryOp::In => Ok(format!("{r}[{l}] ~= nil")),
            BinaryOp::InstanceOf => self.translate_instanceof(left, &l, right, &r),
        }
    }

    fn translate_instanceof(&self, _left: &Expr, l: &str, right: &Expr, r: &str) -> Result<String> {
        let right_ty = expr_ty(right);
        if let Some(ty) = right_ty {
            if ty.inherits_engine_instance() || matches!(ty.known, Some(KnownType::EngineInstance) | Some(KnownType::EngineSignal)) {
                let tag = ty.symbol_name.clone().unwrap_or_else(|| r.to_string());
                return Ok(format!(
                    "{}.{}({l}, \"{}\")",
                    runtime::RUNTIME_NAMESPACE,
                    runtime::HELPER_IS_A,
                    runtime::escape_string(&tag)
                ));
            }
            if matches!(
                ty.known,
                Some(KnownType::Map)
                    | Some(KnownType::ReadonlyMap)
                    | Some(KnownType::WeakMap)
                    | Some(KnownType::Set)
                    | Some(KnownType::ReadonlySet)
                    | Some(KnownType::WeakSet)
                    | Some(KnownType::Array)
            ) {
                let tag = ty.symbol_name.clone().unwrap_or_else(|| r.to_string());
                return Ok(format!(
                    "{}.{}({l}) == \"{}\"",
                    runtime::RUNTIME_NAMESPACE,
                    runtime::HELPER_TYPEOF,
                    runtime::escape_string(&tag)
                ));
            }
        }
        Ok(format!("{}.{}({l}, {r})", runtime::RUNTIME_NAMESPACE, runtime::HELPER_INSTANCEOF))
    }

    fn translate_prefix(&mut self, op: PrefixOp, operand: &Expr, context: ExprContext) -> Result<String> {
        match op {
            PrefixOp::Not => Ok(format!("not {}", self.translate_expr(operand)?)),
            PrefixOp::Neg => Ok(format!("-{}", self.translate_expr(operand)?)),
            PrefixOp::Plus => self.translate_expr(operand),
            PrefixOp::BitNot => Ok(format!(
                "{}.bnot({})",
                runtime::RUNTIME_NAMESPACE,
                self.translate_expr(operand)?
            )),
            PrefixOp::TypeOf => Ok(format!(
                "{}.{}({})",
                runtime::RUNTIME_NAMESPACE,
                runtime::HELPER_TYPEOF,
                self.translate_expr(operand)?
            )),
            PrefixOp::Await => Ok(format!(
                "{}.{}({})",
                runtime::RUNTIME_NAMESPACE,
                runtime::HELPER_AWAIT,
                self.translate_expr(operand)?
            )),
            PrefixOp::Increment | PrefixOp::Decrement => {
                let delta = if matches!(op, PrefixOp::Increment) { "+ 1" } else { "- 1" };
                self.translate_incdec(operand, delta, context, false)
            }
        }
    }

    fn translate_postfix(&mut self, op: PostfixOp, operand: &Expr, context: ExprContext) -> Result<String> {
        let delta = if matches!(op, PostfixOp::Increment) { "+ 1" } else { "- 1" };
        self.translate_incdec(operand, delta, context, true)
    }

    /// Lowers `++`/`--`, both prefix and postfix.
    ///
    /// Statement position: a plain assignment statement, e.g. `x = x + 1;`.
    /// Value position: wrapped in an IIFE; postfix additionally captures
    /// the pre-value into a fresh identifier so its old value is what the
    /// IIFE returns.
    fn translate_incdec(&mut self, operand: &Expr, delta: &str, context: ExprContext, is_postfix: bool) -> Result<String> {
        let target = self.translate_expr(operand)?;
        if matches!(context, ExprContext::Statement) {
            return Ok(format!("{target} = {target} {delta};"));
        }
        if is_postfix {
            let tmp = self.ctx.fresh_ident();
            Ok(format!(
                "(function() local {tmp} = {target}; {target} = {target} {delta}; return {tmp}; end)()"
            ))
        } else {
            Ok(format!("(function() {target} = {target} {delta}; return {target}; end)()"))
        }
    }

    fn translate_assign(&mut self, target: &Expr, value: &Expr) -> Result<String> {
        let t = self.translate_expr(target)?;
        let v = self.translate_expr(value)?;
        Ok(format!("{t} = {v}"))
    }

    /// Lowers compound assignments. When the left-hand side is
    /// a property access, the receiver is evaluated once into a fresh
    /// identifier to preserve single-evaluation semantics.
    fn translate_compound_assign(&mut self, op: AssignOp, target: &Expr, value: &Expr, context: ExprContext) -> Result<String> {
        let value_str = self.translate_expr(value)?;

        let (target_str, receiver_tmp) = if let Expr::PropertyAccess { receiver, property, .. } = target {
            let tmp = self.ctx.fresh_ident();
            let receiver_str = self.translate_expr(receiver)?;
            let indexed = runtime::safe_index(&tmp, property);
            (indexed, Some((tmp, receiver_str)))
        } else {
            (self.translate_expr(target)?, None)
        };

        let compute = match op {
            AssignOp::Add => binary_assign_expr(BinaryOp::Add, &target_str, &value_str),
            AssignOp::Sub => format!("{target_str} - ({value_str})"),
            AssignOp::Mul => format!("{target_str} * ({value_str})"),
            AssignOp::Div => format!("{target_str} / ({value_str})"),
            AssignOp::Pow => format!("{target_str} ^ ({value_str})"),
            AssignOp::Mod => format!("{target_str} % ({value_str})"),
            AssignOp::BitOr => format!("{}.{}({target_str}, {value_str})", runtime::RUNTIME_NAMESPACE, runtime::HELPER_BOR),
            AssignOp::BitAnd => format!("{}.{}({target_str}, {value_str})", runtime::RUNTIME_NAMESPACE, runtime::HELPER_BAND),
            AssignOp::BitXor => format!("{}.{}({target_str}, {value_str})", runtime::RUNTIME_NAMESPACE, runtime::HELPER_BXOR),
            AssignOp::Shl => format!("{}.{}({target_str}, {value_str})", runtime::RUNTIME_NAMESPACE, runtime::HELPER_BLSH),
            AssignOp::Shr => format!("{}.{}({target_str}, {value_str})", runtime::RUNTIME_NAMESPACE, runtime::HELPER_BRSH),
        };

        let assign_stmt = format!("{target_str} = {compute};");
        let full_stmts = match &receiver_tmp {
            Some((tmp, receiver_str)) => format!("local {tmp} = {receiver_str}; {assign_stmt}"),
            None => assign_stmt,
        };

        if matches!(context, ExprContext::Statement) {
            Ok(full_stmts)
        } else {
            Ok(format!("(function() {full_stmts} return {target_str}; end)()"))
        }
    }

    /// Lowers `c ? t : f`. When the true branch admits
    /// false-like values, the two-thunk form avoids `and/or`'s classic
    /// pitfall where a falsy `t` silently falls through to `f`.
    fn translate_conditional(&mut self, cond: &Expr, then_branch: &Expr, else_branch: &Expr, then_admits_falsy: bool) -> Result<String> {
        let c = self.translate_expr(cond)?;
        let t = self.translate_expr(then_branch)?;
        let f = self.translate_expr(else_branch)?;
        if then_admits_falsy {
            Ok(format!(
                "({c} and function() return {t} end or function() return {f} end)()"
            ))
        } else {
            Ok(format!("({c} and {t} or {f})"))
        }
    }

    /// Enforces `@rbx-client`/`@rbx-server` directives: fatal if server
    /// code touches a client-only symbol or vice versa.
    /// Disabled entirely when `no_heuristics` is set; a `None` ambient
    /// context (neither declared Server nor Client) is never checked.
    fn check_cross_context(&self, symbol: Option<&crate::ast::Symbol>) -> Result<()> {
        if self.resolver.no_heuristics() {
            return Ok(());
        }
        let Some(symbol) = symbol else {
            return Ok(());
        };
        let Some(directive) = symbol.script_directive else {
            return Ok(());
        };
        match (self.ctx.script_context(), directive) {
            (crate::ast::ScriptContext::Server, crate::ast::ScriptDirective::ClientOnly) => Err(
                TranslationError::ServerAccessingClientOnly(self.label(), symbol.name.clone()),
            ),
            (crate::ast::ScriptContext::Client, crate::ast::ScriptDirective::ServerOnly) => Err(
                TranslationError::ClientAccessingServerOnly(self.label(), symbol.name.clone()),
            ),
            _ => Ok(()),
        }
    }

    fn translate_property_access(
        &mut self,
        receiver: &Expr,
        property: &str,
        symbol: Option<&crate::ast::Symbol>,
        receiver_ty: &crate::ast::Ty,
    ) -> Result<String> {
        self.check_cross_context(symbol)?;
        if property == "prototype" {
            if let Expr::Identifier { .. } = strip_loc(receiver) {
                return Err(TranslationError::PrototypeAccess(self.label()));
            }
        }
        if let Some(sym) = symbol {
            if sym.is_method() || sym.is_function() {
                return Err(TranslationError::IndexingFunctionValue(self.label()));
            }
        }
        if let Some(const_value) = &receiver_ty.const_enum_value {
            return Ok(match const_value {
                crate::ast::EnumValue::Number(n) => format_number(*n),
                crate::ast::EnumValue::Str(s) => quote(s),
            });
        }
        if property == "length" && (receiver_ty.is_string || receiver_ty.is_array) {
            let r = self.translate_expr(receiver)?;
            return Ok(format!("#{r}"));
        }
        if let Expr::Super { base_name } = strip_loc(receiver) {
            let base = base_name.clone().unwrap_or_else(|| "Base".to_string());
            return Ok(format!(
                "({base}.__index.{property} and {base}.__index.{property}(self) or self.{property})"
            ));
        }
        let r = self.translate_expr(receiver)?;
        Ok(runtime::safe_index(&r, property))
    }

    fn translate_element_access(&mut self, receiver: &Expr, index: &Expr, receiver_ty: &crate::ast::Ty) -> Result<String> {
        let needs_offset = receiver_ty.is_array || receiver_ty.is_tuple;
        let returns_tuple_call = matches!(strip_loc(receiver), Expr::Call { returns_tuple: true, .. });

        if returns_tuple_call {
            let r = self.translate_expr(receiver)?;
            let i = self.translate_expr(index)?;
            return Ok(format!("(select({i} + 1, {r}))"));
        }

        let needs_parens = matches!(
            strip_loc(receiver),
            Expr::ArrayLiteral { .. } | Expr::New { .. }
        );
        let mut r = self.translate_expr(receiver)?;
        if needs_parens {
            r = format!("({r})");
        }
        let i = self.translate_expr(index)?;
        if needs_offset {
            Ok(format!("{r}[{i} + 1]"))
        } else {
            Ok(format!("{r}[{i}]"))
        }
    }

    fn translate_new(&mut self, callee: &Expr, args: &[Argument], has_parens: bool) -> Result<String> {
        if !has_parens {
            return Err(TranslationError::NewWithoutParens(self.label()));
        }
        let callee_str = self.translate_expr(callee)?;
        let args_str = self.translate_args(args)?;
        Ok(format!("{callee_str}.new({args_str})"))
    }

    fn translate_args(&mut self, args: &[Argument]) -> Result<String> {
        let mut parts = Vec::with_capacity(args.len());
        for arg in args {
            let s = self.translate_expr(&arg.expr)?;
            if arg.is_spread {
                parts.push(format!("unpack({s})"));
            } else {
                parts.push(s);
            }
        }
        Ok(parts.join(", "))
    }

    /// Classifies and lowers a call expression.
    fn translate_call(&mut self, callee: &Expr, args: &[Argument], returns_tuple: bool, position: ExprContext) -> Result<String> {
        let _ = returns_tuple;
        if let Expr::Super { base_name } = strip_loc(callee) {
            let base = base_name.clone().unwrap_or_else(|| "Base".to_string());
            let mut arg_str = "self".to_string();
            let rest = self.translate_args(args)?;
            if !rest.is_empty() {
                arg_str.push_str(", ");
                arg_str.push_str(&rest);
            }
            return Ok(format!("{base}.constructor({arg_str})"));
        }

        let Expr::PropertyAccess { receiver, property, symbol, receiver_ty } = strip_loc(callee) else {
            let callee_str = self.translate_expr(callee)?;
            let args_str = self.translate_args(args)?;
            return Ok(format!("{callee_str}({args_str})"));
        };

        self.translate_method_call(receiver, property, symbol.as_ref(), receiver_ty, args, position)
    }

    fn translate_method_call(
        &mut self,
        receiver: &Expr,
        method: &str,
        symbol: Option<&crate::ast::Symbol>,
        receiver_ty: &crate::ast::Ty,
        args: &[Argument],
        position: ExprContext,
    ) -> Result<String> {
        self.check_cross_context(symbol)?;
        let args_str = self.translate_args(args)?;

        if matches!(receiver_ty.known, Some(KnownType::Array)) {
            let r = self.translate_expr(receiver)?;
            let helper = runtime::array_helper(method);
            return Ok(join_call(&format!("{}.{helper}", runtime::RUNTIME_NAMESPACE), &r, &args_str));
        }

        if receiver_ty.is_string {
            let r = self.translate_expr(receiver)?;
            if runtime::is_string_stdlib_method(method) {
                return Ok(join_call(&format!("string.{method}"), &r, &args_str));
            }
            let helper = runtime::string_helper(method);
            return Ok(join_call(&format!("{}.{helper}", runtime::RUNTIME_NAMESPACE), &r, &args_str));
        }

        if matches!(receiver_ty.known, Some(KnownType::Promise)) && method == "then" {
            let r = self.translate_expr(receiver)?;
            return Ok(format!("{r}:andThen({args_str})"));
        }

        if matches!(receiver_ty.known, Some(KnownType::SymbolConstructor)) && method == "for" {
            let r = self.translate_expr(receiver)?;
            return Ok(format!("{r}.getFor({args_str})"));
        }

        if matches!(
            receiver_ty.known,
            Some(KnownType::Map) | Some(KnownType::ReadonlyMap) | Some(KnownType::WeakMap)
        ) {
            let r = self.translate_expr(receiver)?;
            let helper = runtime::map_helper(method);
            return Ok(join_call(&format!("{}.{helper}", runtime::RUNTIME_NAMESPACE), &r, &args_str));
        }

        if matches!(
            receiver_ty.known,
            Some(KnownType::Set) | Some(KnownType::ReadonlySet) | Some(KnownType::WeakSet)
        ) {
            let r = self.translate_expr(receiver)?;
            let helper = runtime::set_helper(method);
            return Ok(join_call(&format!("{}.{helper}", runtime::RUNTIME_NAMESPACE), &r, &args_str));
        }

        if matches!(receiver_ty.known, Some(KnownType::ObjectConstructor)) {
            let r = self.translate_expr(receiver)?;
            let helper = runtime::object_helper(method);
            return Ok(join_call(&format!("{}.{helper}", runtime::RUNTIME_NAMESPACE), &r, &args_str));
        }

        if receiver_ty.is_math_like() {
            if let Some(op) = runtime::math_macro_operator(method) {
                if matches!(position, ExprContext::Statement) {
                    return Err(TranslationError::MathMacroInStatementPosition(self.label()));
                }
                let r = self.translate_expr(receiver)?;
                let arg = args.first().map(|a| self.translate_expr(&a.expr)).transpose()?.unwrap_or_default();
                return Ok(math_like_operator_expr(op, &r, &arg));
            }
        }

        if let Expr::Super { base_name } = strip_loc(receiver) {
            let base = base_name.clone().unwrap_or_else(|| "Base".to_string());
            let self_and_args = if args_str.is_empty() {
                "self".to_string()
            } else {
                format!("self, {args_str}")
            };
            return Ok(format!("{base}.__index.{method}({self_and_args})"));
        }

        let r = self.translate_expr(receiver)?;
        if symbol.map(|s| s.is_method()).unwrap_or(true) {
            Ok(format!("{r}:{method}({args_str})"))
        } else {
            Ok(runtime::safe_index(&r, method) + &format!("({args_str})"))
        }
    }
}

fn join_call(callee: &str, receiver: &str, args: &str) -> String {
    if args.is_empty() {
        format!("{callee}({receiver})")
    } else {
        format!("{callee}({receiver}, {args})")
    }
}

fn binary_assign_expr(op: BinaryOp, l: &str, r: &str) -> String {
    match op {
        BinaryOp::Add => format!("{}.{}({l}, {r})", runtime::RUNTIME_NAMESPACE, runtime::HELPER_ADD),
        BinaryOp::Sub => format!("{l} - {r}"),
        BinaryOp::Mul => format!("{l} * {r}"),
        BinaryOp::Div => format!("{l} / {r}"),
        _ => format!("{l} + {r}"),
    }
}

/// A math-like type's `add`/`sub`/`mul`/`div` method call inlines to the
/// native binary operator (relying on the `__add`/`__sub`/`__mul`/`__div`
/// metamethod trampolines classes install) rather than the generic
/// `TS.add` runtime helper — unlike [`binary_assign_expr`],
/// which backs compound assignment where the operand type is not known to
/// support a native operator.
fn math_like_operator_expr(op: BinaryOp, l: &str, r: &str) -> String {
    match op {
        BinaryOp::Add => format!("{l} + {r}"),
        BinaryOp::Sub => format!("{l} - {r}"),
        BinaryOp::Mul => format!("{l} * {r}"),
        BinaryOp::Div => format!("{l} / {r}"),
        _ => format!("{l} + {r}"),
    }
}

pub(crate) fn strip_loc(expr: &Expr) -> &Expr {
    match expr {
        Expr::Loc(_, inner) => strip_loc(inner),
        other => other,
    }
}

pub(crate) fn expr_ty(expr: &Expr) -> Option<&crate::ast::Ty> {
    match strip_loc(expr) {
        Expr::Identifier { ty, .. } => Some(ty),
        Expr::PropertyAccess { receiver_ty, .. } => Some(receiver_ty),
        Expr::Conditional { then_ty, .. } => Some(then_ty),
        _ => None,
    }
}

fn is_zero_literal(expr: &Expr) -> bool {
    matches!(strip_loc(expr), Expr::NumericLiteral { text } if text == "0")
}

/// Preserves scientific notation verbatim; otherwise emits the canonical
/// decimal form of the parsed value.
fn format_numeric_literal(text: &str) -> String {
    if text.contains('e') || text.contains('E') {
        return text.to_string();
    }
    match text.replace('_', "").parse::<f64>() {
        Ok(n) => format_number(n),
        Err(_) => text.to_string(),
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", runtime::escape_string(value))
}
