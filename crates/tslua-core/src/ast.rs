//! AST data model — the query surface this crate consumes
//!
//! ARCHITECTURE: this module is a data shape, not a parser. The typed AST
//! provider (a real front-end with a type checker) is an external
//! collaborator; nothing here turns input-language *text* into a tree. The
//! types below model exactly the queries the translators need: node kind,
//! textual tokens for literals/identifiers, a static `Type` exposing the
//! predicates spec'd for expression typing, and a `Symbol` exposing name,
//! declarations, and value declaration.
//!
//! Every variant derives `serde::{Serialize, Deserialize}` so a `SourceFile`
//! can be constructed directly by tests or ingested as JSON by the CLI,
//! which reads pre-parsed `*.tsast.json` files in lieu of a real front end.

use serde::{Deserialize, Serialize};

/// Ambient capabilities of a containing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptContext {
    Server,
    Client,
    None,
}

/// Whether a file is a module (exports something) or a bare script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptType {
    Module,
    Script,
}

/// A coarse node-location summary, used only to build human-readable error
/// messages (see `error::NodeLabel`). The real provider would carry byte
/// offsets and line/column; this crate only needs something stable enough
/// to point a user at the right construct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLoc {
    pub file: String,
    pub line: u32,
}

impl std::fmt::Display for NodeLoc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A symbol: the declared entity behind an identifier or member name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    /// Kinds of every declaration site contributing to this symbol
    /// (a class can have a constructor declaration and member declarations,
    /// a function can be declared and later merged, etc).
    pub declarations: Vec<DeclKind>,
    /// The kind of the declaration considered authoritative for typing
    /// purposes (mirrors `ts.Symbol.valueDeclaration`).
    pub value_declaration: Option<DeclKind>,
    /// The `@rbx-client`/`@rbx-server` JSDoc tag on this symbol's
    /// property/method signature, when the provider reports one.
    /// `None` when the signature carries neither tag.
    #[serde(default)]
    pub script_directive: Option<ScriptDirective>,
}

impl Symbol {
    pub fn is_method(&self) -> bool {
        matches!(self.value_declaration, Some(DeclKind::Method))
    }

    pub fn is_function(&self) -> bool {
        matches!(self.value_declaration, Some(DeclKind::Function))
    }
}

/// The JSDoc directive tag a property/method signature carries, gating
/// cross-context access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptDirective {
    /// `@rbx-client`: fatal for server code to touch.
    ClientOnly,
    /// `@rbx-server`: fatal for client code to touch.
    ServerOnly,
}

/// What kind of declaration produced a symbol's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclKind {
    Function,
    Method,
    Property,
    Getter,
    Setter,
    Class,
    Enum,
    EnumMember,
    Namespace,
    Variable,
    Parameter,
}

/// A fixed set of math-like value types with `add`/`sub`/`mul`/`div`
/// methods that inline to native arithmetic (spec glossary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MathLikeType {
    CFrame,
    UDim,
    UDim2,
    Vector2,
    Vector2int16,
    Vector3,
    Vector3int16,
}

impl MathLikeType {
    pub const ALL: [MathLikeType; 7] = [
        MathLikeType::CFrame,
        MathLikeType::UDim,
        MathLikeType::UDim2,
        MathLikeType::Vector2,
        MathLikeType::Vector2int16,
        MathLikeType::Vector3,
        MathLikeType::Vector3int16,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MathLikeType::CFrame => "CFrame",
            MathLikeType::UDim => "UDim",
            MathLikeType::UDim2 => "UDim2",
            MathLikeType::Vector2 => "Vector2",
            MathLikeType::Vector2int16 => "Vector2int16",
            MathLikeType::Vector3 => "Vector3",
            MathLikeType::Vector3int16 => "Vector3int16",
        }
    }
}

/// Well-known nominal types the translator must recognize by name for
/// call-classification and `instanceof` lowering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KnownType {
    Array,
    Tuple,
    Promise,
    SymbolConstructor,
    Map,
    ReadonlyMap,
    WeakMap,
    Set,
    ReadonlySet,
    WeakSet,
    ObjectConstructor,
    MathLike(MathLikeType),
    /// Inherits (directly or transitively) from the engine base instance
    /// type (`Rbx_Instance` in the glossary).
    EngineInstance,
    /// `RBXScriptConnection` / `RBXScriptSignal`: class-like for
    /// `instanceof` purposes, but no math-macro methods apply.
    EngineSignal,
}

/// Static type information exposed by the AST provider for an expression.
///
/// ARCHITECTURE: a flat set of type-exposing predicates — booleans, not a
/// structural type system. Keeping this flat (rather than
/// modeling a real type lattice) reflects the translator's boundary: it
/// consumes type predicates, it does not perform type checking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ty {
    pub is_string: bool,
    pub is_number: bool,
    pub is_array: bool,
    pub is_tuple: bool,
    pub is_nullable: bool,
    pub is_boolean: bool,
    /// Present when this type is a single nominal/well-known type.
    pub known: Option<KnownType>,
    /// Present when this expression is a `const enum` member access whose
    /// compile-time value is known.
    pub const_enum_value: Option<EnumValue>,
    /// Base types, outermost-first, used for `instanceof`/getter-chain
    /// resolution.
    pub base_types: Vec<Ty>,
    /// Nominal name, when this type names a class/interface (used to print
    /// e.g. `BaseName.constructor(...)` at `super(...)` call sites).
    pub symbol_name: Option<String>,
}

impl Ty {
    pub fn unknown() -> Self {
        Ty::default()
    }

    pub fn string() -> Self {
        Ty {
            is_string: true,
            ..Default::default()
        }
    }

    pub fn number() -> Self {
        Ty {
            is_number: true,
            ..Default::default()
        }
    }

    pub fn boolean() -> Self {
        Ty {
            is_boolean: true,
            ..Default::default()
        }
    }

    /// True if this type admits `nil`/`false` at runtime, i.e. the unsafe
    /// operand of `and/or` emulation.
    pub fn admits_falsy(&self) -> bool {
        self.is_nullable || self.is_boolean
    }

    pub fn is_math_like(&self) -> bool {
        matches!(self.known, Some(KnownType::MathLike(_)))
    }

    pub fn inherits_engine_instance(&self) -> bool {
        matches!(self.known, Some(KnownType::EngineInstance))
            || self.base_types.iter().any(Ty::inherits_engine_instance)
    }
}

/// A compile-time const-enum value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EnumValue {
    Number(f64),
    Str(String),
}

// ---------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------

/// Binary operators recognized by the expression translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    StrictEq,
    StrictNe,
    LooseEq,
    LooseNe,
    Lt,
    Le,
    Gt,
    Ge,
    BitOr,
    BitAnd,
    BitXor,
    Shl,
    Shr,
    And,
    Or,
    InstanceOf,
    In,
}

/// Compound-assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Mod,
    BitOr,
    BitAnd,
    BitXor,
    Shl,
    Shr,
}

/// Prefix unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrefixOp {
    Neg,
    Not,
    TypeOf,
    Await,
    Increment,
    Decrement,
    Plus,
    BitNot,
}

/// Postfix unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostfixOp {
    Increment,
    Decrement,
}

/// The syntactic position an expression is evaluated in, as far as the
/// "assignment-is-an-expression" decision needs to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExprContext {
    /// Directly the expression of an expression-statement, or the
    /// increment clause of a C-style `for` header.
    Statement,
    /// Any other position: the result is read.
    Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Expr {
    NullLiteral,
    UndefinedLiteral,
    BooleanLiteral(bool),
    NumericLiteral { text: String },
    StringLiteral { value: String },
    /// A backtick, no-substitution template (no interpolations).
    NoSubstitutionTemplate { value: String },
    /// A template literal with interpolations, as alternating string
    /// fragments and expressions (fragments.len() == exprs.len() + 1).
    TemplateExpr {
        fragments: Vec<String>,
        exprs: Vec<Expr>,
    },
    Identifier {
        name: String,
        symbol: Option<Symbol>,
        ty: Ty,
    },
    This,
    /// `super`. `base_name` is the enclosing class's base type's symbol
    /// name, supplied by the type-aware provider — needed to lower both
    /// `super.prop` and bare `super(...)` calls.
    Super { base_name: Option<String> },
    ArrayLiteral {
        elements: Vec<ArrayElement>,
    },
    ObjectLiteral {
        properties: Vec<ObjectProperty>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Prefix {
        op: PrefixOp,
        operand: Box<Expr>,
        context: ExprContext,
    },
    Postfix {
        op: PostfixOp,
        operand: Box<Expr>,
        context: ExprContext,
    },
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    CompoundAssign {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
        context: ExprContext,
    },
    Conditional {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
        then_ty: Ty,
    },
    PropertyAccess {
        receiver: Box<Expr>,
        property: String,
        /// Static symbol the property resolves to, when known.
        symbol: Option<Symbol>,
        receiver_ty: Ty,
    },
    ElementAccess {
        receiver: Box<Expr>,
        index: Box<Expr>,
        receiver_ty: Ty,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Argument>,
        /// True when the overall static return type of this call is a
        /// tuple.
        returns_tuple: bool,
    },
    New {
        callee: Box<Expr>,
        args: Vec<Argument>,
        has_parens: bool,
    },
    Parenthesized(Box<Expr>),
    Spread(Box<Expr>),
    Loc(NodeLoc, Box<Expr>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Argument {
    pub expr: Expr,
    pub is_spread: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ArrayElement {
    Item(Expr),
    Spread(Expr),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ObjectProperty {
    KeyValue { key: PropertyKey, value: Expr },
    Spread(Expr),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PropertyKey {
    Ident(String),
    StringLit(String),
    /// A key written as a numeric literal, e.g. `{ 1: "a" }`.
    NumericLit(String),
    Computed(Box<Expr>),
}

// ---------------------------------------------------------------------
// Binding patterns & parameters
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BindingPattern {
    Identifier {
        name: String,
        /// Marks a constructor parameter captured into `this` via an
        /// accessibility/readonly modifier.
        captured_into_this: bool,
    },
    Array {
        elements: Vec<Option<BindingElement>>,
    },
    Object {
        properties: Vec<ObjectBindingProperty>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingElement {
    pub pattern: BindingPattern,
    pub default: Option<Expr>,
    pub is_rest: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectBindingProperty {
    pub source_name: String,
    pub pattern: BindingPattern,
    pub default: Option<Expr>,
    pub is_rest: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Param {
    pub pattern: BindingPattern,
    pub default: Option<Expr>,
    pub is_rest: bool,
    pub ty: Ty,
}

// ---------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum VarKind {
    Let,
    Const,
    Var,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableDeclarator {
    pub pattern: BindingPattern,
    pub init: Option<Expr>,
    /// Declared/inferred type of the binding itself (not the initializer) —
    /// needed to distinguish `let x: [number, string] = f()` (tuple-typed
    /// variable, collects all returns into a table) from a plain variable
    /// initialized by a tuple-returning call (collapses to one value).
    #[serde(default)]
    pub ty: Ty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchCase {
    /// `None` marks the `default:` case.
    pub test: Option<Expr>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatchClause {
    pub param_name: Option<String>,
    pub body: Vec<Stmt>,
}

/// The binding on the left of a `for...in` header. A binding pattern is
/// syntactically legal there but has no representable translation; only
/// the plain-identifier form is supported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ForInKey {
    Identifier(String),
    Pattern(BindingPattern),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ForInit {
    VarDecl {
        kind: VarKind,
        declarators: Vec<VariableDeclarator>,
    },
    Expr(Expr),
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Stmt {
    Expr(Expr),
    Block(Vec<Stmt>),
    VariableDeclaration {
        kind: VarKind,
        declarators: Vec<VariableDeclarator>,
        exported: bool,
    },
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    DoWhile {
        body: Box<Stmt>,
        cond: Expr,
    },
    For {
        init: ForInit,
        cond: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
    },
    ForIn {
        key: ForInKey,
        /// The legacy `for (var x = expr in obj)` initializer. Always
        /// rejected when present; no supported target construct has an
        /// equivalent.
        init: Option<Expr>,
        object: Expr,
        body: Box<Stmt>,
    },
    ForOf {
        pattern: BindingPattern,
        object: Expr,
        body: Box<Stmt>,
    },
    Break,
    Continue,
    Return(Option<Expr>),
    Throw(Expr),
    Switch {
        discriminant: Expr,
        cases: Vec<SwitchCase>,
    },
    Try {
        block: Vec<Stmt>,
        handler: Option<CatchClause>,
        finalizer: Option<Vec<Stmt>>,
    },
    Labeled {
        label: String,
        body: Box<Stmt>,
    },
    FunctionDecl(FunctionDecl),
    ClassDecl(ClassDecl),
    NamespaceDecl(NamespaceDecl),
    EnumDecl(EnumDecl),
    Import(ImportDecl),
    Export(ExportDecl),
    Empty,
    /// Type-only declarations (interfaces, type aliases, ambient
    /// declarations) that erase to nothing but still count when deciding
    /// whether a namespace body is type-only.
    TypeOnly,
    Loc(NodeLoc, Box<Stmt>),
}

// ---------------------------------------------------------------------
// Function & class declarations
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: Option<String>,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    /// True when the declared return type is a tuple, affecting `return`
    /// lowering.
    pub returns_tuple: bool,
    pub exported: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MethodKind {
    Method,
    Getter,
    Setter,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodMember {
    pub name: String,
    pub is_static: bool,
    pub kind: MethodKind,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    pub returns_tuple: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyMember {
    pub name: String,
    pub is_static: bool,
    pub initializer: Option<Expr>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClassMember {
    Method(MethodMember),
    Property(PropertyMember),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstructorDecl {
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    /// True when the first statement of the user body is a `super(...)`
    /// call.
    pub super_call_first: Option<Vec<Argument>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    pub base: Option<Box<Ty>>,
    pub is_abstract: bool,
    pub constructor: Option<ConstructorDecl>,
    pub members: Vec<ClassMember>,
    pub exported: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespaceDecl {
    pub name: String,
    pub body: Vec<Stmt>,
    pub exported: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EnumMemberValue {
    Auto,
    Number(f64),
    Str(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    pub value: EnumMemberValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumDecl {
    pub name: String,
    pub is_const: bool,
    pub members: Vec<EnumMember>,
    pub exported: bool,
}

// ---------------------------------------------------------------------
// Imports & exports
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ImportBinding {
    Default(String),
    Namespace(String),
    Named { source_name: String, local: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportDecl {
    pub specifier: String,
    pub bindings: Vec<ImportBinding>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExportKind {
    /// `export * from "specifier"`.
    Star { specifier: String },
    /// `export { a, b as c } from "specifier"` (specifier optional for a
    /// local re-export list).
    Named {
        names: Vec<(String, String)>,
        specifier: Option<String>,
    },
    /// `export = expr`.
    ExportAssignment(Expr),
    /// `export default expr`.
    Default(Expr),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDecl {
    pub kind: ExportKind,
}

// ---------------------------------------------------------------------
// Source file
// ---------------------------------------------------------------------

/// The root of one compilation unit, as handed to the translator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// Path or logical name, used for diagnostics and for module
    /// resolution.
    pub file_name: String,
    pub script_context: ScriptContext,
    pub script_type: ScriptType,
    pub statements: Vec<Stmt>,
}
