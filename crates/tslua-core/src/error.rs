//! Translation error taxonomy
//!
//! ARCHITECTURE: Closed set of fatal, per-file translation errors, one
//! variant per failure family named in the construct catalogue. Every
//! error is terminal for the file being translated: nothing here is caught
//! and recovered from internally (see `translate` module docs).
//!
//! NO panics allowed outside tests (enforced by clippy lints in Cargo.toml).

use thiserror::Error;

/// A coarse label for the AST node an error was raised against.
///
/// The real typed-AST provider would carry source spans; this crate only
/// consumes a semantic facade over that provider (see `ast` module docs),
/// so diagnostics are anchored to a human-readable node description instead
/// of a byte range.
pub type NodeLabel = String;

/// Translation errors, tied to the node that triggered them.
///
/// ARCHITECTURE: `thiserror`-derived: one variant per rejected or
/// unsupported construct, a `Display` message usable directly in CLI
/// output, no variant that silently discards the offending node's identity.
#[derive(Debug, Error)]
pub enum TranslationError {
    // ------------------------------------------------------------------
    // Unsupported constructs (rejected outright)
    // ------------------------------------------------------------------
    #[error("`null` literals are not supported (at {0}); use an explicit nil-producing expression")]
    NullLiteral(NodeLabel),

    #[error("`var` declarations are not supported (at {0}); use a block-scoped declaration")]
    VarDeclaration(NodeLabel),

    #[error("labeled statements are not supported (at {0})")]
    LabeledStatement(NodeLabel),

    #[error("`new` without parentheses is not supported (at {0})")]
    NewWithoutParens(NodeLabel),

    #[error("spread in a binding pattern is not supported (at {0})")]
    SpreadInBindingPattern(NodeLabel),

    #[error("identifier `{name}` is a reserved word (at {0})", name = .1)]
    ReservedWordIdentifier(NodeLabel, String),

    #[error("`{operator}` is not supported (at {0}); use its strict form", operator = .1)]
    LooseEquality(NodeLabel, &'static str),

    // ------------------------------------------------------------------
    // Semantic rejections
    // ------------------------------------------------------------------
    #[error("cannot index a function value (at {0})")]
    IndexingFunctionValue(NodeLabel),

    #[error("`prototype` is not accessible on a class (at {0})")]
    PrototypeAccess(NodeLabel),

    #[error("class member `{1}` cannot be defined: it is a reserved metamethod (at {0})")]
    ReservedMetamethod(NodeLabel, &'static str),

    #[error("`return` is not supported inside a constructor (at {0})")]
    ReturnInConstructor(NodeLabel),

    #[error("expression statement at {0} is not a call, `new`, assignment, await, or increment/decrement")]
    InvalidExpressionStatement(NodeLabel),

    #[error("a math-like value macro (`add`/`sub`/`mul`/`div`) cannot be used in expression-statement position (at {0})")]
    MathMacroInStatementPosition(NodeLabel),

    // ------------------------------------------------------------------
    // Cross-context
    // ------------------------------------------------------------------
    #[error("server code cannot access client-only member `{member}` (at {0})", member = .1)]
    ServerAccessingClientOnly(NodeLabel, String),

    #[error("client code cannot access server-only member `{member}` (at {0})", member = .1)]
    ClientAccessingServerOnly(NodeLabel, String),

    // ------------------------------------------------------------------
    // Module shape
    // ------------------------------------------------------------------
    #[error("export declaration in a non-module script (at {0})")]
    ExportInScript(NodeLabel),

    #[error("module script `{0}` has no exports")]
    ModuleWithNoExports(NodeLabel),

    // ------------------------------------------------------------------
    // Structural
    // ------------------------------------------------------------------
    #[error("missing parameter child (at {0})")]
    MissingParameterChild(NodeLabel),

    #[error("destructuring variable declarator has no initializer (at {0})")]
    MissingDeclaratorInitializer(NodeLabel),

    #[error("could not resolve module file for specifier `{specifier}` (at {0})", specifier = .1)]
    MissingModuleFile(NodeLabel, String),

    #[error("unrecognized binary operator `{0}`")]
    BadBinaryOperator(String),

    #[error("unrecognized prefix operator `{0}`")]
    BadPrefixOperator(String),

    #[error("unrecognized postfix operator `{0}`")]
    BadPostfixOperator(String),

    #[error("`for` loop is missing a variable name (at {0})")]
    EmptyForVariableName(NodeLabel),

    #[error("unexpected initializer in `for...in` header (at {0})")]
    UnexpectedForInInitializer(NodeLabel),

    #[error("binding pattern is not supported on the key of a `for...in` loop (at {0})")]
    BindingPatternInForIn(NodeLabel),

    // ------------------------------------------------------------------
    // Internal ("should be unreachable")
    // ------------------------------------------------------------------
    #[error("internal error: unrecognized operation ({0})")]
    UnrecognizedOperation(String),
}

impl TranslationError {
    /// Short machine-stable discriminant name, independent of the
    /// formatted message. Useful for tests asserting on error category
    /// rather than exact wording, and for the CLI's `--stats`/exit-code
    /// reporting.
    pub fn discriminant(&self) -> &'static str {
        match self {
            Self::NullLiteral(_) => "null-literal",
            Self::VarDeclaration(_) => "var-declaration",
            Self::LabeledStatement(_) => "labeled-statement",
            Self::NewWithoutParens(_) => "new-without-parens",
            Self::SpreadInBindingPattern(_) => "spread-in-binding-pattern",
            Self::ReservedWordIdentifier(..) => "reserved-word-identifier",
            Self::LooseEquality(..) => "loose-equality",
            Self::IndexingFunctionValue(_) => "indexing-function-value",
            Self::PrototypeAccess(_) => "prototype-access",
            Self::ReservedMetamethod(..) => "reserved-metamethod",
            Self::ReturnInConstructor(_) => "return-in-constructor",
            Self::InvalidExpressionStatement(_) => "invalid-expression-statement",
            Self::MathMacroInStatementPosition(_) => "math-macro-in-statement-position",
            Self::ServerAccessingClientOnly(..) => "server-accessing-client-only",
            Self::ClientAccessingServerOnly(..) => "client-accessing-server-only",
            Self::ExportInScript(_) => "export-in-script",
            Self::ModuleWithNoExports(_) => "module-with-no-exports",
            Self::MissingParameterChild(_) => "missing-parameter-child",
            Self::MissingDeclaratorInitializer(_) => "missing-declarator-initializer",
            Self::MissingModuleFile(..) => "missing-module-file",
            Self::BadBinaryOperator(_) => "bad-binary-operator",
            Self::BadPrefixOperator(_) => "bad-prefix-operator",
            Self::BadPostfixOperator(_) => "bad-postfix-operator",
            Self::EmptyForVariableName(_) => "empty-for-variable-name",
            Self::UnexpectedForInInitializer(_) => "unexpected-for-in-initializer",
            Self::BindingPatternInForIn(_) => "binding-pattern-in-for-in",
            Self::UnrecognizedOperation(_) => "unrecognized-operation",
        }
    }
}

/// Result type alias for translation operations.
///
/// ARCHITECTURE: use this instead of `std::result::Result` throughout the
/// crate.
pub type Result<T> = std::result::Result<T, TranslationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminant_is_stable_and_message_is_not() {
        let err = TranslationError::NullLiteral("x.ts:3".to_string());
        assert_eq!(err.discriminant(), "null-literal");
        assert!(err.to_string().contains("x.ts:3"));
    }

    #[test]
    fn loose_equality_names_the_operator() {
        let err = TranslationError::LooseEquality("x.ts:1".to_string(), "==");
        assert!(err.to_string().contains("=="));
    }
}
