//! Runtime helper names and fixed lookup tables
//!
//! ARCHITECTURE: the runtime library (`TS.*`) is an external collaborator
//! — this module only names the entry points the translators
//! call into, so the call sites read `runtime::ADD` instead of a bare
//! string literal scattered across `translate/*.rs`.

/// Name of the namespace the emitted `require` binds the runtime to.
pub const RUNTIME_NAMESPACE: &str = "TS";

pub const HELPER_ADD: &str = "add";
pub const HELPER_BOR: &str = "bor";
pub const HELPER_BAND: &str = "band";
pub const HELPER_BXOR: &str = "bxor";
pub const HELPER_BLSH: &str = "blsh";
pub const HELPER_BRSH: &str = "brsh";
pub const HELPER_ROUND: &str = "round";
pub const HELPER_AWAIT: &str = "await";
pub const HELPER_ERROR: &str = "error";
pub const HELPER_DECODE_ERROR: &str = "decodeError";
pub const HELPER_TYPEOF: &str = "typeof";
pub const HELPER_IS_A: &str = "isA";
pub const HELPER_INSTANCEOF: &str = "instanceof";
pub const HELPER_EXPORT_NAMESPACE: &str = "exportNamespace";

/// Runtime-namespaced class allow-list: identifiers with
/// these names are prefixed with the runtime namespace rather than
/// emitted bare.
pub const RUNTIME_PREFIXED_CLASSES: [&str; 2] = ["Promise", "Symbol"];

pub fn is_runtime_prefixed_class(name: &str) -> bool {
    RUNTIME_PREFIXED_CLASSES.contains(&name)
}

/// String methods that map directly to the target's `string.*` stdlib
/// rather than a `TS.string_*` helper.
pub const STRING_STDLIB_METHODS: [&str; 12] = [
    "byte", "find", "format", "gmatch", "gsub", "len", "lower", "match", "rep", "reverse", "sub",
    "upper",
];

pub fn is_string_stdlib_method(name: &str) -> bool {
    STRING_STDLIB_METHODS.contains(&name)
}

/// Reserved words of the target language; identifiers with these names
/// are rejected by the identifier translator.
pub const RESERVED_WORDS: [&str; 22] = [
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if", "in",
    "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
];

pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// Metamethod names a class is never allowed to define as a method: these
/// are reserved for the class-lowering protocol's own metatable wiring.
pub const RESERVED_METAMETHODS: [&str; 3] = ["__index", "__newindex", "__mode"];

pub fn is_reserved_metamethod(name: &str) -> bool {
    RESERVED_METAMETHODS.contains(&name)
}

/// Returns the matching `'static` name from [`RESERVED_METAMETHODS`], for
/// building error values that require a `&'static str` payload.
pub fn reserved_metamethod_name(name: &str) -> Option<&'static str> {
    RESERVED_METAMETHODS.iter().find(|&&m| m == name).copied()
}

/// Ordinary Lua metamethods a class method may define; a trampoline is
/// installed on the class table for each one present.
/// Disjoint from [`RESERVED_METAMETHODS`], which are rejected outright.
pub const INSTALLABLE_METAMETHODS: [&str; 14] = [
    "__tostring",
    "__eq",
    "__lt",
    "__le",
    "__call",
    "__concat",
    "__unm",
    "__add",
    "__sub",
    "__mul",
    "__div",
    "__mod",
    "__pow",
    "__len",
];

pub fn is_installable_metamethod(name: &str) -> bool {
    INSTALLABLE_METAMETHODS.contains(&name)
}

/// Method names that inline to a binary operator on a math-like type
///, and the operator each maps to.
pub fn math_macro_operator(method: &str) -> Option<crate::ast::BinaryOp> {
    use crate::ast::BinaryOp;
    match method {
        "add" => Some(BinaryOp::Add),
        "sub" => Some(BinaryOp::Sub),
        "mul" => Some(BinaryOp::Mul),
        "div" => Some(BinaryOp::Div),
        _ => None,
    }
}

/// Runtime call-prefix for a given receiver family.
pub fn array_helper(method: &str) -> String {
    format!("array_{method}")
}

pub fn string_helper(method: &str) -> String {
    format!("string_{method}")
}

pub fn map_helper(method: &str) -> String {
    format!("map_{method}")
}

pub fn set_helper(method: &str) -> String {
    format!("set_{method}")
}

pub fn object_helper(method: &str) -> String {
    format!("Object_{method}")
}

/// Checks whether `s` is a valid bare identifier in the target language:
/// starts with a letter or underscore, continues with
/// letters/digits/underscores, and is not a reserved word.
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return false;
    }
    !is_reserved_word(s)
}

/// Emits `obj.key` when `key` is a valid bare identifier, `obj["key"]`
/// otherwise.
pub fn safe_index(obj: &str, key: &str) -> String {
    if is_valid_identifier(key) {
        format!("{obj}.{key}")
    } else {
        format!("{obj}[\"{key}\"]", key = escape_string(key))
    }
}

/// Escapes a string for embedding in a double-quoted target-language
/// string literal.
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}
