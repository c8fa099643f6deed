//! Module-resolution seam
//!
//! ARCHITECTURE: this trait names the compiler collaborator's three queries
//! the transpiler consumes (`noHeuristics`, `getRelativeImportPath`,
//! `getImportPathFromFile`) without specifying how they're implemented —
//! that's file-system/project-layout logic explicitly out of scope for
//! this crate. This module narrows that collaborator to a trait so `tslua-core`
//! can call it without depending on `tslua-cli`'s filesystem-aware
//! implementation; the CLI provides a concrete implementation, tests use a
//! fixed-table double.

use crate::error::{Result, TranslationError};

/// The module-resolution and heuristics-gating collaborator.
pub trait ModuleResolver {
    /// When true, JSDoc `@rbx-client`/`@rbx-server` cross-context checks
    /// are skipped entirely.
    fn no_heuristics(&self) -> bool;

    /// Resolves an import specifier relative to the importing file to an
    /// already-quoted target-language expression suitable for `require(...)`
    /// position.
    fn get_relative_import_path(&self, from_file: &str, to_file: &str, specifier: &str) -> Result<String>;

    /// Resolves a module specifier to the target-language import
    /// expression for a same-project file, without an explicit relative
    /// specifier (used for default export star-imports).
    fn get_import_path_from_file(&self, from_file: &str, to_file: &str) -> Result<String>;
}

/// A resolver backed by a fixed lookup table, for tests and for any
/// caller that already knows the full specifier -> path mapping up front.
#[derive(Debug, Clone, Default)]
pub struct FixedTableResolver {
    pub no_heuristics: bool,
    pub table: std::collections::HashMap<String, String>,
}

impl FixedTableResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mapping(mut self, specifier: impl Into<String>, resolved: impl Into<String>) -> Self {
        self.table.insert(specifier.into(), resolved.into());
        self
    }

    pub fn no_heuristics(mut self, value: bool) -> Self {
        self.no_heuristics = value;
        self
    }
}

impl ModuleResolver for FixedTableResolver {
    fn no_heuristics(&self) -> bool {
        self.no_heuristics
    }

    fn get_relative_import_path(&self, from_file: &str, _to_file: &str, specifier: &str) -> Result<String> {
        self.table
            .get(specifier)
            .cloned()
            .ok_or_else(|| TranslationError::MissingModuleFile(from_file.to_string(), specifier.to_string()))
    }

    fn get_import_path_from_file(&self, from_file: &str, to_file: &str) -> Result<String> {
        self.table
            .get(to_file)
            .cloned()
            .ok_or_else(|| TranslationError::MissingModuleFile(from_file.to_string(), to_file.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Unwrapping is acceptable in tests
mod tests {
    use super::*;

    #[test]
    fn fixed_table_resolver_resolves_known_specifiers() {
        let resolver = FixedTableResolver::new().with_mapping("./sibling", "require(\"./sibling\")");
        let resolved = resolver
            .get_relative_import_path("a.ts", "sibling.ts", "./sibling")
            .expect("should resolve");
        assert_eq!(resolved, "require(\"./sibling\")");
    }

    #[test]
    fn fixed_table_resolver_errors_on_unknown_specifier() {
        let resolver = FixedTableResolver::new();
        let err = resolver.get_relative_import_path("a.ts", "b.ts", "./missing");
        assert!(err.is_err());
    }
}
