//! Filesystem-backed `ModuleResolver`
//!
//! ARCHITECTURE: `tslua-core::resolver::ModuleResolver` narrows the
//! compiler collaborator's path-resolution queries to a trait so the core
//! crate never touches a filesystem. This is the CLI's concrete
//! implementation: it resolves one `*.tsast.json` unit's relative import
//! specifier (e.g. `./sibling`, `../utils/foo`) to a `require(...)` call
//! over a `script.Parent`-chained expression, the idiom the target
//! ecosystem uses to address a sibling module instance rather than a bare
//! string path.
//!
//! `tslua-core` always calls `get_relative_import_path` with the raw
//! specifier in the `to_file` slot (see `translate/stmt.rs`); there is no
//! real "to file" on hand, only the specifier as written at the import
//! site, so this resolver treats it as a path relative to the importing
//! file's directory and normalizes `.`/`..` segments itself.
//!
//! A real project-management collaborator additionally consults a
//! Rojo-style project manifest to map filesystem paths onto the target
//! engine's instance tree; this resolver only has the specifier text to
//! work with, so it assumes a 1:1 directory mirror, the common case.

use std::path::{Component, Path, PathBuf};

use tslua_core::error::{Result, TranslationError};
use tslua_core::resolver::ModuleResolver;

#[derive(Debug, Clone)]
pub struct PathResolver {
    pub no_heuristics: bool,
}

impl PathResolver {
    pub fn new(no_heuristics: bool) -> Self {
        Self { no_heuristics }
    }

    /// Normalizes `specifier` relative to `from_file`'s directory into a
    /// `script.Parent`-chained expression.
    fn relative_expr(&self, from_file: &str, specifier: &str) -> Result<String> {
        let from = strip_ast_suffix(Path::new(from_file));
        let from_dir = from
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        if !(specifier.starts_with("./") || specifier.starts_with("../")) {
            return Err(TranslationError::MissingModuleFile(
                from_file.to_string(),
                specifier.to_string(),
            ));
        }

        let mut to_components: Vec<String> = from_dir
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().to_string()),
                _ => None,
            })
            .collect();

        for part in specifier.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    if to_components.pop().is_none() {
                        return Err(TranslationError::MissingModuleFile(
                            from_file.to_string(),
                            specifier.to_string(),
                        ));
                    }
                }
                other => to_components.push(other.to_string()),
            }
        }

        let Some(to_name) = to_components.pop() else {
            return Err(TranslationError::MissingModuleFile(
                from_file.to_string(),
                specifier.to_string(),
            ));
        };

        let from_components: Vec<String> = from_dir
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().to_string()),
                _ => None,
            })
            .collect();

        let common = from_components
            .iter()
            .zip(to_components.iter())
            .take_while(|(a, b)| a == b)
            .count();

        // `script` addresses the from-file instance itself; one `.Parent`
        // always gets to its containing directory before any further
        // ancestor/descendant traversal.
        let extra_ups = from_components.len() - common;
        let mut segments = vec!["script".to_string(), "Parent".to_string()];
        segments.extend(std::iter::repeat("Parent".to_string()).take(extra_ups));
        segments.extend(to_components[common..].iter().cloned());
        segments.push(to_name);
        Ok(format!("require({})", segments.join(".")))
    }
}

fn strip_ast_suffix(path: &Path) -> PathBuf {
    let s = path.to_string_lossy();
    let stripped = s
        .strip_suffix(".tsast.json")
        .map(str::to_string)
        .unwrap_or_else(|| s.to_string());
    PathBuf::from(stripped)
}

impl ModuleResolver for PathResolver {
    fn no_heuristics(&self) -> bool {
        self.no_heuristics
    }

    fn get_relative_import_path(&self, from_file: &str, to_file: &str, _specifier: &str) -> Result<String> {
        self.relative_expr(from_file, to_file)
    }

    fn get_import_path_from_file(&self, from_file: &str, to_file: &str) -> Result<String> {
        self.relative_expr(from_file, to_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sibling_specifier_resolves_to_script_parent_chain() {
        let resolver = PathResolver::new(false);
        let out = resolver
            .get_relative_import_path("src/a.tsast.json", "./b", "./b")
            .expect("ok");
        assert_eq!(out, "require(script.Parent.b)");
    }

    #[test]
    fn nested_specifier_resolves_with_subdirectory_segment() {
        let resolver = PathResolver::new(false);
        let out = resolver
            .get_relative_import_path("src/a.tsast.json", "./utils/b", "./utils/b")
            .expect("ok");
        assert_eq!(out, "require(script.Parent.utils.b)");
    }

    #[test]
    fn ancestor_specifier_walks_up_with_parent_segments() {
        let resolver = PathResolver::new(false);
        let out = resolver
            .get_relative_import_path("src/nested/a.tsast.json", "../b", "../b")
            .expect("ok");
        assert_eq!(out, "require(script.Parent.Parent.b)");
    }

    #[test]
    fn non_relative_specifier_is_rejected() {
        let resolver = PathResolver::new(false);
        let err = resolver.get_relative_import_path("src/a.tsast.json", "@rbx/ts", "@rbx/ts");
        assert!(err.is_err());
    }
}
