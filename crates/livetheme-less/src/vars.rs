//! Theme variable extraction.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Reads a Less theme variant file and produces an order-preserving map of
//! its top-level variable names (sans `@` sigil) to resolved textual values.

use std::path::Path;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::LessError;
use crate::parse::parse_declarations;

/// Order-preserving map of variable name (without `@`) to textual value.
///
/// Insertion order is declaration order of first appearance; re-declaring a
/// name updates the value in place (Less last-wins semantics) without
/// moving it.
pub type VariableMap = IndexMap<String, String>;

/// A `@name` reference inside a declaration value.
static VAR_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"@([A-Za-z][A-Za-z0-9_-]*)").unwrap());

/// Passes of same-file reference substitution before giving up on a value.
/// Chains deeper than this (or reference cycles) are left partially
/// resolved rather than looping.
const MAX_RESOLVE_PASSES: usize = 8;

/// Extract the top-level variable declarations of the Less file at `path`.
///
/// The file is read asynchronously; parsing itself is synchronous. A file
/// with no top-level declarations yields an empty map.
///
/// Values are rendered textually: same-file `@name` references are
/// substituted (see [`resolve_references`]), arithmetic is carried
/// verbatim, and cross-file references are never resolved.
///
/// # Errors
///
/// - [`LessError::Read`] if the file is missing or unreadable.
/// - [`LessError::Parse`] if the content is not valid Less.
pub async fn extract_variables(path: &Path) -> Result<VariableMap, LessError> {
    let source = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LessError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let declarations =
        parse_declarations(&source).map_err(|e| e.with_hint(path.display().to_string()))?;

    let mut map = VariableMap::new();
    for decl in declarations {
        map.insert(decl.name, decl.value);
    }
    resolve_references(&mut map);
    Ok(map)
}

/// Substitute `@name` references in values with the values of other
/// variables in the same map.
///
/// Runs to a fixpoint (capped at [`MAX_RESOLVE_PASSES`]) so chained
/// references like `@border: @base` / `@base: @white` resolve fully.
/// References to names not present in the map are left verbatim; they may
/// be satisfied by other files at compile time and are not ours to judge.
pub fn resolve_references(map: &mut VariableMap) {
    for _ in 0..MAX_RESOLVE_PASSES {
        let snapshot = map.clone();
        let mut changed = false;

        for value in map.values_mut() {
            let replaced = VAR_REF
                .replace_all(value, |caps: &Captures<'_>| match snapshot.get(&caps[1]) {
                    Some(resolved) => resolved.clone(),
                    None => caps[0].to_string(),
                })
                .into_owned();
            if replaced != *value {
                *value = replaced;
                changed = true;
            }
        }

        if !changed {
            break;
        }
    }
}
