//! Symbolic reference resolution.
//!
//! The collection passes record field type references exactly as they
//! appear in the bundle, which for minified sources means a local
//! identifier. This pass rewrites those identifiers to fully-qualified
//! names using the associations gathered during collection. Resolution is
//! best-effort: an identifier the backward-window heuristic never captured,
//! or a reference to a type outside the scanned package, is left as-is and
//! the renderers degrade gracefully.

use crate::schema::Schema;
use std::collections::HashMap;
use tracing::trace;

/// Local identifier to fully-qualified type name.
///
/// Built during collection, consulted once here, then dropped.
pub(crate) type SymbolTable = HashMap<String, String>;

/// Rewrites every resolvable field type reference in place.
pub(crate) fn resolve_references(schema: &mut Schema, symbols: &SymbolTable) {
    for message in schema.messages.values_mut() {
        for field in &mut message.fields {
            if let Some(local) = &field.type_name {
                if let Some(full_name) = symbols.get(local) {
                    trace!("resolved '{}' -> {}", local, full_name);
                    field.type_name = Some(full_name.clone());
                }
            }
        }
    }
}
