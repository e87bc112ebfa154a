//! Field descriptor parsing.
//!
//! Works on a text window believed to contain one message's field list;
//! the parser itself has no notion of message boundaries. Trailing
//! attributes inside a descriptor literal are located by independent
//! pattern searches rather than positionally, since the minifier emits
//! them in no fixed order.

use crate::extract::patterns::{
    FIELD_DESCRIPTOR, ONEOF_ATTR, OPTIONAL_SHORT, OPTIONAL_VERBOSE, REPEATED_SHORT,
    REPEATED_VERBOSE, TYPE_CODE, TYPE_REF,
};
use crate::schema::{Field, FieldKind};
use std::collections::HashSet;
use tracing::trace;

/// Extracts all field descriptors found in `text`.
///
/// The result is deduplicated by `(number, name)` — first occurrence wins —
/// and sorted ascending by field number. Fragments that do not match the
/// expected shape are skipped.
pub(crate) fn parse_fields(text: &str) -> Vec<Field> {
    let mut seen: HashSet<(u32, String)> = HashSet::new();
    let mut fields: Vec<Field> = Vec::new();

    for caps in FIELD_DESCRIPTOR.captures_iter(text) {
        let Ok(number) = caps[1].parse::<u32>() else {
            continue;
        };
        let name = &caps[2];
        let Some(kind) = FieldKind::from_keyword(&caps[3]) else {
            trace!("skipping field '{}' with unknown kind '{}'", name, &caps[3]);
            continue;
        };
        let extra = &caps[4];

        let mut field = Field::new(number, name, kind);

        // A numeric T is a scalar type code; a word-shaped T is a reference
        // to another type. The numeric check runs first so a scalar code is
        // never misread as a one-letter identifier.
        let type_code = TYPE_CODE
            .captures(extra)
            .and_then(|c| c[1].parse::<u32>().ok());
        match kind {
            FieldKind::Scalar => field.type_code = type_code,
            FieldKind::Enum | FieldKind::Message => {
                if type_code.is_none() {
                    field.type_name = TYPE_REF.captures(extra).map(|c| c[1].to_string());
                }
            }
            FieldKind::Group => {}
        }

        if extra.contains(REPEATED_SHORT)
            || extra.to_ascii_lowercase().contains(REPEATED_VERBOSE)
        {
            field.repeated = true;
        }
        if extra.contains(OPTIONAL_SHORT) || extra.contains(OPTIONAL_VERBOSE) {
            field.optional = true;
        }
        field.oneof = ONEOF_ATTR.captures(extra).map(|c| c[1].to_string());

        if seen.insert((number, field.name.clone())) {
            fields.push(field);
        }
    }

    fields.sort_by_key(|f| f.number);
    fields
}
