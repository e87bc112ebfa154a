//! Extensible schema visiting.
//!
//! [`SchemaWriter`] decouples walking the recovered model from what gets
//! produced for each element, for output formats beyond the two built-in
//! ones (statistics, documentation, diffing).

use crate::schema::{Enum, Field, Message, Schema};
use std::fmt::Result;

/// Trait for consuming schema elements during a walk.
///
/// All methods default to no-ops, so an implementation only handles the
/// elements it cares about.
pub trait SchemaWriter {
    /// Called once per message, before its fields
    fn write_message(&mut self, message: &Message) -> Result {
        let _ = message;
        Ok(())
    }

    /// Called for every field of every message
    fn write_field(&mut self, field: &Field) -> Result {
        let _ = field;
        Ok(())
    }

    /// Called once per enum
    fn write_enum(&mut self, enum_type: &Enum) -> Result {
        let _ = enum_type;
        Ok(())
    }
}

/// Walks the schema in key order, feeding every element to the writer.
pub fn walk_schema<W: SchemaWriter>(schema: &Schema, writer: &mut W) -> Result {
    for message in schema.messages.values() {
        writer.write_message(message)?;
        for field in &message.fields {
            writer.write_field(field)?;
        }
    }
    for enum_type in schema.enums.values() {
        writer.write_enum(enum_type)?;
    }
    Ok(())
}

/// A no-op writer that discards all output
pub struct NullWriter;

impl SchemaWriter for NullWriter {}

/// A writer that counts schema elements
#[derive(Debug, Default)]
pub struct StatsWriter {
    /// Number of messages
    pub message_count: usize,
    /// Number of fields across all messages
    pub field_count: usize,
    /// Number of enums
    pub enum_count: usize,
    /// Number of enum values across all enums
    pub value_count: usize,
}

impl SchemaWriter for StatsWriter {
    fn write_message(&mut self, _message: &Message) -> Result {
        self.message_count += 1;
        Ok(())
    }

    fn write_field(&mut self, _field: &Field) -> Result {
        self.field_count += 1;
        Ok(())
    }

    fn write_enum(&mut self, enum_type: &Enum) -> Result {
        self.enum_count += 1;
        self.value_count += enum_type.values.len();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, FieldKind};

    fn sample_schema() -> Schema {
        let mut schema = Schema::new("aiserver.v1");
        schema.messages.insert(
            "aiserver.v1.Msg".to_string(),
            Message::with_fields(
                "aiserver.v1.Msg",
                vec![
                    Field::new(1, "a", FieldKind::Scalar),
                    Field::new(2, "b", FieldKind::Scalar),
                ],
            ),
        );
        let mut entry = Enum::new("aiserver.v1.Kind");
        entry.values.insert("A".to_string(), 0);
        schema.enums.insert(entry.full_name.clone(), entry);
        schema
    }

    #[test]
    fn test_null_writer() {
        assert!(walk_schema(&sample_schema(), &mut NullWriter).is_ok());
    }

    #[test]
    fn test_stats_writer() {
        let mut stats = StatsWriter::default();
        walk_schema(&sample_schema(), &mut stats).unwrap();
        assert_eq!(stats.message_count, 1);
        assert_eq!(stats.field_count, 2);
        assert_eq!(stats.enum_count, 1);
        assert_eq!(stats.value_count, 1);
    }
}
