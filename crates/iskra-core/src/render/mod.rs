//! Schema rendering.
//!
//! Two output modes, both pure functions of the resolved schema model:
//!
//! - [`render_json`]: the structured mode, a sorted-key JSON dump of the
//!   full model
//! - [`ProtoRenderer`]: the `.proto` source mode
//!
//! Neither mode scans any text; by this point the schema is whatever the
//! extraction pipeline managed to recover, and rendering degrades
//! gracefully around the holes (unresolved references, unknown scalar
//! codes) instead of failing.

mod writer;

use crate::error::Result;
use crate::schema::{scalar_type_name, short_name, Enum, Field, FieldKind, Message, Schema};
use std::fmt::Write as FmtWrite;

pub use writer::{walk_schema, NullWriter, SchemaWriter, StatsWriter};

/// Renders the structured output mode.
///
/// The document has exactly two top-level keys, `messages` and `enums`,
/// each mapping fully-qualified names to the complete entity model.
pub fn render_json(schema: &Schema) -> Result<String> {
    Ok(serde_json::to_string_pretty(schema)?)
}

/// Configuration for proto rendering
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Indentation string (default: 2 spaces)
    pub indent_str: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            indent_str: "  ".to_string(),
        }
    }
}

impl RenderConfig {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indentation string
    pub fn indent_str(mut self, s: impl Into<String>) -> Self {
        self.indent_str = s.into();
        self
    }
}

/// Renders a recovered schema as `.proto` source.
#[derive(Debug, Default)]
pub struct ProtoRenderer {
    config: RenderConfig,
}

impl ProtoRenderer {
    /// Creates a new renderer with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new renderer with custom configuration
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Renders the schema as a string.
    pub fn render(&self, schema: &Schema) -> String {
        let mut output = String::new();
        self.write_to(schema, &mut output)
            .expect("String write cannot fail");
        output
    }

    /// Writes the rendered schema to a writer.
    ///
    /// Enum blocks come first, then message blocks, both sorted by short
    /// name so the output is stable across runs.
    pub fn write_to(&self, schema: &Schema, w: &mut impl FmtWrite) -> std::fmt::Result {
        writeln!(w, "syntax = \"proto3\";")?;
        writeln!(w)?;
        writeln!(w, "package {};", schema.package)?;

        let mut enums: Vec<&Enum> = schema.enums.values().collect();
        enums.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.full_name.cmp(&b.full_name)));
        for entry in enums {
            writeln!(w)?;
            self.write_enum(entry, w)?;
        }

        let mut messages: Vec<&Message> = schema.messages.values().collect();
        messages.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.full_name.cmp(&b.full_name)));
        for message in messages {
            writeln!(w)?;
            self.write_message(message, w)?;
        }

        Ok(())
    }

    fn write_enum(&self, entry: &Enum, w: &mut impl FmtWrite) -> std::fmt::Result {
        writeln!(w, "enum {} {{", entry.name)?;
        let mut values: Vec<(&String, &u32)> = entry.values.iter().collect();
        values.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(b.0)));
        for (name, code) in values {
            writeln!(w, "{}{} = {};", self.config.indent_str, name, code)?;
        }
        writeln!(w, "}}")
    }

    fn write_message(&self, message: &Message, w: &mut impl FmtWrite) -> std::fmt::Result {
        writeln!(w, "message {} {{", message.name)?;

        // Regular fields go out in stored (number-sorted) order; oneof
        // members are grouped per name, groups in first-encountered order
        let mut groups: Vec<(&str, Vec<&Field>)> = Vec::new();
        for field in &message.fields {
            match &field.oneof {
                Some(group) => {
                    match groups.iter_mut().find(|(name, _)| *name == group.as_str()) {
                        Some((_, members)) => members.push(field),
                        None => groups.push((group.as_str(), vec![field])),
                    }
                }
                None => self.write_field(field, 1, false, w)?,
            }
        }

        for (group, members) in groups {
            writeln!(w, "{}oneof {} {{", self.config.indent_str, group)?;
            for field in members {
                self.write_field(field, 2, true, w)?;
            }
            writeln!(w, "{}}}", self.config.indent_str)?;
        }

        writeln!(w, "}}")
    }

    fn write_field(
        &self,
        field: &Field,
        depth: usize,
        in_oneof: bool,
        w: &mut impl FmtWrite,
    ) -> std::fmt::Result {
        for _ in 0..depth {
            write!(w, "{}", self.config.indent_str)?;
        }
        // Oneof members are implicitly optional and never carry the prefix
        if field.optional && !in_oneof {
            write!(w, "optional ")?;
        }
        if field.repeated {
            write!(w, "repeated ")?;
        }
        writeln!(w, "{} {} = {};", type_token(field), field.name, field.number)
    }
}

/// The printable type token for a field.
///
/// Scalars go through the type table, with an `unknown_<code>` placeholder
/// for codes outside it. Message and enum references print the last dotted
/// segment of the resolved name; an unresolved reference degrades to
/// `bytes` or `int32` respectively.
fn type_token(field: &Field) -> String {
    match field.kind {
        FieldKind::Scalar => match field.type_code {
            Some(code) => scalar_type_name(code)
                .map(str::to_string)
                .unwrap_or_else(|| format!("unknown_{code}")),
            None => "bytes".to_string(),
        },
        FieldKind::Message => field
            .type_name
            .as_deref()
            .map(|name| short_name(name).to_string())
            .unwrap_or_else(|| "bytes".to_string()),
        FieldKind::Enum => field
            .type_name
            .as_deref()
            .map(|name| short_name(name).to_string())
            .unwrap_or_else(|| "int32".to_string()),
        FieldKind::Group => "bytes".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, FieldKind, Message, Schema};
    use pretty_assertions::assert_eq;

    fn scalar(number: u32, name: &str, code: u32) -> Field {
        let mut field = Field::new(number, name, FieldKind::Scalar);
        field.type_code = Some(code);
        field
    }

    fn schema_with(messages: Vec<Message>) -> Schema {
        let mut schema = Schema::new("aiserver.v1");
        for message in messages {
            schema.messages.insert(message.full_name.clone(), message);
        }
        schema
    }

    #[test]
    fn test_header_only_for_empty_schema() {
        let rendered = ProtoRenderer::new().render(&Schema::new("aiserver.v1"));
        assert_eq!(rendered, "syntax = \"proto3\";\n\npackage aiserver.v1;\n");
    }

    #[test]
    fn test_empty_message_block() {
        let schema = schema_with(vec![Message::new("aiserver.v1.Ping")]);
        let rendered = ProtoRenderer::new().render(&schema);
        assert!(rendered.contains("message Ping {\n}\n"));
    }

    #[test]
    fn test_scalar_field_line() {
        let schema = schema_with(vec![Message::with_fields(
            "aiserver.v1.Msg",
            vec![scalar(1, "text", 9)],
        )]);
        let rendered = ProtoRenderer::new().render(&schema);
        assert!(rendered.contains("  string text = 1;\n"));
    }

    #[test]
    fn test_unknown_scalar_code_placeholder() {
        let schema = schema_with(vec![Message::with_fields(
            "aiserver.v1.Msg",
            vec![scalar(1, "odd", 99)],
        )]);
        let rendered = ProtoRenderer::new().render(&schema);
        assert!(rendered.contains("  unknown_99 odd = 1;\n"));
    }

    #[test]
    fn test_unresolved_message_and_enum_fallbacks() {
        let message_field = Field::new(1, "blob", FieldKind::Message);
        let enum_field = Field::new(2, "mode", FieldKind::Enum);
        let schema = schema_with(vec![Message::with_fields(
            "aiserver.v1.Msg",
            vec![message_field, enum_field],
        )]);
        let rendered = ProtoRenderer::new().render(&schema);
        assert!(rendered.contains("  bytes blob = 1;\n"));
        assert!(rendered.contains("  int32 mode = 2;\n"));
    }

    #[test]
    fn test_resolved_reference_prints_short_name() {
        let mut field = Field::new(1, "req", FieldKind::Message);
        field.type_name = Some("aiserver.v1.GetChatRequest".to_string());
        let schema = schema_with(vec![Message::with_fields("aiserver.v1.Msg", vec![field])]);
        let rendered = ProtoRenderer::new().render(&schema);
        assert!(rendered.contains("  GetChatRequest req = 1;\n"));
    }

    #[test]
    fn test_repeated_and_optional_prefixes() {
        let mut repeated = scalar(1, "items", 9);
        repeated.repeated = true;
        let mut optional = scalar(2, "note", 9);
        optional.optional = true;
        let mut both = scalar(3, "tags", 9);
        both.repeated = true;
        both.optional = true;
        let schema = schema_with(vec![Message::with_fields(
            "aiserver.v1.Msg",
            vec![repeated, optional, both],
        )]);
        let rendered = ProtoRenderer::new().render(&schema);
        assert!(rendered.contains("  repeated string items = 1;\n"));
        assert!(rendered.contains("  optional string note = 2;\n"));
        assert!(rendered.contains("  optional repeated string tags = 3;\n"));
    }

    #[test]
    fn test_oneof_members_grouped_without_optional() {
        let mut text = scalar(1, "text", 9);
        text.oneof = Some("payload".to_string());
        text.optional = true;
        let mut data = scalar(2, "data", 12);
        data.oneof = Some("payload".to_string());
        let plain = scalar(3, "id", 5);
        let schema = schema_with(vec![Message::with_fields(
            "aiserver.v1.Msg",
            vec![text, data, plain],
        )]);
        let rendered = ProtoRenderer::new().render(&schema);
        let expected = concat!(
            "message Msg {\n",
            "  int32 id = 3;\n",
            "  oneof payload {\n",
            "    string text = 1;\n",
            "    bytes data = 2;\n",
            "  }\n",
            "}\n",
        );
        assert!(rendered.contains(expected), "got:\n{}", rendered);
        assert!(!rendered.contains("optional"));
    }

    #[test]
    fn test_oneof_groups_in_first_encountered_order() {
        let mut a = scalar(1, "a", 9);
        a.oneof = Some("beta".to_string());
        let mut b = scalar(2, "b", 9);
        b.oneof = Some("alpha".to_string());
        let mut c = scalar(3, "c", 9);
        c.oneof = Some("beta".to_string());
        let schema = schema_with(vec![Message::with_fields(
            "aiserver.v1.Msg",
            vec![a, b, c],
        )]);
        let rendered = ProtoRenderer::new().render(&schema);
        let beta = rendered.find("oneof beta").unwrap();
        let alpha = rendered.find("oneof alpha").unwrap();
        assert!(beta < alpha);
        assert!(rendered.contains("    string c = 3;\n"));
    }

    #[test]
    fn test_blocks_sorted_by_short_name() {
        let schema = schema_with(vec![
            Message::new("aiserver.v1.Zebra"),
            Message::new("aiserver.v1.Aardvark"),
        ]);
        let rendered = ProtoRenderer::new().render(&schema);
        let first = rendered.find("message Aardvark").unwrap();
        let second = rendered.find("message Zebra").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_enum_values_sorted_by_code() {
        let mut entry = crate::schema::Enum::new("aiserver.v1.Kind");
        entry.values.insert("ZULU".to_string(), 0);
        entry.values.insert("ALPHA".to_string(), 2);
        entry.values.insert("MIKE".to_string(), 1);
        let mut schema = Schema::new("aiserver.v1");
        schema.enums.insert(entry.full_name.clone(), entry);
        let rendered = ProtoRenderer::new().render(&schema);
        let expected = concat!(
            "enum Kind {\n",
            "  ZULU = 0;\n",
            "  MIKE = 1;\n",
            "  ALPHA = 2;\n",
            "}\n",
        );
        assert!(rendered.contains(expected), "got:\n{}", rendered);
    }

    #[test]
    fn test_enums_render_before_messages() {
        let mut schema = schema_with(vec![Message::new("aiserver.v1.Aaa")]);
        schema.enums.insert(
            "aiserver.v1.Zzz".to_string(),
            crate::schema::Enum::new("aiserver.v1.Zzz"),
        );
        let rendered = ProtoRenderer::new().render(&schema);
        assert!(rendered.find("enum Zzz").unwrap() < rendered.find("message Aaa").unwrap());
    }

    #[test]
    fn test_render_json_top_level_shape() {
        let schema = schema_with(vec![Message::new("aiserver.v1.Ping")]);
        let value: serde_json::Value =
            serde_json::from_str(&render_json(&schema).unwrap()).unwrap();
        let top = value.as_object().unwrap();
        // Exactly the two model maps; the package only shows up in proto mode
        assert_eq!(top.len(), 2);
        assert!(top.contains_key("messages"));
        assert!(top.contains_key("enums"));
        assert!(value["messages"]["aiserver.v1.Ping"]["fields"]
            .as_array()
            .unwrap()
            .is_empty());
        assert_eq!(value["messages"]["aiserver.v1.Ping"]["name"], "Ping");
    }

    #[test]
    fn test_render_json_preserves_field_attributes() {
        let mut field = scalar(1, "text", 9);
        field.oneof = Some("payload".to_string());
        let schema = schema_with(vec![Message::with_fields("aiserver.v1.Msg", vec![field])]);
        let value: serde_json::Value =
            serde_json::from_str(&render_json(&schema).unwrap()).unwrap();
        let field = &value["messages"]["aiserver.v1.Msg"]["fields"][0];
        assert_eq!(field["number"], 1);
        assert_eq!(field["kind"], "scalar");
        assert_eq!(field["type_code"], 9);
        assert!(field["type_name"].is_null());
        assert_eq!(field["oneof"], "payload");
    }

    #[test]
    fn test_custom_indent() {
        let schema = schema_with(vec![Message::with_fields(
            "aiserver.v1.Msg",
            vec![scalar(1, "text", 9)],
        )]);
        let renderer = ProtoRenderer::with_config(RenderConfig::new().indent_str("\t"));
        assert!(renderer.render(&schema).contains("\tstring text = 1;\n"));
    }
}
