//! The recovered schema model.
//!
//! These types are what the extraction pipeline produces and the renderers
//! consume. They deliberately mirror the shape of a protobuf schema rather
//! than any particular runtime representation: messages and enums keyed by
//! fully-qualified name, fields carrying the wire number, kind and typing
//! information that could be recovered from the bundle.
//!
//! Everything here serializes with `serde` so the structured output mode is
//! a plain dump of the model.

use serde::Serialize;
use std::collections::BTreeMap;

/// Canonical name for a protobuf scalar type code.
///
/// The codes follow the standard field descriptor numbering (1–18).
/// Returns `None` for codes outside that range; callers that need a
/// printable token should fall back to an `unknown_<code>` placeholder.
pub fn scalar_type_name(code: u32) -> Option<&'static str> {
    match code {
        1 => Some("double"),
        2 => Some("float"),
        3 => Some("int64"),
        4 => Some("uint64"),
        5 => Some("int32"),
        6 => Some("fixed64"),
        7 => Some("fixed32"),
        8 => Some("bool"),
        9 => Some("string"),
        10 => Some("group"),
        11 => Some("message"),
        12 => Some("bytes"),
        13 => Some("uint32"),
        14 => Some("enum"),
        15 => Some("sfixed32"),
        16 => Some("sfixed64"),
        17 => Some("sint32"),
        18 => Some("sint64"),
        _ => None,
    }
}

/// The kind of a recovered field, as spelled in the runtime registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// A primitive type identified by a scalar type code
    Scalar,
    /// A reference to an enum type
    Enum,
    /// A reference to another message type
    Message,
    /// A proto2 group (rare in practice, kept for completeness)
    Group,
}

impl FieldKind {
    /// Parses the kind keyword found in a field descriptor literal.
    ///
    /// Returns `None` for unrecognized keywords; the caller treats the
    /// whole descriptor as ill-formed and skips it.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "scalar" => Some(Self::Scalar),
            "enum" => Some(Self::Enum),
            "message" => Some(Self::Message),
            "group" => Some(Self::Group),
            _ => None,
        }
    }

    /// The kind keyword as it appears in registrations.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Enum => "enum",
            Self::Message => "message",
            Self::Group => "group",
        }
    }
}

/// One recovered member of a message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    /// Wire field number
    pub number: u32,
    /// Field name as registered
    pub name: String,
    /// Field kind
    pub kind: FieldKind,
    /// Scalar type code, set only when `kind` is [`FieldKind::Scalar`]
    pub type_code: Option<u32>,
    /// Referenced type for enum/message kinds.
    ///
    /// Starts out as whatever the registration carried, which may be a
    /// local identifier from the minified source; the resolver pass
    /// rewrites it to a fully-qualified name where one is known.
    pub type_name: Option<String>,
    /// Whether the field is repeated
    pub repeated: bool,
    /// Whether the field is explicitly optional
    pub optional: bool,
    /// Name of the enclosing oneof group, if any
    pub oneof: Option<String>,
}

impl Field {
    /// Creates a field with just the mandatory components set.
    pub fn new(number: u32, name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            number,
            name: name.into(),
            kind,
            type_code: None,
            type_name: None,
            repeated: false,
            optional: false,
            oneof: None,
        }
    }
}

/// A recovered message type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    /// Short name (last dotted segment of the qualified name)
    pub name: String,
    /// Fully-qualified dotted name; identity of the message
    pub full_name: String,
    /// Fields sorted ascending by number
    pub fields: Vec<Field>,
    /// Placeholder for nested message names (not populated yet)
    pub nested_messages: Vec<String>,
    /// Placeholder for nested enum names (not populated yet)
    pub nested_enums: Vec<String>,
}

impl Message {
    /// Creates an empty message for the given fully-qualified name.
    pub fn new(full_name: impl Into<String>) -> Self {
        let full_name = full_name.into();
        Self {
            name: short_name(&full_name).to_string(),
            full_name,
            fields: Vec::new(),
            nested_messages: Vec::new(),
            nested_enums: Vec::new(),
        }
    }

    /// Creates a message with an already-parsed field list.
    pub fn with_fields(full_name: impl Into<String>, fields: Vec<Field>) -> Self {
        let mut message = Self::new(full_name);
        message.fields = fields;
        message
    }
}

/// A recovered enum type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enum {
    /// Short name (last dotted segment of the qualified name)
    pub name: String,
    /// Fully-qualified dotted name; identity of the enum
    pub full_name: String,
    /// Symbol name to integer code; duplicate symbols keep the last value
    pub values: BTreeMap<String, u32>,
}

impl Enum {
    /// Creates an empty enum for the given fully-qualified name.
    pub fn new(full_name: impl Into<String>) -> Self {
        let full_name = full_name.into();
        Self {
            name: short_name(&full_name).to_string(),
            full_name,
            values: BTreeMap::new(),
        }
    }
}

/// The complete recovered schema.
///
/// Messages and enums are keyed by fully-qualified name; `BTreeMap` keeps
/// the keys sorted and duplicate-free, which both output modes rely on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    /// Package the schema was scanned for; rendered in the proto header
    /// but not part of the structured output
    #[serde(skip)]
    pub package: String,
    /// All recovered messages, keyed by fully-qualified name
    pub messages: BTreeMap<String, Message>,
    /// All recovered enums, keyed by fully-qualified name
    pub enums: BTreeMap<String, Enum>,
}

impl Schema {
    /// Creates an empty schema for the given package.
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            messages: BTreeMap::new(),
            enums: BTreeMap::new(),
        }
    }

    /// Returns true if nothing was recovered.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.enums.is_empty()
    }
}

/// Last dotted segment of a fully-qualified name.
pub(crate) fn short_name(full_name: &str) -> &str {
    full_name.rsplit('.').next().unwrap_or(full_name)
}
