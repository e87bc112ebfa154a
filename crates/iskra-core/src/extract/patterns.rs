//! Textual patterns for the known registration shapes.
//!
//! The input is minified JavaScript produced by the protobuf-es code
//! generator, so there is no grammar to parse — only a handful of stable
//! textual shapes. Patterns that do not depend on the target package are
//! compiled once for the process; package-dependent ones are compiled per
//! extractor in [`PatternSet::compile`].

use crate::error::Result;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// One field descriptor literal: `{no:1,name:"text",kind:"scalar",T:9}`.
    /// The fourth capture holds whatever trailing attributes follow the
    /// three mandatory components.
    pub(crate) static ref FIELD_DESCRIPTOR: Regex =
        Regex::new(r#"\{no:(\d+),name:"([^"]+)",kind:"(\w+)"([^}]*)\}"#).unwrap();

    /// One enum value literal: `{no:0,name:"UNSPECIFIED"}`
    pub(crate) static ref ENUM_VALUE: Regex =
        Regex::new(r#"\{no:(\d+),name:"([^"]+)""#).unwrap();

    /// The declaration keyword and identifier opening the statement a type
    /// registration sits in. Anchored to the end of the backward window and
    /// barred from crossing a `;`, so it picks up the declaration the
    /// registration belongs to rather than an earlier, completed statement.
    pub(crate) static ref LOCAL_DECL: Regex =
        Regex::new(r"(?:const|let|var|class)\s+(\w+)\s*=?\s*[^;]*$").unwrap();

    /// Numeric scalar type code attribute: `,T:9`
    pub(crate) static ref TYPE_CODE: Regex = Regex::new(r",T:(\d+)").unwrap();

    /// Symbolic type reference attribute: `,T:Oce`
    pub(crate) static ref TYPE_REF: Regex = Regex::new(r",T:(\w+)").unwrap();

    /// Oneof group attribute: `oneof:"payload"`
    pub(crate) static ref ONEOF_ATTR: Regex = Regex::new(r#"oneof:"([^"]+)""#).unwrap();
}

/// Spellings of a true repeated flag in minified and unminified output.
pub(crate) const REPEATED_SHORT: &str = "repeated:!0";
pub(crate) const REPEATED_VERBOSE: &str = "repeated:true";

/// Spellings of a true optional flag.
pub(crate) const OPTIONAL_SHORT: &str = "opt:!0";
pub(crate) const OPTIONAL_VERBOSE: &str = "optional:!0";

/// Patterns parameterized on the target package prefix.
#[derive(Debug)]
pub(crate) struct PatternSet {
    /// `typeName:"<pkg>.Name"` or `typeName="<pkg>.Name"`
    pub(crate) type_registration: Regex,
    /// The class-static registration shape: `this.typeName="<pkg>.Name"...}`
    /// followed by `static{this.fields=X.util.newFieldList(()=>[...])`
    pub(crate) static_fields: Regex,
    /// Direct factory call: `makeMessageType("name",[...])`
    pub(crate) standalone_message: Regex,
    /// Enum factory call: `makeEnum("name",[...])`
    pub(crate) enum_factory: Regex,
}

impl PatternSet {
    /// Compiles the pattern set for one package prefix.
    pub(crate) fn compile(package: &str) -> Result<Self> {
        let pkg = regex::escape(package);
        Ok(Self {
            type_registration: Regex::new(&format!(
                r#"typeName[=:]["']({pkg}\.[^"']+)["']"#
            ))?,
            static_fields: Regex::new(&format!(
                r#"this\.typeName="({pkg}\.[^"]+)"[^}}]*\}}static\{{this\.fields=\w+\.util\.newFieldList\(\(\)=>\[([^\]]+)\]\)"#
            ))?,
            standalone_message: Regex::new(
                r#"makeMessageType\s*\(\s*["']([^"']+)["']\s*,\s*\[([^\]]+)\]"#,
            )?,
            enum_factory: Regex::new(
                r#"makeEnum\s*\(\s*["']([^"']+)["']\s*,\s*\[([^\]]+)\]"#,
            )?,
        })
    }
}
