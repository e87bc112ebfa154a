//! Schema extraction from minified bundle text.
//!
//! This module locates type registrations inside an unstructured text blob
//! and rebuilds the schema they describe.
//!
//! ## Algorithm Overview
//!
//! 1. Find every `typeName` registration and create a message entry for it;
//!    associate the nearest preceding local declaration with the name
//! 2. Find class-static field list initializers and parse their descriptors
//! 3. Find standalone `makeMessageType` factory calls as a fallback shape
//! 4. Find `makeEnum` factory calls and collect their value lists
//! 5. Resolve symbolic field type references against the associations from
//!    step 1
//!
//! The passes share nothing but the input text and the schema under
//! construction, so each can be tested and tuned in isolation. Every pass
//! tolerates zero matches; an input with no recognizable shapes yields an
//! empty schema, not an error.

mod fields;
mod patterns;
mod resolve;

use crate::error::{Error, Result};
use crate::schema::{Enum, Field, Message, Schema};
use fields::parse_fields;
use patterns::{PatternSet, ENUM_VALUE, LOCAL_DECL};
use resolve::{resolve_references, SymbolTable};
use tracing::{debug, trace};

/// Default backward window for associating a declaration with a type name.
///
/// Minified text has no reliable block structure, so proximity is the only
/// available signal; a missed association degrades resolution rather than
/// failing it.
const DEFAULT_SYMBOL_LOOKBACK: usize = 500;

/// Package prefix the original bundles register their types under.
const DEFAULT_PACKAGE: &str = "aiserver.v1";

/// Configuration for the extractor
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Package prefix whose types are collected
    pub package: String,
    /// Size in bytes of the backward window used for symbol association
    pub symbol_lookback: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            package: DEFAULT_PACKAGE.to_string(),
            symbol_lookback: DEFAULT_SYMBOL_LOOKBACK,
        }
    }
}

impl ExtractorConfig {
    /// Creates a new extractor config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the package prefix to collect types under
    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    /// Sets the backward window size for symbol association
    pub fn symbol_lookback(mut self, bytes: usize) -> Self {
        self.symbol_lookback = bytes;
        self
    }
}

/// Recovers a [`Schema`] from minified bundle text.
#[derive(Debug)]
pub struct Extractor {
    config: ExtractorConfig,
    patterns: PatternSet,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    /// Creates a new extractor with default configuration
    pub fn new() -> Self {
        Self::with_config(ExtractorConfig::default())
            .expect("default extraction patterns are valid")
    }

    /// Creates a new extractor with custom configuration
    pub fn with_config(config: ExtractorConfig) -> Result<Self> {
        let patterns = PatternSet::compile(&config.package)?;
        Ok(Self { config, patterns })
    }

    /// Runs the full extraction pipeline over the input text.
    pub fn extract(&self, text: &str) -> Schema {
        debug!("Starting extraction over {} bytes", text.len());

        let mut schema = Schema::new(self.config.package.clone());
        let mut symbols = SymbolTable::new();

        self.collect_type_registrations(text, &mut schema, &mut symbols);
        self.collect_static_field_lists(text, &mut schema);
        self.collect_standalone_messages(text, &mut schema);
        self.collect_enums(text, &mut schema);
        resolve_references(&mut schema, &symbols);

        debug!(
            "Extraction complete: {} messages, {} enums, {} symbol associations",
            schema.messages.len(),
            schema.enums.len(),
            symbols.len()
        );
        schema
    }

    /// Pass 1: bare type-name registrations and symbol associations.
    fn collect_type_registrations(
        &self,
        text: &str,
        schema: &mut Schema,
        symbols: &mut SymbolTable,
    ) {
        for caps in self.patterns.type_registration.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            let full_name = &caps[1];

            schema
                .messages
                .entry(full_name.to_string())
                .or_insert_with(|| Message::new(full_name));

            // Slice a bounded window before the match and look for the
            // declaration that opened the statement the registration sits
            // in. The window start must land on a char boundary: lossy
            // decoding can leave multi-byte replacement characters.
            let mut window_start = whole.start().saturating_sub(self.config.symbol_lookback);
            while !text.is_char_boundary(window_start) {
                window_start -= 1;
            }
            let window = &text[window_start..whole.start()];

            if let Some(decl) = LOCAL_DECL.captures(window) {
                trace!("associating '{}' with {}", &decl[1], full_name);
                symbols.insert(decl[1].to_string(), full_name.to_string());
            }
        }
        debug!(
            "Registration pass: {} messages, {} associations",
            schema.messages.len(),
            symbols.len()
        );
    }

    /// Pass 2: class-static field list initializers.
    fn collect_static_field_lists(&self, text: &str, schema: &mut Schema) {
        let mut matches = 0;
        for caps in self.patterns.static_fields.captures_iter(text) {
            matches += 1;
            let fields = parse_fields(&caps[2]);
            merge_message(schema, &caps[1], fields);
        }
        debug!("Static-field pass: {} matches", matches);
    }

    /// Pass 3: standalone message factory calls.
    fn collect_standalone_messages(&self, text: &str, schema: &mut Schema) {
        let prefix = format!("{}.", self.config.package);
        let mut matches = 0;
        for caps in self.patterns.standalone_message.captures_iter(text) {
            let full_name = &caps[1];
            if !full_name.starts_with(&prefix) {
                continue;
            }
            matches += 1;
            let fields = parse_fields(&caps[2]);
            merge_message(schema, full_name, fields);
        }
        debug!("Standalone pass: {} matches", matches);
    }

    /// Pass 4: enum factory calls.
    fn collect_enums(&self, text: &str, schema: &mut Schema) {
        let prefix = format!("{}.", self.config.package);
        for caps in self.patterns.enum_factory.captures_iter(text) {
            let full_name = &caps[1];
            if !full_name.starts_with(&prefix) {
                continue;
            }

            let mut entry = Enum::new(full_name);
            for value in ENUM_VALUE.captures_iter(&caps[2]) {
                let Ok(code) = value[1].parse::<u32>() else {
                    continue;
                };
                entry.values.insert(value[2].to_string(), code);
            }

            // Well-formed enum registrations are complete literals, so a
            // later occurrence wholly replaces an earlier one.
            schema.enums.insert(full_name.to_string(), entry);
        }
        debug!("Enum pass: {} enums", schema.enums.len());
    }
}

/// Applies the message merge rule: a new field list replaces the stored one
/// only when it is strictly larger, and a new message is created otherwise.
fn merge_message(schema: &mut Schema, full_name: &str, fields: Vec<Field>) {
    match schema.messages.get_mut(full_name) {
        Some(existing) => {
            if fields.len() > existing.fields.len() {
                trace!(
                    "{}: replacing {} fields with {}",
                    full_name,
                    existing.fields.len(),
                    fields.len()
                );
                existing.fields = fields;
            }
        }
        None => {
            schema
                .messages
                .insert(full_name.to_string(), Message::with_fields(full_name, fields));
        }
    }
}

/// Extract a schema from a bundle file.
///
/// This is a convenience function that reads the file, decodes it
/// permissively and extracts with the default configuration.
pub fn extract_file(path: impl AsRef<std::path::Path>) -> Result<Schema> {
    extract_file_with_config(path, ExtractorConfig::default())
}

/// Extract a schema from a bundle file with custom configuration.
pub fn extract_file_with_config(
    path: impl AsRef<std::path::Path>,
    config: ExtractorConfig,
) -> Result<Schema> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| Error::file_read(path, e))?;
    // Stray invalid bytes in a bundle are replaced, never fatal
    let text = String::from_utf8_lossy(&data);
    Ok(Extractor::with_config(config)?.extract(&text))
}
