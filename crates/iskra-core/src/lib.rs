//! # iskra-core
//!
//! A library for recovering Protocol Buffer schemas from minified
//! JavaScript bundles.
//!
//! Application bundles built on the protobuf-es runtime register every
//! message and enum type at startup, and those registrations survive
//! minification as recognizable textual shapes. This crate scans a bundle
//! for them and reconstructs a best-effort schema:
//!
//! - Scanning the bundle text for type registrations, field lists and enum
//!   value lists
//! - Resolving minified local identifiers back to fully-qualified type
//!   names
//! - Rendering the recovered schema as `.proto` source or a structured
//!   JSON document
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`extract`]: Pattern scanning and reference resolution
//! - [`schema`]: The recovered schema model
//! - [`render`]: Output rendering
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use iskra_core::{Extractor, ProtoRenderer};
//! use std::fs;
//!
//! // Read a bundle, tolerating stray invalid bytes
//! let data = fs::read("./workbench.desktop.main.js")?;
//! let text = String::from_utf8_lossy(&data);
//!
//! // Recover whatever registrations the bundle holds
//! let schema = Extractor::new().extract(&text);
//!
//! // Render as .proto source
//! println!("{}", ProtoRenderer::new().render(&schema));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Degradation
//!
//! Extraction never fails on content: unrecognizable input yields an empty
//! schema, and partially recognizable input yields a partial one. Missing
//! type resolution shows up as fallback type tokens in the rendered
//! output, not as errors.

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod error;
pub mod extract;
pub mod render;
pub mod schema;

// Re-export primary types for convenience
pub use error::{Error, Result};
pub use extract::{extract_file, extract_file_with_config, Extractor, ExtractorConfig};
pub use render::{
    render_json, walk_schema, NullWriter, ProtoRenderer, RenderConfig, SchemaWriter, StatsWriter,
};
pub use schema::{scalar_type_name, Enum, Field, FieldKind, Message, Schema};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
