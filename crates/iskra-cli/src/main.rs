//! iskra - Recover Protocol Buffer schemas from minified JavaScript bundles
//!
//! This tool scans a bundle built on the protobuf-es runtime for surviving
//! type registrations and reconstructs them into a `.proto` source file, a
//! structured JSON document, or a console summary.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use iskra_core::{
    render_json, scalar_type_name, walk_schema, Extractor, Field, ProtoRenderer, Schema,
    StatsWriter,
};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

/// Bundle location the Cursor desktop app ships its workbench at
const DEFAULT_BUNDLE: &str =
    "/Applications/Cursor.app/Contents/Resources/app/out/vs/workbench/workbench.desktop.main.js";

/// Per-message field cap for the summary listing
const SUMMARY_FIELD_CAP: usize = 5;

/// Recover Protocol Buffer schemas from minified JavaScript bundles
#[derive(Parser, Debug)]
#[command(name = "iskra")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the bundle to scan
    #[arg(default_value = DEFAULT_BUNDLE)]
    input: PathBuf,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Output format for the recovered schema
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Structured dump of the full schema model
    Json,
    /// Reconstructed .proto source
    Proto,
    /// Console report with counts and per-message field listings
    Summary,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();

    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    if !cli.input.exists() {
        bail!("Input file does not exist: {}", cli.input.display());
    }

    info!("Reading {}", cli.input.display());
    let data = fs::read(&cli.input)
        .with_context(|| format!("Failed to read input file: {}", cli.input.display()))?;
    info!("Read {} bytes", data.len());

    // Bundles are expected to be UTF-8 but stray bytes must not abort
    let text = String::from_utf8_lossy(&data);
    let schema = Extractor::new().extract(&text);

    if schema.is_empty() {
        warn!(
            "No recognizable type registrations found in {}",
            cli.input.display()
        );
    }

    let output = match cli.format {
        OutputFormat::Summary => {
            print_summary(&schema);
            return Ok(());
        }
        OutputFormat::Json => render_json(&schema).context("Failed to serialize schema")?,
        OutputFormat::Proto => ProtoRenderer::new().render(&schema),
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, &output)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => println!("{output}"),
    }

    Ok(())
}

/// Prints the extraction summary report.
fn print_summary(schema: &Schema) {
    let mut stats = StatsWriter::default();
    let _ = walk_schema(schema, &mut stats);

    let rule = "=".repeat(60);
    println!("\n{rule}");
    println!("Extraction Summary");
    println!("{rule}");
    println!("Messages found: {}", stats.message_count);
    println!("Enums found: {}", stats.enum_count);
    println!("Fields found: {}", stats.field_count);

    println!("\n{rule}");
    println!("Messages:");
    println!("{rule}");
    for message in schema.messages.values() {
        println!("  {}: {} fields", message.name, message.fields.len());
        for field in message.fields.iter().take(SUMMARY_FIELD_CAP) {
            let repeated = if field.repeated { " (repeated)" } else { "" };
            println!(
                "    - {}: {} [{}]{}",
                field.number,
                field.name,
                field_type_info(field),
                repeated
            );
        }
        if message.fields.len() > SUMMARY_FIELD_CAP {
            println!(
                "    ... and {} more fields",
                message.fields.len() - SUMMARY_FIELD_CAP
            );
        }
    }

    if !schema.enums.is_empty() {
        println!("\n{rule}");
        println!("Enums:");
        println!("{rule}");
        for enum_type in schema.enums.values() {
            println!("  {}: {} values", enum_type.name, enum_type.values.len());
        }
    }
}

/// Best available type description for the summary listing.
fn field_type_info(field: &Field) -> String {
    field
        .type_code
        .and_then(scalar_type_name)
        .map(str::to_string)
        .or_else(|| field.type_name.clone())
        .unwrap_or_else(|| field.kind.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use iskra_core::FieldKind;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_field_type_info_prefers_scalar_name() {
        let mut field = Field::new(1, "text", FieldKind::Scalar);
        field.type_code = Some(9);
        assert_eq!(field_type_info(&field), "string");
    }

    #[test]
    fn test_field_type_info_falls_back_to_reference_then_kind() {
        let mut field = Field::new(1, "req", FieldKind::Message);
        field.type_name = Some("aiserver.v1.Foo".to_string());
        assert_eq!(field_type_info(&field), "aiserver.v1.Foo");

        let bare = Field::new(2, "blob", FieldKind::Message);
        assert_eq!(field_type_info(&bare), "message");
    }

    #[test]
    fn test_run_writes_proto_output() {
        use std::io::Write;
        let dir = tempfile::TempDir::new().unwrap();
        let bundle = dir.path().join("bundle.js");
        let mut file = fs::File::create(&bundle).unwrap();
        file.write_all(br#"x.typeName="aiserver.v1.Ping""#).unwrap();

        let out = dir.path().join("schema.proto");
        let cli = Cli::parse_from([
            "iskra",
            bundle.to_str().unwrap(),
            "--format",
            "proto",
            "--output",
            out.to_str().unwrap(),
        ]);
        run(&cli).unwrap();

        let written = fs::read_to_string(&out).unwrap();
        assert!(written.starts_with("syntax = \"proto3\";"));
        assert!(written.contains("message Ping {\n}\n"));
    }

    #[test]
    fn test_run_rejects_missing_input() {
        let cli = Cli::parse_from(["iskra", "/no/such/bundle.js"]);
        let err = run(&cli).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
