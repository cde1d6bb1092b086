//! Dumps a binary Stash file.
//!
//! A top-level container is printed in the text format; any other object
//! is printed as its record structure. Logging goes to stderr and honors
//! `RUST_LOG`.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use stash_codec::{CodecConfig, builtin_registry, from_bytes_with, to_text};
use stash_container::Container;
use stash_foundation::{ItemValue, Record};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "stashdump")]
#[command(about = "Print the contents of a serialized Stash object")]
struct Args {
    /// File holding one serialized object
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Only check that the file deserializes
    #[arg(long)]
    check: bool,

    /// Accept trailing bytes after the object
    #[arg(long)]
    lenient: bool,

    /// Maximum nesting depth of objects
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let bytes = match std::fs::read(&args.file) {
        Ok(bytes) => bytes,
        Err(err) => {
            error!(file = %args.file.display(), "cannot read file: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut config = if args.lenient {
        CodecConfig::lenient()
    } else {
        CodecConfig::default()
    };
    if let Some(depth) = args.max_depth {
        config = config.with_max_depth(depth);
    }

    let decoded = match from_bytes_with(&bytes, &builtin_registry(), &config) {
        Ok(decoded) => decoded,
        Err(errors) => {
            for problem in &errors {
                error!(code = %problem.code, "{}", problem.message);
            }
            return ExitCode::FAILURE;
        }
    };
    for problem in &decoded.warnings {
        warn!(code = %problem.code, "{}", problem.message);
    }
    info!(
        type_name = decoded.object.type_name(),
        consumed = decoded.consumed,
        size = bytes.len(),
        "deserialized"
    );

    if args.check {
        return ExitCode::SUCCESS;
    }

    match decoded.object.downcast_ref::<Container>() {
        Some(container) => print!("{}", to_text(container)),
        None => print!("{}", describe(&decoded.object.to_record())),
    }
    ExitCode::SUCCESS
}

fn describe(record: &Record) -> String {
    let mut out = String::new();
    describe_into(&mut out, record, 0);
    out
}

fn describe_into(out: &mut String, record: &Record, depth: usize) {
    let indent = "  ".repeat(depth);
    let _ = writeln!(out, "{indent}{} {{", record.type_name);
    for item in &record.items {
        let _ = write!(out, "{indent}  {} ({}) = ", item.name, item.value.kind());
        match &item.value {
            ItemValue::Object(nested) => {
                out.push('\n');
                describe_into(out, nested, depth + 2);
            }
            ItemValue::ObjectArray(nested) => {
                let _ = writeln!(out, "[{} objects]", nested.len());
                for record in nested {
                    describe_into(out, record, depth + 2);
                }
            }
            ItemValue::Bool(b) => {
                let _ = writeln!(out, "{b}");
            }
            ItemValue::Char(c) => {
                let _ = writeln!(out, "{:?}", char::from(*c));
            }
            ItemValue::Int32(n) => {
                let _ = writeln!(out, "{n}");
            }
            ItemValue::Int64(n) => {
                let _ = writeln!(out, "{n}");
            }
            ItemValue::Double(x) => {
                let _ = writeln!(out, "{x:?}");
            }
            ItemValue::String(s) => {
                let _ = writeln!(out, "{s:?}");
            }
            ItemValue::BoolArray(values) => {
                let _ = writeln!(out, "{values:?}");
            }
            ItemValue::CharArray(values) => {
                let _ = writeln!(out, "{values:?}");
            }
            ItemValue::Int32Array(values) => {
                let _ = writeln!(out, "{values:?}");
            }
            ItemValue::Int64Array(values) => {
                let _ = writeln!(out, "{values:?}");
            }
            ItemValue::DoubleArray(values) => {
                let _ = writeln!(out, "{values:?}");
            }
            ItemValue::StringArray(values) => {
                let _ = writeln!(out, "{values:?}");
            }
        }
    }
    let _ = writeln!(out, "{indent}}}");
}
