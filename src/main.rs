use clap::{Parser, ValueEnum};
use serde_json::{json, Value};
use tracing::Level;

use json_endpointer::{coerce, Endpointer, Located, Result};

/// Read one value out of a JSON document by path, e.g. `data[0].timestamp`.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path such as `a.b[0]` or `[1].name`
    path: String,
    /// JSON document (string). Omit when using --file.
    json: Option<String>,
    /// Read the JSON document from a file instead
    #[arg(long, short)]
    file: Option<std::path::PathBuf>,
    /// Type to convert the located value to
    #[arg(long = "as", value_enum, default_value_t = Target::Node)]
    target: Target,
    /// Log to stderr; repeat for more detail
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Target {
    /// The located JSON node itself (null when missing)
    Node,
    String,
    Bool,
    U8,
    I8,
    I16,
    I32,
    I64,
    U16,
    U32,
    U64,
    F32,
    F64,
    Decimal,
    Datetime,
    DatetimeOffset,
    ArrayLength,
    Object,
    Array,
}

fn convert(located: Located<'_>, target: Target) -> Result<Value> {
    Ok(match target {
        Target::Node => located.node().cloned().unwrap_or(Value::Null),
        Target::String => json!(coerce::to_string(located)),
        Target::Bool => json!(coerce::to_bool(located)?),
        Target::U8 => json!(coerce::to_u8(located)?),
        Target::I8 => json!(coerce::to_i8(located)?),
        Target::I16 => json!(coerce::to_i16(located)?),
        Target::I32 => json!(coerce::to_i32(located)?),
        Target::I64 => json!(coerce::to_i64(located)?),
        Target::U16 => json!(coerce::to_u16(located)?),
        Target::U32 => json!(coerce::to_u32(located)?),
        Target::U64 => json!(coerce::to_u64(located)?),
        Target::F32 => json!(coerce::to_f32(located)?),
        Target::F64 => json!(coerce::to_f64(located)?),
        Target::Decimal => json!(coerce::to_decimal(located)?.to_string()),
        Target::Datetime => json!(coerce::to_datetime(located)?.to_string()),
        Target::DatetimeOffset => json!(coerce::to_datetime_offset(located)?.to_rfc3339()),
        Target::ArrayLength => json!(coerce::to_array_length(located)?),
        Target::Object => json!(coerce::to_object::<serde_json::Map<String, Value>>(located)?),
        Target::Array => json!(coerce::to_array::<Value>(located)?),
    })
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => return,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    // Parse CLI arguments.
    let args = Args::parse();
    init_logging(args.verbose);

    // Load the document text.
    let text = match (&args.file, &args.json) {
        (Some(file), _) => match std::fs::read_to_string(file) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Cannot read {}: {e}", file.display());
                std::process::exit(1);
            }
        },
        (None, Some(json)) => json.clone(),
        (None, None) => {
            eprintln!("Either a JSON argument or --file is required");
            std::process::exit(1);
        }
    };

    // Parse input JSON.
    let data: Value = match serde_json::from_str(&text) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Invalid JSON: {e}");
            std::process::exit(1);
        }
    };

    // Locate and convert.
    let out = Endpointer::default().extract(&data, &args.path, |located| convert(located, args.target));
    match out {
        Ok(v) => match serde_json::to_string_pretty(&v) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Cannot render result: {e}");
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
