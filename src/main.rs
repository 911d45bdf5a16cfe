use clap::Parser;
use officepdf::{Office, OfficeConfig, SaveFormat};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "officepdf", about = "Export documents to PDF through an office application")]
struct Args {
    /// Input document
    input: PathBuf,
    /// Output file (defaults to input with the format's extension)
    output: Option<PathBuf>,
    /// Output format name or save-format code
    #[arg(short, long, default_value = "pdf")]
    format: SaveFormat,
    /// Office executable (overrides OFFICEPDF_PROGRAM and PATH lookup)
    #[arg(long, value_name = "PATH")]
    office: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if !args.input.exists() {
        eprintln!("Error: file not found: {}", args.input.display());
        std::process::exit(1);
    }
    if !args.input.is_file() {
        eprintln!("Error: not a file: {}", args.input.display());
        std::process::exit(1);
    }

    let output = args
        .output
        .unwrap_or_else(|| args.input.with_extension(args.format.extension()));
    if same_file(&output, &args.input) {
        eprintln!("Error: output would overwrite input: {}", output.display());
        std::process::exit(1);
    }

    let mut config = OfficeConfig::from_env();
    if args.office.is_some() {
        config.program = args.office;
    }

    let result = Office::launch(config)
        .and_then(|office| officepdf::convert_to(office, &args.input, &output, args.format));
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// True when both paths name one existing file, however they are spelled.
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
