use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, Level};

use fixqr::{ECLevel, MaskPattern, QRBuilder, QR};

/// Generates a 33x33 QR-style matrix from text.
#[derive(Parser, Debug)]
#[command(name = "fixqr", version)]
#[command(about = "Generate a fixed-geometry QR-style matrix")]
struct Args {
    /// Text to encode. Read from stdin when omitted.
    text: Option<String>,

    /// Error correction level.
    #[arg(short, long, default_value = "M", value_parser = parse_ec_level)]
    ec_level: ECLevel,

    /// Text file receiving the rendered matrix.
    #[arg(short, long, default_value = "qrcode_output.txt")]
    output: PathBuf,

    /// Also save the matrix as a PNG image.
    #[arg(long)]
    png: Option<PathBuf>,

    /// Force a mask pattern (0-7) instead of picking the lowest penalty one.
    #[arg(long, value_parser = parse_mask)]
    mask: Option<MaskPattern>,

    /// Log pipeline stages to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_ec_level(s: &str) -> Result<ECLevel, String> {
    s.parse().map_err(|e| format!("{e}"))
}

fn parse_mask(s: &str) -> Result<MaskPattern, String> {
    let pattern = s.parse::<u8>().map_err(|e| e.to_string())?;
    MaskPattern::new(pattern).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt().with_writer(io::stderr).with_max_level(level).init();

    let text = match args.text {
        Some(t) => t,
        None => match prompt_text() {
            Ok(t) => t,
            Err(e) => {
                error!("Failed to read input: {e}");
                return ExitCode::FAILURE;
            }
        },
    };

    if text.is_empty() {
        eprintln!("Error: Empty input");
        return ExitCode::FAILURE;
    }

    let mut builder = QRBuilder::new(&text);
    builder.ec_level(args.ec_level);
    if let Some(m) = args.mask {
        builder.mask(m);
    }

    let qr = match builder.build() {
        Ok(qr) => qr,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let w = qr.width();
    println!("QR Code (Version {}, {w}x{w}):", *qr.version());
    println!("Mode: {}", qr.mode());
    println!("{}", qr.to_console_str());

    save_outputs(&qr, &args.output, args.png.as_deref());

    ExitCode::SUCCESS
}

// Write failures are logged and counted, never fatal
fn save_outputs(qr: &QR, output: &Path, png: Option<&Path>) -> usize {
    let mut failures = 0;

    match write_text_file(output, qr) {
        Ok(()) => {
            info!("Saved text rendering to {}", output.display());
            println!("QR code saved to {}", output.display());
        }
        Err(e) => {
            error!("Failed to write {}: {e}", output.display());
            failures += 1;
        }
    }

    if let Some(path) = png {
        match qr.to_image(10).save(path) {
            Ok(()) => println!("QR image saved to {}", path.display()),
            Err(e) => {
                error!("Failed to save image {}: {e}", path.display());
                failures += 1;
            }
        }
    }

    failures
}

fn prompt_text() -> io::Result<String> {
    print!("Enter text to encode in QR: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn text_file_contents(qr: &QR) -> String {
    format!("QR Code - Version {}\nData: {}\n\n{}", *qr.version(), qr.text(), qr.to_text())
}

fn write_text_file(path: &Path, qr: &QR) -> io::Result<()> {
    std::fs::write(path, text_file_contents(qr))
}

#[cfg(test)]
mod cli_tests {
    use std::path::Path;

    use clap::Parser;

    use super::{save_outputs, text_file_contents, Args};
    use fixqr::{ECLevel, QRBuilder};

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["fixqr", "hello"]);
        assert_eq!(args.text.as_deref(), Some("hello"));
        assert_eq!(args.ec_level, ECLevel::M);
        assert_eq!(args.output.to_str(), Some("qrcode_output.txt"));
        assert!(args.png.is_none());
        assert!(args.mask.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn test_flags() {
        let args = Args::parse_from(["fixqr", "-e", "h", "--mask", "6", "-o", "out.txt", "-v"]);
        assert_eq!(args.text, None);
        assert_eq!(args.ec_level, ECLevel::H);
        assert_eq!(args.mask.map(|m| *m), Some(6));
        assert!(args.verbose);
    }

    #[test]
    fn test_invalid_flags() {
        assert!(Args::try_parse_from(["fixqr", "-e", "X"]).is_err());
        assert!(Args::try_parse_from(["fixqr", "--mask", "8"]).is_err());
    }

    #[test]
    fn test_text_file_contents() {
        let qr = QRBuilder::new("HELLO").build().unwrap();
        let contents = text_file_contents(&qr);
        let lines = contents.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "QR Code - Version 4");
        assert_eq!(lines[1], "Data: HELLO");
        assert_eq!(lines[2], "");
        assert_eq!(lines.len(), 3 + 33);
    }

    #[test]
    fn test_write_failures_are_counted() {
        let qr = QRBuilder::new("HELLO").build().unwrap();
        let missing_dir = Path::new("/nonexistent-fixqr-dir");
        let failures = save_outputs(
            &qr,
            &missing_dir.join("out.txt"),
            Some(missing_dir.join("out.png").as_path()),
        );
        assert_eq!(failures, 2);
    }
}
