//! Biometric digest utility for preparing demo inputs.
//!
//! Prints the SHA-256 digest that the shell computes for a photo file or a
//! manual code, so a registered identity can be matched against later scans.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin digest -- --file <path>
//! cargo run --bin digest -- --code <text>
//! cargo run --bin digest -- --code <text> --expect <hex>
//! ```
//!
//! With `--expect`, exits 1 when the computed digest differs.

use biosecure::domain::CaptureInput;
use biosecure::{digest, BiometricDigest};

const USAGE: &str = "Usage: digest (--file <path> | --code <text>) [--expect <hex>]";

fn usage_error(message: &str) -> ! {
    eprintln!("{message}\n{USAGE}");
    std::process::exit(2);
}

fn main() {
    let mut args = std::env::args().skip(1);
    let mut input: Option<CaptureInput> = None;
    let mut expected: Option<BiometricDigest> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--file" => {
                let p = args.next().unwrap_or_default();
                if p.is_empty() {
                    usage_error("Missing path after --file");
                }
                let photo = CaptureInput::from_photo_file(&p).unwrap_or_else(|e| {
                    eprintln!("Failed to read {p:?}: {e}");
                    std::process::exit(4);
                });
                input = Some(photo);
            }
            "--code" => {
                // An empty code is a valid input and hashes to the empty digest.
                let Some(code) = args.next() else {
                    usage_error("Missing text after --code");
                };
                input = Some(CaptureInput::ManualCode(code));
            }
            "--expect" => {
                let hex = args.next().unwrap_or_default();
                match BiometricDigest::from_hex(&hex) {
                    Ok(d) => expected = Some(d),
                    Err(e) => usage_error(&format!("Invalid --expect value: {e}")),
                }
            }
            "-h" | "--help" => {
                println!(
                    "{USAGE}\n\nPrints the hex SHA-256 digest of the photo bytes or code text. The input itself is never echoed."
                );
                return;
            }
            _ => usage_error(&format!("Unknown arg: {arg}")),
        }
    }

    let input = input.unwrap_or_else(|| usage_error("No input given"));

    let computed = digest(input.as_bytes());
    println!("{computed}");

    if let Some(expected) = expected {
        if expected != computed {
            eprintln!("Digest mismatch: expected {}…", expected.prefix());
            std::process::exit(1);
        }
    }
}
