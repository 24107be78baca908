use std::io::IsTerminal;

use clap::ValueEnum;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct BytesOutput<'a> {
    operation: &'a str,
    address: u8,
    size: usize,
    bytes: String,
}

/// Print a raw peripheral response.
pub fn print_bytes(operation: &str, address: u8, data: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = BytesOutput {
                operation,
                address,
                size: data.len(),
                bytes: hex_string(data),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Pretty => {
            println!(
                "{operation} address={address} size={} bytes=[{}]",
                data.len(),
                hex_string(data)
            );
        }
        OutputFormat::Raw => {
            use std::io::Write;
            let mut out = std::io::stdout();
            let _ = out.write_all(data);
            let _ = out.flush();
        }
    }
}

#[derive(Serialize)]
struct ReadingOutput {
    channel: u8,
    samples: usize,
    raw_mean: f64,
    volts: f64,
}

/// Print an averaged ADC reading.
pub fn print_reading(channel: u8, samples: usize, raw_mean: f64, volts: f64, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = ReadingOutput {
                channel,
                samples,
                raw_mean,
                volts,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            println!("channel {channel}: {volts:.2} V (mean of {samples} samples, raw {raw_mean:.1})");
        }
    }
}

/// Print a simple status line.
pub fn print_status(message: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&serde_json::json!({ "status": message }))
                    .unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Pretty | OutputFormat::Raw => println!("{message}"),
    }
}

fn hex_string(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_string_formats_bytes() {
        assert_eq!(hex_string(&[0x00, 0x3A, 0xFF]), "00 3A FF");
        assert_eq!(hex_string(&[]), "");
    }
}
