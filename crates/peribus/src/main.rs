mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::{Command, ConnectArgs};
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "peribus", version, about = "Peripheral bridge driver CLI")]
struct Cli {
    #[command(flatten)]
    connect: ConnectArgs,

    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, &cli.connect, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_gpio_write() {
        let cli = Cli::try_parse_from([
            "peribus",
            "gpio",
            "write",
            "13",
            "1",
            "--host",
            "10.0.0.2",
            "--port",
            "4455",
        ])
        .expect("gpio write args should parse");

        assert!(matches!(cli.command, Command::Gpio(_)));
        assert_eq!(cli.connect.host, "10.0.0.2");
        assert_eq!(cli.connect.port, 4455);
    }

    #[test]
    fn parses_adc_with_samples() {
        let cli = Cli::try_parse_from(["peribus", "adc", "1", "--samples", "10"])
            .expect("adc args should parse");

        match cli.command {
            Command::Adc(args) => {
                assert_eq!(args.channel, 1);
                assert_eq!(args.samples, 10);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_debug_toggle() {
        let cli = Cli::try_parse_from(["peribus", "debug", "on"]).expect("debug args should parse");
        assert!(matches!(cli.command, Command::Debug(_)));
    }

    #[test]
    fn rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["peribus", "frobnicate"]).is_err());
    }

    #[test]
    fn spi_test_defaults() {
        let cli = Cli::try_parse_from(["peribus", "spi-test"]).expect("spi-test should parse");
        match cli.command {
            Command::SpiTest(args) => {
                assert_eq!(args.target, 7);
                assert!(args.mode.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
