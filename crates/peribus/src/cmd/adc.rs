use clap::Args;

use peribus_frame::be_uint;

use crate::cmd::ConnectArgs;
use crate::exit::{link_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::{print_reading, OutputFormat};

/// Full-scale counts of the bridge's 12-bit converter.
const ADC_MAX_COUNTS: u64 = 4095;
const ADC_FULL_SCALE: f64 = ADC_MAX_COUNTS as f64;

#[derive(Args, Debug)]
pub struct AdcArgs {
    /// ADC channel to sample.
    pub channel: u8,

    /// Number of samples to average.
    #[arg(long, default_value_t = 250)]
    pub samples: usize,

    /// Reference voltage for scaling.
    #[arg(long, default_value_t = 3.3)]
    pub vref: f64,
}

pub fn run(args: AdcArgs, connect: &ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    if args.samples == 0 {
        return Err(CliError::new(USAGE, "--samples must be greater than zero"));
    }

    let mut link = connect.open()?;

    let mut total = 0u64;
    for _ in 0..args.samples {
        let reply = link
            .adc_read(args.channel)
            .map_err(|err| link_error("adc read failed", err))?;
        total += sample_counts(&reply)?;
    }

    let raw_mean = total as f64 / args.samples as f64;
    let volts = raw_mean * args.vref / ADC_FULL_SCALE;
    print_reading(args.channel, args.samples, raw_mean, volts, format);

    link.disconnect();
    Ok(SUCCESS)
}

/// Decode one raw sample and bound it to the converter's range, so a garbage
/// reply cannot skew (or overflow) the accumulated total.
fn sample_counts(reply: &[u8]) -> CliResult<u64> {
    let raw = be_uint(reply)
        .map_err(|err| CliError::new(DATA_INVALID, format!("bad adc sample: {err}")))?;
    if raw > ADC_MAX_COUNTS {
        return Err(CliError::new(
            DATA_INVALID,
            format!("adc sample {raw} exceeds full scale ({ADC_MAX_COUNTS} counts)"),
        ));
    }
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_within_range_decodes() {
        assert_eq!(sample_counts(&[0x00]).unwrap(), 0);
        assert_eq!(sample_counts(&[0x08, 0x00]).unwrap(), 2048);
        assert_eq!(sample_counts(&[0x0F, 0xFF]).unwrap(), 4095);
    }

    #[test]
    fn sample_above_full_scale_rejected() {
        let err = sample_counts(&[0x10, 0x00]).unwrap_err();
        assert_eq!(err.code, DATA_INVALID);

        // An 8-byte garbage reply must not reach the accumulator.
        let err = sample_counts(&[0xFF; 8]).unwrap_err();
        assert_eq!(err.code, DATA_INVALID);
    }

    #[test]
    fn oversized_reply_rejected() {
        let err = sample_counts(&[0xFF; 9]).unwrap_err();
        assert_eq!(err.code, DATA_INVALID);
    }
}
