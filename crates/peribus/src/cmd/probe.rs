use clap::Args;
use tracing::info;

use crate::cmd::ConnectArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_status, OutputFormat};

#[derive(Args, Debug, Default)]
pub struct ProbeArgs {
    /// Re-run the liveness probe after connecting.
    #[arg(long)]
    pub recheck: bool,
}

pub fn run(args: ProbeArgs, connect: &ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    let mut link = connect.open()?;
    info!(host = %connect.host, port = connect.port, "handshake acknowledged");

    if args.recheck && !link.is_connected() {
        return Err(crate::exit::CliError::new(
            crate::exit::HEALTH_CHECK_FAILED,
            "bridge stopped acknowledging the liveness probe",
        ));
    }

    print_status("bridge acknowledged", format);
    link.disconnect();
    Ok(SUCCESS)
}
