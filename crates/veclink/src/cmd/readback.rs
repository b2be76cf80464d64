use std::fs;

use tracing::info;
use veclink_link::DisplayLink;

use crate::cmd::{link_config, ReadbackArgs};
use crate::exit::{io_error, link_error, CliResult, FAILURE, SUCCESS};
use crate::output::{print_hex, OutputFormat};

pub fn run(args: ReadbackArgs, _format: OutputFormat) -> CliResult<i32> {
    let config = link_config(Some(args.ack_timeout.as_str()))?;
    let mut link = DisplayLink::open_with_config(&args.device, config)
        .map_err(|err| link_error("open failed", err))?;

    let remote = link
        .read_back(args.buffer)
        .map_err(|err| link_error("readback failed", err))?;

    info!(bytes = remote.len(), "remote buffer received");
    print_hex(&remote);

    if let Some(path) = &args.compare {
        let local = fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
        let compared = remote.len().min(local.len());
        let differing = remote
            .iter()
            .zip(local.iter())
            .filter(|(a, b)| a != b)
            .count();

        if differing == 0 && remote.len() == local.len() {
            println!("match: {} bytes identical", remote.len());
        } else {
            println!(
                "mismatch: {differing} of {compared} compared bytes differ \
                 (remote {} bytes, local {} bytes)",
                remote.len(),
                local.len()
            );
            return Ok(FAILURE);
        }
    }

    Ok(SUCCESS)
}
