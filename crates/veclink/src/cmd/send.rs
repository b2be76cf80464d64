use std::fs;

use veclink_frame::buffer_name;
use veclink_link::{send_buffer, DisplayLink};

use crate::cmd::{link_config, SendArgs};
use crate::exit::{io_error, link_error, CliResult, SUCCESS};
use crate::output::{print_transfer, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = resolve_payload(&args)?;
    let config = link_config(args.ack_timeout.as_deref())?;
    let mut link = DisplayLink::open_with_config(&args.device, config)
        .map_err(|err| link_error("open failed", err))?;

    let stats = send_buffer(&mut link, args.buffer, &payload)
        .map_err(|err| link_error("transfer failed", err))?;

    print_transfer(
        &args.device.display().to_string(),
        buffer_name(args.buffer),
        &stats,
        format,
    );

    Ok(SUCCESS)
}

fn resolve_payload(args: &SendArgs) -> CliResult<Vec<u8>> {
    if let Some(data) = &args.data {
        return Ok(data.as_bytes().to_vec());
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    Ok(Vec::new())
}
