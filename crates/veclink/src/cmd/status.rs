use veclink_link::DisplayLink;

use crate::cmd::{link_config, StatusArgs};
use crate::exit::{link_error, CliResult, SUCCESS};
use crate::output::{print_status, OutputFormat, StatusReport};

pub fn run(args: StatusArgs, format: OutputFormat) -> CliResult<i32> {
    let config = link_config(Some(args.ack_timeout.as_str()))?;
    let mut link = DisplayLink::open_with_config(&args.device, config)
        .map_err(|err| link_error("open failed", err))?;

    let frame_rate = link
        .check_fps()
        .map_err(|err| link_error("frame-rate query failed", err))?;
    let cycles_in_frame = link
        .check_cycles_in_frame()
        .map_err(|err| link_error("cycle query failed", err))?;
    let knob_position = link
        .knob_position()
        .map_err(|err| link_error("knob query failed", err))?;
    let button_pressed = link
        .button_pressed()
        .map_err(|err| link_error("button query failed", err))?;

    let report = StatusReport {
        device: args.device.display().to_string(),
        frame_rate,
        cycles_in_frame,
        knob_position,
        button_pressed,
        ack_mismatches: link.ack_mismatches(),
    };
    print_status(&report, format);

    Ok(SUCCESS)
}
