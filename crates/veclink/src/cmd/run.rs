use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use tracing::{info, warn};
use veclink_frame::MAIN;
use veclink_link::{send_buffer, DisplayLink, KnobTracker};

use crate::cmd::{link_config, parse_duration, RunArgs};
use crate::control::{ControlEvent, ControlPort};
use crate::exit::{io_error, link_error, CliError, CliResult, SUCCESS};
use crate::output::OutputFormat;
use crate::source::{catalog, FrameSource};

pub fn run(args: RunArgs, _format: OutputFormat) -> CliResult<i32> {
    let frame_interval = parse_duration(&args.frame_interval)?;
    let telemetry_interval = parse_duration(&args.telemetry_interval)?;
    let config = link_config(args.ack_timeout.as_deref())?;

    let mut link = DisplayLink::open_with_config(&args.device, config)
        .map_err(|err| link_error("open failed", err))?;

    let mut control = match &args.control {
        Some(path) => Some(
            ControlPort::open(path).map_err(|err| io_error("control port open failed", err))?,
        ),
        None => None,
    };

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut sources = catalog();
    let mut selected = 0usize;
    let mut knob = KnobTracker::new();
    let mut buf: Vec<u8> = Vec::new();
    let mut next_telemetry = Instant::now();

    info!(device = %args.device.display(), "entering display loop");

    while running.load(Ordering::SeqCst) {
        let mut step = 0i32;
        if let Some(port) = control.as_mut() {
            match port.poll() {
                Some(ControlEvent::StepCw) => step += 1,
                Some(ControlEvent::StepCcw) => step -= 1,
                Some(ControlEvent::ButtonPress) => {
                    selected = 0;
                    info!(source = sources[selected].name(), "mode reset by button");
                }
                None => {}
            }
        }

        let position = link
            .knob_position()
            .map_err(|err| link_error("knob query failed", err))?;
        step += knob.motion(position as u8);

        if step != 0 {
            selected = step_selection(selected, step, sources.len());
            info!(source = sources[selected].name(), "mode changed");
        }

        buf.clear();
        sources[selected].render(&mut buf);
        send_buffer(&mut link, MAIN, &buf).map_err(|err| link_error("transfer failed", err))?;

        let (x, y) = if sources[selected].pins_offsets() {
            (0, 0)
        } else {
            screen_saver_offsets(current_minute())
        };
        link.set_screen_saver_offsets(x, y)
            .map_err(|err| link_error("screen saver update failed", err))?;

        if Instant::now() >= next_telemetry {
            sample_telemetry(&mut link);
            next_telemetry = Instant::now() + telemetry_interval;
        }

        std::thread::sleep(frame_interval);
    }

    info!("display loop stopped");
    Ok(SUCCESS)
}

/// Wrapping mode-selector arithmetic; negative steps wrap upward.
fn step_selection(selected: usize, step: i32, len: usize) -> usize {
    let len = len as i32;
    (((selected as i32 + step) % len + len) % len) as usize
}

/// Drift the whole picture a few pixels so a static display never burns in.
/// Derived from the minute of the hour, so the image creeps rather than
/// jumps.
fn screen_saver_offsets(minute: u64) -> (u8, u8) {
    ((minute % 5) as u8, ((minute + 2) % 4) as u8)
}

fn current_minute() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| (d.as_secs() / 60) % 60)
        .unwrap_or(0)
}

fn sample_telemetry<T: std::io::Read + std::io::Write>(link: &mut DisplayLink<T>) {
    match (
        link.check_fps(),
        link.check_cycles_in_frame(),
        link.button_pressed(),
    ) {
        (Ok(fps), Ok(cycles), Ok(button)) => {
            info!(fps, cycles, button, "telemetry");
        }
        (fps, cycles, button) => {
            warn!(
                fps_err = fps.is_err(),
                cycles_err = cycles.is_err(),
                button_err = button.is_err(),
                "telemetry sample incomplete"
            );
        }
    }
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
