use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};
use veclink_link::{AckPolicy, LinkConfig};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod readback;
pub mod run;
pub mod send;
pub mod status;
pub mod version;

pub const DEFAULT_DEVICE: &str = "/dev/rpmsg0";

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Drive the display: render, transfer, poll inputs, repeat.
    Run(RunArgs),
    /// Query telemetry and input state once and print it.
    Status(StatusArgs),
    /// Transfer a file's bytes to a logical display buffer.
    Send(SendArgs),
    /// Dump the remote copy of a buffer (debug).
    Readback(ReadbackArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Run(args) => run::run(args, format),
        Command::Status(args) => status::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Readback(args) => readback::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Display channel device.
    #[arg(long, default_value = DEFAULT_DEVICE)]
    pub device: PathBuf,
    /// Named pipe carrying single-character mode commands.
    #[arg(long, value_name = "PATH")]
    pub control: Option<PathBuf>,
    /// Bound the per-frame ack wait (e.g. 5s, 500ms). Unset = wait forever.
    #[arg(long, value_name = "DUR")]
    pub ack_timeout: Option<String>,
    /// Delay between loop iterations (e.g. 16ms).
    #[arg(long, value_name = "DUR", default_value = "16ms")]
    pub frame_interval: String,
    /// How often to sample and log frame-rate/cycle telemetry.
    #[arg(long, value_name = "DUR", default_value = "2s")]
    pub telemetry_interval: String,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Display channel device.
    #[arg(long, default_value = DEFAULT_DEVICE)]
    pub device: PathBuf,
    /// Bound each ack wait (e.g. 5s, 500ms).
    #[arg(long, value_name = "DUR", default_value = "5s")]
    pub ack_timeout: String,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Display channel device.
    #[arg(long, default_value = DEFAULT_DEVICE)]
    pub device: PathBuf,
    /// Logical buffer to transfer into.
    #[arg(long, short = 'b', default_value = "0")]
    pub buffer: i32,
    /// Read buffer bytes from file.
    #[arg(long, conflicts_with = "data")]
    pub file: Option<PathBuf>,
    /// Raw string payload.
    #[arg(long, conflicts_with = "file")]
    pub data: Option<String>,
    /// Bound each ack wait (e.g. 5s, 500ms). Unset = wait forever.
    #[arg(long, value_name = "DUR")]
    pub ack_timeout: Option<String>,
}

#[derive(Args, Debug)]
pub struct ReadbackArgs {
    /// Display channel device.
    #[arg(long, default_value = DEFAULT_DEVICE)]
    pub device: PathBuf,
    /// Logical buffer to read back.
    #[arg(long, short = 'b', default_value = "0")]
    pub buffer: i32,
    /// Compare the remote bytes against this file.
    #[arg(long, value_name = "PATH")]
    pub compare: Option<PathBuf>,
    /// Bound the ack wait (e.g. 5s, 500ms).
    #[arg(long, value_name = "DUR", default_value = "5s")]
    pub ack_timeout: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Link configuration for an optional `--ack-timeout` value; absent means
/// the strict busy-poll.
pub fn link_config(ack_timeout: Option<&str>) -> CliResult<LinkConfig> {
    let ack_policy = match ack_timeout {
        Some(raw) => AckPolicy::timeout(parse_duration(raw)?),
        None => AckPolicy::Strict,
    };
    Ok(LinkConfig { ack_policy })
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported duration unit: {unit}"),
        )),
    }
}
