use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use veclink_link::TransferStats;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// One round of device telemetry and input state.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub device: String,
    pub frame_rate: i32,
    pub cycles_in_frame: i32,
    pub knob_position: i32,
    pub button_pressed: bool,
    pub ack_mismatches: u64,
}

pub fn print_status(report: &StatusReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"])
                .add_row(vec!["device", &report.device])
                .add_row(vec!["frame_rate", &report.frame_rate.to_string()])
                .add_row(vec!["cycles_in_frame", &report.cycles_in_frame.to_string()])
                .add_row(vec!["knob_position", &report.knob_position.to_string()])
                .add_row(vec!["button_pressed", &report.button_pressed.to_string()])
                .add_row(vec!["ack_mismatches", &report.ack_mismatches.to_string()]);
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            println!(
                "device={} fps={} cycles={} knob={} button={} mismatches={}",
                report.device,
                report.frame_rate,
                report.cycles_in_frame,
                report.knob_position,
                report.button_pressed,
                report.ack_mismatches
            );
        }
    }
}

#[derive(Debug, Serialize)]
struct TransferOutput<'a> {
    device: &'a str,
    buffer: &'a str,
    frames: u32,
    payload_bytes: usize,
    elapsed_us: u64,
}

pub fn print_transfer(device: &str, buffer: &str, stats: &TransferStats, format: OutputFormat) {
    let out = TransferOutput {
        device,
        buffer,
        frames: stats.frames,
        payload_bytes: stats.payload_bytes,
        elapsed_us: stats.elapsed.as_micros() as u64,
    };
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["DEVICE", "BUFFER", "FRAMES", "BYTES", "ELAPSED (µs)"])
                .add_row(vec![
                    out.device.to_string(),
                    out.buffer.to_string(),
                    out.frames.to_string(),
                    out.payload_bytes.to_string(),
                    out.elapsed_us.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            println!(
                "sent {} bytes to {} in {} frames ({} µs)",
                out.payload_bytes, out.buffer, out.frames, out.elapsed_us
            );
        }
    }
}

/// Hex dump, 16 bytes per row with offsets.
pub fn print_hex(data: &[u8]) {
    for (row, chunk) in data.chunks(16).enumerate() {
        let bytes: Vec<String> = chunk.iter().map(|b| format!("{b:02x}")).collect();
        println!("{:08x}  {}", row * 16, bytes.join(" "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_report_serializes_every_field() {
        let report = StatusReport {
            device: "/dev/rpmsg0".to_string(),
            frame_rate: 60,
            cycles_in_frame: 31250,
            knob_position: 200,
            button_pressed: false,
            ack_mismatches: 0,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["frame_rate"], 60);
        assert_eq!(json["knob_position"], 200);
        assert_eq!(json["button_pressed"], false);
    }
}
