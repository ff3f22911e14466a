use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::corpus::InputMode;
use crate::replay::{DEFAULT_DESTINATION, ReplayConfig, TransportKind, default_workers};

use super::parsers::{
    parse_bool_env, parse_destination, parse_duration_arg, parse_positive_usize, parse_sleep_arg,
};
use super::types::PositiveUsize;

fn default_workers_arg() -> PositiveUsize {
    PositiveUsize::from(default_workers())
}

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Replays recorded log lines or captured packet payloads against a TCP or UDP endpoint."
)]
pub struct PlayerArgs {
    /// Replay file path
    #[arg(long)]
    pub file: PathBuf,

    /// Destination address (host:port)
    #[arg(long, default_value = DEFAULT_DESTINATION, value_parser = parse_destination)]
    pub url: String,

    /// Sleep duration between messages (supports ns/us/ms/s/m/h, e.g. 500us or 1m30s)
    #[arg(long, default_value = "0", value_parser = parse_sleep_arg)]
    pub sleep: Duration,

    /// Whether the replay file contains a pcap/pcapng dump
    #[arg(long)]
    pub pcap: bool,

    /// Send over UDP instead of TCP
    #[arg(long)]
    pub udp: bool,

    /// Number of concurrent workers, each with its own connection
    #[arg(long, default_value_t = default_workers_arg(), value_parser = parse_positive_usize)]
    pub workers: PositiveUsize,

    /// Total replay duration (supports ns/us/ms/s/m/h)
    #[arg(long, default_value = "1h", value_parser = parse_duration_arg)]
    pub duration: Duration,

    /// Enable verbose logging (sets log level to debug unless overridden by LOGPLAYER_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable color output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,
}

impl PlayerArgs {
    #[must_use]
    pub fn to_config(&self) -> ReplayConfig {
        ReplayConfig {
            file: self.file.clone(),
            input: if self.pcap {
                InputMode::Capture
            } else {
                InputMode::Text
            },
            destination: self.url.clone(),
            transport: if self.udp {
                TransportKind::Datagram
            } else {
                TransportKind::Stream
            },
            sleep: self.sleep,
            workers: self.workers.non_zero(),
            duration: self.duration,
        }
    }
}
