use crate::config::{DEFAULT_DESTINATION_PORT, DEFAULT_SOURCE_PORT};
use crate::endpoint::Endpoint;
use clap::{ArgAction, Parser};

/// Relay a TCP byte stream from a source host to a destination host, reconnecting forever
#[derive(Parser, Debug)]
#[command(version, disable_version_flag = true)]
pub struct Options {
    /// Show version and exit
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    pub version: (),

    /// Send log output to the system log instead of stderr
    #[arg(short = 'l', long = "syslog")]
    pub syslog: bool,

    /// Source port
    #[arg(
        short = 's',
        value_name = "SRC_PORT",
        default_value_t = DEFAULT_SOURCE_PORT,
        value_parser = clap::value_parser!(u16).range(1..),
    )]
    pub src_port: u16,

    /// Destination port
    #[arg(
        short = 'd',
        value_name = "DST_PORT",
        default_value_t = DEFAULT_DESTINATION_PORT,
        value_parser = clap::value_parser!(u16).range(1..),
    )]
    pub dst_port: u16,

    /// Source host name, where bytes are read from
    #[arg(value_name = "SRC_HOST")]
    pub src_host: String,

    /// Destination host name, where bytes are written to
    #[arg(value_name = "DST_HOST")]
    pub dst_host: String,
}

impl Options {
    /// The (source, destination) pair to relay between.
    pub fn endpoints(&self) -> (Endpoint, Endpoint) {
        (
            Endpoint::new(self.src_host.clone(), self.src_port),
            Endpoint::new(self.dst_host.clone(), self.dst_port),
        )
    }
}
