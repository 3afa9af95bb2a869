//! Command line interface for the `meshlink` demo binary.
//!
//! Describes a two-node exchange on an in-memory CAN bus and provides the
//! definition the build script renders into a man page.

use clap::Parser;

/// Command line arguments for the `meshlink` binary.
#[derive(Debug, Parser)]
#[command(
    name = "meshlink",
    version,
    about = "Send one message between two nodes on an in-memory CAN bus"
)]
pub struct Cli {
    /// Address of the sending node.
    #[arg(long, default_value_t = 1)]
    pub from: u8,
    /// Address of the receiving node.
    #[arg(long, default_value_t = 0)]
    pub to: u8,
    /// Payload bytes carried after the message header.
    #[arg(short, long, default_value_t = 20)]
    pub length: u8,
    /// Concurrent reassembly slots per node.
    #[arg(long, default_value_t = 8)]
    pub pool_capacity: usize,
    /// Largest message either node accepts.
    #[arg(long, default_value_t = 100)]
    pub max_message_size: usize,
    /// Address the message to every node instead of `--to`.
    #[arg(short, long)]
    pub broadcast: bool,
}
