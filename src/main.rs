//! Demo binary for `meshlink`.
//!
//! Attaches two nodes to an in-memory CAN bus, sends one message through the
//! HAL and reports what the receiving side validated.

mod cli;

use std::{error::Error, num::NonZeroUsize};

use clap::Parser;
use meshlink::{
    CanTransport,
    NodeAddress,
    TransportConfig,
    TransportHal,
    VirtualBus,
    can::BusPort,
    hal::MessageHeader,
};
use tracing_subscriber::EnvFilter;

fn node(
    bus: &VirtualBus,
    address: NodeAddress,
    cli: &cli::Cli,
) -> Result<TransportHal<CanTransport<BusPort>>, Box<dyn Error>> {
    let config = TransportConfig::new(address)
        .with_pool_capacity(NonZeroUsize::new(cli.pool_capacity).ok_or("pool capacity must be non-zero")?)
        .with_max_message_size(
            NonZeroUsize::new(cli.max_message_size).ok_or("max message size must be non-zero")?,
        );
    let mut hal = TransportHal::new(CanTransport::new(bus.attach(), config)?);
    hal.init()?;
    Ok(hal)
}

fn main() -> Result<(), Box<dyn Error>> {
    // Applications embedding the library should install their own subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = cli::Cli::parse();
    let from = NodeAddress::new(cli.from);
    let to = NodeAddress::new(cli.to);
    let destination = if cli.broadcast { NodeAddress::BROADCAST } else { to };

    let bus = VirtualBus::new();
    let mut sender = node(&bus, from, &cli)?;
    let mut receiver = node(&bus, to, &cli)?;

    let mut message = MessageHeader::new(from, destination)
        .with_payload_len(cli.length)
        .encode()
        .to_vec();
    message.extend((0..cli.length).map(|i| i.wrapping_mul(7)));

    sender.send(destination, &message, false)?;
    tracing::info!(
        frames = bus.frames_carried(),
        bytes = message.len(),
        "message sent"
    );

    let mut delivered = 0usize;
    loop {
        let queued = receiver.transport().bus().queued();
        if !receiver.data_available() {
            if queued == 0 {
                break;
            }
            continue;
        }
        if let Some(inbound) = receiver.receive()? {
            delivered += 1;
            println!(
                "node {} received {} payload bytes from node {}",
                receiver.address(),
                inbound.payload().len(),
                inbound.header().sender()
            );
        }
    }
    if delivered == 0 {
        println!("node {} received nothing", receiver.address());
    }
    Ok(())
}
