//! Unit tests for the CAN medium.

use embedded_can::{ExtendedId, Frame, Id, StandardId};
use rstest::{fixture, rstest};

use super::{AcceptanceFilter, CanBus, CanFrame, CanTransport, VirtualBus, VirtualBusError};
use crate::{
    NodeAddress,
    Transport,
    TransportConfig,
    fragment::{FragmentIndex, FrameHeader, MessageId, SendError},
};

fn frame_to(destination: NodeAddress) -> CanFrame {
    let header = FrameHeader::new(
        MessageId::new(1),
        1,
        FragmentIndex::zero(),
        destination,
        NodeAddress::new(1),
    );
    CanFrame::from_fragment(header, b"hi").expect("fits a frame")
}

#[fixture]
fn bus() -> VirtualBus { VirtualBus::new() }

#[test]
fn frame_carries_the_header_in_the_extended_id() {
    let header = FrameHeader::new(
        MessageId::new(5),
        3,
        FragmentIndex::new(2),
        NodeAddress::new(7),
        NodeAddress::new(8),
    );
    let frame = CanFrame::from_fragment(header, &[1, 2, 3]).expect("fits a frame");
    assert!(frame.is_extended());
    assert_eq!(frame.extended_id().as_raw(), header.identifier());
    assert_eq!(frame.header(), header);
    assert_eq!(frame.data(), &[1, 2, 3]);
    assert_eq!(frame.dlc(), 3);
}

#[test]
fn oversized_payload_does_not_fit() {
    let header = FrameHeader::decode(0);
    assert!(CanFrame::from_fragment(header, &[0; 9]).is_none());
}

#[test]
fn standard_and_remote_frames_are_refused() {
    let standard = StandardId::new(0x123).expect("valid id");
    assert!(CanFrame::new(standard, &[0]).is_none());
    let extended = ExtendedId::new(0x1234).expect("valid id");
    assert!(CanFrame::new(Id::Extended(extended), &[0]).is_some());
    assert!(CanFrame::new_remote(extended, 0).is_none());
}

#[rstest]
#[case(4, true)]
#[case(255, true)]
#[case(5, false)]
fn filter_admits_own_address_and_broadcast(#[case] destination: u8, #[case] accepted: bool) {
    let filter = AcceptanceFilter::for_node(NodeAddress::new(4));
    assert_eq!(filter.accepts(NodeAddress::new(destination)), accepted);
    assert_eq!(filter.accepts_frame(&frame_to(NodeAddress::new(destination))), accepted);
}

#[rstest]
fn virtual_bus_applies_filters_on_delivery(bus: VirtualBus) {
    let mut sender = bus.attach();
    let mut node_two = bus.attach();
    let mut node_three = bus.attach();
    for port in [&mut sender, &mut node_two, &mut node_three] {
        port.begin().expect("virtual ports start");
    }
    node_two
        .configure_filters(AcceptanceFilter::for_node(NodeAddress::new(2)))
        .expect("started");
    node_three
        .configure_filters(AcceptanceFilter::for_node(NodeAddress::new(3)))
        .expect("started");

    sender.transmit(&frame_to(NodeAddress::new(2))).expect("started");
    sender.transmit(&frame_to(NodeAddress::BROADCAST)).expect("started");

    assert_eq!(node_two.queued(), 2);
    assert_eq!(node_three.queued(), 1);
    assert_eq!(sender.queued(), 0);
    assert_eq!(bus.frames_carried(), 2);
}

#[rstest]
fn unstarted_port_cannot_transmit(bus: VirtualBus) {
    let mut port = bus.attach();
    assert_eq!(
        port.transmit(&frame_to(NodeAddress::new(2))),
        Err(VirtualBusError::NotStarted(0))
    );
}

#[rstest]
fn send_before_init_is_refused(bus: VirtualBus) {
    let mut transport =
        CanTransport::new(bus.attach(), TransportConfig::new(NodeAddress::new(1))).expect("valid");
    assert_eq!(
        transport.send(NodeAddress::new(2), b"early", false),
        Err(SendError::NotInitialized)
    );
}

#[rstest]
fn transports_exchange_a_multi_frame_message(bus: VirtualBus) {
    let mut sender =
        CanTransport::new(bus.attach(), TransportConfig::new(NodeAddress::new(1))).expect("valid");
    let mut receiver =
        CanTransport::new(bus.attach(), TransportConfig::new(NodeAddress::new(2))).expect("valid");
    sender.init().expect("virtual bus starts");
    receiver.init().expect("virtual bus starts");

    let payload: Vec<u8> = (0..20).collect();
    sender
        .send(NodeAddress::new(2), &payload, false)
        .expect("send succeeds");
    assert_eq!(bus.frames_carried(), 3);

    assert!(!receiver.data_available());
    assert!(!receiver.data_available());
    assert!(receiver.data_available());
    let mut out = [0; 100];
    assert_eq!(receiver.receive(&mut out), Some(20));
    assert_eq!(&out[..20], payload.as_slice());
    assert!(!receiver.data_available());
}

#[rstest]
fn readdressed_node_receives_under_its_new_address(bus: VirtualBus) {
    let mut sender =
        CanTransport::new(bus.attach(), TransportConfig::new(NodeAddress::new(1))).expect("valid");
    let mut receiver =
        CanTransport::new(bus.attach(), TransportConfig::new(NodeAddress::new(2))).expect("valid");
    sender.init().expect("virtual bus starts");
    receiver.init().expect("virtual bus starts");
    receiver
        .set_address(NodeAddress::new(40))
        .expect("filters reprogrammed");

    sender.send(NodeAddress::new(2), b"old", false).expect("sent");
    assert_eq!(receiver.bus().queued(), 0);
    sender.send(NodeAddress::new(40), b"new", false).expect("sent");
    assert!(receiver.data_available());
}

#[rstest]
fn signal_queries_report_wired_defaults(bus: VirtualBus) {
    let mut transport =
        CanTransport::new(bus.attach(), TransportConfig::default()).expect("valid");
    assert_eq!(transport.receiving_rssi(), None);
    assert_eq!(transport.sending_snr(), None);
    assert_eq!(transport.tx_power_percent(), Some(100));
    assert!(transport.set_tx_power_percent(50).is_err());
    assert!(!transport.sanity_check());
    transport.init().expect("virtual bus starts");
    assert!(transport.sanity_check());
}

#[rstest]
fn chunk_larger_than_a_frame_is_rejected(bus: VirtualBus) {
    let config = TransportConfig::default()
        .with_chunk_size(std::num::NonZeroUsize::new(9).expect("non-zero"));
    assert!(CanTransport::new(bus.attach(), config).is_err());
}
