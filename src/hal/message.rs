//! Protocol header at the start of every application message.
//!
//! The HAL only needs two facts from it, the protocol version and the
//! declared size, but the full header is decoded so callers can route on it.
//!
//! This is a simplified byte-aligned layout. The payload length has a byte of
//! its own instead of sharing one with the version and signed bits, so the
//! header is eight bytes rather than seven.
//!
//! ```text
//! byte 0  last hop
//! byte 1  sender
//! byte 2  destination
//! byte 3  bits 0-1 protocol version, bit 2 signed, bits 3-7 reserved
//! byte 4  payload length
//! byte 5  bits 0-2 command, bit 3 echo request, bit 4 echo, bits 5-7 payload type
//! byte 6  message type
//! byte 7  sensor id
//! ```

use crate::NodeAddress;

/// Protocol version every accepted message must carry.
pub const PROTOCOL_VERSION: u8 = 2;

/// Bytes occupied by the header.
pub const HEADER_SIZE: usize = 8;

const VERSION_MASK: u8 = 0x03;
const SIGNED_BIT: u8 = 1 << 2;
const COMMAND_MASK: u8 = 0x07;
const ECHO_REQUEST_BIT: u8 = 1 << 3;
const ECHO_BIT: u8 = 1 << 4;
const PAYLOAD_TYPE_SHIFT: u8 = 5;

/// Decoded application message header.
///
/// # Examples
///
/// ```
/// use meshlink::{
///     NodeAddress,
///     hal::{HEADER_SIZE, MessageHeader, PROTOCOL_VERSION},
/// };
///
/// let header = MessageHeader::new(NodeAddress::new(3), NodeAddress::new(0)).with_payload_len(12);
/// let bytes = header.encode();
/// let parsed = MessageHeader::parse(&bytes).expect("complete header");
/// assert_eq!(parsed.version(), PROTOCOL_VERSION);
/// assert_eq!(parsed.expected_message_size(100), HEADER_SIZE + 12);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MessageHeader {
    last: NodeAddress,
    sender: NodeAddress,
    destination: NodeAddress,
    version: u8,
    signed: bool,
    payload_len: u8,
    command: u8,
    echo_request: bool,
    echo: bool,
    payload_type: u8,
    message_type: u8,
    sensor: u8,
}

impl MessageHeader {
    /// Create a header for an empty, unsigned message at the current
    /// protocol version. The last hop starts out as the sender.
    #[must_use]
    pub const fn new(sender: NodeAddress, destination: NodeAddress) -> Self {
        Self {
            last: sender,
            sender,
            destination,
            version: PROTOCOL_VERSION,
            signed: false,
            payload_len: 0,
            command: 0,
            echo_request: false,
            echo: false,
            payload_type: 0,
            message_type: 0,
            sensor: 0,
        }
    }

    /// Decode the header from the first [`HEADER_SIZE`] bytes of `bytes`.
    /// Returns `None` if `bytes` is shorter than a header.
    #[must_use]
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let &[last, sender, destination, version_flags, payload_len, command_flags, message_type, sensor] =
            bytes.get(..HEADER_SIZE)?
        else {
            return None;
        };
        Some(Self {
            last: NodeAddress::new(last),
            sender: NodeAddress::new(sender),
            destination: NodeAddress::new(destination),
            version: version_flags & VERSION_MASK,
            signed: version_flags & SIGNED_BIT != 0,
            payload_len,
            command: command_flags & COMMAND_MASK,
            echo_request: command_flags & ECHO_REQUEST_BIT != 0,
            echo: command_flags & ECHO_BIT != 0,
            payload_type: command_flags >> PAYLOAD_TYPE_SHIFT,
            message_type,
            sensor,
        })
    }

    /// Encode the header into its wire bytes.
    #[must_use]
    pub const fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut version_flags = self.version & VERSION_MASK;
        if self.signed {
            version_flags |= SIGNED_BIT;
        }
        let mut command_flags = (self.command & COMMAND_MASK) | (self.payload_type << PAYLOAD_TYPE_SHIFT);
        if self.echo_request {
            command_flags |= ECHO_REQUEST_BIT;
        }
        if self.echo {
            command_flags |= ECHO_BIT;
        }
        [
            self.last.get(),
            self.sender.get(),
            self.destination.get(),
            version_flags,
            self.payload_len,
            command_flags,
            self.message_type,
            self.sensor,
        ]
    }

    /// Override the protocol version (masked to two bits).
    #[must_use]
    pub const fn with_version(mut self, version: u8) -> Self {
        self.version = version & VERSION_MASK;
        self
    }

    /// Set the declared payload length.
    #[must_use]
    pub const fn with_payload_len(mut self, payload_len: u8) -> Self {
        self.payload_len = payload_len;
        self
    }

    /// Mark the message as signed.
    #[must_use]
    pub const fn with_signed(mut self, signed: bool) -> Self {
        self.signed = signed;
        self
    }

    /// Set the command, message type, and sensor id.
    #[must_use]
    pub const fn with_command(mut self, command: u8, message_type: u8, sensor: u8) -> Self {
        self.command = command & COMMAND_MASK;
        self.message_type = message_type;
        self.sensor = sensor;
        self
    }

    /// Set the last hop.
    #[must_use]
    pub const fn with_last(mut self, last: NodeAddress) -> Self {
        self.last = last;
        self
    }

    /// Node that relayed the message to us.
    #[must_use]
    pub const fn last(&self) -> NodeAddress { self.last }

    /// Node that created the message.
    #[must_use]
    pub const fn sender(&self) -> NodeAddress { self.sender }

    /// Final destination of the message.
    #[must_use]
    pub const fn destination(&self) -> NodeAddress { self.destination }

    /// Protocol version field.
    #[must_use]
    pub const fn version(&self) -> u8 { self.version }

    /// Report whether the version matches [`PROTOCOL_VERSION`].
    #[must_use]
    pub const fn is_version_valid(&self) -> bool { self.version == PROTOCOL_VERSION }

    /// Whether the message carries a signature.
    #[must_use]
    pub const fn is_signed(&self) -> bool { self.signed }

    /// Declared payload length.
    #[must_use]
    pub const fn payload_len(&self) -> u8 { self.payload_len }

    /// Command field.
    #[must_use]
    pub const fn command(&self) -> u8 { self.command }

    /// Echo-request flag.
    #[must_use]
    pub const fn echo_request(&self) -> bool { self.echo_request }

    /// Echo flag.
    #[must_use]
    pub const fn echo(&self) -> bool { self.echo }

    /// Payload type field.
    #[must_use]
    pub const fn payload_type(&self) -> u8 { self.payload_type }

    /// Message type field.
    #[must_use]
    pub const fn message_type(&self) -> u8 { self.message_type }

    /// Sensor id field.
    #[must_use]
    pub const fn sensor(&self) -> u8 { self.sensor }

    /// Size the complete message should have on arrival.
    ///
    /// Unsigned messages are header plus declared payload. Signed messages
    /// always fill the largest payload, `max_message_size - HEADER_SIZE`.
    #[must_use]
    pub const fn expected_message_size(&self, max_message_size: usize) -> usize {
        if self.signed {
            if max_message_size > HEADER_SIZE {
                max_message_size
            } else {
                HEADER_SIZE
            }
        } else {
            HEADER_SIZE + self.payload_len as usize
        }
    }
}
