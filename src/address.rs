//! Node addressing on the shared medium.

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Eight-bit identifier of a node on the sensor network.
///
/// Addresses are assigned externally (by registration or static
/// configuration); the transport only stores and filters on them.
///
/// # Examples
///
/// ```
/// use meshlink::NodeAddress;
/// let node = NodeAddress::new(12);
/// assert_eq!(node.get(), 12);
/// assert!(!node.is_broadcast());
/// assert!(NodeAddress::BROADCAST.is_broadcast());
/// ```
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    From,
    Into,
    Serialize,
    Deserialize,
)]
#[display("{_0}")]
pub struct NodeAddress(u8);

impl NodeAddress {
    /// Destination accepted by every node's acceptance filter.
    pub const BROADCAST: Self = Self(255);

    /// Conventional address of the gateway node.
    pub const GATEWAY: Self = Self(0);

    /// Wrap a raw address.
    #[must_use]
    pub const fn new(value: u8) -> Self { Self(value) }

    /// Return the raw address.
    #[must_use]
    pub const fn get(self) -> u8 { self.0 }

    /// Report whether this is the broadcast address.
    #[must_use]
    pub const fn is_broadcast(self) -> bool { self.0 == Self::BROADCAST.0 }
}
