//! Directional ports and the link/transfer protocol.
//!
//! Every port in a grid lives in a [`PortBank`], a flat store keyed by
//! [`PortId`]. A link between two ports is a symmetric pair of keys, so
//! connecting and disconnecting are plain key swaps -- no ownership cycles.
//!
//! Transfer outcomes that are part of normal simulation flow (buffer full,
//! wrong mode, unlinked port) are boolean: a blocked transfer is expected and
//! retryable on the next tick. Only the double-connect precondition is a
//! typed error, since continuing would break link symmetry.

use crate::id::PortId;
use crate::packet::Packet;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during link operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("port already linked")]
    AlreadyLinked,
}

// ---------------------------------------------------------------------------
// Modes and policies
// ---------------------------------------------------------------------------

/// Transfer direction of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortMode {
    /// The port accepts incoming packets.
    Input,
    /// The port emits packets to its linked neighbor.
    Output,
    /// The port is deactivated.
    Closed,
}

/// How an Input port handles an incoming packet when its buffer is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceivePolicy {
    /// The buffered packet is replaced by the incoming one.
    Overwrite,
    /// The incoming packet is denied; the buffer is kept.
    Deny,
}

// ---------------------------------------------------------------------------
// EnergyPort
// ---------------------------------------------------------------------------

/// A directional, linkable, one-slot buffer for [`Packet`]s.
///
/// Ports start `Closed`, unlinked, with an empty buffer and a `Deny`
/// receive policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyPort {
    mode: PortMode,
    link: Option<PortId>,
    buffer: Option<Packet>,
    policy: ReceivePolicy,
}

impl Default for EnergyPort {
    fn default() -> Self {
        Self {
            mode: PortMode::Closed,
            link: None,
            buffer: None,
            policy: ReceivePolicy::Deny,
        }
    }
}

// ---------------------------------------------------------------------------
// PortBank
// ---------------------------------------------------------------------------

/// Flat store of every port in a grid.
///
/// All port operations go through the bank by [`PortId`]. Indexing with a
/// stale key is a caller bug and panics, matching the arena idiom used for
/// entities.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PortBank {
    ports: SlotMap<PortId, EnergyPort>,
}

impl PortBank {
    /// Create an empty bank.
    pub fn new() -> Self {
        Self {
            ports: SlotMap::with_key(),
        }
    }

    /// Allocate a fresh port: `Closed`, unlinked, empty buffer, `Deny`.
    pub fn alloc(&mut self) -> PortId {
        self.ports.insert(EnergyPort::default())
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Current transfer direction of the port.
    pub fn mode(&self, id: PortId) -> PortMode {
        self.ports[id].mode
    }

    /// Set the transfer direction of the port.
    pub fn set_mode(&mut self, id: PortId, mode: PortMode) {
        self.ports[id].mode = mode;
    }

    /// Current full-buffer receive policy of the port.
    pub fn policy(&self, id: PortId) -> ReceivePolicy {
        self.ports[id].policy
    }

    /// Set the full-buffer receive policy of the port.
    pub fn set_policy(&mut self, id: PortId, policy: ReceivePolicy) {
        self.ports[id].policy = policy;
    }

    /// The port this port is linked to, if any. Read-only: links are
    /// established via [`PortBank::connect`] and cleared via
    /// [`PortBank::disconnect`].
    pub fn link(&self, id: PortId) -> Option<PortId> {
        self.ports[id].link
    }

    /// The packet currently pending in the port's receive buffer, if any.
    pub fn buffer(&self, id: PortId) -> Option<Packet> {
        self.ports[id].buffer
    }

    // -----------------------------------------------------------------------
    // Link protocol
    // -----------------------------------------------------------------------

    /// Establish a symmetric link between two ports.
    ///
    /// Fails with [`PortError::AlreadyLinked`] if either port already has a
    /// link; on failure neither side is modified.
    pub fn connect(&mut self, a: PortId, b: PortId) -> Result<(), PortError> {
        if self.ports[a].link.is_some() || self.ports[b].link.is_some() {
            return Err(PortError::AlreadyLinked);
        }
        self.ports[a].link = Some(b);
        self.ports[b].link = Some(a);
        Ok(())
    }

    /// Clear the link on both sides. No-op if the port is unlinked.
    pub fn disconnect(&mut self, id: PortId) {
        if let Some(other) = self.ports[id].link.take() {
            self.ports[other].link = None;
        }
    }

    // -----------------------------------------------------------------------
    // Transfer protocol
    // -----------------------------------------------------------------------

    /// Send a packet through the port to its linked neighbor.
    ///
    /// Succeeds only if this port is `Output`, a link exists, and the linked
    /// port accepts the packet via [`PortBank::receive`]. Returns `false` on
    /// any blocked condition; state is untouched so the transfer can retry
    /// next tick.
    pub fn send(&mut self, id: PortId, packet: Packet) -> bool {
        if self.ports[id].mode != PortMode::Output {
            return false;
        }
        let Some(target) = self.ports[id].link else {
            return false;
        };
        self.receive(target, packet)
    }

    /// Deliver a packet into the port's receive buffer.
    ///
    /// Succeeds only if the port is `Input` and either the buffer is empty
    /// or the policy is [`ReceivePolicy::Overwrite`]. On failure the buffer
    /// is left untouched.
    pub fn receive(&mut self, id: PortId, packet: Packet) -> bool {
        let port = &mut self.ports[id];
        if port.mode != PortMode::Input {
            return false;
        }
        if port.buffer.is_some() && port.policy == ReceivePolicy::Deny {
            return false;
        }
        port.buffer = Some(packet);
        true
    }

    /// Atomically empty the receive buffer and return its contents.
    pub fn collect(&mut self, id: PortId) -> Option<Packet> {
        self.ports[id].buffer.take()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
