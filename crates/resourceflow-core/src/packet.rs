//! The unit of transferable cargo.

use crate::fixed::Fixed64;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when constructing a packet.
#[derive(Debug, thiserror::Error)]
pub enum PacketError {
    #[error("packet cargo must be non-negative, got {0}")]
    InvalidValue(Fixed64),
}

// ---------------------------------------------------------------------------
// Packet
// ---------------------------------------------------------------------------

/// An immutable unit of cargo sent between linked ports.
///
/// A packet is a plain value: combining two packets produces a new one and
/// never mutates either input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Packet {
    cargo: Fixed64,
}

impl Packet {
    /// Create a packet carrying the given amount of cargo.
    ///
    /// Fails with [`PacketError::InvalidValue`] if `cargo` is negative.
    pub fn new(cargo: Fixed64) -> Result<Self, PacketError> {
        if cargo < Fixed64::ZERO {
            return Err(PacketError::InvalidValue(cargo));
        }
        Ok(Self { cargo })
    }

    /// The amount of cargo this packet carries.
    pub fn cargo(&self) -> Fixed64 {
        self.cargo
    }

    /// Combine this packet with another, producing a new packet carrying
    /// the summed cargo.
    pub fn combine(self, other: Packet) -> Packet {
        Packet {
            cargo: self.cargo + other.cargo,
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
