//! Upgrades: optional modules installed into a bounded per-entity slot set.
//!
//! The set of upgrade kinds is closed and small, so kinds are a plain enum
//! with a kind-tag lookup in the slot array -- no open-ended type matching.

use crate::entity::EntityKind;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Upgrade kinds
// ---------------------------------------------------------------------------

/// The closed set of upgrade kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeKind {
    /// Lets a cable combine an incoming packet with its held packet instead
    /// of rejecting it, as long as the combined cargo fits the cable's
    /// packet size limit.
    CombinePacket,
}

impl UpgradeKind {
    /// Display name of this upgrade.
    pub fn name(&self) -> &'static str {
        match self {
            UpgradeKind::CombinePacket => "Combine Packet Upgrade",
        }
    }

    /// Human-readable description of this upgrade.
    pub fn description(&self) -> &'static str {
        match self {
            UpgradeKind::CombinePacket => {
                "Allows the object this upgrade is installed in to combine \
                 incoming packets with the buffered packet."
            }
        }
    }

    /// Whether at most one copy of this upgrade may be installed per entity.
    pub fn is_unique(&self) -> bool {
        match self {
            UpgradeKind::CombinePacket => true,
        }
    }

    /// Whether this upgrade can be installed into the given entity kind.
    pub fn valid_for(&self, kind: EntityKind) -> bool {
        match self {
            UpgradeKind::CombinePacket => kind == EntityKind::Cable,
        }
    }
}

// ---------------------------------------------------------------------------
// UpgradeContainer
// ---------------------------------------------------------------------------

/// A bounded slot set of upgrades attached to one entity.
///
/// Capacity is fixed at construction. Slots are mutated only by explicit
/// [`install`](UpgradeContainer::install) / [`remove`](UpgradeContainer::remove)
/// calls, never by tick logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeContainer {
    owner_kind: EntityKind,
    slots: Box<[Option<UpgradeKind>]>,
}

impl UpgradeContainer {
    /// Create a container for an entity of the given kind with a fixed
    /// number of slots.
    pub fn new(owner_kind: EntityKind, slot_count: usize) -> Self {
        Self {
            owner_kind,
            slots: vec![None; slot_count].into_boxed_slice(),
        }
    }

    /// The installed upgrade slots, lowest index first.
    pub fn slots(&self) -> &[Option<UpgradeKind>] {
        &self.slots
    }

    /// Install an upgrade into the first free slot (lowest index).
    ///
    /// Returns `false` if the upgrade is not valid for the owning entity
    /// kind, if no free slot exists, or if the kind is unique and already
    /// installed.
    pub fn install(&mut self, kind: UpgradeKind) -> bool {
        if !kind.valid_for(self.owner_kind) {
            return false;
        }
        if kind.is_unique() && self.contains(kind) {
            return false;
        }
        match self.slots.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => {
                *slot = Some(kind);
                true
            }
            None => false,
        }
    }

    /// Remove the first installed instance of the given kind.
    ///
    /// Returns `false` if the kind is not present in any slot.
    pub fn remove(&mut self, kind: UpgradeKind) -> bool {
        match self.slots.iter_mut().find(|slot| **slot == Some(kind)) {
            Some(slot) => {
                *slot = None;
                true
            }
            None => false,
        }
    }

    /// Whether an upgrade of the given kind is installed. Queried by entity
    /// tick logic to branch behavior.
    pub fn contains(&self, kind: UpgradeKind) -> bool {
        self.slots.iter().any(|slot| *slot == Some(kind))
    }
}

// ===========================================================================
// Tests
// ===========================================================================
