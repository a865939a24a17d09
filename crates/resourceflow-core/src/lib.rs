//! Resourceflow Core -- a tick-based resource-flow network simulation.
//!
//! Entities placed on a bounded grid exchange discrete [`packet::Packet`]s of
//! cargo through directional ports. Ports must be explicitly linked; the grid
//! links facing port pairs automatically when an entity is placed next to
//! another one.
//!
//! # Tick Pipeline
//!
//! Each call to [`grid::Grid::update`] advances the simulation by one tick:
//!
//! 1. Walk occupied cells in row-major order (y ascending, then x ascending).
//! 2. Invoke each entity's update exactly once: drain Input ports, apply the
//!    entity's local transfer policy, push through Output ports.
//! 3. Increment the tick counter.
//!
//! Port transfer is synchronous -- a successful `send` writes directly into
//! the linked neighbor's receive buffer. Whether a packet sent this tick is
//! visible to the neighbor's own Input processing in the same tick therefore
//! depends on the relative update order of the two cells, which is why the
//! iteration order is fixed and documented.
//!
//! # Ports as a Flat Store
//!
//! Ports live in a [`port::PortBank`] owned by the grid, keyed by
//! [`id::PortId`]. A link is a symmetric pair of keys rather than mutual
//! owning references, so connect/disconnect are simple key swaps with no
//! ownership cycles.
//!
//! # Error Contract
//!
//! Outcomes that are part of normal simulation flow (buffer full, wrong port
//! mode, unlinked port, incompatible upgrade, insufficient cargo) are boolean
//! and leave state untouched on failure, so a blocked transfer retries on the
//! next tick without unwinding. Precondition violations (double-connect,
//! occupied cell, out-of-bounds coordinate, absent entity) are typed errors.
//!
//! # Key Types
//!
//! - [`grid::Grid`] -- bounded 2D placement surface and tick driver.
//! - [`entity::Entity`] -- enum dispatch over SolarPanel, Cable, CargoTank.
//! - [`port::PortBank`] -- flat store of all ports; connect/send/receive.
//! - [`packet::Packet`] -- immutable unit of transferable cargo.
//! - [`upgrade::UpgradeContainer`] -- bounded slot set gating tick behavior.
//! - [`fixed::Fixed64`] -- Q32.32 fixed-point type for deterministic math.

pub mod entity;
pub mod fixed;
pub mod grid;
pub mod id;
pub mod packet;
pub mod port;
pub mod upgrade;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
