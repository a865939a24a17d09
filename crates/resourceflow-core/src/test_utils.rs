//! Shared test helpers for unit and integration tests.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available both in-crate and to the `tests/` suites (via the
//! `test-utils` feature).

use crate::entity::{Entity, Ports};
use crate::fixed::Fixed64;
use crate::grid::{Coordinate, Grid};
use crate::id::{EntityId, PortId};
use crate::packet::Packet;
use crate::port::{PortBank, PortMode};

// ===========================================================================
// Fixed-point and packet constructors
// ===========================================================================

pub fn fixed(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

/// A packet carrying the given cargo. Panics on negative input, which is
/// fine in tests.
pub fn pkt(cargo: f64) -> Packet {
    Packet::new(fixed(cargo)).expect("test packets carry non-negative cargo")
}

// ===========================================================================
// Grid placement helpers
// ===========================================================================

/// Place a solar panel at `(x, y)`, returning its id and port quad.
pub fn place_panel(grid: &mut Grid, x: usize, y: usize) -> (EntityId, Ports) {
    let entity = Entity::solar_panel(grid.ports_mut());
    let ports = *entity.ports();
    let id = grid
        .place_object(entity, Coordinate::new(x, y))
        .expect("test placement");
    (id, ports)
}

/// Place a cable at `(x, y)`, returning its id and port quad.
pub fn place_cable(grid: &mut Grid, x: usize, y: usize) -> (EntityId, Ports) {
    let entity = Entity::cable(grid.ports_mut());
    let ports = *entity.ports();
    let id = grid
        .place_object(entity, Coordinate::new(x, y))
        .expect("test placement");
    (id, ports)
}

/// Place a cargo tank at `(x, y)`, returning its id and port quad.
pub fn place_tank(grid: &mut Grid, x: usize, y: usize) -> (EntityId, Ports) {
    let entity = Entity::cargo_tank(grid.ports_mut());
    let ports = *entity.ports();
    let id = grid
        .place_object(entity, Coordinate::new(x, y))
        .expect("test placement");
    (id, ports)
}

/// Open a one-way flow on an existing link: `out` becomes Output and its
/// linked far side becomes Input. Panics if `out` is unlinked.
pub fn open_flow(bank: &mut PortBank, out: PortId) {
    let far = bank.link(out).expect("port must be linked before opening flow");
    bank.set_mode(out, PortMode::Output);
    bank.set_mode(far, PortMode::Input);
}
