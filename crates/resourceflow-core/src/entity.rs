//! Connectable entities and their per-tick transfer behavior.
//!
//! The entity set is closed, so dispatch is a plain enum over the three
//! kinds (not trait objects): sized inline storage and predictable branching
//! in the grid's tick loop.
//!
//! Every entity owns exactly four ports -- top, right, bottom, left -- in a
//! fixed orientation. Tick logic iterates them in that order; the order is
//! observable (a solar panel drains cargo port by port, a cable emits through
//! the first output port that accepts) so it is part of the contract.

use crate::fixed::Fixed64;
use crate::id::PortId;
use crate::packet::Packet;
use crate::port::{PortBank, PortMode};
use crate::upgrade::{UpgradeContainer, UpgradeKind};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Power state and entity kinds
// ---------------------------------------------------------------------------

/// On/off state of a placed entity. When `Off`, the entity's update is a
/// complete no-op: no production, consumption, or port activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerState {
    #[default]
    On,
    Off,
}

/// The closed set of entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    SolarPanel,
    Cable,
    CargoTank,
}

impl EntityKind {
    /// Display name of this entity kind.
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::SolarPanel => "Solar Cell",
            EntityKind::Cable => "Cable",
            EntityKind::CargoTank => "Cargo Tank",
        }
    }
}

// ---------------------------------------------------------------------------
// Directional port quad
// ---------------------------------------------------------------------------

/// One of the four facing directions on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All four directions, in port iteration order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// The direction facing back at this one.
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }
}

/// The four ports of a connectable entity, fixed at construction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ports {
    pub top: PortId,
    pub right: PortId,
    pub bottom: PortId,
    pub left: PortId,
}

impl Ports {
    /// Allocate four fresh ports from the bank.
    pub fn alloc(bank: &mut PortBank) -> Self {
        Self {
            top: bank.alloc(),
            right: bank.alloc(),
            bottom: bank.alloc(),
            left: bank.alloc(),
        }
    }

    /// The ports in fixed iteration order: top, right, bottom, left.
    pub fn in_order(&self) -> [PortId; 4] {
        [self.top, self.right, self.bottom, self.left]
    }

    /// The port facing the given direction.
    pub fn facing(&self, direction: Direction) -> PortId {
        match direction {
            Direction::Up => self.top,
            Direction::Right => self.right,
            Direction::Down => self.bottom,
            Direction::Left => self.left,
        }
    }
}

// ---------------------------------------------------------------------------
// SolarPanel
// ---------------------------------------------------------------------------

/// Cargo producer. Accrues a fixed amount per tick (capped) and emits
/// fixed-size packets through its output ports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolarPanel {
    ports: Ports,
    power: PowerState,
    cargo: Fixed64,
}

impl SolarPanel {
    /// Maximum cargo the panel can store. Production beyond the cap is
    /// discarded, not queued.
    pub fn max_cargo() -> Fixed64 {
        Fixed64::from_num(1000)
    }

    /// Cargo accrued per tick.
    pub fn cargo_per_tick() -> Fixed64 {
        Fixed64::from_num(0.003)
    }

    /// Cargo carried by each emitted packet.
    pub fn packet_cargo() -> Fixed64 {
        Fixed64::from_num(0.003)
    }

    /// Create a panel with four fresh ports and an empty store.
    pub fn new(bank: &mut PortBank) -> Self {
        Self {
            ports: Ports::alloc(bank),
            power: PowerState::On,
            cargo: Fixed64::ZERO,
        }
    }

    /// Currently stored cargo.
    pub fn cargo(&self) -> Fixed64 {
        self.cargo
    }

    /// One tick: accrue cargo, then attempt one packet per output port.
    ///
    /// Each output port's withdrawal is independent: a panel with enough
    /// stored cargo may emit through several ports in the same tick,
    /// draining sequentially in port order. A failed send (no linked input,
    /// or insufficient cargo) leaves the store unaffected for that attempt.
    pub fn update(&mut self, bank: &mut PortBank) {
        if self.power == PowerState::Off {
            return;
        }

        self.cargo = (self.cargo + Self::cargo_per_tick()).min(Self::max_cargo());

        let unit = Self::packet_cargo();
        for id in self.ports.in_order() {
            if bank.mode(id) != PortMode::Output {
                continue;
            }
            if self.cargo < unit {
                continue;
            }
            if let Ok(packet) = Packet::new(unit) {
                if bank.send(id, packet) {
                    self.cargo -= unit;
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Cable
// ---------------------------------------------------------------------------

/// Packet forwarder holding at most one packet at a time.
///
/// With the [`UpgradeKind::CombinePacket`] upgrade installed, an incoming
/// packet can merge into the held one instead of being rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cable {
    ports: Ports,
    power: PowerState,
    current: Option<Packet>,
    upgrades: UpgradeContainer,
}

impl Cable {
    /// Largest cargo a single held packet may carry, combined or not.
    pub fn max_packet_size() -> Fixed64 {
        Fixed64::from_num(10)
    }

    /// Create a cable with four fresh ports, no held packet, and one
    /// upgrade slot.
    pub fn new(bank: &mut PortBank) -> Self {
        Self {
            ports: Ports::alloc(bank),
            power: PowerState::On,
            current: None,
            upgrades: UpgradeContainer::new(EntityKind::Cable, 1),
        }
    }

    /// The packet currently held by this cable, if any.
    pub fn current_packet(&self) -> Option<Packet> {
        self.current
    }

    /// The cable's upgrade slots.
    pub fn upgrades(&self) -> &UpgradeContainer {
        &self.upgrades
    }

    /// Mutable access to the cable's upgrade slots.
    pub fn upgrades_mut(&mut self) -> &mut UpgradeContainer {
        &mut self.upgrades
    }

    /// Capacity policy for an incoming packet.
    ///
    /// Empty cable: accept iff the packet fits the size limit. Holding a
    /// packet: accept only with the combine upgrade installed and the
    /// combined cargo within the limit. Otherwise reject -- the packet stays
    /// in the originating port's buffer for retry on a later tick.
    pub fn can_accept(&self, incoming: Packet) -> bool {
        let limit = Self::max_packet_size();
        match self.current {
            None => incoming.cargo() <= limit,
            Some(held) => {
                self.upgrades.contains(UpgradeKind::CombinePacket)
                    && held.cargo() + incoming.cargo() <= limit
            }
        }
    }

    /// One tick: drain acceptable input buffers, then emit through the
    /// first output port that takes the held packet.
    pub fn update(&mut self, bank: &mut PortBank) {
        if self.power == PowerState::Off {
            return;
        }

        // Input pass: accepted packets are collected (clearing the port);
        // rejected ones stay buffered for retry next tick.
        for id in self.ports.in_order() {
            if bank.mode(id) != PortMode::Input {
                continue;
            }
            let Some(pending) = bank.buffer(id) else {
                continue;
            };
            if !self.can_accept(pending) {
                continue;
            }
            let _ = bank.collect(id);
            self.current = Some(match self.current {
                Some(held) => held.combine(pending),
                None => pending,
            });
        }

        // Output pass: at most one successful emission per tick; the first
        // port that accepts wins.
        if let Some(packet) = self.current {
            for id in self.ports.in_order() {
                if bank.mode(id) != PortMode::Output {
                    continue;
                }
                if bank.send(id, packet) {
                    self.current = None;
                    break;
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// CargoTank
// ---------------------------------------------------------------------------

/// Cargo sink. Collects every pending input packet into a capped reservoir.
/// Output ports are inert -- a deliberate terminal-node design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CargoTank {
    ports: Ports,
    power: PowerState,
    cargo: Fixed64,
}

impl CargoTank {
    /// Maximum cargo the tank can hold. Overflow is discarded.
    pub fn max_cargo() -> Fixed64 {
        Fixed64::from_num(10_000)
    }

    /// Create a tank with four fresh ports and an empty reservoir.
    pub fn new(bank: &mut PortBank) -> Self {
        Self {
            ports: Ports::alloc(bank),
            power: PowerState::On,
            cargo: Fixed64::ZERO,
        }
    }

    /// Currently stored cargo.
    pub fn cargo(&self) -> Fixed64 {
        self.cargo
    }

    /// One tick: collect every pending input packet into the reservoir,
    /// capped at [`CargoTank::max_cargo`].
    pub fn update(&mut self, bank: &mut PortBank) {
        if self.power == PowerState::Off {
            return;
        }

        for id in self.ports.in_order() {
            if bank.mode(id) != PortMode::Input {
                continue;
            }
            if let Some(packet) = bank.collect(id) {
                self.cargo = (self.cargo + packet.cargo()).min(Self::max_cargo());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Entity (enum dispatch)
// ---------------------------------------------------------------------------

/// A placeable entity: enum dispatch over the three kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Entity {
    SolarPanel(SolarPanel),
    Cable(Cable),
    CargoTank(CargoTank),
}

impl Entity {
    /// Create a solar panel entity against the given port bank.
    pub fn solar_panel(bank: &mut PortBank) -> Self {
        Entity::SolarPanel(SolarPanel::new(bank))
    }

    /// Create a cable entity against the given port bank.
    pub fn cable(bank: &mut PortBank) -> Self {
        Entity::Cable(Cable::new(bank))
    }

    /// Create a cargo tank entity against the given port bank.
    pub fn cargo_tank(bank: &mut PortBank) -> Self {
        Entity::CargoTank(CargoTank::new(bank))
    }

    /// The kind tag of this entity.
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::SolarPanel(_) => EntityKind::SolarPanel,
            Entity::Cable(_) => EntityKind::Cable,
            Entity::CargoTank(_) => EntityKind::CargoTank,
        }
    }

    /// Display name of this entity.
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Current power state.
    pub fn power_state(&self) -> PowerState {
        match self {
            Entity::SolarPanel(panel) => panel.power,
            Entity::Cable(cable) => cable.power,
            Entity::CargoTank(tank) => tank.power,
        }
    }

    /// Turn the entity on or off. An `Off` entity's update is a no-op.
    pub fn set_power_state(&mut self, state: PowerState) {
        match self {
            Entity::SolarPanel(panel) => panel.power = state,
            Entity::Cable(cable) => cable.power = state,
            Entity::CargoTank(tank) => tank.power = state,
        }
    }

    /// The entity's four directional ports.
    pub fn ports(&self) -> &Ports {
        match self {
            Entity::SolarPanel(panel) => &panel.ports,
            Entity::Cable(cable) => &cable.ports,
            Entity::CargoTank(tank) => &tank.ports,
        }
    }

    /// Run one tick of this entity's transfer logic.
    pub fn update(&mut self, bank: &mut PortBank) {
        match self {
            Entity::SolarPanel(panel) => panel.update(bank),
            Entity::Cable(cable) => cable.update(bank),
            Entity::CargoTank(tank) => tank.update(bank),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
