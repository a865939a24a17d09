//! Property-based tests for the resourceflow core.
//!
//! Uses proptest to generate random placement/removal/tick sequences and
//! random port operation sequences, then verify structural invariants hold.

use proptest::prelude::*;
use resourceflow_core::entity::Entity;
use resourceflow_core::grid::{Coordinate, Grid};
use resourceflow_core::packet::Packet;
use resourceflow_core::port::{PortBank, PortMode, ReceivePolicy};
use resourceflow_core::test_utils::*;

const GRID_SIDE: usize = 4;

// ===========================================================================
// Generators
// ===========================================================================

/// Grid mutation operations for testing placement/removal safety.
#[derive(Debug, Clone)]
enum GridOp {
    Place(u8, usize, usize),
    Remove(usize, usize),
    Step,
}

fn arb_grid_ops(max_ops: usize) -> impl Strategy<Value = Vec<GridOp>> {
    proptest::collection::vec(
        prop_oneof![
            (0..3u8, 0..GRID_SIDE, 0..GRID_SIDE).prop_map(|(k, x, y)| GridOp::Place(k, x, y)),
            (0..GRID_SIDE, 0..GRID_SIDE).prop_map(|(x, y)| GridOp::Remove(x, y)),
            Just(GridOp::Step),
        ],
        1..=max_ops,
    )
}

/// Port operations for model-checking the receive/collect contract.
#[derive(Debug, Clone)]
enum PortOp {
    Receive(u32),
    Collect,
    SetPolicy(bool),
    SetMode(u8),
}

fn arb_port_ops(max_ops: usize) -> impl Strategy<Value = Vec<PortOp>> {
    proptest::collection::vec(
        prop_oneof![
            (0..100u32).prop_map(PortOp::Receive),
            Just(PortOp::Collect),
            proptest::bool::ANY.prop_map(PortOp::SetPolicy),
            (0..3u8).prop_map(PortOp::SetMode),
        ],
        1..=max_ops,
    )
}

fn apply_grid_ops(ops: &[GridOp]) -> Grid {
    let mut grid = Grid::new(GRID_SIDE, GRID_SIDE);
    for op in ops {
        match *op {
            GridOp::Place(kind, x, y) => {
                let entity = match kind {
                    0 => Entity::solar_panel(grid.ports_mut()),
                    1 => Entity::cable(grid.ports_mut()),
                    _ => Entity::cargo_tank(grid.ports_mut()),
                };
                // Occupied cells are expected to reject.
                let _ = grid.place_object(entity, Coordinate::new(x, y));
            }
            GridOp::Remove(x, y) => {
                // Empty cells are expected to reject.
                let _ = grid.remove_object(Coordinate::new(x, y));
            }
            GridOp::Step => grid.update(),
        }
    }
    grid
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every link is symmetric after any sequence of placements, removals,
    /// and ticks: if a port links to q, q links back to it.
    #[test]
    fn links_stay_symmetric(ops in arb_grid_ops(40)) {
        let grid = apply_grid_ops(&ops);

        for y in 0..GRID_SIDE {
            for x in 0..GRID_SIDE {
                let Some(entity) = grid.entity_at(Coordinate::new(x, y)).unwrap() else {
                    continue;
                };
                for port in entity.ports().in_order() {
                    if let Some(far) = grid.ports().link(port) {
                        prop_assert_eq!(grid.ports().link(far), Some(port));
                    }
                }
            }
        }
    }

    /// Single occupancy: every occupied cell resolves to a live entity and
    /// no entity id appears in two cells.
    #[test]
    fn cells_hold_at_most_one_live_entity(ops in arb_grid_ops(40)) {
        let grid = apply_grid_ops(&ops);

        let mut seen = Vec::new();
        for y in 0..GRID_SIDE {
            for x in 0..GRID_SIDE {
                if let Some(id) = grid.entity_id_at(Coordinate::new(x, y)).unwrap() {
                    prop_assert!(grid.entity(id).is_some());
                    prop_assert!(!seen.contains(&id));
                    seen.push(id);
                }
            }
        }
    }

    /// Grid-established links only ever join facing ports of adjacent cells.
    #[test]
    fn links_join_facing_neighbors(ops in arb_grid_ops(40)) {
        use resourceflow_core::entity::Direction;
        let grid = apply_grid_ops(&ops);

        for y in 0..GRID_SIDE {
            for x in 0..GRID_SIDE {
                let coord = Coordinate::new(x, y);
                let Some(entity) = grid.entity_at(coord).unwrap() else {
                    continue;
                };
                for direction in Direction::ALL {
                    let port = entity.ports().facing(direction);
                    let Some(far) = grid.ports().link(port) else {
                        continue;
                    };
                    // The far port must be the facing port of the adjacent
                    // occupied cell in that direction.
                    let neighbor_coord = coord.neighbor(direction);
                    let neighbor = neighbor_coord
                        .and_then(|c| grid.entity_at(c).ok().flatten());
                    prop_assert!(neighbor.is_some());
                    let expected = neighbor.unwrap().ports().facing(direction.opposite());
                    prop_assert_eq!(far, expected);
                }
            }
        }
    }

    /// Model check of the receive/collect contract on a single port: the
    /// one-slot buffer only changes according to mode and policy.
    #[test]
    fn receive_contract_matches_model(ops in arb_port_ops(60)) {
        let mut bank = PortBank::new();
        let port = bank.alloc();
        let mut model: Option<u32> = None;

        for op in ops {
            match op {
                PortOp::Receive(v) => {
                    let accepted = bank.receive(port, pkt(f64::from(v)));
                    let should_accept = bank.mode(port) == PortMode::Input
                        && (model.is_none() || bank.policy(port) == ReceivePolicy::Overwrite);
                    prop_assert_eq!(accepted, should_accept);
                    if should_accept {
                        model = Some(v);
                    }
                }
                PortOp::Collect => {
                    let collected = bank.collect(port);
                    prop_assert_eq!(collected, model.take().map(|v| pkt(f64::from(v))));
                }
                PortOp::SetPolicy(overwrite) => {
                    bank.set_policy(
                        port,
                        if overwrite {
                            ReceivePolicy::Overwrite
                        } else {
                            ReceivePolicy::Deny
                        },
                    );
                }
                PortOp::SetMode(m) => {
                    bank.set_mode(
                        port,
                        match m {
                            0 => PortMode::Input,
                            1 => PortMode::Output,
                            _ => PortMode::Closed,
                        },
                    );
                }
            }
            prop_assert_eq!(bank.buffer(port), model.map(|v| pkt(f64::from(v))));
        }
    }

    /// Packet combination sums cargo and never fails for non-negative input.
    #[test]
    fn combine_sums_cargo(a in 0.0f64..1000.0, b in 0.0f64..1000.0) {
        let pa = Packet::new(fixed(a)).unwrap();
        let pb = Packet::new(fixed(b)).unwrap();
        prop_assert_eq!(pa.combine(pb).cargo(), fixed(a) + fixed(b));
        // Inputs unchanged.
        prop_assert_eq!(pa.cargo(), fixed(a));
        prop_assert_eq!(pb.cargo(), fixed(b));
    }

    /// A solar panel with no outputs accrues exactly rate-per-tick and never
    /// exceeds its cap, for any number of ticks.
    #[test]
    fn panel_accrual_is_exact_and_capped(ticks in 0usize..500) {
        use resourceflow_core::entity::SolarPanel;
        let mut bank = PortBank::new();
        let mut panel = SolarPanel::new(&mut bank);

        for _ in 0..ticks {
            panel.update(&mut bank);
        }

        let expected = (SolarPanel::cargo_per_tick() * fixed(ticks as f64))
            .min(SolarPanel::max_cargo());
        prop_assert_eq!(panel.cargo(), expected);
        prop_assert!(panel.cargo() <= SolarPanel::max_cargo());
    }
}
