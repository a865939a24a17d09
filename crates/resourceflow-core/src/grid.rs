//! The bounded placement surface and tick driver.
//!
//! The grid owns every placed [`Entity`] (in a slotmap arena) and the
//! [`PortBank`] holding all of their ports. Placement links facing port
//! pairs with already-placed neighbors exactly once, at placement time;
//! links are never re-evaluated by later placements or removals elsewhere.

use crate::entity::{Direction, Entity};
use crate::fixed::Ticks;
use crate::id::EntityId;
use crate::port::PortBank;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during grid operations. All of these indicate a
/// caller bug rather than a normal simulation outcome.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("coordinate out of bounds: {0:?}")]
    OutOfBounds(Coordinate),
    #[error("cell already occupied: {0:?}")]
    CellOccupied(Coordinate),
    #[error("no entity found")]
    NotFound,
}

// ---------------------------------------------------------------------------
// Coordinate
// ---------------------------------------------------------------------------

/// A cell position on the grid. `(0, 0)` is the top-left corner; `y` grows
/// downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: usize,
    pub y: usize,
}

impl Coordinate {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// The adjacent coordinate in the given direction, or `None` when it
    /// would leave the non-negative quadrant.
    pub fn neighbor(&self, direction: Direction) -> Option<Coordinate> {
        match direction {
            Direction::Up => self.y.checked_sub(1).map(|y| Coordinate::new(self.x, y)),
            Direction::Right => Some(Coordinate::new(self.x + 1, self.y)),
            Direction::Down => Some(Coordinate::new(self.x, self.y + 1)),
            Direction::Left => self.x.checked_sub(1).map(|x| Coordinate::new(x, self.y)),
        }
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// Bounded 2D placement surface. Each cell holds at most one entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    /// Row-major cell array: index `y * width + x`.
    cells: Vec<Option<EntityId>>,
    entities: SlotMap<EntityId, Entity>,
    ports: PortBank,
    tick: Ticks,
}

impl Grid {
    /// Create an empty grid of the given dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
            entities: SlotMap::with_key(),
            ports: PortBank::new(),
            tick: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of completed ticks.
    pub fn tick(&self) -> Ticks {
        self.tick
    }

    /// The port bank holding every port of every placed entity. Entities
    /// must be constructed against this bank before being placed.
    pub fn ports(&self) -> &PortBank {
        &self.ports
    }

    /// Mutable access to the port bank, for constructing entities and for
    /// external mode/policy configuration.
    pub fn ports_mut(&mut self) -> &mut PortBank {
        &mut self.ports
    }

    /// The entity with the given id, if present.
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Mutable access to the entity with the given id.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// The id occupying the given cell, if any.
    ///
    /// Fails with [`GridError::OutOfBounds`] for coordinates off the grid.
    pub fn entity_id_at(&self, coordinate: Coordinate) -> Result<Option<EntityId>, GridError> {
        Ok(self.cells[self.cell_index(coordinate)?])
    }

    /// The entity occupying the given cell, if any.
    pub fn entity_at(&self, coordinate: Coordinate) -> Result<Option<&Entity>, GridError> {
        Ok(self.entity_id_at(coordinate)?.and_then(|id| self.entities.get(id)))
    }

    fn cell_index(&self, coordinate: Coordinate) -> Result<usize, GridError> {
        if coordinate.x >= self.width || coordinate.y >= self.height {
            return Err(GridError::OutOfBounds(coordinate));
        }
        Ok(coordinate.y * self.width + coordinate.x)
    }

    // -----------------------------------------------------------------------
    // Placement / removal
    // -----------------------------------------------------------------------

    /// Place an entity at the given coordinate.
    ///
    /// Fails with [`GridError::CellOccupied`] if the cell already holds an
    /// entity, leaving the grid unchanged. Otherwise, for each in-bounds
    /// occupied neighbor, the facing port pair is linked (the new entity's
    /// top port to the upper neighbor's bottom port, and so on). A facing
    /// pair is linked only when both sides are currently unlinked, so
    /// pre-existing manual links are left intact. Links are established
    /// exactly once, here; they are not revisited by later placements.
    pub fn place_object(
        &mut self,
        entity: Entity,
        coordinate: Coordinate,
    ) -> Result<EntityId, GridError> {
        let index = self.cell_index(coordinate)?;
        if self.cells[index].is_some() {
            return Err(GridError::CellOccupied(coordinate));
        }

        let ports = *entity.ports();
        for direction in Direction::ALL {
            let Some(neighbor_coord) = coordinate.neighbor(direction) else {
                continue;
            };
            let Ok(Some(neighbor_id)) = self.entity_id_at(neighbor_coord) else {
                continue;
            };
            let near = ports.facing(direction);
            let far = self.entities[neighbor_id].ports().facing(direction.opposite());
            if self.ports.link(near).is_none() && self.ports.link(far).is_none() {
                // Both sides verified unlinked above.
                let _ = self.ports.connect(near, far);
            }
        }

        let id = self.entities.insert(entity);
        self.cells[index] = Some(id);
        Ok(id)
    }

    /// Remove the entity at the given coordinate and return it.
    ///
    /// Fails with [`GridError::NotFound`] if the cell is empty. All four of
    /// the entity's ports are disconnected (symmetrically clearing the
    /// neighbor side) before the cell is cleared. The returned entity keeps
    /// its port slots in the bank, so it can be placed again.
    pub fn remove_object(&mut self, coordinate: Coordinate) -> Result<Entity, GridError> {
        let index = self.cell_index(coordinate)?;
        let id = self.cells[index].ok_or(GridError::NotFound)?;
        self.detach(id);
        self.cells[index] = None;
        self.entities.remove(id).ok_or(GridError::NotFound)
    }

    /// Remove the given entity from wherever it is placed and return it.
    ///
    /// Fails with [`GridError::NotFound`] if the entity is not in the grid.
    pub fn remove_entity(&mut self, id: EntityId) -> Result<Entity, GridError> {
        let index = self
            .cells
            .iter()
            .position(|cell| *cell == Some(id))
            .ok_or(GridError::NotFound)?;
        self.detach(id);
        self.cells[index] = None;
        self.entities.remove(id).ok_or(GridError::NotFound)
    }

    /// Disconnect all four ports of the entity.
    fn detach(&mut self, id: EntityId) {
        let ports = *self.entities[id].ports();
        for port in ports.in_order() {
            self.ports.disconnect(port);
        }
    }

    // -----------------------------------------------------------------------
    // Tick driver
    // -----------------------------------------------------------------------

    /// Advance the simulation by one tick.
    ///
    /// Every occupied cell's entity updates exactly once, in row-major
    /// order: `y` ascending (top row first), `x` ascending within each row.
    /// Port transfer is synchronous, so this order decides whether a packet
    /// sent this tick is visible to the receiving entity's own input
    /// processing in the same tick (receiver updates later in the pass) or
    /// only on the next tick (receiver already updated).
    pub fn update(&mut self) {
        for index in 0..self.cells.len() {
            if let Some(id) = self.cells[index] {
                if let Some(entity) = self.entities.get_mut(id) {
                    entity.update(&mut self.ports);
                }
            }
        }
        self.tick += 1;
    }
}

// ===========================================================================
// Tests
// ===========================================================================
