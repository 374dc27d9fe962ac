/// Actors: Player, Hazard (moving lava), Collectible (coin).
///
/// One tagged variant per role, dispatched through `Actor::update`. Actors
/// hold no reference to the level: the terrain they collide with is passed
/// in, and terrain contacts are reported back through `contacts` for the
/// level to resolve.

use super::input::InputState;
use super::physics::{Bounds, Terrain};
use super::tile::Tile;
use super::vector::Vector;
use crate::config::PhysicsConfig;

/// Player box, in tiles. Narrower than a cell, taller than a cell.
pub const PLAYER_SIZE: Vector = Vector::new(0.7, 1.2);
/// Hazards and coins fill their cell.
pub const CELL_SIZE: Vector = Vector::new(1.0, 1.0);

/// Stable identity of an actor within one level (insertion order).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ActorId(pub u32);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Role {
    Player,
    Hazard,
    Collectible,
}

/// Patrol axis of a moving hazard, picked by its plan symbol.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Patrol {
    Horizontal, // '-'
    Vertical,   // '|'
}

// ══════════════════════════════════════════════════════════════
// Player
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct Player {
    pub position: Vector,
    pub size: Vector,
    pub speed: Vector,
}

impl Player {
    /// Spawn in the cell whose top-left corner is `cell`. The box is taller
    /// than a tile, so it is lifted until its feet sit on the cell's floor.
    pub fn spawn(cell: Vector) -> Self {
        let lift = Vector::new(0.0, -(PLAYER_SIZE.y - 1.0));
        Player {
            position: cell + lift,
            size: PLAYER_SIZE,
            speed: Vector::ZERO,
        }
    }

    /// Per-frame rule: walk (only while a direction is held), then gravity
    /// and jumping.
    pub fn update(
        &mut self,
        dt: f64,
        terrain: &Terrain,
        input: &InputState,
        physics: &PhysicsConfig,
        contacts: &mut Vec<Tile>,
    ) {
        if input.left || input.right {
            self.walk(dt, terrain, input, physics, contacts);
        }
        self.fall(dt, terrain, input, physics, contacts);
    }

    fn walk(
        &mut self,
        dt: f64,
        terrain: &Terrain,
        input: &InputState,
        physics: &PhysicsConfig,
        contacts: &mut Vec<Tile>,
    ) {
        // Left wins when both directions are held.
        self.speed.x = if input.left { -physics.walk_speed } else { physics.walk_speed };

        let target = self.position + Vector::new(self.speed.x * dt, 0.0);
        match terrain.collide_with(target, self.size) {
            Some(tile) => contacts.push(tile),
            None => self.position = target,
        }
    }

    fn fall(
        &mut self,
        dt: f64,
        terrain: &Terrain,
        input: &InputState,
        physics: &PhysicsConfig,
        contacts: &mut Vec<Tile>,
    ) {
        self.speed.y += physics.gravity * dt;

        let target = self.position + Vector::new(0.0, self.speed.y * dt);
        match terrain.collide_with(target, self.size) {
            Some(tile) => {
                contacts.push(tile);
                // Moving down into something = landed; jump if asked to.
                if input.up && self.speed.y > 0.0 {
                    self.speed.y = -physics.jump_speed;
                }
            }
            None => self.position = target,
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Hazard
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct Hazard {
    pub position: Vector,
    pub size: Vector,
    pub speed: Vector,
}

impl Hazard {
    pub fn new(cell: Vector, patrol: Patrol, hazard_speed: f64) -> Self {
        let speed = match patrol {
            Patrol::Horizontal => Vector::new(hazard_speed, 0.0),
            Patrol::Vertical => Vector::new(0.0, hazard_speed),
        };
        Hazard { position: cell, size: CELL_SIZE, speed }
    }

    /// Move along the patrol axis; on contact, reverse and stay put this
    /// frame. Returns true on a bounce.
    pub fn update(&mut self, dt: f64, terrain: &Terrain) -> bool {
        let target = self.position + self.speed * dt;
        if terrain.collide_with(target, self.size).is_none() {
            self.position = target;
            false
        } else {
            self.speed = self.speed * -1.0;
            true
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Collectible
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct Collectible {
    pub position: Vector,
    pub size: Vector,
}

impl Collectible {
    pub fn new(cell: Vector) -> Self {
        Collectible { position: cell, size: CELL_SIZE }
    }
}

// ══════════════════════════════════════════════════════════════
// Actor: tagged variant + shared accessors
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub enum ActorKind {
    Player(Player),
    Hazard(Hazard),
    Collectible(Collectible),
}

#[derive(Clone, Debug)]
pub struct Actor {
    pub id: ActorId,
    pub kind: ActorKind,
}

impl Actor {
    pub fn new(id: ActorId, kind: ActorKind) -> Self {
        Actor { id, kind }
    }

    pub fn role(&self) -> Role {
        match self.kind {
            ActorKind::Player(_) => Role::Player,
            ActorKind::Hazard(_) => Role::Hazard,
            ActorKind::Collectible(_) => Role::Collectible,
        }
    }

    pub fn position(&self) -> Vector {
        match &self.kind {
            ActorKind::Player(p) => p.position,
            ActorKind::Hazard(h) => h.position,
            ActorKind::Collectible(c) => c.position,
        }
    }

    pub fn size(&self) -> Vector {
        match &self.kind {
            ActorKind::Player(p) => p.size,
            ActorKind::Hazard(h) => h.size,
            ActorKind::Collectible(c) => c.size,
        }
    }

    pub fn velocity(&self) -> Vector {
        match &self.kind {
            ActorKind::Player(p) => p.speed,
            ActorKind::Hazard(h) => h.speed,
            ActorKind::Collectible(_) => Vector::ZERO,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.position(), self.size())
    }

    pub fn overlaps(&self, other: &Actor) -> bool {
        self.bounds().overlaps(&other.bounds())
    }

    /// Advance this actor by one frame. Terrain the actor ran into is
    /// appended to `contacts`.
    pub fn update(
        &mut self,
        dt: f64,
        terrain: &Terrain,
        input: &InputState,
        physics: &PhysicsConfig,
        contacts: &mut Vec<Tile>,
    ) {
        match &mut self.kind {
            ActorKind::Player(p) => p.update(dt, terrain, input, physics, contacts),
            ActorKind::Hazard(h) => {
                if h.update(dt, terrain) {
                    log::debug!("hazard {:?} bounced, now moving {:?}", self.id, h.speed);
                }
            }
            ActorKind::Collectible(_) => {}
        }
    }
}
