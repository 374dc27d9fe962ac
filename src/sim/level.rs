/// Level: the complete state of one running level.
///
/// ## Ownership
///
///   - `terrain`: static tile grid. **Never mutated** after construction.
///   - `actors`: player, hazards and coins, in plan (insertion) order.
///
/// Actors never see the level. `advance` lends each one the terrain for its
/// collision queries and resolves whatever it ran into afterwards, so the
/// only place the actor list shrinks is `apply_event`.
///
/// ## Status
///
/// `InProgress → Won | Lost`, exactly once. Once terminal, lava and coin
/// events are ignored: no scoring, no removal, no status change.

use std::fmt;

use super::event::{GameEvent, LevelEvent};
use super::plan::LevelPlan;
use crate::config::PhysicsConfig;
use crate::domain::actor::{Actor, ActorId, ActorKind, Collectible, Hazard, Patrol, Player, Role};
use crate::domain::input::InputState;
use crate::domain::physics::Terrain;
use crate::domain::tile::Tile;
use crate::domain::vector::Vector;
use crate::error::LevelError;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Status {
    InProgress,
    Won,
    Lost,
}

#[derive(Clone, Debug)]
pub struct Level {
    name: String,
    terrain: Terrain,
    actors: Vec<Actor>,
    player_id: ActorId,
    coin_total: usize,
    coin_collected: usize,
    status: Status,
    physics: PhysicsConfig,
    /// Outbox for the presentation layer, drained by the step driver.
    events: Vec<GameEvent>,
}

// ── Construction ──

impl Level {
    /// Build a level from a terrain grid and actors (ids follow the order
    /// given). Exactly one actor must be a player.
    pub fn new(
        tiles: Vec<Vec<Tile>>,
        actors: Vec<ActorKind>,
        physics: PhysicsConfig,
    ) -> Result<Self, LevelError> {
        let terrain = Terrain::new(tiles)?;

        let actors: Vec<Actor> = actors
            .into_iter()
            .enumerate()
            .map(|(i, kind)| Actor::new(ActorId(i as u32), kind))
            .collect();

        let mut players = actors.iter().filter(|a| a.role() == Role::Player);
        let player_id = match (players.next(), players.count()) {
            (None, _) => return Err(LevelError::MissingPlayer),
            (Some(p), 0) => p.id,
            (Some(_), rest) => return Err(LevelError::MultiplePlayers { count: rest + 1 }),
        };

        let coin_total = actors.iter().filter(|a| a.role() == Role::Collectible).count();

        Ok(Level {
            name: String::from("Untitled"),
            terrain,
            actors,
            player_id,
            coin_total,
            coin_collected: 0,
            status: Status::InProgress,
            physics,
            events: Vec::new(),
        })
    }

    /// Build a level from a text plan.
    ///
    /// Terrain symbols: `x` wall, `!` lava, ` ` space.
    /// Actor symbols (over space): `@` player, `$` coin, `-` / `|` moving lava.
    pub fn from_plan(plan: &LevelPlan, physics: &PhysicsConfig) -> Result<Self, LevelError> {
        let mut tiles = Vec::with_capacity(plan.rows.len());
        let mut actors = Vec::new();

        for (y, row) in plan.rows.iter().enumerate() {
            let mut line = Vec::with_capacity(row.len());
            for (x, ch) in row.chars().enumerate() {
                let cell = Vector::new(x as f64, y as f64);
                let spawn = match ch {
                    '@' => Some(ActorKind::Player(Player::spawn(cell))),
                    '$' => Some(ActorKind::Collectible(Collectible::new(cell))),
                    '-' => Some(ActorKind::Hazard(Hazard::new(cell, Patrol::Horizontal, physics.hazard_speed))),
                    '|' => Some(ActorKind::Hazard(Hazard::new(cell, Patrol::Vertical, physics.hazard_speed))),
                    _ => None,
                };
                let tile = match spawn {
                    Some(kind) => {
                        actors.push(kind);
                        Tile::Space
                    }
                    None => Tile::from_symbol(ch)
                        .ok_or(LevelError::UnknownSymbol { symbol: ch, row: y, col: x })?,
                };
                line.push(tile);
            }
            tiles.push(line);
        }

        let mut level = Level::new(tiles, actors, physics.clone())?;
        level.name = plan.name.clone();
        log::info!(
            "level {:?}: {}x{}, {} actors, {} coins",
            level.name,
            level.width(),
            level.height(),
            level.actors.len(),
            level.coin_total
        );
        Ok(level)
    }
}

// ── Read-only snapshot for the view ──

impl Level {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> usize {
        self.terrain.width()
    }

    pub fn height(&self) -> usize {
        self.terrain.height()
    }

    pub fn tiles(&self) -> &[Vec<Tile>] {
        self.terrain.rows()
    }

    pub fn tile_at(&self, x: usize, y: usize) -> Option<Tile> {
        self.terrain.tile_at(x, y)
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    pub fn player(&self) -> Option<&Actor> {
        self.actor(self.player_id)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// `(collected, total)`.
    pub fn coins(&self) -> (usize, usize) {
        (self.coin_collected, self.coin_total)
    }

    pub fn physics(&self) -> &PhysicsConfig {
        &self.physics
    }

    pub fn is_finished(&self) -> bool {
        self.status != Status::InProgress
    }
}

// ── Queries ──

impl Level {
    /// Terrain the box would run into; see `Terrain::collide_with`.
    #[inline]
    pub fn collide_with(&self, position: Vector, size: Vector) -> Option<Tile> {
        self.terrain.collide_with(position, size)
    }

    /// First actor other than `player` (in insertion order) whose box
    /// overlaps the player's. Only one touch is reported per frame.
    pub fn interaction_with(&self, player: &Actor) -> Option<&Actor> {
        self.actors
            .iter()
            .find(|other| other.id != player.id && player.overlaps(other))
    }
}

// ── Events & stepping ──

impl Level {
    pub fn apply_event(&mut self, event: LevelEvent) {
        match event {
            LevelEvent::Wall => {}
            LevelEvent::Lava => {
                if self.status == Status::InProgress {
                    self.status = Status::Lost;
                    log::info!("level {:?} lost", self.name);
                    self.events.push(GameEvent::PlayerBurned);
                    self.events.push(GameEvent::LevelLost);
                }
            }
            LevelEvent::Collectible(id) => self.collect(id),
        }
    }

    fn collect(&mut self, id: ActorId) {
        if self.status != Status::InProgress {
            return;
        }
        let Some(idx) = self
            .actors
            .iter()
            .position(|a| a.id == id && a.role() == Role::Collectible)
        else {
            log::debug!("ignoring collect of {id:?}: no such coin");
            return;
        };

        // `remove` keeps the remaining actors in order.
        self.actors.remove(idx);
        self.coin_collected += 1;
        log::debug!("coin {id:?} collected ({}/{})", self.coin_collected, self.coin_total);
        self.events.push(GameEvent::CoinCollected {
            id,
            collected: self.coin_collected,
            total: self.coin_total,
        });

        if self.coin_collected == self.coin_total {
            self.status = Status::Won;
            log::info!("level {:?} won", self.name);
            self.events.push(GameEvent::LevelWon);
        }
    }

    /// Run every actor's per-frame rule, in actor order.
    ///
    /// Walks a snapshot of ids: an actor removed earlier in the frame is
    /// skipped and nobody is visited twice.
    pub fn advance(&mut self, dt: f64, input: &InputState) {
        let ids: Vec<ActorId> = self.actors.iter().map(|a| a.id).collect();
        let mut contacts = Vec::new();

        for id in ids {
            let Some(idx) = self.actors.iter().position(|a| a.id == id) else {
                continue;
            };

            self.actors[idx].update(dt, &self.terrain, input, &self.physics, &mut contacts);
            for tile in contacts.drain(..) {
                if let Some(event) = terrain_event(tile) {
                    self.apply_event(event);
                }
            }

            if self.actors[idx].role() != Role::Player {
                continue;
            }
            let touched = self
                .interaction_with(&self.actors[idx])
                .map(|other| (other.id, other.role()));
            match touched {
                Some((_, Role::Hazard)) => self.apply_event(LevelEvent::Lava),
                Some((other, Role::Collectible)) => self.apply_event(LevelEvent::Collectible(other)),
                Some((_, Role::Player)) | None => {}
            }
        }
    }

    /// Take the events produced since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

fn terrain_event(tile: Tile) -> Option<LevelEvent> {
    match tile {
        Tile::Wall => Some(LevelEvent::Wall),
        Tile::Lava => Some(LevelEvent::Lava),
        Tile::Space => None,
    }
}

/// Terrain only: `#` wall, `!` lava, blank space. One line per row.
impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.terrain.rows() {
            for tile in row {
                write!(f, "{}", tile.glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
