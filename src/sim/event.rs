/// Events flowing through a simulation step.
///
/// `LevelEvent` is what actors report to the level (terrain contacts and
/// actor touches); the level resolves it against its scoring rules.
/// `GameEvent` is what the level reports outward, for the presentation layer.

use crate::domain::actor::ActorId;

/// Something the player ran into.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LevelEvent {
    Wall,
    Lava,
    Collectible(ActorId),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    CoinCollected { id: ActorId, collected: usize, total: usize },
    PlayerBurned,
    LevelWon,
    LevelLost,
    LevelRestarted { attempt: u32 },
}
