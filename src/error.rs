//! Errors raised while building a level. The running simulation itself has
//! no failure modes: out-of-grid queries resolve through the boundary policy.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level plan has no rows")]
    EmptyPlan,

    #[error("row {row} is {found} tiles wide, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown symbol {symbol:?} at row {row}, column {col}")]
    UnknownSymbol { symbol: char, row: usize, col: usize },

    #[error("level has no player")]
    MissingPlayer,

    #[error("level has {count} players, expected exactly one")]
    MultiplePlayers { count: usize },

    #[error("could not read level file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
