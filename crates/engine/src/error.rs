use crate::types::{Color, Move, PieceKind};
use std::io;
use std::path::PathBuf;

/// Errors surfaced by the engine's fallible operations.
///
/// `IllegalMove`, `OffBoard`, `LeavesKingInCheck` and `InvalidPromotion` are
/// recoverable: the board is untouched and the caller should ask for another
/// move. `MissingKing` means the board lost an invariant and the game can't
/// continue.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChessError {
    #[error("move {0} leaves the board")]
    OffBoard(Move),

    #[error("illegal move {0}")]
    IllegalMove(Move),

    #[error("move {0} leaves the king in check")]
    LeavesKingInCheck(Move),

    #[error("cannot promote to {0:?}")]
    InvalidPromotion(PieceKind),

    #[error("game is already over")]
    GameOver,

    #[error("no {0} king on the board")]
    MissingKing(Color),

    #[error("invalid FEN: {0}")]
    InvalidFen(String),
}

pub type ChessResult<T> = Result<T, ChessError>;

/// Failure writing a game log to disk.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("failed to create logs directory {dir}: {source}")]
    CreateDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write log file {file}: {source}")]
    Write {
        file: PathBuf,
        #[source]
        source: io::Error,
    },
}
