pub mod board;
pub mod types;
pub mod error;
pub mod game;
pub mod perft;
pub mod logger;

pub use board::*;
pub use types::*;
pub use error::{ChessError, ChessResult, LogError};
pub use game::{Game, GameConfig};
pub use perft::*;
pub use logger::GameLogger;
