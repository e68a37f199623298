use crate::error::{ChessError, ChessResult};
use crate::logger::GameLogger;
use crate::types::*;
use crate::Board;

/// Session settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Side played by the selector, if any.
    pub automated: Option<Color>,
    /// Reject moves that leave the mover's own king attacked.
    pub enforce_king_safety: bool,
    /// Record per-candidate selector analysis in the log.
    pub advanced_logging: bool,
    /// Piece the automated side promotes to, and the default when a human
    /// gives no choice.
    pub default_promotion: PieceKind,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            automated: Some(Color::Black),
            enforce_king_safety: true,
            advanced_logging: false,
            default_promotion: PieceKind::Queen,
        }
    }
}

/// Owns the board for one game and sequences turns.
#[derive(Debug)]
pub struct Game {
    pub board: Board,
    pub current_turn: Color,
    pub status: GameStatus,
    pub config: GameConfig,
    pub logger: GameLogger,
    history: Vec<MoveRecord>,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Self::from_board(Board::new(), Color::White, config)
    }

    /// Start from an arbitrary position. Status is computed lazily by
    /// `refresh_status`.
    pub fn from_board(board: Board, to_move: Color, config: GameConfig) -> Self {
        let mut logger = GameLogger::new();
        if config.advanced_logging {
            logger.enable_advanced_logging();
        }
        Self {
            board,
            current_turn: to_move,
            status: GameStatus::InProgress,
            config,
            logger,
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// Whether the side to move is played by the selector.
    pub fn is_automated_turn(&self) -> bool {
        self.config.automated == Some(self.current_turn)
    }

    pub fn refresh_status(&mut self) -> ChessResult<GameStatus> {
        self.status = self.board.status(self.current_turn)?;
        Ok(self.status)
    }

    /// Validate `mv` for the side to move and apply it. Nothing changes when
    /// an error is returned.
    pub fn try_make_move(&mut self, mv: Move, promotion: Option<PieceKind>) -> ChessResult<MoveRecord> {
        if self.status.is_over() {
            return Err(ChessError::GameOver);
        }
        if !mv.is_on_board() {
            return Err(ChessError::OffBoard(mv));
        }

        let color = self.current_turn;
        if !self.board.is_valid_move(mv, color) {
            return Err(ChessError::IllegalMove(mv));
        }
        if self.config.enforce_king_safety && !self.board.leaves_king_safe(mv, color)? {
            return Err(ChessError::LeavesKingInCheck(mv));
        }

        let promotion = promotion.unwrap_or(self.config.default_promotion);
        if !promotion.is_promotion_target() {
            return Err(ChessError::InvalidPromotion(promotion));
        }

        // Classify the resulting position before committing, so a failure
        // (a captured king) leaves the game as it was
        let opponent = color.opponent();
        let status = self.board.simulate_promoting(mv, promotion).status(opponent)?;
        let gives_check = matches!(status, GameStatus::Check(_) | GameStatus::Checkmate { .. });

        let (captured, promoted) = self.board.apply_with_promotion(mv, promotion);
        let record = MoveRecord {
            mv,
            mover: color,
            captured,
            promotion: promoted,
            gives_check,
        };
        self.history.push(record);
        self.current_turn = opponent;
        self.status = status;

        Ok(record)
    }

    /// Apply a human move and log the outcome, including rejections.
    pub fn play_human_move(&mut self, mv: Move, promotion: Option<PieceKind>, time_ms: u64) -> ChessResult<MoveRecord> {
        match self.try_make_move(mv, promotion) {
            Ok(record) => {
                self.logger.log_human_move(&record, time_ms);
                self.logger.log_status(self.status);
                Ok(record)
            }
            Err(e) => {
                self.logger.log_rejected_move(mv, &e);
                Err(e)
            }
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(sr: i32, sc: i32, dr: i32, dc: i32) -> Move {
        Move::from_coords(sr, sc, dr, dc)
    }

    #[test]
    fn test_opening_moves_alternate_turns() {
        let mut game = Game::default();
        assert!(!game.is_automated_turn());

        let record = game.try_make_move(mv(6, 4, 4, 4), None).unwrap();
        assert_eq!(record.mover, Color::White);
        assert!(record.captured.is_empty());
        assert_eq!(record.promotion, None);
        assert!(!record.gives_check);
        assert_eq!(game.current_turn, Color::Black);
        assert!(game.is_automated_turn());
        assert_eq!(game.history().len(), 1);
    }

    #[test]
    fn test_rejections_leave_board_untouched() {
        let mut game = Game::default();
        let before = game.board.clone();

        assert_eq!(game.try_make_move(mv(6, 4, 3, 4), None), Err(ChessError::IllegalMove(mv(6, 4, 3, 4))));
        assert_eq!(game.try_make_move(mv(6, 4, 8, 4), None), Err(ChessError::OffBoard(mv(6, 4, 8, 4))));
        assert_eq!(game.try_make_move(mv(1, 4, 3, 4), None), Err(ChessError::IllegalMove(mv(1, 4, 3, 4))));
        assert_eq!(
            game.try_make_move(mv(6, 4, 4, 4), Some(PieceKind::King)),
            Err(ChessError::InvalidPromotion(PieceKind::King))
        );

        assert_eq!(game.board, before);
        assert_eq!(game.current_turn, Color::White);
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_king_safety_enforcement() {
        // White rook (6,4) pinned against the king by the black rook (0,4)
        let board = Board::from_fen("4r2k/8/8/8/8/8/4R3/4K3").unwrap();
        let mut strict = Game::from_board(board.clone(), Color::White, GameConfig::default());
        assert_eq!(
            strict.try_make_move(mv(6, 4, 6, 0), None),
            Err(ChessError::LeavesKingInCheck(mv(6, 4, 6, 0)))
        );

        let lenient = GameConfig { enforce_king_safety: false, ..GameConfig::default() };
        let mut loose = Game::from_board(board, Color::White, lenient);
        assert!(loose.try_make_move(mv(6, 4, 6, 0), None).is_ok());
    }

    #[test]
    fn test_promotion_choice_and_default() {
        let board = Board::from_fen("4k3/P7/8/8/8/8/8/4K3").unwrap();

        let mut chosen = Game::from_board(board.clone(), Color::White, GameConfig::default());
        let record = chosen.try_make_move(mv(1, 0, 0, 0), Some(PieceKind::Rook)).unwrap();
        assert_eq!(record.promotion, Some(PieceKind::Rook));
        assert_eq!(chosen.board.get(Pos::new(0, 0)), Square::piece(Color::White, PieceKind::Rook));
        assert!(record.gives_check, "rook on the back rank checks the king on (0,4)");
        assert_eq!(chosen.status, GameStatus::Check(Color::Black));

        let mut defaulted = Game::from_board(board, Color::White, GameConfig::default());
        let record = defaulted.try_make_move(mv(1, 0, 0, 0), None).unwrap();
        assert_eq!(record.promotion, Some(PieceKind::Queen));
    }

    #[test]
    fn test_checkmate_ends_the_game() {
        // Queen (2,1) to (1,1) mates the black king on (0,0) with king support
        let board = Board::from_fen("k7/8/1QK5/8/8/8/8/8").unwrap();
        let mut game = Game::from_board(board, Color::White, GameConfig::default());
        let record = game.play_human_move(mv(2, 1, 1, 1), None, 0).unwrap();
        assert!(record.gives_check);
        assert_eq!(game.status, GameStatus::Checkmate { loser: Color::Black });
        assert!(game.logger.log_buffer.contains("Checkmate! White wins!"));
        assert_eq!(game.try_make_move(mv(0, 0, 0, 1), None), Err(ChessError::GameOver));
    }

    #[test]
    fn test_king_capture_error_leaves_game_unchanged() {
        // Black rook (0,0) can run down the file onto the white king
        let board = Board::from_fen("r3k3/8/8/8/8/8/8/K7").unwrap();
        let lenient = GameConfig { enforce_king_safety: false, ..GameConfig::default() };
        let mut game = Game::from_board(board.clone(), Color::Black, lenient);

        assert_eq!(
            game.try_make_move(mv(0, 0, 7, 0), None),
            Err(ChessError::MissingKing(Color::White))
        );
        assert_eq!(game.board, board);
        assert_eq!(game.current_turn, Color::Black);
        assert_eq!(game.status, GameStatus::InProgress);
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_rejected_human_move_is_logged() {
        let mut game = Game::default();
        assert!(game.play_human_move(mv(6, 4, 3, 4), None, 5).is_err());
        assert!(game.logger.log_buffer.contains("🚫 Rejected (6,4)->(3,4)"));
    }
}
