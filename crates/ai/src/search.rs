use engine::{Board, ChessError, ChessResult, Color, Game, MoveRecord};
use crate::{evaluation::*, types::*};
use crate::logger_extensions::SelectionLogging;
use std::time::Instant;

/// One-ply greedy move picker for the automated side.
///
/// Every candidate is applied, the resulting material balance is scored and
/// the first strictly best candidate wins. A candidate whose moved piece can
/// be captured on its new square gets `HANGING_SCORE` and is never chosen.
pub struct Selector {
    pub config: SelectorConfig,
    pub candidates_scored: u64,
    advanced_logging_enabled: bool,
    analysis: Vec<String>,
    log_callback: Option<Box<dyn FnMut(&str)>>,
}

impl Selector {
    pub fn new(config: SelectorConfig) -> Self {
        Self {
            config,
            candidates_scored: 0,
            advanced_logging_enabled: false,
            analysis: Vec::new(),
            log_callback: None,
        }
    }

    pub fn set_advanced_logging<F>(&mut self, enabled: bool, callback: Option<F>)
    where
        F: FnMut(&str) + 'static,
    {
        self.advanced_logging_enabled = enabled;
        self.log_callback = callback.map(|f| Box::new(f) as Box<dyn FnMut(&str)>);
    }

    /// Analysis lines gathered since the last call.
    pub fn take_analysis(&mut self) -> Vec<String> {
        std::mem::take(&mut self.analysis)
    }

    /// Pick the best move for `color`. The board is unchanged afterwards.
    pub fn select_best_move(&mut self, board: &mut Board, color: Color) -> ChessResult<SelectionResult> {
        let mut result = SelectionResult::none();

        if self.logging() {
            self.log(&format!("🚀 Selecting a move for {} | material {:+}",
                color, evaluate_board(board, color)));
        }

        // Row-major source then row-major destination
        for mv in board.pseudo_legal_moves(color) {
            let after = board.simulate(mv);

            if self.config.reject_self_check {
                let king = after.king_position(color)?;
                if after.is_position_threatened(king, color) {
                    result.rejected_self_check += 1;
                    drop(after);
                    if self.logging() {
                        self.log(&format!("  🚫 {} leaves the king attacked", mv));
                    }
                    continue;
                }
            }

            let hanging = after.is_position_threatened(mv.to, color);
            let score = if hanging { HANGING_SCORE } else { evaluate_board(&after, color) };
            drop(after);

            result.candidates += 1;
            self.candidates_scored += 1;
            if hanging {
                result.discarded += 1;
            }

            if self.logging() {
                if hanging {
                    self.log(&format!("  ⚠️ {} hangs the moved piece", mv));
                } else {
                    self.log(&format!("  🔄 {} → Score: {:+}", mv, score));
                }
            }

            // Strictly greater: a hanging candidate never becomes best
            if score > result.score {
                let old_best = result.score;
                result.best_move = Some(mv);
                result.score = score;
                if self.logging() && old_best != HANGING_SCORE {
                    self.log(&format!("    ⭐ NEW BEST! {} → {}", old_best, score));
                }
            }
        }

        if self.logging() {
            match result.best_move {
                Some(mv) => self.log(&format!("🏆 Selected {} (score {}, {} candidates, {} hanging)",
                    mv, score_text(result.score), result.candidates, result.discarded)),
                None => self.log("❌ No candidate moves"),
            }
        }

        Ok(result)
    }

    /// Let the selector move for the side to play in `game`. Returns `None`
    /// when it has no move, which ends the game.
    pub fn play_turn(&mut self, game: &mut Game) -> ChessResult<Option<(MoveRecord, SelectionResult)>> {
        if game.status.is_over() {
            return Err(ChessError::GameOver);
        }

        let color = game.current_turn;
        let was_enabled = self.advanced_logging_enabled;
        self.advanced_logging_enabled |= game.logger.should_log_advanced();

        let start_time = Instant::now();
        let selection = self.select_best_move(&mut game.board, color);
        self.advanced_logging_enabled = was_enabled;

        let result = selection?;
        let analysis = self.take_analysis();
        game.logger.log_selection_analysis(color, &analysis);

        let mv = match result.best_move {
            Some(mv) => mv,
            None => {
                game.logger.log_no_move(color);
                return Ok(None);
            }
        };

        let record = game.try_make_move(mv, Some(game.config.default_promotion))?;
        let elapsed = start_time.elapsed().as_millis() as u64;
        game.logger.log_ai_move(&record, elapsed, result.score);
        game.logger.log_status(game.status);
        game.logger.log_board(&game.board);

        Ok(Some((record, result)))
    }

    fn logging(&self) -> bool {
        self.advanced_logging_enabled || self.log_callback.is_some()
    }

    fn log(&mut self, message: &str) {
        if self.advanced_logging_enabled {
            self.analysis.push(message.to_string());
        }
        if let Some(ref mut callback) = self.log_callback {
            callback(message);
        }
    }
}

pub fn score_text(score: i32) -> String {
    if score == HANGING_SCORE {
        "hanging".to_string()
    } else {
        format!("{:+}", score)
    }
}

impl Default for Selector {
    fn default() -> Self {
        Self::new(SelectorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{GameConfig, GameStatus, Move, PieceKind, Pos, Square};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn mv(sr: i32, sc: i32, dr: i32, dc: i32) -> Move {
        Move::from_coords(sr, sc, dr, dc)
    }

    #[test]
    fn test_takes_free_material() {
        // Black queen (3,3) can take an undefended white rook on (3,7)
        let mut board = Board::from_fen("4k3/8/8/3q3R/8/8/8/K7").unwrap();
        let before = board.clone();
        let result = Selector::default().select_best_move(&mut board, Color::Black).unwrap();
        assert_eq!(result.best_move, Some(mv(3, 3, 3, 7)));
        assert_eq!(result.score, 9);
        assert_eq!(board, before);
    }

    #[test]
    fn test_avoids_hanging_the_moved_piece() {
        // Queen takes on (4,4) would be recaptured by the pawn on (5,3)
        let mut board = Board::from_fen("q3k3/8/8/8/4P3/3P4/8/7K").unwrap();
        let result = Selector::default().select_best_move(&mut board, Color::Black).unwrap();
        let best = result.best_move.unwrap();
        assert_ne!(best.to, Pos::new(4, 4));
        assert!(result.discarded > 0);
        assert_eq!(result.score, 7);
    }

    #[test]
    fn test_ties_keep_first_candidate() {
        // Only kings: every move scores 0, so the first enumerated one wins
        let mut board = Board::from_fen("8/8/8/3k4/8/8/8/K7").unwrap();
        let result = Selector::default().select_best_move(&mut board, Color::Black).unwrap();
        let first = board.pseudo_legal_moves(Color::Black)[0];
        assert_eq!(first, mv(3, 3, 2, 2));
        assert_eq!(result.best_move, Some(first));
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_rejects_self_check_when_strict() {
        // Black rook (1,4) shields its king from the white rook (7,4)
        let fen = "4k3/4r3/8/8/8/8/8/K3R3";

        let mut board = Board::from_fen(fen).unwrap();
        let strict = Selector::default().select_best_move(&mut board, Color::Black).unwrap();
        assert!(strict.rejected_self_check > 0);
        let best = strict.best_move.unwrap();
        // Capturing the white rook is the only way to win material safely
        assert_eq!(best, mv(1, 4, 7, 4));
        assert_eq!(strict.score, 5);

        // Lenient mode still sees the capture; it just never rejects anything
        let mut lenient = Selector::new(SelectorConfig { reject_self_check: false });
        let loose = lenient.select_best_move(&mut board, Color::Black).unwrap();
        assert_eq!(loose.rejected_self_check, 0);
        assert!(loose.candidates > strict.candidates);
    }

    #[test]
    fn test_lenient_mode_can_expose_the_king() {
        // Black bishop (1,4) is pinned by the rook on (7,4) but could take
        // the white queen on (3,2)
        let fen = "4k3/4b3/8/2Q5/8/8/8/K3R3";
        let mut board = Board::from_fen(fen).unwrap();

        let strict = Selector::default().select_best_move(&mut board, Color::Black).unwrap();
        assert!(strict.rejected_self_check > 0);
        assert_ne!(strict.best_move.unwrap().from, Pos::new(1, 4), "pinned bishop must not move");

        let mut lenient = Selector::new(SelectorConfig { reject_self_check: false });
        let loose = lenient.select_best_move(&mut board, Color::Black).unwrap();
        assert_eq!(loose.best_move, Some(mv(1, 4, 3, 2)));
        assert_eq!(loose.score, -2);
    }

    #[test]
    fn test_only_hanging_moves_yield_no_move() {
        // Lone black king (0,0): every step lands next to the white queen
        let mut board = Board::from_fen("k7/2Q5/2K5/8/8/8/8/8").unwrap();
        let result = Selector::new(SelectorConfig { reject_self_check: false })
            .select_best_move(&mut board, Color::Black)
            .unwrap();
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, HANGING_SCORE);
        assert_eq!(result.candidates, 3);
        assert_eq!(result.discarded, 3);

        // Strict mode sees the same position as stalemate: nothing to play
        let strict = Selector::default().select_best_move(&mut board, Color::Black).unwrap();
        assert_eq!(strict.best_move, None);
        assert_eq!(strict.rejected_self_check, 3);
    }

    #[test]
    fn test_play_turn_with_only_hanging_moves_ends_the_game() {
        let board = Board::from_fen("k7/2Q5/2K5/8/8/8/8/8").unwrap();
        let mut game = Game::from_board(board.clone(), Color::Black, GameConfig::default());
        let mut lenient = Selector::new(SelectorConfig { reject_self_check: false });
        assert_eq!(lenient.play_turn(&mut game), Ok(None));
        assert_eq!(game.board, board);
        assert!(game.history().is_empty());
        assert!(game.logger.log_buffer.contains("Black has no valid moves. Game over."));
    }

    #[test]
    fn test_no_candidates() {
        let mut board = Board::from_fen("k7/1Q6/2K5/8/8/8/8/8").unwrap();
        let result = Selector::default().select_best_move(&mut board, Color::Black).unwrap();
        assert_eq!(result.best_move, None);
        assert_eq!(result.candidates, 0);
    }

    #[test]
    fn test_missing_king_is_reported() {
        let mut board = Board::from_fen("8/8/8/3q4/8/8/8/K7").unwrap();
        let before = board.clone();
        let err = Selector::default().select_best_move(&mut board, Color::Black).unwrap_err();
        assert_eq!(err, ChessError::MissingKing(Color::Black));
        assert_eq!(board, before);
    }

    #[test]
    fn test_log_callback_receives_analysis() {
        let lines = Rc::new(RefCell::new(Vec::<String>::new()));
        let sink = Rc::clone(&lines);

        let mut selector = Selector::default();
        selector.set_advanced_logging(true, Some(move |line: &str| sink.borrow_mut().push(line.to_string())));
        let mut board = Board::new();
        selector.select_best_move(&mut board, Color::Black).unwrap();

        let lines = lines.borrow();
        assert!(lines[0].starts_with("🚀 Selecting a move for Black"));
        assert!(lines.last().unwrap().starts_with("🏆 Selected"));
        assert_eq!(selector.take_analysis().len(), lines.len());
        assert!(selector.take_analysis().is_empty());
    }

    #[test]
    fn test_play_turn_applies_and_logs() {
        let mut game = Game::new(GameConfig::default());
        game.try_make_move(mv(6, 4, 4, 4), None).unwrap();

        let mut selector = Selector::default();
        let (record, result) = selector.play_turn(&mut game).unwrap().unwrap();
        assert_eq!(record.mover, Color::Black);
        assert_eq!(Some(record.mv), result.best_move);
        assert_eq!(game.current_turn, Color::White);
        assert!(game.logger.log_buffer.contains("(AI move"));
    }

    #[test]
    fn test_play_turn_advanced_log_has_analysis_and_board() {
        let config = GameConfig { advanced_logging: true, ..GameConfig::default() };
        let mut game = Game::new(config);
        game.try_make_move(mv(6, 4, 4, 4), None).unwrap();

        Selector::default().play_turn(&mut game).unwrap().unwrap();
        assert!(game.logger.log_buffer.contains("🔬 Black SELECTOR ANALYSIS:"));
        assert!(game.logger.log_buffer.contains("   0 1 2 3 4 5 6 7\n"));
        assert!(game.logger.log_buffer.contains("7 |♖ ♘ ♗ ♕ ♔ ♗ ♘ ♖\n"));
    }

    #[test]
    fn test_play_turn_promotes_to_queen() {
        // Pawn (6,0) takes the rook on (7,1) and promotes
        let board = Board::from_fen("7k/8/8/8/8/8/p7/1R5K").unwrap();
        let mut game = Game::from_board(board, Color::Black, GameConfig::default());
        let (record, _) = Selector::default().play_turn(&mut game).unwrap().unwrap();
        assert_eq!(record.mv, mv(6, 0, 7, 1));
        assert_eq!(record.promotion, Some(PieceKind::Queen));
        assert_eq!(game.board.get(Pos::new(7, 1)), Square::piece(Color::Black, PieceKind::Queen));
        assert!(record.gives_check);
        assert_eq!(game.status, GameStatus::Check(Color::White));
    }

    #[test]
    fn test_play_turn_after_game_over() {
        let board = Board::from_fen("k7/1Q6/2K5/8/8/8/8/8").unwrap();
        let mut game = Game::from_board(board, Color::Black, GameConfig::default());
        assert_eq!(game.refresh_status(), Ok(GameStatus::Checkmate { loser: Color::Black }));
        assert_eq!(Selector::default().play_turn(&mut game), Err(ChessError::GameOver));
    }
}
