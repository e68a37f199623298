use crate::error::ChessResult;
use crate::types::*;
use super::Board;

impl Board {
    /// Every move passing `is_valid_move` for `color`, row-major source then
    /// row-major destination. May leave the mover's king attacked.
    pub fn pseudo_legal_moves(&self, color: Color) -> Vec<Move> {
        let mut moves = Vec::new();
        for (from, _) in self.pieces(color) {
            for to in Pos::all() {
                let mv = Move::new(from, to);
                if self.is_valid_move(mv, color) {
                    moves.push(mv);
                }
            }
        }
        moves
    }

    /// Pseudo-legal moves that keep `color`'s king out of attack.
    pub fn legal_moves(&mut self, color: Color) -> ChessResult<Vec<Move>> {
        let mut legal = Vec::new();
        for mv in self.pseudo_legal_moves(color) {
            if self.leaves_king_safe(mv, color)? {
                legal.push(mv);
            }
        }
        Ok(legal)
    }

    /// Legal destinations for the piece on `from`. Empty if the square is
    /// empty or off the board.
    pub fn legal_targets(&mut self, from: Pos) -> ChessResult<Vec<Pos>> {
        let color = match self.try_get(from).and_then(Square::color) {
            Some(color) => color,
            None => return Ok(Vec::new()),
        };

        let mut targets = Vec::new();
        for to in Pos::all() {
            let mv = Move::new(from, to);
            if self.is_valid_move(mv, color) && self.leaves_king_safe(mv, color)? {
                targets.push(to);
            }
        }
        Ok(targets)
    }
}
