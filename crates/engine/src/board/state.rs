use crate::error::ChessResult;
use crate::types::*;
use super::Board;
use std::ops::{Deref, DerefMut};

/// A move applied to a board for the duration of a query.
///
/// Dropping the guard puts the moved piece back on its source square and
/// restores whatever stood on the destination, so every exit path leaves the
/// board exactly as it was. Nested simulations through `DerefMut` are fine as
/// long as they are dropped first, which the borrow checker enforces.
pub struct SimulatedMove<'a> {
    board: &'a mut Board,
    mv: Move,
    moved: Square,
    captured: Square,
}

impl SimulatedMove<'_> {
    pub fn captured(&self) -> Square {
        self.captured
    }

    pub fn mv(&self) -> Move {
        self.mv
    }
}

impl Deref for SimulatedMove<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        &*self.board
    }
}

impl DerefMut for SimulatedMove<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        &mut *self.board
    }
}

impl Drop for SimulatedMove<'_> {
    fn drop(&mut self) {
        self.board.set(self.mv.from, self.moved);
        self.board.set(self.mv.to, self.captured);
    }
}

impl Board {
    /// Move a piece and vacate its source. Returns what stood on the
    /// destination. No legality check and no promotion.
    pub fn apply_move(&mut self, mv: Move) -> Square {
        let captured = self.get(mv.to);
        let moving = self.get(mv.from);
        self.set(mv.to, moving);
        self.set(mv.from, Square::Empty);
        captured
    }

    /// Apply `mv` until the returned guard is dropped.
    pub fn simulate(&mut self, mv: Move) -> SimulatedMove<'_> {
        let moved = self.get(mv.from);
        let captured = self.apply_move(mv);
        SimulatedMove {
            board: self,
            mv,
            moved,
            captured,
        }
    }

    /// Like `simulate`, but a pawn reaching its promotion row becomes
    /// `promotion` while the guard lives.
    pub fn simulate_promoting(&mut self, mv: Move, promotion: PieceKind) -> SimulatedMove<'_> {
        let moved = self.get(mv.from);
        let (captured, _) = self.apply_with_promotion(mv, promotion);
        SimulatedMove {
            board: self,
            mv,
            moved,
            captured,
        }
    }

    /// Apply `mv` permanently and, if a pawn lands on its promotion row,
    /// replace it with `promotion`. Returns the captured square and the piece
    /// the pawn became.
    pub fn apply_with_promotion(&mut self, mv: Move, promotion: PieceKind) -> (Square, Option<PieceKind>) {
        let moving = self.get(mv.from);
        let captured = self.apply_move(mv);

        match moving {
            Square::Occupied(Piece { color, kind: PieceKind::Pawn })
                if mv.to.row == color.promotion_row() =>
            {
                self.set(mv.to, Square::piece(color, promotion));
                (captured, Some(promotion))
            }
            _ => (captured, None),
        }
    }

    /// Whether the pawn at `mv.from` would promote by making `mv`.
    pub fn is_promotion_move(&self, mv: Move) -> bool {
        mv.is_on_board()
            && matches!(
                self.get(mv.from),
                Square::Occupied(Piece { color, kind: PieceKind::Pawn }) if mv.to.row == color.promotion_row()
            )
    }

    /// Whether `mv` keeps `color`'s king out of attack once made.
    pub fn leaves_king_safe(&mut self, mv: Move, color: Color) -> ChessResult<bool> {
        let after = self.simulate(mv);
        let king = after.king_position(color)?;
        Ok(!after.is_position_threatened(king, color))
    }

    /// Exhaustive search: does `color` have any move that leaves its king
    /// unthreatened? The board is identical before and after the call.
    pub fn has_legal_move(&mut self, color: Color) -> ChessResult<bool> {
        for mv in self.pseudo_legal_moves(color) {
            if self.leaves_king_safe(mv, color)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// In check and no move escapes.
    pub fn is_checkmate(&mut self, color: Color) -> ChessResult<bool> {
        Ok(self.in_check(color)? && !self.has_legal_move(color)?)
    }

    /// Not in check and no legal move at all.
    pub fn is_stalemate(&mut self, color: Color) -> ChessResult<bool> {
        Ok(!self.in_check(color)? && !self.has_legal_move(color)?)
    }

    /// Classify the position for `color`, the side about to move.
    pub fn status(&mut self, color: Color) -> ChessResult<GameStatus> {
        let in_check = self.in_check(color)?;
        let can_move = self.has_legal_move(color)?;

        Ok(match (in_check, can_move) {
            (true, false) => GameStatus::Checkmate { loser: color },
            (false, false) => GameStatus::Stalemate,
            (true, true) => GameStatus::Check(color),
            (false, true) => GameStatus::InProgress,
        })
    }
}
