use crate::types::*;
use super::Board;

impl Board {
    /// Check if `color` may move the piece at `mv.from` to `mv.to`.
    ///
    /// Pure piece-movement rules plus occupancy: it does not care whether the
    /// move leaves the mover's own king attacked.
    pub fn is_valid_move(&self, mv: Move, color: Color) -> bool {
        // Basic validations
        if !mv.is_on_board() {
            return false;
        }

        let piece = match self.get(mv.from) {
            Square::Occupied(piece) if piece.color == color => piece,
            _ => return false, // Empty or not your piece
        };

        if self.get(mv.to).is_color(color) {
            return false; // Can't capture your own piece
        }

        match piece.kind {
            PieceKind::Pawn => self.is_valid_pawn_move(mv, color),
            PieceKind::Knight => is_knight_shape(mv),
            PieceKind::Bishop => self.is_valid_bishop_move(mv),
            PieceKind::Rook => self.is_valid_rook_move(mv),
            PieceKind::Queen => self.is_valid_bishop_move(mv) || self.is_valid_rook_move(mv),
            PieceKind::King => is_king_step(mv),
        }
    }

    fn is_valid_pawn_move(&self, mv: Move, color: Color) -> bool {
        let forward = color.forward();
        let d_row = mv.to.row - mv.from.row;
        let d_col = mv.to.col - mv.from.col;
        let target = self.get(mv.to);

        if d_col == 0 && target.is_empty() {
            if d_row == forward {
                return true;
            }
            // Double step from the home row, both squares must be empty
            if mv.from.row == color.home_pawn_row() && d_row == 2 * forward {
                return self.get(mv.from.offset(forward, 0)).is_empty();
            }
        }

        // Diagonal step only as a capture (no en passant)
        d_col.abs() == 1 && d_row == forward && target.is_color(color.opponent())
    }

    fn is_valid_bishop_move(&self, mv: Move) -> bool {
        let d_row = (mv.to.row - mv.from.row).abs();
        let d_col = (mv.to.col - mv.from.col).abs();
        d_row == d_col && d_row != 0 && self.is_path_clear(mv.from, mv.to)
    }

    fn is_valid_rook_move(&self, mv: Move) -> bool {
        let same_line = mv.from.row == mv.to.row || mv.from.col == mv.to.col;
        same_line && mv.from != mv.to && self.is_path_clear(mv.from, mv.to)
    }

    /// Walk unit steps strictly between `from` and `to`; any occupied square
    /// blocks. Squares that are off the board or not on a shared line or
    /// diagonal have no path and give `false`.
    pub fn is_path_clear(&self, from: Pos, to: Pos) -> bool {
        if !from.is_on_board() || !to.is_on_board() {
            return false;
        }
        let d_row = to.row - from.row;
        let d_col = to.col - from.col;
        if d_row != 0 && d_col != 0 && d_row.abs() != d_col.abs() {
            return false;
        }

        let step_row = d_row.signum();
        let step_col = d_col.signum();
        let mut pos = from.offset(step_row, step_col);

        while pos != to {
            if !self.get(pos).is_empty() {
                return false;
            }
            pos = pos.offset(step_row, step_col);
        }
        true
    }

    /// Whether any piece of `color`'s opponent could legally move onto `pos`.
    ///
    /// Attacks are defined through `is_valid_move`, so a pawn only "attacks"
    /// an occupied enemy square diagonally, which is what a king square is.
    pub fn is_position_threatened(&self, pos: Pos, color: Color) -> bool {
        if !pos.is_on_board() {
            return false;
        }
        let attacker = color.opponent();
        self.pieces(attacker)
            .any(|(from, _)| self.is_valid_move(Move::new(from, pos), attacker))
    }

    /// Whether `color`'s king is currently attacked.
    pub fn in_check(&self, color: Color) -> crate::ChessResult<bool> {
        let king = self.king_position(color)?;
        Ok(self.is_position_threatened(king, color))
    }
}

fn is_knight_shape(mv: Move) -> bool {
    let d_row = (mv.to.row - mv.from.row).abs();
    let d_col = (mv.to.col - mv.from.col).abs();
    (d_row == 2 && d_col == 1) || (d_row == 1 && d_col == 2)
}

fn is_king_step(mv: Move) -> bool {
    let d_row = (mv.to.row - mv.from.row).abs();
    let d_col = (mv.to.col - mv.from.col).abs();
    d_row <= 1 && d_col <= 1
}
