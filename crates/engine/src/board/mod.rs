use crate::error::{ChessError, ChessResult};
use crate::types::*;
// Declare submodules
pub mod moves;
pub mod validation;
pub mod state;
pub mod debug;

pub use state::SimulatedMove;

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// 8x8 grid, row-major. Row 0 is black's back rank, row 7 is white's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [[Square; 8]; 8],
}

impl Board {
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.setup_starting_position();
        board
    }

    pub fn empty() -> Self {
        Self {
            squares: [[Square::Empty; 8]; 8],
        }
    }

    fn setup_starting_position(&mut self) {
        for (col, &kind) in BACK_RANK.iter().enumerate() {
            let col = col as i8;
            self.set(Pos::new(0, col), Square::piece(Color::Black, kind));
            self.set(Pos::new(1, col), Square::piece(Color::Black, PieceKind::Pawn));
            self.set(Pos::new(6, col), Square::piece(Color::White, PieceKind::Pawn));
            self.set(Pos::new(7, col), Square::piece(Color::White, kind));
        }
    }

    // Basic board operations. Callers range-check `pos` first.
    pub fn get(&self, pos: Pos) -> Square {
        self.squares[pos.row as usize][pos.col as usize]
    }

    pub fn set(&mut self, pos: Pos, square: Square) {
        self.squares[pos.row as usize][pos.col as usize] = square;
    }

    /// Range-checked read for untrusted coordinates.
    pub fn try_get(&self, pos: Pos) -> Option<Square> {
        pos.is_on_board().then(|| self.get(pos))
    }

    pub fn rows(&self) -> &[[Square; 8]; 8] {
        &self.squares
    }

    /// First square (row-major) holding this color's king.
    pub fn find_king(&self, color: Color) -> Option<Pos> {
        let king = Square::piece(color, PieceKind::King);
        Pos::all().find(|&pos| self.get(pos) == king)
    }

    pub fn king_position(&self, color: Color) -> ChessResult<Pos> {
        self.find_king(color).ok_or(ChessError::MissingKing(color))
    }

    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Pos, PieceKind)> + '_ {
        Pos::all().filter_map(move |pos| match self.get(pos) {
            Square::Occupied(piece) if piece.color == color => Some((pos, piece.kind)),
            _ => None,
        })
    }

    // FEN parsing functionality. Only the placement field is used; the first
    // FEN rank maps to row 0.
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        let placement = fen
            .split_whitespace()
            .next()
            .ok_or_else(|| ChessError::InvalidFen("empty string".to_string()))?;

        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != 8 {
            return Err(ChessError::InvalidFen(format!(
                "expected 8 ranks, found {}",
                rows.len()
            )));
        }

        let mut board = Self::empty();
        for (row, row_str) in rows.iter().enumerate() {
            let mut col = 0i8;
            for ch in row_str.chars() {
                if let Some(skip) = ch.to_digit(10) {
                    if skip == 0 || skip > (BOARD_SIZE - col) as u32 {
                        return Err(ChessError::InvalidFen(format!("bad empty-square count '{}' in rank {}", ch, row)));
                    }
                    col += skip as i8;
                    continue;
                }
                if col >= BOARD_SIZE {
                    return Err(ChessError::InvalidFen(format!("too many pieces in rank {}", row)));
                }
                let kind = PieceKind::from_letter(ch)
                    .ok_or_else(|| ChessError::InvalidFen(format!("unknown piece '{}'", ch)))?;
                let color = if ch.is_ascii_uppercase() { Color::White } else { Color::Black };
                board.set(Pos::new(row as i8, col), Square::piece(color, kind));
                col += 1;
            }
            if col != BOARD_SIZE {
                return Err(ChessError::InvalidFen(format!("incomplete rank {}", row)));
            }
        }

        Ok(board)
    }

    pub fn to_fen(&self) -> String {
        let mut ranks = Vec::with_capacity(8);
        for row in self.squares.iter() {
            let mut rank = String::new();
            let mut empties = 0;
            for square in row.iter() {
                match square.occupant() {
                    None => empties += 1,
                    Some(piece) => {
                        if empties > 0 {
                            rank.push_str(&empties.to_string());
                            empties = 0;
                        }
                        rank.push(piece.fen_char());
                    }
                }
            }
            if empties > 0 {
                rank.push_str(&empties.to_string());
            }
            ranks.push(rank);
        }
        ranks.join("/")
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
