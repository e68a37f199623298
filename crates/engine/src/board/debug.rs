use crate::types::*;
use super::Board;
use std::fmt;

impl Board {
    /// Text diagram with row/column indices, one line per row.
    pub fn render_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(10);
        lines.push("   0 1 2 3 4 5 6 7".to_string());
        lines.push("   ---------------".to_string());

        for (row, squares) in self.rows().iter().enumerate() {
            let mut line = format!("{} |", row);
            for square in squares.iter() {
                match square.occupant() {
                    Some(piece) => line.push_str(piece.glyph()),
                    None => line.push('.'),
                }
                line.push(' ');
            }
            lines.push(line.trim_end().to_string());
        }
        lines
    }

    /// Debug game state information for one side
    pub fn debug_side(&mut self, color: Color) -> Vec<String> {
        let mut debug_info = Vec::new();

        let material: i32 = self.pieces(color).map(|(_, kind)| kind.material_value()).sum();
        debug_info.push(format!("{} material: {}", color, material));

        match self.find_king(color) {
            Some(king) => debug_info.push(format!("{} king: {}", color, king)),
            None => debug_info.push(format!("❌ {} king missing", color)),
        }

        match self.legal_moves(color) {
            Ok(moves) => debug_info.push(format!("Legal moves available: {}", moves.len())),
            Err(e) => debug_info.push(format!("Legal moves unavailable: {}", e)),
        }

        debug_info
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.render_lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
