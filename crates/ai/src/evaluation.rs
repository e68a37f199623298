use engine::{Board, Color, Pos};

/// Material balance from `color`'s point of view: own pieces count positive,
/// the opponent's negative. No positional terms.
pub fn evaluate_board(board: &Board, color: Color) -> i32 {
    let (white, black) = evaluate_material(board);
    match color {
        Color::White => white - black,
        Color::Black => black - white,
    }
}

/// Count material for both sides as (white, black)
pub fn evaluate_material(board: &Board) -> (i32, i32) {
    let mut white_material = 0;
    let mut black_material = 0;

    for pos in Pos::all() {
        if let Some(piece) = board.get(pos).occupant() {
            let value = piece.kind.material_value();
            match piece.color {
                Color::White => white_material += value,
                Color::Black => black_material += value,
            }
        }
    }

    (white_material, black_material)
}
