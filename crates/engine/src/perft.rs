use crate::error::ChessResult;
use crate::types::*;
use crate::Board;
use std::time::Instant;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerftResult {
    pub nodes: u64,
    pub captures: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
    pub time_ms: u128,
}

impl PerftResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes_per_second(&self) -> u64 {
        if self.time_ms == 0 {
            return 0;
        }
        (self.nodes * 1000) / (self.time_ms as u64)
    }
}

#[derive(Debug)]
pub struct PerftTestCase {
    pub name: &'static str,
    pub fen: &'static str,
    pub to_move: Color,
    pub expected_results: &'static [(u32, u64)], // (depth, expected_nodes)
}

// Reference positions whose counts at these depths involve no castling, en
// passant or promotion, so they hold under these rules.
pub const PERFT_POSITIONS: &[PerftTestCase] = &[
    PerftTestCase {
        name: "Starting Position",
        fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
        to_move: Color::White,
        expected_results: &[(1, 20), (2, 400), (3, 8_902), (4, 197_281)],
    },
    PerftTestCase {
        name: "Position 3",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8",
        to_move: Color::White,
        expected_results: &[(1, 14), (2, 191)],
    },
];

/// Count leaf nodes of the legal move tree. Promotions are a single move
/// (to a queen), the way the automated side plays them.
pub fn perft(board: &mut Board, color: Color, depth: u32) -> ChessResult<u64> {
    if depth == 0 {
        return Ok(1);
    }

    let moves = board.legal_moves(color)?;
    if depth == 1 {
        return Ok(moves.len() as u64);
    }

    let mut nodes = 0;
    for mv in moves {
        let mut after = board.simulate_promoting(mv, PieceKind::Queen);
        nodes += perft(&mut after, color.opponent(), depth - 1)?;
    }
    Ok(nodes)
}

/// Perft that also tracks captures, promotions, checks and mates at the leaves
pub fn perft_detailed(board: &mut Board, color: Color, depth: u32) -> ChessResult<PerftResult> {
    let start_time = Instant::now();
    let mut result = PerftResult::new();
    perft_detailed_inner(board, color, depth, &mut result)?;
    result.time_ms = start_time.elapsed().as_millis();
    Ok(result)
}

fn perft_detailed_inner(board: &mut Board, color: Color, depth: u32, result: &mut PerftResult) -> ChessResult<()> {
    if depth == 0 {
        result.nodes += 1;
        return Ok(());
    }

    for mv in board.legal_moves(color)? {
        let promotes = board.is_promotion_move(mv);
        let mut after = board.simulate_promoting(mv, PieceKind::Queen);

        if depth == 1 {
            result.nodes += 1;
            if !after.captured().is_empty() {
                result.captures += 1;
            }
            if promotes {
                result.promotions += 1;
            }
            match after.status(color.opponent())? {
                GameStatus::Check(_) => result.checks += 1,
                GameStatus::Checkmate { .. } => {
                    result.checks += 1;
                    result.checkmates += 1;
                }
                _ => {}
            }
        } else {
            perft_detailed_inner(&mut after, color.opponent(), depth - 1, result)?;
        }
    }
    Ok(())
}

/// Divide perft - shows per-move breakdown for debugging
pub fn perft_divide(board: &mut Board, color: Color, depth: u32) -> ChessResult<Vec<(Move, u64)>> {
    let mut results = Vec::new();

    for mv in board.legal_moves(color)? {
        let mut after = board.simulate_promoting(mv, PieceKind::Queen);
        let nodes = if depth > 1 {
            perft(&mut after, color.opponent(), depth - 1)?
        } else {
            1
        };
        results.push((mv, nodes));
    }

    results.sort_by(|a, b| b.1.cmp(&a.1)); // Sort by node count descending
    Ok(results)
}

/// Run a single perft test
pub fn run_perft_test(board: &mut Board, color: Color, depth: u32, expected: u64) -> ChessResult<bool> {
    println!("Running perft depth {} (expected: {})", depth, expected);

    let start_time = Instant::now();
    let nodes = perft(board, color, depth)?;
    let elapsed = start_time.elapsed();

    let success = nodes == expected;
    let status = if success { "✅ PASS" } else { "❌ FAIL" };

    println!("{} - Depth {}: {} nodes in {:.3}s ({:.0} nodes/sec)",
             status, depth, nodes, elapsed.as_secs_f64(),
             nodes as f64 / elapsed.as_secs_f64().max(f64::EPSILON));

    Ok(success)
}

/// Run every depth of a test position up to `max_depth`
pub fn run_position_tests(test_case: &PerftTestCase, max_depth: Option<u32>) -> ChessResult<bool> {
    println!("\n🎯 {}", test_case.name);
    println!("{}", "=".repeat(60));

    let mut board = Board::from_fen(test_case.fen)?;
    let mut all_passed = true;

    for &(depth, expected) in test_case.expected_results {
        if max_depth.is_some_and(|max| depth > max) {
            break;
        }
        all_passed &= run_perft_test(&mut board, test_case.to_move, depth, expected)?;
    }

    Ok(all_passed)
}

pub fn run_all_tests(max_depth: Option<u32>) -> ChessResult<bool> {
    let mut all_passed = true;
    for test_case in PERFT_POSITIONS {
        all_passed &= run_position_tests(test_case, max_depth)?;
    }

    if all_passed {
        println!("\n🎉 All perft tests passed");
    } else {
        println!("\n❌ Some perft tests failed");
    }
    Ok(all_passed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_position_perft() {
        let mut board = Board::new();
        assert_eq!(perft(&mut board, Color::White, 1), Ok(20));
        assert_eq!(perft(&mut board, Color::White, 2), Ok(400));
        assert_eq!(perft(&mut board, Color::White, 3), Ok(8_902));
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_position_3_perft() {
        assert_eq!(run_position_tests(&PERFT_POSITIONS[1], Some(2)), Ok(true));
    }

    #[test]
    fn test_perft_detailed_depth_3() {
        let mut board = Board::new();
        let result = perft_detailed(&mut board, Color::White, 3).unwrap();
        assert_eq!(result.nodes, 8_902);
        assert_eq!(result.captures, 34);
        assert_eq!(result.checks, 12);
        assert_eq!(result.checkmates, 0);
        assert_eq!(result.promotions, 0);
    }

    #[test]
    fn test_perft_divide_sums_to_perft() {
        let mut board = Board::new();
        let divide = perft_divide(&mut board, Color::White, 2).unwrap();
        assert_eq!(divide.len(), 20);
        assert!(divide.iter().all(|&(_, n)| n == 20));
        assert_eq!(divide.iter().map(|&(_, n)| n).sum::<u64>(), 400);
    }

    #[test]
    fn test_perft_counts_promotions() {
        // White pawn on (1,0) about to promote, kings far apart
        let mut board = Board::from_fen("7k/P7/8/8/8/8/8/4K3").unwrap();
        let result = perft_detailed(&mut board, Color::White, 1).unwrap();
        assert_eq!(result.promotions, 1);
        assert_eq!(result.nodes, 6); // pawn push + five king steps
    }
}
