use engine::Move;

/// Score given to a candidate whose moved piece can be taken right back.
/// Selection is strictly greater-than from this value, so such a move is
/// never picked.
pub const HANGING_SCORE: i32 = i32::MIN;

/// Selector settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorConfig {
    /// Skip candidates that leave the mover's own king attacked. With this
    /// off the selector only guards against hanging the moved piece.
    pub reject_self_check: bool,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self { reject_self_check: true }
    }
}

/// Outcome of a one-ply selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionResult {
    /// `None` when the side has no candidate at all.
    pub best_move: Option<Move>,
    pub score: i32,
    /// Candidates that were scored (hanging ones included).
    pub candidates: usize,
    /// Candidates scored as hanging.
    pub discarded: usize,
    /// Moves skipped because they left the own king attacked.
    pub rejected_self_check: usize,
}

impl SelectionResult {
    pub fn none() -> Self {
        Self {
            best_move: None,
            score: HANGING_SCORE,
            candidates: 0,
            discarded: 0,
            rejected_self_check: 0,
        }
    }
}
