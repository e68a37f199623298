use engine::{Color, GameLogger};
use crate::search::score_text;
use crate::types::SelectionResult;

pub trait SelectionLogging {
    fn log_selection_analysis(&mut self, color: Color, lines: &[String]);
    fn log_selection_result(&mut self, result: &SelectionResult);
    fn log_no_move(&mut self, color: Color);
}

impl SelectionLogging for GameLogger {
    fn log_selection_analysis(&mut self, color: Color, lines: &[String]) {
        if !GameLogger::should_log_advanced(self) || lines.is_empty() {
            return;
        }

        GameLogger::log_with_indent(self, &format!("🔬 {} SELECTOR ANALYSIS:", color));
        GameLogger::increase_indent(self);
        for line in lines {
            GameLogger::log_with_indent(self, line);
        }
        GameLogger::decrease_indent(self);
    }

    fn log_selection_result(&mut self, result: &SelectionResult) {
        let summary = match result.best_move {
            Some(mv) => format!(
                "🎯 Selected {} | Score: {} | {} candidates, {} hanging, {} exposing the king",
                mv,
                score_text(result.score),
                result.candidates,
                result.discarded,
                result.rejected_self_check
            ),
            None => format!(
                "❌ No candidate | {} moves exposing the king",
                result.rejected_self_check
            ),
        };
        GameLogger::log(self, &summary);
    }

    fn log_no_move(&mut self, color: Color) {
        GameLogger::log(self, &format!("🛑 {} has no valid moves. Game over.", color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::Move;

    #[test]
    fn test_analysis_only_in_advanced_mode() {
        let mut logger = GameLogger::new();
        let lines = vec!["  🔄 (1,4)->(3,4) → Score: +0".to_string()];
        logger.log_selection_analysis(Color::Black, &lines);
        assert!(!logger.log_buffer.contains("SELECTOR ANALYSIS"));

        logger.enable_advanced_logging();
        logger.log_selection_analysis(Color::Black, &lines);
        assert!(logger.log_buffer.contains("🔬 Black SELECTOR ANALYSIS:\n"));
        assert!(logger.log_buffer.contains("    🔄 (1,4)->(3,4) → Score: +0\n"));
    }

    #[test]
    fn test_result_summaries() {
        let mut logger = GameLogger::new();
        let result = SelectionResult {
            best_move: Some(Move::from_coords(1, 4, 3, 4)),
            score: 2,
            candidates: 20,
            discarded: 1,
            rejected_self_check: 0,
        };
        logger.log_selection_result(&result);
        assert!(logger.log_buffer.contains("Selected (1,4)->(3,4) | Score: +2 | 20 candidates, 1 hanging"));

        logger.log_selection_result(&SelectionResult::none());
        assert!(logger.log_buffer.contains("No candidate"));

        logger.log_no_move(Color::Black);
        assert!(logger.log_buffer.contains("Black has no valid moves. Game over."));
    }
}
