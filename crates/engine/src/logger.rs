use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use crate::error::{ChessError, LogError};
use crate::{Board, GameStatus, Move, MoveRecord};

/// In-memory game log, written out to `logs/` when a game ends.
///
/// Basic entries (moves, check, game end) are always recorded. Advanced
/// entries carry the selector's per-candidate analysis and are only kept
/// when `advanced_logging` is on.
#[derive(Debug)]
pub struct GameLogger {
    pub log_buffer: String,
    pub advanced_logging: bool,
    game_start_time: Instant,
    move_count: u32,
    indent_level: usize,
}

impl GameLogger {
    pub fn new() -> Self {
        let mut logger = Self {
            log_buffer: String::with_capacity(64 * 1024),
            advanced_logging: false,
            game_start_time: Instant::now(),
            move_count: 0,
            indent_level: 0,
        };

        logger.log("🎯 === Chess Game Log Started ===");
        logger.log(&format!("📅 Date: {}", chrono::Local::now().format("%m/%d/%Y %H:%M:%S")));
        logger
    }

    pub fn should_log_advanced(&self) -> bool {
        self.advanced_logging
    }

    pub fn enable_advanced_logging(&mut self) {
        self.advanced_logging = true;
        self.log("🔬 Advanced logging enabled - selector analysis active");
    }

    pub fn log(&mut self, message: &str) {
        self.log_buffer.push_str(message);
        self.log_buffer.push('\n');
    }

    pub fn log_with_indent(&mut self, message: &str) {
        let indent = "  ".repeat(self.indent_level);
        self.log_buffer.push_str(&format!("{}{}\n", indent, message));
    }

    /// Advanced-only entry at the current indent.
    pub fn log_advanced(&mut self, message: &str) {
        if self.should_log_advanced() {
            self.log_with_indent(message);
        }
    }

    pub fn increase_indent(&mut self) { self.indent_level += 1; }
    pub fn decrease_indent(&mut self) {
        if self.indent_level > 0 { self.indent_level -= 1; }
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.game_start_time.elapsed().as_millis()
    }

    // 🎯 MOVE LOGGING
    pub fn log_human_move(&mut self, record: &MoveRecord, time_ms: u64) {
        self.move_count += 1;
        self.log(&format!(
            "{}. {} {} (Human move - {}ms)",
            self.move_count,
            record.mover,
            record_to_string(record),
            time_ms
        ));
    }

    pub fn log_ai_move(&mut self, record: &MoveRecord, time_ms: u64, eval: i32) {
        self.move_count += 1;
        self.log(&format!(
            "{}. {} {} (AI move - {}ms) Eval: {} {}",
            self.move_count,
            record.mover,
            record_to_string(record),
            time_ms,
            eval,
            if eval > 0 { "📈" } else { "📉" }
        ));
    }

    pub fn log_rejected_move(&mut self, mv: Move, error: &ChessError) {
        self.log(&format!("🚫 Rejected {}: {}", mv, error));
    }

    pub fn log_status(&mut self, status: GameStatus) {
        match status {
            GameStatus::InProgress => {}
            GameStatus::Check(color) => self.log(&format!("⚠️ {}'s king is in check.", color)),
            GameStatus::Checkmate { loser } => {
                self.log(&format!("🏁 Checkmate! {} wins!", loser.opponent()))
            }
            GameStatus::Stalemate => self.log("🏁 Stalemate!"),
        }
    }

    pub fn log_board(&mut self, board: &Board) {
        if self.should_log_advanced() {
            for line in board.render_lines() {
                self.log_with_indent(&line);
            }
        }
    }

    pub fn log_game_aborted(&mut self, reason: &str) {
        self.log(&format!("🛑 Game finished abruptly - {}", reason));
    }

    pub fn save_to_file(&mut self, reason: &str) -> Result<String, LogError> {
        self.save_to_dir(Path::new("logs"), reason)
    }

    /// Write the buffer to `<dir>/<timestamp>.txt` and return the file name.
    pub fn save_to_dir(&mut self, dir: &Path, reason: &str) -> Result<String, LogError> {
        fs::create_dir_all(dir).map_err(|source| LogError::CreateDir {
            dir: dir.to_path_buf(),
            source,
        })?;

        // Generate filename with current date/time
        let now = chrono::Local::now();
        let filename = dir.join(format!("{}.txt", now.format("%m_%d_%Y_%H_%M_%S")));

        // Add final log entry
        self.log(&format!("💾 Game ended: {} - Saving log", reason));

        File::create(&filename)
            .and_then(|mut file| file.write_all(self.log_buffer.as_bytes()))
            .map_err(|source| LogError::Write {
                file: filename.clone(),
                source,
            })?;

        Ok(filename.display().to_string())
    }
}

fn record_to_string(record: &MoveRecord) -> String {
    let mut text = record.mv.to_string();
    if let Some(piece) = record.captured.occupant() {
        text.push_str(&format!(" x{}", piece.glyph()));
    }
    if let Some(kind) = record.promotion {
        text.push_str(&format!("={}", kind.letter().to_ascii_uppercase()));
    }
    if record.gives_check {
        text.push('+');
    }
    text
}

impl Default for GameLogger {
    fn default() -> Self {
        Self::new()
    }
}
