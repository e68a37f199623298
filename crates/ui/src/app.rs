use std::time::Instant;
use egui::{Color32, Rect, Sense, Vec2};
use ai::Selector;
use engine::{Game, GameConfig, GameStatus, Move, Piece, PieceKind, Pos, BOARD_SIZE};

pub struct ChessApp {
    game: Game,
    selector: Selector,
    selected_square: Option<Pos>,
    legal_targets: Vec<Pos>,
    pending_promotion: Option<Move>,
    turn_started: Instant,
    message: String,
    log_saved: bool,
}

impl ChessApp {
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    pub fn with_config(config: GameConfig) -> Self {
        let mut app = Self {
            game: Game::new(config),
            selector: Selector::default(),
            selected_square: None,
            legal_targets: Vec::new(),
            pending_promotion: None,
            turn_started: Instant::now(),
            message: String::new(),
            log_saved: false,
        };
        // The automated side may be asked to open the game
        app.run_automated_turns();
        app
    }
}

impl Default for ChessApp {
    fn default() -> Self {
        Self::new()
    }
}

impl eframe::App for ChessApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Chess");
            ui.label(self.status_text());
            if !self.message.is_empty() {
                ui.label(&self.message);
            }

            let available_size = ui.available_size();
            let board_size = available_size.x.min(available_size.y) - 20.0;
            let square_size = board_size / BOARD_SIZE as f32;

            let board_rect = Rect::from_min_size(
                ui.cursor().min,
                Vec2::splat(board_size),
            );

            let response = ui.allocate_rect(board_rect, Sense::click());

            if response.clicked() && self.pending_promotion.is_none() {
                if let Some(pos) = response.interact_pointer_pos() {
                    let relative_pos = pos - board_rect.min;
                    if let Some(clicked) = screen_to_pos(relative_pos.x, relative_pos.y, square_size) {
                        self.handle_square_click(clicked);
                    }
                }
            }

            self.draw_board(ui, board_rect, square_size);
        });

        self.show_promotion_chooser(ctx);
    }
}

impl ChessApp {
    fn status_text(&self) -> String {
        match self.game.status {
            GameStatus::InProgress => format!("{} to move", self.game.current_turn),
            GameStatus::Check(color) => format!("{} to move - {}'s king is in check", self.game.current_turn, color),
            GameStatus::Checkmate { loser } => format!("Checkmate! {} wins", loser.opponent()),
            GameStatus::Stalemate => "Stalemate".to_string(),
        }
    }

    fn accepts_clicks(&self) -> bool {
        !self.game.status.is_over() && !self.game.is_automated_turn()
    }

    fn clear_selection(&mut self) {
        self.selected_square = None;
        self.legal_targets.clear();
    }

    fn select(&mut self, pos: Pos) {
        if !self.game.board.get(pos).is_color(self.game.current_turn) {
            self.clear_selection();
            return;
        }
        match self.game.board.legal_targets(pos) {
            Ok(targets) => {
                self.selected_square = Some(pos);
                self.legal_targets = targets;
            }
            Err(e) => {
                self.message = e.to_string();
                self.clear_selection();
            }
        }
    }

    fn handle_square_click(&mut self, clicked: Pos) {
        if !self.accepts_clicks() {
            return;
        }

        match self.selected_square {
            Some(selected) if selected == clicked => self.clear_selection(),
            Some(selected) if self.legal_targets.contains(&clicked) => {
                let mv = Move::new(selected, clicked);
                self.clear_selection();
                if self.game.board.is_promotion_move(mv) {
                    self.pending_promotion = Some(mv);
                } else {
                    self.submit_human_move(mv, None);
                }
            }
            _ => self.select(clicked),
        }
    }

    fn submit_human_move(&mut self, mv: Move, promotion: Option<PieceKind>) {
        let time_ms = self.turn_started.elapsed().as_millis() as u64;
        match self.game.play_human_move(mv, promotion, time_ms) {
            Ok(record) => {
                self.message = format!("{} played {} at {}", record.mover, record.mv,
                    chrono::Local::now().format("%H:%M:%S"));
                self.run_automated_turns();
            }
            Err(e) => self.message = format!("Move rejected: {}", e),
        }
        self.turn_started = Instant::now();
        self.save_log_if_finished();
    }

    fn run_automated_turns(&mut self) {
        while !self.game.status.is_over() && self.game.is_automated_turn() {
            let color = self.game.current_turn;
            match self.selector.play_turn(&mut self.game) {
                Ok(Some((record, _))) => {
                    self.message.push_str(&format!(" | {} replied {}", color, record.mv));
                }
                Ok(None) => {
                    self.message = format!("{} has no valid moves. Game over.", color);
                    self.finish(&format!("{} had no move", color));
                    return;
                }
                Err(e) => {
                    self.message = format!("{} could not move: {}", color, e);
                    self.game.logger.log_game_aborted(&e.to_string());
                    self.finish(&e.to_string());
                    return;
                }
            }
        }
    }

    fn save_log_if_finished(&mut self) {
        if self.game.status.is_over() {
            let reason = self.status_text();
            self.finish(&reason);
        }
    }

    fn finish(&mut self, reason: &str) {
        if self.log_saved {
            return;
        }
        self.log_saved = true;
        match self.game.logger.save_to_file(reason) {
            Ok(filename) => self.message.push_str(&format!(" | log saved to {}", filename)),
            Err(e) => self.message.push_str(&format!(" | {}", e)),
        }
    }

    fn show_promotion_chooser(&mut self, ctx: &egui::Context) {
        let Some(mv) = self.pending_promotion else {
            return;
        };

        let mut chosen = None;
        let color = self.game.current_turn;
        egui::Window::new("Promote pawn")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    for kind in PieceKind::PROMOTIONS {
                        let label = egui::RichText::new(Piece::new(color, kind).glyph()).size(32.0);
                        if ui.button(label).on_hover_text(format!("{:?}", kind)).clicked() {
                            chosen = Some(kind);
                        }
                    }
                });
            });

        if let Some(kind) = chosen {
            self.pending_promotion = None;
            self.submit_human_move(mv, Some(kind));
        }
    }

    fn draw_board(&self, ui: &mut egui::Ui, board_rect: Rect, square_size: f32) {
        let painter = ui.painter();

        for pos in Pos::all() {
            let is_light = (pos.row + pos.col) % 2 == 0;

            let square_rect = Rect::from_min_size(
                board_rect.min + Vec2::new(pos.col as f32 * square_size, pos.row as f32 * square_size),
                Vec2::splat(square_size),
            );

            let base_color = if is_light {
                Color32::from_rgb(240, 217, 181)
            } else {
                Color32::from_rgb(181, 136, 99)
            };

            let square_color = if Some(pos) == self.selected_square {
                Color32::from_rgb(255, 255, 0)
            } else if self.is_checked_king(pos) {
                Color32::from_rgb(220, 80, 80)
            } else {
                base_color
            };

            painter.rect_filled(square_rect, 0.0, square_color);

            let square = self.game.board.get(pos);
            if self.legal_targets.contains(&pos) {
                let center = square_rect.center();
                let hint = Color32::from_rgba_premultiplied(128, 128, 128, 179);

                if !square.is_empty() {
                    // Capture target: ring
                    painter.circle_filled(center, square_size * 0.4, hint);
                    painter.circle_filled(center, square_size * 0.25, square_color);
                } else {
                    painter.circle_filled(center, square_size * 0.15, hint);
                }
            }

            if let Some(piece) = square.occupant() {
                draw_piece(painter, piece, square_rect);
            }
        }

        painter.rect_stroke(board_rect, 0.0, egui::Stroke::new(2.0, Color32::BLACK));
    }

    fn is_checked_king(&self, pos: Pos) -> bool {
        let checked = match self.game.status {
            GameStatus::Check(color) => color,
            GameStatus::Checkmate { loser } => loser,
            _ => return false,
        };
        self.game.board.get(pos).kind() == Some(PieceKind::King)
            && self.game.board.get(pos).is_color(checked)
    }
}

fn draw_piece(painter: &egui::Painter, piece: Piece, square_rect: Rect) {
    let size = square_rect.size() * 0.8;
    painter.text(
        square_rect.center(),
        egui::Align2::CENTER_CENTER,
        piece.glyph(),
        egui::FontId::proportional(size.x),
        Color32::BLACK,
    );
}

/// Map a point relative to the board's top-left corner to a square. Row 0 is
/// drawn at the top.
fn screen_to_pos(x: f32, y: f32, square_size: f32) -> Option<Pos> {
    if x < 0.0 || y < 0.0 || square_size <= 0.0 {
        return None;
    }
    let col = (x / square_size) as i32;
    let row = (y / square_size) as i32;
    let pos = Pos::new(i8::try_from(row).ok()?, i8::try_from(col).ok()?);
    pos.is_on_board().then_some(pos)
}
