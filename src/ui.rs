#![cfg(feature = "std")]

use std::string::String;
use std::vec::Vec;

use crate::core::{CardFace, CardView, Feedback, RenderDirective, RenderSink};

/// Draw the grid with column letters and row numbers.
pub fn render_grid(cards: &[CardView], columns: usize) -> String {
    let mut out = String::new();
    if columns == 0 {
        return out;
    }
    out.push_str("    ");
    for c in 0..columns {
        let ch = (b'A' + c as u8) as char;
        out.push_str(&format!("  {}  ", ch));
    }
    out.push('\n');
    for (r, row) in cards.chunks(columns).enumerate() {
        out.push_str(&format!("{:3} ", r + 1));
        for card in row {
            let symbol = card.symbol.unwrap_or("??");
            let cell = match card.face {
                CardFace::FaceDown => String::from("[??]"),
                CardFace::FaceUp => format!("[{}]", symbol),
                CardFace::Matched => format!(" {} ", symbol),
            };
            out.push_str(&cell);
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

/// [`RenderSink`] printing the game to stdout.
///
/// Keeps its own copy of the grid, redrawing it when a card turns face up and
/// when input is re-enabled. Stats are printed when the move count changes
/// rather than on every tick.
#[derive(Default)]
pub struct TerminalView {
    cards: Vec<CardView>,
    columns: usize,
    last_moves: Option<u32>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cards(&self) -> &[CardView] {
        &self.cards
    }

    fn draw(&self) {
        std::println!();
        std::print!("{}", render_grid(&self.cards, self.columns));
    }

    fn update(&mut self, view: CardView) {
        if let Some(slot) = self.cards.iter_mut().find(|c| c.id == view.id) {
            *slot = view;
        }
    }
}

impl RenderSink for TerminalView {
    fn render(&mut self, directive: &RenderDirective) {
        match directive {
            RenderDirective::Board { columns, cards } => {
                self.columns = *columns;
                self.cards = cards.clone();
                if cards.iter().any(|c| c.interactive) {
                    self.draw();
                }
            }
            RenderDirective::Card(view) => {
                self.update(*view);
                if view.face == CardFace::FaceUp {
                    self.draw();
                }
            }
            RenderDirective::Feedback { kind, .. } => match kind {
                Feedback::Match => std::println!("✓ Match!"),
                Feedback::Mismatch => std::println!("✗ No match."),
            },
            RenderDirective::Stats(stats) => {
                if self.last_moves != Some(stats.moves) {
                    self.last_moves = Some(stats.moves);
                    std::println!("{}", stats);
                }
            }
            RenderDirective::Message(text) => {
                if !text.is_empty() {
                    std::println!("\n🎉🎉🎉 {} 🎉🎉🎉", text);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(id: usize, face: CardFace, symbol: Option<&'static str>) -> CardView {
        CardView {
            id,
            face,
            symbol,
            interactive: face == CardFace::FaceDown,
        }
    }

    #[test]
    fn grid_marks_faces() {
        let cards = [
            view(0, CardFace::FaceDown, None),
            view(1, CardFace::FaceUp, Some("🎮")),
            view(2, CardFace::Matched, Some("🎯")),
            view(3, CardFace::Matched, Some("🎯")),
        ];
        let grid = render_grid(&cards, 2);
        let lines: Vec<&str> = grid.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains('A') && lines[0].contains('B'));
        assert!(lines[1].contains("[??]") && lines[1].contains("[🎮]"));
        assert!(lines[2].contains(" 🎯 "));
    }

    #[test]
    fn view_tracks_card_updates() {
        let mut tv = TerminalView::new();
        tv.render(&RenderDirective::Board {
            columns: 2,
            cards: vec![view(0, CardFace::FaceDown, None), view(1, CardFace::FaceDown, None)],
        });
        tv.render(&RenderDirective::Card(view(1, CardFace::FaceUp, Some("🎮"))));
        assert_eq!(tv.cards()[1].face, CardFace::FaceUp);
        assert_eq!(tv.cards()[0].face, CardFace::FaceDown);
    }
}
