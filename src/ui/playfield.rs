use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

use crate::word_stream::Word;

pub const CAR: &str = "<[o=o]>";
const ROAD_ROWS: u16 = 2;

/// Terminal cell where `text` starts when centered on `left` percent of `width`
pub fn column_for(text: &str, left: f64, width: u16) -> u16 {
    let text_width = text.width().min(width as usize) as u16;
    let center = (left.clamp(0.0, 100.0) / 100.0 * f64::from(width)).round() as u16;
    center
        .saturating_sub(text_width / 2)
        .min(width.saturating_sub(text_width))
}

/// Row for a vertical pixel position in a lane `height` rows tall, or None
/// while the position is outside the lane
pub fn row_for(top: f64, game_height: f64, height: u16) -> Option<u16> {
    if top < 0.0 || game_height <= 0.0 {
        return None;
    }
    let row = (top / game_height * f64::from(height)).floor() as u16;
    (row < height).then_some(row)
}

/// The lane the words fall down, with the road and the car at the bottom
pub struct Playfield<'a> {
    pub words: &'a [Word],
    pub game_height: f64,
    pub car_position: f64,
    pub highlight: &'a str,
}

impl Widget for Playfield<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let road_rows = ROAD_ROWS.min(area.height);
        let road_top = area.y + area.height - road_rows;
        let dashes: String = (0..area.width)
            .map(|i| if i % 8 < 4 { '-' } else { ' ' })
            .collect();
        let road_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::DIM);
        buf.set_string(area.x, road_top, &dashes, road_style);

        let car_row = area.y + area.height - 1;
        let car_x = column_for(CAR, self.car_position, area.width);
        buf.set_stringn(
            area.x + car_x,
            car_row,
            CAR,
            area.width as usize,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        );

        let needle = self.highlight.trim().to_lowercase();
        for word in self.words {
            let Some(row) = row_for(word.top, self.game_height, area.height) else {
                continue;
            };
            let x = column_for(&word.text, word.left, area.width);
            let typed = !needle.is_empty() && word.text.to_lowercase().starts_with(&needle);
            let style = if typed {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            };
            buf.set_stringn(
                area.x + x,
                area.y + row,
                &word.text,
                (area.width - x) as usize,
                style,
            );
        }
    }
}
