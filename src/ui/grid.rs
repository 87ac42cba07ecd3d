//! Card grid geometry.
//!
//! Pure functions of the content area, the configured card size, the item
//! count and the cursor. Rendering and mouse hit-testing both go through
//! `GridLayout`, so a click always lands on the card that was drawn there.

use ratatui::layout::{Position, Rect};

use crate::config::LayoutConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    area: Rect,
    pub columns: usize,
    pub visible_rows: usize,
    /// First grid row drawn; scrolled so the cursor row stays visible.
    pub first_row: usize,
    card_width: u16,
    card_height: u16,
    count: usize,
}

impl GridLayout {
    pub fn new(area: Rect, count: usize, cursor: usize, card: LayoutConfig) -> Self {
        let card_height = card.card_height.max(1);
        let columns = usize::from((area.width / card.card_width.max(1)).max(1));
        let visible_rows = usize::from((area.height / card_height).max(1));
        // Stretch cards to use the full width.
        let card_width = (area.width / columns as u16).max(1);

        let cursor_row = cursor.min(count.saturating_sub(1)) / columns;
        let first_row = (cursor_row + 1).saturating_sub(visible_rows);

        Self {
            area,
            columns,
            visible_rows,
            first_row,
            card_width,
            card_height,
            count,
        }
    }

    /// Index of the card to the left/right/up/down of `index`, staying put
    /// at the edges.
    pub fn step(&self, index: usize, d_col: isize, d_row: isize) -> usize {
        if self.count == 0 {
            return 0;
        }
        let col = (index % self.columns) as isize + d_col;
        let row = (index / self.columns) as isize + d_row;
        if col < 0 || col >= self.columns as isize || row < 0 {
            return index;
        }
        let target = row as usize * self.columns + col as usize;
        if target < self.count {
            target
        } else if d_row > 0 {
            // Moving down past a short last row lands on the last card.
            let last_row = (self.count - 1) / self.columns;
            if (row as usize) <= last_row {
                self.count - 1
            } else {
                index
            }
        } else {
            index
        }
    }

    /// Rectangles of every card that is at least partly visible, in order.
    pub fn card_rects(&self) -> Vec<(usize, Rect)> {
        let start = self.first_row * self.columns;
        let end = ((self.first_row + self.visible_rows) * self.columns).min(self.count);
        (start..end).map(|i| (i, self.card_rect(i))).collect()
    }

    fn card_rect(&self, index: usize) -> Rect {
        let row = (index / self.columns - self.first_row) as u16;
        let col = (index % self.columns) as u16;
        let y = self.area.y + row * self.card_height;
        Rect {
            x: self.area.x + col * self.card_width,
            y,
            width: self.card_width,
            height: self
                .card_height
                .min(self.area.bottom().saturating_sub(y)),
        }
    }

    /// The card under a terminal cell, if any.
    pub fn hit(&self, position: Position) -> Option<usize> {
        self.card_rects()
            .into_iter()
            .find(|(_, rect)| rect.contains(position))
            .map(|(i, _)| i)
    }
}
