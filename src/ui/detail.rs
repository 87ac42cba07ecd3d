//! Detail panel overlay for the selected movie.
//!
//! Drawn centered over the grid with a slide-from-top entrance. The `[x]`
//! close control sits in the top border; `panel_area` and
//! `close_button_area` are also used by `App` for mouse hit-testing.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::catalog::detail::MovieDetails;
use crate::catalog::image::ImageSlot;
use crate::modal::DetailView;
use crate::theme;

/// Where the panel sits once fully slid in.
pub fn panel_area(viewport: Rect) -> Rect {
    centered_rect(80, 80, viewport)
}

/// Where the panel is drawn right now, part-way through its slide-in.
/// Mouse hit-testing uses this, not the final position.
pub fn rendered_area(viewport: Rect, view: &DetailView) -> Rect {
    slide_from_top(panel_area(viewport), view.slide)
}

/// Largest useful scroll offset: wrapped body rows minus the rows that fit
/// inside the panel borders.
pub fn max_scroll(viewport: Rect, details: &MovieDetails) -> u16 {
    let panel = panel_area(viewport);
    let inner_width = panel.width.saturating_sub(2);
    let inner_height = panel.height.saturating_sub(2);
    let rows = Paragraph::new(body_lines(details))
        .wrap(Wrap { trim: false })
        .line_count(inner_width);
    u16::try_from(rows)
        .unwrap_or(u16::MAX)
        .saturating_sub(inner_height)
}

/// The clickable `[x]` in the panel's top border.
pub fn close_button_area(panel: Rect) -> Rect {
    let width = theme::CLOSE_BUTTON.len() as u16;
    Rect {
        x: panel.right().saturating_sub(width + 2).max(panel.x),
        y: panel.y,
        width: width.min(panel.width),
        height: panel.height.min(1),
    }
}

/// Body text of the panel, before wrapping.
pub fn body_lines(details: &MovieDetails) -> Vec<Line<'static>> {
    let field = |label: &'static str, value: String, style| {
        Line::from(vec![
            Span::styled(label, theme::label()),
            Span::styled(value, style),
        ])
    };

    let mut lines = vec![
        Line::from(""),
        field("Director: ", details.director.clone(), theme::text()),
        field("Rating: ", details.rating.clone(), theme::highlight()),
        field("Release Date: ", details.release_date.clone(), theme::text()),
        field("Plot: ", details.plot.clone(), theme::text()),
        field("Poster: ", image_label(&details.poster), theme::dim()),
        Line::from(""),
        Line::from(Span::styled("── Cast ──", theme::title())),
        Line::from(""),
    ];

    if details.cast.is_empty() {
        lines.push(Line::from(Span::styled(
            "No cast information available.",
            theme::dim(),
        )));
    } else {
        for member in &details.cast {
            lines.push(Line::from(vec![
                Span::styled("  • ", theme::title()),
                Span::styled(member.name.clone(), theme::text()),
                Span::styled(format!("  {}", image_label(&member.photo)), theme::dim()),
            ]));
        }
    }
    lines
}

/// URL of an image slot, flagged once its fallback has been swapped in.
fn image_label(slot: &ImageSlot) -> String {
    if slot.handles_errors() {
        slot.src().to_string()
    } else {
        format!("{} (unavailable)", slot.src())
    }
}

pub fn render(frame: &mut Frame, details: &MovieDetails, view: &DetailView) {
    let area = rendered_area(frame.area(), view);

    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(Span::styled(format!(" {} ", details.heading()), theme::title()))
        .title_top(
            Line::from(Span::styled(
                format!("{} ", theme::CLOSE_BUTTON),
                theme::error(),
            ))
            .right_aligned(),
        )
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_active());

    let paragraph = Paragraph::new(body_lines(details))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((view.scroll, 0));

    frame.render_widget(paragraph, area);
}

/// Compute a centered rectangle (safe, no raw indexing).
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = (area.width as u32 * percent_x.min(100) as u32 / 100) as u16;
    let height = (area.height as u32 * percent_y.min(100) as u32 / 100) as u16;
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect { x, y, width, height }
}

/// Apply a slide-from-top animation to a rect. `progress` is 0.0 → 1.0.
fn slide_from_top(target: Rect, progress: f32) -> Rect {
    let progress = progress.clamp(0.0, 1.0);
    let offset = ((1.0 - progress) * target.y as f32) as u16;
    Rect {
        y: target.y.saturating_sub(offset),
        ..target
    }
}
