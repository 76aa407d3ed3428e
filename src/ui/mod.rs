mod detail;
mod grid;
mod help;

use crate::app::{App, View};
use crate::theme::Palette;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Top-level render dispatch.
pub fn render(app: &App, frame: &mut Frame) {
    let palette = app.theme().palette();

    // The grid stays visible underneath the detail overlay
    grid::render(app, frame, &palette);
    if app.view == View::Detail {
        detail::render(app, frame, &palette);
    }

    // Render help overlay on top if active
    if app.show_help {
        help::render(frame, &palette);
    }
}

/// Truncate a string to `max_width` display columns, adding "…" if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let budget = max_width.saturating_sub(1);
    let mut used = 0;
    let mut result = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        result.push(c);
    }
    result.push('…');
    result
}

/// A bold key label followed by its description, for status bars.
fn hint<'a>(key: &'a str, action: &'a str, palette: &Palette) -> [Span<'a>; 2] {
    [
        Span::styled(
            key,
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(action),
    ]
}

/// Create a centered rectangle using percentage of parent area.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string_untouched() {
        assert_eq!(truncate_str("Inception", 20), "Inception");
    }

    #[test]
    fn test_truncate_adds_ellipsis() {
        assert_eq!(truncate_str("The Lord of the Rings", 8), "The Lor…");
    }

    #[test]
    fn test_truncate_counts_wide_characters() {
        // Each CJK character is two columns wide
        assert_eq!(truncate_str("千と千尋の神隠し", 7), "千と千…");
    }

    #[test]
    fn test_centered_rect_is_inside_parent() {
        let parent = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(60, 40, parent);
        assert!(inner.x >= parent.x && inner.right() <= parent.right());
        assert!(inner.y >= parent.y && inner.bottom() <= parent.bottom());
        assert_eq!(inner.width, 60);
        assert_eq!(inner.height, 20);
    }
}
