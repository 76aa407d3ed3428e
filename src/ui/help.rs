use super::centered_rect;
use crate::theme::Palette;
use ratatui::{
    Frame,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Global",
        &[
            ("?", "Toggle this help"),
            ("t", "Toggle dark/light theme"),
            ("Ctrl+C", "Quit application"),
        ],
    ),
    (
        "Movie List",
        &[
            ("↑/k ↓/j", "Navigate up/down"),
            ("PgUp/PgDn", "Page up/down"),
            ("g/G", "Jump to first/last movie"),
            ("/", "Edit the search query"),
            ("Enter", "Open movie detail"),
            ("f / w", "Toggle favorite / wishlist"),
            ("s", "Copy movie details to clipboard"),
            ("C", "Clear saved lists"),
            ("r", "Reload popular movies"),
            ("Esc", "Clear search and show popular"),
            ("q", "Quit application"),
        ],
    ),
    (
        "Movie Detail",
        &[
            ("p / Enter", "Play trailer in browser"),
            ("f / w", "Toggle favorite / wishlist"),
            ("s", "Copy movie details to clipboard"),
            ("o", "Open TMDB page"),
            ("Esc / q", "Close detail"),
        ],
    ),
    (
        "Search Input",
        &[
            ("Type", "Enter search text"),
            ("Backspace", "Delete character"),
            ("Enter", "Run search (blank shows popular)"),
            ("Esc", "Cancel editing"),
        ],
    ),
];

pub fn render(frame: &mut Frame, palette: &Palette) {
    let area = centered_rect(70, 80, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let mut help_text = vec![Line::from("")];
    for (title, keys) in SECTIONS {
        help_text.push(Line::from(Span::styled(
            format!("  {}", title),
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )));
        for (key, action) in *keys {
            help_text.push(Line::from(vec![
                Span::styled(format!("    {:<12}", key), Style::default().fg(palette.rating)),
                Span::raw(*action),
            ]));
        }
        help_text.push(Line::from(""));
    }
    help_text.push(Line::from(Span::styled(
        "  Data provided by TMDB. Press ? or Esc to close.",
        Style::default().fg(palette.muted),
    )));

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent))
                .style(Style::default().bg(palette.background).fg(palette.text))
                .title(" Help "),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(help, area);
}
