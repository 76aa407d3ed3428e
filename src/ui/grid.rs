use super::{hint, truncate_str};
use crate::app::{App, InputMode};
use crate::lists::ListKind;
use crate::theme::Palette;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use unicode_width::UnicodeWidthStr;

/// Saved entries shown per list in the sidebar.
const SIDEBAR_ROWS: usize = 6;

pub fn render(app: &App, frame: &mut Frame, palette: &Palette) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.text)),
        area,
    );

    // Layout: header(2) + search(3) + body(min) + toast(1) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    // ── Header ──
    let loading = if app.is_loading() { "  ⟳ loading" } else { "" };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " 🎬 Movie Explorer",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("   TMDB", Style::default().fg(palette.muted)),
        Span::styled(loading, Style::default().fg(palette.rating)),
    ]))
    .alignment(Alignment::Left)
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(palette.muted)),
    );
    frame.render_widget(header, chunks[0]);

    render_search_bar(app, frame, chunks[1], palette);

    // ── Body: sidebar | results ──
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(20)])
        .split(chunks[2]);
    render_sidebar(app, frame, body[0], palette);
    render_results(app, frame, body[1], palette);

    // ── Toast ──
    if let Some(message) = app.toasts.current() {
        let toast = Paragraph::new(format!(" {} ", message))
            .style(
                Style::default()
                    .fg(palette.background)
                    .bg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center);
        frame.render_widget(toast, chunks[3]);
    }

    // ── Status bar ──
    let mut spans = vec![Span::raw(" ")];
    for (key, action) in [
        ("↑↓", " Navigate  "),
        ("/", " Search  "),
        ("Enter", " Detail  "),
        ("f", " Fav  "),
        ("w", " Wish  "),
        ("s", " Share  "),
        ("t", " Theme  "),
        ("?", " Help  "),
        ("q", " Quit  "),
    ] {
        spans.extend(hint(key, action, palette));
    }
    spans.push(Span::styled(&app.status_msg, Style::default().fg(palette.muted)));
    frame.render_widget(Paragraph::new(Line::from(spans)), chunks[4]);
}

fn render_search_bar(app: &App, frame: &mut Frame, area: Rect, palette: &Palette) {
    let editing = app.input_mode == InputMode::Editing;
    let style = if editing {
        Style::default().fg(palette.rating)
    } else {
        Style::default().fg(palette.muted)
    };
    let label = if editing {
        " 🔍 Search (Enter to run, Esc to cancel): "
    } else {
        " 🔍 Search (/): "
    };
    let placeholder = !editing && app.query.is_empty();
    let text = if placeholder {
        format!("{}e.g. Inception", label)
    } else {
        format!("{}{}", label, app.query)
    };
    let bar = Paragraph::new(text).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(style)
            .title(" Search "),
    );
    frame.render_widget(bar, area);

    // Set cursor position when editing
    if editing {
        let typed = UnicodeWidthStr::width(label) + UnicodeWidthStr::width(app.query.as_str());
        let cursor_x = area.x + 1 + typed.min(u16::MAX as usize) as u16;
        frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn render_sidebar(app: &App, frame: &mut Frame, area: Rect, palette: &Palette) {
    let mut lines = Vec::new();
    for kind in ListKind::ALL {
        let (icon, color, empty) = match kind {
            ListKind::Favorites => ("♥", palette.favorite, "No favorites yet"),
            ListKind::Wishlist => ("🔖", palette.wishlist, "No wishlist yet"),
        };
        let saved = app.lists.list(kind);
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {} {}", icon, kind.label()),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" ({})", saved.len()), Style::default().fg(palette.muted)),
        ]));
        if saved.is_empty() {
            lines.push(Line::styled(format!("   {}", empty), Style::default().fg(palette.muted)));
        }
        for movie in saved.iter().take(SIDEBAR_ROWS) {
            let width = (area.width as usize).saturating_sub(6);
            lines.push(Line::from(format!("   {}", truncate_str(movie.display_title(), width))));
        }
        lines.push(Line::from(""));
    }
    lines.push(Line::styled(" C: clear saved", Style::default().fg(palette.muted)));

    let sidebar = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.muted))
            .title(" Saved "),
    );
    frame.render_widget(sidebar, area);
}

fn render_results(app: &App, frame: &mut Frame, area: Rect, palette: &Palette) {
    let title = if app.shown_query.is_empty() {
        " Popular ".to_string()
    } else {
        format!(" Results for \"{}\" ", app.shown_query)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.muted))
        .title(title);

    if app.movies.is_empty() {
        let message = if app.is_loading() {
            "Loading movies..."
        } else {
            "No movies found"
        };
        let empty = Paragraph::new(message)
            .style(Style::default().fg(palette.muted))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let title_width = (area.width as usize).saturating_sub(24);
    let items: Vec<ListItem> = app
        .movies
        .iter()
        .map(|movie| {
            let fav = app.lists.is_member(ListKind::Favorites, movie.id);
            let wish = app.lists.is_member(ListKind::Wishlist, movie.id);
            let line = Line::from(vec![
                Span::styled(
                    if fav { "♥ " } else { "  " },
                    Style::default().fg(palette.favorite),
                ),
                Span::styled(
                    if wish { "◆ " } else { "  " },
                    Style::default().fg(palette.wishlist),
                ),
                Span::raw(format!(
                    "{:<width$}",
                    truncate_str(movie.display_title(), title_width),
                    width = title_width
                )),
                Span::styled(
                    format!(" ★ {:>4}", movie.rating_label()),
                    Style::default().fg(palette.rating),
                ),
                Span::styled(
                    format!("  {}", movie.year().unwrap_or_else(|| "—".to_string())),
                    Style::default().fg(palette.muted),
                ),
            ]);
            ListItem::new(line)
        })
        .collect();

    let position = format!(" {} of {} ", app.selected + 1, app.movies.len());
    let list_widget = List::new(items)
        .block(block.title_bottom(Line::from(position).alignment(Alignment::Right)))
        .highlight_style(
            Style::default()
                .bg(palette.highlight_bg)
                .fg(palette.text)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let mut list_state = ListState::default();
    list_state.select(Some(app.selected));
    frame.render_stateful_widget(list_widget, area, &mut list_state);
}
