use super::{centered_rect, hint};
use crate::app::App;
use crate::lists::ListKind;
use crate::model::MovieDetail;
use crate::theme::Palette;
use crate::trailer::select_trailer;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

const CAST_SHOWN: usize = 5;

pub fn render(app: &App, frame: &mut Frame, palette: &Palette) {
    let detail = match &app.detail {
        Some(d) => d,
        None => return,
    };
    let movie = &detail.summary;
    let area = centered_rect(80, 80, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .style(Style::default().bg(palette.background).fg(palette.text))
        .title(format!(" {} ", movie.display_title()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Layout: meta(6) + overview(min) + hints(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(inner);

    // ── Metadata ──
    let label = Style::default().fg(palette.muted);
    let trailer = match select_trailer(detail) {
        Some(video) if !video.name.is_empty() => Span::styled(
            format!("available ({})", video.name),
            Style::default().fg(palette.accent),
        ),
        Some(_) => Span::styled("available", Style::default().fg(palette.accent)),
        None => Span::styled("not available", Style::default().fg(palette.error)),
    };
    let mut badges = vec![Span::styled(" Saved: ", label)];
    if app.lists.is_member(ListKind::Favorites, movie.id) {
        badges.push(Span::styled("♥ Favorite  ", Style::default().fg(palette.favorite)));
    }
    if app.lists.is_member(ListKind::Wishlist, movie.id) {
        badges.push(Span::styled("◆ Wishlist", Style::default().fg(palette.wishlist)));
    }
    if badges.len() == 1 {
        badges.push(Span::styled("-", label));
    }

    let meta_lines = vec![
        Line::from(vec![
            Span::styled(" Year: ", label),
            Span::raw(movie.year().unwrap_or_else(|| "—".to_string())),
            Span::raw("   "),
            Span::styled(
                format!("Rating: {} • Runtime: {}", movie.rating_label(), detail.runtime_label()),
                Style::default().fg(palette.rating),
            ),
        ]),
        Line::from(vec![Span::styled(" Genres: ", label), Span::raw(detail.genre_line())]),
        Line::from(vec![Span::styled(" Cast: ", label), Span::raw(cast_line(detail))]),
        Line::from(vec![Span::styled(" Trailer: ", label), trailer]),
        Line::from(badges),
        Line::from(vec![
            Span::styled(" Poster: ", label),
            Span::styled(
                app.catalog.poster_url(movie.poster_path.as_deref()),
                Style::default()
                    .fg(palette.link)
                    .add_modifier(Modifier::UNDERLINED),
            ),
        ]),
    ];
    frame.render_widget(Paragraph::new(meta_lines), chunks[0]);

    // ── Overview ──
    let overview = movie
        .overview
        .as_deref()
        .filter(|o| !o.trim().is_empty())
        .unwrap_or("No description available.");
    let body = Paragraph::new(overview)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(label)
                .title(" Overview "),
        );
    frame.render_widget(body, chunks[1]);

    // ── Key hints ──
    let mut spans = vec![Span::raw(" ")];
    for (key, action) in [
        ("p", " Trailer  "),
        ("f", " Fav  "),
        ("w", " Wish  "),
        ("s", " Share  "),
        ("o", " TMDB  "),
        ("Esc", " Close"),
    ] {
        spans.extend(hint(key, action, palette));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), chunks[2]);
}

/// First few billed cast members, or "N/A" when credits are absent.
fn cast_line(detail: &MovieDetail) -> String {
    let names: Vec<&str> = detail
        .credits
        .get("cast")
        .and_then(|c| c.as_array())
        .map(|cast| {
            cast.iter()
                .filter_map(|member| member.get("name").and_then(|n| n.as_str()))
                .take(CAST_SHOWN)
                .collect()
        })
        .unwrap_or_default();
    if names.is_empty() {
        "N/A".to_string()
    } else {
        names.join(", ")
    }
}
