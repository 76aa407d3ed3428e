use crate::catalog::{CatalogClient, FetchError, tmdb_page_url};
use crate::launcher::Launcher;
use crate::lists::{ListKind, ListManager};
use crate::model::{MovieDetail, MovieSummary, share_text};
use crate::notify::Toasts;
use crate::theme::Theme;
use crate::trailer::{select_trailer, youtube_url};
use std::time::Instant;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

/// Which view is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Grid,
    Detail,
}

/// Input mode for the search bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// What produced a listing, so failures get the right notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingKind {
    Popular,
    Search,
}

impl ListingKind {
    fn failure_notice(self) -> &'static str {
        match self {
            Self::Popular => "Unable to fetch movies. Check network or API key.",
            Self::Search => "Search failed. Try again.",
        }
    }
}

/// Completed catalog request, sent back from the task that ran it.
#[derive(Debug)]
pub enum CatalogEvent {
    Listing {
        ticket: u64,
        kind: ListingKind,
        query: String,
        result: Result<Vec<MovieSummary>, FetchError>,
    },
    Detail {
        ticket: u64,
        id: u64,
        result: Result<MovieDetail, FetchError>,
    },
}

pub const LIST_OVERHEAD: u16 = 9;

/// Main application state. Every mutation goes through a method here.
pub struct App {
    pub should_quit: bool,
    pub view: View,
    pub show_help: bool,

    // Search bar
    pub query: String,
    pub input_mode: InputMode,
    /// Query that produced `movies`; empty for the popular listing.
    pub shown_query: String,

    // Result list
    pub movies: Vec<MovieSummary>,
    pub selected: usize,
    pub page_size: usize,

    // Detail overlay
    pub detail: Option<MovieDetail>,

    pub lists: ListManager,
    pub toasts: Toasts,
    pub catalog: CatalogClient,
    pub status_msg: String,

    launcher: Box<dyn Launcher>,
    events_tx: UnboundedSender<CatalogEvent>,
    events_rx: UnboundedReceiver<CatalogEvent>,
    listing_ticket: u64,
    detail_ticket: u64,
}

impl App {
    pub fn new(
        catalog: CatalogClient,
        lists: ListManager,
        toasts: Toasts,
        launcher: Box<dyn Launcher>,
    ) -> Self {
        let (events_tx, events_rx) = unbounded_channel();
        Self {
            should_quit: false,
            view: View::Grid,
            show_help: false,

            query: String::new(),
            input_mode: InputMode::Normal,
            shown_query: String::new(),

            movies: Vec::new(),
            selected: 0,
            page_size: 20, // Updated on first render/resize

            detail: None,

            lists,
            toasts,
            catalog,
            status_msg: "Loading movies...".to_string(),

            launcher,
            events_tx,
            events_rx,
            listing_ticket: 0,
            detail_ticket: 0,
        }
    }

    /// Initial data load.
    pub fn init(&mut self) {
        self.load_popular();
    }

    pub fn is_loading(&self) -> bool {
        self.catalog.is_loading()
    }

    pub fn theme(&self) -> Theme {
        self.lists.theme()
    }

    // ── Catalog requests ──

    pub fn load_popular(&mut self) {
        self.spawn_listing(ListingKind::Popular, String::new());
    }

    /// Run the search typed into the bar. A blank query shows the popular listing.
    pub fn submit_search(&mut self) {
        self.input_mode = InputMode::Normal;
        let query = self.query.trim().to_string();
        if query.is_empty() {
            self.load_popular();
        } else {
            self.spawn_listing(ListingKind::Search, query);
        }
    }

    fn spawn_listing(&mut self, kind: ListingKind, query: String) {
        self.listing_ticket += 1;
        let ticket = self.listing_ticket;
        let catalog = self.catalog.clone();
        let tx = self.events_tx.clone();
        tracing::info!(ticket, ?kind, %query, "listing requested");
        tokio::spawn(async move {
            let result = match kind {
                ListingKind::Popular => catalog.fetch_popular().await,
                ListingKind::Search => catalog.search(&query).await,
            };
            let _ = tx.send(CatalogEvent::Listing {
                ticket,
                kind,
                query,
                result,
            });
        });
    }

    /// Fetch the detail record for the selected movie; the overlay opens
    /// when it arrives.
    pub fn open_detail(&mut self) {
        let Some(id) = self.selected_movie().map(|m| m.id) else {
            return;
        };
        self.detail_ticket += 1;
        let ticket = self.detail_ticket;
        let catalog = self.catalog.clone();
        let tx = self.events_tx.clone();
        tracing::info!(ticket, id, "detail requested");
        tokio::spawn(async move {
            let result = catalog.fetch_detail(id).await;
            let _ = tx.send(CatalogEvent::Detail { ticket, id, result });
        });
    }

    pub fn close_detail(&mut self) {
        self.view = View::Grid;
        self.detail = None;
    }

    /// Apply any results that arrived since the last call.
    pub fn pump_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_catalog_event(event);
        }
    }

    /// Apply a finished request. Responses superseded by a newer request of
    /// the same kind are dropped.
    pub fn handle_catalog_event(&mut self, event: CatalogEvent) {
        match event {
            CatalogEvent::Listing {
                ticket,
                kind,
                query,
                result,
            } => {
                if ticket != self.listing_ticket {
                    tracing::debug!(ticket, latest = self.listing_ticket, "stale listing dropped");
                    return;
                }
                match result {
                    Ok(movies) => {
                        self.status_msg = if query.is_empty() {
                            format!("{} popular movies", movies.len())
                        } else {
                            format!("{} results for \"{}\"", movies.len(), query)
                        };
                        self.movies = movies;
                        self.shown_query = query;
                        self.selected = 0;
                    }
                    Err(e) => {
                        tracing::error!(?kind, error = %e, "listing failed");
                        self.toasts.notify(kind.failure_notice());
                    }
                }
            }
            CatalogEvent::Detail { ticket, id, result } => {
                if ticket != self.detail_ticket {
                    tracing::debug!(ticket, latest = self.detail_ticket, "stale detail dropped");
                    return;
                }
                match result {
                    Ok(detail) => {
                        self.detail = Some(detail);
                        self.view = View::Detail;
                    }
                    Err(e) => {
                        tracing::error!(id, error = %e, "detail failed");
                        self.toasts.notify("Failed to load movie details.");
                    }
                }
            }
        }
    }

    // ── Saved lists ──

    /// The open detail's movie, else the selected row.
    pub fn focused_movie(&self) -> Option<&MovieSummary> {
        match (&self.view, &self.detail) {
            (View::Detail, Some(detail)) => Some(&detail.summary),
            _ => self.selected_movie(),
        }
    }

    pub fn toggle_list(&mut self, kind: ListKind) -> Option<bool> {
        let movie = self.focused_movie()?.clone();
        Some(self.lists.toggle(kind, &movie, &mut self.toasts))
    }

    pub fn toggle_favorite(&mut self) -> Option<bool> {
        self.toggle_list(ListKind::Favorites)
    }

    pub fn toggle_wishlist(&mut self) -> Option<bool> {
        self.toggle_list(ListKind::Wishlist)
    }

    pub fn clear_saved(&mut self) {
        self.lists.clear_all(&mut self.toasts);
    }

    pub fn toggle_theme(&mut self) {
        let theme = self.lists.toggle_theme();
        self.status_msg = format!("{} theme", theme.label());
    }

    // ── Outbound actions ──

    pub fn share(&mut self) {
        let Some(movie) = self.focused_movie() else {
            return;
        };
        let text = share_text(movie);
        match self.launcher.copy_to_clipboard(&text) {
            Ok(()) => self.toasts.notify("Movie details copied to clipboard"),
            Err(e) => {
                tracing::warn!(error = %e, "share failed");
                self.toasts.notify("Clipboard not available");
            }
        }
    }

    pub fn play_trailer(&mut self) {
        let Some(detail) = &self.detail else {
            return;
        };
        let Some(video) = select_trailer(detail) else {
            self.toasts.notify("Trailer not available for this movie.");
            return;
        };
        let url = youtube_url(&video.key);
        if let Err(e) = self.launcher.open_url(&url) {
            tracing::warn!(error = %e, "trailer launch failed");
            self.toasts.notify(format!("Open manually: {}", url));
        }
    }

    pub fn open_tmdb_page(&mut self) {
        let Some(movie) = self.focused_movie() else {
            return;
        };
        let url = tmdb_page_url(movie.id);
        if let Err(e) = self.launcher.open_url(&url) {
            tracing::warn!(error = %e, "tmdb page launch failed");
            self.toasts.notify(format!("Open manually: {}", url));
        }
    }

    // ── Navigation ──

    pub fn selected_movie(&self) -> Option<&MovieSummary> {
        self.movies.get(self.selected)
    }

    /// Update page size based on terminal height.
    pub fn update_page_size(&mut self, terminal_height: u16) {
        let new_size = terminal_height.saturating_sub(LIST_OVERHEAD) as usize;
        self.page_size = new_size.max(1);
    }

    pub fn next(&mut self) {
        if self.selected + 1 < self.movies.len() {
            self.selected += 1;
        }
    }

    pub fn prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn page_down(&mut self) {
        let last = self.movies.len().saturating_sub(1);
        self.selected = (self.selected + self.page_size).min(last);
    }

    pub fn page_up(&mut self) {
        self.selected = self.selected.saturating_sub(self.page_size);
    }

    pub fn first(&mut self) {
        self.selected = 0;
    }

    pub fn last(&mut self) {
        self.selected = self.movies.len().saturating_sub(1);
    }

    /// Periodic housekeeping from the main loop.
    pub fn tick(&mut self, now: Instant) {
        self.pump_events();
        self.toasts.tick(now);
    }
}
