use crate::model::MovieSummary;
use crate::notify::Toasts;
use crate::store::{FAVORITES_KEY, Store, THEME_KEY, WISHLIST_KEY};
use crate::theme::Theme;
use std::collections::HashSet;

/// The two saved lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Favorites,
    Wishlist,
}

impl ListKind {
    pub const ALL: [ListKind; 2] = [Self::Favorites, Self::Wishlist];

    pub fn label(self) -> &'static str {
        match self {
            Self::Favorites => "Favorites",
            Self::Wishlist => "Wishlist",
        }
    }

    fn store_key(self) -> &'static str {
        match self {
            Self::Favorites => FAVORITES_KEY,
            Self::Wishlist => WISHLIST_KEY,
        }
    }
}

/// Owner of everything persisted: both saved lists and the theme flag.
/// Every mutation is written through to the store before returning.
#[derive(Debug)]
pub struct ListManager {
    store: Store,
    favorites: Vec<MovieSummary>,
    wishlist: Vec<MovieSummary>,
    theme: Theme,
}

impl ListManager {
    /// Load both lists and the theme from `store`.
    pub fn load(store: Store) -> Self {
        let favorites = dedup_by_id(store.load(FAVORITES_KEY, Vec::new()));
        let wishlist = dedup_by_id(store.load(WISHLIST_KEY, Vec::new()));
        let theme = Theme::from_dark_flag(store.load(THEME_KEY, true));
        tracing::info!(
            favorites = favorites.len(),
            wishlist = wishlist.len(),
            theme = theme.label(),
            "saved state loaded"
        );
        Self {
            store,
            favorites,
            wishlist,
            theme,
        }
    }

    pub fn list(&self, kind: ListKind) -> &[MovieSummary] {
        match kind {
            ListKind::Favorites => &self.favorites,
            ListKind::Wishlist => &self.wishlist,
        }
    }

    fn list_mut(&mut self, kind: ListKind) -> &mut Vec<MovieSummary> {
        match kind {
            ListKind::Favorites => &mut self.favorites,
            ListKind::Wishlist => &mut self.wishlist,
        }
    }

    pub fn is_member(&self, kind: ListKind, id: u64) -> bool {
        self.list(kind).iter().any(|m| m.id == id)
    }

    /// Remove `movie` if present, otherwise put it at the front.
    /// Returns whether it is a member afterwards.
    pub fn toggle(&mut self, kind: ListKind, movie: &MovieSummary, toasts: &mut Toasts) -> bool {
        let list = self.list_mut(kind);
        let member = match list.iter().position(|m| m.id == movie.id) {
            Some(index) => {
                list.remove(index);
                toasts.notify(format!("Removed from {}", kind.label()));
                false
            }
            None => {
                list.insert(0, movie.clone());
                toasts.notify(format!("Added to {}", kind.label()));
                true
            }
        };
        tracing::debug!(list = kind.label(), id = movie.id, member, "toggled");
        self.persist(kind);
        member
    }

    /// Empty both lists.
    pub fn clear_all(&mut self, toasts: &mut Toasts) {
        self.favorites.clear();
        self.wishlist.clear();
        for kind in ListKind::ALL {
            self.persist(kind);
        }
        toasts.notify("Saved lists cleared");
        tracing::info!("saved lists cleared");
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.store.save(THEME_KEY, &self.theme.is_dark());
        self.theme
    }

    fn persist(&mut self, kind: ListKind) {
        let list = match kind {
            ListKind::Favorites => &self.favorites,
            ListKind::Wishlist => &self.wishlist,
        };
        self.store.save(kind.store_key(), list);
    }
}

/// Keep the first occurrence of each id.
fn dedup_by_id(movies: Vec<MovieSummary>) -> Vec<MovieSummary> {
    let mut seen = HashSet::new();
    movies.into_iter().filter(|m| seen.insert(m.id)).collect()
}
