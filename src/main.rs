mod app;
mod catalog;
mod config;
mod launcher;
mod lists;
mod logging;
mod model;
mod notify;
mod store;
mod theme;
mod trailer;
mod ui;

use app::{App, InputMode, View};
use catalog::{CatalogClient, tmdb_page_url};
use clap::{Parser, Subcommand, ValueEnum};
use config::Config;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use launcher::SystemLauncher;
use lists::{ListKind, ListManager};
use model::MovieSummary;
use notify::Toasts;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use store::{FileBackend, Store};
use trailer::{select_trailer, youtube_url};

/// Terminal browser for TMDB movies with a saved favorites list and wishlist
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (default: platform config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory for saved lists and logs
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// TMDB API key (overrides config file and TMDB_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Keep saved lists in memory only
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the TUI browser (default)
    Run,
    /// Print the popular listing
    Popular,
    /// Search movies by title
    Search {
        /// Search text
        query: String,
    },
    /// Print one movie's details
    Detail {
        /// TMDB movie id
        id: u64,
    },
    /// Print the trailer link chosen for a movie
    Trailer {
        /// TMDB movie id
        id: u64,
    },
    /// Print saved movies
    Saved {
        /// Which list (default: both)
        list: Option<SavedList>,
    },
    /// Empty both saved lists
    Clear,
}

#[derive(Clone, Copy, ValueEnum)]
enum SavedList {
    Favorites,
    Wishlist,
}

impl From<SavedList> for ListKind {
    fn from(list: SavedList) -> Self {
        match list {
            SavedList::Favorites => ListKind::Favorites,
            SavedList::Wishlist => ListKind::Wishlist,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Run);

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_api_key(cli.api_key);
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = Some(dir);
    }
    let data_dir = data_dir_for(&config, &command, cli.ephemeral)?;

    // The TUI owns the terminal, so its logs go to a file
    let log_dir = match (&command, &data_dir) {
        (Commands::Run, Some(dir)) => Some(dir.clone()),
        (Commands::Run, None) => Some(std::env::temp_dir().join("movie-explorer")),
        _ => None,
    };
    logging::init_logging(cli.verbose, log_dir.as_deref())?;

    let store = match &data_dir {
        Some(dir) => {
            let dir = dir.clone();
            Store::new(FileBackend::new(&dir)).with_diagnostics(move |err| {
                tracing::error!(dir = %dir.display(), error = %err, "saved lists not persisted")
            })
        }
        None => Store::in_memory(),
    };
    tracing::debug!(data_dir = ?data_dir, ephemeral = cli.ephemeral, "store ready");

    match command {
        Commands::Saved { list } => {
            let lists = ListManager::load(store);
            let kinds = match list {
                Some(one) => vec![ListKind::from(one)],
                None => ListKind::ALL.to_vec(),
            };
            for kind in kinds {
                let saved = lists.list(kind);
                println!("{} ({})", kind.label(), saved.len());
                for movie in saved {
                    println!("{}", listing_row(movie));
                }
            }
        }
        Commands::Clear => {
            let mut lists = ListManager::load(store);
            let mut toasts = Toasts::default();
            lists.clear_all(&mut toasts);
            if let Some(message) = toasts.current() {
                println!("{}", message);
            }
        }
        Commands::Popular => {
            let catalog = CatalogClient::new(&config.api, config.api_key()?)?;
            print_listing(&catalog.fetch_popular().await?);
        }
        Commands::Search { query } => {
            let catalog = CatalogClient::new(&config.api, config.api_key()?)?;
            print_listing(&catalog.search(&query).await?);
        }
        Commands::Detail { id } => {
            let catalog = CatalogClient::new(&config.api, config.api_key()?)?;
            let detail = catalog.fetch_detail(id).await?;
            let movie = &detail.summary;
            match movie.year() {
                Some(year) => println!("{} ({})", movie.display_title(), year),
                None => println!("{}", movie.display_title()),
            }
            println!("Genres: {}", detail.genre_line());
            println!(
                "Rating: {} • Runtime: {}",
                movie.rating_label(),
                detail.runtime_label()
            );
            println!("Poster: {}", catalog.poster_url(movie.poster_path.as_deref()));
            match select_trailer(&detail) {
                Some(video) => println!("Trailer: {}", youtube_url(&video.key)),
                None => println!("Trailer: not available"),
            }
            println!("TMDB: {}", tmdb_page_url(movie.id));
            println!();
            println!(
                "{}",
                movie
                    .overview
                    .as_deref()
                    .filter(|o| !o.trim().is_empty())
                    .unwrap_or("No description available.")
            );
        }
        Commands::Trailer { id } => {
            let catalog = CatalogClient::new(&config.api, config.api_key()?)?;
            let detail = catalog.fetch_detail(id).await?;
            match select_trailer(&detail) {
                Some(video) => println!("{}", youtube_url(&video.key)),
                None => println!("Trailer not available for this movie."),
            }
        }
        Commands::Run => {
            // Key problems surface before the terminal is taken over
            let catalog = CatalogClient::new(&config.api, config.api_key()?)?;
            let lists = ListManager::load(store);
            let toasts = Toasts::new(config.ui.toast_ttl());

            let mut app = App::new(catalog, lists, toasts, Box::new(SystemLauncher));
            app.init();

            // Init terminal
            let mut terminal = ratatui::init();

            // Initial page size setup
            let size = terminal.size()?;
            app.update_page_size(size.height);

            // Main loop
            let result = run_app(&mut terminal, &mut app).await;

            // Restore terminal
            ratatui::restore();

            if let Err(e) = result {
                tracing::error!(error = %e, "terminal loop failed");
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

impl Commands {
    /// Whether the command reads or writes saved lists.
    fn uses_store(&self) -> bool {
        matches!(self, Commands::Run | Commands::Saved { .. } | Commands::Clear)
    }
}

/// Directory for saved lists, or `None` when nothing is persisted this run.
fn data_dir_for(
    config: &Config,
    command: &Commands,
    ephemeral: bool,
) -> Result<Option<PathBuf>, config::ConfigError> {
    if ephemeral || !command.uses_store() {
        return Ok(None);
    }
    config.data_dir().map(Some)
}

fn listing_row(movie: &MovieSummary) -> String {
    format!(
        "{:>8}  {}  ({})  ★ {}",
        movie.id,
        movie.display_title(),
        movie.year().unwrap_or_else(|| "—".to_string()),
        movie.rating_label()
    )
}

fn print_listing(movies: &[MovieSummary]) {
    if movies.is_empty() {
        println!("No movies found");
    }
    for movie in movies {
        println!("{}", listing_row(movie));
    }
}

async fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Poll for events with a 250ms timeout
        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Press {
                        handle_key(app, key);
                    }
                }
                Event::Resize(_, height) => {
                    app.update_page_size(height);
                }
                _ => {}
            }
        }

        app.tick(Instant::now());
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Help toggle (global)
    if key.code == KeyCode::Char('?') && app.input_mode == InputMode::Normal {
        app.show_help = !app.show_help;
        return;
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.input_mode == InputMode::Editing {
        handle_search_input(app, key);
        return;
    }
    match app.view {
        View::Grid => handle_grid_key(app, key),
        View::Detail => handle_detail_key(app, key),
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_search(),
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Backspace => {
            app.query.pop();
        }
        KeyCode::Char(c) => app.query.push(c),
        _ => {}
    }
}

fn handle_grid_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('/') => app.input_mode = InputMode::Editing,
        KeyCode::Down | KeyCode::Char('j') => app.next(),
        KeyCode::Up | KeyCode::Char('k') => app.prev(),
        KeyCode::PageDown => app.page_down(),
        KeyCode::PageUp => app.page_up(),
        KeyCode::Char('g') | KeyCode::Home => app.first(),
        KeyCode::Char('G') | KeyCode::End => app.last(),
        KeyCode::Enter => app.open_detail(),
        KeyCode::Char('f') => {
            app.toggle_favorite();
        }
        KeyCode::Char('w') => {
            app.toggle_wishlist();
        }
        KeyCode::Char('s') => app.share(),
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('C') => app.clear_saved(),
        KeyCode::Char('r') => app.load_popular(),
        KeyCode::Esc => {
            // Clear search
            if !app.query.is_empty() || !app.shown_query.is_empty() {
                app.query.clear();
                app.load_popular();
            }
        }
        _ => {}
    }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_detail(),
        KeyCode::Char('p') | KeyCode::Enter => app.play_trailer(),
        KeyCode::Char('f') => {
            app.toggle_favorite();
        }
        KeyCode::Char('w') => {
            app.toggle_wishlist();
        }
        KeyCode::Char('s') => app.share(),
        KeyCode::Char('o') => app.open_tmdb_page(),
        KeyCode::Char('t') => app.toggle_theme(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_commands() {
        let cli = Cli::try_parse_from(["movie-explorer", "search", "Inception", "-v"]).unwrap();
        assert_eq!(cli.verbose, 1);
        assert!(matches!(cli.command, Some(Commands::Search { ref query }) if query == "Inception"));

        let cli = Cli::try_parse_from(["movie-explorer", "--ephemeral", "saved", "wishlist"]).unwrap();
        assert!(cli.ephemeral);
        assert!(matches!(
            cli.command,
            Some(Commands::Saved {
                list: Some(SavedList::Wishlist)
            })
        ));

        let cli = Cli::try_parse_from(["movie-explorer"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_rejects_bad_id() {
        assert!(Cli::try_parse_from(["movie-explorer", "detail", "abc"]).is_err());
    }

    #[test]
    fn test_data_dir_only_for_persisting_commands() {
        let mut config = Config::default();
        config.storage.data_dir = Some(PathBuf::from("/tmp/movies"));

        assert_eq!(
            data_dir_for(&config, &Commands::Run, false).unwrap(),
            Some(PathBuf::from("/tmp/movies"))
        );
        assert_eq!(
            data_dir_for(&config, &Commands::Clear, false).unwrap(),
            Some(PathBuf::from("/tmp/movies"))
        );
        assert_eq!(data_dir_for(&config, &Commands::Run, true).unwrap(), None);
        assert_eq!(data_dir_for(&config, &Commands::Saved { list: None }, true).unwrap(), None);
        assert_eq!(data_dir_for(&config, &Commands::Popular, false).unwrap(), None);
        assert_eq!(
            data_dir_for(
                &config,
                &Commands::Search {
                    query: "Heat".to_string()
                },
                false
            )
            .unwrap(),
            None
        );
    }

    #[test]
    fn test_listing_row() {
        let mut movie = model::tests::summary(27205, "Inception");
        movie.release_date = Some("2010-07-15".to_string());
        movie.vote_average = Some(8.369);
        assert_eq!(listing_row(&movie), "   27205  Inception  (2010)  ★ 8.4");
    }
}
