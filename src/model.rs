use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A movie as returned by the list and search endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

impl MovieSummary {
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Movie"
        } else {
            &self.title
        }
    }

    /// Release year, when the date is a well-formed `YYYY-MM-DD`.
    pub fn year(&self) -> Option<String> {
        let date = self.release_date.as_deref()?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()
            .map(|d| d.year().to_string())
    }

    pub fn rating_label(&self) -> String {
        match self.vote_average {
            Some(v) => format!("{:.1}", v),
            None => "-".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// One entry of a detail record's embedded video list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRef {
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub site: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VideoList {
    pub results: Vec<VideoRef>,
}

/// Full record for the detail overlay, fetched on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub summary: MovieSummary,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub videos: Option<VideoList>,
    #[serde(default)]
    pub credits: serde_json::Value,
}

impl MovieDetail {
    pub fn videos(&self) -> &[VideoRef] {
        self.videos.as_ref().map_or(&[], |v| v.results.as_slice())
    }

    pub fn genre_line(&self) -> String {
        self.genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(" • ")
    }

    pub fn runtime_label(&self) -> String {
        match self.runtime {
            Some(m) if m > 0 => format!("{}m", m),
            _ => "N/A".to_string(),
        }
    }
}

/// Plain-text blurb handed to the clipboard by the share action.
pub fn share_text(movie: &MovieSummary) -> String {
    let title = movie.display_title();
    let overview = movie.overview.as_deref().unwrap_or("");
    match movie.year() {
        Some(year) => format!("{} ({})\n\n{}", title, year, overview),
        None => format!("{}\n\n{}", title, overview),
    }
}
