use crate::model::{MovieDetail, VideoRef};

const TRAILER_SITE: &str = "YouTube";

/// Name fragments in order of preference.
const PREFERRED_NAMES: [&str; 3] = ["Official Trailer", "Trailer", "Official"];

/// Pick the video to play for a detail record.
///
/// Only YouTube entries qualify. The first preferred name fragment that any
/// entry contains (case-insensitively) wins, taking the earliest such entry;
/// with no match the first YouTube entry is used.
pub fn select_trailer(detail: &MovieDetail) -> Option<&VideoRef> {
    let candidates: Vec<&VideoRef> = detail
        .videos()
        .iter()
        .filter(|v| v.site == TRAILER_SITE)
        .collect();

    let first = *candidates.first()?;

    for preferred in PREFERRED_NAMES {
        let needle = preferred.to_lowercase();
        if let Some(found) = candidates
            .iter()
            .find(|v| v.name.to_lowercase().contains(&needle))
        {
            return Some(*found);
        }
    }

    Some(first)
}

pub fn youtube_url(key: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", key)
}
