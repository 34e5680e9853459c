//! Provider ids from pasted links.
//!
//! Users often drop a bare IMDb or TMDB URL into a sidecar (or after its
//! closing tag) instead of writing XML. Rules, applied independently:
//! - IMDb: the first `tt` followed by at least seven digits
//! - TMDB: the number right after the marker (`themoviedb.org/movie/` or
//!   `themoviedb.org/tv/`), ending at `-` or `/`
//! - TVDB (series only): the number after `thetvdb.com/?tab=series&id=`

use std::sync::LazyLock;

use nfo_core::provider_ids::provider;
use nfo_core::{ItemKind, ProviderIds};
use regex::Regex;

static RE_IMDB: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)tt\d{7,}").unwrap());

pub const TMDB_MOVIE_MARKER: &str = "themoviedb.org/movie/";
pub const TMDB_TV_MARKER: &str = "themoviedb.org/tv/";
pub const TVDB_SERIES_MARKER: &str = "thetvdb.com/?tab=series&id=";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkExtractor {
    tmdb_marker: String,
    tvdb: bool,
}

impl Default for LinkExtractor {
    fn default() -> Self {
        Self::new(TMDB_MOVIE_MARKER)
    }
}

impl LinkExtractor {
    pub fn new(tmdb_marker: impl Into<String>) -> Self {
        Self {
            tmdb_marker: tmdb_marker.into().to_ascii_lowercase(),
            tvdb: false,
        }
    }

    pub fn with_tvdb(mut self, enabled: bool) -> Self {
        self.tvdb = enabled;
        self
    }

    pub fn for_kind(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Series => Self::new(TMDB_TV_MARKER).with_tvdb(true),
            _ => Self::default(),
        }
    }

    pub fn extract(&self, text: &str) -> ProviderIds {
        let mut ids = ProviderIds::new();

        if let Some(m) = RE_IMDB.find(text) {
            ids.set(provider::IMDB, &m.as_str().to_ascii_lowercase());
        }

        if let Some(id) = number_after(text, &self.tmdb_marker) {
            ids.set(provider::TMDB, &id.to_string());
        }

        if self.tvdb {
            if let Some(id) = number_after(text, TVDB_SERIES_MARKER) {
                ids.set(provider::TVDB, &id.to_string());
            }
        }

        ids
    }
}

/// Positive integer immediately following `marker` (matched
/// case-insensitively).
fn number_after(text: &str, marker: &str) -> Option<u64> {
    let lower = text.to_ascii_lowercase();
    let start = lower.find(marker)? + marker.len();
    let token: &str = text[start..]
        .split(|c: char| matches!(c, '-' | '/' | '?' | '#' | '&' | '<') || c.is_whitespace())
        .next()?;
    token.parse::<u64>().ok().filter(|&n| n > 0)
}
