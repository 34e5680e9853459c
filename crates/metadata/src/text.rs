//! Small text conversions shared by the reader and the writer.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static RE_HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static RE_YOUTUBE_PLUGIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)plugin://plugin\.video\.youtube/\?action=play_video&videoid=").unwrap()
});

static RE_YOUTUBE_WATCH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)https?://(www\.)?youtube\.com/watch\?v=").unwrap());

const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";
const YOUTUBE_PLUGIN_URL: &str = "plugin://plugin.video.youtube/?action=play_video&videoid=";

/// Rewrite a Kodi YouTube plugin link into a browser watch URL.
pub fn trailer_from_nfo(url: &str) -> String {
    RE_YOUTUBE_PLUGIN
        .replace(url.trim(), YOUTUBE_WATCH_URL)
        .into_owned()
}

/// Rewrite a YouTube watch URL into the Kodi plugin form.
pub fn trailer_to_nfo(url: &str) -> String {
    RE_YOUTUBE_WATCH
        .replace(url.trim(), YOUTUBE_PLUGIN_URL)
        .into_owned()
}

pub fn strip_html(s: &str) -> Cow<'_, str> {
    RE_HTML_TAG.replace_all(s, "")
}

fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

/// Drop characters XML 1.0 cannot represent.
pub fn sanitize(s: &str) -> Cow<'_, str> {
    if s.chars().all(is_xml_char) {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(s.chars().filter(|&c| is_xml_char(c)).collect())
    }
}

/// Whether `name` can be used as an element name without escaping.
pub fn is_valid_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    !name.to_ascii_lowercase().starts_with("xml")
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Split a director/writer value into names.
///
/// Pipes or semicolons, when present, are the only separators, so
/// `Matthew, Jr.|Jane Doe` keeps the comma inside the first name. Without
/// them the value is split on commas.
pub fn split_names(value: &str) -> Vec<String> {
    let parts: Vec<&str> = if value.contains('|') || value.contains(';') {
        value.split(['|', ';']).collect()
    } else {
        value.split(',').collect()
    };
    parts
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split on `/`, trimming and dropping empty parts.
pub fn split_slash(value: &str) -> impl Iterator<Item = &str> {
    value.split('/').map(str::trim).filter(|s| !s.is_empty())
}

/// Float that may use a decimal comma.
pub fn parse_float(value: &str) -> Option<f32> {
    value
        .trim()
        .replace(',', ".")
        .parse::<f32>()
        .ok()
        .filter(|f| f.is_finite())
}

pub fn parse_int(value: &str) -> Option<i32> {
    value.trim().parse().ok()
}

pub fn parse_bool(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case("true") || value == "1"
}
