use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::provider_ids::provider;

/// Options consumed by the reader and writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NfoOptions {
    /// .NET-style pattern for `aired`, `premiered`, `releasedate`, `enddate`.
    pub release_date_format: String,
    pub save_image_paths_in_nfo: bool,
    /// Try `movie.nfo` before `{basename}.nfo`.
    pub prefer_alternate_movie_name: bool,
    /// Watch-state elements are only managed when a user is targeted.
    pub target_user_id: Option<String>,
    /// Provider names recognised as `<name>id` elements.
    pub providers: Vec<String>,
}

impl Default for NfoOptions {
    fn default() -> Self {
        Self {
            release_date_format: "yyyy-MM-dd".to_string(),
            save_image_paths_in_nfo: false,
            prefer_alternate_movie_name: false,
            target_user_id: None,
            providers: provider::KNOWN.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl NfoOptions {
    pub fn from_json_file(path: &Path) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path)?;
        let options: Self = serde_json::from_str(&raw)?;
        options.validate()?;
        Ok(options)
    }

    /// Apply `NFO_*` environment overrides on top of the current values.
    pub fn with_env_overrides(mut self) -> Result<Self, CoreError> {
        if let Ok(v) = std::env::var("NFO_RELEASE_DATE_FORMAT") {
            self.release_date_format = v;
        }
        if let Ok(v) = std::env::var("NFO_SAVE_IMAGE_PATHS") {
            self.save_image_paths_in_nfo = parse_flag("NFO_SAVE_IMAGE_PATHS", &v)?;
        }
        if let Ok(v) = std::env::var("NFO_PREFER_MOVIE_NFO") {
            self.prefer_alternate_movie_name = parse_flag("NFO_PREFER_MOVIE_NFO", &v)?;
        }
        if let Ok(v) = std::env::var("NFO_TARGET_USER_ID") {
            self.target_user_id = Some(v).filter(|s| !s.trim().is_empty());
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        DateFormat::new(&self.release_date_format).map(|_| ())
    }

    pub fn date_format(&self) -> Result<DateFormat, CoreError> {
        DateFormat::new(&self.release_date_format)
    }

    pub fn target_user(&self) -> Option<&str> {
        self.target_user_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool, CoreError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(CoreError::InvalidConfig(format!("{name}: expected a boolean, got {value:?}"))),
    }
}

/// A release-date pattern translated into chrono's strftime syntax.
///
/// Supported tokens: `yyyy`, `yy`, `MM`/`M`, `dd`/`d`, `HH`/`H`, `mm`,
/// `ss`, plus single-quoted literals. Anything else that is alphabetic is
/// rejected so a typo in the pattern fails at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    pattern: String,
    strftime: String,
    has_time: bool,
}

impl DateFormat {
    pub fn new(pattern: &str) -> Result<Self, CoreError> {
        let chars: Vec<char> = pattern.chars().collect();
        let mut strftime = String::new();
        let mut has_time = false;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            if c == '\'' {
                let close = chars[i + 1..]
                    .iter()
                    .position(|&q| q == '\'')
                    .ok_or_else(|| invalid(pattern, "unterminated quote"))?;
                for &lit in &chars[i + 1..i + 1 + close] {
                    push_literal(&mut strftime, lit);
                }
                i += close + 2;
                continue;
            }

            let run = chars[i..].iter().take_while(|&&n| n == c).count();
            let spec = match (c, run) {
                ('y', 1) => "%-y",
                ('y', 2) => "%y",
                ('y', _) => "%Y",
                ('M', 1 | 2) => "%m",
                ('d', 1 | 2) => "%d",
                ('H', 1 | 2) => {
                    has_time = true;
                    "%H"
                }
                ('m', 1 | 2) => {
                    has_time = true;
                    "%M"
                }
                ('s', 1 | 2) => {
                    has_time = true;
                    "%S"
                }
                (c, _) if c.is_ascii_alphabetic() => {
                    return Err(invalid(pattern, &format!("unsupported token {c}")));
                }
                _ => {
                    for _ in 0..run {
                        push_literal(&mut strftime, c);
                    }
                    i += run;
                    continue;
                }
            };
            strftime.push_str(spec);
            i += run;
        }

        Ok(Self {
            pattern: pattern.to_string(),
            strftime,
            has_time,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn format(&self, date: NaiveDate) -> String {
        if self.has_time {
            date.and_time(chrono::NaiveTime::MIN)
                .format(&self.strftime)
                .to_string()
        } else {
            date.format(&self.strftime).to_string()
        }
    }

    /// Parse with the configured pattern, falling back to ISO-8601 forms.
    pub fn parse(&self, value: &str) -> Option<NaiveDate> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        let configured = if self.has_time {
            NaiveDateTime::parse_from_str(value, &self.strftime)
                .ok()
                .map(|dt| dt.date())
        } else {
            NaiveDate::parse_from_str(value, &self.strftime).ok()
        };
        configured.or_else(|| parse_iso_date(value))
    }
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

fn invalid(pattern: &str, reason: &str) -> CoreError {
    CoreError::InvalidConfig(format!("release date format {pattern:?}: {reason}"))
}

/// Parse `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` or RFC 3339.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_iso_datetime(value).map(|dt| dt.date()))
}

/// Parse `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`, RFC 3339 or a bare
/// date (taken as midnight).
pub fn parse_iso_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.naive_utc()))
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
}
