//! Host path helpers operating on strings.
//!
//! Library paths come from the host catalog and may be Windows paths
//! (`D:\Movies\Leon (1994)`) even when this process runs elsewhere, so
//! both `/` and `\` are treated as separators and joins reuse whichever
//! separator the input already uses.

use std::sync::LazyLock;

use regex::Regex;

static RE_URL_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").unwrap());

fn is_sep(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Separator to use when extending `path`.
pub fn separator(path: &str) -> char {
    if path.contains('\\') && !path.contains('/') {
        '\\'
    } else {
        '/'
    }
}

/// Strip trailing separators, keeping a bare root (`/`, `C:\`).
pub fn trim_trailing_separators(path: &str) -> &str {
    let trimmed = path.trim_end_matches(is_sep);
    if trimmed.len() == path.len() {
        return path;
    }
    if trimmed.is_empty() || trimmed.ends_with(':') {
        &path[..trimmed.len() + 1]
    } else {
        trimmed
    }
}

/// Split into (parent, last component). The parent keeps its separator
/// when it is a root.
fn split_last(path: &str) -> (Option<&str>, &str) {
    let path = trim_trailing_separators(path);
    match path.rfind(is_sep) {
        Some(idx) if idx + 1 < path.len() => {
            let dir = &path[..idx];
            let dir = if dir.is_empty() || dir.ends_with(':') {
                &path[..=idx]
            } else {
                dir
            };
            (Some(dir), &path[idx + 1..])
        }
        _ => (None, path),
    }
}

pub fn parent(path: &str) -> Option<&str> {
    split_last(path).0
}

pub fn file_name(path: &str) -> &str {
    split_last(path).1
}

/// File name without its last extension. Dot-files keep their name.
pub fn file_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(0) | None => name,
        Some(i) => &name[..i],
    }
}

pub fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        return name.to_string();
    }
    let mut out = String::with_capacity(dir.len() + name.len() + 1);
    out.push_str(dir);
    if !dir.ends_with(is_sep) {
        out.push(separator(dir));
    }
    out.push_str(name);
    out
}

/// Replace (or add) the extension of the last component.
pub fn with_extension(path: &str, ext: &str) -> String {
    let path = trim_trailing_separators(path);
    let name = file_name(path);
    let prefix = &path[..path.len() - name.len()];
    format!("{prefix}{}.{ext}", file_stem(name))
}

/// Paths with a URL scheme (`http://`, `rtsp://`, ...) have no local
/// directory to hold a sidecar file.
pub fn is_remote(path: &str) -> bool {
    RE_URL_SCHEME.is_match(path.trim())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
