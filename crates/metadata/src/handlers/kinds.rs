//! Handlers that only apply to one family of item kinds. They are looked
//! up before the common table, so a kind can take over a shared tag.

use std::sync::LazyLock;

use chrono::Weekday;
use nfo_core::provider_ids::provider;
use nfo_core::record::EpisodeExt;
use nfo_core::types::{CollectionDisplayOrder, SeriesDisplayOrder, SeriesStatus};
use nfo_core::{ItemKind, MetadataRecord};
use tracing::{debug, warn};

use super::{Handler, HandlerTable, ParseContext};
use crate::Result;
use crate::cursor::{Element, XmlCursor};
use crate::text::parse_int;

pub fn table(kind: ItemKind) -> Option<&'static HandlerTable> {
    let table: &'static LazyLock<HandlerTable> = match kind {
        ItemKind::Movie | ItemKind::MusicVideo | ItemKind::Video => &VIDEO,
        ItemKind::Episode => &EPISODE,
        ItemKind::Series => &SERIES,
        ItemKind::Season => &SEASON,
        ItemKind::MusicAlbum => &ALBUM,
        ItemKind::MusicArtist => &ARTIST,
        ItemKind::Collection => &COLLECTION,
        ItemKind::Person | ItemKind::Game => return None,
    };
    Some(LazyLock::force(table))
}

// ─── Movies and music videos ────────────────────────────────────────────────

static VIDEO: LazyLock<HandlerTable> = LazyLock::new(|| {
    HandlerTable::from([
        ("id", Handler::Subtree(movie_id)),
        ("artist", Handler::Text(video_artist)),
        ("album", Handler::Text(video_album)),
    ])
});

/// `<id IMDB="tt0078748" TMDB="348">tt0078748</id>`; the content is an
/// IMDb id only without an `IMDB` attribute, while no IMDb id is known and
/// no other provider holds the same value.
fn movie_id(
    _: &ParseContext,
    record: &mut MetadataRecord,
    cursor: &mut XmlCursor<'_>,
    el: &Element,
) -> Result<()> {
    let text = cursor.read_text(el)?;
    let imdb = attr_or_content(record, el, "imdb", provider::IMDB, &text);
    let tmdb = el.attr("tmdb").map(str::to_string);
    set_all(record, [(provider::IMDB, imdb), (provider::TMDB, tmdb)]);
    Ok(())
}

/// The id named by attribute `attr`, falling back to the element content
/// when the record has nothing under `name` and the content is not already
/// another provider's id.
fn attr_or_content(
    record: &MetadataRecord,
    el: &Element,
    attr: &str,
    name: &str,
    content: &str,
) -> Option<String> {
    match el.attr(attr).filter(|v| !v.trim().is_empty()) {
        Some(value) => Some(value.to_string()),
        None if record.provider_ids.contains(name) || record.provider_ids.holds_value(content) => {
            debug!(value = content, provider = name, "ambiguous id content ignored");
            None
        }
        None => Some(content.to_string()),
    }
}

fn set_all<const N: usize>(record: &mut MetadataRecord, ids: [(&str, Option<String>); N]) {
    for (name, value) in ids {
        if let Some(value) = value {
            record.provider_ids.set(name, &value);
        }
    }
}

fn video_artist(_: &ParseContext, r: &mut MetadataRecord, v: &str) {
    if let Some(ext) = r.video_mut() {
        if !ext.artists.iter().any(|a| a == v) {
            ext.artists.push(v.to_string());
        }
    }
}

fn video_album(_: &ParseContext, r: &mut MetadataRecord, v: &str) {
    if let Some(ext) = r.video_mut() {
        ext.album = Some(v.to_string());
    }
}

// ─── Episodes ────────────────────────────────────────────────────────────────

static EPISODE: LazyLock<HandlerTable> = LazyLock::new(|| {
    HandlerTable::from([
        ("season", Handler::Text(|_, r, v| set_episode(r, v, |e, n| e.season_number = Some(n)))),
        ("episode", Handler::Text(|_, r, v| set_episode(r, v, |e, n| e.episode_number = Some(n)))),
        (
            "episodenumberend",
            Handler::Text(|_, r, v| set_episode(r, v, |e, n| e.episode_number_end = Some(n))),
        ),
        (
            "displayseason",
            Handler::Text(|_, r, v| set_episode(r, v, |e, n| e.display_season = Some(n))),
        ),
        (
            "displayepisode",
            Handler::Text(|_, r, v| set_episode(r, v, |e, n| e.display_episode = Some(n))),
        ),
        (
            "airsafter_season",
            Handler::Text(|_, r, v| set_episode(r, v, |e, n| e.airs_after_season = Some(n))),
        ),
        (
            "airsbefore_season",
            Handler::Text(|_, r, v| set_episode(r, v, |e, n| e.airs_before_season = Some(n))),
        ),
        (
            "airsbefore_episode",
            Handler::Text(|_, r, v| set_episode(r, v, |e, n| e.airs_before_episode = Some(n))),
        ),
    ])
});

fn set_episode(r: &mut MetadataRecord, v: &str, set: fn(&mut EpisodeExt, i32)) {
    let Some(n) = parse_int(v) else {
        debug!(value = v, "ignoring invalid episode number");
        return;
    };
    if let Some(ext) = r.episode_mut() {
        set(ext, n);
    }
}

// ─── Series ──────────────────────────────────────────────────────────────────

static SERIES: LazyLock<HandlerTable> = LazyLock::new(|| {
    HandlerTable::from([
        ("id", Handler::Subtree(series_id)),
        ("airs_dayofweek", Handler::Text(air_days)),
        ("airs_time", Handler::Text(air_time)),
        ("displayorder", Handler::Text(series_display_order)),
        ("status", Handler::Text(series_status)),
    ])
});

/// `<id IMDB=".." TMDB=".." TVDB="..">81189</id>`; the content is a TVDB
/// id under the same conditions as a movie's IMDb content.
fn series_id(
    _: &ParseContext,
    record: &mut MetadataRecord,
    cursor: &mut XmlCursor<'_>,
    el: &Element,
) -> Result<()> {
    let text = cursor.read_text(el)?;
    let tvdb = attr_or_content(record, el, "tvdb", provider::TVDB, &text);
    let imdb = el.attr("imdb").map(str::to_string);
    let tmdb = el.attr("tmdb").map(str::to_string);
    set_all(
        record,
        [(provider::IMDB, imdb), (provider::TMDB, tmdb), (provider::TVDB, tvdb)],
    );
    Ok(())
}

const ALL_DAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

fn air_days(_: &ParseContext, r: &mut MetadataRecord, v: &str) {
    let Some(ext) = r.series_mut() else { return };
    if v.eq_ignore_ascii_case("daily") {
        for day in ALL_DAYS {
            ext.add_air_day(day);
        }
        return;
    }
    match v.parse::<Weekday>() {
        Ok(day) => ext.add_air_day(day),
        Err(_) => debug!(value = v, "ignoring unknown air day"),
    }
}

fn air_time(_: &ParseContext, r: &mut MetadataRecord, v: &str) {
    if let Some(ext) = r.series_mut() {
        ext.air_time = Some(v.to_string());
    }
}

fn series_display_order(_: &ParseContext, r: &mut MetadataRecord, v: &str) {
    let Some(ext) = r.series_mut() else { return };
    match v.parse::<SeriesDisplayOrder>() {
        Ok(order) => ext.display_order = order,
        Err(e) => debug!(error = %e, "ignoring display order"),
    }
}

fn series_status(_: &ParseContext, r: &mut MetadataRecord, v: &str) {
    let Some(ext) = r.series_mut() else { return };
    match v.parse::<SeriesStatus>() {
        Ok(status) => ext.status = Some(status),
        Err(_) => warn!(value = v, "unrecognized series status"),
    }
}

// ─── Seasons ─────────────────────────────────────────────────────────────────

static SEASON: LazyLock<HandlerTable> = LazyLock::new(|| {
    HandlerTable::from([(
        "seasonnumber",
        Handler::Text(|_, r, v| match (parse_int(v), r.season_mut()) {
            (Some(n), Some(ext)) => ext.season_number = Some(n),
            _ => debug!(value = v, "ignoring invalid season number"),
        }),
    )])
});

// ─── Music ───────────────────────────────────────────────────────────────────

static ALBUM: LazyLock<HandlerTable> = LazyLock::new(|| {
    HandlerTable::from([
        ("artist", Handler::Text(|_, r, v| push_music(r, v, false))),
        ("albumartist", Handler::Text(|_, r, v| push_music(r, v, true))),
    ])
});

fn push_music(r: &mut MetadataRecord, v: &str, album_artist: bool) {
    let Some(ext) = r.music_mut() else { return };
    let list = if album_artist {
        &mut ext.album_artists
    } else {
        &mut ext.artists
    };
    if !list.iter().any(|a| a == v) {
        list.push(v.to_string());
    }
}

static ARTIST: LazyLock<HandlerTable> = LazyLock::new(|| {
    HandlerTable::from([(
        "disbanded",
        Handler::Text(|ctx, r, v| match ctx.dates.parse(v) {
            Some(date) => r.end_date = Some(date),
            None => debug!(value = v, "ignoring invalid disbanded date"),
        }),
    )])
});

// ─── Collections ─────────────────────────────────────────────────────────────

static COLLECTION: LazyLock<HandlerTable> = LazyLock::new(|| {
    HandlerTable::from([(
        "displayorder",
        Handler::Text(|_, r, v| {
            let Some(ext) = r.collection_mut() else { return };
            match v.parse::<CollectionDisplayOrder>() {
                Ok(order) => ext.display_order = order,
                Err(e) => debug!(error = %e, "ignoring display order"),
            }
        }),
    )])
});
