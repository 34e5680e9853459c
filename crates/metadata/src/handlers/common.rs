//! Handlers shared by every item kind.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDateTime};
use nfo_core::config::parse_iso_datetime;
use nfo_core::provider_ids::provider;
use nfo_core::types::MetadataField;
use nfo_core::{MetadataRecord, Person, PersonType};
use tracing::{debug, warn};

use super::nested;
use super::{Handler, HandlerTable, ParseContext};
use crate::text::{parse_bool, parse_float, parse_int, split_slash, trailer_from_nfo};

const DATE_ADDED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub static TABLE: LazyLock<HandlerTable> = LazyLock::new(|| {
    use Handler::{ProviderId, Subtree, Text};

    HandlerTable::from([
        ("title", Text(title)),
        ("localtitle", Text(title)),
        ("originaltitle", Text(|_, r, v| r.original_title = Some(v.to_string()))),
        ("sorttitle", Text(|_, r, v| r.sort_title = Some(v.to_string()))),
        ("plot", Text(overview)),
        ("biography", Text(overview)),
        ("review", Text(overview)),
        ("outline", Text(|_, r, v| r.outline = Some(v.to_string()))),
        ("tagline", Text(|_, r, v| r.tagline = Some(v.to_string()))),
        ("mpaa", Text(|_, r, v| r.official_rating = Some(v.to_string()))),
        ("customrating", Text(|_, r, v| r.custom_rating = Some(v.to_string()))),
        ("rating", Text(community_rating)),
        ("criticrating", Text(critic_rating)),
        ("year", Text(year)),
        ("runtime", Text(runtime)),
        ("country", Text(countries)),
        ("placeofbirth", Text(countries)),
        ("genre", Text(genres)),
        ("style", Text(|_, r, v| r.add_tag(v))),
        ("tag", Text(|_, r, v| r.add_tag(v))),
        ("studio", Text(|_, r, v| r.add_studio(v))),
        ("language", Text(|_, r, v| r.preferred_language = Some(v.to_string()))),
        ("countrycode", Text(|_, r, v| r.preferred_country_code = Some(v.to_string()))),
        ("lockdata", Text(|_, r, v| r.is_locked = parse_bool(v))),
        ("lockedfields", Text(locked_fields)),
        ("dateadded", Text(date_added)),
        ("aired", Text(premiere_date)),
        ("premiered", Text(premiere_date)),
        ("releasedate", Text(premiere_date)),
        ("formed", Text(premiere_date)),
        ("enddate", Text(end_date)),
        ("trailer", Text(|_, r, v| r.add_trailer(&trailer_from_nfo(v)))),
        ("credits", Text(credits)),
        ("watched", Text(|_, r, v| r.user_data_mut().played = parse_bool(v))),
        ("playcount", Text(play_count)),
        ("lastplayed", Text(last_played)),
        ("isuserfavorite", Text(|_, r, v| r.user_data_mut().is_favorite = parse_bool(v))),
        ("userrating", Text(user_rating)),
        ("uniqueid", Subtree(nested::unique_id)),
        ("director", Subtree(nested::director)),
        ("writer", Subtree(nested::writer)),
        ("actor", Subtree(nested::actor)),
        ("ratings", Subtree(nested::ratings)),
        ("fileinfo", Subtree(nested::file_info)),
        ("set", Subtree(nested::collection)),
        ("art", Subtree(nested::art)),
        ("resume", Subtree(nested::resume)),
        ("imdb_id", ProviderId(provider::IMDB)),
        ("collectionnumber", ProviderId(provider::TMDB_COLLECTION)),
        ("tmdbcolid", ProviderId(provider::TMDB_COLLECTION)),
    ])
});

fn title(_: &ParseContext, r: &mut MetadataRecord, v: &str) {
    r.title = Some(v.to_string());
}

fn overview(_: &ParseContext, r: &mut MetadataRecord, v: &str) {
    r.overview = Some(v.to_string());
}

fn community_rating(_: &ParseContext, r: &mut MetadataRecord, v: &str) {
    match parse_float(v) {
        Some(rating) => r.community_rating = Some(rating),
        None => debug!(value = v, "ignoring invalid rating"),
    }
}

fn critic_rating(_: &ParseContext, r: &mut MetadataRecord, v: &str) {
    match parse_float(v) {
        Some(rating) => r.critic_rating = Some(rating),
        None => debug!(value = v, "ignoring invalid critic rating"),
    }
}

fn year(_: &ParseContext, r: &mut MetadataRecord, v: &str) {
    match parse_int(v) {
        Some(y) if r.set_production_year(y) => {}
        _ => debug!(value = v, "ignoring implausible year"),
    }
}

/// `<runtime>` holds minutes, sometimes followed by a unit (`120 min`).
fn runtime(_: &ParseContext, r: &mut MetadataRecord, v: &str) {
    let leading = v.split(' ').next().unwrap_or_default();
    match parse_int(leading) {
        Some(minutes) if minutes > 0 => r.runtime_minutes = Some(minutes),
        _ => debug!(value = v, "ignoring invalid runtime"),
    }
}

fn countries(_: &ParseContext, r: &mut MetadataRecord, v: &str) {
    for country in split_slash(v) {
        r.add_country(country);
    }
}

fn genres(_: &ParseContext, r: &mut MetadataRecord, v: &str) {
    for genre in split_slash(v) {
        r.add_genre(genre);
    }
}

fn locked_fields(_: &ParseContext, r: &mut MetadataRecord, v: &str) {
    for name in v.split('|').map(str::trim).filter(|s| !s.is_empty()) {
        match name.parse::<MetadataField>() {
            Ok(field) => {
                r.locked_fields.insert(field);
            }
            Err(e) => debug!(error = %e, "ignoring locked field"),
        }
    }
}

fn date_added(_: &ParseContext, r: &mut MetadataRecord, v: &str) {
    let parsed = NaiveDateTime::parse_from_str(v, DATE_ADDED_FORMAT)
        .ok()
        .or_else(|| parse_iso_datetime(v));
    match parsed {
        Some(dt) => r.date_created = Some(dt),
        None => warn!(value = v, "invalid dateadded value"),
    }
}

fn premiere_date(ctx: &ParseContext, r: &mut MetadataRecord, v: &str) {
    match ctx.dates.parse(v) {
        Some(date) if r.set_production_year(date.year()) => r.premiere_date = Some(date),
        _ => debug!(value = v, "ignoring invalid premiere date"),
    }
}

fn end_date(ctx: &ParseContext, r: &mut MetadataRecord, v: &str) {
    match ctx.dates.parse(v) {
        Some(date) => r.end_date = Some(date),
        None => debug!(value = v, "ignoring invalid end date"),
    }
}

fn credits(_: &ParseContext, r: &mut MetadataRecord, v: &str) {
    for name in split_slash(v) {
        r.add_person(Person::new(name, PersonType::Writer));
    }
}

fn play_count(_: &ParseContext, r: &mut MetadataRecord, v: &str) {
    match v.trim().parse::<u32>() {
        Ok(count) => r.user_data_mut().play_count = count,
        Err(_) => debug!(value = v, "ignoring invalid playcount"),
    }
}

fn last_played(_: &ParseContext, r: &mut MetadataRecord, v: &str) {
    let parsed = NaiveDateTime::parse_from_str(v, DATE_ADDED_FORMAT)
        .ok()
        .or_else(|| parse_iso_datetime(v));
    match parsed {
        Some(dt) => r.user_data_mut().last_played = Some(dt),
        None => debug!(value = v, "ignoring invalid lastplayed"),
    }
}

fn user_rating(_: &ParseContext, r: &mut MetadataRecord, v: &str) {
    match parse_float(v) {
        Some(rating) => r.user_data_mut().rating = Some(rating),
        None => debug!(value = v, "ignoring invalid userrating"),
    }
}
