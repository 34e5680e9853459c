use nfo_core::provider_ids::provider;
use nfo_core::{ItemKind, MetadataRecord, Person, PersonType};

use super::{Document, XmlOut};
use crate::Result;
use crate::registry::provider_tag;
use crate::text::{is_valid_element_name, strip_html, trailer_to_nfo};

const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn write(doc: &Document<'_>, out: &mut XmlOut, record: &MetadataRecord) -> Result<()> {
    let kind = record.kind;

    let overview = record
        .overview
        .as_deref()
        .map(|o| strip_html(&doc.overview(o)).replace("&quot;", "'"));
    let overview_tag = match kind {
        ItemKind::MusicArtist => "biography",
        ItemKind::MusicAlbum => "review",
        _ => "plot",
    };
    out.opt(overview_tag, overview.as_deref())?;
    match record.outline.as_deref() {
        Some(outline) => out.opt("outline", Some(outline))?,
        None if !kind.is_video() => out.opt("outline", overview.as_deref())?,
        None => {}
    }

    out.opt("customrating", record.custom_rating.as_deref())?;
    out.element("lockdata", if record.is_locked { "true" } else { "false" })?;
    if !record.locked_fields.is_empty() {
        let fields: Vec<&str> = record.locked_fields.iter().map(|f| f.as_str()).collect();
        out.element("lockedfields", &fields.join("|"))?;
    }
    out.opt(
        "dateadded",
        record.date_created.map(|d| d.format(DATE_TIME_FORMAT)),
    )?;

    out.opt("title", record.title.as_deref().map(|t| doc.title(t)))?;
    out.opt("originaltitle", record.original_title.as_deref())?;

    for person in record.people_of(PersonType::Director) {
        credit(out, "director", person)?;
    }
    for person in record.people_of(PersonType::Writer) {
        credit(out, "writer", person)?;
    }
    for url in &record.trailer_urls {
        out.opt("trailer", Some(trailer_to_nfo(url)))?;
    }

    out.opt("rating", record.community_rating)?;
    out.opt("year", record.production_year)?;
    out.opt("sorttitle", record.sort_title.as_deref())?;
    out.opt("mpaa", record.official_rating.as_deref())?;

    if doc.is_first() {
        provider_ids(out, record)?;
    }

    out.opt("language", record.preferred_language.as_deref())?;
    out.opt("countrycode", record.preferred_country_code.as_deref())?;

    if let Some(date) = record.premiere_date {
        let formatted = doc.dates.format(date);
        match kind {
            ItemKind::Episode => {}
            ItemKind::MusicArtist => out.element("formed", &formatted)?,
            _ => {
                out.element("premiered", &formatted)?;
                out.element("releasedate", &formatted)?;
            }
        }
    }
    if kind != ItemKind::Episode {
        out.opt("enddate", record.end_date.map(|d| doc.dates.format(d)))?;
    }

    out.opt("criticrating", record.critic_rating)?;
    out.opt("runtime", record.runtime_minutes.filter(|m| *m > 0))?;
    out.opt("tagline", record.tagline.as_deref())?;

    out.each("country", &record.countries)?;
    out.each("genre", &record.genres)?;
    out.each("studio", &record.studios)?;
    let tag_element = match kind {
        ItemKind::MusicAlbum | ItemKind::MusicArtist => "style",
        _ => "tag",
    };
    out.each(tag_element, &record.tags)?;

    for set in &record.collections {
        match set.provider_ids.get(provider::TMDB_COLLECTION) {
            Some(id) => out.start_with("set", &[("tmdbcolid", id)])?,
            None => out.start("set")?,
        }
        out.element("name", &set.name)?;
        out.end("set")?;
    }

    if doc.options.save_image_paths_in_nfo && !record.art.is_empty() {
        out.start("art")?;
        out.opt("poster", record.art.poster.as_deref())?;
        out.each("fanart", &record.art.fanart)?;
        out.end("art")?;
    }

    if doc.options.target_user().is_some() {
        user_data(out, record)?;
    }

    for person in record.people_of(PersonType::Actor) {
        actor(doc, out, person)?;
    }
    Ok(())
}

/// Director or writer, with the person's provider ids as attributes.
fn credit(out: &mut XmlOut, element: &str, person: &Person) -> Result<()> {
    if person.name.trim().is_empty() {
        return Ok(());
    }
    let tags: Vec<(String, &str)> = person
        .provider_ids
        .iter()
        .map(|(name, value)| (provider_tag(name), value))
        .filter(|(tag, _)| is_valid_element_name(tag))
        .collect();
    let attrs: Vec<(&str, &str)> = tags.iter().map(|(t, v)| (t.as_str(), *v)).collect();
    out.element_with(element, &attrs, &person.name)
}

/// `uniqueid` per provider, then the flat elements older readers expect.
fn provider_ids(out: &mut XmlOut, record: &MetadataRecord) -> Result<()> {
    let ids = &record.provider_ids;
    for (name, value) in ids.iter() {
        let kind = name.to_ascii_lowercase();
        out.element_with("uniqueid", &[("type", kind.as_str())], value)?;
    }

    out.opt("collectionnumber", ids.get(provider::TMDB_COLLECTION))?;
    let imdb_element = if record.kind == ItemKind::Series {
        "imdb_id"
    } else {
        "imdbid"
    };
    out.opt(imdb_element, ids.get(provider::IMDB))?;
    if record.kind != ItemKind::Series {
        out.opt("tvdbid", ids.get(provider::TVDB))?;
    }
    out.opt("tmdbid", ids.get(provider::TMDB))?;

    const DEDICATED: [&str; 4] = [
        provider::IMDB,
        provider::TMDB,
        provider::TVDB,
        provider::TMDB_COLLECTION,
    ];
    for (name, value) in ids.iter() {
        if DEDICATED.iter().any(|d| d.eq_ignore_ascii_case(name)) {
            continue;
        }
        let tag = provider_tag(name);
        if is_valid_element_name(&tag) {
            out.element(&tag, value)?;
        }
    }
    Ok(())
}

/// Watch state of the target user. Play state is not written for folders.
fn user_data(out: &mut XmlOut, record: &MetadataRecord) -> Result<()> {
    let Some(data) = &record.user_data else {
        return Ok(());
    };
    out.element(
        "isuserfavorite",
        if data.is_favorite { "true" } else { "false" },
    )?;
    out.opt("userrating", data.rating)?;
    if record.kind.is_folder() {
        return Ok(());
    }
    out.element("playcount", &data.play_count.to_string())?;
    out.element("watched", if data.played { "true" } else { "false" })?;
    out.opt(
        "lastplayed",
        data.last_played.map(|d| d.format(DATE_TIME_FORMAT)),
    )?;
    if let Some(position) = data.position_seconds.filter(|p| *p > 0.0) {
        out.start("resume")?;
        out.element("position", &position.to_string())?;
        let total = record.runtime_minutes.map(|m| i64::from(m) * 60).unwrap_or(0);
        out.element("total", &total.to_string())?;
        out.end("resume")?;
    }
    Ok(())
}

fn actor(doc: &Document<'_>, out: &mut XmlOut, person: &Person) -> Result<()> {
    if person.name.trim().is_empty() {
        return Ok(());
    }
    out.start("actor")?;
    out.element("name", &person.name)?;
    out.opt("role", person.role.as_deref())?;
    out.element("type", person.kind.as_str())?;
    out.opt("sortorder", person.sort_order)?;
    for (name, value) in person.provider_ids.iter() {
        let tag = provider_tag(name);
        if is_valid_element_name(&tag) {
            out.element(&tag, value)?;
        }
    }
    if doc.options.save_image_paths_in_nfo {
        out.opt("thumb", person.image_url.as_deref())?;
    }
    out.end("actor")
}
