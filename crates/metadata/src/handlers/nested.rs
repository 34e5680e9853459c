//! Handlers that read attributes or child elements.

use nfo_core::provider_ids::provider;
use nfo_core::types::Video3DFormat;
use nfo_core::{LinkedItem, MetadataRecord, Person, PersonType, ProviderIds};
use tracing::debug;

use super::ParseContext;
use crate::Result;
use crate::cursor::{Element, XmlCursor};
use crate::text::{parse_bool, parse_float, parse_int, split_names};

const DEFAULT_RATING_MAX: f32 = 10.0;
const TOMATOMETER: &str = "tomatometerallcritics";

/// Provider name for a `<provider>id` attribute or element name.
fn provider_from_tag(ctx: &ParseContext, tag: &str) -> Option<String> {
    if let Some(name) = ctx.registry.provider_for_tag(tag) {
        return Some(name.to_string());
    }
    let lower = tag.to_ascii_lowercase();
    lower
        .strip_suffix("id")
        .filter(|p| !p.is_empty())
        .map(str::to_string)
}

/// `<uniqueid type="tvdb">81189</uniqueid>`
pub fn unique_id(
    ctx: &ParseContext,
    record: &mut MetadataRecord,
    cursor: &mut XmlCursor<'_>,
    el: &Element,
) -> Result<()> {
    let value = cursor.read_text(el)?;
    let Some(kind) = el.attr("type").map(str::trim).filter(|t| !t.is_empty()) else {
        debug!(value = %value, "uniqueid without type");
        return Ok(());
    };
    let name = if kind.eq_ignore_ascii_case("tmdb-tv") {
        provider::TMDB
    } else {
        ctx.registry.canonical_name(kind).unwrap_or(kind)
    };
    record.provider_ids.set(name, &value);
    Ok(())
}

pub fn director(
    ctx: &ParseContext,
    record: &mut MetadataRecord,
    cursor: &mut XmlCursor<'_>,
    el: &Element,
) -> Result<()> {
    for person in people_from_element(ctx, cursor, el, PersonType::Director)? {
        record.add_person(person);
    }
    Ok(())
}

pub fn writer(
    ctx: &ParseContext,
    record: &mut MetadataRecord,
    cursor: &mut XmlCursor<'_>,
    el: &Element,
) -> Result<()> {
    for person in people_from_element(ctx, cursor, el, PersonType::Writer)? {
        record.add_person(person);
    }
    Ok(())
}

/// One or more people named in a director/writer element. Provider ids
/// given as attributes (`tmdbid="578"`) only attach when a single person
/// is named.
fn people_from_element(
    ctx: &ParseContext,
    cursor: &mut XmlCursor<'_>,
    el: &Element,
    kind: PersonType,
) -> Result<Vec<Person>> {
    let text = cursor.read_text(el)?;
    let mut people: Vec<Person> = split_names(&text)
        .into_iter()
        .map(|name| Person::new(name, kind))
        .collect();

    if let [person] = people.as_mut_slice() {
        for (key, value) in &el.attributes {
            if let Some(name) = provider_from_tag(ctx, key) {
                person.provider_ids.set(&name, value);
            }
        }
    }
    Ok(people)
}

/// `<actor>` with name, role, type, sortorder, thumb and provider ids.
pub fn actor(
    ctx: &ParseContext,
    record: &mut MetadataRecord,
    cursor: &mut XmlCursor<'_>,
    el: &Element,
) -> Result<()> {
    let mut person = Person::new(String::new(), PersonType::Actor);

    while let Some(child) = cursor.next_child(el)? {
        let tag = child.tag();
        match tag.as_str() {
            "name" => person.name = cursor.read_text(&child)?,
            "role" => {
                let role = cursor.read_text(&child)?;
                if !role.is_empty() {
                    person.role = Some(role);
                }
            }
            "type" => {
                let value = cursor.read_text(&child)?;
                person.kind = value.parse().unwrap_or_else(|_| {
                    debug!(value = %value, "treating unknown person type as actor");
                    PersonType::Actor
                });
            }
            "sortorder" => person.sort_order = parse_int(&cursor.read_text(&child)?),
            "thumb" => {
                let thumb = cursor.read_text(&child)?;
                if !thumb.is_empty() {
                    person.image_url = Some(thumb);
                }
            }
            _ => match ctx.registry.provider_for_tag(&tag) {
                Some(name) => {
                    let name = name.to_string();
                    person.provider_ids.set(&name, &cursor.read_text(&child)?);
                }
                None => cursor.skip(&child)?,
            },
        }
    }

    record.add_person(person);
    Ok(())
}

struct RatingEntry {
    name: String,
    value: f32,
    is_default: bool,
}

/// `<ratings><rating name=".." max="5" default="true"><value>4</value></rating></ratings>`
///
/// Values are rescaled to 0–10 and unnamed entries are dropped. The last
/// default entry (else the first entry) sets the community rating; the all-critics tomatometer sets the critic
/// rating on a 0–100 scale.
pub fn ratings(
    _: &ParseContext,
    record: &mut MetadataRecord,
    cursor: &mut XmlCursor<'_>,
    el: &Element,
) -> Result<()> {
    let mut entries = Vec::new();

    while let Some(child) = cursor.next_child(el)? {
        if child.tag() != "rating" {
            cursor.skip(&child)?;
            continue;
        }
        let max = child
            .attr("max")
            .and_then(parse_float)
            .filter(|m| *m > 0.0)
            .unwrap_or(DEFAULT_RATING_MAX);
        let is_default = child.attr("default").is_some_and(parse_bool);
        let name = child
            .attr("name")
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        let fields = cursor.read_fields(&child)?;
        let Some(name) = name else {
            debug!("ignoring unnamed rating");
            continue;
        };
        let Some(value) = fields.get("value").and_then(parse_float) else {
            continue;
        };
        if value <= 0.0 {
            debug!(name = %name, "ignoring zero rating");
            continue;
        }
        entries.push(RatingEntry {
            name,
            value: value / max * 10.0,
            is_default,
        });
    }

    let (critic, community): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .partition(|e| e.name.eq_ignore_ascii_case(TOMATOMETER));
    if let Some(entry) = critic.last() {
        record.critic_rating = Some(entry.value * 10.0);
    }
    let chosen = community
        .iter()
        .rfind(|e| e.is_default)
        .or_else(|| community.first());
    if let Some(entry) = chosen {
        record.community_rating = Some(entry.value);
    }
    Ok(())
}

/// `fileinfo/streamdetails/video/format3d`. Other stream details are
/// probe output and are not read back.
pub fn file_info(
    _: &ParseContext,
    record: &mut MetadataRecord,
    cursor: &mut XmlCursor<'_>,
    el: &Element,
) -> Result<()> {
    while let Some(details) = cursor.next_child(el)? {
        if details.tag() != "streamdetails" {
            cursor.skip(&details)?;
            continue;
        }
        while let Some(stream) = cursor.next_child(&details)? {
            if stream.tag() != "video" {
                cursor.skip(&stream)?;
                continue;
            }
            let fields = cursor.read_fields(&stream)?;
            if let Some(code) = fields.get("format3d") {
                match Video3DFormat::from_nfo_code(code) {
                    Some(format) => record.video_3d_format = Some(format),
                    None => debug!(code, "unknown 3d format"),
                }
            }
        }
    }
    Ok(())
}

/// `<set tmdbcolid="8091"><name>Alien Collection</name></set>` or
/// `<set>Alien Collection</set>`.
pub fn collection(
    _: &ParseContext,
    record: &mut MetadataRecord,
    cursor: &mut XmlCursor<'_>,
    el: &Element,
) -> Result<()> {
    let fields = cursor.read_fields(el)?;
    let name = fields
        .get("name")
        .map(str::to_string)
        .unwrap_or(fields.text);
    if name.is_empty() {
        return Ok(());
    }
    let mut provider_ids = ProviderIds::new();
    if let Some(id) = el.attr("tmdbcolid") {
        provider_ids.set(provider::TMDB_COLLECTION, id);
    }
    if !record.collections.iter().any(|c| c.name.eq_ignore_ascii_case(&name)) {
        record.collections.push(LinkedItem { name, provider_ids });
    }
    Ok(())
}

pub fn art(
    _: &ParseContext,
    record: &mut MetadataRecord,
    cursor: &mut XmlCursor<'_>,
    el: &Element,
) -> Result<()> {
    let fields = cursor.read_fields(el)?;
    for (tag, value) in fields.children {
        if value.is_empty() {
            continue;
        }
        match tag.as_str() {
            "poster" => record.art.poster = Some(value),
            "fanart" => record.art.fanart.push(value),
            _ => {}
        }
    }
    Ok(())
}

/// `<resume><position>1234.5</position><total>7200</total></resume>`
pub fn resume(
    _: &ParseContext,
    record: &mut MetadataRecord,
    cursor: &mut XmlCursor<'_>,
    el: &Element,
) -> Result<()> {
    let fields = cursor.read_fields(el)?;
    if let Some(position) = fields.get("position").and_then(|p| p.trim().parse::<f64>().ok()) {
        if position > 0.0 {
            record.user_data_mut().position_seconds = Some(position);
        }
    }
    Ok(())
}
