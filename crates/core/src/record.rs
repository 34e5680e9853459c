use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::media::MediaStream;
use crate::provider_ids::ProviderIds;
use crate::types::{
    CollectionDisplayOrder, ItemKind, MetadataField, PersonType, SeriesDisplayOrder, SeriesStatus,
    Video3DFormat,
};

/// Years at or below this are treated as implausible.
pub const MIN_PLAUSIBLE_YEAR: i32 = 1850;

/// A cast or crew member credited on an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    pub name: String,
    pub role: Option<String>,
    #[serde(rename = "type")]
    pub kind: PersonType,
    pub provider_ids: ProviderIds,
    pub image_url: Option<String>,
    pub sort_order: Option<i32>,
}

impl Person {
    pub fn new(name: impl Into<String>, kind: PersonType) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Default::default()
        }
    }
}

/// A reference to another item, e.g. the collection a movie belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedItem {
    pub name: String,
    pub provider_ids: ProviderIds,
}

/// Watch state of the configured target user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserData {
    pub is_favorite: bool,
    pub rating: Option<f32>,
    pub play_count: u32,
    pub played: bool,
    pub last_played: Option<NaiveDateTime>,
    pub position_seconds: Option<f64>,
}

/// Image paths written into the `<art>` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Artwork {
    pub poster: Option<String>,
    pub fanart: Vec<String>,
}

impl Artwork {
    pub fn is_empty(&self) -> bool {
        self.poster.is_none() && self.fanart.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoExt {
    pub album: Option<String>,
    pub artists: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeExt {
    pub season_number: Option<i32>,
    pub episode_number: Option<i32>,
    pub episode_number_end: Option<i32>,
    pub display_season: Option<i32>,
    pub display_episode: Option<i32>,
    pub airs_after_season: Option<i32>,
    pub airs_before_season: Option<i32>,
    pub airs_before_episode: Option<i32>,
}

/// Widest episode range one file may split into.
pub const MAX_EPISODE_SPAN: i32 = 100;

impl EpisodeExt {
    /// Number of episodes covered, when the record spans a valid range of
    /// at most [`MAX_EPISODE_SPAN`] episodes.
    pub fn span(&self) -> Option<i32> {
        let (start, end) = (self.episode_number?, self.episode_number_end?);
        if start < 0 || end <= start {
            return None;
        }
        end.checked_sub(start)
            .and_then(|d| d.checked_add(1))
            .filter(|n| *n <= MAX_EPISODE_SPAN)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesExt {
    pub air_days: Vec<Weekday>,
    pub air_time: Option<String>,
    pub display_order: SeriesDisplayOrder,
    pub status: Option<SeriesStatus>,
}

impl SeriesExt {
    pub fn add_air_day(&mut self, day: Weekday) {
        if !self.air_days.contains(&day) {
            self.air_days.push(day);
            self.air_days.sort_by_key(|d| d.num_days_from_sunday());
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonExt {
    pub season_number: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackEntry {
    pub number: Option<i32>,
    pub title: String,
    pub duration_seconds: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlbumEntry {
    pub title: String,
    pub year: Option<i32>,
}

/// Album and artist data. Tracks and albums are supplied by the host
/// catalog and only ever written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicExt {
    pub artists: Vec<String>,
    pub album_artists: Vec<String>,
    pub tracks: Vec<TrackEntry>,
    pub albums: Vec<AlbumEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionExt {
    pub display_order: CollectionDisplayOrder,
}

/// Kind-specific data attached to a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Extension {
    #[default]
    None,
    Video(VideoExt),
    Episode(EpisodeExt),
    Series(SeriesExt),
    Season(SeasonExt),
    Music(MusicExt),
    Collection(CollectionExt),
}

impl Extension {
    pub fn for_kind(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Movie | ItemKind::MusicVideo | ItemKind::Video => {
                Self::Video(VideoExt::default())
            }
            ItemKind::Episode => Self::Episode(EpisodeExt::default()),
            ItemKind::Series => Self::Series(SeriesExt::default()),
            ItemKind::Season => Self::Season(SeasonExt::default()),
            ItemKind::MusicAlbum | ItemKind::MusicArtist => Self::Music(MusicExt::default()),
            ItemKind::Collection => Self::Collection(CollectionExt::default()),
            ItemKind::Person | ItemKind::Game => Self::None,
        }
    }
}

/// Normalized metadata for one library item, built fresh per parse or save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataRecord {
    pub kind: ItemKind,

    pub title: Option<String>,
    pub original_title: Option<String>,
    pub sort_title: Option<String>,

    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub outline: Option<String>,

    pub official_rating: Option<String>,
    pub custom_rating: Option<String>,
    pub genres: Vec<String>,
    pub studios: Vec<String>,
    pub tags: Vec<String>,
    pub countries: Vec<String>,

    /// 0–10 scale.
    pub community_rating: Option<f32>,
    pub critic_rating: Option<f32>,

    pub premiere_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub date_created: Option<NaiveDateTime>,
    pub production_year: Option<i32>,
    pub runtime_minutes: Option<i32>,

    pub provider_ids: ProviderIds,
    pub people: Vec<Person>,
    pub collections: Vec<LinkedItem>,
    pub trailer_urls: Vec<String>,

    pub locked_fields: BTreeSet<MetadataField>,
    pub is_locked: bool,

    pub preferred_language: Option<String>,
    pub preferred_country_code: Option<String>,

    pub video_3d_format: Option<Video3DFormat>,
    pub art: Artwork,
    pub user_data: Option<UserData>,

    /// Probed stream descriptors. Written, never read back.
    pub media_streams: Vec<MediaStream>,

    pub extension: Extension,
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    let value = value.trim();
    if value.is_empty() || list.iter().any(|v| v.eq_ignore_ascii_case(value)) {
        return;
    }
    list.push(value.to_string());
}

impl MetadataRecord {
    pub fn new(kind: ItemKind) -> Self {
        Self {
            kind,
            extension: Extension::for_kind(kind),
            ..Default::default()
        }
    }

    pub fn add_genre(&mut self, genre: &str) {
        push_unique(&mut self.genres, genre);
    }

    pub fn add_studio(&mut self, studio: &str) {
        push_unique(&mut self.studios, studio);
    }

    pub fn add_tag(&mut self, tag: &str) {
        push_unique(&mut self.tags, tag);
    }

    pub fn add_country(&mut self, country: &str) {
        push_unique(&mut self.countries, country);
    }

    pub fn add_trailer(&mut self, url: &str) {
        let url = url.trim();
        if !url.is_empty() && !self.trailer_urls.iter().any(|u| u == url) {
            self.trailer_urls.push(url.to_string());
        }
    }

    /// Append a person, folding duplicates of the same name and credit
    /// type into the existing entry.
    pub fn add_person(&mut self, person: Person) {
        let name = person.name.trim();
        if name.is_empty() {
            return;
        }
        let existing = self
            .people
            .iter_mut()
            .find(|p| p.kind == person.kind && p.name.eq_ignore_ascii_case(name));
        match existing {
            Some(p) => {
                if p.role.is_none() {
                    p.role = person.role;
                }
                if p.image_url.is_none() {
                    p.image_url = person.image_url;
                }
                if p.sort_order.is_none() {
                    p.sort_order = person.sort_order;
                }
                p.provider_ids.extend_from(&person.provider_ids);
            }
            None => {
                let name = name.to_string();
                self.people.push(Person { name, ..person });
            }
        }
    }

    pub fn people_of(&self, kind: PersonType) -> impl Iterator<Item = &Person> {
        self.people.iter().filter(move |p| p.kind == kind)
    }

    /// Sets the production year unless it is implausible. Returns whether
    /// the value was accepted.
    pub fn set_production_year(&mut self, year: i32) -> bool {
        if year > MIN_PLAUSIBLE_YEAR {
            self.production_year = Some(year);
            true
        } else {
            false
        }
    }

    pub fn user_data_mut(&mut self) -> &mut UserData {
        self.user_data.get_or_insert_with(UserData::default)
    }

    pub fn video(&self) -> Option<&VideoExt> {
        match &self.extension {
            Extension::Video(ext) => Some(ext),
            _ => None,
        }
    }

    pub fn video_mut(&mut self) -> Option<&mut VideoExt> {
        match &mut self.extension {
            Extension::Video(ext) => Some(ext),
            _ => None,
        }
    }

    pub fn episode(&self) -> Option<&EpisodeExt> {
        match &self.extension {
            Extension::Episode(ext) => Some(ext),
            _ => None,
        }
    }

    pub fn episode_mut(&mut self) -> Option<&mut EpisodeExt> {
        match &mut self.extension {
            Extension::Episode(ext) => Some(ext),
            _ => None,
        }
    }

    pub fn series(&self) -> Option<&SeriesExt> {
        match &self.extension {
            Extension::Series(ext) => Some(ext),
            _ => None,
        }
    }

    pub fn series_mut(&mut self) -> Option<&mut SeriesExt> {
        match &mut self.extension {
            Extension::Series(ext) => Some(ext),
            _ => None,
        }
    }

    pub fn season(&self) -> Option<&SeasonExt> {
        match &self.extension {
            Extension::Season(ext) => Some(ext),
            _ => None,
        }
    }

    pub fn season_mut(&mut self) -> Option<&mut SeasonExt> {
        match &mut self.extension {
            Extension::Season(ext) => Some(ext),
            _ => None,
        }
    }

    pub fn music(&self) -> Option<&MusicExt> {
        match &self.extension {
            Extension::Music(ext) => Some(ext),
            _ => None,
        }
    }

    pub fn music_mut(&mut self) -> Option<&mut MusicExt> {
        match &mut self.extension {
            Extension::Music(ext) => Some(ext),
            _ => None,
        }
    }

    pub fn collection(&self) -> Option<&CollectionExt> {
        match &self.extension {
            Extension::Collection(ext) => Some(ext),
            _ => None,
        }
    }

    pub fn collection_mut(&mut self) -> Option<&mut CollectionExt> {
        match &mut self.extension {
            Extension::Collection(ext) => Some(ext),
            _ => None,
        }
    }
}
