//! Element names the writer owns.
//!
//! Anything listed here (or derived for a particular record) is rewritten
//! from the record on every save. Every other element found in a previous
//! file is foreign and copied through untouched.

use std::collections::BTreeSet;

use nfo_core::{ItemKind, MetadataRecord, NfoOptions};

use crate::registry::provider_tag;

/// Tags managed for every item kind. Sorted for binary search.
const COMMON_TAGS: &[&str] = &[
    "actor",
    "art",
    "audiodbalbumid",
    "audiodbartistid",
    "biography",
    "collectionitem",
    "collectionnumber",
    "country",
    "countrycode",
    "credits",
    "criticrating",
    "customrating",
    "dateadded",
    "director",
    "enddate",
    "fileinfo",
    "formed",
    "gamesdbid",
    "genre",
    "id",
    "imdb_id",
    "imdbid",
    "language",
    "lockdata",
    "lockedfields",
    "mpaa",
    "musicbrainzalbumartistid",
    "musicbrainzalbumid",
    "musicbrainzartistid",
    "musicbrainzreleasegroupid",
    "originaltitle",
    "outline",
    "plot",
    "premiered",
    "rating",
    "ratings",
    "releasedate",
    "review",
    "rottentomatoesid",
    "runtime",
    "set",
    "sorttitle",
    "studio",
    "style",
    "tag",
    "tagline",
    "title",
    "tmdbcolid",
    "tmdbid",
    "trailer",
    "tvcomid",
    "tvdbid",
    "tvrageid",
    "uniqueid",
    "writer",
    "year",
    "zap2itid",
];

/// Watch-state tags, managed only when a target user is configured.
const USER_DATA_TAGS: &[&str] = &[
    "isuserfavorite",
    "lastplayed",
    "playcount",
    "resume",
    "userrating",
    "watched",
];

fn kind_tags(kind: ItemKind) -> &'static [&'static str] {
    match kind {
        ItemKind::Movie | ItemKind::MusicVideo | ItemKind::Video => &["album", "artist", "id"],
        ItemKind::Episode => &[
            "aired",
            "season",
            "episode",
            "episodenumberend",
            "airsafter_season",
            "airsbefore_episode",
            "airsbefore_season",
            "displayseason",
            "displayepisode",
        ],
        ItemKind::Series => &[
            "id",
            "episodeguide",
            "season",
            "episode",
            "status",
            "displayorder",
            "airs_dayofweek",
            "airs_time",
        ],
        ItemKind::Season => &["seasonnumber"],
        ItemKind::MusicAlbum => &["track", "artist", "albumartist"],
        ItemKind::MusicArtist => &["album", "disbanded"],
        ItemKind::Collection => &["displayorder"],
        ItemKind::Person | ItemKind::Game => &[],
    }
}

/// The set of element names a save of one record rewrites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSchema {
    used: BTreeSet<String>,
}

impl TagSchema {
    /// Whether `tag` is managed for every kind.
    pub fn is_common(tag: &str) -> bool {
        let tag = tag.to_ascii_lowercase();
        COMMON_TAGS.binary_search(&tag.as_str()).is_ok()
    }

    /// Common tags, plus the kind's own tags, plus one `<provider>id` tag
    /// per populated provider id, plus watch-state tags when a target user
    /// is configured.
    pub fn for_record(record: &MetadataRecord, options: &NfoOptions) -> Self {
        let mut used: BTreeSet<String> = COMMON_TAGS.iter().map(|t| t.to_string()).collect();
        used.extend(kind_tags(record.kind).iter().map(|t| t.to_string()));
        used.extend(record.provider_ids.iter().map(|(name, _)| provider_tag(name)));
        if options.target_user().is_some() {
            used.extend(USER_DATA_TAGS.iter().map(|t| t.to_string()));
        }
        Self { used }
    }

    pub fn manages(&self, tag: &str) -> bool {
        self.used.contains(&tag.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}
