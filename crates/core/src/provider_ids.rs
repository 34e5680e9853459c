use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Well-known provider names.
pub mod provider {
    pub const IMDB: &str = "Imdb";
    pub const TMDB: &str = "Tmdb";
    pub const TVDB: &str = "Tvdb";
    pub const TMDB_COLLECTION: &str = "TmdbCollection";
    pub const ZAP2IT: &str = "Zap2It";
    pub const TVRAGE: &str = "TvRage";
    pub const TVMAZE: &str = "TvMaze";
    pub const AUDIODB_ARTIST: &str = "AudioDbArtist";
    pub const AUDIODB_ALBUM: &str = "AudioDbAlbum";
    pub const MUSICBRAINZ_ARTIST: &str = "MusicBrainzArtist";
    pub const MUSICBRAINZ_ALBUM_ARTIST: &str = "MusicBrainzAlbumArtist";
    pub const MUSICBRAINZ_ALBUM: &str = "MusicBrainzAlbum";
    pub const MUSICBRAINZ_RELEASE_GROUP: &str = "MusicBrainzReleaseGroup";
    pub const GAMESDB: &str = "GamesDb";

    pub const KNOWN: &[&str] = &[
        IMDB,
        TMDB,
        TVDB,
        TMDB_COLLECTION,
        ZAP2IT,
        TVRAGE,
        TVMAZE,
        AUDIODB_ARTIST,
        AUDIODB_ALBUM,
        MUSICBRAINZ_ARTIST,
        MUSICBRAINZ_ALBUM_ARTIST,
        MUSICBRAINZ_ALBUM,
        MUSICBRAINZ_RELEASE_GROUP,
        GAMESDB,
    ];
}

/// An id is stored only when it is non-blank and not the `0` placeholder.
pub fn is_valid_id(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value != "0"
}

/// Ordered provider-name → id map with case-insensitive keys.
///
/// Insertion order is preserved so written files list ids in the order
/// they were discovered. Re-inserting an existing key overwrites the
/// value in place.
#[derive(Debug, Clone, Default)]
pub struct ProviderIds(Vec<(String, String)>);

impl ProviderIds {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|i| self.0[i].1.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Store `value` under `name`. Returns false (and stores nothing) when
    /// the name is blank or the value is not a valid id.
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || !is_valid_id(value) {
            return false;
        }
        let value = value.trim().to_string();
        match self.position(name) {
            Some(i) => self.0[i].1 = value,
            None => self.0.push((name.to_string(), value)),
        }
        true
    }

    /// Whether any provider already stores `value`, compared
    /// case-insensitively.
    pub fn holds_value(&self, value: &str) -> bool {
        let value = value.trim();
        self.0.iter().any(|(_, v)| v.eq_ignore_ascii_case(value))
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.position(name).map(|i| self.0.remove(i).1)
    }

    /// Copy every id from `other`, overwriting on key collisions.
    pub fn extend_from(&mut self, other: &ProviderIds) {
        for (k, v) in other.iter() {
            self.set(k, v);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for ProviderIds {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for ProviderIds {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut ids = Self::new();
        for (k, v) in iter {
            ids.set(k.as_ref(), v.as_ref());
        }
        ids
    }
}

impl Serialize for ProviderIds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ProviderIds {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdsVisitor;

        impl<'de> Visitor<'de> for IdsVisitor {
            type Value = ProviderIds;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of provider names to ids")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut ids = ProviderIds::new();
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    ids.set(&k, &v);
                }
                Ok(ids)
            }
        }

        deserializer.deserialize_map(IdsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_case_insensitive() {
        let mut ids = ProviderIds::new();
        ids.set("Imdb", "tt0111161");
        assert_eq!(ids.get("IMDB"), Some("tt0111161"));
        ids.set("imdb", "tt0068646");
        assert_eq!(ids.len(), 1);
        assert_eq!(ids.get("Imdb"), Some("tt0068646"));
    }

    #[test]
    fn zero_and_blank_ids_are_rejected() {
        let mut ids = ProviderIds::new();
        assert!(!ids.set("Tmdb", "0"));
        assert!(!ids.set("Tmdb", ""));
        assert!(!ids.set("Tmdb", "   "));
        assert!(!ids.set("", "603"));
        assert!(ids.is_empty());
        assert!(ids.set("Tmdb", " 603 "));
        assert_eq!(ids.get("tmdb"), Some("603"));
    }

    #[test]
    fn equality_ignores_order() {
        let a: ProviderIds = [("Imdb", "tt1"), ("Tmdb", "2")].into_iter().collect();
        let b: ProviderIds = [("tmdb", "2"), ("IMDB", "tt1")].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn json_keeps_order_and_drops_invalid() {
        let ids: ProviderIds =
            serde_json::from_str(r#"{"Tvdb":"81189","Imdb":"0","Tmdb":"1396"}"#).unwrap();
        assert_eq!(ids.len(), 2);
        let json = serde_json::to_string(&ids).unwrap();
        assert_eq!(json, r#"{"Tvdb":"81189","Tmdb":"1396"}"#);
    }
}
