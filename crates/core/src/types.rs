use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Generates `as_str`, `Display` and a case-insensitive `FromStr` for a
/// unit enum. Parsing ignores `_`, `-` and spaces so `music_video`,
/// `MusicVideo` and `musicvideo` all resolve to the same variant.
macro_rules! string_enum {
    ($ty:ident, $label:literal, { $($variant:ident => $s:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$(Self::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = normalize(s);
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| normalize(v.as_str()) == wanted)
                    .ok_or_else(|| CoreError::unknown($label, s))
            }
        }
    };
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Library item kind a sidecar file describes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    #[default]
    Movie,
    MusicVideo,
    Video,
    Series,
    Season,
    Episode,
    MusicAlbum,
    MusicArtist,
    Collection,
    Person,
    Game,
}

string_enum!(ItemKind, "item kind", {
    Movie => "movie",
    MusicVideo => "music_video",
    Video => "video",
    Series => "series",
    Season => "season",
    Episode => "episode",
    MusicAlbum => "music_album",
    MusicArtist => "music_artist",
    Collection => "collection",
    Person => "person",
    Game => "game",
});

impl ItemKind {
    /// Name of the root element of a document describing this kind.
    pub fn root_element(self) -> &'static str {
        match self {
            Self::Movie | Self::Video => "movie",
            Self::MusicVideo => "musicvideo",
            Self::Series => "tvshow",
            Self::Season => "season",
            Self::Episode => "episodedetails",
            Self::MusicAlbum => "album",
            Self::MusicArtist => "artist",
            Self::Collection => "collection",
            Self::Person => "person",
            Self::Game => "game",
        }
    }

    pub fn is_video(self) -> bool {
        matches!(
            self,
            Self::Movie | Self::MusicVideo | Self::Video | Self::Episode
        )
    }

    pub fn is_folder(self) -> bool {
        matches!(
            self,
            Self::Series | Self::Season | Self::MusicAlbum | Self::MusicArtist | Self::Collection
        )
    }

    /// Kinds whose files are often hand-edited with a bare link pasted after
    /// the closing root tag.
    pub fn supports_salvage(self) -> bool {
        matches!(
            self,
            Self::Movie | Self::MusicVideo | Self::Video | Self::Series
        )
    }

    /// Kinds that may store several sibling root documents in one file.
    pub fn supports_multiple_documents(self) -> bool {
        matches!(self, Self::Episode)
    }
}

/// On-disk layout of an item's media source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    #[default]
    File,
    Dvd,
    Bluray,
}

string_enum!(ContainerKind, "container kind", {
    File => "file",
    Dvd => "dvd",
    Bluray => "bluray",
});

impl ContainerKind {
    pub fn is_disc(self) -> bool {
        matches!(self, Self::Dvd | Self::Bluray)
    }
}

/// Credit type of a person attached to an item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonType {
    #[default]
    Actor,
    Director,
    Writer,
}

string_enum!(PersonType, "person type", {
    Actor => "Actor",
    Director => "Director",
    Writer => "Writer",
});

/// Fields a user can lock against automatic refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MetadataField {
    Cast,
    Genres,
    ProductionLocations,
    Studios,
    Tags,
    Name,
    Overview,
    Runtime,
    OfficialRating,
}

string_enum!(MetadataField, "metadata field", {
    Cast => "Cast",
    Genres => "Genres",
    ProductionLocations => "ProductionLocations",
    Studios => "Studios",
    Tags => "Tags",
    Name => "Name",
    Overview => "Overview",
    Runtime => "Runtime",
    OfficialRating => "OfficialRating",
});

/// Stereoscopic layout of a video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Video3DFormat {
    HalfSideBySide,
    FullSideBySide,
    HalfTopAndBottom,
    FullTopAndBottom,
    Mvc,
}

string_enum!(Video3DFormat, "3d format", {
    HalfSideBySide => "HalfSideBySide",
    FullSideBySide => "FullSideBySide",
    HalfTopAndBottom => "HalfTopAndBottom",
    FullTopAndBottom => "FullTopAndBottom",
    Mvc => "MVC",
});

impl Video3DFormat {
    /// Short code used inside `fileinfo/streamdetails/video/format3d`.
    pub fn nfo_code(self) -> &'static str {
        match self {
            Self::HalfSideBySide => "hsbs",
            Self::FullSideBySide => "fsbs",
            Self::HalfTopAndBottom => "htab",
            Self::FullTopAndBottom => "ftab",
            Self::Mvc => "mvc",
        }
    }

    pub fn from_nfo_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "hsbs" => Some(Self::HalfSideBySide),
            "fsbs" => Some(Self::FullSideBySide),
            "htab" => Some(Self::HalfTopAndBottom),
            "ftab" => Some(Self::FullTopAndBottom),
            "mvc" => Some(Self::Mvc),
            _ => None,
        }
    }
}

/// Airing status of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesStatus {
    Continuing,
    Ended,
}

string_enum!(SeriesStatus, "series status", {
    Continuing => "Continuing",
    Ended => "Ended",
});

/// Episode ordering used when presenting a series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesDisplayOrder {
    #[default]
    Aired,
    Absolute,
    Dvd,
}

string_enum!(SeriesDisplayOrder, "series display order", {
    Aired => "aired",
    Absolute => "absolute",
    Dvd => "dvd",
});

/// Child ordering of a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionDisplayOrder {
    #[default]
    PremiereDate,
    SortName,
}

string_enum!(CollectionDisplayOrder, "collection display order", {
    PremiereDate => "PremiereDate",
    SortName => "SortName",
});

/// Media stream category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    Video,
    Audio,
    Subtitle,
}

string_enum!(StreamKind, "stream kind", {
    Video => "video",
    Audio => "audio",
    Subtitle => "subtitle",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ignores_case_and_separators() {
        assert_eq!("MusicVideo".parse::<ItemKind>().unwrap(), ItemKind::MusicVideo);
        assert_eq!("music_video".parse::<ItemKind>().unwrap(), ItemKind::MusicVideo);
        assert_eq!("GENRES".parse::<MetadataField>().unwrap(), MetadataField::Genres);
        assert_eq!("Dvd".parse::<SeriesDisplayOrder>().unwrap(), SeriesDisplayOrder::Dvd);
        assert!("nonsense".parse::<SeriesStatus>().is_err());
        assert_eq!("Game".parse::<ItemKind>().unwrap(), ItemKind::Game);
    }

    #[test]
    fn root_elements() {
        assert_eq!(ItemKind::Movie.root_element(), "movie");
        assert_eq!(ItemKind::Video.root_element(), "movie");
        assert_eq!(ItemKind::Series.root_element(), "tvshow");
        assert_eq!(ItemKind::Episode.root_element(), "episodedetails");
        assert_eq!(ItemKind::MusicAlbum.root_element(), "album");
        assert_eq!(ItemKind::Game.root_element(), "game");
    }

    #[test]
    fn format3d_codes() {
        assert_eq!(Video3DFormat::from_nfo_code("HSBS"), Some(Video3DFormat::HalfSideBySide));
        assert_eq!(Video3DFormat::from_nfo_code("mvc"), Some(Video3DFormat::Mvc));
        assert_eq!(Video3DFormat::from_nfo_code("anaglyph"), None);
        assert_eq!(Video3DFormat::FullTopAndBottom.nfo_code(), "ftab");
    }

    #[test]
    fn salvage_and_folder_kinds() {
        assert!(ItemKind::Movie.supports_salvage());
        assert!(ItemKind::Series.supports_salvage());
        assert!(!ItemKind::Episode.supports_salvage());
        assert!(ItemKind::Season.is_folder());
        assert!(!ItemKind::Game.supports_salvage());
        assert!(!ItemKind::Game.is_folder());
        assert!(!ItemKind::Game.is_video());
        assert!(!ItemKind::Episode.is_folder());
    }
}
