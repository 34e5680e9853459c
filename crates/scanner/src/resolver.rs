//! Candidate sidecar locations per item kind and on-disk layout.
//!
//! Rules:
//! - DVD folder:     `{folder}/VIDEO_TS/VIDEO_TS.nfo`, then `{folder}/{folder-name}.nfo`
//! - Blu-ray folder: `{folder}/BDMV/index.nfo`, then `{folder}/{folder-name}.nfo`
//! - Plain file:     `{basename}.nfo` then `movie.nfo` (reversed when `movie.nfo`
//!   is preferred, `movie.nfo` dropped in mixed folders)
//! - Series/season/album/artist: one fixed name inside the item folder
//! - Collection/person: one fixed name inside the internal metadata folder
//! - Episode, game: the media path with its extension replaced by `.nfo`
//!
//! The first existing candidate is read; the first candidate is the save target.

use std::path::PathBuf;

use nfo_core::{ContainerKind, ItemKind};
use serde::{Deserialize, Serialize};

use crate::paths;

/// A directory plus file name a sidecar may live at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub directory: String,
    pub file_name: String,
}

impl Candidate {
    fn new(directory: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            file_name: file_name.into(),
        }
    }

    pub fn path(&self) -> String {
        paths::join(&self.directory, &self.file_name)
    }

    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf::from(self.path())
    }
}

/// Where an item lives, as reported by the host catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemLocation {
    pub kind: ItemKind,
    #[serde(default)]
    pub container: ContainerKind,
    /// Media file path, or the folder path for folder items and disc rips.
    pub path: String,
    /// Overrides the folder derived from `path`.
    #[serde(default)]
    pub containing_folder: Option<String>,
    #[serde(default)]
    pub is_in_mixed_folder: bool,
    /// Host-owned folder for items with no media path (collections, people).
    #[serde(default)]
    pub internal_metadata_path: Option<String>,
}

impl ItemLocation {
    pub fn new(kind: ItemKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            container: ContainerKind::File,
            path: path.into(),
            containing_folder: None,
            is_in_mixed_folder: false,
            internal_metadata_path: None,
        }
    }

    pub fn with_container(mut self, container: ContainerKind) -> Self {
        self.container = container;
        self
    }

    pub fn mixed_folder(mut self, mixed: bool) -> Self {
        self.is_in_mixed_folder = mixed;
        self
    }

    pub fn with_internal_metadata_path(mut self, path: impl Into<String>) -> Self {
        self.internal_metadata_path = Some(path.into());
        self
    }

    /// Folder the item's sidecar belongs in.
    pub fn folder(&self) -> Option<String> {
        if matches!(self.kind, ItemKind::Collection | ItemKind::Person) {
            return self.internal_metadata_path.clone();
        }
        if let Some(folder) = &self.containing_folder {
            return Some(folder.clone());
        }
        if self.kind.is_folder() || self.container.is_disc() {
            return Some(paths::trim_trailing_separators(&self.path).to_string());
        }
        paths::parent(&self.path).map(str::to_string)
    }

    pub fn candidates(&self, prefer_alternate_name: bool) -> Vec<Candidate> {
        let folder = self.folder().unwrap_or_default();
        resolve(
            self.kind,
            self.container,
            &folder,
            &self.path,
            self.is_in_mixed_folder,
            prefer_alternate_name,
        )
    }
}

/// Ordered sidecar candidates for an item.
pub fn resolve(
    kind: ItemKind,
    container: ContainerKind,
    folder: &str,
    item_path: &str,
    is_mixed_folder: bool,
    prefer_alternate_name: bool,
) -> Vec<Candidate> {
    let folder = paths::trim_trailing_separators(folder.trim());

    // Collections and people have no media path of their own.
    if matches!(kind, ItemKind::Collection | ItemKind::Person) {
        if folder.is_empty() {
            return Vec::new();
        }
        let name = if kind == ItemKind::Collection {
            "collection.nfo"
        } else {
            "person.nfo"
        };
        return vec![Candidate::new(folder, name)];
    }

    let item_path = item_path.trim();
    if item_path.is_empty() || paths::is_remote(item_path) || folder.is_empty() {
        return Vec::new();
    }

    match kind {
        ItemKind::Series => vec![Candidate::new(folder, "tvshow.nfo")],
        ItemKind::Season => vec![Candidate::new(folder, "season.nfo")],
        ItemKind::MusicAlbum => vec![Candidate::new(folder, "album.nfo")],
        ItemKind::MusicArtist => vec![Candidate::new(folder, "artist.nfo")],
        ItemKind::Episode | ItemKind::Game => {
            let nfo = paths::with_extension(item_path, "nfo");
            match paths::parent(&nfo) {
                Some(dir) => vec![Candidate::new(dir, paths::file_name(&nfo))],
                None => Vec::new(),
            }
        }
        ItemKind::Movie | ItemKind::MusicVideo | ItemKind::Video => {
            movie_candidates(container, folder, item_path, is_mixed_folder, prefer_alternate_name)
        }
        ItemKind::Collection | ItemKind::Person => Vec::new(),
    }
}

fn movie_candidates(
    container: ContainerKind,
    folder: &str,
    item_path: &str,
    is_mixed_folder: bool,
    prefer_alternate_name: bool,
) -> Vec<Candidate> {
    let folder_nfo = || format!("{}.nfo", paths::file_name(folder));

    match container {
        ContainerKind::Dvd => vec![
            Candidate::new(paths::join(folder, "VIDEO_TS"), "VIDEO_TS.nfo"),
            Candidate::new(folder, folder_nfo()),
        ],
        ContainerKind::Bluray => vec![
            Candidate::new(paths::join(folder, "BDMV"), "index.nfo"),
            Candidate::new(folder, folder_nfo()),
        ],
        ContainerKind::File => {
            let basename = format!("{}.nfo", paths::file_stem(paths::file_name(item_path)));
            if is_mixed_folder {
                vec![Candidate::new(folder, basename)]
            } else if prefer_alternate_name {
                vec![
                    Candidate::new(folder, "movie.nfo"),
                    Candidate::new(folder, basename),
                ]
            } else {
                vec![
                    Candidate::new(folder, basename),
                    Candidate::new(folder, "movie.nfo"),
                ]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(c: &[Candidate]) -> Vec<(&str, &str)> {
        c.iter()
            .map(|c| (c.directory.as_str(), c.file_name.as_str()))
            .collect()
    }

    #[test]
    fn fixed_name_kinds() {
        let series = ItemLocation::new(ItemKind::Series, "/tv/Lost/");
        assert_eq!(pairs(&series.candidates(false)), vec![("/tv/Lost", "tvshow.nfo")]);

        let season = ItemLocation::new(ItemKind::Season, "/tv/Lost/Season 1");
        assert_eq!(
            pairs(&season.candidates(true)),
            vec![("/tv/Lost/Season 1", "season.nfo")]
        );

        let album = ItemLocation::new(ItemKind::MusicAlbum, "/music/Air/Moon Safari");
        assert_eq!(album.candidates(false)[0].file_name, "album.nfo");

        let artist = ItemLocation::new(ItemKind::MusicArtist, "/music/Air");
        assert_eq!(artist.candidates(false)[0].path(), "/music/Air/artist.nfo");
    }

    #[test]
    fn internal_kinds_need_metadata_path() {
        let bare = ItemLocation::new(ItemKind::Collection, "");
        assert!(bare.candidates(false).is_empty());

        let boxset = ItemLocation::new(ItemKind::Collection, "")
            .with_internal_metadata_path("/config/metadata/collections/Alien");
        assert_eq!(
            boxset.candidates(false)[0].path(),
            "/config/metadata/collections/Alien/collection.nfo"
        );

        let person = ItemLocation::new(ItemKind::Person, "")
            .with_internal_metadata_path("/config/metadata/people/S/Sigourney Weaver");
        assert_eq!(person.candidates(false)[0].file_name, "person.nfo");
    }

    #[test]
    fn episode_replaces_extension() {
        let ep = ItemLocation::new(ItemKind::Episode, "/tv/Lost/Season 1/Lost S01E01.mkv");
        assert_eq!(
            pairs(&ep.candidates(true)),
            vec![("/tv/Lost/Season 1", "Lost S01E01.nfo")]
        );
    }

    #[test]
    fn game_replaces_extension() {
        let game = ItemLocation::new(ItemKind::Game, r"D:\Games\Outer Wilds\OuterWilds.exe");
        assert_eq!(
            pairs(&game.candidates(true)),
            vec![(r"D:\Games\Outer Wilds", "OuterWilds.nfo")]
        );
        let remote = ItemLocation::new(ItemKind::Game, "http://host/game.iso");
        assert!(remote.candidates(false).is_empty());
    }

    #[test]
    fn remote_or_empty_paths_have_no_candidates() {
        let remote = ItemLocation::new(ItemKind::Movie, "http://host/stream.mkv");
        assert!(remote.candidates(false).is_empty());
        let empty = ItemLocation::new(ItemKind::Movie, "  ");
        assert!(empty.candidates(false).is_empty());
    }

    #[test]
    fn containing_folder_override() {
        let mut loc = ItemLocation::new(ItemKind::Movie, "/m/a.mkv");
        loc.containing_folder = Some("/elsewhere".into());
        assert_eq!(
            pairs(&loc.candidates(false)),
            vec![("/elsewhere", "a.nfo"), ("/elsewhere", "movie.nfo")]
        );
    }
}
