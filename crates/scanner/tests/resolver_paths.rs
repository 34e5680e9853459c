use nfo_core::{ContainerKind, ItemKind};
use nfo_scanner::{ItemLocation, resolve};

fn pairs(kind: ItemKind, container: ContainerKind, path: &str, mixed: bool, prefer: bool) -> Vec<(String, String)> {
    ItemLocation::new(kind, path)
        .with_container(container)
        .mixed_folder(mixed)
        .candidates(prefer)
        .into_iter()
        .map(|c| (c.directory, c.file_name))
        .collect()
}

fn pair(dir: &str, name: &str) -> (String, String) {
    (dir.to_string(), name.to_string())
}

const MOVIE: &str = r"C:\Video\Movies\9 (2009)\9 (2009) - BluRay 1080p DTS x264-Group.mkv";
const MOVIE_DIR: &str = r"C:\Video\Movies\9 (2009)";
const MOVIE_NFO: &str = "9 (2009) - BluRay 1080p DTS x264-Group.nfo";

#[test]
fn movie_basename_before_movie_nfo() {
    assert_eq!(
        pairs(ItemKind::Movie, ContainerKind::File, MOVIE, false, false),
        vec![pair(MOVIE_DIR, MOVIE_NFO), pair(MOVIE_DIR, "movie.nfo")]
    );
}

#[test]
fn movie_nfo_first_when_preferred() {
    assert_eq!(
        pairs(ItemKind::Movie, ContainerKind::File, MOVIE, false, true),
        vec![pair(MOVIE_DIR, "movie.nfo"), pair(MOVIE_DIR, MOVIE_NFO)]
    );
}

#[test]
fn mixed_folder_only_basename() {
    for prefer in [false, true] {
        assert_eq!(
            pairs(ItemKind::Movie, ContainerKind::File, MOVIE, true, prefer),
            vec![pair(MOVIE_DIR, MOVIE_NFO)]
        );
    }
}

#[test]
fn dvd_folder() {
    assert_eq!(
        pairs(ItemKind::Movie, ContainerKind::Dvd, r"D:\Movies\Leon (1994)", false, false),
        vec![
            pair(r"D:\Movies\Leon (1994)\VIDEO_TS", "VIDEO_TS.nfo"),
            pair(r"D:\Movies\Leon (1994)", "Leon (1994).nfo"),
        ]
    );
}

#[test]
fn dvd_folder_ignores_preference_and_mixing() {
    assert_eq!(
        pairs(ItemKind::Movie, ContainerKind::Dvd, r"C:\Video\Movies\Léon (1994)", true, true),
        vec![
            pair(r"C:\Video\Movies\Léon (1994)\VIDEO_TS", "VIDEO_TS.nfo"),
            pair(r"C:\Video\Movies\Léon (1994)", "Léon (1994).nfo"),
        ]
    );
}

#[test]
fn bluray_folder() {
    assert_eq!(
        pairs(ItemKind::Movie, ContainerKind::Bluray, r"E:\Movies\Movies\Alien (1979)", false, false),
        vec![
            pair(r"E:\Movies\Movies\Alien (1979)\BDMV", "index.nfo"),
            pair(r"E:\Movies\Movies\Alien (1979)", "Alien (1979).nfo"),
        ]
    );
}

#[test]
fn unix_music_video() {
    assert_eq!(
        pairs(ItemKind::MusicVideo, ContainerKind::File, "/mv/Air - Sexy Boy.mp4", false, false),
        vec![pair("/mv", "Air - Sexy Boy.nfo"), pair("/mv", "movie.nfo")]
    );
}

#[test]
fn pure_function_matches_location_helper() {
    let direct = resolve(
        ItemKind::Episode,
        ContainerKind::File,
        r"\\nas\tv\Lost\Season 1",
        r"\\nas\tv\Lost\Season 1\S01E01.avi",
        false,
        false,
    );
    assert_eq!(direct.len(), 1);
    assert_eq!(direct[0].path(), r"\\nas\tv\Lost\Season 1\S01E01.nfo");
}
