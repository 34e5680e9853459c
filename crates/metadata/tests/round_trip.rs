use chrono::{NaiveDate, NaiveDateTime};
use nfo_core::types::MetadataField;
use nfo_core::{ItemKind, LinkedItem, MetadataRecord, NfoOptions, Person, PersonType, ProviderIds};
use nfo_metadata::{NfoParser, NfoWriter};
use tokio_util::sync::CancellationToken;

fn movie() -> MetadataRecord {
    let mut record = MetadataRecord::new(ItemKind::Movie);
    record.title = Some("Alien".into());
    record.original_title = Some("Alien".into());
    record.sort_title = Some("Alien 1".into());
    record.overview = Some("The crew of the Nostromo answers a distress call.".into());
    record.tagline = Some("In space no one can hear you scream.".into());
    record.official_rating = Some("R".into());
    record.custom_rating = Some("Adults".into());
    record.community_rating = Some(8.5);
    record.critic_rating = Some(98.0);
    record.premiere_date = NaiveDate::from_ymd_opt(1979, 5, 25);
    record.production_year = Some(1979);
    record.runtime_minutes = Some(117);
    record.date_created = NaiveDateTime::parse_from_str("2024-02-01 10:30:00", "%Y-%m-%d %H:%M:%S").ok();
    record.add_genre("Horror");
    record.add_genre("Science Fiction");
    record.add_studio("Brandywine Productions");
    record.add_tag("space");
    record.add_country("United Kingdom");
    record.add_trailer("https://www.youtube.com/watch?v=LjLamj-b0I8");
    record.provider_ids.set("Imdb", "tt0078748");
    record.provider_ids.set("Tmdb", "348");
    record.is_locked = true;
    record.locked_fields.insert(MetadataField::Genres);
    record.preferred_language = Some("en".into());

    let mut director = Person::new("Ridley Scott", PersonType::Director);
    director.provider_ids.set("Tmdb", "578");
    record.add_person(director);
    record.add_person(Person::new("Dan O'Bannon", PersonType::Writer));
    let mut actor = Person::new("Sigourney Weaver", PersonType::Actor);
    actor.role = Some("Ripley".into());
    actor.sort_order = Some(0);
    actor.provider_ids.set("Imdb", "nm0000244");
    record.add_person(actor);

    let mut collection = ProviderIds::new();
    collection.set("TmdbCollection", "8091");
    record.collections.push(LinkedItem {
        name: "Alien Collection".into(),
        provider_ids: collection,
    });
    record.video_mut().unwrap().album = Some("Soundtrack".into());
    record
}

fn round_trip(record: &MetadataRecord) -> MetadataRecord {
    let options = NfoOptions::default();
    let bytes = NfoWriter::new(options.clone()).write(record, None).unwrap();
    NfoParser::new(options)
        .parse(record.kind, &bytes, &CancellationToken::new())
        .unwrap()
}

#[test]
fn movie_core_fields_survive() {
    let original = movie();
    let parsed = round_trip(&original);

    assert_eq!(parsed.title, original.title);
    assert_eq!(parsed.original_title, original.original_title);
    assert_eq!(parsed.sort_title, original.sort_title);
    assert_eq!(parsed.overview, original.overview);
    assert_eq!(parsed.tagline, original.tagline);
    assert_eq!(parsed.official_rating, original.official_rating);
    assert_eq!(parsed.custom_rating, original.custom_rating);
    assert_eq!(parsed.community_rating, original.community_rating);
    assert_eq!(parsed.critic_rating, original.critic_rating);
    assert_eq!(parsed.premiere_date, original.premiere_date);
    assert_eq!(parsed.production_year, original.production_year);
    assert_eq!(parsed.runtime_minutes, original.runtime_minutes);
    assert_eq!(parsed.date_created, original.date_created);
    assert_eq!(parsed.genres, original.genres);
    assert_eq!(parsed.studios, original.studios);
    assert_eq!(parsed.tags, original.tags);
    assert_eq!(parsed.countries, original.countries);
    assert_eq!(parsed.trailer_urls, original.trailer_urls);
    assert_eq!(parsed.provider_ids, original.provider_ids);
    assert_eq!(parsed.is_locked, original.is_locked);
    assert_eq!(parsed.locked_fields, original.locked_fields);
    assert_eq!(parsed.preferred_language, original.preferred_language);
    assert_eq!(parsed.people, original.people);
    assert_eq!(parsed.collections, original.collections);
    assert_eq!(parsed.video(), original.video());
}

#[test]
fn episode_fields_survive() {
    let mut record = MetadataRecord::new(ItemKind::Episode);
    record.title = Some("The Long Night".into());
    record.premiere_date = NaiveDate::from_ymd_opt(2019, 4, 28);
    record.provider_ids.set("Tvdb", "6862584");
    let ext = record.episode_mut().unwrap();
    ext.season_number = Some(8);
    ext.episode_number = Some(3);
    ext.airs_before_season = Some(9);

    let parsed = round_trip(&record);
    assert_eq!(parsed.title, record.title);
    assert_eq!(parsed.premiere_date, record.premiere_date);
    assert_eq!(parsed.provider_ids, record.provider_ids);
    assert_eq!(parsed.episode(), record.episode());
}

#[test]
fn series_fields_survive() {
    let mut record = MetadataRecord::new(ItemKind::Series);
    record.title = Some("Game of Thrones".into());
    record.provider_ids.set("Tvdb", "121361");
    record.provider_ids.set("Imdb", "tt0944947");
    record.end_date = NaiveDate::from_ymd_opt(2019, 5, 19);
    let ext = record.series_mut().unwrap();
    ext.add_air_day(chrono::Weekday::Sun);
    ext.add_air_day(chrono::Weekday::Mon);
    ext.air_time = Some("21:00".into());
    ext.status = Some(nfo_core::types::SeriesStatus::Ended);

    let parsed = round_trip(&record);
    assert_eq!(parsed.title, record.title);
    assert_eq!(parsed.provider_ids, record.provider_ids);
    assert_eq!(parsed.end_date, record.end_date);
    assert_eq!(parsed.series(), record.series());
}

#[test]
fn music_album_fields_survive() {
    let mut record = MetadataRecord::new(ItemKind::MusicAlbum);
    record.title = Some("Discovery".into());
    record.overview = Some("Second studio album.".into());
    record.add_tag("french house");
    let ext = record.music_mut().unwrap();
    ext.artists.push("Daft Punk".into());
    ext.album_artists.push("Daft Punk".into());

    let parsed = round_trip(&record);
    assert_eq!(parsed.overview, record.overview);
    assert_eq!(parsed.tags, record.tags);
    let (parsed_ext, ext) = (parsed.music().unwrap(), record.music().unwrap());
    assert_eq!(parsed_ext.artists, ext.artists);
    assert_eq!(parsed_ext.album_artists, ext.album_artists);
}

#[test]
fn watch_state_with_target_user() {
    let options = NfoOptions {
        target_user_id: Some("alice".into()),
        ..NfoOptions::default()
    };
    let mut record = MetadataRecord::new(ItemKind::Movie);
    record.runtime_minutes = Some(100);
    let data = record.user_data_mut();
    data.played = true;
    data.play_count = 2;
    data.is_favorite = true;
    data.position_seconds = Some(1234.5);

    let bytes = NfoWriter::new(options.clone()).write(&record, None).unwrap();
    let parsed = NfoParser::new(options)
        .parse(ItemKind::Movie, &bytes, &CancellationToken::new())
        .unwrap();
    assert_eq!(parsed.user_data, record.user_data);
}
