//! Fields only some item kinds write.

use chrono::Weekday;
use nfo_core::provider_ids::provider;
use nfo_core::{Extension, ItemKind, MetadataRecord};

use super::{Document, XmlOut};
use crate::Result;

pub fn write(doc: &Document<'_>, out: &mut XmlOut, record: &MetadataRecord) -> Result<()> {
    match &record.extension {
        Extension::Video(ext) => {
            out.opt("id", record.provider_ids.get(provider::IMDB))?;
            out.each("artist", &ext.artists)?;
            out.opt("album", ext.album.as_deref())?;
        }
        Extension::Episode(ext) => {
            let episode = ext
                .episode_number
                .map(|n| n + i32::try_from(doc.index).unwrap_or(0));
            out.opt("episode", episode)?;
            if doc.is_single() {
                out.opt("episodenumberend", ext.episode_number_end)?;
            }
            out.opt("season", ext.season_number)?;
            out.opt("aired", record.premiere_date.map(|d| doc.dates.format(d)))?;
            out.opt("displayseason", ext.display_season)?;
            out.opt("displayepisode", ext.display_episode)?;
            out.opt("airsafter_season", ext.airs_after_season)?;
            out.opt("airsbefore_season", ext.airs_before_season)?;
            out.opt("airsbefore_episode", ext.airs_before_episode)?;
        }
        Extension::Series(ext) => {
            out.opt("id", record.provider_ids.get(provider::TVDB))?;
            if !record.provider_ids.is_empty() {
                let guide: serde_json::Map<String, serde_json::Value> = record
                    .provider_ids
                    .iter()
                    .map(|(name, value)| (name.to_ascii_lowercase(), value.into()))
                    .collect();
                out.element("episodeguide", &serde_json::Value::Object(guide).to_string())?;
            }
            out.element("season", "-1")?;
            out.element("episode", "-1")?;
            out.element("displayorder", ext.display_order.as_str())?;
            out.opt("status", ext.status)?;
            for day in &ext.air_days {
                out.element("airs_dayofweek", weekday_name(*day))?;
            }
            out.opt("airs_time", ext.air_time.as_deref())?;
        }
        Extension::Season(ext) => {
            out.opt("seasonnumber", ext.season_number)?;
        }
        Extension::Music(ext) if record.kind == ItemKind::MusicAlbum => {
            out.each("artist", &ext.artists)?;
            out.each("albumartist", &ext.album_artists)?;
            for track in &ext.tracks {
                out.start("track")?;
                out.opt("position", track.number)?;
                out.element("title", &track.title)?;
                out.opt("duration", track.duration_seconds.map(format_duration))?;
                out.end("track")?;
            }
        }
        Extension::Music(ext) => {
            out.opt("disbanded", record.end_date.map(|d| doc.dates.format(d)))?;
            for album in &ext.albums {
                out.start("album")?;
                out.element("title", &album.title)?;
                out.opt("year", album.year)?;
                out.end("album")?;
            }
        }
        Extension::Collection(ext) => {
            out.element("displayorder", ext.display_order.as_str())?;
        }
        Extension::None => {}
    }
    Ok(())
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

/// `mm:ss`, minutes unbounded.
fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NfoWriter;
    use nfo_core::record::TrackEntry;
    use nfo_core::types::SeriesStatus;

    fn write(record: &MetadataRecord) -> String {
        String::from_utf8(NfoWriter::default().write(record, None).unwrap()).unwrap()
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(0), "00:00");
        assert_eq!(format_duration(245), "04:05");
        assert_eq!(format_duration(3725), "62:05");
    }

    #[test]
    fn series_fields() {
        let mut record = MetadataRecord::new(ItemKind::Series);
        record.provider_ids.set("Tvdb", "81189");
        let ext = record.series_mut().unwrap();
        ext.status = Some(SeriesStatus::Ended);
        ext.add_air_day(Weekday::Sun);
        ext.air_time = Some("9:00 PM".into());

        let xml = write(&record);
        assert!(xml.contains("<episodeguide>{&quot;tvdb&quot;:&quot;81189&quot;}</episodeguide>")
            || xml.contains(r#"<episodeguide>{"tvdb":"81189"}</episodeguide>"#));
        assert!(xml.contains("<status>Ended</status>"));
        assert!(xml.contains("<airs_dayofweek>Sunday</airs_dayofweek>"));
        assert!(xml.contains("<displayorder>aired</displayorder>"));
    }

    #[test]
    fn album_tracks() {
        let mut record = MetadataRecord::new(ItemKind::MusicAlbum);
        let ext = record.music_mut().unwrap();
        ext.artists.push("Daft Punk".into());
        ext.tracks.push(TrackEntry {
            number: Some(1),
            title: "One More Time".into(),
            duration_seconds: Some(320),
        });
        let xml = write(&record);
        assert!(xml.contains("<artist>Daft Punk</artist>"));
        assert!(xml.contains("<position>1</position>"));
        assert!(xml.contains("<duration>05:20</duration>"));
        assert!(!xml.contains("<disbanded>"));
    }
}
