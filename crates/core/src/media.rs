use serde::{Deserialize, Serialize};

use crate::types::StreamKind;

/// One probed stream of the media source, written into
/// `fileinfo/streamdetails`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaStream {
    pub kind: StreamKind,
    pub codec: Option<String>,
    pub codec_tag: Option<String>,
    pub bitrate: Option<u64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub aspect_ratio: Option<String>,
    pub framerate: Option<f64>,
    pub language: Option<String>,
    pub is_interlaced: bool,
    pub channels: Option<u32>,
    pub sample_rate: Option<u32>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_forced: bool,
}

impl MediaStream {
    pub fn new(kind: StreamKind) -> Self {
        Self {
            kind,
            codec: None,
            codec_tag: None,
            bitrate: None,
            width: None,
            height: None,
            aspect_ratio: None,
            framerate: None,
            language: None,
            is_interlaced: false,
            channels: None,
            sample_rate: None,
            is_default: false,
            is_forced: false,
        }
    }
}

/// Probe summary accepted from ffprobe's `-print_format json -show_format
/// -show_streams` output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeSummary {
    pub duration_secs: Option<f64>,
    pub streams: Vec<MediaStream>,
}

impl ProbeSummary {
    pub fn runtime_minutes(&self) -> Option<i32> {
        self.duration_secs.map(|d| (d / 60.0).floor() as i32)
    }
}

/// Convert ffprobe JSON into stream descriptors. Unknown stream types
/// (data, attachments) are dropped.
pub fn parse_probe_output(raw: &serde_json::Value) -> ProbeSummary {
    let duration_secs = raw
        .get("format")
        .and_then(|f| f.get("duration"))
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse().ok());

    let streams = raw
        .get("streams")
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().filter_map(parse_stream).collect())
        .unwrap_or_default();

    ProbeSummary {
        duration_secs,
        streams,
    }
}

fn parse_stream(s: &serde_json::Value) -> Option<MediaStream> {
    let kind = match s.get("codec_type").and_then(|v| v.as_str()).unwrap_or("") {
        "video" => StreamKind::Video,
        "audio" => StreamKind::Audio,
        "subtitle" => StreamKind::Subtitle,
        _ => return None,
    };
    let str_field = |key: &str| s.get(key).and_then(|v| v.as_str()).map(str::to_string);
    let u32_field = |key: &str| s.get(key).and_then(|v| v.as_u64()).map(|n| n as u32);
    let flag = |key: &str| {
        s.get("disposition")
            .and_then(|d| d.get(key))
            .and_then(|v| v.as_u64())
            .unwrap_or(0)
            == 1
    };

    let mut stream = MediaStream::new(kind);
    stream.codec = str_field("codec_name");
    stream.codec_tag = str_field("codec_tag_string").filter(|t| !t.starts_with('['));
    stream.bitrate = s
        .get("bit_rate")
        .and_then(|v| v.as_str())
        .and_then(|b| b.parse().ok());
    stream.language = s
        .get("tags")
        .and_then(|t| t.get("language"))
        .and_then(|v| v.as_str())
        .map(str::to_string);
    stream.is_default = flag("default");
    stream.is_forced = flag("forced");

    match kind {
        StreamKind::Video => {
            stream.width = u32_field("width");
            stream.height = u32_field("height");
            stream.aspect_ratio = str_field("display_aspect_ratio");
            stream.framerate = s
                .get("r_frame_rate")
                .and_then(|v| v.as_str())
                .and_then(parse_fraction);
            stream.is_interlaced = s
                .get("field_order")
                .and_then(|v| v.as_str())
                .is_some_and(|o| o != "progressive" && o != "unknown");
        }
        StreamKind::Audio => {
            stream.channels = u32_field("channels");
            stream.sample_rate = s
                .get("sample_rate")
                .and_then(|v| v.as_str())
                .and_then(|r| r.parse().ok());
        }
        StreamKind::Subtitle => {}
    }

    Some(stream)
}

/// Parse an ffprobe rational such as `24000/1001`.
pub fn parse_fraction(s: &str) -> Option<f64> {
    let (num, den) = s.split_once('/')?;
    let num: f64 = num.parse().ok()?;
    let den: f64 = den.parse().ok()?;
    if den == 0.0 { None } else { Some(num / den) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_probe_json() {
        let raw = serde_json::json!({
            "format": { "format_name": "matroska,webm", "duration": "7265.5" },
            "streams": [
                {
                    "index": 0, "codec_type": "video", "codec_name": "h264",
                    "codec_tag_string": "[0][0][0][0]",
                    "width": 1920, "height": 1080, "r_frame_rate": "24000/1001",
                    "display_aspect_ratio": "16:9", "field_order": "progressive",
                    "disposition": { "default": 1, "forced": 0 }
                },
                {
                    "index": 1, "codec_type": "audio", "codec_name": "dts",
                    "channels": 6, "sample_rate": "48000", "bit_rate": "1536000",
                    "tags": { "language": "eng" },
                    "disposition": { "default": 1 }
                },
                {
                    "index": 2, "codec_type": "subtitle", "codec_name": "subrip",
                    "tags": { "language": "fre" },
                    "disposition": { "forced": 1 }
                },
                { "index": 3, "codec_type": "attachment" }
            ]
        });

        let summary = parse_probe_output(&raw);
        assert_eq!(summary.runtime_minutes(), Some(121));
        assert_eq!(summary.streams.len(), 3);

        let video = &summary.streams[0];
        assert_eq!(video.kind, StreamKind::Video);
        assert_eq!(video.codec.as_deref(), Some("h264"));
        assert!(video.codec_tag.is_none());
        assert_eq!(video.width, Some(1920));
        assert!(!video.is_interlaced);
        assert!((video.framerate.unwrap() - 23.976).abs() < 0.01);

        let audio = &summary.streams[1];
        assert_eq!(audio.channels, Some(6));
        assert_eq!(audio.sample_rate, Some(48000));
        assert_eq!(audio.bitrate, Some(1_536_000));
        assert_eq!(audio.language.as_deref(), Some("eng"));

        assert!(summary.streams[2].is_forced);
    }

    #[test]
    fn parse_fraction_works() {
        assert!((parse_fraction("24000/1001").unwrap() - 23.976).abs() < 0.001);
        assert_eq!(parse_fraction("25/1"), Some(25.0));
        assert_eq!(parse_fraction("0/0"), None);
        assert_eq!(parse_fraction("invalid"), None);
    }
}
