//! `fileinfo/streamdetails`, one block per probed stream.

use nfo_core::MetadataRecord;
use nfo_core::media::MediaStream;
use nfo_core::types::StreamKind;

use super::XmlOut;
use crate::Result;

pub fn write(out: &mut XmlOut, record: &MetadataRecord) -> Result<()> {
    if record.media_streams.is_empty() {
        return Ok(());
    }
    out.start("fileinfo")?;
    out.start("streamdetails")?;
    for stream in &record.media_streams {
        let element = stream.kind.as_str();
        out.start(element)?;
        match stream.kind {
            StreamKind::Video => video(out, record, stream)?,
            StreamKind::Audio => audio(out, stream)?,
            StreamKind::Subtitle => {
                out.opt("codec", stream.codec.as_deref())?;
                out.opt("language", stream.language.as_deref())?;
            }
        }
        flags(out, stream)?;
        out.end(element)?;
    }
    out.end("streamdetails")?;
    out.end("fileinfo")
}

/// Kodi reports Xvid under its own name even though the codec is MPEG-4.
fn codec_name(stream: &MediaStream) -> Option<&str> {
    let codec = stream.codec.as_deref()?;
    match stream.codec_tag.as_deref() {
        Some(tag) if codec.eq_ignore_ascii_case("mpeg4") && tag.eq_ignore_ascii_case("xvid") => {
            Some("xvid")
        }
        _ => Some(codec),
    }
}

fn codec(out: &mut XmlOut, stream: &MediaStream) -> Result<()> {
    let name = codec_name(stream);
    out.opt("codec", name)?;
    out.opt("micodec", name)?;
    out.opt("bitrate", stream.bitrate)
}

fn video(out: &mut XmlOut, record: &MetadataRecord, stream: &MediaStream) -> Result<()> {
    codec(out, stream)?;
    out.opt("width", stream.width)?;
    out.opt("height", stream.height)?;
    out.opt("aspect", stream.aspect_ratio.as_deref())?;
    out.opt("aspectratio", stream.aspect_ratio.as_deref())?;
    out.opt("framerate", stream.framerate)?;
    out.opt("language", stream.language.as_deref())?;
    out.element(
        "scantype",
        if stream.is_interlaced {
            "interlaced"
        } else {
            "progressive"
        },
    )?;
    if let Some(minutes) = record.runtime_minutes.filter(|m| *m > 0) {
        out.element("duration", &minutes.to_string())?;
        out.element("durationinseconds", &(i64::from(minutes) * 60).to_string())?;
    }
    out.opt("format3d", record.video_3d_format.map(|f| f.nfo_code()))
}

fn audio(out: &mut XmlOut, stream: &MediaStream) -> Result<()> {
    codec(out, stream)?;
    out.opt("language", stream.language.as_deref())?;
    out.opt("channels", stream.channels)?;
    out.opt("samplingrate", stream.sample_rate)
}

fn flags(out: &mut XmlOut, stream: &MediaStream) -> Result<()> {
    out.element("default", if stream.is_default { "True" } else { "False" })?;
    out.element("forced", if stream.is_forced { "True" } else { "False" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NfoWriter;
    use nfo_core::ItemKind;
    use nfo_core::types::Video3DFormat;

    #[test]
    fn stream_blocks() {
        let mut record = MetadataRecord::new(ItemKind::Movie);
        record.runtime_minutes = Some(117);
        record.video_3d_format = Some(Video3DFormat::HalfSideBySide);
        let mut video = MediaStream::new(StreamKind::Video);
        video.codec = Some("mpeg4".into());
        video.codec_tag = Some("XVID".into());
        video.width = Some(1920);
        video.height = Some(1080);
        let mut audio = MediaStream::new(StreamKind::Audio);
        audio.codec = Some("ac3".into());
        audio.channels = Some(6);
        audio.is_default = true;
        record.media_streams = vec![video, audio];

        let xml = String::from_utf8(NfoWriter::default().write(&record, None).unwrap()).unwrap();
        assert!(xml.contains("<codec>xvid</codec>"));
        assert!(xml.contains("<width>1920</width>"));
        assert!(xml.contains("<durationinseconds>7020</durationinseconds>"));
        assert!(xml.contains("<format3d>hsbs</format3d>"));
        assert!(xml.contains("<channels>6</channels>"));
        assert!(xml.contains("<default>True</default>"));
        assert_eq!(xml.matches("<streamdetails>").count(), 1);
    }
}
