//! One episode record spread across several `<episodedetails>` documents.
//!
//! A file covering episodes 5 to 7 holds three sibling roots. On write the
//! title and overview are cut into per-document segments; on read the
//! documents are folded back into one record.

use nfo_core::MetadataRecord;

pub const TITLE_DELIMITER: &str = ",  ";
pub const OVERVIEW_DELIMITER: &str = "\n\n";

/// Number of root documents `record` is written as.
pub fn document_count(record: &MetadataRecord) -> usize {
    record
        .episode()
        .and_then(|e| e.span())
        .and_then(|n| usize::try_from(n).ok())
        .filter(|&n| n > 0)
        .unwrap_or(1)
}

/// The `index`-th of `count` segments of `value`, or all of `value` when
/// it does not split into enough parts.
pub fn segment<'a>(value: &'a str, delimiter: &str, index: usize, count: usize) -> &'a str {
    if count <= 1 {
        return value;
    }
    value
        .split(delimiter)
        .nth(index)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(value)
}

pub fn title_segment(value: &str, index: usize, count: usize) -> &str {
    segment(value, TITLE_DELIMITER, index, count)
}

/// Overview segments are separated by a blank line; `\r\n` is normalized
/// first.
pub fn overview_segment(value: &str, index: usize, count: usize) -> String {
    let normalized = value.replace("\r\n", "\n");
    segment(&normalized, OVERVIEW_DELIMITER, index, count).to_string()
}

/// Fold the documents of one file into a single record.
///
/// The first document supplies every field. Titles and overviews that
/// differ between documents are joined with their delimiters; a value
/// that already carries the delimiter is the full, unsplit text and is
/// kept as is. The last document's episode number becomes the end number.
pub fn combine_documents(mut documents: Vec<MetadataRecord>) -> Option<MetadataRecord> {
    if documents.len() <= 1 {
        return documents.pop();
    }
    let last_episode = documents
        .last()
        .and_then(|d| d.episode())
        .and_then(|e| e.episode_number);
    let title = join_values(documents.iter().map(|d| d.title.as_deref()), TITLE_DELIMITER);
    let overview = join_values(
        documents.iter().map(|d| d.overview.as_deref()),
        OVERVIEW_DELIMITER,
    );

    let mut combined = documents.swap_remove(0);
    combined.title = title.or(combined.title);
    combined.overview = overview.or(combined.overview);
    if let Some(ext) = combined.episode_mut() {
        if let (Some(first), Some(last)) = (ext.episode_number, last_episode) {
            if last > first && ext.episode_number_end.is_none_or(|end| end < last) {
                ext.episode_number_end = Some(last);
            }
        }
    }
    Some(combined)
}

fn join_values<'a>(
    values: impl Iterator<Item = Option<&'a str>>,
    delimiter: &str,
) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    for value in values.flatten() {
        if value.contains(delimiter) {
            return Some(value.to_string());
        }
        if parts.last() != Some(&value) {
            parts.push(value);
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(delimiter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nfo_core::ItemKind;

    fn episode(start: i32, end: Option<i32>) -> MetadataRecord {
        let mut record = MetadataRecord::new(ItemKind::Episode);
        let ext = record.episode_mut().unwrap();
        ext.episode_number = Some(start);
        ext.episode_number_end = end;
        record
    }

    #[test]
    fn count_follows_episode_span() {
        assert_eq!(document_count(&episode(5, Some(7))), 3);
        assert_eq!(document_count(&episode(5, None)), 1);
        assert_eq!(document_count(&episode(5, Some(5))), 1);
        assert_eq!(document_count(&episode(7, Some(5))), 1);
        assert_eq!(document_count(&episode(0, Some(i32::MAX))), 1);
        assert_eq!(document_count(&episode(1, Some(99_999_999))), 1);
        assert_eq!(document_count(&MetadataRecord::new(ItemKind::Movie)), 1);
    }

    #[test]
    fn title_segments_fall_back_to_whole() {
        let title = "Pilot,  Second Part";
        assert_eq!(title_segment(title, 0, 3), "Pilot");
        assert_eq!(title_segment(title, 1, 3), "Second Part");
        assert_eq!(title_segment(title, 2, 3), title);
        assert_eq!(title_segment(title, 0, 1), title);
    }

    #[test]
    fn overview_segments_normalize_newlines() {
        let overview = "First half.\r\n\r\nSecond half.";
        assert_eq!(overview_segment(overview, 0, 2), "First half.");
        assert_eq!(overview_segment(overview, 1, 2), "Second half.");
    }

    #[test]
    fn combine_rejoins_titles() {
        let mut a = episode(5, None);
        a.title = Some("Pilot".into());
        let mut b = episode(6, None);
        b.title = Some("Second Part".into());
        let mut c = episode(7, None);
        c.title = Some("Second Part".into());

        let combined = combine_documents(vec![a, b, c]).unwrap();
        assert_eq!(combined.title.as_deref(), Some("Pilot,  Second Part"));
        assert_eq!(combined.episode().unwrap().episode_number_end, Some(7));
    }

    #[test]
    fn combine_keeps_unsplit_value() {
        let mut a = episode(1, None);
        a.title = Some("A,  B".into());
        let mut b = episode(2, None);
        b.title = Some("A,  B".into());
        let combined = combine_documents(vec![a, b]).unwrap();
        assert_eq!(combined.title.as_deref(), Some("A,  B"));
    }

    #[test]
    fn combine_empty_and_single() {
        assert!(combine_documents(Vec::new()).is_none());
        let single = combine_documents(vec![episode(3, None)]).unwrap();
        assert_eq!(single.episode().unwrap().episode_number_end, None);
    }
}
