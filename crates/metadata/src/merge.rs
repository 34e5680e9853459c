//! Tag preservation.
//!
//! Rules for a previous file's root children:
//! 1. Elements the current save manages are dropped; the new value wins.
//! 2. Everything else is copied through byte for byte.
//! 3. A previous file that cannot be read counts as having no elements.

use tracing::debug;

use crate::Result;
use crate::cursor::XmlCursor;
use crate::schema::TagSchema;

/// Source bytes of each root child of `prior` that `schema` does not
/// manage, in document order.
pub fn foreign_elements<'a>(prior: &'a [u8], schema: &TagSchema) -> Vec<&'a [u8]> {
    match collect(prior, schema) {
        Ok(elements) => elements,
        Err(e) => {
            debug!(error = %e, "previous sidecar not merged");
            Vec::new()
        }
    }
}

fn collect<'a>(prior: &'a [u8], schema: &TagSchema) -> Result<Vec<&'a [u8]>> {
    let mut cursor = XmlCursor::new(prior);
    let Some(root) = cursor.next_root()? else {
        return Ok(Vec::new());
    };
    let mut elements = Vec::new();
    while let Some(child) = cursor.next_child(&root)? {
        if schema.manages(&child.name) {
            cursor.skip(&child)?;
        } else {
            elements.push(cursor.raw(&child)?);
        }
    }
    Ok(elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nfo_core::{ItemKind, MetadataRecord, NfoOptions};

    fn schema(record: &MetadataRecord) -> TagSchema {
        TagSchema::for_record(record, &NfoOptions::default())
    }

    #[test]
    fn keeps_unknown_elements_verbatim() {
        let prior = br#"<movie>
  <title>Old</title>
  <myfield a="1">keep <b>me</b></myfield>
  <genre>Horror</genre>
  <Other/>
</movie>"#;
        let record = MetadataRecord::new(ItemKind::Movie);
        let kept = foreign_elements(prior, &schema(&record));
        assert_eq!(
            kept,
            vec![&br#"<myfield a="1">keep <b>me</b></myfield>"#[..], &b"<Other/>"[..]]
        );
    }

    #[test]
    fn managed_names_are_case_insensitive() {
        let prior = b"<movie><TITLE>Old</TITLE><Plot>x</Plot></movie>";
        let record = MetadataRecord::new(ItemKind::Movie);
        assert!(foreign_elements(prior, &schema(&record)).is_empty());
    }

    #[test]
    fn provider_tags_managed_only_when_populated() {
        let prior = b"<movie><tvmazeid>82</tvmazeid></movie>";
        let mut record = MetadataRecord::new(ItemKind::Movie);
        assert_eq!(foreign_elements(prior, &schema(&record)).len(), 1);

        record.provider_ids.set("TvMaze", "83");
        assert!(foreign_elements(prior, &schema(&record)).is_empty());
    }

    #[test]
    fn watch_state_kept_without_target_user() {
        let prior = b"<movie><watched>true</watched></movie>";
        let record = MetadataRecord::new(ItemKind::Movie);
        assert_eq!(foreign_elements(prior, &schema(&record)).len(), 1);

        let options = NfoOptions {
            target_user_id: Some("alice".into()),
            ..NfoOptions::default()
        };
        let managed = TagSchema::for_record(&record, &options);
        assert!(foreign_elements(prior, &managed).is_empty());
    }

    #[test]
    fn unreadable_prior_means_nothing_to_merge() {
        let record = MetadataRecord::new(ItemKind::Movie);
        assert!(foreign_elements(b"<movie><a>", &schema(&record)).is_empty());
        assert!(foreign_elements(b"", &schema(&record)).is_empty());
        assert!(foreign_elements(b"not xml", &schema(&record)).is_empty());
    }
}
