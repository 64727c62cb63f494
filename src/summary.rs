//! Projects pages of [`ContentRecord`]s into the [`PostSummary`]s shown on the
//! listing page.

use crate::date::{DateFormatter, Result};
use crate::record::{ContentRecord, Cursor};
use serde::Serialize;

/// The listing-page view of a post.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PostSummary {
    pub uid: Option<String>,

    /// The publication date, formatted for display.
    pub first_publication_date: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
}

impl PostSummary {
    pub fn from_record(
        record: &ContentRecord,
        formatter: &DateFormatter,
    ) -> Result<PostSummary> {
        Ok(PostSummary {
            uid: record.uid.clone(),
            first_publication_date: formatter
                .format(record.first_publication_date.as_deref())?,
            title: record.data.title.clone(),
            subtitle: record.data.subtitle.clone(),
            author: record.data.author.clone(),
        })
    }
}

/// One page of post summaries and the cursor for the next page.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PaginatedSummaries {
    pub results: Vec<PostSummary>,
    pub next_page: Option<Cursor>,
}

/// Summarizes one page of records, preserving their order, and passes `cursor`
/// through. Fails on the first record whose publication date is missing or
/// malformed.
pub fn summarize(
    records: &[ContentRecord],
    cursor: Option<Cursor>,
    formatter: &DateFormatter,
) -> Result<PaginatedSummaries> {
    Ok(PaginatedSummaries {
        results: records
            .iter()
            .map(|record| PostSummary::from_record(record, formatter))
            .collect::<Result<Vec<PostSummary>>>()?,
        next_page: cursor,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::date::Error;
    use crate::record::PostData;

    fn record(uid: &str, date: Option<&str>) -> ContentRecord {
        ContentRecord {
            id: format!("id-{}", uid),
            uid: Some(uid.to_owned()),
            first_publication_date: date.map(str::to_owned),
            data: PostData {
                title: format!("Title {}", uid),
                subtitle: format!("Subtitle {}", uid),
                author: format!("Author {}", uid),
                ..PostData::default()
            },
        }
    }

    #[test]
    fn test_summarize_preserves_order_and_fields() -> Result<()> {
        // Deliberately not in date order.
        let records = vec![
            record("b", Some("2021-03-10T19:25:28+0000")),
            record("a", Some("2021-04-01T12:00:00+0000")),
            record("b", Some("2021-03-10T19:25:28+0000")),
        ];
        let cursor = Some(Cursor::new("2"));
        let got = summarize(&records, cursor.clone(), &DateFormatter::default())?;

        assert_eq!(cursor, got.next_page);
        assert_eq!(records.len(), got.results.len());
        for (summary, record) in got.results.iter().zip(&records) {
            assert_eq!(record.uid, summary.uid);
            assert_eq!(record.data.title, summary.title);
            assert_eq!(record.data.subtitle, summary.subtitle);
            assert_eq!(record.data.author, summary.author);
        }
        assert_eq!("10 mar 2021", got.results[0].first_publication_date);
        assert_eq!("01 abr 2021", got.results[1].first_publication_date);
        Ok(())
    }

    #[test]
    fn test_summarize_empty() -> Result<()> {
        let cursor = Some(Cursor::new("https://cms.example.org/search?page=3"));
        let got = summarize(&[], cursor.clone(), &DateFormatter::default())?;
        assert_eq!(
            PaginatedSummaries {
                results: Vec::new(),
                next_page: cursor,
            },
            got
        );
        Ok(())
    }

    #[test]
    fn test_summarize_missing_timestamp() {
        let records = vec![
            record("a", Some("2021-03-10")),
            record("b", None),
        ];
        assert_eq!(
            Err(Error::MissingTimestamp),
            summarize(&records, None, &DateFormatter::default())
        );
    }

    #[test]
    fn test_summarize_invalid_timestamp() {
        let records = vec![record("a", Some("10/03/2021"))];
        assert_eq!(
            Err(Error::InvalidTimestamp("10/03/2021".to_owned())),
            summarize(&records, None, &DateFormatter::default())
        );
    }
}
