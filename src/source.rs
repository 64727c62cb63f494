//! Defines the [`ContentSource`] trait through which the build pipeline
//! queries the CMS, and [`DumpSource`], which serves documents from a CMS
//! export on disk.

use crate::date::parse_timestamp;
use crate::record::{self, ContentRecord, Cursor, QueryResponse};
use serde_json::Value;
use std::fs::File;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A client for the CMS's post documents. The caller constructs the source and
/// hands it to [`crate::build::build_site`].
pub trait ContentSource {
    /// Returns one page of post documents. `cursor` is the `next_page` of a
    /// previous response, or `None` for the first page.
    fn query(
        &self,
        cursor: Option<&Cursor>,
        page_size: usize,
    ) -> Result<QueryResponse>;

    /// Looks up a single post document by its uid.
    fn get_by_uid(&self, uid: &str) -> Result<Option<ContentRecord>>;
}

/// Serves post documents from memory, most recently published first. Cursors
/// are 1-based page numbers.
#[derive(Clone, Debug, Default)]
pub struct DumpSource {
    records: Vec<ContentRecord>,
}

impl DumpSource {
    pub fn new(mut records: Vec<ContentRecord>) -> DumpSource {
        // Undated or unparseable records sort last.
        records.sort_by(|a, b| {
            let date = |r: &ContentRecord| {
                r.first_publication_date
                    .as_deref()
                    .and_then(|d| parse_timestamp(d).ok())
            };
            date(b).cmp(&date(a)).then_with(|| a.uid.cmp(&b.uid))
        });
        DumpSource { records }
    }

    /// Loads every `.json` file under `directory`. Each file may contain a
    /// single document, an array of documents, or a saved query response
    /// (an object with a `results` array).
    pub fn load(directory: &Path) -> Result<DumpSource> {
        const JSON_EXTENSION: &str = "json";

        let mut records = Vec::new();
        for result in WalkDir::new(directory) {
            let entry = result?;
            if entry.file_type().is_file()
                && entry.path().extension().map_or(false, |e| e == JSON_EXTENSION)
            {
                records.extend(Self::load_file(entry.path()).map_err(|e| {
                    Error::Annotated(
                        format!("loading `{}`", entry.path().display()),
                        Box::new(e),
                    )
                })?);
            }
        }
        Ok(DumpSource::new(records))
    }

    fn load_file(path: &Path) -> Result<Vec<ContentRecord>> {
        let file = File::open(path).map_err(|e| Error::Open {
            path: path.to_owned(),
            err: e,
        })?;
        let value: Value = serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(record::Error::InvalidContent)?;
        let documents = match value {
            Value::Array(documents) => documents,
            Value::Object(mut object) if object.contains_key("results") => {
                match object.remove("results") {
                    Some(Value::Array(documents)) => documents,
                    other => vec![other.unwrap_or_default()],
                }
            }
            document => vec![document],
        };
        documents
            .into_iter()
            .map(|d| ContentRecord::from_value(d).map_err(Error::from))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ContentSource for DumpSource {
    fn query(
        &self,
        cursor: Option<&Cursor>,
        page_size: usize,
    ) -> Result<QueryResponse> {
        if page_size == 0 {
            return Err(Error::InvalidPageSize);
        }
        let page = match cursor {
            None => 1,
            Some(cursor) => match cursor.as_str().parse::<usize>() {
                Ok(page) if page > 0 => page,
                _ => return Err(Error::InvalidCursor(cursor.clone())),
            },
        };

        let start = (page - 1).saturating_mul(page_size);
        Ok(QueryResponse {
            results: self
                .records
                .iter()
                .skip(start)
                .take(page_size)
                .cloned()
                .collect(),
            next_page: match start.saturating_add(page_size) < self.records.len() {
                true => Some(Cursor::new((page + 1).to_string())),
                false => None,
            },
        })
    }

    fn get_by_uid(&self, uid: &str) -> Result<Option<ContentRecord>> {
        Ok(self
            .records
            .iter()
            .find(|r| r.uid.as_deref() == Some(uid))
            .cloned())
    }
}

/// The result of a fallible content-source operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem fetching documents.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A document is malformed.
    #[error(transparent)]
    Record(#[from] record::Error),

    /// The cursor doesn't identify a page of this source.
    #[error("invalid cursor `{}`", .0.as_str())]
    InvalidCursor(Cursor),

    #[error("page size must be greater than zero")]
    InvalidPageSize,

    #[error("opening `{}`: {err}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),

    /// An error with an annotation.
    #[error("{0}: {1}")]
    Annotated(String, #[source] Box<Error>),
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::record::PostData;

    fn record(uid: &str, date: Option<&str>) -> ContentRecord {
        ContentRecord {
            id: String::default(),
            uid: Some(uid.to_owned()),
            first_publication_date: date.map(str::to_owned),
            data: PostData::default(),
        }
    }

    fn uids(page: &QueryResponse) -> Vec<&str> {
        page.results.iter().filter_map(|r| r.uid.as_deref()).collect()
    }

    fn source() -> DumpSource {
        DumpSource::new(vec![
            record("undated", None),
            record("march", Some("2021-03-10T19:25:28+0000")),
            record("april", Some("2021-04-01")),
            record("may", Some("2021-05-20T08:00:00Z")),
            record("also-march", Some("2021-03-10T19:25:28+0000")),
        ])
    }

    #[test]
    fn test_query_pages() -> Result<()> {
        let source = source();
        let first = source.query(None, 2)?;
        assert_eq!(vec!["may", "april"], uids(&first));
        assert_eq!(Some(Cursor::new("2")), first.next_page);

        let second = source.query(first.next_page.as_ref(), 2)?;
        assert_eq!(vec!["also-march", "march"], uids(&second));

        let third = source.query(second.next_page.as_ref(), 2)?;
        assert_eq!(vec!["undated"], uids(&third));
        assert_eq!(None, third.next_page);
        Ok(())
    }

    #[test]
    fn test_query_rejects_bad_input() {
        let source = source();
        assert!(matches!(
            source.query(Some(&Cursor::new("zero")), 2),
            Err(Error::InvalidCursor(_))
        ));
        assert!(matches!(source.query(None, 0), Err(Error::InvalidPageSize)));
    }

    #[test]
    fn test_get_by_uid() -> Result<()> {
        let source = source();
        assert_eq!(
            Some("april"),
            source.get_by_uid("april")?.as_ref().and_then(|r| r.uid.as_deref())
        );
        assert_eq!(None, source.get_by_uid("june")?);
        Ok(())
    }

    #[test]
    fn test_load() -> Result<()> {
        let source = DumpSource::load(Path::new("./testdata/content/"))?;
        assert_eq!(3, source.len());
        let first = source.query(None, 1)?;
        assert_eq!(vec!["como-utilizar-hooks"], uids(&first));
        Ok(())
    }

    #[test]
    fn test_load_invalid_content() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(
            dir.path().join("broken.json"),
            r#"{ "uid": "broken", "data": { "content": 42 } }"#,
        )?;
        match DumpSource::load(dir.path()) {
            Err(Error::Annotated(_, err)) => {
                assert!(matches!(*err, Error::Record(record::Error::InvalidContent(_))))
            }
            other => panic!("wanted an annotated error, got {:?}", other),
        }
        Ok(())
    }
}
