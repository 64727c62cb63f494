//! Defines [`ContentRecord`], a blog post document as the CMS returns it, and
//! the [`QueryResponse`] envelope for one page of a query.

use crate::richtext::Block;
use serde::{Deserialize, Serialize};

/// A single CMS document representing one blog post.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ContentRecord {
    /// The CMS's internal document id.
    #[serde(default)]
    pub id: String,

    /// The post's unique slug. This is the route parameter for post pages.
    #[serde(default)]
    pub uid: Option<String>,

    /// The publication timestamp, as delivered by the CMS.
    #[serde(default)]
    pub first_publication_date: Option<String>,

    pub data: PostData,
}

/// The custom fields of a post document.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PostData {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub subtitle: String,

    #[serde(default)]
    pub author: String,

    /// The banner image. The CMS sends an empty object when no image was
    /// chosen, which leaves `url` empty.
    #[serde(default)]
    pub banner: Option<Banner>,

    #[serde(default)]
    pub content: Vec<Section>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// One heading plus its body within a post.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub heading: Option<String>,

    #[serde(default)]
    pub body: Vec<Block>,
}

/// An opaque token identifying the next page of a query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new<S: Into<String>>(token: S) -> Cursor {
        Cursor(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of query results.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<ContentRecord>,

    /// The cursor for the following page; `None` on the last page.
    #[serde(default)]
    pub next_page: Option<Cursor>,
}

impl ContentRecord {
    /// Parses a single document from JSON.
    pub fn from_json(input: &str) -> Result<ContentRecord> {
        serde_json::from_str(input).map_err(Error::InvalidContent)
    }

    /// Parses a single document from an untyped JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<ContentRecord> {
        serde_json::from_value(value).map_err(Error::InvalidContent)
    }
}

/// The result of a fallible record operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a malformed content document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document doesn't have the shape of a post (e.g., `content` is not a
    /// sequence of sections).
    #[error("invalid content: {0}")]
    InvalidContent(#[source] serde_json::Error),
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::richtext::{Block, Inline};

    #[test]
    fn test_from_json() -> Result<()> {
        let record = ContentRecord::from_json(
            r#"{
                "id": "YEjd2BIAACQAP5Pz",
                "uid": "como-utilizar-hooks",
                "first_publication_date": "2021-03-15T19:25:28+0000",
                "data": {
                    "title": "Como utilizar Hooks",
                    "subtitle": "Pensando em sincronização em vez de ciclos de vida",
                    "author": "Joseph Oliveira",
                    "banner": {},
                    "content": [
                        {
                            "heading": "Proin et varius",
                            "body": [
                                { "type": "paragraph", "text": "Nullam dolor", "spans": [] }
                            ]
                        },
                        { "heading": null, "body": [] }
                    ]
                }
            }"#,
        )?;

        assert_eq!(Some("como-utilizar-hooks"), record.uid.as_deref());
        assert_eq!(Some(Banner::default()), record.data.banner);
        assert_eq!(
            vec![
                Section {
                    heading: Some("Proin et varius".to_owned()),
                    body: vec![Block::Paragraph(vec![Inline::Text(
                        "Nullam dolor".to_owned()
                    )])],
                },
                Section::default(),
            ],
            record.data.content
        );
        Ok(())
    }

    #[test]
    fn test_from_json_rejects_non_sequence_content() {
        let got = ContentRecord::from_json(
            r#"{ "uid": "x", "data": { "content": "just a string" } }"#,
        );
        assert!(matches!(got, Err(Error::InvalidContent(_))));
    }

    #[test]
    fn test_query_response_cursor() -> std::result::Result<(), serde_json::Error> {
        let page: QueryResponse = serde_json::from_str(
            r#"{ "next_page": "https://cms.example.org/search?page=2", "results": [] }"#,
        )?;
        assert_eq!(
            Some(Cursor::new("https://cms.example.org/search?page=2")),
            page.next_page
        );
        Ok(())
    }
}
