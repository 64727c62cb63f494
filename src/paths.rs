//! Builds the list of post routes to generate ahead of time.

use crate::record::ContentRecord;
use serde::Serialize;
use url::{ParseError, Url};

/// A post route to generate.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StaticPath {
    /// The route parameter: the post's uid.
    pub slug: String,

    /// The URL of the post page.
    pub url: Url,
}

/// The pre-generated post routes. When `fallback` is set, routes not listed
/// here are generated on their first request instead of returning 404.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StaticPaths {
    pub paths: Vec<StaticPath>,
    pub fallback: bool,
}

/// Returns one [`StaticPath`] per record, in order. Records without a uid have
/// no route and are skipped. `posts_url` should end in a trailing slash.
pub fn static_paths(
    records: &[ContentRecord],
    posts_url: &Url,
    fallback: bool,
) -> Result<StaticPaths, ParseError> {
    Ok(StaticPaths {
        paths: records
            .iter()
            .filter_map(|record| record.uid.as_deref())
            .map(|uid| -> Result<StaticPath, ParseError> {
                Ok(StaticPath {
                    slug: uid.to_owned(),
                    url: posts_url.join(uid)?,
                })
            })
            .collect::<Result<Vec<StaticPath>, ParseError>>()?,
        fallback,
    })
}
