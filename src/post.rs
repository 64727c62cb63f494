//! Defines [`PostView`], the page data for a single post page.

use crate::date::{self, DateFormatter};
use crate::reading_time::{estimate_at, WordsPerMinute};
use crate::record::{Banner, ContentRecord};
use crate::richtext;
use crate::url::LinkResolver;
use serde::Serialize;

/// Everything a post page displays.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PostView {
    pub uid: Option<String>,
    pub first_publication_date: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,

    /// The banner image, if the post has one with a URL.
    pub banner: Option<Banner>,

    /// The estimated reading time in minutes.
    pub reading_time: u32,
    pub content: Vec<SectionView>,
}

/// A section of a post with its body rendered to HTML.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SectionView {
    pub heading: Option<String>,
    pub html: String,
}

impl PostView {
    pub fn new(
        record: &ContentRecord,
        formatter: &DateFormatter,
        speed: WordsPerMinute,
        links: &LinkResolver,
    ) -> Result<PostView> {
        Ok(PostView {
            uid: record.uid.clone(),
            first_publication_date: formatter
                .format(record.first_publication_date.as_deref())?,
            title: record.data.title.clone(),
            subtitle: record.data.subtitle.clone(),
            author: record.data.author.clone(),
            banner: record
                .data
                .banner
                .as_ref()
                .filter(|banner| {
                    banner.url.as_deref().map_or(false, |url| !url.is_empty())
                })
                .cloned(),
            reading_time: estimate_at(&record.data.content, speed),
            content: record
                .data
                .content
                .iter()
                .map(|section| -> Result<SectionView> {
                    Ok(SectionView {
                        heading: section
                            .heading
                            .clone()
                            .filter(|heading| !heading.is_empty()),
                        html: richtext::as_html(&section.body, links)?,
                    })
                })
                .collect::<Result<Vec<SectionView>>>()?,
        })
    }
}

/// The result of building a [`PostView`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem building a [`PostView`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Date(#[from] date::Error),

    /// A document link couldn't be resolved to a post URL.
    #[error(transparent)]
    UrlParse(#[from] url::ParseError),
}
