//! The library code for the `spacetraveling` blog. It turns post documents
//! from a headless CMS into the data behind the blog's two kinds of pages:
//!
//! 1. The listing page: one page of [`summary::PostSummary`]s plus the cursor
//!    for the next page ([`summary::summarize`])
//! 2. Post pages: each post's fields, its rendered sections and its estimated
//!    reading time ([`post::PostView`], [`reading_time::estimate`])
//!
//! The summarizer and the estimator are pure functions over already-fetched
//! [`record::ContentRecord`]s. Fetching is the job of a
//! [`source::ContentSource`], which the caller constructs and passes to
//! [`build::build_site`] along with a [`config::Config`]. The build queries
//! the source, decides which post routes to generate ahead of time
//! ([`paths::static_paths`]) and writes everything to disk as JSON
//! ([`write::Writer`]).
//!
//! Post bodies are rich text. [`richtext`] parses the CMS's flat
//! text-plus-spans blocks into a tree with two projections: plain text for
//! word counting and HTML for display.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod date;
pub mod paths;
pub mod post;
pub mod reading_time;
pub mod record;
pub mod richtext;
pub mod source;
pub mod summary;
pub mod url;
pub mod write;
