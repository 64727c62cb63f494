//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the site's page data: querying the content source
//! ([`crate::source`]), summarizing the listing page ([`crate::summary`]),
//! choosing the post routes to generate ([`crate::paths`]), building each post
//! page ([`crate::post`]) and writing everything to disk ([`crate::write`]).

use crate::config::Config;
use crate::date::Error as DateError;
use crate::paths::static_paths;
use crate::post::{Error as PostError, PostView};
use crate::source::{ContentSource, Error as SourceError};
use crate::summary::summarize;
use crate::url::LinkResolver;
use crate::write::{Error as WriteError, Writer};
use tracing::{debug, info};

/// Builds the site's page data from a [`Config`] and a [`ContentSource`]. The
/// source is owned by the caller, which decides how documents are fetched.
pub fn build_site(config: &Config, source: &dyn ContentSource) -> Result<()> {
    let writer = Writer {
        output_directory: &config.output_directory,
    };

    // Remove the output of previous builds so a post deleted from the CMS
    // doesn't linger.
    writer.clean()?;

    // listing page
    let listing = source
        .query(None, config.page_size)
        .map_err(|e| annotate("querying the listing page", e))?;
    let summaries =
        summarize(&listing.results, listing.next_page, &config.date_formatter)
            .map_err(|e| annotate("summarizing the listing page", e))?;
    let path = writer.write_listing(&summaries)?;
    info!(
        posts = summaries.results.len(),
        has_next_page = summaries.next_page.is_some(),
        path = %path.display(),
        "wrote listing page"
    );

    // post routes
    let first_posts = source
        .query(None, config.paths_page_size)
        .map_err(|e| annotate("querying post routes", e))?;
    let paths = static_paths(&first_posts.results, &config.posts_url, config.fallback)?;
    let path = writer.write_paths(&paths)?;
    info!(
        routes = paths.paths.len(),
        fallback = paths.fallback,
        path = %path.display(),
        "wrote post routes"
    );

    // post pages
    let links = LinkResolver::new(&config.posts_url);
    for route in &paths.paths {
        let record = source
            .get_by_uid(&route.slug)
            .map_err(|e| annotate(format!("fetching post `{}`", route.slug), e))?
            .ok_or_else(|| Error::PostNotFound(route.slug.clone()))?;
        let post = PostView::new(
            &record,
            &config.date_formatter,
            config.words_per_minute,
            &links,
        )
        .map_err(|e| annotate(format!("building post `{}`", route.slug), e))?;
        let path = writer.write_post(&route.slug, &post)?;
        debug!(
            slug = %route.slug,
            reading_time = post.reading_time,
            path = %path.display(),
            "wrote post page"
        );
    }
    info!(posts = paths.paths.len(), "wrote post pages");

    Ok(())
}

fn annotate<S: Into<String>, E: Into<Error>>(annotation: S, err: E) -> Error {
    Error::Annotated(annotation.into(), Box::new(err.into()))
}

/// The result of a fallible build operation.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned for errors fetching documents.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Returned when a listing record's publication date is missing or
    /// malformed.
    #[error(transparent)]
    Date(#[from] DateError),

    /// Returned for errors building a post page.
    #[error(transparent)]
    Post(#[from] PostError),

    /// Returned when a post route can't be turned into a URL.
    #[error(transparent)]
    UrlParse(#[from] url::ParseError),

    /// Returned when a pre-generated route has no matching document.
    #[error("no document with uid `{0}`")]
    PostNotFound(String),

    /// Returned for errors writing page data.
    #[error(transparent)]
    Write(#[from] WriteError),

    /// An error with an annotation.
    #[error("{0}: {1}")]
    Annotated(String, #[source] Box<Error>),
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::date::DateFormatter;
    use crate::reading_time::WordsPerMinute;
    use crate::record::{ContentRecord, Cursor, QueryResponse};
    use crate::source::DumpSource;
    use crate::write::{INDEX_FILE, PATHS_FILE, POSTS_DIRECTORY};
    use std::fs::File;
    use std::path::Path;
    use url::Url;

    fn config(output_directory: &Path) -> Config {
        Config {
            content_directory: "./testdata/content/".into(),
            output_directory: output_directory.to_owned(),
            posts_url: Url::parse("https://example.org/post/").unwrap(),
            page_size: 2,
            paths_page_size: 3,
            fallback: true,
            words_per_minute: WordsPerMinute::default(),
            date_formatter: DateFormatter::default(),
        }
    }

    fn read_json(path: &Path) -> serde_json::Value {
        serde_json::from_reader(File::open(path).unwrap()).unwrap()
    }

    #[test]
    fn test_build_site() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let output = tempfile::tempdir()?;
        let config = config(output.path());
        let source = DumpSource::load(&config.content_directory)?;
        build_site(&config, &source)?;

        let index = read_json(&output.path().join(INDEX_FILE));
        assert_eq!(
            serde_json::json!({
                "results": [
                    {
                        "uid": "como-utilizar-hooks",
                        "first_publication_date": "15 mar 2021",
                        "title": "Como utilizar Hooks",
                        "subtitle": "Pensando em sincronização em vez de ciclos de vida",
                        "author": "Joseph Oliveira",
                    },
                    {
                        "uid": "criando-um-app-cra-do-zero",
                        "first_publication_date": "10 mar 2021",
                        "title": "Criando um app CRA do zero",
                        "subtitle": "Tudo sobre como criar a sua primeira aplicação utilizando Create React App",
                        "author": "Danilo Vieira",
                    },
                ],
                "next_page": "2",
            }),
            index
        );

        let paths = read_json(&output.path().join(PATHS_FILE));
        assert_eq!(serde_json::json!(true), paths["fallback"]);
        assert_eq!(3, paths["paths"].as_array().map_or(0, Vec::len));

        let post = read_json(
            &output
                .path()
                .join(POSTS_DIRECTORY)
                .join("como-utilizar-hooks.json"),
        );
        assert_eq!(serde_json::json!(1), post["reading_time"]);
        assert_eq!(
            serde_json::json!("https://images.example.org/hooks.png"),
            post["banner"]["url"]
        );
        assert!(output
            .path()
            .join(POSTS_DIRECTORY)
            .join("um-post-sem-conteudo.json")
            .exists());
        Ok(())
    }

    /// A source that lists a post it can't fetch.
    struct ForgetfulSource(DumpSource);

    impl ContentSource for ForgetfulSource {
        fn query(
            &self,
            cursor: Option<&Cursor>,
            page_size: usize,
        ) -> crate::source::Result<QueryResponse> {
            self.0.query(cursor, page_size)
        }

        fn get_by_uid(&self, _uid: &str) -> crate::source::Result<Option<ContentRecord>> {
            Ok(None)
        }
    }

    #[test]
    fn test_build_site_missing_post() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let output = tempfile::tempdir()?;
        let config = config(output.path());
        let source = ForgetfulSource(DumpSource::load(&config.content_directory)?);
        match build_site(&config, &source) {
            Err(Error::PostNotFound(uid)) => assert_eq!("como-utilizar-hooks", uid),
            other => panic!("wanted PostNotFound, got {:?}", other),
        }
        Ok(())
    }
}
