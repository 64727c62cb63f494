use crate::richtext::LinkTarget;
use url::{ParseError, Url};

/// Resolves rich text [`LinkTarget`]s into `href`s. Links to other CMS
/// documents point at the corresponding post page; web and media links are
/// kept as they are.
pub struct LinkResolver<'a> {
    posts_url: &'a Url,
}

impl<'a> LinkResolver<'a> {
    /// Constructs a new `LinkResolver`
    ///
    /// # Arguments
    ///
    /// * `posts_url` - the URL prefix for post pages. This should end in a
    ///   trailing slash, otherwise [`Url::join`] drops its last segment.
    pub fn new(posts_url: &'a Url) -> LinkResolver<'a> {
        LinkResolver { posts_url }
    }

    pub fn resolve(&self, target: &LinkTarget) -> Result<String> {
        match target {
            LinkTarget::Web(url) => Ok(url.clone()),
            LinkTarget::Document(uid) => {
                Ok(self.posts_url.join(uid)?.to_string())
            }
        }
    }
}

type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod test {
    use super::*;

    fn fixture(wanted: &str, target: LinkTarget) -> Result<()> {
        let posts_url = Url::parse("https://example.org/post/")?;
        assert_eq!(wanted, LinkResolver::new(&posts_url).resolve(&target)?);
        Ok(())
    }

    #[test]
    fn test_resolve_document() -> Result<()> {
        fixture(
            "https://example.org/post/como-utilizar-hooks",
            LinkTarget::Document("como-utilizar-hooks".to_owned()),
        )
    }

    #[test]
    fn test_resolve_web() -> Result<()> {
        fixture(
            "https://reactjs.org/docs/hooks-intro.html",
            LinkTarget::Web("https://reactjs.org/docs/hooks-intro.html".to_owned()),
        )
    }
}
