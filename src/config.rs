//! Loads the project configuration from a `blog.yaml` file. See
//! [`Config::from_directory`].

use crate::date::{self, DateFormatter};
use crate::reading_time::WordsPerMinute;
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

/// The name of the project file.
pub const PROJECT_FILE: &str = "blog.yaml";

#[derive(Deserialize)]
struct PageSize(usize);
impl Default for PageSize {
    fn default() -> Self {
        PageSize(2)
    }
}

#[derive(Deserialize)]
struct PathsPageSize(usize);
impl Default for PathsPageSize {
    fn default() -> Self {
        PathsPageSize(3)
    }
}

fn default_locale() -> String {
    "pt_BR".to_owned()
}

fn default_time_zone() -> String {
    "UTC".to_owned()
}

fn default_fallback() -> bool {
    true
}

fn default_content_directory() -> PathBuf {
    PathBuf::from("content")
}

/// The contents of a `blog.yaml` file.
#[derive(Deserialize)]
struct Project {
    site_root: Url,

    #[serde(default = "default_content_directory")]
    content_directory: PathBuf,

    #[serde(default = "default_locale")]
    locale: String,

    #[serde(default = "default_time_zone")]
    time_zone: String,

    #[serde(default)]
    page_size: PageSize,

    #[serde(default)]
    paths_page_size: PathsPageSize,

    #[serde(default)]
    words_per_minute: WordsPerMinute,

    #[serde(default = "default_fallback")]
    fallback: bool,
}

/// The resolved build configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// The directory holding the CMS export.
    pub content_directory: PathBuf,

    /// The directory the page data is written to.
    pub output_directory: PathBuf,

    /// The URL prefix for post pages (`{site_root}/post/`).
    pub posts_url: Url,

    /// The number of summaries on the listing page.
    pub page_size: usize,

    /// The number of post pages generated ahead of time.
    pub paths_page_size: usize,

    /// Whether post pages not generated ahead of time are generated on
    /// request.
    pub fallback: bool,

    pub words_per_minute: WordsPerMinute,
    pub date_formatter: DateFormatter,
}

impl Config {
    /// Searches `dir` and its ancestors for a `blog.yaml` and loads it.
    pub fn from_directory(dir: &Path, output_directory: &Path) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            Config::from_project_file(&path, output_directory).map_err(|e| {
                Error::Annotated(
                    format!("loading `{}`", path.display()),
                    Box::new(e),
                )
            })
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent, output_directory),
                None => Err(Error::ProjectFileNotFound),
            }
        }
    }

    /// Loads a project file. Relative paths in the file are relative to the
    /// file's directory.
    pub fn from_project_file(path: &Path, output_directory: &Path) -> Result<Config> {
        let file = File::open(path).map_err(|e| Error::Open {
            path: path.to_owned(),
            err: e,
        })?;
        let project: Project = serde_yaml::from_reader(file)?;
        let project_root = path
            .parent()
            .ok_or_else(|| Error::NoParentDirectory(path.to_owned()))?;

        if project.page_size.0 == 0 || project.paths_page_size.0 == 0 {
            return Err(Error::ZeroPageSize);
        }

        Ok(Config {
            content_directory: project_root.join(&project.content_directory),
            output_directory: output_directory.to_owned(),
            // NOTE: the trailing slash matters; without it `Url::join` would
            // replace `post` rather than append to it.
            posts_url: project.site_root.join("post/")?,
            page_size: project.page_size.0,
            paths_page_size: project.paths_page_size.0,
            fallback: project.fallback,
            words_per_minute: project.words_per_minute,
            date_formatter: DateFormatter::from_names(
                &project.locale,
                &project.time_zone,
            )?,
        })
    }
}

/// The result of loading a [`Config`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not find `{}` in any parent directory", PROJECT_FILE)]
    ProjectFileNotFound,

    #[error("opening `{}`: {err}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    #[error("can't get parent directory for project file `{}`", .0.display())]
    NoParentDirectory(PathBuf),

    #[error(transparent)]
    DeserializeYaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    UrlParse(#[from] url::ParseError),

    /// The locale or time zone is unknown.
    #[error(transparent)]
    Date(#[from] date::Error),

    #[error("page sizes must be greater than zero")]
    ZeroPageSize,

    /// An error with an annotation.
    #[error("{0}: {1}")]
    Annotated(String, #[source] Box<Error>),
}
