use crate::paths::StaticPaths;
use crate::post::PostView;
use crate::summary::PaginatedSummaries;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// The listing page data file, relative to the output directory.
pub const INDEX_FILE: &str = "index.json";

/// The static paths file, relative to the output directory.
pub const PATHS_FILE: &str = "paths.json";

/// The directory holding one data file per post page.
pub const POSTS_DIRECTORY: &str = "posts";

/// Writes page data to disk as JSON. The layout of the output directory is:
///
/// * `index.json`: the listing page ([`PaginatedSummaries`])
/// * `paths.json`: the pre-generated post routes ([`StaticPaths`])
/// * `posts/{slug}.json`: one [`PostView`] per post
pub struct Writer<'a> {
    /// The directory in which all page data files are written.
    pub output_directory: &'a Path,
}

impl Writer<'_> {
    /// Removes the files written by a previous build. Other files in the
    /// output directory are left alone.
    pub fn clean(&self) -> Result<()> {
        let posts = self.output_directory.join(POSTS_DIRECTORY);
        ignore_not_found(std::fs::remove_dir_all(&posts)).map_err(|err| {
            Error::Clean { path: posts, err }
        })?;
        for file in [INDEX_FILE, PATHS_FILE] {
            let path = self.output_directory.join(file);
            ignore_not_found(std::fs::remove_file(&path))
                .map_err(|err| Error::Clean { path, err })?;
        }
        Ok(())
    }

    pub fn write_listing(&self, listing: &PaginatedSummaries) -> Result<PathBuf> {
        self.write_json(self.output_directory.join(INDEX_FILE), listing)
    }

    pub fn write_paths(&self, paths: &StaticPaths) -> Result<PathBuf> {
        self.write_json(self.output_directory.join(PATHS_FILE), paths)
    }

    /// Writes a post's page data to `posts/{slug}.json`. The uid is
    /// slugified for the file name, so e.g. `Hello_World` is written to
    /// `posts/hello-world.json`.
    pub fn write_post(&self, uid: &str, post: &PostView) -> Result<PathBuf> {
        let directory = self.output_directory.join(POSTS_DIRECTORY);
        std::fs::create_dir_all(&directory)?;
        self.write_json(
            directory.join(format!("{}.json", slug::slugify(uid))),
            post,
        )
    }

    fn write_json<T: Serialize>(&self, path: PathBuf, value: &T) -> Result<PathBuf> {
        std::fs::create_dir_all(self.output_directory)?;
        let mut w = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut w, value)?;
        w.flush()?;
        Ok(path)
    }
}

fn ignore_not_found(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An error serializing page data.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// An error removing the output of a previous build.
    #[error("cleaning `{}`: {err}", .path.display())]
    Clean {
        path: PathBuf,
        #[source]
        err: io::Error,
    },

    /// An error writing the output files.
    #[error(transparent)]
    Io(#[from] io::Error),
}
