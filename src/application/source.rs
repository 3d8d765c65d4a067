//! Where a payload comes from, and the single read that fetches it.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::infrastructure::traits::{FileSystem, HttpClient};

/// Location of a JSON payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Url(String),
}

impl Source {
    /// `http://` and `https://` locations are URLs, anything else a file path.
    pub fn parse(location: &str) -> Self {
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Source::Url(location.to_string())
        } else {
            Source::File(PathBuf::from(location))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Reads a [`Source`] through the I/O boundary traits.
#[derive(Clone)]
pub struct ResourceReader {
    fs: Arc<dyn FileSystem>,
    http: Arc<dyn HttpClient>,
}

impl ResourceReader {
    pub fn new(fs: Arc<dyn FileSystem>, http: Arc<dyn HttpClient>) -> Self {
        Self { fs, http }
    }

    /// One attempt, no retry. Every failure becomes [`ApplicationError::Unavailable`].
    #[instrument(level = "debug", skip(self, source), fields(source = %source))]
    pub fn read(&self, source: &Source) -> ApplicationResult<String> {
        let unavailable = |reason: String| ApplicationError::Unavailable {
            resource: source.to_string(),
            reason,
        };
        match source {
            Source::File(path) => {
                if !self.fs.exists(path) {
                    return Err(unavailable("file not found".to_string()));
                }
                self.fs
                    .read_to_string(path)
                    .map_err(|e| unavailable(e.to_string()))
            }
            Source::Url(url) => {
                debug!("fetching {}", url);
                self.http.get_text(url).map_err(unavailable)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://localhost:5173/data/evolution_tree.json", true)]
    #[case("HTTPS://example.org/tree.json", true)]
    #[case("public/data/evolution_tree.json", false)]
    #[case("/abs/http-cache/tree.json", false)]
    fn given_location_when_parsing_then_detects_scheme(
        #[case] location: &str,
        #[case] is_url: bool,
    ) {
        let source = Source::parse(location);

        assert_eq!(matches!(source, Source::Url(_)), is_url);
        assert_eq!(source.to_string(), location);
    }
}
