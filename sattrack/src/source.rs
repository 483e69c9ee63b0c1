//! Element set retrieval.

use std::path::{Path, PathBuf};
use std::time::Duration;
use tleproto::{parse_catalog, parse_catalog_json, CatalogError, RawCatalog};
use tracing::debug;
use url::Url;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("Failed to read element file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("Element request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Element server responded with status {0}")]
    Status(reqwest::StatusCode),
}

/// Where the slow cycle gets its element catalog from.
///
/// Implementations run on the scheduler's local task set, the returned
/// futures need not be `Send`.
#[allow(async_fn_in_trait)]
pub trait ElementSource {
    async fn fetch_element_sets(&self) -> Result<RawCatalog, RetrievalError>;
}

/// A local file holding either a JSON catalog or three-line element text
#[derive(Clone, Debug)]
pub struct FileElementSource {
    path: PathBuf,
}

impl FileElementSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ElementSource for FileElementSource {
    async fn fetch_element_sets(&self) -> Result<RawCatalog, RetrievalError> {
        debug!(path = %self.path.display(), "Reading element file");
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| RetrievalError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(parse_catalog(&content)?)
    }
}

/// An HTTP endpoint serving a JSON catalog
#[derive(Clone, Debug)]
pub struct HttpElementSource {
    client: reqwest::Client,
    url: Url,
}

impl HttpElementSource {
    pub fn new(url: Url) -> Result<Self, RetrievalError> {
        let client = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl ElementSource for HttpElementSource {
    async fn fetch_element_sets(&self) -> Result<RawCatalog, RetrievalError> {
        debug!(url = %self.url, "Requesting element catalog");
        let response = self.client.get(self.url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::Status(status));
        }
        let body = response.text().await?;
        Ok(parse_catalog_json(&body)?)
    }
}

/// Either kind of source, picked at startup
#[derive(Clone, Debug)]
pub enum AnyElementSource {
    File(FileElementSource),
    Http(HttpElementSource),
}

impl ElementSource for AnyElementSource {
    async fn fetch_element_sets(&self) -> Result<RawCatalog, RetrievalError> {
        match self {
            AnyElementSource::File(s) => s.fetch_element_sets().await,
            AnyElementSource::Http(s) => s.fetch_element_sets().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use std::io::Write;

    fn scratch_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("sattrack-{}-{name}", std::process::id()));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[tokio::test]
    async fn reads_three_line_text() {
        let path = scratch_file(
            "iss.txt",
            indoc! {"
                ISS (ZARYA)
                1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
                2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537
            "},
        );
        let catalog = FileElementSource::new(&path).fetch_element_sets().await.unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog["ISS (ZARYA)"].normalize().is_some());
    }

    #[tokio::test]
    async fn reads_json_catalog() {
        let path = scratch_file(
            "catalog.json",
            indoc! {r#"
                {
                    "SO-50": { "tle1": "1 27607U", "tle2": "2 27607" },
                    "BROKEN": {}
                }
            "#},
        );
        let catalog = FileElementSource::new(&path).fetch_element_sets().await.unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog["BROKEN"].normalize().is_none());
    }

    #[tokio::test]
    async fn missing_file() {
        let err = FileElementSource::new("/nonexistent/elements.json")
            .fetch_element_sets()
            .await
            .unwrap_err();
        assert!(matches!(err, RetrievalError::Io { .. }));
    }
}
