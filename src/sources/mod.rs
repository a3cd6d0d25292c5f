//! Source acquisition
//!
//! Resolves the list of source identifiers (CLI arguments, environment
//! variable, or link-list file) and fetches each one's raw text, either over
//! HTTP(S) or from the local filesystem. Fetches happen sequentially in
//! list order; each source stands alone and a failure here never aborts the
//! run as a whole.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::config::defaults::LINKS_ENV_VAR;
use crate::errors::{SourceError, SourceResult};

/// Resolve the source list: explicit CLI links win, then the
/// `M3U_COMBINE_LINKS` environment variable, then the input file.
pub fn resolve_links(cli_links: &[String], input_file: &str) -> SourceResult<Vec<String>> {
    if !cli_links.is_empty() {
        return Ok(cli_links.to_vec());
    }

    if let Ok(env_links) = std::env::var(LINKS_ENV_VAR) {
        let links = filter_links(env_links.lines());
        if !links.is_empty() {
            debug!("using {} links from ${}", links.len(), LINKS_ENV_VAR);
            return Ok(links);
        }
    }

    read_link_list(input_file)
}

/// Read the link-list file, skipping blank lines and `#` comments.
pub fn read_link_list(path: &str) -> SourceResult<Vec<String>> {
    if !Path::new(path).exists() {
        return Err(SourceError::LinkListNotFound {
            path: path.to_string(),
        });
    }
    let contents = std::fs::read_to_string(path)?;
    Ok(filter_links(contents.lines()))
}

fn filter_links<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<String> {
    lines
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Fetches one source's decoded text, remote or local.
pub struct SourceFetcher {
    client: reqwest::Client,
}

impl SourceFetcher {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");
        Self { client }
    }

    /// Fetch one link. HTTP(S) links go over the wire; `file://` URLs and
    /// plain paths are read from disk with lossy decoding. The leading BOM,
    /// if any, is stripped so the parser sees clean text.
    pub async fn fetch(&self, link: &str) -> SourceResult<String> {
        let text = match Url::parse(link) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
                self.fetch_http(link).await?
            }
            Ok(url) if url.scheme() == "file" => {
                let path = url
                    .to_file_path()
                    .unwrap_or_else(|_| PathBuf::from(url.path()));
                Self::read_local(&path).await?
            }
            _ => Self::read_local(Path::new(link)).await?,
        };
        Ok(text.trim_start_matches('\u{feff}').to_string())
    }

    async fn fetch_http(&self, link: &str) -> SourceResult<String> {
        let response = self.client.get(link).send().await?;
        if !response.status().is_success() {
            return Err(SourceError::HttpStatus {
                status: response.status().as_u16(),
                url: link.to_string(),
            });
        }
        Ok(response.text().await?)
    }

    async fn read_local(path: &Path) -> SourceResult<String> {
        if !path.exists() {
            return Err(SourceError::NotFound {
                path: path.display().to_string(),
            });
        }
        let bytes = tokio::fs::read(path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
