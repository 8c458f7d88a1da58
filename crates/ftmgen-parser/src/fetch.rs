//! Remote schema fetcher
//!
//! Reads a GitHub contents-API directory listing and downloads every YAML
//! file in it concurrently. Downloads are joined before returning and the
//! first failure aborts the whole fetch.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::future::try_join_all;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::loader::is_schema_file;
use crate::{ParserError, SchemaDocument};

/// The FollowTheMoney schema directory
pub const DEFAULT_SCHEMA_URL: &str =
    "https://api.github.com/repos/alephdata/followthemoney/contents/followthemoney/schema";

const GITHUB_JSON: &str = "application/vnd.github.v3+json";

/// One entry of a contents-API directory listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListingEntry {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub download_url: Option<String>,
}

pub struct SchemaFetcher {
    client: reqwest::Client,
    progress: bool,
}

impl SchemaFetcher {
    pub fn new() -> Result<Self, ParserError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent("ftmgen")
            .build()
            .map_err(|e| ParserError::Network(e.to_string()))?;
        Ok(Self {
            client,
            progress: true,
        })
    }

    /// Disable the download progress bar
    pub fn quiet(mut self) -> Self {
        self.progress = false;
        self
    }

    /// List the schema files of a directory listing
    #[instrument(skip(self))]
    pub async fn list(&self, url: &str) -> Result<Vec<ListingEntry>, ParserError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, GITHUB_JSON)
            .send()
            .await
            .map_err(|e| ParserError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ParserError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ParserError::Network(e.to_string()))?;
        let entries: Vec<ListingEntry> = serde_json::from_str(&body)?;

        let total = entries.len();
        let schemas: Vec<ListingEntry> = entries
            .into_iter()
            .filter(|e| e.kind == "file" && is_schema_file(&e.name) && e.download_url.is_some())
            .collect();
        debug!("Listing has {} entries, {} schema files", total, schemas.len());
        Ok(schemas)
    }

    /// Download a single schema file
    pub async fn fetch_document(
        &self,
        url: &str,
        file_name: &str,
    ) -> Result<SchemaDocument, ParserError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ParserError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ParserError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content = response
            .text()
            .await
            .map_err(|e| ParserError::Network(e.to_string()))?;
        Ok(SchemaDocument::new(file_name, content))
    }

    /// Download every schema file of a listing, sorted by file name
    #[instrument(skip(self))]
    pub async fn fetch_all(&self, url: &str) -> Result<Vec<SchemaDocument>, ParserError> {
        let entries = self.list(url).await?;
        let progress = self.progress_bar(entries.len() as u64);

        let downloads = entries.iter().filter_map(|entry| {
            let download_url = entry.download_url.as_deref()?;
            let progress = progress.clone();
            Some(async move {
                let document = self.fetch_document(download_url, &entry.name).await?;
                progress.inc(1);
                Ok::<_, ParserError>(document)
            })
        });

        let result = try_join_all(downloads).await;
        progress.finish_and_clear();

        let mut documents = result?;
        documents.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        info!("Fetched {} schema files from {}", documents.len(), url);
        Ok(documents)
    }

    /// Download every schema file of a listing into `dir`
    pub async fn fetch_to_dir(
        &self,
        url: &str,
        dir: impl AsRef<Path>,
    ) -> Result<Vec<PathBuf>, ParserError> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await?;

        let mut written = Vec::new();
        for document in self.fetch_all(url).await? {
            let path = dir.join(&document.file_name);
            tokio::fs::write(&path, &document.content).await?;
            written.push(path);
        }
        Ok(written)
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }
        let progress = ProgressBar::new(len);
        progress.set_style(
            ProgressStyle::with_template("{spinner:.cyan} [{bar:30}] {pos}/{len} schemas")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        progress
    }
}
