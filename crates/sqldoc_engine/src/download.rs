use std::path::{Path, PathBuf};

use engine_logging::engine_info;
use futures_util::StreamExt;
use sqldoc_core::DownloadLink;
use url::Url;

use crate::api::parse_base_url;
use crate::filename::safe_filename;
use crate::persist::{AtomicFileWriter, PersistError};
use crate::settings::DownloadSettings;
use crate::types::{map_reqwest_error, ApiError, FailureKind};

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("download request failed: {0}")]
    Api(#[from] ApiError),
    #[error("archive larger than {max_bytes} bytes")]
    TooLarge { max_bytes: u64 },
    #[error("could not save archive: {0}")]
    Persist(#[from] PersistError),
}

/// Fetches the finished result archive a [`DownloadLink`] points at.
#[derive(Debug, Clone)]
pub struct ResultDownloader {
    client: reqwest::Client,
    base_url: Url,
    max_bytes: u64,
}

impl ResultDownloader {
    /// `base_url` resolves server-relative links such as `/media/tmp/{id}.zip`.
    pub fn new(base_url: &str, settings: &DownloadSettings) -> Result<Self, ApiError> {
        let base_url = parse_base_url(base_url)?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            client,
            base_url,
            max_bytes: settings.max_bytes,
        })
    }

    pub fn resolve(&self, link: &DownloadLink) -> Result<Url, ApiError> {
        self.base_url
            .join(&link.url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    pub async fn fetch(&self, link: &DownloadLink) -> Result<Vec<u8>, DownloadError> {
        let url = self.resolve(link)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            )
            .into());
        }
        if let Some(len) = response.content_length() {
            if len > self.max_bytes {
                return Err(DownloadError::TooLarge {
                    max_bytes: self.max_bytes,
                });
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            if bytes.len() as u64 + chunk.len() as u64 > self.max_bytes {
                return Err(DownloadError::TooLarge {
                    max_bytes: self.max_bytes,
                });
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }

    /// Downloads into `dir` under the link's file name and returns the written path.
    pub async fn download_to(
        &self,
        link: &DownloadLink,
        dir: &Path,
    ) -> Result<PathBuf, DownloadError> {
        let bytes = self.fetch(link).await?;
        let writer = AtomicFileWriter::new(dir.to_path_buf());
        let path = writer.write(&safe_filename(&link.filename), &bytes)?;
        engine_info!("Saved {} bytes to {:?}", bytes.len(), path);
        Ok(path)
    }
}
