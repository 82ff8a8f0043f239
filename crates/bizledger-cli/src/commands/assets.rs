//! Image source that adds HTTP(S) downloads to local file loading.

use std::path::PathBuf;
use std::time::Duration;

use futures_util::StreamExt;
use tracing::debug;

use bizledger_core::models::config::AssetConfig;
use bizledger_core::render::{AssetError, AssetSource, FsAssetSource};

pub struct HttpAssetSource {
    client: reqwest::Client,
    local: FsAssetSource,
    max_bytes: usize,
}

impl HttpAssetSource {
    pub fn new(config: &AssetConfig, base_dir: Option<PathBuf>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("bizledger/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            local: FsAssetSource::new(config.base_dir.clone().or(base_dir))
                .with_max_bytes(config.max_bytes),
            max_bytes: config.max_bytes,
        })
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AssetError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AssetError::Fetch(format!("HTTP {}", response.status())));
        }

        // Stop reading as soon as the cap is exceeded.
        let mut data = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| AssetError::Fetch(e.to_string()))?;
            data.extend_from_slice(&chunk);
            if data.len() > self.max_bytes {
                return Err(AssetError::TooLarge {
                    size: data.len(),
                    max: self.max_bytes,
                });
            }
        }

        debug!("Downloaded {} bytes from {}", data.len(), url);
        Ok(data)
    }
}

impl AssetSource for HttpAssetSource {
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, AssetError> {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            self.download(uri).await
        } else {
            self.local.fetch(uri).await
        }
    }
}
