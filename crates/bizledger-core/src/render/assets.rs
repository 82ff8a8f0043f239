//! Signature and attachment images for invoice documents.
//!
//! A failed image never fails a render: it becomes an
//! [`AssetRef::Unavailable`] placeholder.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

use crate::models::invoice::Invoice;

/// Why an image could not be embedded.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("timed out after {0}ms")]
    Timeout(u64),

    #[error("{size} bytes exceeds the {max} byte limit")]
    TooLarge { size: usize, max: usize },

    #[error("unsupported location: {0}")]
    Unsupported(String),

    #[error("malformed data URI")]
    InvalidDataUri,

    #[error("not a recognized image format")]
    NotAnImage,

    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// An image as the renderers see it.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetRef {
    /// Loaded bytes, embedded into the output.
    Embedded { mime: String, bytes: Vec<u8> },
    /// Not fetched; HTML links to it, PDF shows a placeholder.
    Linked(String),
    /// Fetch failed; both renderers show a placeholder.
    Unavailable { uri: String, reason: String },
}

impl AssetRef {
    /// Classify loaded bytes, rejecting anything that is not an image.
    pub fn from_bytes(bytes: Vec<u8>, max_bytes: usize) -> Result<Self, AssetError> {
        if bytes.len() > max_bytes {
            return Err(AssetError::TooLarge {
                size: bytes.len(),
                max: max_bytes,
            });
        }
        let format = image::guess_format(&bytes).map_err(|_| AssetError::NotAnImage)?;
        Ok(AssetRef::Embedded {
            mime: format.to_mime_type().to_string(),
            bytes,
        })
    }

    pub fn unavailable(uri: &str, error: &AssetError) -> Self {
        AssetRef::Unavailable {
            uri: uri.to_string(),
            reason: error.to_string(),
        }
    }

    /// Value for an HTML `src` attribute.
    pub fn html_src(&self, placeholder: &str) -> String {
        match self {
            AssetRef::Embedded { mime, bytes } => {
                format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
            }
            AssetRef::Linked(uri) => uri.clone(),
            AssetRef::Unavailable { .. } => placeholder.to_string(),
        }
    }
}

/// Decode a `data:` URI into its payload bytes.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, AssetError> {
    let rest = uri.strip_prefix("data:").ok_or(AssetError::InvalidDataUri)?;
    let (meta, payload) = rest.split_once(',').ok_or(AssetError::InvalidDataUri)?;
    if !meta.ends_with(";base64") {
        return Err(AssetError::InvalidDataUri);
    }
    STANDARD
        .decode(payload.trim())
        .map_err(|_| AssetError::InvalidDataUri)
}

/// Images resolved for one render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderAssets {
    pub signature: Option<AssetRef>,
    pub attachments: Vec<AssetRef>,
}

impl RenderAssets {
    /// Resolve without I/O: `data:` URIs are embedded, everything else linked.
    pub fn inline(invoice: &Invoice, max_bytes: usize) -> Self {
        let resolve = |uri: &String| {
            if !uri.starts_with("data:") {
                return AssetRef::Linked(uri.clone());
            }
            decode_data_uri(uri)
                .and_then(|bytes| AssetRef::from_bytes(bytes, max_bytes))
                .unwrap_or_else(|e| AssetRef::unavailable(uri, &e))
        };

        Self {
            signature: invoice.signature.as_ref().map(resolve),
            attachments: invoice.attachments.iter().map(resolve).collect(),
        }
    }
}

#[cfg(feature = "native")]
mod loader {
    use std::future::Future;
    use std::path::PathBuf;
    use std::time::Duration;

    use futures_util::future::join_all;
    use tracing::{debug, warn};

    use super::{decode_data_uri, AssetError, AssetRef, RenderAssets};
    use crate::models::config::AssetConfig;
    use crate::models::invoice::Invoice;

    /// Where image bytes come from.
    pub trait AssetSource {
        /// Fetch the raw bytes behind `uri`.
        fn fetch(&self, uri: &str) -> impl Future<Output = Result<Vec<u8>, AssetError>>;
    }

    /// Reads local files and `data:` URIs.
    #[derive(Debug, Clone, Default)]
    pub struct FsAssetSource {
        base_dir: Option<PathBuf>,
        max_bytes: Option<usize>,
    }

    impl FsAssetSource {
        pub fn new(base_dir: Option<PathBuf>) -> Self {
            Self {
                base_dir,
                max_bytes: None,
            }
        }

        /// Refuse files larger than `max_bytes` without reading them.
        pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
            self.max_bytes = Some(max_bytes);
            self
        }

        fn resolve_path(&self, uri: &str) -> Result<PathBuf, AssetError> {
            let path = uri.strip_prefix("file://").unwrap_or(uri);
            if path.contains("://") {
                return Err(AssetError::Unsupported(uri.to_string()));
            }
            let path = PathBuf::from(path);
            Ok(match &self.base_dir {
                Some(base) if path.is_relative() => base.join(path),
                _ => path,
            })
        }
    }

    impl AssetSource for FsAssetSource {
        async fn fetch(&self, uri: &str) -> Result<Vec<u8>, AssetError> {
            if uri.starts_with("data:") {
                return decode_data_uri(uri);
            }
            let path = self.resolve_path(uri)?;
            if let Some(max) = self.max_bytes {
                let len = tokio::fs::metadata(&path).await?.len();
                let size = usize::try_from(len).unwrap_or(usize::MAX);
                if size > max {
                    return Err(AssetError::TooLarge { size, max });
                }
            }
            Ok(tokio::fs::read(path).await?)
        }
    }

    async fn load<S: AssetSource>(source: &S, uri: &str, config: &AssetConfig) -> AssetRef {
        let result = match tokio::time::timeout(
            Duration::from_millis(config.timeout_ms),
            source.fetch(uri),
        )
        .await
        {
            Ok(fetched) => fetched.and_then(|bytes| AssetRef::from_bytes(bytes, config.max_bytes)),
            Err(_) => Err(AssetError::Timeout(config.timeout_ms)),
        };

        match result {
            Ok(asset) => {
                debug!("Loaded image {}", uri);
                asset
            }
            Err(e) => {
                warn!("Using placeholder for {}: {}", uri, e);
                AssetRef::unavailable(uri, &e)
            }
        }
    }

    /// Fetch the signature and every attachment concurrently.
    pub async fn resolve_assets<S: AssetSource>(
        source: &S,
        invoice: &Invoice,
        config: &AssetConfig,
    ) -> RenderAssets {
        let signature = async {
            match &invoice.signature {
                Some(uri) => Some(load(source, uri, config).await),
                None => None,
            }
        };
        let attachments = join_all(invoice.attachments.iter().map(|uri| load(source, uri, config)));

        let (signature, attachments) = futures_util::join!(signature, attachments);
        RenderAssets {
            signature,
            attachments,
        }
    }
}

#[cfg(feature = "native")]
pub use loader::{resolve_assets, AssetSource, FsAssetSource};

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Cursor;

    pub(crate) fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([200, 10, 10]));
        let mut data = Vec::new();
        img.write_to(&mut Cursor::new(&mut data), image::ImageFormat::Png)
            .unwrap();
        data
    }

    #[test]
    fn test_from_bytes_checks_format_and_size() {
        let asset = AssetRef::from_bytes(png_bytes(), 1024).unwrap();
        assert!(matches!(asset, AssetRef::Embedded { ref mime, .. } if mime == "image/png"));

        assert!(matches!(
            AssetRef::from_bytes(b"hello".to_vec(), 1024),
            Err(AssetError::NotAnImage)
        ));
        assert!(matches!(
            AssetRef::from_bytes(png_bytes(), 4),
            Err(AssetError::TooLarge { max: 4, .. })
        ));
    }

    #[test]
    fn test_inline_resolution() {
        let mut invoice = crate::render::fixtures::invoice(0);
        let data_uri = format!("data:image/png;base64,{}", STANDARD.encode(png_bytes()));
        invoice.signature = Some(data_uri.clone());
        invoice.attachments = vec![
            "https://cdn.example.com/a.png".to_string(),
            "data:,oops".to_string(),
        ];

        let assets = RenderAssets::inline(&invoice, 1024);

        let signature = assets.signature.unwrap();
        assert_eq!(signature.html_src("x"), data_uri);
        assert_eq!(
            assets.attachments[0],
            AssetRef::Linked("https://cdn.example.com/a.png".to_string())
        );
        assert!(matches!(assets.attachments[1], AssetRef::Unavailable { .. }));
        assert_eq!(assets.attachments[1].html_src("placeholder.png"), "placeholder.png");
    }

    #[cfg(feature = "native")]
    mod native {
        use super::*;
        use crate::models::config::AssetConfig;
        use std::time::Duration;

        struct SlowSource;

        impl AssetSource for SlowSource {
            async fn fetch(&self, _uri: &str) -> Result<Vec<u8>, AssetError> {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(png_bytes())
            }
        }

        #[tokio::test]
        async fn test_resolve_from_files() {
            let dir = tempfile::tempdir().unwrap();
            std::fs::write(dir.path().join("sig.png"), png_bytes()).unwrap();
            std::fs::write(dir.path().join("notes.txt"), b"not an image").unwrap();

            let mut invoice = crate::render::fixtures::invoice(0);
            invoice.signature = Some("sig.png".to_string());
            invoice.attachments = vec![
                "notes.txt".to_string(),
                "missing.png".to_string(),
                "https://example.com/x.png".to_string(),
            ];

            let source = FsAssetSource::new(Some(dir.path().to_path_buf()));
            let assets = resolve_assets(&source, &invoice, &AssetConfig::default()).await;

            assert!(matches!(assets.signature, Some(AssetRef::Embedded { .. })));
            assert_eq!(assets.attachments.len(), 3);
            assert!(assets
                .attachments
                .iter()
                .all(|a| matches!(a, AssetRef::Unavailable { .. })));
        }

        #[tokio::test]
        async fn test_oversized_file_is_refused_before_reading() {
            let dir = tempfile::tempdir().unwrap();
            std::fs::write(dir.path().join("big.png"), vec![0u8; 64]).unwrap();

            let source = FsAssetSource::new(Some(dir.path().to_path_buf())).with_max_bytes(16);
            assert!(matches!(
                source.fetch("big.png").await,
                Err(AssetError::TooLarge { size: 64, max: 16 })
            ));
            assert!(matches!(source.fetch("missing.png").await, Err(AssetError::Io(_))));

            let unlimited = FsAssetSource::new(Some(dir.path().to_path_buf()));
            assert_eq!(unlimited.fetch("big.png").await.unwrap().len(), 64);
        }

        #[tokio::test]
        async fn test_timeout_falls_back_to_placeholder() {
            let mut invoice = crate::render::fixtures::invoice(0);
            invoice.signature = Some("slow.png".to_string());

            let config = AssetConfig {
                timeout_ms: 20,
                ..AssetConfig::default()
            };
            let assets = resolve_assets(&SlowSource, &invoice, &config).await;

            match assets.signature {
                Some(AssetRef::Unavailable { reason, .. }) => assert!(reason.contains("timed out")),
                other => panic!("expected placeholder, got {:?}", other),
            }
        }
    }
}
