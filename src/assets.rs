//! Image asset fetching and decoding.

use std::collections::HashMap;
use std::sync::Arc;

use base64::{Engine, engine::general_purpose};
use futures::FutureExt;
use futures::future::BoxFuture;
use image::RgbaImage;
use log::{debug, info};
use parking_lot::RwLock;

use crate::error::LoadError;

/// Where raw image bytes come from
pub trait AssetSource: Send + Sync {
    fn fetch<'a>(&'a self, src: &'a str) -> BoxFuture<'a, Result<Vec<u8>, LoadError>>;
}

/// Asset source backed by an in-memory table, keyed by source string
#[derive(Debug, Default)]
pub struct MemoryAssetSource {
    assets: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, src: impl Into<String>, bytes: Vec<u8>) {
        self.assets.write().insert(src.into(), bytes);
    }

    pub fn remove(&self, src: &str) -> Option<Vec<u8>> {
        self.assets.write().remove(src)
    }
}

impl AssetSource for MemoryAssetSource {
    fn fetch<'a>(&'a self, src: &'a str) -> BoxFuture<'a, Result<Vec<u8>, LoadError>> {
        let result = self.assets.read().get(src).cloned().ok_or_else(|| LoadError::Unreachable {
            src: src.to_owned(),
            reason: "not found".to_owned(),
        });
        futures::future::ready(result).boxed()
    }
}

/// A decoded image asset
#[derive(Debug)]
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: RgbaImage,
}

/// Decode a `data:<mime>;base64,<payload>` URL
pub fn decode_data_url(src: &str) -> Result<Vec<u8>, LoadError> {
    let invalid = || LoadError::InvalidDataUrl(src.chars().take(64).collect());
    let rest = src.strip_prefix("data:").ok_or_else(invalid)?;
    let (meta, payload) = rest.split_once(',').ok_or_else(invalid)?;
    if !meta.ends_with(";base64") {
        return Err(invalid());
    }
    general_purpose::STANDARD.decode(payload).map_err(|_| invalid())
}

/// Fetches, decodes and caches image assets.
///
/// `data:` URLs are decoded in place; everything else goes through the source.
pub struct ImageLoader {
    source: Box<dyn AssetSource>,
    cache: RwLock<HashMap<String, Arc<LoadedImage>>>,
}

impl std::fmt::Debug for ImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLoader")
            .field("cached", &self.cache.read().len())
            .finish()
    }
}

impl ImageLoader {
    pub fn new(source: impl AssetSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Previously decoded asset, if any
    pub fn cached(&self, src: &str) -> Option<Arc<LoadedImage>> {
        self.cache.read().get(src).cloned()
    }

    pub fn evict(&self, src: &str) {
        self.cache.write().remove(src);
    }

    pub async fn load(&self, src: &str) -> Result<Arc<LoadedImage>, LoadError> {
        if let Some(hit) = self.cached(src) {
            debug!("Asset cache hit for {}", src);
            return Ok(hit);
        }

        let bytes = if src.starts_with("data:") {
            decode_data_url(src)?
        } else {
            self.source.fetch(src).await?
        };

        let decoded = image::load_from_memory(&bytes).map_err(|source| LoadError::Decode {
            src: src.to_owned(),
            source,
        })?;
        let pixels = decoded.to_rgba8();
        let loaded = Arc::new(LoadedImage {
            width: pixels.width(),
            height: pixels.height(),
            pixels,
        });
        info!("🖼️ Decoded image {}: {}x{}", src, loaded.width, loaded.height);

        self.cache.write().insert(src.to_owned(), Arc::clone(&loaded));
        Ok(loaded)
    }
}
