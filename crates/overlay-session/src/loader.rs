//! Source acquisition.
//!
//! A [`SourceLoader`] turns a source reference (a file path, a key, a URL
//! resolved elsewhere) into a decoded [`RasterBuffer`]. Loaders either return
//! a complete buffer or an `Acquisition` error, never a partial buffer.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use overlay_common::{OverlayError, RasterBuffer, Result};
use tracing::{debug, instrument};

use crate::codec;

/// Trait for acquiring decoded source rasters.
#[async_trait]
pub trait SourceLoader: Send + Sync {
    /// Load and decode the raster identified by `source`.
    async fn load(&self, source: &str) -> Result<RasterBuffer>;
}

#[async_trait]
impl<L: SourceLoader + ?Sized> SourceLoader for Arc<L> {
    async fn load(&self, source: &str) -> Result<RasterBuffer> {
        (**self).load(source).await
    }
}

/// Base and intensity rasters for one redraw.
#[derive(Debug, Clone)]
pub struct SourcePair {
    pub base: RasterBuffer,
    pub intensity: RasterBuffer,
}

/// Load the base and intensity sources concurrently.
///
/// Fails with the first acquisition error; no partial pair is returned.
pub async fn acquire_pair<L>(loader: &L, base: &str, intensity: &str) -> Result<SourcePair>
where
    L: SourceLoader + ?Sized,
{
    let (base, intensity) = futures::try_join!(loader.load(base), loader.load(intensity))?;
    Ok(SourcePair { base, intensity })
}

/// Loads sources from the filesystem, decoding on a blocking thread.
#[derive(Debug, Clone, Default)]
pub struct FileLoader {
    root: Option<PathBuf>,
}

impl FileLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative source paths against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, source: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(source),
            None => PathBuf::from(source),
        }
    }
}

#[async_trait]
impl SourceLoader for FileLoader {
    #[instrument(skip(self), level = "debug")]
    async fn load(&self, source: &str) -> Result<RasterBuffer> {
        let path = self.resolve(source);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| OverlayError::acquisition(source, format!("{}: {}", path.display(), e)))?;

        let name = source.to_string();
        let raster = tokio::task::spawn_blocking(move || codec::decode(&bytes, &name))
            .await
            .map_err(|e| OverlayError::acquisition(source, format!("decoder task failed: {}", e)))??;

        debug!(
            width = raster.width(),
            height = raster.height(),
            layout = ?raster.layout(),
            "Decoded source"
        );
        Ok(raster)
    }
}

/// Serves rasters already held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    entries: HashMap<String, RasterBuffer>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, raster: RasterBuffer) -> Self {
        self.insert(key, raster);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, raster: RasterBuffer) {
        self.entries.insert(key.into(), raster);
    }
}

#[async_trait]
impl SourceLoader for MemoryLoader {
    async fn load(&self, source: &str) -> Result<RasterBuffer> {
        self.entries
            .get(source)
            .cloned()
            .ok_or_else(|| OverlayError::acquisition(source, "no such source"))
    }
}
