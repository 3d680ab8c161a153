//! Concurrent dependency preloading
//!
//! Preloading an asset resolves every asset it references through the
//! [`AssetIndex`], loads the ones still unloaded on the blocking pool and
//! then preloads them in turn. Sub-loads run concurrently, bounded by a
//! semaphore; a failing sub-load never cancels its siblings.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::asset::SharedAsset;
use crate::base::AssetState;
use crate::config::EditorConfig;
use crate::error::AssetError;
use crate::index::AssetIndex;
use crate::types::FileId;

/// Outcome of one preload, including every nested preload
#[derive(Debug, Default)]
pub struct PreloadReport {
    /// Dependencies that are loaded
    pub resolved: Vec<FileId>,
    /// Dependencies absent from the index
    pub missing: Vec<FileId>,
    /// Dependencies that failed to load
    pub failed: Vec<AssetError>,
    /// The asset was already preloaded and nothing was done
    pub skipped: bool,
}

impl PreloadReport {
    pub fn succeeded(&self) -> bool {
        self.missing.is_empty() && self.failed.is_empty()
    }

    pub fn merge(&mut self, other: PreloadReport) {
        self.resolved.extend(other.resolved);
        self.missing.extend(other.missing);
        self.failed.extend(other.failed);
    }
}

pub type PreloadFuture = Pin<Box<dyn Future<Output = PreloadReport> + Send + 'static>>;

#[derive(Clone)]
pub struct Preloader {
    index: Arc<AssetIndex>,
    permits: Arc<Semaphore>,
}

impl Preloader {
    /// Create a preloader running at most `max_concurrent` loads at once
    pub fn new(index: Arc<AssetIndex>, max_concurrent: usize) -> Self {
        Self {
            index,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    pub fn from_config(index: Arc<AssetIndex>, config: &EditorConfig) -> Self {
        Self::new(index, config.max_concurrent_preloads)
    }

    pub fn index(&self) -> &Arc<AssetIndex> {
        &self.index
    }

    /// Preload the dependencies of `asset`.
    ///
    /// Does nothing if the asset is already preloaded, unless `force` is set.
    /// The preloaded flag is claimed before any sub-load starts, so
    /// reference cycles terminate.
    pub fn preload(&self, asset: SharedAsset, force: bool) -> PreloadFuture {
        let this = self.clone();
        Box::pin(async move { this.run(asset, force).await })
    }

    async fn run(self, asset: SharedAsset, force: bool) -> PreloadReport {
        let mut report = PreloadReport::default();

        let (owner, dependencies) = {
            let mut asset = asset.lock();
            if asset.core().is_preloaded() && !force {
                report.skipped = true;
                return report;
            }
            asset.core_mut().set_preloaded(true);
            (asset.file_id().clone(), asset.dependencies())
        };

        log::debug!("preloading {} dependencies of {}", dependencies.len(), owner);

        let mut tasks = JoinSet::new();
        for id in dependencies {
            if id == owner {
                continue;
            }
            let Some(dependency) = self.index.get(&id) else {
                log::warn!("{} references missing asset {}", owner, id);
                report.missing.push(id);
                continue;
            };

            let preloader = self.clone();
            tasks.spawn(async move { preloader.resolve(id, dependency).await });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(nested) => report.merge(nested),
                Err(e) => log::error!("Preload task of {} failed: {}", owner, e),
            }
        }

        report
    }

    /// Load one dependency if needed, then preload it
    async fn resolve(self, id: FileId, dependency: SharedAsset) -> PreloadReport {
        let mut report = PreloadReport::default();

        let loaded = match self.load(dependency.clone()).await {
            Ok(()) => true,
            Err(message) => {
                log::warn!("Preloading {} failed: {}", id, message);
                dependency.lock().core_mut().set_display_name(message.clone());
                report.failed.push(AssetError::DependentResource {
                    file_id: id.clone(),
                    message,
                });
                false
            }
        };

        if loaded {
            report.resolved.push(id);
            let nested = self.preload(dependency, false).await;
            report.merge(nested);
        }
        report
    }

    async fn load(&self, dependency: SharedAsset) -> Result<(), String> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| e.to_string())?;

        let joined = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let mut asset = dependency.lock();
            if asset.state() == AssetState::Unloaded {
                asset.load()
            } else {
                Ok(())
            }
        })
        .await;

        match joined {
            Ok(result) => result.map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        }
    }
}

impl std::fmt::Debug for Preloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preloader")
            .field("available_permits", &self.permits.available_permits())
            .finish()
    }
}
