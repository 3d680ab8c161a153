//! In-memory asset index
//!
//! Maps identifiers to shared assets. The index is an explicit service:
//! whatever needs to resolve references (the preloader, the tool) is handed
//! an `Arc<AssetIndex>`.

use std::path::Path;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::asset::{open_asset, SharedAsset};
use crate::error::AssetResult;
use crate::paths::AssetPaths;
use crate::types::FileId;

#[derive(Default)]
pub struct AssetIndex {
    assets: RwLock<IndexMap<FileId, SharedAsset>>,
}

impl AssetIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `asset` under `id`, returning the asset it replaced
    pub fn insert(&self, id: FileId, asset: SharedAsset) -> Option<SharedAsset> {
        self.assets.write().insert(id, asset)
    }

    /// Register `asset` under its own identifier. Assets without one are
    /// not indexed.
    pub fn register(&self, asset: SharedAsset) -> Option<FileId> {
        let id = asset.lock().file_id().clone();
        if id.is_none() {
            log::warn!(
                "Not indexing {:?}: no file id",
                asset.lock().core().paths().asset()
            );
            return None;
        }
        self.insert(id.clone(), asset);
        Some(id)
    }

    pub fn get(&self, id: &FileId) -> Option<SharedAsset> {
        self.assets.read().get(id).cloned()
    }

    pub fn remove(&self, id: &FileId) -> Option<SharedAsset> {
        self.assets.write().shift_remove(id)
    }

    pub fn contains(&self, id: &FileId) -> bool {
        self.assets.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.assets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.read().is_empty()
    }

    pub fn ids(&self) -> Vec<FileId> {
        self.assets.read().keys().cloned().collect()
    }

    pub fn find_by_path(&self, path: &Path) -> Option<SharedAsset> {
        self.assets
            .read()
            .values()
            .find(|asset| asset.lock().core().paths().asset() == path)
            .cloned()
    }

    /// Identifiers of assets with unsaved changes
    pub fn dirty_ids(&self) -> Vec<FileId> {
        self.assets
            .read()
            .iter()
            .filter(|(_, asset)| asset.lock().is_dirty())
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Load the asset at `paths` and register it
    pub fn open(&self, paths: AssetPaths) -> AssetResult<SharedAsset> {
        let asset = open_asset(paths);
        asset.lock().load()?;
        self.register(asset.clone());
        Ok(asset)
    }
}

impl std::fmt::Debug for AssetIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetIndex")
            .field("assets", &self.assets.read().len())
            .finish()
    }
}
