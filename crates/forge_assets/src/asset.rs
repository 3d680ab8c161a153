//! Asset lifecycle
//!
//! Every asset kind implements a handful of hooks; the lifecycle
//! operations are provided on top of them:
//!
//! ```text
//! Unloaded --load--> Loaded(clean) <--edit--> Loaded(dirty)
//! Loaded --save--> Saving --> Loaded(clean)
//! Loaded --revert--> Reverting --> Loaded(clean)
//! ```

use std::sync::Arc;

use forge_doc::{DocResult, Node};
use parking_lot::Mutex;

use crate::base::{AssetCore, AssetState};
use crate::error::{AssetError, AssetResult};
use crate::generic::GenericAsset;
use crate::io;
use crate::material::MaterialAsset;
use crate::paths::{AssetKind, AssetPaths};
use crate::prefab::PrefabAsset;
use crate::types::FileId;

/// An asset shared between the editor, the index and preload tasks
pub type SharedAsset = Arc<Mutex<dyn Asset>>;

/// Trait for editable assets
pub trait Asset: Send {
    fn core(&self) -> &AssetCore;

    fn core_mut(&mut self) -> &mut AssetCore;

    /// Whether the asset has a primary document besides its info document
    fn has_document(&self) -> bool {
        true
    }

    /// Replace every field from the primary document and re-attach
    /// container watches to the new containers.
    fn read_document(&mut self, source: &str) -> DocResult<()>;

    /// Render the primary document, if the asset owns one
    fn write_document(&self) -> Option<String>;

    /// Assets this one references and that preloading resolves
    fn dependencies(&self) -> Vec<FileId> {
        Vec::new()
    }

    /// Called after the primary document was written
    fn after_save(&mut self) {}

    fn kind(&self) -> AssetKind {
        self.core().paths().kind()
    }

    fn file_id(&self) -> &FileId {
        self.core().file_id()
    }

    fn display_name(&self) -> &str {
        self.core().display_name()
    }

    fn is_dirty(&self) -> bool {
        self.core().is_dirty()
    }

    fn state(&self) -> AssetState {
        self.core().state()
    }

    /// Read the info and primary documents for the first time
    fn load(&mut self) -> AssetResult<()> {
        let state = self.state();
        if state != AssetState::Unloaded {
            return Err(AssetError::InvalidState {
                operation: "load",
                state,
            });
        }

        log::info!("Loading {:?}", self.core().paths().asset());
        read_from_disk(self)?;
        settle_clean(self);
        Ok(())
    }

    /// Re-read both documents, overwriting in-memory values.
    ///
    /// The asset always ends up loaded and clean. On failure the error is
    /// also shown as the display name, and fields read before the failure
    /// keep their new values.
    fn revert(&mut self) -> AssetResult<()> {
        if self.state() == AssetState::Unloaded {
            return self.load();
        }

        log::info!("Reverting {:?}", self.core().paths().asset());
        self.core_mut().set_state(AssetState::Reverting);

        let result = read_from_disk(self);
        if let Err(e) = &result {
            log::warn!("Revert of {:?} failed: {}", self.core().paths().asset(), e);
            self.core_mut().set_display_name(e.to_string());
        }

        settle_clean(self);
        result
    }

    /// Write the primary document from the current in-memory state
    fn save(&mut self) -> AssetResult<()> {
        let state = self.state();
        if state != AssetState::Loaded {
            return Err(AssetError::InvalidState {
                operation: "save",
                state,
            });
        }

        let Some(text) = self.write_document() else {
            return self.update_metadata();
        };

        self.core_mut().set_state(AssetState::Saving);
        let result = io::write_atomic(self.core().paths().asset(), &text);
        self.core_mut().set_state(AssetState::Loaded);
        result?;

        self.after_save();
        self.core().tracker().mark_clean();
        log::info!("Saved {:?}", self.core().paths().asset());
        Ok(())
    }

    /// Write only the info document
    fn update_metadata(&mut self) -> AssetResult<()> {
        let state = self.state();
        if state == AssetState::Unloaded {
            return Err(AssetError::InvalidState {
                operation: "update metadata of",
                state,
            });
        }

        let document = self.core_mut().metadata_document();
        io::write_atomic(self.core().paths().info(), &forge_doc::to_string(&document))?;
        self.core().tracker().mark_clean();
        log::info!("Updated {:?}", self.core().paths().info());
        Ok(())
    }
}

fn read_from_disk<A: Asset + ?Sized>(asset: &mut A) -> AssetResult<()> {
    let paths = asset.core().paths().clone();

    let info = io::read_text(paths.info())?;
    let metadata: Node =
        forge_doc::from_str(&info).map_err(|e| AssetError::decode(paths.info(), e))?;
    asset.core_mut().apply_metadata(metadata);

    if asset.has_document() {
        let source = io::read_text(paths.asset())?;
        asset
            .read_document(&source)
            .map_err(|e| AssetError::decode(paths.asset(), e))?;
    }

    asset.core_mut().set_display_name(paths.file_name());
    Ok(())
}

fn settle_clean<A: Asset + ?Sized>(asset: &mut A) {
    let core = asset.core_mut();
    core.set_preloaded(false);
    core.set_state(AssetState::Loaded);
    core.tracker().mark_clean();
}

/// Wrap an asset for sharing
pub fn share<A: Asset + 'static>(asset: A) -> SharedAsset {
    Arc::new(Mutex::new(asset))
}

/// Create an unloaded asset of the kind its path implies
pub fn open_asset(paths: AssetPaths) -> SharedAsset {
    match paths.kind() {
        AssetKind::Material => share(MaterialAsset::new(paths)),
        AssetKind::Prefab => share(PrefabAsset::new(paths)),
        AssetKind::Generic => share(GenericAsset::new(paths)),
    }
}
