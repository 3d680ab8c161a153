//! Selection by typed identifier
//!
//! A selectable item exposes its own asset id; the selection stores only
//! that id and resolves it through the index it is handed.

use crate::asset::{Asset, SharedAsset};
use crate::index::AssetIndex;
use crate::types::FileId;

/// Anything that can be selected by its asset identifier
pub trait Selectable {
    fn selection_id(&self) -> &FileId;
}

impl<A: Asset + ?Sized> Selectable for A {
    fn selection_id(&self) -> &FileId {
        self.file_id()
    }
}

impl Selectable for FileId {
    fn selection_id(&self) -> &FileId {
        self
    }
}

/// The currently selected asset, if any
#[derive(Clone, Debug, Default)]
pub struct Selection {
    current: Option<FileId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&FileId> {
        self.current.as_ref()
    }

    pub fn is_selected(&self, id: &FileId) -> bool {
        self.current.as_ref() == Some(id)
    }

    /// Select `item`, replacing the previous selection. Items without an
    /// identifier clear it.
    pub fn select<S: Selectable + ?Sized>(&mut self, item: &S) {
        let id = item.selection_id();
        self.current = (!id.is_none()).then(|| id.clone());
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Drop the selection if it refers to `id`
    pub fn forget(&mut self, id: &FileId) {
        if self.is_selected(id) {
            self.current = None;
        }
    }

    /// Look the selected asset up in `index`
    pub fn resolve(&self, index: &AssetIndex) -> Option<SharedAsset> {
        self.current.as_ref().and_then(|id| index.get(id))
    }
}
