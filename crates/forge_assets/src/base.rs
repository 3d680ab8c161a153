//! State shared by every asset kind

use core::fmt;

use forge_doc::Node;
use forge_observe::{ChangeTracker, DISPLAY_NAME};
use indexmap::IndexMap;

use crate::paths::AssetPaths;
use crate::types::FileId;

/// Key of the asset identifier in the info document
pub const FILE_ID_KEY: &str = "fileId";

/// Lifecycle state of an asset
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AssetState {
    /// Nothing has been read from disk yet
    #[default]
    Unloaded,
    /// In memory; may be clean or dirty
    Loaded,
    /// Primary document is being written
    Saving,
    /// Documents are being re-read
    Reverting,
}

impl fmt::Display for AssetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unloaded => "unloaded",
            Self::Loaded => "loaded",
            Self::Saving => "saving",
            Self::Reverting => "reverting",
        })
    }
}

/// Identity, metadata and bookkeeping common to all assets
pub struct AssetCore {
    paths: AssetPaths,
    file_id: FileId,
    folder_id: Option<u32>,
    display_name: String,
    properties: IndexMap<String, Node>,
    tracker: ChangeTracker,
    state: AssetState,
    preloaded: bool,
}

impl AssetCore {
    pub fn new(paths: AssetPaths) -> Self {
        let display_name = paths.file_name();
        Self {
            paths,
            file_id: FileId::none(),
            folder_id: None,
            display_name,
            properties: IndexMap::new(),
            tracker: ChangeTracker::new(),
            state: AssetState::Unloaded,
            preloaded: false,
        }
    }

    pub fn paths(&self) -> &AssetPaths {
        &self.paths
    }

    pub fn file_id(&self) -> &FileId {
        &self.file_id
    }

    pub fn folder_id(&self) -> Option<u32> {
        self.folder_id
    }

    pub fn set_folder_id(&mut self, folder_id: Option<u32>) {
        self.folder_id = folder_id;
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Set the display name. It never makes the asset dirty.
    pub fn set_display_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.display_name != name {
            self.display_name = name;
            self.tracker.notify(DISPLAY_NAME);
        }
    }

    /// Info document properties
    pub fn properties(&self) -> &IndexMap<String, Node> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&Node> {
        self.properties.get(key)
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: Node) {
        let key = key.into();
        if self.properties.get(&key) != Some(&value) {
            self.properties.insert(key, value);
            self.tracker.notify("properties");
        }
    }

    pub fn remove_property(&mut self, key: &str) -> Option<Node> {
        let removed = self.properties.shift_remove(key);
        if removed.is_some() {
            self.tracker.notify("properties");
        }
        removed
    }

    /// Replace the metadata with a freshly read info document
    pub(crate) fn apply_metadata(&mut self, document: Node) {
        self.properties = match document {
            Node::Mapping(map) => map,
            _ => IndexMap::new(),
        };
        if let Some(id) = self.properties.get(FILE_ID_KEY).and_then(Node::as_str) {
            self.file_id = FileId::new(id);
        }
    }

    /// Metadata as written to the info document, with `fileId` in sync
    pub(crate) fn metadata_document(&mut self) -> Node {
        if !self.file_id.is_none() {
            self.properties
                .insert(FILE_ID_KEY.to_string(), Node::string(self.file_id.as_str()));
        }
        Node::Mapping(self.properties.clone())
    }

    pub fn tracker(&self) -> &ChangeTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut ChangeTracker {
        &mut self.tracker
    }

    pub fn is_dirty(&self) -> bool {
        self.tracker.is_dirty()
    }

    pub fn state(&self) -> AssetState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: AssetState) {
        if self.state != state {
            log::trace!("{}: {} -> {}", self.paths.file_name(), self.state, state);
            self.state = state;
        }
    }

    /// Whether dependent resources have been preloaded since the last
    /// load or revert
    pub fn is_preloaded(&self) -> bool {
        self.preloaded
    }

    pub(crate) fn set_preloaded(&mut self, preloaded: bool) {
        self.preloaded = preloaded;
    }
}

impl fmt::Debug for AssetCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetCore")
            .field("asset", &self.paths.asset())
            .field("file_id", &self.file_id)
            .field("display_name", &self.display_name)
            .field("state", &self.state)
            .field("dirty", &self.is_dirty())
            .finish()
    }
}
