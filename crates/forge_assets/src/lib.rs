//! # Forge Assets
//!
//! The editor's asset model. Each asset is an in-memory, observable copy of
//! an on-disk document plus its side-channel info document:
//!
//! - Materials (`.mat`) and prefabs (`.prefab`) with typed fields
//! - Generic assets, whose only editable state is their metadata
//! - Load, save and revert with dirty tracking
//! - An explicit index service and concurrent dependency preloading
//! - Selection and persistent editor configuration
//!
//! ## Example
//!
//! ```ignore
//! use forge_assets::prelude::*;
//!
//! let index = AssetIndex::new();
//! let material = index.open(AssetPaths::new("content/wood.mat", "asset"))?;
//! material.lock().save()?;
//! ```

pub mod asset;
pub mod base;
pub mod config;
pub mod error;
pub mod generic;
pub mod index;
pub mod io;
pub mod material;
pub mod paths;
pub mod prefab;
pub mod preload;
pub mod selection;
pub mod types;

pub use asset::{open_asset, share, Asset, SharedAsset};
pub use base::{AssetCore, AssetState, FILE_ID_KEY};
pub use config::EditorConfig;
pub use error::{AssetError, AssetResult, ConfigError};
pub use generic::GenericAsset;
pub use index::AssetIndex;
pub use material::{MaterialAsset, MaterialData};
pub use paths::{AssetKind, AssetPaths, DEFAULT_INFO_EXTENSION};
pub use prefab::{Component, GameObject, PrefabAsset, PrefabData};
pub use preload::{PreloadReport, Preloader};
pub use selection::{Selectable, Selection};
pub use types::{FileId, Vec4};

/// Prelude
pub mod prelude {
    pub use crate::{
        Asset, AssetIndex, AssetPaths, AssetState, EditorConfig, FileId, MaterialAsset,
        PrefabAsset, Preloader, SharedAsset, Vec4,
    };
}
