//! Asset file locations and kinds

use std::path::{Path, PathBuf};

/// Default extension of the side-channel info document
pub const DEFAULT_INFO_EXTENSION: &str = "asset";

/// Kind of asset, by primary document extension
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Material,
    Prefab,
    Generic,
}

impl AssetKind {
    /// Detect asset kind from file extension
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "mat" => Self::Material,
            "prefab" => Self::Prefab,
            _ => Self::Generic,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Material => "material",
            Self::Prefab => "prefab",
            Self::Generic => "generic",
        }
    }
}

/// The primary document of an asset and its info document.
///
/// The info document sits next to the asset as `<asset>.<info_extension>`,
/// e.g. `wood.mat` and `wood.mat.asset`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AssetPaths {
    asset: PathBuf,
    info: PathBuf,
}

impl AssetPaths {
    pub fn new(asset: impl Into<PathBuf>, info_extension: &str) -> Self {
        let asset = asset.into();
        let mut info = asset.clone().into_os_string();
        info.push(".");
        info.push(info_extension);
        Self {
            asset,
            info: PathBuf::from(info),
        }
    }

    /// Paths for the asset described by an info document
    pub fn from_info(info: impl Into<PathBuf>, info_extension: &str) -> Option<Self> {
        let info = info.into();
        let name = info.file_name()?.to_str()?;
        let stem = name.strip_suffix(info_extension)?.strip_suffix('.')?;
        if stem.is_empty() {
            return None;
        }
        Some(Self {
            asset: info.with_file_name(stem),
            info,
        })
    }

    pub fn asset(&self) -> &Path {
        &self.asset
    }

    pub fn info(&self) -> &Path {
        &self.info
    }

    pub fn kind(&self) -> AssetKind {
        AssetKind::from_path(&self.asset)
    }

    /// File name of the primary document
    pub fn file_name(&self) -> String {
        self.asset
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}
