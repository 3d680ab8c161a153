//! Assets without a typed primary document

use forge_doc::DocResult;
use forge_observe::{Observable, PropertyChanged, Signal};

use crate::asset::Asset;
use crate::base::AssetCore;
use crate::paths::AssetPaths;

/// Any other asset (textures, shaders, models). Only its info document is
/// editable; the primary file is opaque.
pub struct GenericAsset {
    core: AssetCore,
}

impl GenericAsset {
    pub fn new(paths: AssetPaths) -> Self {
        Self {
            core: AssetCore::new(paths),
        }
    }
}

impl Asset for GenericAsset {
    fn core(&self) -> &AssetCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AssetCore {
        &mut self.core
    }

    fn has_document(&self) -> bool {
        false
    }

    fn read_document(&mut self, _source: &str) -> DocResult<()> {
        Ok(())
    }

    fn write_document(&self) -> Option<String> {
        None
    }
}

impl Observable for GenericAsset {
    fn property_changed(&self) -> Option<&Signal<PropertyChanged>> {
        self.core.tracker().property_changed()
    }
}
