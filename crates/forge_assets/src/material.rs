//! Material assets

use forge_doc::{Cursor, Decode, DocResult, Emitter, Encode, Field, FieldTable, Natural};
use forge_observe::{Observable, ObservableList, ObservableValue, PropertyChanged, Signal, Uniform};

use crate::asset::Asset;
use crate::base::AssetCore;
use crate::paths::AssetPaths;
use crate::types::{FileId, Vec4};

/// Render state and shader bindings of a material
#[derive(Debug)]
pub struct MaterialData {
    pub render_queue: String,
    pub depth_bias: f32,
    pub support_multisampling: bool,
    pub custom_depth_shader: bool,
    pub enable_depth_test: bool,
    pub enable_z_write: bool,
    pub cull_mode: String,
    pub blend_mode: String,
    pub fill_mode: String,
    pub shader: FileId,
    pub samplers: ObservableList<Uniform<FileId>>,
    pub uniforms_vec4: ObservableList<Uniform<Vec4>>,
    pub uniforms_float: ObservableList<Uniform<f32>>,
    pub defines: ObservableList<ObservableValue<String>>,
}

impl Default for MaterialData {
    fn default() -> Self {
        Self {
            render_queue: "Opaque".to_string(),
            depth_bias: 0.0,
            support_multisampling: true,
            custom_depth_shader: true,
            enable_depth_test: true,
            enable_z_write: true,
            cull_mode: String::new(),
            blend_mode: String::new(),
            fill_mode: String::new(),
            shader: FileId::none(),
            samplers: ObservableList::new(),
            uniforms_vec4: ObservableList::new(),
            uniforms_float: ObservableList::new(),
            defines: ObservableList::new(),
        }
    }
}

macro_rules! value_field {
    ($key:literal, $field:ident) => {
        Field::new(
            $key,
            |m: &mut MaterialData, c: &mut Cursor| {
                m.$field = c.decode()?;
                Ok(())
            },
            |m: &MaterialData, out: &mut Emitter| out.emit(&m.$field),
        )
    };
}

/// Names whose default is empty; empty is written as null.
macro_rules! name_field {
    ($key:literal, $field:ident) => {
        Field::new(
            $key,
            |m: &mut MaterialData, c: &mut Cursor| {
                m.$field = c.decode()?;
                Ok(())
            },
            |m: &MaterialData, out: &mut Emitter| {
                if m.$field.is_empty() {
                    out.null();
                } else {
                    out.scalar(&m.$field);
                }
            },
        )
    };
}

macro_rules! uniform_field {
    ($key:literal, $field:ident) => {
        Field::new(
            $key,
            |m: &mut MaterialData, c: &mut Cursor| {
                m.$field = ObservableList::decode_uniform_map(c, &Natural)?;
                Ok(())
            },
            |m: &MaterialData, out: &mut Emitter| m.$field.encode_uniform_map(out, &Natural),
        )
    };
}

/// Material document schema, in write order
pub static MATERIAL_FIELDS: FieldTable<MaterialData> = FieldTable::new(
    "Material",
    &[
        value_field!("renderQueue", render_queue),
        value_field!("depthBias", depth_bias),
        value_field!("bSupportMultisampling", support_multisampling),
        value_field!("bCustomDepthShader", custom_depth_shader),
        value_field!("bEnableDepthTest", enable_depth_test),
        value_field!("bEnableZWrite", enable_z_write),
        name_field!("cullMode", cull_mode),
        name_field!("blendMode", blend_mode),
        name_field!("fillMode", fill_mode),
        value_field!("shaderUid", shader),
        uniform_field!("samplers", samplers),
        uniform_field!("uniformsVec4", uniforms_vec4),
        uniform_field!("uniformsFloat", uniforms_float),
        Field::new(
            "defines",
            |m: &mut MaterialData, c: &mut Cursor| {
                m.defines = ObservableList::decode_sequence(c, &Natural)?;
                Ok(())
            },
            |m: &MaterialData, out: &mut Emitter| m.defines.encode_sequence(out, &Natural),
        ),
    ],
);

impl Decode for MaterialData {
    fn decode(cursor: &mut Cursor) -> DocResult<Self> {
        let mut data = Self::default();
        MATERIAL_FIELDS.decode_entity(cursor, &mut data)?;
        Ok(data)
    }
}

impl Encode for MaterialData {
    fn encode(&self, out: &mut Emitter) {
        MATERIAL_FIELDS.encode_entity(self, out);
    }
}

macro_rules! property {
    ($get:ident, $set:ident, $field:ident: $ty:ty, $name:literal) => {
        pub fn $get(&self) -> $ty {
            self.data.$field
        }

        pub fn $set(&mut self, value: $ty) {
            if self.data.$field != value {
                self.data.$field = value;
                self.core.tracker().notify($name);
            }
        }
    };
    ($get:ident, $set:ident, ref $field:ident: $ty:ty, $name:literal) => {
        pub fn $get(&self) -> &$ty {
            &self.data.$field
        }

        pub fn $set(&mut self, value: impl Into<$ty>) {
            let value = value.into();
            if self.data.$field != value {
                self.data.$field = value;
                self.core.tracker().notify($name);
            }
        }
    };
}

macro_rules! container {
    ($get:ident, $get_mut:ident, $set:ident, $field:ident: $ty:ty, $name:literal) => {
        pub fn $get(&self) -> &$ty {
            &self.data.$field
        }

        /// Edits through this reference are tracked
        pub fn $get_mut(&mut self) -> &mut $ty {
            &mut self.data.$field
        }

        /// Replace the whole container and track the new one
        pub fn $set(&mut self, value: $ty) {
            self.data.$field = value;
            self.attach_watches();
            self.core.tracker().notify($name);
        }
    };
}

/// A material asset (`.mat`)
pub struct MaterialAsset {
    core: AssetCore,
    data: MaterialData,
}

impl MaterialAsset {
    pub fn new(paths: AssetPaths) -> Self {
        let mut asset = Self {
            core: AssetCore::new(paths),
            data: MaterialData::default(),
        };
        asset.attach_watches();
        asset
    }

    pub fn data(&self) -> &MaterialData {
        &self.data
    }

    fn attach_watches(&mut self) {
        let tracker = self.core.tracker_mut();
        tracker.reset_watches();
        tracker.watch_list("samplers", &self.data.samplers);
        tracker.watch_list("uniformsVec4", &self.data.uniforms_vec4);
        tracker.watch_list("uniformsFloat", &self.data.uniforms_float);
        tracker.watch_list("defines", &self.data.defines);
    }

    property!(render_queue, set_render_queue, ref render_queue: String, "renderQueue");
    property!(depth_bias, set_depth_bias, depth_bias: f32, "depthBias");
    property!(
        support_multisampling,
        set_support_multisampling,
        support_multisampling: bool,
        "bSupportMultisampling"
    );
    property!(
        custom_depth_shader,
        set_custom_depth_shader,
        custom_depth_shader: bool,
        "bCustomDepthShader"
    );
    property!(enable_depth_test, set_enable_depth_test, enable_depth_test: bool, "bEnableDepthTest");
    property!(enable_z_write, set_enable_z_write, enable_z_write: bool, "bEnableZWrite");
    property!(cull_mode, set_cull_mode, ref cull_mode: String, "cullMode");
    property!(blend_mode, set_blend_mode, ref blend_mode: String, "blendMode");
    property!(fill_mode, set_fill_mode, ref fill_mode: String, "fillMode");
    property!(shader, set_shader, ref shader: FileId, "shaderUid");

    container!(samplers, samplers_mut, set_samplers, samplers: ObservableList<Uniform<FileId>>, "samplers");
    container!(
        uniforms_vec4,
        uniforms_vec4_mut,
        set_uniforms_vec4,
        uniforms_vec4: ObservableList<Uniform<Vec4>>,
        "uniformsVec4"
    );
    container!(
        uniforms_float,
        uniforms_float_mut,
        set_uniforms_float,
        uniforms_float: ObservableList<Uniform<f32>>,
        "uniformsFloat"
    );
    container!(
        defines,
        defines_mut,
        set_defines,
        defines: ObservableList<ObservableValue<String>>,
        "defines"
    );

    /// Add a shader define unless it is already present
    pub fn add_define(&mut self, define: impl Into<String>) {
        let define = ObservableValue::new(define.into());
        if !self.data.defines.contains(&define) {
            self.data.defines.push(define);
        }
    }

    pub fn remove_define(&mut self, define: &str) -> bool {
        let define = ObservableValue::new(define.to_string());
        self.data.defines.remove_item(&define).is_some()
    }
}

impl Asset for MaterialAsset {
    fn core(&self) -> &AssetCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AssetCore {
        &mut self.core
    }

    fn read_document(&mut self, source: &str) -> DocResult<()> {
        self.data = forge_doc::from_str(source)?;
        self.attach_watches();
        Ok(())
    }

    fn write_document(&self) -> Option<String> {
        Some(forge_doc::to_string(&self.data))
    }

    /// Textures bound to samplers
    fn dependencies(&self) -> Vec<FileId> {
        let mut ids: Vec<FileId> = Vec::new();
        for sampler in self.data.samplers.iter() {
            let id = sampler.value();
            if !id.is_none() && !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        ids
    }
}

impl Observable for MaterialAsset {
    fn property_changed(&self) -> Option<&Signal<PropertyChanged>> {
        self.core.tracker().property_changed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::DEFAULT_INFO_EXTENSION;

    fn material() -> MaterialAsset {
        MaterialAsset::new(AssetPaths::new("wood.mat", DEFAULT_INFO_EXTENSION))
    }

    #[test]
    fn test_defaults() {
        let data = MaterialData::default();
        assert_eq!(data.render_queue, "Opaque");
        assert_eq!(data.depth_bias, 0.0);
        assert!(data.support_multisampling && data.custom_depth_shader);
        assert!(data.enable_depth_test && data.enable_z_write);
    }

    #[test]
    fn test_collection_shapes_are_never_swapped() {
        let data: MaterialData =
            forge_doc::from_str("uniformsFloat: { intensity: 2.5 }\ndefines: [USE_FOG]\n").unwrap();
        let text = forge_doc::to_string(&data);

        assert!(text.contains("uniformsFloat:\n  intensity: 2.5\n"));
        assert!(text.contains("defines:\n  - USE_FOG\n"));
        assert!(text.contains("samplers: {}\n"));
        assert!(text.contains("uniformsVec4: {}\n"));
    }

    #[test]
    fn test_canonical_field_order() {
        let data: MaterialData = forge_doc::from_str(
            "defines: []\nshaderUid: shader-1\ncullMode: Back\nrenderQueue: Transparent\ndepthBias: 0.5\n",
        )
        .unwrap();

        assert_eq!(
            forge_doc::to_string(&data),
            "renderQueue: Transparent\n\
             depthBias: 0.5\n\
             bSupportMultisampling: true\n\
             bCustomDepthShader: true\n\
             bEnableDepthTest: true\n\
             bEnableZWrite: true\n\
             cullMode: Back\n\
             blendMode: ~\n\
             fillMode: ~\n\
             shaderUid: shader-1\n\
             samplers: {}\n\
             uniformsVec4: {}\n\
             uniformsFloat: {}\n\
             defines: []\n"
        );
    }

    #[test]
    fn test_empty_names_survive_a_round_trip() {
        let data = MaterialData {
            render_queue: String::new(),
            cull_mode: String::new(),
            shader: FileId::none(),
            ..MaterialData::default()
        };
        let text = forge_doc::to_string(&data);
        assert!(text.starts_with("renderQueue: \"\"\n"));

        let again: MaterialData = forge_doc::from_str(&text).unwrap();
        assert_eq!(again.render_queue, "");
        assert_eq!(again.cull_mode, "");
        assert!(again.shader.is_none());
        assert_eq!(forge_doc::to_string(&again), text);
    }

    #[test]
    fn test_setters_mark_dirty() {
        let mut asset = material();
        asset.set_depth_bias(0.0);
        assert!(!asset.is_dirty());

        asset.set_cull_mode("Back");
        assert!(asset.is_dirty());
        assert_eq!(asset.cull_mode(), "Back");
    }

    #[test]
    fn test_container_edits_mark_dirty() {
        let mut asset = material();
        asset.uniforms_float_mut().set_uniform("intensity", 1.0);
        assert!(asset.is_dirty());

        asset.core().tracker().mark_clean();
        asset.add_define("USE_FOG");
        assert!(asset.is_dirty());

        asset.core().tracker().mark_clean();
        asset.add_define("USE_FOG");
        assert!(!asset.is_dirty());
        assert!(asset.remove_define("USE_FOG"));
        assert!(asset.is_dirty());
    }

    #[test]
    fn test_replaced_container_is_tracked() {
        let mut asset = material();
        let mut fresh = ObservableList::new();
        fresh.set_uniform("tint", Vec4::ONE);
        asset.set_uniforms_vec4(fresh);
        assert!(asset.is_dirty());

        asset.core().tracker().mark_clean();
        asset
            .uniforms_vec4_mut()
            .set_uniform("tint", Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert!(asset.is_dirty());
    }

    #[test]
    fn test_dependencies_are_sampler_targets() {
        let mut asset = material();
        asset.samplers_mut().set_uniform("albedo", FileId::from("tex-1"));
        asset.samplers_mut().set_uniform("normal", FileId::from("tex-2"));
        asset.samplers_mut().set_uniform("detail", FileId::from("tex-1"));
        asset.samplers_mut().set_uniform("unused", FileId::none());

        assert_eq!(
            asset.dependencies(),
            vec![FileId::from("tex-1"), FileId::from("tex-2")]
        );
    }
}
