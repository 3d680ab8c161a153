//! Prefab assets: game objects and their components

use forge_doc::{Cursor, Decode, DocResult, Emitter, Encode, Field, FieldTable, Natural, Node};
use forge_observe::{
    ChangeTracker, Observable, ObservableDictionary, ObservableList, PropertyChanged, Signal,
};

use crate::asset::Asset;
use crate::base::AssetCore;
use crate::paths::AssetPaths;
use crate::types::Vec4;

/// Parent index of a root game object
pub const ROOT_PARENT: u32 = u32::MAX;

/// Instance id of an object that has not been instantiated
pub const NULL_INSTANCE_ID: &str = "NullInstanceId";

/// A node of the prefab hierarchy
pub struct GameObject {
    name: String,
    position: Vec4,
    rotation: Vec4,
    scale: Vec4,
    parent_index: u32,
    instance_id: String,
    components: Vec<u32>,
    changed: Signal<PropertyChanged>,
}

macro_rules! game_object_property {
    ($get:ident, $set:ident, $field:ident: $ty:ty, $name:literal) => {
        pub fn $get(&self) -> &$ty {
            &self.$field
        }

        pub fn $set(&mut self, value: impl Into<$ty>) {
            let value = value.into();
            if self.$field != value {
                self.$field = value;
                self.changed.emit(&PropertyChanged::new($name));
            }
        }
    };
}

impl GameObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    game_object_property!(name, set_name, name: String, "name");
    game_object_property!(position, set_position, position: Vec4, "position");
    game_object_property!(rotation, set_rotation, rotation: Vec4, "rotation");
    game_object_property!(scale, set_scale, scale: Vec4, "scale");
    game_object_property!(instance_id, set_instance_id, instance_id: String, "instanceId");
    game_object_property!(components, set_components, components: Vec<u32>, "components");

    pub fn parent_index(&self) -> u32 {
        self.parent_index
    }

    pub fn set_parent_index(&mut self, parent_index: u32) {
        if self.parent_index != parent_index {
            self.parent_index = parent_index;
            self.changed.emit(&PropertyChanged::new("parentIndex"));
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_index == ROOT_PARENT
    }

    /// A copy named `<name>(Clone)`
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.name.push_str("(Clone)");
        copy
    }
}

impl Default for GameObject {
    fn default() -> Self {
        Self {
            name: String::new(),
            position: Vec4::ZERO,
            rotation: Vec4::ZERO,
            scale: Vec4::ZERO,
            parent_index: ROOT_PARENT,
            instance_id: NULL_INSTANCE_ID.to_string(),
            components: Vec::new(),
            changed: Signal::new(),
        }
    }
}

impl Clone for GameObject {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
            parent_index: self.parent_index,
            instance_id: self.instance_id.clone(),
            components: self.components.clone(),
            changed: Signal::new(),
        }
    }
}

impl std::fmt::Debug for GameObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameObject")
            .field("name", &self.name)
            .field("parent_index", &self.parent_index)
            .field("instance_id", &self.instance_id)
            .field("components", &self.components)
            .finish()
    }
}

impl Observable for GameObject {
    fn property_changed(&self) -> Option<&Signal<PropertyChanged>> {
        Some(&self.changed)
    }
}

macro_rules! game_object_field {
    ($key:literal, $field:ident) => {
        Field::new(
            $key,
            |g: &mut GameObject, c: &mut Cursor| {
                g.$field = c.decode()?;
                Ok(())
            },
            |g: &GameObject, out: &mut Emitter| out.emit(&g.$field),
        )
    };
}

pub static GAME_OBJECT_FIELDS: FieldTable<GameObject> = FieldTable::new(
    "GameObject",
    &[
        game_object_field!("name", name),
        game_object_field!("position", position),
        game_object_field!("rotation", rotation),
        game_object_field!("scale", scale),
        game_object_field!("parentIndex", parent_index),
        game_object_field!("instanceId", instance_id),
        game_object_field!("components", components),
    ],
);

impl Decode for GameObject {
    fn decode(cursor: &mut Cursor) -> DocResult<Self> {
        let mut object = Self::default();
        GAME_OBJECT_FIELDS.decode_entity(cursor, &mut object)?;
        Ok(object)
    }
}

impl Encode for GameObject {
    fn encode(&self, out: &mut Emitter) {
        GAME_OBJECT_FIELDS.encode_entity(self, out);
    }
}

/// A component attached to game objects, with per-instance overrides.
///
/// Components keep their own dirty flag, cleared when the prefab is saved.
pub struct Component {
    typename: String,
    instance_id: String,
    override_properties: ObservableDictionary<String, Node>,
    tracker: ChangeTracker,
}

impl Component {
    pub fn new(typename: impl Into<String>) -> Self {
        Self {
            typename: typename.into(),
            ..Self::default()
        }
    }

    fn attach_watches(&mut self) {
        self.tracker.reset_watches();
        self.tracker
            .watch_map("overrideProperties", &self.override_properties);
    }

    pub fn typename(&self) -> &str {
        &self.typename
    }

    pub fn set_typename(&mut self, typename: impl Into<String>) {
        let typename = typename.into();
        if self.typename != typename {
            self.typename = typename;
            self.tracker.notify("typename");
        }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn set_instance_id(&mut self, instance_id: impl Into<String>) {
        let instance_id = instance_id.into();
        if self.instance_id != instance_id {
            self.instance_id = instance_id;
            self.tracker.notify("instanceId");
        }
    }

    pub fn override_properties(&self) -> &ObservableDictionary<String, Node> {
        &self.override_properties
    }

    pub fn override_properties_mut(&mut self) -> &mut ObservableDictionary<String, Node> {
        &mut self.override_properties
    }

    pub fn is_dirty(&self) -> bool {
        self.tracker.is_dirty()
    }

    pub fn mark_clean(&self) {
        self.tracker.mark_clean();
    }

    pub fn tracker(&self) -> &ChangeTracker {
        &self.tracker
    }
}

impl Default for Component {
    fn default() -> Self {
        let mut component = Self {
            typename: String::new(),
            instance_id: NULL_INSTANCE_ID.to_string(),
            override_properties: ObservableDictionary::new(),
            tracker: ChangeTracker::new(),
        };
        component.attach_watches();
        component
    }
}

impl Clone for Component {
    fn clone(&self) -> Self {
        let mut overrides = ObservableDictionary::new();
        for (key, value) in self.override_properties.iter() {
            overrides.insert(key.clone(), value.clone());
        }

        let mut component = Self {
            typename: self.typename.clone(),
            instance_id: self.instance_id.clone(),
            override_properties: overrides,
            tracker: ChangeTracker::new(),
        };
        component.attach_watches();
        component
    }
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("typename", &self.typename)
            .field("instance_id", &self.instance_id)
            .field("override_properties", &self.override_properties)
            .field("dirty", &self.is_dirty())
            .finish()
    }
}

impl Observable for Component {
    fn property_changed(&self) -> Option<&Signal<PropertyChanged>> {
        self.tracker.property_changed()
    }
}

pub static COMPONENT_FIELDS: FieldTable<Component> = FieldTable::new(
    "Component",
    &[
        Field::new(
            "typename",
            |c: &mut Component, cursor: &mut Cursor| {
                c.typename = cursor.decode()?;
                Ok(())
            },
            |c: &Component, out: &mut Emitter| out.emit(&c.typename),
        ),
        Field::new(
            "instanceId",
            |c: &mut Component, cursor: &mut Cursor| {
                c.instance_id = cursor.decode()?;
                Ok(())
            },
            |c: &Component, out: &mut Emitter| out.emit(&c.instance_id),
        ),
        Field::new(
            "overrideProperties",
            |c: &mut Component, cursor: &mut Cursor| {
                c.override_properties = ObservableDictionary::decode_mapping(cursor, &Natural)?;
                Ok(())
            },
            |c: &Component, out: &mut Emitter| c.override_properties.encode_mapping(out, &Natural),
        ),
    ],
);

impl Decode for Component {
    fn decode(cursor: &mut Cursor) -> DocResult<Self> {
        let mut component = Self::default();
        COMPONENT_FIELDS.decode_entity(cursor, &mut component)?;
        component.attach_watches();
        Ok(component)
    }
}

impl Encode for Component {
    fn encode(&self, out: &mut Emitter) {
        COMPONENT_FIELDS.encode_entity(self, out);
    }
}

#[derive(Debug, Default)]
pub struct PrefabData {
    pub game_objects: ObservableList<GameObject>,
    pub components: ObservableList<Component>,
}

pub static PREFAB_FIELDS: FieldTable<PrefabData> = FieldTable::new(
    "Prefab",
    &[
        Field::new(
            "gameObjects",
            |p: &mut PrefabData, c: &mut Cursor| {
                p.game_objects = ObservableList::decode_sequence(c, &Natural)?;
                Ok(())
            },
            |p: &PrefabData, out: &mut Emitter| p.game_objects.encode_sequence(out, &Natural),
        ),
        Field::new(
            "components",
            |p: &mut PrefabData, c: &mut Cursor| {
                p.components = ObservableList::decode_sequence(c, &Natural)?;
                Ok(())
            },
            |p: &PrefabData, out: &mut Emitter| p.components.encode_sequence(out, &Natural),
        ),
    ],
);

impl Decode for PrefabData {
    fn decode(cursor: &mut Cursor) -> DocResult<Self> {
        let mut data = Self::default();
        PREFAB_FIELDS.decode_entity(cursor, &mut data)?;
        Ok(data)
    }
}

impl Encode for PrefabData {
    fn encode(&self, out: &mut Emitter) {
        PREFAB_FIELDS.encode_entity(self, out);
    }
}

/// A prefab asset (`.prefab`)
pub struct PrefabAsset {
    core: AssetCore,
    data: PrefabData,
}

impl PrefabAsset {
    pub fn new(paths: AssetPaths) -> Self {
        let mut asset = Self {
            core: AssetCore::new(paths),
            data: PrefabData::default(),
        };
        asset.attach_watches();
        asset
    }

    fn attach_watches(&mut self) {
        let tracker = self.core.tracker_mut();
        tracker.reset_watches();
        tracker.watch_list("gameObjects", &self.data.game_objects);
        tracker.watch_list("components", &self.data.components);
    }

    pub fn game_objects(&self) -> &ObservableList<GameObject> {
        &self.data.game_objects
    }

    pub fn game_objects_mut(&mut self) -> &mut ObservableList<GameObject> {
        &mut self.data.game_objects
    }

    pub fn components(&self) -> &ObservableList<Component> {
        &self.data.components
    }

    pub fn components_mut(&mut self) -> &mut ObservableList<Component> {
        &mut self.data.components
    }

    /// Components attached to the game object at `index`
    pub fn components_of(&self, index: usize) -> Vec<&Component> {
        let Some(object) = self.data.game_objects.get(index) else {
            return Vec::new();
        };
        object
            .components()
            .iter()
            .filter_map(|&i| self.data.components.get(i as usize))
            .collect()
    }

    /// Children of the game object at `index`
    pub fn children_of(&self, index: usize) -> Vec<usize> {
        self.data
            .game_objects
            .iter()
            .enumerate()
            .filter(|(_, object)| object.parent_index() as usize == index)
            .map(|(i, _)| i)
            .collect()
    }
}

impl Asset for PrefabAsset {
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

    fn after_save(&mut self) {
        for component in self.data.components.iter() {
            component.mark_clean();
        }
    }
}

impl Observable for PrefabAsset {
    fn property_changed(&self) -> Option<&Signal<PropertyChanged>> {
        self.core.tracker().property_changed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::DEFAULT_INFO_EXTENSION;

    const TREE: &str = "\
gameObjects:
  - name: Root
    position: [0, 0, 0, 1]
    components: [0]
  - name: Branch
    parentIndex: 0
    instanceId: branch-1
components:
  - typename: MeshRenderer
    overrideProperties:
      castShadows: true
";

    #[test]
    fn test_game_object_defaults() {
        let object = GameObject::default();
        assert_eq!(object.parent_index(), ROOT_PARENT);
        assert_eq!(object.instance_id(), NULL_INSTANCE_ID);
        assert_eq!(*object.scale(), Vec4::ZERO);
        assert!(object.is_root());
    }

    #[test]
    fn test_duplicate_appends_clone_suffix() {
        let mut object = GameObject::new("Tree");
        object.set_components(vec![1, 2]);
        let copy = object.duplicate();
        assert_eq!(copy.name(), "Tree(Clone)");
        assert_eq!(copy.components(), &vec![1, 2]);
        assert_eq!(copy.changed.subscriber_count(), 0);
    }

    #[test]
    fn test_decode_prefab() {
        let data: PrefabData = forge_doc::from_str(TREE).unwrap();
        assert_eq!(data.game_objects.len(), 2);

        let root = data.game_objects.get(0).unwrap();
        assert_eq!(root.name(), "Root");
        assert_eq!(*root.position(), Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert!(root.is_root());

        let branch = data.game_objects.get(1).unwrap();
        assert_eq!(branch.parent_index(), 0);
        assert_eq!(branch.instance_id(), "branch-1");

        let renderer = data.components.get(0).unwrap();
        assert_eq!(renderer.typename(), "MeshRenderer");
        assert_eq!(
            renderer
                .override_properties()
                .get(&"castShadows".to_string())
                .and_then(Node::as_str),
            Some("true")
        );
        assert!(!renderer.is_dirty());
    }

    #[test]
    fn test_game_object_edit_marks_prefab_dirty() {
        let mut asset = PrefabAsset::new(AssetPaths::new("tree.prefab", DEFAULT_INFO_EXTENSION));
        asset.read_document(TREE).unwrap();
        assert!(!asset.is_dirty());

        asset
            .game_objects_mut()
            .update(1, |object| object.set_name("Twig"));
        assert!(asset.is_dirty());
        assert_eq!(asset.children_of(0), vec![1]);
    }

    #[test]
    fn test_component_dirty_is_local_and_cleared_on_save() {
        let mut asset = PrefabAsset::new(AssetPaths::new("tree.prefab", DEFAULT_INFO_EXTENSION));
        asset.read_document(TREE).unwrap();

        asset.components_mut().update(0, |component| {
            component
                .override_properties_mut()
                .insert("castShadows".to_string(), Node::plain("false"));
        });
        assert!(asset.components().get(0).unwrap().is_dirty());
        assert!(asset.is_dirty());

        asset.after_save();
        assert!(!asset.components().get(0).unwrap().is_dirty());
        assert_eq!(asset.components_of(0).len(), 1);
    }

    #[test]
    fn test_prefab_round_trip() {
        let data: PrefabData = forge_doc::from_str(TREE).unwrap();
        let text = forge_doc::to_string(&data);
        let again: PrefabData = forge_doc::from_str(&text).unwrap();

        assert_eq!(forge_doc::to_string(&again), text);
        assert!(text.contains("parentIndex: 4294967295\n"));
        assert!(text.contains("instanceId: NullInstanceId\n"));
    }
}
