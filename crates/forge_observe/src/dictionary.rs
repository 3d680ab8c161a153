//! Observable keyed map

use core::fmt;
use std::hash::Hash;

use forge_doc::{Cursor, Decode, DocResult, ElementCodec, Emitter, Encode, Natural};
use indexmap::IndexMap;

use crate::observable::{forward, Observable, PropertyChanged};
use crate::signal::{Signal, Subscription};

/// Structural change of an [`ObservableDictionary`]
#[derive(Debug, Clone, PartialEq)]
pub enum MapChange<K, V> {
    Added { key: K, value: V },
    Removed { key: K, value: V },
    Replaced { key: K, old: V, new: V },
    Reset,
}

/// A property of the value stored under `key` changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedItemChanged<K> {
    pub key: K,
    pub property: &'static str,
}

struct Entry<V> {
    value: V,
    _hook: Option<Subscription>,
}

/// Insertion-ordered map with change notification.
///
/// Besides structural events it raises `count`, `keys` and `values`
/// property changes whenever those views change.
pub struct ObservableDictionary<K, V> {
    entries: IndexMap<K, Entry<V>>,
    changes: Signal<MapChange<K, V>>,
    item_changed: Signal<KeyedItemChanged<K>>,
    property_changed: Signal<PropertyChanged>,
}

impl<K, V> ObservableDictionary<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Observable + Clone + 'static,
{
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            changes: Signal::new(),
            item_changed: Signal::new(),
            property_changed: Signal::new(),
        }
    }

    /// Structural changes
    pub fn changes(&self) -> &Signal<MapChange<K, V>> {
        &self.changes
    }

    /// Changes of contained values
    pub fn item_changed(&self) -> &Signal<KeyedItemChanged<K>> {
        &self.item_changed
    }

    fn entry_for(&self, key: &K, value: V) -> Entry<V> {
        let key = key.clone();
        let hook = forward(&value, self.item_changed.downgrade(), move |change| {
            KeyedItemChanged {
                key: key.clone(),
                property: change.property,
            }
        });
        Entry { value, _hook: hook }
    }

    fn notify(&self, properties: &[&'static str]) {
        for property in properties {
            self.property_changed.emit(&PropertyChanged::new(*property));
        }
    }

    /// Insert or replace the value under `key`, returning the previous one
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let entry = self.entry_for(&key, value.clone());
        match self.entries.get_mut(&key) {
            Some(slot) => {
                let old = std::mem::replace(slot, entry).value;
                self.changes.emit(&MapChange::Replaced {
                    key,
                    old: old.clone(),
                    new: value,
                });
                self.notify(&["values"]);
                Some(old)
            }
            None => {
                self.entries.insert(key.clone(), entry);
                self.changes.emit(&MapChange::Added { key, value });
                self.notify(&["count", "keys", "values"]);
                None
            }
        }
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let (key, entry) = self.entries.shift_remove_entry(key)?;
        self.changes.emit(&MapChange::Removed {
            key,
            value: entry.value.clone(),
        });
        self.notify(&["count", "keys", "values"]);
        Some(entry.value)
    }

    /// Edit the value under `key` in place and re-attach its hook
    pub fn update<R>(&mut self, key: &K, edit: impl FnOnce(&mut V) -> R) -> Option<R> {
        let result = edit(&mut self.entries.get_mut(key)?.value);
        let hook = {
            let entry = self.entries.get(key)?;
            let key = key.clone();
            forward(&entry.value, self.item_changed.downgrade(), move |change| {
                KeyedItemChanged {
                    key: key.clone(),
                    property: change.property,
                }
            })
        };
        if let Some(entry) = self.entries.get_mut(key) {
            entry._hook = hook;
        }
        Some(result)
    }

    pub fn clear(&mut self) {
        let was_empty = self.entries.is_empty();
        self.entries.clear();
        self.changes.emit(&MapChange::Reset);
        if !was_empty {
            self.notify(&["count", "keys", "values"]);
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.entries.values().map(|entry| &entry.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.entries.iter().map(|(key, entry)| (key, &entry.value))
    }

    /// Decode a mapping; keys use their own `Decode`, values the element codec
    pub fn decode_mapping<C: ElementCodec<V>>(cursor: &mut Cursor, codec: &C) -> DocResult<Self>
    where
        K: Decode,
    {
        let mut map = Self::new();
        if cursor.next_is_null() {
            return Ok(map);
        }
        cursor.expect_mapping_start()?;
        while !cursor.next_is_mapping_end()? {
            let key = K::decode(cursor)?;
            let value = codec.decode_element(cursor)?;
            map.insert(key, value);
        }
        Ok(map)
    }

    pub fn encode_mapping<C: ElementCodec<V>>(&self, out: &mut Emitter, codec: &C)
    where
        K: Encode,
    {
        out.mapping_start();
        for (key, value) in self.iter() {
            key.encode(out);
            codec.encode_element(value, out);
        }
        out.mapping_end();
    }
}

impl<K, V> Observable for ObservableDictionary<K, V> {
    fn property_changed(&self) -> Option<&Signal<PropertyChanged>> {
        Some(&self.property_changed)
    }
}

impl<K, V> Default for ObservableDictionary<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Observable + Clone + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for ObservableDictionary<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, e)| (k, &e.value)))
            .finish()
    }
}

impl<K, V> Decode for ObservableDictionary<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + Decode + 'static,
    V: Observable + Clone + Decode + Encode + 'static,
{
    fn decode(cursor: &mut Cursor) -> DocResult<Self> {
        Self::decode_mapping(cursor, &Natural)
    }
}

impl<K, V> Encode for ObservableDictionary<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + Encode + 'static,
    V: Observable + Clone + Decode + Encode + 'static,
{
    fn encode(&self, out: &mut Emitter) {
        self.encode_mapping(out, &Natural);
    }
}
