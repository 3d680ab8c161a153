//! Observable ordered list

use core::fmt;

use forge_doc::{Cursor, Decode, DocResult, ElementCodec, Emitter, Encode, Natural};

use crate::error::ObserveError;
use crate::observable::{forward, Observable, PropertyChanged};
use crate::signal::{Signal, Subscription};
use crate::uniform::Uniform;

/// Stable identity of a list element, independent of its index
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub u64);

/// Structural change of an [`ObservableList`]
#[derive(Debug, Clone, PartialEq)]
pub enum ListChange<T> {
    Added { index: usize, item: T },
    Removed { index: usize, item: T },
    Replaced { index: usize, old: T, new: T },
    Reset,
}

/// A property of one list element changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemChanged {
    pub slot: SlotId,
    pub property: &'static str,
}

struct Slot<T> {
    id: SlotId,
    value: T,
    _hook: Option<Subscription>,
}

/// Ordered list that reports structural changes and changes of its elements.
///
/// Each element holds exactly one hook into [`ItemChanged`] for as long as
/// it is in the list; the hook is dropped together with the slot.
pub struct ObservableList<T> {
    slots: Vec<Slot<T>>,
    next_slot: u64,
    changes: Signal<ListChange<T>>,
    item_changed: Signal<ItemChanged>,
    property_changed: Signal<PropertyChanged>,
}

impl<T: Observable + Clone + 'static> ObservableList<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            next_slot: 1,
            changes: Signal::new(),
            item_changed: Signal::new(),
            property_changed: Signal::new(),
        }
    }

    /// Structural changes
    pub fn changes(&self) -> &Signal<ListChange<T>> {
        &self.changes
    }

    /// Changes of contained elements
    pub fn item_changed(&self) -> &Signal<ItemChanged> {
        &self.item_changed
    }

    fn make_slot(&mut self, value: T) -> Slot<T> {
        let id = SlotId(self.next_slot);
        self.next_slot += 1;
        let hook = self.hook(id, &value);
        Slot {
            id,
            value,
            _hook: hook,
        }
    }

    fn hook(&self, slot: SlotId, value: &T) -> Option<Subscription> {
        forward(value, self.item_changed.downgrade(), move |change| ItemChanged {
            slot,
            property: change.property,
        })
    }

    fn count_changed(&self) {
        self.property_changed.emit(&PropertyChanged::new("count"));
    }

    pub fn push(&mut self, item: T) {
        let index = self.slots.len();
        self.insert(index, item);
    }

    /// Insert at `index`, clamped to the list length
    pub fn insert(&mut self, index: usize, item: T) {
        let index = index.min(self.slots.len());
        let slot = self.make_slot(item.clone());
        self.slots.insert(index, slot);
        self.changes.emit(&ListChange::Added { index, item });
        self.count_changed();
    }

    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.slots.len() {
            return None;
        }
        let Slot { value, .. } = self.slots.remove(index);
        self.changes.emit(&ListChange::Removed {
            index,
            item: value.clone(),
        });
        self.count_changed();
        Some(value)
    }

    /// Remove the first element equal to `item`
    pub fn remove_item(&mut self, item: &T) -> Option<T>
    where
        T: PartialEq,
    {
        let index = self.position(item)?;
        self.remove(index)
    }

    /// Replace the element at `index`, returning the old one
    pub fn replace(&mut self, index: usize, item: T) -> Option<T> {
        if index >= self.slots.len() {
            return None;
        }
        let slot = self.make_slot(item.clone());
        let old = std::mem::replace(&mut self.slots[index], slot).value;
        self.changes.emit(&ListChange::Replaced {
            index,
            old: old.clone(),
            new: item,
        });
        Some(old)
    }

    /// Edit the element at `index` in place. Its hook is re-attached
    /// afterwards in case the edit swapped out its signal.
    pub fn update<R>(&mut self, index: usize, edit: impl FnOnce(&mut T) -> R) -> Option<R> {
        let id = self.slots.get(index)?.id;
        let result = edit(&mut self.slots[index].value);
        let hook = self.hook(id, &self.slots[index].value);
        self.slots[index]._hook = hook;
        Some(result)
    }

    /// Remove every element
    pub fn clear(&mut self) {
        let was_empty = self.slots.is_empty();
        self.slots.clear();
        self.changes.emit(&ListChange::Reset);
        if !was_empty {
            self.count_changed();
        }
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).map(|slot| &slot.value)
    }

    pub fn position(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.slots.iter().position(|slot| slot.value == *item)
    }

    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.position(item).is_some()
    }

    pub fn slot_of(&self, index: usize) -> Option<SlotId> {
        self.slots.get(index).map(|slot| slot.id)
    }

    pub fn index_of_slot(&self, slot: SlotId) -> Option<usize> {
        self.slots.iter().position(|s| s.id == slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.slots.iter().map(|slot| &slot.value)
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    /// Decode a sequence, one element per item
    pub fn decode_sequence<C: ElementCodec<T>>(cursor: &mut Cursor, codec: &C) -> DocResult<Self> {
        let mut list = Self::new();
        if cursor.next_is_null() {
            return Ok(list);
        }
        cursor.expect_sequence_start()?;
        while !cursor.next_is_sequence_end()? {
            let item = codec.decode_element(cursor)?;
            list.push(item);
        }
        Ok(list)
    }

    pub fn encode_sequence<C: ElementCodec<T>>(&self, out: &mut Emitter, codec: &C) {
        out.sequence_start();
        for item in self.iter() {
            codec.encode_element(item, out);
        }
        out.sequence_end();
    }
}

impl<V: Observable + Clone + PartialEq + 'static> ObservableList<Uniform<V>> {
    pub fn get_uniform(&self, key: &str) -> Option<&V> {
        self.iter().find(|u| u.key() == key).map(Uniform::value)
    }

    /// Set the value of the uniform named `key`, adding it if missing
    pub fn set_uniform(&mut self, key: &str, value: V) {
        let found = self.iter().position(|u| u.key() == key);
        match found {
            Some(index) => {
                self.slots[index].value.set_value(value);
            }
            None => self.push(Uniform::new(key, value)),
        }
    }

    /// Rename the uniform `from` to `to`. A name already in the set is
    /// refused, as it would collapse two entries into one on save.
    pub fn rename_uniform(&mut self, from: &str, to: &str) -> Result<(), ObserveError> {
        let index = self
            .iter()
            .position(|u| u.key() == from)
            .ok_or_else(|| ObserveError::MissingUniform(from.to_string()))?;
        if from == to {
            return Ok(());
        }
        if self.iter().any(|u| u.key() == to) {
            return Err(ObserveError::DuplicateUniform(to.to_string()));
        }
        self.slots[index].value.set_key(to);
        Ok(())
    }

    pub fn remove_uniform(&mut self, key: &str) -> Option<V> {
        let index = self.iter().position(|u| u.key() == key)?;
        self.remove(index).map(|u| u.into_parts().1)
    }

    /// Decode a named-uniform set, written as a mapping from name to value.
    /// A repeated name keeps the later value.
    pub fn decode_uniform_map<C: ElementCodec<V>>(cursor: &mut Cursor, codec: &C) -> DocResult<Self> {
        let mut list = Self::new();
        if cursor.next_is_null() {
            return Ok(list);
        }
        cursor.expect_mapping_start()?;
        while !cursor.next_is_mapping_end()? {
            let key = cursor.expect_scalar()?.value;
            let value = codec.decode_element(cursor)?;
            list.set_uniform(&key, value);
        }
        Ok(list)
    }

    pub fn encode_uniform_map<C: ElementCodec<V>>(&self, out: &mut Emitter, codec: &C) {
        out.mapping_start();
        for uniform in self.iter() {
            out.key(uniform.key());
            codec.encode_element(uniform.value(), out);
        }
        out.mapping_end();
    }
}

impl<T> Observable for ObservableList<T> {
    fn property_changed(&self) -> Option<&Signal<PropertyChanged>> {
        Some(&self.property_changed)
    }
}

impl<T: Observable + Clone + 'static> Default for ObservableList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Observable + Clone + 'static> FromIterator<T> for ObservableList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        for item in iter {
            list.push(item);
        }
        list
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.slots.iter().map(|slot| &slot.value))
            .finish()
    }
}

impl<T: Observable + Clone + Decode + Encode + 'static> Decode for ObservableList<T> {
    fn decode(cursor: &mut Cursor) -> DocResult<Self> {
        Self::decode_sequence(cursor, &Natural)
    }
}

impl<T: Observable + Clone + Encode + 'static> Encode for ObservableList<T> {
    fn encode(&self, out: &mut Emitter) {
        out.sequence_start();
        for item in self.iter() {
            item.encode(out);
        }
        out.sequence_end();
    }
}
