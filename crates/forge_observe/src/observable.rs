//! Property change notification

use forge_doc::{Cursor, Decode, DocResult, Emitter, Encode, Node};

use crate::signal::{Signal, Subscription, WeakSignal};

/// Property change event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PropertyChanged {
    pub property: &'static str,
}

impl PropertyChanged {
    pub const fn new(property: &'static str) -> Self {
        Self { property }
    }
}

/// Values that may announce changes to their own properties.
///
/// Plain values such as numbers and strings have no signal; containers
/// only hook elements that return one.
pub trait Observable {
    fn property_changed(&self) -> Option<&Signal<PropertyChanged>> {
        None
    }
}

impl Observable for f32 {}
impl Observable for f64 {}
impl Observable for bool {}
impl Observable for u32 {}
impl Observable for i32 {}
impl Observable for u64 {}
impl Observable for String {}
impl Observable for Node {}

/// Forward property changes of `source` into `target`, mapped by `map`.
pub fn forward<T, E, F>(source: &T, target: WeakSignal<E>, map: F) -> Option<Subscription>
where
    T: Observable + ?Sized,
    E: 'static,
    F: Fn(&PropertyChanged) -> E + Send + Sync + 'static,
{
    source.property_changed().map(|signal| {
        signal.subscribe(move |change| {
            target.emit(&map(change));
        })
    })
}

/// A single observable value
pub struct ObservableValue<T> {
    value: T,
    changed: Signal<PropertyChanged>,
}

impl<T: PartialEq> ObservableValue<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            changed: Signal::new(),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replace the value, notifying `value` if it differs
    pub fn set(&mut self, value: T) {
        if self.value != value {
            self.value = value;
            self.changed.emit(&PropertyChanged::new("value"));
        }
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> Observable for ObservableValue<T> {
    fn property_changed(&self) -> Option<&Signal<PropertyChanged>> {
        Some(&self.changed)
    }
}

impl<T: PartialEq + Default> Default for ObservableValue<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: PartialEq + Clone> Clone for ObservableValue<T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T: PartialEq> PartialEq for ObservableValue<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ObservableValue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ObservableValue").field(&self.value).finish()
    }
}

impl<T: PartialEq + Decode> Decode for ObservableValue<T> {
    fn decode(cursor: &mut Cursor) -> DocResult<Self> {
        T::decode(cursor).map(Self::new)
    }
}

impl<T: Encode> Encode for ObservableValue<T> {
    fn encode(&self, out: &mut Emitter) {
        self.value.encode(out);
    }
}
