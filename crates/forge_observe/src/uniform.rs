//! Named values for shader parameter bindings

use core::fmt;
use std::hash::{Hash, Hasher};

use crate::observable::{forward, Observable, PropertyChanged};
use crate::signal::{Signal, Subscription};

/// A `key -> value` pair whose identity is its key.
///
/// Equality and hashing ignore the value, so merging a uniform into a
/// collection replaces the entry with the same name. When the value is
/// itself observable its changes are re-announced as `value`.
pub struct Uniform<V> {
    key: String,
    value: V,
    changed: Signal<PropertyChanged>,
    value_hook: Option<Subscription>,
}

impl<V: Observable> Uniform<V> {
    pub fn new(key: impl Into<String>, value: V) -> Self {
        let changed = Signal::new();
        let value_hook = hook_value(&value, &changed);
        Self {
            key: key.into(),
            value,
            changed,
            value_hook,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    /// Keys are unique within a uniform set, so renames go through
    /// [`ObservableList::rename_uniform`](crate::ObservableList::rename_uniform).
    pub(crate) fn set_key(&mut self, key: impl Into<String>) {
        let key = key.into();
        if self.key != key {
            self.key = key;
            self.changed.emit(&PropertyChanged::new("key"));
        }
    }

    /// Edit the value in place, notifying `value` if it changed
    pub fn modify_value<R>(&mut self, edit: impl FnOnce(&mut V) -> R) -> R
    where
        V: Clone + PartialEq,
    {
        let before = self.value.clone();
        self.value_hook = None;
        let result = edit(&mut self.value);
        self.value_hook = hook_value(&self.value, &self.changed);
        if self.value != before {
            self.changed.emit(&PropertyChanged::new("value"));
        }
        result
    }

    pub fn into_parts(self) -> (String, V) {
        let Self { key, value, .. } = self;
        (key, value)
    }
}

impl<V: Observable + PartialEq> Uniform<V> {
    /// Replace the value. The hook on the old value is dropped before the
    /// new value is hooked.
    pub fn set_value(&mut self, value: V) {
        if self.value == value {
            return;
        }
        self.value_hook = None;
        self.value = value;
        self.value_hook = hook_value(&self.value, &self.changed);
        self.changed.emit(&PropertyChanged::new("value"));
    }
}

fn hook_value<V: Observable>(value: &V, changed: &Signal<PropertyChanged>) -> Option<Subscription> {
    forward(value, changed.downgrade(), |_| PropertyChanged::new("value"))
}

impl<V> Observable for Uniform<V> {
    fn property_changed(&self) -> Option<&Signal<PropertyChanged>> {
        Some(&self.changed)
    }
}

impl<V: Observable + Clone> Clone for Uniform<V> {
    fn clone(&self) -> Self {
        Self::new(self.key.clone(), self.value.clone())
    }
}

impl<V> PartialEq for Uniform<V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<V> Eq for Uniform<V> {}

impl<V> Hash for Uniform<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl<V: fmt::Display> fmt::Display for Uniform<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.value)
    }
}

impl<V: fmt::Debug> fmt::Debug for Uniform<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Uniform")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observable::ObservableValue;
    use parking_lot::Mutex;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn record<V>(uniform: &Uniform<V>) -> (Arc<Mutex<Vec<&'static str>>>, Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        let sub = uniform
            .property_changed()
            .unwrap()
            .subscribe(move |c| s.lock().push(c.property));
        (seen, sub)
    }

    #[test]
    fn test_equality_is_key_only() {
        assert_eq!(Uniform::new("intensity", 1.0f32), Uniform::new("intensity", 2.0f32));
        assert_ne!(Uniform::new("a", 1.0f32), Uniform::new("b", 1.0f32));

        let set: HashSet<_> = [Uniform::new("a", 1.0f32), Uniform::new("a", 5.0f32)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_set_value_notifies() {
        let mut uniform = Uniform::new("intensity", 1.0f32);
        let (seen, _sub) = record(&uniform);

        uniform.set_value(1.0);
        uniform.set_value(2.5);
        uniform.set_key("strength");
        uniform.modify_value(|v| *v *= 2.0);

        assert_eq!(*uniform.value(), 5.0);
        assert_eq!(*seen.lock(), vec!["value", "key", "value"]);
    }

    #[test]
    fn test_nested_value_changes_propagate_and_rehook() {
        let mut uniform = Uniform::new("define", ObservableValue::new(1u32));
        let (seen, _sub) = record(&uniform);

        uniform.modify_value(|v| v.set(2));
        assert_eq!(seen.lock().len(), 1);

        uniform.set_value(ObservableValue::new(10));
        assert_eq!(seen.lock().len(), 2);

        uniform.modify_value(|v| v.set(11));
        assert_eq!(*seen.lock(), vec!["value", "value", "value"]);
    }

    #[test]
    fn test_clone_is_a_fresh_wrapper() {
        let original = Uniform::new("tint", 0.5f32);
        let (seen, _sub) = record(&original);

        let mut copy = original.clone();
        copy.set_value(0.75);

        assert_eq!(copy.key(), "tint");
        assert_eq!(*original.value(), 0.5);
        assert!(seen.lock().is_empty());
        assert_eq!(copy.to_string(), "tint: 0.75");
    }
}
