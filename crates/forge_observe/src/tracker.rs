//! Dirty-state tracking
//!
//! A [`ChangeTracker`] is the property-changed signal of one asset (or one
//! nested entity that owns its own dirty flag). Any property change other
//! than the dirty flag itself and the exempt properties sets the flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::dictionary::ObservableDictionary;
use crate::list::ObservableList;
use crate::observable::{Observable, PropertyChanged};
use crate::signal::{Signal, Subscription};

/// Property name of the dirty flag
pub const IS_DIRTY: &str = "isDirty";

/// Property name of an asset's display identity
pub const DISPLAY_NAME: &str = "displayName";

/// Properties that never make an entity dirty by default
pub const DEFAULT_EXEMPT: &[&str] = &[DISPLAY_NAME];

pub struct ChangeTracker {
    changed: Signal<PropertyChanged>,
    dirty: Arc<AtomicBool>,
    _self_listener: Subscription,
    watches: Vec<Subscription>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::with_exempt(DEFAULT_EXEMPT)
    }

    /// Create a tracker whose `exempt` properties do not set the dirty flag
    pub fn with_exempt(exempt: &'static [&'static str]) -> Self {
        let changed = Signal::new();
        let dirty = Arc::new(AtomicBool::new(false));

        let flag = dirty.clone();
        let weak = changed.downgrade();
        let self_listener = changed.subscribe(move |change: &PropertyChanged| {
            if change.property == IS_DIRTY || exempt.contains(&change.property) {
                return;
            }
            if !flag.swap(true, Ordering::SeqCst) {
                log::trace!("marked dirty by '{}'", change.property);
                weak.emit(&PropertyChanged::new(IS_DIRTY));
            }
        });

        Self {
            changed,
            dirty,
            _self_listener: self_listener,
            watches: Vec::new(),
        }
    }

    /// Announce that `property` changed
    pub fn notify(&self, property: &'static str) {
        self.changed.emit(&PropertyChanged::new(property));
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    pub fn mark_dirty(&self) {
        if !self.dirty.swap(true, Ordering::SeqCst) {
            self.notify(IS_DIRTY);
        }
    }

    /// Clear the dirty flag. Only load, revert and save call this.
    pub fn mark_clean(&self) {
        if self.dirty.swap(false, Ordering::SeqCst) {
            self.notify(IS_DIRTY);
        }
    }

    /// Route structural and element changes of `list` into `property`
    pub fn watch_list<T>(&mut self, property: &'static str, list: &ObservableList<T>)
    where
        T: Observable + Clone + 'static,
    {
        let weak = self.changed.downgrade();
        self.watches.push(list.changes().subscribe(move |_| {
            weak.emit(&PropertyChanged::new(property));
        }));

        let weak = self.changed.downgrade();
        self.watches.push(list.item_changed().subscribe(move |item| {
            if item.property != IS_DIRTY {
                weak.emit(&PropertyChanged::new(property));
            }
        }));
    }

    /// Route structural and value changes of `map` into `property`
    pub fn watch_map<K, V>(&mut self, property: &'static str, map: &ObservableDictionary<K, V>)
    where
        K: Eq + std::hash::Hash + Clone + Send + Sync + 'static,
        V: Observable + Clone + 'static,
    {
        let weak = self.changed.downgrade();
        self.watches.push(map.changes().subscribe(move |_| {
            weak.emit(&PropertyChanged::new(property));
        }));

        let weak = self.changed.downgrade();
        self.watches.push(map.item_changed().subscribe(move |item| {
            if item.property != IS_DIRTY {
                weak.emit(&PropertyChanged::new(property));
            }
        }));
    }

    /// Route property changes of a nested observable into `property`
    pub fn watch<T: Observable + ?Sized>(&mut self, property: &'static str, source: &T) {
        let Some(signal) = source.property_changed() else {
            return;
        };
        let weak = self.changed.downgrade();
        self.watches.push(signal.subscribe(move |change| {
            if change.property != IS_DIRTY {
                weak.emit(&PropertyChanged::new(property));
            }
        }));
    }

    /// Drop every container route. Call before re-attaching to freshly
    /// decoded containers.
    pub fn reset_watches(&mut self) {
        self.watches.clear();
    }

    pub fn watch_count(&self) -> usize {
        self.watches.len()
    }

    /// Call `handler` with the new flag whenever it flips
    #[must_use = "dropping the subscription detaches the handler"]
    pub fn on_dirty_changed<F>(&self, handler: F) -> Subscription
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let flag = self.dirty.clone();
        self.changed.subscribe(move |change| {
            if change.property == IS_DIRTY {
                handler(flag.load(Ordering::SeqCst));
            }
        })
    }
}

impl Observable for ChangeTracker {
    fn property_changed(&self) -> Option<&Signal<PropertyChanged>> {
        Some(&self.changed)
    }
}

impl Default for ChangeTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ChangeTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeTracker")
            .field("dirty", &self.is_dirty())
            .field("watches", &self.watches.len())
            .finish()
    }
}
