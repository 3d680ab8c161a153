//! Observer lists with scoped subscriptions

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

/// Event handler function type
pub type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Subscriber ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

struct Registry<E> {
    next_id: u64,
    handlers: Vec<(SubscriberId, Handler<E>)>,
}

trait Detach: Send + Sync {
    fn detach(&self, id: SubscriberId);
}

impl<E: 'static> Detach for Mutex<Registry<E>> {
    fn detach(&self, id: SubscriberId) {
        self.lock().handlers.retain(|(sid, _)| *sid != id);
    }
}

/// A list of handlers for one event type.
///
/// Emission takes a snapshot of the handler list first, so handlers may
/// subscribe or drop subscriptions while being called.
pub struct Signal<E> {
    registry: Arc<Mutex<Registry<E>>>,
}

impl<E: 'static> Signal<E> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 1,
                handlers: Vec::new(),
            })),
        }
    }

    /// Subscribe a handler. It stays attached until the returned
    /// subscription is dropped.
    #[must_use = "dropping the subscription detaches the handler"]
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock();
        let id = SubscriberId(registry.next_id);
        registry.next_id += 1;
        registry.handlers.push((id, Arc::new(handler)));
        drop(registry);

        let strong: Arc<dyn Detach> = self.registry.clone();
        let weak = Arc::downgrade(&strong);
        Subscription {
            id,
            registry: Some(weak),
        }
    }

    /// Call every handler with `event`
    pub fn emit(&self, event: &E) {
        emit_to(&self.registry, event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.lock().handlers.len()
    }

    /// A handle that can emit without keeping the signal alive
    pub fn downgrade(&self) -> WeakSignal<E> {
        WeakSignal {
            registry: Arc::downgrade(&self.registry),
        }
    }
}

impl<E: 'static> Default for Signal<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for Signal<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("subscribers", &self.registry.lock().handlers.len())
            .finish()
    }
}

fn emit_to<E>(registry: &Mutex<Registry<E>>, event: &E) {
    let handlers: Vec<Handler<E>> = registry
        .lock()
        .handlers
        .iter()
        .map(|(_, handler)| handler.clone())
        .collect();

    for handler in handlers {
        handler(event);
    }
}

/// Non-owning handle to a [`Signal`]
pub struct WeakSignal<E> {
    registry: Weak<Mutex<Registry<E>>>,
}

impl<E: 'static> WeakSignal<E> {
    /// Emit if the signal is still alive. Returns whether it was.
    pub fn emit(&self, event: &E) -> bool {
        match self.registry.upgrade() {
            Some(registry) => {
                emit_to(&registry, event);
                true
            }
            None => false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.registry.strong_count() > 0
    }
}

impl<E> Clone for WeakSignal<E> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
        }
    }
}

/// Scoped subscription token; the handler is detached on drop.
pub struct Subscription {
    id: SubscriberId,
    registry: Option<Weak<dyn Detach>>,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Whether the signal this subscription belongs to is still alive
    pub fn is_active(&self) -> bool {
        self.registry
            .as_ref()
            .is_some_and(|registry| registry.strong_count() > 0)
    }

    /// Detach now rather than at drop
    pub fn cancel(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        if let Some(registry) = self.registry.take().and_then(|weak| weak.upgrade()) {
            registry.detach(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
