//! # Forge Observe
//!
//! Change notification for the editor's asset model:
//! - Signals with scoped subscriptions
//! - Observable lists and dictionaries that hook their elements
//! - Key-identified uniforms
//! - Per-asset dirty tracking
//!
//! Containers also know how to read and write themselves through a
//! pluggable [`ElementCodec`](forge_doc::ElementCodec), so one generic
//! container serves every element kind an asset stores.

pub mod dictionary;
pub mod error;
pub mod list;
pub mod observable;
pub mod signal;
pub mod tracker;
pub mod uniform;

pub use dictionary::{KeyedItemChanged, MapChange, ObservableDictionary};
pub use error::ObserveError;
pub use list::{ItemChanged, ListChange, ObservableList, SlotId};
pub use observable::{forward, Observable, ObservableValue, PropertyChanged};
pub use signal::{Signal, SubscriberId, Subscription, WeakSignal};
pub use tracker::{ChangeTracker, DISPLAY_NAME, IS_DIRTY};
pub use uniform::Uniform;

/// Prelude
pub mod prelude {
    pub use crate::{
        ChangeTracker, Observable, ObservableDictionary, ObservableList, ObservableValue,
        PropertyChanged, Signal, Subscription, Uniform,
    };
}
