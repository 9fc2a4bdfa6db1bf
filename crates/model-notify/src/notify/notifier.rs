//! Notifier — the observable side of the notification contract.
//!
//! The trait's provided methods implement the "featureless" variant: no
//! adapter storage, delivery reported as disabled, and an error on any
//! attempt to set the delivery flag. [`BasicNotifier`] is the full storing
//! implementation model objects embed or wrap.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use tracing::trace;

use crate::error::{NotifyError, Result};

use super::adapter_list::AdapterList;
use super::notification::Notification;

/// A shared, dynamically dispatched notifier reference.
pub type NotifierHandle = Arc<dyn Notifier>;

/// A non-owning notifier reference, used for all back-pointers (adapter
/// targets, list owners, notification sources) so that observation never
/// extends a model object's lifetime.
pub type NotifierRef = Weak<dyn Notifier>;

/// An entity capable of holding observers and broadcasting change events.
///
/// Single logical thread of control per model graph: callbacks may freely
/// re-enter the notifier (the reentrancy is what the copy-on-write list
/// exists for), but driving one notifier from genuinely parallel threads
/// without external synchronization is undefined behavior of the embedding
/// application, not something this contract orders.
pub trait Notifier: Send + Sync {
    /// The adapter list, created lazily on first access by storing
    /// implementations. `None` means this notifier cannot hold adapters;
    /// readers treat that as an empty list.
    fn adapter_list(&self) -> Option<&AdapterList> {
        None
    }

    /// Whether notification delivery is enabled.
    fn deliver(&self) -> bool {
        false
    }

    fn set_deliver(&self, _deliver: bool) -> Result<()> {
        Err(NotifyError::DeliverUnsupported)
    }

    /// Fans `notification` out to every attached adapter, in list order,
    /// iterating a snapshot so callbacks can mutate the list. A guaranteed
    /// no-op when delivery is disabled or nothing is attached.
    ///
    /// A panicking callback propagates immediately, aborting delivery to the
    /// remaining adapters in this call.
    fn notify(&self, notification: &Notification) {
        if !self.deliver() {
            return;
        }
        let Some(list) = self.adapter_list() else {
            return;
        };
        if list.is_empty() {
            return;
        }
        let snapshot = list.snapshot();
        trace!(adapters = snapshot.len(), kind = ?notification.kind(), "dispatching");
        for adapter in snapshot.iter() {
            adapter.notify_changed(notification);
        }
    }

    /// Whether [`notify`](Notifier::notify) would deliver anything right
    /// now. Side-effect free; callers consult this to skip constructing a
    /// [`Notification`] when no one is listening.
    fn notification_required(&self) -> bool {
        self.deliver() && self.adapter_list().is_some_and(|list| !list.is_empty())
    }
}

/// The standard storing notifier: lazily allocated adapter list plus a
/// delivery flag (enabled by default).
///
/// Constructed behind an `Arc` so the list can hold a weak back-reference to
/// its owner.
pub struct BasicNotifier {
    self_ref: NotifierRef,
    adapters: OnceLock<AdapterList>,
    deliver: AtomicBool,
}

impl BasicNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new_cyclic(|me: &Weak<Self>| {
            let self_ref: NotifierRef = me.clone();
            Self {
                self_ref,
                adapters: OnceLock::new(),
                deliver: AtomicBool::new(true),
            }
        })
    }

    /// The adapter list, allocating it on first access.
    pub fn adapters(&self) -> &AdapterList {
        self.adapters
            .get_or_init(|| AdapterList::new(self.self_ref.clone()))
    }
}

impl Notifier for BasicNotifier {
    fn adapter_list(&self) -> Option<&AdapterList> {
        Some(self.adapters())
    }

    fn deliver(&self) -> bool {
        self.deliver.load(Ordering::Relaxed)
    }

    fn set_deliver(&self, deliver: bool) -> Result<()> {
        self.deliver.store(deliver, Ordering::Relaxed);
        Ok(())
    }
}

impl fmt::Debug for BasicNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicNotifier")
            .field("adapters", &self.adapters.get().map_or(0, AdapterList::len))
            .field("deliver", &self.deliver())
            .finish()
    }
}
