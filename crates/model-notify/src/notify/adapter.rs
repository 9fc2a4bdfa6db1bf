//! Adapter — the observer side of the notification contract.
//!
//! An adapter is attached to at most one notifier at a time and carries a
//! "target" back-reference to it. The back-reference is a `Weak` lookup
//! pointer: it never extends the notifier's lifetime. [`TargetCell`] is the
//! interior cell implementors embed so they don't re-derive the locking.

use std::sync::Arc;

use parking_lot::Mutex;

use super::notification::Notification;
use super::notifier::{NotifierHandle, NotifierRef};

/// A shared, dynamically dispatched adapter reference.
///
/// Membership in an adapter list is decided by `Arc::ptr_eq` — two
/// structurally equal adapter instances remain individually addressable.
pub type AdapterRc = Arc<dyn Adapter>;

/// A capability tag an adapter can answer for.
///
/// Tags are plain named constants compared by equality — no reflective type
/// inspection. One adapter may answer true for several distinct tags
/// (capability multiplexing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeTag(&'static str);

impl TypeTag {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// An observer attached to a notifier.
///
/// Implementations must keep [`notify_changed`](Adapter::notify_changed)
/// safe to re-enter the owning notifier's adapter list — detaching oneself
/// (or siblings) from inside the callback is a standard idiom and is fully
/// supported by the copy-on-write list.
pub trait Adapter: Send + Sync {
    /// Change callback, invoked once per delivered notification.
    fn notify_changed(&self, notification: &Notification);

    /// Pure capability predicate used by type-indexed lookup.
    fn is_adapter_for_type(&self, _type_tag: &TypeTag) -> bool {
        false
    }

    /// The notifier this adapter is currently attached to, if any and if it
    /// is still alive.
    fn target(&self) -> Option<NotifierHandle>;

    /// Records the attach transition. Called by the adapter list when this
    /// adapter is added, and with `None` to clear.
    fn set_target(&self, target: Option<NotifierRef>);

    /// Records the detach transition from `notifier`.
    ///
    /// The default clears the target only if it still points at `notifier`;
    /// pathological reentrant code may already have reattached the adapter
    /// elsewhere, in which case the target is left untouched. Implementations
    /// that need to distinguish "moved to a different notifier" from
    /// "permanently detached" override this to run their detach-only cleanup.
    fn unset_target(&self, notifier: &NotifierHandle) {
        if let Some(current) = self.target() {
            if Arc::ptr_eq(&current, notifier) {
                self.set_target(None);
            }
        }
    }
}

/// Interior storage for an adapter's target back-reference.
///
/// All methods take `&self`; the cell is never locked while user code runs.
#[derive(Default)]
pub struct TargetCell(Mutex<Option<NotifierRef>>);

impl TargetCell {
    pub fn new() -> Self {
        Self(Mutex::new(None))
    }

    /// The current target, upgraded. `None` if unattached or if the notifier
    /// has already been dropped.
    pub fn get(&self) -> Option<NotifierHandle> {
        self.0.lock().as_ref().and_then(|weak| weak.upgrade())
    }

    pub fn set(&self, target: Option<NotifierRef>) {
        *self.0.lock() = target;
    }

    /// Whether the cell currently points at exactly `notifier`.
    pub fn points_at(&self, notifier: &NotifierHandle) -> bool {
        self.get().is_some_and(|current| Arc::ptr_eq(&current, notifier))
    }
}
