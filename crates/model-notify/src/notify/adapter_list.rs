//! AdapterList — the copy-on-write observer set owned by one notifier.
//!
//! # Reentrancy
//!
//! Notification dispatch iterates a snapshot while each adapter callback runs
//! arbitrary code, frequently mutating the very list being iterated (an
//! adapter detaching itself on a specific event is a standard idiom). The
//! backing buffer is therefore a refcounted `Arc<Vec<..>>`:
//!
//!   - [`snapshot`](AdapterList::snapshot) hands out a second strong
//!     reference, which is all it takes to mark the buffer "exposed".
//!   - Every structural mutation goes through `Arc::make_mut`, which clones
//!     the buffer if any snapshot is still held and mutates in place
//!     otherwise. The copy cost is paid on the first mutation *after* a read,
//!     not on every read.
//!
//! # Locking
//!
//! Two `parking_lot::Mutex`es guard the buffer and the listener registry.
//! Neither lock is ever held while user code (target bookkeeping, structural
//! listeners, change callbacks) runs, so callbacks can freely re-enter the
//! list.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::error::{NotifyError, Result};

use super::adapter::{AdapterRc, TypeTag};
use super::listener::StructuralListener;
use super::notification::Notification;
use super::notifier::NotifierRef;

/// A read-only view of the backing buffer at a point in time, safe to
/// iterate even as the live list later mutates.
pub type Snapshot = Arc<Vec<AdapterRc>>;

pub struct AdapterList {
    /// Non-owning back-reference to the notifier that owns this list. When it
    /// is gone, structural operations still maintain the buffer but skip all
    /// target bookkeeping and callbacks — a dying notifier must not be named
    /// in new events.
    owner: NotifierRef,
    buf: Mutex<Snapshot>,
    listeners: Mutex<Vec<Arc<dyn StructuralListener>>>,
}

impl AdapterList {
    pub fn new(owner: NotifierRef) -> Self {
        Self {
            owner,
            buf: Mutex::new(Arc::new(Vec::new())),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.lock().is_empty()
    }

    /// The current backing buffer. Holding the returned `Snapshot` is what
    /// forces the next structural mutation to copy.
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.buf.lock())
    }

    // -----------------------------------------------------------------------
    // Additions
    // -----------------------------------------------------------------------

    /// Appends `adapter`. No uniqueness constraint is enforced: adding the
    /// same reference twice yields two list entries.
    pub fn add(&self, adapter: AdapterRc) {
        {
            let mut buf = self.buf.lock();
            Arc::make_mut(&mut *buf).push(Arc::clone(&adapter));
        }
        self.did_add(&adapter);
    }

    /// Inserts `adapter` at `index` (`index == len` appends).
    pub fn add_at(&self, index: usize, adapter: AdapterRc) -> Result<()> {
        {
            let mut buf = self.buf.lock();
            let len = buf.len();
            if index > len {
                return Err(NotifyError::IndexOutOfBounds { index, len });
            }
            Arc::make_mut(&mut *buf).insert(index, Arc::clone(&adapter));
        }
        self.did_add(&adapter);
        Ok(())
    }

    /// Appends a batch, preserving its relative order. Side effects fire per
    /// element, in batch order, after the whole batch is in the buffer.
    pub fn add_all(&self, adapters: impl IntoIterator<Item = AdapterRc>) {
        let batch: Vec<AdapterRc> = adapters.into_iter().collect();
        if batch.is_empty() {
            return;
        }
        {
            let mut buf = self.buf.lock();
            Arc::make_mut(&mut *buf).extend(batch.iter().cloned());
        }
        for adapter in &batch {
            self.did_add(adapter);
        }
    }

    // -----------------------------------------------------------------------
    // Removals
    // -----------------------------------------------------------------------

    /// Removes the first entry identical to `adapter`. Returns false — a
    /// silent no-op — if it is not attached.
    pub fn remove(&self, adapter: &AdapterRc) -> bool {
        let index = {
            let mut buf = self.buf.lock();
            match buf.iter().position(|entry| Arc::ptr_eq(entry, adapter)) {
                Some(index) => {
                    Arc::make_mut(&mut *buf).remove(index);
                    index
                }
                None => return false,
            }
        };
        self.did_remove(index, adapter);
        true
    }

    pub fn remove_at(&self, index: usize) -> Result<AdapterRc> {
        let removed = {
            let mut buf = self.buf.lock();
            let len = buf.len();
            if index >= len {
                return Err(NotifyError::IndexOutOfBounds { index, len });
            }
            Arc::make_mut(&mut *buf).remove(index)
        };
        self.did_remove(index, &removed);
        Ok(removed)
    }

    /// Removes every entry, firing removal side effects per element with its
    /// original index.
    pub fn clear(&self) {
        let removed: Vec<AdapterRc> = {
            let mut buf = self.buf.lock();
            std::mem::take(Arc::make_mut(&mut *buf))
        };
        for (index, adapter) in removed.iter().enumerate() {
            self.did_remove(index, adapter);
        }
    }

    /// Removes every entry for which `keep` answers false.
    ///
    /// The predicate is evaluated against a snapshot, then each doomed entry
    /// is removed individually, so removal side effects see the indices the
    /// entries hold at their moment of removal.
    pub fn retain(&self, keep: impl Fn(&AdapterRc) -> bool) {
        let doomed: Vec<AdapterRc> = self
            .snapshot()
            .iter()
            .filter(|adapter| !keep(adapter))
            .cloned()
            .collect();
        for adapter in &doomed {
            self.remove(adapter);
        }
    }

    /// Removes the first occurrence of each given adapter. Returns whether
    /// anything was removed.
    pub fn remove_all(&self, adapters: &[AdapterRc]) -> bool {
        let mut any = false;
        for adapter in adapters {
            any |= self.remove(adapter);
        }
        any
    }

    // -----------------------------------------------------------------------
    // Positional operations
    // -----------------------------------------------------------------------

    /// Replaces the entry at `index`, returning the old one. The old entry
    /// gets full removal side effects, the new one full addition side effects.
    pub fn set(&self, index: usize, adapter: AdapterRc) -> Result<AdapterRc> {
        let old = {
            let mut buf = self.buf.lock();
            let len = buf.len();
            if index >= len {
                return Err(NotifyError::IndexOutOfBounds { index, len });
            }
            std::mem::replace(&mut Arc::make_mut(&mut *buf)[index], Arc::clone(&adapter))
        };
        self.did_remove(index, &old);
        self.did_add(&adapter);
        Ok(old)
    }

    /// Moves the entry at `old_position` to `new_position`. A move neither
    /// adds nor removes membership, so no side effects fire.
    pub fn move_to(&self, new_position: usize, old_position: usize) -> Result<AdapterRc> {
        let mut buf = self.buf.lock();
        let len = buf.len();
        if old_position >= len {
            return Err(NotifyError::IndexOutOfBounds { index: old_position, len });
        }
        if new_position >= len {
            return Err(NotifyError::IndexOutOfBounds { index: new_position, len });
        }
        let vec = Arc::make_mut(&mut *buf);
        let adapter = vec.remove(old_position);
        vec.insert(new_position, Arc::clone(&adapter));
        Ok(adapter)
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// Linear scan in list order for the first adapter whose capability
    /// predicate answers true for `type_tag`.
    pub fn adapter_for_type(&self, type_tag: &TypeTag) -> Option<AdapterRc> {
        let snapshot = self.snapshot();
        snapshot
            .iter()
            .find(|adapter| adapter.is_adapter_for_type(type_tag))
            .cloned()
    }

    // -----------------------------------------------------------------------
    // Structural listeners
    // -----------------------------------------------------------------------

    /// Registers `listener`. Duplicates are permitted; delivery follows
    /// registration order.
    pub fn add_listener(&self, listener: Arc<dyn StructuralListener>) {
        self.listeners.lock().push(listener);
    }

    /// Removes the first registration identical to `listener`; a no-op when
    /// it was never registered.
    pub fn remove_listener(&self, listener: &Arc<dyn StructuralListener>) {
        let mut listeners = self.listeners.lock();
        if let Some(index) = listeners.iter().position(|entry| Arc::ptr_eq(entry, listener)) {
            listeners.remove(index);
        }
    }

    fn listeners_snapshot(&self) -> Vec<Arc<dyn StructuralListener>> {
        self.listeners.lock().clone()
    }

    // -----------------------------------------------------------------------
    // Side effects
    // -----------------------------------------------------------------------

    /// Post-addition bookkeeping: set the adapter's target, then tell the
    /// structural listeners. Runs with no locks held.
    fn did_add(&self, adapter: &AdapterRc) {
        let Some(owner) = self.owner.upgrade() else {
            return;
        };
        adapter.set_target(Some(self.owner.clone()));
        debug_assert!(
            adapter.target().is_some_and(|target| Arc::ptr_eq(&target, &owner)),
            "adapter target must point at the notifier that lists it",
        );
        trace!(adapters = self.buf.lock().len(), "adapter attached");
        for listener in self.listeners_snapshot() {
            listener.added(&owner, adapter);
        }
    }

    /// Post-removal bookkeeping: deliver the removal notification to the
    /// removed adapter alone, tell the structural listeners, then clear the
    /// target (only if it still points here). Runs with no locks held.
    fn did_remove(&self, index: usize, adapter: &AdapterRc) {
        let Some(owner) = self.owner.upgrade() else {
            return;
        };
        if owner.deliver() {
            let notification = Notification::removing_adapter(&owner, Arc::clone(adapter), index);
            adapter.notify_changed(&notification);
        }
        for listener in self.listeners_snapshot() {
            listener.removed(&owner, adapter);
        }
        adapter.unset_target(&owner);
        trace!(adapters = self.buf.lock().len(), "adapter detached");
    }
}

impl fmt::Debug for AdapterList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterList")
            .field("adapters", &self.len())
            .field("listeners", &self.listeners.lock().len())
            .finish()
    }
}
