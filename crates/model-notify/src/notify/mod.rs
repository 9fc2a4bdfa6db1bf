//! Change-notification fan-out — copy-on-write adapter lists for observable
//! model objects.
//!
//! # Overview
//!
//! Every mutable model object (a [`Notifier`]) carries an insertion-ordered
//! set of observers ([`Adapter`]s) in an [`AdapterList`]. State changes are
//! broadcast to the attached adapters as [`Notification`]s. Iteration always
//! runs over a [`Snapshot`] of the list, so an adapter callback can attach or
//! detach adapters — including itself — mid-dispatch without corrupting the
//! in-flight iteration; the list copies its buffer on the first mutation
//! after a snapshot is taken.
//!
//! # Modules
//!
//! - [`adapter`] — [`Adapter`] trait, [`TypeTag`] capability tags,
//!   [`TargetCell`].
//! - [`adapter_list`] — [`AdapterList`] and [`Snapshot`].
//! - [`chain`] — [`NotificationChain`] batch dispatch.
//! - [`listener`] — [`StructuralListener`] attach/detach observation.
//! - [`notification`] — [`Notification`], [`EventKind`], [`ChangeValue`].
//! - [`notifier`] — [`Notifier`] trait and [`BasicNotifier`].
//!
//! The free functions below are the operation surface collaborators (a
//! meta-object layer, a persistence layer, embedding applications) call;
//! each is a thin veneer over the trait and list methods.

pub mod adapter;
pub mod adapter_list;
pub mod chain;
pub mod listener;
pub mod notification;
pub mod notifier;

pub use adapter::{Adapter, AdapterRc, TargetCell, TypeTag};
pub use adapter_list::{AdapterList, Snapshot};
pub use chain::NotificationChain;
pub use listener::StructuralListener;
pub use notification::{ChangeValue, EventKind, Notification};
pub use notifier::{BasicNotifier, Notifier, NotifierHandle, NotifierRef};

use std::sync::Arc;

use tracing::debug;

use crate::error::{NotifyError, Result};

/// Attaches `adapter` to `notifier`. Errors if the notifier cannot store
/// adapters.
pub fn attach(notifier: &dyn Notifier, adapter: AdapterRc) -> Result<()> {
    let list = notifier
        .adapter_list()
        .ok_or(NotifyError::AdaptersUnsupported)?;
    list.add(adapter);
    Ok(())
}

/// Detaches `adapter` from `notifier`. Returns false — a silent no-op — when
/// it was not attached.
pub fn detach(notifier: &dyn Notifier, adapter: &AdapterRc) -> bool {
    match notifier.adapter_list() {
        Some(list) => {
            let removed = list.remove(adapter);
            if removed {
                debug!("adapter detached via facade");
            }
            removed
        }
        None => false,
    }
}

/// The notifier's currently attached adapters, as a stable snapshot. An
/// absent list reads as empty.
pub fn adapters(notifier: &dyn Notifier) -> Snapshot {
    match notifier.adapter_list() {
        Some(list) => list.snapshot(),
        None => Arc::new(Vec::new()),
    }
}

pub fn delivery_enabled(notifier: &dyn Notifier) -> bool {
    notifier.deliver()
}

pub fn set_delivery_enabled(notifier: &dyn Notifier, enabled: bool) -> Result<()> {
    notifier.set_deliver(enabled)
}

pub fn notify(notifier: &dyn Notifier, notification: &Notification) {
    notifier.notify(notification);
}

/// The first attached adapter (in attachment order) answering true for
/// `type_tag`.
pub fn adapter_for_type(notifier: &dyn Notifier, type_tag: &TypeTag) -> Option<AdapterRc> {
    notifier
        .adapter_list()
        .and_then(|list| list.adapter_for_type(type_tag))
}

/// Registers a structural listener on the notifier's adapter list.
pub fn register_structural_listener(
    notifier: &dyn Notifier,
    listener: Arc<dyn StructuralListener>,
) -> Result<()> {
    let list = notifier
        .adapter_list()
        .ok_or(NotifyError::AdaptersUnsupported)?;
    list.add_listener(listener);
    Ok(())
}

/// Removes a structural listener registration; a no-op when it was never
/// registered (or the notifier holds no list).
pub fn unregister_structural_listener(
    notifier: &dyn Notifier,
    listener: &Arc<dyn StructuralListener>,
) {
    if let Some(list) = notifier.adapter_list() {
        list.remove_listener(listener);
    }
}
