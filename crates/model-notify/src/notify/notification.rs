//! Notification — the immutable change-event record delivered to adapters.

use std::fmt;
use std::sync::Arc;

use super::adapter::AdapterRc;
use super::notifier::{NotifierHandle, NotifierRef};

/// The kind of state change a notification describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A single-valued feature was set.
    Set,
    /// A single-valued feature was unset.
    Unset,
    /// A value was added to a collection feature.
    Add,
    /// A value was removed from a collection feature.
    Remove,
    /// Several values were added to a collection feature.
    AddMany,
    /// Several values were removed from a collection feature.
    RemoveMany,
    /// A value was moved within a collection feature.
    Move,
    /// An adapter is being removed from its notifier; delivered only to the
    /// adapter being removed.
    RemovingAdapter,
    /// A proxy was resolved; carries no real state change.
    Resolve,
}

/// A value carried in a notification's old/new slots.
///
/// The `Adapter` variant exists because adapter-removal notifications carry
/// the removed adapter itself as the old value.
#[derive(Clone, Default)]
pub enum ChangeValue {
    #[default]
    None,
    Json(serde_json::Value),
    Adapter(AdapterRc),
}

impl ChangeValue {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_adapter(&self) -> Option<&AdapterRc> {
        match self {
            Self::Adapter(adapter) => Some(adapter),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for ChangeValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl PartialEq for ChangeValue {
    /// `Json` compares by value; `Adapter` compares by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Json(a), Self::Json(b)) => a == b,
            (Self::Adapter(a), Self::Adapter(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for ChangeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Json(value) => f.debug_tuple("Json").field(value).finish(),
            Self::Adapter(_) => f.write_str("Adapter(..)"),
        }
    }
}

/// An immutable change-event record.
///
/// Holds the notifier that produced the change (weakly — a notification never
/// keeps a model object alive), the old and new values, and a position for
/// indexed-collection changes.
#[derive(Debug, Clone)]
pub struct Notification {
    kind: EventKind,
    notifier: Option<NotifierRef>,
    old_value: ChangeValue,
    new_value: ChangeValue,
    position: Option<usize>,
}

impl Notification {
    pub fn new(
        kind: EventKind,
        notifier: &NotifierHandle,
        old_value: ChangeValue,
        new_value: ChangeValue,
        position: Option<usize>,
    ) -> Self {
        Self {
            kind,
            notifier: Some(Arc::downgrade(notifier)),
            old_value,
            new_value,
            position,
        }
    }

    /// The removal record synthesized when an adapter is detached. The
    /// notifier names the *owner* of the list even though the record is built
    /// inline at removal time; the old value is the adapter itself.
    pub(crate) fn removing_adapter(
        owner: &NotifierHandle,
        adapter: AdapterRc,
        position: usize,
    ) -> Self {
        Self {
            kind: EventKind::RemovingAdapter,
            notifier: Some(Arc::downgrade(owner)),
            old_value: ChangeValue::Adapter(adapter),
            new_value: ChangeValue::None,
            position: Some(position),
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// The notifier that produced this event, if still alive.
    pub fn notifier(&self) -> Option<NotifierHandle> {
        self.notifier.as_ref().and_then(|weak| weak.upgrade())
    }

    pub fn old_value(&self) -> &ChangeValue {
        &self.old_value
    }

    pub fn new_value(&self) -> &ChangeValue {
        &self.new_value
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Whether this event carries no real state change: a `Set`/`Unset`
    /// whose old and new values are equal, or a `Resolve`.
    pub fn is_touch(&self) -> bool {
        match self.kind {
            EventKind::Resolve => true,
            EventKind::Set | EventKind::Unset => self.old_value == self.new_value,
            _ => false,
        }
    }
}
