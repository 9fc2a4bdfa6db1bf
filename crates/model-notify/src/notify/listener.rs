//! StructuralListener — observes adapters being added to and removed from an
//! adapter list, independent of the adapters' own change callbacks.

use super::adapter::AdapterRc;
use super::notifier::NotifierHandle;

pub trait StructuralListener: Send + Sync {
    /// Called after `adapter` has been added to `notifier`'s list (and after
    /// the adapter's target has been set).
    fn added(&self, notifier: &NotifierHandle, adapter: &AdapterRc);

    /// Called after `adapter` has been removed from `notifier`'s list, after
    /// its removal notification, and before its target is cleared.
    fn removed(&self, notifier: &NotifierHandle, adapter: &AdapterRc);
}
