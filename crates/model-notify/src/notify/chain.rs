//! NotificationChain — accumulates the notifications produced by a compound
//! mutation and dispatches them as a batch, in insertion order.

use super::notification::Notification;

#[derive(Debug, Default)]
pub struct NotificationChain {
    notifications: Vec<Notification>,
}

impl NotificationChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    /// Delivers each notification to its own notifier, in insertion order.
    /// Entries whose notifier has already been dropped are skipped — a batch
    /// must not try to notify a now-gone entity.
    pub fn dispatch(self) {
        for notification in &self.notifications {
            if let Some(notifier) = notification.notifier() {
                notifier.notify(notification);
            }
        }
    }
}

impl Extend<Notification> for NotificationChain {
    fn extend<I: IntoIterator<Item = Notification>>(&mut self, iter: I) {
        self.notifications.extend(iter);
    }
}
