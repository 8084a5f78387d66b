//! Disposable handles for session event callbacks.

use tokio::task::JoinHandle;

/// Handle to a callback registered with
/// [`SessionGateway::on_login`](super::SessionGateway::on_login) or
/// [`SessionGateway::on_logout`](super::SessionGateway::on_logout).
///
/// Delivery stops when the handle is unsubscribed or dropped.
#[derive(Debug)]
#[must_use = "dropping the subscription stops callback delivery"]
pub struct Subscription {
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    pub(crate) const fn new(handle: JoinHandle<()>) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    /// Stops callback delivery.
    pub fn unsubscribe(mut self) {
        self.cancel();
    }

    /// Returns `true` while the callback can still fire.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}
