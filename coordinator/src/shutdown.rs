//! Cooperative shutdown controller.
//!
//! `server.rs` combines this with OS signals; the scheduler tasks and the HTTP
//! server both wait on it.

use std::sync::Arc;
use tokio::sync::watch;

/// Cooperative shutdown signal shared by the server and every cat task.
///
/// Backed by a `watch` channel so that a waiter that subscribes after the
/// request still observes it.
#[derive(Clone, Debug)]
pub struct ShutdownController {
    sender: Arc<watch::Sender<bool>>,
    receiver: watch::Receiver<bool>,
}

impl Default for ShutdownController {
    fn default() -> Self {
        let (sender, receiver) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
            receiver,
        }
    }
}

impl ShutdownController {
    /// Returns true if shutdown has been requested.
    pub fn is_shutdown_requested(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Request shutdown and wake all waiters.
    pub fn request_shutdown(&self) {
        self.sender.send_replace(true);
    }

    /// Wait until shutdown is requested.
    pub async fn wait(&self) {
        let mut receiver = self.receiver.clone();
        loop {
            if *receiver.borrow_and_update() {
                return;
            }
            if receiver.changed().await.is_err() {
                return;
            }
        }
    }
}
